//! Board state: twelve piece bitboards plus the aggregates derived from them.

use std::fmt;

use super::bitboard::Bitboard;
use super::makemove::Undo;
use crate::error::{EngineError, Result};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Square index, a1 = 0 .. h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Square(pub u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    #[inline]
    pub const fn from_file_rank(file: u8, rank: u8) -> Self {
        Square(rank * 8 + file)
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 & 7
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn bitboard(self) -> Bitboard {
        Bitboard::from_square(self.0)
    }

    #[inline]
    pub const fn flip_vertical(self) -> Self {
        Square(self.0 ^ 56)
    }

    /// Parse "e4" style coordinates.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let file = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        (file < 8 && rank < 8).then(|| Square::from_file_rank(file, rank))
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.file()) as char, (b'1' + self.rank()) as char)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const BOTH: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank a pawn of this colour double-pushes from.
    #[inline]
    pub const fn pawn_start_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::RANK_2,
            Color::Black => Bitboard::RANK_7,
        }
    }

    #[inline]
    pub const fn promotion_rank(self) -> Bitboard {
        match self {
            Color::White => Bitboard::RANK_8,
            Color::Black => Bitboard::RANK_1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;
    fn not(self) -> Color {
        self.opposite()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// Slot in the twelve-board array: white pawn = 0 .. black king = 11.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.piece_type.index()
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        let color = if index < 6 { Color::White } else { Color::Black };
        Piece::new(PieceType::ALL[index % 6], color)
    }

    pub fn to_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
        Some(Piece::new(piece_type, color))
    }
}

/// Kingside and queenside rights for both colours, one bit each.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0xF);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;

    #[inline]
    pub const fn new(bits: u8) -> Self {
        CastlingRights(bits & 0xF)
    }

    #[inline]
    pub const fn has(self, right: u8) -> bool {
        self.0 & right != 0
    }

    #[inline]
    pub fn remove(&mut self, rights: u8) {
        self.0 &= !rights;
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    pub const fn kingside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_KINGSIDE),
            Color::Black => self.has(Self::BLACK_KINGSIDE),
        }
    }

    pub const fn queenside(self, color: Color) -> bool {
        match color {
            Color::White => self.has(Self::WHITE_QUEENSIDE),
            Color::Black => self.has(Self::BLACK_QUEENSIDE),
        }
    }

    /// Rights lost once anything moves from or onto `sq`.
    pub const fn rights_for_square(sq: Square) -> u8 {
        match sq.0 {
            0 => Self::WHITE_QUEENSIDE,
            7 => Self::WHITE_KINGSIDE,
            4 => Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE,
            56 => Self::BLACK_QUEENSIDE,
            63 => Self::BLACK_KINGSIDE,
            60 => Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE,
            _ => 0,
        }
    }

    /// Swap white and black rights.
    pub const fn flipped(self) -> Self {
        CastlingRights(((self.0 & 0x3) << 2) | ((self.0 >> 2) & 0x3))
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pub(crate) pieces: [Bitboard; 12],
    pub(crate) colors: [Bitboard; 2],
    pub(crate) empty: Bitboard,
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    /// Square passed over by a pawn of that colour's double push, live for one ply.
    pub(crate) en_passant: [Bitboard; 2],
    pub(crate) history: Vec<Undo>,
}

impl Board {
    pub fn empty() -> Self {
        Board {
            pieces: [Bitboard::EMPTY; 12],
            colors: [Bitboard::EMPTY; 2],
            empty: Bitboard::ALL,
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: [Bitboard::EMPTY; 2],
            history: Vec::new(),
        }
    }

    pub fn startpos() -> Self {
        const BACK_RANK: [PieceType; 8] = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        let mut board = Board::empty();
        for (file, &piece_type) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.put_piece(Piece::new(piece_type, Color::White), Square::from_file_rank(file, 0));
            board.put_piece(Piece::new(PieceType::Pawn, Color::White), Square::from_file_rank(file, 1));
            board.put_piece(Piece::new(PieceType::Pawn, Color::Black), Square::from_file_rank(file, 6));
            board.put_piece(Piece::new(piece_type, Color::Black), Square::from_file_rank(file, 7));
        }
        board.castling = CastlingRights::ALL;
        board.update_aggregates();
        board
    }

    /// Parse placement, side to move and castling rights. A trailing
    /// en-passant field is honoured; move clocks are checked and dropped.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let invalid = |msg: String| EngineError::InvalidPosition(msg);
        let mut parts = fen.split_whitespace();
        let placement = parts.next().ok_or_else(|| invalid("empty position string".into()))?;
        let side = parts.next().ok_or_else(|| invalid("missing side to move".into()))?;
        let castling = parts.next().ok_or_else(|| invalid("missing castling field".into()))?;

        let mut board = Board::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(invalid(format!("expected 8 ranks, found {}", ranks.len())));
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(invalid(format!("bad empty-square count '{}'", c)));
                    }
                    file += skip as u8;
                } else {
                    let piece = Piece::from_char(c)
                        .ok_or_else(|| invalid(format!("unknown piece '{}'", c)))?;
                    if file >= 8 {
                        return Err(invalid(format!("rank {} overflows", rank + 1)));
                    }
                    board.put_piece(piece, Square::from_file_rank(file, rank));
                    file += 1;
                }
                if file > 8 {
                    return Err(invalid(format!("rank {} overflows", rank + 1)));
                }
            }
            if file != 8 {
                return Err(invalid(format!("rank {} has {} files", rank + 1, file)));
            }
        }

        board.side_to_move = match side {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad side to move '{}'", other))),
        };

        let mut rights = 0u8;
        for c in castling.chars() {
            rights |= match c {
                'K' => CastlingRights::WHITE_KINGSIDE,
                'Q' => CastlingRights::WHITE_QUEENSIDE,
                'k' => CastlingRights::BLACK_KINGSIDE,
                'q' => CastlingRights::BLACK_QUEENSIDE,
                '-' => 0,
                other => return Err(invalid(format!("bad castling right '{}'", other))),
            };
        }
        board.castling = CastlingRights::new(rights);

        if let Some(ep) = parts.next() {
            if ep != "-" {
                let sq = Square::from_algebraic(ep)
                    .ok_or_else(|| invalid(format!("bad en-passant square '{}'", ep)))?;
                let pusher = board.side_to_move.opposite();
                if !board.is_en_passant_target(sq, pusher) {
                    return Err(invalid(format!("no pawn can be taken en passant on {}", ep)));
                }
                board.en_passant[pusher.index()] = sq.bitboard();
            }
        }
        for clock in parts.take(2) {
            clock
                .parse::<u32>()
                .map_err(|_| invalid(format!("bad move counter '{}'", clock)))?;
        }

        for color in Color::BOTH {
            let kings = board.pieces_of(PieceType::King, color).count();
            if kings != 1 {
                return Err(invalid(format!("{:?} has {} kings", color, kings)));
            }
        }

        board.update_aggregates();
        Ok(board)
    }

    /// `sq` is empty on `pusher`'s third rank, with `pusher`'s pawn just past
    /// it and the square it came from empty.
    fn is_en_passant_target(&self, sq: Square, pusher: Color) -> bool {
        let (pawn, origin) = match pusher {
            Color::White if sq.rank() == 2 => (Square(sq.0 + 8), Square(sq.0 - 8)),
            Color::Black if sq.rank() == 5 => (Square(sq.0 - 8), Square(sq.0 + 8)),
            _ => return false,
        };
        self.piece_at(sq).is_none()
            && self.piece_at(origin).is_none()
            && self.piece_at(pawn) == Some(Piece::new(PieceType::Pawn, pusher))
    }

    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev() {
            let mut gap = 0;
            for file in 0..8u8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some(piece) => {
                        if gap > 0 {
                            fen.push_str(&gap.to_string());
                            gap = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                fen.push_str(&gap.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling == CastlingRights::NONE {
            fen.push('-');
        } else {
            for (bit, c) in [
                (CastlingRights::WHITE_KINGSIDE, 'K'),
                (CastlingRights::WHITE_QUEENSIDE, 'Q'),
                (CastlingRights::BLACK_KINGSIDE, 'k'),
                (CastlingRights::BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling.has(bit) {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        let ep = self.en_passant[0] | self.en_passant[1];
        if ep.is_empty() {
            fen.push('-');
        } else {
            fen.push_str(&Square(ep.lsb()).to_algebraic());
        }
        fen
    }

    /// Recompute the colour boards and the empty set from the twelve piece boards.
    pub(crate) fn update_aggregates(&mut self) {
        let mut white = Bitboard::EMPTY;
        let mut black = Bitboard::EMPTY;
        for i in 0..6 {
            white |= self.pieces[i];
            black |= self.pieces[i + 6];
        }
        self.colors = [white, black];
        self.empty = !(white | black);
    }

    pub(crate) fn put_piece(&mut self, piece: Piece, sq: Square) {
        self.pieces[piece.index()].set(sq.0);
    }

    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.index()].clear(sq.0);
        Some(piece)
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.pieces
            .iter()
            .position(|bb| bb.contains(sq.0))
            .map(Piece::from_index)
    }

    #[inline]
    pub fn pieces_of(&self, piece_type: PieceType, color: Color) -> Bitboard {
        self.pieces[Piece::new(piece_type, color).index()]
    }

    #[inline]
    pub fn color(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        !self.empty
    }

    #[inline]
    pub fn empty_squares(&self) -> Bitboard {
        self.empty
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// En-passant target left by a double push of `pusher`'s pawn.
    #[inline]
    pub fn en_passant(&self, pusher: Color) -> Bitboard {
        self.en_passant[pusher.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces_of(PieceType::King, color);
        kings.is_not_empty().then(|| Square(kings.lsb()))
    }

    /// Number of moves applied since the board was set up.
    #[inline]
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Dead positions: K v K, K+minor v K, K+minor v K+minor.
    pub fn is_insufficient_material(&self) -> bool {
        let heavy = |c: Color| {
            self.pieces_of(PieceType::Pawn, c)
                | self.pieces_of(PieceType::Rook, c)
                | self.pieces_of(PieceType::Queen, c)
        };
        if (heavy(Color::White) | heavy(Color::Black)).is_not_empty() {
            return false;
        }
        Color::BOTH.iter().all(|&c| {
            (self.pieces_of(PieceType::Knight, c) | self.pieces_of(PieceType::Bishop, c)).count() <= 1
        })
    }

    /// Mirror the position vertically and swap colours. History is dropped.
    pub fn color_flipped(&self) -> Board {
        let mut flipped = Board::empty();
        for index in 0..12 {
            let piece = Piece::from_index(index);
            let mirror = Piece::new(piece.piece_type, piece.color.opposite());
            flipped.pieces[mirror.index()] = self.pieces[index].flip_vertical();
        }
        flipped.side_to_move = self.side_to_move.opposite();
        flipped.castling = self.castling.flipped();
        flipped.en_passant = [
            self.en_passant[1].flip_vertical(),
            self.en_passant[0].flip_vertical(),
        ];
        flipped.update_aggregates();
        flipped
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for rank in (0..8u8).rev() {
            write!(f, "  {} ", rank + 1)?;
            for file in 0..8u8 {
                match self.piece_at(Square::from_file_rank(file, rank)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "  FEN: {}", self.to_fen())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_matches_fen() {
        let parsed = Board::from_fen(START_FEN).unwrap();
        assert_eq!(parsed, Board::startpos());
    }

    #[test]
    fn test_fen_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
        assert_eq!(Board::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn test_fen_errors() {
        let cases = [
            "",
            "8/8/8/8/8/8/8 w - -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq -",
            "rnbqkbnr/ppppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KZkq -",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w",
            "8/8/8/8/8/8/8/K7 w - -",
            "kk6/8/8/8/8/8/8/K7 w - -",
            // en-passant targets nobody could have left
            "4k3/8/8/3pp3/8/8/8/4K3 b - e4",
            "4k3/8/8/3pP3/8/8/8/4K3 w - e5",
            "4k3/8/4p3/3pP3/8/8/8/4K3 w - e6",
            "4k3/8/8/3pP3/8/8/8/4K3 w - d3",
            "4k3/3p4/8/3pP3/8/8/8/4K3 w - d6",
            "4k3/8/8/3PP3/8/8/8/4K3 w - d6",
        ];
        for fen in cases {
            assert!(
                matches!(Board::from_fen(fen), Err(EngineError::InvalidPosition(_))),
                "accepted {:?}",
                fen
            );
        }
    }

    #[test]
    fn test_fen_accepts_real_en_passant_target() {
        let board = Board::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(board.en_passant(Color::Black), Square(43).bitboard());
        let board = Board::from_fen("4k3/8/8/8/3Pp3/8/8/4K3 b - d3 0 1").unwrap();
        assert_eq!(board.en_passant(Color::White), Square(19).bitboard());
    }

    #[test]
    fn test_aggregates_partition_board() {
        let board = Board::startpos();
        let white = board.color(Color::White);
        let black = board.color(Color::Black);
        assert!((white & black).is_empty());
        assert_eq!(white | black | board.empty_squares(), Bitboard::ALL);
        assert_eq!(board.occupied().count(), 32);
    }

    #[test]
    fn test_insufficient_material_cases() {
        let drawn = ["8/8/8/4k3/8/8/8/4K3 w - -", "8/8/8/4k3/8/8/8/4KB2 w - -", "8/8/8/4kn2/8/8/8/4KB2 w - -"];
        for fen in drawn {
            assert!(Board::from_fen(fen).unwrap().is_insufficient_material(), "{}", fen);
        }
        let live = ["8/8/8/4k3/8/8/4P3/4KB2 w - -", "8/8/8/4k3/8/8/8/3NKN2 w - -", "8/8/8/4k3/8/8/8/4KR2 w - -"];
        for fen in live {
            assert!(!Board::from_fen(fen).unwrap().is_insufficient_material(), "{}", fen);
        }
    }

    #[test]
    fn test_color_flip_twice_is_identity() {
        let board = Board::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K1R1 b Qkq -").unwrap();
        assert_eq!(board.color_flipped().color_flipped(), board);
    }
}

//! Engine Module Tests
//!
//! Move generation checked against shakmaty, evaluation properties,
//! game status and the transposition table contract.

use std::collections::BTreeSet;

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Position};

use kittybox::core::{Board, Color, Move, MoveKind, Square};
use kittybox::engine::{evaluate, GameStatus, MoveGen, TTFlag, TranspositionTable};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
    "4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1",
];

fn oracle(fen: &str) -> Chess {
    let f: Fen = fen.parse().unwrap();
    f.into_position(CastlingMode::Standard).unwrap()
}

/// From-to pairs; shakmaty lists every promotion piece, we only queen.
fn oracle_moves(pos: &Chess) -> BTreeSet<String> {
    pos.legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string()[..4].to_string())
        .collect()
}

fn our_moves(board: &Board) -> BTreeSet<String> {
    MoveGen::legal_moves(board).iter().map(|m| m.to_coords()).collect()
}

fn to_uci(mv: Move) -> String {
    if mv.is_promotion() {
        format!("{}q", mv)
    } else {
        mv.to_string()
    }
}

// ============================================================================
// Move generation
// ============================================================================

#[test]
fn test_legal_moves_match_oracle() {
    for fen in POSITIONS {
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(our_moves(&board), oracle_moves(&oracle(fen)), "mismatch in {}", fen);
    }
}

#[test]
fn test_legal_moves_match_oracle_one_ply_on() {
    for fen in POSITIONS {
        let mut board = Board::from_fen(fen).unwrap();
        let pos = oracle(fen);
        for &mv in MoveGen::legal_moves(&board).iter() {
            let uci: UciMove = to_uci(mv).parse().unwrap();
            let next = pos.clone().play(&uci.to_move(&pos).unwrap()).unwrap();
            board.apply(mv);
            assert_eq!(
                our_moves(&board),
                oracle_moves(&next),
                "mismatch after {} in {}",
                mv,
                fen
            );
            board.undo();
        }
    }
}

#[test]
fn test_startpos_has_twenty_moves() {
    assert_eq!(MoveGen::legal_moves(&Board::startpos()).len(), 20);
}

#[test]
fn test_moves_carry_their_kind() {
    let board = Board::from_fen(POSITIONS[1]).unwrap();
    let moves = MoveGen::legal_moves(&board);
    let kind_of = |coords: &str| {
        moves
            .iter()
            .find(|m| m.to_coords() == coords)
            .map(|m| m.kind())
    };
    assert_eq!(kind_of("e1g1"), Some(MoveKind::CastleKingside));
    assert_eq!(kind_of("e1c1"), Some(MoveKind::CastleQueenside));
    assert_eq!(kind_of("e5f7"), Some(MoveKind::Capture));
    assert_eq!(kind_of("a2a4"), Some(MoveKind::Quiet));

    let promo = Board::from_fen(POSITIONS[4]).unwrap();
    let moves = MoveGen::legal_moves(&promo);
    assert!(moves.iter().any(|m| m.to_coords() == "d7c8" && m.kind() == MoveKind::PromotionCapture));
    assert_eq!(moves.iter().filter(|m| m.to_coords() == "d7c8").count(), 1);
}

#[test]
fn test_generation_scans_high_squares_first() {
    let board = Board::startpos();
    let moves = MoveGen::generate_moves(&board);
    let origins: Vec<u8> = moves.iter().map(|m| m.from().0).collect();
    let mut sorted = origins.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(origins, sorted);
}

#[test]
fn test_captures_only_list() {
    let board = Board::from_fen(POSITIONS[6]).unwrap();
    let mut captures = kittybox::core::MoveList::new();
    MoveGen::generate_captures(&board, &mut captures);
    assert!(captures.iter().all(|m| m.is_capture()));
    assert!(captures.iter().any(|m| m.kind() == MoveKind::EnPassant));
}

#[test]
fn test_attacks_only_excludes_pawn_pushes_and_castling() {
    let board = Board::from_fen(POSITIONS[7]).unwrap();
    let king_attacks = MoveGen::attacks_from(&board, Square::E1);
    assert!(!king_attacks.contains(Square::G1.0));
    assert!(MoveGen::destinations(&board, Square::E1).contains(Square::G1.0));

    let start = Board::startpos();
    let e2 = Square::from_algebraic("e2").unwrap();
    let pawn_attacks = MoveGen::attacks_from(&start, e2);
    assert_eq!(pawn_attacks.count(), 2);
    assert!(!pawn_attacks.contains(Square::from_algebraic("e3").unwrap().0));
}

// ============================================================================
// Status
// ============================================================================

#[test]
fn test_back_rank_mate_detected() {
    let board = Board::from_fen("4R1k1/5ppp/8/8/8/8/8/7K b - - 0 1").unwrap();
    assert!(MoveGen::is_checkmate(&board));
    assert_eq!(MoveGen::checkmated_side(&board), Some(Color::Black));
    assert_eq!(MoveGen::status(&board), GameStatus::Checkmate { winner: Color::White });

    // same mate seen with White to move
    let white_to_move = Board::from_fen("4R1k1/5ppp/8/8/8/8/8/7K w - - 0 1").unwrap();
    assert!(MoveGen::is_checkmate(&white_to_move));
    assert_eq!(MoveGen::checkmated_side(&white_to_move), Some(Color::Black));
}

#[test]
fn test_check_with_escape_is_not_mate() {
    let board = Board::from_fen("4R1k1/5pp1/8/8/8/8/8/7K b - - 0 1").unwrap();
    assert!(MoveGen::in_check(&board, Color::Black));
    assert!(!MoveGen::is_checkmate(&board));
    assert_eq!(MoveGen::status(&board), GameStatus::Ongoing);
}

#[test]
fn test_insufficient_material_status() {
    let kb = Board::from_fen("8/8/8/4k3/8/8/8/4KB2 w - - 0 1").unwrap();
    assert_eq!(MoveGen::status(&kb), GameStatus::InsufficientMaterial);
    let kbp = Board::from_fen("8/8/8/4k3/8/8/4P3/4KB2 w - - 0 1").unwrap();
    assert_eq!(MoveGen::status(&kbp), GameStatus::Ongoing);
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_evaluation_flips_with_colors() {
    for fen in POSITIONS {
        let board = Board::from_fen(fen).unwrap();
        assert_eq!(evaluate(&board), -evaluate(&board.color_flipped()), "{}", fen);
    }
}

#[test]
fn test_evaluation_is_pure() {
    let board = Board::from_fen(POSITIONS[5]).unwrap();
    let before = board.clone();
    let first = evaluate(&board);
    assert_eq!(evaluate(&board), first);
    assert_eq!(board, before);
}

// ============================================================================
// Transposition table
// ============================================================================

#[test]
fn test_tt_collision_overwrites() {
    let mut tt = TranspositionTable::new(1_048_583);
    let a = Move::new(Square(12), Square(28), MoveKind::Quiet);
    let b = Move::new(Square(11), Square(27), MoveKind::Quiet);
    tt.store(42, 17, 6, a, TTFlag::Exact);
    tt.store(42 + 1_048_583, -3, 2, b, TTFlag::LowerBound);
    assert!(tt.probe(42).is_none());
    assert_eq!(tt.probe(42 + 1_048_583).map(|e| e.best_move), Some(b));
}

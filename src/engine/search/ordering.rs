//! Move ordering: per-ply frames with lazy selection, killer and best-move
//! memory, and the scoring that ranks candidates.

use crate::core::bitboard::Bitboard;
use crate::core::board::{Board, PieceType};
use crate::core::moves::{MAX_MOVES, Move, MoveKind, MoveList};
use crate::engine::eval::piece_value;
use crate::engine::movegen::MoveGen;

use super::types::MAX_PLY;

const TT_MOVE_BONUS: i32 = 10_000;
const PV_BONUS: i32 = 3_000;
const LAYER_BEST_BONUS: i32 = 2_000;
const KILLER_BONUS: i32 = 1_000;
const CHECK_BONUS: i32 = 500;
const CAPTURE_BONUS: i32 = 150;
const CENTER_BONUS: i32 = 12;
const EXTENDED_CENTER_BONUS: i32 = 8;
const RIM_PENALTY: i32 = -8;
const DEVELOPMENT_BONUS: i32 = 10;

/// Candidate moves and their ordering scores at one ply.
pub(super) struct Frame {
    pub(super) moves: MoveList,
    scores: [i32; MAX_MOVES],
}

impl Frame {
    pub(super) fn new() -> Self {
        Frame {
            moves: MoveList::new(),
            scores: [0; MAX_MOVES],
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.moves.len()
    }

    pub(super) fn set_score(&mut self, index: usize, score: i32) {
        self.scores[index] = score;
    }

    /// Partial selection sort: bring the best of `index..` to `index` and return it.
    pub(super) fn pick(&mut self, index: usize) -> Move {
        let len = self.moves.len();
        let mut best = index;
        for i in index + 1..len {
            if self.scores[i] > self.scores[best] {
                best = i;
            }
        }
        if best != index {
            self.moves.swap(index, best);
            self.scores.swap(index, best);
        }
        self.moves[index]
    }
}

/// Ordering memory kept across iterations of one search.
pub(super) struct Heuristics {
    pub(super) pv: Vec<Move>,
    pub(super) layer_best: Vec<Move>,
    pub(super) killers: Vec<Move>,
}

impl Heuristics {
    pub(super) fn new() -> Self {
        Heuristics {
            pv: vec![Move::NULL; MAX_PLY],
            layer_best: vec![Move::NULL; MAX_PLY],
            killers: vec![Move::NULL; MAX_PLY],
        }
    }

    pub(super) fn clear(&mut self) {
        self.pv.fill(Move::NULL);
        self.layer_best.fill(Move::NULL);
        self.killers.fill(Move::NULL);
    }

    pub(super) fn set_pv(&mut self, line: &[Move]) {
        self.pv.fill(Move::NULL);
        for (slot, &mv) in self.pv.iter_mut().zip(line) {
            *slot = mv;
        }
    }
}

fn victim_value(board: &Board, mv: Move) -> i32 {
    match mv.kind() {
        MoveKind::EnPassant => piece_value(PieceType::Pawn),
        _ => board.piece_at(mv.to()).map_or(0, |p| piece_value(p.piece_type)),
    }
}

fn attacker_value(board: &Board, mv: Move) -> i32 {
    board.piece_at(mv.from()).map_or(0, |p| piece_value(p.piece_type))
}

/// Most valuable victim, least valuable attacker.
pub(super) fn mvv_lva(board: &Board, mv: Move) -> i32 {
    victim_value(board, mv) * 10 - attacker_value(board, mv)
}

/// Heuristic rank of `mv` at `ply`. Needs the board mutably to test for check.
pub(super) fn score_move(
    board: &mut Board,
    heuristics: &Heuristics,
    mv: Move,
    ply: usize,
    tt_move: Move,
) -> i32 {
    let mut score = 0;
    if !tt_move.is_null() && mv == tt_move {
        score += TT_MOVE_BONUS;
    }
    if mv == heuristics.pv[ply] {
        score += PV_BONUS;
    }
    if mv == heuristics.layer_best[ply] {
        score += LAYER_BEST_BONUS;
    }
    if mv == heuristics.killers[ply] {
        score += KILLER_BONUS;
    }

    if mv.is_capture() {
        score += CAPTURE_BONUS + victim_value(board, mv) - attacker_value(board, mv);
    }

    let mover = board.piece_at(mv.from()).map(|p| p.piece_type);
    if matches!(mover, Some(PieceType::Pawn | PieceType::Knight)) {
        let to = mv.to().0;
        if Bitboard::CENTER.contains(to) {
            score += CENTER_BONUS;
        } else if Bitboard::EXTENDED_CENTER.contains(to) {
            score += EXTENDED_CENTER_BONUS;
        } else if Bitboard::RIM.contains(to) {
            score += RIM_PENALTY;
        }
    }
    if matches!(mover, Some(PieceType::Knight | PieceType::Bishop)) {
        score += DEVELOPMENT_BONUS;
    }

    board.apply(mv);
    if MoveGen::in_check(board, board.side_to_move()) {
        score += CHECK_BONUS;
    }
    board.undo();

    score
}

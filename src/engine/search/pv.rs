//! Principal variation reconstruction and iteration reporting.

use tracing::debug;

use crate::core::moves::Move;
use crate::engine::movegen::MoveGen;

use super::searcher::Searcher;
use super::types::{IterationReport, MATE_SCORE, is_mate_score};

/// `cp 35`, or `mate 3` / `mate -2` counted in moves.
pub fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        let plies = MATE_SCORE - score.abs();
        let moves = (plies + 1) / 2;
        if score > 0 {
            format!("mate {}", moves)
        } else {
            format!("mate -{}", moves)
        }
    } else {
        format!("cp {}", score)
    }
}

impl Searcher {
    /// Follow best moves through the table from the current board. Each move
    /// is checked against the legal moves before it is played, so a key
    /// collision ends the line instead of corrupting the board.
    pub(super) fn get_pv_from_tt(&mut self, max_plies: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_plies);
        let root_move = self.heuristics.layer_best[0];
        if !root_move.is_null() {
            pv.push(root_move);
        }
        if pv.is_empty() || !MoveGen::legal_moves(&self.board).contains(root_move) {
            return Vec::new();
        }
        self.board.apply(root_move);

        while pv.len() < max_plies {
            let Some(entry) = self.tt.probe(self.keys.hash(&self.board)) else {
                break;
            };
            let mv = entry.best_move;
            if mv.is_null() || !MoveGen::legal_moves(&self.board).contains(mv) {
                break;
            }
            pv.push(mv);
            self.board.apply(mv);
        }

        for _ in 0..pv.len() {
            self.board.undo();
        }
        pv
    }

    pub(super) fn report_iteration(&self, report: &IterationReport) {
        let line: Vec<String> = report.pv.iter().map(|mv| mv.to_coords()).collect();
        debug!(
            depth = report.depth,
            score = %format_score(report.score),
            best_move = %report.best_move,
            nodes = report.stats.nodes,
            qnodes = report.stats.qnodes,
            cutoffs = report.stats.cutoffs,
            reductions = report.stats.reductions,
            researches = report.stats.researches,
            tt_hits = report.stats.tt_hits,
            max_qdepth = report.stats.max_qdepth,
            hashfull = self.tt.hashfull(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            pv = %line.join(" "),
            "iteration complete"
        );
    }
}

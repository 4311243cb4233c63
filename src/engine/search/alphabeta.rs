//! Negamax with alpha-beta, late move reductions and quiescence.

use crate::core::moves::Move;
use crate::engine::eval::evaluate_relative;
use crate::engine::movegen::MoveGen;
use crate::engine::tt::TTFlag;

use super::ordering::{mvv_lva, score_move};
use super::searcher::Searcher;
use super::types::{INFINITY, KING_CAPTURE, MATE_SCORE, MAX_PLY, is_mate_score};

/// Mate scores are stored relative to the node, not the root.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if is_mate_score(score) {
        if score > 0 { score + ply as i32 } else { score - ply as i32 }
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize) -> i32 {
    if is_mate_score(score) {
        if score > 0 { score - ply as i32 } else { score + ply as i32 }
    } else {
        score
    }
}

impl Searcher {
    /// Generate pseudo-legal moves for `ply` and score them for ordering.
    fn fill_frame(&mut self, ply: usize, tt_move: Move) {
        MoveGen::generate_into(&self.board, &mut self.frames[ply].moves);
        for i in 0..self.frames[ply].len() {
            let mv = self.frames[ply].moves[i];
            let score = score_move(&mut self.board, &self.heuristics, mv, ply, tt_move);
            self.frames[ply].set_score(i, score);
        }
    }

    fn fill_quiet_frame(&mut self, ply: usize, evasions: bool) {
        if evasions {
            MoveGen::generate_into(&self.board, &mut self.frames[ply].moves);
        } else {
            MoveGen::generate_captures(&self.board, &mut self.frames[ply].moves);
        }
        for i in 0..self.frames[ply].len() {
            let score = mvv_lva(&self.board, self.frames[ply].moves[i]);
            self.frames[ply].set_score(i, score);
        }
    }

    /// Plies to cut from the `index`th of `count` moves with `depth` plies left.
    fn reduction(&self, index: usize, count: usize, depth: i32) -> i32 {
        if !self.config.late_move_reductions || depth < 3 || index <= 1 {
            return 0;
        }
        if index * 10 > count * 7 {
            2
        } else if index * 10 > count * 3 {
            1
        } else {
            0
        }
    }

    pub(super) fn negamax(&mut self, depth: i32, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.stats.nodes += 1;
        self.tick();
        if self.aborted {
            return 0;
        }

        let us = self.board.side_to_move();
        if self.board.king_square(us).is_none() {
            return -KING_CAPTURE;
        }
        if ply > 0 && self.board.is_insufficient_material() {
            return self.draw_score();
        }
        if depth <= 0 {
            return self.leaf(alpha, beta, ply);
        }
        if ply >= MAX_PLY - 1 {
            return evaluate_relative(&self.board);
        }

        let key = self.keys.hash(&self.board);
        let mut tt_move = Move::NULL;
        if self.config.transposition_table {
            if let Some(entry) = self.tt.probe(key).copied() {
                self.stats.tt_hits += 1;
                tt_move = entry.best_move;
                if ply > 0 && depth > 1 && entry.depth >= depth {
                    let score = score_from_tt(entry.score, ply);
                    match entry.flag {
                        TTFlag::Exact => return score,
                        TTFlag::LowerBound if score >= beta => return score,
                        TTFlag::UpperBound if score <= alpha => return score,
                        _ => {}
                    }
                }
            }
        }

        self.fill_frame(ply, tt_move);
        let count = self.frames[ply].len();
        let in_check = MoveGen::in_check(&self.board, us);
        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = Move::NULL;
        let mut legal = 0;

        for i in 0..count {
            let mv = self.frames[ply].pick(i);
            self.board.apply(mv);
            if !MoveGen::was_legal(&self.board, mv) {
                self.board.undo();
                continue;
            }
            legal += 1;

            let reduction = self.reduction(i, count, depth);
            let mut score = -self.negamax(depth - 1 - reduction, -beta, -alpha, ply + 1);
            if reduction > 0 {
                self.stats.reductions += 1;
                if score > alpha && self.config.lmr_research && !self.aborted {
                    self.stats.researches += 1;
                    score = -self.negamax(depth - 1, -beta, -alpha, ply + 1);
                }
            }
            self.board.undo();

            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = mv;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                self.heuristics.killers[ply] = mv;
                break;
            }
        }

        if legal == 0 {
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                self.draw_score()
            };
        }

        self.heuristics.layer_best[ply] = best_move;

        if self.config.transposition_table {
            let flag = if best_score >= beta {
                TTFlag::LowerBound
            } else if best_score <= alpha_orig {
                TTFlag::UpperBound
            } else {
                TTFlag::Exact
            };
            self.tt.store(key, score_to_tt(best_score, ply), depth, best_move, flag);
        }

        best_score
    }

    /// Static score at the horizon, extended by quiescence when the side to
    /// move is in check or can capture something.
    fn leaf(&mut self, alpha: i32, beta: i32, ply: usize) -> i32 {
        let static_eval = evaluate_relative(&self.board);
        if !self.config.quiescence {
            return static_eval;
        }
        let us = self.board.side_to_move();
        let in_check = MoveGen::in_check(&self.board, us);
        let threatens = (MoveGen::attacked_squares(&self.board, us) & self.board.color(us.opposite()))
            .is_not_empty();
        if !in_check && !threatens {
            return static_eval;
        }
        let q = self.quiescence(alpha, beta, ply, 0);
        if (q - static_eval).abs() > self.config.stability_window {
            q
        } else {
            static_eval
        }
    }

    pub(super) fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: usize, qdepth: i32) -> i32 {
        self.stats.qnodes += 1;
        self.stats.max_qdepth = self.stats.max_qdepth.max(qdepth);
        self.tick();
        if self.aborted {
            return 0;
        }

        let us = self.board.side_to_move();
        if self.board.king_square(us).is_none() {
            return -KING_CAPTURE;
        }

        let stand_pat = evaluate_relative(&self.board);
        let evasions = qdepth == 0 && MoveGen::in_check(&self.board, us);
        let mut best_score = if evasions { -INFINITY } else { stand_pat };
        if !evasions {
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
        }

        let limit = self.config.q_expansion_factor * self.iteration_depth;
        if qdepth >= limit || ply >= MAX_PLY - 1 {
            return stand_pat;
        }

        self.fill_quiet_frame(ply, evasions);
        let mut legal = 0;
        for i in 0..self.frames[ply].len() {
            let mv = self.frames[ply].pick(i);
            self.board.apply(mv);
            if !MoveGen::was_legal(&self.board, mv) {
                self.board.undo();
                continue;
            }
            legal += 1;
            let score = -self.quiescence(-beta, -alpha, ply + 1, qdepth + 1);
            self.board.undo();

            if self.aborted {
                return 0;
            }
            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }

        if evasions && legal == 0 {
            return -MATE_SCORE + ply as i32;
        }
        best_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::Board;
    use crate::core::zobrist::ZobristKeys;
    use crate::engine::search::{SearchConfig, SearchLimits, SearchStats};

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const ITALIAN: &str = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 0 5";

    fn small_config() -> SearchConfig {
        SearchConfig {
            hash_entries: 1021,
            ..Default::default()
        }
    }

    /// Session parked on `fen` as if the first iteration had just begun.
    fn searcher_at(fen: &str, config: SearchConfig) -> Searcher {
        let mut searcher = Searcher::with_keys(config, ZobristKeys::seeded(7));
        searcher.board = Board::from_fen(fen).unwrap();
        searcher.root_side = searcher.board.side_to_move();
        searcher.iteration_depth = 1;
        searcher
    }

    #[test]
    fn test_reduction_schedule() {
        let searcher = searcher_at(ITALIAN, small_config());
        // first two moves and shallow nodes are never reduced
        assert_eq!(searcher.reduction(0, 20, 6), 0);
        assert_eq!(searcher.reduction(1, 20, 6), 0);
        assert_eq!(searcher.reduction(19, 20, 2), 0);
        // up to 30% of the list: full depth
        assert_eq!(searcher.reduction(6, 20, 3), 0);
        // past 30%: one ply
        assert_eq!(searcher.reduction(7, 20, 3), 1);
        assert_eq!(searcher.reduction(14, 20, 3), 1);
        // past 70%: two plies
        assert_eq!(searcher.reduction(15, 20, 3), 2);
        assert_eq!(searcher.reduction(19, 20, 8), 2);

        let off = searcher_at(
            ITALIAN,
            SearchConfig {
                late_move_reductions: false,
                ..small_config()
            },
        );
        assert_eq!(off.reduction(19, 20, 8), 0);
    }

    #[test]
    fn test_reductions_happen_and_can_be_disabled() {
        let mut searcher = searcher_at(ITALIAN, small_config());
        let outcome = searcher.search(&Board::from_fen(ITALIAN).unwrap(), SearchLimits::depth(4));
        let last = outcome.iterations.last().unwrap();
        assert!(last.stats.reductions > 0);
        assert!(last.stats.researches <= last.stats.reductions);

        let mut plain = searcher_at(
            ITALIAN,
            SearchConfig {
                late_move_reductions: false,
                ..small_config()
            },
        );
        let outcome = plain.search(&Board::from_fen(ITALIAN).unwrap(), SearchLimits::depth(4));
        assert!(outcome.iterations.iter().all(|it| it.stats.reductions == 0));
    }

    #[test]
    fn test_quiescence_depth_is_capped() {
        let mut searcher = searcher_at(
            KIWIPETE,
            SearchConfig {
                q_expansion_factor: 1,
                ..small_config()
            },
        );
        searcher.quiescence(-INFINITY, INFINITY, 0, 0);
        assert_eq!(searcher.stats.max_qdepth, 1);

        let mut searcher = searcher_at(KIWIPETE, small_config());
        let outcome = searcher.search(&Board::from_fen(KIWIPETE).unwrap(), SearchLimits::depth(3));
        for it in &outcome.iterations {
            assert!(
                it.stats.max_qdepth <= searcher.config.q_expansion_factor * it.depth,
                "depth {} reached qdepth {}",
                it.depth,
                it.stats.max_qdepth
            );
        }
    }

    #[test]
    fn test_leaf_keeps_static_score_inside_window() {
        // white rook and black queen attack each other on the a-file
        let fen = "q3k3/8/8/8/8/8/8/R3K3 w - -";
        let mut searcher = searcher_at(fen, small_config());
        let static_eval = evaluate_relative(&searcher.board);
        assert!(searcher.leaf(-INFINITY, INFINITY, 0) > static_eval + 500);

        let mut wide = searcher_at(
            fen,
            SearchConfig {
                stability_window: 10_000,
                ..small_config()
            },
        );
        assert_eq!(wide.leaf(-INFINITY, INFINITY, 0), static_eval);
        assert!(wide.stats.qnodes > 0);

        // nothing attacked and no check: no quiescence at all
        let mut quiet = searcher_at(crate::core::board::START_FEN, small_config());
        let static_eval = evaluate_relative(&quiet.board);
        assert_eq!(quiet.leaf(-INFINITY, INFINITY, 0), static_eval);
        assert_eq!(quiet.stats.qnodes, 0);
    }

    #[test]
    fn test_quiescence_searches_every_evasion_first() {
        let mut mated = searcher_at("4R1k1/5ppp/8/8/8/8/8/7K b - -", small_config());
        assert_eq!(mated.quiescence(-INFINITY, INFINITY, 0, 0), -MATE_SCORE);

        // deeper plies only look at captures and stand pat
        let mut deeper = searcher_at("4R1k1/5ppp/8/8/8/8/8/7K b - -", small_config());
        let stand_pat = evaluate_relative(&deeper.board);
        assert_eq!(deeper.quiescence(-INFINITY, INFINITY, 0, 1), stand_pat);

        // the only escape is a quiet king step
        let mut escape = searcher_at("4R1k1/5pp1/8/8/8/8/8/7K b - -", small_config());
        let score = escape.quiescence(-INFINITY, INFINITY, 0, 0);
        assert!(!is_mate_score(score));
        assert!(escape.stats.qnodes >= 2);
    }

    #[test]
    fn test_cutoff_records_killer() {
        let fen = "4k3/8/8/3q4/8/8/8/3RK3 w - -";
        let mut searcher = searcher_at(fen, SearchConfig::plain());
        let take = searcher.board.parse_move("d1d5").unwrap();
        searcher.negamax(1, -INFINITY, INFINITY, 0);
        assert!(searcher.heuristics.killers[0].is_null());
        assert_eq!(searcher.heuristics.layer_best[0], take);

        let mut searcher = searcher_at(fen, SearchConfig::plain());
        searcher.negamax(1, 0, 1, 0);
        assert_eq!(searcher.stats.cutoffs, 1);
        assert_eq!(searcher.heuristics.killers[0], take);
    }

    #[test]
    fn test_table_cutoff_only_below_root_and_above_depth_one() {
        let config = SearchConfig {
            quiescence: false,
            ..small_config()
        };
        let mut searcher = searcher_at(crate::core::board::START_FEN, config);
        let key = searcher.keys.hash(&searcher.board);
        let planted = 12_345;

        searcher.tt.store(key, planted, 10, Move::NULL, TTFlag::Exact);
        assert_eq!(searcher.negamax(2, -INFINITY, INFINITY, 1), planted);
        assert_eq!(searcher.stats.nodes, 1);

        searcher.stats = SearchStats::default();
        searcher.tt.store(key, planted, 10, Move::NULL, TTFlag::Exact);
        assert_ne!(searcher.negamax(1, -INFINITY, INFINITY, 1), planted);
        assert!(searcher.stats.nodes > 1);

        searcher.stats = SearchStats::default();
        searcher.tt.store(key, planted, 10, Move::NULL, TTFlag::Exact);
        assert_ne!(searcher.negamax(2, -INFINITY, INFINITY, 0), planted);
        assert!(searcher.stats.nodes > 1);

        // a lower bound only cuts when it reaches beta
        searcher.stats = SearchStats::default();
        searcher.tt.store(key, planted, 10, Move::NULL, TTFlag::LowerBound);
        assert_ne!(searcher.negamax(2, -INFINITY, 20_000, 1), planted);
        searcher.tt.store(key, planted, 10, Move::NULL, TTFlag::LowerBound);
        assert_eq!(searcher.negamax(2, -INFINITY, 100, 1), planted);
    }

    #[test]
    fn test_mate_scores_round_trip_through_table() {
        let at_node = MATE_SCORE - 7;
        let stored = score_to_tt(at_node, 3);
        assert_eq!(stored, MATE_SCORE - 4);
        assert_eq!(score_from_tt(stored, 5), MATE_SCORE - 9);
        assert_eq!(score_from_tt(score_to_tt(-at_node, 3), 3), -at_node);
        assert_eq!(score_to_tt(250, 9), 250);
    }
}

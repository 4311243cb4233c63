use std::time::Duration;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use kittybox::core::Board;
use kittybox::engine::perft;
use kittybox::engine::search::{SearchConfig, SearchLimits, Searcher};

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    expected_nodes: u64,
}

const PERFT_CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        depth: 3,
        expected_nodes: 8902,
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 2,
        expected_nodes: 2039,
    },
    BenchCase {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 3,
        expected_nodes: 2812,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.measurement_time(Duration::from_secs(5));
    for case in PERFT_CASES {
        let board = Board::from_fen(case.fen).expect("bench position parses");
        group.bench_with_input(BenchmarkId::new(case.name, case.depth), case, |b, case| {
            b.iter(|| {
                let mut board = board.clone();
                let nodes = perft(&mut board, black_box(case.depth));
                assert_eq!(nodes, case.expected_nodes);
                nodes
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);
    let board = Board::startpos();
    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut searcher = Searcher::with_config(SearchConfig {
                    hash_entries: 65_537,
                    ..Default::default()
                });
                searcher.search(black_box(&board), SearchLimits::depth(depth))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);

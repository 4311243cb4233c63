//! KittyBox: searches the starting position and prints the chosen move.

use kittybox::core::Board;
use kittybox::engine::search::{SearchLimits, Searcher};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let board = Board::startpos();
    let mut searcher = Searcher::new();
    let outcome = searcher.search(&board, SearchLimits::default());
    let best = outcome
        .best_move
        .ok_or_else(|| anyhow::anyhow!("no legal move in the starting position"))?;
    println!("{}", best);
    Ok(())
}

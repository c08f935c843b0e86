//! Example: Rank the nearest neighbours of one movie
//!
//! Run with: cargo run --package sources --example rank_neighbors -- "Avatar"
//!
//! This example shows how to:
//! 1. Load the artifacts
//! 2. Resolve a title to its row
//! 3. Rank the row without fetching posters

use data_loader::Catalog;
use sources::SimilaritySource;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "Avatar".to_string());

    println!("Loading artifacts...");
    let start = Instant::now();
    let catalog = Arc::new(Catalog::load_from_dir(Path::new("artifacts"))?);
    println!("Loaded {} movies in {:?}\n", catalog.len(), start.elapsed());

    let source = SimilaritySource::new(catalog.clone());

    let start = Instant::now();
    let candidates = source.candidates_for_title(&title)?;
    let elapsed = start.elapsed();

    println!("Movies similar to {:?} (ranked in {:?}):", title, elapsed);
    for (rank, candidate) in candidates.iter().enumerate() {
        let movie = catalog
            .get_movie(candidate.position)
            .expect("candidate positions come from the catalog");
        println!(
            "  {}. {} (id {}) - similarity {:.3}",
            rank + 1,
            movie.title,
            movie.id,
            candidate.score
        );
    }

    Ok(())
}

use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let artifacts_dir = Path::new("artifacts");

    println!("Loading artifacts...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(artifacts_dir)
        .expect("Failed to load artifacts");
    let elapsed = start.elapsed();

    let scores = catalog.similarity().as_slice().len();

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("Duplicate titles: {}", catalog.duplicate_title_count());
    println!("Scores: {}", scores);
    println!("\nPerformance: {:.0} scores/second",
             scores as f64 / elapsed.as_secs_f64());
}

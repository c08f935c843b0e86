use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{default_artifacts_dir, parser, Catalog, MovieId, SimilarityMatrix};
use poster_client::PosterResolver;
use recommender::{MovieRecommendation, RecommendationOrchestrator};
use sources::SimilaritySource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

mod config;
mod interactive;

use config::Config;

/// Movie Recs - similar-movie recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Recommends similar movies from a precomputed similarity matrix", long_about = None)]
struct Cli {
    /// Directory holding the movie_list and similarity artifacts
    /// [default: artifacts/ next to the executable]
    #[arg(short, long)]
    artifacts_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every selectable movie title
    List,

    /// Show the movies most similar to one movie
    Recommend {
        /// Exact movie title
        #[arg(long, required_unless_present = "id", conflicts_with = "id")]
        title: Option<String>,

        /// TMDB movie id, for titles shared by several movies
        #[arg(long)]
        id: Option<MovieId>,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// Pick movies and refresh recommendations in a prompt loop
    Interactive,

    /// Build the artifacts from JSON inputs
    Pack {
        /// JSON array of {"title", "movie_id"} records
        #[arg(long)]
        movies: PathBuf,

        /// JSON array of rows, same order as the movies
        #[arg(long)]
        similarity: PathBuf,

        /// Output directory for movie_list and similarity
        #[arg(long)]
        out: PathBuf,
    },

    /// Time the ranking step for random movies (no poster lookups)
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "1000")]
        requests: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Packing produces artifacts, so it runs before anything is loaded
    if let Commands::Pack {
        movies,
        similarity,
        out,
    } = &cli.command
    {
        return handle_pack(movies, similarity, out);
    }

    let artifacts_dir = cli
        .artifacts_dir
        .clone()
        .or_else(|| config.artifacts_dir.clone())
        .unwrap_or_else(default_artifacts_dir);
    debug!("Using artifacts directory {}", artifacts_dir.display());

    // Load the artifacts once; they stay read-only for the whole run
    let start = Instant::now();
    let catalog = Arc::new(
        Catalog::load_from_dir(&artifacts_dir)
            .with_context(|| format!("Failed to load artifacts from {}", artifacts_dir.display()))?,
    );
    eprintln!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::List => print_titles(&catalog),
        Commands::Recommend { title, id, limit } => {
            handle_recommend(catalog, &config, title, id, limit).await?
        }
        Commands::Interactive => {
            let orchestrator = build_orchestrator(catalog, &config);
            interactive::run(orchestrator).await?
        }
        Commands::Benchmark { requests } => handle_benchmark(catalog, requests)?,
        Commands::Pack { .. } => {} // handled above
    }

    Ok(())
}

fn build_orchestrator(catalog: Arc<Catalog>, config: &Config) -> RecommendationOrchestrator {
    let posters = Arc::new(PosterResolver::new(config.poster_config()));
    RecommendationOrchestrator::new(catalog, posters)
}

/// Print every title with its 1-based list number
pub(crate) fn print_titles(catalog: &Catalog) {
    for (i, title) in catalog.titles().enumerate() {
        println!("{:>5}. {}", i + 1, title);
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: Arc<Catalog>,
    config: &Config,
    title: Option<String>,
    id: Option<MovieId>,
    limit: usize,
) -> Result<()> {
    let orchestrator = build_orchestrator(catalog, config).with_limit(limit);

    let (query, recommendations) = match (title, id) {
        (_, Some(id)) => (format!("movie {}", id), orchestrator.recommend_by_id(id).await?),
        (Some(title), None) => {
            let recommendations = orchestrator.recommend(&title).await?;
            (title, recommendations)
        }
        (None, None) => bail!("either --title or --id is required"),
    };

    print_recommendations(&query, &recommendations);
    Ok(())
}

/// Handle the 'pack' command
fn handle_pack(movies_path: &Path, similarity_path: &Path, out_dir: &Path) -> Result<()> {
    let movies_json = std::fs::read(movies_path)
        .with_context(|| format!("Failed to read {}", movies_path.display()))?;
    let movies = parser::decode_movie_list(&movies_json)?;

    let similarity_json = std::fs::read(similarity_path)
        .with_context(|| format!("Failed to read {}", similarity_path.display()))?;
    let rows: Vec<Vec<f32>> = serde_json::from_slice(&similarity_json)
        .with_context(|| format!("Failed to parse {}", similarity_path.display()))?;
    let matrix = SimilarityMatrix::from_rows(rows)?;

    // Same checks as loading, so a packed directory always loads
    let catalog = Catalog::new(movies, matrix)?;
    info!("Validated {} movies, writing artifacts", catalog.len());

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    parser::write_movie_list(&out_dir.join(parser::MOVIE_LIST_FILE), catalog.movies())?;
    parser::write_similarity(&out_dir.join(parser::SIMILARITY_FILE), catalog.similarity())?;

    println!(
        "{} Packed {} movies into {}",
        "✓".green(),
        catalog.len(),
        out_dir.display()
    );
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(catalog: Arc<Catalog>, requests: usize) -> Result<()> {
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let source = SimilaritySource::new(catalog.clone());

    // Random query rows
    let positions: Vec<usize> = (0..requests)
        .map(|_| rand::random::<u64>() as usize % catalog.len())
        .collect();

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for position in positions {
        let start = Instant::now();
        source.get_candidates(position)?;
        timings.push(start.elapsed());
    }

    // Total time, average, P50/P95/P99 and throughput
    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[(timings.len() as f32 * 0.95) as usize];
    let p99 = timings[(timings.len() as f32 * 0.99) as usize];
    let throughput = requests as f32 / total_time.as_secs_f32();

    println!("Benchmark results:");
    println!("Total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(query: &str, recommendations: &[MovieRecommendation]) {
    println!("{}", format!("Movies similar to {}:", query).bold().blue());
    for (i, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. {} - similarity {:.3}",
            (i + 1).to_string().green(),
            rec.title,
            rec.score
        );
        println!("   poster: {}", rec.poster_url);
    }
}

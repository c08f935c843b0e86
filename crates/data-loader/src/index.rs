//! Catalog building and validation.
//!
//! This module turns decoded artifacts into a `Catalog`:
//! - Parse both files in parallel
//! - Validate the matrix against the movie table
//! - Build the title and id lookup indices

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Directory holding the artifacts next to the running executable
///
/// Falls back to `./artifacts` when the executable path is unknown.
pub fn default_artifacts_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("artifacts")))
        .unwrap_or_else(|| PathBuf::from("artifacts"))
}

impl Catalog {
    /// Load both artifacts from a directory
    ///
    /// Steps:
    /// 1. Parse `movie_list` and `similarity` in parallel
    /// 2. Validate dimensions and scores
    /// 3. Build lookup indices
    pub fn load_from_dir(artifacts_dir: &Path) -> Result<Self> {
        info!("Loading artifacts from {:?}", artifacts_dir);

        let movies_path = artifacts_dir.join(parser::MOVIE_LIST_FILE);
        let similarity_path = artifacts_dir.join(parser::SIMILARITY_FILE);

        let (movies, similarity) = rayon::join(
            || parser::parse_movie_list(&movies_path),
            || parser::parse_similarity(&similarity_path),
        );
        let movies = movies?;
        let similarity = similarity?;

        info!(
            "Loaded {} movies and a {}x{} similarity matrix",
            movies.len(),
            similarity.size(),
            similarity.size()
        );

        Self::new(movies, similarity)
    }

    /// Build a catalog from in-memory data, validating it first
    pub fn new(movies: Vec<MovieRecord>, similarity: SimilarityMatrix) -> Result<Self> {
        validate(&movies, &similarity)?;

        let mut title_index = HashMap::with_capacity(movies.len());
        let mut id_index = HashMap::with_capacity(movies.len());
        let mut duplicate_titles = 0;

        for (position, movie) in movies.iter().enumerate() {
            if title_index.contains_key(&movie.title) {
                duplicate_titles += 1;
            } else {
                title_index.insert(movie.title.clone(), position);
            }
            id_index.entry(movie.id).or_insert(position);
        }

        if duplicate_titles > 0 {
            warn!(
                "{} rows repeat an earlier title; title lookups resolve to the first row",
                duplicate_titles
            );
        }

        Ok(Self {
            movies,
            similarity,
            title_index,
            id_index,
            duplicate_titles,
        })
    }
}

/// Check that the movie table and matrix describe the same movies
///
/// - table is not empty
/// - matrix is N×N with N == number of movies
/// - every score is finite
fn validate(movies: &[MovieRecord], similarity: &SimilarityMatrix) -> Result<()> {
    if movies.is_empty() {
        return Err(DataLoadError::ValidationError(
            "movie table is empty".to_string(),
        ));
    }
    if similarity.size() != movies.len() {
        return Err(DataLoadError::DimensionMismatch {
            movies: movies.len(),
            rows: similarity.size(),
        });
    }

    let size = similarity.size();
    let bad = similarity
        .as_slice()
        .par_iter()
        .enumerate()
        .find_first(|(_, score)| !score.is_finite());
    if let Some((offset, score)) = bad {
        return Err(DataLoadError::InvalidValue {
            field: format!("similarity[{}][{}]", offset / size, offset % size),
            value: score.to_string(),
        });
    }

    Ok(())
}

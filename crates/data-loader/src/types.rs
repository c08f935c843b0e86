//! Core domain types for the precomputed recommendation artifacts.
//!
//! This module defines the data structures the rest of the workspace reads:
//! - `MovieRecord`: one row of the movie table
//! - `SimilarityMatrix`: dense N×N scores, row-major
//! - `Catalog`: both of the above plus lookup indices
//!
//! Row position is the identity of a movie everywhere in this crate. The
//! movie table and the matrix share the same ordering.

use crate::error::{DataLoadError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// TMDB identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Movie Table
// =============================================================================

/// One row of the movie table.
///
/// The on-disk field for the identifier is `movie_id`; `id` is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    #[serde(rename = "movie_id", alias = "id")]
    pub id: MovieId,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, id: MovieId) -> Self {
        Self {
            title: title.into(),
            id,
        }
    }
}

// =============================================================================
// Similarity Matrix
// =============================================================================

/// Square matrix of pairwise similarity scores.
///
/// `row(i)[j]` is the similarity between the movie at row `i` and the movie
/// at row `j`. Stored as one flat `Vec<f32>` so a row is a contiguous slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Build a matrix from row-major scores
    ///
    /// Fails unless `scores.len() == size * size`.
    pub fn from_flat(size: usize, scores: Vec<f32>) -> Result<Self> {
        let expected = size.checked_mul(size).ok_or_else(|| {
            DataLoadError::ValidationError(format!("matrix size {} overflows", size))
        })?;
        if scores.len() != expected {
            return Err(DataLoadError::ValidationError(format!(
                "expected {} scores for a {}x{} matrix, found {}",
                expected,
                size,
                size,
                scores.len()
            )));
        }
        Ok(Self { size, scores })
    }

    /// Build a matrix from nested rows, checking that it is square
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let size = rows.len();
        // Every row is checked before anything is allocated for the flat copy
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(DataLoadError::NotSquare {
                row,
                expected: size,
                found: values.len(),
            });
        }
        Self::from_flat(size, rows.into_iter().flatten().collect())
    }

    /// Number of rows (equal to the number of columns)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Scores of one row, or `None` if `index` is out of range
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.size {
            return None;
        }
        let start = index * self.size;
        Some(&self.scores[start..start + self.size])
    }

    /// Single score lookup
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if col >= self.size {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    /// All scores, row-major
    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }
}

// =============================================================================
// Catalog - The Loaded Artifacts
// =============================================================================

/// Movie table and similarity matrix, validated against each other.
///
/// Built once at startup (see `index.rs`) and shared read-only behind an
/// `Arc` for the rest of the process.
#[derive(Debug)]
pub struct Catalog {
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) similarity: SimilarityMatrix,

    /// Title -> first row carrying that title
    pub(crate) title_index: HashMap<String, usize>,
    /// Movie id -> first row carrying that id
    pub(crate) id_index: HashMap<MovieId, usize>,
    /// Number of rows whose title already appeared earlier in the table
    pub(crate) duplicate_titles: usize,
}

impl Catalog {
    /// Number of movies (and matrix rows)
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Movie at a row position
    pub fn get_movie(&self, position: usize) -> Option<&MovieRecord> {
        self.movies.get(position)
    }

    /// All movies in row order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// Titles in row order, as shown in a selection list
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies.iter().map(|m| m.title.as_str())
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    /// Similarity scores of the movie at `position` against every row
    pub fn similarity_row(&self, position: usize) -> Option<&[f32]> {
        self.similarity.row(position)
    }

    /// Row of the first movie whose title matches exactly
    pub fn position_of_title(&self, title: &str) -> Option<usize> {
        self.title_index.get(title).copied()
    }

    /// Row of the first movie with this id
    pub fn position_of_id(&self, id: MovieId) -> Option<usize> {
        self.id_index.get(&id).copied()
    }

    /// How many rows repeat an earlier title
    pub fn duplicate_title_count(&self) -> usize {
        self.duplicate_titles
    }
}

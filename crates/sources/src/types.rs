//! Types shared by candidate sources.

use data_loader::MovieId;

/// A movie ranked against a query movie
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Row position in the catalog
    pub position: usize,
    pub movie_id: MovieId,
    /// Similarity to the query row
    pub score: f32,
}

impl Candidate {
    pub fn new(position: usize, movie_id: MovieId, score: f32) -> Self {
        Self {
            position,
            movie_id,
            score,
        }
    }
}

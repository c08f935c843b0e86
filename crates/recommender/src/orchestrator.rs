//! # Recommendation Orchestrator
//!
//! This module coordinates one recommendation request:
//! 1. Resolve the query movie to a catalog row
//! 2. Rank the other rows by similarity (top 5)
//! 3. Resolve a poster for each ranked movie, in rank order
//! 4. Return titles, scores and poster URLs
//!
//! Poster lookups run one after another. Each one degrades to a placeholder
//! on failure, so only the ranking step can fail.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument};

use data_loader::{Catalog, MovieId};
use poster_client::PosterLookup;
use sources::{Candidate, RecommendError, SimilaritySource};

/// One recommendation slot as shown to the user
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f32,
    pub poster_url: String,
}

/// Main orchestrator that turns a selected movie into recommendations
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalog: Arc<Catalog>,
    similarity: SimilaritySource,
    posters: Arc<dyn PosterLookup>,
}

impl RecommendationOrchestrator {
    /// Create a new orchestrator over a loaded catalog
    ///
    /// # Arguments
    /// * `catalog` - Shared reference to the loaded artifacts
    /// * `posters` - Poster lookup used for every recommended movie
    pub fn new(catalog: Arc<Catalog>, posters: Arc<dyn PosterLookup>) -> Self {
        let similarity = SimilaritySource::new(catalog.clone());
        Self {
            catalog,
            similarity,
            posters,
        }
    }

    /// Number of recommendations per request (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.similarity = self.similarity.with_limit(limit);
        self
    }

    pub fn limit(&self) -> usize {
        self.similarity.limit()
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Recommendations for the first movie titled exactly `title`
    #[instrument(skip(self))]
    pub async fn recommend(&self, title: &str) -> Result<Vec<MovieRecommendation>, RecommendError> {
        let position = self.similarity.resolve_title(title)?;
        self.recommend_for_position(position).await
    }

    /// Recommendations for the movie with this id
    #[instrument(skip(self))]
    pub async fn recommend_by_id(
        &self,
        movie_id: MovieId,
    ) -> Result<Vec<MovieRecommendation>, RecommendError> {
        let position = self.similarity.resolve_id(movie_id)?;
        self.recommend_for_position(position).await
    }

    /// Recommendations for the movie at a catalog row
    pub async fn recommend_for_position(
        &self,
        position: usize,
    ) -> Result<Vec<MovieRecommendation>, RecommendError> {
        // Start timing
        let start_time = Instant::now();

        let candidates = self.similarity.get_candidates(position)?;
        debug!(
            "Ranked {} candidates in {:.2?}",
            candidates.len(),
            start_time.elapsed()
        );

        let recommendations = self.resolve_posters(candidates).await;

        info!(
            "Built {} recommendations for row {} in {:.2?}",
            recommendations.len(),
            position,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Attach titles and posters to ranked candidates, keeping rank order
    async fn resolve_posters(&self, candidates: Vec<Candidate>) -> Vec<MovieRecommendation> {
        let mut recommendations = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let Some(movie) = self.catalog.get_movie(candidate.position) else {
                continue;
            };
            let poster_url = self.posters.resolve_poster(movie.id).await;
            recommendations.push(MovieRecommendation {
                movie_id: movie.id,
                title: movie.title.clone(),
                score: candidate.score,
                poster_url,
            });
        }

        recommendations
    }
}

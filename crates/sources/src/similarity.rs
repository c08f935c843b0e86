//! Similarity Source - nearest neighbours from the precomputed matrix
//!
//! ## Algorithm
//! 1. Resolve the query movie to its row position
//! 2. Pair every other position with its score in that row
//! 3. Stable sort by score, highest first (ties keep row order)
//! 4. Return the first `limit` entries
//!
//! The query row is excluded by position. Its own score is never assumed to
//! be the row maximum.

use crate::error::{RecommendError, Result};
use crate::types::Candidate;
use data_loader::{Catalog, MovieId};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Number of recommendations shown per query
pub const DEFAULT_LIMIT: usize = 5;

/// Ranks catalog rows by their precomputed similarity to a query row
#[derive(Clone)]
pub struct SimilaritySource {
    /// Shared reference to the loaded artifacts (read-only, so no Mutex needed)
    catalog: Arc<Catalog>,

    /// How many neighbours to return
    limit: usize,
}

impl SimilaritySource {
    /// Create a new similarity source returning `DEFAULT_LIMIT` neighbours
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            limit: DEFAULT_LIMIT,
        }
    }

    /// Configure the number of neighbours (default: 5)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Row of the first movie with exactly this title
    pub fn resolve_title(&self, title: &str) -> Result<usize> {
        self.catalog
            .position_of_title(title)
            .ok_or_else(|| RecommendError::TitleNotFound(title.to_string()))
    }

    /// Row of the first movie with this id
    pub fn resolve_id(&self, movie_id: MovieId) -> Result<usize> {
        self.catalog
            .position_of_id(movie_id)
            .ok_or(RecommendError::MovieIdNotFound(movie_id))
    }

    /// Neighbours of the movie with exactly this title
    pub fn candidates_for_title(&self, title: &str) -> Result<Vec<Candidate>> {
        let position = self.resolve_title(title)?;
        self.get_candidates(position)
    }

    /// Neighbours of the movie with this id
    pub fn candidates_for_id(&self, movie_id: MovieId) -> Result<Vec<Candidate>> {
        let position = self.resolve_id(movie_id)?;
        self.get_candidates(position)
    }

    /// Rank every other row against the row at `query`
    ///
    /// Fails with `InsufficientData` unless the catalog holds at least
    /// `limit + 1` movies, so a successful call always returns exactly
    /// `limit` candidates.
    #[instrument(skip(self))]
    pub fn get_candidates(&self, query: usize) -> Result<Vec<Candidate>> {
        let available = self.catalog.len();
        let required = self.limit + 1;
        if available < required {
            return Err(RecommendError::InsufficientData {
                available,
                required,
            });
        }

        let row = self
            .catalog
            .similarity_row(query)
            .ok_or(RecommendError::PositionOutOfRange {
                position: query,
                len: available,
            })?;

        let candidates: Vec<Candidate> = rank_row(row, query, self.limit)
            .into_iter()
            .filter_map(|(position, score)| {
                let movie = self.catalog.get_movie(position)?;
                Some(Candidate::new(position, movie.id, score))
            })
            .collect();

        debug!("Ranked {} neighbours for row {}", candidates.len(), query);
        Ok(candidates)
    }
}

/// Top `limit` `(position, score)` pairs of `row`, skipping `exclude`
///
/// Sorting is stable, so equal scores keep ascending position order.
pub fn rank_row(row: &[f32], exclude: usize, limit: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = row
        .iter()
        .copied()
        .enumerate()
        .filter(|&(position, _)| position != exclude)
        .collect();

    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{MovieRecord, SimilarityMatrix};
    use std::collections::HashSet;

    fn create_test_catalog(titles: &[&str], rows: Vec<Vec<f32>>) -> Arc<Catalog> {
        let movies = titles
            .iter()
            .enumerate()
            .map(|(i, title)| MovieRecord::new(*title, 100 + i as u32))
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        Arc::new(Catalog::new(movies, matrix).unwrap())
    }

    /// Six movies A..F; row A is the worked example
    fn six_movie_catalog() -> Arc<Catalog> {
        create_test_catalog(
            &["A", "B", "C", "D", "E", "F"],
            vec![
                vec![1.0, 0.9, 0.8, 0.7, 0.6, 0.5],
                vec![0.9, 1.0, 0.1, 0.2, 0.3, 0.4],
                vec![0.8, 0.1, 1.0, 0.6, 0.6, 0.6],
                vec![0.7, 0.2, 0.6, 1.0, 0.5, 0.3],
                vec![0.6, 0.3, 0.6, 0.5, 1.0, 0.2],
                vec![0.5, 0.4, 0.6, 0.3, 0.2, 1.0],
            ],
        )
    }

    /// Deterministic pseudo-random matrix for property checks
    fn pseudo_random_catalog(size: usize) -> Arc<Catalog> {
        let mut state: u32 = 12345;
        let mut next = move || {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            (state >> 16) as f32 / 65536.0
        };
        let rows = (0..size)
            .map(|i| (0..size).map(|j| if i == j { 1.0 } else { next() }).collect())
            .collect();
        let titles: Vec<String> = (0..size).map(|i| format!("Movie {}", i)).collect();
        let title_refs: Vec<&str> = titles.iter().map(String::as_str).collect();
        create_test_catalog(&title_refs, rows)
    }

    fn titles_of(catalog: &Catalog, candidates: &[Candidate]) -> Vec<String> {
        candidates
            .iter()
            .map(|c| catalog.get_movie(c.position).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn test_worked_example() {
        let catalog = six_movie_catalog();
        let source = SimilaritySource::new(catalog.clone());

        let candidates = source.candidates_for_title("A").unwrap();

        assert_eq!(titles_of(&catalog, &candidates), vec!["B", "C", "D", "E", "F"]);
        assert_eq!(candidates[0].movie_id, 101);
        assert_eq!(candidates[0].score, 0.9);
    }

    #[test]
    fn test_ties_keep_row_order() {
        let catalog = six_movie_catalog();
        let source = SimilaritySource::new(catalog.clone());

        // Row C: A=0.8, then D, E, F all 0.6, then B=0.1
        let candidates = source.candidates_for_title("C").unwrap();
        assert_eq!(titles_of(&catalog, &candidates), vec!["A", "D", "E", "F", "B"]);
    }

    #[test]
    fn test_query_excluded_when_diagonal_is_not_the_maximum() {
        let catalog = create_test_catalog(
            &["A", "B", "C", "D", "E", "F"],
            vec![
                vec![0.5, 0.9, 0.5, 0.7, 0.6, 0.95],
                vec![0.0; 6],
                vec![0.0; 6],
                vec![0.0; 6],
                vec![0.0; 6],
                vec![0.0; 6],
            ],
        );
        let source = SimilaritySource::new(catalog.clone());

        // F outranks the diagonal; dropping the top entry positionally would lose it
        let candidates = source.candidates_for_title("A").unwrap();
        assert_eq!(titles_of(&catalog, &candidates), vec!["F", "B", "D", "E", "C"]);
    }

    #[test]
    fn test_exactly_six_movies_fill_every_slot() {
        let catalog = six_movie_catalog();
        let source = SimilaritySource::new(catalog.clone());

        for title in ["A", "B", "C", "D", "E", "F"] {
            let candidates = source.candidates_for_title(title).unwrap();
            assert_eq!(candidates.len(), DEFAULT_LIMIT);
            assert!(!titles_of(&catalog, &candidates).contains(&title.to_string()));
        }
    }

    #[test]
    fn test_insufficient_data() {
        let catalog = create_test_catalog(
            &["A", "B", "C", "D", "E"],
            vec![vec![1.0; 5]; 5],
        );
        let source = SimilaritySource::new(catalog);

        let err = source.candidates_for_title("A").unwrap_err();
        assert_eq!(
            err,
            RecommendError::InsufficientData {
                available: 5,
                required: 6
            }
        );
    }

    #[test]
    fn test_unknown_title_and_id() {
        let source = SimilaritySource::new(six_movie_catalog());

        assert_eq!(
            source.candidates_for_title("Z").unwrap_err(),
            RecommendError::TitleNotFound("Z".to_string())
        );
        assert_eq!(
            source.candidates_for_id(999).unwrap_err(),
            RecommendError::MovieIdNotFound(999)
        );
        assert!(matches!(
            source.get_candidates(6),
            Err(RecommendError::PositionOutOfRange { position: 6, len: 6 })
        ));
    }

    #[test]
    fn test_duplicate_title_uses_first_row() {
        let catalog = create_test_catalog(
            &["A", "B", "C", "A", "E", "F"],
            vec![
                vec![1.0, 0.1, 0.2, 0.3, 0.4, 0.5],
                vec![0.0; 6],
                vec![0.0; 6],
                vec![0.9, 0.5, 0.4, 1.0, 0.2, 0.1],
                vec![0.0; 6],
                vec![0.0; 6],
            ],
        );
        let source = SimilaritySource::new(catalog.clone());

        let candidates = source.candidates_for_title("A").unwrap();
        assert_eq!(candidates[0].position, 5);

        // The second "A" is reachable by id
        let by_id = source.candidates_for_id(103).unwrap();
        assert_eq!(by_id[0].position, 0);
    }

    #[test]
    fn test_recommendations_are_distinct_and_ordered() {
        let catalog = pseudo_random_catalog(40);
        let source = SimilaritySource::new(catalog.clone());

        for query in 0..catalog.len() {
            let candidates = source.get_candidates(query).unwrap();
            assert_eq!(candidates.len(), DEFAULT_LIMIT);

            let positions: HashSet<usize> = candidates.iter().map(|c| c.position).collect();
            assert_eq!(positions.len(), DEFAULT_LIMIT, "duplicates for row {}", query);
            assert!(!positions.contains(&query));

            for pair in candidates.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }

            // Nothing left out scores higher than the last one kept
            let last = candidates[DEFAULT_LIMIT - 1].score;
            let row = catalog.similarity_row(query).unwrap();
            let higher = row
                .iter()
                .enumerate()
                .filter(|&(j, &s)| j != query && s > last)
                .count();
            assert!(higher < DEFAULT_LIMIT);
        }
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let source = SimilaritySource::new(pseudo_random_catalog(25));

        let first = source.get_candidates(7).unwrap();
        let second = source.get_candidates(7).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_with_limit() {
        let source = SimilaritySource::new(six_movie_catalog()).with_limit(2);
        assert_eq!(source.limit(), 2);
        assert_eq!(source.get_candidates(0).unwrap().len(), 2);

        let source = source.with_limit(6);
        assert!(matches!(
            source.get_candidates(0),
            Err(RecommendError::InsufficientData { required: 7, .. })
        ));
    }

    #[test]
    fn test_rank_row() {
        let ranked = rank_row(&[0.2, 0.9, 0.9, 0.1], 1, 2);
        assert_eq!(ranked, vec![(2, 0.9), (0, 0.2)]);
    }
}

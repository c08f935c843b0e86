//! # Sources Crate
//!
//! Candidate generation for similar-movie recommendations.
//!
//! ## Components
//!
//! ### Similarity Source
//! Nearest neighbours read straight from the precomputed similarity matrix:
//! - "Movies most similar to the one you picked"
//! - Excludes the query movie by row position
//! - Stable ordering on equal scores
//!
//! ## Example Usage
//!
//! ```ignore
//! use sources::SimilaritySource;
//! use data_loader::Catalog;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load_from_dir("artifacts".as_ref())?);
//! let source = SimilaritySource::new(catalog.clone());
//!
//! let candidates = source.candidates_for_title("Avatar")?;
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod similarity;

// Re-export commonly used types
pub use error::RecommendError;
pub use similarity::{DEFAULT_LIMIT, SimilaritySource, rank_row};
pub use types::Candidate;

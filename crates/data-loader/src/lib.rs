//! # Data Loader Crate
//!
//! This crate loads the two precomputed artifacts the recommender runs on:
//! the movie table and the N×N similarity matrix.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, SimilarityMatrix, Catalog)
//! - **parser**: Decode and encode the artifact files
//! - **index**: Validate the artifacts and build lookup indices
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_dir(Path::new("artifacts"))?;
//!
//! let position = catalog.position_of_title("Avatar").unwrap();
//! let scores = catalog.similarity_row(position).unwrap();
//!
//! println!("{} movies, first score {}", catalog.len(), scores[0]);
//! ```
//!
//! Loading is one-shot: any error here is fatal for the program.

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::default_artifacts_dir;
pub use types::{Catalog, MovieId, MovieRecord, SimilarityMatrix};

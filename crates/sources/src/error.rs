//! Errors returned when a recommendation cannot be computed.

use data_loader::MovieId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// No movie carries exactly this title
    #[error("Movie titled {0:?} not found")]
    TitleNotFound(String),

    /// No movie carries this id
    #[error("Movie with id {0} not found")]
    MovieIdNotFound(MovieId),

    /// Row position outside the catalog
    #[error("Row {position} is outside a catalog of {len} movies")]
    PositionOutOfRange { position: usize, len: usize },

    /// Catalog too small to skip the query and still fill every slot
    #[error("Need at least {required} movies to recommend, catalog has {available}")]
    InsufficientData { available: usize, required: usize },
}

pub type Result<T> = std::result::Result<T, RecommendError>;

//! Codecs for the two artifact files.
//!
//! - `movie_list`: JSON array of `{"title": ..., "movie_id": ...}` records
//! - `similarity`: binary, little-endian
//!
//! ```text
//! offset  size        field
//! 0       8           magic "SIMMAT01"
//! 8       8           rows (u64)
//! 16      8           cols (u64), must equal rows
//! 24      rows*cols*4 scores (f32), row-major
//! ```
//!
//! No trailing bytes are allowed after the last score.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// File name of the movie table inside the artifacts directory
pub const MOVIE_LIST_FILE: &str = "movie_list";

/// File name of the similarity matrix inside the artifacts directory
pub const SIMILARITY_FILE: &str = "similarity";

/// Leading bytes of every similarity artifact
pub const SIMILARITY_MAGIC: &[u8; 8] = b"SIMMAT01";

const HEADER_LEN: usize = 24;
const SCORE_LEN: usize = 4;

/// Read a whole artifact, mapping a missing file to `FileNotFound`
fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

fn parse_error(file: &str, reason: impl Into<String>) -> DataLoadError {
    DataLoadError::ParseError {
        file: file.to_string(),
        reason: reason.into(),
    }
}

fn read_u64_le(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(buf)
}

// =============================================================================
// Movie list
// =============================================================================

/// Parse the movie_list artifact
pub fn parse_movie_list(path: &Path) -> Result<Vec<MovieRecord>> {
    let bytes = read_artifact(path)?;
    decode_movie_list(&bytes)
}

/// Decode movie records from JSON bytes
pub fn decode_movie_list(bytes: &[u8]) -> Result<Vec<MovieRecord>> {
    serde_json::from_slice(bytes).map_err(|e| parse_error(MOVIE_LIST_FILE, e.to_string()))
}

/// Write movie records in the movie_list format
pub fn write_movie_list(path: &Path, movies: &[MovieRecord]) -> Result<()> {
    let bytes = serde_json::to_vec(movies)
        .map_err(|e| DataLoadError::ValidationError(format!("cannot encode movie list: {}", e)))?;
    fs::write(path, bytes)?;
    Ok(())
}

// =============================================================================
// Similarity matrix
// =============================================================================

/// Parse the similarity artifact
pub fn parse_similarity(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_artifact(path)?;
    decode_similarity(&bytes)
}

/// Decode a similarity matrix from its binary form
pub fn decode_similarity(bytes: &[u8]) -> Result<SimilarityMatrix> {
    if bytes.len() < HEADER_LEN {
        return Err(parse_error(
            SIMILARITY_FILE,
            format!("file is {} bytes, header needs {}", bytes.len(), HEADER_LEN),
        ));
    }

    let (header, payload) = bytes.split_at(HEADER_LEN);
    if &header[..8] != SIMILARITY_MAGIC {
        return Err(parse_error(SIMILARITY_FILE, "missing SIMMAT01 magic"));
    }

    let rows = read_u64_le(&header[8..16]);
    let cols = read_u64_le(&header[16..24]);
    let size = usize::try_from(rows)
        .map_err(|_| parse_error(SIMILARITY_FILE, format!("row count {} too large", rows)))?;
    if rows != cols {
        return Err(DataLoadError::NotSquare {
            row: 0,
            expected: size,
            found: usize::try_from(cols).unwrap_or(usize::MAX),
        });
    }

    let expected_bytes = size
        .checked_mul(size)
        .and_then(|n| n.checked_mul(SCORE_LEN))
        .ok_or_else(|| parse_error(SIMILARITY_FILE, format!("{}x{} matrix too large", rows, cols)))?;
    if payload.len() != expected_bytes {
        return Err(parse_error(
            SIMILARITY_FILE,
            format!(
                "expected {} bytes of scores for {}x{}, found {}",
                expected_bytes,
                rows,
                cols,
                payload.len()
            ),
        ));
    }

    let scores = payload
        .chunks_exact(SCORE_LEN)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    SimilarityMatrix::from_flat(size, scores)
}

/// Encode a similarity matrix into its binary form
pub fn encode_similarity(matrix: &SimilarityMatrix) -> Vec<u8> {
    let size = matrix.size() as u64;
    let mut bytes = Vec::with_capacity(HEADER_LEN + matrix.as_slice().len() * SCORE_LEN);
    bytes.extend_from_slice(SIMILARITY_MAGIC);
    bytes.extend_from_slice(&size.to_le_bytes());
    bytes.extend_from_slice(&size.to_le_bytes());
    for score in matrix.as_slice() {
        bytes.extend_from_slice(&score.to_le_bytes());
    }
    bytes
}

/// Write a similarity matrix in the similarity format
pub fn write_similarity(path: &Path, matrix: &SimilarityMatrix) -> Result<()> {
    fs::write(path, encode_similarity(matrix))?;
    Ok(())
}

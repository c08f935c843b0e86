//! Recommender crate for the similar-movie engine.
//!
//! This crate contains the orchestrator that combines similarity ranking
//! with poster resolution.

pub mod orchestrator;

pub use orchestrator::{MovieRecommendation, RecommendationOrchestrator};

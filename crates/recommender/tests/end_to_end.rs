//! End-to-end test: write artifacts, load them, recommend.
//!
//! Posters come from a resolver with no token, so every slot carries the
//! placeholder and no network is touched.

use data_loader::{parser, Catalog, MovieRecord, SimilarityMatrix};
use poster_client::{PosterConfig, PosterResolver, PLACEHOLDER_POSTER_URL};
use recommender::RecommendationOrchestrator;
use sources::RecommendError;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn create_test_artifacts(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("recommender-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();

    let movies = vec![
        MovieRecord::new("Avatar", 19995),
        MovieRecord::new("Pirates of the Caribbean: At World's End", 285),
        MovieRecord::new("Spectre", 206647),
        MovieRecord::new("The Dark Knight Rises", 49026),
        MovieRecord::new("John Carter", 49529),
        MovieRecord::new("Spider-Man 3", 559),
        MovieRecord::new("Tangled", 38757),
    ];
    let matrix = SimilarityMatrix::from_rows(vec![
        vec![1.00, 0.12, 0.05, 0.08, 0.31, 0.10, 0.04],
        vec![0.12, 1.00, 0.09, 0.07, 0.15, 0.11, 0.06],
        vec![0.05, 0.09, 1.00, 0.22, 0.03, 0.08, 0.01],
        vec![0.08, 0.07, 0.22, 1.00, 0.05, 0.19, 0.02],
        vec![0.31, 0.15, 0.03, 0.05, 1.00, 0.07, 0.05],
        vec![0.10, 0.11, 0.08, 0.19, 0.07, 1.00, 0.03],
        vec![0.04, 0.06, 0.01, 0.02, 0.05, 0.03, 1.00],
    ])
    .unwrap();

    parser::write_movie_list(&dir.join(parser::MOVIE_LIST_FILE), &movies).unwrap();
    parser::write_similarity(&dir.join(parser::SIMILARITY_FILE), &matrix).unwrap();
    dir
}

fn build_orchestrator(dir: &Path) -> RecommendationOrchestrator {
    let catalog = Arc::new(Catalog::load_from_dir(dir).expect("artifacts should load"));
    let posters = Arc::new(PosterResolver::new(PosterConfig::default()));
    RecommendationOrchestrator::new(catalog, posters)
}

#[tokio::test]
async fn test_recommend_from_artifacts() {
    let dir = create_test_artifacts("recommend");
    let orchestrator = build_orchestrator(&dir);

    let recommendations = orchestrator.recommend("Avatar").await.unwrap();

    let titles: Vec<_> = recommendations.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "John Carter",
            "Pirates of the Caribbean: At World's End",
            "Spider-Man 3",
            "The Dark Knight Rises",
            "Spectre",
        ]
    );
    assert_eq!(recommendations[0].movie_id, 49529);
    assert!(recommendations
        .iter()
        .all(|r| r.poster_url == PLACEHOLDER_POSTER_URL));

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_every_movie_gets_five_others() {
    let dir = create_test_artifacts("every");
    let orchestrator = build_orchestrator(&dir);
    let titles: Vec<String> = orchestrator
        .catalog()
        .titles()
        .map(str::to_string)
        .collect();

    for title in &titles {
        let recommendations = orchestrator.recommend(title).await.unwrap();
        assert_eq!(recommendations.len(), 5);
        assert!(recommendations.iter().all(|r| &r.title != title));
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_unknown_title_is_an_error() {
    let dir = create_test_artifacts("unknown");
    let orchestrator = build_orchestrator(&dir);

    let err = orchestrator.recommend("Avatar 2").await.unwrap_err();
    assert_eq!(err, RecommendError::TitleNotFound("Avatar 2".to_string()));

    fs::remove_dir_all(&dir).unwrap();
}

//! Integration tests for the resume ranker

use resume_ranker::input::InputManager;
use resume_ranker::processing::text_processor::TextProcessor;
use resume_ranker::processing::applicants::{find_best_matches, rank_applicants, ApplicantFilters, ApplicantPool};
use resume_ranker::{enhance, KeywordModel, RankerError, Ranker};
use std::path::Path;

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("Node.js"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(RankerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file_is_io_error() {
    let mut manager = InputManager::new();
    let result = manager.extract_text(Path::new("tests/fixtures/nonexistent.pdf")).await;
    assert!(matches!(result, Err(RankerError::Io(_))));
}

#[tokio::test]
async fn test_long_markdown_and_text_extensions_are_accepted() {
    let dir = tempfile::TempDir::new().unwrap();
    let markdown = dir.path().join("cv.markdown");
    std::fs::write(&markdown, "# Jane Roe\n\n**Rust** engineer").unwrap();
    let plain = dir.path().join("cv.text");
    std::fs::write(&plain, "Jane Roe, Rust engineer").unwrap();

    let mut manager = InputManager::new();
    let text = manager.extract_text(&markdown).await.unwrap();
    assert!(text.contains("Jane Roe"));
    assert!(!text.contains("**"));
    assert!(manager.extract_text(&plain).await.unwrap().contains("Rust engineer"));
}

#[test]
fn test_cleaned_text_feeds_keyword_extraction() {
    let cleaned = TextProcessor::default().clean_text("\u{2022} Kubernetes\n\n\u{2022}  Terraform!!!");
    assert_eq!(cleaned, "Kubernetes Terraform.");

    let enhanced = enhance(&KeywordModel::new().unwrap(), &cleaned);
    assert_eq!(enhanced.corrected_text, "Kubernetes Terraform .");
    assert!(!enhanced.keywords.iter().any(|k| k == "\u{2022}"));
}

#[tokio::test]
async fn test_corrupt_pdf_is_extraction_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf").unwrap();

    let mut manager = InputManager::new();
    let result = manager.extract_text(&path).await;
    assert!(matches!(result, Err(RankerError::PdfExtraction(_))));
}

#[tokio::test]
async fn test_resume_pipeline_ranks_matching_job_first() {
    let mut manager = InputManager::new();
    let resume = manager
        .extract_text(Path::new("tests/fixtures/sample_resume.txt"))
        .await
        .unwrap();

    let model = KeywordModel::new().unwrap();
    let cleaned = TextProcessor::default().clean_text(&resume);
    let enhanced = enhance(&model, &cleaned);
    assert!(enhanced.keywords.iter().any(|k| k == "Python"));
    assert!(enhanced.keywords.iter().any(|k| k == "Docker"));
    assert!(enhanced.skills.contains(&"machine learning".to_string()));

    let mut jobs = Vec::new();
    for name in ["job_accounting.txt", "job_frontend.txt", "job_python_ai.txt"] {
        let path = Path::new("tests/fixtures").join(name);
        jobs.push(manager.extract_text(&path).await.unwrap());
    }

    let ranked = Ranker::default().best_jobs(&enhanced.corrected_text, &jobs).unwrap();
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].index, 2);
    assert_eq!(ranked[2].index, 0);
}

#[test]
fn test_applicant_strategies_agree_on_best_fit() {
    let pool = ApplicantPool::load(Path::new("tests/fixtures/applicants.json")).unwrap();
    let filters = ApplicantFilters::default();

    let by_rules = find_best_matches(&pool.job, &pool.applications, &filters);
    assert_eq!(by_rules[0].application.id, 12);
    // type 20 + location 20 + 2 of 5 requirement terms (12) + language 15 + visa 15
    assert_eq!(by_rules[0].match_score, 82.0);
    assert_eq!(by_rules[1].match_score, 15.0);

    let by_tfidf = rank_applicants(&Ranker::default(), &pool.job, &pool.applications, &filters).unwrap();
    assert_eq!(by_tfidf[0].application.id, 12);

    let immediate = ApplicantFilters {
        immediate_joining: true,
        ..ApplicantFilters::default()
    };
    let kept = find_best_matches(&pool.job, &pool.applications, &immediate);
    assert_eq!(kept.len(), 1);
}

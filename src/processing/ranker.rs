//! Ranking of candidate documents against a query by TF-IDF cosine similarity

use crate::config::RankingConfig;
use crate::error::{Result, RankerError};
use crate::processing::tfidf::{cosine_similarity, TfidfVectorizer, VectorizerConfig};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// One candidate with its similarity to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDocument {
    /// Position of the candidate in the input sequence
    pub index: usize,
    pub document: String,
    /// Cosine similarity in [0, 1]
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    vectorizer: VectorizerConfig,
    top_n: Option<usize>,
    min_score: f32,
}

impl Ranker {
    pub fn new(vectorizer: VectorizerConfig) -> Self {
        Self {
            vectorizer,
            top_n: None,
            min_score: 0.0,
        }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self {
            vectorizer: VectorizerConfig::from(config),
            top_n: (config.top_n > 0).then_some(config.top_n),
            min_score: config.min_score,
        }
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score.clamp(0.0, 1.0);
        self
    }

    /// Rank every candidate by similarity to `query`, best first.
    ///
    /// The vocabulary is fit over the candidates and the query together, so
    /// scores are only comparable within a single call. Ties keep input order.
    /// Fails with `InvalidInput` when `candidates` is empty or `query` is blank.
    pub fn rank<S: AsRef<str>>(&self, candidates: &[S], query: &str) -> Result<Vec<RankedDocument>> {
        if candidates.is_empty() {
            return Err(RankerError::InvalidInput(
                "At least one candidate document is required".to_string(),
            ));
        }
        if query.trim().is_empty() {
            return Err(RankerError::InvalidInput("Query text is empty".to_string()));
        }

        let mut corpus: Vec<&str> = candidates.iter().map(AsRef::as_ref).collect();
        corpus.push(query);

        let fitted = TfidfVectorizer::new(self.vectorizer.clone()).fit(&corpus)?;
        let query_vector = fitted.transform(query);
        if query_vector.is_zero() {
            debug!("Query has no terms in the fitted vocabulary; all scores are zero");
        }

        let mut ranked: Vec<RankedDocument> = candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                let vector = fitted.transform(candidate.as_ref());
                let score = cosine_similarity(&query_vector, &vector).clamp(0.0, 1.0);
                debug!("Candidate {} scored {:.4}", index, score);
                RankedDocument {
                    index,
                    document: candidate.as_ref().to_string(),
                    score,
                }
            })
            .collect();

        // Vec::sort_by is stable
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        info!(
            "Ranked {} candidate(s) over {} features",
            ranked.len(),
            fitted.vocabulary_size()
        );
        Ok(ranked)
    }

    /// Apply the configured `top_n` and `min_score` cut-offs to a ranking.
    pub fn shortlist(&self, ranked: Vec<RankedDocument>) -> Vec<RankedDocument> {
        let limit = self.top_n.unwrap_or(usize::MAX);
        ranked
            .into_iter()
            .filter(|r| r.score >= self.min_score)
            .take(limit)
            .collect()
    }

    /// Résumés ordered by how well they fit one job description
    pub fn match_jobs<S: AsRef<str>>(&self, resumes: &[S], job_description: &str) -> Result<Vec<RankedDocument>> {
        self.rank(resumes, job_description)
    }

    /// Job descriptions ordered by how well they fit one résumé
    pub fn best_jobs<S: AsRef<str>>(&self, resume: &str, job_descriptions: &[S]) -> Result<Vec<RankedDocument>> {
        self.rank(job_descriptions, resume)
    }

    /// Candidate profiles ordered by similarity to a job or free-text search
    pub fn search_candidates<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Result<Vec<RankedDocument>> {
        self.rank(candidates, query)
    }
}

/// Rank with the default vectorizer settings.
pub fn rank<S: AsRef<str>>(candidates: &[S], query: &str) -> Result<Vec<RankedDocument>> {
    Ranker::default().rank(candidates, query)
}

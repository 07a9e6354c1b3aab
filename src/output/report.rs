//! Report structures for a pipeline run

use crate::processing::applicants::ScoredApplication;
use crate::processing::keywords::Enhancement;
use crate::processing::ranker::RankedDocument;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Everything `analyze` produced for one résumé
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub resume_file: String,
    pub extracted_text: String,
    pub enhancement: Enhancement,
    /// Job descriptions ranked against the résumé
    pub job_matches: Vec<RankedDocument>,
    /// Candidate profiles ranked against the first job description
    pub candidate_matches: Vec<RankedDocument>,
    pub candidate_query: Option<String>,
    pub metadata: ReportMetadata,
}

/// A standalone ranking (`rank` and `search` commands)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub title: String,
    pub query: String,
    /// Display labels for the candidates, in input order (file names, or the text)
    pub labels: Vec<String>,
    pub results: Vec<RankedDocument>,
    pub metadata: ReportMetadata,
}

impl RankingReport {
    pub fn label<'a>(&'a self, result: &'a RankedDocument) -> &'a str {
        self.labels
            .get(result.index)
            .map(String::as_str)
            .unwrap_or(result.document.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantReport {
    pub job_title: String,
    pub strategy: String,
    pub total_applications: usize,
    pub results: Vec<ScoredApplication>,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: SystemTime,
    pub processing_time_ms: u64,
    pub tool_version: String,
}

impl ReportMetadata {
    pub fn new(started: SystemTime) -> Self {
        let processing_time_ms = SystemTime::now()
            .duration_since(started)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            generated_at: SystemTime::now(),
            processing_time_ms,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(index: usize, document: &str) -> RankedDocument {
        RankedDocument {
            index,
            document: document.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_label_prefers_file_name_and_falls_back_to_text() {
        let report = RankingReport {
            title: "Document Ranking".to_string(),
            query: "python".to_string(),
            labels: vec!["jobs/python.txt".to_string()],
            results: Vec::new(),
            metadata: ReportMetadata::new(SystemTime::now()),
        };

        let labelled = ranked(0, "Python developer");
        assert_eq!(report.label(&labelled), "jobs/python.txt");

        let unlabelled = ranked(3, "Frontend developer");
        let label = report.label(&unlabelled);
        assert_eq!(label, "Frontend developer");
    }
}

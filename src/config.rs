//! Configuration management for the resume ranker

use crate::error::{Result, RankerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub ranking: RankingConfig,
    pub keywords: KeywordConfig,
    pub output: OutputConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub sublinear_tf: bool,
    pub smooth_idf: bool,
    pub min_token_len: usize,
    /// Keep only the best `top_n` results; 0 keeps everything
    pub top_n: usize,
    pub min_score: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub max_keywords: usize,
    pub extra_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub score_precision: usize,
}

/// Sample inputs used by `analyze` when no jobs or candidates are given
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub job_descriptions: Vec<String>,
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ranking: RankingConfig {
                ngram_min: 1,
                ngram_max: 2,
                sublinear_tf: true,
                smooth_idf: true,
                min_token_len: 2,
                top_n: 0,
                min_score: 0.0,
            },
            keywords: KeywordConfig {
                max_keywords: 0,
                extra_skills: Vec::new(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                score_precision: 2,
            },
            demo: DemoConfig {
                job_descriptions: vec![
                    "Looking for a Python developer with AI experience.".to_string(),
                ],
                candidates: vec![
                    "AI Engineer skilled in Python".to_string(),
                    "Frontend Developer".to_string(),
                    "Data Scientist with Python".to_string(),
                ],
            },
        }
    }
}

impl Config {
    /// Load from `path`, writing defaults there if the file does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    fn validate(&self) -> Result<()> {
        let ranking = &self.ranking;
        if ranking.ngram_min == 0 || ranking.ngram_min > ranking.ngram_max {
            return Err(RankerError::Configuration(format!(
                "Invalid n-gram range ({}, {})",
                ranking.ngram_min, ranking.ngram_max
            )));
        }
        if !(0.0..=1.0).contains(&ranking.min_score) {
            return Err(RankerError::Configuration(format!(
                "min_score must be within [0, 1], got {}",
                ranking.min_score
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = Config::load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, Config::default());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ranking.ngram_max, 2);
        assert_eq!(loaded.output.score_precision, 2);
        assert_eq!(loaded.demo.candidates.len(), 3);
    }

    #[test]
    fn test_invalid_ngram_range_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.ranking.ngram_min = 3;
        config.save_to(&path).unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, RankerError::Configuration(_)));
    }

    #[test]
    fn test_malformed_toml_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ranking = [not toml").unwrap();

        assert!(matches!(Config::load_from(&path), Err(RankerError::Configuration(_))));
    }
}

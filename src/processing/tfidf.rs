//! TF-IDF vectorization over a jointly fitted vocabulary
//!
//! Weights follow the usual smoothed, sub-linear scheme:
//! `idf(t) = ln((1 + n) / (1 + df(t))) + 1` and `tf(t, d) = 1 + ln(count(t, d))`,
//! with every document vector L2-normalized.

use crate::error::{Result, RankerError};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Inclusive (min, max) n-gram sizes
    pub ngram_range: (usize, usize),
    pub sublinear_tf: bool,
    pub smooth_idf: bool,
    pub min_token_len: usize,
    pub stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            sublinear_tf: true,
            smooth_idf: true,
            min_token_len: 2,
            stop_words: true,
        }
    }
}

impl From<&crate::config::RankingConfig> for VectorizerConfig {
    fn from(ranking: &crate::config::RankingConfig) -> Self {
        Self {
            ngram_range: (ranking.ngram_min, ranking.ngram_max),
            sublinear_tf: ranking.sublinear_tf,
            smooth_idf: ranking.smooth_idf,
            min_token_len: ranking.min_token_len,
            stop_words: true,
        }
    }
}

/// Sparse vector as (feature index, weight) pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_map(map: BTreeMap<usize, f32>) -> Self {
        Self {
            entries: map.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        }
    }

    pub fn entries(&self) -> &[(usize, f32)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine of the angle between two vectors; 0 when either is the zero vector.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0)
}

pub struct TfidfVectorizer {
    config: VectorizerConfig,
    processor: TextProcessor,
}

/// Vocabulary and IDF weights learned from one corpus
pub struct FittedVectorizer {
    config: VectorizerConfig,
    processor: TextProcessor,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(VectorizerConfig::default())
    }
}

impl TfidfVectorizer {
    pub fn new(config: VectorizerConfig) -> Self {
        let processor = TextProcessor::new(config.min_token_len, config.stop_words);
        Self { config, processor }
    }

    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Learn the vocabulary and document frequencies of `documents`.
    pub fn fit<S: AsRef<str>>(self, documents: &[S]) -> Result<FittedVectorizer> {
        if documents.is_empty() {
            return Err(RankerError::InvalidInput(
                "Cannot fit a vectorizer on an empty corpus".to_string(),
            ));
        }
        let (min_n, max_n) = self.config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(RankerError::InvalidInput(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let features: BTreeSet<String> =
                features(&self.processor, document.as_ref(), self.config.ngram_range)
                    .into_iter()
                    .collect();
            for feature in features {
                *document_frequency.entry(feature).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        // BTreeMap iteration gives feature indices in sorted term order
        for (index, (term, df)) in document_frequency.into_iter().enumerate() {
            let df = df as f32;
            let weight = if self.config.smooth_idf {
                ((1.0 + n) / (1.0 + df)).ln() + 1.0
            } else {
                (n / df).ln() + 1.0
            };
            vocabulary.insert(term, index);
            idf.push(weight);
        }

        debug!(
            "Fitted TF-IDF vocabulary of {} features over {} documents",
            vocabulary.len(),
            documents.len()
        );

        Ok(FittedVectorizer {
            config: self.config,
            processor: self.processor,
            vocabulary,
            idf,
        })
    }
}

impl FittedVectorizer {
    /// Weighted, L2-normalized vector for `text`. Out-of-vocabulary features are ignored.
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
        for feature in features(&self.processor, text, self.config.ngram_range) {
            if let Some(&index) = self.vocabulary.get(&feature) {
                *counts.entry(index).or_insert(0) += 1;
            }
        }

        let mut weights: BTreeMap<usize, f32> = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.config.sublinear_tf {
                    1.0 + (count as f32).ln()
                } else {
                    count as f32
                };
                (index, tf * self.idf[index])
            })
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            weights.values_mut().for_each(|w| *w /= norm);
        }

        SparseVector::from_map(weights)
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary.get(term).map(|&index| self.idf[index])
    }
}

/// Unigrams through `max_n`-grams over the kept tokens of `text`
fn features(processor: &TextProcessor, text: &str, (min_n, max_n): (usize, usize)) -> Vec<String> {
    let tokens = processor.tokenize(text);
    let mut out = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        if n == 1 {
            out.extend(tokens.iter().cloned());
        } else {
            out.extend(tokens.windows(n).map(|window| window.join(" ")));
        }
    }
    out
}

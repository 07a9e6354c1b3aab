//! Resume ranker library
//!
//! Extracts text from résumés, pulls out keyword nouns, and ranks résumés,
//! job descriptions and candidate profiles against each other by TF-IDF
//! cosine similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use error::{Result, RankerError};
pub use config::Config;
pub use processing::{enhance, rank, Enhancement, KeywordModel, RankedDocument, Ranker};

//! Text processing, keyword extraction and ranking

pub mod stopwords;
pub mod text_processor;
pub mod tfidf;
pub mod ranker;
pub mod keywords;
pub mod applicants;

pub use keywords::{enhance, Enhancement, KeywordModel};
pub use ranker::{rank, RankedDocument, Ranker};

//! Keyword extraction: token normalization and noun tagging
//!
//! `KeywordModel` is built once by the caller and passed by reference to
//! [`enhance`]; nothing here keeps process-wide state.

use crate::error::{Result, RankerError};
use crate::processing::stopwords::is_keyword_stop_word;
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Function,
    Number,
    Punct,
}

impl PartOfSpeech {
    pub fn is_nominal(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Byte offset into the source text
    pub offset: usize,
    /// First token of a sentence or line
    pub sentence_start: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: Token,
    pub pos: PartOfSpeech,
}

/// Result of running the keyword model over a text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enhancement {
    /// Tokens joined by single spaces
    pub corrected_text: String,
    /// Noun and proper-noun tokens that are not stop words, first occurrence order
    pub keywords: Vec<String>,
    /// Known skill phrases found in the text, e.g. "machine learning"
    pub skills: Vec<String>,
}

pub struct KeywordModel {
    skills: Vec<String>,
    skill_terms: HashSet<String>,
    skill_matcher: AhoCorasick,
    function_words: HashSet<&'static str>,
    common_verbs: HashSet<&'static str>,
    max_keywords: usize,
}

const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ence", "ance", "ism", "ist", "ogy", "ware",
    "ics", "er", "or", "ee", "ure", "age", "dom", "hood",
];

const ADJECTIVE_SUFFIXES: &[&str] = &[
    "ous", "ful", "ive", "able", "ible", "al", "ic", "less", "ary", "ent", "ant",
];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "our", "their", "his", "her",
    "its", "some", "any", "each", "every", "no",
];

impl KeywordModel {
    pub fn new() -> Result<Self> {
        Self::with_custom_skills(Vec::new())
    }

    /// Model with additional skill terms on top of the built-in lexicon
    pub fn with_custom_skills(additional_skills: Vec<String>) -> Result<Self> {
        let mut skills: Vec<String> = default_skills().iter().map(|s| s.to_string()).collect();
        skills.extend(additional_skills.into_iter().map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()));
        skills.sort();
        skills.dedup();

        let skill_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&skills)
            .map_err(|e| RankerError::TextProcessing(format!("Failed to build skill matcher: {}", e)))?;

        let skill_terms = skills
            .iter()
            .filter(|s| !s.contains(' '))
            .cloned()
            .collect();

        Ok(Self {
            skills,
            skill_terms,
            skill_matcher,
            function_words: function_words().iter().copied().collect(),
            common_verbs: common_verbs().iter().copied().collect(),
            max_keywords: 0,
        })
    }

    /// Cap the number of keywords returned; 0 means no cap
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    /// Split on Unicode word boundaries, dropping whitespace. Punctuation marks
    /// become their own tokens.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;

        for (offset, segment) in text.split_word_bound_indices() {
            if segment.chars().all(char::is_whitespace) {
                if segment.contains('\n') {
                    sentence_start = true;
                }
                continue;
            }

            tokens.push(Token {
                text: segment.to_string(),
                offset,
                sentence_start,
            });
            sentence_start = matches!(segment, "." | "!" | "?" | ":" | ";" | "•");
        }

        tokens
    }

    /// Rule-based part-of-speech tags for `tokens`
    pub fn tag(&self, tokens: Vec<Token>) -> Vec<TaggedToken> {
        let mut tagged: Vec<TaggedToken> = Vec::with_capacity(tokens.len());

        for token in tokens {
            let previous = tagged.last();
            let pos = self.tag_one(&token, previous);
            tagged.push(TaggedToken { token, pos });
        }

        tagged
    }

    fn tag_one(&self, token: &Token, previous: Option<&TaggedToken>) -> PartOfSpeech {
        let text = token.text.as_str();
        if !text.chars().any(char::is_alphanumeric) {
            return PartOfSpeech::Punct;
        }
        if !text.chars().any(char::is_alphabetic) {
            return PartOfSpeech::Number;
        }

        let lower = text.to_lowercase();
        let capitalized = text.chars().next().is_some_and(char::is_uppercase);
        let inner_caps = text.chars().skip(1).any(char::is_uppercase);

        if self.skill_terms.contains(&lower) {
            return if capitalized || inner_caps {
                PartOfSpeech::ProperNoun
            } else {
                PartOfSpeech::Noun
            };
        }
        if self.function_words.contains(lower.as_str()) {
            return PartOfSpeech::Function;
        }
        // Acronyms and camel-cased names
        if inner_caps && text.chars().count() >= 2 {
            return PartOfSpeech::ProperNoun;
        }
        if capitalized && !token.sentence_start {
            return PartOfSpeech::ProperNoun;
        }
        if self.common_verbs.contains(lower.as_str()) {
            return PartOfSpeech::Verb;
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }

        let stem = lower.strip_suffix('s').filter(|s| s.len() > 2 && !lower.ends_with("ss")).unwrap_or(lower.as_str());
        if NOUN_SUFFIXES.iter().any(|suffix| stem.len() > suffix.len() + 1 && stem.ends_with(suffix)) {
            return PartOfSpeech::Noun;
        }
        if lower.len() > 4 && lower.ends_with("ed") {
            return PartOfSpeech::Verb;
        }
        if lower.len() > 4 && lower.ends_with("ing") {
            return if previous.is_some_and(|p| self.introduces_noun(p)) {
                PartOfSpeech::Noun
            } else {
                PartOfSpeech::Verb
            };
        }
        if ADJECTIVE_SUFFIXES.iter().any(|suffix| lower.len() > suffix.len() + 2 && lower.ends_with(suffix)) {
            return PartOfSpeech::Adjective;
        }

        if capitalized {
            PartOfSpeech::ProperNoun
        } else {
            PartOfSpeech::Noun
        }
    }

    /// A gerund following one of these reads as a noun ("machine learning", "the testing")
    fn introduces_noun(&self, previous: &TaggedToken) -> bool {
        match previous.pos {
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Adjective => true,
            PartOfSpeech::Function => DETERMINERS.contains(&previous.token.text.to_lowercase().as_str()),
            _ => false,
        }
    }

    /// Known skill phrases in order of first appearance, lowercased
    pub fn find_skills(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for mat in self.skill_matcher.find_iter(text) {
            if !on_word_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            let skill = &self.skills[mat.pattern().as_usize()];
            if seen.insert(skill.clone()) {
                found.push(skill.clone());
            }
        }

        found
    }
}

impl Default for KeywordModel {
    fn default() -> Self {
        Self::new().expect("Failed to create default keyword model")
    }
}

/// Normalize `text` and extract its keyword nouns using `model`.
pub fn enhance(model: &KeywordModel, text: &str) -> Enhancement {
    let tagged = model.tag(model.tokenize(text));

    let corrected_text = tagged
        .iter()
        .map(|t| t.token.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for tagged_token in &tagged {
        if !tagged_token.pos.is_nominal() {
            continue;
        }
        let lower = tagged_token.token.text.to_lowercase();
        if is_keyword_stop_word(&lower) {
            continue;
        }
        if seen.insert(lower) {
            keywords.push(tagged_token.token.text.clone());
        }
        if model.max_keywords > 0 && keywords.len() >= model.max_keywords {
            break;
        }
    }

    let skills = model.find_skills(text);
    log::debug!("Extracted {} keyword(s) and {} skill phrase(s)", keywords.len(), skills.len());

    Enhancement {
        corrected_text,
        keywords,
        skills,
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn default_skills() -> &'static [&'static str] {
    &[
        // Programming languages
        "rust", "python", "javascript", "typescript", "java", "c++", "c#", "golang", "ruby",
        "php", "swift", "kotlin", "scala", "haskell", "matlab", "sql",
        // Web
        "react", "vue", "angular", "svelte", "html", "css", "tailwind", "node.js", "express",
        "next.js", "django", "flask", "graphql", "rest",
        // Infrastructure
        "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible", "jenkins",
        "linux", "git", "ci/cd", "devops", "microservices", "api", "redis", "kafka",
        // Databases
        "postgresql", "mysql", "mongodb", "sqlite", "elasticsearch",
        // Data and AI
        "ai", "ml", "nlp", "machine learning", "deep learning", "data science",
        "computer vision", "tensorflow", "pytorch", "scikit-learn", "pandas", "numpy",
        "spark", "hadoop", "airflow",
        // Practices
        "agile", "scrum", "testing", "project management", "leadership", "communication",
    ]
}

fn function_words() -> &'static [&'static str] {
    &[
        "a", "an", "the", "this", "that", "these", "those", "my", "your", "our", "their", "his",
        "her", "its", "i", "me", "we", "us", "you", "he", "she", "it", "they", "them", "who",
        "whom", "which", "what", "and", "or", "but", "nor", "so", "yet", "if", "because",
        "while", "although", "in", "on", "at", "by", "for", "with", "without", "of", "to",
        "from", "into", "onto", "over", "under", "about", "across", "through", "during",
        "between", "among", "within", "via", "per", "as", "is", "am", "are", "was", "were",
        "be", "been", "being", "have", "has", "had", "do", "does", "did", "will", "would",
        "shall", "should", "can", "could", "may", "might", "must", "not", "no", "some", "any",
        "each", "every", "all", "both", "more", "most", "very", "also", "than", "then",
    ]
}

fn common_verbs() -> &'static [&'static str] {
    &[
        "build", "built", "lead", "led", "manage", "design", "develop", "seek", "seeking", "use",
        "create", "implement", "improve", "deliver", "support", "maintain", "write", "wrote",
        "work", "worked", "looking", "join", "apply", "drive", "own", "ship", "know", "make",
        "run", "ran", "help", "collaborate", "mentor", "optimize", "deploy", "automate",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> KeywordModel {
        KeywordModel::new().unwrap()
    }

    #[test]
    fn test_tokens_are_space_joined() {
        let enhanced = enhance(&model(), "Python, AI and React.\nBerlin");
        assert_eq!(enhanced.corrected_text, "Python , AI and React . Berlin");
    }

    #[test]
    fn test_keywords_are_nouns_without_stop_words() {
        let enhanced = enhance(
            &model(),
            "Experienced Python developer with AI skills. Worked at Siemens on the data platform.",
        );

        for expected in ["Python", "developer", "AI", "skills", "Siemens", "data", "platform"] {
            assert!(
                enhanced.keywords.contains(&expected.to_string()),
                "missing {expected}: {:?}",
                enhanced.keywords
            );
        }
        for rejected in ["with", "the", "at", "Experienced", "Worked", "."] {
            assert!(!enhanced.keywords.contains(&rejected.to_string()), "unexpected {rejected}");
        }
    }

    #[test]
    fn test_keywords_deduplicate_case_insensitively() {
        let enhanced = enhance(&model(), "Python scripts. python tooling, PYTHON");
        let pythons = enhanced
            .keywords
            .iter()
            .filter(|k| k.eq_ignore_ascii_case("python"))
            .count();
        assert_eq!(pythons, 1);
        assert_eq!(enhanced.keywords[0], "Python");
    }

    #[test]
    fn test_gerund_after_noun_is_noun() {
        let m = model();
        let tagged = m.tag(m.tokenize("machine learning"));
        assert_eq!(tagged[1].pos, PartOfSpeech::Noun);

        let tagged = m.tag(m.tokenize("Seeking engineers"));
        assert_eq!(tagged[0].pos, PartOfSpeech::Verb);
    }

    #[test]
    fn test_skill_phrases_respect_word_boundaries() {
        let skills = model().find_skills("Machine Learning with PyTorch; learned Rustic cooking");
        assert_eq!(skills, vec!["machine learning".to_string(), "pytorch".to_string()]);
    }

    #[test]
    fn test_custom_skills_and_keyword_cap() {
        let m = KeywordModel::with_custom_skills(vec!["  Bevy ".to_string()])
            .unwrap()
            .with_max_keywords(2);
        assert!(m.skill_count() > default_skills().len());

        let enhanced = enhance(&m, "bevy engine, rendering pipeline and shaders");
        assert_eq!(enhanced.keywords.len(), 2);
        assert_eq!(enhanced.keywords[0], "bevy");
        assert!(enhanced.skills.contains(&"bevy".to_string()));
    }

    #[test]
    fn test_empty_text() {
        let enhanced = enhance(&model(), "   ");
        assert!(enhanced.corrected_text.is_empty());
        assert!(enhanced.keywords.is_empty());
    }

    #[test]
    fn test_common_nouns_survive_keyword_filtering() {
        let enhanced = enhance(
            &model(),
            "Designed a billing system for the front office. Led the fire safety detail.",
        );
        for noun in ["billing", "system", "front", "office", "fire", "safety", "detail"] {
            assert!(enhanced.keywords.iter().any(|k| k == noun), "missing keyword {noun}");
        }
        assert!(!enhanced.keywords.iter().any(|k| k == "the" || k == "for"));
    }
}

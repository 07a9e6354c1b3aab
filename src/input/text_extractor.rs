//! Text extraction from various file formats

use crate::error::{Result, RankerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| {
            RankerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })?;
        log::debug!("Extracted {} page(s) from {}", pages.len(), path.display());

        Ok(join_pages(&pages))
    }
}

/// Concatenate page texts in page order, each followed by a newline, then trim.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(page.as_ref());
        text.push('\n');
    }
    text.trim().to_string()
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Render Markdown and strip the markup, one non-empty line per block.
pub fn markdown_to_text(markdown: &str) -> String {
    static TAG_RE: OnceLock<Regex> = OnceLock::new();

    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    let text = html_output
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let re = TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
    let clean_text = re.replace_all(&text, "");

    clean_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_joined_in_order_and_trimmed() {
        let pages = vec!["  First page", "Second page", ""];
        assert_eq!(join_pages(&pages), "First page\nSecond page");
    }

    #[test]
    fn test_no_pages_yield_empty_text() {
        let pages: Vec<String> = Vec::new();
        assert!(join_pages(&pages).is_empty());
    }

    #[test]
    fn test_markdown_is_stripped() {
        let text = markdown_to_text("# Jane Roe\n\n**Skills**: Rust & Python\n\n- Kafka\n- Docker");
        assert!(text.contains("Jane Roe"));
        assert!(text.contains("Rust & Python"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
        assert!(!text.contains("<li>"));
    }
}

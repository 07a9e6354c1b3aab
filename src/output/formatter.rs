//! Output formatters: console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{Result, RankerError};
use crate::output::report::*;
use colored::{Color, Colorize};
use std::fmt::Write as _;

/// Trait for rendering reports in one output format
pub trait OutputFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String>;
    fn format_ranking(&self, report: &RankingReport) -> Result<String>;
    fn format_applicants(&self, report: &ApplicantReport) -> Result<String>;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
    precision: usize,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter {
    include_metadata: bool,
    precision: usize,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool, precision: usize) -> Self {
        Self {
            use_colors,
            detailed,
            precision,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.color(Color::Blue).bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn score_color(score: f32) -> Color {
        match score {
            s if s >= 0.5 => Color::Green,
            s if s >= 0.2 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn format_score(&self, score: f32) -> String {
        let text = format!("{:.*}", self.precision, score);
        self.colorize(&text, Self::score_color(score))
    }
}

fn fmt_err(e: std::fmt::Error) -> RankerError {
    RankerError::OutputFormatting(e.to_string())
}

impl OutputFormatter for ConsoleFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&self.format_header("Extracted Resume Text:"));
        let text = if self.detailed {
            report.extracted_text.clone()
        } else {
            truncate_text(&report.extracted_text, 600)
        };
        writeln!(out, "{}", text).map_err(fmt_err)?;

        out.push_str(&self.format_header("Enhanced Resume:"));
        let enhanced = if self.detailed {
            report.enhancement.corrected_text.clone()
        } else {
            truncate_text(&report.enhancement.corrected_text, 600)
        };
        writeln!(out, "{}", enhanced).map_err(fmt_err)?;
        writeln!(
            out,
            "{} {}",
            self.colorize("Extracted Keywords:", Color::Cyan),
            report.enhancement.keywords.join(", ")
        )
        .map_err(fmt_err)?;
        if !report.enhancement.skills.is_empty() {
            writeln!(
                out,
                "{} {}",
                self.colorize("Recognized Skills:", Color::Cyan),
                report.enhancement.skills.join(", ")
            )
            .map_err(fmt_err)?;
        }

        out.push_str(&self.format_header("Best Job Matches:"));
        for result in &report.job_matches {
            writeln!(out, "- {} (Match Score: {})", result.document, self.format_score(result.score))
                .map_err(fmt_err)?;
        }

        if let Some(query) = &report.candidate_query {
            out.push_str(&self.format_header("Candidate Matches:"));
            if self.detailed {
                writeln!(out, "Query: {}", query).map_err(fmt_err)?;
            }
            for result in &report.candidate_matches {
                writeln!(out, "- {} (Similarity: {})", result.document, self.format_score(result.score))
                    .map_err(fmt_err)?;
            }
        }

        if self.detailed {
            writeln!(
                out,
                "\nProcessing time: {}ms",
                report.metadata.processing_time_ms
            )
            .map_err(fmt_err)?;
        }

        Ok(out)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.format_header(&report.title));
        if self.detailed {
            writeln!(out, "Query: {}", truncate_text(&report.query, 200)).map_err(fmt_err)?;
        }
        for (position, result) in report.results.iter().enumerate() {
            writeln!(
                out,
                "{:>3}. {} (Similarity: {})",
                position + 1,
                report.label(result),
                self.format_score(result.score)
            )
            .map_err(fmt_err)?;
        }
        Ok(out)
    }

    fn format_applicants(&self, report: &ApplicantReport) -> Result<String> {
        let mut out = String::new();
        out.push_str(&self.format_header(&format!("Applicants for {}", report.job_title)));
        writeln!(
            out,
            "Strategy: {} | {} of {} application(s) shown",
            report.strategy,
            report.results.len(),
            report.total_applications
        )
        .map_err(fmt_err)?;

        for (position, scored) in report.results.iter().enumerate() {
            let percent = format!("{:.0}%", scored.match_score);
            writeln!(
                out,
                "{:>3}. {} (#{}) {}",
                position + 1,
                scored.application.name,
                scored.application.id,
                self.colorize(&percent, Self::score_color(scored.match_score / 100.0))
            )
            .map_err(fmt_err)?;
            if self.detailed {
                if let Some(skills) = &scored.application.skills {
                    writeln!(out, "     Skills: {}", skills).map_err(fmt_err)?;
                }
            }
        }
        Ok(out)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_applicants(&self, report: &ApplicantReport) -> Result<String> {
        self.to_json(report)
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool, precision: usize) -> Self {
        Self {
            include_metadata,
            precision,
        }
    }

    fn metadata_line(&self, metadata: &ReportMetadata) -> String {
        if !self.include_metadata {
            return String::new();
        }
        format!(
            "**Generated:** {} | **Processing Time:** {}ms\n\n",
            chrono::DateTime::<chrono::Utc>::from(metadata.generated_at).format("%Y-%m-%d %H:%M:%S UTC"),
            metadata.processing_time_ms
        )
    }

    fn escape_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, report: &AnalysisReport) -> Result<String> {
        let mut out = String::from("# Resume Analysis\n\n");
        out.push_str(&self.metadata_line(&report.metadata));
        writeln!(out, "**Resume:** `{}`\n", report.resume_file).map_err(fmt_err)?;

        out.push_str("## Keywords\n\n");
        writeln!(out, "{}\n", report.enhancement.keywords.join(", ")).map_err(fmt_err)?;
        if !report.enhancement.skills.is_empty() {
            writeln!(out, "**Recognized skills:** {}\n", report.enhancement.skills.join(", ")).map_err(fmt_err)?;
        }

        out.push_str("## Best Job Matches\n\n| Job | Match Score |\n|-----|-------------|\n");
        for result in &report.job_matches {
            writeln!(out, "| {} | {:.*} |", Self::escape_cell(&result.document), self.precision, result.score)
                .map_err(fmt_err)?;
        }

        if report.candidate_query.is_some() {
            out.push_str("\n## Candidate Matches\n\n| Candidate | Similarity |\n|-----------|------------|\n");
            for result in &report.candidate_matches {
                writeln!(out, "| {} | {:.*} |", Self::escape_cell(&result.document), self.precision, result.score)
                    .map_err(fmt_err)?;
            }
        }

        out.push_str("\n## Enhanced Resume\n\n```text\n");
        out.push_str(&report.enhancement.corrected_text);
        out.push_str("\n```\n");
        Ok(out)
    }

    fn format_ranking(&self, report: &RankingReport) -> Result<String> {
        let mut out = format!("# {}\n\n", report.title);
        out.push_str(&self.metadata_line(&report.metadata));
        writeln!(out, "**Query:** {}\n", Self::escape_cell(&truncate_text(&report.query, 200))).map_err(fmt_err)?;
        out.push_str("| Rank | Document | Similarity |\n|------|----------|------------|\n");
        for (position, result) in report.results.iter().enumerate() {
            writeln!(
                out,
                "| {} | {} | {:.*} |",
                position + 1,
                Self::escape_cell(report.label(result)),
                self.precision,
                result.score
            )
            .map_err(fmt_err)?;
        }
        Ok(out)
    }

    fn format_applicants(&self, report: &ApplicantReport) -> Result<String> {
        let mut out = format!("# Applicants for {}\n\n", report.job_title);
        out.push_str(&self.metadata_line(&report.metadata));
        writeln!(out, "**Strategy:** {}\n", report.strategy).map_err(fmt_err)?;
        out.push_str("| Rank | Applicant | Match |\n|------|-----------|-------|\n");
        for (position, scored) in report.results.iter().enumerate() {
            writeln!(
                out,
                "| {} | {} | {:.0}% |",
                position + 1,
                Self::escape_cell(&scored.application.name),
                scored.match_score
            )
            .map_err(fmt_err)?;
        }
        Ok(out)
    }
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ReportGenerator {
    pub fn new(use_colors: bool, detailed: bool, precision: usize) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed, precision),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true, precision),
        }
    }

    pub fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        }
    }
}

/// Truncate text to a maximum length with ellipsis, on a char boundary
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max_chars).collect();
    let cut = truncated.rfind(' ').unwrap_or(truncated.len());
    format!("{}...", &truncated[..cut])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::keywords::Enhancement;
    use crate::processing::ranker::RankedDocument;
    use std::time::SystemTime;

    fn analysis() -> AnalysisReport {
        AnalysisReport {
            resume_file: "cv.pdf".to_string(),
            extracted_text: "Python developer".to_string(),
            enhancement: Enhancement {
                corrected_text: "Python developer".to_string(),
                keywords: vec!["Python".to_string(), "developer".to_string()],
                skills: vec!["python".to_string()],
            },
            job_matches: vec![RankedDocument {
                index: 0,
                document: "Looking for a Python developer with AI experience.".to_string(),
                score: 0.4567,
            }],
            candidate_matches: vec![
                RankedDocument { index: 0, document: "AI Engineer skilled in Python".to_string(), score: 0.5 },
                RankedDocument { index: 1, document: "Frontend Developer".to_string(), score: 0.0 },
            ],
            candidate_query: Some("Looking for a Python developer with AI experience.".to_string()),
            metadata: ReportMetadata::new(SystemTime::now()),
        }
    }

    #[test]
    fn test_console_scores_use_two_decimals() {
        let output = ConsoleFormatter::new(false, false, 2).format_analysis(&analysis()).unwrap();
        assert!(output.contains("Match Score: 0.46)"));
        assert!(output.contains("- AI Engineer skilled in Python (Similarity: 0.50)"));
        assert!(output.contains("Extracted Keywords: Python, developer"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = JsonFormatter::new(false).format_analysis(&analysis()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["enhancement"]["keywords"][0], "Python");
        assert_eq!(value["candidate_matches"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_markdown_tables() {
        let output = MarkdownFormatter::new(false, 2).format_analysis(&analysis()).unwrap();
        assert!(output.contains("| Frontend Developer | 0.00 |"));
        assert!(!output.contains("**Generated:**"));
    }

    #[test]
    fn test_ranking_uses_labels() {
        let report = RankingReport {
            title: "Ranking".to_string(),
            query: "python".to_string(),
            labels: vec!["a.txt".to_string()],
            results: vec![RankedDocument { index: 0, document: "python things".to_string(), score: 1.0 }],
            metadata: ReportMetadata::new(SystemTime::now()),
        };
        let output = ReportGenerator::new(false, false, 2)
            .formatter(OutputFormat::Console)
            .format_ranking(&report)
            .unwrap();
        assert!(output.contains("1. a.txt (Similarity: 1.00)"));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("one two three", 8), "one two...");
        assert_eq!(truncate_text("äöüäöü", 3), "äöü...");
    }
}

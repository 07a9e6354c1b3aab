//! CLI interface for the resume ranker

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Resume keyword extraction and TF-IDF job/candidate ranking")]
#[command(long_about = "Extract text and keywords from a resume, then rank job descriptions and candidate profiles by TF-IDF cosine similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract, enhance and match a resume against jobs and candidates
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Job description files (TXT, MD); repeatable
        #[arg(short, long = "jobs")]
        jobs: Vec<PathBuf>,

        /// Inline job description text; repeatable
        #[arg(long = "job-text")]
        job_texts: Vec<String>,

        /// File with one candidate profile per line
        #[arg(long)]
        candidates: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Output format
        #[arg(short, long, value_enum)]
        output: Option<FormatArg>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank documents against a query
    Rank {
        /// Query text, or @path to read it from a file
        #[arg(short, long)]
        query: String,

        /// Candidate documents (PDF, TXT, MD)
        #[arg(required = true)]
        documents: Vec<PathBuf>,

        #[arg(short, long, value_enum)]
        output: Option<FormatArg>,

        /// Show only the best N documents
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Search candidate profiles for a job or free-text query
    Search {
        /// Job description or search text
        #[arg(short, long)]
        query: String,

        /// Candidate profile text; repeatable
        #[arg(short = 'C', long = "candidate", required = true)]
        candidates: Vec<String>,

        #[arg(short, long, value_enum)]
        output: Option<FormatArg>,
    },

    /// Score the applications submitted for a job
    Applicants {
        /// JSON file with a job and its applications
        #[arg(short, long)]
        input: PathBuf,

        /// JSON file with applicant filters
        #[arg(short, long)]
        filters: Option<PathBuf>,

        /// Comma-separated skill keywords an applicant must mention
        #[arg(long)]
        skills: Option<String>,

        #[arg(short, long, value_enum, default_value_t = Strategy::Rules)]
        strategy: Strategy,

        #[arg(short, long, value_enum)]
        output: Option<FormatArg>,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file path
    Path,

    /// Reset configuration to defaults
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Console,
    Json,
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for crate::config::OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Console => crate::config::OutputFormat::Console,
            FormatArg::Json => crate::config::OutputFormat::Json,
            FormatArg::Markdown => crate::config::OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Rule-based score over structured fields
    Rules,
    /// TF-IDF similarity of field-weighted text
    Tfidf,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Rules => "rules",
            Strategy::Tfidf => "tf-idf",
        }
    }
}

/// Split a candidates file into one profile per non-empty line
pub fn parse_candidate_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_analyze_arguments() {
        let cli = Cli::parse_from([
            "resume-ranker", "analyze", "--resume", "cv.pdf", "--job-text", "Rust dev", "-o", "md",
        ]);
        match cli.command {
            Commands::Analyze { resume, job_texts, output, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(job_texts, vec!["Rust dev".to_string()]);
                assert_eq!(output, Some(FormatArg::Markdown));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_candidate_lines() {
        let lines = parse_candidate_lines("# profiles\nAI Engineer\n\n  Frontend Developer  \n");
        assert_eq!(lines, vec!["AI Engineer".to_string(), "Frontend Developer".to_string()]);
    }
}

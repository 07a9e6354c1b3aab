//! resume-ranker: resume keyword extraction and TF-IDF job/candidate ranking

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction, FormatArg, Strategy};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::error::RankerError;
use resume_ranker::input::InputManager;
use resume_ranker::output::report::{AnalysisReport, ApplicantReport, RankingReport, ReportMetadata};
use resume_ranker::output::ReportGenerator;
use resume_ranker::processing::applicants::{find_best_matches, rank_applicants, ApplicantFilters, ApplicantPool};
use resume_ranker::processing::text_processor::TextProcessor;
use resume_ranker::processing::{enhance, KeywordModel, Ranker};
use std::path::{Path, PathBuf};
use std::process;
use std::time::SystemTime;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_or_create(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli, config, config_path).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(cli: Cli, config: Config, config_path: PathBuf) -> anyhow::Result<()> {
    let use_colors = config.output.color_output && !cli.no_color;
    let precision = config.output.score_precision;

    match cli.command {
        Commands::Analyze {
            resume,
            jobs,
            job_texts,
            candidates,
            detailed,
            output,
            save,
        } => {
            let started = SystemTime::now();
            info!("Starting resume analysis");

            let mut input_manager = InputManager::new();

            // Step 1: extract text
            let resume_text = input_manager
                .extract_text(&resume)
                .await
                .with_context(|| format!("Failed to read resume {}", resume.display()))?;
            info!("Extracted {} characters from resume", resume_text.chars().count());

            // Step 2: normalize and extract keywords
            let model = KeywordModel::with_custom_skills(config.keywords.extra_skills.clone())?
                .with_max_keywords(config.keywords.max_keywords);
            let cleaned = TextProcessor::default().clean_text(&resume_text);
            let enhancement = enhance(&model, &cleaned);

            // Step 3: rank job descriptions against the normalized resume
            let mut job_descriptions = job_texts;
            for path in &jobs {
                let text = input_manager
                    .extract_text(path)
                    .await
                    .with_context(|| format!("Failed to read job description {}", path.display()))?;
                job_descriptions.push(text);
            }
            if job_descriptions.is_empty() {
                warn!("No job descriptions given; using the sample job description");
                job_descriptions = config.demo.job_descriptions.clone();
            }

            let ranker = Ranker::from_config(&config.ranking);
            let job_matches = ranker.shortlist(ranker.best_jobs(&enhancement.corrected_text, &job_descriptions)?);

            // Step 4: search candidate profiles with the first job description
            let candidate_profiles = match &candidates {
                Some(path) => {
                    let content = tokio::fs::read_to_string(path)
                        .await
                        .with_context(|| format!("Failed to read candidates {}", path.display()))?;
                    cli::parse_candidate_lines(&content)
                }
                None => config.demo.candidates.clone(),
            };
            let candidate_query = job_descriptions.first().cloned();
            let candidate_matches = match &candidate_query {
                Some(query) if !candidate_profiles.is_empty() => {
                    ranker.shortlist(ranker.search_candidates(query, &candidate_profiles)?)
                }
                _ => Vec::new(),
            };

            let report = AnalysisReport {
                resume_file: resume.display().to_string(),
                extracted_text: resume_text,
                enhancement,
                job_matches,
                candidate_matches,
                candidate_query,
                metadata: ReportMetadata::new(started),
            };

            let format = resolve_format(output, &config);
            let generator = ReportGenerator::new(use_colors && save.is_none(), detailed || config.output.detailed, precision);
            let rendered = generator.formatter(format).format_analysis(&report)?;
            emit(&rendered, save.as_deref())?;
        }

        Commands::Rank {
            query,
            documents,
            output,
            top,
        } => {
            let started = SystemTime::now();
            let mut input_manager = InputManager::new();

            let query_text = if query.starts_with('@') {
                input_manager.extract_text(Path::new(&query[1..])).await?
            } else {
                query
            };

            let mut texts = Vec::with_capacity(documents.len());
            for path in &documents {
                texts.push(input_manager.extract_text(path).await?);
            }

            let mut ranker = Ranker::from_config(&config.ranking);
            if let Some(n) = top {
                ranker = ranker.with_top_n(n);
            }
            let results = ranker.shortlist(ranker.rank(&texts, &query_text)?);

            let report = RankingReport {
                title: "Document Ranking".to_string(),
                query: query_text,
                labels: documents.iter().map(|p| p.display().to_string()).collect(),
                results,
                metadata: ReportMetadata::new(started),
            };
            let generator = ReportGenerator::new(use_colors, config.output.detailed, precision);
            let rendered = generator.formatter(resolve_format(output, &config)).format_ranking(&report)?;
            emit(&rendered, None)?;
        }

        Commands::Search {
            query,
            candidates,
            output,
        } => {
            let started = SystemTime::now();
            let ranker = Ranker::from_config(&config.ranking);
            let results = ranker.shortlist(ranker.search_candidates(&query, &candidates)?);

            let report = RankingReport {
                title: "Candidate Matches".to_string(),
                query,
                labels: candidates,
                results,
                metadata: ReportMetadata::new(started),
            };
            let generator = ReportGenerator::new(use_colors, config.output.detailed, precision);
            let rendered = generator.formatter(resolve_format(output, &config)).format_ranking(&report)?;
            emit(&rendered, None)?;
        }

        Commands::Applicants {
            input,
            filters,
            skills,
            strategy,
            output,
        } => {
            let started = SystemTime::now();
            let pool = ApplicantPool::load(&input)
                .with_context(|| format!("Failed to load applicants from {}", input.display()))?;

            let mut applicant_filters = match &filters {
                Some(path) => ApplicantFilters::load(path)
                    .with_context(|| format!("Failed to load filters from {}", path.display()))?,
                None => ApplicantFilters::default(),
            };
            if let Some(keywords) = &skills {
                applicant_filters = applicant_filters.with_skill_keywords(keywords);
            }

            let results = match strategy {
                Strategy::Rules => find_best_matches(&pool.job, &pool.applications, &applicant_filters),
                Strategy::Tfidf => {
                    let ranker = Ranker::from_config(&config.ranking);
                    rank_applicants(&ranker, &pool.job, &pool.applications, &applicant_filters)?
                }
            };
            info!("{} of {} application(s) passed the filters", results.len(), pool.applications.len());

            let report = ApplicantReport {
                job_title: pool.job.title.clone(),
                strategy: strategy.name().to_string(),
                total_applications: pool.applications.len(),
                results,
                metadata: ReportMetadata::new(started),
            };
            let generator = ReportGenerator::new(use_colors, config.output.detailed, precision);
            let rendered = generator.formatter(resolve_format(output, &config)).format_applicants(&report)?;
            emit(&rendered, None)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config)
                    .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;
                println!("# {}\n{}", config_path.display(), content);
            }
            Some(ConfigAction::Path) => {
                println!("{}", config_path.display());
            }
            Some(ConfigAction::Reset) => {
                Config::default().save_to(&config_path)?;
                println!("Configuration reset: {}", config_path.display());
            }
        },
    }

    Ok(())
}

fn resolve_format(requested: Option<FormatArg>, config: &Config) -> OutputFormat {
    requested.map(OutputFormat::from).unwrap_or(config.output.format)
}

fn emit(rendered: &str, save: Option<&Path>) -> anyhow::Result<()> {
    match save {
        Some(path) => {
            std::fs::write(path, rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

//! Matching job applications to a job posting
//!
//! Two strategies share the same inputs: a rule-based score out of 100 over
//! structured fields, and TF-IDF ranking of field-weighted text renderings.

use crate::error::{Result, RankerError};
use crate::processing::ranker::Ranker;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

static LANGUAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Language:\s*(A[12]|B[12]|C[12])").expect("Invalid language regex"));

const LANGUAGE_LEVELS: [&str; 6] = ["A1", "A2", "B1", "B2", "C1", "C2"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub salary: Option<String>,
    pub job_type: String,
    #[serde(default)]
    pub requirements: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub cover_letter: Option<String>,
    pub german_proficiency: String,
    pub visa_status: String,
    #[serde(default)]
    pub preferred_location: Option<String>,
    #[serde(default)]
    pub preferred_job_type: Option<String>,
    #[serde(default)]
    pub can_join_immediately: bool,
    #[serde(default)]
    pub notice_period: Option<String>,
    /// Years of experience
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub education: Option<String>,
    /// Comma-separated skill list
    #[serde(default)]
    pub skills: Option<String>,
}

/// A job with the applications submitted for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantPool {
    pub job: Job,
    pub applications: Vec<Application>,
}

impl ApplicantPool {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisaRequirement {
    #[serde(rename = "No Visa Required")]
    NoVisaRequired,
    #[serde(rename = "Sponsored Visa")]
    SponsoredVisa,
    #[serde(rename = "Visa Required")]
    VisaRequired,
}

/// Optional constraints; `None` (or "any") leaves a field unconstrained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicantFilters {
    pub german_proficiency: Option<String>,
    pub visa_status: Option<String>,
    pub education: Option<String>,
    pub skill_keywords: Vec<String>,
    pub min_experience: Option<u32>,
    pub max_experience: Option<u32>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub max_notice_period: Option<String>,
    pub visa_requirement: Option<VisaRequirement>,
    pub immediate_joining: bool,
}

impl ApplicantFilters {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Skill keywords from a comma-separated string
    pub fn with_skill_keywords(mut self, keywords: &str) -> Self {
        self.skill_keywords = keywords
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    pub fn matches(&self, app: &Application) -> bool {
        if let Some(level) = constrained(&self.german_proficiency) {
            if app.german_proficiency != level {
                return false;
            }
        }
        if let Some(visa) = constrained(&self.visa_status) {
            if app.visa_status != visa {
                return false;
            }
        }
        // Applications missing the field pass the filter
        if let (Some(education), Some(app_education)) = (constrained(&self.education), &app.education) {
            if app_education != education {
                return false;
            }
        }
        if let (Some(min), Some(years)) = (self.min_experience, app.experience) {
            if years < min {
                return false;
            }
        }
        if let (Some(max), Some(years)) = (self.max_experience, app.experience) {
            if years > max {
                return false;
            }
        }
        if let (Some(location), Some(preferred)) = (constrained(&self.location), &app.preferred_location) {
            if preferred != location {
                return false;
            }
        }
        if let (Some(job_type), Some(preferred)) = (constrained(&self.job_type), &app.preferred_job_type) {
            if preferred != job_type {
                return false;
            }
        }
        if let (Some(max_notice), false, Some(notice)) = (
            constrained(&self.max_notice_period),
            app.can_join_immediately,
            &app.notice_period,
        ) {
            if notice_period_days(notice) > notice_period_days(max_notice) {
                return false;
            }
        }
        if !self.skill_keywords.is_empty() {
            let cover_letter = app.cover_letter.as_deref().unwrap_or_default().to_lowercase();
            let skills = app.skills.as_deref().unwrap_or_default().to_lowercase();
            let has_any = self
                .skill_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .any(|k| cover_letter.contains(&k) || skills.contains(&k));
            if !has_any {
                return false;
            }
        }
        if let Some(requirement) = self.visa_requirement {
            let required_status = match requirement {
                VisaRequirement::NoVisaRequired => "EU Citizen",
                VisaRequirement::SponsoredVisa => "Need Sponsorship",
                VisaRequirement::VisaRequired => "Have Work Permit",
            };
            if app.visa_status != required_status {
                return false;
            }
        }
        if self.immediate_joining && !app.can_join_immediately {
            return false;
        }
        true
    }
}

fn constrained(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("any"))
}

/// Approximate days for the notice periods offered in application forms;
/// unknown values sort last.
fn notice_period_days(period: &str) -> u32 {
    match period.trim().to_lowercase().as_str() {
        "2 weeks" => 14,
        "1 month" => 30,
        "2 months" => 60,
        "3 months" => 90,
        "more than 3 months" => 100,
        _ => 1000,
    }
}

pub fn apply_filters<'a>(applications: &'a [Application], filters: &ApplicantFilters) -> Vec<&'a Application> {
    applications.iter().filter(|app| filters.matches(app)).collect()
}

/// Required CEFR level from a `Language: B2` marker in the requirements
pub fn required_language_level(job: &Job) -> Option<&'static str> {
    let requirements = job.requirements.as_deref()?;
    let level = LANGUAGE_RE.captures(requirements)?.get(1)?.as_str();
    LANGUAGE_LEVELS.iter().copied().find(|l| *l == level)
}

fn language_rank(level: &str) -> Option<usize> {
    LANGUAGE_LEVELS.iter().position(|l| l.eq_ignore_ascii_case(level.trim()))
}

fn split_skills(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Rule-based fit score out of 100
///
/// Job type 20, location 20, requirement coverage by skills up to 30,
/// language level 15, visa 15.
pub fn match_score(job: &Job, app: &Application) -> u8 {
    let mut score = 0.0f32;

    if app.preferred_job_type.as_deref() == Some(job.job_type.as_str()) {
        score += 20.0;
    }

    if app
        .preferred_location
        .as_deref()
        .is_some_and(|preferred| preferred.contains(job.location.as_str()))
    {
        score += 20.0;
    }

    if let (Some(requirements), Some(skills)) = (&job.requirements, &app.skills) {
        let job_terms = split_skills(requirements);
        let candidate_terms: HashSet<String> = split_skills(skills).into_iter().collect();
        if !job_terms.is_empty() {
            let matching = job_terms.iter().filter(|t| candidate_terms.contains(*t)).count();
            score += (matching as f32 / job_terms.len() as f32 * 30.0).min(30.0);
        }
    }

    let required = required_language_level(job).unwrap_or("A1");
    if let (Some(have), Some(need)) = (language_rank(&app.german_proficiency), language_rank(required)) {
        if have >= need {
            score += 15.0;
        }
    }

    let visa_required = job
        .requirements
        .as_deref()
        .is_some_and(|r| r.to_lowercase().contains("visa required"));
    if !visa_required || app.visa_status == "EU Citizen" || app.visa_status == "Have Work Permit" {
        score += 15.0;
    }

    score.min(100.0).round() as u8
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredApplication {
    pub application: Application,
    /// 0-100
    pub match_score: f32,
}

/// Filter, score with the rules, and sort best first (ties keep input order)
pub fn find_best_matches(job: &Job, applications: &[Application], filters: &ApplicantFilters) -> Vec<ScoredApplication> {
    let mut scored: Vec<ScoredApplication> = apply_filters(applications, filters)
        .into_iter()
        .map(|app| ScoredApplication {
            application: app.clone(),
            match_score: f32::from(match_score(job, app)),
        })
        .collect();

    scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    scored
}

/// Filter, then rank by TF-IDF similarity between the weighted renderings;
/// scores are scaled to 0-100.
pub fn rank_applicants(
    ranker: &Ranker,
    job: &Job,
    applications: &[Application],
    filters: &ApplicantFilters,
) -> Result<Vec<ScoredApplication>> {
    let kept = apply_filters(applications, filters);
    if kept.is_empty() {
        return Err(RankerError::InvalidInput(
            "No applications left to rank after filtering".to_string(),
        ));
    }

    let documents: Vec<String> = kept.iter().map(|app| application_document(app)).collect();
    let ranked = ranker.rank(&documents, &job_document(job))?;

    Ok(ranked
        .into_iter()
        .map(|r| ScoredApplication {
            application: kept[r.index].clone(),
            match_score: r.score * 100.0,
        })
        .collect())
}

/// Lowercased job text with the title, requirements, type and location repeated
pub fn job_document(job: &Job) -> String {
    let requirements = job.requirements.as_deref().unwrap_or_default();
    [
        repeat(&job.title, 4),
        repeat(requirements, 3),
        repeat(&job.location, 2),
        repeat(&job.job_type, 3),
        job.description.clone(),
        job.salary.clone().unwrap_or_default(),
    ]
    .join(" | ")
    .to_lowercase()
}

/// Lowercased application text with the fields that matter most repeated
pub fn application_document(app: &Application) -> String {
    let optional = |field: &Option<String>, times: usize| repeat(field.as_deref().unwrap_or_default(), times);

    let experience = app
        .experience
        .map(|years| repeat(&format!("{} years experience", years), 2))
        .unwrap_or_default();
    let availability = if app.can_join_immediately {
        repeat("available immediately available now ready to start", 2)
    } else {
        app.notice_period.clone().unwrap_or_default()
    };

    [
        repeat(&app.german_proficiency, 3),
        repeat(&app.visa_status, 3),
        optional(&app.cover_letter, 2),
        optional(&app.preferred_location, 2),
        optional(&app.preferred_job_type, 2),
        experience,
        optional(&app.education, 2),
        optional(&app.skills, 3),
        availability,
        app.name.clone(),
    ]
    .join(" ")
    .to_lowercase()
}

fn repeat(text: &str, times: usize) -> String {
    vec![text.trim(); times].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> Job {
        Job {
            id: 1,
            title: "Backend Engineer".to_string(),
            description: "Build data pipelines in Python".to_string(),
            location: "Berlin".to_string(),
            salary: None,
            job_type: "full-time".to_string(),
            requirements: Some("python, sql, docker. Language: B2. Visa required".to_string()),
        }
    }

    fn application(id: u64) -> Application {
        Application {
            id,
            name: format!("Applicant {}", id),
            cover_letter: None,
            german_proficiency: "C1".to_string(),
            visa_status: "EU Citizen".to_string(),
            preferred_location: Some("Berlin, Munich".to_string()),
            preferred_job_type: Some("full-time".to_string()),
            can_join_immediately: false,
            notice_period: Some("1 month".to_string()),
            experience: Some(4),
            education: Some("Master".to_string()),
            skills: Some("Python, SQL, Docker".to_string()),
        }
    }

    #[test]
    fn test_language_level_is_parsed() {
        assert_eq!(required_language_level(&job()), Some("B2"));
        let mut no_marker = job();
        no_marker.requirements = None;
        assert_eq!(required_language_level(&no_marker), None);
    }

    #[test]
    fn test_language_level_after_non_ascii_text() {
        let mut job = job();
        job.requirements = Some("İİ office. Language: C1".to_string());
        assert_eq!(required_language_level(&job), Some("C1"));

        job.requirements = Some("Straße, Zürich. Language:B2, visa required".to_string());
        assert_eq!(required_language_level(&job), Some("B2"));

        job.requirements = Some("Language: D4".to_string());
        assert_eq!(required_language_level(&job), None);
    }

    #[test]
    fn test_full_match_scores_rules() {
        // Requirement terms: "python" "sql" "docker." "language:" "b2." "visa" "required"
        // of which 2 match the skills exactly -> 2/7 * 30
        let score = match_score(&job(), &application(1));
        let expected = (20.0 + 20.0 + 2.0 / 7.0 * 30.0 + 15.0 + 15.0f32).round() as u8;
        assert_eq!(score, expected);
    }

    #[test]
    fn test_low_language_and_visa_lose_points() {
        let mut app = application(2);
        app.german_proficiency = "A2".to_string();
        app.visa_status = "Need Sponsorship".to_string();
        app.preferred_location = Some("Hamburg".to_string());
        app.preferred_job_type = Some("contract".to_string());
        app.skills = None;
        assert_eq!(match_score(&job(), &app), 0);
    }

    #[test]
    fn test_filters() {
        let mut junior = application(2);
        junior.experience = Some(1);
        let mut late = application(3);
        late.notice_period = Some("3 months".to_string());
        let apps = vec![application(1), junior, late];

        let filters = ApplicantFilters {
            min_experience: Some(2),
            max_notice_period: Some("2 months".to_string()),
            ..ApplicantFilters::default()
        };
        let kept: Vec<u64> = apply_filters(&apps, &filters).iter().map(|a| a.id).collect();
        assert_eq!(kept, vec![1]);

        let any = ApplicantFilters {
            german_proficiency: Some("any".to_string()),
            ..ApplicantFilters::default()
        };
        assert_eq!(apply_filters(&apps, &any).len(), 3);
    }

    #[test]
    fn test_skill_keyword_filter() {
        let mut frontend = application(2);
        frontend.skills = Some("React, CSS".to_string());
        let apps = vec![application(1), frontend];

        let filters = ApplicantFilters::default().with_skill_keywords("docker, kubernetes");
        let kept: Vec<u64> = apply_filters(&apps, &filters).iter().map(|a| a.id).collect();
        assert_eq!(kept, vec![1]);
    }

    #[test]
    fn test_best_matches_are_sorted() {
        let mut weak = application(1);
        weak.preferred_location = None;
        let apps = vec![weak, application(2)];

        let matches = find_best_matches(&job(), &apps, &ApplicantFilters::default());
        assert_eq!(matches[0].application.id, 2);
        assert!(matches[0].match_score > matches[1].match_score);
    }

    #[test]
    fn test_weighted_documents() {
        let doc = job_document(&job());
        assert_eq!(doc.matches("backend engineer").count(), 4);
        assert!(doc.contains("berlin berlin"));
        assert!(!doc.contains("berlinberlin"));

        let mut app = application(1);
        app.can_join_immediately = true;
        let doc = application_document(&app);
        assert_eq!(doc.matches("python, sql, docker").count(), 3);
        assert!(doc.contains("available immediately"));
        assert!(!doc.contains("1 month"));
    }

    #[test]
    fn test_tfidf_strategy_prefers_matching_skills() {
        let mut frontend = application(2);
        frontend.skills = Some("React, CSS, Figma".to_string());
        let apps = vec![frontend, application(1)];

        let ranked = rank_applicants(&Ranker::default(), &job(), &apps, &ApplicantFilters::default()).unwrap();
        assert_eq!(ranked[0].application.id, 1);
        assert!(ranked.iter().all(|r| (0.0..=100.0).contains(&r.match_score)));
    }

    #[test]
    fn test_tfidf_strategy_rejects_empty_pool() {
        let err = rank_applicants(&Ranker::default(), &job(), &[], &ApplicantFilters::default()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_pool_deserializes_camel_case() {
        let json = r#"{
            "job": {"id": 7, "title": "Data Scientist", "description": "ML", "location": "Berlin",
                    "jobType": "remote"},
            "applications": [{"id": 1, "name": "Ana", "germanProficiency": "B1",
                              "visaStatus": "EU Citizen", "canJoinImmediately": true}]
        }"#;
        let pool: ApplicantPool = serde_json::from_str(json).unwrap();
        assert_eq!(pool.job.job_type, "remote");
        assert!(pool.applications[0].can_join_immediately);
        assert_eq!(pool.applications[0].skills, None);
    }
}

//! Job description analysis behind a pluggable, trait-based analyzer.
//!
//! Default: `LlmJobAnalyzer` (Claude via `llm_client`).
//! Callers never see analyzer failures: `analyze_with_fallback` turns every
//! error or timeout into one of the static `Fallback` analyses.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::prompts::{build_analyze_prompt, ANALYZE_SYSTEM};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

/// Summary plus exactly three skills to highlight. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub summary: String,
    pub suggested_skills: [String; 3],
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no LLM API key configured")]
    Unconfigured,

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("malformed analysis: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait JobAnalyzer: Send + Sync {
    async fn analyze(&self, job_description: &str) -> Result<JobAnalysis, AnalysisError>;
}

/// Analyzer backed by the LLM. Without a client every call is `Unconfigured`.
pub struct LlmJobAnalyzer {
    llm: Option<LlmClient>,
}

impl LlmJobAnalyzer {
    pub fn new(llm: Option<LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobAnalyzer for LlmJobAnalyzer {
    async fn analyze(&self, job_description: &str) -> Result<JobAnalysis, AnalysisError> {
        let llm = self.llm.as_ref().ok_or(AnalysisError::Unconfigured)?;
        let system = format!("{ANALYZE_SYSTEM} {JSON_ONLY_SYSTEM}");
        let raw: RawAnalysis = llm
            .call_json(&build_analyze_prompt(job_description), &system)
            .await?;
        raw.normalize()
    }
}

/// Analysis as the model returns it, before shape checks.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    #[serde(default)]
    summary: String,
    #[serde(default, alias = "suggested_skills")]
    suggested_skills: Vec<String>,
}

impl RawAnalysis {
    /// Requires a summary and at least three non-blank skills; extra skills are dropped.
    fn normalize(self) -> Result<JobAnalysis, AnalysisError> {
        let summary = self.summary.trim().to_string();
        if summary.is_empty() {
            return Err(AnalysisError::Malformed("empty summary".to_string()));
        }

        let skills: Vec<String> = self
            .suggested_skills
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .take(3)
            .map(str::to_string)
            .collect();
        let count = skills.len();
        let suggested_skills: [String; 3] = skills.try_into().map_err(|_| {
            AnalysisError::Malformed(format!("expected 3 suggested skills, got {count}"))
        })?;

        Ok(JobAnalysis {
            summary,
            suggested_skills,
        })
    }
}

/// Static analyses served when the real one cannot be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Unconfigured,
    Unparseable,
    Unavailable,
}

impl Fallback {
    pub fn for_error(err: &AnalysisError) -> Self {
        match err {
            AnalysisError::Unconfigured => Fallback::Unconfigured,
            AnalysisError::Malformed(_) | AnalysisError::Llm(LlmError::Parse(_)) => {
                Fallback::Unparseable
            }
            AnalysisError::Llm(_) => Fallback::Unavailable,
        }
    }

    pub fn analysis(self) -> JobAnalysis {
        let (summary, skills) = match self {
            Fallback::Unconfigured => (
                "Job analysis unavailable: no LLM API key is configured. With a key set, \
                 this would summarize the role, its responsibilities and its requirements.",
                [
                    "Technical skills relevant to the role",
                    "Communication and teamwork abilities",
                    "Problem-solving and analytical thinking",
                ],
            ),
            Fallback::Unparseable => (
                "Unable to read the AI response for this job description. \
                 Please try again or review the description manually.",
                [
                    "Relevant technical skills",
                    "Communication abilities",
                    "Problem-solving skills",
                ],
            ),
            Fallback::Unavailable => (
                "AI analysis is temporarily unavailable. Please try again later \
                 or review the job description manually.",
                [
                    "Core technical requirements from the job posting",
                    "Soft skills mentioned in the description",
                    "Industry-specific expertise",
                ],
            ),
        };

        JobAnalysis {
            summary: summary.to_string(),
            suggested_skills: skills.map(str::to_string),
        }
    }
}

/// Runs the analyzer under `timeout`, substituting a fallback on any failure.
pub async fn analyze_with_fallback(
    analyzer: &dyn JobAnalyzer,
    job_description: &str,
    timeout: Duration,
) -> JobAnalysis {
    match tokio::time::timeout(timeout, analyzer.analyze(job_description)).await {
        Ok(Ok(analysis)) => analysis,
        Ok(Err(AnalysisError::Unconfigured)) => {
            debug!("Job analysis requested without an LLM API key");
            Fallback::Unconfigured.analysis()
        }
        Ok(Err(e)) => {
            let fallback = Fallback::for_error(&e);
            warn!("Job analysis failed, serving {fallback:?} fallback: {e}");
            fallback.analysis()
        }
        Err(_) => {
            warn!(
                "Job analysis timed out after {}ms, serving Unavailable fallback",
                timeout.as_millis()
            );
            Fallback::Unavailable.analysis()
        }
    }
}

//! Report Service — orchestrates the report pipeline.
//!
//! Flow: build prompt → LLM gateway → normalize/validate → return.
//!
//! Nothing is cached or persisted. A request yields one complete validated
//! value or one classified error; failures are never downgraded to defaults.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{GatewayError, LlmGateway};
use crate::models::report::{AnalysisReport, DepartmentList};
use crate::models::survey::SurveyInput;
use crate::report::normalizer::{normalize_departments, normalize_report, NormalizeError};
use crate::report::prompt_builder::{build_departments_prompt, build_roi_prompt, prompt_summary};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ReportError {
    /// Timeouts, outages and unparseable replies may succeed on another attempt.
    /// Rejections and schema mismatches are surfaced immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_retryable(),
            Self::Normalize(NormalizeError::MalformedOutput { .. }) => true,
            Self::Normalize(NormalizeError::SchemaMismatch { .. }) => false,
        }
    }
}

/// Bounded retry for retryable failures. The default is a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff: base, 2×base, 4×base, ...
    fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }
}

#[derive(Clone)]
pub struct ReportService {
    llm: Arc<dyn LlmGateway>,
    retry: RetryPolicy,
}

impl ReportService {
    pub fn new(llm: Arc<dyn LlmGateway>, retry: RetryPolicy) -> Self {
        Self {
            llm,
            retry: RetryPolicy {
                max_attempts: retry.max_attempts.max(1),
                ..retry
            },
        }
    }

    /// Builds the ROI prompt, calls the model and returns a validated report.
    pub async fn calculate_roi(&self, input: &SurveyInput) -> Result<AnalysisReport, ReportError> {
        info!("Processing GenFox report for department {:?}", input.department);
        let prompt = build_roi_prompt(input);

        self.run(&prompt, |llm, prompt| async move {
            let raw = llm.generate_report(&prompt).await?;
            Ok::<_, ReportError>(normalize_report(&raw)?)
        })
        .await
    }

    /// Derives candidate department names for an industry.
    pub async fn generate_departments(&self, industry: &str) -> Result<DepartmentList, ReportError> {
        info!("Generating departments for industry {:?}", industry);
        let prompt = build_departments_prompt(industry);

        let list = self
            .run(&prompt, |llm, prompt| async move {
                let raw = llm.generate_name_list(&prompt).await?;
                Ok::<_, ReportError>(normalize_departments(&raw)?)
            })
            .await?;

        if !(5..=8).contains(&list.departments.len()) {
            warn!(
                "Model returned {} departments (5-8 expected)",
                list.departments.len()
            );
        }
        Ok(list)
    }

    /// Runs one pipeline attempt per allowed try, backing off between
    /// retryable failures.
    async fn run<T, F, Fut>(&self, prompt: &str, attempt_once: F) -> Result<T, ReportError>
    where
        F: Fn(Arc<dyn LlmGateway>, String) -> Fut,
        Fut: std::future::Future<Output = Result<T, ReportError>>,
    {
        info!("Sending prompt ({})", prompt_summary(prompt));
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = self.retry.delay_before(attempt);
                tokio::time::sleep(delay).await;
            }
            attempt += 1;

            match attempt_once(self.llm.clone(), prompt.to_string()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.retry.max_attempts => {
                    warn!(
                        "Report attempt {}/{} failed, retrying: {e}",
                        attempt, self.retry.max_attempts
                    );
                }
                Err(e) => {
                    warn!("Report pipeline failed after {attempt} attempt(s): {e}");
                    return Err(e);
                }
            }
        }
    }
}

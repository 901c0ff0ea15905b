// engine/types.rs — Core types for the optimization pipeline

use serde::{Deserialize, Serialize};

/// Hard cap on the per-request output token budget.
pub const MAX_OUTPUT_TOKEN_CAP: u32 = 2048;

/// Default output token budget when the caller does not pick one.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 512;

/// Style tag substituted into the optimization template. Purely cosmetic:
/// it changes the template text, never the control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleOption {
    Creative,
    StepByStep,
    Structured,
}

impl StyleOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleOption::Creative => "creative",
            StyleOption::StepByStep => "step-by-step",
            StyleOption::Structured => "structured",
        }
    }
}

impl std::str::FromStr for StyleOption {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "creative" => Ok(StyleOption::Creative),
            "step-by-step" | "step_by_step" => Ok(StyleOption::StepByStep),
            "structured" => Ok(StyleOption::Structured),
            other => Err(PipelineError::UnknownStyle(other.to_string())),
        }
    }
}

/// One validated optimization request. Validation happens here, before any
/// template is built or provider is called; the value is immutable after.
#[derive(Debug, Clone)]
pub struct OptimizationRequest {
    task: String,
    style: StyleOption,
    max_output_tokens: u32,
}

impl OptimizationRequest {
    pub fn new(
        task: &str,
        style: StyleOption,
        max_output_tokens: u32,
    ) -> Result<Self, PipelineError> {
        let trimmed = task.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyTask);
        }
        if max_output_tokens == 0 || max_output_tokens > MAX_OUTPUT_TOKEN_CAP {
            return Err(PipelineError::InvalidTokenBudget {
                requested: max_output_tokens,
            });
        }

        Ok(Self {
            task: trimmed.to_string(),
            style,
            max_output_tokens,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn style(&self) -> StyleOption {
        self.style
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }
}

/// Outcome of exactly one provider call. Fallback and escalation decisions
/// branch on this tag only, never on the response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderResult {
    Success { text: String },
    /// Credential missing; detected before any network call.
    Unavailable { reason: String },
    /// Transport, auth or vendor failure caught during the call.
    Error { message: String },
}

impl ProviderResult {
    /// Transport and vendor errors may be retried; a missing credential
    /// never is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderResult::Error { .. })
    }
}

/// Orchestrator outcome. `provider` is `None` when every provider failed
/// and `text` carries the synthesized diagnostic instead of a completion.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub provider: Option<String>,
}

impl Completion {
    pub fn is_success(&self) -> bool {
        self.provider.is_some()
    }
}

/// One executed subtask: the routed label stays display metadata, `text` is
/// what the actually-configured provider returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtaskResult {
    pub subtask: String,
    pub provider_label: String,
    pub text: String,
}

/// Pipeline errors. Provider-side failures never surface here; they are
/// normalized into `ProviderResult` at the adapter boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Task is empty")]
    EmptyTask,

    #[error("Max output tokens out of range: {requested} (allowed 1..=2048)")]
    InvalidTokenBudget { requested: u32 },

    #[error("Unknown style: {0}")]
    UnknownStyle(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_task() {
        let result = OptimizationRequest::new("", StyleOption::Creative, 512);
        assert!(matches!(result, Err(PipelineError::EmptyTask)));
    }

    #[test]
    fn rejects_whitespace_only_task() {
        let result = OptimizationRequest::new("   \n\t", StyleOption::Structured, 512);
        assert!(matches!(result, Err(PipelineError::EmptyTask)));
    }

    #[test]
    fn rejects_zero_token_budget() {
        let result = OptimizationRequest::new("summarize", StyleOption::Structured, 0);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidTokenBudget { requested: 0 })
        ));
    }

    #[test]
    fn rejects_budget_above_cap() {
        let result = OptimizationRequest::new("summarize", StyleOption::Structured, 4096);
        assert!(matches!(
            result,
            Err(PipelineError::InvalidTokenBudget { requested: 4096 })
        ));
    }

    #[test]
    fn accepts_valid_request() {
        let request =
            OptimizationRequest::new("Summarize the report", StyleOption::StepByStep, 512)
                .expect("valid request");
        assert_eq!(request.task(), "Summarize the report");
        assert_eq!(request.style(), StyleOption::StepByStep);
        assert_eq!(request.max_output_tokens(), 512);
    }

    #[test]
    fn style_parses_case_insensitively() {
        assert_eq!(
            "Step-By-Step".parse::<StyleOption>().unwrap(),
            StyleOption::StepByStep
        );
        assert!("haiku".parse::<StyleOption>().is_err());
    }
}

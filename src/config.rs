// config.rs — Pipeline settings

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_ESCALATION_THRESHOLD: f64 = 7.0;
pub const DEFAULT_SUBTASK_CONCURRENCY: usize = 4;
pub const DEFAULT_ESCALATION_PROVIDER: &str = "openai";

/// Knobs for one pipeline instance. Serde defaults so a partial config
/// still yields a usable value set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Sampling temperature forwarded to the providers.
    pub temperature: f32,

    /// Score the draft with the quality judge after optimization.
    pub judge_quality: bool,

    /// Re-run flagged drafts against the escalation provider.
    pub escalate_on_low_quality: bool,

    /// Escalate when any judged criterion scores below this.
    pub escalation_threshold: f64,

    /// Provider id used for escalation.
    pub escalation_provider: String,

    /// Upper bound on concurrent subtask calls during decomposition runs.
    pub subtask_concurrency: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            judge_quality: true,
            escalate_on_low_quality: false,
            escalation_threshold: DEFAULT_ESCALATION_THRESHOLD,
            escalation_provider: DEFAULT_ESCALATION_PROVIDER.to_string(),
            subtask_concurrency: DEFAULT_SUBTASK_CONCURRENCY,
        }
    }
}

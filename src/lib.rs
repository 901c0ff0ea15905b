mod config;
mod engine;
mod history;
mod orchestrator;
mod report;
mod session;

pub use config::Settings;
pub use engine::types::{
    Completion, OptimizationRequest, PipelineError, ProviderResult, StyleOption, SubtaskResult,
    DEFAULT_MAX_OUTPUT_TOKENS, MAX_OUTPUT_TOKEN_CAP,
};
pub use engine::{DecompositionReport, OptimizationReport, PromptOptimizer};
pub use engine::judge::Verdict;
pub use engine::llm::{GeminiClient, OpenAiClient, ProviderClient};
pub use engine::router::{RoutingDecision, RoutingTable, DEFAULT_LABEL};
pub use history::{HistoryEntry, InteractionHistory, DISPLAY_LIMIT};
pub use orchestrator::{FallbackOrchestrator, ProviderConfig};
pub use report::export_document;
pub use session::Session;

// engine/mod.rs — Prompt optimization pipeline

pub mod decompose;
pub mod judge;
pub mod llm;
pub mod router;
pub mod template;
pub mod types;

use crate::config::Settings;
use crate::history::HistoryEntry;
use crate::orchestrator::FallbackOrchestrator;
use crate::report;
use crate::session::Session;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;

use self::judge::Verdict;
use self::router::{RoutingDecision, RoutingTable};
use self::types::{OptimizationRequest, ProviderResult, SubtaskResult};

/// Outcome of one optimization interaction.
#[derive(Debug, Clone)]
pub struct OptimizationReport {
    /// The draft from the fallback chain, or the all-failed diagnostic.
    pub optimized: String,
    /// Provider that produced the draft; `None` means the diagnostic.
    pub provider: Option<String>,
    pub verdict: Option<Verdict>,
    /// Escalated rewrite from the escalation provider, when triggered.
    pub escalated: Option<String>,
}

impl OptimizationReport {
    /// Text the shell should display: an escalated rewrite wins over the
    /// draft.
    pub fn final_text(&self) -> &str {
        self.escalated.as_deref().unwrap_or(&self.optimized)
    }
}

/// Outcome of a decomposition run.
#[derive(Debug, Clone)]
pub struct DecompositionReport {
    pub optimized: String,
    pub results: Vec<SubtaskResult>,
    /// Exported document, one section per subtask.
    pub document: String,
}

/// Pipeline facade: template → fallback chain → optional judge/escalation →
/// optional decomposition/routing, with one history entry per interaction.
pub struct PromptOptimizer {
    orchestrator: FallbackOrchestrator,
    routing: RoutingTable,
    bindings: HashMap<String, String>,
    settings: Settings,
}

impl PromptOptimizer {
    pub fn new(orchestrator: FallbackOrchestrator, settings: Settings) -> Self {
        Self {
            orchestrator,
            routing: RoutingTable::new(),
            bindings: default_bindings(),
            settings,
        }
    }

    /// Create from environment variables with default settings.
    pub fn from_env() -> Self {
        Self::new(FallbackOrchestrator::from_env(), Settings::default())
    }

    /// Bind a routing label to a configured provider id. Unbound labels
    /// fall back to the full provider order at execution time.
    pub fn bind_label(&mut self, label: &str, provider_id: &str) {
        self.bindings
            .insert(label.to_string(), provider_id.to_string());
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn orchestrator(&self) -> &FallbackOrchestrator {
        &self.orchestrator
    }

    /// Run one optimization interaction. The request is already validated;
    /// nothing here touches the network for an empty task because such a
    /// request cannot be constructed.
    pub async fn optimize(
        &self,
        session: &mut Session,
        request: &OptimizationRequest,
    ) -> OptimizationReport {
        let draft = self
            .orchestrator
            .optimize(request, self.settings.temperature)
            .await;

        let mut verdict = None;
        let mut escalated = None;

        if self.settings.judge_quality && draft.is_success() {
            verdict = self.judge(&draft.text, request).await;

            let flagged = verdict
                .as_ref()
                .map(|v| v.should_escalate(self.settings.escalation_threshold))
                .unwrap_or(false);

            if flagged && self.settings.escalate_on_low_quality {
                escalated = self.escalate(&draft.text, request).await;
            } else if flagged {
                tracing::info!("Draft flagged by judge, escalation disabled");
            }
        }

        let outcome = OptimizationReport {
            optimized: draft.text,
            provider: draft.provider,
            verdict,
            escalated,
        };

        session.history_mut().append(HistoryEntry::new(
            request.task(),
            outcome.final_text(),
            outcome.provider.clone(),
        ));

        outcome
    }

    /// Optimize, split the optimized prompt into subtasks, route each one
    /// and execute them with bounded concurrency. Result order follows
    /// subtask order regardless of completion order.
    pub async fn decompose_and_run(
        &self,
        session: &mut Session,
        request: &OptimizationRequest,
    ) -> DecompositionReport {
        let optimized = self
            .orchestrator
            .optimize(request, self.settings.temperature)
            .await;

        let subtasks = if optimized.is_success() {
            self.decompose(&optimized.text, request).await
        } else {
            Vec::new()
        };

        let decisions: Vec<RoutingDecision> = subtasks
            .iter()
            .map(|subtask| self.routing.route(subtask))
            .collect();

        let limit = self.settings.subtask_concurrency.max(1);
        let results: Vec<SubtaskResult> = stream::iter(decisions)
            .map(|decision| self.run_subtask(decision, request))
            .buffered(limit)
            .collect()
            .await;

        let document = report::export_document(&results);

        // Degenerate case: nothing to fan out, the optimized text stands.
        let recorded = if results.is_empty() {
            optimized.text.clone()
        } else {
            document.clone()
        };
        session.history_mut().append(HistoryEntry::new(
            request.task(),
            &recorded,
            optimized.provider.clone(),
        ));

        DecompositionReport {
            optimized: optimized.text,
            results,
            document,
        }
    }

    async fn judge(&self, optimized: &str, request: &OptimizationRequest) -> Option<Verdict> {
        let instruction = judge::rubric_instruction(optimized, request.task());
        let completion = self
            .orchestrator
            .complete(
                &instruction,
                request.max_output_tokens(),
                self.settings.temperature,
            )
            .await;

        if !completion.is_success() {
            tracing::warn!("Judge call failed: {}", completion.text);
            return None;
        }

        Some(Verdict::parse(&completion.text))
    }

    async fn escalate(&self, draft: &str, request: &OptimizationRequest) -> Option<String> {
        let instruction = format!(
            "Improve this prompt for the task while preserving structure:\n\n{}",
            draft
        );

        let result = self
            .orchestrator
            .complete_via(
                &self.settings.escalation_provider,
                &instruction,
                request.max_output_tokens(),
                self.settings.temperature,
            )
            .await;

        match result {
            Some(ProviderResult::Success { text }) => {
                tracing::info!(
                    "Escalation succeeded via '{}'",
                    self.settings.escalation_provider
                );
                Some(text)
            }
            Some(ProviderResult::Unavailable { reason }) => {
                tracing::warn!("Escalation provider unavailable: {}", reason);
                None
            }
            Some(ProviderResult::Error { message }) => {
                tracing::warn!("Escalation failed: {}", message);
                None
            }
            None => {
                tracing::warn!(
                    "Escalation provider '{}' not configured",
                    self.settings.escalation_provider
                );
                None
            }
        }
    }

    async fn decompose(&self, optimized: &str, request: &OptimizationRequest) -> Vec<String> {
        let instruction = decompose::instruction(optimized);
        let completion = self
            .orchestrator
            .complete(
                &instruction,
                request.max_output_tokens(),
                self.settings.temperature,
            )
            .await;

        if !completion.is_success() {
            tracing::warn!("Decomposition call failed: {}", completion.text);
            return Vec::new();
        }

        let subtasks = decompose::parse_subtasks(&completion.text);
        tracing::info!("Decomposed into {} subtasks", subtasks.len());
        subtasks
    }

    async fn run_subtask(
        &self,
        decision: RoutingDecision,
        request: &OptimizationRequest,
    ) -> SubtaskResult {
        let text = self.execute_routed(&decision, request).await;

        SubtaskResult {
            subtask: decision.subtask,
            provider_label: decision.provider_label,
            text,
        }
    }

    /// A bound label runs against its configured client first; unbound
    /// labels and failed bound attempts go through the full fallback order.
    /// The label itself never picks a client.
    async fn execute_routed(
        &self,
        decision: &RoutingDecision,
        request: &OptimizationRequest,
    ) -> String {
        if let Some(provider_id) = self.bindings.get(&decision.provider_label) {
            match self
                .orchestrator
                .complete_via(
                    provider_id,
                    &decision.subtask,
                    request.max_output_tokens(),
                    self.settings.temperature,
                )
                .await
            {
                Some(ProviderResult::Success { text }) => return text,
                Some(other) => tracing::warn!(
                    "Bound provider '{}' failed for label '{}': {:?}",
                    provider_id,
                    decision.provider_label,
                    other
                ),
                None => tracing::warn!(
                    "Label '{}' bound to unknown provider '{}'",
                    decision.provider_label,
                    provider_id
                ),
            }
        }

        self.orchestrator
            .complete(
                &decision.subtask,
                request.max_output_tokens(),
                self.settings.temperature,
            )
            .await
            .text
    }
}

fn default_bindings() -> HashMap<String, String> {
    HashMap::from([
        ("Gemini".to_string(), "gemini".to_string()),
        ("GPT-5".to_string(), "openai".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::llm::mock::MockProvider;
    use super::types::StyleOption;
    use super::*;
    use crate::orchestrator::ProviderConfig;
    use std::sync::atomic::Ordering;

    fn config(id: &str, priority: u8, provider: MockProvider) -> ProviderConfig {
        ProviderConfig {
            id: id.to_string(),
            priority,
            client: Box::new(provider),
            max_retries: 0,
            timeout_secs: 5,
        }
    }

    fn success(text: &str) -> ProviderResult {
        ProviderResult::Success {
            text: text.to_string(),
        }
    }

    fn request(task: &str) -> OptimizationRequest {
        OptimizationRequest::new(task, StyleOption::Structured, 512).expect("valid request")
    }

    fn settings_without_judge() -> Settings {
        Settings {
            judge_quality: false,
            ..Settings::default()
        }
    }

    #[tokio::test]
    async fn end_to_end_single_provider() {
        let provider = MockProvider::succeeding("gemini", "Summarize... [optimized]");
        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![config("gemini", 1, provider)]),
            settings_without_judge(),
        );
        let mut session = Session::new();

        let report = optimizer
            .optimize(&mut session, &request("Summarize the attached report"))
            .await;

        assert_eq!(report.final_text(), "Summarize... [optimized]");
        assert_eq!(report.provider.as_deref(), Some("gemini"));
        assert!(report.verdict.is_none());
        assert_eq!(session.history().len(), 1);
        assert_eq!(
            session.history().recent(1)[0].task,
            "Summarize the attached report"
        );
    }

    #[tokio::test]
    async fn judge_runs_but_good_scores_do_not_escalate() {
        let provider = MockProvider::new(
            "gemini",
            vec![
                success("draft"),
                success(r#"{"relevance": 10, "clarity": 9, "constraints": 9, "testability": 8}"#),
            ],
        );
        let secondary = MockProvider::succeeding("openai", "should not run");
        let secondary_calls = secondary.call_counter();

        let settings = Settings {
            escalate_on_low_quality: true,
            ..Settings::default()
        };
        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![
                config("gemini", 1, provider),
                config("openai", 2, secondary),
            ]),
            settings,
        );
        let mut session = Session::new();

        let report = optimizer.optimize(&mut session, &request("task")).await;

        assert_eq!(report.final_text(), "draft");
        assert!(report.verdict.expect("verdict").scores.is_some());
        assert!(report.escalated.is_none());
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn low_scores_escalate_to_secondary() {
        let provider = MockProvider::new(
            "gemini",
            vec![
                success("weak draft"),
                success(r#"{"relevance": 4, "clarity": 8}"#),
            ],
        );
        let secondary = MockProvider::succeeding("openai", "improved draft");
        let secondary_prompts = secondary.prompt_log();

        let settings = Settings {
            escalate_on_low_quality: true,
            ..Settings::default()
        };
        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![
                config("gemini", 1, provider),
                config("openai", 2, secondary),
            ]),
            settings,
        );
        let mut session = Session::new();

        let report = optimizer.optimize(&mut session, &request("task")).await;

        assert_eq!(report.escalated.as_deref(), Some("improved draft"));
        assert_eq!(report.final_text(), "improved draft");
        assert_eq!(session.history().recent(1)[0].optimized_text, "improved draft");

        let prompts = secondary_prompts.lock().unwrap();
        assert!(prompts[0].contains("while preserving structure"));
        assert!(prompts[0].contains("weak draft"));
    }

    #[tokio::test]
    async fn unparseable_verdict_does_not_escalate() {
        let provider = MockProvider::new(
            "gemini",
            vec![success("draft"), success("the prompt looks great to me")],
        );
        let secondary = MockProvider::succeeding("openai", "should not run");
        let secondary_calls = secondary.call_counter();

        let settings = Settings {
            escalate_on_low_quality: true,
            ..Settings::default()
        };
        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![
                config("gemini", 1, provider),
                config("openai", 2, secondary),
            ]),
            settings,
        );
        let mut session = Session::new();

        let report = optimizer.optimize(&mut session, &request("task")).await;

        assert_eq!(report.final_text(), "draft");
        assert!(report.verdict.expect("verdict").scores.is_none());
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn all_providers_failing_yields_diagnostic_and_no_judge() {
        let provider = MockProvider::new(
            "gemini",
            vec![ProviderResult::Unavailable {
                reason: "GEMINI_API_KEY not set".to_string(),
            }],
        );
        let calls = provider.call_counter();

        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![config("gemini", 1, provider)]),
            Settings::default(),
        );
        let mut session = Session::new();

        let report = optimizer.optimize(&mut session, &request("task")).await;

        assert!(report.provider.is_none());
        assert!(report.optimized.contains("gemini unavailable"));
        assert!(report.verdict.is_none());
        // One attempt for the draft, none for the judge.
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[tokio::test]
    async fn decompose_routes_and_runs_each_subtask() {
        // Call order with concurrency 1: optimize, decompose, then one call
        // per subtask through the fallback chain.
        let provider = MockProvider::new(
            "gemini",
            vec![
                success("optimized plan"),
                success("draw a poster\n\nsummarize findings\n"),
                success("poster result"),
                success("summary result"),
            ],
        );

        let settings = Settings {
            judge_quality: false,
            subtask_concurrency: 1,
            ..Settings::default()
        };
        let mut optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![config("gemini", 1, provider)]),
            settings,
        );
        // "Gemini" is bound to the configured client by default; point the
        // label at the only provider in this fixture explicitly.
        optimizer.bind_label("Gemini", "gemini");

        let mut session = Session::new();
        let report = optimizer
            .decompose_and_run(&mut session, &request("make a launch plan"))
            .await;

        assert_eq!(report.optimized, "optimized plan");
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].subtask, "draw a poster");
        assert_eq!(report.results[0].provider_label, "Gemini");
        assert_eq!(report.results[0].text, "poster result");
        assert_eq!(report.results[1].provider_label, "Claude");
        assert_eq!(report.results[1].text, "summary result");

        assert!(report.document.starts_with("### Task: draw a poster\n**Model:** Gemini"));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().recent(1)[0].optimized_text, report.document);
    }

    #[tokio::test]
    async fn bound_label_executes_against_bound_client() {
        let primary = MockProvider::new(
            "gemini",
            vec![
                success("optimized"),
                success("implement the parser"),
            ],
        );
        let coder = MockProvider::succeeding("openai", "parser code");
        let coder_calls = coder.call_counter();
        let coder_prompts = coder.prompt_log();

        let settings = Settings {
            judge_quality: false,
            subtask_concurrency: 1,
            ..Settings::default()
        };
        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![
                config("gemini", 1, primary),
                config("openai", 2, coder),
            ]),
            settings,
        );

        let mut session = Session::new();
        let report = optimizer
            .decompose_and_run(&mut session, &request("build a parser"))
            .await;

        // "implement" routes to the GPT-5 label, which is bound to openai.
        assert_eq!(report.results[0].provider_label, "GPT-5");
        assert_eq!(report.results[0].text, "parser code");
        assert_eq!(coder_calls.load(Ordering::SeqCst), 1);
        assert_eq!(coder_prompts.lock().unwrap()[0], "implement the parser");
    }

    #[tokio::test]
    async fn failed_optimization_skips_decomposition() {
        let provider = MockProvider::new(
            "gemini",
            vec![ProviderResult::Error {
                message: "boom".to_string(),
            }],
        );
        let calls = provider.call_counter();

        let optimizer = PromptOptimizer::new(
            FallbackOrchestrator::new(vec![config("gemini", 1, provider)]),
            settings_without_judge(),
        );
        let mut session = Session::new();

        let report = optimizer
            .decompose_and_run(&mut session, &request("task"))
            .await;

        assert!(report.results.is_empty());
        assert_eq!(report.document, "");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The diagnostic is still recorded for display.
        assert_eq!(session.history().len(), 1);
    }
}

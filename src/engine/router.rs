// engine/router.rs — Keyword routing of subtasks to provider labels

/// Label used when no keyword rule matches.
pub const DEFAULT_LABEL: &str = "Claude";

/// A routed subtask. The label is descriptive metadata for display; which
/// client actually executes the subtask is decided by the pipeline's label
/// bindings, never by this string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    pub subtask: String,
    pub provider_label: String,
}

struct RoutingRule {
    keywords: &'static [&'static str],
    label: &'static str,
}

/// Ordered keyword rules; first match wins. Some labels are illustrative
/// and have no bound client — those fall back to the configured provider
/// order at execution time.
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            rules: vec![
                RoutingRule {
                    keywords: &["image", "draw", "picture", "poster", "diagram", "logo"],
                    label: "Gemini",
                },
                RoutingRule {
                    keywords: &["code", "program", "script", "function", "debug", "implement"],
                    label: "GPT-5",
                },
                RoutingRule {
                    keywords: &["search", "research", "browse"],
                    label: "Perplexity",
                },
            ],
        }
    }

    /// Case-insensitive first-match routing with a fixed default.
    pub fn route(&self, subtask: &str) -> RoutingDecision {
        let haystack = subtask.to_lowercase();

        let label = self
            .rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| haystack.contains(keyword)))
            .map(|rule| rule.label)
            .unwrap_or(DEFAULT_LABEL);

        RoutingDecision {
            subtask: subtask.to_string(),
            provider_label: label.to_string(),
        }
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

// engine/judge.rs — Quality verdict over an optimized prompt

use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::OnceLock;

const SUGGESTION_KEYS: [&str; 3] = ["fix", "suggestion", "fix_suggestion"];

/// Build the rubric instruction sent to the judging provider.
pub fn rubric_instruction(optimized_prompt: &str, task: &str) -> String {
    format!(
        "Judge if this optimized prompt will likely solve the task:\n\
         - Criteria: relevance, clarity, constraints, testability (0-10 each)\n\
         - Return: JSON with scores and a brief fix suggestion\n\
         Task: {}\n\
         Prompt: {}\n\
         Only return JSON.",
        task, optimized_prompt
    )
}

/// Parsed judge verdict. `scores` is `None` when the response could not be
/// decoded into numeric criteria, which downstream treats as "cannot judge".
#[derive(Debug, Clone)]
pub struct Verdict {
    pub raw: String,
    pub scores: Option<BTreeMap<String, f64>>,
    pub suggestion: Option<String>,
}

impl Verdict {
    /// Decode a verdict from raw model output. Accepts a bare JSON object,
    /// an object wrapped in markdown code fences, the flat
    /// `{"relevance": 8, ...}` shape and the nested `{"scores": {...}}`
    /// shape. Anything else parses to `scores: None`.
    pub fn parse(raw: &str) -> Self {
        let json = extract_json(raw)
            .and_then(|blob| serde_json::from_str::<Value>(&blob).ok());

        let Some(Value::Object(map)) = json else {
            return Self {
                raw: raw.to_string(),
                scores: None,
                suggestion: None,
            };
        };

        let score_source = match map.get("scores") {
            Some(Value::Object(nested)) => nested,
            _ => &map,
        };

        let mut scores = BTreeMap::new();
        for (criterion, value) in score_source {
            if let Some(score) = value.as_f64() {
                scores.insert(criterion.clone(), score);
            }
        }

        let suggestion = SUGGESTION_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        Self {
            raw: raw.to_string(),
            scores: if scores.is_empty() { None } else { Some(scores) },
            suggestion,
        }
    }

    /// True when any parsed criterion score falls below `threshold`.
    /// An unparseable verdict never escalates.
    pub fn should_escalate(&self, threshold: f64) -> bool {
        match &self.scores {
            Some(scores) => scores.values().any(|score| *score < threshold),
            None => false,
        }
    }
}

/// Pull the outermost JSON object out of the response, tolerating prose or
/// ```json fences around it.
fn extract_json(raw: &str) -> Option<String> {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    let object = OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("verdict regex"));

    object.find(raw).map(|m| m.as_str().to_string())
}

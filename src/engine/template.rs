// engine/template.rs — Optimization instruction builder

use super::types::StyleOption;

/// Build the optimization instruction for an already-validated task.
/// Deterministic and pure; the task text and style label are embedded
/// verbatim. Emptiness is rejected at `OptimizationRequest` construction,
/// before this runs.
pub fn build(task: &str, style: StyleOption) -> String {
    format!(
        "You are a prompt engineer.\n\
         Rewrite the following task into a precise, creative prompt with:\n\
         - Clear role and goal\n\
         - Step-by-step plan\n\
         - Constraints (tone, format, length)\n\
         - Few-shot examples if useful\n\
         - Verification checklist\n\
         \n\
         Task: {}\n\
         Style: {}\n\
         Output: A single optimized prompt string only.",
        task,
        style.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_task_and_style_verbatim() {
        let instruction = build("Summarize the attached report", StyleOption::Structured);
        assert!(instruction.contains("Summarize the attached report"));
        assert!(instruction.contains("Style: structured"));
    }

    #[test]
    fn is_deterministic() {
        let a = build("draft a launch plan", StyleOption::Creative);
        let b = build("draft a launch plan", StyleOption::Creative);
        assert_eq!(a, b);
    }

    #[test]
    fn style_label_varies_with_option() {
        let step = build("t", StyleOption::StepByStep);
        assert!(step.contains("Style: step-by-step"));
    }
}

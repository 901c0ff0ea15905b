// report.rs — Downloadable document for decomposition results

use crate::engine::types::SubtaskResult;

/// Concatenate executed subtasks into a text document, one section per
/// subtask in subtask order.
pub fn export_document(results: &[SubtaskResult]) -> String {
    results
        .iter()
        .map(|result| {
            format!(
                "### Task: {}\n**Model:** {}\n**Result:**\n{}",
                result.subtask, result.provider_label, result.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

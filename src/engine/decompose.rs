// engine/decompose.rs — Task decomposition into ordered subtasks

/// Instruction asking the model for one subtask per line.
pub fn instruction(optimized_prompt: &str) -> String {
    format!(
        "Break the following task into an ordered list of smaller subtasks.\n\
         Return one subtask per line, with no numbering and no commentary.\n\
         \n\
         Task: {}",
        optimized_prompt
    )
}

/// Line-based split of a decomposition response: trim each line, drop the
/// empty ones, preserve order. A single-line response yields one subtask,
/// so the pipeline degenerates gracefully to no decomposition.
pub fn parse_subtasks(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_yields_single_subtask() {
        assert_eq!(parse_subtasks("one line only"), vec!["one line only"]);
    }

    #[test]
    fn blank_lines_are_dropped_and_order_preserved() {
        assert_eq!(parse_subtasks("a\n\nb\n"), vec!["a", "b"]);
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(
            parse_subtasks("  collect data \n\t analyze data\n"),
            vec!["collect data", "analyze data"]
        );
    }

    #[test]
    fn empty_response_yields_no_subtasks() {
        assert!(parse_subtasks("\n \n").is_empty());
    }

    #[test]
    fn instruction_embeds_the_prompt() {
        let text = instruction("ship the release");
        assert!(text.contains("ship the release"));
        assert!(text.contains("one subtask per line"));
    }
}

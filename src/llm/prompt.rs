//! Prompt templates for the chat flow.

/// Prompt for answering against a user-selected passage only.
pub fn selected_text_prompt(query: &str, selected_text: &str) -> String {
    format!(
        "Based on the following selected text: '{}', please answer this question: {}",
        selected_text, query
    )
}

/// Prompt for answering against retrieved book content.
pub fn context_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the following book content, please answer the question. \
         If the content doesn't contain the answer, say so clearly.\n\n{}\n\nQuestion: {}",
        context, query
    )
}

/// Fallback prompt when no context is supplied.
pub fn general_prompt(query: &str) -> String {
    format!(
        "Please answer the following question about embodied AI systems, robotics, or related topics: {}",
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_text_prompt_embeds_both_parts() {
        let prompt = selected_text_prompt("what is a node?", "A node is a process.");
        assert!(prompt.contains("A node is a process."));
        assert!(prompt.ends_with("what is a node?"));
    }

    #[test]
    fn context_prompt_instructs_on_missing_answers() {
        let prompt = context_prompt("what is a node?", "Nodes are processes.");
        assert!(prompt.contains("say so clearly"));
        assert!(prompt.contains("Nodes are processes."));
        assert!(prompt.ends_with("Question: what is a node?"));
    }

    #[test]
    fn general_prompt_carries_query() {
        assert!(general_prompt("what is ROS?").ends_with("what is ROS?"));
    }
}

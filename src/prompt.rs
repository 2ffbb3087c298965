use crate::search::SearchResult;

pub const DEFAULT_PERSONA: &str = "You are a Silicon Valley technology strategist.";

/// Grounding context used when retrieval produced nothing.
pub const NO_DATA_SENTINEL: &str = "No real-time data available.";

/// Formats search results as one `[Source]`/`Content` block per result,
/// blank-line separated, in provider order.
pub fn build_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_DATA_SENTINEL.to_string();
    }

    results
        .iter()
        .map(|r| format!("[Source: {}]({})\nContent: {}", r.title, r.url, r.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The user message is interpolated as-is. There is no prompt-injection
/// defense here.
pub fn build_prompt(persona: &str, context: &str, message: &str) -> String {
    let mut result = String::with_capacity(persona.len() + context.len() + message.len() + 160);
    result.push_str(persona);
    result.push_str(" Use the data below to answer.\n\n[Data]:\n");
    result.push_str(context);
    result.push_str("\n\nQuestion: ");
    result.push_str(message);
    result.push_str("\n\nBase your answer on the data and include source links.");
    result
}

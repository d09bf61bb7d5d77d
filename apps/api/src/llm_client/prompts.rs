// Shared prompt fragments. Each flow keeps its own templates in flows::prompts;
// this file holds the cross-cutting pieces.

/// System prompt fragment for raw HTML output.
pub const HTML_ONLY_SYSTEM: &str = "You are a precise document writer. \
    Respond with raw HTML only. \
    Do NOT include <html>, <head>, or <body> tags. \
    Do NOT wrap the output in Markdown code fences.";

/// Instruction appended to every prompt that carries user-supplied facts.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Use ONLY the information provided. Do NOT invent employers, dates, metrics, \
    or technologies that are not present in the input.";

/// Renders a list as `a, b, c` for inline prompt use.
pub fn join_inline(items: &[String]) -> String {
    items.join(", ")
}

/// Renders a list as markdown bullets, one per line.
pub fn join_bullets(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

//! Default LLM prompts for keyword extraction.

/// Default system instruction.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a highly proficient assistant tasked with \
determining which words are most important in the text. Please just list the keywords in a \
comma-separated list below.";

/// Default user prompt. `{content}` is replaced with the input text.
pub const DEFAULT_USER_PROMPT: &str = "Extract important keywords from the following text:\n\n{content}";

// Prompt fragments for the grounded career-advisor answer.

use crate::skills::Vocabulary;

/// System message sent with every advisor question.
pub const ADVISOR_SYSTEM: &str = "You are a helpful AI.";

/// Restricts answers to software-engineering technology topics.
const SCOPE_PREAMBLE: &str = "You are a personal AI career advisor. \
    Only respond to queries related to the technologies in software engineering";

/// Builds the user prompt: scope preamble listing the vocabulary, the
/// retrieved context one chunk per line, then the question.
pub fn build_grounded_prompt<S: AsRef<str>>(
    vocabulary: &Vocabulary,
    context: &[S],
    query: &str,
) -> String {
    let technologies = vocabulary
        .skills()
        .iter()
        .map(|s| format!("\"{s}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let context = context
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{SCOPE_PREAMBLE} such as {technologies} and all the other frameworks and technologies in software.\n\n\
         Use the following retrieved context to assist the user:\n\n\
         {context}\n\n\
         Question: {query}\n\
         Answer:"
    )
}

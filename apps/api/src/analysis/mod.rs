// Job description analysis: summary plus three suggested skills.
// Stateless; never reads or writes the job store.
// All LLM calls go through llm_client.

pub mod analyzer;
pub mod handlers;
pub mod prompts;

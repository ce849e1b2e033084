// Contract drafting: LLM draft → clean → render → persist.
// All LLM calls go through llm_client. All layout goes through render::generate_document.

pub mod cleaner;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod store;

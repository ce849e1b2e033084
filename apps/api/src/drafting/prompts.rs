// All LLM prompt constants for the Drafting module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Drafting prompt template. Replace `{document_type}`, `{title}` and `{instructions}`.
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Draft a complete {document_type} titled "{title}".

Requirements from the client:
{instructions}

Include every clause a practitioner would expect in a {document_type}: parties, definitions,
obligations, term and termination, confidentiality where relevant, liability, governing law,
and signature blocks. Use placeholders in square brackets for names, dates and amounts
that were not provided."#;

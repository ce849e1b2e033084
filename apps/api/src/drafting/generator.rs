//! LLM drafting: request → prompt → model call → cleaned contract text.

use serde::Deserialize;
use tracing::{info, warn};

use crate::drafting::cleaner::clean_draft_text;
use crate::drafting::prompts::DRAFT_PROMPT_TEMPLATE;
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, PLAIN_TEXT_SYSTEM, STRUCTURE_INSTRUCTION};
use crate::llm_client::LlmClient;

/// Cap on free-text instructions forwarded to the model.
const MAX_INSTRUCTIONS_CHARS: usize = 8_000;

#[derive(Debug, Clone, Deserialize)]
pub struct DraftRequest {
    pub document_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
}

impl DraftRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.document_type.trim().is_empty() {
            return Err(AppError::Validation(
                "document_type cannot be empty".to_string(),
            ));
        }
        if self.instructions.chars().count() > MAX_INSTRUCTIONS_CHARS {
            return Err(AppError::Validation(format!(
                "instructions exceed {MAX_INSTRUCTIONS_CHARS} characters"
            )));
        }
        Ok(())
    }

    /// Title used in the prompt: the caller's, else the document type.
    pub fn effective_title(&self) -> &str {
        if self.title.trim().is_empty() {
            self.document_type.trim()
        } else {
            self.title.trim()
        }
    }
}

/// Builds the user prompt for a draft request.
pub fn build_draft_prompt(request: &DraftRequest) -> String {
    let instructions = if request.instructions.trim().is_empty() {
        "None beyond standard market terms."
    } else {
        request.instructions.trim()
    };

    let body = fill_template(
        DRAFT_PROMPT_TEMPLATE,
        &[
            ("document_type", request.document_type.trim()),
            ("title", request.effective_title()),
            ("instructions", instructions),
        ],
    );
    format!("{body}\n\n{STRUCTURE_INSTRUCTION}")
}

/// Asks the model for a contract and returns it cleaned and ready for layout.
pub async fn draft_contract(llm: &LlmClient, request: &DraftRequest) -> Result<String, AppError> {
    request.validate()?;

    let prompt = build_draft_prompt(request);
    info!("Drafting {} via LLM", request.document_type);

    let raw = llm.call_text(&prompt, PLAIN_TEXT_SYSTEM).await?;

    let cleaned = clean_draft_text(&raw);
    if cleaned.is_empty() {
        warn!("LLM draft was empty after cleaning");
        return Err(AppError::Validation(
            "The generated draft contained no usable text".to_string(),
        ));
    }

    info!("Draft ready: {} chars ({} raw)", cleaned.len(), raw.len());
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, instructions: &str) -> DraftRequest {
        DraftRequest {
            document_type: "Residential Lease".to_string(),
            title: title.to_string(),
            instructions: instructions.to_string(),
        }
    }

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_draft_prompt(&request("Flat 4 Lease", "Twelve month term."));
        assert!(prompt.contains("Draft a complete Residential Lease titled \"Flat 4 Lease\""));
        assert!(prompt.contains("Twelve month term."));
        assert!(prompt.contains("FORMAT RULES"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_title_falls_back_to_document_type() {
        let req = request("  ", "");
        assert_eq!(req.effective_title(), "Residential Lease");
        assert!(build_draft_prompt(&req).contains("None beyond standard market terms."));
    }

    #[test]
    fn test_validation() {
        let mut req = request("", "");
        assert!(req.validate().is_ok());
        req.document_type = " ".to_string();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
        req.document_type = "NDA".to_string();
        req.instructions = "x".repeat(MAX_INSTRUCTIONS_CHARS + 1);
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}

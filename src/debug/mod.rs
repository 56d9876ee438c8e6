use crate::session::SessionId;
use serde::Serialize;
use serde_json::Value;

pub mod markdown;
pub mod normalize;
pub mod workflow;

use markdown::split_fenced_block;

/// Body of `POST /analyze_error`.
#[derive(Debug, Serialize)]
pub struct DebugRequest {
    #[serde(rename = "session_id")]
    pub session: SessionId,
    pub user_prompt: String,
    pub code_snippet: String,
    pub stack_trace: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentationEntry {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugResult {
    pub requires_documentation: bool,
    pub search_phrase: Option<String>,
    pub documentation_results: Vec<DocumentationEntry>,
    pub explanation: String,
    pub fixed_code: String,
    pub alternative_solutions: Option<Vec<String>>,
    pub documentation_was_useful: Option<bool>,
    pub raw_updated_response: Option<String>,
}

/// What the results panel shows: the stored result with the fenced block of
/// `raw_updated_response` pulled out into explanation and code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayResult<'a> {
    pub result: &'a DebugResult,
    pub explanation: String,
    pub fixed_code: String,
    pub language: Option<String>,
    pub trailing_note: String,
}

impl<'a> DisplayResult<'a> {
    pub fn from_result(result: &'a DebugResult) -> Self {
        match result.raw_updated_response.as_deref() {
            Some(raw) => {
                let sections = split_fenced_block(raw);
                Self {
                    result,
                    explanation: sections.before,
                    fixed_code: sections.code,
                    language: sections.language,
                    trailing_note: sections.after,
                }
            }
            None => Self {
                result,
                explanation: result.explanation.clone(),
                fixed_code: result.fixed_code.clone(),
                language: None,
                trailing_note: String::new(),
            },
        }
    }

    pub fn step_number_for_correction(&self) -> u8 {
        if self.result.requires_documentation {
            3
        } else {
            2
        }
    }
}

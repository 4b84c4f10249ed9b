//! Structured consultation contract with the hosted model.
//!
//! One query produces exactly one provider call. The call carries the
//! instruction payload from [`prompt`] and the response schema from
//! [`schema`]; the returned text is parsed all-or-nothing by [`parser`].

pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod parser;
pub mod prompt;
pub mod schema;

pub use gemini::GeminiClient;
#[cfg(test)]
pub use mock::MockLlmClient;
pub use parser::parse_consultation;

use thiserror::Error;

use crate::types::ConsultationResult;

/// Sampling temperature used unless configured otherwise
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Empty response from provider")]
    EmptyResponse,

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

/// A single schema-constrained generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
    pub temperature: f32,
}

/// Hosted model abstraction (allows mocking)
pub trait LlmClient {
    /// Run one generation and return the raw response text.
    ///
    /// An empty string means the provider returned no body.
    fn generate(&self, request: &GenerationRequest) -> Result<String, QueryError>;
}

/// Build the generation request for a symptom description
pub fn build_request(query: &str, temperature: f32) -> GenerationRequest {
    GenerationRequest {
        prompt: prompt::consultation_prompt(query),
        response_schema: schema::consultation_schema(),
        temperature,
    }
}

/// Ask the provider for a consultation and parse the answer.
///
/// Errors are propagated without retry.
pub fn fetch_consultation(
    client: &dyn LlmClient,
    query: &str,
    temperature: f32,
) -> Result<ConsultationResult, QueryError> {
    let query = query.trim();
    let request = build_request(query, temperature);

    tracing::debug!(query_chars = query.chars().count(), "Requesting consultation");
    let text = client.generate(&request)?;

    if text.trim().is_empty() {
        return Err(QueryError::EmptyResponse);
    }

    parse_consultation(&text)
}

use std::cell::{Cell, RefCell};

use super::{GenerationRequest, LlmClient, QueryError};

/// Scripted client for tests: returns a fixed reply and counts calls
pub struct MockLlmClient {
    reply: Result<String, QueryError>,
    calls: Cell<usize>,
    last_request: RefCell<Option<GenerationRequest>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            reply: Ok(response.to_string()),
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    pub fn failing(error: QueryError) -> Self {
        Self {
            reply: Err(error),
            calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.borrow().clone()
    }
}

impl LlmClient for MockLlmClient {
    fn generate(&self, request: &GenerationRequest) -> Result<String, QueryError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());
        self.reply.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::build_request;

    #[test]
    fn test_mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let result = client.generate(&build_request("q", 0.4)).unwrap();

        assert_eq!(result, "test response");
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_mock_client_returns_configured_error() {
        let client = MockLlmClient::failing(QueryError::EmptyResponse);
        assert_eq!(
            client.generate(&build_request("q", 0.4)),
            Err(QueryError::EmptyResponse)
        );
    }
}

use crate::library::{Confirm, Library};
use crate::query::{fetch_consultation, LlmClient, QueryError};
use crate::types::{ConsultationResult, HistoryItem, Prescription};

/// Message shown for any failed consultation
pub const QUERY_FAILED_MESSAGE: &str =
    "Something went wrong during the consultation. Please try again later or check your network connection.";

pub const FAVORITE_ANALYSIS: &str = "Sourced from your favorites history.";
pub const FAVORITE_COMPARISON: &str = "No comparison data.";
pub const FAVORITE_RECOMMENDATION: &str = "Your favorited prescription.";

/// Lifecycle of the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Wrap a single favorite as a consultation so it renders like a query result
pub fn from_favorite(item: &Prescription) -> ConsultationResult {
    ConsultationResult {
        symptom_analysis: FAVORITE_ANALYSIS.to_string(),
        prescriptions: vec![item.clone()],
        comparison: FAVORITE_COMPARISON.to_string(),
        recommendation: FAVORITE_RECOMMENDATION.to_string(),
    }
}

/// One user's consultation session.
///
/// At most one query is in flight; a submit while `Loading` is ignored.
pub struct Session<C: LlmClient> {
    client: C,
    library: Library,
    temperature: f32,
    phase: Phase,
    result: Option<ConsultationResult>,
    error: Option<String>,
}

impl<C: LlmClient> Session<C> {
    pub fn new(client: C, library: Library, temperature: f32) -> Self {
        Self {
            client,
            library,
            temperature,
            phase: Phase::Idle,
            result: None,
            error: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self) -> Option<&ConsultationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn favorites(&self) -> &[Prescription] {
        self.library.favorites()
    }

    pub fn history(&self) -> &[HistoryItem] {
        self.library.history()
    }

    pub fn is_favorite(&self, item: &Prescription) -> bool {
        self.library.is_favorite(item)
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one full query cycle and return the phase it settled in
    pub fn submit(&mut self, query: &str) -> Phase {
        if let Some(query) = self.begin(query) {
            let outcome = fetch_consultation(&self.client, &query, self.temperature);
            self.resolve(outcome);
        }
        self.phase
    }

    /// Start a query: record it in history and enter `Loading`.
    ///
    /// Returns the trimmed query to send, or `None` if the submit is
    /// ignored (blank input, or a query already in flight).
    pub fn begin(&mut self, query: &str) -> Option<String> {
        let query = query.trim();
        if query.is_empty() || self.phase == Phase::Loading {
            return None;
        }

        if let Err(e) = self.library.add_history_entry(query) {
            tracing::warn!(error = %e, "Failed to save search history");
        }

        self.phase = Phase::Loading;
        self.result = None;
        self.error = None;
        tracing::debug!("Consultation loading");

        Some(query.to_string())
    }

    /// Finish the in-flight query with the provider outcome.
    ///
    /// Ignored unless a query is `Loading`.
    pub fn resolve(&mut self, outcome: Result<ConsultationResult, QueryError>) {
        if self.phase != Phase::Loading {
            tracing::debug!(phase = ?self.phase, "No query in flight; outcome dropped");
            return;
        }

        match outcome {
            Ok(result) => {
                tracing::debug!(prescriptions = result.prescriptions.len(), "Consultation succeeded");
                self.result = Some(result);
                self.error = None;
                self.phase = Phase::Success;
            }
            Err(e) => {
                tracing::error!(error = %e, "Consultation failed");
                self.result = None;
                self.error = Some(QUERY_FAILED_MESSAGE.to_string());
                self.phase = Phase::Error;
            }
        }
    }

    /// Show a favorite as the current result without calling the provider
    pub fn select_from_favorites(&mut self, item: &Prescription) {
        self.result = Some(from_favorite(item));
        self.error = None;
        self.phase = Phase::Success;
    }

    /// Toggle a favorite; returns whether it is a favorite afterwards
    pub fn toggle_favorite(&mut self, item: &Prescription) -> bool {
        match self.library.toggle_favorite(item) {
            Ok(now_favorite) => now_favorite,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to save favorites");
                self.library.is_favorite(item)
            }
        }
    }

    /// Clear history if `confirm` approves; returns whether it was cleared
    pub fn clear_history(&mut self, confirm: &dyn Confirm) -> bool {
        match self.library.clear_history(confirm) {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to remove stored history");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::AlwaysConfirm;
    use crate::query::parser::tests::sample_response;
    use crate::query::{MockLlmClient, DEFAULT_TEMPERATURE};
    use crate::store::InMemoryStore;
    use crate::types::fixtures::prescription;

    fn session(client: MockLlmClient) -> Session<MockLlmClient> {
        let library = Library::open(Box::new(InMemoryStore::new()));
        Session::new(client, library, DEFAULT_TEMPERATURE)
    }

    #[test]
    fn test_starts_idle() {
        let session = session(MockLlmClient::new(""));

        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_submit_success() {
        let mut session = session(MockLlmClient::new(&sample_response()));

        assert_eq!(session.submit("头痛发热"), Phase::Success);

        let result = session.result().unwrap();
        assert_eq!(result.prescriptions[0].prescription_name, "桂枝汤");
        assert!(session.error().is_none());
        assert_eq!(session.history()[0].query, "头痛发热");
        assert_eq!(session.client().calls(), 1);
    }

    #[test]
    fn test_submit_failure_uses_fixed_message() {
        let mut session = session(MockLlmClient::failing(QueryError::Provider(
            "status 500: internal".into(),
        )));

        assert_eq!(session.submit("咳嗽"), Phase::Error);
        assert_eq!(session.error(), Some(QUERY_FAILED_MESSAGE));
        assert!(session.result().is_none());
        // Attempted queries are still recorded
        assert_eq!(session.history()[0].query, "咳嗽");
    }

    #[test]
    fn test_malformed_response_is_error() {
        let mut session = session(MockLlmClient::new("{\"symptomAnalysis\": \"x\"}"));
        assert_eq!(session.submit("咳嗽"), Phase::Error);
        assert_eq!(session.error(), Some(QUERY_FAILED_MESSAGE));
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut session = session(MockLlmClient::new(&sample_response()));

        assert_eq!(session.submit("   "), Phase::Idle);
        assert!(session.history().is_empty());
        assert_eq!(session.client().calls(), 0);
    }

    #[test]
    fn test_submit_while_loading_is_ignored() {
        let mut session = session(MockLlmClient::new(&sample_response()));

        assert_eq!(session.begin("头痛").as_deref(), Some("头痛"));
        assert_eq!(session.phase(), Phase::Loading);

        assert_eq!(session.submit("腹痛"), Phase::Loading);
        assert!(session.begin("腹痛").is_none());
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.client().calls(), 0);
    }

    #[test]
    fn test_new_submit_clears_previous_error() {
        let mut session = session(MockLlmClient::new(&sample_response()));
        session.begin("咳嗽");
        session.resolve(Err(QueryError::EmptyResponse));
        assert_eq!(session.phase(), Phase::Error);

        session.begin("头痛");
        assert_eq!(session.phase(), Phase::Loading);
        assert!(session.error().is_none());
        assert!(session.result().is_none());
    }

    #[test]
    fn test_resubmit_history_entry_moves_it_to_front() {
        let mut session = session(MockLlmClient::new(&sample_response()));
        session.submit("头痛");
        session.submit("咳嗽");

        let past = session.history()[1].query.clone();
        assert_eq!(session.submit(&past), Phase::Success);

        let queries: Vec<&str> = session.history().iter().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, vec!["头痛", "咳嗽"]);
        assert_eq!(session.client().calls(), 3);
    }

    #[test]
    fn test_resolve_without_query_in_flight_is_ignored() {
        let mut session = session(MockLlmClient::new(""));

        session.resolve(Err(QueryError::EmptyResponse));
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.error().is_none());

        session.select_from_favorites(&prescription("桂枝汤"));
        session.resolve(Err(QueryError::EmptyResponse));
        assert_eq!(session.phase(), Phase::Success);
        assert_eq!(session.result().unwrap().prescriptions[0].prescription_name, "桂枝汤");
    }

    #[test]
    fn test_select_from_favorites() {
        let mut session = session(MockLlmClient::new(""));
        let item = prescription("桂枝汤");

        session.select_from_favorites(&item);

        assert_eq!(session.phase(), Phase::Success);
        let result = session.result().unwrap();
        assert_eq!(result.prescriptions, vec![item]);
        assert_eq!(result.symptom_analysis, FAVORITE_ANALYSIS);
        assert_eq!(result.comparison, FAVORITE_COMPARISON);
        assert_eq!(result.recommendation, FAVORITE_RECOMMENDATION);
        assert_eq!(session.client().calls(), 0);
    }

    #[test]
    fn test_toggle_favorite_keeps_phase() {
        let mut session = session(MockLlmClient::new(&sample_response()));
        session.submit("头痛");
        let first = session.result().unwrap().prescriptions[0].clone();

        assert!(session.toggle_favorite(&first));
        assert_eq!(session.phase(), Phase::Success);
        assert!(session.is_favorite(&first));

        assert!(!session.toggle_favorite(&first));
        assert!(session.favorites().is_empty());
    }

    #[test]
    fn test_toggle_favorite_with_failing_store() {
        let library = Library::open(Box::new(InMemoryStore::unavailable()));
        let mut session = Session::new(MockLlmClient::new(""), library, DEFAULT_TEMPERATURE);

        assert!(session.toggle_favorite(&prescription("桂枝汤")));
        assert_eq!(session.favorites().len(), 1);
    }

    #[test]
    fn test_clear_history() {
        let mut session = session(MockLlmClient::new(&sample_response()));
        session.submit("头痛");

        assert!(session.clear_history(&AlwaysConfirm));
        assert!(session.history().is_empty());
    }
}

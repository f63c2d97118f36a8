//! Review session state
//!
//! A [`ReviewSession`] owns the source text, the selected language and the
//! outcome of the latest review. It drives one request at a time through a
//! [`ReviewClient`] and exposes the resulting state to the front-end.
//!
//! Requests are tagged with increasing ids. Only the outcome for the most
//! recent id is applied; anything older is dropped.

use tracing::{debug, error, info};

use crate::import::ImportedSource;
use crate::review::{ReviewClient, ReviewResult};
use crate::{Error, Language, Result};

/// Shown when there is nothing to review
pub const EMPTY_SOURCE_MESSAGE: &str = "Please enter some code to review.";

/// Shown for any failed review; details go to the log
pub const REVIEW_FAILED_MESSAGE: &str =
    "An error occurred while reviewing the code. Please try again.";

/// Observable phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Nothing requested yet, or cancelled
    Idle,
    /// Waiting for the provider
    Loading,
    /// Review and optimized code are available
    Success,
    /// The last request failed or was rejected
    Error,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Loading => "loading",
            SessionPhase::Success => "success",
            SessionPhase::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// A started review request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTicket {
    /// Request id; only the latest one may update the session
    pub id: u64,
    /// Source snapshot at the time the request started
    pub source_code: String,
    /// Language at the time the request started
    pub language: Language,
}

/// State holder for a single user's review workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewSession {
    source_code: String,
    language: Language,
    review: String,
    optimal_code: String,
    is_loading: bool,
    error: Option<String>,
    latest_request: u64,
}

impl ReviewSession {
    /// Create a session with initial source and language
    pub fn new(source_code: impl Into<String>, language: Language) -> Self {
        Self {
            source_code: source_code.into(),
            language,
            ..Self::default()
        }
    }

    /// Current source text
    pub fn source_code(&self) -> &str {
        &self.source_code
    }

    /// Selected language
    pub fn language(&self) -> Language {
        self.language
    }

    /// Markdown review of the last successful request (empty otherwise)
    pub fn review(&self) -> &str {
        &self.review
    }

    /// Optimized code of the last successful request (empty otherwise)
    pub fn optimal_code(&self) -> &str {
        &self.optimal_code
    }

    /// Whether a request is in flight
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// User-facing error message, if the last request failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current phase
    pub fn phase(&self) -> SessionPhase {
        if self.is_loading {
            SessionPhase::Loading
        } else if self.error.is_some() {
            SessionPhase::Error
        } else if !self.review.is_empty() {
            SessionPhase::Success
        } else {
            SessionPhase::Idle
        }
    }

    /// The completed result, if both fields are present
    pub fn result(&self) -> Option<ReviewResult> {
        (!self.review.is_empty() && !self.optimal_code.is_empty()).then(|| ReviewResult {
            review: self.review.clone(),
            optimal_code: self.optimal_code.clone(),
        })
    }

    /// Replace the source text
    pub fn set_source_code(&mut self, source_code: impl Into<String>) {
        self.source_code = source_code.into();
    }

    /// Select a language
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Clear the source text
    pub fn clear_source(&mut self) {
        self.source_code.clear();
    }

    /// Load an imported file
    ///
    /// The content replaces the source verbatim. The language follows the file
    /// extension, or stays as it is if the extension is not recognized.
    pub fn import(&mut self, source: ImportedSource) {
        self.language = source.language(self.language);
        debug!(file = %source.file_name, language = %self.language, "Loaded file into session");
        self.source_code = source.content;
    }

    fn reset_results(&mut self) {
        self.review.clear();
        self.optimal_code.clear();
        self.error = None;
    }

    /// Start a request
    ///
    /// Blank source is rejected with [`Error::Validation`] and the validation
    /// message is stored; no ticket is issued and any in-flight request is
    /// superseded. Otherwise prior results are
    /// cleared, the session enters the loading phase and a ticket with a new
    /// request id is returned.
    pub fn begin(&mut self) -> Result<ReviewTicket> {
        if self.source_code.trim().is_empty() {
            // supersede any request still in flight
            self.latest_request += 1;
            self.is_loading = false;
            self.reset_results();
            self.error = Some(EMPTY_SOURCE_MESSAGE.to_string());
            return Err(Error::Validation(EMPTY_SOURCE_MESSAGE.to_string()));
        }

        self.reset_results();
        self.is_loading = true;
        self.latest_request += 1;

        Ok(ReviewTicket {
            id: self.latest_request,
            source_code: self.source_code.clone(),
            language: self.language,
        })
    }

    /// Apply the outcome of request `id`
    ///
    /// Returns `false` and leaves the session untouched if `id` is not the
    /// latest request (superseded or cancelled).
    pub fn complete(&mut self, id: u64, outcome: Result<ReviewResult>) -> bool {
        if id != self.latest_request || !self.is_loading {
            debug!(request = id, latest = self.latest_request, "Discarding stale review response");
            return false;
        }

        self.is_loading = false;
        match outcome {
            Ok(result) => {
                info!(request = id, "Review completed");
                self.review = result.review;
                self.optimal_code = result.optimal_code;
            }
            Err(e) => {
                error!(request = id, error = %e, cause = ?std::error::Error::source(&e), "Review failed");
                self.error = Some(REVIEW_FAILED_MESSAGE.to_string());
            }
        }

        true
    }

    /// Abandon the in-flight request, if any
    ///
    /// Any later response for it is discarded. Returns whether a request was
    /// actually in flight.
    pub fn cancel(&mut self) -> bool {
        if !self.is_loading {
            return false;
        }

        info!(request = self.latest_request, "Review cancelled");
        self.latest_request += 1;
        self.is_loading = false;
        true
    }

    /// Run one review round trip against `client`
    ///
    /// Never fails; the outcome is reflected in the session state and the
    /// final phase is returned.
    pub async fn submit_review(&mut self, client: &ReviewClient) -> SessionPhase {
        let ticket = match self.begin() {
            Ok(ticket) => ticket,
            Err(_) => return self.phase(),
        };

        let outcome = client
            .request_review(&ticket.source_code, ticket.language)
            .await;
        self.complete(ticket.id, outcome);

        self.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{CompletionRequest, Provider};
    use crate::review::ReviewSettings;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Returns a fixed reply and counts calls
    struct StubProvider {
        reply: std::result::Result<String, &'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Provider for StubProvider {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(cause) => Err(Error::provider("stub", *cause)),
            }
        }
    }

    fn client(reply: std::result::Result<&str, &'static str>) -> (ReviewClient, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = StubProvider {
            reply: reply.map(str::to_string),
            calls: Arc::clone(&calls),
        };
        (ReviewClient::new(provider, ReviewSettings::default()), calls)
    }

    const GOOD_REPLY: &str = r###"{"review": "## Summary\nUse const.", "optimalCode": "const x = 1;"}"###;

    fn result(review: &str, code: &str) -> ReviewResult {
        ReviewResult {
            review: review.to_string(),
            optimal_code: code.to_string(),
        }
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ReviewSession::new("let x = 1;", Language::JavaScript);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_successful_review_stores_both_fields() {
        let (client, calls) = client(Ok(GOOD_REPLY));
        let mut session = ReviewSession::new("var x = 1;", Language::JavaScript);

        let phase = session.submit_review(&client).await;

        assert_eq!(phase, SessionPhase::Success);
        assert_eq!(session.review(), "## Summary\nUse const.");
        assert_eq!(session.optimal_code(), "const x = 1;");
        assert!(session.error().is_none());
        assert!(!session.is_loading());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_blank_source_makes_no_request() {
        let (client, calls) = client(Ok(GOOD_REPLY));

        for source in ["", "   ", "\n\t  \r\n"] {
            let mut session = ReviewSession::new(source, Language::Python);
            let phase = session.submit_review(&client).await;

            assert_eq!(phase, SessionPhase::Error);
            assert_eq!(session.error(), Some(EMPTY_SOURCE_MESSAGE));
            assert!(!session.is_loading());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_field_sets_generic_error() {
        let (client, _) = client(Ok(r#"{"review": "only review"}"#));
        let mut session = ReviewSession::new("puts 1", Language::Ruby);

        let phase = session.submit_review(&client).await;

        assert_eq!(phase, SessionPhase::Error);
        assert_eq!(session.error(), Some(REVIEW_FAILED_MESSAGE));
        assert_eq!(session.review(), "");
        assert_eq!(session.optimal_code(), "");
        assert!(session.result().is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_sets_generic_error() {
        let (client, _) = client(Err("connection reset"));
        let mut session = ReviewSession::new("SELECT * FROM t;", Language::Sql);

        session.submit_review(&client).await;

        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.error(), Some(REVIEW_FAILED_MESSAGE));
    }

    #[tokio::test]
    async fn test_new_request_clears_previous_error() {
        let (failing, _) = client(Err("boom"));
        let (working, _) = client(Ok(GOOD_REPLY));
        let mut session = ReviewSession::new("x = 1", Language::Python);

        session.submit_review(&failing).await;
        assert_eq!(session.phase(), SessionPhase::Error);

        session.submit_review(&working).await;
        assert_eq!(session.phase(), SessionPhase::Success);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_repeated_review_is_idempotent() {
        let (client, calls) = client(Ok(GOOD_REPLY));
        let mut session = ReviewSession::new("let a = [];", Language::TypeScript);

        session.submit_review(&client).await;
        let first = session.clone();
        session.submit_review(&client).await;

        assert_eq!(session.review(), first.review());
        assert_eq!(session.optimal_code(), first.optimal_code());
        assert_eq!(session.error(), first.error());
        assert_eq!(session.phase(), first.phase());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_begin_clears_results_and_loads() {
        let mut session = ReviewSession::new("int main() {}", Language::C);
        let ticket = session.begin().unwrap();
        assert!(session.complete(ticket.id, Ok(result("r", "c"))));
        assert_eq!(session.phase(), SessionPhase::Success);

        let ticket = session.begin().unwrap();
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert_eq!(session.review(), "");
        assert_eq!(session.optimal_code(), "");
        assert_eq!(ticket.source_code, "int main() {}");
        assert_eq!(ticket.language, Language::C);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut session = ReviewSession::new("fn a() {}", Language::Rust);

        let first = session.begin().unwrap();
        session.set_source_code("fn b() {}");
        let second = session.begin().unwrap();
        assert!(second.id > first.id);

        // second finishes first, then the stale one arrives
        assert!(session.complete(second.id, Ok(result("second", "fn b() {}"))));
        assert!(!session.complete(first.id, Ok(result("first", "fn a() {}"))));

        assert_eq!(session.review(), "second");
        assert_eq!(session.optimal_code(), "fn b() {}");
    }

    #[test]
    fn test_stale_response_while_newer_pending() {
        let mut session = ReviewSession::new("a", Language::Go);
        let first = session.begin().unwrap();
        let second = session.begin().unwrap();

        assert!(!session.complete(first.id, Err(Error::Timeout(std::time::Duration::from_secs(1)))));
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.error().is_none());

        assert!(session.complete(second.id, Ok(result("r", "c"))));
        assert_eq!(session.phase(), SessionPhase::Success);
    }

    #[test]
    fn test_cancel_discards_response() {
        let mut session = ReviewSession::new("<p>hi</p>", Language::Html);
        let ticket = session.begin().unwrap();

        assert!(session.cancel());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.cancel());

        assert!(!session.complete(ticket.id, Ok(result("late", "late"))));
        assert_eq!(session.review(), "");
    }

    #[test]
    fn test_import_sets_source_and_language() {
        let mut session = ReviewSession::new("", Language::JavaScript);
        let content = "fn main() {\r\n\tprintln!(\"ünïcode\");\r\n}\r\n";

        session.import(ImportedSource::new("main.rs", content));
        assert_eq!(session.source_code(), content);
        assert_eq!(session.language(), Language::Rust);

        session.import(ImportedSource::new("notes.txt", "plain"));
        assert_eq!(session.source_code(), "plain");
        assert_eq!(session.language(), Language::Rust);
    }

    #[test]
    fn test_clear_source() {
        let mut session = ReviewSession::new("body { }", Language::Css);
        session.clear_source();
        assert_eq!(session.source_code(), "");
        assert!(session.begin().is_err());
        assert_eq!(session.error(), Some(EMPTY_SOURCE_MESSAGE));
    }

    #[test]
    fn test_blank_resubmit_supersedes_in_flight_request() {
        let mut session = ReviewSession::new("fn a() {}", Language::Rust);
        let first = session.begin().unwrap();

        session.set_source_code("   ");
        assert!(session.begin().is_err());
        assert!(!session.is_loading());

        assert!(!session.complete(first.id, Ok(result("r", "c"))));
        assert_eq!(session.phase(), SessionPhase::Error);
        assert_eq!(session.error(), Some(EMPTY_SOURCE_MESSAGE));
        assert!(session.result().is_none());
    }

    struct SlowProvider;

    #[async_trait]
    impl Provider for SlowProvider {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn complete(&self, _request: &CompletionRequest) -> Result<String> {
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
            Ok(GOOD_REPLY.to_string())
        }
    }

    #[tokio::test]
    async fn test_timeout_clears_loading() {
        let settings = ReviewSettings {
            temperature: 0.3,
            timeout: std::time::Duration::from_millis(20),
        };
        let client = ReviewClient::new(SlowProvider, settings);
        let mut session = ReviewSession::new("print(1)", Language::Python);

        let phase = session.submit_review(&client).await;

        assert_eq!(phase, SessionPhase::Error);
        assert!(!session.is_loading());
        assert_eq!(session.error(), Some(REVIEW_FAILED_MESSAGE));
        assert!(session.result().is_none());
    }
}

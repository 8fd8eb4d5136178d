//! Question dispatch with a single-flight guarantee.
//!
//! `submit` turns one accepted question into exactly one outbound call and
//! exactly one assistant message, whatever happens to the call.

use bookchat_core::{
    ApiBaseUrl, AskError, AskRequest, AskResponse, AskTransport, DIAGNOSTICS_TARGET,
    HealthReport, Message,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::store::ConversationStore;

/// Why a submission was dropped without touching the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Blank after trimming.
    EmptyInput,
    /// Another question is still pending. Dropped, not queued.
    RequestInFlight,
    /// The widget has been unmounted.
    Unmounted,
}

/// What `submit` did with a question.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Answered(Message),
    /// The visitor got the fallback message; `error` is for diagnostics.
    Failed { message: Message, error: AskError },
    Dropped(DropReason),
}

impl SubmitOutcome {
    /// Whether the question was accepted (and so produced two messages).
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        !matches!(self, Self::Dropped(_))
    }
}

/// Sends questions to `{api_base_url}/ask` and records the results.
pub struct RequestDispatcher<T = Arc<dyn AskTransport>>
where
    T: Send + Sync,
{
    transport: T,
    store: ConversationStore,
    api_base_url: ApiBaseUrl,
    fallback_message: String,
    abort: watch::Receiver<bool>,
}

impl<T> RequestDispatcher<T>
where
    T: AskTransport,
{
    /// `abort` flipping to `true` cancels the in-flight call and refuses
    /// every later submission.
    pub fn new(
        transport: T,
        store: ConversationStore,
        api_base_url: ApiBaseUrl,
        fallback_message: String,
        abort: watch::Receiver<bool>,
    ) -> Self {
        info!(
            "Creating request dispatcher for {} (session {})",
            api_base_url.ask_url(),
            store.session_id()
        );

        Self {
            transport,
            store,
            api_base_url,
            fallback_message,
            abort,
        }
    }

    #[must_use]
    pub const fn api_base_url(&self) -> &ApiBaseUrl {
        &self.api_base_url
    }

    /// Submit a visitor question.
    ///
    /// `pending` is cleared on every exit path, including when this future is
    /// dropped before the backend answers.
    pub async fn submit(&self, question: &str) -> SubmitOutcome {
        let question = question.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return SubmitOutcome::Dropped(DropReason::EmptyInput);
        }

        if *self.abort.borrow() {
            warn!("Dropping question submitted after unmount");
            return SubmitOutcome::Dropped(DropReason::Unmounted);
        }

        let Some(user_message) = self.store.begin_request(question) else {
            warn!("Dropping question while another request is in flight");
            return SubmitOutcome::Dropped(DropReason::RequestInFlight);
        };

        let in_flight = InFlight {
            store: &self.store,
            fallback_message: &self.fallback_message,
            finished: false,
        };

        let url = self.api_base_url.ask_url();
        let request = AskRequest::new(question);
        info!("Dispatching question #{} to {url}", user_message.id);

        let result = tokio::select! {
            result = self.transport.post_question(&url, &request) => result,
            () = wait_for_abort(self.abort.clone()) => Err(AskError::Aborted),
        };

        in_flight.finish(result)
    }

    /// Probe `{api_base_url}/health`. Independent of the conversation.
    pub async fn health(&self) -> Result<HealthReport, AskError> {
        let report = self
            .transport
            .get_health(&self.api_base_url.health_url())
            .await;
        match &report {
            Ok(r) => info!("Backend health: {}", r.status),
            Err(e) => warn!(target: DIAGNOSTICS_TARGET, kind = e.kind(), "Health probe failed: {e}"),
        }
        report
    }
}

/// Resolves once the abort flag is raised; never, if the sender is gone.
async fn wait_for_abort(mut abort: watch::Receiver<bool>) {
    if abort.wait_for(|aborted| *aborted).await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Owns the `pending` flag for one accepted question.
///
/// Dropped without `finish` means the caller abandoned the future: that is
/// recorded as [`AskError::Aborted`] so the store never stays pending.
struct InFlight<'a> {
    store: &'a ConversationStore,
    fallback_message: &'a str,
    finished: bool,
}

impl InFlight<'_> {
    fn finish(mut self, result: Result<AskResponse, AskError>) -> SubmitOutcome {
        self.finished = true;
        match result {
            Ok(response) => {
                debug!(
                    target: DIAGNOSTICS_TARGET,
                    "Answer cited {} source chunk(s)",
                    response.source_chunks.len()
                );
                for chunk in &response.source_chunks {
                    debug!(target: DIAGNOSTICS_TARGET, "Source chunk: {chunk}");
                }
                SubmitOutcome::Answered(self.store.finish_request(&response.answer, None))
            }
            Err(error) => {
                let message = self.record_failure(error.clone());
                SubmitOutcome::Failed { message, error }
            }
        }
    }

    fn record_failure(&self, error: AskError) -> Message {
        warn!(
            target: DIAGNOSTICS_TARGET,
            kind = error.kind(),
            "Question failed: {error}"
        );
        self.store
            .finish_request(self.fallback_message, Some(error))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.record_failure(AskError::Aborted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bookchat_core::Sender;
    use std::sync::Mutex;

    const FALLBACK: &str = "Sorry, something went wrong.";

    /// Answers from a script and records every URL it was asked to hit.
    struct Scripted {
        replies: Mutex<Vec<Result<AskResponse, AskError>>>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl Scripted {
        fn new(replies: Vec<Result<AskResponse, AskError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AskTransport for Scripted {
        async fn post_question(
            &self,
            url: &str,
            request: &AskRequest,
        ) -> Result<AskResponse, AskError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), request.question.clone()));
            self.replies.lock().unwrap().remove(0)
        }

        async fn get_health(&self, _url: &str) -> Result<HealthReport, AskError> {
            Err(AskError::Transport("not scripted".to_string()))
        }
    }

    fn answer(text: &str) -> Result<AskResponse, AskError> {
        Ok(AskResponse {
            answer: text.to_string(),
            source_chunks: Vec::new(),
        })
    }

    fn dispatcher(
        base: &str,
        replies: Vec<Result<AskResponse, AskError>>,
    ) -> (RequestDispatcher<Scripted>, watch::Sender<bool>) {
        let (tx, rx) = watch::channel(false);
        let dispatcher = RequestDispatcher::new(
            Scripted::new(replies),
            ConversationStore::new("Hello!"),
            ApiBaseUrl::new(base),
            FALLBACK.to_string(),
            rx,
        );
        (dispatcher, tx)
    }

    #[tokio::test]
    async fn trims_question_before_sending() {
        let (d, _tx) = dispatcher("http://x:8000/", vec![answer("42")]);

        let outcome = d.submit("  What is the answer?\n").await;

        assert!(matches!(outcome, SubmitOutcome::Answered(ref m) if m.text == "42"));
        let calls = d.transport.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(
                "http://x:8000/ask".to_string(),
                "What is the answer?".to_string()
            )]
        );
        let state = d.store.snapshot();
        assert_eq!(state.messages[1].sender, Sender::User);
        assert_eq!(state.messages[1].text, "What is the answer?");
    }

    #[tokio::test]
    async fn blank_input_never_reaches_transport() {
        let (d, _tx) = dispatcher("http://x:8000", Vec::new());

        for input in ["", "   ", "\t\n"] {
            assert_eq!(
                d.submit(input).await,
                SubmitOutcome::Dropped(DropReason::EmptyInput)
            );
        }

        assert!(d.transport.calls.lock().unwrap().is_empty());
        assert_eq!(d.store.snapshot().messages.len(), 1);
    }

    #[tokio::test]
    async fn failure_appends_fallback_and_records_error() {
        let (d, _tx) = dispatcher(
            "http://x:8000",
            vec![Err(AskError::Server {
                status: 503,
                body: "down".to_string(),
            })],
        );

        let outcome = d.submit("hello").await;

        assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
        let state = d.store.snapshot();
        assert_eq!(state.last_message().map(|m| m.text.as_str()), Some(FALLBACK));
        assert!(!state.pending);
        assert_eq!(
            state.last_error,
            Some(AskError::Server {
                status: 503,
                body: "down".to_string()
            })
        );
    }

    #[tokio::test]
    async fn raised_abort_flag_refuses_new_questions() {
        let (d, tx) = dispatcher("http://x:8000", Vec::new());
        tx.send_replace(true);

        assert_eq!(
            d.submit("anyone there?").await,
            SubmitOutcome::Dropped(DropReason::Unmounted)
        );
        assert_eq!(d.store.snapshot().messages.len(), 1);
    }
}

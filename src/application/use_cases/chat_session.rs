use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::FutureExt;
use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::application::{CompletionClient, CompletionReply};
use crate::domain::{
    CompletionError, Conversation, DomainError, ModelCatalog, PromptComposer, RequestState,
    SessionSnapshot, Turn,
};

/// Why a call to [`ChatSession::submit`] did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitRejection {
    EmptyInput,
    RequestPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Settled(Turn),
    Rejected(SubmitRejection),
}

impl SubmitOutcome {
    pub fn turn(&self) -> Option<&Turn> {
        match self {
            SubmitOutcome::Settled(turn) => Some(turn),
            SubmitOutcome::Rejected(_) => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Settled(_))
    }
}

/// The conversation state store of one chat session.
///
/// Owns the turn log, the selected model, the single-flight request flag and
/// the pending input buffer. Handles are cheap to clone and all share the same
/// session; every mutation is published to subscribers of
/// [`ChatSession::subscribe`].
///
/// The state lock is never held across the completion call. The pending flag
/// is checked and set under one lock acquisition, so at most one completion is
/// in flight per session no matter how many tasks call `submit`.
#[derive(Clone)]
pub struct ChatSession {
    state: Arc<Mutex<SessionSnapshot>>,
    updates: Arc<watch::Sender<SessionSnapshot>>,
    client: Arc<dyn CompletionClient>,
    composer: Arc<PromptComposer>,
    catalog: Arc<ModelCatalog>,
}

impl ChatSession {
    pub fn new(client: Arc<dyn CompletionClient>, catalog: Arc<ModelCatalog>) -> Self {
        let initial = SessionSnapshot::new(catalog.default_model_id());
        let (updates, _) = watch::channel(initial.clone());
        Self {
            state: Arc::new(Mutex::new(initial)),
            updates: Arc::new(updates),
            client,
            composer: Arc::new(PromptComposer::new()),
            catalog,
        }
    }

    pub fn with_composer(mut self, composer: PromptComposer) -> Self {
        self.composer = Arc::new(composer);
        self
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn conversation(&self) -> Conversation {
        self.state.lock().await.conversation.clone()
    }

    pub async fn selected_model(&self) -> String {
        self.state.lock().await.selected_model.clone()
    }

    pub async fn request_state(&self) -> RequestState {
        self.state.lock().await.request_state
    }

    pub async fn set_input(&self, text: impl Into<String>) {
        let mut state = self.state.lock().await;
        state.input_buffer = text.into();
        self.updates.send_replace(state.clone());
    }

    /// Switches the model used for subsequent submissions. Ids missing from
    /// the catalog are rejected and the previous selection is kept.
    pub async fn select_model(&self, id: &str) -> Result<(), DomainError> {
        if !self.catalog.contains(id) {
            warn!("Rejected selection of unknown model '{}'", id);
            return Err(DomainError::unknown_model(id));
        }

        let mut state = self.state.lock().await;
        state.selected_model = id.to_string();
        self.updates.send_replace(state.clone());
        debug!("Selected model {}", id);
        Ok(())
    }

    /// Submits the input buffer as a new turn and waits for it to settle.
    ///
    /// Does nothing and reports a [`SubmitRejection`] when the trimmed buffer
    /// is empty or a request is already pending. Otherwise the buffer is
    /// cleared, the session goes pending, and exactly one turn is appended
    /// once the completion settles.
    ///
    /// Settlement runs on its own task: dropping the returned future does not
    /// cancel the request or leave the session pending.
    pub async fn submit(&self) -> Result<SubmitOutcome, DomainError> {
        let (user_text, history, model_id) = {
            let mut state = self.state.lock().await;
            if state.request_state.is_pending() {
                debug!("Submission ignored: a request is already pending");
                return Ok(SubmitOutcome::Rejected(SubmitRejection::RequestPending));
            }
            if state.input_buffer.trim().is_empty() {
                return Ok(SubmitOutcome::Rejected(SubmitRejection::EmptyInput));
            }

            let user_text = std::mem::take(&mut state.input_buffer);
            state.request_state = RequestState::Pending;
            self.updates.send_replace(state.clone());

            (
                user_text,
                state.conversation.turns().to_vec(),
                state.selected_model.clone(),
            )
        };

        info!(
            "Submitting turn {} to model {}",
            history.len() + 1,
            model_id
        );

        let state = Arc::clone(&self.state);
        let updates = Arc::clone(&self.updates);
        let client = Arc::clone(&self.client);
        let composer = Arc::clone(&self.composer);

        let settle = tokio::spawn(async move {
            let start_time = Instant::now();

            let attempt = AssertUnwindSafe(async {
                let prompt = composer.compose(&history, &user_text);
                client.complete(&prompt, &model_id).await
            })
            .catch_unwind()
            .await;

            let reply = attempt.unwrap_or_else(|_| {
                let err = CompletionError::unknown("completion task panicked");
                warn!("Completion failed: {}", err);
                CompletionReply::failure(err.user_message())
            });

            let turn = if reply.failed {
                Turn::failed(user_text, reply.text)
            } else {
                Turn::answered(user_text, reply.text)
            };

            let mut state = state.lock().await;
            state.conversation.append(turn.clone());
            state.request_state = RequestState::Idle;
            updates.send_replace(state.clone());

            info!(
                "Turn settled ({:?}) in {:.2}s",
                turn.outcome(),
                start_time.elapsed().as_secs_f64()
            );

            SubmitOutcome::Settled(turn)
        });

        settle
            .await
            .map_err(|e| DomainError::internal(format!("settle task did not complete: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::domain::TurnOutcome;

    /// Records every call; answers only once released.
    struct GatedClient {
        calls: AtomicUsize,
        prompts: std::sync::Mutex<Vec<(String, String)>>,
        release: Notify,
        gated: bool,
    }

    impl GatedClient {
        fn open() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: std::sync::Mutex::new(Vec::new()),
                release: Notify::new(),
                gated: false,
            }
        }

        fn gated() -> Self {
            Self {
                gated: true,
                ..Self::open()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn prompts(&self) -> Vec<(String, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for GatedClient {
        async fn complete(&self, prompt: &str, model_id: &str) -> CompletionReply {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), model_id.to_string()));
            if self.gated {
                self.release.notified().await;
            }
            if prompt.contains("fail") {
                CompletionReply::failure("An error occurred: boom")
            } else {
                CompletionReply::answer(format!("reply #{}", self.calls()))
            }
        }
    }

    struct PanickingClient;

    #[async_trait]
    impl CompletionClient for PanickingClient {
        async fn complete(&self, _prompt: &str, _model_id: &str) -> CompletionReply {
            panic!("client exploded");
        }
    }

    fn session_with(client: Arc<dyn CompletionClient>) -> ChatSession {
        ChatSession::new(client, Arc::new(ModelCatalog::builtin()))
    }

    #[tokio::test]
    async fn submit_appends_one_turn_and_returns_to_idle() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client.clone());

        session.set_input("Hello").await;
        let outcome = session.submit().await.unwrap();

        let turn = outcome.turn().expect("submission should settle");
        assert_eq!(turn.user_text(), "Hello");
        assert_eq!(turn.bot_text(), "reply #1");
        assert_eq!(turn.outcome(), TurnOutcome::Answered);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.conversation.len(), 1);
        assert_eq!(snapshot.request_state, RequestState::Idle);
        assert_eq!(snapshot.input_buffer, "");
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client.clone());
        let updates = session.subscribe();

        for input in ["", "   ", "\n\t "] {
            session.set_input(input).await;
            let before = session.snapshot().await;

            let outcome = session.submit().await.unwrap();

            assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejection::EmptyInput));
            assert_eq!(session.snapshot().await, before);
        }

        assert_eq!(client.calls(), 0);
        assert!(updates.borrow().conversation.is_empty());
    }

    #[tokio::test]
    async fn submit_while_pending_is_rejected() {
        let client = Arc::new(GatedClient::gated());
        let session = session_with(client.clone());
        let mut updates = session.subscribe();

        session.set_input("first").await;
        let in_flight = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };

        updates
            .wait_for(|s| s.request_state.is_pending())
            .await
            .unwrap();
        assert_eq!(session.snapshot().await.input_buffer, "");

        session.set_input("second").await;
        let rejected = session.submit().await.unwrap();
        assert_eq!(
            rejected,
            SubmitOutcome::Rejected(SubmitRejection::RequestPending)
        );
        assert_eq!(session.snapshot().await.input_buffer, "second");

        client.release.notify_one();
        let settled = in_flight.await.unwrap().unwrap();

        assert!(settled.is_accepted());
        assert_eq!(client.calls(), 1);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.conversation.len(), 1);
        assert_eq!(snapshot.request_state, RequestState::Idle);
    }

    #[tokio::test]
    async fn back_to_back_submissions_make_one_call() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client.clone());

        session.set_input("only once").await;
        let (a, b) = tokio::join!(session.submit(), session.submit());

        let accepted = [a.unwrap(), b.unwrap()]
            .iter()
            .filter(|o| o.is_accepted())
            .count();
        assert_eq!(accepted, 1);
        assert_eq!(client.calls(), 1);
        assert_eq!(session.conversation().await.len(), 1);
    }

    #[tokio::test]
    async fn abandoned_submit_still_settles() {
        let client = Arc::new(GatedClient::gated());
        let session = session_with(client.clone());
        let mut updates = session.subscribe();

        session.set_input("nobody waits for me").await;
        let caller = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };

        updates
            .wait_for(|s| s.request_state.is_pending())
            .await
            .unwrap();
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        client.release.notify_one();
        let settled = updates
            .wait_for(|s| !s.request_state.is_pending())
            .await
            .unwrap()
            .clone();

        assert_eq!(settled.request_state, RequestState::Idle);
        assert_eq!(settled.conversation.len(), 1);
        assert_eq!(
            settled.conversation.last().map(|t| t.user_text()),
            Some("nobody waits for me")
        );
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn prompt_includes_history_and_selected_model() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client.clone());

        session.set_input("one").await;
        session.submit().await.unwrap();
        session.select_model("gpt-3.5-turbo").await.unwrap();
        session.set_input("two").await;
        session.submit().await.unwrap();

        let prompts = client.prompts();
        assert_eq!(prompts[0], ("You: one".to_string(), "gpt-4o".to_string()));
        assert_eq!(
            prompts[1],
            (
                "one\nAI: reply #1\nYou: two".to_string(),
                "gpt-3.5-turbo".to_string()
            )
        );
    }

    #[tokio::test]
    async fn failed_completion_still_appends_a_turn() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client);

        session.set_input("please fail").await;
        let outcome = session.submit().await.unwrap();

        let turn = outcome.turn().unwrap();
        assert!(turn.is_failed());
        assert_eq!(turn.bot_text(), "An error occurred: boom");
        assert_eq!(session.request_state().await, RequestState::Idle);
    }

    #[tokio::test]
    async fn panicking_client_maps_to_no_response_message() {
        let session = session_with(Arc::new(PanickingClient));

        session.set_input("hi").await;
        let outcome = session.submit().await.unwrap();

        let turn = outcome.turn().unwrap();
        assert_eq!(turn.bot_text(), crate::domain::NO_RESPONSE_MESSAGE);
        assert!(turn.is_failed());
        assert_eq!(session.request_state().await, RequestState::Idle);
    }

    #[tokio::test]
    async fn unknown_model_keeps_previous_selection() {
        let session = session_with(Arc::new(GatedClient::open()));

        session.select_model("gpt-4o-mini").await.unwrap();
        let err = session.select_model("does-not-exist").await.unwrap_err();

        assert!(matches!(err, DomainError::UnknownModel(ref id) if id == "does-not-exist"));
        assert_eq!(session.selected_model().await, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn observers_see_pending_then_idle() {
        let client = Arc::new(GatedClient::gated());
        let session = session_with(client.clone());
        let mut updates = session.subscribe();

        session.set_input("watch me").await;
        let in_flight = {
            let session = session.clone();
            tokio::spawn(async move { session.submit().await })
        };

        let pending = updates
            .wait_for(|s| s.request_state.is_pending())
            .await
            .unwrap()
            .clone();
        assert!(pending.conversation.is_empty());
        assert_eq!(pending.input_buffer, "");

        client.release.notify_one();
        let settled = updates
            .wait_for(|s| !s.request_state.is_pending() && s.conversation.len() == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(
            settled.conversation.last().map(|t| t.user_text()),
            Some("watch me")
        );

        in_flight.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn custom_composer_labels_reach_the_client() {
        let client = Arc::new(GatedClient::open());
        let session = session_with(client.clone())
            .with_composer(PromptComposer::with_labels("User", "Assistant"));

        session.set_input("a").await;
        session.submit().await.unwrap();
        session.set_input("b").await;
        session.submit().await.unwrap();

        assert_eq!(client.prompts()[1].0, "a\nAssistant: reply #1\nUser: b");
    }
}

use crate::api::{FailureKind, QaBackend, classify};
use crate::render::Renderer;
use crate::session::Session;
use crate::strings::Strings;
use crate::types::{QueryReply, Role};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input, or another query is still in flight.
    Rejected,
    Answered,
    Failed(FailureKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClearOutcome {
    /// No conversation to clear; no request was made.
    Skipped,
    Cleared,
    Failed,
}

/// Page load, form submit and clear-button flows for one chat.
pub struct ChatController<B> {
    backend: B,
    session: Session,
    strings: Strings,
}

impl<B: QaBackend> ChatController<B> {
    pub fn new(backend: B, session: Session, strings: Strings) -> Self {
        Self {
            backend,
            session,
            strings,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Replay the stored conversation, if any. Returns how many messages
    /// were rendered; failures leave the transcript untouched.
    pub async fn load_history<R: Renderer + ?Sized>(&self, renderer: &mut R) -> usize {
        let Some(conversation_id) = self.session.conversation_id() else {
            return 0;
        };

        match self.backend.fetch_history(&conversation_id).await {
            Ok(messages) if !messages.is_empty() => {
                renderer.reset_transcript();
                for message in &messages {
                    renderer.render_message(message.role, &message.content);
                }
                renderer.scroll_to_bottom();
                messages.len()
            }
            Ok(_) => 0,
            Err(err) => {
                tracing::warn!(%conversation_id, "error fetching conversation history: {err}");
                0
            }
        }
    }

    pub async fn submit<R: Renderer + ?Sized>(&self, input: &str, renderer: &mut R) -> SubmitOutcome {
        let query = input.trim();
        if query.is_empty() || !self.session.try_begin_request() {
            return SubmitOutcome::Rejected;
        }

        renderer.render_message(Role::User, query);
        renderer.clear_input();
        renderer.set_loading(true);

        let conversation_id = self.session.conversation_id();
        let result = self
            .backend
            .submit_query(query, conversation_id.as_deref())
            .await;

        self.session.end_request();
        renderer.set_loading(false);

        let outcome = match result {
            Ok(reply) => {
                self.apply_reply(&reply, renderer);
                SubmitOutcome::Answered
            }
            Err(err) => {
                tracing::error!("query failed: {err}");
                let kind = classify(&err);
                renderer.render_message(Role::System, &kind.user_message(&self.strings));
                SubmitOutcome::Failed(kind)
            }
        };
        renderer.scroll_to_bottom();
        outcome
    }

    fn apply_reply<R: Renderer + ?Sized>(&self, reply: &QueryReply, renderer: &mut R) {
        if let Some(id) = reply.new_conversation_id() {
            self.session.set_conversation_id(id);
        }
        if let Some(answer) = reply.answer() {
            renderer.render_message(Role::Assistant, answer);
        }
        let sources = reply.cited_sources();
        if !sources.is_empty() {
            renderer.render_sources(sources);
        }
    }

    pub async fn clear<R: Renderer + ?Sized>(&self, renderer: &mut R) -> ClearOutcome {
        let Some(conversation_id) = self.session.conversation_id() else {
            return ClearOutcome::Skipped;
        };

        match self.backend.clear_history(&conversation_id).await {
            Ok(()) => {
                renderer.reset_transcript();
                self.session.clear_conversation_id();
                ClearOutcome::Cleared
            }
            Err(err) => {
                tracing::warn!(%conversation_id, "error clearing conversation: {err}");
                ClearOutcome::Failed
            }
        }
    }
}

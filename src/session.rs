//! Per-session orchestration: transcript, profile, and the
//! one-turn-at-a-time status machine.
//!
//! `SessionController` owns everything a session accumulates. A turn is:
//! append the user record, enter `AwaitingInference`, route, merge the
//! update, append the assistant record, return to `Idle`. The router
//! always settles, so the controller has no failure path of its own.
//! Sessions share nothing; independent controllers never interact.

use chrono::{DateTime, Utc};

use crate::inference::{InferenceProvider, router};
use crate::profile::{self, ProfileState};

// ── Transcript ───────────────────────────────────────────────────────────────

/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// One displayed transcript entry. Never mutated after creation; vec order
/// is chronological order is display order.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TurnRecord {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

// ── Controller ───────────────────────────────────────────────────────────────

/// `AwaitingInference` is the sole suspension point; no other profile or
/// transcript mutation happens while it is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    AwaitingInference,
}

/// What [`SessionController::submit`] did with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A full turn ran: user record appended, backend consulted, update
    /// merged, assistant record appended.
    Replied,
    /// Input was empty/whitespace, or a turn was already in flight.
    Ignored,
}

pub struct SessionController {
    profile: ProfileState,
    transcript: Vec<TurnRecord>,
    status: SessionStatus,
    chain: Vec<InferenceProvider>,
}

impl SessionController {
    /// Fresh session with a generated id and the given provider chain.
    pub fn new(chain: Vec<InferenceProvider>) -> Self {
        Self::with_profile(ProfileState::new(), chain)
    }

    /// Session resuming from an explicit profile. Tests use this to pin
    /// session ids; the console uses [`SessionController::new`].
    pub fn with_profile(profile: ProfileState, chain: Vec<InferenceProvider>) -> Self {
        Self {
            profile,
            transcript: Vec::new(),
            status: SessionStatus::Idle,
            chain,
        }
    }

    pub fn profile(&self) -> &ProfileState {
        &self.profile
    }

    pub fn transcript(&self) -> &[TurnRecord] {
        &self.transcript
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Run one turn.
    ///
    /// Whitespace-only input is a no-op, and a submission while a turn is
    /// in flight is rejected rather than queued: two concurrent merges
    /// into the same profile must not race. `&mut self` already serializes
    /// callers; the status guard covers re-entrant wrappers that poll.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let message = input.trim();
        if message.is_empty() || self.status != SessionStatus::Idle {
            return SubmitOutcome::Ignored;
        }

        self.status = SessionStatus::AwaitingInference;
        self.transcript.push(TurnRecord::new(Sender::User, message));

        // Always settles: success, fallback, or the degraded result.
        let result = router::route(message, &self.profile, &self.chain).await;

        self.profile = profile::merge(&self.profile, &result.update);
        self.transcript
            .push(TurnRecord::new(Sender::Assistant, result.reply));
        self.status = SessionStatus::Idle;

        SubmitOutcome::Replied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::inference::providers::scripted::ScriptedProvider;
    use crate::inference::{InferenceResult, ProviderError};

    fn controller_with(outcomes: Vec<InferenceProvider>) -> SessionController {
        SessionController::with_profile(
            ProfileState::with_session_id("SESSION_TEST00000"),
            outcomes,
        )
    }

    fn extracting(reply: &str, field: &str, value: &str) -> InferenceProvider {
        let update: BTreeMap<String, String> =
            [(field.to_string(), value.to_string())].into_iter().collect();
        InferenceProvider::Scripted(ScriptedProvider::succeeding(InferenceResult {
            reply: reply.to_string(),
            update,
        }))
    }

    #[tokio::test]
    async fn whitespace_submission_is_a_no_op() {
        let mut c = controller_with(vec![extracting("unused", "niche", "x")]);
        assert_eq!(c.submit("   \t ").await, SubmitOutcome::Ignored);
        assert!(c.transcript().is_empty());
        assert_eq!(c.status(), SessionStatus::Idle);
        assert_eq!(c.profile().completeness(), 0);
    }

    #[tokio::test]
    async fn turn_appends_user_then_assistant_and_merges() {
        let mut c = controller_with(vec![extracting("Got it", "niche", "coffee shop")]);

        assert_eq!(c.submit("I run a small coffee shop").await, SubmitOutcome::Replied);

        let t = c.transcript();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].sender, Sender::User);
        assert_eq!(t[0].text, "I run a small coffee shop");
        assert_eq!(t[1].sender, Sender::Assistant);
        assert_eq!(t[1].text, "Got it");
        assert!(t[0].timestamp <= t[1].timestamp);

        assert_eq!(c.profile().niche.as_deref(), Some("coffee shop"));
        assert_eq!(c.profile().completeness(), 20);
        assert_eq!(c.status(), SessionStatus::Idle);
    }

    #[tokio::test]
    async fn input_is_trimmed_before_recording() {
        let mut c = controller_with(vec![InferenceProvider::Scripted(ScriptedProvider::echo())]);
        c.submit("  hello  ").await;
        assert_eq!(c.transcript()[0].text, "hello");
    }

    #[tokio::test]
    async fn busy_session_rejects_submission() {
        let mut c = controller_with(vec![InferenceProvider::Scripted(ScriptedProvider::echo())]);
        c.status = SessionStatus::AwaitingInference;

        assert_eq!(c.submit("hello").await, SubmitOutcome::Ignored);
        assert!(c.transcript().is_empty());
    }

    #[tokio::test]
    async fn degraded_turn_keeps_session_interactive() {
        let failing = InferenceProvider::Scripted(ScriptedProvider::failing(
            ProviderError::Transport("down".into()),
        ));
        let mut c = controller_with(vec![failing]);

        for _ in 0..3 {
            assert_eq!(c.submit("anyone there?").await, SubmitOutcome::Replied);
            assert_eq!(c.status(), SessionStatus::Idle);
        }

        assert_eq!(c.transcript().len(), 6);
        assert_eq!(c.transcript()[1].text, router::DEGRADED_REPLY);
        assert_eq!(c.profile().completeness(), 0);
    }

    #[tokio::test]
    async fn consecutive_turns_accumulate_the_profile() {
        let mut c = controller_with(vec![extracting("noted", "niche", "bakery")]);
        c.submit("first").await;

        // Carry the accumulated profile into a second controller whose
        // chain extracts a different field.
        let mut c = SessionController::with_profile(
            c.profile().clone(),
            vec![extracting("noted", "target_audience", "locals")],
        );
        c.submit("second").await;

        assert_eq!(c.profile().niche.as_deref(), Some("bakery"));
        assert_eq!(c.profile().target_audience.as_deref(), Some("locals"));
        assert_eq!(c.profile().completeness(), 40);
    }
}

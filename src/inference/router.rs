//! Failure-tolerant routing across the provider chain.
//!
//! `route` never fails outward: the first provider to succeed wins, each
//! failure advances to the next entry, and an exhausted chain degrades to
//! a fixed apology result. At most one successful backend call is ever
//! surfaced per turn.

use tracing::{debug, warn};

use crate::inference::{InferenceProvider, InferenceResult};
use crate::profile::ProfileState;

/// Reply surfaced when every backend has failed. The update stays empty,
/// so a degraded turn is shape-identical to a normal one and the profile
/// simply does not advance.
pub const DEGRADED_REPLY: &str = "Connection Error. Please resend your message.";

/// The fixed result for the terminal failure path.
pub fn degraded_result() -> InferenceResult {
    InferenceResult::reply_only(DEGRADED_REPLY)
}

/// Try each backend in chain order and return the first success.
///
/// A success is terminal even when its update is empty; only an error
/// advances the chain. Always settles, never panics or errors.
pub async fn route(
    message: &str,
    snapshot: &ProfileState,
    chain: &[InferenceProvider],
) -> InferenceResult {
    for provider in chain {
        debug!(provider = provider.name(), "trying backend");
        match provider.infer(message, snapshot).await {
            Ok(result) => {
                debug!(
                    provider = provider.name(),
                    update_fields = result.update.len(),
                    "backend succeeded"
                );
                return result;
            }
            Err(e) => {
                warn!(provider = provider.name(), error = %e, "backend failed");
            }
        }
    }

    warn!("all inference backends failed, degrading");
    degraded_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::providers::scripted::ScriptedProvider;
    use crate::inference::ProviderError;

    fn snapshot() -> ProfileState {
        ProfileState::with_session_id("SESSION_TEST00000")
    }

    fn ok_provider(reply: &str) -> (InferenceProvider, ScriptedProvider) {
        let p = ScriptedProvider::succeeding(InferenceResult::reply_only(reply));
        (InferenceProvider::Scripted(p.clone()), p)
    }

    fn failing_provider() -> (InferenceProvider, ScriptedProvider) {
        let p = ScriptedProvider::failing(ProviderError::Transport("down".into()));
        (InferenceProvider::Scripted(p.clone()), p)
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let (primary, primary_probe) = ok_provider("from primary");
        let (fallback, fallback_probe) = ok_provider("from fallback");

        let result = route("hi", &snapshot(), &[primary, fallback]).await;

        assert_eq!(result.reply, "from primary");
        assert_eq!(primary_probe.calls(), 1);
        assert_eq!(fallback_probe.calls(), 0);
    }

    #[tokio::test]
    async fn empty_update_success_is_still_terminal() {
        // An empty update is a valid answer, not a reason to fall back.
        let (primary, _) = ok_provider("nothing new");
        let (fallback, fallback_probe) = ok_provider("unused");

        let result = route("hi", &snapshot(), &[primary, fallback]).await;

        assert_eq!(result.reply, "nothing new");
        assert!(result.update.is_empty());
        assert_eq!(fallback_probe.calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_triggers_fallback_exactly_once() {
        let (primary, primary_probe) = failing_provider();
        let (fallback, fallback_probe) = ok_provider("from fallback");

        let result = route("hi", &snapshot(), &[primary, fallback]).await;

        assert_eq!(result.reply, "from fallback");
        assert_eq!(primary_probe.calls(), 1);
        assert_eq!(fallback_probe.calls(), 1);
    }

    #[tokio::test]
    async fn shape_failure_also_advances() {
        let p = ScriptedProvider::failing(ProviderError::Shape("garbage body".into()));
        let (fallback, fallback_probe) = ok_provider("recovered");

        let result = route("hi", &snapshot(), &[InferenceProvider::Scripted(p), fallback]).await;

        assert_eq!(result.reply, "recovered");
        assert_eq!(fallback_probe.calls(), 1);
    }

    #[tokio::test]
    async fn total_failure_degrades() {
        let (a, a_probe) = failing_provider();
        let (b, b_probe) = failing_provider();

        let result = route("hi", &snapshot(), &[a, b]).await;

        assert_eq!(result.reply, DEGRADED_REPLY);
        assert!(result.update.is_empty());
        assert_eq!(a_probe.calls(), 1);
        assert_eq!(b_probe.calls(), 1);
    }

    #[tokio::test]
    async fn empty_chain_degrades() {
        let result = route("hi", &snapshot(), &[]).await;
        assert_eq!(result.reply, DEGRADED_REPLY);
    }
}

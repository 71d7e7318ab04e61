//! Request lifecycle tracking for non-blocking backend calls.
//!
//! Every backend operation the dashboard performs (login, loading links,
//! creating one, deleting one, ...) goes through a [`RemoteData`] value: a
//! small state machine that owns the operation's lifecycle from trigger to
//! settlement. The host delivers HTTP results as events, possibly out of
//! order and possibly after the user has re-triggered the same operation, so
//! the wrapper does two jobs:
//!
//! 1. It makes the lifecycle a tagged [`Phase`] (idle, pending, success,
//!    failure) so impossible combinations like "data and error at once"
//!    cannot be represented, and
//! 2. It stamps every trigger with a monotonically increasing generation and
//!    refuses settlements from superseded generations, so when invocations
//!    overlap the *latest-issued* one always wins, deterministically,
//!    regardless of arrival order.
//!
//! The wrapper never performs I/O. Callers take the generation returned by
//! [`RemoteData::begin`], attach it to the dispatched request, and feed the
//! correlated result back through [`RemoteData::settle`].

/// Lifecycle phase of one logical backend operation.
///
/// `Pending` retains the last successful value so a refetch does not blank
/// the screen: the dashboard keeps rendering `previous` until the new result
/// lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase<T, E> {
    /// Never triggered. No data, no error, not loading.
    Idle,
    /// A request is in flight. `previous` holds the last successful value,
    /// if there was one, for display during the wait.
    Pending { previous: Option<T> },
    /// The most recent request resolved.
    Success(T),
    /// The most recent request was rejected.
    Failure(E),
}

/// One logical asynchronous operation, tracked across repeated invocations.
///
/// # Examples
///
/// ```
/// use linkdeck::domain::RemoteData;
///
/// let mut links: RemoteData<Vec<String>, String> = RemoteData::new();
/// assert!(!links.is_loading());
///
/// let generation = links.begin();
/// assert!(links.is_loading());
///
/// // The result arrives as an event, stamped with the generation it
/// // belongs to. Only the latest-issued generation is accepted.
/// let applied = links.settle(generation, Ok(vec!["tinyurlx.in/docs".to_string()]));
/// assert!(applied);
/// assert_eq!(links.data().map(Vec::len), Some(1));
/// assert!(links.error().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteData<T, E> {
    generation: u64,
    phase: Phase<T, E>,
}

impl<T, E> RemoteData<T, E> {
    /// Creates an idle wrapper. Generation starts at zero; the first
    /// [`begin`](Self::begin) returns 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: 0,
            phase: Phase::Idle,
        }
    }

    /// Triggers the operation, returning the generation to stamp onto the
    /// outgoing request.
    ///
    /// The wrapper moves to `Pending` from any phase. A prior success is
    /// carried into `Pending::previous`; re-triggering while already pending
    /// keeps whatever `previous` was there and invalidates the outstanding
    /// request (its settlement will no longer match the generation).
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        let previous = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Success(value) => Some(value),
            Phase::Pending { previous } => previous,
            Phase::Idle | Phase::Failure(_) => None,
        };
        self.phase = Phase::Pending { previous };
        self.generation
    }

    /// Applies a settlement for the request stamped with `generation`.
    ///
    /// Returns `true` and transitions to `Success` or `Failure` when the
    /// wrapper is still pending on exactly that generation. Returns `false`
    /// and leaves the state untouched otherwise: the settlement belongs to a
    /// superseded request, or the wrapper was reset while the request was in
    /// flight. Callers treat a `false` return as "discard and do not redraw".
    pub fn settle(&mut self, generation: u64, result: Result<T, E>) -> bool {
        if generation != self.generation || !self.is_loading() {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding settlement for superseded request"
            );
            return false;
        }
        self.phase = match result {
            Ok(value) => Phase::Success(value),
            Err(error) => Phase::Failure(error),
        };
        true
    }

    /// Returns to `Idle`, forgetting data and errors.
    ///
    /// Any in-flight request is invalidated: its settlement arrives to a
    /// wrapper that is no longer pending and is discarded.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
    }

    /// The current value: the settled success, or while pending, the
    /// retained previous success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match &self.phase {
            Phase::Success(value) => Some(value),
            Phase::Pending { previous } => previous.as_ref(),
            Phase::Idle | Phase::Failure(_) => None,
        }
    }

    /// The settled error, if the last invocation was rejected.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match &self.phase {
            Phase::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// True while a triggered invocation has not been settled or invalidated.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Pending { .. })
    }

    /// The full phase, for exhaustive rendering matches.
    #[must_use]
    pub fn phase(&self) -> &Phase<T, E> {
        &self.phase
    }

    /// The generation of the most recently triggered invocation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<T, E> Default for RemoteData<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn starts_idle_with_nothing_observable() {
        let remote: RemoteData<Value, String> = RemoteData::new();
        assert_eq!(remote.phase(), &Phase::Idle);
        assert!(remote.data().is_none());
        assert!(remote.error().is_none());
        assert!(!remote.is_loading());
        assert_eq!(remote.generation(), 0);
    }

    #[test]
    fn resolving_exposes_data_and_clears_loading() {
        let mut remote: RemoteData<Value, String> = RemoteData::new();
        let generation = remote.begin();
        assert!(remote.is_loading());
        assert!(remote.data().is_none());

        assert!(remote.settle(generation, Ok(json!({"id": "abc123"}))));
        assert!(!remote.is_loading());
        assert_eq!(remote.data(), Some(&json!({"id": "abc123"})));
        assert!(remote.error().is_none());
    }

    #[test]
    fn rejecting_exposes_error_and_clears_loading() {
        let mut remote: RemoteData<Value, String> = RemoteData::new();
        let generation = remote.begin();

        assert!(remote.settle(generation, Err("duplicate alias".to_string())));
        assert!(!remote.is_loading());
        assert!(remote.data().is_none());
        assert_eq!(remote.error(), Some(&"duplicate alias".to_string()));
    }

    #[test]
    fn loading_spans_trigger_to_settlement_for_both_outcomes() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();

        let generation = remote.begin();
        assert!(remote.is_loading());
        remote.settle(generation, Ok(1));
        assert!(!remote.is_loading());

        let generation = remote.begin();
        assert!(remote.is_loading());
        remote.settle(generation, Err("boom".to_string()));
        assert!(!remote.is_loading());
    }

    #[test]
    fn refetch_retains_previous_success_while_pending() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let first = remote.begin();
        remote.settle(first, Ok(7));

        remote.begin();
        assert!(remote.is_loading());
        assert_eq!(remote.data(), Some(&7));
        assert_eq!(remote.phase(), &Phase::Pending { previous: Some(7) });
    }

    #[test]
    fn failure_then_refetch_has_no_previous() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let first = remote.begin();
        remote.settle(first, Err("down".to_string()));

        remote.begin();
        assert_eq!(remote.data(), None);
        assert_eq!(remote.phase(), &Phase::Pending { previous: None });
    }

    #[test]
    fn retrigger_while_pending_invalidates_the_older_request() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let first = remote.begin();
        let second = remote.begin();
        assert_ne!(first, second);

        // Newer settles first, then the stale one arrives late.
        assert!(remote.settle(second, Ok(2)));
        assert!(!remote.settle(first, Ok(1)));
        assert_eq!(remote.data(), Some(&2));
        assert!(!remote.is_loading());
    }

    #[test]
    fn stale_settlement_arriving_first_is_discarded_and_loading_persists() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let first = remote.begin();
        let second = remote.begin();

        // Older result arrives while the newer request is still in flight.
        assert!(!remote.settle(first, Ok(1)));
        assert!(remote.is_loading());
        assert_eq!(remote.data(), None);

        assert!(remote.settle(second, Err("rejected".to_string())));
        assert_eq!(remote.error(), Some(&"rejected".to_string()));
    }

    #[test]
    fn stale_failure_cannot_overwrite_newer_success() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let first = remote.begin();
        let second = remote.begin();

        assert!(remote.settle(second, Ok(42)));
        assert!(!remote.settle(first, Err("timeout".to_string())));
        assert_eq!(remote.data(), Some(&42));
        assert!(remote.error().is_none());
    }

    #[test]
    fn reset_invalidates_in_flight_requests() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        let generation = remote.begin();
        remote.reset();

        assert!(!remote.settle(generation, Ok(9)));
        assert_eq!(remote.phase(), &Phase::Idle);
    }

    #[test]
    fn settle_without_begin_is_a_no_op() {
        let mut remote: RemoteData<u32, String> = RemoteData::new();
        assert!(!remote.settle(0, Ok(1)));
        assert_eq!(remote.phase(), &Phase::Idle);
    }

    #[test]
    fn create_link_scenario() {
        // A create resolving with the new row, then a second create rejected
        // by the backend for a duplicate alias. The success survives the
        // pending window of the follow-up request.
        let mut remote: RemoteData<Value, Value> = RemoteData::new();

        let generation = remote.begin();
        assert!(remote.settle(generation, Ok(json!({"id": "abc123"}))));
        assert_eq!(remote.data(), Some(&json!({"id": "abc123"})));

        let generation = remote.begin();
        assert_eq!(remote.data(), Some(&json!({"id": "abc123"})));
        assert!(remote.settle(
            generation,
            Err(json!({"message": "duplicate alias"}))
        ));
        assert_eq!(remote.error(), Some(&json!({"message": "duplicate alias"})));
        assert!(remote.data().is_none());
    }
}

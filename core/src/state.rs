//! Request state - the slice of store state owned by one lifecycle reducer.
//!
//! `RequestState` tracks a single asynchronous request: an arbitrary result
//! body under `data`, the [`PromiseState`] lifecycle marker, and the
//! transport metadata copied from the last response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Lifecycle marker for one asynchronous operation.
///
/// Exactly one of the four values at any time. Serialized with the
/// uppercase wire names (`INIT`, `PENDING`, `RESOLVED`, `REJECTED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromiseState {
    /// No request has been issued yet
    #[default]
    Init,
    /// A request is in flight
    Pending,
    /// The last request completed successfully
    Resolved,
    /// The last request failed
    Rejected,
}

impl std::fmt::Display for PromiseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init => write!(f, "INIT"),
            Self::Pending => write!(f, "PENDING"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Transport response envelope passed through the success and failure
/// continuations of a request handler.
///
/// Success and failure carry the same shape: a result body plus the
/// transport metadata. Whether a response is a success or a failure is
/// decided by the handler, never by the reducer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponsePayload {
    /// Result body (error body on failure)
    pub data: Value,
    /// Numeric transport status
    pub status: u16,
    /// Human-readable status line
    pub status_text: String,
    /// Response headers
    pub headers: HashMap<String, String>,
}

impl ResponsePayload {
    /// Create a payload from a body and status metadata
    #[must_use]
    pub fn new(data: Value, status: u16, status_text: impl Into<String>) -> Self {
        Self {
            data,
            status,
            status_text: status_text.into(),
            headers: HashMap::new(),
        }
    }

    /// Attach headers to the payload
    #[must_use]
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Extract the transport metadata portion of the envelope
    #[must_use]
    pub fn meta(&self) -> TransportMeta {
        TransportMeta {
            headers: self.headers.clone(),
            status_text: self.status_text.clone(),
            status: self.status,
        }
    }
}

/// The `{headers, statusText, status}` projection of a [`ResponsePayload`],
/// merged verbatim into state on both resolution and rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportMeta {
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Human-readable status line
    pub status_text: String,
    /// Numeric transport status
    pub status: u16,
}

/// State slice owned by one lifecycle reducer.
///
/// The reducer never mutates this in place across dispatches; the store
/// holds the single writable copy and every transition produces the next
/// value under the store's write lock.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestState {
    /// Arbitrary result fields, replaced wholesale on resolution
    pub data: Map<String, Value>,
    /// Lifecycle marker
    pub promise_state: PromiseState,
    /// Numeric status of the last response, if any response arrived
    pub status: Option<u16>,
    /// Status line of the last response
    pub status_text: Option<String>,
    /// Headers of the last response
    pub headers: HashMap<String, String>,
}

impl RequestState {
    /// Create a state with the given initial data and `INIT` marker
    #[must_use]
    pub fn with_data(data: Map<String, Value>) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Copy transport metadata from a response envelope into this state
    pub fn apply_meta(&mut self, meta: &TransportMeta) {
        self.headers = meta.headers.clone();
        self.status_text = Some(meta.status_text.clone());
        self.status = Some(meta.status);
    }

    /// Merge a configured initial state over this state, key-wise.
    ///
    /// `data` and `promise_state` always come from the initial state.
    /// Transport metadata fields are only overwritten where the initial
    /// state actually defines them, so a default initial state leaves the
    /// metadata of the last response in place.
    pub fn merge_initial(&mut self, initial: &RequestState) {
        self.data = initial.data.clone();
        self.promise_state = initial.promise_state;
        if initial.status.is_some() {
            self.status = initial.status;
        }
        if initial.status_text.is_some() {
            self.status_text = initial.status_text.clone();
        }
        if !initial.headers.is_empty() {
            self.headers = initial.headers.clone();
        }
    }
}

/// Aggregate store state keyed by store name.
///
/// Each lifecycle owns one named slice; selectors project a slice (or a
/// derived view of it) out of the aggregate.
pub type StoreSlices = HashMap<String, RequestState>;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/panic
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn promise_state_wire_names() {
        assert_eq!(PromiseState::Init.to_string(), "INIT");
        assert_eq!(PromiseState::Rejected.to_string(), "REJECTED");
        let json = serde_json::to_string(&PromiseState::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn default_state_is_init_with_empty_data() {
        let state = RequestState::default();
        assert_eq!(state.promise_state, PromiseState::Init);
        assert!(state.data.is_empty());
        assert!(state.status.is_none());
    }

    #[test]
    fn apply_meta_copies_fields_verbatim() {
        let payload = ResponsePayload::new(json!({"id": 7}), 200, "OK");
        let mut state = RequestState::default();
        state.apply_meta(&payload.meta());

        assert_eq!(state.status, Some(200));
        assert_eq!(state.status_text.as_deref(), Some("OK"));
        assert!(state.headers.is_empty());
    }

    #[test]
    fn merge_initial_leaves_absent_metadata_untouched() {
        let mut state = RequestState::default();
        state.status = Some(500);
        state.status_text = Some("Error".to_string());
        state.data.insert("id".to_string(), json!(7));
        state.promise_state = PromiseState::Rejected;

        state.merge_initial(&RequestState::default());

        assert!(state.data.is_empty());
        assert_eq!(state.promise_state, PromiseState::Init);
        // Default initial state defines no metadata, so the last
        // response's metadata survives the merge.
        assert_eq!(state.status, Some(500));
        assert_eq!(state.status_text.as_deref(), Some("Error"));
    }

    #[test]
    fn merge_initial_applies_configured_metadata() {
        let initial = RequestState {
            status: Some(0),
            ..RequestState::default()
        };

        let mut state = RequestState::default();
        state.status = Some(404);
        state.merge_initial(&initial);

        assert_eq!(state.status, Some(0));
    }
}

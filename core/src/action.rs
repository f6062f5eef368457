//! Lifecycle actions - the closed input alphabet of a lifecycle reducer.
//!
//! Action kinds are a fixed enumeration resolved at construction time, not
//! strings assembled on every dispatch. The configured prefix travels with
//! each action so that several lifecycle reducers can compose over one
//! store without stealing each other's transitions.

use crate::state::ResponsePayload;
use serde_json::{Map, Value};
use std::sync::Arc;

/// The four recognized action kinds of a lifecycle reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleKind {
    /// Start a request
    Requested {
        /// Target of the request, opaque to the reducer
        url: String,
        /// Request parameters, forwarded to the handler untouched
        params: Map<String, Value>,
        /// Request body, forwarded to the handler untouched
        body: Value,
    },
    /// The transport reported success
    Received(ResponsePayload),
    /// The transport reported failure
    Failed(ResponsePayload),
    /// Return to the configured initial state
    Reset,
}

impl LifecycleKind {
    /// Suffix of the legacy wire-style type name for this kind
    #[must_use]
    pub const fn suffix(&self) -> &'static str {
        match self {
            Self::Requested { .. } => "REQUESTED",
            Self::Received(_) => "RECEIVED",
            Self::Failed(_) => "FAILED",
            Self::Reset => "RESET",
        }
    }
}

/// One action addressed to the lifecycle reducer configured with `prefix`.
///
/// A reducer only handles actions whose prefix matches its own; everything
/// else passes through as an identity transition.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleAction {
    /// Prefix of the lifecycle this action belongs to
    pub prefix: Arc<str>,
    /// What happened
    pub kind: LifecycleKind,
}

impl LifecycleAction {
    /// Construct a `Requested` action
    #[must_use]
    pub fn requested(
        prefix: Arc<str>,
        url: impl Into<String>,
        params: Map<String, Value>,
        body: Value,
    ) -> Self {
        Self {
            prefix,
            kind: LifecycleKind::Requested {
                url: url.into(),
                params,
                body,
            },
        }
    }

    /// Construct a `Received` action carrying a success payload
    #[must_use]
    pub const fn received(prefix: Arc<str>, payload: ResponsePayload) -> Self {
        Self {
            prefix,
            kind: LifecycleKind::Received(payload),
        }
    }

    /// Construct a `Failed` action carrying a failure payload
    #[must_use]
    pub const fn failed(prefix: Arc<str>, payload: ResponsePayload) -> Self {
        Self {
            prefix,
            kind: LifecycleKind::Failed(payload),
        }
    }

    /// Construct a `Reset` action
    #[must_use]
    pub const fn reset(prefix: Arc<str>) -> Self {
        Self {
            prefix,
            kind: LifecycleKind::Reset,
        }
    }

    /// Render the wire-style type name, e.g. `ITEMS_REQUESTED`.
    ///
    /// For logs and interop with string-keyed consumers only; dispatch
    /// never goes through this string.
    #[must_use]
    pub fn type_name(&self) -> String {
        format!("{}_{}", self.prefix, self.kind.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_name_renders_prefix_and_suffix() {
        let prefix: Arc<str> = Arc::from("ITEMS");
        let action = LifecycleAction::requested(
            Arc::clone(&prefix),
            "/items",
            Map::new(),
            json!({}),
        );
        assert_eq!(action.type_name(), "ITEMS_REQUESTED");
        assert_eq!(LifecycleAction::reset(prefix).type_name(), "ITEMS_RESET");
    }

    #[test]
    fn received_and_failed_share_the_payload_shape() {
        let prefix: Arc<str> = Arc::from("ITEMS");
        let payload = ResponsePayload::new(json!({"message": "boom"}), 500, "Error");
        let failed = LifecycleAction::failed(Arc::clone(&prefix), payload.clone());
        let received = LifecycleAction::received(prefix, payload);

        assert_eq!(failed.kind.suffix(), "FAILED");
        assert_eq!(received.kind.suffix(), "RECEIVED");
    }
}

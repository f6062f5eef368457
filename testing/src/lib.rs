//! # Reloop Testing
//!
//! Testing utilities for request-lifecycle reducers.
//!
//! This crate provides:
//! - Scripted [`mocks::MockRequestHandler`] implementations of the
//!   transport seam
//! - The fluent [`ReducerTest`] harness with Given-When-Then syntax
//! - Assertion helpers for effect lists
//!
//! ## Example
//!
//! ```ignore
//! use reloop_testing::mocks::MockRequestHandler;
//!
//! let handler = MockRequestHandler::new()
//!     .ok(ResponsePayload::new(json!({"id": 7}), 200, "OK"));
//!
//! let lifecycle = LifecycleConfig::new()
//!     .prefix("ITEMS")
//!     .request_handler(Arc::new(handler.clone()))
//!     .build()?;
//! ```

/// Mock implementations of the transport seam
pub mod mocks {
    use futures::future::BoxFuture;
    use reloop_core::environment::{RequestHandler, TransportResult};
    use reloop_core::state::ResponsePayload;
    use serde_json::{Map, Value};
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex, PoisonError};

    /// One recorded transport call
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedCall {
        /// Requested url
        pub url: String,
        /// Requested params
        pub params: Map<String, Value>,
        /// Requested body
        pub body: Value,
    }

    /// Scripted request handler for deterministic tests.
    ///
    /// Outcomes are consumed from a queue in script order; once the queue
    /// is exhausted the fallback outcome is returned (default: a failure
    /// payload with status 0 so an under-scripted test surfaces as a
    /// rejection, not a hang). Every call is recorded with its arguments.
    ///
    /// Clones share the script and the recorded calls.
    ///
    /// # Example
    ///
    /// ```
    /// use reloop_testing::mocks::MockRequestHandler;
    /// use reloop_core::state::ResponsePayload;
    /// use serde_json::json;
    ///
    /// let handler = MockRequestHandler::new()
    ///     .ok(ResponsePayload::new(json!({"id": 7}), 200, "OK"))
    ///     .err(ResponsePayload::new(json!({"message": "boom"}), 500, "Error"));
    /// ```
    #[derive(Clone)]
    pub struct MockRequestHandler {
        script: Arc<Mutex<VecDeque<TransportResult>>>,
        fallback: Arc<TransportResult>,
        calls: Arc<Mutex<Vec<RecordedCall>>>,
    }

    impl MockRequestHandler {
        /// Create a handler with an empty script
        #[must_use]
        pub fn new() -> Self {
            Self {
                script: Arc::new(Mutex::new(VecDeque::new())),
                fallback: Arc::new(Err(ResponsePayload::new(
                    Value::Null,
                    0,
                    "mock: no scripted response",
                ))),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Script a success outcome
        #[must_use]
        pub fn ok(self, payload: ResponsePayload) -> Self {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(Ok(payload));
            self
        }

        /// Script a failure outcome
        #[must_use]
        pub fn err(self, payload: ResponsePayload) -> Self {
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(Err(payload));
            self
        }

        /// Set the outcome returned once the script is exhausted
        #[must_use]
        pub fn fallback(mut self, outcome: TransportResult) -> Self {
            self.fallback = Arc::new(outcome);
            self
        }

        /// All calls recorded so far, in order
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of calls recorded so far
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    impl Default for MockRequestHandler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl std::fmt::Debug for MockRequestHandler {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockRequestHandler")
                .field("call_count", &self.call_count())
                .finish_non_exhaustive()
        }
    }

    impl RequestHandler for MockRequestHandler {
        fn call(
            &self,
            url: String,
            params: Map<String, Value>,
            body: Value,
        ) -> BoxFuture<'static, TransportResult> {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(RecordedCall { url, params, body });

            let outcome = self
                .script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| (*self.fallback).clone());

            Box::pin(async move { outcome })
        }
    }

    /// A handler that always succeeds with the given payload
    #[must_use]
    pub fn ok_handler(payload: ResponsePayload) -> MockRequestHandler {
        MockRequestHandler::new().fallback(Ok(payload))
    }

    /// A handler that always fails with the given payload
    #[must_use]
    pub fn err_handler(payload: ResponsePayload) -> MockRequestHandler {
        MockRequestHandler::new().fallback(Err(payload))
    }
}


// Re-export commonly used items
pub use mocks::{MockRequestHandler, err_handler, ok_handler};
pub use reducer_test::ReducerTest;

//! Environment - dependency injection at the transport seam.
//!
//! The only external dependency a lifecycle reducer has is the function
//! that performs the actual request. It is abstracted behind the
//! [`RequestHandler`] trait and injected via [`LifecycleEnvironment`], so
//! reducers stay pure and tests swap in scripted handlers.

use crate::state::ResponsePayload;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Outcome of a transport call.
///
/// `Ok` is the success continuation, `Err` the failure continuation. Both
/// carry the same envelope shape; classifying a response as one or the
/// other (status codes included) is entirely the handler's job.
pub type TransportResult = Result<ResponsePayload, ResponsePayload>;

/// A function performing one request.
///
/// The reducer never awaits this directly: the call is declared as an
/// effect and driven by the store runtime. Handlers report their outcome
/// through [`TransportResult`]; they must not panic - a panicking handler
/// falls through to the runtime's default task error handling and produces
/// no lifecycle action at all.
///
/// # Example
///
/// ```ignore
/// struct HttpHandler { client: reqwest::Client }
///
/// impl RequestHandler for HttpHandler {
///     fn call(
///         &self,
///         url: String,
///         params: Map<String, Value>,
///         body: Value,
///     ) -> BoxFuture<'static, TransportResult> {
///         let client = self.client.clone();
///         Box::pin(async move { /* perform the request */ })
///     }
/// }
/// ```
pub trait RequestHandler: Send + Sync {
    /// Perform the request described by `(url, params, body)`
    fn call(
        &self,
        url: String,
        params: Map<String, Value>,
        body: Value,
    ) -> BoxFuture<'static, TransportResult>;
}

// Closures work as handlers directly, which keeps small callers and tests
// free of single-use wrapper types.
impl<F> RequestHandler for F
where
    F: Fn(String, Map<String, Value>, Value) -> BoxFuture<'static, TransportResult>
        + Send
        + Sync,
{
    fn call(
        &self,
        url: String,
        params: Map<String, Value>,
        body: Value,
    ) -> BoxFuture<'static, TransportResult> {
        self(url, params, body)
    }
}

/// Injected dependencies of a lifecycle reducer.
#[derive(Clone)]
pub struct LifecycleEnvironment {
    request_handler: Arc<dyn RequestHandler>,
}

impl LifecycleEnvironment {
    /// Create an environment around a request handler
    #[must_use]
    pub fn new(request_handler: Arc<dyn RequestHandler>) -> Self {
        Self { request_handler }
    }

    /// The configured request handler
    #[must_use]
    pub fn request_handler(&self) -> Arc<dyn RequestHandler> {
        Arc::clone(&self.request_handler)
    }
}

impl std::fmt::Debug for LifecycleEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleEnvironment")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn closures_implement_request_handler() {
        let handler = |_url: String, _params: Map<String, Value>, _body: Value| {
            let fut: BoxFuture<'static, TransportResult> = Box::pin(async {
                Ok(ResponsePayload::new(json!({"ok": true}), 200, "OK"))
            });
            fut
        };

        let env = LifecycleEnvironment::new(Arc::new(handler));
        let result = futures::executor::block_on(env.request_handler().call(
            "/ping".to_string(),
            Map::new(),
            json!({}),
        ));
        assert_eq!(result.map(|p| p.status), Ok(200));
    }
}

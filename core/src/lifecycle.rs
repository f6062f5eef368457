//! The request lifecycle factory.
//!
//! [`LifecycleConfig`] turns a configuration (prefix, request handler,
//! chained-action specs, data transformer, initial state) into a
//! [`RequestLifecycle`]: two action constructors, a pure reducer over
//! [`RequestState`], and the store-slice metadata. The reducer walks the
//! issue → pending → resolved/rejected → reset machine and declares its
//! side effects as data for the runtime to execute.

use crate::action::{LifecycleAction, LifecycleKind};
use crate::effect::Effect;
use crate::environment::{LifecycleEnvironment, RequestHandler};
use crate::reducer::Reducer;
use crate::state::{PromiseState, RequestState, StoreSlices};
use serde_json::{Map, Value};
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;
use thiserror::Error;

/// A function deriving a secondary action from the triggering action.
pub type ChainedAction = Arc<dyn Fn(&LifecycleAction) -> LifecycleAction + Send + Sync>;

/// A function turning a success body into the next `data` map.
pub type DataTransformer = Arc<dyn Fn(&Value) -> Map<String, Value> + Send + Sync>;

/// A projection from the aggregate store state to a derived view.
pub type Selector = Arc<dyn Fn(&StoreSlices) -> RequestState + Send + Sync>;

/// Secondary actions to dispatch when a lifecycle transition occurs.
///
/// Every entry is invoked with the triggering action and the resulting
/// action becomes a dispatch command. With `sequence` the dispatches are
/// applied strictly in the given order; without it the runtime may apply
/// them in any order.
///
/// Each configuration owns fresh `ChainSpec` values - nothing is shared
/// between reducer instances.
#[derive(Clone, Default)]
pub struct ChainSpec {
    actions: Vec<ChainedAction>,
    sequence: bool,
}

impl ChainSpec {
    /// An empty, unordered chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action-producing function to the chain
    #[must_use]
    pub fn action<F>(mut self, make: F) -> Self
    where
        F: Fn(&LifecycleAction) -> LifecycleAction + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(make));
        self
    }

    /// Require the chained dispatches to be applied strictly in order
    #[must_use]
    pub fn sequenced(mut self, sequence: bool) -> Self {
        self.sequence = sequence;
        self
    }

    /// Number of chained actions
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the chain is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for ChainSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainSpec")
            .field("actions", &self.actions.len())
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// Construction-time configuration faults.
///
/// Misconfiguration aborts lifecycle creation; it never surfaces as a
/// runtime transition fault.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No action prefix was configured
    #[error("lifecycle configuration requires an action prefix")]
    MissingPrefix,

    /// The configured prefix is empty
    #[error("lifecycle action prefix must not be empty")]
    EmptyPrefix,

    /// No request handler was configured
    #[error("lifecycle configuration requires a request handler")]
    MissingRequestHandler,
}

/// Builder for a [`RequestLifecycle`].
///
/// `prefix` and `request_handler` are required; everything else has a
/// usable default.
///
/// # Example
///
/// ```ignore
/// let lifecycle = LifecycleConfig::new()
///     .prefix("ITEMS")
///     .request_handler(Arc::new(http_handler))
///     .on_received(ChainSpec::new().action(|_| audit_log_action()))
///     .build()?;
/// ```
#[derive(Default)]
pub struct LifecycleConfig {
    prefix: Option<String>,
    request_handler: Option<Arc<dyn RequestHandler>>,
    requested: ChainSpec,
    received: ChainSpec,
    rejected: ChainSpec,
    received_data_transformer: Option<DataTransformer>,
    initial_state: Option<RequestState>,
    store_name: Option<String>,
    selector: Option<Selector>,
}

impl LifecycleConfig {
    /// Start an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action prefix (required)
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the request handler (required)
    #[must_use]
    pub fn request_handler(mut self, handler: Arc<dyn RequestHandler>) -> Self {
        self.request_handler = Some(handler);
        self
    }

    /// Actions to dispatch alongside the transport call on `Requested`
    #[must_use]
    pub fn on_requested(mut self, spec: ChainSpec) -> Self {
        self.requested = spec;
        self
    }

    /// Actions to dispatch after a `Received` transition
    #[must_use]
    pub fn on_received(mut self, spec: ChainSpec) -> Self {
        self.received = spec;
        self
    }

    /// Actions to dispatch after a `Failed` transition
    #[must_use]
    pub fn on_rejected(mut self, spec: ChainSpec) -> Self {
        self.rejected = spec;
        self
    }

    /// Override the success-body transform (default: shallow copy of the
    /// body object into `data`)
    #[must_use]
    pub fn received_data_transformer<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value) -> Map<String, Value> + Send + Sync + 'static,
    {
        self.received_data_transformer = Some(Arc::new(transform));
        self
    }

    /// Override the initial state (default: empty data, `INIT`)
    #[must_use]
    pub fn initial_state(mut self, state: RequestState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Key under which this slice lives in the aggregate store
    /// (default: the prefix, lowercased)
    #[must_use]
    pub fn store_name(mut self, name: impl Into<String>) -> Self {
        self.store_name = Some(name.into());
        self
    }

    /// Override the state projection (default: clone of the named slice)
    #[must_use]
    pub fn selector<F>(mut self, select: F) -> Self
    where
        F: Fn(&StoreSlices) -> RequestState + Send + Sync + 'static,
    {
        self.selector = Some(Arc::new(select));
        self
    }

    /// Build the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required field is missing or the
    /// prefix is empty. Construction fails fast rather than producing a
    /// reducer that misbehaves later.
    pub fn build(self) -> Result<RequestLifecycle, ConfigError> {
        let prefix = self.prefix.ok_or(ConfigError::MissingPrefix)?;
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix);
        }
        let handler = self
            .request_handler
            .ok_or(ConfigError::MissingRequestHandler)?;

        let prefix: Arc<str> = Arc::from(prefix.as_str());
        let store_name = self
            .store_name
            .unwrap_or_else(|| prefix.to_lowercase());
        let transformer = self
            .received_data_transformer
            .unwrap_or_else(|| Arc::new(shallow_copy_transform));
        let initial_state = self.initial_state.unwrap_or_default();

        tracing::debug!(prefix = %prefix, store_name = %store_name, "Building request lifecycle");

        Ok(RequestLifecycle {
            reducer: LifecycleReducer {
                prefix: Arc::clone(&prefix),
                requested: self.requested,
                received: self.received,
                rejected: self.rejected,
                transformer,
                initial_state,
            },
            environment: LifecycleEnvironment::new(handler),
            prefix,
            store_name,
            selector: self.selector,
        })
    }
}

impl std::fmt::Debug for LifecycleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleConfig")
            .field("prefix", &self.prefix)
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

/// Default success-body transform: a shallow copy of the body object.
///
/// Non-object bodies produce an empty map, mirroring a shallow spread of a
/// scalar.
fn shallow_copy_transform(body: &Value) -> Map<String, Value> {
    body.as_object().cloned().unwrap_or_default()
}

/// The pure state machine of one request lifecycle.
///
/// Owns no mutable state; every dispatch rewrites the store-held
/// [`RequestState`] and returns effect commands.
#[derive(Clone)]
pub struct LifecycleReducer {
    prefix: Arc<str>,
    requested: ChainSpec,
    received: ChainSpec,
    rejected: ChainSpec,
    transformer: DataTransformer,
    initial_state: RequestState,
}

impl LifecycleReducer {
    /// The configured initial state
    #[must_use]
    pub const fn initial_state(&self) -> &RequestState {
        &self.initial_state
    }

    /// Compile the transport invocation into a future effect.
    ///
    /// The handler's success continuation becomes a `Received` action, its
    /// failure continuation a `Failed` action. A transport failure never
    /// crosses this boundary as an error.
    fn transport_effect(
        &self,
        env: &LifecycleEnvironment,
        url: String,
        params: Map<String, Value>,
        body: Value,
    ) -> Effect<LifecycleAction> {
        let handler = env.request_handler();
        let prefix = Arc::clone(&self.prefix);
        Effect::Future(Box::pin(async move {
            let outcome = handler.call(url, params, body).await;
            Some(match outcome {
                Ok(payload) => LifecycleAction::received(prefix, payload),
                Err(payload) => LifecycleAction::failed(prefix, payload),
            })
        }))
    }

    /// Compile a chain spec into dispatch commands.
    ///
    /// Sequenced chains become a single `Sequential` composite so the
    /// runtime applies them in order; unordered chains are pushed as
    /// independent dispatches.
    fn push_chain(
        &self,
        spec: &ChainSpec,
        trigger: &LifecycleAction,
        effects: &mut SmallVec<[Effect<LifecycleAction>; 4]>,
    ) {
        if spec.actions.is_empty() {
            return;
        }
        let dispatches = spec
            .actions
            .iter()
            .map(|make| Effect::dispatch(make(trigger)));
        if spec.sequence {
            effects.push(Effect::Sequential(dispatches.collect()));
        } else {
            effects.extend(dispatches);
        }
    }
}

impl std::fmt::Debug for LifecycleReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleReducer")
            .field("prefix", &self.prefix)
            .field("requested", &self.requested)
            .field("received", &self.received)
            .field("rejected", &self.rejected)
            .finish_non_exhaustive()
    }
}

impl Reducer for LifecycleReducer {
    type State = RequestState;
    type Action = LifecycleAction;
    type Environment = LifecycleEnvironment;

    fn reduce(
        &self,
        state: &mut RequestState,
        action: LifecycleAction,
        env: &LifecycleEnvironment,
    ) -> SmallVec<[Effect<LifecycleAction>; 4]> {
        // Identity transition for actions this reducer does not own.
        if *action.prefix != *self.prefix {
            return SmallVec::new();
        }

        tracing::trace!(action = %action.type_name(), "Lifecycle transition");

        match action.kind {
            LifecycleKind::Requested {
                ref url,
                ref params,
                ref body,
            } => {
                state.promise_state = PromiseState::Pending;

                let mut effects = SmallVec::new();
                effects.push(self.transport_effect(
                    env,
                    url.clone(),
                    params.clone(),
                    body.clone(),
                ));
                self.push_chain(&self.requested, &action, &mut effects);
                effects
            },

            LifecycleKind::Received(ref payload) => {
                state.data = (self.transformer)(&payload.data);
                state.apply_meta(&payload.meta());
                state.promise_state = PromiseState::Resolved;

                let mut effects = SmallVec::new();
                self.push_chain(&self.received, &action, &mut effects);
                effects
            },

            LifecycleKind::Failed(ref payload) => {
                // Metadata from the failure envelope is kept; data goes
                // back to the configured initial value.
                state.apply_meta(&payload.meta());
                state.merge_initial(&self.initial_state);
                state.promise_state = PromiseState::Rejected;

                let mut effects = SmallVec::new();
                self.push_chain(&self.rejected, &action, &mut effects);
                effects
            },

            LifecycleKind::Reset => {
                state.merge_initial(&self.initial_state);
                smallvec![Effect::None]
            },
        }
    }
}

/// The produced interface of one configured lifecycle.
///
/// Exposes the action constructors, the reducer and its environment for
/// plugging into a store, and the slice metadata for state retrieval.
#[derive(Clone)]
pub struct RequestLifecycle {
    prefix: Arc<str>,
    reducer: LifecycleReducer,
    environment: LifecycleEnvironment,
    store_name: String,
    selector: Option<Selector>,
}

impl RequestLifecycle {
    /// Construct a `Requested` action with an empty body
    #[must_use]
    pub fn request(&self, url: impl Into<String>, params: Map<String, Value>) -> LifecycleAction {
        self.request_with_body(url, params, Value::Object(Map::new()))
    }

    /// Construct a `Requested` action with an explicit body
    #[must_use]
    pub fn request_with_body(
        &self,
        url: impl Into<String>,
        params: Map<String, Value>,
        body: Value,
    ) -> LifecycleAction {
        LifecycleAction::requested(Arc::clone(&self.prefix), url, params, body)
    }

    /// Construct a `Reset` action
    #[must_use]
    pub fn reset(&self) -> LifecycleAction {
        LifecycleAction::reset(Arc::clone(&self.prefix))
    }

    /// The configured action prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The pure state-transition function for this lifecycle
    #[must_use]
    pub fn reducer(&self) -> LifecycleReducer {
        self.reducer.clone()
    }

    /// The environment carrying the request handler
    #[must_use]
    pub fn environment(&self) -> LifecycleEnvironment {
        self.environment.clone()
    }

    /// Key under which this slice lives in the aggregate store
    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// The configured initial state for this lifecycle's slice
    #[must_use]
    pub const fn initial_state(&self) -> &RequestState {
        self.reducer.initial_state()
    }

    /// Project this lifecycle's view out of the aggregate store state.
    ///
    /// Uses the configured selector override, or clones the named slice.
    #[must_use]
    pub fn select(&self, slices: &StoreSlices) -> RequestState {
        match &self.selector {
            Some(select) => select(slices),
            None => slices.get(&self.store_name).cloned().unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for RequestLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLifecycle")
            .field("prefix", &self.prefix)
            .field("store_name", &self.store_name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code
mod tests {
    use super::*;
    use crate::environment::TransportResult;
    use crate::state::ResponsePayload;
    use futures::future::BoxFuture;
    use proptest::prelude::*;
    use serde_json::json;

    fn ok_handler(payload: ResponsePayload) -> Arc<dyn RequestHandler> {
        Arc::new(
            move |_url: String, _params: Map<String, Value>, _body: Value| {
                let payload = payload.clone();
                let fut: BoxFuture<'static, TransportResult> =
                    Box::pin(async move { Ok(payload) });
                fut
            },
        )
    }

    fn err_handler(payload: ResponsePayload) -> Arc<dyn RequestHandler> {
        Arc::new(
            move |_url: String, _params: Map<String, Value>, _body: Value| {
                let payload = payload.clone();
                let fut: BoxFuture<'static, TransportResult> =
                    Box::pin(async move { Err(payload) });
                fut
            },
        )
    }

    fn items_lifecycle(handler: Arc<dyn RequestHandler>) -> RequestLifecycle {
        LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(handler)
            .build()
            .unwrap()
    }

    /// Run a future effect to completion and return the action it produced.
    fn run_future_effect(effect: Effect<LifecycleAction>) -> LifecycleAction {
        match effect {
            Effect::Future(fut) => {
                futures::executor::block_on(fut).expect("transport effect produces an action")
            },
            other => panic!("expected a future effect, got {other:?}"),
        }
    }

    #[test]
    fn build_requires_prefix() {
        let err = LifecycleConfig::new()
            .request_handler(ok_handler(ResponsePayload::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingPrefix);
    }

    #[test]
    fn build_rejects_empty_prefix() {
        let err = LifecycleConfig::new()
            .prefix("")
            .request_handler(ok_handler(ResponsePayload::default()))
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::EmptyPrefix);
    }

    #[test]
    fn build_requires_request_handler() {
        let err = LifecycleConfig::new().prefix("ITEMS").build().unwrap_err();
        assert_eq!(err, ConfigError::MissingRequestHandler);
    }

    #[test]
    fn store_name_defaults_to_lowercased_prefix() {
        let lifecycle = items_lifecycle(ok_handler(ResponsePayload::default()));
        assert_eq!(lifecycle.store_name(), "items");
    }

    #[test]
    fn foreign_prefix_is_an_identity_transition() {
        let lifecycle = items_lifecycle(ok_handler(ResponsePayload::default()));
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        state.data.insert("keep".to_string(), json!(true));
        let before = state.clone();

        let foreign = LifecycleAction::reset(Arc::from("ORDERS"));
        let effects = reducer.reduce(&mut state, foreign, &env);

        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn requested_enters_pending_with_one_transport_effect() {
        let lifecycle = items_lifecycle(ok_handler(ResponsePayload::default()));
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        let effects = reducer.reduce(&mut state, lifecycle.request("/items", Map::new()), &env);

        assert_eq!(state.promise_state, PromiseState::Pending);
        assert_eq!(effects.len(), 1);
        assert!(matches!(effects[0], Effect::Future(_)));
    }

    #[test]
    fn requested_declares_chained_dispatches() {
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(ok_handler(ResponsePayload::default()))
            .on_requested(
                ChainSpec::new()
                    .action(|_| LifecycleAction::reset(Arc::from("AUDIT")))
                    .action(|_| LifecycleAction::reset(Arc::from("METRICS"))),
            )
            .build()
            .unwrap();
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        let effects = reducer.reduce(&mut state, lifecycle.request("/items", Map::new()), &env);

        // One transport invocation plus one dispatch per chained action.
        assert_eq!(effects.len(), 3);
        assert!(matches!(effects[0], Effect::Future(_)));
        assert!(matches!(effects[1], Effect::Dispatch(_)));
        assert!(matches!(effects[2], Effect::Dispatch(_)));
    }

    #[test]
    fn sequenced_chain_compiles_to_sequential_dispatches() {
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(ok_handler(ResponsePayload::default()))
            .on_received(
                ChainSpec::new()
                    .action(|_| LifecycleAction::reset(Arc::from("FIRST")))
                    .action(|_| LifecycleAction::reset(Arc::from("SECOND")))
                    .sequenced(true),
            )
            .build()
            .unwrap();
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let payload = ResponsePayload::new(json!({"id": 7}), 200, "OK");
        let mut state = RequestState::default();
        let effects = reducer.reduce(
            &mut state,
            LifecycleAction::received(Arc::from("ITEMS"), payload),
            &env,
        );

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Sequential(inner) => {
                assert_eq!(inner.len(), 2);
                match (&inner[0], &inner[1]) {
                    (Effect::Dispatch(first), Effect::Dispatch(second)) => {
                        assert_eq!(&*first.prefix, "FIRST");
                        assert_eq!(&*second.prefix, "SECOND");
                    },
                    other => panic!("expected ordered dispatches, got {other:?}"),
                }
            },
            other => panic!("expected a sequential composite, got {other:?}"),
        }
    }

    #[test]
    fn chained_actions_see_the_triggering_action() {
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(ok_handler(ResponsePayload::default()))
            .on_rejected(ChainSpec::new().action(|trigger| {
                // Derive the chained action from the trigger's payload.
                match &trigger.kind {
                    LifecycleKind::Failed(payload) => LifecycleAction::failed(
                        Arc::from("MIRROR"),
                        payload.clone(),
                    ),
                    _ => LifecycleAction::reset(Arc::from("MIRROR")),
                }
            }))
            .build()
            .unwrap();
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let payload = ResponsePayload::new(json!({"message": "boom"}), 500, "Error");
        let mut state = RequestState::default();
        let effects = reducer.reduce(
            &mut state,
            LifecycleAction::failed(Arc::from("ITEMS"), payload),
            &env,
        );

        assert_eq!(effects.len(), 1);
        match &effects[0] {
            Effect::Dispatch(chained) => {
                assert_eq!(&*chained.prefix, "MIRROR");
                assert!(matches!(
                    chained.kind,
                    LifecycleKind::Failed(ref p) if p.status == 500
                ));
            },
            other => panic!("expected a dispatch, got {other:?}"),
        }
    }

    #[test]
    fn resolves_with_transformed_data_and_verbatim_metadata() {
        let payload = ResponsePayload::new(json!({"id": 7}), 200, "OK");
        let lifecycle = items_lifecycle(ok_handler(payload));
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        let mut effects =
            reducer.reduce(&mut state, lifecycle.request("/items", Map::new()), &env);
        assert_eq!(state.promise_state, PromiseState::Pending);

        // Drive the declared transport effect and feed its action back.
        let follow_up = run_future_effect(effects.remove(0));
        assert_eq!(follow_up.type_name(), "ITEMS_RECEIVED");
        reducer.reduce(&mut state, follow_up, &env);

        assert_eq!(state.promise_state, PromiseState::Resolved);
        assert_eq!(state.data.get("id"), Some(&json!(7)));
        assert_eq!(state.status, Some(200));
        assert_eq!(state.status_text.as_deref(), Some("OK"));
        assert!(state.headers.is_empty());
    }

    #[test]
    fn failure_rejects_and_resets_data_to_initial() {
        let mut initial = RequestState::default();
        initial
            .data
            .insert("page_size".to_string(), json!(25));

        let payload = ResponsePayload::new(json!({"message": "boom"}), 500, "Error");
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(err_handler(payload))
            .initial_state(initial.clone())
            .build()
            .unwrap();
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = initial.clone();
        let mut effects =
            reducer.reduce(&mut state, lifecycle.request("/items", Map::new()), &env);

        let follow_up = run_future_effect(effects.remove(0));
        assert_eq!(follow_up.type_name(), "ITEMS_FAILED");
        reducer.reduce(&mut state, follow_up.clone(), &env);

        assert_eq!(state.promise_state, PromiseState::Rejected);
        assert_eq!(state.data, initial.data);
        assert_eq!(state.status, Some(500));
        assert_eq!(state.status_text.as_deref(), Some("Error"));

        // Repeated failures are idempotent.
        let once = state.clone();
        reducer.reduce(&mut state, follow_up, &env);
        assert_eq!(state, once);
    }

    #[test]
    fn reset_restores_initial_state_fields() {
        let payload = ResponsePayload::new(json!({"id": 7}), 200, "OK");
        let lifecycle = items_lifecycle(ok_handler(payload.clone()));
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        reducer.reduce(
            &mut state,
            LifecycleAction::received(Arc::from("ITEMS"), payload),
            &env,
        );
        assert_eq!(state.promise_state, PromiseState::Resolved);

        reducer.reduce(&mut state, lifecycle.reset(), &env);

        assert_eq!(state.promise_state, PromiseState::Init);
        assert!(state.data.is_empty());
    }

    #[test]
    fn custom_transformer_shapes_resolved_data() {
        let payload = ResponsePayload::new(json!([1, 2, 3]), 200, "OK");
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(ok_handler(payload.clone()))
            .received_data_transformer(|body| {
                let mut data = Map::new();
                data.insert("items".to_string(), body.clone());
                data
            })
            .build()
            .unwrap();
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        reducer.reduce(
            &mut state,
            LifecycleAction::received(Arc::from("ITEMS"), payload),
            &env,
        );

        assert_eq!(state.data.get("items"), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn default_transformer_ignores_non_object_bodies() {
        let payload = ResponsePayload::new(json!("not an object"), 200, "OK");
        let lifecycle = items_lifecycle(ok_handler(payload.clone()));
        let reducer = lifecycle.reducer();
        let env = lifecycle.environment();

        let mut state = RequestState::default();
        reducer.reduce(
            &mut state,
            LifecycleAction::received(Arc::from("ITEMS"), payload),
            &env,
        );

        assert_eq!(state.promise_state, PromiseState::Resolved);
        assert!(state.data.is_empty());
    }

    #[test]
    fn selector_defaults_to_the_named_slice() {
        let lifecycle = LifecycleConfig::new()
            .prefix("ITEMS")
            .request_handler(ok_handler(ResponsePayload::default()))
            .store_name("catalog")
            .build()
            .unwrap();

        let mut slice = RequestState::default();
        slice.data.insert("id".to_string(), json!(7));
        let mut slices = StoreSlices::new();
        slices.insert("catalog".to_string(), slice.clone());

        assert_eq!(lifecycle.select(&slices), slice);
        assert_eq!(lifecycle.select(&StoreSlices::new()), RequestState::default());
    }

    proptest! {
        /// Identity law: any action with a foreign prefix leaves any state
        /// unchanged and declares no effects.
        #[test]
        fn foreign_prefixes_never_touch_state(
            foreign in "[A-Z_]{1,12}",
            key in "[a-z]{1,8}",
            value in any::<i64>(),
        ) {
            prop_assume!(foreign != "ITEMS");

            let lifecycle = items_lifecycle(ok_handler(ResponsePayload::default()));
            let reducer = lifecycle.reducer();
            let env = lifecycle.environment();

            let mut state = RequestState::default();
            state.data.insert(key, json!(value));
            state.promise_state = PromiseState::Pending;
            let before = state.clone();

            let action = LifecycleAction::reset(Arc::from(foreign.as_str()));
            let effects = reducer.reduce(&mut state, action, &env);

            prop_assert_eq!(state, before);
            prop_assert!(effects.is_empty());
        }

        /// Repeated `Failed` dispatches converge on the same state.
        #[test]
        fn failed_is_idempotent(status in 400_u16..600, message in "[a-z ]{0,20}") {
            let lifecycle = items_lifecycle(ok_handler(ResponsePayload::default()));
            let reducer = lifecycle.reducer();
            let env = lifecycle.environment();

            let payload = ResponsePayload::new(json!({"message": message}), status, "Error");
            let failed = LifecycleAction::failed(Arc::from("ITEMS"), payload);

            let mut state = RequestState::default();
            reducer.reduce(&mut state, failed.clone(), &env);
            let once = state.clone();
            reducer.reduce(&mut state, failed, &env);

            prop_assert_eq!(state, once);
        }
    }
}

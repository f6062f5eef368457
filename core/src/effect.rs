//! Effects - side effect descriptions returned by reducers.
//!
//! Effects are NOT executed where they are produced. They are values
//! describing what should happen, returned from reducers and interpreted by
//! the store runtime. This keeps reducers pure and the transport boundary
//! explicit.

use std::future::Future;
use std::pin::Pin;

/// A side effect description.
///
/// # Type Parameters
///
/// - `Action`: the action type effects can feed back into the reducer
pub enum Effect<Action> {
    /// No-op effect
    None,

    /// Dispatch an action back through the store, fire-and-forget.
    ///
    /// This is the chained-action command: the dispatched action cannot
    /// observe or influence the transport call that triggered it.
    Dispatch(Box<Action>),

    /// Arbitrary async computation.
    ///
    /// Returns `Option<Action>` - if `Some`, the action is fed back into
    /// the reducer. The transport invocation compiles to this variant.
    Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),

    /// Run effects concurrently, in no guaranteed order
    Parallel(Vec<Effect<Action>>),

    /// Run effects strictly in order, each completing before the next
    Sequential(Vec<Effect<Action>>),
}

// Manual Debug implementation since Future doesn't implement Debug
impl<Action> std::fmt::Debug for Effect<Action>
where
    Action: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::None => write!(f, "Effect::None"),
            Effect::Dispatch(action) => {
                f.debug_tuple("Effect::Dispatch").field(action).finish()
            },
            Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            Effect::Parallel(effects) => {
                f.debug_tuple("Effect::Parallel").field(effects).finish()
            },
            Effect::Sequential(effects) => {
                f.debug_tuple("Effect::Sequential").field(effects).finish()
            },
        }
    }
}

impl<Action> Effect<Action> {
    /// Combine effects to run in parallel
    #[must_use]
    pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Parallel(effects)
    }

    /// Chain effects to run sequentially
    #[must_use]
    pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
        Effect::Sequential(effects)
    }

    /// Shorthand for a dispatch command
    #[must_use]
    pub fn dispatch(action: Action) -> Effect<Action> {
        Effect::Dispatch(Box::new(action))
    }
}

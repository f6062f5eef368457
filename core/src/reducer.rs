//! The Reducer trait - core abstraction for business logic.
//!
//! Reducers are pure functions: `(State, Action, Environment) → Effects`.
//! They contain all transition logic, are deterministic, and never perform
//! I/O themselves.

use crate::effect::Effect;
use smallvec::SmallVec;

/// The Reducer trait.
///
/// # Type Parameters
///
/// - `State`: the state slice this reducer operates on
/// - `Action`: the action type this reducer processes
/// - `Environment`: the injected dependencies this reducer needs
///
/// # Example
///
/// ```ignore
/// impl Reducer for LifecycleReducer {
///     type State = RequestState;
///     type Action = LifecycleAction;
///     type Environment = LifecycleEnvironment;
///
///     fn reduce(
///         &self,
///         state: &mut RequestState,
///         action: LifecycleAction,
///         env: &LifecycleEnvironment,
///     ) -> SmallVec<[Effect<LifecycleAction>; 4]> {
///         // transition logic here
///     }
/// }
/// ```
pub trait Reducer {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// The environment type with injected dependencies
    type Environment;

    /// Reduce an action into state changes and effects.
    ///
    /// Updates state in place under the store's write lock and returns
    /// effect descriptions for the runtime to execute. An action the
    /// reducer does not recognize must leave state untouched and return
    /// no effects - reducers compose over a shared store and must not
    /// erase state machines they do not own.
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]>;
}

//! # Reloop Core
//!
//! Core types for request-lifecycle reducers with declarative side effects.
//!
//! A [`lifecycle::RequestLifecycle`] is generated from a configuration and
//! describes the life of one asynchronous request as a finite-state machine
//! (`INIT → PENDING → RESOLVED/REJECTED → reset`), paired with side-effect
//! commands for the surrounding store runtime.
//!
//! ## Core Concepts
//!
//! - **State**: [`state::RequestState`], one slice of store state per lifecycle
//! - **Action**: [`action::LifecycleAction`], the closed input alphabet
//! - **Reducer**: pure function `(State, Action, Environment) → Effects`
//! - **Effect**: [`effect::Effect`], side effect descriptions (not execution)
//! - **Environment**: the injected [`environment::RequestHandler`]
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell: no I/O inside reducers
//! - Explicit effects: the transport call and chained dispatches are data
//! - Composition safety: unrecognized actions are identity transitions
//!
//! ## Example
//!
//! ```ignore
//! use reloop_core::lifecycle::LifecycleConfig;
//!
//! let items = LifecycleConfig::new()
//!     .prefix("ITEMS")
//!     .request_handler(Arc::new(http_handler))
//!     .build()?;
//!
//! // Plug items.reducer() and items.environment() into a Store,
//! // then dispatch items.request("/items", params).
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Lifecycle actions and their closed kind enumeration
pub mod action;

/// Side effect descriptions returned by reducers
pub mod effect;

/// The request-handler seam and reducer environment
pub mod environment;

/// The lifecycle factory: configuration, reducer, produced interface
pub mod lifecycle;

/// The Reducer trait
pub mod reducer;

/// Request state, promise states, and transport envelopes
pub mod state;

//! Single-active-state machine bound to an owning context.
//!
//! States are plain values (usually an enum) built from a `Kind` tag. The
//! machine guarantees that at most one state is live and that a transition
//! always runs the old state's `exit` before the new state's `enter`.

use std::fmt::Debug;
use tracing::debug;

/// A state that can be driven by a [`StateMachine`].
pub trait State {
    /// What the state operates on
    type Context;
    /// Tag used to request a transition
    type Kind: Copy + Eq + Debug;

    /// Build a fresh instance of the given kind
    fn create(kind: Self::Kind) -> Self;

    fn kind(&self) -> Self::Kind;

    fn enter(&mut self, context: &mut Self::Context);

    fn exit(&mut self, context: &mut Self::Context);

    /// Per-frame tick while the state is active
    fn update(&mut self, _context: &mut Self::Context, _delta_time: f64) {}
}

/// Holds the current state, if any.
#[derive(Debug)]
pub struct StateMachine<S> {
    current: Option<S>,
}

impl<S> Default for StateMachine<S> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<S: State> StateMachine<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to a state of `kind`. No-op if that kind is already active.
    ///
    /// Returns `true` if a transition happened.
    pub fn enter_state(&mut self, kind: S::Kind, context: &mut S::Context) -> bool {
        if self.current_kind() == Some(kind) {
            return false;
        }

        self.exit_state(context);

        let mut state = S::create(kind);
        state.enter(context);
        debug!(state = ?kind, "entered state");
        self.current = Some(state);
        true
    }

    /// Exit and release the current state. No-op if there is none.
    pub fn exit_state(&mut self, context: &mut S::Context) -> bool {
        let Some(mut state) = self.current.take() else {
            return false;
        };
        state.exit(context);
        debug!(state = ?state.kind(), "exited state");
        true
    }

    /// Tick the current state
    pub fn update(&mut self, context: &mut S::Context, delta_time: f64) {
        if let Some(state) = self.current.as_mut() {
            state.update(context, delta_time);
        }
    }

    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut S> {
        self.current.as_mut()
    }

    pub fn current_kind(&self) -> Option<S::Kind> {
        self.current.as_ref().map(State::kind)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}

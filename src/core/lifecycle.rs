//! Lifecycle state machines for simulated objects
//!
//! Every stateful object (stalk, bast, field, farmer, machines, sheet) declares
//! its states, the operations that act on it, and a table of legal
//! `(state, operation) -> next state` transitions. Operations that only
//! require a state without leaving it are listed as self-transitions.
//! Anything not in the table is an illegal transition.

use std::fmt;

use crate::core::error::SimError;

/// A state enumeration with its transition table
pub trait Lifecycle: Copy + Eq + fmt::Debug + fmt::Display + 'static {
    /// Operations that act on objects with this lifecycle
    type Op: Copy + Eq + fmt::Debug + fmt::Display + 'static;

    /// Entity name used in error messages (e.g., "stalk")
    const ENTITY: &'static str;

    /// State a freshly created object starts in
    const INITIAL: Self;

    /// Legal transitions as `(from, operation, to)`
    const TRANSITIONS: &'static [(Self, Self::Op, Self)];

    /// Look up the state reached by applying `op` in this state
    fn next(self, op: Self::Op) -> Option<Self> {
        Self::TRANSITIONS
            .iter()
            .find(|(from, o, _)| *from == self && *o == op)
            .map(|(_, _, to)| *to)
    }

    /// Operations that are legal in this state
    fn allowed_operations(self) -> Vec<Self::Op> {
        Self::TRANSITIONS
            .iter()
            .filter(|(from, _, _)| *from == self)
            .map(|(_, op, _)| *op)
            .collect()
    }
}

/// Current state of one object, advanced only through its transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Machine<S: Lifecycle> {
    state: S,
}

impl<S: Lifecycle> Default for Machine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Lifecycle> Machine<S> {
    /// Start in the lifecycle's initial state
    pub fn new() -> Self {
        Self { state: S::INITIAL }
    }

    /// Start in an explicit state (e.g., bast segments created already cut)
    pub fn starting_at(state: S) -> Self {
        Self { state }
    }

    pub fn state(&self) -> S {
        self.state
    }

    /// Verify `op` is legal without changing state
    pub fn check(&self, op: S::Op) -> Result<S, SimError> {
        self.state.next(op).ok_or_else(|| {
            let allowed = self.state.allowed_operations();
            SimError::IllegalStateTransition {
                entity: S::ENTITY,
                state: self.state.to_string(),
                operation: op.to_string(),
                allowed: if allowed.is_empty() {
                    "none".to_string()
                } else {
                    allowed
                        .iter()
                        .map(|op| op.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            }
        })
    }

    /// Apply `op`, moving to the next state
    pub fn apply(&mut self, op: S::Op) -> Result<S, SimError> {
        let next = self.check(op)?;
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Closed,
        Open,
        Locked,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum DoorOp {
        Open,
        Close,
        Lock,
        Knock,
    }

    impl fmt::Display for Door {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl fmt::Display for DoorOp {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl Lifecycle for Door {
        type Op = DoorOp;
        const ENTITY: &'static str = "door";
        const INITIAL: Self = Door::Closed;
        const TRANSITIONS: &'static [(Self, DoorOp, Self)] = &[
            (Door::Closed, DoorOp::Open, Door::Open),
            (Door::Closed, DoorOp::Lock, Door::Locked),
            (Door::Closed, DoorOp::Knock, Door::Closed),
            (Door::Open, DoorOp::Close, Door::Closed),
        ];
    }

    #[test]
    fn test_apply_follows_table() {
        let mut door: Machine<Door> = Machine::new();
        assert_eq!(door.state(), Door::Closed);
        assert_eq!(door.apply(DoorOp::Open).unwrap(), Door::Open);
        assert_eq!(door.apply(DoorOp::Close).unwrap(), Door::Closed);
        assert_eq!(door.apply(DoorOp::Knock).unwrap(), Door::Closed);
        assert_eq!(door.apply(DoorOp::Lock).unwrap(), Door::Locked);
    }

    #[test]
    fn test_illegal_transition_keeps_state() {
        let mut door: Machine<Door> = Machine::starting_at(Door::Locked);
        let err = door.apply(DoorOp::Open).unwrap_err();
        assert!(err.is_illegal_transition());
        assert_eq!(door.state(), Door::Locked);
        assert!(err.to_string().contains("door"));
        assert!(err.to_string().ends_with("(allowed: none)"));
    }

    #[test]
    fn test_check_does_not_advance() {
        let door: Machine<Door> = Machine::new();
        assert_eq!(door.check(DoorOp::Open).unwrap(), Door::Open);
        assert_eq!(door.state(), Door::Closed);

        let err = door.check(DoorOp::Close).unwrap_err();
        assert!(err
            .to_string()
            .ends_with("in state 'Closed' (allowed: Open, Lock, Knock)"));
    }

    #[test]
    fn test_allowed_operations() {
        assert_eq!(
            Door::Closed.allowed_operations(),
            vec![DoorOp::Open, DoorOp::Lock, DoorOp::Knock]
        );
        assert!(Door::Locked.allowed_operations().is_empty());
    }
}

use std::fmt::Debug;

use crate::error::EngineError;

/// A status enum with an explicit allowed-transition table.
///
/// Idempotency across overlapping reconciliation passes is enforced here,
/// centrally, instead of by ad hoc status checks scattered through the
/// resolvers: every mutation of a status field goes through
/// [`guard_transition`], which consults the table. Terminal states have an
/// empty table, so a duplicate pass on an already-resolved entity can never
/// re-apply a transition.
pub trait StateMachine: Copy + Eq + Debug + 'static {
    /// States this state may legally move to.
    fn allowed_transitions(self) -> &'static [Self];

    fn can_transition(self, next: Self) -> bool {
        self.allowed_transitions().contains(&next)
    }

    fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

/// Check a proposed transition, returning the error the reconciler logs
/// when something tries to move an entity along an edge not in its table.
pub fn guard_transition<S: StateMachine>(
    entity: &'static str,
    id: u64,
    from: S,
    to: S,
) -> Result<(), EngineError> {
    if from.can_transition(to) {
        Ok(())
    } else {
        Err(EngineError::IllegalTransition {
            entity,
            id,
            from: format!("{from:?}"),
            to: format!("{to:?}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Door {
        Open,
        Closed,
        Locked,
    }

    impl StateMachine for Door {
        fn allowed_transitions(self) -> &'static [Self] {
            match self {
                Door::Open => &[Door::Closed],
                Door::Closed => &[Door::Open, Door::Locked],
                Door::Locked => &[],
            }
        }
    }

    #[test]
    fn table_is_consulted() {
        assert!(Door::Open.can_transition(Door::Closed));
        assert!(!Door::Open.can_transition(Door::Locked));
        assert!(Door::Locked.is_terminal());
    }

    #[test]
    fn guard_rejects_illegal_edges() {
        assert!(guard_transition("door", 1, Door::Closed, Door::Locked).is_ok());
        let err = guard_transition("door", 1, Door::Locked, Door::Open).unwrap_err();
        assert!(matches!(err, EngineError::IllegalTransition { .. }));
    }
}

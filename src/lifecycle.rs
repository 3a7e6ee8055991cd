//! Mutation lifecycle and navigation action types.
//!
//! This module defines two key abstractions:
//!
//! - [`MutationPhase`]: the state of the single in-flight stack mutation.
//!   Every queued operation walks
//!   `Idle → Mutating → AnimatingOut | AnimatingIn → Reconciled → Idle`,
//!   skipping the animation states when it is not animated.
//! - [`NavigationAction`] / [`ActionKind`]: navigation intents as tagged
//!   variants. String action names coming from outside (`"push"`, `"back"`,
//!   …) are parsed once into an [`ActionKind`] and dispatched with a `match`.

use crate::page::PageRequest;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// MutationPhase
// ============================================================================

/// State of the stack mutation currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPhase {
    /// No mutation in flight.
    #[default]
    Idle,
    /// The logical stack is being changed.
    Mutating,
    /// Leaving pages are animating out.
    AnimatingOut,
    /// Arriving pages are animating in.
    AnimatingIn,
    /// Final resting transforms are being applied and removed pages torn down.
    Reconciled,
}

impl MutationPhase {
    /// Check if `next` is a legal successor of this phase.
    pub fn can_transition_to(self, next: Self) -> bool {
        use MutationPhase::*;
        matches!(
            (self, next),
            (Idle, Mutating)
                | (Mutating, AnimatingOut | AnimatingIn | Reconciled | Idle)
                | (AnimatingOut | AnimatingIn, Reconciled)
                | (Reconciled, Idle)
        )
    }

    /// Check if an animation is running.
    pub fn is_animating(self) -> bool {
        matches!(self, Self::AnimatingOut | Self::AnimatingIn)
    }
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Mutating => "mutating",
            Self::AnimatingOut => "animating-out",
            Self::AnimatingIn => "animating-in",
            Self::Reconciled => "reconciled",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ActionKind / NavigationAction
// ============================================================================

/// Kind of navigation intent, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Push,
    Pop,
    PopToRoot,
    PopToSelf,
    Present,
    Dismiss,
}

/// Error returned when parsing an unknown action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAction(pub String);

impl fmt::Display for UnknownAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown navigation action '{}'", self.0)
    }
}

impl std::error::Error for UnknownAction {}

impl FromStr for ActionKind {
    type Err = UnknownAction;

    /// Parse an action name.
    ///
    /// ```
    /// use gpui_stack_navigator::ActionKind;
    ///
    /// assert_eq!("back".parse::<ActionKind>(), Ok(ActionKind::Pop));
    /// assert_eq!("popToRoot".parse::<ActionKind>(), Ok(ActionKind::PopToRoot));
    /// assert!("teleport".parse::<ActionKind>().is_err());
    /// ```
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "push" => Ok(Self::Push),
            "pop" | "back" => Ok(Self::Pop),
            "popToRoot" | "pop_to_root" => Ok(Self::PopToRoot),
            "popToSelf" | "pop_to_self" => Ok(Self::PopToSelf),
            "present" => Ok(Self::Present),
            "dismiss" => Ok(Self::Dismiss),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

/// A navigation intent with its payload.
#[derive(Debug, Clone)]
pub enum NavigationAction {
    Push(PageRequest),
    Pop,
    PopToRoot,
    PopToSelf,
    Present(PageRequest),
    Dismiss,
}

impl NavigationAction {
    /// Build an action of `kind`. Push and present need a request.
    pub fn from_kind(kind: ActionKind, request: Option<PageRequest>) -> Option<Self> {
        Some(match kind {
            ActionKind::Push => Self::Push(request?),
            ActionKind::Present => Self::Present(request?),
            ActionKind::Pop => Self::Pop,
            ActionKind::PopToRoot => Self::PopToRoot,
            ActionKind::PopToSelf => Self::PopToSelf,
            ActionKind::Dismiss => Self::Dismiss,
        })
    }

    /// The payload-free kind of this action.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Push(_) => ActionKind::Push,
            Self::Pop => ActionKind::Pop,
            Self::PopToRoot => ActionKind::PopToRoot,
            Self::PopToSelf => ActionKind::PopToSelf,
            Self::Present(_) => ActionKind::Present,
            Self::Dismiss => ActionKind::Dismiss,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_default_is_idle() {
        assert_eq!(MutationPhase::default(), MutationPhase::Idle);
    }

    #[test]
    fn test_animated_cycle() {
        use MutationPhase::*;
        let cycle = [Idle, Mutating, AnimatingIn, Reconciled, Idle];
        for pair in cycle.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{:?}", pair);
        }
    }

    #[test]
    fn test_illegal_transitions() {
        use MutationPhase::*;
        assert!(!Idle.can_transition_to(AnimatingIn));
        assert!(!AnimatingOut.can_transition_to(Idle));
        assert!(!Reconciled.can_transition_to(Mutating));
    }

    #[test]
    fn test_is_animating() {
        assert!(MutationPhase::AnimatingOut.is_animating());
        assert!(!MutationPhase::Reconciled.is_animating());
    }

    #[test]
    fn test_parse_action_names() {
        assert_eq!("push".parse(), Ok(ActionKind::Push));
        assert_eq!("pop".parse(), Ok(ActionKind::Pop));
        assert_eq!("popToSelf".parse(), Ok(ActionKind::PopToSelf));
        assert_eq!("present".parse(), Ok(ActionKind::Present));
        assert_eq!("dismiss".parse(), Ok(ActionKind::Dismiss));
        assert_eq!(
            "jump".parse::<ActionKind>(),
            Err(UnknownAction("jump".to_string()))
        );
    }

    #[test]
    fn test_from_kind_requires_request() {
        assert!(NavigationAction::from_kind(ActionKind::Push, None).is_none());
        let action =
            NavigationAction::from_kind(ActionKind::Present, Some(PageRequest::new("/modal")))
                .unwrap();
        assert_eq!(action.kind(), ActionKind::Present);
        assert_eq!(
            NavigationAction::from_kind(ActionKind::Dismiss, None).map(|a| a.kind()),
            Some(ActionKind::Dismiss)
        );
    }
}

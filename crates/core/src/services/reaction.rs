//! Shared reaction state machine.
//!
//! Opinions (like/dislike) and comments (upvote/downvote) use the same
//! three-way toggle: reacting from a clean slate records the reaction,
//! repeating the same reaction removes it, and reacting the other way
//! switches. Both services drive their counter updates from the deltas
//! computed here so the stored counts can never drift from the stored
//! reaction rows.

use voxpop_db::entities::ReactionKind;

/// Outcome of applying a requested reaction to the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactionTransition {
    /// Reaction to store afterwards (`None` means remove the row).
    pub next: Option<ReactionKind>,
    /// Change to the like/upvote counter.
    pub like_delta: i32,
    /// Change to the dislike/downvote counter.
    pub dislike_delta: i32,
}

/// Compute the next reaction state and counter deltas.
#[must_use]
pub const fn next_reaction_state(
    current: Option<ReactionKind>,
    requested: ReactionKind,
) -> ReactionTransition {
    match (current, requested) {
        (None, ReactionKind::Like) => ReactionTransition {
            next: Some(ReactionKind::Like),
            like_delta: 1,
            dislike_delta: 0,
        },
        (None, ReactionKind::Dislike) => ReactionTransition {
            next: Some(ReactionKind::Dislike),
            like_delta: 0,
            dislike_delta: 1,
        },
        // Same reaction again: toggle off
        (Some(ReactionKind::Like), ReactionKind::Like) => ReactionTransition {
            next: None,
            like_delta: -1,
            dislike_delta: 0,
        },
        (Some(ReactionKind::Dislike), ReactionKind::Dislike) => ReactionTransition {
            next: None,
            like_delta: 0,
            dislike_delta: -1,
        },
        // Opposite reaction: switch
        (Some(ReactionKind::Like), ReactionKind::Dislike) => ReactionTransition {
            next: Some(ReactionKind::Dislike),
            like_delta: -1,
            dislike_delta: 1,
        },
        (Some(ReactionKind::Dislike), ReactionKind::Like) => ReactionTransition {
            next: Some(ReactionKind::Like),
            like_delta: 1,
            dislike_delta: -1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_react_from_clean_slate() {
        let t = next_reaction_state(None, ReactionKind::Like);
        assert_eq!(t.next, Some(ReactionKind::Like));
        assert_eq!(t.like_delta, 1);
        assert_eq!(t.dislike_delta, 0);

        let t = next_reaction_state(None, ReactionKind::Dislike);
        assert_eq!(t.next, Some(ReactionKind::Dislike));
        assert_eq!(t.like_delta, 0);
        assert_eq!(t.dislike_delta, 1);
    }

    #[test]
    fn test_repeat_reaction_toggles_off() {
        let t = next_reaction_state(Some(ReactionKind::Like), ReactionKind::Like);
        assert_eq!(t.next, None);
        assert_eq!(t.like_delta, -1);
        assert_eq!(t.dislike_delta, 0);

        let t = next_reaction_state(Some(ReactionKind::Dislike), ReactionKind::Dislike);
        assert_eq!(t.next, None);
        assert_eq!(t.like_delta, 0);
        assert_eq!(t.dislike_delta, -1);
    }

    #[test]
    fn test_opposite_reaction_switches() {
        let t = next_reaction_state(Some(ReactionKind::Like), ReactionKind::Dislike);
        assert_eq!(t.next, Some(ReactionKind::Dislike));
        assert_eq!(t.like_delta, -1);
        assert_eq!(t.dislike_delta, 1);

        let t = next_reaction_state(Some(ReactionKind::Dislike), ReactionKind::Like);
        assert_eq!(t.next, Some(ReactionKind::Like));
        assert_eq!(t.like_delta, 1);
        assert_eq!(t.dislike_delta, -1);
    }

    #[test]
    fn test_deltas_never_exceed_one_per_counter() {
        let states = [None, Some(ReactionKind::Like), Some(ReactionKind::Dislike)];
        let requests = [ReactionKind::Like, ReactionKind::Dislike];

        for current in states {
            for requested in requests {
                let t = next_reaction_state(current, requested);
                assert!(t.like_delta.abs() <= 1);
                assert!(t.dislike_delta.abs() <= 1);
                // Net change across both counters is -1, 0, or +1
                assert!((t.like_delta + t.dislike_delta).abs() <= 1);
            }
        }
    }
}

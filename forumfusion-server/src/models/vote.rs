//! Vote toggle state machine
//!
//! Each voter holds at most one vote per post. A request names the pressed
//! direction and whether that direction should end up active; the
//! transition yields the next state plus the counter deltas to apply to the
//! post. Repeating a request is a no-op.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Button the voter pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

/// Voter's current vote on a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteState {
    #[default]
    None,
    Up,
    Down,
}

/// Result of applying a request to a vote state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub next: VoteState,
    pub up_delta: i32,
    pub down_delta: i32,
}

impl VoteTransition {
    /// True when neither the state nor the counters change.
    pub fn is_noop(&self) -> bool {
        self.up_delta == 0 && self.down_delta == 0
    }
}

impl VoteState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "none" => Ok(Self::None),
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(ValidationError::InvalidVariant {
                field: "vote state",
                value: other.to_owned(),
            }),
        }
    }

    fn counts(self) -> (i32, i32) {
        match self {
            Self::None => (0, 0),
            Self::Up => (1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Apply a vote request.
    ///
    /// `active = true` selects `direction`; `active = false` withdraws it,
    /// and only withdraws a vote actually held in that direction.
    ///
    /// # Example
    /// ```
    /// use forumfusion_server::models::{VoteDirection, VoteState};
    ///
    /// let t = VoteState::Down.apply(VoteDirection::Up, true);
    /// assert_eq!(t.next, VoteState::Up);
    /// assert_eq!((t.up_delta, t.down_delta), (1, -1));
    /// ```
    pub fn apply(self, direction: VoteDirection, active: bool) -> VoteTransition {
        let pressed = match direction {
            VoteDirection::Up => Self::Up,
            VoteDirection::Down => Self::Down,
        };

        let next = if active {
            pressed
        } else if self == pressed {
            Self::None
        } else {
            self
        };

        let (up_before, down_before) = self.counts();
        let (up_after, down_after) = next.counts();

        VoteTransition {
            next,
            up_delta: up_after - up_before,
            down_delta: down_after - down_before,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use VoteDirection::{Down as D, Up as U};
    use VoteState::{Down, None, Up};

    fn check(prev: VoteState, dir: VoteDirection, active: bool, next: VoteState, up: i32, down: i32) {
        let t = prev.apply(dir, active);
        assert_eq!(
            (t.next, t.up_delta, t.down_delta),
            (next, up, down),
            "{prev:?} + ({dir:?}, {active})"
        );
    }

    #[test]
    fn casting_fresh_votes() {
        check(None, U, true, Up, 1, 0);
        check(None, D, true, Down, 0, 1);
    }

    #[test]
    fn switching_sides() {
        check(Up, D, true, Down, -1, 1);
        check(Down, U, true, Up, 1, -1);
    }

    #[test]
    fn withdrawing_votes() {
        check(Up, U, false, None, -1, 0);
        check(Down, D, false, None, 0, -1);
    }

    #[test]
    fn repeated_requests_are_noops() {
        for (prev, dir, active) in [
            (Up, U, true),
            (Down, D, true),
            (None, U, false),
            (None, D, false),
            (Up, D, false),
            (Down, U, false),
        ] {
            let t = prev.apply(dir, active);
            assert_eq!(t.next, prev);
            assert!(t.is_noop());
        }
    }

    #[test]
    fn counters_never_underflow_from_none() {
        // Withdrawing with no prior vote used to decrement the post counters
        for dir in [U, D] {
            let t = None.apply(dir, false);
            assert!(t.up_delta >= 0 && t.down_delta >= 0);
        }
    }

    #[test]
    fn state_wire_format() {
        for state in [None, Up, Down] {
            assert_eq!(VoteState::parse(state.as_str()).unwrap(), state);
        }
        let dir: VoteDirection = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(dir, D);
    }
}

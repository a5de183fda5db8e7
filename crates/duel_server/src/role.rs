//! Participant roles.

use duel_tictactoe::Mark;

/// Seat a participant occupies, assigned in connection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Role {
    /// First to connect; plays X and moves first.
    #[display("first")]
    First,
    /// Second to connect; plays O.
    #[display("second")]
    Second,
}

impl Role {
    /// Both roles in seating order.
    pub const ALL: [Role; 2] = [Role::First, Role::Second];

    /// The mark this role places.
    pub fn mark(self) -> Mark {
        match self {
            Role::First => Mark::X,
            Role::Second => Mark::O,
        }
    }

    /// Returns the other role.
    pub fn opponent(self) -> Self {
        match self {
            Role::First => Role::Second,
            Role::Second => Role::First,
        }
    }

    /// Seat index (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Role::First => 0,
            Role::Second => 1,
        }
    }
}

impl From<Mark> for Role {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Role::First,
            Mark::O => Role::Second,
        }
    }
}

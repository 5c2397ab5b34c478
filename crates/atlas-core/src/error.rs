//! Error types for the Atlas map store.
//!
//! Lookups never fail with an error: a missing room is an empty result.
//! These enums cover the cases where a caller asked for a mutation that
//! could not be carried out.

use crate::coord::Coordinate;
use crate::id::{RecipientToken, RoomId};
use std::error::Error;
use std::fmt;

/// Errors from direct (non-action) store mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The coordinate is already bound to another room.
    CoordinateOccupied {
        /// The contested coordinate.
        coord: Coordinate,
        /// The room already living there.
        occupant: RoomId,
    },
    /// No live room has this id.
    UnknownRoom {
        /// The missing id.
        id: RoomId,
    },
    /// A predefined room carried an id that is already live.
    RoomIdInUse {
        /// The duplicate id.
        id: RoomId,
    },
    /// Every valid room id has been handed out.
    IdSpaceExhausted,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CoordinateOccupied { coord, occupant } => {
                write!(f, "coordinate {coord} is occupied by room {occupant}")
            }
            Self::UnknownRoom { id } => write!(f, "unknown room {id}"),
            Self::RoomIdInUse { id } => write!(f, "room id {id} is already in use"),
            Self::IdSpaceExhausted => f.write_str("room id space exhausted"),
        }
    }
}

impl Error for StoreError {}

/// Errors from executing an action against the store.
///
/// When an action is rejected the store is left unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// A target room no longer exists.
    NotExecutable {
        /// Name of the rejected action.
        action: String,
        /// The first target that did not resolve.
        room: RoomId,
    },
    /// An affected room is still claimed by another recipient.
    ///
    /// Only produced when the store is configured to refuse claimed targets.
    TargetLocked {
        /// Name of the rejected action.
        action: String,
        /// The claimed room.
        room: RoomId,
        /// Who holds the claim.
        holders: Vec<RecipientToken>,
    },
    /// The action named no target room at all.
    NoTargets {
        /// Name of the rejected action.
        action: String,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotExecutable { action, room } => {
                write!(f, "unable to execute {action}: room {room} does not exist")
            }
            Self::TargetLocked {
                action,
                room,
                holders,
            } => {
                write!(f, "unable to execute {action}: room {room} is claimed by ")?;
                for (i, h) in holders.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{h}")?;
                }
                Ok(())
            }
            Self::NoTargets { action } => write!(f, "unable to execute {action}: no target rooms"),
        }
    }
}

impl Error for ActionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_room() {
        let e = ActionError::NotExecutable {
            action: "AddExit".into(),
            room: RoomId(7),
        };
        assert_eq!(e.to_string(), "unable to execute AddExit: room 7 does not exist");
    }

    #[test]
    fn display_lists_holders() {
        let e = ActionError::TargetLocked {
            action: "Remove".into(),
            room: RoomId(1),
            holders: vec![RecipientToken(2), RecipientToken(5)],
        };
        assert_eq!(
            e.to_string(),
            "unable to execute Remove: room 1 is claimed by #2, #5"
        );
    }

    #[test]
    fn occupied_mentions_coordinate() {
        let e = StoreError::CoordinateOccupied {
            coord: Coordinate::new(1, 2, 3),
            occupant: RoomId(4),
        };
        assert_eq!(e.to_string(), "coordinate (1, 2, 3) is occupied by room 4");
    }
}

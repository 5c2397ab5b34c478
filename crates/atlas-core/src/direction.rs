//! Exit directions and movement commands.

use crate::coord::Coordinate;
use std::fmt;

/// One of the seven exit slots of a room.
///
/// The six navigable directions plus an `Unknown` bucket for exits whose
/// direction could not be determined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExitDirection {
    /// North.
    North,
    /// South.
    South,
    /// East.
    East,
    /// West.
    West,
    /// Up.
    Up,
    /// Down.
    Down,
    /// Direction not known.
    Unknown,
}

/// All seven exit slots, in slot order.
pub const ALL_EXITS7: [ExitDirection; 7] = [
    ExitDirection::North,
    ExitDirection::South,
    ExitDirection::East,
    ExitDirection::West,
    ExitDirection::Up,
    ExitDirection::Down,
    ExitDirection::Unknown,
];

/// The six navigable directions (north, east, south, west, up, down).
pub const ALL_EXITS_NESWUD: [ExitDirection; 6] = [
    ExitDirection::North,
    ExitDirection::South,
    ExitDirection::East,
    ExitDirection::West,
    ExitDirection::Up,
    ExitDirection::Down,
];

impl ExitDirection {
    /// Slot index in `0..7`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The direction an exit in `self` arrives from on the far side.
    ///
    /// `Unknown` is its own opposite.
    pub fn opposite(self) -> ExitDirection {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Unknown => Self::Unknown,
        }
    }

    /// Whether this is one of the six navigable directions.
    pub fn is_neswud(self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Unit offset of one step in this direction.
    ///
    /// North is `+y`, east is `+x`, up is `+z`. `Unknown` has no offset.
    pub fn offset(self) -> Coordinate {
        match self {
            Self::North => Coordinate::new(0, 1, 0),
            Self::South => Coordinate::new(0, -1, 0),
            Self::East => Coordinate::new(1, 0, 0),
            Self::West => Coordinate::new(-1, 0, 0),
            Self::Up => Coordinate::new(0, 0, 1),
            Self::Down => Coordinate::new(0, 0, -1),
            Self::Unknown => Coordinate::ORIGIN,
        }
    }
}

impl fmt::Display for ExitDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A movement command as issued by the player.
///
/// Path tracing consumes a sequence of these: `Look` is a no-op, the six
/// directional commands move, everything else ends the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// Move north.
    North,
    /// Move south.
    South,
    /// Move east.
    East,
    /// Move west.
    West,
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Movement in an unknown direction.
    Unknown,
    /// Look around without moving.
    Look,
    /// Flee in a random direction.
    Flee,
    /// Scout ahead.
    Scout,
    /// No command.
    None,
}

impl CommandId {
    /// Whether this command moves in one of the six navigable directions.
    pub fn is_direction_neswud(self) -> bool {
        self.direction().is_some_and(ExitDirection::is_neswud)
    }

    /// The exit direction this command moves through, if any.
    pub fn direction(self) -> Option<ExitDirection> {
        match self {
            Self::North => Some(ExitDirection::North),
            Self::South => Some(ExitDirection::South),
            Self::East => Some(ExitDirection::East),
            Self::West => Some(ExitDirection::West),
            Self::Up => Some(ExitDirection::Up),
            Self::Down => Some(ExitDirection::Down),
            Self::Unknown => Some(ExitDirection::Unknown),
            Self::Look | Self::Flee | Self::Scout | Self::None => None,
        }
    }
}

impl From<ExitDirection> for CommandId {
    fn from(dir: ExitDirection) -> Self {
        match dir {
            ExitDirection::North => Self::North,
            ExitDirection::South => Self::South,
            ExitDirection::East => Self::East,
            ExitDirection::West => Self::West,
            ExitDirection::Up => Self::Up,
            ExitDirection::Down => Self::Down,
            ExitDirection::Unknown => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_an_involution() {
        for dir in ALL_EXITS7 {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn offsets_cancel_with_opposite() {
        for dir in ALL_EXITS_NESWUD {
            assert_eq!(dir.offset() + dir.opposite().offset(), Coordinate::ORIGIN);
            assert_ne!(dir.offset(), Coordinate::ORIGIN);
        }
    }

    #[test]
    fn slot_indices_are_dense() {
        for (i, dir) in ALL_EXITS7.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn only_six_commands_are_neswud() {
        let moving: Vec<_> = [
            CommandId::North,
            CommandId::South,
            CommandId::East,
            CommandId::West,
            CommandId::Up,
            CommandId::Down,
            CommandId::Unknown,
            CommandId::Look,
            CommandId::Flee,
            CommandId::Scout,
            CommandId::None,
        ]
        .into_iter()
        .filter(|c| c.is_direction_neswud())
        .collect();
        assert_eq!(moving.len(), 6);
        assert!(!CommandId::Unknown.is_direction_neswud());
    }

    #[test]
    fn command_round_trips_through_direction() {
        for dir in ALL_EXITS7 {
            assert_eq!(CommandId::from(dir).direction(), Some(dir));
        }
    }
}

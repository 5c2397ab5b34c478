//! Text search over room fields.

use crate::collab::RoomFilter;
use crate::room::Room;

/// Which text fields a [`FieldFilter`] looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// Room name.
    #[default]
    Name,
    /// Static description.
    Desc,
    /// Dynamic description.
    DynamicDesc,
    /// User note.
    Note,
    /// Any of the above.
    All,
}

/// Substring match over one or all text fields of a room.
///
/// # Examples
///
/// ```
/// use atlas_core::RoomFieldVariant;
/// use atlas_store::{FieldFilter, FilterKind, Room, RoomFilter};
///
/// let room = Room::default().with_field(RoomFieldVariant::Name("Old Forest Road".into()));
/// assert!(FieldFilter::new("forest", FilterKind::Name).filter(&room));
/// assert!(!FieldFilter::new("forest", FilterKind::Name).case_sensitive().filter(&room));
/// ```
#[derive(Clone, Debug)]
pub struct FieldFilter {
    pattern: String,
    folded: String,
    kind: FilterKind,
    case_sensitive: bool,
}

impl FieldFilter {
    /// A case-insensitive filter for `pattern` in the fields named by `kind`.
    pub fn new(pattern: impl Into<String>, kind: FilterKind) -> Self {
        let pattern = pattern.into();
        Self {
            folded: pattern.to_lowercase(),
            pattern,
            kind,
            case_sensitive: false,
        }
    }

    /// Switch to case-sensitive matching.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    /// The fields searched.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// The pattern as given.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            text.contains(self.pattern.as_str())
        } else {
            text.to_lowercase().contains(self.folded.as_str())
        }
    }
}

impl RoomFilter for FieldFilter {
    fn filter(&self, room: &Room) -> bool {
        match self.kind {
            FilterKind::Name => self.matches(room.name()),
            FilterKind::Desc => self.matches(room.desc()),
            FilterKind::DynamicDesc => self.matches(room.dynamic_desc()),
            FilterKind::Note => self.matches(room.note()),
            FilterKind::All => {
                self.matches(room.name())
                    || self.matches(room.desc())
                    || self.matches(room.dynamic_desc())
                    || self.matches(room.note())
            }
        }
    }
}

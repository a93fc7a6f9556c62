//! Identity keys used to decide which records describe the same person.

use std::collections::HashMap;
use std::fmt;

use crate::record::CandidateRecord;

/// Positions must be longer than this to serve as an identity key.
pub const MIN_POSITION_KEY_CHARS: usize = 10;

/// An identity key, in precedence order: GitHub, LinkedIn, name,
/// then the `(position, location)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// GitHub profile URL.
    GitHub(String),
    /// LinkedIn profile URL (only for records without a GitHub URL).
    LinkedIn(String),
    /// Proper name (only for records without links).
    Name(String),
    /// Job title and location (only for unnamed, unlinked records).
    PositionLocation {
        /// Job title.
        position: String,
        /// Location, possibly empty.
        location: String,
    },
}

impl IdentityKey {
    /// Link key: GitHub if present, otherwise LinkedIn.
    #[must_use]
    pub fn link(record: &CandidateRecord) -> Option<Self> {
        if !record.github.is_empty() {
            Some(Self::GitHub(record.github.clone()))
        } else if !record.linkedin.is_empty() {
            Some(Self::LinkedIn(record.linkedin.clone()))
        } else {
            None
        }
    }

    /// Name key for named records without links.
    #[must_use]
    pub fn name(record: &CandidateRecord) -> Option<Self> {
        if record.has_unknown_name() || record.has_link() {
            return None;
        }
        Some(Self::Name(record.name.clone()))
    }

    /// Position/location key for unnamed, unlinked records with a long enough position.
    #[must_use]
    pub fn position_location(record: &CandidateRecord) -> Option<Self> {
        if !record.has_unknown_name()
            || record.has_link()
            || record.position.chars().count() <= MIN_POSITION_KEY_CHARS
        {
            return None;
        }
        Some(Self::PositionLocation {
            position: record.position.clone(),
            location: record.location.clone(),
        })
    }

    /// Returns a short stable identifier suitable for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::GitHub(_) => "github",
            Self::LinkedIn(_) => "linkedin",
            Self::Name(_) => "name",
            Self::PositionLocation { .. } => "position_location",
        }
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub(url) => write!(f, "github:{url}"),
            Self::LinkedIn(url) => write!(f, "linkedin:{url}"),
            Self::Name(name) => write!(f, "name:{name}"),
            Self::PositionLocation { position, location } => {
                write!(f, "pos:{position}|loc:{location}")
            }
        }
    }
}

/// Records sharing one identity key. Never empty.
#[derive(Debug)]
pub(crate) struct Group<'a> {
    pub(crate) key: IdentityKey,
    pub(crate) first: &'a CandidateRecord,
    pub(crate) rest: Vec<&'a CandidateRecord>,
}

impl Group<'_> {
    pub(crate) fn len(&self) -> usize {
        1 + self.rest.len()
    }
}

/// Groups records by `key`, skipping records without one.
///
/// Groups come out in first-seen order; members keep their input order.
pub(crate) fn group_by<'a, F>(records: &'a [CandidateRecord], key: F) -> Vec<Group<'a>>
where
    F: Fn(&CandidateRecord) -> Option<IdentityKey>,
{
    let mut slots: HashMap<IdentityKey, usize> = HashMap::new();
    let mut groups: Vec<Group<'a>> = Vec::new();

    for record in records {
        let Some(k) = key(record) else {
            continue;
        };
        match slots.get(&k) {
            Some(&slot) => groups[slot].rest.push(record),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push(Group {
                    key: k,
                    first: record,
                    rest: Vec::new(),
                });
            }
        }
    }

    groups
}

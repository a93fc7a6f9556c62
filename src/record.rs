//! Candidate records.
//!
//! A `CandidateRecord` is created by the classifier, repaired by the sanitizer
//! and folded together by the resolver. Every stage treats records as values:
//! updates go through the `with_*` methods, which consume the record and return
//! the changed copy.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Placeholder stored in `name` when no proper name was found.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Fields the classifier counts when deciding whether a block carries enough signal.
pub const IDENTIFYING_FIELDS: [Field; 6] = [
    Field::Name,
    Field::Position,
    Field::Location,
    Field::Experience,
    Field::GitHub,
    Field::LinkedIn,
];

/// Fields the merge primitive fills, in merge order.
pub const MERGEABLE_FIELDS: [Field; 7] = [
    Field::Name,
    Field::Position,
    Field::Location,
    Field::Experience,
    Field::GitHub,
    Field::LinkedIn,
    Field::Education,
];

/// Scalar text fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Proper name, or [`UNKNOWN_NAME`].
    Name,
    /// Job title.
    Position,
    /// Normalized `"<n> years"`.
    Experience,
    /// Bay Area city, possibly suffixed `, California`.
    Location,
    /// GitHub profile URL.
    GitHub,
    /// LinkedIn profile URL.
    LinkedIn,
    /// Raw education line.
    Education,
}

impl Field {
    /// Returns the JSON key of this field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Position => "position",
            Self::Experience => "experience",
            Self::Location => "location",
            Self::GitHub => "github",
            Self::LinkedIn => "linkedin",
            Self::Education => "education",
        }
    }
}

/// One observed (possibly partial) candidate profile.
///
/// Serializes with exactly the keys
/// `page, name, position, experience, location, github, linkedin, education, skills`;
/// `skills` is always emitted sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// 1-based page of first observation.
    pub page: u32,
    /// Proper name, or [`UNKNOWN_NAME`].
    #[serde(default = "unknown_name")]
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub position: String,
    /// Normalized `"<n> years"`.
    #[serde(default)]
    pub experience: String,
    /// Bay Area city, possibly suffixed `, California`.
    #[serde(default)]
    pub location: String,
    /// GitHub profile URL.
    #[serde(default)]
    pub github: String,
    /// LinkedIn profile URL.
    #[serde(default)]
    pub linkedin: String,
    /// Raw education line.
    #[serde(default)]
    pub education: String,
    /// Skills from the fixed vocabulary.
    #[serde(default)]
    pub skills: BTreeSet<String>,
}

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

impl CandidateRecord {
    /// Creates an empty record observed on `page`.
    #[must_use]
    pub fn new(page: u32) -> Self {
        Self {
            page,
            name: unknown_name(),
            position: String::new(),
            experience: String::new(),
            location: String::new(),
            github: String::new(),
            linkedin: String::new(),
            education: String::new(),
            skills: BTreeSet::new(),
        }
    }

    /// Returns the value of a scalar field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Position => &self.position,
            Field::Experience => &self.experience,
            Field::Location => &self.location,
            Field::GitHub => &self.github,
            Field::LinkedIn => &self.linkedin,
            Field::Education => &self.education,
        }
    }

    /// Returns the record with `field` replaced by `value`.
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Position => self.position = value,
            Field::Experience => self.experience = value,
            Field::Location => self.location = value,
            Field::GitHub => self.github = value,
            Field::LinkedIn => self.linkedin = value,
            Field::Education => self.education = value,
        }
        self
    }

    /// Returns the record with `name` replaced.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with(Field::Name, name)
    }

    /// Returns the record with `position` replaced.
    #[must_use]
    pub fn with_position(self, position: impl Into<String>) -> Self {
        self.with(Field::Position, position)
    }

    /// Returns the record with `experience` replaced.
    #[must_use]
    pub fn with_experience(self, experience: impl Into<String>) -> Self {
        self.with(Field::Experience, experience)
    }

    /// Returns the record with `location` replaced.
    #[must_use]
    pub fn with_location(self, location: impl Into<String>) -> Self {
        self.with(Field::Location, location)
    }

    /// Returns the record with `github` replaced.
    #[must_use]
    pub fn with_github(self, url: impl Into<String>) -> Self {
        self.with(Field::GitHub, url)
    }

    /// Returns the record with `linkedin` replaced.
    #[must_use]
    pub fn with_linkedin(self, url: impl Into<String>) -> Self {
        self.with(Field::LinkedIn, url)
    }

    /// Returns the record with `education` replaced.
    #[must_use]
    pub fn with_education(self, education: impl Into<String>) -> Self {
        self.with(Field::Education, education)
    }

    /// Returns the record with `skills` added to its skill set.
    #[must_use]
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills.extend(skills.into_iter().map(Into::into));
        self
    }

    /// True when `name` is the [`UNKNOWN_NAME`] placeholder.
    #[must_use]
    pub fn has_unknown_name(&self) -> bool {
        self.name == UNKNOWN_NAME
    }

    /// True when either profile link is set.
    #[must_use]
    pub fn has_link(&self) -> bool {
        !self.github.is_empty() || !self.linkedin.is_empty()
    }

    /// Number of identifying fields holding a non-default value.
    #[must_use]
    pub fn identifying_field_count(&self) -> usize {
        IDENTIFYING_FIELDS
            .iter()
            .filter(|&&field| is_populated(self.get(field)))
            .count()
    }
}

/// True when a field value is neither empty nor the unknown-name placeholder.
#[must_use]
pub fn is_populated(value: &str) -> bool {
    !value.is_empty() && value != UNKNOWN_NAME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let record = CandidateRecord::new(3);
        assert_eq!(record.page, 3);
        assert!(record.has_unknown_name());
        assert!(!record.has_link());
        assert_eq!(record.identifying_field_count(), 0);
    }

    #[test]
    fn test_with_is_copy_on_write() {
        let base = CandidateRecord::new(1);
        let named = base.clone().with_name("Jane Doe");
        assert!(base.has_unknown_name());
        assert_eq!(named.name, "Jane Doe");
        assert_eq!(named.identifying_field_count(), 1);
    }

    #[test]
    fn test_skills_sorted_and_deduplicated() {
        let record = CandidateRecord::new(1).with_skills(["Rust", "AWS", "Rust", "Python"]);
        let skills: Vec<&str> = record.skills.iter().map(String::as_str).collect();
        assert_eq!(skills, vec!["AWS", "Python", "Rust"]);
    }

    #[test]
    fn test_serialized_key_order() {
        let record = CandidateRecord::new(2)
            .with_name("Jane Doe")
            .with_skills(["Rust"]);
        let json = serde_json::to_string(&record).unwrap();
        let keys = [
            "\"page\"",
            "\"name\"",
            "\"position\"",
            "\"experience\"",
            "\"location\"",
            "\"github\"",
            "\"linkedin\"",
            "\"education\"",
            "\"skills\"",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"skills\":[\"Rust\"]"));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let record: CandidateRecord = serde_json::from_str(r#"{"page": 4}"#).unwrap();
        assert_eq!(record, CandidateRecord::new(4));
    }

    #[test]
    fn test_is_populated() {
        assert!(!is_populated(""));
        assert!(!is_populated(UNKNOWN_NAME));
        assert!(is_populated("Oakland, California"));
    }
}

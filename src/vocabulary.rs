//! Versioned vocabulary tables.
//!
//! Every keyword list the classifier and sanitizer consult lives here, as data.
//! The built-in tables are version 1; callers (and tests) may inject their own
//! tables, either in code or from a JSON file. Missing tables in a JSON file
//! fall back to the built-in ones.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, HarvestResult, VocabularyError};

/// The only vocabulary layout this crate understands.
pub const SUPPORTED_VERSION: u32 = 1;

const JOB_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "scientist",
    "manager",
    "lead",
    "head",
    "architect",
    "specialist",
    "analyst",
    "consultant",
    "intern",
    "researcher",
    "software",
    "data",
    "system",
    "director",
    "@",
];

const NOISE_TAGS: &[&str] = &[
    "python",
    "rust",
    "spark",
    "scale",
    "ai",
    "jax",
    "robotics",
    "throughput",
    "multimodal",
    "preprocessing",
];

const CITIES: &[&str] = &[
    "San Francisco",
    "San Jose",
    "Berkeley",
    "Oakland",
    "Palo Alto",
    "Mountain View",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "University",
    "College",
    "Bachelor",
    "Master",
    "PhD",
    "B.S.",
    "M.S.",
    "Ph.D.",
];

const SKILLS: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "C++",
    "Rust",
    "Go",
    "SQL",
    "Spark",
    "Hadoop",
    "AWS",
    "Azure",
    "GCP",
    "Docker",
    "Kubernetes",
    "React",
    "Angular",
    "Vue",
    "Data Science",
    "Machine Learning",
    "AI",
    "Deep Learning",
    "Cloud",
    "Big Data",
];

const NAME_JOB_INDICATORS: &[&str] = &[
    "engineer",
    "developer",
    "programmer",
    "lead",
    "senior",
    "software",
    "data scientist",
    "@",
];

const SWAP_JOB_INDICATORS: &[&str] = &[
    "engineer",
    "developer",
    "scientist",
    "manager",
    "lead",
    "senior",
    "@",
];

const ROLE_TERMS: &[&str] = &[
    "engineer",
    "developer",
    "scientist",
    "manager",
    "lead",
    "architect",
    "senior",
    "data",
];

const RESIDUAL_NOISE: &[&str] = &[
    "scale",
    "+1 more",
    "+2 more",
    "+3 more",
    "+6 more",
    "throughput",
    "preprocessing",
];

const BARE_SKILL_TOKENS: &[&str] = &["python", "rust", "spark", "ai"];

fn owned(table: &[&str]) -> Vec<String> {
    table.iter().map(|s| (*s).to_string()).collect()
}

/// Keyword tables driving classification and sanitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Layout version; must equal [`SUPPORTED_VERSION`].
    pub version: u32,
    /// Substrings marking a line as a job title (classifier).
    pub job_keywords: Vec<String>,
    /// Whole-text skill tags that mark a block as UI noise.
    pub noise_tags: Vec<String>,
    /// Recognized city names.
    pub cities: Vec<String>,
    /// Substrings marking a line as education.
    pub education_keywords: Vec<String>,
    /// Skill vocabulary, in canonical spelling.
    pub skills: Vec<String>,
    /// Substrings marking a stored name as a job title (sanitizer).
    pub name_job_indicators: Vec<String>,
    /// Substrings that veto moving a position into the name field (sanitizer).
    pub swap_job_indicators: Vec<String>,
    /// Role terms capitalized inside positions.
    pub role_terms: Vec<String>,
    /// Exact position values that mark a record as residual UI noise.
    pub residual_noise: Vec<String>,
    /// Lower-cased position values that are bare skill tags.
    pub bare_skill_tokens: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Vocabulary {
    /// The built-in version 1 tables.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            version: SUPPORTED_VERSION,
            job_keywords: owned(JOB_KEYWORDS),
            noise_tags: owned(NOISE_TAGS),
            cities: owned(CITIES),
            education_keywords: owned(EDUCATION_KEYWORDS),
            skills: owned(SKILLS),
            name_job_indicators: owned(NAME_JOB_INDICATORS),
            swap_job_indicators: owned(SWAP_JOB_INDICATORS),
            role_terms: owned(ROLE_TERMS),
            residual_noise: owned(RESIDUAL_NOISE),
            bare_skill_tokens: owned(BARE_SKILL_TOKENS),
        }
    }

    /// Loads tables from a JSON file and validates them.
    pub fn from_file(path: impl AsRef<Path>) -> HarvestResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
        let vocabulary: Self =
            serde_json::from_str(&raw).map_err(|e| ExportError::json(path, e))?;
        vocabulary.validate()?;
        tracing::debug!(
            path = %path.display(),
            version = vocabulary.version,
            skills = vocabulary.skills.len(),
            cities = vocabulary.cities.len(),
            "Loaded vocabulary"
        );
        Ok(vocabulary)
    }

    /// Checks the version and table contents.
    ///
    /// # Validation
    /// - `version` must equal [`SUPPORTED_VERSION`].
    /// - `job_keywords`, `cities` and `skills` must be non-empty.
    /// - No table may contain a blank entry.
    pub fn validate(&self) -> Result<(), VocabularyError> {
        if self.version != SUPPORTED_VERSION {
            return Err(VocabularyError::UnsupportedVersion {
                version: self.version,
                supported: SUPPORTED_VERSION,
            });
        }

        for (table, entries) in [
            ("job_keywords", &self.job_keywords),
            ("cities", &self.cities),
            ("skills", &self.skills),
        ] {
            if entries.is_empty() {
                return Err(VocabularyError::EmptyTable { table });
            }
        }

        for (table, entries) in self.tables() {
            if let Some(index) = entries.iter().position(|e| e.trim().is_empty()) {
                return Err(VocabularyError::BlankEntry { table, index });
            }
        }

        Ok(())
    }

    fn tables(&self) -> [(&'static str, &Vec<String>); 10] {
        [
            ("job_keywords", &self.job_keywords),
            ("noise_tags", &self.noise_tags),
            ("cities", &self.cities),
            ("education_keywords", &self.education_keywords),
            ("skills", &self.skills),
            ("name_job_indicators", &self.name_job_indicators),
            ("swap_job_indicators", &self.swap_job_indicators),
            ("role_terms", &self.role_terms),
            ("residual_noise", &self.residual_noise),
            ("bare_skill_tokens", &self.bare_skill_tokens),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let vocabulary = Vocabulary::builtin();
        assert!(vocabulary.validate().is_ok());
        assert_eq!(vocabulary.cities.len(), 6);
        assert!(vocabulary.skills.iter().any(|s| s == "C++"));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let vocabulary = Vocabulary {
            version: 2,
            ..Vocabulary::builtin()
        };
        assert!(matches!(
            vocabulary.validate(),
            Err(VocabularyError::UnsupportedVersion { version: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_required_table() {
        let vocabulary = Vocabulary {
            cities: Vec::new(),
            ..Vocabulary::builtin()
        };
        assert!(matches!(
            vocabulary.validate(),
            Err(VocabularyError::EmptyTable { table: "cities" })
        ));
    }

    #[test]
    fn test_rejects_blank_entry() {
        let vocabulary = Vocabulary {
            role_terms: vec!["engineer".to_string(), "  ".to_string()],
            ..Vocabulary::builtin()
        };
        assert!(matches!(
            vocabulary.validate(),
            Err(VocabularyError::BlankEntry {
                table: "role_terms",
                index: 1
            })
        ));
    }

    #[test]
    fn test_partial_json_falls_back_to_builtin() {
        let vocabulary: Vocabulary =
            serde_json::from_str(r#"{"version": 1, "cities": ["Gotham"]}"#).unwrap();
        assert_eq!(vocabulary.cities, vec!["Gotham"]);
        assert_eq!(vocabulary.skills, Vocabulary::builtin().skills);
    }
}

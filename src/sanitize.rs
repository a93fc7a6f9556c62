//! Field sanitation.
//!
//! The classifier scans shifting DOM containers and regularly files a value
//! under the wrong field. The sanitizer applies a fixed sequence of repairs to
//! each record of a page batch, then drops records whose position is leftover
//! UI text. Repairs are best effort: a record no repair applies to is kept.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::matchers::Matchers;
use crate::record::{CandidateRecord, UNKNOWN_NAME};

/// Signature shared by every repair.
pub type RepairFn = fn(&Matchers, CandidateRecord) -> CandidateRecord;

/// One named repair step.
#[derive(Clone, Copy)]
pub struct Repair {
    /// Stable repair name, used in logs and reports.
    pub name: &'static str,
    /// Pure transform; returns the record unchanged when it does not apply.
    pub apply: RepairFn,
}

impl std::fmt::Debug for Repair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repair").field("name", &self.name).finish()
    }
}

/// Repairs in application order. Later repairs see the effect of earlier ones.
pub const REPAIRS: &[Repair] = &[
    Repair {
        name: "experience_holds_location",
        apply: experience_holds_location,
    },
    Repair {
        name: "name_holds_job_title",
        apply: name_holds_job_title,
    },
    Repair {
        name: "position_holds_name",
        apply: position_holds_name,
    },
    Repair {
        name: "capitalize_role_terms",
        apply: capitalize_role_terms,
    },
];

/// A city in `experience` is a location filed in the wrong place.
fn experience_holds_location(m: &Matchers, record: CandidateRecord) -> CandidateRecord {
    if record.experience.is_empty() || !m.mentions_city(&record.experience) {
        return record;
    }
    let moved = record.experience.clone();
    let record = if record.location.is_empty() {
        record.with_location(moved)
    } else {
        record
    };
    record.with_experience("")
}

/// A job title in `name` moves to `position` (if free); the name is reset.
fn name_holds_job_title(m: &Matchers, record: CandidateRecord) -> CandidateRecord {
    if record.has_unknown_name() || !m.has_name_job_indicator(&record.name) {
        return record;
    }
    let moved = record.name.clone();
    let record = if record.position.is_empty() {
        record.with_position(moved)
    } else {
        record
    };
    record.with_name(UNKNOWN_NAME)
}

/// A person's name in `position` is promoted to `name` when the name is unknown.
fn position_holds_name(m: &Matchers, record: CandidateRecord) -> CandidateRecord {
    if !record.has_unknown_name()
        || record.position.is_empty()
        || !m.has_strict_name_shape(&record.position)
        || m.has_swap_job_indicator(&record.position)
    {
        return record;
    }
    let moved = record.position.clone();
    record.with_name(moved).with_position("")
}

fn capitalize_role_terms(m: &Matchers, record: CandidateRecord) -> CandidateRecord {
    if record.position.is_empty() {
        return record;
    }
    let position = m.capitalize_role_terms(&record.position);
    record.with_position(position)
}

/// Counts collected by [`Sanitizer::sanitize_with_report`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Records handed in.
    pub received: usize,
    /// Records returned.
    pub kept: usize,
    /// Records dropped as residual noise.
    pub dropped: usize,
    /// How many records each repair changed, keyed by repair name.
    pub repairs: BTreeMap<&'static str, usize>,
}

/// Applies [`REPAIRS`] and the residual-noise filter to a page batch.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    matchers: Arc<Matchers>,
}

impl Sanitizer {
    /// Creates a sanitizer over compiled matchers.
    #[must_use]
    pub fn new(matchers: Arc<Matchers>) -> Self {
        Self { matchers }
    }

    /// Sanitizer over the built-in vocabulary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Matchers::builtin())
    }

    /// Repairs one record.
    #[must_use]
    pub fn repair(&self, record: CandidateRecord) -> CandidateRecord {
        REPAIRS
            .iter()
            .fold(record, |record, repair| (repair.apply)(&self.matchers, record))
    }

    /// True when the record's position marks it as UI noise.
    #[must_use]
    pub fn is_residual_noise(&self, record: &CandidateRecord) -> bool {
        self.matchers.is_residual_noise(&record.position)
    }

    /// Repairs every record and drops residual noise, preserving order.
    #[must_use]
    pub fn sanitize(&self, records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
        self.sanitize_with_report(records).0
    }

    /// Like [`Sanitizer::sanitize`], also reporting what was changed.
    #[must_use]
    pub fn sanitize_with_report(
        &self,
        records: Vec<CandidateRecord>,
    ) -> (Vec<CandidateRecord>, SanitizeReport) {
        let mut report = SanitizeReport {
            received: records.len(),
            ..SanitizeReport::default()
        };
        let mut kept = Vec::with_capacity(records.len());

        for record in records {
            let mut current = record;
            for repair in REPAIRS {
                let next = (repair.apply)(&self.matchers, current.clone());
                if next != current {
                    *report.repairs.entry(repair.name).or_insert(0) += 1;
                    tracing::trace!(
                        repair = repair.name,
                        page = next.page,
                        name = %next.name,
                        position = %next.position,
                        "Repaired record"
                    );
                }
                current = next;
            }

            if self.is_residual_noise(&current) {
                tracing::debug!(
                    page = current.page,
                    position = %current.position,
                    "Dropped residual UI element"
                );
                report.dropped += 1;
                continue;
            }
            kept.push(current);
        }

        report.kept = kept.len();
        tracing::debug!(
            received = report.received,
            kept = report.kept,
            dropped = report.dropped,
            "Sanitized batch"
        );
        (kept, report)
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s() -> Sanitizer {
        Sanitizer::builtin()
    }

    #[test]
    fn test_experience_location_moves_when_location_empty() {
        let r = s().repair(CandidateRecord::new(1).with_experience("San Jose, California"));
        assert_eq!(r.location, "San Jose, California");
        assert!(r.experience.is_empty());
    }

    #[test]
    fn test_experience_location_cleared_when_location_set() {
        let r = s().repair(
            CandidateRecord::new(1)
                .with_experience("oakland")
                .with_location("Berkeley, California"),
        );
        assert_eq!(r.location, "Berkeley, California");
        assert!(r.experience.is_empty());
    }

    #[test]
    fn test_name_with_job_title_moves_to_position() {
        let r = s().repair(CandidateRecord::new(1).with_name("Senior Data Engineer"));
        assert!(r.has_unknown_name());
        assert_eq!(r.position, "Senior Data Engineer");
    }

    #[test]
    fn test_name_with_job_title_keeps_existing_position() {
        let r = s().repair(
            CandidateRecord::new(1)
                .with_name("Jane @ Acme")
                .with_position("Staff Engineer"),
        );
        assert!(r.has_unknown_name());
        assert_eq!(r.position, "Staff Engineer");
    }

    #[test]
    fn test_position_swapped_into_name() {
        let r = s().repair(CandidateRecord::new(1).with_position("John Smith"));
        assert_eq!(r.name, "John Smith");
        assert!(r.position.is_empty());
    }

    #[test]
    fn test_position_with_indicator_not_swapped() {
        let r = s().repair(CandidateRecord::new(1).with_position("Tech Lead"));
        assert!(r.has_unknown_name());
        assert_eq!(r.position, "Tech Lead");
    }

    #[test]
    fn test_four_word_position_not_swapped() {
        let r = s().repair(CandidateRecord::new(1).with_position("Ana Maria Lopez Garcia"));
        assert!(r.has_unknown_name());
        assert_eq!(r.position, "Ana Maria Lopez Garcia");
    }

    #[test]
    fn test_role_terms_capitalized() {
        let r = s().repair(
            CandidateRecord::new(1)
                .with_name("Jane Doe")
                .with_position("senior data engineer, platform"),
        );
        assert_eq!(r.position, "Senior Data Engineer, platform");
    }

    #[test]
    fn test_drops_residual_noise() {
        let records = vec![
            CandidateRecord::new(1).with_position("+2 more"),
            CandidateRecord::new(1).with_position("Rust"),
            CandidateRecord::new(1).with_position("91% match"),
            CandidateRecord::new(1)
                .with_name("Jane Doe")
                .with_position("Data Engineer"),
        ];
        let (kept, report) = s().sanitize_with_report(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name, "Jane Doe");
        assert_eq!(report.received, 4);
        assert_eq!(report.dropped, 3);
        assert_eq!(report.kept, 1);
    }

    #[test]
    fn test_untouched_fields_survive() {
        let record = CandidateRecord::new(7)
            .with_name("Lead Engineer")
            .with_github("https://github.com/x")
            .with_education("MIT")
            .with_skills(["Go"]);
        let out = s().sanitize(vec![record]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].page, 7);
        assert_eq!(out[0].github, "https://github.com/x");
        assert_eq!(out[0].education, "MIT");
        assert!(out[0].skills.contains("Go"));
        assert_eq!(out[0].position, "Lead Engineer");
    }

    #[test]
    fn test_report_counts_repairs() {
        let (_, report) = s().sanitize_with_report(vec![
            CandidateRecord::new(1).with_position("John Smith"),
            CandidateRecord::new(1).with_name("Software Developer"),
        ]);
        assert_eq!(report.repairs.get("position_holds_name"), Some(&1));
        assert_eq!(report.repairs.get("name_holds_job_title"), Some(&1));
    }
}

//! Fill-missing-only merge.

use crate::record::{is_populated, CandidateRecord, MERGEABLE_FIELDS};

const GITHUB_SUFFIX: &str = " (from GitHub)";
const LINKEDIN_SUFFIX: &str = " (from LinkedIn)";

/// LinkedIn URLs need more than this many `/`-separated segments to yield a name.
const MIN_LINKEDIN_SEGMENTS: usize = 4;

/// Merges a group of records describing the same person.
///
/// The first record is the base. For every later record and every mergeable
/// field, the incoming value is copied only when the base value is empty or
/// `"Unknown"` and the incoming one is not: the first populated value wins,
/// field by field. Skills are unioned. If the merged name is still unknown but
/// a link is set, a fallback name is derived from the link.
///
/// Returns `None` for an empty group.
#[must_use]
pub fn merge<'a, I>(group: I) -> Option<CandidateRecord>
where
    I: IntoIterator<Item = &'a CandidateRecord>,
{
    let mut members = group.into_iter();
    let first = members.next()?;
    Some(merge_onto(first, members))
}

/// Merges `rest` onto a copy of `first`, then applies the fallback name.
pub(crate) fn merge_onto<'a, I>(first: &CandidateRecord, rest: I) -> CandidateRecord
where
    I: IntoIterator<Item = &'a CandidateRecord>,
{
    let merged = rest.into_iter().fold(first.clone(), fill_missing);
    with_fallback_name(merged)
}

/// Copies every field `base` lacks from `incoming`, and unions skills.
#[must_use]
pub fn fill_missing(base: CandidateRecord, incoming: &CandidateRecord) -> CandidateRecord {
    let mut merged = MERGEABLE_FIELDS.iter().fold(base, |acc, &field| {
        let value = incoming.get(field);
        if !is_populated(acc.get(field)) && is_populated(value) {
            acc.with(field, value)
        } else {
            acc
        }
    });
    merged.skills.extend(incoming.skills.iter().cloned());
    merged
}

/// Derives a display name from the profile links of an unnamed record.
fn with_fallback_name(record: CandidateRecord) -> CandidateRecord {
    if !record.has_unknown_name() || !record.has_link() {
        return record;
    }

    if !record.github.is_empty() {
        let handle = last_segment(&record.github);
        if handle.is_empty() {
            return record;
        }
        let name = format!("{handle}{GITHUB_SUFFIX}");
        return record.with_name(name);
    }

    if record.linkedin.split('/').count() > MIN_LINKEDIN_SEGMENTS {
        let handle = last_segment(&record.linkedin);
        if !handle.is_empty() {
            let name = format!("{handle}{LINKEDIN_SUFFIX}");
            return record.with_name(name);
        }
    }
    record
}

fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_group() {
        let empty: Vec<CandidateRecord> = Vec::new();
        assert!(merge(&empty).is_none());
    }

    #[test]
    fn test_fill_missing_never_overwrites() {
        let a = CandidateRecord::new(1)
            .with_location("Berkeley, California")
            .with_position("Data Engineer");
        let b = CandidateRecord::new(2)
            .with_name("Jane Doe")
            .with_github("https://github.com/janed")
            .with_position("Staff Engineer");
        let merged = merge(&[a, b]).unwrap();
        assert_eq!(merged.page, 1);
        assert_eq!(merged.name, "Jane Doe");
        assert_eq!(merged.location, "Berkeley, California");
        assert_eq!(merged.position, "Data Engineer");
        assert_eq!(merged.github, "https://github.com/janed");
    }

    #[test]
    fn test_first_writer_wins_per_field() {
        let a = CandidateRecord::new(1);
        let b = CandidateRecord::new(1).with_experience("2 years");
        let c = CandidateRecord::new(1)
            .with_experience("9 years")
            .with_education("MIT");
        let merged = merge(&[a, b, c]).unwrap();
        assert_eq!(merged.experience, "2 years");
        assert_eq!(merged.education, "MIT");
    }

    #[test]
    fn test_skill_union_sorted() {
        let a = CandidateRecord::new(1).with_skills(["Python", "Rust"]);
        let b = CandidateRecord::new(1).with_skills(["Rust", "AWS"]);
        let merged = merge(&[a, b]).unwrap();
        let skills: Vec<&str> = merged.skills.iter().map(String::as_str).collect();
        assert_eq!(skills, vec!["AWS", "Python", "Rust"]);
    }

    #[test]
    fn test_fallback_name_from_github() {
        let a = CandidateRecord::new(1).with_github("https://github.com/octo");
        let b = CandidateRecord::new(1).with_linkedin("https://www.linkedin.com/in/octo-li");
        let merged = merge(&[a, b]).unwrap();
        assert_eq!(merged.name, "octo (from GitHub)");
    }

    #[test]
    fn test_fallback_name_from_linkedin() {
        let a = CandidateRecord::new(1).with_linkedin("https://www.linkedin.com/in/jane-doe");
        let merged = merge(&[a]).unwrap();
        assert_eq!(merged.name, "jane-doe (from LinkedIn)");
    }

    #[test]
    fn test_short_linkedin_url_yields_no_name() {
        let a = CandidateRecord::new(1).with_linkedin("linkedin.com/in/jane");
        let merged = merge(&[a]).unwrap();
        assert!(merged.has_unknown_name());
    }

    #[test]
    fn test_github_trailing_slash_yields_no_name() {
        let a = CandidateRecord::new(1)
            .with_github("https://github.com/octo/")
            .with_linkedin("https://www.linkedin.com/in/jane-doe");
        let merged = merge(&[a]).unwrap();
        assert!(merged.has_unknown_name());
    }
}

//! Field-extraction rules applied in order to each accepted block.

use crate::block::RawTextBlock;
use crate::matchers::Matchers;
use crate::record::CandidateRecord;

/// A title line must be longer than this many characters.
pub const MIN_TITLE_CHARS: usize = 5;

/// Signature shared by every field rule.
pub type FieldTransform = fn(&Matchers, &RawTextBlock, CandidateRecord) -> CandidateRecord;

/// One named step of field extraction.
#[derive(Clone, Copy)]
pub struct FieldRule {
    /// Stable rule name, used in logs.
    pub name: &'static str,
    /// Pure transform from the partial record to the next one.
    pub apply: FieldTransform,
}

impl std::fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRule").field("name", &self.name).finish()
    }
}

/// Field rules in evaluation order.
///
/// Each rule only reads the block and writes its own fields, so the order here
/// only matters for logging; it is kept fixed so it can be asserted on.
pub const FIELD_RULES: &[FieldRule] = &[
    FieldRule {
        name: "name_and_position",
        apply: name_and_position,
    },
    FieldRule {
        name: "experience",
        apply: experience,
    },
    FieldRule {
        name: "location",
        apply: location,
    },
    FieldRule {
        name: "links",
        apply: links,
    },
    FieldRule {
        name: "education",
        apply: education,
    },
    FieldRule {
        name: "skills",
        apply: skills,
    },
];

fn is_proper_name(m: &Matchers, line: &str) -> bool {
    m.has_name_shape(line) && !m.has_job_keyword(line)
}

fn is_title(m: &Matchers, line: &str) -> bool {
    m.has_job_keyword(line) && line.chars().count() > MIN_TITLE_CHARS
}

/// Line 0 is either the name (then the first later title line is the position)
/// or the position (then the first later proper-name line is the name).
pub(crate) fn name_and_position(
    m: &Matchers,
    block: &RawTextBlock,
    record: CandidateRecord,
) -> CandidateRecord {
    let Some((first, rest)) = block.lines.split_first() else {
        return record;
    };

    if is_proper_name(m, first) {
        let record = record.with_name(first.as_str());
        match rest.iter().find(|line| is_title(m, line)) {
            Some(position) => record.with_position(position.as_str()),
            None => record,
        }
    } else if is_title(m, first) {
        let record = record.with_position(first.as_str());
        match rest.iter().find(|line| is_proper_name(m, line)) {
            Some(name) => record.with_name(name.as_str()),
            None => record,
        }
    } else {
        record
    }
}

pub(crate) fn experience(
    m: &Matchers,
    block: &RawTextBlock,
    record: CandidateRecord,
) -> CandidateRecord {
    match block.lines.iter().find_map(|line| m.experience(line)) {
        Some(years) => record.with_experience(years),
        None => record,
    }
}

pub(crate) fn location(
    m: &Matchers,
    block: &RawTextBlock,
    record: CandidateRecord,
) -> CandidateRecord {
    match block.lines.iter().find_map(|line| m.location(line)) {
        Some(place) => record.with_location(place),
        None => record,
    }
}

/// Links come from the block's anchors, never from its text.
pub(crate) fn links(
    _m: &Matchers,
    block: &RawTextBlock,
    mut record: CandidateRecord,
) -> CandidateRecord {
    if let Some(url) = block.github_url.as_deref().filter(|u| !u.is_empty()) {
        record = record.with_github(url);
    }
    if let Some(url) = block.linkedin_url.as_deref().filter(|u| !u.is_empty()) {
        record = record.with_linkedin(url);
    }
    record
}

pub(crate) fn education(
    m: &Matchers,
    block: &RawTextBlock,
    record: CandidateRecord,
) -> CandidateRecord {
    match block.lines.iter().find(|line| m.is_education(line)) {
        Some(line) => record.with_education(line.as_str()),
        None => record,
    }
}

pub(crate) fn skills(
    m: &Matchers,
    block: &RawTextBlock,
    record: CandidateRecord,
) -> CandidateRecord {
    let found: Vec<&str> = block
        .lines
        .iter()
        .flat_map(|line| m.skills_in(line))
        .collect();
    record.with_skills(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: FieldTransform, lines: &[&str]) -> CandidateRecord {
        let block = RawTextBlock::new(1, lines.iter().copied());
        rule(&Matchers::builtin(), &block, CandidateRecord::new(1))
    }

    #[test]
    fn name_first_then_position() {
        let r = apply(
            name_and_position,
            &["Jane Doe", "Stanford", "Staff Software Engineer"],
        );
        assert_eq!(r.name, "Jane Doe");
        assert_eq!(r.position, "Staff Software Engineer");
    }

    #[test]
    fn position_first_then_name() {
        let r = apply(name_and_position, &["Data Engineer @ Acme", "Bob Stone"]);
        assert_eq!(r.position, "Data Engineer @ Acme");
        assert_eq!(r.name, "Bob Stone");
    }

    #[test]
    fn name_with_job_keyword_is_not_a_name() {
        // "Head" is a job keyword even though the shape fits.
        let r = apply(name_and_position, &["Head Coach", "Jane Doe"]);
        assert_eq!(r.position, "Head Coach");
        assert_eq!(r.name, "Jane Doe");
    }

    #[test]
    fn short_title_is_ignored() {
        let r = apply(name_and_position, &["Lead", "Jane Doe"]);
        assert!(r.has_unknown_name());
        assert!(r.position.is_empty());
    }

    #[test]
    fn neither_name_nor_title() {
        let r = apply(name_and_position, &["94% match", "Jane Doe"]);
        assert!(r.has_unknown_name());
        assert!(r.position.is_empty());
    }

    #[test]
    fn experience_first_line_wins() {
        let r = apply(experience, &["Jane Doe", "3y experience", "10 years total"]);
        assert_eq!(r.experience, "3 years");
    }

    #[test]
    fn location_appends_state() {
        let r = apply(location, &["Jane Doe", "Mountain View"]);
        assert_eq!(r.location, "Mountain View, California");
    }

    #[test]
    fn links_copied_from_anchors() {
        let block = RawTextBlock::new(1, ["Jane Doe"])
            .with_github("https://github.com/janed")
            .with_linkedin("");
        let r = links(&Matchers::builtin(), &block, CandidateRecord::new(1));
        assert_eq!(r.github, "https://github.com/janed");
        assert!(r.linkedin.is_empty());
    }

    #[test]
    fn education_first_match() {
        let r = apply(
            education,
            &["Jane Doe", "B.S. Computer Science, UC Berkeley", "PhD dropout"],
        );
        assert_eq!(r.education, "B.S. Computer Science, UC Berkeley");
    }

    #[test]
    fn skills_unioned_across_lines() {
        let r = apply(skills, &["Rust and Python", "python, Docker", "Machine Learning"]);
        let got: Vec<&str> = r.skills.iter().map(String::as_str).collect();
        assert_eq!(got, vec!["Docker", "Machine Learning", "Python", "Rust"]);
    }

    #[test]
    fn rule_order_is_fixed() {
        let names: Vec<&str> = FIELD_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["name_and_position", "experience", "location", "links", "education", "skills"]
        );
    }
}

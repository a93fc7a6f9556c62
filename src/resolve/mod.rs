//! Entity resolution.
//!
//! Groups records that likely describe the same person and merges each group
//! into one record. Three passes run in order, each keyed by a weaker identity:
//!
//! 1. **Links**: records with a GitHub URL grouped by it, then records without
//!    GitHub but with a LinkedIn URL grouped by that.
//! 2. **Name**: named records without links, grouped by name.
//! 3. **Position/location**: unnamed, unlinked records with a long enough
//!    position, grouped by `(position, location)`.
//!
//! A link group whose LinkedIn URL is already on an earlier output entry is
//! folded into that entry, so no two outputs share a LinkedIn URL; two GitHub
//! groups carrying the same LinkedIn URL become one candidate that keeps the
//! first GitHub URL. Later passes skip a group when the output already holds
//! an entry with the same name (pass 2), or an identified entry
//! with the same `(position, location, experience)` (pass 3). The skipped
//! group's fields are folded into that entry with the same fill-missing-only
//! rule as [`merge`].
//!
//! The two suppression checks compare different things: a name match in pass 2,
//! but position, location and experience together in pass 3. Records that fit
//! no pass are left out.

mod identity;
mod merge;

pub use identity::{IdentityKey, MIN_POSITION_KEY_CHARS};
pub use merge::{fill_missing, merge};

use identity::{group_by, Group};
use merge::merge_onto;

use crate::record::CandidateRecord;

/// Counts for one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Groups formed by the pass.
    pub groups: usize,
    /// Groups with more than one member.
    pub merged_groups: usize,
    /// Groups folded into an existing output entry instead of being emitted.
    pub suppressed: usize,
}

/// Counts collected by [`resolve_with_report`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Records handed in.
    pub received: usize,
    /// Link pass.
    pub links: PassReport,
    /// Name pass.
    pub names: PassReport,
    /// Position/location pass.
    pub positions: PassReport,
    /// Records emitted.
    pub emitted: usize,
}

/// Resolves every accumulated record into deduplicated candidates.
#[must_use]
pub fn resolve(records: &[CandidateRecord]) -> Vec<CandidateRecord> {
    resolve_with_report(records).0
}

/// Like [`resolve`], also reporting per-pass counts.
#[must_use]
pub fn resolve_with_report(records: &[CandidateRecord]) -> (Vec<CandidateRecord>, ResolutionReport) {
    let mut report = ResolutionReport {
        received: records.len(),
        ..ResolutionReport::default()
    };
    let mut out: Vec<CandidateRecord> = Vec::new();

    for group in group_by(records, IdentityKey::link) {
        tally(&mut report.links, &group);
        let candidate = fold_group(&group);
        let existing = if candidate.linkedin.is_empty() {
            None
        } else {
            out.iter().position(|c| c.linkedin == candidate.linkedin)
        };
        emit_or_absorb(&mut out, &mut report.links, &group.key, existing, candidate);
    }

    for group in group_by(records, IdentityKey::name) {
        tally(&mut report.names, &group);
        let candidate = fold_group(&group);
        let existing = out.iter().position(|c| c.name == candidate.name);
        emit_or_absorb(&mut out, &mut report.names, &group.key, existing, candidate);
    }

    for group in group_by(records, IdentityKey::position_location) {
        tally(&mut report.positions, &group);
        let candidate = fold_group(&group);
        let existing = out.iter().position(|c| {
            c.position == candidate.position
                && c.location == candidate.location
                && c.experience == candidate.experience
                && (c.has_link() || !c.has_unknown_name())
        });
        emit_or_absorb(&mut out, &mut report.positions, &group.key, existing, candidate);
    }

    report.emitted = out.len();
    tracing::info!(
        received = report.received,
        link_groups = report.links.groups,
        link_suppressed = report.links.suppressed,
        name_groups = report.names.groups,
        name_suppressed = report.names.suppressed,
        position_groups = report.positions.groups,
        position_suppressed = report.positions.suppressed,
        emitted = report.emitted,
        "Resolved candidates"
    );
    (out, report)
}

/// A single-member group survives unchanged; larger groups are merged.
fn fold_group(group: &Group<'_>) -> CandidateRecord {
    if group.rest.is_empty() {
        group.first.clone()
    } else {
        merge_onto(group.first, group.rest.iter().copied())
    }
}

fn tally(pass: &mut PassReport, group: &Group<'_>) {
    pass.groups += 1;
    let members = group.len();
    if members > 1 {
        pass.merged_groups += 1;
        tracing::debug!(key = %group.key, members, "Merging group");
    }
}

fn emit_or_absorb(
    out: &mut Vec<CandidateRecord>,
    pass: &mut PassReport,
    key: &IdentityKey,
    existing: Option<usize>,
    candidate: CandidateRecord,
) {
    match existing {
        Some(slot) => {
            pass.suppressed += 1;
            tracing::debug!(
                key = %key,
                kind = key.kind(),
                into = %out[slot].name,
                "Duplicate group folded into existing candidate"
            );
            let current = out[slot].clone();
            out[slot] = fill_missing(current, &candidate);
        }
        None => out.push(candidate),
    }
}

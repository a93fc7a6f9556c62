//! Block classification.
//!
//! Turns one raw text block into a best-effort `CandidateRecord`, or rejects
//! it as noise. Rejection is not an error: it only means the block carried too
//! little signal to be a profile.

mod rules;

use std::sync::Arc;

use crate::block::RawTextBlock;
use crate::matchers::Matchers;
use crate::record::CandidateRecord;

pub use rules::{FieldRule, FieldTransform, FIELD_RULES, MIN_TITLE_CHARS};

/// Blocks shorter than this (in characters, lines joined by `\n`) are UI chrome.
pub const MIN_BLOCK_CHARS: usize = 20;

/// Accepted records need this many identifying fields unless they carry a link.
pub const MIN_IDENTIFYING_FIELDS: usize = 2;

/// Why a block was not turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The joined text is empty.
    EmptyText,
    /// The joined text is shorter than [`MIN_BLOCK_CHARS`].
    TooShort {
        /// Character count of the joined text.
        chars: usize,
    },
    /// The whole text is a percentage badge, expander label, tag or bare word.
    NoiseShape,
    /// Fewer than [`MIN_IDENTIFYING_FIELDS`] fields and no profile link.
    InsufficientSignal {
        /// Identifying fields that were populated.
        fields: usize,
    },
}

impl Rejection {
    /// Returns a short stable identifier suitable for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EmptyText => "empty_text",
            Self::TooShort { .. } => "too_short",
            Self::NoiseShape => "noise_shape",
            Self::InsufficientSignal { .. } => "insufficient_signal",
        }
    }
}

/// Outcome of classifying one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The block yielded a record.
    Accepted(CandidateRecord),
    /// The block was rejected.
    Rejected(Rejection),
}

impl Verdict {
    /// The accepted record, if any.
    #[must_use]
    pub fn into_record(self) -> Option<CandidateRecord> {
        match self {
            Self::Accepted(record) => Some(record),
            Self::Rejected(_) => None,
        }
    }
}

/// Applies the noise gate and the field-rule table to raw blocks.
#[derive(Debug, Clone)]
pub struct Classifier {
    matchers: Arc<Matchers>,
}

impl Classifier {
    /// Creates a classifier over compiled matchers.
    #[must_use]
    pub fn new(matchers: Arc<Matchers>) -> Self {
        Self { matchers }
    }

    /// Classifier over the built-in vocabulary.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Matchers::builtin())
    }

    /// Classifies a block, returning `None` when it is rejected.
    #[must_use]
    pub fn classify(&self, block: &RawTextBlock) -> Option<CandidateRecord> {
        self.verdict(block).into_record()
    }

    /// Classifies a block, keeping the rejection reason.
    #[must_use]
    pub fn verdict(&self, block: &RawTextBlock) -> Verdict {
        if let Some(rejection) = self.noise_gate(block) {
            tracing::trace!(
                page = block.page_index,
                reason = rejection.name(),
                "Block rejected before extraction"
            );
            return Verdict::Rejected(rejection);
        }

        let mut record = CandidateRecord::new(block.page_index);
        for rule in FIELD_RULES {
            record = (rule.apply)(&self.matchers, block, record);
        }

        let fields = record.identifying_field_count();
        if fields < MIN_IDENTIFYING_FIELDS && !record.has_link() {
            tracing::trace!(page = block.page_index, fields, "Block rejected: too little signal");
            return Verdict::Rejected(Rejection::InsufficientSignal { fields });
        }

        tracing::debug!(
            page = record.page,
            name = %record.name,
            position = %record.position,
            fields,
            "Extracted candidate"
        );
        Verdict::Accepted(record)
    }

    fn noise_gate(&self, block: &RawTextBlock) -> Option<Rejection> {
        let text = block.joined_text();
        if text.is_empty() {
            return Some(Rejection::EmptyText);
        }

        let chars = text.chars().count();
        if chars < MIN_BLOCK_CHARS {
            return Some(Rejection::TooShort { chars });
        }

        if self.matchers.is_noise_text(&text.to_lowercase()) {
            return Some(Rejection::NoiseShape);
        }

        None
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::builtin()
    }
}

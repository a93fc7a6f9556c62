//! # candidate-harvest
//!
//! Turns loosely structured text scraped from a paginated recruiting search
//! into deduplicated, structured candidate profiles.
//!
//! ## Pipeline
//!
//! - **Classifier**: decides whether a raw text block is a profile and extracts
//!   name, position, experience, location, links, education and skills.
//! - **Sanitizer**: repairs fields the classifier filed in the wrong place and
//!   drops leftover UI elements.
//! - **Resolver**: merges records of the same person across pages by GitHub,
//!   LinkedIn, name, then position and location.
//!
//! All three stages are pure transforms over a compiled [`Matchers`] set built
//! from an injectable [`Vocabulary`].
//!
//! ## Usage
//!
//! ```rust
//! use candidate_harvest::{Pipeline, RawTextBlock};
//!
//! let block = RawTextBlock::new(
//!     1,
//!     ["Jane Doe", "Senior Software Engineer", "5 years experience", "Berkeley"],
//! )
//! .with_github("https://github.com/janed");
//!
//! let report = Pipeline::default().run_blocks(vec![block])?;
//! assert_eq!(report.candidates[0].name, "Jane Doe");
//! assert_eq!(report.candidates[0].location, "Berkeley, California");
//! # Ok::<(), candidate_harvest::HarvestError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Data model
pub mod block;
pub mod error;
pub mod record;

// Vocabulary and matching
pub mod matchers;
pub mod vocabulary;

// Stages
pub mod classify;
pub mod resolve;
pub mod sanitize;

// Orchestration and I/O
pub mod config;
pub mod export;
pub mod pipeline;

pub use block::{group_pages, PageBatch, RawTextBlock};
pub use classify::{Classifier, Rejection, Verdict};
pub use config::HarvestConfig;
pub use error::{ConfigError, ExportError, HarvestError, HarvestResult, VocabularyError};
pub use matchers::Matchers;
pub use pipeline::{HarvestReport, HarvestStats, PageOutcome, Pipeline};
pub use record::{CandidateRecord, Field, UNKNOWN_NAME};
pub use resolve::{resolve, resolve_with_report, IdentityKey, ResolutionReport};
pub use sanitize::{SanitizeReport, Sanitizer};
pub use vocabulary::{Vocabulary, SUPPORTED_VERSION};

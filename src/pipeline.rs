//! End-to-end harvest pipeline.
//!
//! Pages are classified and sanitized independently, optionally on a pool of
//! worker threads, then accumulated in page order and resolved once.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::block::{group_pages, PageBatch, RawTextBlock};
use crate::classify::Classifier;
use crate::config::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};
use crate::matchers::Matchers;
use crate::record::CandidateRecord;
use crate::resolve::{resolve_with_report, ResolutionReport};
use crate::sanitize::{SanitizeReport, Sanitizer};
use crate::vocabulary::Vocabulary;

/// Result of processing a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageOutcome {
    /// Page number.
    pub page: u32,
    /// Sanitized records in scan order.
    pub records: Vec<CandidateRecord>,
    /// Blocks on the page.
    pub blocks_seen: usize,
    /// Blocks skipped as repeats of an earlier block on the page.
    pub duplicates_skipped: usize,
    /// Blocks the classifier rejected.
    pub rejected: usize,
    /// Accepted records beyond the per-page limit.
    pub truncated: usize,
    /// Sanitizer counts for the page.
    pub sanitize: SanitizeReport,
}

/// Counters for a whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Pages handed in.
    pub pages_seen: usize,
    /// Pages whose records were accumulated.
    pub pages_accepted: usize,
    /// Blocks across all processed pages.
    pub blocks_seen: usize,
    /// Repeated blocks skipped.
    pub duplicates_skipped: usize,
    /// Blocks rejected by the classifier.
    pub rejected: usize,
    /// Records cut by the per-page limit.
    pub truncated: usize,
    /// Records dropped by the sanitizer.
    pub dropped: usize,
    /// Records handed to the resolver.
    pub accumulated: usize,
    /// Candidates after resolution.
    pub resolved: usize,
}

/// Output of [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestReport {
    /// Resolved candidates, ready for export.
    pub candidates: Vec<CandidateRecord>,
    /// Run counters.
    pub stats: HarvestStats,
    /// Resolver pass counts.
    pub resolution: ResolutionReport,
}

/// Classifier, sanitizer and resolver wired together under one config.
#[derive(Debug, Clone)]
pub struct Pipeline {
    classifier: Classifier,
    sanitizer: Sanitizer,
    config: HarvestConfig,
}

impl Pipeline {
    /// Creates a pipeline over already compiled matchers.
    #[must_use]
    pub fn new(matchers: Arc<Matchers>, config: HarvestConfig) -> Self {
        Self {
            classifier: Classifier::new(Arc::clone(&matchers)),
            sanitizer: Sanitizer::new(matchers),
            config,
        }
    }

    /// Builds a pipeline from a config, loading its vocabulary file if set.
    pub fn from_config(config: HarvestConfig) -> HarvestResult<Self> {
        config.validate()?;
        let matchers = match &config.vocabulary_path {
            Some(path) => {
                let vocabulary = Vocabulary::from_file(path)?;
                Arc::new(Matchers::compile(&vocabulary)?)
            }
            None => Matchers::builtin(),
        };
        Ok(Self::new(matchers, config))
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Classifies, caps and sanitizes one page.
    #[must_use]
    pub fn process_page(&self, batch: &PageBatch) -> PageOutcome {
        let mut outcome = PageOutcome {
            page: batch.page,
            blocks_seen: batch.blocks.len(),
            ..PageOutcome::default()
        };
        let mut seen: HashSet<[u8; 32]> = HashSet::new();
        let mut accepted = Vec::new();

        for block in &batch.blocks {
            if self.config.dedupe_blocks && !seen.insert(block.fingerprint()) {
                outcome.duplicates_skipped += 1;
                continue;
            }
            match self.classifier.classify(block) {
                Some(record) => accepted.push(record),
                None => outcome.rejected += 1,
            }
        }

        if accepted.len() > self.config.per_page_limit {
            outcome.truncated = accepted.len() - self.config.per_page_limit;
            accepted.truncate(self.config.per_page_limit);
        }

        let (records, report) = self.sanitizer.sanitize_with_report(accepted);
        outcome.records = records;
        outcome.sanitize = report;

        tracing::info!(
            page = outcome.page,
            blocks = outcome.blocks_seen,
            duplicates = outcome.duplicates_skipped,
            rejected = outcome.rejected,
            truncated = outcome.truncated,
            kept = outcome.records.len(),
            "Processed page"
        );
        outcome
    }

    /// Processes every page, in parallel when `workers > 1`.
    ///
    /// Outcomes are returned in input order regardless of worker count.
    pub fn process_pages(&self, pages: &[PageBatch]) -> HarvestResult<Vec<PageOutcome>> {
        let workers = self.config.workers.clamp(1, pages.len().max(1));
        if workers == 1 {
            return Ok(pages.iter().map(|page| self.process_page(page)).collect());
        }

        let (job_tx, job_rx) = bounded::<usize>(workers);
        let (out_tx, out_rx) = bounded::<(usize, PageOutcome)>(workers);

        thread::scope(move |scope| -> HarvestResult<Vec<PageOutcome>> {
            for idx in 0..workers {
                let job_rx: Receiver<usize> = job_rx.clone();
                let out_tx: Sender<(usize, PageOutcome)> = out_tx.clone();
                thread::Builder::new()
                    .name(format!("harvest-page-{idx}"))
                    .spawn_scoped(scope, move || {
                        while let Ok(slot) = job_rx.recv() {
                            let outcome = self.process_page(&pages[slot]);
                            if out_tx.send((slot, outcome)).is_err() {
                                break;
                            }
                        }
                    })
                    .map_err(|e| HarvestError::internal(format!("failed to spawn page worker: {e}")))?;
            }
            drop(job_rx);
            drop(out_tx);

            let feeder = thread::Builder::new()
                .name("harvest-feeder".to_string())
                .spawn_scoped(scope, move || {
                    for slot in 0..pages.len() {
                        if job_tx.send(slot).is_err() {
                            break;
                        }
                    }
                })
                .map_err(|e| HarvestError::internal(format!("failed to spawn page feeder: {e}")))?;

            let mut slots: Vec<Option<PageOutcome>> = vec![None; pages.len()];
            for (slot, outcome) in out_rx.iter() {
                slots[slot] = Some(outcome);
            }
            feeder
                .join()
                .map_err(|_| HarvestError::internal("page feeder panicked"))?;

            slots
                .into_iter()
                .enumerate()
                .map(|(slot, outcome)| {
                    outcome.ok_or_else(|| {
                        HarvestError::internal(format!("page slot {slot} produced no outcome"))
                    })
                })
                .collect()
        })
    }

    /// Runs the full pipeline over pre-grouped pages.
    pub fn run(&self, pages: &[PageBatch]) -> HarvestResult<HarvestReport> {
        let outcomes = self.process_pages(pages)?;
        let mut stats = HarvestStats {
            pages_seen: pages.len(),
            ..HarvestStats::default()
        };
        let mut accumulated: Vec<CandidateRecord> = Vec::new();

        for outcome in outcomes {
            if accumulated.len() >= self.config.max_candidates {
                tracing::info!(
                    page = outcome.page,
                    accumulated = accumulated.len(),
                    cap = self.config.max_candidates,
                    "Candidate cap reached, skipping remaining pages"
                );
                break;
            }
            stats.pages_accepted += 1;
            stats.blocks_seen += outcome.blocks_seen;
            stats.duplicates_skipped += outcome.duplicates_skipped;
            stats.rejected += outcome.rejected;
            stats.truncated += outcome.truncated;
            stats.dropped += outcome.sanitize.dropped;
            accumulated.extend(outcome.records);
        }

        stats.accumulated = accumulated.len();
        let (candidates, resolution) = resolve_with_report(&accumulated);
        stats.resolved = candidates.len();

        tracing::info!(
            pages = stats.pages_accepted,
            accumulated = stats.accumulated,
            resolved = stats.resolved,
            "Harvest complete"
        );
        Ok(HarvestReport {
            candidates,
            stats,
            resolution,
        })
    }

    /// Groups a flat block list into pages and runs the pipeline.
    pub fn run_blocks(&self, blocks: Vec<RawTextBlock>) -> HarvestResult<HarvestReport> {
        let pages = group_pages(blocks);
        self.run(&pages)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Matchers::builtin(), HarvestConfig::default())
    }
}

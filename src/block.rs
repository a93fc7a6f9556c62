//! Raw text blocks handed over by the page-fetching collaborator.
//!
//! A block is one contiguous text fragment believed to hold a single candidate
//! profile excerpt, already split into trimmed, non-empty lines. Profile links
//! are pre-extracted from the anchors inside the block.

use std::collections::HashMap;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

const GITHUB_HOST: &str = "github.com";
const LINKEDIN_HOST: &str = "linkedin.com";

/// One scraped text fragment.
///
/// Deserialized blocks go through the same line normalization as [`RawTextBlock::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BlockRepr")]
pub struct RawTextBlock {
    /// Trimmed, non-empty lines in on-page visual order.
    pub lines: Vec<String>,
    /// 1-based page the block came from.
    pub page_index: u32,
    /// First anchor URL inside the block pointing at GitHub.
    pub github_url: Option<String>,
    /// First anchor URL inside the block pointing at LinkedIn.
    pub linkedin_url: Option<String>,
}

/// Wire shape of a block before its lines are normalized.
#[derive(Deserialize)]
struct BlockRepr {
    lines: Vec<String>,
    page_index: u32,
    #[serde(default)]
    github_url: Option<String>,
    #[serde(default)]
    linkedin_url: Option<String>,
}

impl From<BlockRepr> for RawTextBlock {
    fn from(repr: BlockRepr) -> Self {
        Self {
            github_url: repr.github_url,
            linkedin_url: repr.linkedin_url,
            ..Self::new(repr.page_index, repr.lines)
        }
    }
}

impl RawTextBlock {
    /// Creates a block from already-split lines, normalizing them.
    ///
    /// Lines are trimmed and blank lines are dropped.
    #[must_use]
    pub fn new<I, S>(page_index: u32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|l| l.as_ref().trim().to_string())
                .filter(|l| !l.is_empty())
                .collect(),
            page_index,
            github_url: None,
            linkedin_url: None,
        }
    }

    /// Creates a block from the raw visible text of a container.
    #[must_use]
    pub fn from_text(page_index: u32, text: &str) -> Self {
        Self::new(page_index, text.lines())
    }

    /// Attaches profile links picked from the block's anchor URLs.
    ///
    /// The first anchor containing `github.com` and the first containing
    /// `linkedin.com` win; later matches are ignored.
    #[must_use]
    pub fn with_anchors<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for href in anchors {
            let href = href.as_ref();
            if self.github_url.is_none() && href.contains(GITHUB_HOST) {
                self.github_url = Some(href.to_string());
            } else if self.linkedin_url.is_none() && href.contains(LINKEDIN_HOST) {
                self.linkedin_url = Some(href.to_string());
            }
        }
        self
    }

    /// Sets the GitHub URL.
    #[must_use]
    pub fn with_github(mut self, url: impl Into<String>) -> Self {
        self.github_url = Some(url.into());
        self
    }

    /// Sets the LinkedIn URL.
    #[must_use]
    pub fn with_linkedin(mut self, url: impl Into<String>) -> Self {
        self.linkedin_url = Some(url.into());
        self
    }

    /// The block text with lines joined by `\n`.
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Stable content fingerprint over lines and links.
    ///
    /// Two blocks with the same fingerprint classify identically.
    #[must_use]
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut h = Hasher::new();
        for line in &self.lines {
            h.update(line.as_bytes());
            h.update(&[0x1f]);
        }
        h.update(&[0x1e]);
        h.update(self.github_url.as_deref().unwrap_or_default().as_bytes());
        h.update(&[0x1e]);
        h.update(self.linkedin_url.as_deref().unwrap_or_default().as_bytes());
        *h.finalize().as_bytes()
    }
}

/// All blocks scraped from one result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBatch {
    /// 1-based page number.
    pub page: u32,
    /// Blocks in scan order.
    pub blocks: Vec<RawTextBlock>,
}

/// Groups a flat block list by `page_index`, keeping pages in first-seen order
/// and blocks in scan order within each page.
#[must_use]
pub fn group_pages(blocks: Vec<RawTextBlock>) -> Vec<PageBatch> {
    let mut index: HashMap<u32, usize> = HashMap::new();
    let mut pages: Vec<PageBatch> = Vec::new();

    for block in blocks {
        let slot = *index.entry(block.page_index).or_insert_with(|| {
            pages.push(PageBatch {
                page: block.page_index,
                blocks: Vec::new(),
            });
            pages.len() - 1
        });
        pages[slot].blocks.push(block);
    }

    pages
}

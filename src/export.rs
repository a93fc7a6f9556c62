//! JSON input and output.
//!
//! Input is a JSON array of [`RawTextBlock`] objects as produced by the
//! browser collaborator. Output is a pretty-printed JSON array of
//! [`CandidateRecord`] objects.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::block::RawTextBlock;
use crate::error::{ExportError, HarvestResult};
use crate::record::CandidateRecord;

/// Reads a block file.
pub fn read_blocks(path: impl AsRef<Path>) -> HarvestResult<Vec<RawTextBlock>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let blocks: Vec<RawTextBlock> =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ExportError::json(path, e))?;
    tracing::info!(path = %path.display(), blocks = blocks.len(), "Read blocks");
    Ok(blocks)
}

/// Writes candidates as an indented JSON array.
pub fn write_candidates(path: impl AsRef<Path>, candidates: &[CandidateRecord]) -> HarvestResult<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    to_writer(&mut writer, candidates).map_err(|e| ExportError::json(path, e))?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    tracing::info!(
        path = %path.display(),
        candidates = candidates.len(),
        "Wrote candidates"
    );
    Ok(())
}

/// Serializes candidates to any writer, pretty-printed with a trailing newline.
pub fn to_writer<W: Write>(mut writer: W, candidates: &[CandidateRecord]) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut writer, candidates)?;
    writer.write_all(b"\n").map_err(serde_json::Error::io)
}

//! # Patch Ledger Parsing
//!
//! A ledger (usually `patch_list.txt`) describes a batch of change requests
//! (CRs). It is a sequence of loosely formatted blocks, each introduced by a
//! `Patch Type:` label:
//!
//! ```text
//! Patch Type:
//!   Customer Request
//! CR ID: ALPS10624524
//! Severity:
//!   Critical
//! Description:
//!   [Google Security Patch][CVE-2024-0001]Null pointer fix
//! Associated Files:
//!   frameworks/base/core/Foo.java
//!   vendor/mediatek/bar.c
//! ```
//!
//! ## Parsing Model
//!
//! The text is first split into blocks on the `Patch Type:` marker. Each block
//! is then walked line by line by a small scanner. A line whose trimmed text
//! starts with a known label hands control to that label's section handler:
//!
//! - **Patch Type**: first non-blank line after the label.
//! - **CR ID**: inline value after `CR ID:`, otherwise the first non-blank
//!   line after the label. A block without a CR ID is dropped.
//! - **Severity**: the very next line if it is non-blank, else empty. A blank
//!   line here means "no severity"; the handler never looks further.
//! - **Description**: every line up to the `Associated Files` label.
//! - **Associated Files**: every remaining non-blank line is a file path.
//!   This section ends the block.
//!
//! Missing optional fields fall back to empty strings (or the
//! [`NO_DESCRIPTION`] summary) instead of failing the parse.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::defaults::NO_DESCRIPTION;
use crate::error::{Error, Result};

/// Marker that introduces every ledger block.
const BLOCK_MARKER: &str = "Patch Type:";

/// One parsed ledger block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrRecord {
    /// The CR identifier, e.g. `ALPS10624524`.
    pub cr_id: String,
    /// Patch type label, possibly empty.
    pub patch_type: String,
    /// Severity label, possibly empty.
    pub severity: String,
    /// First non-blank description line, trimmed.
    pub description_first: String,
    /// Full description, one entry per ledger line, right-trimmed.
    pub description_full: String,
    /// Associated file paths relative to the source root, in ledger order.
    pub files: Vec<String>,
}

/// Labeled sections recognized inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    PatchType,
    CrId,
    Severity,
    Description,
    AssociatedFiles,
}

impl Section {
    /// Detect the section a trimmed line opens, if any.
    fn detect(trimmed: &str) -> Option<Self> {
        if trimmed.starts_with("Patch Type") {
            Some(Self::PatchType)
        } else if trimmed.starts_with("CR ID") {
            Some(Self::CrId)
        } else if trimmed.starts_with("Severity") {
            Some(Self::Severity)
        } else if trimmed.starts_with("Description") {
            Some(Self::Description)
        } else if trimmed.starts_with("Associated Files") {
            Some(Self::AssociatedFiles)
        } else {
            None
        }
    }
}

/// Fields collected while scanning one block.
#[derive(Debug, Default)]
struct BlockDraft {
    cr_id: Option<String>,
    patch_type: String,
    severity: String,
    description_first: Option<String>,
    description_full: String,
    files: Vec<String>,
}

impl BlockDraft {
    fn into_record(self) -> Option<CrRecord> {
        let cr_id = self.cr_id.filter(|id| !id.is_empty())?;
        Some(CrRecord {
            cr_id,
            patch_type: self.patch_type,
            severity: self.severity,
            description_first: self
                .description_first
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            description_full: self.description_full,
            files: self.files,
        })
    }
}

/// Line cursor over a single block.
struct BlockScanner<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    draft: BlockDraft,
}

impl<'a> BlockScanner<'a> {
    fn new(block: &'a str) -> Self {
        Self {
            lines: block.lines().collect(),
            pos: 0,
            draft: BlockDraft::default(),
        }
    }

    fn run(mut self) -> Option<CrRecord> {
        while self.pos < self.lines.len() {
            let line: &'a str = self.lines[self.pos];
            let trimmed = line.trim();
            match Section::detect(trimmed) {
                Some(Section::PatchType) => self.patch_type(),
                Some(Section::CrId) => self.cr_id(trimmed),
                Some(Section::Severity) => self.severity(),
                Some(Section::Description) => self.description(),
                Some(Section::AssociatedFiles) => {
                    self.associated_files();
                    break;
                }
                None => self.pos += 1,
            }
        }
        self.draft.into_record()
    }

    /// First non-blank line strictly after the current one, trimmed.
    fn next_non_blank(&self) -> Option<String> {
        self.lines[self.pos + 1..]
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    fn patch_type(&mut self) {
        self.draft.patch_type = self.next_non_blank().unwrap_or_default();
        self.pos += 1;
    }

    fn cr_id(&mut self, trimmed: &str) {
        let inline = trimmed
            .strip_prefix("CR ID:")
            .map(str::trim)
            .filter(|value| !value.is_empty());
        match inline {
            Some(value) => self.draft.cr_id = Some(value.to_string()),
            None => {
                if let Some(value) = self.next_non_blank() {
                    self.draft.cr_id = Some(value);
                }
            }
        }
        self.pos += 1;
    }

    fn severity(&mut self) {
        self.draft.severity = self
            .lines
            .get(self.pos + 1)
            .map(|line| line.trim().to_string())
            .unwrap_or_default();
        self.pos += 1;
    }

    fn description(&mut self) {
        let start = self.pos + 1;
        let end = self.lines[start..]
            .iter()
            .position(|line| line.trim().starts_with("Associated Files"))
            .map_or(self.lines.len(), |offset| start + offset);
        let captured = &self.lines[start..end];

        if let Some(first) = captured.iter().map(|l| l.trim()).find(|l| !l.is_empty()) {
            self.draft.description_first = Some(first.to_string());
        }
        self.draft.description_full = captured
            .iter()
            .map(|line| line.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string();

        // Resume on the `Associated Files` label, if there is one.
        self.pos = end;
    }

    fn associated_files(&mut self) {
        let files = self.lines[self.pos + 1..]
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string);
        self.draft.files.extend(files);
        self.pos = self.lines.len();
    }
}

/// Split ledger text into blocks, re-prefixing each with the block marker.
fn split_blocks(content: &str) -> Vec<String> {
    content
        .split(BLOCK_MARKER)
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            if raw.trim_start().starts_with(':') {
                raw.to_string()
            } else {
                format!("{BLOCK_MARKER}{raw}")
            }
        })
        .collect()
}

/// Parse a single block. Returns `None` when no CR ID can be determined.
pub fn parse_block(block: &str) -> Option<CrRecord> {
    BlockScanner::new(block).run()
}

/// Parse ledger text into CR records, preserving ledger order.
///
/// Blocks without a resolvable CR ID are silently dropped; they never affect
/// the blocks around them.
pub fn parse(content: &str) -> Vec<CrRecord> {
    split_blocks(content)
        .iter()
        .filter_map(|block| parse_block(block))
        .collect()
}

/// Decode raw ledger bytes.
///
/// Invalid UTF-8 sequences are dropped, and `\r\n` and lone `\r` line
/// endings become `\n`.
fn decode(bytes: &[u8]) -> String {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Read and parse a ledger file.
///
/// Fails with [`Error::LedgerNotFound`] before reading anything if the file
/// does not exist. Invalid UTF-8 is dropped rather than rejected.
pub fn from_file(path: &Path) -> Result<Vec<CrRecord>> {
    if !path.exists() {
        return Err(Error::LedgerNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = fs::read(path)?;
    let content = decode(&bytes);
    let records = parse(&content);
    log::debug!("Parsed {} CR records from {}", records.len(), path.display());
    Ok(records)
}

//! Unified-diff parsing into structured hunks.
//!
//! This module provides [`parse_unified_diff`], a pure function turning
//! `git diff` textual output into [`DiffHunk`] records. It is used by the
//! git history provider and is reusable by any text-diff consumer.
//!
//! # Public API
//! - [`parse_unified_diff`]: Parse unified-diff text into ordered hunks
//! - [`DiffHunk`]: One `@@ -a,b +c,d @@` region with its lines
//! - [`DiffLine`], [`DiffLineKind`]: A single classified line
//!
//! # Parsing Rules
//! - A line matching `@@ -oldStart,oldLines +newStart,newLines @@` opens a
//!   new hunk; omitted counts default to 1 per unified-diff convention
//! - Subsequent lines classify by first character: `-` remove, `+` add,
//!   anything else (including a literal leading space) context
//! - Lines before the first header are ignored (file headers, index lines)
//! - A header-shaped line with unparsable numbers fails the whole parse;
//!   a partially parsed diff is worse than no diff
//!
//! The parser owns line-number computation: `old_line_number` is filled on
//! context/remove lines, `new_line_number` on context/add lines, walking
//! from the hunk start positions.

use crate::core::error::{Result, SyncError};
use serde::{Deserialize, Serialize};

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffLineKind {
    Add,
    Remove,
    Context,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_line_number: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_line_number: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffHunk {
    pub old_start: usize,
    pub old_lines: usize,
    pub new_start: usize,
    pub new_lines: usize,
    pub lines: Vec<DiffLine>,
}

/// Parse unified-diff text into an ordered sequence of hunks.
///
/// Hunks never overlap and appear in the order the diff text lists them.
pub fn parse_unified_diff(text: &str) -> Result<Vec<DiffHunk>> {
    let mut hunks: Vec<DiffHunk> = Vec::new();
    let mut old_line = 0usize;
    let mut new_line = 0usize;

    for line in text.lines() {
        if line.starts_with("@@ -") {
            let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(line)?;
            old_line = old_start;
            new_line = new_start;
            hunks.push(DiffHunk {
                old_start,
                old_lines,
                new_start,
                new_lines,
                lines: Vec::new(),
            });
            continue;
        }

        // Anything before the first header has no hunk to receive it
        let Some(hunk) = hunks.last_mut() else {
            continue;
        };

        let diff_line = if let Some(content) = line.strip_prefix('-') {
            let entry = DiffLine {
                kind: DiffLineKind::Remove,
                content: content.to_string(),
                old_line_number: Some(old_line),
                new_line_number: None,
            };
            old_line += 1;
            entry
        } else if let Some(content) = line.strip_prefix('+') {
            let entry = DiffLine {
                kind: DiffLineKind::Add,
                content: content.to_string(),
                old_line_number: None,
                new_line_number: Some(new_line),
            };
            new_line += 1;
            entry
        } else {
            let content = line.strip_prefix(' ').unwrap_or(line);
            let entry = DiffLine {
                kind: DiffLineKind::Context,
                content: content.to_string(),
                old_line_number: Some(old_line),
                new_line_number: Some(new_line),
            };
            old_line += 1;
            new_line += 1;
            entry
        };

        hunk.lines.push(diff_line);
    }

    Ok(hunks)
}

/// Parse `@@ -oldStart[,oldLines] +newStart[,newLines] @@ ...` into its four
/// integers. Omitted counts default to 1.
fn parse_hunk_header(line: &str) -> Result<(usize, usize, usize, usize)> {
    let body = line
        .strip_prefix("@@ -")
        .and_then(|rest| rest.split_once(" @@"))
        .map(|(ranges, _)| ranges)
        .ok_or_else(|| SyncError::malformed_hunk_header(line))?;

    let (old_range, new_range) = body
        .split_once(" +")
        .ok_or_else(|| SyncError::malformed_hunk_header(line))?;

    let (old_start, old_lines) = parse_range(old_range, line)?;
    let (new_start, new_lines) = parse_range(new_range, line)?;

    Ok((old_start, old_lines, new_start, new_lines))
}

fn parse_range(range: &str, header: &str) -> Result<(usize, usize)> {
    let (start, count) = match range.split_once(',') {
        Some((start, count)) => (start, Some(count)),
        None => (range, None),
    };

    let start: usize = start
        .parse()
        .map_err(|_| SyncError::malformed_hunk_header(header))?;
    let count: usize = match count {
        Some(count) => count
            .parse()
            .map_err(|_| SyncError::malformed_hunk_header(header))?,
        None => 1,
    };

    Ok((start, count))
}

//! Comparison orchestration.
//!
//! Ties the pieces together: normalizes both inputs, aligns the normalized
//! lines, then attaches character spans to every line that did not survive
//! unchanged. The result carries the original (display) text of each line,
//! never the normalized form.
//!
//! ## Processing Flow
//!
//! 1. Reject the request if both texts are blank
//! 2. [`crate::normalize::normalize_lines`] on both texts
//! 3. [`crate::matcher::match_lines`] on the normalized lines
//! 4. For each removed/added line at line number `n`, look up original line `n`
//!    in both texts (missing lines read as `""`) and run
//!    [`crate::highlight::char_diff`] on the pair
//!
//! Step 4 is independent per line and runs on the rayon pool; output order is
//! the edit-script order regardless.

use crate::highlight::{ChangeKind, CharDiffSpan, Spans, char_diff, spans_into_lua};
use crate::matcher::{Edit, match_lines};
use crate::normalize::normalize_lines;
use crate::options::ComparisonOptions;
use mlua::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Message shown when there is nothing to compare.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter text in at least one of the text areas";

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("{}", EMPTY_INPUT_MESSAGE)]
    EmptyInput,

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One classified line of output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DiffLine {
    Unchanged {
        text: String,
        /// 1-based position in text A.
        line_number: u32,
        /// 1-based position in text B.
        other_line_number: u32,
    },
    Removed {
        text: String,
        /// 1-based position in text A.
        line_number: u32,
        char_diff: Spans,
    },
    Added {
        text: String,
        /// 1-based position in text B.
        line_number: u32,
        char_diff: Spans,
    },
}

impl DiffLine {
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            DiffLine::Unchanged { .. } => ChangeKind::Unchanged,
            DiffLine::Removed { .. } => ChangeKind::Removed,
            DiffLine::Added { .. } => ChangeKind::Added,
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            DiffLine::Unchanged { text, .. }
            | DiffLine::Removed { text, .. }
            | DiffLine::Added { text, .. } => text,
        }
    }

    #[inline]
    #[must_use]
    pub fn line_number(&self) -> u32 {
        match self {
            DiffLine::Unchanged { line_number, .. }
            | DiffLine::Removed { line_number, .. }
            | DiffLine::Added { line_number, .. } => *line_number,
        }
    }

    /// Character spans, present only on removed and added lines.
    #[must_use]
    pub fn char_diff(&self) -> Option<&[CharDiffSpan]> {
        match self {
            DiffLine::Unchanged { .. } => None,
            DiffLine::Removed { char_diff, .. } | DiffLine::Added { char_diff, .. } => {
                Some(char_diff.as_slice())
            }
        }
    }

    /// The spans a renderer draws for this line.
    ///
    /// A removed line shows its own characters (removed + unchanged); an added
    /// line shows added + unchanged. Unchanged lines have no spans.
    pub fn visible_spans(&self) -> impl Iterator<Item = &CharDiffSpan> {
        let hidden = match self.kind() {
            ChangeKind::Removed => Some(ChangeKind::Added),
            ChangeKind::Added => Some(ChangeKind::Removed),
            ChangeKind::Unchanged => None,
        };
        self.char_diff()
            .unwrap_or_default()
            .iter()
            .filter(move |span| Some(span.kind()) != hidden)
    }
}

/// Aggregate line counts for the summary panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub added: u32,
    pub removed: u32,
    pub unchanged: u32,
    /// Number of output lines; always `added + removed + unchanged`.
    pub total: u32,
}

impl DiffStats {
    fn from_lines(lines: &[DiffLine]) -> Self {
        let mut stats = Self::default();
        for line in lines {
            match line.kind() {
                ChangeKind::Added => stats.added += 1,
                ChangeKind::Removed => stats.removed += 1,
                ChangeKind::Unchanged => stats.unchanged += 1,
            }
        }
        stats.total = lines.len() as u32;
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub lines: Vec<DiffLine>,
    pub stats: DiffStats,
}

impl ComparisonResult {
    /// Renders the result as pretty-printed JSON for clipboard or file export.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Compares two texts line by line.
///
/// Fails only with [`CompareError::EmptyInput`] when both texts are empty or
/// whitespace-only.
pub fn compare(
    text_a: &str,
    text_b: &str,
    opts: ComparisonOptions,
) -> Result<ComparisonResult, CompareError> {
    if text_a.trim().is_empty() && text_b.trim().is_empty() {
        return Err(CompareError::EmptyInput);
    }

    let original_a: Vec<&str> = text_a.split('\n').collect();
    let original_b: Vec<&str> = text_b.split('\n').collect();
    let edits = match_lines(&normalize_lines(text_a, opts), &normalize_lines(text_b, opts));

    let lines: Vec<DiffLine> = edits
        .into_par_iter()
        .map(|edit| build_line(edit, &original_a, &original_b))
        .collect();
    let stats = DiffStats::from_lines(&lines);

    log::debug!(
        "compared {} vs {} lines: +{} -{} ={}",
        original_a.len(),
        original_b.len(),
        stats.added,
        stats.removed,
        stats.unchanged
    );

    Ok(ComparisonResult { lines, stats })
}

/// Reads two files (lossy UTF-8) and compares their contents.
pub fn compare_files(
    path_a: &Path,
    path_b: &Path,
    opts: ComparisonOptions,
) -> Result<ComparisonResult, CompareError> {
    let text_a = read_text(path_a)?;
    let text_b = read_text(path_b)?;
    compare(&text_a, &text_b, opts)
}

fn read_text(path: &Path) -> Result<String, CompareError> {
    std::fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|source| {
            log::warn!("failed to read {}: {source}", path.display());
            CompareError::Read {
                path: path.to_path_buf(),
                source,
            }
        })
}

/// Turns one edit into an output line, attaching character spans to changes.
fn build_line(edit: Edit, original_a: &[&str], original_b: &[&str]) -> DiffLine {
    match edit {
        Edit::Equal { a, b } => DiffLine::Unchanged {
            text: original_a[a].to_owned(),
            line_number: line_number(a),
            other_line_number: line_number(b),
        },
        Edit::Delete { a } => DiffLine::Removed {
            text: original_a[a].to_owned(),
            line_number: line_number(a),
            char_diff: spans_at(a, original_a, original_b),
        },
        Edit::Insert { b } => DiffLine::Added {
            text: original_b[b].to_owned(),
            line_number: line_number(b),
            char_diff: spans_at(b, original_a, original_b),
        },
    }
}

/// Character spans between the original lines at the same index of A and B.
#[inline]
fn spans_at(index: usize, original_a: &[&str], original_b: &[&str]) -> Spans {
    let line_a = original_a.get(index).copied().unwrap_or_default();
    let line_b = original_b.get(index).copied().unwrap_or_default();
    char_diff(line_a, line_b)
}

#[inline]
fn line_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

impl IntoLua for DiffLine {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("kind", self.kind().as_str())?;
        table.set("text", self.text())?;
        table.set("line_number", self.line_number())?;
        if let DiffLine::Unchanged {
            other_line_number, ..
        } = &self
        {
            table.set("other_line_number", *other_line_number)?;
        }
        if let Some(spans) = self.char_diff() {
            table.set("char_diff", spans_into_lua(lua, spans.iter().cloned())?)?;
            table.set("spans", spans_into_lua(lua, self.visible_spans().cloned())?)?;
        }
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for DiffStats {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("added", self.added)?;
        table.set("removed", self.removed)?;
        table.set("unchanged", self.unchanged)?;
        table.set("total", self.total)?;
        Ok(LuaValue::Table(table))
    }
}

impl IntoLua for ComparisonResult {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        let lines: Vec<LuaValue> = self
            .lines
            .into_iter()
            .map(|l| l.into_lua(lua))
            .collect::<LuaResult<_>>()?;
        table.set("lines", lua.create_sequence_from(lines)?)?;
        table.set("stats", self.stats.into_lua(lua)?)?;
        Ok(LuaValue::Table(table))
    }
}

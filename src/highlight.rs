//! Character-level highlighting for changed lines.
//!
//! Runs the same greedy alignment as line matching, over `char`s with a wider
//! window and without any normalization, then coalesces consecutive characters
//! of the same kind into spans.
//!
//! For a pair `(line_a, line_b)` the spans satisfy:
//!
//! - `Removed` + `Unchanged` texts, in order, concatenate to `line_a`
//! - `Added` + `Unchanged` texts, in order, concatenate to `line_b`

use crate::matcher::{Edit, greedy_align};
use mlua::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;

/// Lookahead window for character matching.
pub const CHAR_LOOKAHEAD: usize = 20;

/// Most changed lines split into a handful of spans; inline storage avoids
/// heap allocation for the common case.
pub type Spans = SmallVec<[CharDiffSpan; 4]>;

/// Classification shared by lines and spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Unchanged,
    Removed,
    Added,
}

impl ChangeKind {
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Unchanged => "unchanged",
            ChangeKind::Removed => "removed",
            ChangeKind::Added => "added",
        }
    }
}

/// A run of characters with a single classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum CharDiffSpan {
    Unchanged(String),
    Removed(String),
    Added(String),
}

impl CharDiffSpan {
    #[inline]
    fn new(kind: ChangeKind, text: String) -> Self {
        match kind {
            ChangeKind::Unchanged => CharDiffSpan::Unchanged(text),
            ChangeKind::Removed => CharDiffSpan::Removed(text),
            ChangeKind::Added => CharDiffSpan::Added(text),
        }
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            CharDiffSpan::Unchanged(_) => ChangeKind::Unchanged,
            CharDiffSpan::Removed(_) => ChangeKind::Removed,
            CharDiffSpan::Added(_) => ChangeKind::Added,
        }
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            CharDiffSpan::Unchanged(t) | CharDiffSpan::Removed(t) | CharDiffSpan::Added(t) => t,
        }
    }

    #[inline]
    fn text_mut(&mut self) -> &mut String {
        match self {
            CharDiffSpan::Unchanged(t) | CharDiffSpan::Removed(t) | CharDiffSpan::Added(t) => t,
        }
    }
}

/// Computes character spans for a pair of original lines.
///
/// Identical lines (including two empty lines) produce a single `Unchanged`
/// span. Either side may be empty, which yields a single `Added` or `Removed`
/// span covering the other.
#[must_use]
pub fn char_diff(line_a: &str, line_b: &str) -> Spans {
    if line_a == line_b {
        return smallvec::smallvec![CharDiffSpan::Unchanged(line_a.to_owned())];
    }

    let a: Vec<char> = line_a.chars().collect();
    let b: Vec<char> = line_b.chars().collect();

    let mut spans = Spans::new();
    for edit in greedy_align(&a, &b, CHAR_LOOKAHEAD) {
        let (kind, ch) = match edit {
            Edit::Equal { a: i, .. } => (ChangeKind::Unchanged, a[i]),
            Edit::Delete { a: i } => (ChangeKind::Removed, a[i]),
            Edit::Insert { b: j } => (ChangeKind::Added, b[j]),
        };
        push_char(&mut spans, kind, ch);
    }
    spans
}

/// Appends `ch` to the last span if it has the same kind, otherwise starts a
/// new span.
#[inline]
fn push_char(spans: &mut Spans, kind: ChangeKind, ch: char) {
    match spans.last_mut() {
        Some(last) if last.kind() == kind => last.text_mut().push(ch),
        _ => spans.push(CharDiffSpan::new(kind, ch.to_string())),
    }
}

/// Builds a Lua sequence of `{ kind, text }` tables.
pub fn spans_into_lua(
    lua: &Lua,
    spans: impl IntoIterator<Item = CharDiffSpan>,
) -> LuaResult<LuaTable> {
    let spans: Vec<LuaValue> = spans
        .into_iter()
        .map(|s| s.into_lua(lua))
        .collect::<LuaResult<_>>()?;
    lua.create_sequence_from(spans)
}

impl IntoLua for CharDiffSpan {
    fn into_lua(self, lua: &Lua) -> LuaResult<LuaValue> {
        let table = lua.create_table()?;
        table.set("kind", self.kind().as_str())?;
        table.set("text", self.text())?;
        Ok(LuaValue::Table(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Rebuilds one side of the pair from its spans.
    fn rebuild(spans: &[CharDiffSpan], keep: ChangeKind) -> String {
        spans
            .iter()
            .filter(|s| s.kind() == ChangeKind::Unchanged || s.kind() == keep)
            .map(CharDiffSpan::text)
            .collect()
    }

    #[test]
    fn identical_lines_single_unchanged_span() {
        let spans = char_diff("same", "same");
        assert_eq!(spans.as_slice(), &[CharDiffSpan::Unchanged("same".into())]);
    }

    #[test]
    fn empty_pair_is_one_empty_span() {
        let spans = char_diff("", "");
        assert_eq!(spans.as_slice(), &[CharDiffSpan::Unchanged(String::new())]);
    }

    #[test]
    fn first_character_case_change() {
        let spans = char_diff("Hello", "hello");
        assert_eq!(
            spans.as_slice(),
            &[
                CharDiffSpan::Removed("H".into()),
                CharDiffSpan::Added("h".into()),
                CharDiffSpan::Unchanged("ello".into()),
            ]
        );
    }

    #[test]
    fn pure_removal_and_addition() {
        assert_eq!(
            char_diff("gone", "").as_slice(),
            &[CharDiffSpan::Removed("gone".into())]
        );
        assert_eq!(
            char_diff("", "new").as_slice(),
            &[CharDiffSpan::Added("new".into())]
        );
    }

    #[test]
    fn trailing_digit_change() {
        let spans = char_diff("line2", "line3");
        assert_eq!(
            spans.as_slice(),
            &[
                CharDiffSpan::Unchanged("line".into()),
                CharDiffSpan::Removed("2".into()),
                CharDiffSpan::Added("3".into()),
            ]
        );
    }

    #[test]
    fn inserted_word_is_one_added_span() {
        let spans = char_diff("let x = 1;", "let mut x = 1;");
        assert_eq!(
            spans.as_slice(),
            &[
                CharDiffSpan::Unchanged("let ".into()),
                CharDiffSpan::Added("mut ".into()),
                CharDiffSpan::Unchanged("x = 1;".into()),
            ]
        );
    }

    #[test]
    fn lookahead_reaches_nineteen_chars() {
        let b = format!("{}x", "y".repeat(19));
        let spans = char_diff("x", &b);
        assert_eq!(
            spans.as_slice(),
            &[
                CharDiffSpan::Added("y".repeat(19)),
                CharDiffSpan::Unchanged("x".into()),
            ]
        );
    }

    #[test]
    fn lookahead_stops_at_window() {
        let b = format!("{}x", "y".repeat(20));
        let spans = char_diff("x", &b);
        assert_eq!(
            spans.as_slice(),
            &[CharDiffSpan::Removed("x".into()), CharDiffSpan::Added(b.clone())]
        );
    }

    #[test]
    fn multibyte_characters() {
        let spans = char_diff("naïve café", "naive cafe");
        assert_eq!(rebuild(&spans, ChangeKind::Removed), "naïve café");
        assert_eq!(rebuild(&spans, ChangeKind::Added), "naive cafe");
        assert_eq!(spans[0], CharDiffSpan::Unchanged("na".into()));
    }

    #[test]
    fn spans_rebuild_both_lines() {
        let pairs = [
            ("Hello", "hello"),
            ("abc", "xyz"),
            ("fn main() {}", "pub fn main() -> Result<()> {}"),
            ("aaaaaaaaaaaaaaaaaaaaaaaaaaaaab", "baaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            ("tab\there", "tab    here"),
            ("", "only b"),
            ("only a", ""),
            ("日本語のテキスト", "日本のテキスト です"),
        ];
        for (a, b) in pairs {
            let spans = char_diff(a, b);
            assert_eq!(rebuild(&spans, ChangeKind::Removed), a, "pair {a:?} / {b:?}");
            assert_eq!(rebuild(&spans, ChangeKind::Added), b, "pair {a:?} / {b:?}");
        }
    }

    #[test]
    fn adjacent_spans_never_share_a_kind() {
        let spans = char_diff("abcdef", "azcyeq");
        for pair in spans.windows(2) {
            assert_ne!(pair[0].kind(), pair[1].kind());
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(CharDiffSpan::Added("x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "added", "text": "x"}));
    }
}

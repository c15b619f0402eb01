//! Greedy bounded-lookahead sequence alignment.
//!
//! Walks both sequences once with a cursor each. When the elements under the
//! cursors differ, it looks a fixed number of positions ahead in `b`, then in
//! `a`, for an element that re-synchronizes the two. The first hit wins; there
//! is no backtracking.
//!
//! ## Limitations
//!
//! This is a heuristic, not a minimal edit script. Matches further away than
//! the lookahead window are reported as a removal/addition pair, and when
//! several alignments are plausible the first one inside the window is taken
//! even if a later choice would produce fewer changes. Callers that need
//! minimal diffs want an O(ND) algorithm instead.
//!
//! The same routine drives both line matching ([`match_lines`]) and the
//! character highlighter in [`crate::highlight`].

/// Lookahead window for line matching.
pub const LINE_LOOKAHEAD: usize = 10;

/// One step of an edit script. Indices are 0-based into the input slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// `a[a] == b[b]`.
    Equal { a: usize, b: usize },
    /// `a[a]` has no counterpart in `b`.
    Delete { a: usize },
    /// `b[b]` has no counterpart in `a`.
    Insert { b: usize },
}

/// Aligns `a` against `b`, scanning at most `lookahead - 1` elements past a
/// mismatch to re-synchronize.
///
/// Every element of `a` appears exactly once as `Equal` or `Delete`, and
/// every element of `b` exactly once as `Equal` or `Insert`, in source order.
#[must_use]
pub fn greedy_align<T: PartialEq>(a: &[T], b: &[T], lookahead: usize) -> Vec<Edit> {
    let mut edits = Vec::with_capacity(a.len().max(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        if i >= a.len() {
            edits.push(Edit::Insert { b: j });
            j += 1;
        } else if j >= b.len() {
            edits.push(Edit::Delete { a: i });
            i += 1;
        } else if a[i] == b[j] {
            edits.push(Edit::Equal { a: i, b: j });
            i += 1;
            j += 1;
        } else if let Some(k) = find_ahead(b, j, lookahead, &a[i]) {
            // b[j..k] were inserted ahead of a[i]
            edits.extend((j..k).map(|b| Edit::Insert { b }));
            edits.push(Edit::Equal { a: i, b: k });
            i += 1;
            j = k + 1;
        } else if let Some(k) = find_ahead(a, i, lookahead, &b[j]) {
            // a[i..k] were deleted ahead of b[j]
            edits.extend((i..k).map(|a| Edit::Delete { a }));
            edits.push(Edit::Equal { a: k, b: j });
            i = k + 1;
            j += 1;
        } else {
            edits.push(Edit::Delete { a: i });
            edits.push(Edit::Insert { b: j });
            i += 1;
            j += 1;
        }
    }

    edits
}

/// Finds the first `k` in `from+1 .. min(from+lookahead, len)` with
/// `seq[k] == needle`.
#[inline]
fn find_ahead<T: PartialEq>(seq: &[T], from: usize, lookahead: usize, needle: &T) -> Option<usize> {
    let end = from.saturating_add(lookahead).min(seq.len());
    (from + 1..end).find(|&k| seq[k] == *needle)
}

/// Aligns two sequences of (already normalized) lines.
#[must_use]
pub fn match_lines<S: AsRef<str>>(lines_a: &[S], lines_b: &[S]) -> Vec<Edit> {
    let a: Vec<&str> = lines_a.iter().map(AsRef::as_ref).collect();
    let b: Vec<&str> = lines_b.iter().map(AsRef::as_ref).collect();
    greedy_align(&a, &b, LINE_LOOKAHEAD)
}

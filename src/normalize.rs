//! Pre-comparison text normalization.
//!
//! Normalized text is only ever used to decide whether two lines are equal.
//! The original text is kept alongside it for display and character
//! highlighting.

use crate::options::ComparisonOptions;

/// Normalizes a whole text, preserving its line structure.
///
/// Lower-cases when comparison is case-insensitive, and collapses whitespace
/// runs within each line when whitespace is hidden. Never fails, including on
/// empty input.
#[must_use]
pub fn normalize(text: &str, opts: ComparisonOptions) -> String {
    normalize_lines(text, opts).join("\n")
}

/// Splits `text` on `\n` and normalizes each line.
///
/// The returned vector always has exactly as many entries as
/// `text.split('\n')`, so indices line up with the original lines.
#[must_use]
pub fn normalize_lines(text: &str, opts: ComparisonOptions) -> Vec<String> {
    let folded;
    let text = if opts.case_sensitive {
        text
    } else {
        folded = text.to_lowercase();
        folded.as_str()
    };

    text.split('\n')
        .map(|line| {
            if opts.show_whitespace {
                line.to_owned()
            } else {
                collapse_whitespace(line)
            }
        })
        .collect()
}

/// Collapses every whitespace run to one space and trims both ends.
#[inline]
fn collapse_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for word in line.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(case_sensitive: bool, show_whitespace: bool) -> ComparisonOptions {
        ComparisonOptions {
            case_sensitive,
            show_whitespace,
        }
    }

    #[test]
    fn default_options_leave_text_untouched() {
        let text = "  Hello\t World \nSecond";
        assert_eq!(normalize(text, ComparisonOptions::default()), text);
    }

    #[test]
    fn case_insensitive_lowercases() {
        assert_eq!(normalize("HeLLo\nWORLD", opts(false, true)), "hello\nworld");
    }

    #[test]
    fn hidden_whitespace_collapses_and_trims_each_line() {
        assert_eq!(
            normalize("  a \t b  \n\tc   d\t", opts(true, false)),
            "a b\nc d"
        );
    }

    #[test]
    fn hidden_whitespace_keeps_line_count() {
        let text = "one\n\n   \nfour";
        let lines = normalize_lines(text, opts(true, false));
        assert_eq!(lines, vec!["one", "", "", "four"]);
    }

    #[test]
    fn carriage_returns_trimmed_when_whitespace_hidden() {
        assert_eq!(normalize_lines("a\r\nb\r", opts(true, false)), vec!["a", "b"]);
    }

    #[test]
    fn empty_input() {
        for o in [
            opts(true, true),
            opts(true, false),
            opts(false, true),
            opts(false, false),
        ] {
            assert_eq!(normalize("", o), "");
            assert_eq!(normalize_lines("", o), vec![""]);
        }
    }

    #[test]
    fn idempotent_for_all_options() {
        let samples = [
            "",
            "plain",
            "  Mixed\tCASE  \n\n  trailing   ",
            "ÜBER straße\r\nİstanbul",
            "\u{00a0}nbsp\u{2003}em space",
        ];
        for o in [
            opts(true, true),
            opts(true, false),
            opts(false, true),
            opts(false, false),
        ] {
            for s in samples {
                let once = normalize(s, o);
                assert_eq!(normalize(&once, o), once, "input {s:?} with {o:?}");
            }
        }
    }
}

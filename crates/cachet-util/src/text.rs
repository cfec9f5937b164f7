//! Text transforms for script-style configuration files.
//!
//! The compiler works on files written in a small script dialect: `//`, `#`,
//! and `/* */` comments, single- and double-quoted string literals with
//! backslash escapes, and line-oriented directives. The functions here are
//! pure string transforms; none of them touch the filesystem.

use std::iter::Peekable;
use std::str::Chars;

use once_cell::sync::Lazy;
use regex::Regex;

/// Trailing spaces and tabs at the end of each line.
static TRAILING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());

/// Two or more consecutive newlines.
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// Remove comments from script-style source text.
///
/// Strips `//` and `#` line comments and `/* */` block comments. String
/// literals are respected: comment markers inside single- or double-quoted
/// strings are left alone, and a backslash escapes the following character
/// inside a literal.
///
/// Line comments keep their terminating newline so line counts only change
/// where a block comment spanned multiple lines. Blank lines left behind by
/// stripped comments are not removed here; [`normalize_newlines`] collapses
/// them.
///
/// # Example
///
/// ```
/// use cachet_util::strip_comments;
///
/// let source = "$url = 'http://example.com'; // endpoint\n";
/// assert_eq!(strip_comments(source), "$url = 'http://example.com'; \n");
/// ```
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                out.push(c);
                copy_string_literal(c, &mut chars, &mut out);
            }
            '#' => skip_line_comment(&mut chars, &mut out),
            '/' => match chars.peek() {
                Some('/') => {
                    chars.next();
                    skip_line_comment(&mut chars, &mut out);
                }
                Some('*') => {
                    chars.next();
                    skip_block_comment(&mut chars);
                }
                _ => out.push(c),
            },
            _ => out.push(c),
        }
    }

    out
}

/// Copy a string literal through to `out`, honoring backslash escapes.
/// The opening delimiter has already been consumed and pushed.
fn copy_string_literal(delimiter: char, chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == delimiter {
            return;
        }
    }
}

/// Discard characters up to the end of the line, keeping the newline itself.
fn skip_line_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    for c in chars.by_ref() {
        if c == '\n' {
            out.push('\n');
            return;
        }
    }
}

/// Discard characters through the closing `*/`. An unterminated block
/// comment swallows the rest of the input.
fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) {
    let mut prev = '\0';
    for c in chars.by_ref() {
        if prev == '*' && c == '/' {
            return;
        }
        prev = c;
    }
}

/// Apply an ordered table of regex replacements.
///
/// Each `(pattern, replacement)` pair is applied over the whole text before
/// the next pair runs, so later patterns see the output of earlier ones.
/// Replacement strings use the usual `$1` capture expansion.
pub fn replace_patterns(text: &str, patterns: &[(&Regex, &str)]) -> String {
    let mut out = text.to_string();
    for (pattern, replacement) in patterns {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Normalize line endings and whitespace.
///
/// Carriage returns become newlines (covering both `\r\n` and bare-`\r`
/// files), trailing spaces and tabs are stripped from every line, and runs
/// of consecutive newlines collapse to a single newline.
///
/// # Example
///
/// ```
/// use cachet_util::normalize_newlines;
///
/// assert_eq!(
///     normalize_newlines("line1\r\nline2\r\n\n\n\nline3"),
///     "line1\nline2\nline3"
/// );
/// ```
pub fn normalize_newlines(text: &str) -> String {
    let unix = text.replace('\r', "\n");
    let trimmed = TRAILING_WHITESPACE.replace_all(&unix, "");
    BLANK_RUNS.replace_all(&trimmed, "\n").into_owned()
}

// crates/puli-core/src/width.rs - Display width of styled cell text
//
// Cells carry lightweight style markup such as `<c1>name</c1>` which the
// output layer turns into terminal colors. Alignment must be computed on the
// text the user actually sees, so markup and ANSI escapes are stripped and
// the remainder is measured in terminal columns rather than bytes.
//
// MARKUP RULES:
// - A tag is `<name>` or `</name>` where name is `[a-zA-Z][a-zA-Z0-9_-]*`
// - Only balanced pairs are markup; an unmatched `<uuid>` in a hint such as
//   `use "puli bind --enable <uuid>"` is literal text and keeps its width
// - Tags nest: `<bad><u>x</u></bad>`
// - A backslash right before a tag (`\<b>`) makes it literal and is itself
//   dropped; `escape_tags` applies this to data that must print verbatim

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use unicode_width::UnicodeWidthStr;

static STYLE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\\)?<(/?)([a-zA-Z][a-zA-Z0-9_-]*)>").expect("style tag pattern is valid")
});

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("ansi pattern is valid"));

/// A run of visible text together with the style tags active over it
///
/// `tags` is ordered outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub tags: Vec<&'a str>,
}

struct TagMatch<'a> {
    start: usize,
    end: usize,
    name: &'a str,
    closing: bool,
    escaped: bool,
}

/// Split `text` into styled segments
///
/// Literal (unbalanced) tags are returned as part of the visible text.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let matches: Vec<TagMatch<'_>> = STYLE_TAG
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(TagMatch {
                start: whole.start(),
                end: whole.end(),
                name: caps.get(3)?.as_str(),
                closing: !caps[2].is_empty(),
                escaped: caps.get(1).is_some(),
            })
        })
        .collect();

    // First pass: pair opening and closing tags
    let mut is_markup = vec![false; matches.len()];
    let mut open: Vec<usize> = Vec::new();
    for (idx, tag) in matches.iter().enumerate() {
        if tag.escaped {
            continue;
        }
        if !tag.closing {
            open.push(idx);
            continue;
        }
        if let Some(pos) = open.iter().rposition(|&o| matches[o].name == tag.name) {
            // Anything opened after the matching tag and still unclosed is literal
            open.truncate(pos + 1);
            if let Some(opening) = open.pop() {
                is_markup[opening] = true;
                is_markup[idx] = true;
            }
        }
    }

    // Second pass: emit text runs between markup tags
    let mut result = Vec::new();
    let mut stack: Vec<&str> = Vec::new();
    let mut cursor = 0;
    for (idx, tag) in matches.iter().enumerate() {
        if tag.escaped {
            // Keep the tag text, drop the backslash in front of it
            if tag.start > cursor {
                result.push(Segment {
                    text: &text[cursor..tag.start],
                    tags: stack.clone(),
                });
            }
            cursor = tag.start + 1;
            continue;
        }
        if !is_markup[idx] {
            continue;
        }
        if tag.start > cursor {
            result.push(Segment {
                text: &text[cursor..tag.start],
                tags: stack.clone(),
            });
        }
        if tag.closing {
            stack.pop();
        } else {
            stack.push(tag.name);
        }
        cursor = tag.end;
    }
    if cursor < text.len() {
        result.push(Segment {
            text: &text[cursor..],
            tags: stack,
        });
    }

    result
}

/// Remove style markup and ANSI escapes, leaving the visible text
///
/// Borrows when there is nothing to strip.
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') && !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }

    let visible: String = segments(text).iter().map(|segment| segment.text).collect();
    match ANSI_ESCAPE.replace_all(&visible, "") {
        Cow::Borrowed(_) => Cow::Owned(visible),
        Cow::Owned(stripped) => Cow::Owned(stripped),
    }
}

/// Number of terminal columns `text` occupies once rendered
///
/// Multi-byte characters such as `│` or a non-breaking space count as a
/// single column; East Asian wide characters count as two.
///
/// ```
/// use puli_core::width::display_width;
///
/// assert_eq!(display_width("<c1>bb5a07</c1>"), 6);
/// assert_eq!(display_width("a\u{a0}b"), 3);
/// ```
pub fn display_width(text: &str) -> usize {
    strip_tags(text).width()
}

/// Pad `text` with trailing spaces up to `width` display columns
pub fn pad_right(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    let mut padded = String::with_capacity(text.len() + padding);
    padded.push_str(text);
    padded.extend(std::iter::repeat_n(' ', padding));
    padded
}

/// Pad `text` with leading spaces up to `width` display columns
pub fn pad_left(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(text));
    let mut padded = String::with_capacity(text.len() + padding);
    padded.extend(std::iter::repeat_n(' ', padding));
    padded.push_str(text);
    padded
}

/// Make every tag-like sequence in `text` literal
///
/// Use on data (names, paths, globs) placed into cells so that it prints
/// exactly as given, even when it looks like markup.
///
/// ```
/// use puli_core::width::{escape_tags, strip_tags};
///
/// let name = "<b>vendor</b>";
/// assert_eq!(strip_tags(&escape_tags(name)), name);
/// ```
pub fn escape_tags(text: &str) -> Cow<'_, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }
    STYLE_TAG.replace_all(text, |caps: &Captures<'_>| format!("\\{}", &caps[0]))
}

/// Wrap `text` in a style tag, or return it escaped for an empty tag
///
/// `text` is data: markup inside it is escaped, not interpreted.
pub fn wrap_tag(tag: &str, text: &str) -> String {
    let text = escape_tags(text);
    if tag.is_empty() {
        text.into_owned()
    } else {
        format!("<{tag}>{text}</{tag}>")
    }
}

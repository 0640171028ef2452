//! ANSI-aware display width and truncation for frame lines.
//!
//! Escape sequences occupy no columns. Visible text is measured per
//! grapheme cluster with `unicode-width`, and truncation never splits a
//! cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ESC: u8 = 0x1B;

/// One piece of a line: either an escape sequence or a run of visible text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Escape(&'a str),
    Text(&'a str),
}

/// Iterate over escape sequences and visible text runs.
fn segments(line: &str) -> impl Iterator<Item = Segment<'_>> {
    let bytes = line.as_bytes();
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() {
            return None;
        }
        let start = pos;
        if bytes[pos] == ESC {
            pos = skip_escape_sequence(bytes, pos);
            Some(Segment::Escape(&line[start..pos]))
        } else {
            // ESC is ASCII, so stopping on it never splits a UTF-8 sequence.
            while pos < bytes.len() && bytes[pos] != ESC {
                pos += 1;
            }
            Some(Segment::Text(&line[start..pos]))
        }
    })
}

/// Skip an escape sequence starting at `pos` (an ESC byte).
fn skip_escape_sequence(bytes: &[u8], pos: usize) -> usize {
    let next = pos + 1;
    if next >= bytes.len() {
        return bytes.len();
    }
    match bytes[next] {
        b'[' => skip_csi(bytes, next + 1),
        b']' | b'P' | b'^' | b'_' => skip_string_terminated(bytes, next + 1),
        // Two-character sequence; never step into a multi-byte char
        b if b.is_ascii() => next + 1,
        _ => next,
    }
}

/// CSI: parameter and intermediate bytes, then a final byte in 0x40..=0x7E.
fn skip_csi(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        let b = bytes[i];
        if (0x40..=0x7E).contains(&b) {
            return i + 1;
        }
        if !(0x20..=0x7E).contains(&b) {
            return i;
        }
        i += 1;
    }
    bytes.len()
}

/// OSC/DCS/PM/APC: terminated by BEL or ST (`ESC \`).
fn skip_string_terminated(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < bytes.len() {
        match bytes[i] {
            0x07 => return i + 1,
            ESC if bytes.get(i + 1) == Some(&b'\\') => return i + 2,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Number of terminal columns a line occupies.
pub fn display_width(line: &str) -> usize {
    segments(line)
        .map(|segment| match segment {
            Segment::Escape(_) => 0,
            Segment::Text(text) => text.graphemes(true).map(UnicodeWidthStr::width).sum(),
        })
        .sum()
}

/// Cut a line down to at most `max_width` columns.
///
/// Escape sequences are all kept, so colors set or reset after the cut
/// still apply. Returns the truncated line and its display width.
pub fn truncate(line: &str, max_width: usize) -> (String, usize) {
    let mut result = String::with_capacity(line.len());
    let mut width = 0;
    let mut full = false;

    for segment in segments(line) {
        match segment {
            Segment::Escape(seq) => result.push_str(seq),
            Segment::Text(_) if full => {}
            Segment::Text(text) => {
                for grapheme in text.graphemes(true) {
                    let gw = grapheme.width();
                    if width + gw > max_width {
                        full = true;
                        break;
                    }
                    result.push_str(grapheme);
                    width += gw;
                }
            }
        }
    }

    (result, width)
}

//! Diffing Engine: turn a text frame into minimal terminal writes.
//!
//! This module implements the core anti-flicker logic:
//! 1. Skip frames identical to the last one flushed
//! 2. Keep only the lines that fit on screen (older content scrolls off)
//! 3. Skip lines unchanged since the previous frame (main screen only)
//! 4. Erase whatever the previous, taller frame left below
//!
//! [`render_frame`] is pure with respect to I/O: it appends escape
//! sequences to an [`OutputBuffer`] and updates a [`DiffState`]. The
//! [`Renderer`](super::Renderer) owns the state and the terminal writer.

use super::text;
use crate::terminal::OutputBuffer;
use std::collections::BTreeSet;

/// What the terminal currently shows, as far as the differ knows.
#[derive(Debug, Clone, Default)]
pub struct DiffState {
    /// The last frame flushed, verbatim.
    last_render: String,
    /// The lines of the last frame, after height trimming.
    last_lines: Vec<String>,
    /// Lines drawn by the last flush on the main screen.
    lines_rendered: usize,
    /// Lines drawn by the last flush on the alternate screen.
    alt_lines_rendered: usize,
    /// Whether the alternate screen is active.
    alt_screen: bool,
    /// Terminal width in columns (0 = unknown).
    width: u16,
    /// Terminal height in rows (0 = unknown).
    height: u16,
    /// Out-of-band lines to print above the frame on the next flush.
    queued_messages: Vec<String>,
    /// Line indices the application draws itself.
    ignored: BTreeSet<usize>,
}

impl DiffState {
    /// Create a state with nothing rendered and an unknown terminal size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the last frame so the next one is drawn in full.
    pub fn repaint(&mut self) {
        self.last_render.clear();
        self.last_lines.clear();
    }

    /// Whether `frame` is byte-identical to the last flushed frame.
    #[inline]
    pub fn is_unchanged(&self, frame: &str) -> bool {
        frame == self.last_render
    }

    /// Record the terminal size used for truncation and trimming.
    pub const fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Known terminal size as `(width, height)`; zero means unknown.
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Whether the alternate screen is active.
    pub const fn alt_screen(&self) -> bool {
        self.alt_screen
    }

    /// Switch between main and alternate screen bookkeeping.
    ///
    /// Entering resets the alternate-screen line count. Either way the
    /// next frame is repainted.
    pub fn set_alt_screen(&mut self, active: bool) {
        self.alt_screen = active;
        if active {
            self.alt_lines_rendered = 0;
        }
        self.repaint();
    }

    /// Lines drawn by the last flush in the current screen mode.
    pub const fn lines_rendered(&self) -> usize {
        if self.alt_screen {
            self.alt_lines_rendered
        } else {
            self.lines_rendered
        }
    }

    /// Queue a line to be printed above the frame (main screen only).
    pub fn queue_message(&mut self, line: impl Into<String>) {
        self.queued_messages.push(line.into());
    }

    /// Number of message lines waiting for the next flush.
    pub fn queued_messages(&self) -> usize {
        self.queued_messages.len()
    }

    /// Mark line indices as drawn by the application; they are never re-emitted.
    pub fn ignore_lines(&mut self, lines: impl IntoIterator<Item = usize>) {
        self.ignored.extend(lines);
    }

    /// Stop ignoring any lines.
    pub fn clear_ignored_lines(&mut self) {
        self.ignored.clear();
    }
}

/// Write one line, cut to the terminal width, clearing whatever was to its right.
fn emit_line(out: &mut OutputBuffer, line: &str, width: usize) {
    if width == 0 {
        out.write_str(line);
        out.erase_line_right();
        return;
    }

    let (line, line_width) = text::truncate(line, width);
    out.write_str(&line);
    if line_width < width {
        out.erase_line_right();
    }
}

/// Render `frame` against what `state` says is on screen.
///
/// Returns `false`, writing nothing, if the frame is empty or identical to
/// the last one flushed.
pub fn render_frame(state: &mut DiffState, frame: &str, out: &mut OutputBuffer) -> bool {
    if frame.is_empty() || state.is_unchanged(frame) {
        return false;
    }

    let width = usize::from(state.width);
    let height = usize::from(state.height);

    let mut lines: Vec<&str> = frame.split('\n').collect();
    if height > 0 && lines.len() > height {
        // Old content scrolls off the top
        lines.drain(..lines.len() - height);
    }

    // Return to the top of the previous frame.
    if state.alt_screen {
        out.cursor_home();
    } else if state.lines_rendered > 1 {
        out.cursor_up(state.lines_rendered - 1);
    }

    let flush_messages = !state.alt_screen && !state.queued_messages.is_empty();
    if flush_messages {
        for message in state.queued_messages.drain(..) {
            emit_line(out, &message, width);
            out.write_raw(b"\r\n");
        }
    }

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        // Messages push the frame down, so line-for-line reuse is off.
        let unchanged = !state.alt_screen
            && !flush_messages
            && state.last_lines.get(i).is_some_and(|prev| prev == line);

        if unchanged || state.ignored.contains(&i) {
            if i < last {
                out.write_byte(b'\n');
            }
            continue;
        }

        if i == 0 && state.last_render.is_empty() {
            out.write_byte(b'\r');
        }

        emit_line(out, line, width);

        if i < last {
            out.write_raw(b"\r\n");
        }
    }

    if state.lines_rendered() > lines.len() {
        // A skipped last line leaves the cursor on it; erase from the row below.
        out.write_raw(b"\r\n");
        out.erase_screen_below();
        out.cursor_up(1);
    }

    if state.alt_screen {
        state.alt_lines_rendered = lines.len();
        out.cursor_to(lines.len(), 0);
    } else {
        state.lines_rendered = lines.len();
        out.write_byte(b'\r');
    }

    state.last_render.clear();
    state.last_render.push_str(frame);
    state.last_lines = lines.into_iter().map(str::to_owned).collect();

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replay everything written so far on a virtual terminal.
    fn screen(bytes: &[u8], rows: u16, cols: u16) -> vt100::Parser {
        let mut parser = vt100::Parser::new(rows, cols, 0);
        parser.process(bytes);
        parser
    }

    fn row(parser: &vt100::Parser, row: u16) -> String {
        let cols = parser.screen().size().1;
        parser
            .screen()
            .rows(0, cols)
            .nth(usize::from(row))
            .unwrap_or_default()
            .trim_end()
            .to_string()
    }

    fn flush(state: &mut DiffState, frame: &str, log: &mut Vec<u8>) -> Vec<u8> {
        let mut out = OutputBuffer::new();
        render_frame(state, frame, &mut out);
        log.extend_from_slice(out.as_bytes());
        out.into_bytes()
    }

    #[test]
    fn test_empty_frame_writes_nothing() {
        let mut state = DiffState::new();
        let mut out = OutputBuffer::new();
        assert!(!render_frame(&mut state, "", &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_identical_frame_writes_once() {
        let mut state = DiffState::new();
        let mut out = OutputBuffer::new();
        assert!(render_frame(&mut state, "a\nb", &mut out));
        let written = out.len();
        assert!(!render_frame(&mut state, "a\nb", &mut out));
        assert_eq!(out.len(), written);
    }

    #[test]
    fn test_first_frame_layout() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        let mut log = Vec::new();
        let bytes = flush(&mut state, "one\ntwo", &mut log);
        assert_eq!(bytes, b"\rone\x1b[K\r\ntwo\x1b[K\r");
        assert_eq!(state.lines_rendered(), 2);
    }

    #[test]
    fn test_unchanged_lines_are_skipped() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        let mut log = Vec::new();
        flush(&mut state, "title\nold\nfooter", &mut log);
        let bytes = flush(&mut state, "title\nnew\nfooter", &mut log);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("\x1b[2A"), "moves back to the top: {text:?}");
        assert!(text.contains("new"));
        assert!(!text.contains("title"));
        assert!(!text.contains("footer"));

        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 0), "title");
        assert_eq!(row(&parser, 1), "new");
        assert_eq!(row(&parser, 2), "footer");
    }

    #[test]
    fn test_shorter_line_clears_stale_tail() {
        let mut state = DiffState::new();
        state.set_size(20, 5);
        let mut log = Vec::new();
        flush(&mut state, "a long first line", &mut log);
        flush(&mut state, "short", &mut log);
        let parser = screen(&log, 5, 20);
        assert_eq!(row(&parser, 0), "short");
    }

    #[test]
    fn test_fewer_lines_erase_below() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        let mut log = Vec::new();
        flush(&mut state, "1\n2\n3", &mut log);
        let bytes = flush(&mut state, "x", &mut log);
        assert!(bytes.windows(3).any(|w| w == b"\x1b[J"));

        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 0), "x");
        assert_eq!(row(&parser, 1), "");
        assert_eq!(row(&parser, 2), "");
        assert_eq!(state.lines_rendered(), 1);
    }

    #[test]
    fn test_fewer_lines_keep_unchanged_last_line() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        let mut log = Vec::new();
        flush(&mut state, "a\nb\nc", &mut log);
        flush(&mut state, "a\nb", &mut log);

        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 0), "a");
        assert_eq!(row(&parser, 1), "b");
        assert_eq!(row(&parser, 2), "");
        assert_eq!(state.lines_rendered(), 2);

        // The next frame starts from the same top row.
        flush(&mut state, "a\nz", &mut log);
        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 0), "a");
        assert_eq!(row(&parser, 1), "z");
    }

    #[test]
    fn test_fewer_lines_keep_ignored_last_line() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        let mut log = Vec::new();
        flush(&mut state, "a\nb\nc", &mut log);
        state.ignore_lines([1]);
        flush(&mut state, "x\ny", &mut log);

        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 0), "x");
        assert_eq!(row(&parser, 1), "b");
        assert_eq!(row(&parser, 2), "");
    }

    #[test]
    fn test_fewer_lines_on_alt_screen_keep_ignored_last_line() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        state.set_alt_screen(true);
        let mut log = Vec::new();
        flush(&mut state, "a\nb\nc", &mut log);
        state.ignore_lines([1]);
        flush(&mut state, "x\ny", &mut log);

        let parser = screen(&log, 5, 10);
        assert_eq!(row(&parser, 1), "b");
        assert_eq!(row(&parser, 2), "");
        assert_eq!(parser.screen().cursor_position(), (2, 0));
    }

    #[test]
    fn test_tall_frame_keeps_trailing_lines() {
        let mut state = DiffState::new();
        state.set_size(10, 2);
        let mut log = Vec::new();
        let bytes = flush(&mut state, "1\n2\n3\n4", &mut log);
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains('1'));
        assert!(!text.contains('2'));
        assert!(text.contains('3') && text.contains('4'));
        assert_eq!(state.lines_rendered(), 2);
    }

    #[test]
    fn test_wide_lines_are_truncated() {
        let mut state = DiffState::new();
        state.set_size(4, 3);
        let mut log = Vec::new();
        let bytes = flush(&mut state, "abcdefgh", &mut log);
        assert_eq!(bytes, b"\rabcd\r");
    }

    #[test]
    fn test_alt_screen_redraws_every_line_from_home() {
        let mut state = DiffState::new();
        state.set_size(10, 5);
        state.set_alt_screen(true);
        let mut log = Vec::new();
        flush(&mut state, "same\nold", &mut log);
        let bytes = flush(&mut state, "same\nnew", &mut log);
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("\x1b[H"));
        assert!(text.contains("same"), "no line skipping on the alt screen");
        assert!(text.ends_with("\x1b[3;1H"), "cursor parks below the frame: {text:?}");
        assert_eq!(state.lines_rendered(), 2);
    }

    #[test]
    fn test_alt_and_main_line_counts_are_separate() {
        let mut state = DiffState::new();
        let mut log = Vec::new();
        flush(&mut state, "1\n2\n3", &mut log);
        state.set_alt_screen(true);
        assert_eq!(state.lines_rendered(), 0);
        flush(&mut state, "a", &mut log);
        assert_eq!(state.lines_rendered(), 1);
        state.set_alt_screen(false);
        assert_eq!(state.lines_rendered(), 3);
    }

    #[test]
    fn test_repaint_forces_full_redraw() {
        let mut state = DiffState::new();
        let mut log = Vec::new();
        flush(&mut state, "keep\nme", &mut log);
        state.repaint();
        let bytes = flush(&mut state, "keep\nme", &mut log);
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("keep") && text.contains("me"));
    }

    #[test]
    fn test_ignored_lines_are_not_emitted() {
        let mut state = DiffState::new();
        state.ignore_lines([1]);
        let mut log = Vec::new();
        let bytes = flush(&mut state, "shown\nhidden\nshown too", &mut log);
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("hidden"));
        assert!(text.contains("shown too"));

        state.clear_ignored_lines();
        let bytes = flush(&mut state, "shown\nvisible\nshown too", &mut log);
        assert!(String::from_utf8(bytes).unwrap().contains("visible"));
    }

    #[test]
    fn test_queued_messages_print_above_frame() {
        let mut state = DiffState::new();
        state.set_size(20, 6);
        let mut log = Vec::new();
        flush(&mut state, "frame", &mut log);

        state.queue_message("log line");
        assert_eq!(state.queued_messages(), 1);
        flush(&mut state, "frame 2", &mut log);
        assert_eq!(state.queued_messages(), 0);

        let parser = screen(&log, 6, 20);
        assert_eq!(row(&parser, 0), "log line");
        assert_eq!(row(&parser, 1), "frame 2");
    }

    #[test]
    fn test_queued_messages_wait_on_alt_screen() {
        let mut state = DiffState::new();
        state.set_alt_screen(true);
        state.queue_message("later");
        let mut log = Vec::new();
        let bytes = flush(&mut state, "frame", &mut log);
        assert!(!String::from_utf8(bytes).unwrap().contains("later"));
        assert_eq!(state.queued_messages(), 1);
    }
}

//! Feed Stream Reader
//!
//! Recovers discrete messages from a byte stream that has no message
//! boundaries of its own. A read may carry half a message, several
//! messages, or pieces of both; the reader buffers whatever is incomplete
//! and hands back only whole frames.
//!
//! Framing rules:
//! - an NMEA 0183 sentence runs from `$` through the two characters after
//!   `*` and is complete as soon as those arrive
//! - every other message runs up to the next `\n` (a trailing `\r` is dropped)
//! - bytes found before a `$` on the same line form a frame of their own
//! - blank lines are ignored
//! - a frame longer than [`MAX_FRAME_LEN`] is reported as overlong and the
//!   reader skips ahead to the next frame boundary
//!
//! # Usage
//!
//! ```
//! use dredge_feed::FeedStreamReader;
//!
//! let mut reader = FeedStreamReader::new();
//! assert!(reader.process_bytes(b"Fuel Level: 97.").is_empty());
//! let frames = reader.process_bytes(b"30%, Oil Level: 45.12L\r\n");
//! assert_eq!(frames, vec!["Fuel Level: 97.30%, Oil Level: 45.12L".to_string()]);
//! ```

use tracing::{debug, warn};

/// Where the reader stands in the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Nothing buffered; the next byte starts a frame
    AwaitingFrameStart,
    /// Part of a frame is buffered
    Accumulating,
    /// Connection closed on a frame boundary
    Closed,
    /// Connection closed mid-frame; the partial frame was discarded
    ClosedTruncated,
}

impl ReaderState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReaderState::Closed | ReaderState::ClosedTruncated)
    }
}

/// Longest frame the reader will hold. Well above any message the feed
/// carries; NMEA 0183 itself caps sentences at 82 characters.
pub const MAX_FRAME_LEN: usize = 256;

/// One frame recovered from the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFrame {
    Complete(String),
    /// Frame ran past [`MAX_FRAME_LEN`]; holds its first `MAX_FRAME_LEN` bytes
    Overlong(String),
}

enum Scan {
    /// Delimiter byte between frames
    Skip,
    /// Frame text is `buf[..end]`, and `consumed` bytes leave the buffer
    Frame { end: usize, consumed: usize },
    Incomplete,
}

fn is_sentence_break(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | b'$')
}

fn scan(buf: &[u8]) -> Scan {
    match buf.first() {
        None => Scan::Incomplete,
        Some(b'\r') | Some(b'\n') => Scan::Skip,
        Some(b'$') => scan_sentence(buf),
        Some(_) => scan_line(buf),
    }
}

fn scan_sentence(buf: &[u8]) -> Scan {
    for i in 1..buf.len() {
        match buf[i] {
            b if is_sentence_break(b) => return Scan::Frame { end: i, consumed: i },
            b'*' => {
                let checksum_end = i + 3;
                // A line break or a new sentence inside the checksum cuts the frame short
                let available = &buf[i + 1..buf.len().min(checksum_end)];
                if let Some(p) = available.iter().position(|b| is_sentence_break(*b)) {
                    let end = i + 1 + p;
                    return Scan::Frame { end, consumed: end };
                }
                if buf.len() < checksum_end {
                    return Scan::Incomplete;
                }
                return Scan::Frame { end: checksum_end, consumed: checksum_end };
            }
            _ => {}
        }
    }
    Scan::Incomplete
}

fn scan_line(buf: &[u8]) -> Scan {
    match buf.iter().position(|b| matches!(b, b'\n' | b'$')) {
        Some(i) if buf[i] == b'\n' => Scan::Frame { end: i, consumed: i + 1 },
        Some(i) => Scan::Frame { end: i, consumed: i },
        None => Scan::Incomplete,
    }
}

/// Tail of an overlong frame still being skipped
#[derive(Debug, Clone, Copy)]
enum Discard {
    Line,
    /// `checksum_left` is set once the `*` has gone by
    Sentence { checksum_left: Option<u8> },
}

impl Discard {
    /// Skip state after dropping `pending`, an unfinished frame
    fn after(pending: &[u8]) -> Self {
        if pending.first() != Some(&b'$') {
            return Discard::Line;
        }
        let checksum_left = pending
            .iter()
            .rposition(|b| *b == b'*')
            .map(|i| (i + 3 - pending.len()) as u8);
        Discard::Sentence { checksum_left }
    }

    /// Drop bytes up to the end of the skipped frame. Returns how many bytes
    /// were dropped and whether the frame end was found.
    fn skip(&mut self, buf: &[u8]) -> (usize, bool) {
        match self {
            Discard::Line => match buf.iter().position(|b| matches!(b, b'\n' | b'$')) {
                Some(i) if buf[i] == b'\n' => (i + 1, true),
                Some(i) => (i, true),
                None => (buf.len(), false),
            },
            Discard::Sentence { checksum_left } => {
                for (i, b) in buf.iter().enumerate() {
                    if is_sentence_break(*b) {
                        return (i, true);
                    }
                    match checksum_left {
                        Some(left) => {
                            *left -= 1;
                            if *left == 0 {
                                return (i + 1, true);
                            }
                        }
                        None if *b == b'*' => *checksum_left = Some(2),
                        None => {}
                    }
                }
                (buf.len(), false)
            }
        }
    }
}

fn overlong(frame: &[u8]) -> RawFrame {
    let text = String::from_utf8_lossy(&frame[..MAX_FRAME_LEN]);
    RawFrame::Overlong(text.trim().to_string())
}

/// Stateful reader that turns arbitrarily chunked bytes into whole frames
pub struct FeedStreamReader {
    buffer: Vec<u8>,
    state: ReaderState,
    discard: Option<Discard>,
}

impl FeedStreamReader {
    /// Create a new reader waiting for the first frame
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            state: ReaderState::AwaitingFrameStart,
            discard: None,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Number of bytes held for a frame that is not complete yet
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }

    /// Push the bytes of one read and return the complete frames they
    /// finish, in stream order. Overlong frames are logged and dropped.
    pub fn process_bytes(&mut self, data: &[u8]) -> Vec<String> {
        self.read_frames(data)
            .into_iter()
            .filter_map(|frame| match frame {
                RawFrame::Complete(text) => Some(text),
                RawFrame::Overlong(prefix) => {
                    warn!("Dropping frame longer than {} bytes: {:?}", MAX_FRAME_LEN, prefix);
                    None
                }
            })
            .collect()
    }

    /// Push the bytes of one read and return every frame they finish,
    /// overlong ones included, in stream order.
    pub fn read_frames(&mut self, data: &[u8]) -> Vec<RawFrame> {
        if self.state.is_terminal() {
            warn!("Ignoring {} bytes received after close", data.len());
            return Vec::new();
        }
        self.buffer.extend_from_slice(data);

        let mut frames = Vec::new();
        let mut pos = 0;
        loop {
            if let Some(discard) = self.discard.as_mut() {
                let (skipped, resynced) = discard.skip(&self.buffer[pos..]);
                pos += skipped;
                if !resynced {
                    break;
                }
                self.discard = None;
            }
            let pending = &self.buffer[pos..];
            match scan(pending) {
                Scan::Skip => pos += 1,
                Scan::Frame { end, consumed } => {
                    if end > MAX_FRAME_LEN {
                        frames.push(overlong(pending));
                    } else {
                        let text = String::from_utf8_lossy(&pending[..end]);
                        let text = text.trim();
                        if !text.is_empty() {
                            frames.push(RawFrame::Complete(text.to_string()));
                        }
                    }
                    pos += consumed;
                }
                Scan::Incomplete => {
                    if pending.len() > MAX_FRAME_LEN {
                        frames.push(overlong(pending));
                        self.discard = Some(Discard::after(pending));
                        pos = self.buffer.len();
                    }
                    break;
                }
            }
        }
        self.buffer.drain(..pos);

        self.state = if self.buffer.is_empty() && self.discard.is_none() {
            ReaderState::AwaitingFrameStart
        } else {
            ReaderState::Accumulating
        };
        frames
    }

    /// The peer closed the connection. Whatever is still buffered is an
    /// unfinished frame and is dropped.
    pub fn close(&mut self) -> ReaderState {
        if self.state.is_terminal() {
            return self.state;
        }
        let pending = self.buffer.iter().any(|b| !b.is_ascii_whitespace());
        self.state = if pending || self.discard.is_some() {
            debug!(
                "Discarding {} bytes of an unfinished frame: {:?}",
                self.buffer.len(),
                String::from_utf8_lossy(&self.buffer)
            );
            ReaderState::ClosedTruncated
        } else {
            ReaderState::Closed
        };
        self.buffer.clear();
        self.discard = None;
        self.state
    }
}

impl Default for FeedStreamReader {
    fn default() -> Self {
        Self::new()
    }
}

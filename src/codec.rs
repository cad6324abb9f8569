//! Newline-delimited framing for the inbound JSON-lines stream.
//!
//! Unlike `LinesCodec`, a bad line never ends the stream: lines that are not
//! UTF-8 or exceed the length limit are reported as frames of their own and
//! reading continues with the next line.

use bytes::BytesMut;
use std::io;
use tokio_util::codec::Decoder;

/// Default maximum line length in bytes, newline excluded.
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// One newline-terminated frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundLine {
    /// A complete UTF-8 line, without its `\n` or `\r\n`.
    Line(String),
    /// The line was not valid UTF-8 and was dropped.
    NotUtf8,
    /// The line exceeded the limit and was dropped.
    TooLong,
}

/// Line decoder that skips bad lines instead of failing.
#[derive(Debug)]
pub struct InboundLineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Inside an over-long line; drop bytes up to the next newline.
    discarding: bool,
}

impl InboundLineCodec {
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    fn frame(&mut self, raw: &[u8]) -> InboundLine {
        if std::mem::take(&mut self.discarding) || raw.len() > self.max_len {
            return InboundLine::TooLong;
        }
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        match std::str::from_utf8(raw) {
            Ok(line) => InboundLine::Line(line.to_string()),
            Err(_) => InboundLine::NotUtf8,
        }
    }
}

impl Default for InboundLineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for InboundLineCodec {
    type Item = InboundLine;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<InboundLine>, io::Error> {
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;
            return Ok(Some(self.frame(&line[..line.len() - 1])));
        }

        if src.len() > self.max_len {
            // Keep memory bounded: forget the partial line and skip ahead.
            src.clear();
            self.next_index = 0;
            self.discarding = true;
        } else {
            self.next_index = src.len();
        }
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<InboundLine>, io::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(std::mem::take(&mut self.discarding).then_some(InboundLine::TooLong));
        }

        // Final line without a trailing newline.
        let line = src.split_to(src.len());
        self.next_index = 0;
        Ok(Some(self.frame(&line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_lines_and_strips_crlf() {
        let mut codec = InboundLineCodec::new();
        let mut buf = BytesMut::from("first\r\nsecond\n");

        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Line("first".to_string()))
        );
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Line("second".to_string()))
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn partial_line_waits_for_newline() {
        let mut codec = InboundLineCodec::new();
        let mut buf = BytesMut::from("{\"platform\":");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"\"qq\"}\n");
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Line("{\"platform\":\"qq\"}".to_string()))
        );
    }

    #[test]
    fn invalid_utf8_line_does_not_stop_decoding() {
        let mut codec = InboundLineCodec::new();
        let mut buf = BytesMut::from(&b"\xff\xfe\nok\n"[..]);

        assert_eq!(codec.decode(&mut buf).unwrap(), Some(InboundLine::NotUtf8));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Line("ok".to_string()))
        );
    }

    #[test]
    fn over_long_line_is_skipped_with_bounded_buffer() {
        let mut codec = InboundLineCodec::with_max_len(8);
        let mut buf = BytesMut::from("0123456789abcdef");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);
        assert!(buf.is_empty());

        buf.extend_from_slice(b"tail\nok\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some(InboundLine::TooLong));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some(InboundLine::Line("ok".to_string()))
        );
    }

    #[test]
    fn last_line_without_newline_is_returned_at_eof() {
        let mut codec = InboundLineCodec::new();
        let mut buf = BytesMut::from("last");

        assert_eq!(
            codec.decode_eof(&mut buf).unwrap(),
            Some(InboundLine::Line("last".to_string()))
        );
        assert_eq!(codec.decode_eof(&mut buf).unwrap(), None);
    }
}

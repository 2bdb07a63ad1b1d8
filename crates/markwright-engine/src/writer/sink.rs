use std::fmt;
use std::io;

use encoding_rs::{CoderResult, Encoder, Encoding, UTF_8};

use crate::error::Result;

/// Destination of rendered Markdown.
///
/// The writer only appends; it keeps its own count of what has been
/// written, so a sink never has to be read back.
pub trait Sink {
    fn write_str(&mut self, s: &str) -> Result<()>;

    fn write_char(&mut self, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        self.write_str(ch.encode_utf8(&mut buf))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Sink for String {
    fn write_str(&mut self, s: &str) -> Result<()> {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        self.push(ch);
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn write_str(&mut self, s: &str) -> Result<()> {
        (**self).write_str(s)
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        (**self).write_char(ch)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Adapts any [`fmt::Write`] (e.g. a `Formatter`).
pub struct FmtSink<W>(pub W);

impl<W: fmt::Write> Sink for FmtSink<W> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        Ok(self.0.write_str(s)?)
    }

    fn write_char(&mut self, ch: char) -> Result<()> {
        Ok(self.0.write_char(ch)?)
    }
}

/// Writes UTF-8 bytes to an [`io::Write`].
pub struct IoSink<W>(pub W);

impl<W: io::Write> Sink for IoSink<W> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        Ok(self.0.write_all(s.as_bytes())?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.0.flush()?)
    }
}

/// Writes to an [`io::Write`] in an arbitrary text encoding.
///
/// Characters the target encoding cannot represent are emitted as numeric
/// character references by `encoding_rs`.
pub struct EncodedSink<W> {
    inner: W,
    encoder: Encoder,
    buf: Vec<u8>,
}

impl<W: io::Write> EncodedSink<W> {
    pub fn new(inner: W, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoder: encoding.new_encoder(),
            buf: vec![0; 1024],
        }
    }

    pub fn utf8(inner: W) -> Self {
        Self::new(inner, UTF_8)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> Sink for EncodedSink<W> {
    fn write_str(&mut self, s: &str) -> Result<()> {
        let mut rest = s;
        loop {
            let (result, read, written, _) =
                self.encoder
                    .encode_from_utf8(rest, &mut self.buf, false);
            self.inner.write_all(&self.buf[..written])?;
            rest = &rest[read..];
            match result {
                CoderResult::InputEmpty => return Ok(()),
                CoderResult::OutputFull => continue,
            }
        }
    }

    fn flush(&mut self) -> Result<()> {
        let (_, _, written, _) = self.encoder.encode_from_utf8("", &mut self.buf, true);
        self.inner.write_all(&self.buf[..written])?;
        Ok(self.inner.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_appends() {
        let mut out = String::new();
        out.write_str("ab").unwrap();
        Sink::write_char(&mut out, 'c').unwrap();
        assert_eq!(out, "abc");
    }

    #[test]
    fn encoded_sink_windows_1252() {
        let mut sink = EncodedSink::new(Vec::new(), encoding_rs::WINDOWS_1252);
        sink.write_str("café").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner(), b"caf\xe9");
    }

    #[test]
    fn encoded_sink_large_input() {
        let text = "x".repeat(5000);
        let mut sink = EncodedSink::utf8(Vec::new());
        sink.write_str(&text).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.into_inner().len(), 5000);
    }
}

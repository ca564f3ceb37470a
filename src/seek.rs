// Forward-only seek adapter (§4.7): turns a non-seekable byte source into
// a forward-seekable view good enough for patch, which only ever issues
// Read operations in non-decreasing `from` order.

use std::io::{self, Read};

/// Wraps a `Read` and tracks how many bytes have been consumed from it,
/// allowing `seek_forward` to skip ahead by discarding bytes.
///
/// Seeking backward is not supported and is silently treated as a no-op:
/// the delta format never asks for it, so there is nothing to implement.
pub struct ForwardSeeker<R> {
    inner: R,
    cursor: u64,
}

impl<R: Read> ForwardSeeker<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, cursor: 0 }
    }

    /// Advance the cursor to `offset` by discarding bytes if necessary.
    /// A no-op if `offset <= cursor`. Returns the cursor position after
    /// the operation (which may be short of `offset` at end-of-stream).
    pub fn seek_forward(&mut self, offset: u64) -> io::Result<u64> {
        if offset <= self.cursor {
            return Ok(self.cursor);
        }

        let mut remaining = offset - self.cursor;
        let mut scratch = [0u8; 64 * 1024];
        while remaining > 0 {
            let chunk = remaining.min(scratch.len() as u64) as usize;
            let n = self.inner.read(&mut scratch[..chunk])?;
            if n == 0 {
                break;
            }
            self.cursor += n as u64;
            remaining -= n as u64;
        }
        Ok(self.cursor)
    }
}

impl<R: Read> Read for ForwardSeeker<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.cursor += n as u64;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn seek_forward_discards_bytes() {
        let mut seeker = ForwardSeeker::new(Cursor::new(b"0123456789".to_vec()));
        seeker.seek_forward(3).unwrap();
        let mut buf = [0u8; 4];
        seeker.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"3456");
    }

    #[test]
    fn seek_backward_is_noop() {
        let mut seeker = ForwardSeeker::new(Cursor::new(b"0123456789".to_vec()));
        seeker.seek_forward(5).unwrap();
        let back = seeker.seek_forward(2).unwrap();
        assert_eq!(back, 5);
        let mut buf = [0u8; 1];
        seeker.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"5");
    }

    #[test]
    fn seek_to_current_position_is_noop() {
        let mut seeker = ForwardSeeker::new(Cursor::new(b"abc".to_vec()));
        assert_eq!(seeker.seek_forward(0).unwrap(), 0);
    }

    #[test]
    fn seek_past_end_stops_at_eof() {
        let mut seeker = ForwardSeeker::new(Cursor::new(b"abc".to_vec()));
        let pos = seeker.seek_forward(100).unwrap();
        assert_eq!(pos, 3);
    }
}

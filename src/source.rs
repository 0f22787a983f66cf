use std::{
    io::{self, Chain, Cursor, ErrorKind, Read},
    ops::Range,
};

pub const CAPACITY: usize = 1 << 14;

/// A byte source over any reader, with a fixed-size refill buffer and
/// room for exactly one pushed-back byte.
#[derive(Debug, Clone)]
pub(crate) struct Source<R> {
    reader: R,
    buffer: Box<[u8]>,
    /// The start of the valid data.
    ///
    /// Never greater than `self.end`.
    start: usize,
    /// The end of the valid data + 1 (not a valid index).
    ///
    /// Never greater than [`CAPACITY`].
    end: usize,
    /// A byte that was read and then given back. Always delivered before
    /// any buffered data.
    pushback: Option<u8>,
}

impl<R: Read> Source<R> {
    pub fn new(reader: R) -> Source<R> {
        Source {
            reader,
            buffer: vec![0; CAPACITY].into_boxed_slice(),
            start: 0,
            end: 0,
            pushback: None,
        }
    }

    #[inline]
    fn data_range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Refills the buffer if it is empty. Returns `false` at the end of
    /// input.
    fn fill(&mut self) -> io::Result<bool> {
        if self.start < self.end {
            return Ok(true);
        }

        self.start = 0;
        self.end = 0;

        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(len) => {
                    self.end = len;
                    return Ok(len > 0);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            }
        }
    }

    /// Ensures that `n` bytes are buffered, unless the input ends first,
    /// and returns the buffered data. Ignores the pushback slot.
    fn ensure_bytes(&mut self, n: usize) -> io::Result<&[u8]> {
        debug_assert!(n <= CAPACITY);

        if self.end + n > CAPACITY {
            let data_range = self.data_range();
            self.start = 0;
            self.end = data_range.len();
            self.buffer.copy_within(data_range, 0);
        }

        while self.end - self.start < n {
            let len = match self.reader.read(&mut self.buffer[self.end..]) {
                Ok(len) => len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err),
            };

            // EOF
            if len == 0 {
                break;
            }

            self.end += len;
        }

        Ok(&self.buffer[self.data_range()])
    }

    /// Skips a UTF-8 byte order mark if the input starts with one.
    pub fn skip_bom(&mut self) -> io::Result<()> {
        if self.pushback.is_none() && self.ensure_bytes(3)?.starts_with(b"\xef\xbb\xbf") {
            self.start += 3;
        }
        Ok(())
    }

    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }

        if !self.fill()? {
            return Ok(None);
        }

        let byte = self.buffer[self.start];
        self.start += 1;
        Ok(Some(byte))
    }

    /// Gives back a byte, so that it is returned by the next read.
    ///
    /// At most one byte can be pending at any time.
    pub fn unread(&mut self, byte: u8) {
        debug_assert!(self.pushback.is_none(), "pushback slot already taken");
        self.pushback = Some(byte);
    }

    /// Consumes whitespace and returns the next byte without consuming it.
    pub fn skip_whitespace(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.next_byte()? {
                Some(byte) if is_space(byte) => continue,
                Some(byte) => {
                    self.unread(byte);
                    return Ok(Some(byte));
                }
                None => return Ok(None),
            }
        }
    }

    /// Appends bytes to `out` up to the first `needle`, which is consumed
    /// but not appended. Returns `false` if the input ended first.
    pub fn read_until(&mut self, needle: u8, out: &mut Vec<u8>) -> io::Result<bool> {
        if let Some(byte) = self.pushback.take() {
            if byte == needle {
                return Ok(true);
            }
            out.push(byte);
        }

        while self.fill()? {
            let data = &self.buffer[self.start..self.end];
            match memchr::memchr(needle, data) {
                Some(pos) => {
                    out.extend_from_slice(&data[..pos]);
                    self.start += pos + 1;
                    return Ok(true);
                }
                None => {
                    out.extend_from_slice(data);
                    self.start = self.end;
                }
            }
        }

        Ok(false)
    }

    /// Like [`Source::read_until`], but stops at either of two needles and
    /// returns the one that was found.
    pub fn read_until2(&mut self, a: u8, b: u8, out: &mut Vec<u8>) -> io::Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            if byte == a || byte == b {
                return Ok(Some(byte));
            }
            out.push(byte);
        }

        while self.fill()? {
            let data = &self.buffer[self.start..self.end];
            match memchr::memchr2(a, b, data) {
                Some(pos) => {
                    let found = data[pos];
                    out.extend_from_slice(&data[..pos]);
                    self.start += pos + 1;
                    return Ok(Some(found));
                }
                None => {
                    out.extend_from_slice(data);
                    self.start = self.end;
                }
            }
        }

        Ok(None)
    }

    /// Discards raw bytes up to (not including) the next `needle`. Returns
    /// `false` if the input ended first.
    pub fn skip_until(&mut self, needle: u8) -> io::Result<bool> {
        if let Some(byte) = self.pushback.take() {
            if byte == needle {
                self.unread(byte);
                return Ok(true);
            }
        }

        while self.fill()? {
            match memchr::memchr(needle, &self.buffer[self.data_range()]) {
                Some(pos) => {
                    self.start += pos;
                    return Ok(true);
                }
                None => self.start = self.end,
            }
        }

        Ok(false)
    }

    /// Gets the pending byte, the remaining buffered bytes and the
    /// underlying reader.
    pub fn into_inner(self) -> Chain<Cursor<Vec<u8>>, R> {
        let mut rest = Vec::with_capacity(self.end - self.start + 1);
        rest.extend(self.pushback);
        rest.extend_from_slice(&self.buffer[self.start..self.end]);
        Cursor::new(rest).chain(self.reader)
    }
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0b' | b'\x0c')
}

use std::mem;

#[inline]
pub(crate) const fn is_space(b: u8) -> bool {
    // ASCII whitespace plus vertical tab, which u8::is_ascii_whitespace excludes.
    b.is_ascii_whitespace() || b == 0x0B
}

pub(crate) fn bytecount_naive(needle: u8, s: &[u8]) -> usize {
    s.iter().filter(|&&b| b == needle).count()
}

pub(crate) fn memrchr_naive(needle: u8, s: &[u8]) -> Option<usize> {
    s.iter().rposition(|&b| b == needle)
}

/// Splits text at `\n`, yielding each line together with its 1-based line number.
pub(crate) struct Lines<'a> {
    text: &'a str,
    iter: memchr::Memchr<'a>,
    next_start: usize,
    line: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            iter: memchr::memchr_iter(b'\n', text.as_bytes()),
            next_start: 0,
            line: 0,
        }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let line_end = match self.iter.next() {
            Some(line_end) => line_end,
            None => {
                if self.next_start >= self.text.len() {
                    return None;
                }
                self.text.len()
            }
        };
        let start = mem::replace(&mut self.next_start, line_end + 1);
        self.line += 1;
        // `\n` is a single-byte character, so both ends are char boundaries.
        Some((self.line, &self.text[start..line_end]))
    }
}

/// Whitespace-separated tokens, each with its byte offset in the input.
pub(crate) struct Tokens<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.bytes.get(self.pos..)?;
        let skip = rest.iter().position(|&b| !is_space(b))?;
        let start = self.pos + skip;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| is_space(b))
            .unwrap_or(self.bytes.len() - start);
        self.pos = start + len;
        Some((start, &self.bytes[start..start + len]))
    }
}

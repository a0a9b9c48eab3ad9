//! Scalar stream over a pattern source with single-token lookahead and
//! arbitrary rewind.
//!
//! In unicode mode the stream yields Unicode code points; in legacy mode it
//! yields UTF-16 code units, so an astral character occupies two positions
//! and a lone surrogate is a valid element. All indices reported by the
//! validator are offsets into this scalar sequence.

#[derive(Debug, Default)]
pub struct Reader {
    scalars: Vec<u32>,
    index: usize,
    curr: Option<u32>,
    next: Option<u32>,
}

impl Reader {
    pub fn new() -> Self {
        Reader::default()
    }

    pub fn reset(&mut self, source: &str, unicode_mode: bool) {
        self.scalars = if unicode_mode {
            source.chars().map(u32::from).collect()
        } else {
            source.encode_utf16().map(u32::from).collect()
        };
        self.rewind(0);
    }

    pub fn scalars(&self) -> &[u32] {
        &self.scalars
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn curr(&self) -> Option<u32> {
        self.curr
    }

    pub fn next(&self) -> Option<u32> {
        self.next
    }

    pub fn at(&self, i: usize) -> Option<u32> {
        self.scalars.get(i).copied()
    }

    pub fn rewind(&mut self, i: usize) {
        self.index = i;
        self.curr = self.at(i);
        self.next = self.at(i + 1);
    }

    pub fn advance(&mut self) {
        if self.curr.is_some() {
            self.index += 1;
            self.curr = self.next;
            self.next = self.at(self.index + 1);
        }
    }

    /// Consumes `cp` if it is the current scalar. Never moves on failure.
    pub fn eat(&mut self, cp: u32) -> bool {
        if self.curr == Some(cp) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the two-scalar sequence `a b`, or nothing.
    pub fn eat2(&mut self, a: u32, b: u32) -> bool {
        if self.curr == Some(a) && self.next == Some(b) {
            self.advance();
            self.advance();
            true
        } else {
            false
        }
    }
}

/// Rebuilds text from a scalar slice, re-pairing UTF-16 surrogate halves
/// from legacy mode. Unpairable halves become U+FFFD.
pub fn scalars_to_string(scalars: &[u32]) -> String {
    let mut out = String::with_capacity(scalars.len());
    let mut i = 0;
    while i < scalars.len() {
        let v = scalars[i];
        if (0xd800..=0xdbff).contains(&v)
            && let Some(t) = scalars.get(i + 1).copied()
            && (0xdc00..=0xdfff).contains(&t)
        {
            let cp = 0x10000 + ((v - 0xd800) << 10) + (t - 0xdc00);
            out.push(char::from_u32(cp).unwrap_or('\u{fffd}'));
            i += 2;
            continue;
        }
        out.push(char::from_u32(v).unwrap_or('\u{fffd}'));
        i += 1;
    }
    out
}

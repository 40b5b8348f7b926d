//! Compact link format
//!
//! The structural form is Huffman coded with a fixed canonical code book
//! before keystream mixing. The code book is derived from a hard-coded
//! weight table, so it never has to travel with the link. Changing the
//! weights requires a new version character.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::LazyLock;

use crate::error::CodecError;

pub(super) const VERSION: char = '1';

const SYMBOL_COUNT: usize = 257;
const END: usize = 256;
const MAX_CODE_LEN: usize = 32;

static CODE_BOOK: LazyLock<CodeBook> = LazyLock::new(|| {
    let weights: Vec<u64> = (0..SYMBOL_COUNT).map(weight).collect();
    CodeBook::from_lengths(&code_lengths(&weights))
});

/// Expected frequency of each byte in a structural form
fn weight(symbol: usize) -> u64 {
    let Ok(byte) = u8::try_from(symbol) else {
        return 1;
    };
    match byte {
        b'0'..=b'9' => 48,
        b'=' | b'&' => 40,
        b'c' | b't' | b'z' => 24,
        b'p' | b'e' | b'i' | b'd' | b's' | b'm' | b'b' | b'r' | b'v' | b'k' | b'n' | b'x'
        | b'-' => 12,
        b'a' | b'f' | b'o' | b'g' | b'l' => 8,
        b'%' | b'+' | b'C' => 6,
        b'a'..=b'z' => 4,
        b'A'..=b'Z' | b'.' | b'_' | b'*' => 2,
        _ => 1,
    }
}

/// Huffman code length per symbol. Ties break on node index, which keeps
/// the result identical across runs and platforms.
fn code_lengths(weights: &[u64]) -> Vec<u8> {
    let mut parent = vec![usize::MAX; weights.len()];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| Reverse((w, i)))
        .collect();

    while heap.len() > 1 {
        let (Some(Reverse((wa, a))), Some(Reverse((wb, b)))) = (heap.pop(), heap.pop()) else {
            break;
        };
        let node = parent.len();
        parent.push(usize::MAX);
        parent[a] = node;
        parent[b] = node;
        heap.push(Reverse((wa + wb, node)));
    }

    (0..weights.len())
        .map(|mut i| {
            let mut depth = 0u8;
            while parent[i] != usize::MAX {
                i = parent[i];
                depth += 1;
            }
            depth
        })
        .collect()
}

struct CodeBook {
    /// (code, length) indexed by symbol
    codes: Vec<(u32, u8)>,
    /// Symbols sorted by (length, symbol)
    ordered: Vec<u16>,
    counts: [u32; MAX_CODE_LEN + 1],
    first_code: [u32; MAX_CODE_LEN + 1],
    first_index: [usize; MAX_CODE_LEN + 1],
}

impl CodeBook {
    fn from_lengths(lengths: &[u8]) -> Self {
        let mut ordered: Vec<u16> = (0..lengths.len() as u16).collect();
        ordered.sort_by_key(|&s| (lengths[usize::from(s)], s));

        let mut book = CodeBook {
            codes: vec![(0, 0); lengths.len()],
            ordered,
            counts: [0; MAX_CODE_LEN + 1],
            first_code: [0; MAX_CODE_LEN + 1],
            first_index: [0; MAX_CODE_LEN + 1],
        };

        let mut code = 0u32;
        let mut prev_len = 0u8;
        for (index, &symbol) in book.ordered.iter().enumerate() {
            let len = lengths[usize::from(symbol)];
            if len != prev_len {
                code <<= len - prev_len;
                book.first_code[usize::from(len)] = code;
                book.first_index[usize::from(len)] = index;
                prev_len = len;
            }
            book.codes[usize::from(symbol)] = (code, len);
            book.counts[usize::from(len)] += 1;
            code += 1;
        }
        book
    }

    fn lookup(&self, code: u32, len: usize) -> Option<usize> {
        let count = self.counts[len];
        let offset = code.checked_sub(self.first_code[len])?;
        (count > 0 && offset < count)
            .then(|| usize::from(self.ordered[self.first_index[len] + offset as usize]))
    }
}

#[derive(Default)]
struct BitWriter {
    bytes: Vec<u8>,
    current: u8,
    filled: u8,
}

impl BitWriter {
    fn write(&mut self, code: u32, len: u8) {
        for shift in (0..len).rev() {
            self.current = (self.current << 1) | ((code >> shift) & 1) as u8;
            self.filled += 1;
            if self.filled == 8 {
                self.bytes.push(self.current);
                self.current = 0;
                self.filled = 0;
            }
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if self.filled > 0 {
            self.bytes.push(self.current << (8 - self.filled));
        }
        self.bytes
    }
}

pub(super) fn pack(text: &[u8]) -> Vec<u8> {
    let book = &*CODE_BOOK;
    let mut writer = BitWriter::default();
    for &byte in text {
        let (code, len) = book.codes[usize::from(byte)];
        writer.write(code, len);
    }
    let (code, len) = book.codes[END];
    writer.write(code, len);
    writer.finish()
}

pub(super) fn unpack(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let book = &*CODE_BOOK;
    let mut out = Vec::with_capacity(bytes.len() * 2);
    let mut code = 0u32;
    let mut len = 0usize;

    for byte in bytes {
        for shift in (0..8).rev() {
            code = (code << 1) | u32::from((byte >> shift) & 1);
            len += 1;
            if len > MAX_CODE_LEN {
                return Err(CodecError::Truncated);
            }
            if let Some(symbol) = book.lookup(code, len) {
                if symbol == END {
                    return Ok(out);
                }
                out.push(symbol as u8);
                code = 0;
                len = 0;
            }
        }
    }
    Err(CodecError::Truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_book_is_complete_prefix_code() {
        let book = &*CODE_BOOK;
        let kraft: u64 = book
            .codes
            .iter()
            .map(|&(_, len)| {
                assert!(len >= 1 && usize::from(len) <= MAX_CODE_LEN);
                1u64 << (MAX_CODE_LEN - usize::from(len))
            })
            .sum();
        assert_eq!(kraft, 1u64 << MAX_CODE_LEN);
    }

    #[test]
    fn code_book_is_deterministic() {
        let weights: Vec<u64> = (0..SYMBOL_COUNT).map(weight).collect();
        assert_eq!(code_lengths(&weights), code_lengths(&weights));
        let again = CodeBook::from_lengths(&code_lengths(&weights));
        assert_eq!(again.codes, CODE_BOOK.codes);
    }

    #[test]
    fn frequent_bytes_get_short_codes() {
        let book = &*CODE_BOOK;
        let len = |b: u8| book.codes[usize::from(b)].1;
        assert!(len(b'0') < len(b'Q'));
        assert!(len(b'=') < len(0x7f));
        assert!(book.codes[END].1 >= len(b'c'));
    }

    #[test]
    fn round_trip_and_shrinks_typical_input() {
        let text = b"c=500&t=i&i=512x512&z=3fa1";
        let packed = pack(text);
        assert!(packed.len() < text.len());
        assert_eq!(unpack(&packed).unwrap(), text);
    }

    #[test]
    fn round_trip_all_bytes() {
        let text: Vec<u8> = (0u8..=255).collect();
        assert_eq!(unpack(&pack(&text)).unwrap(), text);
        assert_eq!(unpack(&pack(b"")).unwrap(), b"");
    }

    #[test]
    fn truncated_stream_is_rejected() {
        let packed = pack(b"c=1&t=p&z=abcd");
        assert_eq!(
            unpack(&packed[..packed.len() - 1]),
            Err(CodecError::Truncated)
        );
        assert_eq!(unpack(&[]), Err(CodecError::Truncated));
    }
}

//! Decompression of a sub-blocked LZW code stream.

use std::io::Read;

use crate::error::{Error, Result};
use crate::lzw::{Code, MAX_ENTRIES};
use crate::traits::ReadBytesExt;

/// LZW decoder over a sub-blocked code stream.
///
/// The dictionary is kept between calls so a single decoder can serve every
/// image of a stream without reallocating.
pub struct Decoder {
    /// Code preceding each entry in its expansion chain. Literal entries
    /// point at the end code, which terminates the chain walk uniformly.
    prefix: Vec<Code>,
    /// Byte each entry appends to the expansion of its prefix.
    suffix: Vec<u8>,
    /// Expansion length of each entry's prefix; zero for literals.
    prefix_len: Vec<u16>,
}

impl Decoder {
    /// Creates a decoder with an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Decoder {
            prefix: vec![0; MAX_ENTRIES],
            suffix: vec![0; MAX_ENTRIES],
            prefix_len: vec![0; MAX_ENTRIES],
        }
    }

    /// Decodes one complete image data stream from `r` into `out`.
    ///
    /// Consumes the code sub-blocks up to and including the zero-length
    /// terminator and requires the expansion to fill `out` exactly. Any
    /// deviation — an out-of-range code, data past the end code, nonzero
    /// padding bits, too much or too little output — is `Malformed`;
    /// running out of input is `Truncated`.
    pub fn decode<R: Read>(&mut self, r: &mut R, min_code_size: u8, out: &mut [u8]) -> Result<()> {
        if !(2..=8).contains(&min_code_size) {
            return Err(Error::Malformed("minimum code size out of range"));
        }
        let clear_code: Code = 1 << min_code_size;
        let end_code: Code = clear_code + 1;

        for code in 0..usize::from(clear_code) {
            self.prefix[code] = end_code;
            self.suffix[code] = code as u8;
            self.prefix_len[code] = 0;
        }

        let mut code_size = min_code_size + 1;
        // The next slot to fill. The first allocation lands on the end
        // code's slot and is never looked up; real entries start above it.
        let mut free_code = end_code;
        let mut prev_code = end_code;
        let mut prev_len: u16 = 0;

        let mut block = [0u8; 255];
        let mut block_len = 0usize;
        let mut block_pos = 0usize;
        let mut bit_buf: u32 = 0;
        let mut bits: u8 = 0;

        let mut filled = 0usize;

        loop {
            while bits < code_size {
                if block_pos == block_len {
                    block_len = usize::from(r.read_u8().map_err(Error::from_read)?);
                    if block_len == 0 {
                        return Err(Error::Malformed("code stream truncated"));
                    }
                    r.read_exact(&mut block[..block_len])
                        .map_err(Error::from_read)?;
                    block_pos = 0;
                }
                bit_buf |= u32::from(block[block_pos]) << bits;
                block_pos += 1;
                bits += 8;
            }
            let code = (bit_buf & ((1u32 << code_size) - 1)) as Code;
            bit_buf >>= code_size;
            bits -= code_size;

            if code == end_code {
                // Nothing may follow the end code: the padding bits must be
                // zero, the sub-block exhausted, and the terminator next.
                debug_assert!(bits < 8);
                if bit_buf != 0 {
                    return Err(Error::Malformed("nonzero padding after end code"));
                }
                if block_pos != block_len {
                    return Err(Error::Malformed("data after end code"));
                }
                if r.read_u8().map_err(Error::from_read)? != 0 {
                    return Err(Error::Malformed("missing block terminator"));
                }
                if filled != out.len() {
                    return Err(Error::Malformed("too little image data"));
                }
                return Ok(());
            }
            if code == clear_code {
                free_code = end_code;
                prev_code = end_code;
                prev_len = 0;
                code_size = min_code_size + 1;
                continue;
            }
            if code > free_code {
                return Err(Error::Malformed("invalid LZW code"));
            }

            // A code equal to the next free slot expands to the previous
            // expansion followed by its own first byte.
            let fresh = code == free_code;
            let expand_len = if fresh {
                usize::from(prev_len) + 1
            } else {
                usize::from(self.prefix_len[usize::from(code)]) + 1
            };
            if filled + expand_len > out.len() {
                return Err(Error::Malformed("too much image data"));
            }

            // Walk the chain back-to-front; the pre-seeded literals point at
            // the end code, so the walk needs no length bookkeeping.
            let walk = if fresh { prev_code } else { code };
            let mut pos = filled + expand_len - usize::from(fresh);
            let mut c = walk;
            while c != end_code {
                pos -= 1;
                out[pos] = self.suffix[usize::from(c)];
                c = self.prefix[usize::from(c)];
            }
            debug_assert_eq!(pos, filled);
            let first = out[filled];
            if fresh {
                out[filled + expand_len - 1] = first;
            }

            if free_code < MAX_ENTRIES as Code {
                self.prefix[usize::from(free_code)] = prev_code;
                self.suffix[usize::from(free_code)] = first;
                self.prefix_len[usize::from(free_code)] = prev_len;
                free_code += 1;
                if free_code >= (1 << code_size) && free_code < MAX_ENTRIES as Code {
                    code_size += 1;
                }
            }
            prev_code = code;
            prev_len = expand_len as u16;
            filled += expand_len;
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new()
    }
}

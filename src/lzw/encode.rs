//! Compression of an index buffer into a sub-blocked LZW code stream.

use std::io::Write;

use crate::error::{Error, Result};
use crate::lzw::{Code, MAX_ENTRIES};
use crate::traits::WriteBytesExt;

/// LZW encoder producing a sub-blocked code stream.
///
/// The successor dictionary is kept between calls so a single encoder can
/// serve every image of a stream.
pub struct Encoder {
    /// Dense successor table: `succ[code << n | byte]` is the code for the
    /// string `code` extended by `byte`, or zero if none was assigned yet.
    /// Zero never names a real successor because successors start above the
    /// end code.
    succ: Vec<Code>,
}

impl Encoder {
    /// Creates an encoder with an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Encoder { succ: Vec::new() }
    }

    /// The smallest code size able to express every index in `data`.
    ///
    /// This is what [`Writer::write_image_data`](crate::Writer::write_image_data)
    /// uses when the caller does not pick a code size; an all-zero buffer
    /// still gets the format's minimum of two.
    #[must_use]
    pub fn min_code_size_for(data: &[u8]) -> u8 {
        let max = data.iter().copied().max().unwrap_or(0);
        let bits = (8 - max.leading_zeros()) as u8;
        bits.max(2)
    }

    /// Encodes `data` as one complete image data stream into `w`,
    /// including the trailing zero-length sub-block.
    ///
    /// Input bytes are truncated into the `1 << min_code_size` alphabet.
    pub fn encode<W: Write>(&mut self, w: &mut W, min_code_size: u8, data: &[u8]) -> Result<()> {
        if !(2..=8).contains(&min_code_size) {
            return Err(Error::InvalidArgument("minimum code size out of range"));
        }
        let n = min_code_size;
        let clear_code: Code = 1 << n;
        let end_code: Code = clear_code + 1;
        let mask = (clear_code - 1) as u8;

        self.succ.clear();
        self.succ.resize(MAX_ENTRIES << n, 0);

        let mut code_size = n + 1;
        let mut free_code = end_code + 1;
        let mut out = BlockWriter::new(w);

        out.write_code(clear_code, code_size)?;

        if let Some((&head, tail)) = data.split_first() {
            let mut code = Code::from(head & mask);
            for &next in tail {
                let byte = next & mask;
                let slot = usize::from(code) << n | usize::from(byte);
                let succ = self.succ[slot];
                if succ != 0 {
                    code = succ;
                    continue;
                }
                // Longest match found; `byte` opens the next one.
                if usize::from(free_code) == MAX_ENTRIES {
                    if code > end_code {
                        // Full dictionary, and the match names a real entry:
                        // defer the clear and spend one more emission at the
                        // full code width.
                        out.write_code(code, code_size)?;
                    } else {
                        out.write_code(clear_code, code_size)?;
                        self.succ.fill(0);
                        free_code = end_code + 1;
                        code_size = n + 1;
                        // A single literal stays valid across the reset.
                        self.succ[slot] = free_code;
                        out.write_code(code, code_size)?;
                        code_size += u8::from(free_code >> code_size != 0);
                        free_code += 1;
                    }
                } else {
                    self.succ[slot] = free_code;
                    out.write_code(code, code_size)?;
                    // Widen once the slot count crosses the current width,
                    // after the emission the decoder pairs with that slot.
                    code_size += u8::from(free_code >> code_size != 0);
                    free_code += 1;
                }
                code = Code::from(byte);
            }
            out.write_code(code, code_size)?;
        }
        out.write_code(end_code, code_size)?;
        out.finish()
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::new()
    }
}

/// Packs codes least-significant-bit first and stages the bytes into
/// length-prefixed sub-blocks of up to 255 bytes.
struct BlockWriter<'a, W: Write> {
    w: &'a mut W,
    bit_buf: u32,
    bits: u8,
    block: [u8; 255],
    len: usize,
}

impl<'a, W: Write> BlockWriter<'a, W> {
    fn new(w: &'a mut W) -> Self {
        BlockWriter {
            w,
            bit_buf: 0,
            bits: 0,
            block: [0; 255],
            len: 0,
        }
    }

    fn write_code(&mut self, code: Code, code_size: u8) -> Result<()> {
        self.bit_buf |= u32::from(code) << self.bits;
        self.bits += code_size;
        while self.bits >= 8 {
            self.push_byte((self.bit_buf & 0xFF) as u8)?;
            self.bit_buf >>= 8;
            self.bits -= 8;
        }
        Ok(())
    }

    fn push_byte(&mut self, byte: u8) -> Result<()> {
        self.block[self.len] = byte;
        self.len += 1;
        if self.len == self.block.len() {
            self.flush_block()?;
        }
        Ok(())
    }

    fn flush_block(&mut self) -> Result<()> {
        if self.len > 0 {
            self.w.write_le(self.len as u8)?;
            self.w.write_all(&self.block[..self.len])?;
            self.len = 0;
        }
        Ok(())
    }

    /// Pads the last byte with zero bits, flushes the partial sub-block and
    /// emits the terminator.
    fn finish(mut self) -> Result<()> {
        if self.bits > 0 {
            let byte = (self.bit_buf & 0xFF) as u8;
            self.push_byte(byte)?;
        }
        self.flush_block()?;
        self.w.write_le(0u8)?;
        Ok(())
    }
}

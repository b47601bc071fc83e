//! The variable-width LZW coder used for image data.
//!
//! GIF packs LZW codes least-significant-bit first into a byte stream that
//! is in turn segmented into length-prefixed sub-blocks of up to 255 bytes,
//! terminated by a zero-length sub-block. The code width starts at
//! `min_code_size + 1` bits and grows with the dictionary up to 12 bits;
//! two reserved codes, `1 << min_code_size` (clear) and its successor
//! (end), reset the dictionary and terminate the stream.
//!
//! [`Decoder`] and [`Encoder`] work directly on the sub-block framing, so
//! they can run against the raw byte stream of an image data part. The
//! [`Reader`](crate::Reader) and [`Writer`](crate::Writer) use them
//! internally; they are exported for callers that want to transcode image
//! data without touching the surrounding container.

mod decode;
mod encode;

pub use self::decode::Decoder;
pub use self::encode::Encoder;

/// Maximum width of a code in bits.
pub(crate) const MAX_CODESIZE: u8 = 12;

/// Maximum number of dictionary entries.
pub(crate) const MAX_ENTRIES: usize = 1 << MAX_CODESIZE;

/// Alias for a LZW code point.
pub(crate) type Code = u16;

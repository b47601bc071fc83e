//! # GIF part streaming en- and decoding library
//!
//! GIF files are a sequence of framed parts: a header, a logical screen
//! descriptor, optional color tables, extensions and LZW-compressed
//! images, closed by a trailer. This library exposes that sequence
//! directly: a pull-style [`Reader`] hands out one typed part at a time
//! and a push-style [`Writer`] accepts them in the same order, so streams
//! of any size can be inspected, filtered or re-encoded without ever
//! buffering a whole file. Both ends enforce the container's ordering
//! rules and the version gates of GIF 87a, 89a and later revisions.
//!
//! The LZW coder lives in [`lzw`] and is exported for callers that want to
//! work on raw image data streams.
//!
//! ## Reading and writing
//!
//! ```
//! use gif_stream::{ImageDescriptor, LogicalScreenDescriptor, Part, Reader, Version, Writer};
//!
//! # fn main() -> gif_stream::Result<()> {
//! // Write a single-image stream into memory.
//! let mut writer = Writer::new(Vec::new());
//! writer.write_header(Version::V87A)?;
//! writer.write_logical_screen_descriptor(&LogicalScreenDescriptor {
//!     width: 2,
//!     height: 2,
//!     ..Default::default()
//! })?;
//! writer.write_image_descriptor(&ImageDescriptor {
//!     width: 2,
//!     height: 2,
//!     ..Default::default()
//! })?;
//! writer.write_image_data(&[0, 1, 2, 3])?;
//! writer.write_trailer()?;
//! let bytes = writer.into_inner();
//!
//! // Pull it back apart.
//! let mut reader = Reader::new(&bytes[..]);
//! reader.read_header()?;
//! reader.read_logical_screen_descriptor()?;
//! assert_eq!(reader.peek_part()?, Part::ImageDescriptor);
//! reader.read_image_descriptor()?;
//! assert_eq!(reader.read_image_data()?, [0, 1, 2, 3]);
//! assert_eq!(reader.peek_part()?, Part::Trailer);
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod common;
mod error;
mod reader;
mod traits;
mod writer;

pub mod lzw;

pub use crate::common::{
    AnyExtension, ApplicationExtension, Block, DisposalMethod, Extension,
    GraphicControlExtension, ImageDescriptor, LogicalScreenDescriptor, NetscapeExtension, Part,
    PlainTextExtension, Version, NETSCAPE_AUTHENTICATION_CODE, NETSCAPE_IDENTIFIER, PLTE_CHANNELS,
};
pub use crate::error::{Error, Result};
pub use crate::reader::{MemoryLimit, ReadOptions, Reader};
pub use crate::writer::Writer;

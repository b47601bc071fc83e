//! Push-style writer accepting typed parts in container order.

use std::io::Write;

use tracing::{debug, trace};

use crate::common::{
    AnyExtension, Block, Extension, GraphicControlExtension, ImageDescriptor,
    LogicalScreenDescriptor, NetscapeExtension, PlainTextExtension, Version, PLTE_CHANNELS,
};
use crate::error::{Error, Result};
use crate::lzw;
use crate::traits::WriteBytesExt;

/// What the currently open sub-block sequence belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum BlockContext {
    Extension(u8),
    ImageData,
}

/// Codec position of the writer; decides which operation is legal next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Header,
    LogicalScreen,
    GlobalColorTable,
    AwaitingBlockLabel,
    LocalColorTable,
    ImageData,
    /// Sub-block sequence open, nothing written yet.
    Subblock0(BlockContext),
    /// Sub-block sequence open, at least one sub-block written.
    Subblocks(BlockContext),
    Done,
    Error,
}

/// GIF writer over a byte stream.
///
/// The mirror of [`Reader`](crate::Reader): parts are accepted in the order
/// the container dictates and emitted bit-exactly. Operations outside that
/// order fail with [`Error::InvalidState`], bad values with
/// [`Error::InvalidArgument`]; neither touches the stream. I/O failures
/// poison the writer for good.
pub struct Writer<W: Write> {
    w: W,
    phase: Phase,
    version: Version,
    /// Entry count declared for the color table to be written next.
    pending_colors: u16,
    image_width: u16,
    image_height: u16,
    lzw: lzw::Encoder,
}

impl<W: Write> Writer<W> {
    /// Creates a writer. No bytes are written until the first operation.
    pub fn new(w: W) -> Writer<W> {
        Writer {
            w,
            phase: Phase::Header,
            version: Version::V87A,
            pending_colors: 0,
            image_width: 0,
            image_height: 0,
            lzw: lzw::Encoder::new(),
        }
    }

    /// The version written by [`write_header`](Writer::write_header).
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Finish writing and recover the underlying stream.
    pub fn into_inner(self) -> W {
        self.w
    }

    /// Poisons the writer on stream failure; caller mistakes do not get
    /// this far.
    fn run<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        match op(self) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.phase = Phase::Error;
                Err(err)
            }
        }
    }

    /// Writes the six header bytes.
    pub fn write_header(&mut self, version: Version) -> Result<()> {
        if self.phase != Phase::Header {
            return Err(Error::InvalidState);
        }
        let Some(bytes) = version.to_bytes() else {
            return Err(Error::InvalidArgument("version out of range"));
        };
        self.run(|this| {
            this.w.write_all(b"GIF")?;
            this.w.write_all(&bytes)?;
            this.version = version;
            debug!(%version, "wrote header");
            this.phase = Phase::LogicalScreen;
            Ok(())
        })
    }

    /// Writes the logical screen descriptor.
    pub fn write_logical_screen_descriptor(
        &mut self,
        desc: &LogicalScreenDescriptor,
    ) -> Result<()> {
        if self.phase != Phase::LogicalScreen {
            return Err(Error::InvalidState);
        }
        if desc.color_resolution > 7 {
            return Err(Error::InvalidArgument("color resolution exceeds three bits"));
        }
        if desc.global_color_table_size > 7 {
            return Err(Error::InvalidArgument("color table size exceeds three bits"));
        }
        if self.version < Version::V89A {
            if desc.sorted {
                return Err(Error::InvalidArgument("sort flag requires version 89a"));
            }
            if desc.pixel_aspect_ratio != 0 {
                return Err(Error::InvalidArgument(
                    "pixel aspect ratio requires version 89a",
                ));
            }
        }
        self.run(|this| {
            this.w.write_all(&desc.to_wire())?;
            debug!(
                width = desc.width,
                height = desc.height,
                "wrote logical screen descriptor"
            );
            match desc.global_color_table_len() {
                Some(len) => {
                    this.pending_colors = len as u16;
                    this.phase = Phase::GlobalColorTable;
                }
                None => this.phase = Phase::AwaitingBlockLabel,
            }
            Ok(())
        })
    }

    /// Writes the color table announced by the previous descriptor, given
    /// as flat `[r, g, b, ...]` bytes.
    ///
    /// A table with fewer entries than declared is padded with black;
    /// more entries than declared do not fit and are refused.
    pub fn write_color_table(&mut self, table: &[u8]) -> Result<()> {
        let local = match self.phase {
            Phase::GlobalColorTable => false,
            Phase::LocalColorTable => true,
            _ => return Err(Error::InvalidState),
        };
        if table.len() % PLTE_CHANNELS != 0 {
            return Err(Error::InvalidArgument(
                "color table length must be a multiple of three",
            ));
        }
        let entries = table.len() / PLTE_CHANNELS;
        if entries > usize::from(self.pending_colors) {
            return Err(Error::InvalidArgument(
                "too many colors for the declared table size",
            ));
        }
        self.run(|this| {
            this.w.write_all(table)?;
            // The wire table always holds the declared entry count.
            for _ in entries..usize::from(this.pending_colors) {
                this.w.write_all(&[0, 0, 0])?;
            }
            this.phase = if local {
                Phase::ImageData
            } else {
                Phase::AwaitingBlockLabel
            };
            Ok(())
        })
    }

    /// Writes the image separator and the nine descriptor bytes.
    pub fn write_image_descriptor(&mut self, desc: &ImageDescriptor) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        if desc.local_color_table_size > 7 {
            return Err(Error::InvalidArgument("color table size exceeds three bits"));
        }
        if desc.reserved > 0b11 {
            return Err(Error::InvalidArgument("reserved field exceeds two bits"));
        }
        if self.version < Version::V89A && desc.sorted {
            return Err(Error::InvalidArgument("sort flag requires version 89a"));
        }
        if self.version <= Version::V89A && desc.reserved != 0 {
            return Err(Error::InvalidArgument(
                "reserved bits must be zero up to version 89a",
            ));
        }
        self.run(|this| {
            this.w.write_le(Block::Image as u8)?;
            this.w.write_all(&desc.to_wire())?;
            this.image_width = desc.width;
            this.image_height = desc.height;
            trace!(
                width = desc.width,
                height = desc.height,
                "wrote image descriptor"
            );
            match desc.local_color_table_len() {
                Some(len) => {
                    this.pending_colors = len as u16;
                    this.phase = Phase::LocalColorTable;
                }
                None => this.phase = Phase::ImageData,
            }
            Ok(())
        })
    }

    /// Compresses and writes the image data of the current image.
    ///
    /// `buf` holds one palette index per pixel, exactly `width * height`
    /// bytes of the most recent image descriptor. The minimum code size is
    /// computed from the highest index present.
    pub fn write_image_data(&mut self, buf: &[u8]) -> Result<()> {
        if self.phase != Phase::ImageData {
            return Err(Error::InvalidState);
        }
        if buf.len() != usize::from(self.image_width) * usize::from(self.image_height) {
            return Err(Error::InvalidArgument(
                "buffer length must match the image descriptor",
            ));
        }
        self.run(|this| {
            let min_code_size = lzw::Encoder::min_code_size_for(buf);
            this.w.write_le(min_code_size)?;
            this.lzw.encode(&mut this.w, min_code_size, buf)?;
            trace!(bytes = buf.len(), min_code_size, "wrote image data");
            this.phase = Phase::AwaitingBlockLabel;
            Ok(())
        })
    }

    /// Starts image data for callers that bring their own code stream.
    ///
    /// Writes only the `min_code_size` byte; the caller feeds the
    /// LZW-compressed bytes through [`write_subblock`](Writer::write_subblock)
    /// and closes the image with
    /// [`write_block_terminator`](Writer::write_block_terminator).
    pub fn begin_image_data(&mut self, min_code_size: u8) -> Result<()> {
        if self.phase != Phase::ImageData {
            return Err(Error::InvalidState);
        }
        if !(2..=8).contains(&min_code_size) {
            return Err(Error::InvalidArgument("minimum code size out of range"));
        }
        self.run(|this| {
            this.w.write_le(min_code_size)?;
            this.phase = Phase::Subblock0(BlockContext::ImageData);
            Ok(())
        })
    }

    /// Writes an extension introducer and label, opening a sub-block
    /// sequence. The comment extension has exactly this wire form.
    ///
    /// Version 87a has no extensions; version 89a has exactly the four
    /// well-known ones; newer versions redefine the label space, so there
    /// only labels this library does not know are accepted.
    pub fn write_extension_label(&mut self, label: AnyExtension) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        if self.version < Version::V89A {
            return Err(Error::InvalidArgument("extensions require version 89a"));
        }
        if self.version.is_future() {
            if label.into_known().is_some() {
                return Err(Error::InvalidArgument(
                    "well-known label under an unknown version",
                ));
            }
        } else if label.into_known().is_none() {
            return Err(Error::InvalidArgument("unknown extension label"));
        }
        self.run(|this| {
            this.w.write_le(Block::Extension as u8)?;
            this.w.write_le(label.0)?;
            trace!(label = label.0, "wrote extension label");
            this.phase = Phase::Subblock0(BlockContext::Extension(label.0));
            Ok(())
        })
    }

    /// Writes a graphic control extension's label and fixed block. The
    /// caller closes it with
    /// [`write_block_terminator`](Writer::write_block_terminator).
    pub fn write_graphic_control_extension(
        &mut self,
        ext: &GraphicControlExtension,
    ) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        self.check_known_extension_allowed()?;
        self.run(|this| {
            this.w.write_le(Block::Extension as u8)?;
            this.w.write_le(Extension::Control as u8)?;
            this.w.write_le(4u8)?;
            this.w.write_le(ext.flags())?;
            this.w.write_le(ext.delay)?;
            this.w.write_le(ext.transparent_color_index)?;
            this.phase = Phase::Subblocks(BlockContext::Extension(Extension::Control as u8));
            Ok(())
        })
    }

    /// Writes a plain text extension's label and fixed first block. The
    /// text sub-blocks follow via [`write_subblock`](Writer::write_subblock).
    pub fn write_plain_text_extension(&mut self, ext: &PlainTextExtension) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        self.check_known_extension_allowed()?;
        self.run(|this| {
            this.w.write_le(Block::Extension as u8)?;
            this.w.write_le(Extension::Text as u8)?;
            this.w.write_le(12u8)?;
            this.w.write_all(&ext.to_wire())?;
            this.phase = Phase::Subblocks(BlockContext::Extension(Extension::Text as u8));
            Ok(())
        })
    }

    /// Writes an application extension's label and fixed first block. The
    /// application sub-blocks follow via
    /// [`write_subblock`](Writer::write_subblock) or
    /// [`write_netscape_subblock`](Writer::write_netscape_subblock).
    pub fn write_application_extension(
        &mut self,
        identifier: &[u8],
        authentication_code: &[u8],
    ) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        if identifier.len() != 8 {
            return Err(Error::InvalidArgument(
                "application identifier must be eight bytes",
            ));
        }
        if authentication_code.len() != 3 {
            return Err(Error::InvalidArgument(
                "authentication code must be three bytes",
            ));
        }
        self.check_known_extension_allowed()?;
        self.run(|this| {
            this.w.write_le(Block::Extension as u8)?;
            this.w.write_le(Extension::Application as u8)?;
            this.w.write_le(11u8)?;
            this.w.write_all(identifier)?;
            this.w.write_all(authentication_code)?;
            this.phase = Phase::Subblocks(BlockContext::Extension(Extension::Application as u8));
            Ok(())
        })
    }

    /// Writes one Netscape 2.0 sub-block into the open application
    /// extension.
    pub fn write_netscape_subblock(&mut self, ext: NetscapeExtension) -> Result<()> {
        let application = BlockContext::Extension(Extension::Application as u8);
        match self.phase {
            Phase::Subblock0(ctx) | Phase::Subblocks(ctx) if ctx == application => {}
            _ => return Err(Error::InvalidState),
        }
        self.run(|this| {
            match ext {
                NetscapeExtension::Loops(count) => {
                    this.w.write_le(3u8)?;
                    this.w.write_le(1u8)?;
                    this.w.write_le(count)?;
                }
                NetscapeExtension::BufferSize(bytes) => {
                    this.w.write_le(5u8)?;
                    this.w.write_le(2u8)?;
                    this.w.write_le(bytes)?;
                }
            }
            this.phase = Phase::Subblocks(application);
            Ok(())
        })
    }

    /// Writes one data sub-block of 1 to 255 bytes.
    pub fn write_subblock(&mut self, data: &[u8]) -> Result<()> {
        let ctx = match self.phase {
            Phase::Subblock0(ctx) | Phase::Subblocks(ctx) => ctx,
            _ => return Err(Error::InvalidState),
        };
        if data.is_empty() || data.len() > 255 {
            return Err(Error::InvalidArgument(
                "sub-block must hold 1 to 255 bytes",
            ));
        }
        self.run(|this| {
            this.w.write_le(data.len() as u8)?;
            this.w.write_all(data)?;
            this.phase = Phase::Subblocks(ctx);
            Ok(())
        })
    }

    /// Closes the open sub-block sequence with a zero length byte.
    pub fn write_block_terminator(&mut self) -> Result<()> {
        match self.phase {
            Phase::Subblock0(_) | Phase::Subblocks(_) => {}
            _ => return Err(Error::InvalidState),
        }
        self.run(|this| {
            this.w.write_le(0u8)?;
            this.phase = Phase::AwaitingBlockLabel;
            Ok(())
        })
    }

    /// Writes the trailer. The stream is complete afterwards.
    pub fn write_trailer(&mut self) -> Result<()> {
        if self.phase != Phase::AwaitingBlockLabel {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            this.w.write_le(Block::Trailer as u8)?;
            trace!("wrote trailer");
            this.phase = Phase::Done;
            Ok(())
        })
    }

    /// The typed extension records are all version 89a constructs: older
    /// streams have no extensions, newer ones may give their labels other
    /// meanings.
    fn check_known_extension_allowed(&self) -> Result<()> {
        if self.version < Version::V89A {
            return Err(Error::InvalidArgument("extensions require version 89a"));
        }
        if self.version.is_future() {
            return Err(Error::InvalidArgument(
                "well-known label under an unknown version",
            ));
        }
        Ok(())
    }
}

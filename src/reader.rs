//! Pull-style reader handing out one typed part at a time.

use std::io::Read;
use std::num::NonZeroU64;

use tracing::{debug, trace};

use crate::common::{
    AnyExtension, ApplicationExtension, Block, DisposalMethod, Extension,
    GraphicControlExtension, ImageDescriptor, LogicalScreenDescriptor, NetscapeExtension, Part,
    PlainTextExtension, Version, PLTE_CHANNELS,
};
use crate::error::{Error, Result};
use crate::lzw;
use crate::traits::ReadBytesExt;

/// Codec position of the reader; decides which operation is legal next.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Phase {
    Header,
    LogicalScreen,
    GlobalColorTable,
    AwaitingBlockLabel,
    /// An extension introducer has been seen, the label byte has not.
    ExtensionLabel,
    /// An image separator has been seen, the descriptor has not.
    ImageDescriptor,
    LocalColorTable,
    ImageData,
    /// Label read, fixed body not read yet.
    BlockBody(u8),
    /// Inside the variable sub-blocks of the given extension label.
    SubblockStream(u8),
    Done,
    Error,
}

/// The maximum amount of memory the reader may spend on one decoded image.
#[derive(Clone, Debug)]
pub enum MemoryLimit {
    /// Enforce no memory limit.
    ///
    /// Dangerous for images from unknown origins: the index buffer of a
    /// single image can reach 4 GiB while the file stays tiny.
    Unlimited,
    /// Refuse to allocate an index buffer larger than this many bytes.
    Bytes(NonZeroU64),
}

impl MemoryLimit {
    fn check(&self, bytes: usize) -> Result<()> {
        match self {
            MemoryLimit::Unlimited => Ok(()),
            MemoryLimit::Bytes(limit) => {
                if bytes as u64 > limit.get() {
                    Err(Error::InvalidArgument(
                        "decoded image exceeds the memory limit",
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Options for opening a [`Reader`].
#[derive(Clone, Debug)]
pub struct ReadOptions {
    memory_limit: MemoryLimit,
}

impl ReadOptions {
    /// Creates a new options builder.
    #[must_use]
    pub fn new() -> ReadOptions {
        ReadOptions {
            memory_limit: MemoryLimit::Bytes(50_000_000.try_into().unwrap()), // 50 MB
        }
    }

    /// Configure a memory limit for decoded images.
    pub fn set_memory_limit(&mut self, limit: MemoryLimit) {
        self.memory_limit = limit;
    }

    /// Opens a reader over `r`. No bytes are consumed until the first
    /// operation.
    pub fn open<R: Read>(self, r: R) -> Reader<R> {
        Reader {
            r,
            phase: Phase::Header,
            options: self,
            version: Version::V87A,
            screen_width: 0,
            screen_height: 0,
            global_colors: None,
            active_colors: 0,
            pending_colors: 0,
            image_width: 0,
            image_height: 0,
            lzw: lzw::Decoder::new(),
        }
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions::new()
    }
}

/// GIF reader over a byte stream.
///
/// Parts must be consumed in the order the container dictates;
/// [`peek_part`](Reader::peek_part) tells which operation comes next.
/// Calling anything else fails with [`Error::InvalidState`] and has no
/// effect, while I/O and format failures poison the reader for good.
pub struct Reader<R: Read> {
    r: R,
    phase: Phase,
    options: ReadOptions,
    version: Version,
    screen_width: u16,
    screen_height: u16,
    /// Entry count of the global color table, captured once.
    global_colors: Option<u16>,
    /// Entry count of the table the current image data draws from.
    active_colors: u16,
    /// Entry count of the color table to be read next.
    pending_colors: u16,
    image_width: u16,
    image_height: u16,
    lzw: lzw::Decoder,
}

impl<R: Read> Reader<R> {
    /// Creates a reader with default options.
    pub fn new(r: R) -> Reader<R> {
        ReadOptions::new().open(r)
    }

    /// Returns a builder that allows configuring limits etc.
    #[must_use]
    pub fn build() -> ReadOptions {
        ReadOptions::new()
    }

    /// The version declared by the header. Meaningful once
    /// [`read_header`](Reader::read_header) succeeded.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// Width of the logical screen.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.screen_width
    }

    /// Height of the logical screen.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.screen_height
    }

    /// Entry count of the global color table, if the logical screen
    /// descriptor declared one.
    #[must_use]
    pub fn global_color_table_size(&self) -> Option<u16> {
        self.global_colors
    }

    /// Entry count of the color table the current image draws from:
    /// the local table if the image descriptor declared one, the global
    /// table otherwise.
    #[must_use]
    pub fn active_color_table_size(&self) -> u16 {
        self.active_colors
    }

    /// Abort or finish reading and recover the underlying stream.
    pub fn into_inner(self) -> R {
        self.r
    }

    /// Poisons the reader on stream failure; caller mistakes do not get
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

    /// Announces the next part to read.
    ///
    /// Between blocks this consumes the one framing byte that decides
    /// between an extension, an image and the trailer; in every other
    /// position it is a pure function of the current phase and can be
    /// called any number of times.
    pub fn peek_part(&mut self) -> Result<Part> {
        match self.phase {
            Phase::Header => Ok(Part::Header),
            Phase::LogicalScreen => Ok(Part::LogicalScreenDescriptor),
            Phase::GlobalColorTable | Phase::LocalColorTable => Ok(Part::ColorTable),
            Phase::ExtensionLabel => Ok(Part::ExtensionLabel),
            Phase::ImageDescriptor => Ok(Part::ImageDescriptor),
            Phase::ImageData => Ok(Part::ImageData),
            Phase::BlockBody(label) => Ok(match Extension::from_u8(label) {
                Some(Extension::Control) => Part::GraphicControlExtension,
                Some(Extension::Text) => Part::PlainTextExtension,
                Some(Extension::Application) => Part::ApplicationExtension,
                Some(Extension::Comment) | None => Part::Subblock,
            }),
            Phase::SubblockStream(_) => Ok(Part::Subblock),
            Phase::Done => Ok(Part::Trailer),
            Phase::Error => Err(Error::InvalidState),
            Phase::AwaitingBlockLabel => self.run(|this| {
                let byte = this.r.read_u8().map_err(Error::from_read)?;
                match Block::from_u8(byte) {
                    Some(Block::Extension) => {
                        this.phase = Phase::ExtensionLabel;
                        Ok(Part::ExtensionLabel)
                    }
                    Some(Block::Image) => {
                        this.phase = Phase::ImageDescriptor;
                        Ok(Part::ImageDescriptor)
                    }
                    Some(Block::Trailer) => {
                        trace!("trailer reached");
                        this.phase = Phase::Done;
                        Ok(Part::Trailer)
                    }
                    None => Err(Error::Malformed("unknown block label")),
                }
            }),
        }
    }

    /// Reads the six header bytes and returns the declared version.
    pub fn read_header(&mut self) -> Result<Version> {
        if self.phase != Phase::Header {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            let mut header = [0u8; 6];
            this.r.read_exact(&mut header).map_err(Error::from_read)?;
            if &header[..3] != b"GIF" {
                return Err(Error::Malformed("missing GIF signature"));
            }
            let version = Version::from_bytes([header[3], header[4], header[5]])
                .ok_or(Error::Malformed("unrecognized version field"))?;
            this.version = version;
            debug!(%version, "read header");
            this.phase = Phase::LogicalScreen;
            Ok(version)
        })
    }

    /// Reads the logical screen descriptor.
    pub fn read_logical_screen_descriptor(&mut self) -> Result<LogicalScreenDescriptor> {
        if self.phase != Phase::LogicalScreen {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            let mut raw = [0u8; 7];
            this.r.read_exact(&mut raw).map_err(Error::from_read)?;
            let desc = LogicalScreenDescriptor::from_wire(&raw);
            if this.version < Version::V89A {
                if desc.sorted {
                    return Err(Error::Malformed("sort flag requires version 89a"));
                }
                if desc.pixel_aspect_ratio != 0 {
                    return Err(Error::Malformed("pixel aspect ratio requires version 89a"));
                }
            }
            this.screen_width = desc.width;
            this.screen_height = desc.height;
            debug!(
                width = desc.width,
                height = desc.height,
                "read logical screen descriptor"
            );
            match desc.global_color_table_len() {
                Some(len) => {
                    this.global_colors = Some(len as u16);
                    this.pending_colors = len as u16;
                    this.phase = Phase::GlobalColorTable;
                }
                None => {
                    this.global_colors = None;
                    this.phase = Phase::AwaitingBlockLabel;
                }
            }
            Ok(desc)
        })
    }

    /// Reads the global or local color table announced by the previous
    /// descriptor, as flat `[r, g, b, ...]` bytes.
    pub fn read_color_table(&mut self) -> Result<Vec<u8>> {
        let local = match self.phase {
            Phase::GlobalColorTable => false,
            Phase::LocalColorTable => true,
            _ => return Err(Error::InvalidState),
        };
        self.run(|this| {
            let mut table = vec![0u8; PLTE_CHANNELS * usize::from(this.pending_colors)];
            this.r.read_exact(&mut table).map_err(Error::from_read)?;
            this.active_colors = this.pending_colors;
            this.phase = if local {
                Phase::ImageData
            } else {
                Phase::AwaitingBlockLabel
            };
            Ok(table)
        })
    }

    /// Reads the nine descriptor bytes following an image separator.
    pub fn read_image_descriptor(&mut self) -> Result<ImageDescriptor> {
        if self.phase != Phase::ImageDescriptor {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            let mut raw = [0u8; 9];
            this.r.read_exact(&mut raw).map_err(Error::from_read)?;
            let desc = ImageDescriptor::from_wire(&raw);
            if this.version < Version::V89A && desc.sorted {
                return Err(Error::Malformed("sort flag requires version 89a"));
            }
            if this.version <= Version::V89A && desc.reserved != 0 {
                return Err(Error::Malformed("reserved bits set in image descriptor"));
            }
            this.image_width = desc.width;
            this.image_height = desc.height;
            trace!(
                width = desc.width,
                height = desc.height,
                "read image descriptor"
            );
            match desc.local_color_table_len() {
                Some(len) => {
                    this.pending_colors = len as u16;
                    this.phase = Phase::LocalColorTable;
                }
                None => {
                    this.active_colors = this.global_colors.unwrap_or(0);
                    this.phase = Phase::ImageData;
                }
            }
            Ok(desc)
        })
    }

    /// Decompresses the image data of the current image.
    ///
    /// Returns the linear index buffer, exactly
    /// `width * height` bytes of the most recent image descriptor.
    pub fn read_image_data(&mut self) -> Result<Vec<u8>> {
        if self.phase != Phase::ImageData {
            return Err(Error::InvalidState);
        }
        let len = usize::from(self.image_width) * usize::from(self.image_height);
        self.options.memory_limit.check(len)?;
        let mut buf = vec![0u8; len];
        self.run(|this| this.decode_image(&mut buf))?;
        Ok(buf)
    }

    /// Decompresses the image data of the current image into `buf`, which
    /// must hold exactly `width * height` bytes.
    pub fn read_image_data_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if self.phase != Phase::ImageData {
            return Err(Error::InvalidState);
        }
        if buf.len() != usize::from(self.image_width) * usize::from(self.image_height) {
            return Err(Error::InvalidArgument(
                "buffer length must match the image descriptor",
            ));
        }
        self.run(|this| this.decode_image(buf))
    }

    fn decode_image(&mut self, buf: &mut [u8]) -> Result<()> {
        let min_code_size = self.r.read_u8().map_err(Error::from_read)?;
        self.lzw.decode(&mut self.r, min_code_size, buf)?;
        trace!(bytes = buf.len(), "decoded image data");
        self.phase = Phase::AwaitingBlockLabel;
        Ok(())
    }

    /// Reads the label byte of an extension.
    ///
    /// Up to version 89a only the four well-known labels are accepted;
    /// newer versions may introduce labels this library does not know, so
    /// there everything passes.
    pub fn read_extension_label(&mut self) -> Result<AnyExtension> {
        if self.phase != Phase::ExtensionLabel {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            let label = this.r.read_u8().map_err(Error::from_read)?;
            if !this.version.is_future() && Extension::from_u8(label).is_none() {
                return Err(Error::Malformed("unknown extension label"));
            }
            trace!(label, "read extension label");
            this.phase = Phase::BlockBody(label);
            Ok(AnyExtension(label))
        })
    }

    /// Reads the fixed block of a graphic control extension, including its
    /// terminator.
    pub fn read_graphic_control_extension(&mut self) -> Result<GraphicControlExtension> {
        if self.phase != Phase::BlockBody(Extension::Control as u8) {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            if this.version < Version::V89A {
                return Err(Error::Malformed("graphic control requires version 89a"));
            }
            let mut raw = [0u8; 5];
            this.r.read_exact(&mut raw).map_err(Error::from_read)?;
            if raw[0] != 4 {
                return Err(Error::Malformed("bad graphic control block size"));
            }
            let flags = raw[1];
            if this.version == Version::V89A && flags & 0b1110_0000 != 0 {
                return Err(Error::Malformed("reserved bits set in graphic control"));
            }
            let dispose = match DisposalMethod::from_u8((flags >> 2) & 0b111) {
                Some(method) => method,
                None if this.version.is_future() => DisposalMethod::Any,
                None => return Err(Error::Malformed("invalid disposal method")),
            };
            let ext = GraphicControlExtension {
                dispose,
                needs_user_input: flags & 0b10 != 0,
                has_transparency: flags & 0b01 != 0,
                transparent_color_index: raw[4],
                delay: u16::from_le_bytes([raw[2], raw[3]]),
            };
            if this.r.read_u8().map_err(Error::from_read)? != 0 {
                return Err(Error::Malformed("missing block terminator"));
            }
            this.phase = Phase::AwaitingBlockLabel;
            Ok(ext)
        })
    }

    /// Reads the fixed first block of a plain text extension. The variable
    /// text sub-blocks follow via [`read_subblock`](Reader::read_subblock).
    pub fn read_plain_text_extension(&mut self) -> Result<PlainTextExtension> {
        if self.phase != Phase::BlockBody(Extension::Text as u8) {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            if this.version < Version::V89A {
                return Err(Error::Malformed("plain text requires version 89a"));
            }
            let mut raw = [0u8; 13];
            this.r.read_exact(&mut raw).map_err(Error::from_read)?;
            if raw[0] != 12 {
                return Err(Error::Malformed("bad plain text block size"));
            }
            let mut body = [0u8; 12];
            body.copy_from_slice(&raw[1..]);
            this.phase = Phase::SubblockStream(Extension::Text as u8);
            Ok(PlainTextExtension::from_wire(&body))
        })
    }

    /// Reads the fixed first block of an application extension. The
    /// application data sub-blocks follow via
    /// [`read_subblock`](Reader::read_subblock) or, for the Netscape 2.0
    /// extension, [`read_netscape_subblock`](Reader::read_netscape_subblock).
    pub fn read_application_extension(&mut self) -> Result<ApplicationExtension> {
        if self.phase != Phase::BlockBody(Extension::Application as u8) {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            if this.version < Version::V89A {
                return Err(Error::Malformed(
                    "application extensions require version 89a",
                ));
            }
            let mut raw = [0u8; 12];
            this.r.read_exact(&mut raw).map_err(Error::from_read)?;
            if raw[0] != 11 {
                return Err(Error::Malformed("bad application block size"));
            }
            let mut identifier = [0u8; 8];
            identifier.copy_from_slice(&raw[1..9]);
            let mut authentication_code = [0u8; 3];
            authentication_code.copy_from_slice(&raw[9..]);
            this.phase = Phase::SubblockStream(Extension::Application as u8);
            Ok(ApplicationExtension {
                identifier,
                authentication_code,
            })
        })
    }

    /// Reads one data sub-block of the current extension, or `None` for
    /// the block terminator.
    pub fn read_subblock(&mut self) -> Result<Option<Vec<u8>>> {
        let label = match self.phase {
            Phase::BlockBody(label) | Phase::SubblockStream(label) => label,
            _ => return Err(Error::InvalidState),
        };
        self.run(|this| {
            let len = this.r.read_u8().map_err(Error::from_read)?;
            if len == 0 {
                this.phase = Phase::AwaitingBlockLabel;
                return Ok(None);
            }
            let mut data = vec![0u8; usize::from(len)];
            this.r.read_exact(&mut data).map_err(Error::from_read)?;
            this.phase = Phase::SubblockStream(label);
            Ok(Some(data))
        })
    }

    /// Reads one Netscape 2.0 sub-block of the current application
    /// extension, or `None` for the block terminator.
    pub fn read_netscape_subblock(&mut self) -> Result<Option<NetscapeExtension>> {
        if self.phase != Phase::SubblockStream(Extension::Application as u8) {
            return Err(Error::InvalidState);
        }
        self.run(|this| {
            let len = this.r.read_u8().map_err(Error::from_read)?;
            if len == 0 {
                this.phase = Phase::AwaitingBlockLabel;
                return Ok(None);
            }
            let mut data = vec![0u8; usize::from(len)];
            this.r.read_exact(&mut data).map_err(Error::from_read)?;
            let ext = match data[0] {
                0x01 => {
                    if len != 3 {
                        return Err(Error::Malformed("bad netscape looping block"));
                    }
                    NetscapeExtension::Loops(u16::from_le_bytes([data[1], data[2]]))
                }
                0x02 => {
                    if len != 5 {
                        return Err(Error::Malformed("bad netscape buffering block"));
                    }
                    NetscapeExtension::BufferSize(u32::from_le_bytes([
                        data[1], data[2], data[3], data[4],
                    ]))
                }
                _ => return Err(Error::Malformed("unknown netscape sub-block")),
            };
            Ok(Some(ext))
        })
    }
}

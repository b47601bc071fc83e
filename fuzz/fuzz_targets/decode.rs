#![no_main]
use libfuzzer_sys::fuzz_target;

use gif_stream::{Error, Part, Reader};

fuzz_target!(|data: &[u8]| {
    let _ = try_decode(data);
});

fn try_decode(data: &[u8]) -> Result<(), Error> {
    let mut reader = Reader::new(data);
    reader.read_header()?;
    reader.read_logical_screen_descriptor()?;
    loop {
        match reader.peek_part()? {
            Part::ColorTable => {
                reader.read_color_table()?;
            }
            Part::ImageDescriptor => {
                reader.read_image_descriptor()?;
            }
            Part::ImageData => {
                reader.read_image_data()?;
            }
            Part::ExtensionLabel => {
                reader.read_extension_label()?;
            }
            Part::GraphicControlExtension => {
                reader.read_graphic_control_extension()?;
            }
            Part::PlainTextExtension => {
                reader.read_plain_text_extension()?;
            }
            Part::ApplicationExtension => {
                reader.read_application_extension()?;
            }
            Part::Subblock => {
                reader.read_subblock()?;
            }
            Part::Trailer => return Ok(()),
            Part::Header | Part::LogicalScreenDescriptor => return Ok(()),
        }
    }
}

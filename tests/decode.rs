use gif_stream::{
    DisposalMethod, Error, MemoryLimit, NetscapeExtension, Part, Reader, Version,
};
use pretty_assertions::assert_eq;

fn stream(parts: &[&[u8]]) -> Vec<u8> {
    parts.concat()
}

#[test]
fn header_only_stream() {
    let data = stream(&[b"GIF87a", &[0; 7], &[0x3B]]);
    let mut reader = Reader::new(&data[..]);

    assert_eq!(reader.peek_part().unwrap(), Part::Header);
    assert_eq!(reader.read_header().unwrap(), Version::V87A);
    assert_eq!(reader.peek_part().unwrap(), Part::LogicalScreenDescriptor);
    let desc = reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(desc.width, 0);
    assert_eq!(desc.height, 0);
    assert!(!desc.has_global_color_table);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
    // The trailer position is terminal and peeking stays legal.
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn minimal_single_pixel() {
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0],
        &[0x02, 0x02, 0x44, 0x01, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::ImageDescriptor);
    let desc = reader.read_image_descriptor().unwrap();
    assert_eq!((desc.width, desc.height), (1, 1));
    assert_eq!(reader.peek_part().unwrap(), Part::ImageData);
    assert_eq!(reader.read_image_data().unwrap(), [0x00]);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn four_pixels_with_global_table() {
    let palette: Vec<u8> = (0..12).collect();
    let data = stream(&[
        b"GIF87a",
        &[0, 0, 0, 0, 0x91, 0, 0],
        &palette,
        &[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0],
        &[0x02, 0x03, 0x44, 0x34, 0x05, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    assert_eq!(reader.read_header().unwrap(), Version::V87A);
    assert_eq!(reader.version(), Version::V87A);
    let screen = reader.read_logical_screen_descriptor().unwrap();
    assert!(screen.has_global_color_table);
    assert_eq!(screen.global_color_table_len(), Some(4));
    assert_eq!((reader.width(), reader.height()), (2, 2));
    assert_eq!(reader.peek_part().unwrap(), Part::ColorTable);
    assert_eq!(reader.read_color_table().unwrap(), palette);
    assert_eq!(reader.global_color_table_size(), Some(4));
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    assert_eq!(reader.active_color_table_size(), 4);
    assert_eq!(reader.read_image_data().unwrap(), [0, 1, 2, 3]);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn comment_extension() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFE, 0x05],
        b"hello",
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::ExtensionLabel);
    // Peeking again must not consume another byte.
    assert_eq!(reader.peek_part().unwrap(), Part::ExtensionLabel);
    assert_eq!(reader.read_extension_label().unwrap().0, 0xFE);
    assert_eq!(reader.peek_part().unwrap(), Part::Subblock);
    assert_eq!(reader.read_subblock().unwrap().as_deref(), Some(&b"hello"[..]));
    assert_eq!(reader.read_subblock().unwrap(), None);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn netscape_looping() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFF, 0x0B],
        b"NETSCAPE2.0",
        &[0x03, 0x01, 0x00, 0x00],
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::ExtensionLabel);
    reader.read_extension_label().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::ApplicationExtension);
    let app = reader.read_application_extension().unwrap();
    assert_eq!(&app.identifier, b"NETSCAPE");
    assert_eq!(&app.authentication_code, b"2.0");
    assert_eq!(
        reader.read_netscape_subblock().unwrap(),
        Some(NetscapeExtension::Loops(0))
    );
    assert_eq!(reader.read_netscape_subblock().unwrap(), None);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn netscape_buffering() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFF, 0x0B],
        b"NETSCAPE2.0",
        &[0x05, 0x02, 0xD0, 0x07, 0x00, 0x00],
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    reader.read_application_extension().unwrap();
    assert_eq!(
        reader.read_netscape_subblock().unwrap(),
        Some(NetscapeExtension::BufferSize(2000))
    );
    assert_eq!(reader.read_netscape_subblock().unwrap(), None);
}

#[test]
fn netscape_unknown_identifier() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFF, 0x0B],
        b"NETSCAPE2.0",
        &[0x03, 0x03, 0x00, 0x00],
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    reader.read_application_extension().unwrap();
    assert!(matches!(
        reader.read_netscape_subblock(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn netscape_outside_application_extension() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFE, 0x02],
        b"hi",
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    reader.read_subblock().unwrap();
    assert!(matches!(
        reader.read_netscape_subblock(),
        Err(Error::InvalidState)
    ));
    // The comment stream is still readable afterwards.
    assert_eq!(reader.read_subblock().unwrap(), None);
}

#[test]
fn generic_subblocks_through_application_extension() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xFF, 0x0B],
        b"WHATEVER1.0",
        &[0x02, 0xAB, 0xCD],
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    let app = reader.read_application_extension().unwrap();
    assert_eq!(&app.identifier, b"WHATEVER");
    assert_eq!(&app.authentication_code, b"1.0");
    assert_eq!(
        reader.read_subblock().unwrap().as_deref(),
        Some(&[0xAB, 0xCD][..])
    );
    assert_eq!(reader.read_subblock().unwrap(), None);
}

#[test]
fn plain_text_extension() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0x01, 0x0C],
        &[10, 0, 20, 0, 40, 0, 8, 0, 4, 8, 1, 0],
        &[0x02],
        b"hi",
        &[0x00, 0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::PlainTextExtension);
    let text = reader.read_plain_text_extension().unwrap();
    assert_eq!(text.left, 10);
    assert_eq!(text.top, 20);
    assert_eq!(text.width, 40);
    assert_eq!(text.height, 8);
    assert_eq!(text.cell_width, 4);
    assert_eq!(text.cell_height, 8);
    assert_eq!(reader.read_subblock().unwrap().as_deref(), Some(&b"hi"[..]));
    assert_eq!(reader.read_subblock().unwrap(), None);
}

#[test]
fn invalid_signature_is_sticky() {
    let mut reader = Reader::new(&b"JIF87a\x00\x00"[..]);
    assert!(matches!(reader.read_header(), Err(Error::Malformed(_))));
    // Poisoned: everything fails with InvalidState from here on.
    assert!(matches!(reader.read_header(), Err(Error::InvalidState)));
    assert!(matches!(reader.peek_part(), Err(Error::InvalidState)));
    assert!(matches!(reader.read_subblock(), Err(Error::InvalidState)));
}

#[test]
fn invalid_version_field() {
    for bad in [&b"GIF8Xa"[..], &b"GIF89A"[..], &b"GIFaaa"[..]] {
        let mut reader = Reader::new(bad);
        assert!(matches!(reader.read_header(), Err(Error::Malformed(_))));
    }
}

#[test]
fn truncated_header() {
    let mut reader = Reader::new(&b"GIF8"[..]);
    assert!(matches!(reader.read_header(), Err(Error::Truncated)));
}

#[test]
fn version_gates_on_screen_descriptor() {
    // Sort flag requires 89a.
    let data = stream(&[b"GIF87a", &[0, 0, 0, 0, 0x08, 0, 0], &[0x3B]]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    assert!(matches!(
        reader.read_logical_screen_descriptor(),
        Err(Error::Malformed(_))
    ));

    // A pixel aspect ratio requires 89a.
    let data = stream(&[b"GIF87a", &[0, 0, 0, 0, 0, 0, 49], &[0x3B]]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    assert!(matches!(
        reader.read_logical_screen_descriptor(),
        Err(Error::Malformed(_))
    ));

    // Both are fine under 89a.
    let data = stream(&[b"GIF89a", &[0, 0, 0, 0, 0x08, 0, 49], &[0x3B]]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    let desc = reader.read_logical_screen_descriptor().unwrap();
    assert!(desc.sorted);
    assert_eq!(desc.pixel_aspect_ratio, 49);
}

#[test]
fn graphic_control_at_version_87a() {
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    // The label itself is one of the well-known four and reads fine.
    assert_eq!(reader.read_extension_label().unwrap().0, 0xF9);
    // The record it announces does not exist before 89a.
    assert!(matches!(
        reader.read_graphic_control_extension(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn graphic_control_at_89a() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xF9, 0x04, 0x09, 0xF4, 0x01, 0x07, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::GraphicControlExtension);
    let control = reader.read_graphic_control_extension().unwrap();
    assert_eq!(control.dispose, DisposalMethod::Background);
    assert!(control.has_transparency);
    assert!(!control.needs_user_input);
    assert_eq!(control.delay, 500);
    assert_eq!(control.transparent_color_index, 7);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn graphic_control_reserved_bits() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xF9, 0x04, 0xE0, 0x00, 0x00, 0x00, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    assert!(matches!(
        reader.read_graphic_control_extension(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn graphic_control_bad_disposal() {
    // Disposal method 4 is reserved under 89a.
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xF9, 0x04, 0x10, 0x00, 0x00, 0x00, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    assert!(matches!(
        reader.read_graphic_control_extension(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn graphic_control_bad_block_size() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x21, 0xF9, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    assert!(matches!(
        reader.read_graphic_control_extension(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn unknown_label_rejected_up_to_89a() {
    let data = stream(&[b"GIF89a", &[0; 7], &[0x21, 0xAB, 0x00, 0x3B]]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::ExtensionLabel);
    assert!(matches!(
        reader.read_extension_label(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn unknown_label_accepted_on_future_version() {
    let data = stream(&[
        b"GIF90a",
        &[0; 7],
        &[0x21, 0xAB, 0x03, 1, 2, 3, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    let version = reader.read_header().unwrap();
    assert!(version.is_future());
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.read_extension_label().unwrap().0, 0xAB);
    assert_eq!(reader.peek_part().unwrap(), Part::Subblock);
    assert_eq!(
        reader.read_subblock().unwrap().as_deref(),
        Some(&[1, 2, 3][..])
    );
    assert_eq!(reader.read_subblock().unwrap(), None);
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
}

#[test]
fn future_version_skips_reserved_validation() {
    // Image descriptor reserved bits and an out-of-range disposal method
    // are tolerated under versions newer than 89a.
    let data = stream(&[
        b"GIF90a",
        &[0; 7],
        &[0x21, 0xF9, 0x04, 0x1C, 0x00, 0x00, 0x00, 0x00],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0b0001_1000],
        &[0x02, 0x02, 0x44, 0x01, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.read_extension_label().unwrap();
    let control = reader.read_graphic_control_extension().unwrap();
    assert_eq!(control.dispose, DisposalMethod::Any);
    assert_eq!(reader.peek_part().unwrap(), Part::ImageDescriptor);
    let desc = reader.read_image_descriptor().unwrap();
    assert_eq!(desc.reserved, 0b11);
    assert_eq!(reader.read_image_data().unwrap(), [0x00]);
}

#[test]
fn reserved_image_descriptor_bits_rejected_at_89a() {
    let data = stream(&[
        b"GIF89a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0b0001_1000],
        &[0x02, 0x02, 0x44, 0x01, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    assert!(matches!(
        reader.read_image_descriptor(),
        Err(Error::Malformed(_))
    ));
}

#[test]
fn unknown_block_label() {
    let data = stream(&[b"GIF87a", &[0; 7], &[0x42]]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert!(matches!(reader.peek_part(), Err(Error::Malformed(_))));
    assert!(matches!(reader.peek_part(), Err(Error::InvalidState)));
}

#[test]
fn phase_guards_do_not_mutate() {
    let data = stream(&[b"GIF87a", &[0; 7], &[0x3B]]);
    let mut reader = Reader::new(&data[..]);

    // Illegal calls keep failing identically and the stream stays intact.
    assert!(matches!(
        reader.read_logical_screen_descriptor(),
        Err(Error::InvalidState)
    ));
    assert!(matches!(
        reader.read_logical_screen_descriptor(),
        Err(Error::InvalidState)
    ));
    assert!(matches!(reader.read_image_data(), Err(Error::InvalidState)));
    assert!(matches!(
        reader.read_extension_label(),
        Err(Error::InvalidState)
    ));

    assert_eq!(reader.read_header().unwrap(), Version::V87A);
    assert!(matches!(reader.read_header(), Err(Error::InvalidState)));
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
    assert!(matches!(reader.read_header(), Err(Error::InvalidState)));
}

#[test]
fn lzw_overflow_rejected() {
    // The code stream expands to two pixels, the descriptor allows one.
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0],
        &[0x02, 0x02, 0x04, 0x0A, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    assert!(matches!(
        reader.read_image_data(),
        Err(Error::Malformed("too much image data"))
    ));
}

#[test]
fn lzw_underflow_rejected() {
    // The code stream carries one pixel, the descriptor wants two.
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 2, 0, 1, 0, 0],
        &[0x02, 0x02, 0x44, 0x01, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    assert!(matches!(
        reader.read_image_data(),
        Err(Error::Malformed("too little image data"))
    ));
}

#[test]
fn lzw_invalid_code_rejected() {
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0],
        &[0x02, 0x01, 0x07, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    assert!(matches!(
        reader.read_image_data(),
        Err(Error::Malformed("invalid LZW code"))
    ));
}

#[test]
fn bad_minimum_code_size() {
    for bad in [0x01u8, 0x09, 0x0C] {
        let data = stream(&[
            b"GIF87a",
            &[0; 7],
            &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0],
            &[bad, 0x02, 0x44, 0x01, 0x00],
            &[0x3B],
        ]);
        let mut reader = Reader::new(&data[..]);
        reader.read_header().unwrap();
        reader.read_logical_screen_descriptor().unwrap();
        reader.peek_part().unwrap();
        reader.read_image_descriptor().unwrap();
        assert!(matches!(
            reader.read_image_data(),
            Err(Error::Malformed("minimum code size out of range"))
        ));
    }
}

#[test]
fn memory_limit_is_enforced_without_poisoning() {
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0],
        &[0x02, 0x03, 0x44, 0x34, 0x05, 0x00],
        &[0x3B],
    ]);
    let mut options = Reader::<&[u8]>::build();
    options.set_memory_limit(MemoryLimit::Bytes(3.try_into().unwrap()));
    let mut reader = options.open(&data[..]);

    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();
    assert!(matches!(
        reader.read_image_data(),
        Err(Error::InvalidArgument(_))
    ));
    // The failed call did not consume input; decoding into a caller
    // buffer still works.
    let mut pixels = [0u8; 4];
    reader.read_image_data_into(&mut pixels).unwrap();
    assert_eq!(pixels, [0, 1, 2, 3]);
}

#[test]
fn read_into_buffer_checks_length() {
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 2, 0, 2, 0, 0],
        &[0x02, 0x03, 0x44, 0x34, 0x05, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    reader.read_image_descriptor().unwrap();

    let mut small = [0u8; 3];
    assert!(matches!(
        reader.read_image_data_into(&mut small),
        Err(Error::InvalidArgument(_))
    ));
    let mut pixels = [0u8; 4];
    reader.read_image_data_into(&mut pixels).unwrap();
    assert_eq!(pixels, [0, 1, 2, 3]);
}

#[test]
fn into_inner_returns_the_stream() {
    let data = stream(&[b"GIF87a", &[0; 7], &[0x3B], b"extra"]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    assert_eq!(reader.peek_part().unwrap(), Part::Trailer);
    assert_eq!(reader.into_inner(), b"extra");
}

#[test]
fn local_color_table() {
    let palette: Vec<u8> = (100..112).collect();
    let data = stream(&[
        b"GIF87a",
        &[0; 7],
        &[0x2C, 0, 0, 0, 0, 1, 0, 1, 0, 0b1000_0001],
        &palette,
        &[0x02, 0x02, 0x44, 0x01, 0x00],
        &[0x3B],
    ]);
    let mut reader = Reader::new(&data[..]);
    reader.read_header().unwrap();
    reader.read_logical_screen_descriptor().unwrap();
    reader.peek_part().unwrap();
    let desc = reader.read_image_descriptor().unwrap();
    assert_eq!(desc.local_color_table_len(), Some(4));
    assert_eq!(reader.peek_part().unwrap(), Part::ColorTable);
    assert_eq!(reader.read_color_table().unwrap(), palette);
    assert_eq!(reader.active_color_table_size(), 4);
    assert_eq!(reader.read_image_data().unwrap(), [0x00]);
    assert_eq!(reader.global_color_table_size(), None);
}

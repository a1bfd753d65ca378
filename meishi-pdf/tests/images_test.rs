use meishi_pdf::{ImageFormat, PdfDocument};

fn encode_png(width: u32, height: u32, color: png::ColorType, pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(color);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(pixels).unwrap();
    }
    out
}

fn rgb_png() -> Vec<u8> {
    encode_png(2, 2, png::ColorType::Rgb, &[255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255])
}

fn rgba_png() -> Vec<u8> {
    encode_png(1, 2, png::ColorType::Rgba, &[0, 0, 0, 255, 255, 255, 255, 0])
}

fn minimal_jpeg(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(3);
    data.extend_from_slice(&[0u8; 9]);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

fn uncompressed() -> PdfDocument<Vec<u8>> {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_compression(false);
    doc
}

// -------------------------------------------------------
// Loading
// -------------------------------------------------------

#[test]
fn load_png_reports_pixel_size() {
    let mut doc = uncompressed();
    let img = doc.load_image_bytes_as(rgb_png(), ImageFormat::Png).unwrap();
    assert_eq!((img.width, img.height), (2, 2));
}

#[test]
fn load_jpeg_reports_pixel_size() {
    let mut doc = uncompressed();
    let img = doc.load_image_bytes_as(minimal_jpeg(300, 200), ImageFormat::Jpeg).unwrap();
    assert_eq!((img.width, img.height), (300, 200));
    assert_eq!(img.scaled(0.5), (150.0, 100.0));
}

#[test]
fn mismatched_decoder_is_an_error() {
    let mut doc = uncompressed();
    assert!(doc.load_image_bytes_as(minimal_jpeg(8, 8), ImageFormat::Png).is_err());
    assert!(doc.load_image_bytes_as(rgb_png(), ImageFormat::Jpeg).is_err());
}

#[test]
fn garbage_bytes_are_rejected() {
    let mut doc = uncompressed();
    assert!(doc.load_image_bytes_as(vec![0x00, 0x01, 0x02, 0x03], ImageFormat::Png).is_err());
    assert!(doc.load_image_bytes_as(vec![0x00, 0x01, 0x02, 0x03], ImageFormat::Jpeg).is_err());
}

// -------------------------------------------------------
// Output
// -------------------------------------------------------

#[test]
fn jpeg_uses_dctdecode() {
    let mut doc = uncompressed();
    let img = doc.load_image_bytes_as(minimal_jpeg(16, 16), ImageFormat::Jpeg).unwrap();
    doc.begin_page(200.0, 100.0).unwrap();
    doc.place_image(&img, 10.0, 20.0, 16.0, 16.0).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Subtype /Image"));
    assert!(output.contains("/Filter /DCTDecode"));
    assert!(output.contains("/ColorSpace /DeviceRGB"));
}

#[test]
fn rgba_png_gets_smask() {
    let mut doc = uncompressed();
    let img = doc.load_image_bytes_as(rgba_png(), ImageFormat::Png).unwrap();
    doc.begin_page(200.0, 100.0).unwrap();
    doc.place_image(&img, 0.0, 0.0, 10.0, 20.0).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/SMask"));
    assert!(output.contains("/ColorSpace /DeviceGray"));
}

#[test]
fn place_image_emits_cm_and_do() {
    let mut doc = uncompressed();
    let img = doc.load_image_bytes_as(rgb_png(), ImageFormat::Png).unwrap();
    doc.begin_page(200.0, 100.0).unwrap();
    doc.place_image(&img, 12.5, 30.0, 40.0, 25.0).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("q\n40 0 0 25 12.5 30 cm\n/Im1 Do\nQ\n"));
    assert!(output.contains("/XObject << /Im1 "));
}

#[test]
fn unused_image_is_not_in_page_resources() {
    let mut doc = uncompressed();
    doc.load_image_bytes_as(rgb_png(), ImageFormat::Png).unwrap();
    doc.begin_page(200.0, 100.0).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/Subtype /Image"));
    assert!(!output.contains("/XObject <<"));
}

#[test]
fn png_samples_are_compressed_by_default() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.load_image_bytes_as(rgb_png(), ImageFormat::Png).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode"));
}

#[test]
fn adobe_cmyk_jpeg_gets_inverting_decode_array() {
    let mut data = minimal_jpeg(8, 8);
    data[11] = 4;
    let app14 = [0xFF, 0xEE, 0x00, 0x0E, b'A', b'd', b'o', b'b', b'e', 0, 100, 0, 0, 0, 0, 2];
    data.splice(2..2, app14);

    let mut doc = uncompressed();
    doc.load_image_bytes_as(data, ImageFormat::Jpeg).unwrap();
    let bytes = doc.end_document().unwrap();
    let output = String::from_utf8_lossy(&bytes);
    assert!(output.contains("/ColorSpace /DeviceCMYK"));
    assert!(output.contains("/Decode [1 0 1 0 1 0 1 0]"));
}

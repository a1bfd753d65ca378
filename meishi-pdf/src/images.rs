use crate::error::{PdfError, Result};

/// Opaque handle to an image embedded in a PdfDocument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub usize);

impl ImageId {
    /// Resource name in content streams (e.g. "Im1").
    pub(crate) fn pdf_name(&self) -> String {
        format!("Im{}", self.0 + 1)
    }
}

/// An embedded image together with its pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

impl ImageHandle {
    /// Display size in points with a uniform scale factor,
    /// one pixel per point at scale 1.
    pub fn scaled(&self, scale: f64) -> (f64, f64) {
        (self.width as f64 * scale, self.height as f64 * scale)
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// PDF color space for image data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
    DeviceCMYK,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Decoded image data ready for embedding.
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub color_space: ColorSpace,
    /// Raw 8-bit pixel data (PNG) or the untouched JPEG bytes.
    pub data: Vec<u8>,
    /// Separate 8-bit alpha channel, if present.
    pub smask_data: Option<Vec<u8>>,
    /// CMYK samples stored inverted (Adobe APP14), needing `/Decode [1 0 ...]`.
    pub inverted: bool,
}

/// Decode image bytes with the decoder for `format`.
///
/// The caller picks the decoder; bytes that do not match it are
/// reported as a decode error rather than re-sniffed.
pub fn load_image_as(data: Vec<u8>, format: ImageFormat) -> Result<ImageData> {
    match format {
        ImageFormat::Jpeg => parse_jpeg(data),
        ImageFormat::Png => parse_png(data),
    }
}

/// Read JPEG dimensions from the SOF marker.
/// JPEG data is embedded as-is (DCTDecode); no pixel decoding needed.
fn parse_jpeg(data: Vec<u8>) -> Result<ImageData> {
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::Image("missing JPEG SOI marker".to_string()));
    }
    let (width, height, components) = jpeg_dimensions(&data)?;
    let color_space = match components {
        1 => ColorSpace::DeviceGray,
        3 => ColorSpace::DeviceRGB,
        4 => ColorSpace::DeviceCMYK,
        n => {
            return Err(PdfError::Image(format!(
                "unsupported JPEG component count: {} (expected 1, 3 or 4)",
                n
            )))
        }
    };
    let inverted = color_space == ColorSpace::DeviceCMYK && has_adobe_marker(&data);

    Ok(ImageData {
        width,
        height,
        format: ImageFormat::Jpeg,
        color_space,
        data,
        smask_data: None,
        inverted,
    })
}

/// Photoshop writes CMYK JPEGs with an APP14 "Adobe" segment and
/// inverted samples.
fn has_adobe_marker(data: &[u8]) -> bool {
    data.windows(9).any(|w| w[0] == 0xFF && w[1] == 0xEE && &w[4..9] == b"Adobe")
}

/// Scan JPEG segments for SOF0-SOF3 and extract width/height/components.
fn jpeg_dimensions(data: &[u8]) -> Result<(u32, u32, u8)> {
    let len = data.len();
    let mut i = 0;
    while i + 1 < len {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        // SOF0..SOF3: baseline, extended, progressive, lossless
        if (0xC0..=0xC3).contains(&marker) {
            if i + 9 >= len {
                return Err(PdfError::Image("JPEG SOF marker truncated".to_string()));
            }
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }
        // Fill bytes and stuffed zeros
        if marker == 0xFF || marker == 0x00 {
            i += 1;
            continue;
        }
        // Standalone markers carry no length
        if marker == 0xD8 || marker == 0xD9 || (0xD0..=0xD7).contains(&marker) {
            i += 2;
            continue;
        }
        if i + 3 >= len {
            break;
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    Err(PdfError::Image("no SOF marker found in JPEG data".to_string()))
}

/// Decode PNG with the `png` crate into 8-bit samples.
fn parse_png(data: Vec<u8>) -> Result<ImageData> {
    let mut decoder = png::Decoder::new(data.as_slice());
    // Expand palettes and low bit depths, strip 16-bit to 8-bit.
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| PdfError::Image(format!("PNG decode error: {}", e)))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| PdfError::Image(format!("PNG frame error: {}", e)))?;
    buf.truncate(info.buffer_size());

    let (color_space, data, smask_data) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf, None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 4);
            (ColorSpace::DeviceRGB, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 2);
            (ColorSpace::DeviceGray, gray, Some(alpha))
        }
        other => {
            return Err(PdfError::Image(format!(
                "unsupported PNG color type: {:?}",
                other
            )))
        }
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        format: ImageFormat::Png,
        color_space,
        data,
        smask_data,
        inverted: false,
    })
}

/// Split interleaved samples into color channels and a trailing alpha channel.
fn split_alpha(buf: &[u8], channels: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = buf.len() / channels;
    let mut color = Vec::with_capacity(pixels * (channels - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(channels) {
        color.extend_from_slice(&px[..channels - 1]);
        alpha.push(px[channels - 1]);
    }
    (color, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

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

    /// SOI followed by a baseline SOF0 segment and EOI.
    fn minimal_jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xC0, 0x00, 0x11, 0x08];
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&width.to_be_bytes());
        data.push(components);
        data.extend_from_slice(&[0u8; 9]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    #[test]
    fn jpeg_dimensions_from_sof() {
        let img = load_image_as(minimal_jpeg(640, 480, 3), ImageFormat::Jpeg).unwrap();
        assert_eq!((img.width, img.height), (640, 480));
        assert_eq!(img.color_space, ColorSpace::DeviceRGB);
        assert!(img.smask_data.is_none());
    }

    #[test]
    fn cmyk_jpeg_maps_to_device_cmyk() {
        let img = load_image_as(minimal_jpeg(4, 4, 4), ImageFormat::Jpeg).unwrap();
        assert_eq!(img.color_space, ColorSpace::DeviceCMYK);
        assert!(!img.inverted);
    }

    #[test]
    fn adobe_cmyk_jpeg_is_inverted() {
        let mut data = minimal_jpeg(4, 4, 4);
        let app14 = [0xFF, 0xEE, 0x00, 0x0E, b'A', b'd', b'o', b'b', b'e', 0, 100, 0, 0, 0, 0, 2];
        data.splice(2..2, app14);
        let img = load_image_as(data, ImageFormat::Jpeg).unwrap();
        assert_eq!(img.color_space, ColorSpace::DeviceCMYK);
        assert!(img.inverted);
    }

    #[test]
    fn five_component_jpeg_is_rejected() {
        assert!(load_image_as(minimal_jpeg(4, 4, 5), ImageFormat::Jpeg).is_err());
    }

    #[test]
    fn png_bytes_fail_the_jpeg_decoder() {
        let png = encode_png(1, 1, png::ColorType::Rgb, &[0, 0, 0]);
        assert!(load_image_as(png, ImageFormat::Jpeg).is_err());
    }

    #[test]
    fn rgba_png_splits_alpha() {
        let pixels = [10, 20, 30, 255, 40, 50, 60, 0];
        let img = load_image_as(encode_png(2, 1, png::ColorType::Rgba, &pixels), ImageFormat::Png)
            .unwrap();
        assert_eq!(img.color_space, ColorSpace::DeviceRGB);
        assert_eq!(img.data, vec![10, 20, 30, 40, 50, 60]);
        assert_eq!(img.smask_data, Some(vec![255, 0]));
    }

    #[test]
    fn grayscale_png_has_no_mask() {
        let img = load_image_as(
            encode_png(2, 2, png::ColorType::Grayscale, &[0, 64, 128, 255]),
            ImageFormat::Png,
        )
        .unwrap();
        assert_eq!(img.color_space, ColorSpace::DeviceGray);
        assert_eq!(img.data.len(), 4);
        assert!(img.smask_data.is_none());
    }

    #[test]
    fn handle_scales_pixels_to_points() {
        let handle = ImageHandle { id: ImageId(0), width: 400, height: 300 };
        assert_eq!(handle.scaled(0.5), (200.0, 150.0));
        assert_eq!(ImageId(0).pdf_name(), "Im1");
    }
}

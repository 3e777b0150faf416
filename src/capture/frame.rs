//! Preview frame encoding

use super::traits::{CaptureError, CaptureResult, PreviewFrame};

/// Encode an RGB8 frame as PNG for the webview
pub fn encode_png(frame: &PreviewFrame) -> CaptureResult<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.width == 0 || frame.height == 0 || frame.rgb.len() != expected {
        return Err(CaptureError::InvalidFrame(format!(
            "{}x{} frame with {} bytes (expected {})",
            frame.width,
            frame.height,
            frame.rgb.len(),
            expected
        )));
    }

    let mut out = Vec::with_capacity(expected / 2);
    {
        let mut encoder = png::Encoder::new(&mut out, frame.width, frame.height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&frame.rgb)?;
        writer.finish()?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_encode_png() {
        let frame = PreviewFrame {
            width: 4,
            height: 2,
            rgb: vec![128; 4 * 2 * 3],
        };
        let bytes = encode_png(&frame).unwrap();
        assert_eq!(&bytes[..8], &PNG_SIGNATURE);

        let decoder = png::Decoder::new(bytes.as_slice());
        let reader = decoder.read_info().unwrap();
        assert_eq!(reader.info().width, 4);
        assert_eq!(reader.info().height, 2);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let frame = PreviewFrame {
            width: 4,
            height: 2,
            rgb: vec![0; 5],
        };
        assert!(matches!(encode_png(&frame), Err(CaptureError::InvalidFrame(_))));
    }
}

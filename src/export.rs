use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::ViewerError;

/// Writes a captured frame as PNG, replacing any existing file
pub fn save_png(frame: &RgbaImage, path: &Path) -> Result<(), ViewerError> {
    frame
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ViewerError::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!(
        "Saved {}x{} screenshot to {}",
        frame.width(),
        frame.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_save_png_writes_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("screenshot.png");
        let frame = RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]));

        save_png(&frame, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_save_png_reports_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("screenshot.png");
        let frame = RgbaImage::new(1, 1);
        assert!(matches!(
            save_png(&frame, &path),
            Err(ViewerError::Encode { .. })
        ));
    }
}

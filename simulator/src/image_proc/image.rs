use image::{GrayImage, ImageError, Luma};
use ndarray::Array2;
use std::path::Path;

/// Converts a canvas to an `image::GrayImage`
///
/// Array indices `[row, col]` map to pixel coordinates `(col, row)`, so the
/// image comes out `width x height` for a `(height, width)` canvas.
pub fn canvas_to_gray_image(canvas: &Array2<u8>) -> GrayImage {
    let (height, width) = canvas.dim();
    GrayImage::from_fn(width as u32, height as u32, |x, y| {
        Luma([canvas[[y as usize, x as usize]]])
    })
}

/// Write a canvas to disk, inferring the format from the extension.
///
/// # Arguments
/// * `canvas` - 8-bit canvas indexed `[row, col]`
/// * `path` - Output file; `.png` writes a grayscale PNG
pub fn save_canvas<P: AsRef<Path>>(canvas: &Array2<u8>, path: P) -> Result<(), ImageError> {
    canvas_to_gray_image(canvas).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation() {
        let mut canvas = Array2::zeros((2, 3));
        canvas[[1, 2]] = 200;
        let img = canvas_to_gray_image(&canvas);
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1)[0], 200);
        assert_eq!(img.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let mut canvas = Array2::zeros((8, 8));
        canvas[[4, 4]] = 255;
        save_canvas(&canvas, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_luma8();
        assert_eq!(loaded.get_pixel(4, 4)[0], 255);
    }
}

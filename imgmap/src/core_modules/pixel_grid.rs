// THEORY:
// The `PixelGrid` is the run's read-only view of the image: width, height and one
// packed integer per pixel, stored row by row starting at the top-left corner.
// It is a "dumb" data container. It knows how to be built from a decoded image
// and how to answer "what is the value at (column, row)", nothing more.
//
// Packing: every image is converted to 8-bit RGBA and each pixel becomes
// `0xAARRGGBB` read as a signed 32-bit integer. The heat-map side treats that
// integer as opaque, so the only requirement is that the same colour always
// produces the same value.

pub mod pixel_grid {
    use crate::error::{ImgMapError, ImgMapResult};
    use image::{ImageError, ImageReader, RgbaImage};
    use std::io;
    use std::path::Path;

    pub type PackedPixel = i32;

    /// Packs an `[r, g, b, a]` pixel as `0xAARRGGBB`.
    pub fn pack_argb([red, green, blue, alpha]: [u8; 4]) -> PackedPixel {
        i32::from_be_bytes([alpha, red, green, blue])
    }

    /// A width x height grid of packed pixel values in row-major order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct PixelGrid {
        /// The width of the image in pixels.
        width: u32,
        /// The height of the image in pixels.
        height: u32,
        /// Row-major pixel values, `width * height` of them.
        pixels: Vec<PackedPixel>,
    }

    impl PixelGrid {
        /// Builds a grid from row-major values. Returns `None` when the number of
        /// values does not match `width * height`.
        pub fn new(width: u32, height: u32, pixels: Vec<PackedPixel>) -> Option<Self> {
            let expected = u64::from(width) * u64::from(height);
            if pixels.len() as u64 != expected {
                return None;
            }
            Some(Self { width, height, pixels })
        }

        /// Converts a decoded RGBA image, packing each pixel.
        pub fn from_rgba(image: &RgbaImage) -> Self {
            let (width, height) = image.dimensions();
            let pixels = image.pixels().map(|pixel| pack_argb(pixel.0)).collect();
            Self { width, height, pixels }
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Total number of pixels.
        pub fn len(&self) -> u64 {
            self.pixels.len() as u64
        }

        pub fn is_empty(&self) -> bool {
            self.pixels.is_empty()
        }

        /// The value at (`column`, `row`), or `None` outside the grid.
        pub fn get(&self, column: u32, row: u32) -> Option<PackedPixel> {
            if column >= self.width || row >= self.height {
                return None;
            }
            Some(self.pixels[self.offset(column, row)])
        }

        /// The value at (`column`, `row`).
        ///
        /// Panics if the coordinate is outside the grid.
        pub fn pixel(&self, column: u32, row: u32) -> PackedPixel {
            assert!(
                column < self.width && row < self.height,
                "pixel ({column}, {row}) outside {}x{} grid",
                self.width,
                self.height
            );
            self.pixels[self.offset(column, row)]
        }

        fn offset(&self, column: u32, row: u32) -> usize {
            row as usize * self.width as usize + column as usize
        }
    }

    /// Decodes the image file at `path` into a grid. The format is sniffed from
    /// the file contents, so the extension does not have to match.
    pub fn decode(path: &Path) -> ImgMapResult<PixelGrid> {
        let decode_error = |source: ImageError| ImgMapError::Decode {
            path: path.to_path_buf(),
            source,
        };
        let image = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => ImgMapError::FileNotFound(path.to_path_buf()),
                _ => decode_error(ImageError::IoError(err)),
            })?
            .decode()
            .map_err(decode_error)?;
        Ok(PixelGrid::from_rgba(&image.to_rgba8()))
    }
}

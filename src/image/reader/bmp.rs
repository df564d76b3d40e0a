use std::io::{self, Read};

use super::super::header::{
    row_stride, BitmapFileHeader, BitmapInfoHeader, BYTES_PER_PIXEL, PIXEL_DATA_OFFSET,
};
use super::super::{BitmapOptions, Image, ImageReader};
use crate::color::Color;
use crate::error::Error;

const HEADER_EXTENSION_SECTION: &str = "info header extension";
const PIXEL_DATA_GAP_SECTION: &str = "gap before pixel data";
const PIXEL_DATA_SECTION: &str = "pixel data";

/// Reads uncompressed 24-bit bitmaps
pub struct BMPImageReader<T: Read> {
    reader: T,
    options: BitmapOptions,
}

impl<T: Read> BMPImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self::with_options(reader, BitmapOptions::default())
    }

    pub fn with_options(reader: T, options: BitmapOptions) -> Self {
        Self { reader, options }
    }
}

impl<T: Read> ImageReader for BMPImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Image> {
        let file_header = BitmapFileHeader::read_from(&mut self.reader)?;
        let info_header = BitmapInfoHeader::read_from(&mut self.reader)?;
        info_header.check_supported()?;
        let (width, height) = info_header.dimensions()?;
        self.skip_to_pixel_data(&file_header, &info_header)?;
        let image = self.read_pixel_data(width, height)?;
        log::info!("Bitmap read: {}x{} pixels", width, height);
        Ok(image)
    }
}

impl<T: Read> BMPImageReader<T> {
    fn skip_to_pixel_data(
        &mut self,
        file_header: &BitmapFileHeader,
        info_header: &BitmapInfoHeader,
    ) -> crate::Result<()> {
        let extension_size = info_header.extension_size()?;
        self.skip(extension_size as u64, HEADER_EXTENSION_SECTION)?;
        let headers_end = PIXEL_DATA_OFFSET as u64 + extension_size as u64;
        let gap = (file_header.pixel_data_offset as u64)
            .checked_sub(headers_end)
            .ok_or(Error::InvalidFormat("pixel data offset points into the headers"))?;
        self.skip(gap, PIXEL_DATA_GAP_SECTION)
    }

    fn skip(&mut self, length: u64, section: &'static str) -> crate::Result<()> {
        if length == 0 {
            return Ok(());
        }
        log::warn!("Skipping {} bytes of {}", length, section);
        let skipped = io::copy(&mut self.reader.by_ref().take(length), &mut io::sink())
            .map_err(|e| Error::from_read_error(e, section))?;
        if skipped < length {
            return Err(Error::TruncatedData(section));
        }
        Ok(())
    }

    /// Reads `height` padded rows of blue, green, red samples
    ///
    /// Buffers only grow with the bytes actually read and rows are
    /// rearranged once all of them are in, so a truncated file with a
    /// huge header fails before the whole image has been allocated.
    fn read_pixel_data(&mut self, width: u32, height: u32) -> crate::Result<Image> {
        let row_length = width as usize;
        let stride = row_stride(width);
        let mut row_buffer = Vec::new();
        let mut file_rows: Vec<Color> = Vec::new();
        for _ in 0..height {
            row_buffer.clear();
            let read = self
                .reader
                .by_ref()
                .take(stride as u64)
                .read_to_end(&mut row_buffer)
                .map_err(|e| Error::from_read_error(e, PIXEL_DATA_SECTION))?;
            if read < stride {
                return Err(Error::TruncatedData(PIXEL_DATA_SECTION));
            }
            file_rows.extend(
                row_buffer
                    .chunks_exact(BYTES_PER_PIXEL)
                    .take(row_length)
                    .map(|sample| Color::from_bgr(&[sample[0], sample[1], sample[2]])),
            );
        }
        let mut image = Image::new(width, height)?;
        for (file_row, dots) in file_rows.chunks_exact(row_length).enumerate() {
            let row = self.options.row_order.image_row(file_row as u32, height) as usize;
            image.dots[row * row_length..(row + 1) * row_length].copy_from_slice(dots);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod test {
    use super::BMPImageReader;
    use crate::{
        color::Color,
        error::Error,
        image::{BitmapOptions, ImageReader, RowOrder},
        Result,
    };

    #[rustfmt::skip]
    const BLACK_1X1: &[u8] = &[
        b'B', b'M', 58, 0, 0, 0, 0, 0, 0, 0, 54, 0, 0, 0,
        40, 0, 0, 0,
        1, 0, 0, 0,
        1, 0, 0, 0,
        1, 0, 24, 0,
        0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0x00, 0x00, 0x00,  0x00,
    ];

    /// 2x2: file row 0 is red, blue; file row 1 is green, white
    #[rustfmt::skip]
    const COLORED_2X2: &[u8] = &[
        b'B', b'M', 70, 0, 0, 0, 0, 0, 0, 0, 54, 0, 0, 0,
        40, 0, 0, 0,
        2, 0, 0, 0,
        2, 0, 0, 0,
        1, 0, 24, 0,
        0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0x00, 0x00, 0xFF,  0xFF, 0x00, 0x00,  0xAA, 0xBB,
        0x00, 0xFF, 0x00,  0xFF, 0xFF, 0xFF,  0xCC, 0xDD,
    ];

    fn read(bytes: &[u8]) -> Result<crate::image::Image> {
        BMPImageReader::new(bytes).read_image()
    }

    fn with_field(bytes: &[u8], offset: usize, field: &[u8]) -> Vec<u8> {
        let mut bytes = bytes.to_vec();
        bytes[offset..offset + field.len()].copy_from_slice(field);
        bytes
    }

    #[test]
    fn read_black_pixel() {
        let image = read(BLACK_1X1).unwrap();
        assert_eq!(image.width(), 1);
        assert_eq!(image.height(), 1);
        assert_eq!(image.get_color(0, 0).unwrap(), Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn read_rows_in_file_order() {
        let image = read(COLORED_2X2).unwrap();
        assert_eq!(image.get_color(0, 0).unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(image.get_color(1, 0).unwrap(), Color::new(0.0, 0.0, 1.0));
        assert_eq!(image.get_color(0, 1).unwrap(), Color::new(0.0, 1.0, 0.0));
        assert_eq!(image.get_color(1, 1).unwrap(), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn read_rows_bottom_up() {
        let options = BitmapOptions {
            row_order: RowOrder::BottomUp,
        };
        let image = BMPImageReader::with_options(COLORED_2X2, options)
            .read_image()
            .unwrap();
        assert_eq!(image.get_color(0, 1).unwrap(), Color::new(1.0, 0.0, 0.0));
        assert_eq!(image.get_color(1, 0).unwrap(), Color::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn file_size_field_is_not_checked() {
        let bytes = with_field(COLORED_2X2, 2, &[0xFF, 0xFF, 0, 0]);
        assert!(read(&bytes).is_ok());
    }

    #[test]
    fn reject_wrong_magic() {
        let bytes = with_field(COLORED_2X2, 0, b"P6");
        assert!(matches!(read(&bytes), Err(Error::NotABitmap(_))));
    }

    #[test]
    fn reject_wrong_magic_in_short_stream() {
        let mut image = crate::image::Image::new(1, 1).unwrap();
        let before = image.clone();
        for bytes in [&b"XY"[..], &b"P"[..]] {
            assert!(
                matches!(image.decode_bytes(bytes), Err(Error::NotABitmap(_))),
                "{:?} was not rejected",
                bytes
            );
            assert_eq!(image, before);
        }
    }

    #[test]
    fn reject_other_bit_depths() {
        let bytes = with_field(COLORED_2X2, 28, &[32, 0]);
        assert!(matches!(
            read(&bytes),
            Err(Error::UnsupportedBitsPerPixel(32))
        ));
    }

    #[test]
    fn reject_compression() {
        let bytes = with_field(COLORED_2X2, 30, &[1, 0, 0, 0]);
        assert!(matches!(
            read(&bytes),
            Err(Error::UnsupportedCompression(1))
        ));
    }

    #[test]
    fn reject_non_positive_dimensions() {
        let bytes = with_field(COLORED_2X2, 18, &[0, 0, 0, 0]);
        assert!(matches!(
            read(&bytes),
            Err(Error::InvalidDimensions(0, 2))
        ));
        let bytes = with_field(COLORED_2X2, 22, &(-2_i32).to_le_bytes());
        assert!(matches!(
            read(&bytes),
            Err(Error::InvalidDimensions(2, -2))
        ));
    }

    #[test]
    fn truncated_in_every_section() {
        for (length, section) in [
            (0, "file header"),
            (10, "file header"),
            (14, "info header"),
            (53, "info header"),
            (54, "pixel data"),
            (COLORED_2X2.len() - 1, "pixel data"),
        ] {
            match read(&COLORED_2X2[..length]) {
                Err(Error::TruncatedData(actual)) => {
                    assert_eq!(actual, section, "wrong section at length {}", length)
                }
                Err(e) => panic!("length {} failed with {}", length, e),
                Ok(_) => panic!("length {} was not detected as truncated", length),
            }
        }
    }

    #[test]
    fn skip_gap_before_pixel_data() {
        let mut bytes = with_field(COLORED_2X2, 10, &[58, 0, 0, 0]);
        bytes.splice(54..54, [0xEE; 4]);
        let image = read(&bytes).unwrap();
        assert_eq!(image, read(COLORED_2X2).unwrap());
    }

    #[test]
    fn skip_larger_info_header() {
        let mut bytes = with_field(COLORED_2X2, 10, &[62, 0, 0, 0]);
        bytes[14] = 48;
        bytes.splice(54..54, [0x11; 8]);
        let image = read(&bytes).unwrap();
        assert_eq!(image, read(COLORED_2X2).unwrap());
    }

    #[test]
    fn reject_offset_into_headers() {
        let bytes = with_field(COLORED_2X2, 10, &[40, 0, 0, 0]);
        assert!(matches!(read(&bytes), Err(Error::InvalidFormat(_))));
    }
}

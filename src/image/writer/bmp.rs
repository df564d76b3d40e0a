use std::io::Write;

use super::super::header::{row_padding, BitmapFileHeader, BitmapInfoHeader, BYTES_PER_PIXEL};
use super::super::{BitmapOptions, Image, ImageWriter};
use crate::error::Error;

/// Writes an image as an uncompressed 24-bit bitmap
pub struct BMPImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Image,
    options: BitmapOptions,
}

impl<'a, T: Write> BMPImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Image) -> Self {
        Self::with_options(writer, image, BitmapOptions::default())
    }

    pub fn with_options(writer: T, image: &'a Image, options: BitmapOptions) -> Self {
        Self {
            writer,
            image,
            options,
        }
    }

    fn write_file_header(&mut self) -> crate::Result<()> {
        BitmapFileHeader::for_dimensions(self.image.width, self.image.height)?
            .write_to(&mut self.writer)
            .map_err(Error::FailedToWriteFileHeader)
    }

    fn write_info_header(&mut self) -> crate::Result<()> {
        BitmapInfoHeader::for_dimensions(self.image.width, self.image.height)?
            .write_to(&mut self.writer)
            .map_err(Error::FailedToWriteInfoHeader)
    }

    /// Writes every row as blue, green, red samples followed by zero padding
    fn write_pixel_data(&mut self) -> crate::Result<()> {
        let padding = row_padding(self.image.width);
        let mut row_buffer =
            Vec::with_capacity(self.image.width as usize * BYTES_PER_PIXEL + padding);
        for file_row in 0..self.image.height {
            let row = self
                .options
                .row_order
                .image_row(file_row, self.image.height);
            row_buffer.clear();
            for dot in self.image.row(row) {
                row_buffer.extend_from_slice(&dot.to_bgr());
            }
            row_buffer.resize(row_buffer.len() + padding, 0);
            self.writer
                .write_all(&row_buffer)
                .map_err(Error::FailedToWritePixelData)?;
        }
        Ok(())
    }
}

impl<T: Write> ImageWriter for BMPImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        self.write_file_header()?;
        self.write_info_header()?;
        self.write_pixel_data()?;
        self.writer
            .flush()
            .map_err(Error::FailedToWritePixelData)?;
        log::info!(
            "Bitmap written: {}x{} pixels",
            self.image.width,
            self.image.height
        );
        Ok(())
    }
}

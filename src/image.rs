use std::io::{Read, Write};

use crate::color::Color;
use crate::error::Error;

use header::{row_stride, PIXEL_DATA_OFFSET};
use reader::bmp::BMPImageReader;
use writer::bmp::BMPImageWriter;

pub mod header;
pub mod reader;
pub mod writer;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<Image>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> crate::Result<()>;
}

/// How rows of the image buffer map onto rows of a bitmap file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// The first row in the file is row 0 of the image.
    ///
    /// Bitmaps written and read this way round-trip exactly, but
    /// appear upside down in other bitmap viewers.
    #[default]
    AsStored,
    /// The first row in the file is the bottom row of the image,
    /// as in standard bottom-up bitmaps.
    BottomUp,
}

impl RowOrder {
    pub fn image_row(&self, file_row: u32, height: u32) -> u32 {
        match self {
            Self::AsStored => file_row,
            Self::BottomUp => height - 1 - file_row,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapOptions {
    pub row_order: RowOrder,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    dots: Vec<Color>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> crate::Result<Self> {
        let length = Self::checked_length(width, height)?;
        Ok(Image {
            width,
            height,
            dots: vec![Color::default(); length],
        })
    }

    fn checked_length(width: u32, height: u32) -> crate::Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(width as i64, height as i64));
        }
        let length = (width as usize)
            .checked_mul(height as usize)
            .ok_or(Error::DimensionsTooLarge(width, height))?;
        match length.checked_mul(std::mem::size_of::<Color>()) {
            Some(size) if size <= isize::MAX as usize => Ok(length),
            _ => Err(Error::DimensionsTooLarge(width, height)),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get_color(&self, x: u32, y: u32) -> crate::Result<Color> {
        let index = self.index(x, y)?;
        Ok(self.dots[index])
    }

    pub fn set_color(&mut self, color: Color, x: u32, y: u32) -> crate::Result<()> {
        let index = self.index(x, y)?;
        self.dots[index] = color;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> crate::Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    fn row(&self, y: u32) -> &[Color] {
        let start = y as usize * self.width as usize;
        &self.dots[start..start + self.width as usize]
    }

    pub fn encoded_len(&self) -> usize {
        PIXEL_DATA_OFFSET as usize + row_stride(self.width) * self.height as usize
    }

    /// Replaces this image with the bitmap read from `reader`
    ///
    /// The image is left untouched if the bitmap can not be read.
    pub fn decode<R: Read>(&mut self, reader: R) -> crate::Result<()> {
        self.decode_with_options(reader, BitmapOptions::default())
    }

    pub fn decode_with_options<R: Read>(
        &mut self,
        reader: R,
        options: BitmapOptions,
    ) -> crate::Result<()> {
        *self = BMPImageReader::with_options(reader, options).read_image()?;
        Ok(())
    }

    pub fn decode_bytes(&mut self, bytes: &[u8]) -> crate::Result<()> {
        self.decode(bytes)
    }

    pub fn from_reader<R: Read>(reader: R) -> crate::Result<Self> {
        BMPImageReader::new(reader).read_image()
    }

    pub fn encode<W: Write>(&self, writer: W) -> crate::Result<()> {
        self.encode_with_options(writer, BitmapOptions::default())
    }

    pub fn encode_with_options<W: Write>(
        &self,
        writer: W,
        options: BitmapOptions,
    ) -> crate::Result<()> {
        BMPImageWriter::with_options(writer, self, options).write_image()
    }

    pub fn encode_to_vec(&self) -> crate::Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.encode(&mut bytes)?;
        Ok(bytes)
    }
}

//! An RGB image buffer with a reader and writer for uncompressed
//! 24-bit Windows bitmaps (BMP).
//!
//! Rows are written and read in the order they are kept in memory,
//! see [`RowOrder`] for reading and writing standard bottom-up files.

use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::Path,
};

pub use color::Color;
pub use error::Error;
pub use image::{
    header, reader::bmp::BMPImageReader, writer::bmp::BMPImageWriter, BitmapOptions, Image,
    ImageReader, ImageWriter, RowOrder,
};

mod color;
mod error;
mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e)
        })
}

pub fn read_bitmap_file<P: AsRef<Path>>(file_path: P) -> Result<Image> {
    read_bitmap_file_with_options(file_path, BitmapOptions::default())
}

pub fn read_bitmap_file_with_options<P: AsRef<Path>>(
    file_path: P,
    options: BitmapOptions,
) -> Result<Image> {
    let input_file = open_input_file(file_path.as_ref())?;
    let mut reader = BMPImageReader::with_options(BufReader::new(input_file), options);
    reader.read_image()
}

/// Writes `image` to `file_path`, replacing any existing file
///
/// A failed write leaves a partial file behind.
pub fn write_bitmap_file<P: AsRef<Path>>(image: &Image, file_path: P) -> Result<()> {
    write_bitmap_file_with_options(image, file_path, BitmapOptions::default())
}

pub fn write_bitmap_file_with_options<P: AsRef<Path>>(
    image: &Image,
    file_path: P,
    options: BitmapOptions,
) -> Result<()> {
    let output_file = open_output_file(file_path.as_ref())?;
    let mut writer = BMPImageWriter::with_options(BufWriter::new(output_file), image, options);
    writer.write_image()
}

//! Bitmap file header and info header (`BITMAPINFOHEADER`)
//!
//! Every field is stored little-endian. Only the layout used by
//! uncompressed 24-bit bitmaps is produced; when reading, the fields
//! are parsed as they are and checked separately.

use std::io::{self, Read, Write};
use std::num::TryFromIntError;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};

use crate::error::Error;
use crate::logger::log_header;

pub const MAGIC: [u8; 2] = *b"BM";
pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
pub const PIXEL_DATA_OFFSET: u32 = (FILE_HEADER_SIZE + INFO_HEADER_SIZE) as u32;
pub const BITS_PER_PIXEL: u16 = 24;
pub const BYTES_PER_PIXEL: usize = 3;
pub const COMPRESSION_NONE: u32 = 0;

const FILE_HEADER_SECTION: &str = "file header";
const INFO_HEADER_SECTION: &str = "info header";

/// Number of zero bytes appended to each row of `width` pixels
pub fn row_padding(width: u32) -> usize {
    (4 - (width as usize * BYTES_PER_PIXEL) % 4) % 4
}

pub fn row_stride(width: u32) -> usize {
    width as usize * BYTES_PER_PIXEL + row_padding(width)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub file_size: u32,
    pub reserved: u32,
    pub pixel_data_offset: u32,
}

impl BitmapFileHeader {
    pub fn for_dimensions(width: u32, height: u32) -> crate::Result<Self> {
        let file_size = row_stride(width)
            .checked_mul(height as usize)
            .and_then(|size| size.checked_add(PIXEL_DATA_OFFSET as usize))
            .and_then(|size| u32::try_from(size).ok())
            .ok_or(Error::DimensionsTooLarge(width, height))?;
        Ok(Self {
            file_size,
            reserved: 0,
            pixel_data_offset: PIXEL_DATA_OFFSET,
        })
    }

    /// Reads the header, rejecting a wrong magic before the rest of it
    ///
    /// A stream that ends inside the magic is only truncated if the
    /// bytes it did contain still match "BM".
    pub fn read_from<R: Read>(reader: &mut R) -> crate::Result<Self> {
        let mut magic = Vec::with_capacity(MAGIC.len());
        reader
            .by_ref()
            .take(MAGIC.len() as u64)
            .read_to_end(&mut magic)
            .map_err(|e| Error::from_read_error(e, FILE_HEADER_SECTION))?;
        if !MAGIC.starts_with(&magic) {
            let mut found = [0u8; 2];
            found[..magic.len()].copy_from_slice(&magic);
            return Err(Error::NotABitmap(found));
        }
        if magic.len() < MAGIC.len() {
            return Err(Error::TruncatedData(FILE_HEADER_SECTION));
        }
        let mut bytes = [0u8; FILE_HEADER_SIZE];
        bytes[..MAGIC.len()].copy_from_slice(&MAGIC);
        reader
            .read_exact(&mut bytes[MAGIC.len()..])
            .map_err(|e| Error::from_read_error(e, FILE_HEADER_SECTION))?;
        log_header(FILE_HEADER_SECTION, &bytes);
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8; FILE_HEADER_SIZE]) -> crate::Result<Self> {
        let magic = [bytes[0], bytes[1]];
        if magic != MAGIC {
            return Err(Error::NotABitmap(magic));
        }
        let mut fields = &bytes[2..];
        let read_error = |e: io::Error| Error::from_read_error(e, FILE_HEADER_SECTION);
        Ok(Self {
            file_size: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            reserved: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            pixel_data_offset: fields.read_u32::<LittleEndian>().map_err(read_error)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut bytes = [0u8; FILE_HEADER_SIZE];
        bytes[0..2].copy_from_slice(&MAGIC);
        LittleEndian::write_u32(&mut bytes[2..6], self.file_size);
        LittleEndian::write_u32(&mut bytes[6..10], self.reserved);
        LittleEndian::write_u32(&mut bytes[10..14], self.pixel_data_offset);
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let bytes = self.to_bytes();
        log_header(FILE_HEADER_SECTION, &bytes);
        writer.write_all(&bytes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub header_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
    pub horizontal_resolution: i32,
    pub vertical_resolution: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl BitmapInfoHeader {
    pub fn for_dimensions(width: u32, height: u32) -> crate::Result<Self> {
        let too_large = |_: TryFromIntError| Error::DimensionsTooLarge(width, height);
        Ok(Self {
            header_size: INFO_HEADER_SIZE as u32,
            width: i32::try_from(width).map_err(too_large)?,
            height: i32::try_from(height).map_err(too_large)?,
            planes: 1,
            bits_per_pixel: BITS_PER_PIXEL,
            compression: COMPRESSION_NONE,
            image_size: 0,
            horizontal_resolution: 0,
            vertical_resolution: 0,
            colors_used: 0,
            important_colors: 0,
        })
    }

    /// Reads the 40 byte header
    ///
    /// Extension bytes of larger headers (V4, V5) are not consumed,
    /// see [`BitmapInfoHeader::extension_size`].
    pub fn read_from<R: Read>(reader: &mut R) -> crate::Result<Self> {
        let mut bytes = [0u8; INFO_HEADER_SIZE];
        reader
            .read_exact(&mut bytes)
            .map_err(|e| Error::from_read_error(e, INFO_HEADER_SECTION))?;
        log_header(INFO_HEADER_SECTION, &bytes);
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8; INFO_HEADER_SIZE]) -> crate::Result<Self> {
        let mut fields = &bytes[..];
        let read_error = |e: io::Error| Error::from_read_error(e, INFO_HEADER_SECTION);
        Ok(Self {
            header_size: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            width: fields.read_i32::<LittleEndian>().map_err(read_error)?,
            height: fields.read_i32::<LittleEndian>().map_err(read_error)?,
            planes: fields.read_u16::<LittleEndian>().map_err(read_error)?,
            bits_per_pixel: fields.read_u16::<LittleEndian>().map_err(read_error)?,
            compression: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            image_size: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            horizontal_resolution: fields.read_i32::<LittleEndian>().map_err(read_error)?,
            vertical_resolution: fields.read_i32::<LittleEndian>().map_err(read_error)?,
            colors_used: fields.read_u32::<LittleEndian>().map_err(read_error)?,
            important_colors: fields.read_u32::<LittleEndian>().map_err(read_error)?,
        })
    }

    pub fn to_bytes(&self) -> [u8; INFO_HEADER_SIZE] {
        let mut bytes = [0u8; INFO_HEADER_SIZE];
        LittleEndian::write_u32(&mut bytes[0..4], self.header_size);
        LittleEndian::write_i32(&mut bytes[4..8], self.width);
        LittleEndian::write_i32(&mut bytes[8..12], self.height);
        LittleEndian::write_u16(&mut bytes[12..14], self.planes);
        LittleEndian::write_u16(&mut bytes[14..16], self.bits_per_pixel);
        LittleEndian::write_u32(&mut bytes[16..20], self.compression);
        LittleEndian::write_u32(&mut bytes[20..24], self.image_size);
        LittleEndian::write_i32(&mut bytes[24..28], self.horizontal_resolution);
        LittleEndian::write_i32(&mut bytes[28..32], self.vertical_resolution);
        LittleEndian::write_u32(&mut bytes[32..36], self.colors_used);
        LittleEndian::write_u32(&mut bytes[36..40], self.important_colors);
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let bytes = self.to_bytes();
        log_header(INFO_HEADER_SECTION, &bytes);
        writer.write_all(&bytes)
    }

    /// Bytes of the header beyond the 40 that [`BitmapInfoHeader::read_from`] consumed
    pub fn extension_size(&self) -> crate::Result<usize> {
        (self.header_size as usize)
            .checked_sub(INFO_HEADER_SIZE)
            .ok_or(Error::InvalidFormat("info header is smaller than 40 bytes"))
    }

    pub fn check_supported(&self) -> crate::Result<()> {
        if self.bits_per_pixel != BITS_PER_PIXEL {
            return Err(Error::UnsupportedBitsPerPixel(self.bits_per_pixel));
        }
        if self.compression != COMPRESSION_NONE {
            return Err(Error::UnsupportedCompression(self.compression));
        }
        Ok(())
    }

    pub fn dimensions(&self) -> crate::Result<(u32, u32)> {
        if self.width <= 0 || self.height <= 0 {
            return Err(Error::InvalidDimensions(
                self.width as i64,
                self.height as i64,
            ));
        }
        Ok((self.width as u32, self.height as u32))
    }
}

use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToReadBitmap(std::io::Error),
    FailedToWriteFileHeader(std::io::Error),
    FailedToWriteInfoHeader(std::io::Error),
    FailedToWritePixelData(std::io::Error),
    NotABitmap([u8; 2]),
    InvalidFormat(&'static str),
    UnsupportedBitsPerPixel(u16),
    UnsupportedCompression(u32),
    TruncatedData(&'static str),
    InvalidDimensions(i64, i64),
    DimensionsTooLarge(u32, u32),
    IndexOutOfRange {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl Error {
    /// Maps a read failure while parsing `section` of a bitmap
    pub(crate) fn from_read_error(error: std::io::Error, section: &'static str) -> Self {
        match error.kind() {
            std::io::ErrorKind::UnexpectedEof => Self::TruncatedData(section),
            _ => Self::FailedToReadBitmap(error),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToReadBitmap(error) => write!(f, "Failed to read bitmap: {}", error),
            Self::FailedToWriteFileHeader(error) => {
                write!(f, "Failed to write bitmap file header: {}", error)
            }
            Self::FailedToWriteInfoHeader(error) => {
                write!(f, "Failed to write bitmap info header: {}", error)
            }
            Self::FailedToWritePixelData(error) => {
                write!(f, "Failed to write pixel data: {}", error)
            }
            Self::NotABitmap(magic) => {
                write!(
                    f,
                    "Not a bitmap. Expected magic bytes 'BM', but got {:02X} {:02X}",
                    magic[0], magic[1]
                )
            }
            Self::InvalidFormat(reason) => write!(f, "Invalid bitmap format: {}", reason),
            Self::UnsupportedBitsPerPixel(bits) => {
                write!(
                    f,
                    "Unsupported bit depth of {} bits per pixel. Only 24 is supported.",
                    bits
                )
            }
            Self::UnsupportedCompression(compression) => {
                write!(
                    f,
                    "Unsupported compression method {}. Only uncompressed bitmaps are supported.",
                    compression
                )
            }
            Self::TruncatedData(section) => {
                write!(f, "Bitmap data ended unexpectedly while reading {}", section)
            }
            Self::InvalidDimensions(width, height) => {
                write!(
                    f,
                    "Invalid image dimensions {}x{}. Width and height must be positive.",
                    width, height
                )
            }
            Self::DimensionsTooLarge(width, height) => {
                write!(f, "Image dimensions {}x{} are too large", width, height)
            }
            Self::IndexOutOfRange {
                x,
                y,
                width,
                height,
            } => {
                write!(
                    f,
                    "Pixel ({}, {}) is out of range for an image of {}x{}",
                    x, y, width, height
                )
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadBitmap(error)
            | Self::FailedToWriteFileHeader(error)
            | Self::FailedToWriteInfoHeader(error)
            | Self::FailedToWritePixelData(error) => Some(error),
            _ => None,
        }
    }
}

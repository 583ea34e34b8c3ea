use std::path::Path;

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// The portrait shown in the header frame. JPEG data is passed through to
/// the PDF untouched; PNG is decoded up front so broken pixel data is caught
/// before any frame is drawn for it.
#[derive(Clone, Debug)]
pub struct AvatarImage {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
    pub(crate) pixel_width: u32,
    pub(crate) pixel_height: u32,
    /// Colour components of a JPEG (1 gray, 3 RGB, 4 CMYK). PNG is always
    /// re-encoded as RGB.
    pub(crate) components: u8,
    /// Decoded pixels, PNG only.
    pub(crate) rgba: Option<image::RgbaImage>,
}

impl AvatarImage {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        let (pixel_width, pixel_height, format, components) = sniff(&data)
            .ok_or_else(|| Error::Image("not a JPEG or PNG image".into()))?;
        if pixel_width == 0 || pixel_height == 0 {
            return Err(Error::Image("image has no pixels".into()));
        }
        let rgba = match format {
            ImageFormat::Png => Some(decode_png(&data)?),
            ImageFormat::Jpeg => None,
        };
        Ok(Self {
            data,
            format,
            pixel_width,
            pixel_height,
            components,
            rgba,
        })
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        Self::from_bytes(data)
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.pixel_width, self.pixel_height)
    }
}

/// Loads the avatar if one is configured. A missing or unreadable image is
/// logged and the header is drawn without a frame.
pub fn load_avatar(path: Option<&Path>) -> Option<AvatarImage> {
    let path = path?;
    match AvatarImage::load(path) {
        Ok(img) => {
            log::debug!(
                "Avatar {}: {:?} {}x{}",
                path.display(),
                img.format,
                img.pixel_width,
                img.pixel_height
            );
            Some(img)
        }
        Err(e) => {
            log::error!("Error loading avatar {}: {e}", path.display());
            None
        }
    }
}

fn decode_png(data: &[u8]) -> Result<image::RgbaImage, Error> {
    let reader = image::ImageReader::with_format(std::io::Cursor::new(data), image::ImageFormat::Png);
    let decoded = reader
        .decode()
        .map_err(|e| Error::Image(format!("undecodable PNG: {e}")))?;
    Ok(decoded.to_rgba8())
}

fn sniff(data: &[u8]) -> Option<(u32, u32, ImageFormat, u8)> {
    // JPEG: FF D8, then walk segments to the first SOFn
    if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
        let mut i = 2;
        while i + 4 < data.len() {
            if data[i] != 0xFF {
                return None;
            }
            let marker = data[i + 1];
            if marker == 0xD9 {
                break;
            }
            let len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            if matches!(marker, 0xC0 | 0xC1 | 0xC2) && i + 9 < data.len() {
                let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
                let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
                return Some((width, height, ImageFormat::Jpeg, data[i + 9]));
            }
            i += 2 + len;
        }
        return None;
    }

    if data.len() >= 24 && data.starts_with(b"\x89PNG") {
        let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
        let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
        return Some((width, height, ImageFormat::Png, 3));
    }

    None
}


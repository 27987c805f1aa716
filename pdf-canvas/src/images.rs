use std::io;

use thiserror::Error;

use crate::objects::{ObjId, PdfObject};
use crate::writer::deflate;

/// Handle to an image registered on a `Canvas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub usize);

/// Errors raised while loading an image.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("failed to read image: {0}")]
    Io(#[from] io::Error),

    #[error("not a PNG image")]
    NotPng,

    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("unsupported PNG color type: {0:?}")]
    UnsupportedColor(png::ColorType),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl ColorSpace {
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceGray => "DeviceGray",
        }
    }
}

/// Decoded 8-bit pixel data ready for embedding.
#[derive(Debug)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    /// Raw RGB or gray samples, one byte per component.
    pub data: Vec<u8>,
    /// Separate alpha channel, if the source had one.
    pub alpha: Option<Vec<u8>>,
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Decode a PNG. Palette and 16-bit images are normalized to 8-bit
/// RGB/gray; alpha is split into its own plane for use as an SMask.
pub fn load_png(bytes: &[u8]) -> Result<ImageData, ImageError> {
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(ImageError::NotPng);
    }
    let mut decoder = png::Decoder::new(bytes);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let (color_space, data, alpha) = match info.color_type {
        png::ColorType::Rgb => (ColorSpace::DeviceRGB, buf, None),
        png::ColorType::Grayscale => (ColorSpace::DeviceGray, buf, None),
        png::ColorType::Rgba => {
            let (rgb, alpha) = split_alpha(&buf, 4);
            (ColorSpace::DeviceRGB, rgb, Some(alpha))
        }
        png::ColorType::GrayscaleAlpha => {
            let (gray, alpha) = split_alpha(&buf, 2);
            (ColorSpace::DeviceGray, gray, Some(alpha))
        }
        other => return Err(ImageError::UnsupportedColor(other)),
    };

    Ok(ImageData {
        width: info.width,
        height: info.height,
        color_space,
        data,
        alpha,
    })
}

/// Split interleaved samples whose last component is alpha.
fn split_alpha(buf: &[u8], stride: usize) -> (Vec<u8>, Vec<u8>) {
    let pixels = buf.len() / stride;
    let mut color = Vec::with_capacity(pixels * (stride - 1));
    let mut alpha = Vec::with_capacity(pixels);
    for px in buf.chunks_exact(stride) {
        color.extend_from_slice(&px[..stride - 1]);
        alpha.push(px[stride - 1]);
    }
    (color, alpha)
}

impl ImageData {
    /// Height/width ratio, used to derive one display dimension from the other.
    pub fn aspect(&self) -> f64 {
        self.height as f64 / self.width.max(1) as f64
    }

    /// Image XObject stream. Samples are always Flate-compressed.
    pub(crate) fn xobject(&self, smask: Option<ObjId>) -> io::Result<PdfObject> {
        let mut dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(self.width as i64)),
            ("Height", PdfObject::Integer(self.height as i64)),
            ("ColorSpace", PdfObject::name(self.color_space.pdf_name())),
            ("BitsPerComponent", PdfObject::Integer(8)),
            ("Filter", PdfObject::name("FlateDecode")),
        ];
        if let Some(id) = smask {
            dict.push(("SMask", PdfObject::Reference(id)));
        }
        Ok(PdfObject::stream(dict, deflate(&self.data)?))
    }

    /// Soft mask XObject for the alpha plane, if any.
    pub(crate) fn smask_xobject(&self) -> io::Result<Option<PdfObject>> {
        let Some(alpha) = &self.alpha else {
            return Ok(None);
        };
        let dict = vec![
            ("Type", PdfObject::name("XObject")),
            ("Subtype", PdfObject::name("Image")),
            ("Width", PdfObject::Integer(self.width as i64)),
            ("Height", PdfObject::Integer(self.height as i64)),
            ("ColorSpace", PdfObject::name("DeviceGray")),
            ("BitsPerComponent", PdfObject::Integer(8)),
            ("Filter", PdfObject::name("FlateDecode")),
        ];
        Ok(Some(PdfObject::stream(dict, deflate(alpha)?)))
    }
}

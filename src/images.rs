use std::path::Path;

use pdf_writer::{Filter, Pdf, Ref};

use crate::error::Error;

enum ImageData {
    /// JPEG bytes passed straight through with DCTDecode.
    Jpeg { data: Vec<u8>, gray: bool },
    /// Decoded pixels, Flate-compressed at write time.
    Raw { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A decoded raster image (the report logo).
pub struct ImageAsset {
    pub pixel_width: u32,
    pub pixel_height: u32,
    data: ImageData,
}

impl ImageAsset {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", e, path.display()),
            ))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        let format = image::guess_format(&bytes)
            .map_err(|e| Error::Asset(format!("unrecognised image: {e}")))?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| Error::Asset(format!("cannot decode image: {e}")))?;
        let (w, h) = (decoded.width(), decoded.height());
        if w == 0 || h == 0 {
            return Err(Error::Asset("image has zero size".into()));
        }

        let passthrough = format == image::ImageFormat::Jpeg
            && matches!(
                decoded.color(),
                image::ColorType::Rgb8 | image::ColorType::L8
            );
        let data = if passthrough {
            ImageData::Jpeg {
                gray: decoded.color() == image::ColorType::L8,
                data: bytes,
            }
        } else {
            let rgba = decoded.to_rgba8();
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);
            let rgb: Vec<u8> = rgba
                .pixels()
                .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
                .collect();
            let alpha = has_alpha.then(|| rgba.pixels().map(|p| p.0[3]).collect());
            ImageData::Raw { rgb, alpha }
        };

        Ok(Self {
            pixel_width: w,
            pixel_height: h,
            data,
        })
    }

    /// Largest size with the image's aspect ratio that fits in `box_w` × `box_h`.
    pub fn fit(&self, box_w: f32, box_h: f32) -> (f32, f32) {
        let iw = self.pixel_width as f32;
        let ih = self.pixel_height as f32;
        let scale = (box_w / iw).min(box_h / ih);
        (iw * scale, ih * scale)
    }
}

pub(crate) fn write_xobject(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    img: &ImageAsset,
    alloc: &mut impl FnMut() -> Ref,
) {
    let (w, h) = (img.pixel_width as i32, img.pixel_height as i32);
    match &img.data {
        ImageData::Jpeg { data, gray } => {
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w);
            xobj.height(h);
            if *gray {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
        }
        ImageData::Raw { rgb, alpha } => {
            let smask_ref = alpha.as_ref().map(|alpha| {
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(alpha, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w);
                mask.height(h);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                mask_ref
            });

            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(rgb, 6);
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w);
            xobj.height(h);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
}

use pdf_writer::{Filter, Pdf, Ref};

use crate::error::{Error, Result};
use crate::model::{ImageAsset, ImageFormat};

/// Write `asset` as an image XObject at `xobj_ref`. JPEG data is passed
/// through untouched; PNG is decoded and re-encoded as Flate RGB with a
/// separate soft mask when any pixel is translucent.
pub(super) fn embed_image(
    pdf: &mut Pdf,
    xobj_ref: Ref,
    asset: &ImageAsset,
    alloc: &mut impl FnMut() -> Ref,
) -> Result<()> {
    match asset.format {
        ImageFormat::Jpeg => {
            let mut xobj = pdf.image_xobject(xobj_ref, &asset.data);
            xobj.filter(Filter::DctDecode);
            xobj.width(asset.pixel_width as i32);
            xobj.height(asset.pixel_height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }
        ImageFormat::Png => {
            let decoded = ::image::load_from_memory_with_format(&asset.data, ::image::ImageFormat::Png)
                .map_err(|e| {
                    log::warn!("Could not decode PNG {:?}: {}", asset.name, e);
                    Error::Image(format!("{}: {e}", asset.name))
                })?;
            let rgba = decoded.to_rgba8();
            let (w, h) = (rgba.width(), rgba.height());
            let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

            let rgb: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
            let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb, 6);

            let smask_ref = if has_alpha {
                let alpha: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
                let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha, 6);
                let mask_ref = alloc();
                let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(w as i32);
                mask.height(h as i32);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
                Some(mask_ref)
            } else {
                None
            };

            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
            if let Some(mask_ref) = smask_ref {
                xobj.s_mask(mask_ref);
            }
        }
    }
    log::debug!(
        "embed_image: {:?} {:?} {}x{}",
        asset.name,
        asset.format,
        asset.pixel_width,
        asset.pixel_height
    );
    Ok(())
}

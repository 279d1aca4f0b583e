use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::{
    color::{ColorMap, Rgba},
    errors::Result,
};

/// Decodes an image and replaces every pixel that exactly matches a
/// color rule, alpha included.
///
/// Returns `None` when no pixel matched and the texture can be left
/// out of the pack.
///
/// # Errors
///
/// Returns an error if the bytes cannot be decoded as an image.
pub fn recolor(colors: &ColorMap, data: &[u8]) -> Result<Option<RgbaImage>> {
    let mut img = image::load_from_memory(data)?.to_rgba8();
    let mut edited = false;
    for px in img.pixels_mut() {
        if let Some(dark) = colors.swap(Rgba::from_array(px.0)) {
            px.0 = dark.to_array();
            edited = true;
        }
    }
    Ok(edited.then_some(img))
}

/// Encodes an image as PNG bytes.
///
/// # Errors
///
/// Returns an error if the PNG encoder fails.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

//! SVG rasterization using resvg/usvg.
//!
//! Illustrated kitchen renders can be shipped as SVG instead of photographs.
//! They are rasterized at their intrinsic size so the exported pixels match
//! what a browser shows for the same file at 100% zoom.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

/// Rasterizes SVG data at its intrinsic size.
///
/// Returns a description of the failure if the SVG cannot be parsed or has
/// an empty canvas.
pub fn render_svg(svg_data: &[u8]) -> Result<RgbaImage, String> {
    let opts = Options::default();
    let tree = Tree::from_data(svg_data, &opts).map_err(|e| e.to_string())?;

    let size = tree.size();
    let width = size.width().ceil() as u32;
    let height = size.height().ceil() as u32;

    let mut pixmap =
        Pixmap::new(width, height).ok_or_else(|| format!("empty SVG canvas {width}x{height}"))?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(pixel.red(), pixel.green(), pixel.blue(), pixel.alpha());
        img.put_pixel(x, y, Rgba([r, g, b, a]));
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KITCHEN_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="20"><rect width="40" height="20" fill="#808080"/><rect x="20" width="20" height="20" fill="#000000"/></svg>"##;

    #[test]
    fn renders_at_intrinsic_size() {
        let img = render_svg(KITCHEN_SVG.as_bytes()).unwrap();
        assert_eq!(img.dimensions(), (40, 20));
        assert_eq!(img.get_pixel(5, 5).0, [128, 128, 128, 255]);
        assert_eq!(img.get_pixel(30, 5).0, [0, 0, 0, 255]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(render_svg(b"definitely not svg").is_err());
    }

    #[test]
    fn unpremultiply_restores_color() {
        assert_eq!(unpremultiply(51, 0, 51, 51), (255, 0, 255, 51));
        assert_eq!(unpremultiply(30, 60, 90, 255), (30, 60, 90, 255));
        assert_eq!(unpremultiply(10, 10, 10, 0), (0, 0, 0, 0));
    }
}

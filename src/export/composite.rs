//! Flattening the wall color overlay onto the base image.

use image::{Rgba, RgbaImage};

use crate::resolve::{BlendMode, Overlay};

/// Blends the overlay over every pixel of `base`, in place.
///
/// For base channel `b`, overlay channel `c` and opacity `a`:
///
/// ```text
/// blended = b * c / 255   (Multiply)
///         = c             (Normal)
/// out     = round(b * (1 - a) + blended * a)
/// ```
///
/// The base alpha channel is kept. An invisible overlay leaves `base`
/// bit-for-bit unchanged.
pub fn apply_overlay(base: &mut RgbaImage, overlay: &Overlay) {
    if overlay.is_invisible() {
        return;
    }

    let alpha = overlay.opacity.clamp(0.0, 1.0);
    let color = overlay.color.channels();

    for pixel in base.pixels_mut() {
        *pixel = blend_pixel(*pixel, color, alpha, overlay.blend_mode);
    }
}

/// Blends one overlay color into one base pixel.
fn blend_pixel(base: Rgba<u8>, color: [u8; 3], alpha: f32, mode: BlendMode) -> Rgba<u8> {
    let channel = |b: u8, c: u8| -> u8 {
        let bf = b as f32;
        let cf = c as f32;
        let blended = match mode {
            BlendMode::Multiply => bf * cf / 255.0,
            BlendMode::Normal => cf,
        };
        (bf * (1.0 - alpha) + blended * alpha).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        channel(base[0], color[0]),
        channel(base[1], color[1]),
        channel(base[2], color[2]),
        base[3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WallColor;

    fn navy() -> Overlay {
        Overlay::for_wall_color(WallColor::new(0x1e, 0x3a, 0x5c))
    }

    #[test]
    fn neutral_overlay_leaves_base_unchanged() {
        let mut img = RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 77, 200]));
        let original = img.clone();

        apply_overlay(&mut img, &Overlay::for_wall_color(WallColor::NEUTRAL));
        assert_eq!(img, original);
    }

    #[test]
    fn multiply_over_white_blends_toward_the_color() {
        // white * navy = navy; 255 * 0.75 + navy * 0.25
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        apply_overlay(&mut img, &navy());
        assert_eq!(img.get_pixel(0, 0).0, [199, 206, 214, 255]);
    }

    #[test]
    fn multiply_over_black_stays_black() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        apply_overlay(&mut img, &navy());
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn black_wall_darkens_by_a_quarter() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 40, 255]));
        apply_overlay(&mut img, &Overlay::for_wall_color(WallColor::new(0, 0, 0)));
        assert_eq!(img.get_pixel(0, 0).0, [150, 75, 30, 255]);
    }

    #[test]
    fn multiply_keeps_light_and_dark_distinguishable() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([240, 240, 240, 255]));
        img.put_pixel(1, 0, Rgba([40, 40, 40, 255]));
        apply_overlay(&mut img, &navy());

        let light = img.get_pixel(0, 0);
        let dark = img.get_pixel(1, 0);
        for channel in 0..3 {
            assert!(light[channel] > dark[channel]);
        }
    }

    #[test]
    fn alpha_channel_is_preserved() {
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 64]));
        apply_overlay(&mut img, &navy());
        assert_eq!(img.get_pixel(0, 0)[3], 64);
    }

    #[test]
    fn normal_blend_mixes_toward_color() {
        let overlay = Overlay {
            color: WallColor::new(0, 0, 0),
            opacity: 0.5,
            blend_mode: BlendMode::Normal,
        };
        let mut img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        apply_overlay(&mut img, &overlay);
        assert_eq!(img.get_pixel(0, 0).0, [100, 50, 25, 255]);
    }
}

//! Face region geometry and crop extraction.
//!
//! Implements the two cropping modes used by the pipeline: an unconstrained
//! crop that returns exactly the detected region's pixels, and an
//! aspect-aware crop that extends the region's shorter dimension until it
//! matches a target aspect ratio before resampling. Extending instead of
//! stretching keeps the detected face's framing intact.

use image::{
    RgbImage,
    imageops::{self, FilterType},
};

use crate::filter::TargetShape;

/// Axis-aligned face bounding box in source image pixel coordinates.
///
/// Invariant: `x + width <= image.width` and `y + height <= image.height`
/// for the image the region was detected in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Region {
    /// Construct a region from its top-left corner and size.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Integer crop box in source image coordinates, already clamped in-bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Clamp a possibly out-of-range box into `[0, img_w) x [0, img_h)`.
///
/// The size is capped at the image dimensions first, then the origin is
/// shifted so the whole box fits. A slice request never leaves the image.
fn clamp_box(x: i64, y: i64, width: i64, height: i64, img_w: u32, img_h: u32) -> CropBox {
    let img_w = i64::from(img_w.max(1));
    let img_h = i64::from(img_h.max(1));
    let width = width.clamp(1, img_w);
    let height = height.clamp(1, img_h);
    let x = x.clamp(0, img_w - width);
    let y = y.clamp(0, img_h - height);
    CropBox {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    }
}

/// Compute the crop box that extends `region` to the aspect ratio of `target`.
///
/// The algorithm proceeds as follows:
/// 1. Derive `ratio_height` by scaling the region width with the target's
///    height/width ratio.
/// 2. If that height no longer fits the image, widen instead: recompute the
///    width from `ratio_height`, shifting the left edge by half the width
///    delta (floor division) so the face stays horizontally centered.
/// 3. Otherwise keep the region width and move the top edge up by half the
///    height delta, never crossing above the image top.
/// 4. Clamp the resulting box into the image bounds.
pub fn aspect_crop_box(img_w: u32, img_h: u32, region: Region, target: TargetShape) -> CropBox {
    let sides_ratio = f64::from(target.height) / f64::from(target.width.max(1));

    let x = i64::from(region.x);
    let y = i64::from(region.y);
    let region_w = i64::from(region.width);
    let region_h = i64::from(region.height);

    let ratio_height = (f64::from(region.width) * sides_ratio).round() as i64;

    if ratio_height > i64::from(img_h) {
        // The extended region is taller than the image: widen instead.
        let ratio_width = (ratio_height as f64 / sides_ratio).round() as i64;
        let shifted_x = x + (region_w - ratio_width).div_euclid(2);
        clamp_box(shifted_x, y, ratio_width, ratio_height, img_w, img_h)
    } else {
        let shift = i64::min(y, (ratio_height - region_h).div_euclid(2));
        clamp_box(x, y - shift, region_w, ratio_height, img_w, img_h)
    }
}

/// Return exactly the pixels inside `region`.
pub fn extract_region(image: &RgbImage, region: Region) -> RgbImage {
    let boxed = clamp_box(
        i64::from(region.x),
        i64::from(region.y),
        i64::from(region.width),
        i64::from(region.height),
        image.width(),
        image.height(),
    );
    imageops::crop_imm(image, boxed.x, boxed.y, boxed.width, boxed.height).to_image()
}

/// Crop `region` extended to the aspect ratio of `target`, then resample the
/// result to exactly `target.width` x `target.height` pixels.
pub fn extract_region_resized(image: &RgbImage, region: Region, target: TargetShape) -> RgbImage {
    let boxed = aspect_crop_box(image.width(), image.height(), region, target);
    let cropped = imageops::crop_imm(image, boxed.x, boxed.y, boxed.width, boxed.height).to_image();
    imageops::resize(&cropped, target.width, target.height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, 7]);
        }
        img
    }

    #[test]
    fn unconstrained_crop_returns_exact_region_pixels() {
        let img = gradient_image(64, 48);
        let crop = extract_region(&img, Region::new(10, 20, 16, 8));
        assert_eq!(crop.dimensions(), (16, 8));
        // top-left of the crop is source pixel (10, 20)
        assert_eq!(crop.get_pixel(0, 0), &Rgb([10, 20, 7]));
        assert_eq!(crop.get_pixel(15, 7), &Rgb([25, 27, 7]));
    }

    #[test]
    fn normal_branch_extends_height_and_shifts_up() {
        // sides_ratio = 250/190, region width 200 -> ratio_height 263
        let target = TargetShape::new(190, 250, 1);
        let boxed = aspect_crop_box(1000, 1000, Region::new(400, 400, 200, 200), target);
        assert_eq!(boxed.width, 200);
        assert_eq!(boxed.height, 263);
        assert_eq!(boxed.x, 400);
        // shifted up by (263 - 200) / 2 = 31
        assert_eq!(boxed.y, 369);
    }

    #[test]
    fn normal_branch_shift_stops_at_image_top() {
        let target = TargetShape::new(190, 250, 1);
        let boxed = aspect_crop_box(1000, 1000, Region::new(400, 10, 200, 200), target);
        // half the height delta is 31, but y may only give back 10
        assert_eq!(boxed.y, 0);
        assert_eq!(boxed.height, 263);
    }

    #[test]
    fn overflow_branch_widens_and_clamps() {
        // region width 240 -> ratio_height 316 > image height 260
        let target = TargetShape::new(190, 250, 1);
        let boxed = aspect_crop_box(300, 260, Region::new(40, 10, 240, 200), target);
        assert_eq!(boxed.width, 240);
        // requested height 316 is capped at the image, origin pulled to the top
        assert_eq!(boxed.height, 260);
        assert_eq!(boxed.y, 0);
        assert_eq!(boxed.x, 40);
    }

    #[test]
    fn overflow_branch_shifts_left_edge_by_floored_half_delta() {
        // target 3:2 on a 100-wide region: ratio_height 67 overflows a
        // 50-tall image, ratio_width rounds to 101, delta -1 floors to -1.
        let target = TargetShape::new(3, 2, 1);
        let boxed = aspect_crop_box(120, 50, Region::new(10, 0, 100, 40), target);
        assert_eq!(boxed.x, 9);
        assert_eq!(boxed.width, 101);
        assert_eq!(boxed.height, 50);
        assert_eq!(boxed.y, 0);
    }

    #[test]
    fn overflow_branch_never_goes_negative() {
        let target = TargetShape::new(3, 2, 1);
        let boxed = aspect_crop_box(120, 50, Region::new(0, 0, 100, 40), target);
        assert_eq!(boxed.x, 0);
    }

    #[test]
    fn resized_crop_matches_requested_dimensions_in_both_branches() {
        let target = TargetShape::new(190, 250, 1);
        let tall = extract_region_resized(
            &gradient_image(1000, 1000),
            Region::new(400, 400, 200, 200),
            target,
        );
        assert_eq!(tall.dimensions(), (190, 250));

        let wide = extract_region_resized(
            &gradient_image(300, 260),
            Region::new(40, 10, 240, 200),
            target,
        );
        assert_eq!(wide.dimensions(), (190, 250));
    }

    #[test]
    fn region_touching_the_border_stays_in_bounds() {
        let img = gradient_image(64, 64);
        let crop = extract_region(&img, Region::new(60, 60, 10, 10));
        // clamped to the bottom-right corner
        assert_eq!(crop.dimensions(), (10, 10));
        assert_eq!(crop.get_pixel(9, 9), &Rgb([63, 63, 7]));
    }
}

// src/geometry.rs
//
// Maps hotspot rectangles from their authoring coordinate frame onto the
// displayed image. Computed once per slide, when the bitmap's natural size
// becomes known; the viewport width is fixed so there is nothing to
// recompute on resize.

use crate::tour_data::{Hotspot, TourImage};

/// Fixed width of the viewer content area, in CSS pixels.
pub const VIEWPORT_WIDTH: f64 = 1200.0;

/// How a loaded bitmap fits into the viewport: shrink-to-fit scale (images
/// are never upscaled past natural resolution), the resulting displayed
/// dimensions, and the horizontal centering offset of the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub scale: f64,
    pub width: f64,
    pub height: f64,
    pub left_offset: f64,
}

impl DisplayGeometry {
    pub fn fit(natural_w: f64, natural_h: f64, viewport_w: f64) -> Self {
        let scale = if natural_w > 0.0 {
            (viewport_w / natural_w).min(1.0)
        } else {
            1.0
        };
        let width = natural_w * scale;
        let height = natural_h * scale;
        Self {
            scale,
            width,
            height,
            left_offset: (viewport_w - width) / 2.0,
        }
    }
}

/// A hotspot rectangle in displayed-image pixels, relative to the overlay's
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Projects an authored hotspot into display space: shift into the image's
/// local frame, undo the authoring-time capture scale, reapply the display
/// scale.
pub fn project_hotspot(hotspot: &Hotspot, image: &TourImage, display_scale: f64) -> OverlayRect {
    let authoring_scale = image.authoring_scale();
    OverlayRect {
        x: (hotspot.x - image.x) / authoring_scale * display_scale,
        y: (hotspot.y - image.y) / authoring_scale * display_scale,
        width: hotspot.width / authoring_scale * display_scale,
        height: hotspot.height / authoring_scale * display_scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotspot(x: f64, y: f64, w: f64, h: f64) -> Hotspot {
        Hotspot {
            x,
            y,
            width: w,
            height: h,
            title: None,
            description: None,
        }
    }

    #[test]
    fn test_fit_shrinks_wide_images() {
        let geo = DisplayGeometry::fit(2400.0, 1600.0, 1200.0);
        assert_eq!(geo.scale, 0.5);
        assert_eq!(geo.width, 1200.0);
        assert_eq!(geo.height, 800.0);
        assert_eq!(geo.left_offset, 0.0);
    }

    #[test]
    fn test_fit_never_upscales_and_centers() {
        let geo = DisplayGeometry::fit(600.0, 400.0, 1200.0);
        assert_eq!(geo.scale, 1.0);
        assert_eq!(geo.width, 600.0);
        assert_eq!(geo.height, 400.0);
        assert_eq!(geo.left_offset, 300.0);
    }

    #[test]
    fn test_fit_handles_zero_width_bitmap() {
        let geo = DisplayGeometry::fit(0.0, 0.0, 1200.0);
        assert_eq!(geo.scale, 1.0);
        assert_eq!(geo.width, 0.0);
    }

    #[test]
    fn test_project_unscaled_capture() {
        let image = TourImage::default();
        let geo = DisplayGeometry::fit(2400.0, 1600.0, 1200.0);
        let rect = project_hotspot(&hotspot(100.0, 100.0, 50.0, 50.0), &image, geo.scale);
        assert_eq!(rect.x, 50.0);
        assert_eq!(rect.y, 50.0);
        assert_eq!(rect.width, 25.0);
        assert_eq!(rect.height, 25.0);
    }

    #[test]
    fn test_project_offsets_and_authoring_scale() {
        let image = TourImage {
            x: 40.0,
            y: 20.0,
            scale: Some(2.0),
            ..TourImage::default()
        };
        let rect = project_hotspot(&hotspot(140.0, 120.0, 80.0, 40.0), &image, 0.5);
        assert_eq!(rect.x, 25.0);
        assert_eq!(rect.y, 25.0);
        assert_eq!(rect.width, 20.0);
        assert_eq!(rect.height, 10.0);
    }

    #[test]
    fn test_project_treats_zero_authoring_scale_as_one() {
        let image = TourImage {
            scale: Some(0.0),
            ..TourImage::default()
        };
        let rect = project_hotspot(&hotspot(10.0, 10.0, 10.0, 10.0), &image, 1.0);
        assert_eq!(rect.x, 10.0);
        assert_eq!(rect.width, 10.0);
    }
}

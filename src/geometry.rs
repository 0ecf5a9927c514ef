//! Coordinate spaces and transforms
//!
//! Three spaces are in play:
//! - window pixels (bottom-left origin, framebuffer resolution)
//! - world units (the fixed `SCREEN_WIDTH` x `SCREEN_HEIGHT` arena)
//! - clip space (what the shader writes to its position output)
//!
//! The projection bounds letterbox or pillarbox the arena so it is always
//! fully visible, centered and unstretched.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Framebuffer size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
}

impl Framebuffer {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimized window reports a zero-sized framebuffer
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Visible world rectangle of the orthographic projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::nominal()
    }
}

impl Projection {
    /// Exactly the arena, `[0, SCREEN_WIDTH] x [0, SCREEN_HEIGHT]`
    pub const fn nominal() -> Self {
        Self {
            left: 0.0,
            right: SCREEN_WIDTH,
            bottom: 0.0,
            top: SCREEN_HEIGHT,
        }
    }

    /// Bounds for a framebuffer of the given size.
    ///
    /// The axis along which the framebuffer is relatively longer is grown
    /// symmetrically around the arena center; the other axis keeps the arena
    /// extent. A zero-sized framebuffer yields the nominal bounds.
    pub fn for_framebuffer(framebuffer: Framebuffer) -> Self {
        let mut bounds = Self::nominal();
        if framebuffer.is_empty() {
            return bounds;
        }

        let aspect = framebuffer.height as f32 / framebuffer.width as f32;
        let desired = SCREEN_HEIGHT / SCREEN_WIDTH;

        if aspect > desired {
            let new_height = SCREEN_WIDTH * aspect;
            bounds.bottom = -(new_height - SCREEN_HEIGHT) / 2.0;
            bounds.top = new_height + bounds.bottom;
        } else if aspect < desired {
            let new_width = SCREEN_HEIGHT / aspect;
            bounds.left = -(new_width - SCREEN_WIDTH) / 2.0;
            bounds.right = new_width + bounds.left;
        }

        bounds
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Orthographic matrix for these bounds
    pub fn matrix(&self) -> Mat4 {
        orthographic_matrix(self)
    }
}

/// Model transform placing a shape at `(dx, dy)`
#[inline]
pub fn translation_matrix(dx: f32, dy: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(dx, dy, 0.0))
}

/// Column-major orthographic projection mapping `bounds` onto `[-1, 1]^2`.
///
/// Depth passes through with its sign flipped, so the z = 0 plane all shapes
/// live on stays at clip z = 0.
pub fn orthographic_matrix(bounds: &Projection) -> Mat4 {
    let width = bounds.width();
    let height = bounds.height();
    Mat4::from_cols(
        Vec4::new(2.0 / width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 / height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, -1.0, 0.0),
        Vec4::new(
            -(bounds.right + bounds.left) / width,
            -(bounds.top + bounds.bottom) / height,
            0.0,
            1.0,
        ),
    )
}

/// Map a pixel position (bottom-left origin) to world units.
///
/// Not clamped: points outside the arena, or even outside the window, map
/// to world points outside the arena.
pub fn window_to_world(framebuffer: Framebuffer, bounds: &Projection, point: Vec2) -> Vec2 {
    Vec2::new(
        (point.x / framebuffer.width as f32) * bounds.width() + bounds.left,
        (point.y / framebuffer.height as f32) * bounds.height() + bounds.bottom,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn to_clip(m: Mat4, x: f32, y: f32) -> Vec2 {
        let p = m * Vec4::new(x, y, 0.0, 1.0);
        Vec2::new(p.x / p.w, p.y / p.w)
    }

    #[test]
    fn test_translation_moves_origin() {
        let m = translation_matrix(1.5, -2.0);
        let p = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_eq!(p, Vec4::new(1.5, -2.0, 0.0, 1.0));
        // Translation lives in the last column
        assert_eq!(m.w_axis, Vec4::new(1.5, -2.0, 0.0, 1.0));
    }

    #[test]
    fn test_ortho_flips_depth() {
        let m = Projection::nominal().matrix();
        assert_eq!(m.z_axis.z, -1.0);
        let p = m * Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert!((p.z + 0.5).abs() < EPS);
    }

    #[test]
    fn test_matching_aspect_is_nominal() {
        let bounds = Projection::for_framebuffer(Framebuffer::new(1000, 600));
        assert_eq!(bounds, Projection::nominal());
    }

    #[test]
    fn test_tall_framebuffer_grows_vertically() {
        // aspect 1.0 vs desired 0.6 -> height becomes 5.0, centered on 1.5
        let bounds = Projection::for_framebuffer(Framebuffer::new(800, 800));
        assert_eq!(bounds.left, 0.0);
        assert_eq!(bounds.right, SCREEN_WIDTH);
        assert!((bounds.bottom + 1.0).abs() < EPS);
        assert!((bounds.top - 4.0).abs() < EPS);
    }

    #[test]
    fn test_wide_framebuffer_grows_horizontally() {
        // aspect 0.3 vs desired 0.6 -> width becomes 10.0, centered on 2.5
        let bounds = Projection::for_framebuffer(Framebuffer::new(2000, 600));
        assert_eq!(bounds.bottom, 0.0);
        assert_eq!(bounds.top, SCREEN_HEIGHT);
        assert!((bounds.left + 2.5).abs() < EPS);
        assert!((bounds.right - 7.5).abs() < EPS);
    }

    #[test]
    fn test_empty_framebuffer_keeps_nominal() {
        let bounds = Projection::for_framebuffer(Framebuffer::new(0, 600));
        assert_eq!(bounds, Projection::nominal());
    }

    #[test]
    fn test_window_to_world_corners() {
        let fb = Framebuffer::new(2000, 600);
        let bounds = Projection::for_framebuffer(fb);
        let bl = window_to_world(fb, &bounds, Vec2::ZERO);
        let tr = window_to_world(fb, &bounds, Vec2::new(2000.0, 600.0));
        assert!((bl - Vec2::new(bounds.left, bounds.bottom)).length() < EPS);
        assert!((tr - Vec2::new(bounds.right, bounds.top)).length() < EPS);
    }

    #[test]
    fn test_window_to_world_is_unclamped() {
        let fb = Framebuffer::new(1000, 600);
        let bounds = Projection::nominal();
        let p = window_to_world(fb, &bounds, Vec2::new(-100.0, 1200.0));
        assert!((p.x + 0.5).abs() < EPS);
        assert!((p.y - 6.0).abs() < EPS);
    }

    proptest! {
        #[test]
        fn ortho_maps_corners_to_unit_square(
            left in -100.0f32..100.0,
            width in 0.1f32..100.0,
            bottom in -100.0f32..100.0,
            height in 0.1f32..100.0,
        ) {
            let bounds = Projection { left, right: left + width, bottom, top: bottom + height };
            let m = orthographic_matrix(&bounds);
            let lo = to_clip(m, bounds.left, bounds.bottom);
            let hi = to_clip(m, bounds.right, bounds.top);
            prop_assert!((lo - Vec2::new(-1.0, -1.0)).length() < 1e-3);
            prop_assert!((hi - Vec2::new(1.0, 1.0)).length() < 1e-3);
        }

        #[test]
        fn resize_contains_arena_and_centers_one_axis(w in 1u32..4000, h in 1u32..4000) {
            let b = Projection::for_framebuffer(Framebuffer::new(w, h));
            prop_assert!(b.left <= 0.0 && b.right >= SCREEN_WIDTH);
            prop_assert!(b.bottom <= 0.0 && b.top >= SCREEN_HEIGHT);

            let x_grown = b.left < 0.0;
            let y_grown = b.bottom < 0.0;
            prop_assert!(!(x_grown && y_grown));
            if x_grown {
                prop_assert!(((b.left + b.right) / 2.0 - SCREEN_WIDTH / 2.0).abs() < 1e-3);
                prop_assert_eq!(b.bottom, 0.0);
                prop_assert_eq!(b.top, SCREEN_HEIGHT);
            }
            if y_grown {
                prop_assert!(((b.bottom + b.top) / 2.0 - SCREEN_HEIGHT / 2.0).abs() < 1e-3);
                prop_assert_eq!(b.left, 0.0);
                prop_assert_eq!(b.right, SCREEN_WIDTH);
            }

            // Bounds keep the framebuffer's aspect ratio
            let aspect = h as f32 / w as f32;
            prop_assert!((b.height() / b.width() - aspect).abs() < 1e-3 * aspect.max(1.0));
        }
    }
}

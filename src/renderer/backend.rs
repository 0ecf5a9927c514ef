//! The draw interface the game renders through
//!
//! The game issues clear/draw commands against a `RenderBackend`; the
//! backend owns every GPU resource. `WgpuBackend` is the real one, tests
//! record calls instead.

use std::fmt;

use glam::Mat4;

use super::shapes::{ShapeBuffer, ShapeHandle};
use crate::colors::Color;

/// How a shape's vertices are rasterized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawMode {
    /// Triangle fan over the shape's vertices
    Filled,
    /// Closed line loop through the shape's vertices
    Outline,
}

pub trait RenderBackend {
    /// Upload the shared vertex buffer. Called once, before any draw.
    fn upload_shapes(&mut self, shapes: &ShapeBuffer) -> Result<(), RenderError>;

    /// Overwrite part of the shared vertex buffer
    fn replace_sub_region(&mut self, byte_offset: u64, data: &[u8]);

    fn set_clear_color(&mut self, color: Color);

    /// World-to-clip matrix used by every following draw
    fn set_projection(&mut self, projection: Mat4);

    /// New framebuffer size in pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Start a frame cleared to the current clear colour
    fn clear_frame(&mut self);

    /// Queue `handle` with `transform` as its model matrix
    fn draw_shape(&mut self, handle: ShapeHandle, transform: Mat4, mode: DrawMode);

    /// Submit the frame's draws and show it
    fn present(&mut self) -> Result<(), RenderError>;
}

/// Fatal rendering failures
#[derive(Debug)]
pub enum RenderError {
    CreateSurface(wgpu::CreateSurfaceError),
    RequestAdapter(wgpu::RequestAdapterError),
    RequestDevice(wgpu::RequestDeviceError),
    /// The surface reports no usable texture format
    UnsupportedSurface,
    /// A draw was issued before `upload_shapes`
    NoShapes,
    /// A draw referenced a range that was never uploaded
    UnknownShape(ShapeHandle),
    /// The surface cannot produce frames any more
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::CreateSurface(e) => write!(f, "failed to create surface: {e}"),
            RenderError::RequestAdapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            RenderError::RequestDevice(e) => write!(f, "failed to create device: {e}"),
            RenderError::UnsupportedSurface => write!(f, "surface has no supported formats"),
            RenderError::NoShapes => write!(f, "draw issued before shapes were uploaded"),
            RenderError::UnknownShape(handle) => write!(
                f,
                "draw references unknown shape at vertex {} (count {})",
                handle.first, handle.count
            ),
            RenderError::Surface(e) => write!(f, "surface error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::CreateSurface(e) => Some(e),
            RenderError::RequestAdapter(e) => Some(e),
            RenderError::RequestDevice(e) => Some(e),
            RenderError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for RenderError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RenderError::CreateSurface(e)
    }
}

impl From<wgpu::RequestAdapterError> for RenderError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        RenderError::RequestAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for RenderError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RenderError::RequestDevice(e)
    }
}

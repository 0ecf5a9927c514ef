//! Per-frame draw protocol
//!
//! Turns a `GameState` snapshot into backend calls: clear, border, paddles,
//! balls, then the drag-ball and its line while a drag is active.

use glam::{Mat4, Vec2};

use super::backend::{DrawMode, RenderBackend, RenderError};
use super::shapes::{ShapeBuffer, ShapeLayout, drag_line};
use crate::geometry::translation_matrix;
use crate::sim::GameState;

/// Shapes resident on a backend
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    layout: ShapeLayout,
}

impl Scene {
    /// Build the shared vertex buffer and upload it
    pub fn new(backend: &mut impl RenderBackend, ball_segments: u32) -> Result<Self, RenderError> {
        let shapes = ShapeBuffer::build(ball_segments);
        backend.upload_shapes(&shapes)?;
        Ok(Self {
            layout: shapes.layout,
        })
    }

    pub fn layout(&self) -> &ShapeLayout {
        &self.layout
    }

    /// Render one frame of `state`
    pub fn draw(&self, backend: &mut impl RenderBackend, state: &GameState) -> Result<(), RenderError> {
        let layout = &self.layout;

        backend.set_clear_color(state.clear_color());
        backend.set_projection(state.view.projection.matrix());
        backend.clear_frame();

        backend.draw_shape(layout.border, Mat4::IDENTITY, DrawMode::Outline);

        for paddle in [&state.left, &state.right] {
            backend.draw_shape(
                layout.paddle,
                translation_matrix(paddle.x(), paddle.y),
                DrawMode::Filled,
            );
        }

        for ball in &state.balls {
            backend.draw_shape(layout.ball, at(ball.pos), DrawMode::Filled);
        }

        if let Some((anchor, current)) = state.drag.line() {
            backend.draw_shape(layout.ball, at(current), DrawMode::Filled);
            backend.replace_sub_region(
                layout.drag_line.byte_offset(),
                bytemuck::cast_slice(&drag_line(anchor, current)),
            );
            backend.draw_shape(layout.drag_line, Mat4::IDENTITY, DrawMode::Outline);
        }

        backend.present()
    }
}

fn at(pos: Vec2) -> Mat4 {
    translation_matrix(pos.x, pos.y)
}

//! Shape generation and the shared vertex buffer layout
//!
//! Every drawable lives in one vertex buffer, in a fixed order:
//! paddle quad, ball fan, border quad, drag line. A `ShapeHandle` names a
//! shape's vertex range; draws translate the shape into place.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;

use super::backend::DrawMode;
use super::vertex::Vertex;
use crate::colors;
use crate::consts::*;

/// A shape's vertex range inside the shared buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle {
    pub first: u32,
    pub count: u32,
}

impl ShapeHandle {
    pub const fn new(first: u32, count: u32) -> Self {
        Self { first, count }
    }

    /// Byte offset of the first vertex, for partial buffer updates
    pub const fn byte_offset(&self) -> u64 {
        self.first as u64 * Vertex::SIZE
    }

    pub const fn vertices(&self) -> Range<u32> {
        self.first..self.first + self.count
    }
}

/// The drawables the game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Paddle,
    Ball,
    Border,
    DragLine,
}

impl ShapeKind {
    /// Buffer order
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Paddle,
        ShapeKind::Ball,
        ShapeKind::Border,
        ShapeKind::DragLine,
    ];
}

/// Where each shape lives in the shared buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeLayout {
    pub paddle: ShapeHandle,
    pub ball: ShapeHandle,
    pub border: ShapeHandle,
    pub drag_line: ShapeHandle,
}

impl ShapeLayout {
    pub fn handle(&self, kind: ShapeKind) -> ShapeHandle {
        match kind {
            ShapeKind::Paddle => self.paddle,
            ShapeKind::Ball => self.ball,
            ShapeKind::Border => self.border,
            ShapeKind::DragLine => self.drag_line,
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = ShapeHandle> + '_ {
        ShapeKind::ALL.into_iter().map(|kind| self.handle(kind))
    }
}

/// The shared vertex data plus its layout table
#[derive(Debug, Clone)]
pub struct ShapeBuffer {
    pub vertices: Vec<Vertex>,
    pub layout: ShapeLayout,
}

impl ShapeBuffer {
    /// Pack every shape; `ball_segments` is clamped to
    /// `MIN_BALL_SEGMENTS..=MAX_BALL_SEGMENTS`
    pub fn build(ball_segments: u32) -> Self {
        let mut vertices = Vec::new();
        let paddle = push_shape(&mut vertices, &paddle_quad());
        let segments = ball_segments.clamp(MIN_BALL_SEGMENTS, MAX_BALL_SEGMENTS);
        let ball = push_shape(&mut vertices, &ball_fan(segments));
        let border = push_shape(&mut vertices, &border_quad());
        let drag_line = push_shape(
            &mut vertices,
            &drag_line(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT)),
        );

        Self {
            vertices,
            layout: ShapeLayout {
                paddle,
                ball,
                border,
                drag_line,
            },
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

fn push_shape(vertices: &mut Vec<Vertex>, shape: &[Vertex]) -> ShapeHandle {
    let handle = ShapeHandle::new(vertices.len() as u32, shape.len() as u32);
    vertices.extend_from_slice(shape);
    handle
}

/// Paddle rectangle with its bottom-left corner at the origin
pub fn paddle_quad() -> [Vertex; 4] {
    quad(PADDLE_WIDTH, PADDLE_HEIGHT, colors::PADDLE)
}

/// Ball polygon centered on the origin
pub fn ball_fan(segments: u32) -> Vec<Vertex> {
    let step = TAU / segments as f32;
    (0..segments)
        .map(|i| {
            let theta = i as f32 * step;
            Vertex::new(
                BALL_RADIUS * theta.cos(),
                BALL_RADIUS * theta.sin(),
                colors::BALL,
            )
        })
        .collect()
}

/// Arena outline corners
pub fn border_quad() -> [Vertex; 4] {
    quad(SCREEN_WIDTH, SCREEN_HEIGHT, colors::BORDER)
}

/// Two-vertex segment in world coordinates
pub fn drag_line(from: Vec2, to: Vec2) -> [Vertex; 2] {
    [
        Vertex::new(from.x, from.y, colors::DRAG_LINE),
        Vertex::new(to.x, to.y, colors::DRAG_LINE),
    ]
}

fn quad(width: f32, height: f32, color: colors::Color) -> [Vertex; 4] {
    [
        Vertex::new(0.0, 0.0, color),
        Vertex::new(width, 0.0, color),
        Vertex::new(width, height, color),
        Vertex::new(0.0, height, color),
    ]
}

/// Triangle-list indices covering a convex fan of `count` vertices
pub fn fill_indices(count: u32) -> Vec<u16> {
    (1..count.saturating_sub(1))
        .flat_map(|i| [0, i as u16, i as u16 + 1])
        .collect()
}

/// Line-strip indices tracing a closed loop over `count` vertices
pub fn outline_indices(count: u32) -> Vec<u16> {
    (0..count as u16).chain(std::iter::once(0)).collect()
}

/// Relative index ranges for each (vertex count, draw mode) in a layout.
///
/// Indices are relative to a shape's first vertex, so shapes with the same
/// vertex count share ranges; draws pass `first` as the base vertex.
#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    pub indices: Vec<u16>,
    ranges: Vec<(u32, DrawMode, Range<u32>)>,
}

impl IndexTable {
    pub fn build(layout: &ShapeLayout) -> Self {
        let mut table = Self::default();
        for handle in layout.handles() {
            for mode in [DrawMode::Filled, DrawMode::Outline] {
                if table.range(handle.count, mode).is_some() {
                    continue;
                }
                let indices = match mode {
                    DrawMode::Filled => fill_indices(handle.count),
                    DrawMode::Outline => outline_indices(handle.count),
                };
                let start = table.indices.len() as u32;
                table.indices.extend(indices);
                let end = table.indices.len() as u32;
                table.ranges.push((handle.count, mode, start..end));
            }
        }
        table
    }

    pub fn range(&self, count: u32, mode: DrawMode) -> Option<Range<u32>> {
        self.ranges
            .iter()
            .find(|(c, m, _)| *c == count && *m == mode)
            .map(|(_, _, range)| range.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_order_and_counts() {
        let buffer = ShapeBuffer::build(BALL_SEGMENTS);
        let layout = buffer.layout;
        assert_eq!(layout.paddle, ShapeHandle::new(0, 4));
        assert_eq!(layout.ball, ShapeHandle::new(4, BALL_SEGMENTS));
        assert_eq!(layout.border, ShapeHandle::new(4 + BALL_SEGMENTS, 4));
        assert_eq!(layout.drag_line, ShapeHandle::new(8 + BALL_SEGMENTS, 2));
        assert_eq!(buffer.vertices.len() as u32, 10 + BALL_SEGMENTS);
        assert_eq!(buffer.as_bytes().len(), buffer.vertices.len() * 20);
    }

    #[test]
    fn test_ball_segments_configurable() {
        let layout = ShapeBuffer::build(32).layout;
        assert_eq!(layout.ball.count, 32);
        assert_eq!(layout.border.first, 36);
        assert_eq!(ShapeBuffer::build(1).layout.ball.count, 3);
    }

    #[test]
    fn test_huge_ball_segments_clamped() {
        let layout = ShapeBuffer::build(70_000).layout;
        assert_eq!(layout.ball.count, MAX_BALL_SEGMENTS);

        let table = IndexTable::build(&layout);
        let fill = table.range(MAX_BALL_SEGMENTS, DrawMode::Filled).unwrap();
        assert_eq!(fill.end - fill.start, (MAX_BALL_SEGMENTS - 2) * 3);
        let max = table.indices.iter().copied().max().unwrap();
        assert_eq!(max as u32, MAX_BALL_SEGMENTS - 1);
    }

    #[test]
    fn test_ball_fan_on_circle() {
        let fan = ball_fan(16);
        assert_eq!(fan[0].position, [BALL_RADIUS, 0.0]);
        for v in &fan {
            let r = Vec2::from(v.position).length();
            assert!((r - BALL_RADIUS).abs() < 1e-6);
            assert_eq!(v.color, colors::BALL);
        }
        // Quarter turn lands on the y axis
        assert!(fan[4].position[0].abs() < 1e-6);
        assert!((fan[4].position[1] - BALL_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn test_quads_span_their_rectangles() {
        let paddle = paddle_quad();
        assert_eq!(paddle[2].position, [PADDLE_WIDTH, PADDLE_HEIGHT]);
        let border = border_quad();
        assert_eq!(border[2].position, [SCREEN_WIDTH, SCREEN_HEIGHT]);
        assert_eq!(border[0].color, colors::BORDER);
    }

    #[test]
    fn test_drag_line_byte_offset() {
        let layout = ShapeBuffer::build(16).layout;
        assert_eq!(layout.drag_line.byte_offset(), 24 * 20);
        assert_eq!(layout.drag_line.vertices(), 24..26);
    }

    #[test]
    fn test_fill_indices_fan() {
        assert_eq!(fill_indices(4), vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(fill_indices(16).len(), 14 * 3);
        assert!(fill_indices(2).is_empty());
    }

    #[test]
    fn test_outline_indices_close_loop() {
        assert_eq!(outline_indices(4), vec![0, 1, 2, 3, 0]);
        assert_eq!(outline_indices(2), vec![0, 1, 0]);
    }

    #[test]
    fn test_index_table_shares_equal_counts() {
        let layout = ShapeBuffer::build(16).layout;
        let table = IndexTable::build(&layout);
        // Paddle and border are both quads
        let quad_fill = table.range(4, DrawMode::Filled).unwrap();
        assert_eq!(quad_fill, 0..6);
        assert_eq!(table.range(4, DrawMode::Outline).unwrap(), 6..11);
        assert!(table.range(16, DrawMode::Filled).is_some());
        assert!(table.range(2, DrawMode::Outline).is_some());
        assert!(table.range(7, DrawMode::Filled).is_none());
    }
}

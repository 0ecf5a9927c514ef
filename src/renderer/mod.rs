//! WebGPU rendering module
//!
//! Every shape lives in one shared vertex buffer and is drawn flat-coloured
//! through a `RenderBackend`.

pub mod backend;
pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use backend::{DrawMode, RenderBackend, RenderError};
pub use frame::Scene;
pub use pipeline::WgpuBackend;
pub use shapes::{ShapeBuffer, ShapeHandle, ShapeKind, ShapeLayout};
pub use vertex::Vertex;

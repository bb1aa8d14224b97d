//! Rendering module
//!
//! `frame` builds a pure screen-space description of a session; `pipeline`
//! uploads it to WebGPU.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::{Frame, Hud, Overlay, build_frame};
pub use pipeline::RenderState;
pub use vertex::Vertex;

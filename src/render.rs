//! Turning positioned grain sequences into audio: windowed overlap-add, crossfading of rendered
//! blocks, the interpolated render pipeline and a pool for parallel candidate renders.

pub mod block;
pub mod crossfade;
pub mod merge;
pub mod pipeline;
pub mod pool;
pub mod window;

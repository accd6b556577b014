//! Surface handle namespace.
//!
//! A handle is a small integer naming one drawing surface that lives on the
//! engine side of the channel. This module only tracks which integers are live;
//! pixel state is never held on this side.

mod id;
mod registry;

pub use id::SurfaceId;
pub use registry::HandleRegistry;

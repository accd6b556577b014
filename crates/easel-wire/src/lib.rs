//! Easel wire crate.
//!
//! This crate owns the client side of the command channel to an external 2D
//! rendering engine: surface handle bookkeeping, fixed-shape argument records,
//! the byte codec and the single-call-at-a-time dispatcher.
//!
//! Rasterization never happens here. Every drawing request is a single
//! opcode + byte-buffer frame answered by the engine with a byte response.

pub mod channel;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod loopback;
pub mod normalize;
pub mod op;
pub mod record;

pub use channel::Channel;
pub use codec::{Arg, Frame, Outcome};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use handle::{HandleRegistry, SurfaceId};
pub use loopback::LoopbackEngine;
pub use op::{Op, OpNames, OpTable};

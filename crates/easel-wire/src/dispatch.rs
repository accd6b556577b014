use crate::channel::Channel;
use crate::codec::{self, Arg, Outcome, BUFFER_ABSENT, NO_VALUE};
use crate::error::{Error, Result};
use crate::handle::{HandleRegistry, SurfaceId};
use crate::op::{Op, OpNames, OpTable, Reply};

/// Issues operations over one channel and classifies the responses.
///
/// Owns the three pieces of per-channel state:
/// - the channel itself (one call in flight, enforced by `&mut self`)
/// - the opcode table bound at construction
/// - the handle registry for surfaces living behind this channel
///
/// Two dispatchers never share any of these, so independent channels (and
/// tests) cannot contaminate each other's id space.
#[derive(Debug)]
pub struct Dispatcher<C> {
    channel: C,
    ops: OpTable,
    handles: HandleRegistry,
}

impl<C: Channel> Dispatcher<C> {
    /// Binds every operation name against the channel and takes ownership of it.
    pub fn new(channel: C, names: &OpNames) -> Result<Self> {
        let ops = OpTable::bind(names, |name| channel.resolve(name))?;
        log::debug!("dispatcher bound {} operations", Op::COUNT);
        Ok(Self::with_table(channel, ops))
    }

    /// Uses an already-bound table.
    pub fn with_table(channel: C, ops: OpTable) -> Self {
        Self {
            channel,
            ops,
            handles: HandleRegistry::new(),
        }
    }

    #[inline]
    pub fn channel(&self) -> &C {
        &self.channel
    }

    #[inline]
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    #[inline]
    pub fn handles(&self) -> &HandleRegistry {
        &self.handles
    }

    #[inline]
    pub fn ops(&self) -> &OpTable {
        &self.ops
    }

    /// Sends one call and returns the raw response.
    pub fn call(&mut self, op: Op, args: Vec<Arg<'_>>) -> Result<Vec<u8>> {
        let frame = codec::encode(self.ops.code(op), args);
        log::trace!("-> {op} (opcode {}, {} args)", frame.opcode, frame.args.len());
        let response = self
            .channel
            .call(frame.opcode, &frame.args)
            .map_err(Error::Channel)?;
        log::trace!("<- {op} ({} bytes)", response.len());
        Ok(response)
    }

    /// Sends a status-only call. Success is `Ok(())`.
    pub fn call_status(&mut self, op: Op, args: Vec<Arg<'_>>) -> Result<()> {
        let text = codec::decode_text(self.call(op, args)?)?;
        match codec::decode_status(&text) {
            Outcome::Success => Ok(()),
            Outcome::NoValue => {
                log::warn!("{op} answered with the no-value sentinel");
                Err(Error::NoValue { op })
            }
            Outcome::Failure(detail) => {
                log::warn!("{op} failed: {detail}");
                Err(Error::Failed { op, detail })
            }
        }
    }

    /// Sends a text-valued call. The no-value sentinel maps to `None`.
    pub fn call_value(&mut self, op: Op, args: Vec<Arg<'_>>) -> Result<Option<String>> {
        let text = codec::decode_text(self.call(op, args)?)?;
        Ok((text != NO_VALUE).then_some(text))
    }

    /// Sends a buffer-valued call. The op's single-byte sentinel maps to `None`.
    pub fn call_buffer(&mut self, op: Op, args: Vec<Arg<'_>>) -> Result<Option<Vec<u8>>> {
        let absent = match op.reply() {
            Reply::Buffer { absent } => absent,
            _ => BUFFER_ABSENT,
        };
        Ok(codec::decode_buffer(self.call(op, args)?, absent))
    }

    /// Allocates a handle and asks the engine to create a surface under it.
    ///
    /// If the engine refuses, the id goes straight back to the registry and
    /// the surface is considered never constructed.
    pub fn create_surface(&mut self, width: i32, height: i32) -> Result<SurfaceId> {
        let id = self.handles.allocate();
        let created = self.call_status(Op::CreateSurface, vec![id.into(), width.into(), height.into()]);
        match created {
            Ok(()) => {
                log::debug!("surface {id} created ({width}x{height})");
                Ok(id)
            }
            Err(err) => {
                self.handles.release(id);
                Err(match err {
                    Error::Failed { detail, .. } => Error::CreateFailed { detail },
                    Error::NoValue { .. } => Error::CreateFailed { detail: NO_VALUE.to_owned() },
                    other => other,
                })
            }
        }
    }

    /// Asks the engine to destroy `id`; only on success is the id freed.
    pub fn destroy_surface(&mut self, id: SurfaceId) -> Result<()> {
        if !self.handles.is_live(id) {
            return Err(Error::Destroyed(id));
        }
        self.call_status(Op::Destroy, vec![id.into()])?;
        if !self.handles.release(id) {
            log::error!("surface {id} was destroyed but not registered as live");
        }
        log::debug!("surface {id} destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loopback::LoopbackEngine;

    fn dispatcher() -> Dispatcher<LoopbackEngine> {
        Dispatcher::new(LoopbackEngine::new(), &OpNames::new()).unwrap()
    }

    #[test]
    fn create_then_destroy_recycles_the_id() {
        let mut d = dispatcher();
        let a = d.create_surface(10, 10).unwrap();
        let b = d.create_surface(10, 10).unwrap();
        assert_eq!((a, b), (SurfaceId(0), SurfaceId(1)));

        d.destroy_surface(a).unwrap();
        assert!(!d.handles().is_live(a));
        assert_eq!(d.create_surface(5, 5).unwrap(), SurfaceId(0));
    }

    #[test]
    fn refused_creation_releases_the_id() {
        let mut d = dispatcher();
        d.channel_mut().fail_next("out of memory");
        let err = d.create_surface(10, 10).unwrap_err();
        assert!(matches!(err, Error::CreateFailed { ref detail } if detail == "out of memory"));
        assert_eq!(d.handles().live_count(), 0);
        assert_eq!(d.create_surface(10, 10).unwrap(), SurfaceId(0));
    }

    #[test]
    fn refused_destruction_keeps_the_id() {
        let mut d = dispatcher();
        let id = d.create_surface(10, 10).unwrap();
        d.channel_mut().fail_next("busy");
        let err = d.destroy_surface(id).unwrap_err();
        assert!(matches!(err, Error::Failed { op: Op::Destroy, ref detail } if detail == "busy"));
        assert!(d.handles().is_live(id));
    }

    #[test]
    fn destroying_a_dead_id_never_reaches_the_channel() {
        let mut d = dispatcher();
        let id = d.create_surface(10, 10).unwrap();
        d.destroy_surface(id).unwrap();
        let before = d.channel().calls().len();
        assert!(matches!(d.destroy_surface(id), Err(Error::Destroyed(_))));
        assert_eq!(d.channel().calls().len(), before);
    }

    #[test]
    fn failure_detail_is_kept() {
        let mut d = dispatcher();
        let id = d.create_surface(10, 10).unwrap();
        d.channel_mut().fail_next("clip stack underflow");
        let err = d.call_status(Op::PopClip, vec![id.into()]).unwrap_err();
        assert_eq!(err.to_string(), "pop_clip failed: clip stack underflow");
    }

    #[test]
    fn value_calls_map_sentinel_to_none() {
        let mut d = dispatcher();
        let id = d.create_surface(32, 24).unwrap();
        assert_eq!(d.call_value(Op::GetWidth, vec![id.into()]).unwrap().as_deref(), Some("32"));
        assert_eq!(d.call_value(Op::GetHeight, vec![SurfaceId(9).into()]).unwrap(), None);
    }

    #[test]
    fn buffer_calls_use_the_op_sentinel() {
        let mut d = dispatcher();
        let id = d.create_surface(2, 2).unwrap();
        assert_eq!(d.call_buffer(Op::GetPixelData, vec![id.into()]).unwrap().map(|b| b.len()), Some(16));
        assert_eq!(d.call_buffer(Op::GetPixelData, vec![SurfaceId(5).into()]).unwrap(), None);
        assert_eq!(d.call_buffer(Op::Encode, vec![SurfaceId(5).into()]).unwrap(), None);
    }
}

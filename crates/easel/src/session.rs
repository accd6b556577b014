use std::sync::{Arc, Mutex, MutexGuard};

use easel_wire::{Channel, Dispatcher, Error, OpNames, Result};

use crate::config::EaselConfig;
use crate::surface::Surface;

/// Shared owner of one channel, its opcode table and its handle registry.
///
/// All surfaces created from a session (and all clones of it) funnel their
/// calls through a single lock, so at most one call is in flight on the
/// channel and registry updates never race. Hosts that draw from several
/// threads share a session; they never open parallel paths to one engine.
#[derive(Debug)]
pub struct Session<C> {
    inner: Arc<Mutex<Dispatcher<C>>>,
}

impl<C> Clone for Session<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: Channel> Session<C> {
    /// Binds the engine's default operation names.
    pub fn new(channel: C) -> Result<Self> {
        Self::with_names(channel, &OpNames::new())
    }

    pub fn with_config(channel: C, config: &EaselConfig) -> Result<Self> {
        Self::with_names(channel, &config.ops)
    }

    pub fn with_names(channel: C, names: &OpNames) -> Result<Self> {
        Ok(Self::from_dispatcher(Dispatcher::new(channel, names)?))
    }

    pub fn from_dispatcher(dispatcher: Dispatcher<C>) -> Self {
        Self { inner: Arc::new(Mutex::new(dispatcher)) }
    }

    /// Creates a `width` × `height` surface on the engine.
    pub fn create_surface(&self, width: i32, height: i32) -> Result<Surface<C>> {
        let id = self.dispatch(|d| d.create_surface(width, height))?;
        Ok(Surface::bind(self.clone(), id))
    }

    /// Runs `f` with exclusive access to the dispatcher.
    ///
    /// The lock is held for the whole closure, so a call and any registry
    /// update it implies are one atomic step.
    /// Hosts never reach the dispatcher: a handle is only freed through the
    /// [`Surface`] that owns it.
    pub(crate) fn dispatch<R>(
        &self,
        f: impl FnOnce(&mut Dispatcher<C>) -> Result<R>,
    ) -> Result<R> {
        let mut guard = self.lock()?;
        f(&mut guard)
    }

    /// Runs `f` against the channel itself; intended for inspecting test doubles.
    pub fn with_channel<R>(&self, f: impl FnOnce(&mut C) -> R) -> Result<R> {
        let mut guard = self.lock()?;
        Ok(f(guard.channel_mut()))
    }

    /// Number of surfaces currently live on this session.
    pub fn live_surfaces(&self) -> Result<usize> {
        Ok(self.lock()?.handles().live_count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Dispatcher<C>>> {
        self.inner.lock().map_err(|_| Error::Poisoned)
    }
}

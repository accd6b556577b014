/// The narrow, synchronous, byte-oriented link to the rendering engine.
///
/// Contract:
/// - `resolve` maps an engine-side operation name to its opcode; it is only
///   consulted while binding an [`crate::OpTable`]
/// - `call` sends one opcode plus argument buffers and blocks until the
///   complete response is back
///
/// Responses carry no call identifier, so exactly one call may be in flight.
/// `&mut self` on `call` makes that a borrow-checker fact rather than a
/// convention. There is no timeout; a caller that needs one must supervise
/// the call itself.
///
/// Transport failures (the link itself breaking) are `Err`. Engine-level
/// failures are ordinary `Ok` responses carrying a status text.
pub trait Channel {
    fn resolve(&self, name: &str) -> Option<u32>;

    fn call(&mut self, opcode: u32, args: &[Vec<u8>]) -> anyhow::Result<Vec<u8>>;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    #[inline]
    fn resolve(&self, name: &str) -> Option<u32> {
        (**self).resolve(name)
    }

    #[inline]
    fn call(&mut self, opcode: u32, args: &[Vec<u8>]) -> anyhow::Result<Vec<u8>> {
        (**self).call(opcode, args)
    }
}

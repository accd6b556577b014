use std::path::Path as FsPath;

use easel_wire::{Arg, Channel, Dispatcher, Error, Op, Result, SurfaceId};
use easel_wire::record::{
    BlendMode, IntRect, Rgba8, StrokeStyle, Transform, WirePath, WireSource,
};

use crate::session::Session;

/// Lifecycle of a [`Surface`].
///
/// A surface only exists once creation succeeded, so there is no
/// uninitialized state to observe here.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceState {
    Live,
    /// Terminal. Every operation fails locally with [`Error::Destroyed`].
    Destroyed,
}

/// A drawing surface living in the engine, addressed by its handle.
///
/// Every method is exactly one channel call. An engine-side failure is
/// returned as [`Error::Failed`] and leaves the surface live; only a
/// successful [`destroy`](Self::destroy) ends its life. Pixel data is never
/// cached here: `get_data` and `encode` always ask the engine.
///
/// Dropping a live surface issues a best-effort destroy.
#[derive(Debug)]
pub struct Surface<C: Channel> {
    session: Session<C>,
    id: SurfaceId,
    state: SurfaceState,
}

impl<C: Channel> Surface<C> {
    pub(crate) fn bind(session: Session<C>, id: SurfaceId) -> Self {
        Self {
            session,
            id,
            state: SurfaceState::Live,
        }
    }

    #[inline]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    #[inline]
    pub fn state(&self) -> SurfaceState {
        self.state
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.state == SurfaceState::Live
    }

    pub fn session(&self) -> &Session<C> {
        &self.session
    }

    // ── plumbing ──────────────────────────────────────────────────────────

    /// Checks liveness, then runs `f` under the session lock.
    ///
    /// A destroyed handle never reaches the channel: the engine has no
    /// knowledge of freed ids and the id may already name someone else's
    /// surface.
    fn with_live<R>(&self, f: impl FnOnce(&mut Dispatcher<C>, SurfaceId) -> Result<R>) -> Result<R> {
        if self.state == SurfaceState::Destroyed {
            return Err(Error::Destroyed(self.id));
        }
        let id = self.id;
        self.session.dispatch(|d| f(d, id))
    }

    fn status(&self, op: Op, rest: Vec<Arg<'_>>) -> Result<()> {
        self.with_live(|d, id| {
            let mut args: Vec<Arg<'_>> = Vec::with_capacity(rest.len() + 1);
            args.push(id.into());
            args.extend(rest);
            d.call_status(op, args)
        })
    }

    fn value(&self, op: Op) -> Result<Option<i32>> {
        let text = self.with_live(|d, id| d.call_value(op, vec![id.into()]))?;
        text.map(|t| t.parse().map_err(|_| Error::Malformed { op, text: t }))
            .transpose()
    }

    fn buffer(&self, op: Op) -> Result<Option<Vec<u8>>> {
        self.with_live(|d, id| d.call_buffer(op, vec![id.into()]))
    }

    // ── queries ───────────────────────────────────────────────────────────

    pub fn width(&self) -> Result<Option<i32>> {
        self.value(Op::GetWidth)
    }

    pub fn height(&self) -> Result<Option<i32>> {
        self.value(Op::GetHeight)
    }

    /// Raw pixel bytes as the engine stores them (packed ARGB words, native endian).
    pub fn get_data(&self) -> Result<Option<Vec<u8>>> {
        self.buffer(Op::GetPixelData)
    }

    /// Pixel data as `u32` words, `(A << 24) | (R << 16) | (G << 8) | B`.
    pub fn pixels(&self) -> Result<Option<Vec<u32>>> {
        let Some(bytes) = self.get_data()? else {
            return Ok(None);
        };
        if bytes.len() % 4 != 0 {
            return Err(Error::Malformed {
                op: Op::GetPixelData,
                text: format!("{} bytes is not a whole number of pixels", bytes.len()),
            });
        }
        Ok(Some(bytemuck::pod_collect_to_vec::<u8, u32>(&bytes)))
    }

    /// Encoded image bytes, in whatever format the engine produces.
    pub fn encode(&self) -> Result<Option<Vec<u8>>> {
        self.buffer(Op::Encode)
    }

    /// Asks the engine to write the surface to `path` on its side.
    ///
    /// Fails locally with [`Error::NonUtf8Path`] if `path` is not UTF-8.
    pub fn write_file(&self, path: impl AsRef<FsPath>) -> Result<()> {
        let path = path.as_ref();
        let text = path.to_str().ok_or_else(|| Error::NonUtf8Path(path.to_path_buf()))?;
        self.status(Op::WriteFile, vec![Arg::text(text)])
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn clear(&self, color: Rgba8) -> Result<()> {
        let [a, r, g, b] = color.argb();
        self.status(Op::Clear, vec![a.into(), r.into(), g.into(), b.into()])
    }

    pub fn fill_rect(&self, x: f32, y: f32, w: f32, h: f32, src: impl Into<WireSource>) -> Result<()> {
        let src: WireSource = src.into();
        let src = Arg::record(&src)?;
        self.status(Op::FillRect, vec![x.into(), y.into(), w.into(), h.into(), src])
    }

    pub fn fill(&self, path: impl Into<WirePath>, src: impl Into<WireSource>) -> Result<()> {
        let (path, src): (WirePath, WireSource) = (path.into(), src.into());
        let path = Arg::record(&path)?;
        let src = Arg::record(&src)?;
        self.status(Op::FillPath, vec![path, src])
    }

    pub fn stroke(
        &self,
        path: impl Into<WirePath>,
        style: &StrokeStyle,
        src: impl Into<WireSource>,
    ) -> Result<()> {
        let (path, src): (WirePath, WireSource) = (path.into(), src.into());
        let path = Arg::record(&path)?;
        let style = Arg::record(style)?;
        let src = Arg::record(&src)?;
        // The engine reads the paint source before the stroke style.
        self.status(Op::StrokePath, vec![path, src, style])
    }

    /// Draws an encoded image (PNG, JPEG, ...) at its natural size.
    pub fn draw_image_at(&self, image: &[u8], x: f32, y: f32) -> Result<()> {
        self.status(Op::DrawImageAt, vec![Arg::bytes(image), x.into(), y.into()])
    }

    /// Draws an encoded image scaled to `w` × `h`.
    pub fn draw_image_scaled_at(&self, image: &[u8], w: f32, h: f32, x: f32, y: f32) -> Result<()> {
        // Wire order is position first, then size.
        self.status(
            Op::DrawImageScaledAt,
            vec![Arg::bytes(image), x.into(), y.into(), w.into(), h.into()],
        )
    }

    pub fn set_transform(&self, transform: Transform) -> Result<()> {
        let (mode, m) = transform.to_wire();
        let mut args: Vec<Arg<'_>> = Vec::with_capacity(7);
        args.push(mode.into());
        args.extend(m.into_iter().map(Arg::from));
        self.status(Op::SetTransform, args)
    }

    // ── layers & clips ────────────────────────────────────────────────────

    pub fn push_layer(&self, opacity: f32) -> Result<()> {
        self.status(Op::PushLayer, vec![opacity.into()])
    }

    pub fn push_layer_with_blend(&self, opacity: f32, blend: BlendMode) -> Result<()> {
        self.status(Op::PushLayerWithBlend, vec![opacity.into(), Arg::record(&blend)?])
    }

    pub fn pop_layer(&self) -> Result<()> {
        self.status(Op::PopLayer, Vec::new())
    }

    pub fn push_clip(&self, path: impl Into<WirePath>) -> Result<()> {
        let path: WirePath = path.into();
        self.status(Op::PushClipPath, vec![Arg::record(&path)?])
    }

    pub fn push_clip_rect(&self, rect: IntRect) -> Result<()> {
        self.status(
            Op::PushClipRect,
            vec![rect.x1.into(), rect.y1.into(), rect.x2.into(), rect.y2.into()],
        )
    }

    pub fn pop_clip(&self) -> Result<()> {
        self.status(Op::PopClip, Vec::new())
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Destroys the surface on the engine and frees its handle.
    ///
    /// On failure the surface stays live and keeps its handle.
    pub fn destroy(&mut self) -> Result<()> {
        self.with_live(|d, id| d.destroy_surface(id))?;
        self.state = SurfaceState::Destroyed;
        Ok(())
    }
}

impl<C: Channel> Drop for Surface<C> {
    fn drop(&mut self) {
        if self.state != SurfaceState::Live {
            return;
        }
        if let Err(err) = self.destroy() {
            log::warn!("surface {} dropped while live and could not be destroyed: {err}", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_wire::loopback::LoopbackEngine;
    use easel_wire::record::{
        Angle, Gradient, GradientStop, LineCap, PaintSource, Path, PathStep, Point, SpreadMode,
    };

    fn session() -> Session<LoopbackEngine> {
        Session::new(LoopbackEngine::new()).unwrap()
    }

    fn calls(s: &Session<LoopbackEngine>) -> usize {
        s.with_channel(|e| e.calls().len()).unwrap()
    }

    fn last_args(s: &Session<LoopbackEngine>) -> (Op, Vec<String>) {
        s.with_channel(|e| {
            let call = e.last_call().unwrap();
            let args = (0..call.args.len()).map(|i| call.text(i).unwrap_or("<bytes>").to_owned()).collect();
            (call.op, args)
        })
        .unwrap()
    }

    fn triangle() -> Path {
        vec![
            PathStep::MoveTo { x: 100.0, y: 100.0 },
            PathStep::LineTo { x: 300.0, y: 100.0 },
            PathStep::LineTo { x: 200.0, y: 300.0 },
            PathStep::Close,
        ]
        .into()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test_log::test]
    fn create_reports_size_and_binds_lowest_id() {
        let s = session();
        let a = s.create_surface(400, 300).unwrap();
        assert_eq!(a.id(), SurfaceId(0));
        assert_eq!(a.width().unwrap(), Some(400));
        assert_eq!(a.height().unwrap(), Some(300));
        assert!(a.is_live());
    }

    #[test_log::test]
    fn operations_after_destroy_fail_without_a_call() {
        let s = session();
        let mut surface = s.create_surface(10, 10).unwrap();
        surface.destroy().unwrap();
        assert_eq!(surface.state(), SurfaceState::Destroyed);

        let before = calls(&s);
        assert!(matches!(surface.clear(Rgba8::opaque(1, 2, 3)), Err(Error::Destroyed(_))));
        assert!(matches!(surface.fill(&triangle(), &PaintSource::solid(Rgba8::default())), Err(Error::Destroyed(_))));
        assert!(matches!(surface.encode(), Err(Error::Destroyed(_))));
        assert!(matches!(surface.width(), Err(Error::Destroyed(_))));
        assert!(matches!(surface.destroy(), Err(Error::Destroyed(_))));
        assert_eq!(calls(&s), before);
    }

    #[test_log::test]
    fn failed_operation_leaves_surface_live() {
        let s = session();
        let surface = s.create_surface(10, 10).unwrap();
        s.with_channel(|e| e.fail_next("no such font")).unwrap();
        let err = surface.fill_rect(0.0, 0.0, 5.0, 5.0, &PaintSource::solid(Rgba8::opaque(0, 0, 0))).unwrap_err();
        assert!(matches!(err, Error::Failed { op: Op::FillRect, ref detail } if detail == "no such font"));
        assert!(surface.is_live());
        surface.fill_rect(0.0, 0.0, 5.0, 5.0, &PaintSource::solid(Rgba8::opaque(0, 0, 0))).unwrap();
    }

    #[test_log::test]
    fn failed_destroy_keeps_surface_and_id() {
        let s = session();
        let mut surface = s.create_surface(10, 10).unwrap();
        s.with_channel(|e| e.fail_next("1")).unwrap();
        assert!(surface.destroy().is_err());
        assert!(surface.is_live());
        assert_eq!(s.live_surfaces().unwrap(), 1);
        surface.destroy().unwrap();
        assert_eq!(s.live_surfaces().unwrap(), 0);
    }

    #[test_log::test]
    fn dropping_a_live_surface_destroys_it() {
        let s = session();
        {
            let _surface = s.create_surface(4, 4).unwrap();
            assert_eq!(s.with_channel(|e| e.surface_count()).unwrap(), 1);
        }
        assert_eq!(s.with_channel(|e| e.surface_count()).unwrap(), 0);
        assert_eq!(s.live_surfaces().unwrap(), 0);
    }

    #[test_log::test]
    fn refused_creation_registers_nothing() {
        let s = session();
        assert!(matches!(s.create_surface(-1, 10), Err(Error::CreateFailed { .. })));
        assert_eq!(s.live_surfaces().unwrap(), 0);
        assert_eq!(s.create_surface(1, 1).unwrap().id(), SurfaceId(0));
    }

    // ── argument order on the wire ────────────────────────────────────────

    #[test_log::test]
    fn clear_sends_argb_bytes_and_pixels_read_back() {
        let s = session();
        let surface = s.create_surface(2, 1).unwrap();
        surface.clear(Rgba8::new(0x10, 0x20, 0x30, 0xff)).unwrap();
        assert_eq!(last_args(&s), (Op::Clear, vec!["0".into(), "255".into(), "16".into(), "32".into(), "48".into()]));
        assert_eq!(surface.pixels().unwrap(), Some(vec![0xff10_2030, 0xff10_2030]));
        assert_eq!(surface.get_data().unwrap().map(|d| d.len()), Some(8));
    }

    #[test_log::test]
    fn stroke_sends_source_before_style() {
        let s = session();
        let surface = s.create_surface(8, 8).unwrap();
        let style = StrokeStyle { width: 3.0, cap: LineCap::Round, ..StrokeStyle::default() };
        surface.stroke(&triangle(), &style, &PaintSource::solid(Rgba8::opaque(9, 9, 9))).unwrap();
        let (op, args) = last_args(&s);
        assert_eq!(op, Op::StrokePath);
        assert!(args[1].starts_with(r#"{"steps":"#));
        assert!(args[2].starts_with(r#"{"src_type":"Solid""#));
        assert!(args[3].starts_with(r#"{"width":3.0"#));
    }

    #[test_log::test]
    fn scaled_image_sends_position_then_size() {
        let s = session();
        let surface = s.create_surface(8, 8).unwrap();
        let image = [0x89, b'P', b'N', b'G'];
        surface.draw_image_scaled_at(&image, 64.0, 32.0, 5.0, 6.0).unwrap();
        let recorded = s.with_channel(|e| e.last_call().unwrap().clone()).unwrap();
        assert_eq!(recorded.op, Op::DrawImageScaledAt);
        assert_eq!(recorded.args[1], image);
        let rest: Vec<_> = (2..6).map(|i| recorded.text(i).unwrap().to_owned()).collect();
        assert_eq!(rest, vec!["5", "6", "64", "32"]);

        surface.draw_image_at(&image, 1.5, 2.0).unwrap();
        assert_eq!(last_args(&s).1[2..], ["1.5".to_owned(), "2".to_owned()]);
    }

    #[test_log::test]
    fn transform_sends_mode_and_six_components() {
        let s = session();
        let surface = s.create_surface(8, 8).unwrap();
        surface.set_transform(Transform::Rotate(Angle::Degrees(45.0))).unwrap();
        let (op, args) = last_args(&s);
        assert_eq!(op, Op::SetTransform);
        assert_eq!(args, vec!["0", "4", "0", "45", "0", "0", "0", "0"]);
        assert_eq!(s.with_channel(|e| e.transform(0)).unwrap(), Some((4, [0.0, 45.0, 0.0, 0.0, 0.0, 0.0])));
    }

    #[test_log::test]
    fn layers_and_clips_nest() {
        let s = session();
        let surface = s.create_surface(8, 8).unwrap();
        surface.push_layer(0.5).unwrap();
        surface.push_layer_with_blend(1.0, BlendMode::Multiply).unwrap();
        assert_eq!(last_args(&s).1[2], r#""Multiply""#);
        surface.push_clip_rect(IntRect::new(0, 0, 4, 4)).unwrap();
        surface.push_clip(&triangle()).unwrap();
        assert_eq!(s.with_channel(|e| (e.layer_depth(0), e.clip_depth(0))).unwrap(), (Some(2), Some(2)));

        surface.pop_clip().unwrap();
        surface.pop_clip().unwrap();
        surface.pop_layer().unwrap();
        surface.pop_layer().unwrap();
        // Underflow is the engine's call; it comes back as a plain failure.
        assert!(matches!(surface.pop_layer(), Err(Error::Failed { op: Op::PopLayer, .. })));
        assert!(surface.is_live());
    }

    #[test_log::test]
    fn write_file_and_encode_pass_through() {
        let s = session();
        let surface = s.create_surface(1, 1).unwrap();
        surface.write_file("/tmp/out.png").unwrap();
        assert_eq!(last_args(&s), (Op::WriteFile, vec!["0".into(), "/tmp/out.png".into()]));
        assert!(surface.write_file("").is_err());

        let encoded = surface.encode().unwrap().unwrap();
        assert!(encoded.starts_with(easel_wire::loopback::ENCODED_MAGIC));
    }

    #[cfg(unix)]
    #[test_log::test]
    fn non_utf8_path_is_refused_without_a_call() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let s = session();
        let surface = s.create_surface(1, 1).unwrap();
        let before = calls(&s);
        let path = FsPath::new(OsStr::from_bytes(b"/tmp/out\xff.png"));
        let err = surface.write_file(path).unwrap_err();
        assert!(matches!(err, Error::NonUtf8Path(ref p) if p == path));
        assert_eq!(calls(&s), before);
        assert!(surface.is_live());
    }

    #[test_log::test]
    fn non_finite_record_fails_locally() {
        let s = session();
        let surface = s.create_surface(4, 4).unwrap();
        let before = calls(&s);
        let src = PaintSource::RadialGradient {
            gradient: Gradient::default(),
            center: Point::new(2.0, 2.0),
            radius: f32::NAN,
            spread: SpreadMode::Pad,
        };
        assert!(matches!(surface.fill(&triangle(), &src), Err(Error::Encode(_))));
        assert_eq!(calls(&s), before);
        assert!(surface.is_live());
    }

    #[test_log::test]
    fn linear_gradient_fill_is_accepted_by_strict_parser() {
        let s = session();
        let surface = s.create_surface(8, 8).unwrap();
        let src = PaintSource::LinearGradient {
            gradient: Gradient::new(vec![
                GradientStop::new(0.0, Rgba8::opaque(255, 0, 0)),
                GradientStop::new(1.0, Rgba8::opaque(0, 0, 255)),
            ]),
            start: Point::new(0.0, 0.0),
            end: Point::new(8.0, 0.0),
            spread: SpreadMode::Repeat,
        };
        surface.fill_rect(0.0, 0.0, 8.0, 8.0, &src).unwrap();
    }
}

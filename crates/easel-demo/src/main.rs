use anyhow::Context;
use easel::logging::init_logging;
use easel::{
    Angle, BlendMode, EaselConfig, Gradient, GradientStop, IntRect, LineCap, LineJoin,
    LoopbackEngine, PaintSource, Path, PathStep, Point, Rgba8, Session, SpreadMode, StrokeStyle,
    Transform,
};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EaselConfig::load(&path)?,
        None => EaselConfig::default(),
    };
    init_logging(config.logging());

    println!();
    println!("  ╔════════════════════════════════════════╗");
    println!("  ║            EASEL DEMO v0.1             ║");
    println!("  ║   loopback engine  ·  one call / op    ║");
    println!("  ╚════════════════════════════════════════╝");
    println!();

    let session = Session::with_config(LoopbackEngine::new(), &config)
        .context("binding engine operations")?;

    let mut canvas = session.create_surface(400, 400)?;
    log::info!("canvas {} is {:?}x{:?}", canvas.id(), canvas.width()?, canvas.height()?);

    canvas.clear(Rgba8::opaque(0xf4, 0xf1, 0xea))?;

    let triangle: Path = vec![
        PathStep::MoveTo { x: 50.0, y: 350.0 },
        PathStep::LineTo { x: 200.0, y: 50.0 },
        PathStep::LineTo { x: 350.0, y: 350.0 },
        PathStep::Close,
    ]
    .into();
    canvas.fill(&triangle, &PaintSource::solid(Rgba8::opaque(0x22, 0x55, 0x99)))?;

    // ── gradient + stroke ─────────────────────────────────────────────────
    let glow = PaintSource::RadialGradient {
        gradient: Gradient::new(vec![
            GradientStop::new(0.2, Rgba8::new(255, 255, 255, 255)),
            GradientStop::new(0.8, Rgba8::new(255, 180, 0, 200)),
            GradientStop::new(1.0, Rgba8::transparent()),
        ]),
        center: Point::new(200.0, 230.0),
        radius: 90.0,
        spread: SpreadMode::Pad,
    };
    canvas.fill_rect(110.0, 140.0, 180.0, 180.0, &glow)?;

    let outline = StrokeStyle {
        cap: LineCap::Round,
        join: LineJoin::Round,
        ..StrokeStyle::with_width(6.0)
    };
    canvas.stroke(&triangle, &outline, &PaintSource::solid(Rgba8::opaque(0x10, 0x10, 0x10)))?;

    // ── layers & clips ────────────────────────────────────────────────────
    canvas.push_clip_rect(IntRect::new(0, 0, 400, 200))?;
    canvas.push_layer_with_blend(0.6, BlendMode::Multiply)?;
    canvas.set_transform(Transform::Rotate(Angle::Degrees(15.0)))?;
    canvas.fill_rect(40.0, 40.0, 120.0, 60.0, &PaintSource::solid(Rgba8::opaque(200, 30, 60)))?;
    canvas.set_transform(Transform::identity())?;
    canvas.pop_layer()?;
    canvas.pop_clip()?;

    // ── readback ──────────────────────────────────────────────────────────
    let encoded = canvas.encode()?.context("engine produced no encoding")?;
    let pixels = canvas.pixels()?.context("engine produced no pixel data")?;
    println!("  encoded  {} bytes", encoded.len());
    println!("  pixels   {} words, first = {:#010x}", pixels.len(), pixels.first().copied().unwrap_or(0));

    let mut thumb = session.create_surface(100, 100)?;
    thumb.draw_image_scaled_at(&encoded, 100.0, 100.0, 0.0, 0.0)?;
    thumb.destroy()?;

    canvas.destroy()?;
    let calls = session.with_channel(|engine| engine.calls().len())?;
    println!("  {calls} engine calls, {} surfaces live", session.live_surfaces()?);
    println!();

    Ok(())
}

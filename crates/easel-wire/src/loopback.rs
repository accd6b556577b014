//! In-process stand-in for the rendering engine.
//!
//! `LoopbackEngine` implements [`Channel`] without rasterizing anything. It
//! answers with the same status/value/buffer conventions as the real engine
//! and parses every argument strictly into the fixed-shape wire records, so a
//! record that was not fully normalized fails here exactly as it would on the
//! far side. Every call is recorded for inspection.
//!
//! Pixel state is kept only as far as `clear` defines it: a surface's words
//! are all set to the clear color, other draws leave them untouched.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::anyhow;
use serde::de::DeserializeOwned;

use crate::channel::Channel;
use crate::codec::{NO_VALUE, STATUS_OK};
use crate::op::{Op, Reply};
use crate::record::{BlendMode, Rgba8, StrokeStyle, WirePath, WireSource};

/// Prefix of the stand-in buffers returned by `encode`.
pub const ENCODED_MAGIC: &[u8; 4] = b"LOOP";

/// Largest surface, in pixels, the loopback engine agrees to allocate.
pub const MAX_PIXELS: usize = 1 << 24;

/// One call as the engine received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: Op,
    pub args: Vec<Vec<u8>>,
}

impl RecordedCall {
    /// Argument `i` as UTF-8 text, if it is text.
    pub fn text(&self, i: usize) -> Option<&str> {
        self.args.get(i).and_then(|a| std::str::from_utf8(a).ok())
    }
}

#[derive(Debug, Clone)]
struct LoopSurface {
    width: i32,
    height: i32,
    pixels: Vec<u32>,
    layers: usize,
    clips: usize,
    transform: (u8, [f32; 6]),
}

/// Test double for the engine side of the channel.
#[derive(Debug)]
pub struct LoopbackEngine {
    names: Vec<String>,
    surfaces: HashMap<u32, LoopSurface>,
    calls: Vec<RecordedCall>,
    fail_next: Option<String>,
}

impl Default for LoopbackEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopbackEngine {
    /// Registers every operation under its default engine name.
    pub fn new() -> Self {
        Self {
            names: Op::ALL.iter().map(|op| op.default_name().to_owned()).collect(),
            surfaces: HashMap::new(),
            calls: Vec::new(),
            fail_next: None,
        }
    }

    /// Registers `op` under a different name.
    pub fn rename(mut self, op: Op, name: impl Into<String>) -> Self {
        if let Some(i) = Op::ALL.iter().position(|o| *o == op) {
            self.names[i] = name.into();
        }
        self
    }

    /// Answers the next call, whatever it is, with `detail` as its status.
    pub fn fail_next(&mut self, detail: impl Into<String>) {
        self.fail_next = Some(detail.into());
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    pub fn last_call(&self) -> Option<&RecordedCall> {
        self.calls.last()
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn has_surface(&self, id: u32) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn layer_depth(&self, id: u32) -> Option<usize> {
        self.surfaces.get(&id).map(|s| s.layers)
    }

    pub fn clip_depth(&self, id: u32) -> Option<usize> {
        self.surfaces.get(&id).map(|s| s.clips)
    }

    pub fn transform(&self, id: u32) -> Option<(u8, [f32; 6])> {
        self.surfaces.get(&id).map(|s| s.transform)
    }

    fn op_for(&self, opcode: u32) -> Option<Op> {
        let i = opcode.checked_sub(1)? as usize;
        Op::ALL.get(i).copied()
    }

    fn handle(&mut self, op: Op, args: &[Vec<u8>]) -> Result<Vec<u8>, String> {
        let id: u32 = num(args, 0)?;

        if op == Op::CreateSurface {
            let width: i32 = num(args, 1)?;
            let height: i32 = num(args, 2)?;
            if self.surfaces.contains_key(&id) {
                return Err(format!("surface {id} already exists"));
            }
            let len = usize::try_from(width)
                .ok()
                .zip(usize::try_from(height).ok())
                .and_then(|(w, h)| w.checked_mul(h))
                .filter(|&len| len <= MAX_PIXELS)
                .ok_or_else(|| format!("invalid size {width}x{height}"))?;
            self.surfaces.insert(
                id,
                LoopSurface {
                    width,
                    height,
                    pixels: vec![0; len],
                    layers: 0,
                    clips: 0,
                    transform: (1, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
                },
            );
            return Ok(ok());
        }

        if op == Op::Destroy {
            return Ok(match self.surfaces.remove(&id) {
                Some(_) => ok(),
                None => missing(op),
            });
        }

        let Some(surface) = self.surfaces.get_mut(&id) else {
            return Ok(missing(op));
        };

        match op {
            Op::CreateSurface | Op::Destroy => unreachable!("handled above"),
            Op::GetPixelData => {
                return Ok(bytemuck::cast_slice::<u32, u8>(&surface.pixels).to_vec());
            }
            Op::Encode => {
                let mut out = ENCODED_MAGIC.to_vec();
                out.extend_from_slice(&surface.width.to_le_bytes());
                out.extend_from_slice(&surface.height.to_le_bytes());
                out.extend_from_slice(bytemuck::cast_slice(&surface.pixels));
                return Ok(out);
            }
            Op::GetWidth => return Ok(surface.width.to_string().into_bytes()),
            Op::GetHeight => return Ok(surface.height.to_string().into_bytes()),
            Op::WriteFile => {
                if text(args, 1)?.is_empty() {
                    return Err("empty file path".into());
                }
            }
            Op::Clear => {
                let [a, r, g, b]: [u8; 4] = [num(args, 1)?, num(args, 2)?, num(args, 3)?, num(args, 4)?];
                surface.pixels.fill(Rgba8::new(r, g, b, a).to_argb32());
            }
            Op::FillRect => {
                for i in 1..=4 {
                    num::<f32>(args, i)?;
                }
                json::<WireSource>(args, 5)?;
            }
            Op::FillPath => {
                json::<WirePath>(args, 1)?;
                json::<WireSource>(args, 2)?;
            }
            Op::StrokePath => {
                json::<WirePath>(args, 1)?;
                json::<WireSource>(args, 2)?;
                json::<StrokeStyle>(args, 3)?;
            }
            Op::DrawImageAt | Op::DrawImageScaledAt => {
                if raw(args, 1)?.is_empty() {
                    return Err("empty image".into());
                }
                let last = if op == Op::DrawImageAt { 3 } else { 5 };
                for i in 2..=last {
                    num::<f32>(args, i)?;
                }
            }
            Op::SetTransform => {
                let mode: u8 = num(args, 1)?;
                if mode > 4 {
                    return Err(format!("unknown transform mode {mode}"));
                }
                let mut m = [0.0f32; 6];
                for (i, slot) in m.iter_mut().enumerate() {
                    *slot = num(args, i + 2)?;
                }
                surface.transform = (mode, m);
            }
            Op::PushLayer => {
                num::<f32>(args, 1)?;
                surface.layers += 1;
            }
            Op::PushLayerWithBlend => {
                num::<f32>(args, 1)?;
                json::<BlendMode>(args, 2)?;
                surface.layers += 1;
            }
            Op::PopLayer => {
                surface.layers = surface.layers.checked_sub(1).ok_or("layer stack empty")?;
            }
            Op::PushClipPath => {
                json::<WirePath>(args, 1)?;
                surface.clips += 1;
            }
            Op::PushClipRect => {
                for i in 1..=4 {
                    num::<i32>(args, i)?;
                }
                surface.clips += 1;
            }
            Op::PopClip => {
                surface.clips = surface.clips.checked_sub(1).ok_or("clip stack empty")?;
            }
        }
        Ok(ok())
    }
}

impl Channel for LoopbackEngine {
    fn resolve(&self, name: &str) -> Option<u32> {
        self.names.iter().position(|n| n == name).map(|i| i as u32 + 1)
    }

    fn call(&mut self, opcode: u32, args: &[Vec<u8>]) -> anyhow::Result<Vec<u8>> {
        let op = self.op_for(opcode).ok_or_else(|| anyhow!("unknown opcode {opcode}"))?;
        self.calls.push(RecordedCall { op, args: args.to_vec() });

        if let Some(detail) = self.fail_next.take() {
            return Ok(detail.into_bytes());
        }
        Ok(self.handle(op, args).unwrap_or_else(String::into_bytes))
    }
}

fn ok() -> Vec<u8> {
    STATUS_OK.as_bytes().to_vec()
}

fn missing(op: Op) -> Vec<u8> {
    match op.reply() {
        Reply::Status => b"1".to_vec(),
        Reply::Value => NO_VALUE.as_bytes().to_vec(),
        Reply::Buffer { absent } => vec![absent],
    }
}

fn raw(args: &[Vec<u8>], i: usize) -> Result<&[u8], String> {
    args.get(i).map(Vec::as_slice).ok_or_else(|| format!("missing argument {i}"))
}

fn text(args: &[Vec<u8>], i: usize) -> Result<&str, String> {
    std::str::from_utf8(raw(args, i)?).map_err(|_| format!("argument {i} is not text"))
}

fn num<T: FromStr>(args: &[Vec<u8>], i: usize) -> Result<T, String> {
    let s = text(args, i)?;
    s.parse().map_err(|_| format!("argument {i} is not a number: {s:?}"))
}

fn json<T: DeserializeOwned>(args: &[Vec<u8>], i: usize) -> Result<T, String> {
    serde_json::from_slice(raw(args, i)?).map_err(|e| format!("argument {i}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(engine: &mut LoopbackEngine, op: Op, args: &[&[u8]]) -> Vec<u8> {
        let opcode = engine.resolve(op.default_name()).unwrap();
        let args: Vec<Vec<u8>> = args.iter().map(|a| a.to_vec()).collect();
        engine.call(opcode, &args).unwrap()
    }

    #[test]
    fn unknown_opcode_is_a_transport_error() {
        let mut engine = LoopbackEngine::new();
        assert!(engine.call(0, &[]).is_err());
        assert!(engine.call(999, &[]).is_err());
    }

    #[test]
    fn partial_source_record_is_rejected() {
        let mut engine = LoopbackEngine::new();
        assert_eq!(call(&mut engine, Op::CreateSurface, &[b"0", b"4", b"4"]), b"0");
        let partial = br#"{"src_type":"Solid","color":{"r":1,"g":2,"b":3,"a":4}}"#;
        let reply = call(&mut engine, Op::FillRect, &[b"0", b"0", b"0", b"1", b"1", partial]);
        assert!(String::from_utf8(reply).unwrap().contains("missing field"));
    }

    #[test]
    fn clear_fills_argb_words() {
        let mut engine = LoopbackEngine::new();
        call(&mut engine, Op::CreateSurface, &[b"0", b"1", b"2"]);
        assert_eq!(call(&mut engine, Op::Clear, &[b"0", b"255", b"16", b"32", b"48"]), b"0");
        let data = call(&mut engine, Op::GetPixelData, &[b"0"]);
        let words: Vec<u32> = bytemuck::pod_collect_to_vec::<u8, u32>(&data);
        assert_eq!(words, vec![0xff10_2030; 2]);
    }

    #[test]
    fn oversized_create_is_refused_without_allocating() {
        let mut engine = LoopbackEngine::new();
        let max = i32::MAX.to_string();
        let reply = call(&mut engine, Op::CreateSurface, &[b"0", max.as_bytes(), max.as_bytes()]);
        assert!(String::from_utf8(reply).unwrap().starts_with("invalid size"));
        assert_eq!(call(&mut engine, Op::CreateSurface, &[b"0", b"4097", b"4097"]), b"invalid size 4097x4097");
        assert_eq!(engine.surface_count(), 0);
        assert_eq!(call(&mut engine, Op::CreateSurface, &[b"0", b"4096", b"4096"]), b"0");
        assert!(engine.has_surface(0));
    }

    #[test]
    fn duplicate_create_is_refused() {
        let mut engine = LoopbackEngine::new();
        assert_eq!(call(&mut engine, Op::CreateSurface, &[b"3", b"1", b"1"]), b"0");
        assert_ne!(call(&mut engine, Op::CreateSurface, &[b"3", b"1", b"1"]), b"0");
    }

    #[test]
    fn popping_empty_stacks_fails() {
        let mut engine = LoopbackEngine::new();
        call(&mut engine, Op::CreateSurface, &[b"0", b"1", b"1"]);
        assert_eq!(call(&mut engine, Op::PopClip, &[b"0"]), b"clip stack empty");
        assert_eq!(call(&mut engine, Op::PopLayer, &[b"0"]), b"layer stack empty");
    }

    #[test]
    fn renamed_ops_resolve_under_new_name_only() {
        let engine = LoopbackEngine::new().rename(Op::FillPath, "fill_v2");
        assert!(engine.resolve("fill_v2").is_some());
        assert!(engine.resolve("op_dt_fill").is_none());
    }
}

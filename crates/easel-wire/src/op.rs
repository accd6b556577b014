//! Protocol operations and their opcode binding.
//!
//! Operations are named, not numbered: the engine publishes a name → opcode
//! lookup and the numbers are resolved once, when the channel is set up.
//! The resulting [`OpTable`] is handed to the dispatcher; nothing reads
//! opcodes from ambient state.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Every operation the engine understands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    CreateSurface,
    GetPixelData,
    FillRect,
    FillPath,
    StrokePath,
    WriteFile,
    Clear,
    GetHeight,
    GetWidth,
    Encode,
    DrawImageAt,
    DrawImageScaledAt,
    Destroy,
    SetTransform,
    PushLayer,
    PushLayerWithBlend,
    PushClipPath,
    PushClipRect,
    PopClip,
    PopLayer,
}

/// How an operation's response bytes are to be read.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Reply {
    /// Text status: `"0"` or a failure detail.
    Status,
    /// Text value, or `"n"` for no value.
    Value,
    /// Raw buffer; a single byte equal to `absent` means no value.
    Buffer { absent: u8 },
}

impl Op {
    pub const COUNT: usize = 20;

    pub const ALL: [Op; Op::COUNT] = [
        Op::CreateSurface,
        Op::GetPixelData,
        Op::FillRect,
        Op::FillPath,
        Op::StrokePath,
        Op::WriteFile,
        Op::Clear,
        Op::GetHeight,
        Op::GetWidth,
        Op::Encode,
        Op::DrawImageAt,
        Op::DrawImageScaledAt,
        Op::Destroy,
        Op::SetTransform,
        Op::PushLayer,
        Op::PushLayerWithBlend,
        Op::PushClipPath,
        Op::PushClipRect,
        Op::PopClip,
        Op::PopLayer,
    ];

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }

    /// Name the engine registers this operation under.
    pub const fn default_name(self) -> &'static str {
        match self {
            Op::CreateSurface => "op_new_draw_target",
            Op::GetPixelData => "op_dt_get_data",
            Op::FillRect => "op_dt_fill_rect",
            Op::FillPath => "op_dt_fill",
            Op::StrokePath => "op_dt_stroke",
            Op::WriteFile => "op_dt_write_png",
            Op::Clear => "op_dt_clear",
            Op::GetHeight => "op_dt_height",
            Op::GetWidth => "op_dt_width",
            Op::Encode => "op_dt_encode",
            Op::DrawImageAt => "op_dt_draw_image_at",
            Op::DrawImageScaledAt => "op_dt_draw_image_with_size_at",
            Op::Destroy => "op_dt_destroy",
            Op::SetTransform => "op_dt_set_transform",
            Op::PushLayer => "op_dt_push_layer",
            Op::PushLayerWithBlend => "op_dt_push_layer_with_blend",
            Op::PushClipPath => "op_dt_push_clip",
            Op::PushClipRect => "op_dt_push_clip_rect",
            Op::PopClip => "op_dt_pop_clip",
            Op::PopLayer => "op_dt_pop_layer",
        }
    }

    pub const fn reply(self) -> Reply {
        match self {
            Op::GetWidth | Op::GetHeight => Reply::Value,
            Op::GetPixelData => Reply::Buffer { absent: b'1' },
            // The engine answers an unknown handle on encode with "n", not "1".
            Op::Encode => Reply::Buffer { absent: b'n' },
            _ => Reply::Status,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::CreateSurface => "create_surface",
            Op::GetPixelData => "get_pixel_data",
            Op::FillRect => "fill_rect",
            Op::FillPath => "fill_path",
            Op::StrokePath => "stroke_path",
            Op::WriteFile => "write_file",
            Op::Clear => "clear",
            Op::GetHeight => "get_height",
            Op::GetWidth => "get_width",
            Op::Encode => "encode",
            Op::DrawImageAt => "draw_image_at",
            Op::DrawImageScaledAt => "draw_image_scaled_at",
            Op::Destroy => "destroy",
            Op::SetTransform => "set_transform",
            Op::PushLayer => "push_layer",
            Op::PushLayerWithBlend => "push_layer_with_blend",
            Op::PushClipPath => "push_clip_path",
            Op::PushClipRect => "push_clip_rect",
            Op::PopClip => "pop_clip",
            Op::PopLayer => "pop_layer",
        };
        f.write_str(s)
    }
}

/// Engine-side names to bind, with per-operation overrides.
///
/// Deserializes from a JSON object keyed by snake_case operation name:
/// `{"fill_path": "my_fill"}`. Operations not mentioned keep their default name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpNames {
    overrides: BTreeMap<Op, String>,
}

impl OpNames {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(mut self, op: Op, name: impl Into<String>) -> Self {
        self.overrides.insert(op, name.into());
        self
    }

    pub fn name(&self, op: Op) -> &str {
        self.overrides.get(&op).map(String::as_str).unwrap_or(op.default_name())
    }
}

/// Opcodes resolved for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpTable {
    codes: [u32; Op::COUNT],
}

impl OpTable {
    /// Resolves every operation through `resolve`, which maps an engine-side
    /// name to its opcode.
    ///
    /// Fails on the first name the engine does not know; a partially bound
    /// table is never produced.
    pub fn bind<F>(names: &OpNames, mut resolve: F) -> Result<Self>
    where
        F: FnMut(&str) -> Option<u32>,
    {
        let mut codes = [0u32; Op::COUNT];
        for op in Op::ALL {
            let name = names.name(op);
            codes[op.index()] = resolve(name).ok_or_else(|| Error::Unbound(name.to_owned()))?;
            log::trace!("bound {op} -> {name} ({})", codes[op.index()]);
        }
        Ok(Self { codes })
    }

    #[inline]
    pub fn code(&self, op: Op) -> u32 {
        self.codes[op.index()]
    }
}

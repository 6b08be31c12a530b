use std::{collections::HashMap, path::Path};

use anyhow::Context as _;

use crate::foundation::error::{ScrollreelError, ScrollreelResult};

/// Shaped single-line label ready for glyph rasterization.
pub struct ShapedText<'a> {
    pub layout: &'a parley::Layout<()>,
    pub font: &'a vello_cpu::peniko::FontData,
    /// Advance width of the widest line.
    pub width: f64,
    /// Baseline of the first line, measured from the layout top.
    pub baseline: f64,
}

/// Shapes labels with one user-supplied font and caches the layouts by
/// content and size.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family: String,
    font: vello_cpu::peniko::FontData,
    layouts: HashMap<(String, u32), parley::Layout<()>>,
}

impl TextEngine {
    /// Register a TrueType/OpenType font. Only face 0 is used.
    pub fn from_bytes(bytes: Vec<u8>) -> ScrollreelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            ScrollreelError::validation("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ScrollreelError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), 0),
            layouts: HashMap::new(),
        })
    }

    pub fn from_file(path: &Path) -> ScrollreelResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// `None` for empty content or a size that is not finite and positive.
    pub fn shape(&mut self, content: &str, size: f32) -> Option<ShapedText<'_>> {
        if content.is_empty() || !size.is_finite() || size <= 0.0 {
            return None;
        }
        let Self {
            font_ctx,
            layout_ctx,
            family,
            font,
            layouts,
        } = self;
        let layout = layouts
            .entry((content.to_owned(), size.to_bits()))
            .or_insert_with(|| build_layout(font_ctx, layout_ctx, family, content, size));
        let baseline = layout
            .lines()
            .next()
            .map_or(0.0, |line| line.metrics().baseline);
        Some(ShapedText {
            width: f64::from(layout.width()),
            baseline: f64::from(baseline),
            layout,
            font,
        })
    }
}

fn build_layout(
    font_ctx: &mut parley::FontContext,
    layout_ctx: &mut parley::LayoutContext<()>,
    family: &str,
    content: &str,
    size: f32,
) -> parley::Layout<()> {
    let mut builder = layout_ctx.ranged_builder(font_ctx, content, 1.0, true);
    builder.push_default(parley::style::StyleProperty::FontStack(
        parley::style::FontStack::Source(std::borrow::Cow::Owned(family.to_owned())),
    ));
    builder.push_default(parley::style::StyleProperty::FontSize(size));

    let mut layout: parley::Layout<()> = builder.build(content);
    layout.break_all_lines(None);
    layout
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;

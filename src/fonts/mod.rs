use indexmap::IndexMap;
use serde::Serialize;

use crate::glyph_map::GlyphMap;
use crate::values::Value;
use crate::widths::WidthTable;

/// Integer descriptor entries a PDF FontDescriptor takes over verbatim.
pub const DESCRIPTOR_KEYS: &[&str] = &[
    "Flags",
    "ItalicAngle",
    "Ascent",
    "Descent",
    "Leading",
    "CapHeight",
    "XHeight",
    "StemV",
    "StemH",
    "AvgWidth",
    "MaxWidth",
    "MissingWidth",
];

/// Everything a metrics file says about a font, apart from its widths and
/// glyph mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub font_type: String,
    pub font_name: String,
    pub underline_position: f64,
    pub underline_thickness: f64,
    pub default_width: i32,
    pub diff_list: String,
    pub original_size: i64,
    pub encoding_name: String,
    pub cid_system_info: IndexMap<String, Value>,
    pub descriptor_fields: IndexMap<String, Value>,
    pub bounding_box: (i32, i32, i32, i32),
}

impl MetricsRecord {
    pub fn descriptor_int(&self, key: &str) -> Option<i64> {
        self.descriptor_fields.get(key).and_then(Value::as_int)
    }

    /// `/Registry`, `/Ordering` and `/Supplement` of the CID system info.
    pub fn registry(&self) -> Option<&str> {
        self.cid_system_info.get("Registry").and_then(Value::as_str)
    }

    pub fn ordering(&self) -> Option<&str> {
        self.cid_system_info.get("Ordering").and_then(Value::as_str)
    }

    pub fn supplement(&self) -> Option<i64> {
        self.cid_system_info.get("Supplement").and_then(Value::as_int)
    }

    /// Font name combined with the CMap name, e.g. `ArialUnicodeMS-UniJIS-UTF16-H`.
    pub fn base_font_name(&self) -> String {
        if self.encoding_name.is_empty() {
            self.font_name.clone()
        } else {
            format!("{}-{}", self.font_name, self.encoding_name)
        }
    }
}

/// The result of compiling one metrics file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledFont {
    pub record: MetricsRecord,
    pub widths: WidthTable,
    pub glyphs: GlyphMap,
}

impl CompiledFont {
    /// Identifier the width table uses for `ch`, resolved the same way the
    /// table was compiled.
    pub fn identifier(&self, ch: char) -> Option<u32> {
        let codepoint = ch as u32;
        match self.glyphs.glyph_id(codepoint) {
            Some(glyph_id) => Some(glyph_id),
            None if codepoint != 0 && codepoint < 256 => Some(codepoint),
            None => None,
        }
    }

    pub fn char_width(&self, ch: char) -> i32 {
        match self.identifier(ch) {
            Some(id) => self.widths.width_of(id),
            None => self.widths.default_width(),
        }
    }

    /// Advance width of `text` at `size`, in text space units.
    pub fn text_width(&self, text: &str, size: f64) -> f64 {
        let units: i64 = text.chars().map(|ch| i64::from(self.char_width(ch))).sum();
        units as f64 / 1000.0 * size
    }

    /// Two-byte codes for `text`, ready for a string operand.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.glyphs.encode_char(ch))
            .collect()
    }
}

use indexmap::IndexMap;
use serde::Serialize;

/// The unicode to glyph-id relation read from a `uni2cid` table.
///
/// The relation is not injective: several codepoints may share one glyph id.
/// `inverse` keeps, for each glyph id, the two-byte code of the codepoint
/// written *last* in the table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlyphMap {
    forward: IndexMap<u32, u32>,
    inverse: IndexMap<u32, [u8; 2]>,
}

impl GlyphMap {
    /// Builds both directions from a codepoint to glyph-id table, iterating
    /// in the order the table was written.
    pub fn from_uni2cid(forward: IndexMap<u32, u32>) -> Self {
        let mut inverse = IndexMap::with_capacity(forward.len());
        for (&codepoint, &glyph_id) in &forward {
            inverse.insert(glyph_id, code_for(codepoint));
        }
        Self { forward, inverse }
    }

    pub fn forward(&self) -> &IndexMap<u32, u32> {
        &self.forward
    }

    pub fn inverse(&self) -> &IndexMap<u32, [u8; 2]> {
        &self.inverse
    }

    pub fn glyph_id(&self, codepoint: u32) -> Option<u32> {
        self.forward.get(&codepoint).copied()
    }

    pub fn code_for_glyph(&self, glyph_id: u32) -> Option<[u8; 2]> {
        self.inverse.get(&glyph_id).copied()
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    /// Two-byte code used in a content stream for `ch`.
    ///
    /// Goes through the glyph id, so characters that share a glyph come out
    /// as the same code. Characters outside the table use their own
    /// codepoint.
    pub fn encode_char(&self, ch: char) -> [u8; 2] {
        let codepoint = ch as u32;
        self.glyph_id(codepoint)
            .and_then(|glyph_id| self.code_for_glyph(glyph_id))
            .unwrap_or_else(|| code_for(codepoint))
    }
}

/// Big-endian two-byte code. Codepoints above U+FFFF keep their low 16 bits.
pub fn code_for(codepoint: u32) -> [u8; 2] {
    (codepoint as u16).to_be_bytes()
}

//! Compaction of per-character widths into `(start, end, width)` ranges.
//!
//! The output mirrors the `[c_first c_last w]` form of a CIDFont `/W` array.
//! Widths equal to the font's default width are never written: a reader
//! assumes the default for every identifier not covered by a range.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::logging::CID_WIDTHS;

/// Identifiers `start..=end` all have `width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidthRange {
    pub start: u32,
    pub end: u32,
    pub width: i32,
}

impl WidthRange {
    fn single(id: u32, width: i32) -> Self {
        Self {
            start: id,
            end: id,
            width,
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        (self.start..=self.end).contains(&id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidthTable {
    default_width: i32,
    ranges: Vec<WidthRange>,
}

impl WidthTable {
    /// Compiles a codepoint to width map.
    ///
    /// Each codepoint is first turned into an identifier: its glyph id when
    /// `glyphs` maps it, the codepoint itself below 256, and otherwise the
    /// entry is dropped. Codepoint 0 is always dropped. If two codepoints
    /// land on the same identifier, the later entry wins.
    pub fn compile(
        raw: &IndexMap<u32, i32>,
        glyphs: &IndexMap<u32, u32>,
        default_width: i32,
    ) -> Self {
        let mut by_id = BTreeMap::new();
        for (&codepoint, &width) in raw {
            if codepoint == 0 {
                continue;
            }
            let id = match glyphs.get(&codepoint) {
                Some(&glyph_id) => glyph_id,
                None if codepoint < 256 => codepoint,
                None => continue,
            };
            by_id.insert(id, width);
        }

        let mut ranges = Vec::new();
        let mut open: Option<WidthRange> = None;
        for (id, width) in by_id {
            if width == default_width {
                ranges.extend(open.take());
                continue;
            }
            match open.as_mut() {
                Some(range) if range.width == width && range.end + 1 == id => range.end = id,
                _ => ranges.extend(open.replace(WidthRange::single(id, width))),
            }
        }
        ranges.extend(open);

        debug!(
            target: CID_WIDTHS,
            entries = raw.len(),
            ranges = ranges.len(),
            default_width,
            "compiled width table"
        );

        Self {
            default_width,
            ranges,
        }
    }

    pub fn default_width(&self) -> i32 {
        self.default_width
    }

    pub fn ranges(&self) -> &[WidthRange] {
        &self.ranges
    }

    /// Width of the glyph with identifier `id`.
    pub fn width_of(&self, id: u32) -> i32 {
        let idx = self.ranges.partition_point(|r| r.end < id);
        match self.ranges.get(idx) {
            Some(range) if range.contains(id) => range.width,
            _ => self.default_width,
        }
    }

    /// Every explicitly encoded identifier with its width.
    pub fn expand(&self) -> BTreeMap<u32, i32> {
        self.ranges
            .iter()
            .flat_map(|r| (r.start..=r.end).map(move |id| (id, r.width)))
            .collect()
    }
}

//! Line-by-line assembly of a [`CompiledFont`] from a metrics file.
//!
//! Fields are dispatched through [`FIELDS`]. Anything not listed there is
//! ignored. The include line must come before `$cw`, since widths are keyed
//! by glyph id.

use std::io::BufRead;
use std::str::FromStr;

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::error::{MetricsError, Result};
use crate::fonts::{CompiledFont, MetricsRecord};
use crate::glyph_map::GlyphMap;
use crate::include::{parse_include, IncludeResolver};
use crate::logging::{CID_INCLUDE, CID_PARSING};
use crate::tokenize::parse_assignment;
use crate::values::{parse_bbox, parse_int_map, parse_mixed_array, Value};
use crate::widths::WidthTable;

/// Field of an included file holding the unicode to CID table.
pub const UNI2CID_FIELD: &str = "$cidinfo['uni2cid']";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Fresh,
    Parsing,
    Complete,
    Failed,
}

/// What [`MetricsAssembler::feed_line`] did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not an assignment.
    Skipped,
    /// An include directive; the glyph map was (re)built if the included
    /// file had a unicode to CID table.
    Included,
    /// A known field, stored under this name.
    Applied(&'static str),
    /// An assignment to a field nobody reads.
    Ignored,
}

#[derive(Debug, Default)]
struct Draft {
    font_type: Option<String>,
    font_name: Option<String>,
    underline_position: Option<f64>,
    underline_thickness: Option<f64>,
    default_width: Option<i32>,
    diff_list: Option<String>,
    original_size: Option<i64>,
    encoding_name: Option<String>,
    cid_system_info: Option<IndexMap<String, Value>>,
    descriptor_fields: Option<IndexMap<String, Value>>,
    bounding_box: Option<(i32, i32, i32, i32)>,
    glyphs: Option<GlyphMap>,
    widths: Option<WidthTable>,
}

impl Draft {
    fn into_font(self) -> Result<CompiledFont> {
        fn required<T>(slot: Option<T>, field: &'static str) -> Result<T> {
            slot.ok_or(MetricsError::IncompleteRecord { field })
        }

        let record = MetricsRecord {
            font_type: required(self.font_type, "$type")?,
            font_name: self.font_name.unwrap_or_default(),
            underline_position: self.underline_position.unwrap_or_default(),
            underline_thickness: self.underline_thickness.unwrap_or_default(),
            default_width: required(self.default_width, "$dw")?,
            diff_list: self.diff_list.unwrap_or_default(),
            original_size: self.original_size.unwrap_or_default(),
            encoding_name: self.encoding_name.unwrap_or_default(),
            cid_system_info: required(self.cid_system_info, "$cidinfo")?,
            descriptor_fields: required(self.descriptor_fields, "$desc")?,
            bounding_box: required(self.bounding_box, "$desc")?,
        };
        Ok(CompiledFont {
            record,
            widths: required(self.widths, "$cw")?,
            glyphs: required(self.glyphs, UNI2CID_FIELD)?,
        })
    }
}

type Apply = fn(&mut Draft, &str) -> Result<()>;

/// A metrics-file field and where its value goes.
pub struct Field {
    pub name: &'static str,
    apply: Apply,
}

pub static FIELDS: &[Field] = &[
    Field {
        name: "$type",
        apply: |d, v| {
            d.font_type = Some(v.to_string());
            Ok(())
        },
    },
    Field {
        name: "$name",
        apply: |d, v| {
            d.font_name = Some(v.to_string());
            Ok(())
        },
    },
    Field {
        name: "$up",
        apply: |d, v| {
            d.underline_position = Some(number("$up", v)?);
            Ok(())
        },
    },
    Field {
        name: "$ut",
        apply: |d, v| {
            d.underline_thickness = Some(number("$ut", v)?);
            Ok(())
        },
    },
    Field {
        name: "$dw",
        apply: |d, v| {
            // Written as a float in some files; the fraction is dropped.
            d.default_width = Some(number::<f64>("$dw", v)? as i32);
            Ok(())
        },
    },
    Field {
        name: "$diff",
        apply: |d, v| {
            d.diff_list = Some(v.to_string());
            Ok(())
        },
    },
    Field {
        name: "$originalsize",
        apply: |d, v| {
            d.original_size = Some(number("$originalsize", v)?);
            Ok(())
        },
    },
    Field {
        name: "$enc",
        apply: |d, v| {
            d.encoding_name = Some(v.to_string());
            Ok(())
        },
    },
    Field {
        name: "$cidinfo",
        apply: |d, v| {
            d.cid_system_info = Some(parse_mixed_array(v)?);
            Ok(())
        },
    },
    Field {
        name: "$desc",
        apply: apply_descriptor,
    },
    Field {
        name: "$cw",
        apply: apply_widths,
    },
];

fn number<T: FromStr>(field: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| MetricsError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn apply_descriptor(draft: &mut Draft, value: &str) -> Result<()> {
    let desc = parse_mixed_array(value)?;
    let bbox = desc
        .get("FontBBox")
        .and_then(Value::as_str)
        .ok_or_else(|| MetricsError::malformed_array(value, "no FontBBox string"))?;
    draft.bounding_box = Some(parse_bbox(bbox)?);
    draft.descriptor_fields = Some(desc);
    Ok(())
}

fn out_of_order(requires: &'static str) -> MetricsError {
    MetricsError::OutOfOrderInput {
        field: "$cw".to_string(),
        requires,
    }
}

fn apply_widths(draft: &mut Draft, value: &str) -> Result<()> {
    let glyphs = draft
        .glyphs
        .as_ref()
        .ok_or_else(|| out_of_order(UNI2CID_FIELD))?;
    let default_width = draft
        .default_width
        .ok_or_else(|| out_of_order("$dw"))?;

    let raw: IndexMap<u32, i32> = parse_int_map(value)?;
    draft.widths = Some(WidthTable::compile(&raw, glyphs.forward(), default_width));
    Ok(())
}

/// One parse session.
///
/// Feeding lines moves it from `Fresh` to `Parsing`; [`finish`] ends in
/// `Complete`. Any error moves it to `Failed` and discards everything read
/// so far. A finished or failed session refuses further input.
///
/// [`finish`]: MetricsAssembler::finish
pub struct MetricsAssembler<R> {
    resolver: R,
    state: AssemblerState,
    draft: Draft,
    line_number: usize,
}

impl<R: IncludeResolver> MetricsAssembler<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            state: AssemblerState::Fresh,
            draft: Draft::default(),
            line_number: 0,
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn feed_line(&mut self, line: &str) -> Result<LineOutcome> {
        self.open()?;
        self.line_number += 1;
        let outcome = self.consume(line);
        outcome.map_err(|e| self.fail(e))
    }

    /// Feeds every line of `reader`.
    pub fn feed<B: BufRead>(&mut self, reader: B) -> Result<()> {
        self.open()?;
        for line in reader.lines() {
            let line = line.map_err(|e| self.fail(e.into()))?;
            self.feed_line(&line)?;
        }
        Ok(())
    }

    /// Validates what was read and hands out the compiled font.
    pub fn finish(&mut self) -> Result<CompiledFont> {
        self.open()?;
        match std::mem::take(&mut self.draft).into_font() {
            Ok(font) => {
                self.state = AssemblerState::Complete;
                debug!(
                    target: CID_PARSING,
                    lines = self.line_number,
                    font = %font.record.font_name,
                    ranges = font.widths.ranges().len(),
                    "metrics complete"
                );
                Ok(font)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn open(&mut self) -> Result<()> {
        match self.state {
            AssemblerState::Fresh => {
                self.state = AssemblerState::Parsing;
                Ok(())
            }
            AssemblerState::Parsing => Ok(()),
            state => Err(MetricsError::SessionClosed { state }),
        }
    }

    fn fail(&mut self, error: MetricsError) -> MetricsError {
        warn!(target: CID_PARSING, line = self.line_number, %error, "metrics parse failed");
        self.state = AssemblerState::Failed;
        self.draft = Draft::default();
        error
    }

    fn consume(&mut self, line: &str) -> Result<LineOutcome> {
        if let Some(name) = parse_include(line)? {
            self.include(name, line)?;
            return Ok(LineOutcome::Included);
        }

        let Some(assignment) = parse_assignment(line)? else {
            return Ok(LineOutcome::Skipped);
        };
        match FIELDS.iter().find(|f| f.name == assignment.name) {
            Some(field) => {
                trace!(target: CID_PARSING, field = field.name, "applying field");
                (field.apply)(&mut self.draft, assignment.value)?;
                Ok(LineOutcome::Applied(field.name))
            }
            None => {
                debug!(target: CID_PARSING, field = assignment.name, "ignoring unknown field");
                Ok(LineOutcome::Ignored)
            }
        }
    }

    fn include(&mut self, name: &str, line: &str) -> Result<()> {
        let unresolved = |source| MetricsError::UnresolvedInclude {
            name: name.to_string(),
            line: line.to_string(),
            source,
        };
        let reader = self.resolver.open(name).map_err(unresolved)?;
        debug!(target: CID_INCLUDE, name, "reading included file");

        for included in reader.lines() {
            let included = included.map_err(unresolved)?;
            let Some(assignment) = parse_assignment(&included)? else {
                continue;
            };
            if assignment.name == UNI2CID_FIELD {
                let forward: IndexMap<u32, u32> = parse_int_map(assignment.value)?;
                let glyphs = GlyphMap::from_uni2cid(forward);
                debug!(
                    target: CID_INCLUDE,
                    name,
                    codepoints = glyphs.len(),
                    glyph_ids = glyphs.inverse().len(),
                    "built glyph map"
                );
                self.draft.glyphs = Some(glyphs);
            }
        }

        if self.draft.glyphs.is_none() {
            warn!(target: CID_INCLUDE, name, "included file has no {}", UNI2CID_FIELD);
        }
        Ok(())
    }
}

/// Runs a whole session over `reader`.
pub fn assemble<B: BufRead, R: IncludeResolver>(reader: B, resolver: R) -> Result<CompiledFont> {
    let mut assembler = MetricsAssembler::new(resolver);
    assembler.feed(reader)?;
    assembler.finish()
}

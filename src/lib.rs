//! Compiles TCPDF-style CID font metrics files into a font record, a glyph
//! map and a compact `/W`-style width table.
//!
//! ```no_run
//! use cidmetrics::{load_font, FontSource};
//!
//! let font = load_font(FontSource::path("fonts/cid0jp.php"))?;
//! println!("{} ranges", font.widths.ranges().len());
//! # Ok::<(), cidmetrics::MetricsError>(())
//! ```

pub mod assemble;
pub mod error;
pub mod fonts;
pub mod glyph_map;
pub mod include;
pub mod logging;
pub mod pdf;
pub mod source;
pub mod tokenize;
pub mod values;
pub mod widths;

pub use assemble::{assemble, AssemblerState, LineOutcome, MetricsAssembler};
pub use error::{MetricsError, Result};
pub use fonts::{CompiledFont, MetricsRecord};
pub use glyph_map::GlyphMap;
pub use include::{FsResolver, IncludeResolver, MemoryResolver, NullResolver};
pub use source::{load_font, load_font_with, FontSource};
pub use values::Value;
pub use widths::{WidthRange, WidthTable};

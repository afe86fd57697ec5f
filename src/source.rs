use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::assemble::assemble;
use crate::error::{MetricsError, Result};
use crate::fonts::CompiledFont;
use crate::include::{FsResolver, IncludeResolver, NullResolver};

/// Where the primary metrics file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A metrics file on disk. Includes are looked up next to it.
    Path(PathBuf),
    /// Metrics text already in memory.
    Text(String),
}

impl FontSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FontSource::Path(path.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        FontSource::Text(text.into())
    }
}

/// Loads a font, resolving includes relative to the metrics file.
///
/// In-memory sources get no include resolver; use [`load_font_with`] when
/// their includes must be found somewhere.
pub fn load_font(source: FontSource) -> Result<CompiledFont> {
    match source {
        FontSource::Path(path) => {
            let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
            load_path(&path, FsResolver::new(base))
        }
        FontSource::Text(text) => assemble(Cursor::new(text), NullResolver),
    }
}

/// Loads a font with an explicit include resolver.
pub fn load_font_with<R: IncludeResolver>(source: FontSource, resolver: R) -> Result<CompiledFont> {
    match source {
        FontSource::Path(path) => load_path(&path, resolver),
        FontSource::Text(text) => assemble(Cursor::new(text), resolver),
    }
}

fn load_path<R: IncludeResolver>(path: &Path, resolver: R) -> Result<CompiledFont> {
    let file = File::open(path).map_err(|source| MetricsError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "loading font metrics");
    assemble(BufReader::new(file), resolver)
}

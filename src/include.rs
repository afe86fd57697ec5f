//! `include(...)` directives and the collaborators that resolve them.
//!
//! A metrics file pulls in its unicode to CID table with a line such as
//!
//! ```text
//! include(dirname(__FILE__).'/uni2cid_aj16.php');
//! ```
//!
//! Only the file name is extracted here. Where that name is looked up is up
//! to the [`IncludeResolver`] the caller hands to the assembler.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::PathBuf;

use crate::error::{MetricsError, Result};

const INCLUDE_PREFIX: &str = "include(";

/// Returns the included file name if `line` is an include directive.
///
/// The name is the last quoted string on the line, stripped of any directory
/// part.
pub fn parse_include(line: &str) -> Result<Option<&str>> {
    let line_trimmed = line.trim_start();
    if !line_trimmed.starts_with(INCLUDE_PREFIX) {
        return Ok(None);
    }

    let malformed = || MetricsError::MalformedAssignment {
        line: line.to_string(),
    };
    let end = line_trimmed.rfind('\'').ok_or_else(malformed)?;
    let start = line_trimmed[..end].rfind('\'').ok_or_else(malformed)? + 1;
    let quoted = &line_trimmed[start..end];
    let name = match quoted.rfind('/') {
        Some(slash) => &quoted[slash + 1..],
        None => quoted,
    };
    if name.is_empty() {
        return Err(malformed());
    }
    Ok(Some(name))
}

/// Opens included files by name.
pub trait IncludeResolver {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>>;
}

impl<R: IncludeResolver + ?Sized> IncludeResolver for &R {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        (**self).open(name)
    }
}

/// Resolves names against a directory, normally the one holding the
/// metrics file itself.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base: PathBuf,
}

impl FsResolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl IncludeResolver for FsResolver {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        let file = File::open(self.base.join(name))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory files, for bundled resources and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    files: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(name.into(), contents.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        match self.files.get(name) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone().into_bytes()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no bundled file named {name}"),
            )),
        }
    }
}

/// Fails every lookup. Used for in-memory sources with nothing to include.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl IncludeResolver for NullResolver {
    fn open(&self, name: &str) -> io::Result<Box<dyn BufRead>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("cannot resolve {name}: no include source configured"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn extracts_file_name_from_tcpdf_include() {
        let line = "include(dirname(__FILE__).'/uni2cid_aj16.php');";
        assert_eq!(parse_include(line).unwrap(), Some("uni2cid_aj16.php"));
    }

    #[test]
    fn extracts_bare_file_name() {
        assert_eq!(
            parse_include("include('uni2cid_ak12.php');").unwrap(),
            Some("uni2cid_ak12.php")
        );
        assert_eq!(
            parse_include("  include('fonts/cid/uni2cid_ag15.php');").unwrap(),
            Some("uni2cid_ag15.php")
        );
    }

    #[test]
    fn other_lines_are_not_includes() {
        assert_eq!(parse_include("$dw=1000;").unwrap(), None);
        assert_eq!(parse_include("// include('x.php');").unwrap(), None);
    }

    #[test]
    fn unquoted_include_is_malformed() {
        let err = parse_include("include(dirname(__FILE__));").unwrap_err();
        assert!(matches!(err, MetricsError::MalformedAssignment { .. }));
    }

    #[test]
    fn memory_resolver_serves_registered_files() {
        let resolver = MemoryResolver::new().with_file("a.php", "<?php\n");
        let mut text = String::new();
        resolver
            .open("a.php")
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "<?php\n");

        let err = resolver.open("b.php").err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert_eq!(NullResolver.open("a.php").err().unwrap().kind(), io::ErrorKind::NotFound);
    }
}

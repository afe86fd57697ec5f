//! Splitting of metrics-file statements into `name = value` pairs.
//!
//! The metrics files are PHP sources, but only a tiny subset is understood:
//! one assignment per line, terminated by `;`. Quoted values are unwrapped
//! greedily up to the last quote on the line, so a value such as
//! `'a' . 'b'` comes back as `a' . 'b`.

use crate::error::{MetricsError, Result};

/// A single `name = value` statement.
///
/// `name` is kept verbatim (`$cw`, `$cidinfo['uni2cid']`) and is the dispatch
/// key for the assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Returns `Ok(None)` for lines that are not assignments (no `=`).
pub fn parse_assignment(line: &str) -> Result<Option<Assignment<'_>>> {
    let Some((name, rest)) = line.split_once('=') else {
        return Ok(None);
    };
    let name = name.trim();
    let rest = rest.trim_start();

    let value = if rest.starts_with('\'') {
        match rest.rfind('\'') {
            Some(end) if end > 0 => rest[1..end].trim(),
            _ => return Err(malformed(line)),
        }
    } else {
        match rest.find(';') {
            Some(end) => rest[..end].trim(),
            None => return Err(malformed(line)),
        }
    };

    Ok(Some(Assignment { name, value }))
}

fn malformed(line: &str) -> MetricsError {
    MetricsError::MalformedAssignment {
        line: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_without_equals_are_skipped() {
        assert_eq!(parse_assignment("<?php").unwrap(), None);
        assert_eq!(parse_assignment("// TCPDF FONT FILE DESCRIPTION").unwrap(), None);
        assert_eq!(parse_assignment("").unwrap(), None);
    }

    #[test]
    fn unquoted_value_stops_at_semicolon() {
        let a = parse_assignment("$dw=1000;").unwrap().unwrap();
        assert_eq!(a.name, "$dw");
        assert_eq!(a.value, "1000");

        let a = parse_assignment("  $up = -130 ; // underline").unwrap().unwrap();
        assert_eq!(a.name, "$up");
        assert_eq!(a.value, "-130");
    }

    #[test]
    fn quoted_value_is_unwrapped() {
        let a = parse_assignment("$enc='UniJIS-UTF16-H';").unwrap().unwrap();
        assert_eq!(a.value, "UniJIS-UTF16-H");

        let a = parse_assignment("$diff='';").unwrap().unwrap();
        assert_eq!(a.value, "");
    }

    #[test]
    fn quoted_value_runs_to_last_quote() {
        let a = parse_assignment("$name='Arial'.'Unicode';").unwrap().unwrap();
        assert_eq!(a.value, "Arial'.'Unicode");
    }

    #[test]
    fn name_keeps_array_suffix() {
        let a = parse_assignment("$cidinfo['uni2cid']=array(32=>1,33=>2);")
            .unwrap()
            .unwrap();
        assert_eq!(a.name, "$cidinfo['uni2cid']");
        assert_eq!(a.value, "array(32=>1,33=>2)");
    }

    #[test]
    fn unterminated_statements_fail() {
        let err = parse_assignment("$dw=1000").unwrap_err();
        assert!(matches!(err, MetricsError::MalformedAssignment { ref line } if line == "$dw=1000"));

        let err = parse_assignment("$name='ArialUnicodeMS;").unwrap_err();
        assert!(matches!(err, MetricsError::MalformedAssignment { .. }));
    }
}

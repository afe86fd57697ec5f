//! Interpretation of raw assignment values.
//!
//! Arrays are PHP `array( ... )` literals. Both grammars read the body the
//! same way: every `=>` becomes a `,`, the body is split on `,` and the
//! pieces are consumed pairwise as key and value. Nested arrays and commas
//! inside quoted strings are not supported by the metrics files this reads.

use std::hash::Hash;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::error::{MetricsError, Result};
use crate::logging::CID_PARSING;

/// A scalar taken from a mixed-type array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Splits the body of an `array( ... )` literal into its key/value tokens.
fn array_pairs(literal: &str) -> Result<Vec<(&str, &str)>> {
    let body = literal
        .trim()
        .strip_prefix("array(")
        .ok_or_else(|| MetricsError::malformed_array(literal, "missing array( wrapper"))?;
    let end = body
        .rfind(')')
        .ok_or_else(|| MetricsError::malformed_array(literal, "missing closing parenthesis"))?;
    let body = &body[..end];

    // Keys and values are separated the same way, so `=>` is just another comma.
    let mut pieces: Vec<&str> = body.split(',').flat_map(|p| p.split("=>")).collect();
    while pieces.last().is_some_and(|p| p.trim().is_empty()) {
        pieces.pop();
    }
    if pieces.len() % 2 != 0 {
        return Err(MetricsError::malformed_array(
            literal,
            format!("odd number of elements ({})", pieces.len()),
        ));
    }

    Ok(pieces
        .chunks_exact(2)
        .map(|pair| (pair[0].trim(), pair[1].trim()))
        .collect())
}

/// Parses an array whose keys and values are both integers.
///
/// Pairs keep the order they were written in; a repeated key keeps its first
/// position and takes the last value.
pub fn parse_int_map<K, V>(literal: &str) -> Result<IndexMap<K, V>>
where
    K: FromStr + Hash + Eq,
    V: FromStr,
{
    let mut map = IndexMap::new();
    for (key, value) in array_pairs(literal)? {
        let key = key
            .parse::<K>()
            .map_err(|_| MetricsError::malformed_array(literal, format!("bad key '{key}'")))?;
        let value = value
            .parse::<V>()
            .map_err(|_| MetricsError::malformed_array(literal, format!("bad value '{value}'")))?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Parses an array with string keys and integer, float or quoted string values.
///
/// A value that is neither quoted nor numeric is dropped together with its
/// key. Older metrics files rely on this.
pub fn parse_mixed_array(literal: &str) -> Result<IndexMap<String, Value>> {
    let mut map = IndexMap::new();
    for (key, value) in array_pairs(literal)? {
        let key = unquote(key)
            .ok_or_else(|| MetricsError::malformed_array(literal, format!("bad key {key}")))?;

        let parsed = if value.starts_with('\'') {
            let s = unquote(value).ok_or_else(|| {
                MetricsError::malformed_array(literal, format!("unterminated string {value}"))
            })?;
            Some(Value::Str(s.to_string()))
        } else if let Ok(i) = value.parse::<i64>() {
            Some(Value::Int(i))
        } else if let Ok(f) = value.parse::<f64>() {
            Some(Value::Float(f))
        } else {
            None
        };

        match parsed {
            Some(v) => {
                map.insert(key.to_string(), v);
            }
            None => warn!(target: CID_PARSING, key, value, "dropping non-numeric array value"),
        }
    }
    Ok(map)
}

/// Strips one pair of surrounding single quotes, if the token is quoted.
fn unquote(token: &str) -> Option<&str> {
    match token.strip_prefix('\'') {
        Some(rest) => rest.rfind('\'').map(|end| &rest[..end]),
        None => Some(token),
    }
}

/// Parses a `[llx lly urx ury]` bounding box.
pub fn parse_bbox(literal: &str) -> Result<(i32, i32, i32, i32)> {
    let inner = literal
        .find('[')
        .zip(literal.rfind(']'))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &literal[start + 1..end])
        .ok_or_else(|| MetricsError::malformed_array(literal, "expected [a b c d]"))?;

    let coords = inner
        .split_whitespace()
        .map(|n| n.parse::<i32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MetricsError::malformed_array(literal, e.to_string()))?;

    match coords[..] {
        [llx, lly, urx, ury] => Ok((llx, lly, urx, ury)),
        _ => Err(MetricsError::malformed_array(
            literal,
            format!("expected 4 coordinates, found {}", coords.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int_map_keeps_written_order() {
        let map: IndexMap<u32, u32> = parse_int_map("array(50=>1,32=>2,40=>3)").unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![50, 32, 40]);
        assert_eq!(map[&32], 2);
    }

    #[test]
    fn int_map_last_duplicate_wins() {
        let map: IndexMap<u32, i32> = parse_int_map("array(1=>10,2=>20,1=>30)").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&1], 30);
    }

    #[test]
    fn int_map_tolerates_spacing_and_trailing_comma() {
        let map: IndexMap<u32, i32> = parse_int_map("array( 32 => 278 ,\n 33 => -5, )").unwrap();
        assert_eq!(map[&32], 278);
        assert_eq!(map[&33], -5);
    }

    #[test]
    fn empty_array_is_empty() {
        let map: IndexMap<u32, i32> = parse_int_map("array()").unwrap();
        assert!(map.is_empty());
        assert!(parse_mixed_array("array( )").unwrap().is_empty());
    }

    #[test]
    fn int_map_rejects_non_integers() {
        let err = parse_int_map::<u32, i32>("array(32=>'x')").unwrap_err();
        assert!(matches!(err, MetricsError::MalformedArrayLiteral { .. }));
    }

    #[test]
    fn array_grammar_violations() {
        for bad in ["(1=>2)", "array(1=>2", "array(1=>2,3)"] {
            let err = parse_int_map::<u32, u32>(bad).unwrap_err();
            assert!(
                matches!(err, MetricsError::MalformedArrayLiteral { .. }),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn mixed_array_tags_types() {
        let map =
            parse_mixed_array("array('Registry'=>'Adobe','Ordering'=>'Identity','Supplement'=>0)")
                .unwrap();
        assert_eq!(map["Registry"], Value::Str("Adobe".into()));
        assert_eq!(map["Ordering"], Value::Str("Identity".into()));
        assert_eq!(map["Supplement"], Value::Int(0));
    }

    #[test]
    fn mixed_array_parses_floats_and_bbox_strings() {
        let map = parse_mixed_array(
            "array('Ascent'=>857,'ItalicAngle'=>-12.5,'FontBBox'=>'[-177 -269 1123 866]')",
        )
        .unwrap();
        assert_eq!(map["Ascent"], Value::Int(857));
        assert_eq!(map["ItalicAngle"], Value::Float(-12.5));
        assert_eq!(map["FontBBox"].as_str(), Some("[-177 -269 1123 866]"));
    }

    #[test]
    fn mixed_array_drops_unparseable_values() {
        let map = parse_mixed_array("array('Flags'=>32,'Style'=>bold,'StemV'=>70)").unwrap();
        assert_eq!(map.len(), 2);
        assert!(!map.contains_key("Style"));
        assert_eq!(map["StemV"], Value::Int(70));
    }

    #[test]
    fn bbox_needs_four_integers() {
        assert_eq!(parse_bbox("[-177 -269 1123 866]").unwrap(), (-177, -269, 1123, 866));
        assert!(parse_bbox("[1 2 3]").is_err());
        assert!(parse_bbox("1 2 3 4").is_err());
        assert!(parse_bbox("[1 2 x 4]").is_err());
    }
}

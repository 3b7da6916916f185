//! Canonical JSON text for fingerprinting structured records.
//!
//! Records are converted to a `serde_json::Value` first and every object is
//! re-emitted with its keys in byte-wise sorted order, so the text depends
//! only on content and never on the caller's map type or insertion order.

use crate::error::{SkeinError, SkeinResult};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::{Map, Value};
use std::io;

/// Textual layout of canonical JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonStyle {
    /// `{"a": 1, "b": [1, 2]}` with non-ASCII escaped as `\uXXXX` and
    /// floats such as `1e-07` and `1e+16` written with signed two-digit exponents.
    ///
    /// This is the default JSON text of the rest of the platform, so digests
    /// agree with ones it computed over key-sorted records.
    #[default]
    Spaced,
    /// `{"a":1,"b":[1,2]}`, UTF-8 passed through.
    Compact,
}

impl JsonStyle {
    /// Configuration name of the style
    pub fn as_str(&self) -> &'static str {
        match self {
            JsonStyle::Spaced => "spaced",
            JsonStyle::Compact => "compact",
        }
    }
}

impl std::fmt::Display for JsonStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JsonStyle {
    type Err = SkeinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spaced" => Ok(JsonStyle::Spaced),
            "compact" => Ok(JsonStyle::Compact),
            other => Err(SkeinError::ConfigValidation {
                field: "job.json-style".to_string(),
                reason: format!("unknown style '{}', expected 'spaced' or 'compact'", other),
            }),
        }
    }
}

/// Serialize any record to canonical JSON text
pub fn to_canonical_json<T: Serialize + ?Sized>(value: &T, style: JsonStyle) -> SkeinResult<String> {
    encode(value, style, "value")
}

pub(crate) fn encode<T: Serialize + ?Sized>(
    value: &T,
    style: JsonStyle,
    what: &str,
) -> SkeinResult<String> {
    let serialization_error = |source| SkeinError::Serialization {
        message: format!("{} to canonical JSON", what),
        source,
    };

    let value = sort_keys(serde_json::to_value(value).map_err(serialization_error)?);

    match style {
        JsonStyle::Compact => serde_json::to_string(&value).map_err(serialization_error),
        JsonStyle::Spaced => {
            let mut out = Vec::new();
            let mut serializer = Serializer::with_formatter(&mut out, SpacedFormatter);
            value.serialize(&mut serializer).map_err(serialization_error)?;
            // The formatter only ever writes ASCII.
            Ok(String::from_utf8_lossy(&out).into_owned())
        },
    }
}

/// Rebuild every object with sorted keys
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, sort_keys(value));
            }
            Value::Object(sorted)
        },
        other => other,
    }
}

/// `", "` / `": "` separators and ASCII-only output
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(float_text(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        // Control characters never reach this point; serde_json escapes them itself.
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip digits of a finite float, laid out as `0.0001`,
/// `123.5`, `2.0` for decimal exponents in -4..16 and as `1e-05`, `1.5e+16`
/// (signed, at least two exponent digits) outside that range.
fn float_text(value: f64) -> String {
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exponent) {
        // Number of digits before the decimal point
        let point = exponent + 1;
        if point <= 0 {
            return format!("{}0.{}{}", sign, "0".repeat(point.unsigned_abs() as usize), digits);
        }
        let point = point as usize;
        if digits.len() > point {
            format!("{}{}.{}", sign, &digits[..point], &digits[point..])
        } else {
            format!("{}{}{}.0", sign, digits, "0".repeat(point - digits.len()))
        }
    } else {
        let (lead, rest) = digits.split_at(1);
        let fraction = if rest.is_empty() { String::new() } else { format!(".{}", rest) };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{}{}{}e{}{:02}", sign, lead, fraction, exponent_sign, exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_spaced_layout() {
        let value = json!({ "image": "busybox", "cmd": "ls -l" });
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Spaced).unwrap(),
            r#"{"cmd": "ls -l", "image": "busybox"}"#
        );
    }

    #[test]
    fn test_compact_layout() {
        let value = json!({ "b": [1, 2], "a": null });
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Compact).unwrap(),
            r#"{"a":null,"b":[1,2]}"#
        );
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = json!({ "z": [{ "y": 1, "x": 2 }], "a": { "d": true, "c": false } });
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Spaced).unwrap(),
            r#"{"a": {"c": false, "d": true}, "z": [{"x": 2, "y": 1}]}"#
        );
    }

    #[test]
    fn test_non_ascii_escaped() {
        let value = json!({ "name": "caf\u{e9} \u{2713} \u{1F600}" });
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Spaced).unwrap(),
            r#"{"name": "caf\u00e9 \u2713 \ud83d\ude00"}"#
        );
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Compact).unwrap(),
            "{\"name\":\"caf\u{e9} \u{2713} \u{1F600}\"}"
        );
    }

    #[test]
    fn test_control_characters() {
        let value = json!(["line\nbreak", "tab\t", "del\u{7f}"]);
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Spaced).unwrap(),
            r#"["line\nbreak", "tab\t", "del\u007f"]"#
        );
    }

    #[test]
    fn test_hashmap_order_independent() {
        let mut forward = HashMap::new();
        let mut backward = HashMap::new();
        let keys = ["alpha", "beta", "gamma", "delta", "epsilon"];
        for (i, key) in keys.iter().enumerate() {
            forward.insert(key.to_string(), i);
        }
        for (i, key) in keys.iter().enumerate().rev() {
            backward.insert(key.to_string(), i);
        }
        assert_eq!(
            to_canonical_json(&forward, JsonStyle::Spaced).unwrap(),
            to_canonical_json(&backward, JsonStyle::Spaced).unwrap()
        );
    }

    #[test]
    fn test_non_string_keys_rejected() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        let err = to_canonical_json(&map, JsonStyle::Compact).unwrap_err();
        assert!(matches!(err, SkeinError::Serialization { .. }));
    }

    #[test]
    fn test_float_text_layout() {
        let cases = [
            (1e-7, "1e-07"),
            (1.5e-7, "1.5e-07"),
            (1e-5, "1e-05"),
            (0.0001, "0.0001"),
            (0.1, "0.1"),
            (0.0, "0.0"),
            (-0.0, "-0.0"),
            (2.0, "2.0"),
            (123456.789, "123456.789"),
            (1e15, "1000000000000000.0"),
            (1e16, "1e+16"),
            (-2.5e20, "-2.5e+20"),
            (5e-324, "5e-324"),
            (f64::MAX, "1.7976931348623157e+308"),
        ];
        for (value, expected) in cases {
            assert_eq!(float_text(value), expected, "formatting {:e}", value);
        }
    }

    #[test]
    fn test_spaced_floats_in_document() {
        let value = json!({ "y": -3, "x": 1e-7, "scale": 1e16 });
        assert_eq!(
            to_canonical_json(&value, JsonStyle::Spaced).unwrap(),
            r#"{"scale": 1e+16, "x": 1e-07, "y": -3}"#
        );
    }

    #[test]
    fn test_style_from_str() {
        assert_eq!("Compact".parse::<JsonStyle>().unwrap(), JsonStyle::Compact);
        assert!("pretty".parse::<JsonStyle>().is_err());
        assert_eq!(JsonStyle::Spaced.to_string(), "spaced");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use proptest::test_runner::Config as ProptestConfig;
    use std::collections::BTreeMap;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]
        /// Spaced output stays ASCII and still decodes to the same document
        #[test]
        fn spaced_output_is_ascii_json(entries in prop::collection::btree_map(".{0,8}", ".{0,16}", 0..8)) {
            let text = to_canonical_json(&entries, JsonStyle::Spaced).unwrap();
            prop_assert!(text.is_ascii());

            let decoded: BTreeMap<String, String> = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(decoded, entries);
        }
    }
}

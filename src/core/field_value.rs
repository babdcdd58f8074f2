//! Typed field values and their canonical string encoding
//!
//! Every value attached to a record is stored as a [`FieldValue`]. Text
//! renderers call [`FieldValue::encode`]; a value that encodes to the empty
//! string is left out of the output entirely, which is how nil UUIDs and zero
//! timestamps disappear.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::{self, Write as _};
use uuid::Uuid;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    /// Message text of an error value
    Error(String),
    /// Output of a type's `Display` implementation
    Display(String),
    /// Output of a type's `Debug` implementation, used for everything else
    Debug(String),
    Null,
}

impl FieldValue {
    /// Capture a value through its `Display` implementation
    pub fn display(value: impl fmt::Display) -> Self {
        FieldValue::Display(value.to_string())
    }

    /// Capture any value through its `Debug` implementation
    pub fn debug(value: impl fmt::Debug) -> Self {
        FieldValue::Debug(format!("{:?}", value))
    }

    /// Capture the message text of an error
    pub fn error(err: impl fmt::Display) -> Self {
        FieldValue::Error(err.to_string())
    }

    /// Encode the value for text output
    ///
    /// Returns an empty string for blank sentinels (nil UUID, zero timestamp).
    #[must_use]
    pub fn encode(&self) -> String {
        match self {
            FieldValue::String(s) => {
                if needs_quoting(s) {
                    quote(s)
                } else {
                    s.clone()
                }
            }
            FieldValue::Int(i) => i.to_string(),
            FieldValue::UInt(u) => u.to_string(),
            FieldValue::Float(f) => encode_float(*f),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Error(msg) => quote(msg),
            FieldValue::Uuid(id) => {
                if id.is_nil() {
                    String::new()
                } else {
                    id.hyphenated().to_string()
                }
            }
            FieldValue::Timestamp(ts) => {
                if is_zero_time(ts) {
                    String::new()
                } else {
                    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
                }
            }
            FieldValue::Display(s) | FieldValue::Debug(s) => {
                if needs_quoting(s) {
                    cleanup(&quote(s))
                } else {
                    cleanup(s)
                }
            }
            FieldValue::Null => "null".to_string(),
        }
    }

    /// Blank sentinels are omitted from every renderer
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Uuid(id) => id.is_nil(),
            FieldValue::Timestamp(ts) => is_zero_time(ts),
            _ => false,
        }
    }

    /// Convert to serde_json::Value for JSON serialization
    ///
    /// Returns `None` for blank sentinels so the key is left out.
    #[must_use]
    pub fn to_json_value(&self) -> Option<serde_json::Value> {
        if self.is_blank() {
            return None;
        }

        let value = match self {
            FieldValue::String(s)
            | FieldValue::Error(s)
            | FieldValue::Display(s)
            | FieldValue::Debug(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::UInt(u) => serde_json::Value::Number((*u).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Uuid(_) | FieldValue::Timestamp(_) => {
                serde_json::Value::String(self.encode())
            }
            FieldValue::Null => serde_json::Value::Null,
        };

        Some(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    *ts == DateTime::<Utc>::default()
}

/// Spaces and control characters would break the `key=value` line layout
fn needs_quoting(s: &str) -> bool {
    s.chars().any(|c| c == ' ' || c.is_control())
}

fn encode_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f == f64::INFINITY {
        "+Inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:.5}", f)
    }
}

/// Quote a string, escaping quotes, backslashes and control characters
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\x07' => out.push_str("\\a"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x0b' => out.push_str("\\v"),
            c if (c as u32) < 0x20 || c == '\x7f' => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Reverse [`quote`]. Returns `None` if `s` is not a well-formed quoted string.
pub fn unquote(s: &str) -> Option<String> {
    let inner = s.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => return None,
            '\\' => {
                let escaped = match chars.next()? {
                    '"' => '"',
                    '\\' => '\\',
                    '\'' => '\'',
                    'a' => '\x07',
                    'b' => '\x08',
                    'f' => '\x0c',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\x0b',
                    'x' => hex_char(&mut chars, 2)?,
                    'u' => hex_char(&mut chars, 4)?,
                    'U' => hex_char(&mut chars, 8)?,
                    _ => return None,
                };
                out.push(escaped);
            }
            c => out.push(c),
        }
    }

    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}

/// Strip literal `\n` and `\r` escape sequences
pub fn cleanup(s: &str) -> String {
    s.replace("\\n", "").replace("\\r", "")
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(i: $t) -> Self {
                FieldValue::Int(i as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FieldValue {
            fn from(u: $t) -> Self {
                FieldValue::UInt(u as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for FieldValue {
    fn from(f: f32) -> Self {
        FieldValue::Float(f as f64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Uuid> for FieldValue {
    fn from(id: Uuid) -> Self {
        FieldValue::Uuid(id)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(ts: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(ts)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

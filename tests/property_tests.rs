//! Property-based tests for structured_logger_system using proptest

use proptest::prelude::*;
use std::sync::Arc;
use structured_logger_system::prelude::*;
use structured_logger_system::{quote, unquote};

#[derive(Default)]
struct Counting(parking_lot::Mutex<usize>);

impl Writer for Counting {
    fn write(&self, _record: &Record) -> Result<()> {
        *self.0.lock() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

// ============================================================================
// Verbosity Gate
// ============================================================================

proptest! {
    /// A record is written iff its verbosity is 0 or at most the threshold
    #[test]
    fn test_verbosity_gate(verbosity in 0u8..=10, threshold in 0u8..=10) {
        let writer = Arc::new(Counting::default());
        let logger = Logger::builder()
            .shared_writer(writer.clone())
            .verbosity(threshold)
            .context_registry(Arc::new(ContextRegistry::new()))
            .build();

        logger.v(verbosity).log("gated");

        let written = *writer.0.lock() == 1;
        prop_assert_eq!(written, verbosity == 0 || verbosity <= threshold);
    }

    /// `info` is never dropped, whatever verbosity was set before
    #[test]
    fn test_info_never_gated(verbosity in 0u8..=255, threshold in 0u8..=255) {
        let writer = Arc::new(Counting::default());
        let logger = Logger::builder()
            .shared_writer(writer.clone())
            .verbosity(threshold)
            .context_registry(Arc::new(ContextRegistry::new()))
            .build();

        logger.v(verbosity).info("informational");

        prop_assert_eq!(*writer.0.lock(), 1);
    }
}

// ============================================================================
// Level Selection
// ============================================================================

proptest! {
    #[test]
    fn test_level_precedence(verbosity in 0u8..=255, has_error in any::<bool>()) {
        let level = Level::select(verbosity, has_error);

        if verbosity > 0 {
            prop_assert_eq!(level, Level::Debug(verbosity));
        } else if has_error {
            prop_assert_eq!(level, Level::Error);
        } else {
            prop_assert_eq!(level, Level::Info);
        }
    }

    /// Debug records keep their error visible in both renderers
    #[test]
    fn test_debug_with_error_keeps_err(verbosity in 1u8..=99, err in "[a-z]{1,12}") {
        let record = Record::new("msg").with_verbosity(verbosity).with_error(err.clone());

        let text = TextWriter::new(std::io::sink()).render(&record);
        let dbg_segment = format!(" DBG [{:03}] ", verbosity);
        prop_assert!(text.contains(&dbg_segment));
        let err_segment = format!(", err=\"{}\"", err);
        prop_assert!(text.contains(&err_segment));

        let json = JsonWriter::new(std::io::sink()).to_json(&record);
        prop_assert_eq!(&json["level"], "debug");
        prop_assert_eq!(&json["err"], err.as_str());
    }
}

// ============================================================================
// Field Ordering
// ============================================================================

proptest! {
    /// Text output lists fields in ascending key order regardless of insertion order
    #[test]
    fn test_fields_sorted(keys in prop::collection::vec("[a-z]{1,8}", 1..20)) {
        let mut fields = Fields::new();
        for (i, key) in keys.iter().enumerate() {
            fields.insert(key.clone(), i);
        }

        let line = TextWriter::new(std::io::sink())
            .render(&Record::new("sorted").with_fields(fields));

        let rendered: Vec<&str> = line
            .trim_end()
            .split(", ")
            .skip(1)
            .map(|pair| pair.split('=').next().unwrap_or_default())
            .collect();

        let mut expected: Vec<&str> = keys.iter().map(String::as_str).collect();
        expected.sort_unstable();
        expected.dedup();

        prop_assert_eq!(rendered, expected);
    }
}

// ============================================================================
// Encoding
// ============================================================================

proptest! {
    /// Strings with a space are quoted, others are emitted verbatim
    #[test]
    fn test_space_quoting(s in "[a-zA-Z0-9 ]{0,24}") {
        let encoded = FieldValue::from(s.as_str()).encode();
        if s.contains(' ') {
            prop_assert!(encoded.starts_with('"') && encoded.ends_with('"'));
            prop_assert_eq!(unquote(&encoded), Some(s));
        } else {
            prop_assert_eq!(encoded, s);
        }
    }

    /// Quoting round-trips arbitrary strings
    #[test]
    fn test_quote_roundtrip(s in any::<String>()) {
        prop_assert_eq!(unquote(&quote(&s)), Some(s));
    }

    #[test]
    fn test_integers_are_plain_decimal(n in any::<i64>(), u in any::<u64>()) {
        prop_assert_eq!(FieldValue::from(n).encode(), n.to_string());
        prop_assert_eq!(FieldValue::from(u).encode(), u.to_string());
    }

    #[test]
    fn test_floats_have_five_decimals(f in -1.0e9f64..1.0e9) {
        let encoded = FieldValue::from(f).encode();
        let decimals = encoded.split('.').nth(1).map(str::len);
        prop_assert_eq!(decimals, Some(5));
    }
}

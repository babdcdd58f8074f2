//! Writer implementations

pub mod json;
pub mod null;
pub mod text;

#[cfg(feature = "color")]
pub mod color;

#[cfg(feature = "network")]
pub mod network;

pub use json::{JsonKeys, JsonWriter};
pub use null::NullWriter;
pub use text::TextWriter;

#[cfg(feature = "color")]
pub use color::ColorWriter;

#[cfg(feature = "network")]
pub use network::{NetworkSink, NetworkSinkBuilder, SinkState};

pub use crate::core::Writer;

//! ***autoesc*** is a streaming HTML writer that escapes interpolated values for the exact
//! place in the document they end up in.
//!
//! Template output is written to an [`EscapingWriter`] in two kinds of pieces: trusted
//! text (the template's own markup) and untrusted values. The writer follows the output
//! through the HTML grammar, including attribute values, URLs, inline scripts and styles,
//! and picks the escaping for each value accordingly: HTML references in text, percent
//! encoding and scheme filtering in URLs, JS literals in scripts and hex escapes in CSS.
//!
//! ```
//! use autoesc::{EscapingWriter, Settings};
//!
//! let mut output = vec![];
//!
//! {
//!     let mut writer = EscapingWriter::new(Settings::default(), |c: &[u8]| output.extend_from_slice(c));
//!
//!     writer.write_trusted("<div title=").unwrap();
//!     writer.write_value("a \"quoted\" title").unwrap();
//!     writer.write_trusted(">").unwrap();
//!     writer.write_value("I <3 HTML").unwrap();
//!     writer.write_trusted("</div>").unwrap();
//!     writer.close().unwrap();
//! }
//!
//! assert_eq!(
//!     String::from_utf8(output).unwrap(),
//!     r#"<div title="a&#32;&#34;quoted&#34;&#32;title">I &lt;3 HTML</div>"#
//! );
//! ```

#[macro_use]
mod debug_trace;

mod base;
mod html;
mod memory;
mod writer;

pub mod context;
pub mod errors;
pub mod escape;
pub mod sink;
pub mod value;

pub use self::base::AsciiCompatibleEncoding;
pub use self::escape::UrlSchemes;
pub use self::sink::{IoSink, OutputSink};
pub use self::value::{ScriptLiteralSerializer, ScriptObject, Value, ValueSerializer};
pub use self::writer::{EscapingWriter, MemorySettings, Settings};

// ABOUTME: Apple device tree decoding module
// ABOUTME: Provides no_std compatible ADT decoding and JSON rendering

pub mod cursor;
pub mod error;
pub mod header;
pub mod json;
pub mod parser;
pub mod property;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_blob;

pub use cursor::Cursor;
pub use error::{AdtError, SerializeError};
pub use header::{NodeHeader, PropertyHeader};
pub use json::{JsonStyle, to_json_string};
#[cfg(feature = "std")]
pub use json::write_json;
pub use parser::{AdtParser, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use property::{Property, PropertyDisplay, PropertyEncoding, is_ascii};
pub use tree::{AdtNode, NodeIterator};

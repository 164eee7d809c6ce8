// ABOUTME: Apple device tree decoder library with bounds-checked parsing
// ABOUTME: Decodes ADT firmware blobs into a node tree and renders it as JSON

//! # Apple Device Tree
//!
//! Decode Apple Device Tree (ADT) blobs, as handed over by iBoot, into an
//! in-memory tree and render them as JSON.
//!
//! The format has no offsets or pointers: each node is a property count
//! and child count followed by that many property records and child nodes,
//! so structure is recovered purely by walking the buffer in order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # use apple_device_tree::{AdtError, AdtParser, JsonStyle, to_json_string};
//! # fn main() -> Result<(), AdtError> {
//! let adt_data = std::fs::read("path/to/device-tree.bin").unwrap();
//!
//! let root = AdtParser::new(&adt_data).parse_tree()?;
//!
//! if let Some(uart) = root.find_node("/arm-io/uart0") {
//!     println!("uart0 compatible: {:?}", uart.prop_strings("compatible"));
//! }
//!
//! println!("{}", to_json_string(&root, JsonStyle::Compact)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Bounds-checked**: truncated input fails with [`AdtError::OutOfBounds`], never a panic
//! - **Depth-limited**: nesting is capped by [`AdtParser::with_max_depth`]
//! - **`no_std` compatible**: works in embedded environments with `alloc`
//! - **Valid JSON**: property text is escaped through `serde_json`
//!
//! ## Main Types
//!
//! - [`AdtParser`] - Main parser interface
//! - [`AdtNode`] - Decoded nodes with query helpers
//! - [`Property`] - Named payloads with text/binary classification
//! - [`Cursor`] - Bounds-checked reader the decoders share

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod adt;


// Re-export main types
pub use adt::{
    AdtError, AdtNode, AdtParser, Cursor, DEFAULT_MAX_DEPTH, JsonStyle, MAX_DEPTH_LIMIT, NodeHeader,
    NodeIterator, Property, PropertyEncoding, PropertyHeader, SerializeError, to_json_string,
};

#[cfg(feature = "std")]
pub use adt::write_json;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_creation() {
        let data = &[0u8; 8];
        let parser = AdtParser::new(data);
        assert_eq!(parser.data().len(), 8);
    }

    #[test]
    fn test_zeroed_header_is_empty_tree() {
        let root = AdtParser::new(&[0u8; 8]).parse_tree().unwrap();
        assert_eq!(to_json_string(&root, JsonStyle::Compact).unwrap(), r#"{"children":[]}"#);
    }
}

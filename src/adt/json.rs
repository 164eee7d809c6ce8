// ABOUTME: JSON rendering of decoded Apple device trees
// ABOUTME: Emits properties in order followed by a trailing children array

use super::error::AdtError;
use super::parser::MAX_DEPTH_LIMIT;
use super::property::Property;
use super::tree::AdtNode;
use alloc::string::String;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Whitespace layout of the emitted JSON
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// No insignificant whitespace
    #[default]
    Compact,
    /// Two-space indented, one key per line
    Pretty,
}

/// Key holding a node's child array, always emitted after all properties
pub const CHILDREN_KEY: &str = "children";

impl Serialize for AdtNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len() + 1))?;
        for property in &self.properties {
            map.serialize_entry(&property.name, &RenderedValue(property))?;
        }
        map.serialize_entry(CHILDREN_KEY, &self.children)?;
        map.end()
    }
}

/// A property payload serialized as a single JSON string
struct RenderedValue<'a>(&'a Property);

impl Serialize for RenderedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // collect_str routes the text through the backend's string escaper
        serializer.collect_str(&self.0.value_display())
    }
}

/// Serialization recurses once per level, so refuse trees nested deeper
/// than any decoder configuration can produce
fn check_depth(root: &AdtNode) -> Result<(), AdtError> {
    if root.depth() > MAX_DEPTH_LIMIT {
        return Err(AdtError::MaxDepthExceeded {
            max_depth: MAX_DEPTH_LIMIT,
        });
    }
    Ok(())
}

/// Render a tree as JSON text
pub fn to_json_string(root: &AdtNode, style: JsonStyle) -> Result<String, AdtError> {
    check_depth(root)?;
    let rendered = match style {
        JsonStyle::Compact => serde_json::to_string(root),
        JsonStyle::Pretty => serde_json::to_string_pretty(root),
    };
    Ok(rendered?)
}

/// Stream a tree as JSON into `writer`
#[cfg(feature = "std")]
pub fn write_json<W: std::io::Write>(
    root: &AdtNode,
    writer: W,
    style: JsonStyle,
) -> Result<(), AdtError> {
    check_depth(root)?;
    let written = match style {
        JsonStyle::Compact => serde_json::to_writer(writer, root),
        JsonStyle::Pretty => serde_json::to_writer_pretty(writer, root),
    };
    Ok(written?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn leaf(props: &[(&str, &[u8])]) -> AdtNode {
        let mut node = AdtNode::new();
        for (name, data) in props {
            node.add_property(Property::new(*name, data.to_vec()));
        }
        node
    }

    #[test]
    fn test_single_property() {
        let root = leaf(&[("compatible", b"abc".as_slice())]);
        assert_eq!(
            to_json_string(&root, JsonStyle::Compact).unwrap(),
            r#"{"compatible":"abc","children":[]}"#
        );
    }

    #[test]
    fn test_empty_node() {
        assert_eq!(
            to_json_string(&AdtNode::new(), JsonStyle::Compact).unwrap(),
            r#"{"children":[]}"#
        );
    }

    #[test]
    fn test_children_last_and_ordered() {
        let mut root = leaf(&[
            ("p1", b"a\0".as_slice()),
            ("p2", [0xde_u8, 0xad].as_slice()),
        ]);
        root.add_child(leaf(&[("name", b"c1\0".as_slice())]));
        root.add_child(leaf(&[("name", b"c2\0".as_slice())]));
        assert_eq!(
            to_json_string(&root, JsonStyle::Compact).unwrap(),
            concat!(
                r#"{"p1":"a<0>","p2":"de ad","children":["#,
                r#"{"name":"c1<0>","children":[]},"#,
                r#"{"name":"c2<0>","children":[]}]}"#
            )
        );
    }

    #[test]
    fn test_text_escaping() {
        let root = leaf(&[
            ("a", b"a\\b".as_slice()),
            ("q", b"say \"hi\"".as_slice()),
            ("n", b"a\0b".as_slice()),
        ]);
        assert_eq!(
            to_json_string(&root, JsonStyle::Compact).unwrap(),
            r#"{"a":"a\\b","q":"say \"hi\"","n":"a<0>b","children":[]}"#
        );
    }

    #[test]
    fn test_binary_control_bytes_become_hex() {
        let root = leaf(&[("t", b"tab\there\0".as_slice())]);
        let json = to_json_string(&root, JsonStyle::Compact).unwrap();
        assert_eq!(
            json,
            r#"{"t":"74 61 62 09 68 65 72 65 00","children":[]}"#
        );
    }

    #[test]
    fn test_output_is_valid_json() {
        let mut root = leaf(&[
            ("name", b"device-tree\0".as_slice()),
            ("weird\"key", b"\\\"\0".as_slice()),
        ]);
        root.add_child(leaf(&[("blob", [0_u8, 0, 1, 0xff].as_slice())]));
        let json = to_json_string(&root, JsonStyle::Compact).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "device-tree<0>");
        assert_eq!(value["weird\"key"], "\\\"<0>");
        assert_eq!(value["children"][0]["blob"], "00 00 01 ff");
    }

    #[test]
    fn test_pretty_style() {
        let root = leaf(&[("compatible", b"abc".as_slice())]);
        assert_eq!(
            to_json_string(&root, JsonStyle::Pretty).unwrap(),
            "{\n  \"compatible\": \"abc\",\n  \"children\": []\n}"
        );
    }

    /// Straight chain of `levels` nodes below a fresh root
    fn chain(levels: usize) -> AdtNode {
        let mut node = AdtNode::new();
        for _ in 0..levels {
            let mut parent = AdtNode::new();
            parent.add_child(node);
            node = parent;
        }
        node
    }

    #[test]
    fn test_render_at_depth_ceiling() {
        let root = chain(MAX_DEPTH_LIMIT);
        let json = to_json_string(&root, JsonStyle::Pretty).unwrap();
        assert_eq!(json.matches(CHILDREN_KEY).count(), MAX_DEPTH_LIMIT + 1);
    }

    #[test]
    fn test_render_rejects_tree_beyond_ceiling() {
        // Deep enough to overflow the stack if it were rendered recursively
        let root = chain(200_000);
        assert_eq!(
            to_json_string(&root, JsonStyle::Compact),
            Err(AdtError::MaxDepthExceeded {
                max_depth: MAX_DEPTH_LIMIT
            })
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_json_reports_sink_failure() {
        struct BrokenPipe;

        impl std::io::Write for BrokenPipe {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::BrokenPipe.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let root = leaf(&[("compatible", b"abc".as_slice())]);
        match write_json(&root, BrokenPipe, JsonStyle::Compact) {
            Err(AdtError::Serialize(err)) => {
                assert!(err.is_io());
                assert_eq!(err.io_error_kind(), Some(std::io::ErrorKind::BrokenPipe));
            }
            other => panic!("expected Serialize, got {other:?}"),
        }
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_write_json_matches_string() {
        let mut root = leaf(&[("compatible", b"abc".as_slice())]);
        root.add_child(AdtNode::new());
        let mut out: Vec<u8> = Vec::new();
        write_json(&root, &mut out, JsonStyle::Compact).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            to_json_string(&root, JsonStyle::Compact).unwrap()
        );
    }
}

// ABOUTME: Apple device tree node structure and query helpers
// ABOUTME: Provides tree traversal, path lookup and typed property access

use super::header::NodeHeader;
use super::property::{Property, is_ascii};
use alloc::{vec, vec::Vec};

/// Device tree node.
///
/// Nodes carry no name of their own; by convention the `name` property
/// identifies them, but it is not guaranteed to exist.
///
/// Dropping, comparing and sizing walk the tree with an explicit stack, so
/// they work on trees of any depth.
#[derive(Debug, Clone, Default)]
pub struct AdtNode {
    /// Node properties, in on-disk order
    pub properties: Vec<Property>,
    /// Child nodes, in on-disk order
    pub children: Vec<AdtNode>,
}

impl AdtNode {
    /// Create an empty node
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property to the node
    pub fn add_property(&mut self, property: Property) {
        self.properties.push(property);
    }

    /// Add a child node
    pub fn add_child(&mut self, child: AdtNode) {
        self.children.push(child);
    }

    /// Value of the conventional `name` property
    pub fn name(&self) -> Option<&str> {
        self.prop_str("name")
    }

    /// Find the first property with the given name
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Check if property exists
    pub fn has_property(&self, name: &str) -> bool {
        self.find_property(name).is_some()
    }

    /// Find a direct child by its `name` property
    pub fn find_child(&self, name: &str) -> Option<&AdtNode> {
        self.children.iter().find(|c| c.name() == Some(name))
    }

    /// Find a node by path of `name` properties (e.g., "/arm-io/uart0")
    pub fn find_node(&self, path: &str) -> Option<&AdtNode> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, part| node.find_child(part))
    }

    /// Get raw payload bytes
    pub fn prop_bytes(&self, name: &str) -> Option<&[u8]> {
        self.find_property(name).map(|p| p.data.as_slice())
    }

    /// Get a text payload with its trailing NUL stripped
    pub fn prop_str(&self, name: &str) -> Option<&str> {
        let data = self.prop_bytes(name)?;
        if !is_ascii(data) {
            return None;
        }
        let text = data.strip_suffix(&[0u8]).unwrap_or(data);
        core::str::from_utf8(text).ok()
    }

    /// Get a NUL-separated string list payload
    pub fn prop_strings(&self, name: &str) -> Option<Vec<&str>> {
        let data = self.prop_bytes(name)?;
        if !is_ascii(data) {
            return None;
        }
        data.split(|&b| b == 0)
            .filter(|s| !s.is_empty())
            .map(|s| core::str::from_utf8(s).ok())
            .collect()
    }

    /// Get property value as little-endian u32
    pub fn prop_u32(&self, name: &str) -> Option<u32> {
        let data = self.prop_bytes(name)?;
        let bytes: [u8; 4] = data.get(..4)?.try_into().ok()?;
        Some(u32::from_le_bytes(bytes))
    }

    /// Get property value as little-endian u64
    pub fn prop_u64(&self, name: &str) -> Option<u64> {
        let data = self.prop_bytes(name)?;
        let bytes: [u8; 8] = data.get(..8)?.try_into().ok()?;
        Some(u64::from_le_bytes(bytes))
    }

    /// Get all nodes with a specific compatible string
    pub fn find_compatible_nodes(&self, compatible: &str) -> Vec<&AdtNode> {
        self.iter_nodes()
            .filter(|node| {
                node.prop_strings("compatible")
                    .is_some_and(|list| list.contains(&compatible))
            })
            .collect()
    }

    /// Bytes this subtree occupies on disk
    pub fn encoded_len(&self) -> usize {
        self.iter_nodes()
            .map(|node| {
                NodeHeader::SIZE
                    + node
                        .properties
                        .iter()
                        .map(Property::encoded_len)
                        .sum::<usize>()
            })
            .sum()
    }

    /// Levels of nesting below this node; 0 for a leaf
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            pending.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        self.iter_nodes().count()
    }

    /// Get iterator over all nodes (depth-first traversal)
    pub fn iter_nodes(&self) -> NodeIterator<'_> {
        NodeIterator::new(self)
    }

    /// Get iterator over all properties
    pub fn iter_properties(&self) -> core::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Get iterator over child nodes
    pub fn iter_children(&self) -> core::slice::Iter<'_, AdtNode> {
        self.children.iter()
    }
}

impl PartialEq for AdtNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.properties != b.properties || a.children.len() != b.children.len() {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for AdtNode {}

impl Drop for AdtNode {
    fn drop(&mut self) {
        // Detach descendants first so each node is freed without recursing
        let mut pending = core::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Iterator for depth-first traversal of device tree nodes
pub struct NodeIterator<'a> {
    stack: Vec<&'a AdtNode>,
}

impl<'a> NodeIterator<'a> {
    fn new(root: &'a AdtNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for NodeIterator<'a> {
    type Item = &'a AdtNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited first
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a AdtNode {
    type Item = &'a AdtNode;
    type IntoIter = core::slice::Iter<'a, AdtNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

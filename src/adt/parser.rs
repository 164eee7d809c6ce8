// ABOUTME: Core ADT node decoder driven purely by counts and payload sizes
// ABOUTME: Provides the main AdtParser struct with a depth-limited tree walk

use super::cursor::Cursor;
use super::error::AdtError;
use super::header::{NodeHeader, PropertyHeader};
use super::property::parse_property;
use super::tree::AdtNode;
use alloc::vec::Vec;

/// Default limit on node nesting below the root
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Hard ceiling on the nesting limit.
///
/// Decoding never recurses, but serializing and cloning a tree recurse once
/// per level, so deeper trees are refused up front.
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Main Apple device tree parser struct
#[derive(Debug, Clone, Copy)]
pub struct AdtParser<'a> {
    data: &'a [u8],
    max_depth: usize,
}

impl<'a> AdtParser<'a> {
    /// Create a new parser over a complete ADT buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit how many levels of children may sit below the decoded node.
    ///
    /// Values above [`MAX_DEPTH_LIMIT`] are clamped to it.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        if max_depth > MAX_DEPTH_LIMIT {
            log::warn!("max depth {max_depth} clamped to {MAX_DEPTH_LIMIT}");
        }
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// Get the underlying data slice
    pub fn data(&self) -> &[u8] {
        self.data
    }

    /// Configured nesting limit
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode the root node, which starts at offset 0
    pub fn parse_tree(&self) -> Result<AdtNode, AdtError> {
        log::debug!("decoding device tree from {} bytes", self.data.len());

        let (root, end) = self.parse_node_at(0)?;
        if end < self.data.len() {
            log::debug!("ignoring {} trailing bytes after root node", self.data.len() - end);
        }
        log::debug!(
            "decoded {} nodes ending at offset {:#x}",
            root.node_count(),
            end
        );
        Ok(root)
    }

    /// Decode the node starting at `offset`.
    ///
    /// Returns the node together with the offset just past its last
    /// property or child, where a sibling would start.
    pub fn parse_node_at(&self, offset: usize) -> Result<(AdtNode, usize), AdtError> {
        let mut cursor = Cursor::at(self.data, offset)?;
        let node = parse_node(&mut cursor, self.max_depth)?;
        Ok((node, cursor.offset()))
    }
}

/// A node whose properties are decoded but whose children are still pending
struct PendingNode {
    node: AdtNode,
    children_left: u32,
}

/// Read a node header and all of its properties
fn parse_node_body(cursor: &mut Cursor<'_>) -> Result<PendingNode, AdtError> {
    let start = cursor.offset();
    let header = NodeHeader::read(cursor)?;
    log::trace!(
        "node at {:#x}: {} properties, {} children",
        start,
        header.nr_props,
        header.nr_children
    );

    // Counts come from untrusted input; never reserve more than the buffer could hold
    let capacity = (header.nr_props as usize).min(cursor.remaining() / PropertyHeader::SIZE);
    let mut properties = Vec::with_capacity(capacity);
    for _ in 0..header.nr_props {
        properties.push(parse_property(cursor)?);
    }

    Ok(PendingNode {
        node: AdtNode {
            properties,
            children: Vec::new(),
        },
        children_left: header.nr_children,
    })
}

/// Decode one node and its whole subtree, leaving the cursor just past it.
///
/// The walk keeps its own stack of unfinished ancestors instead of
/// recursing, and fails with [`AdtError::MaxDepthExceeded`] as soon as a
/// child would sit more than `max_depth` levels below the starting node.
/// The limit never exceeds [`MAX_DEPTH_LIMIT`]. Nothing is returned unless
/// the entire subtree decodes.
pub fn parse_node(cursor: &mut Cursor<'_>, max_depth: usize) -> Result<AdtNode, AdtError> {
    let max_depth = max_depth.min(MAX_DEPTH_LIMIT);
    let mut current = parse_node_body(cursor)?;
    let mut ancestors: Vec<PendingNode> = Vec::new();

    loop {
        if current.children_left > 0 {
            current.children_left -= 1;
            if ancestors.len() >= max_depth {
                return Err(AdtError::MaxDepthExceeded { max_depth });
            }
            let child = parse_node_body(cursor)?;
            ancestors.push(core::mem::replace(&mut current, child));
            continue;
        }

        match ancestors.pop() {
            Some(mut parent) => {
                parent.node.children.push(current.node);
                current = parent;
            }
            None => return Ok(current.node),
        }
    }
}

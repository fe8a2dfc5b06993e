//! An ordered, case-insensitively-keyed header list.
//!
//! Kept sorted by lowercased name so the canonical-request builder in
//! [`crate::reader`] can iterate it directly in the order SigV4 requires. A
//! flat `Vec` kept sorted on mutation stands in for the sorted linked list
//! of header nodes a C implementation of this would use — any ordered
//! associative structure satisfies the same invariants.

use crate::error::S3CommsError;
use s3comms_sigv4::lowercase_n;

/// One header: original-case name, value, and the lowercased sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderNode {
    name: String,
    value: String,
    key: String,
}

impl HeaderNode {
    /// The pre-joined `"name: value"` wire representation.
    fn joined(&self) -> String {
        format!("{}: {}", self.name, self.value)
    }
}

/// An ordered header list, sorted ascending by case-folded name, with unique
/// keys under that fold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    nodes: Vec<HeaderNode>,
}

impl HeaderList {
    /// An empty header list.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert, replace, or remove a header.
    ///
    /// `value == None` removes the header named `name`; `name` not found is
    /// an error. `value == Some(_)` inserts `name` if absent (preserving
    /// sort order) or replaces the existing value in place (the node's
    /// position does not change).
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<(), S3CommsError> {
        if name.is_empty() {
            return Err(S3CommsError::HeaderListMisuse(
                "name is required".to_string(),
            ));
        }
        let key = lowercase_n(name);

        match self.nodes.binary_search_by(|n| n.key.cmp(&key)) {
            Ok(idx) => match value {
                None => {
                    self.nodes.remove(idx);
                    Ok(())
                }
                Some(v) => {
                    self.nodes[idx].value = v.to_string();
                    self.nodes[idx].name = name.to_string();
                    Ok(())
                }
            },
            Err(idx) => match value {
                None => {
                    if self.nodes.is_empty() {
                        Err(S3CommsError::HeaderListMisuse(
                            "cannot remove from an empty list".to_string(),
                        ))
                    } else {
                        Err(S3CommsError::HeaderListMisuse(format!(
                            "name '{name}' not present"
                        )))
                    }
                }
                Some(v) => {
                    self.nodes.insert(
                        idx,
                        HeaderNode {
                            name: name.to_string(),
                            value: v.to_string(),
                            key,
                        },
                    );
                    Ok(())
                }
            },
        }
    }

    /// Look up a header's value by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let key = lowercase_n(name);
        self.nodes
            .binary_search_by(|n| n.key.cmp(&key))
            .ok()
            .map(|idx| self.nodes[idx].value.as_str())
    }

    /// Number of headers currently in the list.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the list has no headers.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate `(lowercased name, value)` pairs in sorted order — the shape
    /// the canonical-request builder needs.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.nodes.iter().map(|n| (n.key.as_str(), n.value.as_str()))
    }

    /// Semicolon-joined lowercased names in sorted order, e.g.
    /// `"host;range;x-amz-date"`.
    pub fn signed_headers(&self) -> String {
        self.nodes
            .iter()
            .map(|n| n.key.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// The pre-joined `"Name: value"` lines, original-case names, in sorted
    /// (by lowercased name) order — what actually goes out on the wire.
    pub fn wire_lines(&self) -> Vec<String> {
        self.nodes.iter().map(HeaderNode::joined).collect()
    }
}

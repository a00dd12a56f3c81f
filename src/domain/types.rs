//! Node and relation type names
//!
//! Each name maps to a single-bit id so that filter masks read back from the
//! subsystem can be interpreted as sets. Id `0` means "unknown".

use crate::domain::DomainError;

/// Node type names, in bit order.
pub const NODE_TYPES: &[&str] = &[
    "task",
    "inode_unknown",
    "link",
    "file",
    "directory",
    "char",
    "block",
    "fifo",
    "socket",
    "msg",
    "shm",
    "address",
    "sb",
    "file_name",
    "packet",
    "disc_entity",
    "disc_activity",
    "disc_agent",
    "machine",
];

/// Relation type names, in bit order.
pub const RELATION_TYPES: &[&str] = &[
    "read",
    "write",
    "create",
    "pass",
    "change",
    "mmap_write",
    "mmap_read",
    "mmap_exec",
    "attach",
    "associate",
    "bind",
    "connect",
    "listen",
    "accept",
    "open",
    "parent",
    "version",
    "link",
    "named",
    "ifc",
    "exec",
    "clone",
    "version_process",
    "search",
    "send",
    "receive",
    "unknown",
];

fn lookup(table: &[&str], name: &str) -> u32 {
    table
        .iter()
        .position(|t| *t == name)
        .map(|bit| 1u32 << bit)
        .unwrap_or(0)
}

/// Id of a node type, `0` if unknown.
pub fn node_id(name: &str) -> u32 {
    lookup(NODE_TYPES, name)
}

/// Id of a relation type, `0` if unknown.
pub fn relation_id(name: &str) -> u32 {
    lookup(RELATION_TYPES, name)
}

/// Resolve a node type name, rejecting unknown names.
pub fn resolve_node(name: &str) -> Result<u32, DomainError> {
    match node_id(name) {
        0 => Err(DomainError::InvalidNodeType(name.to_string())),
        id => Ok(id),
    }
}

/// Resolve a relation type name, rejecting unknown names.
pub fn resolve_relation(name: &str) -> Result<u32, DomainError> {
    match relation_id(name) {
        0 => Err(DomainError::InvalidRelationType(name.to_string())),
        id => Ok(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn tables_fit_in_mask() {
        assert!(NODE_TYPES.len() <= 32);
        assert!(RELATION_TYPES.len() <= 32);
    }

    #[rstest]
    #[case("task", 0x1)]
    #[case("file", 0x8)]
    #[case("machine", 1 << 18)]
    #[case("FILE", 0)]
    #[case("", 0)]
    fn test_node_id(#[case] name: &str, #[case] expected: u32) {
        assert_eq!(node_id(name), expected);
    }

    #[rstest]
    #[case("read", 0x1)]
    #[case("write", 0x2)]
    #[case("unknown", 1 << 26)]
    #[case("task", 0)]
    fn test_relation_id(#[case] name: &str, #[case] expected: u32) {
        assert_eq!(relation_id(name), expected);
    }

    #[test]
    fn given_unknown_name_when_resolving_then_reports_category() {
        assert_eq!(
            resolve_node("bogus"),
            Err(DomainError::InvalidNodeType("bogus".into()))
        );
        assert_eq!(
            resolve_relation("bogus"),
            Err(DomainError::InvalidRelationType("bogus".into()))
        );
    }

    #[test]
    fn given_name_in_both_tables_when_resolving_then_ids_differ_by_category() {
        // "link" is both a node type and a relation type
        assert_eq!(resolve_node("link"), Ok(0x4));
        assert_eq!(resolve_relation("link"), Ok(1 << 17));
    }
}

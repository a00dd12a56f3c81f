//! Domain entities: core data structures

use std::fmt;

use bitflags::bitflags;

use crate::domain::DomainError;

/// Length of the identifier buffer inside a provenance record.
pub const IDENTIFIER_LEN: usize = 24;

/// Width of the taint bitmask in bytes.
pub const TAINT_LEN: usize = 32;

/// Capture flags as reported by the subsystem on a single `-s` read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureState {
    /// Event capture is active
    pub enabled: bool,
    /// Whole-system capture is active (not per-task)
    pub all: bool,
}

/// The four independent filter sets held by the subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Node,
    Relation,
    PropagateNode,
    PropagateRelation,
}

impl FilterKind {
    /// Reset order used by `-r`.
    pub const ALL: [FilterKind; 4] = [
        FilterKind::Node,
        FilterKind::PropagateNode,
        FilterKind::Relation,
        FilterKind::PropagateRelation,
    ];

    /// Whether ids in this set name relation types rather than node types.
    pub fn is_relation(self) -> bool {
        matches!(self, FilterKind::Relation | FilterKind::PropagateRelation)
    }

    /// Human-readable label, as printed by `-s`.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Node => "Node filter",
            FilterKind::Relation => "Relation filter",
            FilterKind::PropagateNode => "Propagate node filter",
            FilterKind::PropagateRelation => "Propagate relation filter",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

/// Current contents of the four filter sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterMasks {
    pub node: u32,
    pub relation: u32,
    pub propagate_node: u32,
    pub propagate_relation: u32,
}

impl FilterMasks {
    pub fn get(&self, kind: FilterKind) -> u32 {
        match kind {
            FilterKind::Node => self.node,
            FilterKind::Relation => self.relation,
            FilterKind::PropagateNode => self.propagate_node,
            FilterKind::PropagateRelation => self.propagate_relation,
        }
    }

    pub fn set(&mut self, kind: FilterKind, mask: u32) {
        match kind {
            FilterKind::Node => self.node = mask,
            FilterKind::Relation => self.relation = mask,
            FilterKind::PropagateNode => self.propagate_node = mask,
            FilterKind::PropagateRelation => self.propagate_relation = mask,
        }
    }
}

/// Identifier of a provenance node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvIdentifier {
    /// Node type tag
    pub node_type: u64,
    /// Per-boot instance id
    pub id: u64,
    pub boot_id: u32,
    pub machine_id: u32,
}

impl ProvIdentifier {
    /// Little-endian identifier buffer.
    pub fn to_bytes(&self) -> [u8; IDENTIFIER_LEN] {
        let mut buf = [0u8; IDENTIFIER_LEN];
        buf[0..8].copy_from_slice(&self.node_type.to_le_bytes());
        buf[8..16].copy_from_slice(&self.id.to_le_bytes());
        buf[16..20].copy_from_slice(&self.boot_id.to_le_bytes());
        buf[20..24].copy_from_slice(&self.machine_id.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self, DomainError> {
        if buf.len() != IDENTIFIER_LEN {
            return Err(DomainError::Malformed {
                what: "identifier",
                expected: IDENTIFIER_LEN,
                actual: buf.len(),
            });
        }
        Ok(Self {
            node_type: u64::from_le_bytes(le_array(&buf[0..8])),
            id: u64::from_le_bytes(le_array(&buf[8..16])),
            boot_id: u32::from_le_bytes(le_array(&buf[16..20])),
            machine_id: u32::from_le_bytes(le_array(&buf[20..24])),
        })
    }

    /// Fixed-width string form of the identifier buffer.
    pub fn encode(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

/// Fixed-width taint bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Taint(pub [u8; TAINT_LEN]);

impl Taint {
    pub fn encode(&self) -> String {
        hex::encode(self.0)
    }
}

bitflags! {
    /// Boolean attributes of a file provenance record.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct RecordFlags: u8 {
        const TRACKED = 0x01;
        const OPAQUE = 0x02;
        const PROPAGATE = 0x04;
    }
}

/// Provenance record attached to a filesystem object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileProvenance {
    pub identifier: ProvIdentifier,
    pub taint: Taint,
    pub flags: RecordFlags,
}

impl FileProvenance {
    pub fn is_tracked(&self) -> bool {
        self.flags.contains(RecordFlags::TRACKED)
    }

    pub fn is_opaque(&self) -> bool {
        self.flags.contains(RecordFlags::OPAQUE)
    }

    pub fn propagates(&self) -> bool {
        self.flags.contains(RecordFlags::PROPAGATE)
    }
}

/// Tracking mode requested with `-t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackMode {
    Off,
    On,
    Propagate,
}

impl TrackMode {
    /// Lenient parse: anything other than `true` or `propagate` turns tracking off.
    pub fn parse(s: &str) -> Self {
        match s {
            "propagate" => TrackMode::Propagate,
            "true" => TrackMode::On,
            "false" => TrackMode::Off,
            other => {
                tracing::warn!("unrecognised tracking mode {:?}, treating as false", other);
                TrackMode::Off
            }
        }
    }

    pub fn tracked(self) -> bool {
        !matches!(self, TrackMode::Off)
    }

    pub fn propagate(self) -> bool {
        matches!(self, TrackMode::Propagate)
    }
}

/// Strict boolean parse: only the exact literals `true` and `false`.
pub fn parse_bool(s: &str) -> Result<bool, DomainError> {
    match s {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(DomainError::InvalidBool(other.to_string())),
    }
}

fn le_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("true", Ok(true))]
    #[case("false", Ok(false))]
    #[case("True", Err(DomainError::InvalidBool("True".into())))]
    #[case("1", Err(DomainError::InvalidBool("1".into())))]
    #[case("", Err(DomainError::InvalidBool("".into())))]
    fn test_parse_bool(#[case] input: &str, #[case] expected: Result<bool, DomainError>) {
        assert_eq!(parse_bool(input), expected);
    }

    #[rstest]
    #[case("propagate", true, true)]
    #[case("true", true, false)]
    #[case("false", false, false)]
    #[case("yes", false, false)]
    fn test_track_mode(#[case] input: &str, #[case] tracked: bool, #[case] propagate: bool) {
        let mode = TrackMode::parse(input);
        assert_eq!(mode.tracked(), tracked);
        assert_eq!(mode.propagate(), propagate);
    }

    #[test]
    fn given_identifier_when_encoded_then_is_fixed_width_hex() {
        let id = ProvIdentifier {
            node_type: 0x8,
            id: 42,
            boot_id: 3,
            machine_id: 0xdead_beef,
        };
        let encoded = id.encode();
        assert_eq!(encoded.len(), IDENTIFIER_LEN * 2);
        assert!(encoded.starts_with("0800000000000000"));
        assert!(encoded.ends_with("efbeadde"));
    }

    #[test]
    fn given_identifier_bytes_when_decoded_then_fields_match() {
        let id = ProvIdentifier {
            node_type: 1 << 40,
            id: u64::MAX - 1,
            boot_id: 7,
            machine_id: 9,
        };
        assert_eq!(ProvIdentifier::from_bytes(&id.to_bytes()), Ok(id));
    }

    #[test]
    fn given_short_buffer_when_decoding_identifier_then_fails() {
        let err = ProvIdentifier::from_bytes(&[0u8; 10]).unwrap_err();
        assert_eq!(
            err,
            DomainError::Malformed {
                what: "identifier",
                expected: IDENTIFIER_LEN,
                actual: 10
            }
        );
    }

    #[test]
    fn given_empty_taint_when_encoded_then_is_all_zero() {
        assert_eq!(Taint::default().encode(), "0".repeat(TAINT_LEN * 2));
    }

    #[test]
    fn given_flags_when_querying_record_then_reports_each_attribute() {
        let record = FileProvenance {
            flags: RecordFlags::TRACKED | RecordFlags::PROPAGATE,
            ..Default::default()
        };
        assert!(record.is_tracked());
        assert!(!record.is_opaque());
        assert!(record.propagates());
    }

    #[test]
    fn given_masks_when_set_by_kind_then_get_returns_same() {
        let mut masks = FilterMasks::default();
        for (i, kind) in FilterKind::ALL.iter().enumerate() {
            masks.set(*kind, 1 << i);
        }
        assert_eq!(masks.node, 1);
        assert_eq!(masks.propagate_node, 2);
        assert_eq!(masks.relation, 4);
        assert_eq!(masks.propagate_relation, 8);
        assert!(FilterKind::Relation.is_relation());
        assert!(!FilterKind::PropagateNode.is_relation());
    }
}

//! Fixed-layout control requests and responses
//!
//! All integers are little-endian. Layouts:
//!
//! - record (64 bytes): identifier (24) | taint (32) | flags (1) | reserved (7)
//! - filter request (8 bytes): type id u32 | op u8 | reserved (3)
//! - file request: name (PATH_MAX, NUL padded) | op u8 | reserved (7) | value u64 | record

use std::io;
use std::path::Path;

use crate::domain::{
    DomainError, FileProvenance, ProvIdentifier, RecordFlags, Taint, IDENTIFIER_LEN, TAINT_LEN,
};

pub const PATH_MAX: usize = 4096;
pub const RECORD_LEN: usize = 64;
pub const FILTER_REQUEST_LEN: usize = 8;
pub const MASK_LEN: usize = 4;

const FILE_HEADER_LEN: usize = 16;
pub const FILE_REQUEST_LEN: usize = PATH_MAX + FILE_HEADER_LEN + RECORD_LEN;

const FLAGS_OFFSET: usize = IDENTIFIER_LEN + TAINT_LEN;
const OP_OFFSET: usize = PATH_MAX;
const VALUE_OFFSET: usize = PATH_MAX + 8;
const RECORD_OFFSET: usize = PATH_MAX + FILE_HEADER_LEN;

/// Operation selector in a filter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FilterOp {
    Add = 0x01,
    Remove = 0x02,
    Reset = 0x04,
}

/// Operation selector in a file request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileOp {
    Read = 0x00,
    Tracked = 0x01,
    Opaque = 0x02,
    Propagate = 0x04,
    Taint = 0x08,
}

pub fn decode_record(buf: &[u8]) -> Result<FileProvenance, DomainError> {
    if buf.len() != RECORD_LEN {
        return Err(DomainError::Malformed {
            what: "provenance record",
            expected: RECORD_LEN,
            actual: buf.len(),
        });
    }
    let identifier = ProvIdentifier::from_bytes(&buf[..IDENTIFIER_LEN])?;
    let mut taint = [0u8; TAINT_LEN];
    taint.copy_from_slice(&buf[IDENTIFIER_LEN..FLAGS_OFFSET]);
    Ok(FileProvenance {
        identifier,
        taint: Taint(taint),
        flags: RecordFlags::from_bits_truncate(buf[FLAGS_OFFSET]),
    })
}

pub fn encode_filter_request(id: u32, op: FilterOp) -> [u8; FILTER_REQUEST_LEN] {
    let mut buf = [0u8; FILTER_REQUEST_LEN];
    buf[..4].copy_from_slice(&id.to_le_bytes());
    buf[4] = op as u8;
    buf
}

pub fn decode_mask(buf: &[u8]) -> Result<u32, DomainError> {
    let bytes: [u8; MASK_LEN] = buf.try_into().map_err(|_| DomainError::Malformed {
        what: "filter mask",
        expected: MASK_LEN,
        actual: buf.len(),
    })?;
    Ok(u32::from_le_bytes(bytes))
}

pub fn encode_bool(on: bool) -> &'static [u8] {
    if on {
        b"1"
    } else {
        b"0"
    }
}

/// Boolean nodes answer with an ASCII digit, optionally newline terminated.
pub fn decode_bool(buf: &[u8]) -> Result<bool, DomainError> {
    match buf.trim_ascii() {
        b"1" => Ok(true),
        b"0" => Ok(false),
        other => Err(DomainError::UnexpectedValue {
            what: "boolean state",
            value: String::from_utf8_lossy(other).into_owned(),
        }),
    }
}

/// Build a file request. `path` must already be canonical.
pub fn encode_file_request(path: &Path, op: FileOp, value: u64) -> io::Result<Vec<u8>> {
    let name = path.as_os_str().as_encoded_bytes();
    if name.len() >= PATH_MAX {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path exceeds {} bytes: {}", PATH_MAX - 1, path.display()),
        ));
    }
    if name.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path contains NUL byte: {}", path.display()),
        ));
    }

    let mut buf = vec![0u8; FILE_REQUEST_LEN];
    buf[..name.len()].copy_from_slice(name);
    buf[OP_OFFSET] = op as u8;
    buf[VALUE_OFFSET..VALUE_OFFSET + 8].copy_from_slice(&value.to_le_bytes());
    Ok(buf)
}

/// Extract the record the subsystem filled into a file request buffer.
pub fn decode_file_response(buf: &[u8]) -> Result<FileProvenance, DomainError> {
    if buf.len() != FILE_REQUEST_LEN {
        return Err(DomainError::Malformed {
            what: "file response",
            expected: FILE_REQUEST_LEN,
            actual: buf.len(),
        });
    }
    decode_record(&buf[RECORD_OFFSET..])
}

//! Canonical object framing.
//!
//! Every object is hashed and stored as
//!
//! ```text
//! <kind> <decimal length>\0<content>
//! ```
//!
//! [`ObjectHeader`] is the validated form of the text before the NUL byte.

use lit_types::ObjectKind;

/// Parsed object header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectHeader {
    pub kind: ObjectKind,
    pub size: usize,
}

impl ObjectHeader {
    pub fn new(kind: ObjectKind, size: usize) -> Self {
        Self { kind, size }
    }

    /// Header bytes including the trailing NUL.
    pub fn encode(&self) -> Vec<u8> {
        format!("{} {}\0", self.kind, self.size).into_bytes()
    }

    /// Parse the header text (without the NUL).
    pub fn parse(text: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(text).map_err(|_| "header is not UTF-8".to_string())?;
        let (kind, size) = text
            .split_once(' ')
            .ok_or_else(|| format!("header {text:?} has no size field"))?;
        let kind = kind.parse::<ObjectKind>().map_err(|e| e.to_string())?;
        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("invalid size field {size:?}"));
        }
        let size = size
            .parse::<usize>()
            .map_err(|e| format!("invalid size field {size:?}: {e}"))?;
        Ok(Self { kind, size })
    }
}

/// Build the framed bytes for an object.
pub fn encode_framed(kind: ObjectKind, content: &[u8]) -> Vec<u8> {
    let mut raw = ObjectHeader::new(kind, content.len()).encode();
    raw.extend_from_slice(content);
    raw
}

/// Split framed bytes into the header and the content.
///
/// Fails if the NUL terminator is missing, the header is malformed, or the
/// declared length differs from the actual content length.
pub fn decode_framed(raw: &[u8]) -> Result<(ObjectHeader, &[u8]), String> {
    let nul = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| "missing header terminator".to_string())?;
    let header = ObjectHeader::parse(&raw[..nul])?;
    let content = &raw[nul + 1..];
    if content.len() != header.size {
        return Err(format!(
            "header declares {} bytes, found {}",
            header.size,
            content.len()
        ));
    }
    Ok((header, content))
}

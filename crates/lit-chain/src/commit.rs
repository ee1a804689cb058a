//! The commit object codec.

use chrono::{DateTime, Utc};
use lit_store::StoredObject;
use lit_types::{ObjectId, ObjectKind};
use serde::{Deserialize, Serialize};

/// A decoded commit object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Previous commit, absent for a root commit.
    pub parent: Option<ObjectId>,
    /// Author line, typically `name <email>`.
    pub author: String,
    /// Creation time in unix seconds.
    pub date: i64,
    /// Free-text message.
    pub message: String,
}

impl Commit {
    /// Serialize to commit content.
    ///
    /// Header lines, a blank line, then the message, each line terminated by
    /// `\n`.
    pub fn encode(&self) -> Vec<u8> {
        let mut lines = vec![format!("tree {}", self.tree)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author));
        lines.push(format!("date {}", self.date));
        lines.push(String::new());
        lines.push(self.message.clone());

        let mut text = lines.join("\n");
        text.push('\n');
        text.into_bytes()
    }

    /// Parse commit content.
    ///
    /// Headers run up to the first empty line. `tree` is required; `parent`,
    /// `author` and `date` are optional and unknown headers are ignored.
    pub fn decode(content: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(content).map_err(|_| "commit is not UTF-8".to_string())?;
        let (headers, message) = match text.split_once("\n\n") {
            Some((headers, body)) => (headers, body),
            None => (text.trim_end_matches('\n'), ""),
        };

        let mut tree = None;
        let mut parent = None;
        let mut author = String::new();
        let mut date = 0;

        for line in headers.lines() {
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "tree" => tree = Some(parse_id("tree", value)?),
                "parent" => parent = Some(parse_id("parent", value)?),
                "author" => author = value.to_string(),
                "date" => {
                    date = value
                        .trim()
                        .parse()
                        .map_err(|_| format!("bad date {value:?}"))?
                }
                _ => {}
            }
        }

        Ok(Self {
            tree: tree.ok_or_else(|| "no tree header".to_string())?,
            parent,
            author,
            date,
            message: message.strip_suffix('\n').unwrap_or(message).to_string(),
        })
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Commit, self.encode())
    }

    /// The commit time, if it is representable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.date, 0)
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

fn parse_id(header: &str, value: &str) -> Result<ObjectId, String> {
    ObjectId::from_hex(value.trim()).map_err(|e| format!("bad {header} hash: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> ObjectId {
        ObjectId::from_hash([byte; 20])
    }

    fn sample() -> Commit {
        Commit {
            tree: id(1),
            parent: Some(id(2)),
            author: "Ada <ada@example.com>".into(),
            date: 1_700_000_000,
            message: "first line\n\nbody text".into(),
        }
    }

    #[test]
    fn encode_layout() {
        let text = String::from_utf8(sample().encode()).unwrap();
        assert_eq!(
            text,
            format!(
                "tree {}\nparent {}\nauthor Ada <ada@example.com>\ndate 1700000000\n\nfirst line\n\nbody text\n",
                id(1),
                id(2)
            )
        );
    }

    #[test]
    fn root_commit_has_no_parent_line() {
        let commit = Commit {
            parent: None,
            ..sample()
        };
        let text = String::from_utf8(commit.encode()).unwrap();
        assert!(!text.contains("parent"));
        assert_eq!(Commit::decode(text.as_bytes()).unwrap(), commit);
    }

    #[test]
    fn decode_inverts_encode() {
        let commit = sample();
        assert_eq!(Commit::decode(&commit.encode()).unwrap(), commit);
        assert_eq!(commit.summary(), "first line");
    }

    #[test]
    fn missing_tree_is_rejected() {
        let text = "author x\ndate 1\n\nmsg\n";
        assert!(Commit::decode(text.as_bytes()).unwrap_err().contains("tree"));
    }

    #[test]
    fn bad_headers_are_rejected() {
        assert!(Commit::decode(b"tree nothex\n\nm\n").is_err());
        let text = format!("tree {}\ndate soon\n\nm\n", id(1));
        assert!(Commit::decode(text.as_bytes()).is_err());
    }

    #[test]
    fn timestamp_conversion() {
        let commit = sample();
        assert_eq!(commit.timestamp().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn serializes_ids_as_hex() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["tree"], id(1).to_hex());
        assert_eq!(json["date"], 1_700_000_000);
    }
}

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A link as written by the creation flow.
///
/// Every field is set exactly once; links are never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The original URL that was shortened.
    pub target_url: String,
    /// Address of the client that created the link, if known.
    pub creator_address: Option<String>,
    /// Identity of the caller that created the link, if known.
    pub creator_identity: Option<String>,
    /// When the link was persisted.
    pub created_at: Timestamp,
}

/// A link as found in a store.
///
/// Stores are treated as schemaless, so every field is optional. A record
/// without a `target_url` is corrupt rather than missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkRecord {
    pub target_url: Option<String>,
    pub creator_address: Option<String>,
    pub creator_identity: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl From<Link> for LinkRecord {
    fn from(link: Link) -> Self {
        Self {
            target_url: Some(link.target_url),
            creator_address: link.creator_address,
            creator_identity: link.creator_identity,
            created_at: Some(link.created_at),
        }
    }
}

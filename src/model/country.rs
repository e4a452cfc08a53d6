use serde::{Deserialize, Serialize};

/// A sovereign actor. The engine only needs identity and a display name;
/// everything else about a country (citizens, economy, territory) lives
/// with external collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: u64,
    pub name: String,
    /// Alliance the country currently belongs to, if any. Mirrors the
    /// membership rows on the alliance itself for cheap lookups.
    pub alliance_id: Option<u64>,
}

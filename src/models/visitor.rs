use serde::{Deserialize, Serialize};

/// Visit counters returned by `GET /api/visitors`.
///
/// Serialized with camelCase keys, which is what the public frontend
/// already consumes.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    pub total_visits: u64,
    pub unique_visitors: u64,
    pub is_new_visitor: bool,
}

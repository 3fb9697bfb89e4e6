//! Query result model structs.

use serde::Serialize;

/// Collage summary for listings.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollageInfo {
    pub id: i64,
    pub name: String,
    pub owner: Option<String>,
    pub temporary: bool,
    /// Number of items in the collage.
    pub item_count: i64,
}

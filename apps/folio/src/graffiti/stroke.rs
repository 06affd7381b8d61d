use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::peer::PeerId;

/// `[x, y, z]` in scene space.
pub type GraffitiPoint = [f64; 3];

/// One finished freehand gesture. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    pub id: String,
    pub points: Vec<GraffitiPoint>,
    pub color: String,
    /// Author's peer id as sent on the wire; not required to be a UUID.
    pub user_id: String,
}

impl Stroke {
    pub fn new(points: Vec<GraffitiPoint>, color: &str, author: &PeerId) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            points,
            color: color.to_string(),
            user_id: author.to_string(),
        }
    }
}

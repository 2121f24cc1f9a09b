//! Domain types for the shared charging state.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` repositories convert rows into them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chargeboard_core::{ChargerPreference, SpotType, StateVersion, UserId, UserName};

/// A physical charging spot.
///
/// The set of spots is fixed and seeded at migration time; only the
/// assignment mutates at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spot {
    /// Stable string key (e.g., "tesla-1").
    pub id: String,
    /// Charger hardware installed at this spot.
    #[serde(rename = "type")]
    pub spot_type: SpotType,
    /// Human-readable label (e.g., "Tesla #1").
    pub label: String,
    /// User currently assigned to this spot, if any.
    pub user_id: Option<UserId>,
}

/// One slot in the waiting queue.
///
/// Position is the sole ordering key and is unique per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// 1-based position in the queue.
    pub position: i32,
    /// The waiting user.
    pub user_id: UserId,
}

/// A consistent snapshot of the shared state, tagged with its version.
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// Waiting queue, ordered by position.
    pub queue: Vec<QueueEntry>,
    /// All spots with their current assignments, ordered by id.
    pub spots: Vec<Spot>,
    /// When the daily reset last ran, if ever.
    pub last_reset: Option<DateTime<Utc>>,
    /// The generation counter this snapshot was read at.
    pub version: StateVersion,
}

/// A desired spot assignment submitted by a client.
///
/// Only the assignment is writable; `type` and `label` are fixed, so a
/// client may submit spots exactly as it read them and the extra fields
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SpotAssignment {
    /// Spot key the assignment applies to.
    pub id: String,
    /// User to assign, or `None` to leave the spot free.
    pub user_id: Option<UserId>,
}

/// The full desired replacement for the shared state.
#[derive(Debug, Clone, Deserialize)]
pub struct DesiredState {
    /// Complete replacement queue.
    pub queue: Vec<QueueEntry>,
    /// Desired spot assignments.
    pub spots: Vec<SpotAssignment>,
}

/// A registered user.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name, unique across users.
    pub name: UserName,
    /// Which charger kinds this user will take.
    pub pref: ChargerPreference,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spot_wire_format() {
        let spot = Spot {
            id: "tesla-1".to_string(),
            spot_type: SpotType::Tesla,
            label: "Tesla #1".to_string(),
            user_id: Some(UserId::new(3)),
        };

        let value = serde_json::to_value(&spot).unwrap();
        assert_eq!(
            value,
            json!({"id": "tesla-1", "type": "tesla", "label": "Tesla #1", "user_id": 3})
        );
    }

    #[test]
    fn test_desired_state_accepts_read_back_spots() {
        // Clients may submit spots exactly as read; type/label are ignored.
        let desired: DesiredState = serde_json::from_value(json!({
            "queue": [{"position": 1, "user_id": 3}],
            "spots": [
                {"id": "tesla-1", "type": "tesla", "label": "Tesla #1", "user_id": 3},
                {"id": "chargepoint-1", "user_id": null}
            ]
        }))
        .unwrap();

        assert_eq!(desired.queue.len(), 1);
        assert_eq!(desired.spots.len(), 2);
        assert_eq!(desired.spots[0].user_id, Some(UserId::new(3)));
        assert_eq!(desired.spots[1].user_id, None);
    }

    #[test]
    fn test_desired_state_requires_both_fields() {
        let result = serde_json::from_value::<DesiredState>(json!({"queue": []}));
        assert!(result.is_err());
    }
}

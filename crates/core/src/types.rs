use uuid::Uuid;

/// Opaque identity of a player account (and its 1:1 inventory record).
pub type PlayerId = Uuid;

/// Opaque identity shared by a character's index entry and its pool entry.
pub type CharacterId = Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh, time-ordered identifier.
pub fn new_id() -> Uuid {
    Uuid::now_v7()
}

// Identifier generation for rows created app-side.
//
// Users and chirps get UUIDv7 ids so that creation order survives in the
// primary key. The in-memory store relies on
// this to list chirps oldest-first without a separate sequence.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

use uuid::Uuid;

/// Generates the id for a new job record.
///
/// UUIDv7: a millisecond timestamp followed by random bits, so ids minted in
/// the same millisecond still differ and later ids sort after earlier ones.
pub fn new_job_id() -> String {
    Uuid::now_v7().to_string()
}

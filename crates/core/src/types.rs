/// Image identifiers are UUIDs (v7, time-ordered), generated by the
/// service at insert time rather than by the database.
pub type ImageId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

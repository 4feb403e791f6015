use chrono::{DateTime, Utc};

/// Current UTC time, used to stamp order mutations
pub fn now() -> DateTime<Utc> {
    Utc::now()
}


/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Serde helpers for backend timestamps.
///
/// The API emits `datetime.isoformat()` of naive UTC values, e.g.
/// `2024-03-01T10:00:00.123456`, with no offset. Those are read as UTC.
/// RFC 3339 strings carrying an offset are accepted as well.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};

    use super::Timestamp;

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    /// Parse a single backend timestamp string.
    pub fn parse(raw: &str) -> Option<Timestamp> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }

    /// Same as the parent module, for `Option<Timestamp>` fields. `null`
    /// and a missing field both become `None`.
    pub mod option {
        use serde::{Deserialize, Deserializer};

        use super::super::Timestamp;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp '{raw}'"))
                }),
            }
        }
    }
}

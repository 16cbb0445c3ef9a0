use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// UTC instant attached to records; `updated_at` is advisory and only used for display.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(#[serde(with = "time::serde::rfc3339")] pub OffsetDateTime);

impl Timestamp {
    pub fn now_utc() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn from(dt: OffsetDateTime) -> Self {
        Self(dt.to_offset(UtcOffset::UTC))
    }

    pub fn as_inner(&self) -> OffsetDateTime {
        self.0
    }

    /// RFC 3339 rendering used by the HTTP layer. Empty when the year is out of range.
    pub fn to_rfc3339(&self) -> String {
        self.0.format(&Rfc3339).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn given_from_with_non_utc_offset_when_called_should_store_same_instant_in_utc() {
        let dt = datetime!(2024-03-01 10:00 +05:00);
        let result = Timestamp::from(dt);
        assert_eq!(result.as_inner().offset(), UtcOffset::UTC);
        assert_eq!(result.as_inner().unix_timestamp(), dt.unix_timestamp());
    }

    #[test]
    fn given_timestamp_when_rendered_should_be_rfc3339() {
        let ts = Timestamp::from(datetime!(2024-03-01 05:00 UTC));
        assert_eq!(ts.to_rfc3339(), "2024-03-01T05:00:00Z");
    }

    #[test]
    fn given_timestamp_when_serialized_should_round_trip_through_json() {
        let ts = Timestamp::from(datetime!(2024-03-01 05:00:07 UTC));
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2024-03-01T05:00:07Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}

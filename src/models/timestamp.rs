use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A point in time as written by the companion application.
///
/// Documents carry either RFC 3339 strings or epoch milliseconds. Both forms
/// are accepted, and a value written back keeps the form it was read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Rfc3339(DateTime<Utc>),
    Millis(i64),
}

impl Timestamp {
    /// The instant this value denotes, or `None` for milliseconds outside
    /// chrono's range.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match *self {
            Self::Rfc3339(at) => Some(at),
            Self::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
        }
    }

    /// The current time, in the same form as `self`.
    pub fn now_like(&self) -> Self {
        let now = Utc::now();
        match self {
            Self::Rfc3339(_) => Self::Rfc3339(now),
            Self::Millis(_) => Self::Millis(now.timestamp_millis()),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Rfc3339(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instant() {
            Some(at) => write!(f, "{}", at.to_rfc3339()),
            None => match self {
                Self::Millis(ms) => write!(f, "{}", ms),
                Self::Rfc3339(at) => write!(f, "{}", at.to_rfc3339()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_both_forms() {
        let text: Timestamp = serde_json::from_value(json!("2024-02-01T00:00:00Z")).unwrap();
        let millis: Timestamp = serde_json::from_value(json!(1706745600000i64)).unwrap();

        assert!(matches!(text, Timestamp::Rfc3339(_)));
        assert_eq!(millis, Timestamp::Millis(1706745600000));
        assert_eq!(text.instant(), millis.instant());
    }

    #[test]
    fn test_serializes_in_the_form_it_was_read() {
        let millis = Timestamp::Millis(1706745600000);
        assert_eq!(serde_json::to_value(millis).unwrap(), json!(1706745600000i64));

        let at = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(
            serde_json::to_value(Timestamp::from(at)).unwrap(),
            json!("2024-02-01T00:00:00Z")
        );
    }

    #[test]
    fn test_now_like_keeps_form() {
        let before = Utc::now().timestamp_millis();
        match Timestamp::Millis(0).now_like() {
            Timestamp::Millis(ms) => assert!(ms >= before),
            other => panic!("expected millis, got {:?}", other),
        }
        assert!(matches!(
            Timestamp::from(Utc::now()).now_like(),
            Timestamp::Rfc3339(_)
        ));
    }

    #[test]
    fn test_display_is_rfc3339() {
        assert_eq!(
            Timestamp::Millis(1706745600000).to_string(),
            "2024-02-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert!(serde_json::from_value::<Timestamp>(json!("yesterday")).is_err());
        assert!(serde_json::from_value::<Timestamp>(json!(true)).is_err());
    }
}

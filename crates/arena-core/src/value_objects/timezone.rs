//! Timezone resolution and "today" for a user

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserTimezone(Tz);

impl UserTimezone {
    pub const UTC: Self = Self(Tz::UTC);

    /// Parse an IANA name such as `Europe/Berlin`. Blank or unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        name.parse::<Tz>().ok().map(Self)
    }

    /// Parse, falling back to UTC.
    pub fn parse_or_utc(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or(Self::UTC)
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    #[inline]
    pub fn is_utc(&self) -> bool {
        self.0 == Tz::UTC
    }

    /// Calendar date in this zone at `now`
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.0).date_naive()
    }

    pub fn to_local(&self, ts: DateTime<Utc>) -> DateTime<Tz> {
        ts.with_timezone(&self.0)
    }
}

impl Default for UserTimezone {
    fn default() -> Self {
        Self::UTC
    }
}

impl fmt::Display for UserTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for UserTimezone {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for UserTimezone {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown timezone: {name}")))
    }
}

/// Zone used to date a check-in.
///
/// A valid client zone other than UTC wins (browsers report UTC when they
/// cannot tell), then the zone stored on the user, then UTC.
pub fn resolve_checkin_timezone(client: Option<&str>, stored: UserTimezone) -> UserTimezone {
    match client.and_then(UserTimezone::parse) {
        Some(tz) if !tz.is_utc() => tz,
        _ => stored,
    }
}

/// Date a check-in is recorded for.
///
/// A client-supplied `YYYY-MM-DD` is honoured only when it lies within one
/// day of the server's idea of `today`; anything else falls back to `today`.
pub fn resolve_checkin_date(client_date: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = client_date.map(str::trim) else {
        return today;
    };
    if raw.len() != 10 {
        return today;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if (date - today).num_days().abs() <= 1 => date,
        _ => today,
    }
}

/// Parse an optional `YYYY-MM-DD` form value; blank means absent.
pub fn parse_form_date(raw: Option<&str>) -> Result<Option<NaiveDate>, crate::DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| crate::DomainError::ValidationError("Invalid date format.".to_string())),
    }
}

#[inline]
pub fn yesterday(today: NaiveDate) -> NaiveDate {
    today - Duration::days(1)
}

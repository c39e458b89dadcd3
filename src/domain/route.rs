use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// One `<url>` entry of a sitemap. Static pages, feeds, categories and
/// articles all normalize to this before serialization.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteRoute {
    pub url: String,
    pub last_modified: DateTime<Utc>,
    pub change_frequency: ChangeFrequency,
    pub priority: Priority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sitemap priority, always within `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
pub struct Priority(f32);

impl Priority {
    /// Clamps into `[0.0, 1.0]`; NaN becomes `0.5`, the protocol default.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(0.5);
        }
        Self(value.clamp(0.0, 1.0))
    }

    #[must_use]
    pub const fn value(self) -> f32 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_is_clamped() {
        assert_eq!(Priority::new(1.7).value(), 1.0);
        assert_eq!(Priority::new(-0.2).value(), 0.0);
        assert_eq!(Priority::new(f32::NAN).value(), 0.5);
    }

    #[test]
    fn priority_renders_one_decimal() {
        assert_eq!(Priority::new(1.0).to_string(), "1.0");
        assert_eq!(Priority::new(0.6).to_string(), "0.6");
    }

    #[test]
    fn change_frequency_renders_lowercase() {
        assert_eq!(ChangeFrequency::Hourly.to_string(), "hourly");
        assert_eq!(ChangeFrequency::Monthly.as_str(), "monthly");
    }
}

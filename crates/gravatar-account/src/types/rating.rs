//! Image content rating.

use std::str::FromStr;

/// Content rating of an image.
///
/// | Rating | Value |
/// |--------|-------|
/// | G      | 0     |
/// | PG     | 1     |
/// | R      | 2     |
/// | X      | 3     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Rating {
    /// Suitable for all audiences.
    #[default]
    G,
    /// May contain rude gestures or mild violence.
    PG,
    /// May contain harsh profanity or intense violence.
    R,
    /// May contain hardcore sexual imagery or extremely disturbing violence.
    X,
}

impl Rating {
    /// All ratings in ascending order.
    pub const ALL: [Self; 4] = [Self::G, Self::PG, Self::R, Self::X];

    /// Returns the wire value of this rating.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        match self {
            Self::G => 0,
            Self::PG => 1,
            Self::R => 2,
            Self::X => 3,
        }
    }

    /// Returns the rating for a wire value.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::G),
            1 => Some(Self::PG),
            2 => Some(Self::R),
            3 => Some(Self::X),
            _ => None,
        }
    }

    /// Returns the rating name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::G => "G",
            Self::PG => "PG",
            Self::R => "R",
            Self::X => "X",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a rating name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rating: {0}")]
pub struct ParseRatingError(String);

impl FromStr for Rating {
    type Err = ParseRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|rating| rating.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseRatingError(s.to_string()))
    }
}

impl From<Rating> for gravatar_xmlrpc::Value {
    fn from(rating: Rating) -> Self {
        Self::Int(rating.as_i64())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(Rating::G.as_i64(), 0);
        assert_eq!(Rating::PG.as_i64(), 1);
        assert_eq!(Rating::R.as_i64(), 2);
        assert_eq!(Rating::X.as_i64(), 3);
        for rating in Rating::ALL {
            assert_eq!(Rating::from_i64(rating.as_i64()), Some(rating));
        }
        assert_eq!(Rating::from_i64(4), None);
        assert_eq!(Rating::from_i64(-1), None);
    }

    #[test]
    fn test_parse() {
        assert_eq!("pg".parse::<Rating>().unwrap(), Rating::PG);
        assert_eq!(" X ".parse::<Rating>().unwrap(), Rating::X);
        assert!("NC-17".parse::<Rating>().is_err());
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(Rating::default(), Rating::G);
        assert_eq!(Rating::R.to_string(), "R");
    }

    #[test]
    fn test_into_value() {
        assert_eq!(gravatar_xmlrpc::Value::from(Rating::X), gravatar_xmlrpc::Value::Int(3));
    }
}

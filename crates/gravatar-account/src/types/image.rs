//! Account image record.

use super::Rating;

/// An image stored in the account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Image {
    /// Server-assigned image id.
    pub id: String,
    /// URL that serves the image even while unassigned.
    pub url: String,
    /// Content rating.
    pub rating: Rating,
}

impl Image {
    /// Creates a new image record.
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>, rating: Rating) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            rating,
        }
    }
}

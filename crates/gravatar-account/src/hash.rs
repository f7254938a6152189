//! Email address hashing.
//!
//! Gravatar identifies an address by the MD5 digest of its trimmed,
//! lower-cased form. The same hash scopes the account endpoint and is the
//! public avatar key.

use md5::{Digest, Md5};

/// Base URL for public avatar images.
pub const AVATAR_BASE_URL: &str = "https://www.gravatar.com/avatar/";

/// Hex-encoded MD5 digest of a normalized email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmailHash(String);

impl EmailHash {
    /// Hashes an email address after trimming and lower-casing it.
    #[must_use]
    pub fn new(email: &str) -> Self {
        let digest = Md5::digest(normalize(email).as_bytes());
        Self(hex::encode(digest))
    }

    /// Returns the hash as a 32-character lower-case hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the public URL of the image assigned to this address.
    #[must_use]
    pub fn avatar_url(&self) -> String {
        format!("{AVATAR_BASE_URL}{}", self.0)
    }
}

impl std::fmt::Display for EmailHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trims surrounding whitespace and lower-cases an email address.
#[must_use]
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shorthand for `EmailHash::new(email)`.
#[must_use]
pub fn hash_email(email: &str) -> EmailHash {
    EmailHash::new(email)
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
    use proptest::prelude::*;

    #[test]
    fn test_known_digest() {
        // md5("myemailaddress@example.com")
        assert_eq!(
            hash_email("MyEmailAddress@example.com ").as_str(),
            "0bc83cb571cd1c50ba6f3e8a78ef1346"
        );
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(hash_email(" Foo@Bar.com "), hash_email("foo@bar.com"));
        assert_eq!(hash_email("\tFOO@BAR.COM\n"), hash_email("foo@bar.com"));
    }

    #[test]
    fn test_hex_shape() {
        let hash = hash_email("a@x.com");
        assert_eq!(hash.as_str().len(), 32);
        assert!(
            hash.as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_avatar_url() {
        let hash = hash_email("a@x.com");
        assert_eq!(
            hash.avatar_url(),
            format!("https://www.gravatar.com/avatar/{hash}")
        );
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(email in "\\s{0,2}[a-zA-Z0-9@._+-]{0,24}\\s{0,2}") {
            let once = normalize(&email);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert_eq!(hash_email(&once), hash_email(&email));
        }

        #[test]
        fn padding_and_case_do_not_matter(local in "[a-zA-Z0-9._]{1,16}", domain in "[a-zA-Z]{1,10}\\.com", pad in " {0,3}") {
            let email = format!("{local}@{domain}");
            let padded = format!("{pad}{}{pad}", email.to_uppercase());
            prop_assert_eq!(hash_email(&padded), hash_email(&email));
        }
    }
}

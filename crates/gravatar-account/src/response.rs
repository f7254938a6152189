//! Decoding of procedure return values.

use std::collections::HashMap;

use gravatar_xmlrpc::{Members, Value};

use crate::error::{Error, Result};
use crate::hash::EmailHash;
use crate::procedure::Procedure;
use crate::types::{Image, Rating};

fn unexpected(procedure: Procedure, message: impl Into<String>) -> Error {
    Error::unexpected(procedure.name(), message)
}

fn into_struct(procedure: Procedure, value: Value) -> Result<Members> {
    let type_name = value.type_name();
    value
        .into_struct()
        .ok_or_else(|| unexpected(procedure, format!("expected struct, got {type_name}")))
}

fn member<'a>(procedure: Procedure, members: &'a Members, name: &str) -> Result<&'a Value> {
    members
        .get(name)
        .ok_or_else(|| unexpected(procedure, format!("missing member `{name}`")))
}

fn string_member<'a>(procedure: Procedure, members: &'a Members, name: &str) -> Result<&'a str> {
    let value = member(procedure, members, name)?;
    value.as_str().ok_or_else(|| {
        unexpected(
            procedure,
            format!("member `{name}` is {}, not string", value.type_name()),
        )
    })
}

/// Ratings arrive as ints or as numeric strings depending on the procedure.
fn parse_rating(procedure: Procedure, value: &Value) -> Result<Rating> {
    let raw = match value {
        Value::Int(i) => Some(*i),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    raw.and_then(Rating::from_i64)
        .ok_or_else(|| unexpected(procedure, format!("invalid rating {value:?}")))
}

const fn is_found(value: &Value) -> bool {
    matches!(value, Value::Int(1) | Value::Boolean(true))
}

/// Maps `exists` results keyed by hash back to the caller's addresses.
///
/// Every input address appears in the result; hashes the server omits are
/// reported as not found.
pub(crate) fn exists(value: Value, addresses: &[String]) -> Result<HashMap<String, bool>> {
    let procedure = Procedure::Exists;
    let members = into_struct(procedure, value)?;

    Ok(addresses
        .iter()
        .map(|address| {
            let hash = EmailHash::new(address);
            let found = members.get(hash.as_str()).is_some_and(is_found);
            (address.clone(), found)
        })
        .collect())
}

/// Decodes `addresses`: address -> assigned image, `None` when unassigned.
pub(crate) fn addresses(value: Value) -> Result<HashMap<String, Option<Image>>> {
    let procedure = Procedure::Addresses;
    let members = into_struct(procedure, value)?;

    members
        .into_iter()
        .map(|(address, entry)| {
            let entry = into_struct(procedure, entry)?;
            let id = string_member(procedure, &entry, "userimage")?;
            if id.is_empty() {
                return Ok((address, None));
            }
            let url = string_member(procedure, &entry, "userimage_url")?;
            let rating = parse_rating(procedure, member(procedure, &entry, "rating")?)?;
            Ok((address, Some(Image::new(id, url, rating))))
        })
        .collect()
}

/// Decodes `userimages`: image id -> `[rating, url]`.
pub(crate) fn user_images(value: Value) -> Result<Vec<Image>> {
    let procedure = Procedure::UserImages;
    let members = into_struct(procedure, value)?;

    members
        .into_iter()
        .map(|(id, entry)| match entry.as_array() {
            Some([rating_value, Value::String(url)]) => {
                let rating = parse_rating(procedure, rating_value)?;
                Ok(Image::new(id, url.clone(), rating))
            }
            _ => Err(unexpected(
                procedure,
                format!("image `{id}` is not a [rating, url] pair"),
            )),
        })
        .collect()
}

/// Decodes a saved image id; a falsy value means the upload was rejected.
pub(crate) fn saved_id(procedure: Procedure, value: &Value) -> Result<Option<String>> {
    if !value.is_truthy() {
        return Ok(None);
    }
    match value {
        Value::String(id) => Ok(Some(id.clone())),
        Value::Int(id) => Ok(Some(id.to_string())),
        other => Err(unexpected(
            procedure,
            format!("expected image id, got {}", other.type_name()),
        )),
    }
}

/// Checks a per-address success map and fails on the first rejected address.
///
/// Addresses are checked in caller order; the server may key results by the
/// address itself or by its hash. Keys matching neither are checked last and
/// reported verbatim.
pub(crate) fn check_addresses(procedure: Procedure, value: Value, addresses: &[String]) -> Result<()> {
    let mut members = into_struct(procedure, value)?;

    for address in addresses {
        let hash = EmailHash::new(address);
        let result = members
            .remove(address.as_str())
            .or_else(|| members.remove(hash.as_str()));
        if let Some(result) = result
            && !result.is_truthy()
        {
            return Err(Error::InvalidEmail(address.clone()));
        }
    }

    match members.into_iter().find(|(_, result)| !result.is_truthy()) {
        Some((key, _)) => Err(Error::InvalidEmail(key)),
        None => Ok(()),
    }
}

/// Decodes `test`: `{response: <epoch seconds>}`.
pub(crate) fn server_time(value: Value) -> Result<i64> {
    let procedure = Procedure::Test;
    let members = into_struct(procedure, value)?;
    let response = member(procedure, &members, "response")?;
    response.as_int().ok_or_else(|| {
        unexpected(
            procedure,
            format!("`response` is {}, not int", response.type_name()),
        )
    })
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

    fn members(pairs: Vec<(&str, Value)>) -> Value {
        Value::Struct(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn image_entry(id: &str, url: &str, rating: Value) -> Value {
        members(vec![
            ("userimage", Value::from(id)),
            ("userimage_url", Value::from(url)),
            ("rating", rating),
        ])
    }

    #[test]
    fn test_exists_maps_hashes_back() {
        let addresses = vec!["A@x.com".to_string(), "b@x.com".to_string()];
        let value = members(vec![
            (EmailHash::new("a@x.com").as_str(), Value::Int(1)),
            (EmailHash::new("b@x.com").as_str(), Value::Int(0)),
        ]);

        let result = exists(value, &addresses).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result["A@x.com"]);
        assert!(!result["b@x.com"]);
    }

    #[test]
    fn test_exists_missing_hash_is_false() {
        let addresses = vec!["c@x.com".to_string()];
        let result = exists(members(vec![]), &addresses).unwrap();
        assert!(!result["c@x.com"]);
    }

    #[test]
    fn test_exists_duplicate_normalized_inputs() {
        let addresses = vec!["a@x.com".to_string(), " A@X.COM".to_string()];
        let value = members(vec![(EmailHash::new("a@x.com").as_str(), Value::Boolean(true))]);
        let result = exists(value, &addresses).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.values().all(|found| *found));
    }

    #[test]
    fn test_addresses_empty_image_is_none() {
        let value = members(vec![("a@x.com", image_entry("", "", Value::Int(0)))]);
        let result = addresses(value).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result["a@x.com"], None);
    }

    #[test]
    fn test_addresses_with_image() {
        let value = members(vec![(
            "a@x.com",
            image_entry("img1", "http://en.gravatar.com/userimage/1/img1.jpg", Value::from("2")),
        )]);
        let result = addresses(value).unwrap();
        assert_eq!(
            result["a@x.com"],
            Some(Image::new(
                "img1",
                "http://en.gravatar.com/userimage/1/img1.jpg",
                Rating::R
            ))
        );
    }

    #[test]
    fn test_addresses_bad_rating() {
        let value = members(vec![("a@x.com", image_entry("img1", "u", Value::Int(9)))]);
        assert!(matches!(
            addresses(value),
            Err(Error::UnexpectedResponse { procedure: "addresses", .. })
        ));
    }

    #[test]
    fn test_user_images() {
        let value = members(vec![
            ("img1", Value::Array(vec![Value::from("0"), Value::from("http://x/1.jpg")])),
            ("img2", Value::Array(vec![Value::Int(3), Value::from("http://x/2.jpg")])),
        ]);
        let images = user_images(value).unwrap();
        assert_eq!(
            images,
            vec![
                Image::new("img1", "http://x/1.jpg", Rating::G),
                Image::new("img2", "http://x/2.jpg", Rating::X),
            ]
        );
    }

    #[test]
    fn test_user_images_malformed() {
        let value = members(vec![("img1", Value::from("oops"))]);
        assert!(user_images(value).is_err());
    }

    #[test]
    fn test_saved_id() {
        assert_eq!(
            saved_id(Procedure::SaveData, &Value::from("abc")).unwrap(),
            Some("abc".to_string())
        );
        assert_eq!(saved_id(Procedure::SaveData, &Value::from("")).unwrap(), None);
        assert_eq!(saved_id(Procedure::SaveUrl, &Value::Boolean(false)).unwrap(), None);
        assert!(saved_id(Procedure::SaveUrl, &Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_check_addresses_by_hash() {
        let addresses = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let value = members(vec![
            (EmailHash::new("a@x.com").as_str(), Value::Int(1)),
            (EmailHash::new("b@x.com").as_str(), Value::Int(0)),
        ]);
        match check_addresses(Procedure::UseUserImage, value, &addresses) {
            Err(Error::InvalidEmail(address)) => assert_eq!(address, "b@x.com"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_addresses_by_address() {
        let addresses = vec!["a@x.com".to_string(), "b@x.com".to_string()];
        let value = members(vec![
            ("a@x.com", Value::Boolean(false)),
            ("b@x.com", Value::Boolean(false)),
        ]);
        match check_addresses(Procedure::RemoveImage, value, &addresses) {
            Err(Error::InvalidEmail(address)) => assert_eq!(address, "a@x.com"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_addresses_unknown_key() {
        let addresses = vec!["a@x.com".to_string()];
        let value = members(vec![("a@x.com", Value::Int(1)), ("stray", Value::Int(0))]);
        match check_addresses(Procedure::RemoveImage, value, &addresses) {
            Err(Error::InvalidEmail(address)) => assert_eq!(address, "stray"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_check_addresses_all_ok() {
        let addresses = vec!["a@x.com".to_string()];
        let value = members(vec![("a@x.com", Value::Int(1))]);
        assert!(check_addresses(Procedure::UseUserImage, value, &addresses).is_ok());
    }

    #[test]
    fn test_server_time() {
        let value = members(vec![("response", Value::Int(1_300_000_000))]);
        assert_eq!(server_time(value).unwrap(), 1_300_000_000);
        assert!(server_time(Value::Int(5)).is_err());
    }
}

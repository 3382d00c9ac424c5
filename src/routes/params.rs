// SPDX-License-Identifier: MIT

//! Parsing for the path-encoded `key=value` route contract.
//!
//! Request fields arrive as path segments rather than a body or query
//! string (`/signin/username=a%40x.com/password=../apikey=..`). Axum
//! percent-decodes wildcard captures before handing them over, which
//! would corrupt values holding an encoded slash, so parsing starts
//! from the raw request path and decodes each side of each segment
//! itself.

use std::collections::HashMap;

use crate::error::AppError;

/// Parameters parsed out of a `key=value` path tail.
#[derive(Debug, Default)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    /// Parse the raw (still percent-encoded) tail of `path` after
    /// `prefix`. Empty segments are skipped; a segment without `=` is a
    /// bad request.
    pub fn from_path(path: &str, prefix: &str) -> Result<Self, AppError> {
        let tail = path.strip_prefix(prefix).unwrap_or(path);

        let mut params = HashMap::new();
        for segment in tail.split('/').filter(|s| !s.is_empty()) {
            let (key, value) = segment.split_once('=').ok_or_else(|| {
                AppError::BadRequest(format!("Malformed path segment: {}", segment))
            })?;
            params.insert(decode(key)?, decode(value)?);
        }
        Ok(Self(params))
    }

    /// A parameter that must be present and non-empty.
    pub fn required(&self, name: &'static str) -> Result<&str, AppError> {
        match self.0.get(name).map(String::as_str) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(AppError::MissingParam(name)),
        }
    }

    /// A parameter that may be absent; empty counts as absent.
    pub fn optional(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn decode(raw: &str) -> Result<String, AppError> {
    urlencoding::decode(raw)
        .map(|cow| cow.into_owned())
        .map_err(|_| AppError::BadRequest(format!("Invalid percent-encoding in: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_key_value_segments() {
        let params = PathParams::from_path(
            "/signin/username=asha%40example.com/password=s3cret/apikey=k3yK3yK3y",
            "/signin/",
        )
        .unwrap();

        assert_eq!(params.required("username").unwrap(), "asha@example.com");
        assert_eq!(params.required("password").unwrap(), "s3cret");
        assert_eq!(params.required("apikey").unwrap(), "k3yK3yK3y");
    }

    #[test]
    fn test_encoded_slash_stays_inside_the_value() {
        let params = PathParams::from_path(
            "/register/imageurl=https%3A%2F%2Fcdn.example.com%2Fa.png/name=Acme",
            "/register/",
        )
        .unwrap();

        assert_eq!(
            params.required("imageurl").unwrap(),
            "https://cdn.example.com/a.png"
        );
        assert_eq!(params.required("name").unwrap(), "Acme");
    }

    #[test]
    fn test_segment_without_equals_is_a_bad_request() {
        let err = PathParams::from_path("/signin/justavalue", "/signin/").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_missing_and_empty_parameters() {
        let params = PathParams::from_path("/signin/username=/apikey=k", "/signin/").unwrap();

        assert!(matches!(
            params.required("username"),
            Err(AppError::MissingParam("username"))
        ));
        assert!(matches!(
            params.required("password"),
            Err(AppError::MissingParam("password"))
        ));
        assert_eq!(params.optional("username"), None);
        assert_eq!(params.optional("apikey"), Some("k"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        // Only the first '=' splits; base64-ish values keep their padding.
        let params = PathParams::from_path("/x/password=a=b==", "/x/").unwrap();
        assert_eq!(params.required("password").unwrap(), "a=b==");
    }
}

//! One-shot notices carried across a redirect.
//!
//! A mutating handler pushes a [`Flash`] into the cookie jar it returns with
//! its redirect; the next page render takes it out again, which clears the
//! cookie. The payload is base64url-encoded JSON so it survives cookie
//! value restrictions.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Cookie holding the pending notice.
pub const FLASH_COOKIE: &str = "notify";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    fn encode(&self) -> Option<String> {
        serde_json::to_vec(self)
            .ok()
            .map(|raw| URL_SAFE_NO_PAD.encode(raw))
    }

    fn decode(value: &str) -> Option<Self> {
        let raw = URL_SAFE_NO_PAD.decode(value).ok()?;
        serde_json::from_slice(&raw).ok()
    }
}

/// Store `flash` for the next request.
pub fn push(jar: CookieJar, flash: &Flash) -> CookieJar {
    match flash.encode() {
        Some(value) => jar.add(
            Cookie::build((FLASH_COOKIE, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        None => {
            tracing::warn!("dropping flash notice that failed to serialize");
            jar
        }
    }
}

/// Take the pending notice, if any, and clear it.
///
/// A malformed cookie is cleared and yields `None`.
pub fn take(jar: CookieJar) -> (CookieJar, Option<Flash>) {
    let Some(value) = jar.get(FLASH_COOKIE).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    let flash = Flash::decode(&value);
    if flash.is_none() {
        tracing::debug!("discarding malformed flash cookie");
    }
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), flash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn jar_with(value: &str) -> CookieJar {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{FLASH_COOKIE}={value}")).unwrap(),
        );
        CookieJar::from_headers(&headers)
    }

    #[test]
    fn pushed_flash_can_be_taken_back() {
        let jar = push(CookieJar::new(), &Flash::success("The user \"Jane Doe\" has been created."));
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_owned();

        let (jar, flash) = take(jar_with(&value));
        let flash = flash.unwrap();
        assert_eq!(flash.level, FlashLevel::Success);
        assert_eq!(flash.message, "The user \"Jane Doe\" has been created.");
        // removal leaves a tombstone, not a live value
        assert!(jar.get(FLASH_COOKIE).map_or(true, |c| c.value().is_empty()));
    }

    #[test]
    fn take_without_cookie_is_noop() {
        let (_, flash) = take(CookieJar::new());
        assert!(flash.is_none());
    }

    #[test]
    fn malformed_cookie_is_discarded() {
        let (_, flash) = take(jar_with("not-base64-json!"));
        assert!(flash.is_none());
    }

    #[test]
    fn level_serializes_lowercase() {
        let v = serde_json::to_value(Flash::success("ok")).unwrap();
        assert_eq!(v["level"], "success");
    }
}

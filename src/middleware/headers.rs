//! Cookie and client header helpers. Cookies are read straight from the
//! `Cookie` header and written as plain `Set-Cookie` values.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
};

use crate::i18n::{LANG_COOKIE, Locale};

pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

/// `Set-Cookie` value scoped to the whole site.
pub fn set_cookie(name: &str, value: &str, max_age_secs: i64) -> HeaderValue {
    let raw = format!("{name}={value}; Max-Age={max_age_secs}; Path=/; SameSite=Lax");
    HeaderValue::from_str(&raw).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// First hop of `x-forwarded-for`, falling back to `x-real-ip`.
pub fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
        })
        .map(str::to_string)
}

pub fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Locale chosen through the `lang` cookie.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLocale(pub Locale);

impl<S> FromRequestParts<S> for ActiveLocale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cookie = read_cookie(&parts.headers, LANG_COOKIE);
        Ok(ActiveLocale(Locale::from_cookie(cookie.as_deref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn finds_cookie_among_several() {
        let h = headers(&[("cookie", "a=1; tmnls_today=1"), ("cookie", "lang=tr")]);
        assert_eq!(read_cookie(&h, "tmnls_today").as_deref(), Some("1"));
        assert_eq!(read_cookie(&h, "lang").as_deref(), Some("tr"));
        assert_eq!(read_cookie(&h, "missing"), None);
    }

    #[test]
    fn cookie_names_match_exactly() {
        let h = headers(&[("cookie", "xlang=en")]);
        assert_eq!(read_cookie(&h, "lang"), None);
    }

    #[test]
    fn builds_site_wide_cookie() {
        let value = set_cookie("tmnls_today", "1", 86_400);
        assert_eq!(
            value.to_str().expect("ascii"),
            "tmnls_today=1; Max-Age=86400; Path=/; SameSite=Lax"
        );
    }

    #[test]
    fn client_ip_uses_first_forwarded_hop() {
        let h = headers(&[("x-forwarded-for", "203.0.113.9, 10.0.0.1")]);
        assert_eq!(client_ip(&h).as_deref(), Some("203.0.113.9"));
        let h = headers(&[("x-real-ip", "198.51.100.4")]);
        assert_eq!(client_ip(&h).as_deref(), Some("198.51.100.4"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}

//! A browser-like cookie store behind the [Document] interface.
//!
//! [MemoryDocument] plays the part of a page's `document` for one host: it keeps a jar
//! of cookies keyed by name, domain and path, and answers reads with the cookies the
//! current page path is allowed to see. It follows the RFC 6265 rules a browser
//! applies to script-set cookies (default path, path matching, domain matching, the
//! `secure` flag and expiry) and nothing more.
use std::sync::{Mutex, MutexGuard, PoisonError};

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

use crate::codec::HTTP_DATE;
use crate::document::Document;

#[derive(Debug, Clone)]
struct StoredCookie {
    name: String,
    value: String,
    domain: String,
    host_only: bool,
    path: String,
    expires_at: Option<Timestamp>,
    secure: bool,
    created: u64,
}

#[derive(Debug)]
struct State {
    path: String,
    jar: Vec<StoredCookie>,
    next_id: u64,
}

/// An in-memory host document for a single origin.
///
/// ```
/// use doc_cookies::{Cookies, MemoryDocument, Attributes};
///
/// let document = MemoryDocument::new("example.org", "/");
/// let cookies = Cookies::with_document(&document);
///
/// cookies.set_with("key", "value", &Attributes::new().path("/another-path"));
/// assert_eq!(cookies.get("key"), None);
///
/// document.navigate("/another-path");
/// assert_eq!(cookies.get("key").as_deref(), Some("value"));
/// ```
#[derive(Debug)]
pub struct MemoryDocument {
    host: String,
    secure: bool,
    state: Mutex<State>,
}

impl MemoryDocument {
    /// A secure (`https`) document for `host`, currently showing `path`.
    pub fn new<H: Into<String>, P: Into<String>>(host: H, path: P) -> Self {
        MemoryDocument {
            host: host.into().to_ascii_lowercase(),
            secure: true,
            state: Mutex::new(State {
                path: path.into(),
                jar: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Serves the document over plain `http`, so `secure` cookies are refused.
    pub fn insecure(mut self) -> Self {
        self.secure = false;
        self
    }

    /// Moves the document to another path on the same host, keeping the jar.
    pub fn navigate<P: Into<String>>(&self, path: P) {
        self.state().path = path.into();
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> String {
        self.state().path.clone()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn header_at(&self, now: Timestamp) -> String {
        let mut state = self.state();

        state
            .jar
            .retain(|cookie| cookie.expires_at.is_none_or(|at| at > now));

        let mut visible: Vec<&StoredCookie> = state
            .jar
            .iter()
            .filter(|cookie| self.is_visible(cookie, &state.path))
            .collect();

        // Longer paths first, then oldest first
        visible.sort_by(|a, b| {
            b.path
                .len()
                .cmp(&a.path.len())
                .then(a.created.cmp(&b.created))
        });

        visible
            .iter()
            .map(|cookie| {
                if cookie.name.is_empty() {
                    cookie.value.clone()
                } else {
                    format!("{}={}", cookie.name, cookie.value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn is_visible(&self, cookie: &StoredCookie, request_path: &str) -> bool {
        let domain_ok = if cookie.host_only {
            cookie.domain == self.host
        } else {
            domain_match(&self.host, &cookie.domain)
        };

        domain_ok && path_match(request_path, &cookie.path) && (!cookie.secure || self.secure)
    }

    fn store_at(&self, cookie: &str, now: Timestamp) {
        let mut parts = cookie.split(';');
        let Some(pair) = parts.next() else {
            return;
        };

        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => ("", pair.trim()),
        };
        if name.is_empty() && value.is_empty() {
            log::debug!("Ignoring cookie string without a name or value: `{cookie}`");
            return;
        }

        let mut path = None;
        let mut domain = None;
        let mut max_age = None;
        let mut expires = None;
        let mut secure = false;

        for attribute in parts {
            let (key, val) = match attribute.split_once('=') {
                Some((key, val)) => (key.trim(), val.trim()),
                None => (attribute.trim(), ""),
            };
            match key.to_ascii_lowercase().as_str() {
                "path" if val.starts_with('/') => path = Some(val.to_string()),
                "domain" if !val.is_empty() => {
                    domain = Some(val.trim_start_matches('.').to_ascii_lowercase())
                }
                "max-age" => max_age = val.parse::<i64>().ok().or(max_age),
                "expires" => expires = parse_http_date(val).or(expires),
                "secure" => secure = true,
                _ => {}
            }
        }

        if secure && !self.secure {
            log::debug!("Rejecting secure cookie `{name}` on an insecure document");
            return;
        }

        let (domain, host_only) = match domain {
            Some(domain) if domain_match(&self.host, &domain) => (domain, false),
            Some(domain) => {
                log::debug!("Rejecting cookie `{name}` for `{domain}` on `{}`", self.host);
                return;
            }
            None => (self.host.clone(), true),
        };

        // max-age takes precedence over expires
        let expires_at = match max_age {
            Some(seconds) if seconds <= 0 => Some(Timestamp::MIN),
            Some(seconds) => Some(
                now.checked_add(SignedDuration::from_secs(seconds))
                    .unwrap_or(Timestamp::MAX),
            ),
            None => expires,
        };

        let mut state = self.state();
        let path = path.unwrap_or_else(|| default_path(&state.path));

        let existing = state.jar.iter().position(|stored| {
            stored.name == name && stored.domain == domain && stored.path == path
        });

        if expires_at.is_some_and(|at| at <= now) {
            if let Some(index) = existing {
                state.jar.remove(index);
                log::debug!("Expired cookie `{name}` on path `{path}`");
            }
            return;
        }

        match existing {
            Some(index) => {
                let stored = &mut state.jar[index];
                stored.value = value.to_string();
                stored.host_only = host_only;
                stored.expires_at = expires_at;
                stored.secure = secure;
            }
            None => {
                let created = state.next_id;
                state.next_id += 1;
                state.jar.push(StoredCookie {
                    name: name.to_string(),
                    value: value.to_string(),
                    domain,
                    host_only,
                    path,
                    expires_at,
                    secure,
                    created,
                });
            }
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        MemoryDocument::new("localhost", "/")
    }
}

impl Document for MemoryDocument {
    fn cookie(&self) -> String {
        self.header_at(Timestamp::now())
    }

    fn set_cookie(&self, cookie: &str) {
        self.store_at(cookie, Timestamp::now())
    }
}

/// The directory of the request path, `/` at the top level.
fn default_path(request_path: &str) -> String {
    if !request_path.starts_with('/') {
        return "/".to_string();
    }
    match request_path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(index) => request_path[..index].to_string(),
    }
}

fn path_match(request_path: &str, cookie_path: &str) -> bool {
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

fn domain_match(host: &str, domain: &str) -> bool {
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host[..host.len() - domain.len()].ends_with('.'))
}

fn parse_http_date(value: &str) -> Option<Timestamp> {
    let datetime = DateTime::strptime(HTTP_DATE, value).ok()?;
    datetime
        .to_zoned(TimeZone::UTC)
        .ok()
        .map(|zoned| zoned.timestamp())
}

#[cfg(test)]
mod tests {
    use super::{MemoryDocument, default_path, domain_match, parse_http_date, path_match};
    use crate::document::Document;
    use jiff::{SignedDuration, Timestamp};

    fn now() -> Timestamp {
        "2022-06-28T09:07:45Z".parse().unwrap()
    }

    #[test]
    fn default_path_is_directory_of_request() {
        assert_eq!(default_path(""), "/");
        assert_eq!(default_path("/"), "/");
        assert_eq!(default_path("/another-path"), "/");
        assert_eq!(default_path("/a/b/c"), "/a/b");
        assert_eq!(default_path("/a/b/"), "/a/b");
    }

    #[test]
    fn path_matching() {
        assert!(path_match("/", "/"));
        assert!(path_match("/docs", "/"));
        assert!(path_match("/docs/web", "/docs"));
        assert!(path_match("/docs/", "/docs/"));
        assert!(!path_match("/docsweb", "/docs"));
        assert!(!path_match("/", "/another-path"));
    }

    #[test]
    fn domain_matching() {
        assert!(domain_match("example.org", "example.org"));
        assert!(domain_match("www.example.org", "example.org"));
        assert!(!domain_match("example.org", "example.com"));
        assert!(!domain_match("badexample.org", "example.org"));
    }

    #[test]
    fn parses_http_dates() {
        assert_eq!(
            parse_http_date("Thu, 01 Jan 1970 00:00:00 GMT"),
            Some(Timestamp::UNIX_EPOCH)
        );
        assert_eq!(parse_http_date("Tue, 28 Jun 2022 09:07:45 GMT"), Some(now()));
        assert_eq!(parse_http_date("yesterday"), None);
    }

    #[test]
    fn stores_and_lists_cookies() {
        let document = MemoryDocument::default();

        document.store_at("a=1;path=/", now());
        document.store_at("b=2;path=/", now());

        assert_eq!(document.header_at(now()), "a=1; b=2");
    }

    #[test]
    fn upserts_by_name_domain_and_path() {
        let document = MemoryDocument::default();

        document.store_at("a=1;path=/", now());
        document.store_at("b=2;path=/", now());
        document.store_at("a=3;path=/", now());

        assert_eq!(document.header_at(now()), "a=3; b=2");
    }

    #[test]
    fn longer_paths_listed_first() {
        let document = MemoryDocument::new("example.org", "/app/page");

        document.store_at("key=root;path=/", now());
        document.store_at("key=app;path=/app", now());

        assert_eq!(document.header_at(now()), "key=app; key=root");
    }

    #[test]
    fn max_age_expires_cookie() {
        let document = MemoryDocument::default();

        document.store_at("a=1;path=/;max-age=60", now());
        assert_eq!(document.header_at(now()), "a=1");

        let later = now().checked_add(SignedDuration::from_secs(61)).unwrap();
        assert_eq!(document.header_at(later), "");
    }

    #[test]
    fn max_age_wins_over_expires() {
        let document = MemoryDocument::default();

        document.store_at(
            "a=1;path=/;max-age=60;expires=Thu, 01 Jan 1970 00:00:00 GMT",
            now(),
        );

        assert_eq!(document.header_at(now()), "a=1");
    }

    #[test]
    fn past_expiry_deletes_under_default_path() {
        let document = MemoryDocument::new("example.org", "/another-path");

        document.store_at("a=1;path=/", now());
        document.store_at("a=;expires=Thu, 01 Jan 1970 00:00:00 GMT", now());

        assert_eq!(document.header_at(now()), "");
    }

    #[test]
    fn host_is_lowercased() {
        let document = MemoryDocument::new("WWW.Example.org", "/");

        document.store_at("a=1;path=/;domain=example.org", now());

        assert_eq!(document.host(), "www.example.org");
        assert_eq!(document.header_at(now()), "a=1");
    }

    #[test]
    fn rejects_foreign_domain() {
        let document = MemoryDocument::new("example.org", "/");

        document.store_at("a=1;path=/;domain=example.com", now());
        document.store_at("b=2;path=/;domain=.example.org", now());

        assert_eq!(document.header_at(now()), "b=2");
    }

    #[test]
    fn insecure_document_refuses_secure_cookies() {
        let document = MemoryDocument::default().insecure();

        document.store_at("a=1;path=/;secure", now());
        document.store_at("b=2;path=/", now());

        assert_eq!(document.header_at(now()), "b=2");
    }

    #[test]
    fn navigation_keeps_jar() {
        let document = MemoryDocument::new("example.org", "/");

        document.set_cookie("a=1;path=/other");
        assert_eq!(document.cookie(), "");

        document.navigate("/other");
        assert_eq!(document.path(), "/other");
        assert_eq!(document.cookie(), "a=1");
    }
}

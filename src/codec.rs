//! Conversion between the host's cookie string and cookie names, values and attributes.
//!
//! Reading goes through [`parse_all`], which turns a header such as `a=1; b=2` into a
//! [`CookieMap`]. Writing goes through [`serialize`], which produces the exact string
//! assigned to the host's cookie property:
//!
//! ```
//! use doc_cookies::Attributes;
//! use doc_cookies::codec::{parse_all, serialize};
//!
//! let cookie = serialize("theme", "dark mode", &Attributes::new().max_age(3600));
//! assert_eq!(cookie, "theme=dark%20mode;path=/;max-age=3600");
//!
//! let cookies = parse_all("theme=dark%20mode; lang=en");
//! assert_eq!(cookies["theme"], "dark mode");
//! ```
use std::collections::HashMap;

use jiff::{SignedDuration, Timestamp};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::attributes::{Attributes, Expires};
use crate::utils::compact;

/// Cookie names mapped to their decoded values.
pub type CookieMap = HashMap<String, String>;

/// Everything but ASCII alphanumerics and `- _ . ! ~ * ' ( )` is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub(crate) const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

const REMOVAL_MAX_AGE: i64 = -99_999_999;

/// Parses the host's cookie header into a name to value map.
///
/// Segments are separated by `;` and any whitespace that follows it. Each segment is
/// split on its first `=`; the value is percent-decoded, the name is kept as is.
/// When a name appears more than once the last value wins. Segments without `=` are
/// skipped rather than failing the whole read.
pub fn parse_all(header: &str) -> CookieMap {
    header
        .split(';')
        .map(str::trim_start)
        .filter(|segment| !segment.is_empty())
        .filter_map(|segment| match segment.split_once('=') {
            Some((name, value)) => Some((name.to_string(), decode(value))),
            None => {
                log::trace!("Skipping cookie segment without a `=`: `{segment}`");
                None
            }
        })
        .collect()
}

/// Builds the string assigned to the host's cookie property.
///
/// The components are written in a fixed order and joined with `;`:
/// `name=value`, `path`, `domain`, `max-age`, `expires`, `secure`, `samesite`.
/// Only the pair and the path (`/` when unset) are always present.
pub fn serialize(name: &str, value: &str, attributes: &Attributes<'_>) -> String {
    serialize_at(name, value, attributes, Timestamp::now())
}

/// Same as [`serialize`], resolving relative expiry against `now`.
pub fn serialize_at(name: &str, value: &str, attributes: &Attributes<'_>, now: Timestamp) -> String {
    let components = [
        Some(format!("{name}={}", encode(value))),
        Some(format!("path={}", attributes.path.as_deref().unwrap_or("/"))),
        attributes
            .domain
            .as_deref()
            .filter(|domain| !domain.is_empty())
            .map(|domain| format!("domain={domain}")),
        // Zero is written the same as unset
        attributes
            .max_age
            .filter(|max_age| *max_age != 0)
            .map(|max_age| format!("max-age={max_age}")),
        attributes
            .expires
            .map(|expires| format!("expires={}", resolve_expiry_at(&expires, now))),
        attributes
            .secure
            .filter(|secure| *secure)
            .map(|_| "secure".to_string()),
        attributes
            .same_site
            .map(|same_site| format!("samesite={same_site}")),
    ];

    compact(components).join(";")
}

/// The string that expires `name` under the host's default path.
pub fn removal(name: &str) -> String {
    format!(
        "{name}=;expires={};max-age={REMOVAL_MAX_AGE}",
        http_date(Timestamp::UNIX_EPOCH)
    )
}

/// Formats the expiry as an HTTP-date, e.g. `Tue, 28 Jun 2022 09:07:45 GMT`.
///
/// A day count is added to the current time.
pub fn resolve_expiry(expires: &Expires) -> String {
    resolve_expiry_at(expires, Timestamp::now())
}

/// Same as [`resolve_expiry`], counting days from `now`.
pub fn resolve_expiry_at(expires: &Expires, now: Timestamp) -> String {
    let at = match *expires {
        Expires::At(timestamp) => timestamp,
        Expires::Days(days) => {
            let offset = SignedDuration::from_millis(days.saturating_mul(MILLIS_PER_DAY));
            now.checked_add(offset).unwrap_or(if days < 0 {
                Timestamp::MIN
            } else {
                Timestamp::MAX
            })
        }
    };

    http_date(at)
}

pub(crate) fn http_date(timestamp: Timestamp) -> String {
    timestamp.strftime(HTTP_DATE).to_string()
}

pub(crate) fn encode(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

pub(crate) fn decode(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, parse_all, removal, resolve_expiry_at, serialize, serialize_at};
    use crate::{Attributes, Expires, SameSite};
    use jiff::Timestamp;

    fn now() -> Timestamp {
        "2022-06-28T09:07:45Z".parse().unwrap()
    }

    #[test]
    fn parse_empty_header() {
        assert!(parse_all("").is_empty());
    }

    #[test]
    fn parse_pairs_with_and_without_spaces() {
        let cookies = parse_all("a=1; b=2;c=3;   d=");

        assert_eq!(cookies.len(), 4);
        assert_eq!(cookies["a"], "1");
        assert_eq!(cookies["b"], "2");
        assert_eq!(cookies["c"], "3");
        assert_eq!(cookies["d"], "");
    }

    #[test]
    fn parse_last_duplicate_wins() {
        let cookies = parse_all("key=first; other=x; key=second");

        assert_eq!(cookies["key"], "second");
    }

    #[test]
    fn parse_splits_on_first_equals_only() {
        let cookies = parse_all("token=a=b==");

        assert_eq!(cookies["token"], "a=b==");
    }

    #[test]
    fn parse_skips_segments_without_equals() {
        let cookies = parse_all("flag; key=value; ;");

        assert_eq!(cookies.len(), 1);
        assert_eq!(cookies["key"], "value");
    }

    #[test]
    fn parse_decodes_values_but_not_names() {
        let cookies = parse_all("my%20key=val%3B'%245%25");

        assert_eq!(cookies["my%20key"], "val;'$5%");
    }

    #[test]
    fn decode_passes_malformed_escapes_through() {
        assert_eq!(decode("100%"), "100%");
        assert_eq!(decode("%zz"), "%zz");
        assert_eq!(decode("%FF"), "\u{FFFD}");
    }

    #[test]
    fn encode_matches_uri_component_escaping() {
        assert_eq!(encode("abcXYZ019-_.!~*'()"), "abcXYZ019-_.!~*'()");
        assert_eq!(encode("a b;c=d,e\"f%"), "a%20b%3Bc%3Dd%2Ce%22f%25");
        assert_eq!(encode("é"), "%C3%A9");
    }

    #[test]
    fn serialize_defaults_to_root_path() {
        assert_eq!(serialize("key", "value", &Attributes::new()), "key=value;path=/");
    }

    #[test]
    fn serialize_every_attribute_in_order() {
        let expires: Timestamp = "2022-06-28T11:07:45+02:00".parse().unwrap();
        let attributes = Attributes::new()
            .expires(expires)
            .max_age(1)
            .path("/another-path")
            .domain("example.com")
            .secure(true)
            .same_site(SameSite::Strict);

        assert_eq!(
            serialize("key", "value", &attributes),
            "key=value;path=/another-path;domain=example.com;max-age=1;expires=Tue, 28 Jun 2022 09:07:45 GMT;secure;samesite=strict"
        );
    }

    #[test]
    fn serialize_omits_falsy_attributes() {
        let attributes = Attributes::new().secure(false).max_age(0).domain("");

        assert_eq!(serialize("key", "value", &attributes), "key=value;path=/");
    }

    #[test]
    fn serialize_relative_expiry() {
        let attributes = Attributes::new().expires(2).same_site(SameSite::Lax);

        assert_eq!(
            serialize_at("key", "v", &attributes, now()),
            "key=v;path=/;expires=Thu, 30 Jun 2022 09:07:45 GMT;samesite=lax"
        );
    }

    #[test]
    fn serialize_zero_day_expiry_is_written() {
        let attributes = Attributes::new().expires(Expires::Days(0));

        assert_eq!(
            serialize_at("k", "v", &attributes, now()),
            "k=v;path=/;expires=Tue, 28 Jun 2022 09:07:45 GMT"
        );
    }

    #[test]
    fn serialize_encodes_value_only() {
        assert_eq!(
            serialize("key", "a;b=c", &Attributes::new()),
            "key=a%3Bb%3Dc;path=/"
        );
    }

    #[test]
    fn resolve_days_relative_to_now() {
        assert_eq!(
            resolve_expiry_at(&Expires::Days(0), now()),
            "Tue, 28 Jun 2022 09:07:45 GMT"
        );
        assert_eq!(
            resolve_expiry_at(&Expires::Days(-1), now()),
            "Mon, 27 Jun 2022 09:07:45 GMT"
        );
        assert_eq!(
            resolve_expiry_at(&Expires::Days(365), now()),
            "Wed, 28 Jun 2023 09:07:45 GMT"
        );
    }

    #[test]
    fn resolve_absolute_ignores_now() {
        assert_eq!(
            resolve_expiry_at(&Expires::At(Timestamp::UNIX_EPOCH), now()),
            "Thu, 01 Jan 1970 00:00:00 GMT"
        );
    }

    #[test]
    fn resolve_out_of_range_days_saturates() {
        assert_eq!(
            resolve_expiry_at(&Expires::Days(i64::MAX), now()),
            resolve_expiry_at(&Expires::At(Timestamp::MAX), now())
        );
    }

    #[test]
    fn removal_expires_at_epoch() {
        assert_eq!(
            removal("key"),
            "key=;expires=Thu, 01 Jan 1970 00:00:00 GMT;max-age=-99999999"
        );
    }
}

use std::borrow::Cow;
use std::fmt;

use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

/// The `SameSite` directive of a cookie, written in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Lax,
    Strict,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Lax => f.write_str("lax"),
            SameSite::Strict => f.write_str("strict"),
            SameSite::None => f.write_str("none"),
        }
    }
}

/// When a cookie expires.
///
/// `Days` counts whole days from the moment the cookie is serialized, zero and
/// negative counts included. `At` is an absolute point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expires {
    Days(i64),
    At(Timestamp),
}

impl From<i64> for Expires {
    fn from(days: i64) -> Self {
        Expires::Days(days)
    }
}

impl From<i32> for Expires {
    fn from(days: i32) -> Self {
        Expires::Days(i64::from(days))
    }
}

impl From<Timestamp> for Expires {
    fn from(timestamp: Timestamp) -> Self {
        Expires::At(timestamp)
    }
}

impl From<Zoned> for Expires {
    fn from(zoned: Zoned) -> Self {
        Expires::At(zoned.timestamp())
    }
}

impl From<&Zoned> for Expires {
    fn from(zoned: &Zoned) -> Self {
        Expires::At(zoned.timestamp())
    }
}

/// The directives written after a cookie's `name=value` pair.
///
/// Every field is optional. An unset path is written as `/` by the serializer.
/// ```
/// use doc_cookies::{Attributes, SameSite};
///
/// let attributes = Attributes::new()
///     .path("/account")
///     .secure(true)
///     .same_site(SameSite::Strict)
///     .expires(7);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes<'c> {
    pub(crate) expires: Option<Expires>,
    pub(crate) max_age: Option<i64>,
    pub(crate) path: Option<Cow<'c, str>>,
    pub(crate) domain: Option<Cow<'c, str>>,
    pub(crate) secure: Option<bool>,
    pub(crate) same_site: Option<SameSite>,
}

impl<'c> Attributes<'c> {
    pub fn new() -> Self {
        Attributes {
            expires: None,
            max_age: None,
            path: None,
            domain: None,
            secure: None,
            same_site: None,
        }
    }
    #[inline]
    pub fn path<T: Into<Cow<'c, str>>>(mut self, path: T) -> Self {
        self.path = Some(path.into());
        self
    }
    #[inline]
    pub fn domain<T: Into<Cow<'c, str>>>(mut self, domain: T) -> Self {
        self.domain = Some(domain.into());
        self
    }
    #[inline]
    pub fn secure<T: Into<Option<bool>>>(mut self, value: T) -> Self {
        self.secure = value.into();
        self
    }
    #[inline]
    pub fn same_site<T: Into<Option<SameSite>>>(mut self, value: T) -> Self {
        self.same_site = value.into();
        self
    }
    /// Lifetime in seconds. Zero is treated the same as unset.
    #[inline]
    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }
    /// Accepts a day count, a [`Timestamp`] or a [`Zoned`].
    #[inline]
    pub fn expires<T: Into<Expires>>(mut self, value: T) -> Self {
        self.expires = Some(value.into());
        self
    }

    /// Layers `overrides` on top of `self`, field by field.
    ///
    /// A field set in `overrides` wins, including `secure(false)` over a default
    /// `secure(true)`. Fields left unset in `overrides` fall back to `self`.
    pub fn merge(&self, overrides: &Attributes<'c>) -> Attributes<'c> {
        Attributes {
            expires: overrides.expires.or(self.expires),
            max_age: overrides.max_age.or(self.max_age),
            path: overrides.path.clone().or_else(|| self.path.clone()),
            domain: overrides.domain.clone().or_else(|| self.domain.clone()),
            secure: overrides.secure.or(self.secure),
            same_site: overrides.same_site.or(self.same_site),
        }
    }

    pub fn get_expires(&self) -> Option<Expires> {
        self.expires
    }
    pub fn get_max_age(&self) -> Option<i64> {
        self.max_age
    }
    pub fn get_path(&self) -> Option<&str> {
        self.path.as_deref()
    }
    pub fn get_domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
    pub fn get_secure(&self) -> Option<bool> {
        self.secure
    }
    pub fn get_same_site(&self) -> Option<SameSite> {
        self.same_site
    }
}

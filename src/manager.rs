//! The cookie manager: reads, writes and removes cookies on a host document
use crate::attributes::Attributes;
use crate::codec::{self, CookieMap};
use crate::document::{self, Document};

/// Construction options for [Cookies].
///
/// The document borrow (`'d`) and the strings borrowed by the default attributes (`'a`)
/// are independent.
///
/// ```
/// use doc_cookies::{Cookies, CookiesConfig, Attributes, MemoryDocument, SameSite};
///
/// let document = MemoryDocument::default();
/// let cookies: Cookies = CookiesConfig::new()
///     .document(&document)
///     .attributes(Attributes::new().same_site(SameSite::Lax))
///     .into();
///
/// cookies.set("key", "value");
/// assert_eq!(cookies.get("key").as_deref(), Some("value"));
/// ```
#[derive(Default)]
pub struct CookiesConfig<'d, 'a> {
    document: Option<&'d dyn Document>,
    attributes: Attributes<'a>,
}

impl<'d, 'a> CookiesConfig<'d, 'a> {
    pub fn new() -> Self {
        CookiesConfig::default()
    }
    /// The host to operate on. The ambient document is used when unset.
    pub fn document(mut self, document: &'d dyn Document) -> Self {
        self.document = Some(document);
        self
    }
    /// Defaults merged under the options of every write.
    pub fn attributes(mut self, attributes: Attributes<'a>) -> Self {
        self.attributes = attributes;
        self
    }
}

impl<'d, 'a> From<CookiesConfig<'d, 'a>> for Cookies<'d, 'a> {
    fn from(config: CookiesConfig<'d, 'a>) -> Self {
        Cookies::new(config)
    }
}

/// Reads and writes cookies through a host document's cookie string.
///
/// Nothing is cached: every read parses the host's current header, and every write is
/// a single assignment the host merges into its own store.
pub struct Cookies<'d, 'a> {
    document: &'d dyn Document,
    /// Merged under the per-call options of every [Cookies::set] and [Cookies::set_with].
    ///
    /// Replacing it only affects later writes.
    pub default_attributes: Attributes<'a>,
}

impl<'d, 'a> Cookies<'d, 'a> {
    pub fn new(config: CookiesConfig<'d, 'a>) -> Self {
        let document: &'d dyn Document = match config.document {
            Some(document) => document,
            None => document::ambient(),
        };

        Cookies {
            document,
            default_attributes: config.attributes,
        }
    }

    /// A manager for `document` with no default attributes.
    pub fn with_document(document: &'d dyn Document) -> Self {
        CookiesConfig::new().document(document).into()
    }

    /// The decoded value of `name`, or `None` when the host has no such cookie.
    pub fn get(&self, name: &str) -> Option<String> {
        self.all().remove(name)
    }

    /// Every cookie currently visible on the host, by name.
    pub fn all(&self) -> CookieMap {
        codec::parse_all(&self.document.cookie())
    }

    /// Writes `name` with the default attributes.
    pub fn set(&self, name: &str, value: &str) {
        self.set_with(name, value, &Attributes::new())
    }

    /// Writes `name` with `options` layered over the default attributes.
    pub fn set_with(&self, name: &str, value: &str, options: &Attributes<'_>) {
        let attributes = self.default_attributes.merge(options);
        let cookie = codec::serialize(name, value, &attributes);

        log::debug!("Setting cookie `{name}`");
        self.document.set_cookie(&cookie);
    }

    /// Expires `name` under the host's default path.
    ///
    /// The default attributes are not applied, so a cookie written with another path
    /// or an explicit domain is left in place.
    pub fn remove(&self, name: &str) {
        log::debug!("Removing cookie `{name}`");
        self.document.set_cookie(&codec::removal(name));
    }
}

impl Default for Cookies<'_, '_> {
    /// A manager bound to the ambient document.
    fn default() -> Self {
        Cookies::new(CookiesConfig::new())
    }
}

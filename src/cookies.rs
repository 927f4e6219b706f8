//! Typed cookies on top of [Cookies]
use crate::attributes::Attributes;
use crate::error::CookieError;
use crate::manager::Cookies;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::any::type_name;

/// Base struct for cookie generic types
pub struct Cookie<'c, T> {
    cookies: &'c Cookies<'c, 'c>,
    attributes: Option<Attributes<'c>>,
    _marker: std::marker::PhantomData<T>,
}

impl<'c, T> Cookie<'c, T> {
    /// Create a cookie instance for any generic type parameter
    pub fn new(cookies: &'c Cookies<'c, 'c>) -> Self {
        Cookie {
            cookies,
            attributes: None,
            _marker: std::marker::PhantomData,
        }
    }

    /// Replace the attributes from [OutgoingConfig::attributes] for this instance
    pub fn with_attributes(mut self, attributes: Attributes<'c>) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

/// Provide methods to `get` data from a cookie instance for any generic type parameter that implements [IncomingConfig]
impl<T: IncomingConfig> Cookie<'_, T> {
    /// Reads the cookie named by [CookieName] from the host document.
    ///
    /// The JSON value is returned as the associated type defined by the `Get` type from [IncomingConfig].
    /// # Example
    /// ```
    /// use doc_cookies::doc_cookies_macros::cookie;
    /// use doc_cookies::cookies::{Cookie, CookieName, IncomingConfig};
    /// use doc_cookies::{Cookies, Document, MemoryDocument};
    ///
    /// #[cookie(name = "visits")]
    /// pub struct Visits;
    ///
    /// impl IncomingConfig for Visits {
    ///     type Get = u32;
    /// }
    ///
    /// let document = MemoryDocument::default();
    /// document.set_cookie("visits=3;path=/");
    ///
    /// let cookies = Cookies::with_document(&document);
    /// assert_eq!(Cookie::<Visits>::new(&cookies).get(), Ok(3));
    /// ```
    pub fn get(&self) -> Result<T::Get, CookieError> {
        let data = self
            .cookies
            .get(T::COOKIE_NAME)
            .ok_or(CookieError::NotFound(T::COOKIE_NAME.to_string()))?;

        let data = serde_json::from_str(&data).map_err(|_| {
            CookieError::Deserialization(data.to_string(), type_name::<T::Get>().to_string())
        })?;
        Ok(data)
    }
}

/// Provide methods to `insert` and `remove` a cookie instance for any generic type parameter that implements [OutgoingConfig]
impl<T: OutgoingConfig> Cookie<'_, T> {
    /// Writes the serialized value to the host document.
    ///
    /// The attributes of this instance, or [OutgoingConfig::attributes], are layered over the
    /// manager's default attributes.
    /// # Example
    /// ```
    /// use doc_cookies::doc_cookies_macros::cookie;
    /// use doc_cookies::cookies::{Cookie, CookieName, OutgoingConfig};
    /// use doc_cookies::{Cookies, MemoryDocument};
    ///
    /// #[cookie(name = "theme")]
    /// pub struct Theme;
    ///
    /// impl OutgoingConfig for Theme {
    ///     type Insert = String;
    /// }
    ///
    /// let document = MemoryDocument::default();
    /// let cookies = Cookies::with_document(&document);
    ///
    /// Cookie::<Theme>::new(&cookies).insert("dark".to_string());
    /// assert_eq!(cookies.get("theme").as_deref(), Some("\"dark\""));
    /// ```
    pub fn insert(&self, value: T::Insert) {
        let data = T::serialize(value);

        let attributes = match &self.attributes {
            Some(attributes) => attributes,
            None => &T::attributes(),
        };

        self.cookies
            .set_with(T::COOKIE_NAME, &data.to_string(), attributes);
    }
    /// Expires the cookie under the host's default path.
    ///
    /// Removal never carries a path or domain, see [Cookies::remove].
    pub fn remove(&self) {
        self.cookies.remove(T::COOKIE_NAME);
    }
}

/// Provide internal customization for `insert` and `remove` methods in [Cookie].
///
/// ```
/// use doc_cookies::doc_cookies_macros::cookie;
/// use doc_cookies::cookies::{CookieName, OutgoingConfig};
/// use doc_cookies::{Attributes, SameSite};
///
/// #[cookie(name = "__session")]
/// pub struct Session;
///
/// impl OutgoingConfig for Session {
///    type Insert = (String, u64);
///
///    fn attributes<'c>() -> Attributes<'c> {
///        Attributes::new().secure(true).same_site(SameSite::Strict).expires(1)
///    }
/// }
/// ```
pub trait OutgoingConfig: CookieName {
    /// The serialization type when inserting a cookie
    type Insert: Serialize;

    /// Provides default serialization for a cookie. This can be overwriting
    fn serialize(values: Self::Insert) -> Value {
        json!(values)
    }

    /// Provides preset attributes for a cookie. This can be overwriting
    fn attributes<'c>() -> Attributes<'c> {
        Attributes::new()
    }
}

/// Provide internal customization for the `get` method in [Cookie].
pub trait IncomingConfig: CookieName {
    /// The deserialization type when getting a cookie
    type Get: DeserializeOwned;
}

/// This is the base implementation of a cookie type
///
/// This is either implemented manually or with macro `#[cookie(name = "...")]`
pub trait CookieName {
    const COOKIE_NAME: &'static str;
}

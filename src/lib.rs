//! Read, write and delete cookies through a host document's cookie string.
//!
//! A host document (a browser page, a webview, a test double) exposes every cookie
//! visible to it through one string property: reading it yields `a=1; b=2`, assigning
//! `name=value;path=/;...` upserts a single cookie. doc-cookies computes the strings
//! handed to that property and parses the strings read back from it.
//!
//! # Features
//! - Values are percent-encoded on write and decoded on read, so any string round-trips.
//! - Attributes (path, domain, max-age, expires, secure, samesite) in a fixed, predictable order.
//! - Expiry as an absolute [time::Timestamp] or a number of days from now.
//! - Per-manager default attributes merged under the options of each write.
//! - Typed cookies with JSON values, see [cookies].
//!
//! # Usage
//! Implement [Document] for your host, or use the in-memory [MemoryDocument]:
//! ```
//! use doc_cookies::{Attributes, Cookies, CookiesConfig, MemoryDocument, SameSite};
//!
//! let document = MemoryDocument::new("example.org", "/");
//!
//! let cookies: Cookies = CookiesConfig::new()
//!     .document(&document)
//!     .attributes(Attributes::new().same_site(SameSite::Lax))
//!     .into();
//!
//! cookies.set("greeting", "hello; world");
//! assert_eq!(cookies.get("greeting").as_deref(), Some("hello; world"));
//!
//! // Keep the cookie for a week
//! cookies.set_with("token", "abc", &Attributes::new().expires(7).secure(true));
//!
//! cookies.remove("greeting");
//! assert_eq!(cookies.get("greeting"), None);
//! ```
//! A manager built without a document binds to the ambient one, see
//! [document::install_ambient_document].
mod attributes;
pub mod codec;
pub mod cookies;
pub mod document;
mod error;
mod manager;
mod memory;
mod utils;

pub use attributes::{Attributes, Expires, SameSite};
pub use codec::CookieMap;
pub use doc_cookies_macros;
pub use document::Document;
pub use error::CookieError;
pub use jiff as time;
pub use manager::{Cookies, CookiesConfig};
pub use memory::MemoryDocument;

//! The seam between the cookie manager and the host that owns the cookie string
use std::cell::OnceCell;
use std::sync::LazyLock;

use crate::error::CookieError;
use crate::memory::MemoryDocument;

/// A host exposing a single cookie string property.
///
/// Reading returns every cookie visible to the current context as `name=value` pairs
/// separated by `; `. Writing hands one cookie string to the host, which decides how
/// to merge it into its own store.
pub trait Document {
    fn cookie(&self) -> String;

    fn set_cookie(&self, cookie: &str);
}

thread_local! {
    static AMBIENT: OnceCell<&'static dyn Document> = const { OnceCell::new() };
}

static FALLBACK: LazyLock<MemoryDocument> = LazyLock::new(MemoryDocument::default);

/// Binds the document used by managers built without one on the current thread.
///
/// Only one ambient document can be bound per thread. Managers built before the
/// install keep the document they were given.
pub fn install_ambient_document(document: &'static dyn Document) -> Result<(), CookieError> {
    AMBIENT.with(|ambient| {
        ambient
            .set(document)
            .map_err(|_| CookieError::AmbientDocumentInstalled)
    })
}

/// Returns the ambient document of the current thread.
///
/// Until one is installed this is a process-wide in-memory document, which does not
/// block a later [install_ambient_document].
pub fn ambient() -> &'static dyn Document {
    AMBIENT.with(|ambient| match ambient.get() {
        Some(document) => *document,
        None => {
            log::debug!("No ambient document installed, using the in-memory document");
            let fallback: &'static dyn Document = &*FALLBACK;
            fallback
        }
    })
}

use thiserror::Error;

/// The error returned by typed cookie reads and by ambient document installation
#[derive(Error, Debug, PartialEq)]
pub enum CookieError {
    #[error("`{0}` does not exist")]
    NotFound(String),
    #[error("Failed to deserialize `{0}` to type `{1}`")]
    Deserialization(String, String),
    #[error("An ambient document is already bound")]
    AmbientDocumentInstalled,
}

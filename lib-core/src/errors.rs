use std::io;

/// A result type used by all build operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error thrown while building a resource pack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A registry request finished with a non-success status.
    #[error("request for '{url}' returned {status}: {body}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The response body, decoded lossily.
        body: String,
    },
    /// A registry request failed before a response arrived.
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    /// A mod descriptor names a source this crate cannot fetch from.
    #[error("unsupported source type '{0}'")]
    UnknownSource(String),
    /// A version document lists no downloadable files.
    #[error("no downloadable files in version '{0}'")]
    NoVersionFiles(String),
    /// A modpack archive has a missing or unusable index document.
    #[error("invalid modpack index: {0}")]
    Index(String),
    /// An archive cannot be read as a ZIP file.
    #[error("archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// An image cannot be decoded or encoded.
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    /// A JSON document cannot be parsed.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    /// A color string cannot be resolved.
    #[error("invalid color: {0}")]
    Color(String),
    /// The pack metadata file is missing or has no usable version.
    #[error("pack metadata: {0}")]
    PackMeta(String),
    /// An underlying I/O operation failed.
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

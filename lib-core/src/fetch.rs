use std::io::Cursor;

use log::{info, warn};
use reqwest::{blocking::Client, header::AUTHORIZATION};
use serde::Deserialize;
use zip::{ZipArchive, result::ZipError};

use crate::{
    cfg::ModEntry,
    errors::{Error, Result},
};

/// Base URL of the Modrinth v2 API.
pub const MODRINTH_API: &str = "https://api.modrinth.com/v2";

/// Name of the index document inside a modpack archive.
pub const PACK_INDEX_NAME: &str = "modrinth.index.json";

const APP_USER_AGENT: &str = concat!("darkpack/", env!("CARGO_PKG_VERSION"));

/// A source of mod and modpack files.
///
/// The build driver only talks to this trait, so tests can substitute
/// an offline implementation.
pub trait Registry {
    /// Downloads the file of a single mod version.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor has an unsupported source
    /// type, a request fails, or the version lists no files.
    fn fetch_mod_file(&self, entry: &ModEntry) -> Result<Vec<u8>>;

    /// Downloads a modpack version and every mod its index references.
    /// One failed download fails the whole modpack.
    ///
    /// # Errors
    ///
    /// Returns an error if the descriptor has an unsupported source
    /// type, any request fails, or the index is absent or unusable.
    fn fetch_modpack_files(&self, entry: &ModEntry) -> Result<Vec<Vec<u8>>>;
}

/// A version document returned by the registry.
#[derive(Debug, Deserialize)]
pub struct Version {
    /// Downloadable files of this version.
    pub files: Vec<VersionFile>,
}

/// A downloadable file listed in a version document.
#[derive(Debug, Deserialize)]
pub struct VersionFile {
    /// Direct download URL.
    pub url: String,
    /// File name on the download server.
    pub filename: String,
    /// Marks the file the registry considers primary.
    #[serde(default)]
    pub primary: bool,
}

/// The index document inside a modpack archive.
#[derive(Debug, Deserialize)]
pub struct PackIndex {
    /// Files the modpack installs.
    pub files: Vec<PackIndexFile>,
}

/// A file entry of a modpack index.
#[derive(Debug, Deserialize)]
pub struct PackIndexFile {
    /// Install path inside a game directory.
    pub path: String,
    /// Mirror URLs, the first one is preferred.
    pub downloads: Vec<String>,
}

/// A blocking Modrinth API client.
pub struct ModrinthClient {
    http: Client,
    base: String,
    token: Option<String>,
}

impl ModrinthClient {
    /// Creates a client for the public Modrinth API. The token, when
    /// present, is sent as the `Authorization` header on every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base(MODRINTH_API, token)
    }

    /// Creates a client against a custom API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base(base: impl Into<String>, token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: Client::builder().user_agent(APP_USER_AGENT).build()?,
            base: base.into(),
            token,
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        info!("Fetching '{url}'");
        let mut req = self.http.get(url);
        if let Some(token) = &self.token {
            req = req.header(AUTHORIZATION, token.as_str());
        }
        let res = req.send()?;
        let status = res.status().as_u16();
        if !res.status().is_success() {
            let body = res.text().unwrap_or_default();
            warn!("InvalidRequest - '{url}' {status} {body}");
            return Err(Error::Fetch {
                url: url.to_string(),
                status,
                body,
            });
        }
        Ok(res.bytes()?.to_vec())
    }

    fn version(&self, entry: &ModEntry) -> Result<Version> {
        let url = format!(
            "{}/project/{}/version/{}",
            self.base, entry.project_id, entry.file_id
        );
        let raw = self.get_bytes(&url)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    fn version_file(&self, entry: &ModEntry) -> Result<VersionFile> {
        self.version(entry)?
            .files
            .into_iter()
            .next()
            .ok_or_else(|| Error::NoVersionFiles(entry.label().to_string()))
    }
}

impl Registry for ModrinthClient {
    fn fetch_mod_file(&self, entry: &ModEntry) -> Result<Vec<u8>> {
        if entry.kind != "modrinth" {
            warn!("InvalidModType - {entry:?}");
            return Err(Error::UnknownSource(entry.kind.clone()));
        }
        let file = self.version_file(entry)?;
        self.get_bytes(&file.url)
    }

    fn fetch_modpack_files(&self, entry: &ModEntry) -> Result<Vec<Vec<u8>>> {
        if entry.kind != "modrinth" {
            warn!("InvalidModPackType - {entry:?}");
            return Err(Error::UnknownSource(entry.kind.clone()));
        }
        let file = self.version_file(entry)?;
        let pack = self.get_bytes(&file.url)?;
        let index = read_pack_index(&pack)?;
        let mut mods = Vec::with_capacity(index.files.len());
        for f in &index.files {
            let url = f
                .downloads
                .first()
                .ok_or_else(|| Error::Index(format!("'{}' has no download urls", f.path)))?;
            mods.push(self.get_bytes(url)?);
        }
        Ok(mods)
    }
}

/// Extracts and parses the index document from modpack archive bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a ZIP archive, the index
/// document is absent, or it cannot be parsed.
pub fn read_pack_index(data: &[u8]) -> Result<PackIndex> {
    let mut za = ZipArchive::new(Cursor::new(data))?;
    let f = match za.by_name(PACK_INDEX_NAME) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => {
            return Err(Error::Index(format!("no {PACK_INDEX_NAME} in archive")));
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_reader(f)?)
}

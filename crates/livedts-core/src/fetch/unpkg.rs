//! unpkg.com source resolver.
//!
//! unpkg serves individual files of any npm package over plain HTTP, which
//! is exactly the granularity declaration resolution needs: no tarballs, no
//! packuments, one request per file.

use super::SourceResolver;
use crate::error::Error;
use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default unpkg base URL.
pub const UNPKG_BASE_URL: &str = "https://unpkg.com/";

/// Environment variable to override the base URL.
pub const UNPKG_ENV: &str = "LIVEDTS_UNPKG_URL";

/// Resolver that fetches declaration files from unpkg.
#[derive(Debug, Clone)]
pub struct UnpkgSourceResolver {
    base_url: Url,
    http: Client,
}

impl UnpkgSourceResolver {
    /// Create a resolver with the given base URL.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::registry(format!("Invalid base URL '{base_url}': {e}")))?;

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("livedts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::registry(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { base_url, http })
    }

    /// Create a resolver using the base URL from environment or default.
    ///
    /// # Errors
    /// Returns an error if the client cannot be created.
    pub fn from_env() -> Result<Self, Error> {
        let url = std::env::var(UNPKG_ENV).unwrap_or_else(|_| UNPKG_BASE_URL.to_string());
        Self::new(&url)
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the file URL: `<base>/<name>[@<version>]/<file>`.
    fn file_url(
        &self,
        package_name: &str,
        version: Option<&str>,
        file_path: &str,
    ) -> Result<Url, Error> {
        let versioned = match version {
            Some(version) => format!("{package_name}@{version}/{file_path}"),
            None => format!("{package_name}/{file_path}"),
        };
        self.base_url.join(&versioned).map_err(|e| {
            Error::registry(format!("Failed to build URL for '{versioned}': {e}"))
        })
    }
}

impl SourceResolver for UnpkgSourceResolver {
    fn resolve_source_file<'a>(
        &'a self,
        package_name: &'a str,
        version: Option<&'a str>,
        file_path: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, Error>> {
        Box::pin(async move {
            let url = self.file_url(package_name, version, file_path)?;

            let response =
                self.http
                    .get(url.as_str())
                    .send()
                    .await
                    .map_err(|source| Error::Fetch {
                        package_name: package_name.to_string(),
                        file_path: file_path.to_string(),
                        source,
                    })?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }

            if !response.status().is_success() {
                return Err(Error::FetchStatus {
                    package_name: package_name.to_string(),
                    file_path: file_path.to_string(),
                    status: response.status(),
                });
            }

            let content = response.text().await.map_err(|source| Error::Fetch {
                package_name: package_name.to_string(),
                file_path: file_path.to_string(),
                source,
            })?;
            Ok(Some(content))
        })
    }
}

use thiserror::Error;

/// Core error type for livedts operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Registry error: {0}")]
    Registry(String),

    #[error("Failed to fetch {file_path} from {package_name}: {source}")]
    Fetch {
        package_name: String,
        file_path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Registry returned status {status} for {package_name}/{file_path}")]
    FetchStatus {
        package_name: String,
        file_path: String,
        status: reqwest::StatusCode,
    },

    #[error("Invalid package.json for {package_name}: {source}")]
    Manifest {
        package_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cache IO error: {0}")]
    Cache(#[from] std::io::Error),

    /// Internal defect: classification re-enters through package-relative
    /// files, so a fully resolved `package` or `relative` value can never be
    /// the parent of another specifier.
    #[error(
        "Cannot classify import '{specifier}' against an already-resolved \
         '{parent_kind}' parent"
    )]
    InvalidParentContext {
        specifier: String,
        parent_kind: &'static str,
    },
}

impl Error {
    #[must_use]
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }
}

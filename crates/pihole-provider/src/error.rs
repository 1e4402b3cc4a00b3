use thiserror::Error;

/// Errors surfaced by resource handlers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The underlying API call failed.
    #[error("{resource}: {source}")]
    Api {
        resource: &'static str,
        #[source]
        source: pihole_api::Error,
    },

    /// An import id did not have the expected shape.
    #[error("invalid import id {id:?} for {resource}: expected {expected}")]
    InvalidImportId {
        resource: &'static str,
        id: String,
        expected: &'static str,
    },

    /// The remote object a handler had to find does not exist.
    #[error("{resource} {id:?} not found")]
    NotFound { resource: &'static str, id: String },
}

impl ProviderError {
    /// Adapter for `map_err` that tags an API error with its resource.
    pub(crate) fn api(resource: &'static str) -> impl FnOnce(pihole_api::Error) -> Self {
        move |source| Self::Api { resource, source }
    }

    pub(crate) fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// The API error underneath, if this came from a request.
    pub fn api_error(&self) -> Option<&pihole_api::Error> {
        match self {
            Self::Api { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Api { source, .. } => source.is_not_found(),
            Self::InvalidImportId { .. } => false,
        }
    }
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

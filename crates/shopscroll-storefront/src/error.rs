use shopscroll_paging::PagingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storefront GraphQL error: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("malformed storefront response: {reason}")]
    MalformedResponse { reason: String },

    #[error(transparent)]
    Paging(#[from] PagingError),

    #[error("pagination limit reached for {store}: exceeded {max_pages} pages")]
    PaginationLimit { store: String, max_pages: usize },

    #[error("invalid store domain \"{store_domain}\": {reason}")]
    InvalidStoreDomain {
        store_domain: String,
        reason: String,
    },
}

impl From<StorefrontError> for PagingError {
    /// Response-shape problems become terminal for the view; everything else
    /// is a fetch failure the view may retry.
    fn from(err: StorefrontError) -> Self {
        match err {
            StorefrontError::Paging(inner) => inner,
            StorefrontError::MalformedResponse { reason } => {
                PagingError::malformed("data", reason)
            }
            StorefrontError::Deserialize { context, source } => {
                PagingError::malformed(context, source.to_string())
            }
            other => {
                let retriable = crate::rate_limit::is_retriable(&other);
                PagingError::fetch(other, retriable)
            }
        }
    }
}

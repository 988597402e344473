use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("request body does not match the route shape: {0}")]
    Body(#[source] serde_json::Error),

    #[error("path parameters do not match the route shape: {0}")]
    Params(#[source] serde_json::Error),

    #[error("query string does not match the route shape: {0}")]
    Query(#[source] serde_json::Error),
}

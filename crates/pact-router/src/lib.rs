pub mod chain;
pub mod contract;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod router;

#[cfg(test)]
mod test_api;

pub use chain::{Chain, flatten};
pub use contract::{Contract, Delete, Endpoint, Get, Head, Method, Options, Patch, Post, Put, ResponseOf, RoutePath, RouteShape, ShapeOf};
pub use endpoint::{HandlerFuture, TypedEndpoint};
pub use error::ExtractError;
pub use request::TypedRequest;
pub use router::TypedRouter;

pub use pact_http::{BoxError, BoxedMiddleware, HttpError, HttpMethod, Next};
pub use serde::de::IgnoredAny;

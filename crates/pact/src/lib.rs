pub use pact_http;
pub use pact_router;

#[cfg(feature = "memory")]
pub use pact_http::memory;

pub mod prelude {
    pub use pact_config::{Config, ConfigError};
    pub use pact_http::{
        BoxError, BoxFuture, BoxedMiddleware, HostRequest, HostResponse, HostRouter, HttpError, HttpMethod, Middleware, Next, Params, from_fn,
    };
    pub use pact_logging::{LogFormat, LoggingError, LoggingOptions, init_logger};
    pub use pact_router::{
        Chain, Contract, Delete, Endpoint, ExtractError, Get, Head, Options, Patch, Post, Put, RoutePath, RouteShape, TypedRequest, TypedRouter,
    };
}

pub use pact_macros::route_shape;
pub use pact_router::api_contract;

mod error;
mod host;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
mod method;
mod middleware;
mod next;

pub use error::{BoxError, HttpError, MethodError};
pub use host::{HostRequest, HostResponse, HostRouter, Params};
pub use method::HttpMethod;
pub use middleware::{BoxFuture, BoxedMiddleware, Middleware, from_fn};
pub use next::Next;

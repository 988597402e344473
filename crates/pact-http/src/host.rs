use std::collections::BTreeMap;

use super::{BoxFuture, BoxedMiddleware, HttpMethod, Next};
use serde_json::Value;

pub type Params = BTreeMap<String, String>;

/// Read access a host framework gives to its native request object.
pub trait HostRequest: Send + Sync {
    fn body(&self) -> &Value;
    fn params(&self) -> &Params;
    fn query(&self) -> &Params;
}

/// Write access a host framework gives to its native response object.
pub trait HostResponse: Send {
    /// Whether a response has already been written on this exchange.
    fn headers_sent(&self) -> bool;
    fn send(&mut self, body: Value);
}

/// The capability set of a host router or application.
///
/// Implementations own their route table and decide matching, ordering and error
/// presentation. Callers only append to it through [`HostRouter::register`] and
/// [`HostRouter::use_middleware`].
pub trait HostRouter: Send + Sync + 'static {
    type Request: HostRequest + 'static;
    type Response: HostResponse + 'static;

    fn register(
        &mut self,
        method: HttpMethod,
        path: &str,
        handlers: Vec<BoxedMiddleware<Self::Request, Self::Response>>,
    );

    fn use_middleware(&mut self, handler: BoxedMiddleware<Self::Request, Self::Response>);

    /// Runs this router as a single middleware step of an enclosing chain.
    fn handle<'a>(
        &'a self,
        req: &'a mut Self::Request,
        res: &'a mut Self::Response,
        next: Next,
    ) -> BoxFuture<'a, ()>;
}

use std::{marker::PhantomData, sync::Arc};

use super::{Chain, Contract, Endpoint, HandlerFuture, Method, ShapeOf, TypedEndpoint, TypedRequest, flatten};
use super::{Delete, Get, Head, Options, Patch, Post, Put};
use pact_http::{BoxFuture, BoxedMiddleware, HostRouter, Middleware, Next};
use tracing::debug;

type Middlewares<H> = Vec<Chain<<H as HostRouter>::Request, <H as HostRouter>::Response>>;

/// Contract-checked registration surface over an injected host router.
///
/// The host keeps sole ownership of its route table; every registration call appends exactly
/// one handler chain to it, in call order.
pub struct TypedRouter<Api, H> {
    host: H,
    contract: PhantomData<fn() -> Api>,
}

macro_rules! method_route {
    ($name:ident, $marker:ident) => {
        pub fn $name<P, F>(&mut self, path: P, handler: F, middlewares: Middlewares<H>)
        where
            P: Endpoint<Api, $marker>,
            F: for<'a> Fn(
                    TypedRequest<'a, ShapeOf<Api, P, $marker>, H::Request>,
                    &'a mut H::Response,
                ) -> HandlerFuture<'a, ShapeOf<Api, P, $marker>>
                + Send
                + Sync
                + 'static,
        {
            self.route(path, $marker, handler, middlewares)
        }
    };
}

impl<Api, H> TypedRouter<Api, H>
where
    Api: Contract,
    H: HostRouter,
{
    pub fn new(host: H) -> Self {
        Self {
            host,
            contract: PhantomData,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_inner(self) -> H {
        self.host
    }

    /// Attaches host-level middleware with no contract narrowing.
    pub fn use_middleware(&mut self, handler: BoxedMiddleware<H::Request, H::Response>) {
        self.host.use_middleware(handler);
    }

    /// Registers `handler` for `path` and `method`, running `middlewares` (flattened) first.
    pub fn route<P, M, F>(&mut self, _path: P, _method: M, handler: F, middlewares: Middlewares<H>)
    where
        P: Endpoint<Api, M>,
        M: Method,
        F: for<'a> Fn(TypedRequest<'a, ShapeOf<Api, P, M>, H::Request>, &'a mut H::Response) -> HandlerFuture<'a, ShapeOf<Api, P, M>>
            + Send
            + Sync
            + 'static,
    {
        let mut handlers: Vec<BoxedMiddleware<H::Request, H::Response>> = flatten(middlewares);
        handlers.push(Arc::new(TypedEndpoint::<ShapeOf<Api, P, M>, H::Request, H::Response, F>::new(handler)));

        debug!(method = %M::METHOD, path = P::PATH, handlers = handlers.len(), "registering typed route");
        self.host.register(M::METHOD, P::PATH, handlers);
    }

    method_route!(get, Get);
    method_route!(post, Post);
    method_route!(put, Put);
    method_route!(patch, Patch);
    method_route!(delete, Delete);
    method_route!(options, Options);
    method_route!(head, Head);
}

impl<Api, H> Middleware<H::Request, H::Response> for TypedRouter<Api, H>
where
    Api: Contract,
    H: HostRouter,
{
    fn call<'a>(&'a self, req: &'a mut H::Request, res: &'a mut H::Response, next: Next) -> BoxFuture<'a, ()> {
        self.host.handle(req, res, next)
    }
}

use std::{future::Future, pin::Pin, sync::Arc};

use super::Next;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
pub type BoxedMiddleware<Req, Res> = Arc<dyn Middleware<Req, Res>>;

/// A native three-argument handler: request, response, continuation.
pub trait Middleware<Req, Res>: Send + Sync + 'static {
    fn call<'a>(&'a self, req: &'a mut Req, res: &'a mut Res, next: Next) -> BoxFuture<'a, ()>;
}

struct MiddlewareFn<F>(F);

impl<Req, Res, F> Middleware<Req, Res> for MiddlewareFn<F>
where
    Req: 'static,
    Res: 'static,
    F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Req, res: &'a mut Res, next: Next) -> BoxFuture<'a, ()> {
        (self.0)(req, res, next)
    }
}

pub fn from_fn<Req, Res, F>(f: F) -> BoxedMiddleware<Req, Res>
where
    Req: 'static,
    Res: 'static,
    F: for<'a> Fn(&'a mut Req, &'a mut Res, Next) -> BoxFuture<'a, ()> + Send + Sync + 'static,
{
    Arc::new(MiddlewareFn(f))
}

use std::marker::PhantomData;

use super::{ResponseOf, RouteShape, TypedRequest};
use pact_http::{BoxError, BoxFuture, HostRequest, HostResponse, Middleware, Next};
use serde::Serialize;
use tracing::debug;

pub type HandlerFuture<'a, S> = BoxFuture<'a, Result<ResponseOf<S>, BoxError>>;

/// Adapts a typed, value-returning handler into the host's native handler shape.
///
/// A resolved value is sent as the response body unless a response already went out. A failure
/// goes to `next` untouched and nothing is sent.
pub struct TypedEndpoint<S, Req, Res, F> {
    handler: F,
    marker: PhantomData<fn() -> (S, Req, Res)>,
}

impl<S, Req, Res, F> TypedEndpoint<S, Req, Res, F>
where
    S: RouteShape,
    Req: HostRequest + 'static,
    Res: HostResponse + 'static,
    F: for<'a> Fn(TypedRequest<'a, S, Req>, &'a mut Res) -> HandlerFuture<'a, S> + Send + Sync + 'static,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            marker: PhantomData,
        }
    }
}

impl<S, Req, Res, F> Middleware<Req, Res> for TypedEndpoint<S, Req, Res, F>
where
    S: RouteShape,
    Req: HostRequest + 'static,
    Res: HostResponse + 'static,
    F: for<'a> Fn(TypedRequest<'a, S, Req>, &'a mut Res) -> HandlerFuture<'a, S> + Send + Sync + 'static,
{
    fn call<'a>(&'a self, req: &'a mut Req, res: &'a mut Res, next: Next) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let result: Result<ResponseOf<S>, BoxError> = (self.handler)(TypedRequest::new(&*req), &mut *res).await;

            match result {
                Ok(value) => respond(value, res, next),
                Err(err) => next.fail(err),
            }
        })
    }
}

fn respond<T, Res>(value: T, res: &mut Res, next: Next)
where
    T: Serialize,
    Res: HostResponse,
{
    if res.headers_sent() {
        debug!("response already sent by handler, discarding resolved value");
        return;
    }

    match serde_json::to_value(&value) {
        Ok(body) => res.send(body),
        Err(err) => next.fail(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IgnoredAny;
    use crate::test_api::{GetUser, User};
    use pact_http::HttpError;
    use pact_http::memory::{MemoryRequest, MemoryResponse};
    use pact_http::HttpMethod;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct TupleKeyed;

    impl RouteShape for TupleKeyed {
        type Body = IgnoredAny;
        type Params = IgnoredAny;
        type Query = IgnoredAny;
        type Response = HashMap<(u8, u8), u8>;
    }

    type Calls = Arc<Mutex<Vec<Option<String>>>>;

    fn counting_next(calls: &Calls) -> Next {
        let calls: Calls = calls.clone();
        Next::new(move |err: Option<BoxError>| {
            calls.lock().unwrap().push(err.map(|e: BoxError| e.to_string()));
        })
    }

    fn request() -> MemoryRequest {
        let mut request: MemoryRequest = MemoryRequest::new(HttpMethod::GET, "/users/1");
        request.params.insert("id".into(), "1".into());
        request
    }

    #[tokio::test]
    async fn test_resolved_value_is_sent_once() {
        let endpoint = TypedEndpoint::<GetUser, MemoryRequest, MemoryResponse, _>::new(
            |req, _res| {
                Box::pin(async move {
                    let params = req.params()?;
                    Ok(User {
                        id: params.id,
                        name: "A".into(),
                    })
                })
            },
        );

        let calls: Calls = Calls::default();
        let mut req: MemoryRequest = request();
        let mut res: MemoryResponse = MemoryResponse::new();

        endpoint.call(&mut req, &mut res, counting_next(&calls)).await;

        assert_eq!(res.send_calls(), 1);
        assert_eq!(res.body(), Some(&json!({ "id": "1", "name": "A" })));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_value_is_discarded_when_headers_already_sent() {
        let endpoint = TypedEndpoint::<GetUser, MemoryRequest, MemoryResponse, _>::new(
            |_req, res| {
                Box::pin(async move {
                    res.send(json!("written by hand"));
                    Ok(User {
                        id: "ignored".into(),
                        name: "ignored".into(),
                    })
                })
            },
        );

        let calls: Calls = Calls::default();
        let mut req: MemoryRequest = request();
        let mut res: MemoryResponse = MemoryResponse::new();

        endpoint.call(&mut req, &mut res, counting_next(&calls)).await;

        assert_eq!(res.send_calls(), 1);
        assert_eq!(res.body(), Some(&Value::from("written by hand")));
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_goes_to_next_once_without_sending() {
        let endpoint = TypedEndpoint::<GetUser, MemoryRequest, MemoryResponse, _>::new(
            |_req, _res| {
                Box::pin(async move { Err(BoxError::from(HttpError::new(503, "database offline"))) })
            },
        );

        let calls: Calls = Calls::default();
        let mut req: MemoryRequest = request();
        let mut res: MemoryResponse = MemoryResponse::new();

        endpoint.call(&mut req, &mut res, counting_next(&calls)).await;

        assert_eq!(res.send_calls(), 0);
        assert!(!res.headers_sent());
        assert_eq!(*calls.lock().unwrap(), vec![Some("[503] database offline".to_owned())]);
    }

    #[tokio::test]
    async fn test_decode_failure_is_a_handler_failure() {
        let endpoint = TypedEndpoint::<GetUser, MemoryRequest, MemoryResponse, _>::new(
            |req, _res| {
                Box::pin(async move {
                    let params = req.params()?;
                    Ok(User {
                        id: params.id,
                        name: "A".into(),
                    })
                })
            },
        );

        let calls: Calls = Calls::default();
        let mut req: MemoryRequest = MemoryRequest::new(HttpMethod::GET, "/users");
        let mut res: MemoryResponse = MemoryResponse::new();

        endpoint.call(&mut req, &mut res, counting_next(&calls)).await;

        assert_eq!(res.send_calls(), 0);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unserializable_value_goes_to_next_without_sending() {
        let endpoint = TypedEndpoint::<TupleKeyed, MemoryRequest, MemoryResponse, _>::new(|_req, _res| {
            Box::pin(async move { Ok(HashMap::from([((1, 2), 3)])) })
        });

        let calls: Calls = Calls::default();
        let mut req: MemoryRequest = request();
        let mut res: MemoryResponse = MemoryResponse::new();

        endpoint.call(&mut req, &mut res, counting_next(&calls)).await;

        let calls: Vec<Option<String>> = calls.lock().unwrap().clone();

        assert_eq!(res.send_calls(), 0);
        assert!(!res.headers_sent());
        assert_eq!(calls.len(), 1);
        assert!(calls[0].as_deref().is_some_and(|e: &str| e.contains("key must be a string")));
    }
}

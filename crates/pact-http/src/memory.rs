//! An in-process host router.
//!
//! `MemoryApp` implements [`HostRouter`] without any network layer: requests are plain
//! values handed to [`MemoryApp::dispatch`]. Layers run in the order they were added,
//! global middleware and routes interleaved, the same way an express-style stack does.

use serde_json::{Value, json};
use tokio::sync::oneshot;
use tracing::trace;

use super::{BoxError, BoxFuture, BoxedMiddleware, HostRequest, HostResponse, HostRouter, HttpError, HttpMethod, Next, Params};

const PATH_SEPARATOR: char = '/';
const PARAM_PREFIX: char = ':';

type Handler = BoxedMiddleware<MemoryRequest, MemoryResponse>;

#[derive(Debug, Clone)]
pub struct MemoryRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Value,
    pub params: Params,
    pub query: Params,
}

impl MemoryRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: Value::Null,
            params: Params::new(),
            query: Params::new(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

impl HostRequest for MemoryRequest {
    fn body(&self) -> &Value {
        &self.body
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn query(&self) -> &Params {
        &self.query
    }
}

#[derive(Debug)]
pub struct MemoryResponse {
    status: u16,
    body: Option<Value>,
    headers_sent: bool,
    send_calls: usize,
}

impl Default for MemoryResponse {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResponse {
    pub fn new() -> Self {
        Self {
            status: 200,
            body: None,
            headers_sent: false,
            send_calls: 0,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn set_status(&mut self, status: u16) {
        if !self.headers_sent {
            self.status = status;
        }
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Every call to `send`, including ones ignored because headers were already sent.
    pub fn send_calls(&self) -> usize {
        self.send_calls
    }
}

impl HostResponse for MemoryResponse {
    fn headers_sent(&self) -> bool {
        self.headers_sent
    }

    fn send(&mut self, body: Value) {
        self.send_calls += 1;

        if self.headers_sent {
            trace!(status = self.status, "response already sent, ignoring body");
            return;
        }

        self.body = Some(body);
        self.headers_sent = true;
    }
}

struct Layer {
    route: Option<(HttpMethod, String)>,
    handlers: Vec<Handler>,
}

/// One `register` call as the app recorded it.
pub struct Registration<'a> {
    pub method: HttpMethod,
    pub path: &'a str,
    pub handlers: &'a [Handler],
}

enum Outcome {
    Proceed,
    Handled,
    Failed(BoxError),
}

#[derive(Default)]
pub struct MemoryApp {
    layers: Vec<Layer>,
}

impl MemoryApp {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn registrations(&self) -> impl Iterator<Item = Registration<'_>> {
        self.layers.iter().filter_map(|layer: &Layer| {
            let (method, path) = layer.route.as_ref()?;
            Some(Registration {
                method: *method,
                path,
                handlers: &layer.handlers,
            })
        })
    }

    pub async fn dispatch(&self, mut request: MemoryRequest) -> MemoryResponse {
        let mut response: MemoryResponse = MemoryResponse::new();
        trace!(method = %request.method, path = %request.path, "dispatching request");

        match self.run_stack(&mut request, &mut response).await {
            Outcome::Handled => {}
            Outcome::Proceed => {
                if !response.headers_sent() {
                    response.set_status(404);
                    response.send(json!({ "error": "Not Found" }));
                }
            }
            Outcome::Failed(err) => Self::report(err, &mut response),
        }

        response
    }

    fn report(err: BoxError, response: &mut MemoryResponse) {
        if response.headers_sent() {
            trace!(error = %err, "failure after response was sent");
            return;
        }

        let status: u16 = err.downcast_ref::<HttpError>().map(|e: &HttpError| e.status).unwrap_or(500);
        response.set_status(status);
        response.send(json!({ "error": err.to_string() }));
    }

    async fn run_stack(&self, request: &mut MemoryRequest, response: &mut MemoryResponse) -> Outcome {
        for layer in &self.layers {
            if let Some((method, pattern)) = &layer.route {
                if *method != request.method {
                    continue;
                }

                let Some(params) = match_path(pattern, &request.path) else {
                    continue;
                };

                request.params = params;
            }

            for handler in &layer.handlers {
                match Self::run_handler(handler, request, response).await {
                    Outcome::Proceed => continue,
                    outcome => return outcome,
                }
            }
        }

        Outcome::Proceed
    }

    async fn run_handler(handler: &Handler, request: &mut MemoryRequest, response: &mut MemoryResponse) -> Outcome {
        let (sender, mut receiver) = oneshot::channel::<Option<BoxError>>();
        let next: Next = Next::new(move |err: Option<BoxError>| {
            let _ = sender.send(err);
        });

        handler.call(request, response, next).await;

        match receiver.try_recv() {
            Ok(None) => Outcome::Proceed,
            Ok(Some(err)) => Outcome::Failed(err),
            Err(_) => Outcome::Handled,
        }
    }
}

impl HostRouter for MemoryApp {
    type Request = MemoryRequest;
    type Response = MemoryResponse;

    fn register(&mut self, method: HttpMethod, path: &str, handlers: Vec<Handler>) {
        trace!(%method, path, handlers = handlers.len(), "route layer added");
        self.layers.push(Layer {
            route: Some((method, path.to_owned())),
            handlers,
        });
    }

    fn use_middleware(&mut self, handler: Handler) {
        self.layers.push(Layer {
            route: None,
            handlers: vec![handler],
        });
    }

    fn handle<'a>(&'a self, req: &'a mut MemoryRequest, res: &'a mut MemoryResponse, next: Next) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            match self.run_stack(req, res).await {
                Outcome::Proceed => next.proceed(),
                Outcome::Failed(err) => next.fail(err),
                Outcome::Handled => {}
            }
        })
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(PATH_SEPARATOR).filter(|s: &&str| !s.is_empty())
}

fn match_path(pattern: &str, path: &str) -> Option<Params> {
    let mut params: Params = Params::new();
    let mut expected = segments(pattern);
    let mut actual = segments(path);

    loop {
        match (expected.next(), actual.next()) {
            (None, None) => return Some(params),
            (Some(segment), Some(value)) => match segment.strip_prefix(PARAM_PREFIX) {
                Some(name) => {
                    params.insert(name.to_owned(), value.to_owned());
                }
                None if segment == value => {}
                None => return None,
            },
            _ => return None,
        }
    }
}

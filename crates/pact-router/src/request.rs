use std::{marker::PhantomData, ops::Deref};

use super::{ExtractError, RouteShape};
use pact_http::{HostRequest, Params};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A host request viewed through the shape of the route it was registered for.
///
/// Fields are decoded only when asked for, so a handler that never reads the body never pays
/// for (or fails on) decoding it. Everything else on the host request stays reachable through
/// `Deref`.
pub struct TypedRequest<'a, S, Req> {
    inner: &'a Req,
    shape: PhantomData<fn() -> S>,
}

impl<'a, S, Req> TypedRequest<'a, S, Req>
where
    S: RouteShape,
    Req: HostRequest,
{
    pub fn new(inner: &'a Req) -> Self {
        Self {
            inner,
            shape: PhantomData,
        }
    }

    pub fn inner(&self) -> &'a Req {
        self.inner
    }

    pub fn body(&self) -> Result<S::Body, ExtractError> {
        S::Body::deserialize(self.inner.body()).map_err(ExtractError::Body)
    }

    pub fn params(&self) -> Result<S::Params, ExtractError> {
        decode_map(self.inner.params()).map_err(ExtractError::Params)
    }

    pub fn query(&self) -> Result<S::Query, ExtractError> {
        decode_map(self.inner.query()).map_err(ExtractError::Query)
    }
}

impl<S, Req> Deref for TypedRequest<'_, S, Req> {
    type Target = Req;

    fn deref(&self) -> &Req {
        self.inner
    }
}

fn decode_map<T>(map: &Params) -> Result<T, serde_json::Error>
where
    T: DeserializeOwned,
{
    let object: Map<String, Value> = map
        .iter()
        .map(|(key, value): (&String, &String)| (key.clone(), Value::String(value.clone())))
        .collect();

    T::deserialize(Value::Object(object))
}

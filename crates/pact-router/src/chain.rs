use std::vec;

use pact_http::BoxedMiddleware;

/// One middleware argument: a single handler or an ordered group of them.
pub enum Chain<Req, Res> {
    Single(BoxedMiddleware<Req, Res>),
    Many(Vec<BoxedMiddleware<Req, Res>>),
}

impl<Req, Res> From<BoxedMiddleware<Req, Res>> for Chain<Req, Res> {
    fn from(handler: BoxedMiddleware<Req, Res>) -> Self {
        Chain::Single(handler)
    }
}

impl<Req, Res> From<Vec<BoxedMiddleware<Req, Res>>> for Chain<Req, Res> {
    fn from(handlers: Vec<BoxedMiddleware<Req, Res>>) -> Self {
        Chain::Many(handlers)
    }
}

impl<Req, Res> IntoIterator for Chain<Req, Res> {
    type Item = BoxedMiddleware<Req, Res>;
    type IntoIter = vec::IntoIter<BoxedMiddleware<Req, Res>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Chain::Single(handler) => vec![handler].into_iter(),
            Chain::Many(handlers) => handlers.into_iter(),
        }
    }
}

/// Expands every group in place, keeping the relative order of all handlers.
pub fn flatten<Req, Res, I>(chains: I) -> Vec<BoxedMiddleware<Req, Res>>
where
    I: IntoIterator<Item = Chain<Req, Res>>,
{
    chains.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pact_http::memory::{MemoryRequest, MemoryResponse};
    use pact_http::{Next, from_fn};
    use std::sync::Arc;

    type Handler = BoxedMiddleware<MemoryRequest, MemoryResponse>;

    fn handler() -> Handler {
        from_fn(|_req: &mut MemoryRequest, _res: &mut MemoryResponse, next: Next| {
            Box::pin(async move { next.proceed() })
        })
    }

    fn same_order(actual: &[Handler], expected: &[&Handler]) -> bool {
        actual.len() == expected.len()
            && actual
                .iter()
                .zip(expected)
                .all(|(a, b): (&Handler, &&Handler)| Arc::ptr_eq(a, b))
    }

    #[test]
    fn test_flatten_expands_groups_in_place() {
        let (a, b, c, d, e): (Handler, Handler, Handler, Handler, Handler) =
            (handler(), handler(), handler(), handler(), handler());

        let flat: Vec<Handler> = flatten(vec![
            Chain::from(a.clone()),
            Chain::from(vec![b.clone(), c.clone()]),
            Chain::from(d.clone()),
            Chain::from(vec![e.clone()]),
        ]);

        assert!(same_order(&flat, &[&a, &b, &c, &d, &e]));
    }

    #[test]
    fn test_flatten_drops_empty_groups() {
        let a: Handler = handler();

        let flat: Vec<Handler> = flatten(vec![Chain::Many(Vec::new()), Chain::Single(a.clone()), Chain::Many(Vec::new())]);

        assert!(same_order(&flat, &[&a]));
    }

    #[test]
    fn test_flatten_of_nothing_is_empty() {
        let flat: Vec<Handler> = flatten(Vec::<Chain<MemoryRequest, MemoryResponse>>::new());
        assert!(flat.is_empty());
    }
}

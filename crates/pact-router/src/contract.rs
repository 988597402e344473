//! Compile-time API contracts.
//!
//! A contract is a marker type. Route paths are zero-sized key types, and a path belongs to a
//! contract for a given method when it implements [`Endpoint`] for that pair. None of this
//! exists at runtime beyond the path string and the method.

use pact_http::HttpMethod;
use serde::{Serialize, de::DeserializeOwned};

pub trait Contract: 'static {}

/// Expected request and response shapes of one path/method pair.
pub trait RouteShape: 'static {
    type Body: DeserializeOwned;
    type Params: DeserializeOwned;
    type Query: DeserializeOwned;
    type Response: Serialize + Send;
}

pub trait RoutePath: Copy + Send + Sync + 'static {
    const PATH: &'static str;
}

pub trait Method: Copy + Send + Sync + 'static {
    const METHOD: HttpMethod;
}

pub trait Endpoint<Api, M>: RoutePath
where
    Api: Contract,
    M: Method,
{
    type Shape: RouteShape;
}

pub type ShapeOf<Api, P, M> = <P as Endpoint<Api, M>>::Shape;
pub type ResponseOf<S> = <S as RouteShape>::Response;

macro_rules! method_marker {
    ($($marker:ident => $method:ident),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $marker;

            impl Method for $marker {
                const METHOD: HttpMethod = HttpMethod::$method;
            }
        )*
    };
}

method_marker! {
    Get => GET,
    Post => POST,
    Put => PUT,
    Patch => PATCH,
    Delete => DELETE,
    Options => OPTIONS,
    Head => HEAD,
}

/// Declares a contract, its route path keys and the shape of every path/method pair.
///
/// ```ignore
/// api_contract! {
///     pub UserApi {
///         UserById = "/users/:id" { Get => GetUser, Delete => DeleteUser }
///         Users = "/users" { Post => CreateUser }
///     }
/// }
/// ```
#[macro_export]
macro_rules! api_contract {
    (
        $(#[$meta:meta])*
        $vis:vis $api:ident {
            $(
                $(#[$path_meta:meta])*
                $path_ty:ident = $path:literal {
                    $($method:ident => $shape:ty),* $(,)?
                }
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $api;

        impl $crate::Contract for $api {}

        $(
            $(#[$path_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            $vis struct $path_ty;

            impl $crate::RoutePath for $path_ty {
                const PATH: &'static str = $path;
            }

            $(
                impl $crate::Endpoint<$api, $crate::$method> for $path_ty {
                    type Shape = $shape;
                }
            )*
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_api::{CreateUser, GetUser, UserApi, UserById, Users};
    use std::any::TypeId;

    fn shape_id<P, M>() -> TypeId
    where
        P: Endpoint<UserApi, M>,
        M: Method,
    {
        TypeId::of::<ShapeOf<UserApi, P, M>>()
    }

    #[test]
    fn test_contract_paths_keep_their_literal() {
        assert_eq!(UserById::PATH, "/users/:id");
        assert_eq!(Users::PATH, "/users");
    }

    #[test]
    fn test_method_markers_map_to_http_methods() {
        assert_eq!(Get::METHOD, HttpMethod::GET);
        assert_eq!(Post::METHOD, HttpMethod::POST);
        assert_eq!(Put::METHOD, HttpMethod::PUT);
        assert_eq!(Patch::METHOD, HttpMethod::PATCH);
        assert_eq!(Delete::METHOD, HttpMethod::DELETE);
        assert_eq!(Options::METHOD, HttpMethod::OPTIONS);
        assert_eq!(Head::METHOD, HttpMethod::HEAD);
    }

    #[test]
    fn test_endpoint_resolves_declared_shape() {
        assert_eq!(shape_id::<UserById, Get>(), TypeId::of::<GetUser>());
        assert_eq!(shape_id::<Users, Post>(), TypeId::of::<CreateUser>());
    }
}

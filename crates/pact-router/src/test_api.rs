use pact_macros::route_shape;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Search {
    pub name: Option<String>,
}

#[route_shape(params = UserParams, response = User)]
pub struct GetUser;

#[route_shape(params = UserParams, body = NewUser, response = User)]
pub struct ReplaceUser;

#[route_shape(params = UserParams, body = NewUser, response = User)]
pub struct RenameUser;

#[route_shape(params = UserParams)]
pub struct DeleteUser;

#[route_shape(query = Search, response = Vec<User>)]
pub struct ListUsers;

#[route_shape(body = NewUser, response = User)]
pub struct CreateUser;

#[route_shape(response = Vec<&'static str>)]
pub struct AllowedMethods;

#[route_shape]
pub struct Probe;

crate::api_contract! {
    pub UserApi {
        UserById = "/users/:id" {
            Get => GetUser,
            Put => ReplaceUser,
            Patch => RenameUser,
            Delete => DeleteUser,
        }
        Users = "/users" {
            Get => ListUsers,
            Post => CreateUser,
            Options => AllowedMethods,
            Head => Probe,
        }
    }
}

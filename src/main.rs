use std::sync::{Arc, Mutex, MutexGuard};

use mimalloc::MiMalloc;
use pact::memory::{MemoryApp, MemoryRequest, MemoryResponse};
use pact::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct User {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct UserParams {
    id: String,
}

#[derive(Deserialize)]
struct NewUser {
    name: String,
}

#[derive(Deserialize)]
struct Search {
    name: Option<String>,
}

#[pact::route_shape(params = UserParams, response = User)]
struct GetUser;

#[pact::route_shape(body = NewUser, response = User)]
struct CreateUser;

#[pact::route_shape(query = Search, response = Vec<User>)]
struct ListUsers;

pact::api_contract! {
    UserApi {
        UserById = "/users/:id" {
            Get => GetUser,
        }
        Users = "/users" {
            Get => ListUsers,
            Post => CreateUser,
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct AppConfig {
    logging: LoggingOptions,
    seed: Vec<String>,
}

type Store = Arc<Mutex<Vec<User>>>;
type UsersRouter = TypedRouter<UserApi, MemoryApp>;

#[tokio::main]
async fn main() {
    let config: AppConfig = load_config();

    if let Err(e) = init_logger(&config.logging) {
        eprintln!("logger not installed: {e}");
    }

    let store: Store = Arc::new(Mutex::new(Vec::new()));
    for name in config.seed {
        insert_user(&store, name).expect("failed to seed user store");
    }

    let mut app: MemoryApp = MemoryApp::new();
    app.use_middleware(access_log());
    app.use_middleware(Arc::new(users_router(&store)));

    let requests: Vec<MemoryRequest> = vec![
        MemoryRequest::new(HttpMethod::POST, "/users").with_body(json!({ "name": "  Ada " })),
        MemoryRequest::new(HttpMethod::POST, "/users").with_body(json!({ "nickname": "Bob" })),
        MemoryRequest::new(HttpMethod::GET, "/users/1"),
        MemoryRequest::new(HttpMethod::GET, "/users/99"),
        MemoryRequest::new(HttpMethod::GET, "/users").with_query("name", "ad"),
        MemoryRequest::new(HttpMethod::DELETE, "/users/1"),
    ];

    for request in requests {
        let (method, path): (HttpMethod, String) = (request.method, request.path.clone());
        let response: MemoryResponse = app.dispatch(request).await;
        let body: Value = response.body().cloned().unwrap_or_default();

        info!(%method, %path, status = response.status(), %body, "request completed");
    }
}

fn load_config() -> AppConfig {
    match Config::from_env::<String>("PACT_CONFIG") {
        Ok(path) => Config::from_file(path).expect("failed to load config file"),
        Err(_) => AppConfig {
            logging: LoggingOptions::from_env().expect("invalid logging environment"),
            seed: Vec::new(),
        },
    }
}

fn users_router(store: &Store) -> UsersRouter {
    let mut router: UsersRouter = TypedRouter::new(MemoryApp::new());

    let by_id: Store = store.clone();
    router.get(
        UserById,
        move |req, _res| {
            let store: Store = by_id.clone();
            Box::pin(async move {
                let params: UserParams = req.params()?;
                let users: MutexGuard<Vec<User>> = lock(&store)?;

                users
                    .iter()
                    .find(|user: &&User| user.id == params.id)
                    .cloned()
                    .ok_or_else(|| BoxError::from(HttpError::not_found(format!("user {} does not exist", params.id))))
            })
        },
        vec![],
    );

    let listing: Store = store.clone();
    router.get(
        Users,
        move |req, _res| {
            let store: Store = listing.clone();
            Box::pin(async move {
                let search: Search = req.query()?;
                let needle: String = search.name.unwrap_or_default().to_lowercase();
                let users: MutexGuard<Vec<User>> = lock(&store)?;

                let found: Vec<User> = users
                    .iter()
                    .filter(|user: &&User| user.name.to_lowercase().contains(&needle))
                    .cloned()
                    .collect();

                Ok(found)
            })
        },
        vec![],
    );

    let creating: Store = store.clone();
    router.post(
        Users,
        move |req, _res| {
            let store: Store = creating.clone();
            Box::pin(async move {
                let body: NewUser = req.body()?;
                insert_user(&store, body.name)
            })
        },
        vec![vec![require_field("name"), trim_name()].into()],
    );

    router
}

fn lock(store: &Store) -> Result<MutexGuard<'_, Vec<User>>, HttpError> {
    store.lock().map_err(|_| HttpError::new(500, "user store poisoned"))
}

fn insert_user(store: &Store, name: String) -> Result<User, BoxError> {
    let mut users: MutexGuard<Vec<User>> = lock(store)?;
    let user: User = User {
        id: (users.len() + 1).to_string(),
        name,
    };

    users.push(user.clone());
    Ok(user)
}

fn access_log() -> BoxedMiddleware<MemoryRequest, MemoryResponse> {
    from_fn(|req: &mut MemoryRequest, _res: &mut MemoryResponse, next: Next| {
        Box::pin(async move {
            info!(method = %req.method, path = %req.path, "incoming request");
            next.proceed();
        })
    })
}

fn require_field(field: &'static str) -> BoxedMiddleware<MemoryRequest, MemoryResponse> {
    from_fn(move |req: &mut MemoryRequest, _res: &mut MemoryResponse, next: Next| {
        Box::pin(async move {
            match req.body.get(field) {
                Some(_) => next.proceed(),
                None => next.fail(HttpError::bad_request(format!("missing field \"{field}\""))),
            }
        })
    })
}

fn trim_name() -> BoxedMiddleware<MemoryRequest, MemoryResponse> {
    from_fn(|req: &mut MemoryRequest, _res: &mut MemoryResponse, next: Next| {
        Box::pin(async move {
            if let Some(Value::String(name)) = req.body.get_mut("name") {
                *name = name.trim().to_owned();
            }
            next.proceed();
        })
    })
}

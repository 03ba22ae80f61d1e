//! Shared test infrastructure for the web integration tests.
//!
//! Each test gets its own migrated in-memory database and in-memory session
//! store, and drives the router with `oneshot`.

#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use std::sync::Arc;
use stockroom_core::{DatabaseConfig, InventoryConfig, NewProduct, Role, SessionConfig};
use stockroom_store::{InMemorySessionStore, Store};
use stockroom_web::{AppState, create_router};
use tower::ServiceExt;

pub const PASSWORD: &str = "s3cret-pass";

pub struct TestApp {
    pub router: Router,
    pub store: Store,
    pub sessions: Arc<InMemorySessionStore>,
}

pub async fn spawn_app() -> TestApp {
    let store = Store::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
    })
    .await
    .unwrap();
    store.migrate().await.unwrap();

    let sessions = Arc::new(InMemorySessionStore::new());
    let state = AppState::new(
        store.clone(),
        sessions.clone(),
        SessionConfig::default(),
        InventoryConfig::default(),
    );

    TestApp {
        router: create_router(state),
        store,
        sessions,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, path: &str, cookie: Option<&str>, form: &str) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(form.to_string())).unwrap())
            .await
    }

    pub async fn create_user(&self, username: &str, role: Role) -> i64 {
        self.store.create_user(username, PASSWORD, &role).await.unwrap()
    }

    /// Log in and return the `name=token` pair to send back as a cookie.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post_form("/login", None, &format!("username={username}&password={PASSWORD}"))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        session_cookie_pair(&response).expect("login should set a session cookie")
    }

    /// A signed-in user with the given role.
    pub async fn signed_in(&self, username: &str, role: Role) -> String {
        self.create_user(username, role).await;
        self.login(username).await
    }

    pub async fn seed_product(&self, name: &str, stock: u32) -> i64 {
        let category_id = match self
            .store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Tools")
        {
            Some(category) => category.id,
            None => self.store.create_category("Tools").await.unwrap(),
        };
        self.store
            .insert_product(&NewProduct {
                name: name.to_string(),
                category_id,
                unit_price: 12.5,
                stock_quantity: stock,
            })
            .await
            .unwrap()
    }

    pub async fn stock_of(&self, product_id: i64) -> i64 {
        self.store
            .find_product(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }
}

/// The `name=value` part of the response's `Set-Cookie`, if any.
pub fn session_cookie_pair(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|pair| pair.trim().to_string())
}

pub fn set_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_redirects_to_login(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), Some("/login"));
}

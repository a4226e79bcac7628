//! In-memory repositories and a request driver for handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::app::build_app;
use crate::auth::repo::UserRepo;
use crate::auth::repo_types::{NewUser, ProfileUpdate, User};
use crate::cart::repo::{CartRepo, USER_FKEY};
use crate::cart::repo_types::CartItem;
use crate::config::{AppConfig, JwtConfig, PasswordConfig};
use crate::error::StoreError;
use crate::products::repo::ProductRepo;
use crate::products::repo_types::{Product, ProductDraft};
use crate::state::AppState;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    products: Vec<Product>,
    cart: Vec<CartItem>,
    next_user: i64,
    next_product: i64,
    next_cart: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Mirrors the Postgres constraints: unique email, foreign keys on cart rows.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let t = self.tables.lock().unwrap();
        t.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn product_count(&self) -> usize {
        self.tables.lock().unwrap().products.len()
    }

    pub fn cart_item_count(&self) -> usize {
        self.tables.lock().unwrap().cart.len()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        let row = User {
            id: next_id(&mut t.next_user),
            email: user.email,
            username: user.username,
            phone_number: user.phone_number,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        t.users.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update_profile(
        &self,
        id: i64,
        profile: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if t.users.iter().any(|u| u.id != id && u.email == profile.email) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        let Some(user) = t.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.email = profile.email;
        user.username = profile.username;
        user.phone_number = profile.phone_number;
        Ok(Some(user.clone()))
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        match t.users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ProductRepo for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.tables.lock().unwrap().products.clone())
    }

    async fn find(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, owner_id: i64, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let status = draft.status();
        let row = Product {
            id: next_id(&mut t.next_product),
            product_name: draft.product_name,
            brand_name: draft.brand_name,
            price: draft.price,
            status,
            quantity: draft.quantity,
            category: draft.category,
            user_id: Some(owner_id),
        };
        t.products.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        draft: ProductDraft,
    ) -> Result<Option<Product>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let Some(product) = t
            .products
            .iter_mut()
            .find(|p| p.id == id && p.user_id == Some(owner_id))
        else {
            return Ok(None);
        };
        product.status = draft.status();
        product.product_name = draft.product_name;
        product.brand_name = draft.brand_name;
        product.price = draft.price;
        product.quantity = draft.quantity;
        product.category = draft.category;
        Ok(Some(product.clone()))
    }
}

#[async_trait]
impl CartRepo for MemoryStore {
    async fn list(&self, user_id: i64) -> Result<Vec<CartItem>, StoreError> {
        let t = self.tables.lock().unwrap();
        Ok(t.cart.iter().filter(|c| c.user_id == user_id).cloned().collect())
    }

    async fn add(
        &self,
        user_id: i64,
        product_id: i64,
        quantity: i64,
    ) -> Result<CartItem, StoreError> {
        let mut t = self.tables.lock().unwrap();
        if !t.products.iter().any(|p| p.id == product_id) {
            return Err(StoreError::MissingReference("cart_items_product_id_fkey".into()));
        }
        if !t.users.iter().any(|u| u.id == user_id) {
            return Err(StoreError::MissingReference(USER_FKEY.into()));
        }
        let row = CartItem {
            id: next_id(&mut t.next_cart),
            product_id,
            user_id,
            quantity,
        };
        t.cart.push(row.clone());
        Ok(row)
    }

    async fn update_quantity(
        &self,
        user_id: i64,
        id: i64,
        quantity: i64,
    ) -> Result<Option<CartItem>, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let Some(item) = t
            .cart
            .iter_mut()
            .find(|c| c.id == id && c.user_id == user_id)
        else {
            return Ok(None);
        };
        item.quantity = quantity;
        Ok(Some(item.clone()))
    }

    async fn remove(&self, user_id: i64, id: i64) -> Result<bool, StoreError> {
        let mut t = self.tables.lock().unwrap();
        let before = t.cart.len();
        t.cart.retain(|c| !(c.id == id && c.user_id == user_id));
        Ok(t.cart.len() < before)
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        allowed_origins: vec!["http://localhost:5173".into()],
        jwt: JwtConfig {
            secret: "test-secret".into(),
            ttl_hours: 24,
        },
        // minimum argon2 cost keeps the suite fast
        password: PasswordConfig {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        },
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let state = AppState::from_parts(
            test_config(),
            store.clone() as Arc<dyn UserRepo>,
            store.clone() as Arc<dyn ProductRepo>,
            store.clone() as Arc<dyn CartRepo>,
        )
        .expect("test state");
        let router = build_app(state.clone());
        Self {
            state,
            store,
            router,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<String>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("jwt={token}"));
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, None, token).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body.to_string()), None)
            .await
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body.to_string()), None)
            .await
    }

    pub async fn post_authed(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::POST, uri, Some(body.to_string()), Some(token))
            .await
    }

    pub async fn put(&self, uri: &str, body: Value, token: Option<&str>) -> TestResponse {
        self.request(Method::PUT, uri, Some(body.to_string()), token)
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, None, Some(token)).await
    }

    /// Registers a user and returns its id.
    pub async fn register(&self, email: &str, password: &str) -> i64 {
        let username = email.split('@').next().unwrap_or("user");
        let res = self
            .post(
                "/api/register",
                json!({
                    "email": email,
                    "username": username,
                    "phoneNumber": "555-0100",
                    "password": password,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "register failed: {}", res.body);
        res.body["id"].as_i64().expect("user id")
    }

    /// Registers and logs in, returning the session token.
    pub async fn register_and_login(&self, email: &str, password: &str) -> String {
        self.register(email, password).await;
        let res = self
            .post("/api/login", json!({"email": email, "password": password}))
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.body["token"].as_str().expect("token").to_string()
    }
}

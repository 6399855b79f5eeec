#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use shortly::domain::entities::{Link, LinkPatch, NewLink, NewUser, User, UserPatch};
use shortly::domain::repositories::{LinkRepository, UserRepository};
use shortly::infrastructure::cache::RefreshTokenCache;
use shortly::infrastructure::clock::ManualClock;
use shortly::prelude::*;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const BASE_URL: &str = "http://sho.rt";
pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const ACCESS_TTL_SECONDS: i64 = 60;
pub const REFRESH_TTL_SECONDS: i64 = 3600;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    links: Vec<Link>,
    next_link_id: i64,
}

/// Users and links kept in memory, with the same uniqueness and cascade
/// rules as the PostgreSQL schema.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn link_by_short(&self, short: &str) -> Option<Link> {
        let tables = self.tables.lock().unwrap();
        tables.links.iter().find(|l| l.short_version == short).cloned()
    }

    pub fn link_count(&self) -> usize {
        self.tables.lock().unwrap().links.len()
    }
}

fn email_taken() -> AppError {
    AppError::conflict("Email is already registered", json!({}))
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(email_taken());
        }

        let user = User {
            id: Uuid::new_v4(),
            name: new_user.name,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(email) = &patch.email {
            if tables.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(email_taken());
            }
        }

        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("User not found", json!({})))?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        tables.links.retain(|l| l.user_id != id);
        Ok(tables.users.len() != before)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().users.len() as i64)
    }
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .links
            .iter()
            .any(|l| l.short_version == new_link.short_version)
        {
            return Err(AppError::conflict("Short code taken", json!({})));
        }

        tables.next_link_id += 1;
        let link = Link {
            id: tables.next_link_id,
            full_version: new_link.full_version,
            short_version: new_link.short_version,
            description: new_link.description,
            created_at: Utc::now(),
            clicked: 0,
            user_id: new_link.user_id,
        };
        tables.links.push(link.clone());
        Ok(link)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Link>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.links.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_short(&self, short_version: &str) -> Result<Option<Link>, AppError> {
        Ok(self.link_by_short(short_version))
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Link>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut links: Vec<Link> = tables
            .links
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(links)
    }

    async fn update(&self, id: i64, patch: LinkPatch) -> Result<Link, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let link = tables
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| AppError::not_found("Link not found", json!({})))?;

        if let Some(full_version) = patch.full_version {
            link.full_version = full_version;
        }
        if let Some(description) = patch.description {
            link.description = description;
        }
        Ok(link.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.links.len();
        tables.links.retain(|l| l.id != id);
        Ok(tables.links.len() != before)
    }

    async fn register_click(&self, short_version: &str) -> Result<Option<String>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .links
            .iter_mut()
            .find(|l| l.short_version == short_version)
            .map(|l| {
                l.clicked += 1;
                l.full_version.clone()
            }))
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().links.len() as i64)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        Ok(self.tables.lock().unwrap().links.iter().map(|l| l.clicked).sum())
    }
}

/// A test server plus handles on its clock and storage.
pub struct TestApp {
    pub server: TestServer,
    pub clock: Arc<ManualClock>,
    pub store: Arc<InMemoryStore>,
    pub state: AppState,
}

pub fn create_test_app() -> TestApp {
    create_test_app_with_capacity(1_000)
}

pub fn create_test_app_with_capacity(cache_capacity: usize) -> TestApp {
    build_test_app(SECRET, cache_capacity)
}

pub fn create_test_app_with_secret(secret: &str) -> TestApp {
    build_test_app(secret, 1_000)
}

fn build_test_app(secret: &str, cache_capacity: usize) -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let settings = TokenSettings {
        secret: secret.to_string(),
        access_ttl: Duration::seconds(ACCESS_TTL_SECONDS),
        refresh_ttl: Duration::seconds(REFRESH_TTL_SECONDS),
        cache_capacity,
    };

    let cache = Arc::new(RefreshTokenCache::new(cache_capacity, clock.clone()));
    let token_service = Arc::new(TokenService::new(&settings, cache, clock.clone()));

    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(token_service, store.clone(), store.clone(), BASE_URL);

    let app = shortly::routes::router(state.clone());

    TestApp {
        server: TestServer::new(app).unwrap(),
        clock,
        store,
        state,
    }
}

/// Signs up `email` with a fixed password and returns the session body.
pub async fn signup(server: &TestServer, email: &str) -> Value {
    let response = server
        .post("/signup")
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": "secret123",
            "repeat_password": "secret123",
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

pub fn access_token(session: &Value) -> String {
    session["token"].as_str().unwrap().to_string()
}

pub fn refresh_token(session: &Value) -> String {
    session["refresh_token"].as_str().unwrap().to_string()
}

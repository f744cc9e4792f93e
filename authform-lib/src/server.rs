//! Stub authentication server
//!
//! A small local HTTP server answering the sign-in and sign-up endpoints the
//! way a real backend would. Used by the CLI `serve` command and by the
//! integration tests.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::config::{SIGN_IN_PATH, SIGN_UP_PATH};
use crate::error::ServerError;
use crate::forms::INVALID_CREDENTIALS;

/// Field error the sign-up endpoint answers with for a taken email.
pub const EMAIL_TAKEN: &str = "An account with this email already exists";

// =============================================================================
// AccountStore
// =============================================================================

/// Known accounts, keyed by lowercased email.
///
/// Clones share the same accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountStore {
    accounts: Arc<RwLock<HashMap<String, String>>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.insert(email, password);
        self
    }

    /// Add an account. Returns `false` if the email is already taken.
    pub fn insert(&self, email: &str, password: &str) -> bool {
        let Ok(mut accounts) = self.accounts.write() else {
            return false;
        };
        let key = normalize(email);
        if accounts.contains_key(&key) {
            return false;
        }
        accounts.insert(key, password.to_string());
        true
    }

    /// Whether `email` and `password` match a known account.
    pub fn verify(&self, email: &str, password: &str) -> bool {
        self.accounts
            .read()
            .ok()
            .and_then(|accounts| accounts.get(&normalize(email)).map(|p| p == password))
            .unwrap_or(false)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.accounts
            .read()
            .map(|accounts| accounts.contains_key(&normalize(email)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// StubServer
// =============================================================================

/// A bound, not yet running stub server.
pub struct StubServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    accounts: AccountStore,
}

impl StubServer {
    /// Bind to `addr`. Port `0` picks a free port.
    pub async fn bind(addr: SocketAddr, accounts: AccountStore) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

        Ok(Self {
            listener,
            local_addr,
            accounts,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Base URL clients should use, e.g. `http://127.0.0.1:8787`.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    pub fn accounts(&self) -> &AccountStore {
        &self.accounts
    }

    /// Serve connections until `shutdown` resolves.
    pub async fn serve(self, shutdown: impl Future<Output = ()>) -> Result<(), ServerError> {
        log::info!("Stub auth server listening on {}", self.local_addr);
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        log::warn!("Accept failed: {}", e);
                        continue;
                    }
                },
            };

            let accounts = self.accounts.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let accounts = accounts.clone();
                    async move { Ok::<_, Infallible>(route(req, &accounts).await) }
                });

                if let Err(e) = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await
                {
                    log::debug!("Connection from {} ended: {}", peer, e);
                }
            });
        }

        log::info!("Stub auth server on {} stopped", self.local_addr);
        Ok(())
    }

    /// Run on a background task until the handle is shut down.
    pub fn spawn(self) -> ServerHandle {
        let local_addr = self.local_addr;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.serve(cancel.clone().cancelled_owned()));

        ServerHandle {
            local_addr,
            _guard: cancel.clone().drop_guard(),
            cancel,
            task,
        }
    }
}

impl std::fmt::Debug for StubServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StubServer")
            .field("local_addr", &self.local_addr)
            .field("accounts", &self.accounts.len())
            .finish()
    }
}

/// Handle to a server started with [`StubServer::spawn`].
///
/// Dropping the handle also stops the server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    _guard: DropGuard,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.local_addr)
    }

    /// Stop accepting connections and wait for the accept loop to end.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| ServerError::Task(e.to_string()))?
    }
}

// =============================================================================
// Routing
// =============================================================================

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

async fn route(req: Request<Incoming>, accounts: &AccountStore) -> Response<Full<Bytes>> {
    let method = req.method().clone();
    let path = req.uri().path().trim_start_matches('/').to_string();
    log::debug!("{} /{}", method, path);

    if method != Method::POST || (path != SIGN_IN_PATH && path != SIGN_UP_PATH) {
        return json_response(StatusCode::NOT_FOUND, json!({ "message": "Not found" }));
    }

    let credentials = match read_credentials(req).await {
        Some(credentials) => credentials,
        None => {
            return json_response(
                StatusCode::BAD_REQUEST,
                json!({ "message": "Invalid request body" }),
            );
        }
    };

    if path == SIGN_IN_PATH {
        sign_in(&credentials, accounts)
    } else {
        sign_up(&credentials, accounts)
    }
}

async fn read_credentials(req: Request<Incoming>) -> Option<Credentials> {
    let body = req.into_body().collect().await.ok()?.to_bytes();
    serde_json::from_slice(&body).ok()
}

fn sign_in(credentials: &Credentials, accounts: &AccountStore) -> Response<Full<Bytes>> {
    if accounts.verify(&credentials.email, &credentials.password) {
        log::info!("Signed in {}", credentials.email);
        json_response(StatusCode::OK, json!({ "success": true }))
    } else {
        log::info!("Rejected sign-in for {}", credentials.email);
        json_response(
            StatusCode::UNAUTHORIZED,
            json!({ "message": INVALID_CREDENTIALS }),
        )
    }
}

fn sign_up(credentials: &Credentials, accounts: &AccountStore) -> Response<Full<Bytes>> {
    if accounts.insert(&credentials.email, &credentials.password) {
        log::info!("Created account {}", credentials.email);
        json_response(StatusCode::OK, json!({ "success": true }))
    } else {
        json_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({ "errors": { "email": EMAIL_TAKEN } }),
        )
    }
}

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(body.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_store() {
        let store = AccountStore::new().with_account("Test@Example.com", "password123");

        assert!(store.verify("test@example.com", "password123"));
        assert!(!store.verify("test@example.com", "wrong"));
        assert!(!store.verify("nobody@example.com", "password123"));
        assert!(!store.insert("TEST@example.com ", "other"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_and_shutdown() {
        let server = StubServer::bind(SocketAddr::from(([127, 0, 0, 1], 0)), AccountStore::new())
            .await
            .unwrap();
        assert_ne!(server.local_addr().port(), 0);

        let handle = server.spawn();
        assert!(handle.base_url().starts_with("http://127.0.0.1:"));
        handle.shutdown().await.unwrap();
    }
}

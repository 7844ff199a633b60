use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use spdlog::{debug, warn};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::export::orchestrator::ExportRequest;

pub const EXPORT_ACTION: &str = "mdexport_export";
pub const SESSION_ACTION: &str = "mdexport_session";
pub const NONCE_FIELD: &str = "export_nonce";
pub const ADMIN_COOKIE: &str = "mdexport_admin";
pub const ADMIN_HEADER: &str = "X-Admin-Key";

/// How the caller claims to be the administrator
#[derive(Debug, Clone, PartialEq)]
pub enum AdminCredential {
    /// The configured key, sent in the admin header
    Key(String),
    /// Session token from the admin cookie, issued by a successful login
    Session(String),
}

pub trait Authorizer {
    fn is_authorized_admin(&self, request: &ExportRequest) -> bool;

    /// Anti-forgery check for the export action
    fn valid_token(&self, request: &ExportRequest) -> bool;
}

/// Issues anti-forgery tokens bound to an action. A token can be used any
/// number of times until it expires.
pub struct NonceStore {
    lifetime: Duration,
    nonces: Mutex<HashMap<String, Nonce>>,
}

struct Nonce {
    action: String,
    expire_date: DateTime<Utc>,
}

impl NonceStore {
    pub fn new(lifetime: Duration) -> Self {
        NonceStore {
            lifetime,
            nonces: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, action: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut nonces = self.nonces.lock().unwrap();
        nonces.retain(|_, nonce| nonce.expire_date > now);
        nonces.insert(token.clone(), Nonce {
            action: action.to_string(),
            expire_date: now + self.lifetime,
        });
        debug!("Nonce issued for {}, {} active", action, nonces.len());

        token
    }

    pub fn verify(&self, token: &str, action: &str) -> bool {
        let nonces = self.nonces.lock().unwrap();
        match nonces.get(token) {
            Some(nonce) => nonce.action == action && Utc::now() <= nonce.expire_date,
            None => false,
        }
    }
}

/// Administrator identified by the configured key in the admin header, or by
/// a session token handed out at login. The key itself never leaves the server.
pub struct AdminAuthorizer {
    admin_key: String,
    nonces: NonceStore,
    sessions: NonceStore,
}

impl AdminAuthorizer {
    pub fn new(admin_key: &str, nonce_lifetime: Duration) -> Self {
        AdminAuthorizer {
            admin_key: admin_key.to_string(),
            nonces: NonceStore::new(nonce_lifetime),
            sessions: NonceStore::new(nonce_lifetime),
        }
    }

    pub fn is_admin_key(&self, candidate: &str) -> bool {
        // An empty configured key never authorizes anybody
        if self.admin_key.is_empty() {
            return false;
        }
        candidate.as_bytes().ct_eq(self.admin_key.as_bytes()).into()
    }

    pub fn issue_nonce(&self) -> String {
        self.nonces.issue(EXPORT_ACTION)
    }

    /// Opaque token for the admin cookie, valid as long as a nonce
    pub fn start_session(&self) -> String {
        self.sessions.issue(SESSION_ACTION)
    }
}

impl Authorizer for AdminAuthorizer {
    fn is_authorized_admin(&self, request: &ExportRequest) -> bool {
        let authorized = match request.admin_credential {
            Some(AdminCredential::Key(ref key)) => self.is_admin_key(key),
            Some(AdminCredential::Session(ref token)) => self.sessions.verify(token, SESSION_ACTION),
            None => false,
        };
        if !authorized {
            warn!("Export requested without a valid admin credential");
        }
        authorized
    }

    fn valid_token(&self, request: &ExportRequest) -> bool {
        match request.form.get(NONCE_FIELD) {
            Some(token) => self.nonces.verify(token, EXPORT_ACTION),
            None => false,
        }
    }
}

/// The operator running the command line tool owns the posts directory already
pub struct LocalOperator {}

impl Authorizer for LocalOperator {
    fn is_authorized_admin(&self, _request: &ExportRequest) -> bool {
        true
    }

    fn valid_token(&self, _request: &ExportRequest) -> bool {
        true
    }
}

//! In-memory entity store. One mutex-guarded map per entity type; every
//! record is exclusively owned by the store and related only by id.
//!
//! The store is constructed explicitly and handed to request handlers
//! through app state, so tests get an isolated instance each.

pub mod contact;
pub mod donations;
pub mod users;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use anyhow::Result;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use careworks_types::models::{ContactMessage, Donation, Role, Session, User};

pub struct Store {
    users: Mutex<HashMap<Uuid, User>>,
    sessions: Mutex<HashMap<Uuid, Session>>,
    donations: Mutex<HashMap<Uuid, Donation>>,
    messages: Mutex<HashMap<Uuid, ContactMessage>>,
}

impl Store {
    /// Fresh store seeded with the two operator accounts.
    pub fn new() -> Self {
        let now = Utc::now();
        let mut users = HashMap::new();
        for (username, email, password, role) in [
            ("admin", "admin@careworks.org", "admin123", Role::Admin),
            ("owner", "owner@careworks.org", "owner123", Role::Owner),
        ] {
            let user = User {
                id: Uuid::new_v4(),
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role,
                created_at: now,
            };
            users.insert(user.id, user);
        }
        info!("seeded default admin and owner accounts");

        Store {
            users: Mutex::new(users),
            sessions: Mutex::new(HashMap::new()),
            donations: Mutex::new(HashMap::new()),
            messages: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn lock_users(&self) -> Result<MutexGuard<'_, HashMap<Uuid, User>>> {
        self.users
            .lock()
            .map_err(|e| anyhow::anyhow!("users map lock poisoned: {}", e))
    }

    pub(crate) fn lock_sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Session>>> {
        self.sessions
            .lock()
            .map_err(|e| anyhow::anyhow!("sessions map lock poisoned: {}", e))
    }

    pub(crate) fn lock_donations(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Donation>>> {
        self.donations
            .lock()
            .map_err(|e| anyhow::anyhow!("donations map lock poisoned: {}", e))
    }

    pub(crate) fn lock_messages(&self) -> Result<MutexGuard<'_, HashMap<Uuid, ContactMessage>>> {
        self.messages
            .lock()
            .map_err(|e| anyhow::anyhow!("messages map lock poisoned: {}", e))
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

//! User and session operations.
//!
//! Session lookup is where expiry lives: a session read at or past its
//! `expires_at` is deleted on the spot and reported as absent. There is no
//! background sweep.

use anyhow::Result;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use careworks_types::api::UserUpdate;
use careworks_types::models::{Role, Session, User};

use crate::Store;

impl Store {
    // -- Users --

    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role,
            created_at: Utc::now(),
        };
        let mut users = self.lock_users()?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock_users()?.get(&id).cloned())
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .lock_users()?
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .lock_users()?
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    /// Merge role/email/password changes. Id and username are immutable.
    pub fn update_user(&self, id: Uuid, updates: UserUpdate) -> Result<Option<User>> {
        let mut users = self.lock_users()?;
        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(role) = updates.role {
            user.role = role;
        }
        if let Some(email) = updates.email {
            user.email = email;
        }
        if let Some(password) = updates.password {
            user.password = password;
        }
        Ok(Some(user.clone()))
    }

    // -- Sessions --

    pub fn create_session(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session> {
        let session = Session {
            id: Uuid::new_v4(),
            user_id,
            expires_at,
            created_at: Utc::now(),
        };
        let mut sessions = self.lock_sessions()?;
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    /// Look up a session, lazily deleting it once expired.
    pub fn get_session(&self, id: Uuid) -> Result<Option<Session>> {
        let mut sessions = self.lock_sessions()?;
        match sessions.get(&id) {
            Some(session) if session.is_expired_at(Utc::now()) => {
                sessions.remove(&id);
                Ok(None)
            }
            Some(session) => Ok(Some(session.clone())),
            None => Ok(None),
        }
    }

    /// Idempotent; deleting an unknown or already-deleted session is fine.
    pub fn delete_session(&self, id: Uuid) -> Result<()> {
        self.lock_sessions()?.remove(&id);
        Ok(())
    }

    /// Resolve the user behind a live session token.
    pub fn user_by_session(&self, session_id: Uuid) -> Result<Option<User>> {
        let Some(session) = self.get_session(session_id)? else {
            return Ok(None);
        };
        self.get_user(session.user_id)
    }
}

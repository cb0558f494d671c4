//! Storage ports for the health log.
//!
//! Persistence itself belongs to the host; this module defines the two
//! key-value surfaces the domain logic is written against — users by id,
//! daily logs by user id and date — plus an in-memory implementation for
//! hosts and tests. Day logs are read and written as whole values.

use std::collections::HashMap;

use chrono::NaiveTime;
use uuid::Uuid;

use crate::models::{DailyLog, LogTable, LogUpdate, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("parent email already registered")]
    DuplicateParentEmail,
    #[error("unknown user: {0}")]
    UnknownUser(Uuid),
}

/// User table keyed by user id, with email lookup for login and the
/// registration uniqueness checks.
pub trait UserStore {
    fn user(&self, id: Uuid) -> Option<User>;
    fn user_by_email(&self, email: &str) -> Option<User>;
    /// The dependent account a parent email is linked to.
    fn user_by_parent_email(&self, email: &str) -> Option<User>;

    /// Register a new user, seeding an empty log for `today`. Fails when the
    /// user email or the parent email is already taken.
    fn register(&mut self, user: User, today: &str) -> Result<Uuid, StoreError>;
}

/// Per-user daily log table keyed by `YYYY-MM-DD`.
pub trait LogStore {
    /// A user's full log table. Empty for unknown users: the analyzer treats
    /// missing history the same as no history.
    fn log_table(&self, user: Uuid) -> LogTable;

    fn day_log(&self, user: Uuid, date: &str) -> Option<DailyLog>;

    /// A day's log, created blank first if the day has never been logged.
    fn open_day(&mut self, user: Uuid, date: &str) -> Result<DailyLog, StoreError>;

    fn put_day_log(&mut self, user: Uuid, date: &str, log: DailyLog) -> Result<(), StoreError>;

    /// Merge a partial update into a day's log, stamping edited fields with
    /// `now`, and store the result.
    fn update_day(
        &mut self,
        user: Uuid,
        date: &str,
        update: &LogUpdate,
        now: NaiveTime,
    ) -> Result<DailyLog, StoreError> {
        let mut log = self.open_day(user, date)?;
        log.apply(update, now);
        self.put_day_log(user, date, log.clone())?;
        Ok(log)
    }
}

/// In-memory store backing both ports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<Uuid, User>,
    logs: HashMap<Uuid, LogTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn user(&self, id: Uuid) -> Option<User> {
        self.users.get(&id).cloned()
    }

    fn user_by_email(&self, email: &str) -> Option<User> {
        self.users.values().find(|u| u.email == email).cloned()
    }

    fn user_by_parent_email(&self, email: &str) -> Option<User> {
        self.users
            .values()
            .find(|u| u.parent_email == email)
            .cloned()
    }

    fn register(&mut self, user: User, today: &str) -> Result<Uuid, StoreError> {
        if self.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        if self
            .users
            .values()
            .any(|u| u.parent_email == user.parent_email)
        {
            return Err(StoreError::DuplicateParentEmail);
        }

        let id = user.id;
        tracing::info!(user = %id, "registered user");
        self.users.insert(id, user);

        let mut table = LogTable::new();
        table.insert(today.to_string(), DailyLog::new());
        self.logs.insert(id, table);

        Ok(id)
    }
}

impl LogStore for MemoryStore {
    fn log_table(&self, user: Uuid) -> LogTable {
        self.logs.get(&user).cloned().unwrap_or_default()
    }

    fn day_log(&self, user: Uuid, date: &str) -> Option<DailyLog> {
        self.logs.get(&user)?.get(date).cloned()
    }

    fn open_day(&mut self, user: Uuid, date: &str) -> Result<DailyLog, StoreError> {
        if !self.users.contains_key(&user) {
            return Err(StoreError::UnknownUser(user));
        }
        let table = self.logs.entry(user).or_default();
        Ok(table.entry(date.to_string()).or_default().clone())
    }

    fn put_day_log(&mut self, user: Uuid, date: &str, log: DailyLog) -> Result<(), StoreError> {
        if !self.users.contains_key(&user) {
            return Err(StoreError::UnknownUser(user));
        }
        self.logs
            .entry(user)
            .or_default()
            .insert(date.to_string(), log);
        tracing::debug!(user = %user, date, "day log saved");
        Ok(())
    }
}

//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    AccountRepository, DatabasePool, EventRepository, GroupRepository, ProfileRepository,
    RegistrationRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub accounts: AccountRepository,
    pub profiles: ProfileRepository,
    pub groups: GroupRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            groups: GroupRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        }
    }
}

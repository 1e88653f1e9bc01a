//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod event;
pub mod group;
pub mod notification;
pub mod razorpay;
pub mod registration;
pub mod roles;

// Re-export commonly used services
pub use auth::{AuthService, Claims, ReauthProof};
pub use event::EventService;
pub use group::GroupService;
pub use notification::{DomainEvent, NotificationService};
pub use razorpay::{PaymentCallback, RazorpayOrder, RazorpayService};
pub use registration::RegistrationService;
pub use roles::RoleService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::state::storage::FlowStorage;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub role_service: RoleService,
    pub group_service: GroupService,
    pub event_service: EventService,
    pub registration_service: RegistrationService,
    pub razorpay_service: RazorpayService,
    pub notification_service: NotificationService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(
        settings: Settings,
        database: DatabaseService,
        flow_storage: FlowStorage,
    ) -> Result<Self> {
        let notification_service = NotificationService::default();
        let auth_service = AuthService::new(
            database.accounts.clone(),
            database.profiles.clone(),
            settings.clone(),
        );
        let role_service = RoleService::new(database.profiles.clone());
        let group_service = GroupService::new(
            database.groups.clone(),
            database.profiles.clone(),
            notification_service.clone(),
        );
        let razorpay_service = RazorpayService::new(settings.clone())?;
        let event_service = EventService::new(
            database.events.clone(),
            database.registrations.clone(),
            notification_service.clone(),
        );
        let registration_service = RegistrationService::new(
            database.events.clone(),
            database.registrations.clone(),
            database.profiles.clone(),
            auth_service.clone(),
            razorpay_service.clone(),
            flow_storage,
            notification_service.clone(),
            settings,
        );

        Ok(Self {
            auth_service,
            role_service,
            group_service,
            event_service,
            registration_service,
            razorpay_service,
            notification_service,
        })
    }
}

//! Repository modules for database operations

pub mod account;
pub mod event;
pub mod group;
pub mod profile;
pub mod registration;

pub use account::AccountRepository;
pub use event::EventRepository;
pub use group::GroupRepository;
pub use profile::ProfileRepository;
pub use registration::RegistrationRepository;

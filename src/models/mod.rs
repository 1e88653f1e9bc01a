//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod account;
pub mod event;
pub mod group;
pub mod profile;
pub mod registration;

// Re-export commonly used models
pub use account::{Account, CreateAccountRequest, UpdateAccountRequest};
pub use event::{CreateEventRequest, Event};
pub use group::{AddMemberRequest, Group, GroupMember, GroupView, StudentGroupRef};
pub use profile::{
    Admin, CreateStudentRequest, Destination, Host, Role, RoleResolution, Student,
    UpdateAdminRequest, UpdateHostRequest, UpdateStudentRequest,
};
pub use registration::{
    CreateReceiptRequest, CreateRegistrationRequest, PaymentReceipt, Registration,
    RegistrationWithReceipt,
};

//! Registration flow state machine
//!
//! A registration runs through a linear flow per (student, event) pair:
//! Confirm -> Reauthenticate -> Pay -> Success, with Pay skipped entirely
//! for free events. States are a tagged union, each carrying only the data
//! it needs, and transitions go through one pure function so retry and
//! cancel semantics are testable without touching the network.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::errors::{CommitteeHubError, Result};

/// One state of the registration flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FlowState {
    /// Awaiting the student's explicit yes; no side effects yet
    Confirm { event_name: String },
    /// Identity must be re-proven before the registration write
    Reauthenticate,
    /// Fee collection; `order_id` is set once the gateway order exists
    Pay {
        amount_minor: i64,
        currency: String,
        order_id: Option<String>,
    },
    /// Terminal; closing it notifies listing views to refresh
    Success,
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::Confirm { .. } => "confirm",
            FlowState::Reauthenticate => "reauthenticate",
            FlowState::Pay { .. } => "pay",
            FlowState::Success => "success",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Success)
    }
}

/// Inputs that drive the flow forward. Failed reauthentication or a failed
/// payment produce no input at all: the flow simply stays where it is and
/// the student retries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum FlowInput {
    /// The student pressed yes on the confirmation prompt
    Confirmed,
    /// Reauthentication passed and the registration row was written;
    /// carries the fee so the flow can decide whether Pay is needed
    Reauthenticated { fee_minor: i64, currency: String },
    /// A gateway order was created for the pending payment
    OrderCreated { order_id: String },
    /// The gateway reported success and the receipt was persisted
    PaymentCaptured,
}

impl FlowInput {
    fn name(&self) -> &'static str {
        match self {
            FlowInput::Confirmed => "confirmed",
            FlowInput::Reauthenticated { .. } => "reauthenticated",
            FlowInput::OrderCreated { .. } => "order_created",
            FlowInput::PaymentCaptured => "payment_captured",
        }
    }
}

/// Pure transition function for the registration flow
pub fn step(state: &FlowState, input: FlowInput) -> Result<FlowState> {
    match (state, input) {
        (FlowState::Confirm { .. }, FlowInput::Confirmed) => Ok(FlowState::Reauthenticate),
        (FlowState::Reauthenticate, FlowInput::Reauthenticated { fee_minor, currency }) => {
            if fee_minor > 0 {
                Ok(FlowState::Pay {
                    amount_minor: fee_minor,
                    currency,
                    order_id: None,
                })
            } else {
                Ok(FlowState::Success)
            }
        }
        (
            FlowState::Pay {
                amount_minor,
                currency,
                order_id: None,
            },
            FlowInput::OrderCreated { order_id },
        ) => Ok(FlowState::Pay {
            amount_minor: *amount_minor,
            currency: currency.clone(),
            order_id: Some(order_id),
        }),
        (
            FlowState::Pay {
                order_id: Some(_), ..
            },
            FlowInput::PaymentCaptured,
        ) => Ok(FlowState::Success),
        (state, input) => Err(CommitteeHubError::InvalidStateTransition {
            from: state.name().to_string(),
            to: input.name().to_string(),
        }),
    }
}

/// A persisted flow instance for one (student, event) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationFlow {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub state: FlowState,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl RegistrationFlow {
    pub fn new(user_id: Uuid, event_id: Uuid, event_name: String, ttl_seconds: u64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            event_id,
            state: FlowState::Confirm { event_name },
            started_at: now,
            updated_at: now,
            expires_at: Some(now + Duration::seconds(ttl_seconds as i64)),
        }
    }

    /// Apply an input through the pure transition function
    pub fn apply(&mut self, input: FlowInput) -> Result<()> {
        self.state = step(&self.state, input)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires_at| Utc::now() > expires_at)
            .unwrap_or(false)
    }
}

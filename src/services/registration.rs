//! Event registration orchestration
//!
//! Drives a student through the registration flow for one event:
//! Confirm -> Reauthenticate -> Pay -> Success, with Pay skipped for free
//! events. The flow state lives in Redis between steps; every transition
//! goes through the pure state machine in `state::machine`.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::settings::Settings;
use crate::database::repositories::{EventRepository, ProfileRepository, RegistrationRepository};
use crate::models::event::Event;
use crate::models::registration::{CreateReceiptRequest, CreateRegistrationRequest};
use crate::services::auth::{AuthService, ReauthProof};
use crate::services::notification::{DomainEvent, NotificationService};
use crate::services::razorpay::{PaymentCallback, RazorpayOrder, RazorpayService};
use crate::state::machine::{FlowInput, FlowState, RegistrationFlow};
use crate::state::storage::FlowStorage;
use crate::utils::errors::{CommitteeHubError, Result};
use crate::utils::helpers;

/// Registration flow orchestrator
#[derive(Clone)]
pub struct RegistrationService {
    events: EventRepository,
    registrations: RegistrationRepository,
    profiles: ProfileRepository,
    auth: AuthService,
    razorpay: RazorpayService,
    flows: FlowStorage,
    notifications: NotificationService,
    settings: Settings,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        events: EventRepository,
        registrations: RegistrationRepository,
        profiles: ProfileRepository,
        auth: AuthService,
        razorpay: RazorpayService,
        flows: FlowStorage,
        notifications: NotificationService,
        settings: Settings,
    ) -> Self {
        Self {
            events,
            registrations,
            profiles,
            auth,
            razorpay,
            flows,
            notifications,
            settings,
        }
    }

    /// Start a registration flow, presenting the event name for the
    /// confirmation prompt. No side effects beyond the flow record itself.
    pub async fn begin(&self, user_id: Uuid, event_id: Uuid) -> Result<RegistrationFlow> {
        let event = self.load_event(event_id).await?;

        if self.registrations.is_registered(event_id, user_id).await? {
            return Err(CommitteeHubError::InvalidInput(
                "Already registered for this event".to_string(),
            ));
        }

        if let Some(existing) = self.flows.load_flow(user_id, event_id).await? {
            debug!(user_id = %user_id, event_id = %event_id, state = existing.state.name(),
                   "Resuming existing registration flow");
            return Ok(existing);
        }

        let flow =
            RegistrationFlow::new(user_id, event_id, event.name, self.settings.redis.ttl_seconds);
        self.flows.save_flow(&flow).await?;

        info!(user_id = %user_id, event_id = %event_id, "Registration flow started");
        Ok(flow)
    }

    /// The student answered yes on the confirmation prompt
    pub async fn confirm(&self, user_id: Uuid, event_id: Uuid) -> Result<RegistrationFlow> {
        let mut flow = self.load_flow(user_id, event_id).await?;
        flow.apply(FlowInput::Confirmed)?;
        self.flows.save_flow(&flow).await?;
        Ok(flow)
    }

    /// Re-prove identity, then write the registration snapshot. A failed
    /// proof keeps the flow in Reauthenticate; a missing student profile
    /// fails the whole flow.
    pub async fn reauthenticate(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        proof: ReauthProof,
    ) -> Result<RegistrationFlow> {
        let mut flow = self.load_flow(user_id, event_id).await?;
        if flow.state != FlowState::Reauthenticate {
            return Err(CommitteeHubError::InvalidStateTransition {
                from: flow.state.name().to_string(),
                to: "reauthenticated".to_string(),
            });
        }

        // A failed proof propagates here and the saved state is untouched,
        // so the student can retry the same step.
        self.auth.reauthenticate(user_id, proof).await?;

        let student = match self.profiles.find_student(user_id).await? {
            Some(student) => student,
            None => {
                warn!(user_id = %user_id, event_id = %event_id,
                      "Student profile missing, abandoning registration flow");
                self.flows.delete_flow(user_id, event_id).await?;
                return Err(CommitteeHubError::StudentNotFound { user_id });
            }
        };

        let event = self.load_event(event_id).await?;

        self.registrations
            .create(CreateRegistrationRequest {
                event_id,
                user_id,
                first_name: student.first_name,
                last_name: student.last_name,
                email: student.email,
            })
            .await?;
        crate::utils::logging::log_event_action(event_id, "registered", user_id, None);

        flow.apply(FlowInput::Reauthenticated {
            fee_minor: helpers::to_minor_units(event.fee()),
            currency: self.razorpay_currency(),
        })?;
        self.flows.save_flow(&flow).await?;

        if flow.state == FlowState::Success {
            info!(user_id = %user_id, event_id = %event_id, "Free registration completed");
        }

        Ok(flow)
    }

    /// Create the gateway order for the pending payment
    pub async fn create_order(&self, user_id: Uuid, event_id: Uuid) -> Result<(RegistrationFlow, RazorpayOrder)> {
        let mut flow = self.load_flow(user_id, event_id).await?;

        let amount = match &flow.state {
            FlowState::Pay {
                amount_minor,
                order_id: None,
                ..
            } => *amount_minor,
            state => {
                return Err(CommitteeHubError::InvalidStateTransition {
                    from: state.name().to_string(),
                    to: "order_created".to_string(),
                });
            }
        };

        let order = self
            .razorpay
            .create_order(Some(amount), Some(self.razorpay_currency()))
            .await?;

        flow.apply(FlowInput::OrderCreated {
            order_id: order.id.clone(),
        })?;
        self.flows.save_flow(&flow).await?;

        crate::utils::logging::log_payment_event(user_id, event_id, "order_created", Some(&order.id));
        Ok((flow, order))
    }

    /// Handle the checkout widget's completion callback: verify the
    /// signature, persist the receipt, then advance to Success. A receipt
    /// write failure leaves the flow in Pay; the registration row already
    /// exists at that point, which is the documented inconsistency window.
    pub async fn complete_payment(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        callback: PaymentCallback,
    ) -> Result<RegistrationFlow> {
        let mut flow = self.load_flow(user_id, event_id).await?;

        match &flow.state {
            FlowState::Pay {
                order_id: Some(order_id),
                ..
            } if *order_id == callback.razorpay_order_id => {}
            FlowState::Pay { .. } => {
                return Err(CommitteeHubError::InvalidInput(
                    "Payment does not match the pending order".to_string(),
                ));
            }
            state => {
                return Err(CommitteeHubError::InvalidStateTransition {
                    from: state.name().to_string(),
                    to: "payment_captured".to_string(),
                });
            }
        }

        self.razorpay.verify_signature(&callback)?;

        self.registrations
            .create_receipt(CreateReceiptRequest {
                payment_id: callback.razorpay_payment_id.clone(),
                event_id,
                user_id,
                order_id: callback.razorpay_order_id,
                signature: callback.razorpay_signature,
            })
            .await?;

        flow.apply(FlowInput::PaymentCaptured)?;
        self.flows.save_flow(&flow).await?;

        crate::utils::logging::log_payment_event(
            user_id,
            event_id,
            "payment_captured",
            Some(&callback.razorpay_payment_id),
        );
        info!(user_id = %user_id, event_id = %event_id, "Paid registration completed");

        Ok(flow)
    }

    /// Close the Success screen. The flow record is dropped and listing
    /// views are told to refresh.
    pub async fn close(&self, user_id: Uuid, event_id: Uuid) -> Result<()> {
        let flow = self.load_flow(user_id, event_id).await?;

        if !flow.state.is_terminal() {
            return Err(CommitteeHubError::InvalidStateTransition {
                from: flow.state.name().to_string(),
                to: "closed".to_string(),
            });
        }

        self.flows.delete_flow(user_id, event_id).await?;
        self.notifications
            .publish(DomainEvent::RegistrationCompleted { event_id, user_id });

        Ok(())
    }

    /// Current flow state for one (student, event) pair
    pub async fn current(&self, user_id: Uuid, event_id: Uuid) -> Result<Option<RegistrationFlow>> {
        self.flows.load_flow(user_id, event_id).await
    }

    async fn load_flow(&self, user_id: Uuid, event_id: Uuid) -> Result<RegistrationFlow> {
        self.flows
            .load_flow(user_id, event_id)
            .await?
            .ok_or_else(|| {
                CommitteeHubError::InvalidInput("No active registration flow".to_string())
            })
    }

    async fn load_event(&self, event_id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(CommitteeHubError::EventNotFound { event_id })
    }

    fn razorpay_currency(&self) -> String {
        self.settings.razorpay.currency.clone()
    }
}

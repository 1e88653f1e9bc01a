//! Flow state persistence
//!
//! This module handles persistence of registration flow state using Redis,
//! including serialization, deserialization, expiration, and cleanup.

use redis::AsyncCommands;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::utils::errors::Result;

use super::machine::RegistrationFlow;

/// Redis-based flow state storage
#[derive(Clone)]
pub struct FlowStorage {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
}

impl FlowStorage {
    /// Create a new flow storage instance
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
        })
    }

    /// Save a registration flow with TTL
    pub async fn save_flow(&self, flow: &RegistrationFlow) -> Result<()> {
        let key = self.flow_key(flow.user_id, flow.event_id);
        debug!(user_id = %flow.user_id, event_id = %flow.event_id, key = %key,
               state = flow.state.name(), "Saving flow state");

        let serialized = match serde_json::to_string(flow) {
            Ok(data) => data,
            Err(e) => {
                error!(user_id = %flow.user_id, error = %e, "Failed to serialize flow state");
                return Err(e.into());
            }
        };

        let ttl_seconds = if let Some(expires_at) = flow.expires_at {
            let duration = expires_at - chrono::Utc::now();
            std::cmp::max(duration.num_seconds(), 60) as u64
        } else {
            self.config.ttl_seconds
        };

        let mut conn = self.connection_manager.clone();
        match conn.set_ex::<_, _, ()>(&key, serialized, ttl_seconds).await {
            Ok(_) => {
                debug!(user_id = %flow.user_id, ttl_seconds = ttl_seconds, "Flow state saved");
                Ok(())
            }
            Err(e) => {
                error!(user_id = %flow.user_id, error = %e, "Failed to save flow state");
                Err(e.into())
            }
        }
    }

    /// Load a registration flow, discarding it when expired
    pub async fn load_flow(
        &self,
        user_id: Uuid,
        event_id: Uuid,
    ) -> Result<Option<RegistrationFlow>> {
        let key = self.flow_key(user_id, event_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;

        match serialized {
            Some(data) => {
                let flow: RegistrationFlow = match serde_json::from_str(&data) {
                    Ok(flow) => flow,
                    Err(e) => {
                        error!(user_id = %user_id, error = %e, "Failed to deserialize flow state");
                        return Err(e.into());
                    }
                };

                if flow.is_expired() {
                    warn!(user_id = %user_id, event_id = %event_id, "Flow state expired, removing");
                    self.delete_flow(user_id, event_id).await?;
                    return Ok(None);
                }

                debug!(user_id = %user_id, event_id = %event_id, state = flow.state.name(),
                       "Flow state loaded");
                Ok(Some(flow))
            }
            None => {
                debug!(user_id = %user_id, event_id = %event_id, "No flow state found");
                Ok(None)
            }
        }
    }

    /// Delete a registration flow
    pub async fn delete_flow(&self, user_id: Uuid, event_id: Uuid) -> Result<()> {
        let key = self.flow_key(user_id, event_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;

        if deleted > 0 {
            debug!(user_id = %user_id, event_id = %event_id, "Deleted flow state");
        }

        Ok(())
    }

    /// Check if a flow exists for a (student, event) pair
    pub async fn flow_exists(&self, user_id: Uuid, event_id: Uuid) -> Result<bool> {
        let key = self.flow_key(user_id, event_id);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    /// Test Redis connection
    pub async fn test_connection(&self) -> Result<()> {
        let mut conn = self.connection_manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    fn flow_key(&self, user_id: Uuid, event_id: Uuid) -> String {
        format!("{}flow:{}:{}", self.config.prefix, user_id, event_id)
    }
}

impl std::fmt::Debug for FlowStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

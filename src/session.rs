//! Session store boundary contract.
//!
//! The dispatch core never calls a session store directly: middleware
//! owns the store and exposes whatever the application needs through
//! context attributes. This trait only fixes the capability surface an
//! implementation must provide so middleware can be written against it.

use std::collections::HashMap;

use serde_json::Value;

/// Cookie settings a store hands to the transport when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub lifetime_secs: u64,
    pub http_only: bool,
}

/// Capability contract for a session store implementation.
pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: Value);
    fn get(&self, key: &str) -> Option<Value>;
    fn has(&self, key: &str) -> bool;
    fn remove(&self, key: &str);
    fn clear(&self);
    /// Replace the session id, keeping the stored values.
    fn regenerate(&self) -> String;
    fn id(&self) -> String;
    fn all(&self) -> HashMap<String, Value>;
    fn create_config(&self) -> SessionConfig;
}

//! Request-scoped context shared by every component rendered for one request.
//!
//! The caller owns the context; components borrow it for the length of a
//! render cycle and only read from it.

use crate::oracle::RenderLogger;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

pub struct RenderContext {
    request_id: Uuid,
    params: Map<String, Value>,
    session: Map<String, Value>,
    logger: Option<Arc<dyn RenderLogger>>,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            params: Map::new(),
            session: Map::new(),
            logger: None,
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: Uuid) -> Self {
        self.request_id = request_id;
        self
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Map<String, Value>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_session_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.session.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn RenderLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn session(&self) -> &Map<String, Value> {
        &self.session
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    /// Forward to the request logger; a no-op when none is attached
    pub fn log(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.log(message);
        }
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("request_id", &self.request_id)
            .field("params", &self.params)
            .field("session", &self.session)
            .field("logger", &self.logger.as_ref().map(|_| "<RenderLogger>"))
            .finish()
    }
}

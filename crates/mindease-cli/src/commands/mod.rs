//! Command handlers

pub mod analyze;
pub mod ask;
pub mod chat;
pub mod config;
pub mod serve;

use anyhow::Result;
use mindease_core::{AppConfig, SmartRouter};
use std::sync::Arc;

/// Router shared by the conversational commands
pub(crate) fn build_router(config: &AppConfig) -> Result<Arc<SmartRouter>> {
    Ok(Arc::new(SmartRouter::from_config(config)?))
}

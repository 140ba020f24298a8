use dotenvy::dotenv;
use std::env;
use thiserror::Error;

use crate::projection::DelegateEncoding;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {name}, expected true or false")]
    InvalidFlag { name: &'static str, value: String },
    #[error("invalid delegate encoding '{0}', expected 'combined' or 'separate'")]
    InvalidEncoding(String),
}

/// Behaviour switches of the host dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferConfig {
    /// Allow more than one main handler.
    pub multi_select_main: bool,
    /// Offer delegates before committing main/support selections.
    pub delegation_mode: bool,
    /// Bulk transfer: select units only, staff hidden.
    pub multi_target: bool,
    pub delegate_encoding: DelegateEncoding,
}

impl TransferConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let delegate_encoding = match env::var("TRANSFER_DELEGATE_ENCODING") {
            Ok(value) => value.parse()?,
            Err(_) => DelegateEncoding::default(),
        };

        Ok(Self {
            multi_select_main: env_flag("TRANSFER_MULTI_SELECT_MAIN", false)?,
            delegation_mode: env_flag("TRANSFER_DELEGATION_MODE", false)?,
            multi_target: env_flag("TRANSFER_MULTI_TARGET", false)?,
            delegate_encoding,
        })
    }
}

fn env_flag(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag { name, value }),
        Err(_) => {
            log::debug!("{} not set, using default {}", name, default);
            Ok(default)
        }
    }
}

pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

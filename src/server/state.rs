//! Server state and configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::cart::Cart;
use crate::config::Notices;
use crate::error::PaversError;
use crate::order::Order;
use crate::rules::RuleTable;
use crate::submission::StaticConsent;
use crate::upload::{AttachmentStore, MemoryStore, UploadPolicy};

/// URL prefix under which stored graphics are served.
pub const GRAPHICS_PATH: &str = "/api/graphics";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Optional JSON rule table replacing the builtin catalog
    pub rules_path: Option<PathBuf>,
    /// Anti-forgery token the storefront embeds in its forms
    pub consent_token: String,
    /// Largest accepted graphic in bytes
    pub max_upload_bytes: usize,
    /// Prefix for graphic URLs handed out to carts (e.g., "https://shop.example")
    pub public_url: String,
    pub notices: Notices,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            rules_path: None,
            consent_token: String::new(),
            max_upload_bytes: crate::upload::DEFAULT_MAX_BYTES,
            public_url: String::new(),
            notices: Notices::default(),
        }
    }
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Read-only for the life of the process.
    pub rules: RuleTable,
    pub consent: StaticConsent,
    pub upload_policy: UploadPolicy,
    pub graphics: Arc<dyn AttachmentStore>,
    /// Base URL of stored graphics, without trailing slash.
    pub graphics_url: String,
    pub carts: RwLock<HashMap<String, Cart>>,
    pub orders: RwLock<HashMap<String, Order>>,
}

impl AppState {
    /// Build state, loading the rule file when one is configured.
    pub fn new(config: ServerConfig) -> Result<Self, PaversError> {
        let rules = match &config.rules_path {
            Some(path) => RuleTable::load(path)?,
            None => RuleTable::builtin(),
        };
        Ok(Self::with_rules(config, rules))
    }

    pub fn with_rules(config: ServerConfig, rules: RuleTable) -> Self {
        let graphics_url = format!("{}{}", config.public_url.trim_end_matches('/'), GRAPHICS_PATH);
        Self {
            consent: StaticConsent::new(config.consent_token.clone()),
            upload_policy: UploadPolicy {
                max_bytes: config.max_upload_bytes,
            },
            graphics: Arc::new(MemoryStore::new(graphics_url.clone())),
            graphics_url,
            carts: RwLock::new(HashMap::new()),
            orders: RwLock::new(HashMap::new()),
            rules,
            config,
        }
    }
}

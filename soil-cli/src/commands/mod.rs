pub mod batch;
pub mod health;
pub mod info;
pub mod list;
pub mod property;
pub mod soil_type;
pub mod summary;
pub mod value;

use anyhow::{Context, Result};
use serde::Serialize;
use soil::{ClientConfig, SoilClient};

/// Connection settings shared by every networked subcommand.
pub struct ClientOptions {
    pub base_url: Option<String>,
    pub timeout: u64,
    pub retries: u32,
}

impl ClientOptions {
    pub fn config(&self) -> ClientConfig {
        let config = match &self.base_url {
            Some(url) => ClientConfig::with_base_url(url.clone()),
            None => ClientConfig::default(),
        };
        config
            .with_timeout(self.timeout)
            .with_max_retries(self.retries)
    }

    pub fn connect(&self) -> Result<SoilClient> {
        SoilClient::new(self.config()).context("Failed to create soil API client")
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

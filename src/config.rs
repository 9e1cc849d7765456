use uuid::Uuid;

use crate::error::{Error, Result};
use crate::heat::Palette;
use crate::stylesheet::Stylesheet;

/// Server settings read from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub edit_key: String,
    pub palette: Palette,
    pub title: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Cloud Run provides PORT, default to 8080
        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| Error::Config(format!("PORT is not a port number: {port:?}")))?,
            None => 8080,
        };

        let edit_key = var("HEAT_EDIT_KEY").unwrap_or_else(|| {
            let key = Uuid::new_v4().to_string();
            tracing::warn!("HEAT_EDIT_KEY not set, generated new key: {}", key);
            key
        });

        let palette = match var("HEAT_PALETTE_CSS") {
            Some(path) => Palette::from_provider(&Stylesheet::load(&path)?)?,
            None => {
                tracing::info!("HEAT_PALETTE_CSS not set, using the default palette");
                Palette::default()
            }
        };

        Ok(Self {
            port,
            edit_key,
            palette,
            title: var("HEAT_SHEET_TITLE"),
        })
    }
}

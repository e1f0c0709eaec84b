//! Session configuration, loaded from JSON. Every field has a default so a partial (or empty)
//! document is valid.

use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::{
    core::{Canvas, Fps},
    error::{DiscoError, DiscoResult},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "PersonaConfig::default_endpoint")]
    pub endpoint: String,
    #[serde(default = "PersonaConfig::default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "PersonaConfig::default_api_key_env")]
    pub api_key_env: String,
}

impl PersonaConfig {
    fn default_endpoint() -> String {
        "https://generativelanguage.googleapis.com/v1beta".to_string()
    }
    fn default_model() -> String {
        "gemini-3-flash-preview".to_string()
    }
    fn default_api_key_env() -> String {
        "API_KEY".to_string()
    }
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            endpoint: Self::default_endpoint(),
            model: Self::default_model(),
            api_key_env: Self::default_api_key_env(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_fps")]
    pub fps: Fps,
}

impl RenderConfig {
    fn default_fps() -> Fps {
        Fps { num: 60, den: 1 }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fps: Self::default_fps(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartyConfig {
    /// Dance floor size; also bounds where new dancers are placed.
    #[serde(default)]
    pub viewport: Canvas,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub persona: PersonaConfig,
    /// Fixed RNG seed for reproducible ids and dance parameters.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl PartyConfig {
    pub fn from_reader(r: impl std::io::Read) -> DiscoResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| DiscoError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> DiscoResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            DiscoError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> DiscoResult<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(DiscoError::validation("viewport width/height must be > 0"));
        }
        Fps::new(self.render.fps.num, self.render.fps.den)?;
        if self.persona.model.trim().is_empty() {
            return Err(DiscoError::validation("persona model must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

use std::{
    io::Write as _,
    process::{Command, Stdio},
    sync::Arc,
};

use crate::{
    config::PersonaConfig,
    foundation::error::{DiscoError, DiscoResult},
    persona::{
        model::{Persona, ShapeDescription},
        request::{build_request, parse_response},
    },
};

/// Something that can turn a shape description into a persona. Failures are reported, not hidden;
/// [`PersonaFetcher`] is the layer that swallows them.
pub trait PersonaSource: Send + Sync {
    fn generate(&self, description: ShapeDescription) -> DiscoResult<Persona>;
}

/// Source used when no API key is configured: every request fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct OfflinePersona;

impl PersonaSource for OfflinePersona {
    fn generate(&self, _description: ShapeDescription) -> DiscoResult<Persona> {
        Err(DiscoError::persona("no generative text service configured"))
    }
}

/// Gemini `generateContent` client. The HTTP exchange is delegated to the system `curl` binary:
/// the request body goes to its stdin and the response body is read from its stdout.
#[derive(Clone)]
pub struct GeminiClient {
    endpoint: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Arguments passed to `curl`. Everything else, the API key included, travels over stdin.
    fn curl_command() -> Command {
        let mut cmd = Command::new("curl");
        cmd.args(["--silent", "--show-error", "--fail", "--config", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    /// `curl --config` text for one request: URL, headers and the inline JSON body.
    fn curl_config(&self, body: &str) -> String {
        let lines = [
            format!("url = {}", config_quote(&self.url())),
            "request = \"POST\"".to_string(),
            "header = \"Content-Type: application/json\"".to_string(),
            format!(
                "header = {}",
                config_quote(&format!("x-goog-api-key: {}", self.api_key))
            ),
            format!("data-binary = {}", config_quote(body)),
        ];
        let mut cfg = lines.join("\n");
        cfg.push('\n');
        cfg
    }
}

/// Double-quote `value` for a curl config file.
fn config_quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl PersonaSource for GeminiClient {
    fn generate(&self, description: ShapeDescription) -> DiscoResult<Persona> {
        let body = serde_json::to_string(&build_request(description))
            .map_err(|e| DiscoError::serde(format!("encode persona request: {e}")))?;

        let mut child = Self::curl_command().spawn().map_err(|e| {
            DiscoError::persona(format!(
                "failed to spawn curl (is it installed and on PATH?): {e}"
            ))
        })?;

        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| DiscoError::persona("failed to open curl stdin (unexpected)"))?;
            stdin
                .write_all(self.curl_config(&body).as_bytes())
                .map_err(|e| DiscoError::persona(format!("failed to write curl config: {e}")))?;
        }

        let out = child
            .wait_with_output()
            .map_err(|e| DiscoError::persona(format!("failed to wait for curl: {e}")))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(DiscoError::persona(format!(
                "curl exited with status {}: {}",
                out.status,
                stderr.trim()
            )));
        }
        parse_response(&out.stdout)
    }
}

/// Pick the source described by `cfg`: Gemini when the API key variable is set, offline otherwise.
pub fn source_from_config(cfg: &PersonaConfig) -> Arc<dyn PersonaSource> {
    match std::env::var(&cfg.api_key_env) {
        Ok(key) if !key.trim().is_empty() => Arc::new(GeminiClient::new(
            cfg.endpoint.clone(),
            cfg.model.clone(),
            key.trim(),
        )),
        _ => {
            tracing::info!(
                var = %cfg.api_key_env,
                "no API key set; dancers will get the fallback persona"
            );
            Arc::new(OfflinePersona)
        }
    }
}

/// Never-failing front of a [`PersonaSource`].
#[derive(Clone)]
pub struct PersonaFetcher {
    source: Arc<dyn PersonaSource>,
}

impl PersonaFetcher {
    pub fn new(source: Arc<dyn PersonaSource>) -> Self {
        Self { source }
    }

    pub fn fetch(&self, description: ShapeDescription) -> Persona {
        match self.source.generate(description) {
            Ok(persona) => persona,
            Err(e) => {
                tracing::warn!(error = %e, %description, "persona request failed, using fallback");
                Persona::fallback()
            }
        }
    }
}

/// Return `true` when `curl` can be invoked from `PATH`.
pub fn is_curl_on_path() -> bool {
    Command::new("curl")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/persona/client.rs"]
mod tests;

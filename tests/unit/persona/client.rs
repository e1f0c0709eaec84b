use super::*;

struct Fixed(Persona);

impl PersonaSource for Fixed {
    fn generate(&self, _description: ShapeDescription) -> DiscoResult<Persona> {
        Ok(self.0.clone())
    }
}

struct Broken;

impl PersonaSource for Broken {
    fn generate(&self, _description: ShapeDescription) -> DiscoResult<Persona> {
        Err(DiscoError::serde("truncated body"))
    }
}

#[test]
fn fetch_passes_successful_persona_through() {
    let p = Persona {
        name: "Squiggle".to_string(),
        catchphrase: "Wobble on!".to_string(),
        vibe: "Goofy".to_string(),
    };
    let fetcher = PersonaFetcher::new(Arc::new(Fixed(p.clone())));
    assert_eq!(fetcher.fetch(ShapeDescription::Simple), p);
}

#[test]
fn fetch_falls_back_on_any_failure() {
    for source in [
        Arc::new(Broken) as Arc<dyn PersonaSource>,
        Arc::new(OfflinePersona),
    ] {
        let fetcher = PersonaFetcher::new(source);
        assert_eq!(fetcher.fetch(ShapeDescription::Complex), Persona::fallback());
    }
}

#[test]
fn unreachable_endpoint_falls_back() {
    // Port 9 (discard) on localhost refuses connections; without curl the spawn fails instead.
    let client = GeminiClient::new("http://127.0.0.1:9/v1beta", "test-model", "k");
    let fetcher = PersonaFetcher::new(Arc::new(client));
    assert_eq!(fetcher.fetch(ShapeDescription::Simple), Persona::fallback());
}

#[test]
fn url_joins_endpoint_and_model() {
    let client = GeminiClient::new("https://example.test/v1beta/", "m-1", "secret");
    assert_eq!(
        client.url(),
        "https://example.test/v1beta/models/m-1:generateContent"
    );
    assert!(!format!("{client:?}").contains("secret"));
}

#[test]
fn missing_key_selects_offline_source() {
    let cfg = PersonaConfig {
        api_key_env: "DISCO_DOODLE_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
        ..PersonaConfig::default()
    };
    let fetcher = PersonaFetcher::new(source_from_config(&cfg));
    assert_eq!(fetcher.fetch(ShapeDescription::Simple), Persona::fallback());
}

#[test]
fn api_key_travels_on_stdin_not_argv() {
    let client = GeminiClient::new("https://example.test/v1beta", "m-1", "top-secret-key");
    let cmd = GeminiClient::curl_command();
    assert!(cmd.get_args().all(|a| !a.to_string_lossy().contains("top-secret-key")));

    let cfg = client.curl_config(r#"{"q":"a \"b\" c\\d"}"#);
    assert!(cfg.contains("header = \"x-goog-api-key: top-secret-key\"\n"));
    assert!(cfg.contains("url = \"https://example.test/v1beta/models/m-1:generateContent\"\n"));
    assert!(cfg.contains(r#"data-binary = "{\"q\":\"a \\\"b\\\" c\\\\d\"}""#));
}

#[test]
fn config_values_escape_quotes_and_control_characters() {
    assert_eq!(config_quote("plain"), "\"plain\"");
    assert_eq!(config_quote("a\"b"), r#""a\"b""#);
    assert_eq!(config_quote("x\ny\tz"), r#""x\ny\tz""#);
}

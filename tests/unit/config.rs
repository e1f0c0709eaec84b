use super::*;

#[test]
fn empty_document_uses_defaults() {
    let cfg = PartyConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, PartyConfig::default());
    assert_eq!(
        cfg.viewport,
        Canvas {
            width: 1280,
            height: 720
        }
    );
    assert_eq!(cfg.render.fps, Fps { num: 60, den: 1 });
    assert_eq!(cfg.persona.api_key_env, "API_KEY");
    assert_eq!(cfg.seed, None);
}

#[test]
fn partial_sections_keep_remaining_defaults() {
    let cfg = PartyConfig::from_reader(
        r#"{"viewport":{"width":640,"height":480},"persona":{"model":"m"},"seed":9}"#.as_bytes(),
    )
    .unwrap();
    assert_eq!(cfg.viewport.width, 640);
    assert_eq!(cfg.persona.model, "m");
    assert_eq!(
        cfg.persona.endpoint,
        "https://generativelanguage.googleapis.com/v1beta"
    );
    assert_eq!(cfg.seed, Some(9));
}

#[test]
fn validation_rejects_degenerate_values() {
    assert!(
        PartyConfig::from_reader(r#"{"viewport":{"width":0,"height":10}}"#.as_bytes()).is_err()
    );
    assert!(
        PartyConfig::from_reader(r#"{"render":{"fps":{"num":30,"den":0}}}"#.as_bytes()).is_err()
    );
    assert!(PartyConfig::from_reader("[1, 2]".as_bytes()).is_err());
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = PartyConfig::from_path("target/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

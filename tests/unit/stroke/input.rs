use super::*;

#[test]
fn parses_styled_and_bare_gestures() {
    let json = r##"[
        {"points": [[0, 0], [1, 2]], "color": "#00ff00"},
        {"points": [[5, 5]]},
        [[3, 4], [5, 6], [7, 8]]
    ]"##;
    let g = gestures_from_reader(json.as_bytes()).unwrap();
    assert_eq!(g.len(), 3);
    assert_eq!(g[0].color(), Some(Rgba8::opaque(0, 255, 0)));
    assert_eq!(g[1].color(), None);
    assert_eq!(g[2].color(), None);
    assert_eq!(g[2].points().nth(1), Some(Point::new(5.0, 6.0)));
}

#[test]
fn pointer_events_bracket_the_gesture() {
    let g = GestureInput::Bare(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
    assert_eq!(
        g.pointer_events(),
        vec![
            PointerEvent::Press(Point::new(0.0, 0.0)),
            PointerEvent::Move(Point::new(1.0, 1.0)),
            PointerEvent::Move(Point::new(2.0, 2.0)),
            PointerEvent::Release,
        ]
    );
    assert!(GestureInput::Bare(Vec::new()).pointer_events().is_empty());
}

#[test]
fn rejects_malformed_documents() {
    assert!(gestures_from_reader(r#"{"points": []}"#.as_bytes()).is_err());
    assert!(
        gestures_from_reader(r##"[{"points": [[0, 0]], "color": "green"}]"##.as_bytes()).is_err()
    );
    assert!(gestures_from_path("/definitely/not/here.json").is_err());
}

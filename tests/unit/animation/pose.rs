use super::*;
use crate::{
    dancer::model::{DanceParams, DanceStyle},
    foundation::core::Rgba8,
    stroke::recorder::{Stroke, StrokeId},
};

fn dancer(points: Vec<Point>, params: DanceParams) -> Dancer {
    Dancer::new(
        Stroke {
            id: StrokeId("pose00001".to_string()),
            points,
            color: Rgba8::opaque(255, 255, 0),
        },
        params,
    )
}

fn params() -> DanceParams {
    DanceParams {
        style: DanceStyle::Spin,
        scale: 1.0,
        rotation: 20.0,
        offset_x: 0.0,
        offset_y: 0.0,
        speed: 1.0,
        bounce_height: 50.0,
    }
}

fn square() -> Vec<Point> {
    vec![
        Point::new(100.0, 200.0),
        Point::new(140.0, 200.0),
        Point::new(140.0, 220.0),
        Point::new(100.0, 220.0),
    ]
}

#[test]
fn rest_pose_at_tick_zero() {
    let d = dancer(square(), params());
    let p = pose_at(&d, Tick(0));
    assert_eq!(p.bounce, 0.0);
    assert_eq!(p.wiggle, 0.0);
    assert_eq!(p.tilt_deg, 20.0);
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.shadow_scale, 1.0);
}

#[test]
fn bounce_never_goes_below_the_floor() {
    let mut rng = crate::foundation::rng::Rng64::new(5);
    for _ in 0..50 {
        let params = DanceParams::sample(&mut rng, Default::default());
        let d = dancer(square(), params);
        for t in 0..500 {
            let p = pose_at(&d, Tick(t));
            assert!(p.bounce <= 0.0);
            assert!(p.bounce >= -params.bounce_height);
            assert!(p.wiggle.abs() <= WIGGLE_AMPLITUDE);
            assert!(p.tilt_deg.abs() <= params.rotation);
            assert!((0.3..=1.0).contains(&p.shadow_scale));
        }
    }
}

#[test]
fn pose_matches_formulas() {
    let mut prm = params();
    prm.speed = 1.5;
    prm.scale = 0.9;
    let d = dancer(square(), prm);
    let p = pose_at(&d, Tick(7));
    let t = 7.0f64;
    assert!((p.bounce - -((t * 0.15).sin().abs() * 50.0)).abs() < 1e-12);
    assert!((p.wiggle - (t * 0.225).sin() * 25.0).abs() < 1e-12);
    assert!((p.tilt_deg - (t * 0.15).cos() * 20.0).abs() < 1e-12);
    assert!((p.scale - (1.0 + (t * 0.2).sin() * 0.1) * 0.9).abs() < 1e-12);
    assert!((p.shadow_scale - (1.0 - p.bounce.abs() / 100.0)).abs() < 1e-12);
}

#[test]
fn normalization_moves_minimum_to_origin() {
    let pts = normalize_points(&square());
    assert_eq!(pts[0], Point::new(0.0, 0.0));
    assert_eq!(pts[2], Point::new(40.0, 20.0));
    assert_eq!(local_bounds(&square()), Rect::new(100.0, 200.0, 140.0, 220.0));
    assert_eq!(local_bounds(&[]), Rect::ZERO);
    assert!(normalized_path(&[]).elements().is_empty());
    assert_eq!(normalized_path(&square()).elements().len(), 4);
}

#[test]
fn affine_centres_the_box_on_the_placement() {
    let mut prm = params();
    prm.offset_x = 30.0;
    prm.offset_y = -10.0;
    let d = dancer(square(), prm);
    let pose = Pose {
        bounce: -5.0,
        wiggle: 2.0,
        tilt_deg: 90.0,
        scale: 2.0,
        shadow_scale: 0.95,
    };
    let a = pose.to_affine(Point::new(640.0, 360.0), &d);
    // Box centre (20, 10) maps to the anchor regardless of rotation and scale.
    let c = a * Point::new(20.0, 10.0);
    assert!((c.x - 672.0).abs() < 1e-9);
    assert!((c.y - 345.0).abs() < 1e-9);
    // Quarter turn: +x in the box becomes +y on the floor, doubled.
    let e = a * Point::new(21.0, 10.0);
    assert!((e.x - 672.0).abs() < 1e-9);
    assert!((e.y - 347.0).abs() < 1e-9);
}

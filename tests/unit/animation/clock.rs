use super::*;

#[test]
fn advance_only_while_running() {
    let mut c = AnimationClock::new();
    assert_eq!(c.advance(), Tick(0));
    c.start();
    assert!(c.is_running());
    c.advance();
    assert_eq!(c.advance(), Tick(2));
    c.stop();
    assert_eq!(c.advance(), Tick(2));
    assert_eq!(c.tick(), Tick(2));
}

#[test]
fn restart_rewinds_to_zero() {
    let mut c = AnimationClock::new();
    c.start();
    for _ in 0..10 {
        c.advance();
    }
    c.start();
    assert_eq!(c.tick(), Tick(0));
}

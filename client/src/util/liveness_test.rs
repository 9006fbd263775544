use super::*;

#[test]
fn new_flag_is_alive() {
    assert!(Liveness::new().is_alive());
    assert!(Liveness::default().is_alive());
}

#[test]
fn kill_is_seen_by_every_clone() {
    let flag = Liveness::new();
    let captured = flag.clone();
    flag.kill();
    assert!(!captured.is_alive());
    assert!(!flag.is_alive());
}

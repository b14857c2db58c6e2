use super::*;

fn animator() -> TransitionAnimator {
    TransitionAnimator::new(DeckConfig::default())
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn drag_follows_pointer_with_linear_tilt_and_one_sided_overlay() {
    let mut card = animator();
    let start = card.gesture_start();
    assert_eq!(start.phase, AnimationPhase::Dragging);
    assert_eq!(
        start.signals[0],
        Some(AnimatorSignal::PhaseChanged {
            from: AnimationPhase::Idle,
            to: AnimationPhase::Dragging,
        })
    );

    let right = card.gesture_move(Displacement::new(75.0, 12.0));
    assert!(approx(right.transform.translate_x, 75.0));
    assert!(approx(right.transform.translate_y, 12.0));
    assert!(approx(right.transform.rotation_deg, 7.5));
    assert!(approx(right.transform.like_opacity, 0.5));
    assert!(approx(right.transform.pass_opacity, 0.0));

    let far_left = card.gesture_move(Displacement::new(-450.0, 0.0));
    assert!(approx(far_left.transform.rotation_deg, -30.0));
    assert!(approx(far_left.transform.pass_opacity, 1.0));
    assert!(approx(far_left.transform.like_opacity, 0.0));
}

#[test]
fn cancel_settles_back_to_origin_and_returns_idle() {
    let mut card = animator();
    card.gesture_start();
    card.gesture_move(Displacement::new(40.0, 8.0));

    let release = card.release(1_000, Displacement::new(40.0, 8.0), Decision::Cancel);
    assert_eq!(release.phase, AnimationPhase::SettlingBack);

    let mid = card.frame(1_100);
    assert_eq!(mid.phase, AnimationPhase::SettlingBack);
    assert!(mid.transform.translate_x > 0.0 && mid.transform.translate_x < 40.0);
    assert!(mid.completed().is_none());

    let done = card.frame(1_200);
    assert_eq!(done.completed(), Some(AnimationPhase::SettlingBack));
    assert_eq!(done.phase, AnimationPhase::Idle);
    assert_eq!(done.transform, CardTransform::IDENTITY);
}

#[test]
fn like_exits_right_holding_vertical_offset() {
    let mut card = animator();
    card.gesture_start();
    card.gesture_move(Displacement::new(150.0, -20.0));

    let release = card.release(0, Displacement::new(150.0, -20.0), Decision::Like);
    assert_eq!(release.phase, AnimationPhase::ExitingRight);

    let done = card.frame(250);
    assert_eq!(done.completed(), Some(AnimationPhase::ExitingRight));
    assert!(approx(done.transform.translate_x, 500.0));
    assert!(approx(done.transform.translate_y, -20.0));
    assert_eq!(done.phase, AnimationPhase::ExitingRight);

    let reset = card.reset();
    assert_eq!(reset.phase, AnimationPhase::Idle);
    assert_eq!(reset.transform, CardTransform::IDENTITY);
}

#[test]
fn pass_exit_completes_on_external_callback() {
    let mut card = animator();
    card.gesture_start();
    card.release(10, Displacement::new(-200.0, 0.0), Decision::Pass);
    assert_eq!(card.phase(), AnimationPhase::ExitingLeft);

    let done = card.complete();
    assert_eq!(done.completed(), Some(AnimationPhase::ExitingLeft));
    assert!(approx(done.transform.translate_x, -500.0));

    // A second completion is not reported twice.
    assert!(card.complete().completed().is_none());
    assert!(card.frame(10_000).completed().is_none());
}

#[test]
fn gesture_start_preempts_settle_from_live_position() {
    let mut card = animator();
    card.gesture_start();
    card.release(0, Displacement::new(80.0, 20.0), Decision::Cancel);

    let mid = card.frame(50);
    let live = mid.transform.position();
    assert!(live.dx > 0.0 && live.dx < 80.0);

    let preempted = card.gesture_start();
    assert_eq!(preempted.phase, AnimationPhase::Dragging);
    assert!(approx(preempted.transform.translate_x, live.dx));
    assert!(approx(preempted.transform.translate_y, live.dy));

    let moved = card.gesture_move(Displacement::new(10.0, 0.0));
    assert!(approx(moved.transform.translate_x, live.dx + 10.0));
    assert!(approx(moved.transform.translate_y, live.dy));

    // The abandoned settle never reports completion.
    assert!(card.frame(10_000).completed().is_none());
}

#[test]
fn gesture_start_during_exit_is_ignored() {
    let mut card = animator();
    card.gesture_start();
    card.release(0, Displacement::new(300.0, 0.0), Decision::Like);
    card.frame(100);

    let ignored = card.gesture_start();
    assert_eq!(ignored.phase, AnimationPhase::ExitingRight);
    assert!(ignored.signals.iter().all(Option::is_none));

    assert_eq!(card.frame(250).completed(), Some(AnimationPhase::ExitingRight));
}

#[test]
fn release_without_drag_still_animates_from_released_offset() {
    let mut card = animator();
    let out = card.release(0, Displacement::new(-130.0, 5.0), Decision::Pass);
    assert_eq!(out.phase, AnimationPhase::ExitingLeft);
    assert!(approx(out.transform.translate_x, -130.0));
}

#[test]
fn reset_mid_exit_drops_motion() {
    let mut card = animator();
    card.gesture_start();
    card.release(0, Displacement::new(200.0, 0.0), Decision::Like);
    card.frame(100);

    let reset = card.reset();
    assert_eq!(reset.phase, AnimationPhase::Idle);
    assert!(card.frame(1_000).completed().is_none());
    assert_eq!(card.transform(), CardTransform::IDENTITY);
}

use cadenza::{
    AnimationBuilder, Color, ElementId, ManualTimeSource, OnCancel, Point, PulseOptions, Scene,
    ScenarioPreset, Vec2, pulse, scenario,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn ball() -> (Scene, ManualTimeSource, ElementId) {
    let (mut scene, time) = Scene::manual();
    let id = scene.add_element("ball");
    (scene, time, id)
}

fn pos(scene: &Scene, id: ElementId) -> Vec2 {
    scene.element(id).unwrap().position()
}

fn drawn_x(scene: &Scene, id: ElementId, i: usize) -> f64 {
    (scene.draw_transforms(id)[i] * Point::new(1.0, 0.0)).x
}

#[test]
fn scenario_moves_at_the_default_velocity() {
    let (mut scene, time, ball) = ball();
    scene
        .save_scenario(ball, "corner", ScenarioPreset::default().with_position(2.0, 0.0))
        .unwrap();
    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("corner")))
        .unwrap();
    // Two units at the default one unit per second.
    assert_eq!(scene.animations(ball).unwrap().remaining_time(0.0), Some(2.0));

    time.set(1.0);
    scene.next_frame();
    assert!(close(pos(&scene, ball).x, 1.0));

    time.set(2.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(2.0, 0.0));
    assert!(!scene.is_animating(ball));
}

#[test]
fn scenario_can_start_from_another_preset() {
    let (mut scene, time, ball) = ball();
    scene
        .save_scenario(ball, "start", ScenarioPreset::default().with_position(1.0, 0.0))
        .unwrap();
    scene
        .save_scenario(ball, "end", ScenarioPreset::default().with_position(3.0, 0.0))
        .unwrap();
    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("end").from("start")))
        .unwrap();

    // Delta is two units from the base preset, not three from the element.
    time.set(1.0);
    scene.next_frame();
    assert!(close(pos(&scene, ball).x, 2.0));
    time.set(2.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(3.0, 0.0));
}

#[test]
fn scenario_animates_color() {
    let (mut scene, time, ball) = ball();
    scene
        .save_scenario(ball, "lit", ScenarioPreset::default().with_color(Color::WHITE))
        .unwrap();
    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("lit")))
        .unwrap();
    // Channel delta 1.0 at 0.8 per second.
    time.set(1.25);
    scene.next_frame();
    assert_eq!(scene.element(ball).unwrap().color(), Color::WHITE);
    assert!(!scene.is_animating(ball));
}

#[test]
fn hiding_scenario_dissolves_out_with_uniform_duration() {
    let (mut scene, time, ball) = ball();
    scene
        .save_scenario(
            ball,
            "away",
            ScenarioPreset::default().with_position(2.0, 0.0).shown(false),
        )
        .unwrap();
    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("away").uniform_duration()))
        .unwrap();

    // The dissolve is stretched to the transform's two seconds.
    time.set(1.0);
    scene.next_frame();
    let el = scene.element(ball).unwrap();
    assert!(el.is_shown());
    assert!(close(el.opacity(), 0.5005));
    assert!(close(el.position().x, 1.0));

    time.set(2.0);
    scene.next_frame();
    let el = scene.element(ball).unwrap();
    assert!(!el.is_shown());
    assert_eq!(el.opacity(), 1.0);
    assert_eq!(el.position(), Vec2::new(2.0, 0.0));
}

#[test]
fn unknown_scenario_finishes_instantly() {
    let (mut scene, _time, ball) = ball();
    let before = pos(&scene, ball);
    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("nope")))
        .unwrap();
    assert!(!scene.is_animating(ball));
    assert_eq!(pos(&scene, ball), before);
}

#[test]
fn captured_scenario_round_trips_the_pose() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_position(Vec2::new(3.0, 0.0));
    scene.capture_scenario(ball, "here").unwrap();
    scene.element_mut(ball).unwrap().set_position(Vec2::ZERO);

    scene
        .play(AnimationBuilder::new(ball).scenario(scenario("here")))
        .unwrap();
    time.set(3.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(3.0, 0.0));
    assert!(!scene.is_animating(ball));
}

#[test]
fn pulse_scales_the_draw_transforms() {
    let (mut scene, time, ball) = ball();
    scene
        .play(AnimationBuilder::new(ball).pulse(pulse().magnitude(2.0)))
        .unwrap();

    // Single thump: peak scale at the halfway point.
    time.set(0.5);
    scene.next_frame();
    assert_eq!(scene.draw_transforms(ball).len(), 1);
    assert!(close(drawn_x(&scene, ball, 0), 2.0));

    // Back to scale one and cleared at the natural end.
    time.set(1.0);
    scene.next_frame();
    assert_eq!(scene.draw_transforms(ball).len(), 1);
    assert!(close(drawn_x(&scene, ball, 0), 1.0));
    assert!(!scene.is_animating(ball));
}

#[test]
fn pulse_copies_spread_the_scale() {
    let (mut scene, time, ball) = ball();
    scene
        .play(AnimationBuilder::new(ball).pulse(pulse().magnitude(2.0).copies(2)))
        .unwrap();
    time.set(0.5);
    scene.next_frame();
    let transforms = scene.draw_transforms(ball);
    assert_eq!(transforms.len(), 2);
    assert!(close((transforms[0] * Point::new(1.0, 0.0)).x, 1.5));
    assert!(close((transforms[1] * Point::new(1.0, 0.0)).x, 2.0));
}

#[test]
fn pulse_uses_the_element_defaults() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_pulse(PulseOptions {
        duration: 2.0,
        magnitude: 3.0,
        frequency: None,
        copies: 1,
    });
    scene
        .play(AnimationBuilder::new(ball).pulse(pulse()))
        .unwrap();

    time.set(1.0);
    scene.next_frame();
    assert!(close(drawn_x(&scene, ball, 0), 3.0));

    time.set(2.0);
    scene.next_frame();
    assert!(!scene.is_animating(ball));
    assert!(close(drawn_x(&scene, ball, 0), 1.0));
}

#[test]
fn frozen_pulse_keeps_its_overlays_until_cleared() {
    let (mut scene, time, ball) = ball();
    scene.play(AnimationBuilder::new(ball).pulse(pulse())).unwrap();
    time.set(0.5);
    scene.next_frame();

    scene
        .cancel_animations(ball, None, Some(OnCancel::Freeze))
        .unwrap();
    assert!(!scene.is_animating(ball));
    // Default magnitude 1.5 at the peak.
    assert!(close(drawn_x(&scene, ball, 0), 1.5));

    scene.element_mut(ball).unwrap().clear_pulse_transforms();
    assert!(close(drawn_x(&scene, ball, 0), 1.0));
}

#[test]
fn pulse_batch_covers_multiple_elements() {
    let (mut scene, time) = Scene::manual();
    let a = scene.add_element("a");
    let b = scene.add_element("b");
    scene
        .play(AnimationBuilder::new(a).pulse(pulse().magnitude(2.0).and_element(b)))
        .unwrap();
    time.set(0.5);
    scene.next_frame();
    assert!(close(drawn_x(&scene, a, 0), 2.0));
    assert!(close(drawn_x(&scene, b, 0), 2.0));
}

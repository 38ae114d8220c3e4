use std::cell::{Cell, RefCell};
use std::f64::consts::PI;
use std::rc::Rc;

use cadenza::{
    AnimationBuilder, Color, ElementId, ManualTimeSource, OnCancel, Progression, RotationDirection,
    Scene, StartTime, StepState, Transform, Vec2, custom, delay, dim, dissolve_in, dissolve_out,
    parallel, position, rotation, transform, undim,
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

#[test]
fn velocity_derives_duration_and_lands_exactly() {
    let (mut scene, time, ball) = ball();
    scene
        .play(AnimationBuilder::new(ball).position(position().to(4.0, 0.0).velocity(2.0)))
        .unwrap();
    // 4 units at 2 units/s.
    assert_eq!(scene.animations(ball).unwrap().remaining_time(0.0), Some(2.0));

    time.set(1.0);
    scene.next_frame();
    assert!(close(pos(&scene, ball).x, 2.0));

    time.set(2.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(4.0, 0.0));
    assert!(!scene.is_animating(ball));
}

#[test]
fn offset_resolves_against_the_current_position() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_position(Vec2::new(1.0, 1.0));
    scene
        .play(AnimationBuilder::new(ball).position(position().by(2.0, 0.0)))
        .unwrap();
    time.set(1.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(3.0, 1.0));
}

#[test]
fn delayed_step_holds_then_runs() {
    let (mut scene, time, ball) = ball();
    scene
        .add_animation(
            ball,
            position().to(1.0, 0.0).step(ball).with_delay(1.0).with_duration(1.0),
        )
        .unwrap();
    scene.start_animations(ball, None, StartTime::At(0.0)).unwrap();

    time.set(0.5);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(0.0, 0.0));

    time.set(1.5);
    scene.next_frame();
    assert!(close(pos(&scene, ball).x, 0.5));

    time.set(2.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball), Vec2::new(1.0, 0.0));
    assert!(!scene.is_animating(ball));
}

#[test]
fn easing_shapes_the_progress() {
    let (mut scene, time, ball) = ball();
    scene
        .add_animation(
            ball,
            position().to(1.0, 0.0).step(ball).ease(Progression::EaseIn),
        )
        .unwrap();
    scene.start_animations(ball, None, StartTime::At(0.0)).unwrap();
    time.set(0.5);
    scene.next_frame();
    assert!(close(pos(&scene, ball).x, 0.25));
    time.set(1.0);
    scene.next_frame();
    assert_eq!(pos(&scene, ball).x, 1.0);
}

#[test]
fn rotation_takes_the_shortest_path_by_default() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_rotation(0.1);
    scene
        .play(AnimationBuilder::new(ball).rotation(rotation().to(2.0 * PI - 0.1)))
        .unwrap();
    time.set(0.5);
    scene.next_frame();
    // Shortest delta is -0.2, so halfway lands at zero.
    assert!(close(scene.element(ball).unwrap().rotation(), 0.0));
    time.set(1.0);
    scene.next_frame();
    assert!(close(scene.element(ball).unwrap().rotation(), 2.0 * PI - 0.1));
}

#[test]
fn rotation_direction_preference_is_honored() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_rotation(0.1);
    scene
        .play(AnimationBuilder::new(ball).rotation(
            rotation().to(2.0 * PI - 0.1).direction(RotationDirection::CounterClockwise),
        ))
        .unwrap();
    time.set(0.5);
    scene.next_frame();
    assert!(close(scene.element(ball).unwrap().rotation(), PI));
}

#[test]
fn mismatched_transform_shapes_finish_immediately() {
    let (mut scene, _time, ball) = ball();
    let before = scene.element(ball).unwrap().transform().clone();
    // Element carries a scale-rotate-translate transform; a bare translation
    // is not congruent with it.
    scene
        .play(
            AnimationBuilder::new(ball)
                .transform(transform().to(Transform::identity().translated(1.0, 0.0))),
        )
        .unwrap();
    assert!(!scene.is_animating(ball));
    assert_eq!(scene.element(ball).unwrap().transform(), &before);
}

#[test]
fn dissolve_in_shows_and_fades_up() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().hide();
    scene
        .play(AnimationBuilder::new(ball).opacity(dissolve_in()))
        .unwrap();
    // Resolution already made the element visible at the sentinel alpha.
    assert!(scene.element(ball).unwrap().is_shown());
    assert!(close(scene.element(ball).unwrap().opacity(), 0.001));

    time.set(0.5);
    scene.next_frame();
    assert!(close(scene.element(ball).unwrap().opacity(), 0.5005));

    time.set(1.0);
    scene.next_frame();
    assert_eq!(scene.element(ball).unwrap().opacity(), 1.0);
    assert!(!scene.is_animating(ball));
}

#[test]
fn dissolve_out_hides_and_restores_opacity() {
    let (mut scene, time, ball) = ball();
    scene
        .play(AnimationBuilder::new(ball).opacity(dissolve_out()))
        .unwrap();
    time.set(0.5);
    scene.next_frame();
    assert!(close(scene.element(ball).unwrap().opacity(), 0.5005));

    time.set(1.0);
    scene.next_frame();
    let el = scene.element(ball).unwrap();
    assert!(!el.is_shown());
    // Full opacity restored so a later plain show is not invisibly faded.
    assert_eq!(el.opacity(), 1.0);
}

#[test]
fn dim_and_undim_resolve_against_element_colors() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_color(Color::WHITE, true);

    scene.play(AnimationBuilder::new(ball).color(dim())).unwrap();
    time.set(1.0);
    scene.next_frame();
    assert_eq!(
        scene.element(ball).unwrap().color(),
        Color::rgba(0.5, 0.5, 0.5, 1.0)
    );

    scene.play(AnimationBuilder::new(ball).color(undim())).unwrap();
    time.set(2.0);
    scene.next_frame();
    assert_eq!(scene.element(ball).unwrap().color(), Color::WHITE);
}

#[test]
fn color_velocity_sets_the_duration() {
    let (mut scene, time, ball) = ball();
    scene.element_mut(ball).unwrap().set_color(Color::WHITE, true);
    scene
        .play(AnimationBuilder::new(ball).color(cadenza::color().to(Color::BLACK).velocity(0.5)))
        .unwrap();
    // Largest channel delta is 1.0, so the tween takes two seconds.
    time.set(1.0);
    scene.next_frame();
    assert_eq!(
        scene.element(ball).unwrap().color(),
        Color::rgba(0.5, 0.5, 0.5, 1.0)
    );
    time.set(2.0);
    scene.next_frame();
    assert_eq!(scene.element(ball).unwrap().color(), Color::BLACK);
}

#[test]
fn color_can_become_the_new_default() {
    let (mut scene, time, ball) = ball();
    let red = Color::rgb(1.0, 0.0, 0.0);
    scene
        .play(AnimationBuilder::new(ball).color(cadenza::color().to(red).and_set_default()))
        .unwrap();
    time.set(1.0);
    scene.next_frame();
    assert_eq!(scene.element(ball).unwrap().default_color(), red);
}

#[test]
fn custom_step_can_stop_early() {
    let (mut scene, time, ball) = ball();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    scene
        .play(AnimationBuilder::new(ball).custom(move |_, p| {
            log.borrow_mut().push(p);
            p < 0.55
        }))
        .unwrap();

    time.set(0.25);
    scene.next_frame();
    time.set(0.6);
    scene.next_frame();
    assert!(!scene.is_animating(ball));
    // The stopping frame is followed by one completion call at 1.0.
    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert!(close(seen[0], 0.25));
    assert!(close(seen[1], 0.6));
    assert_eq!(seen[2], 1.0);
}

#[test]
fn indefinite_custom_runs_until_cancelled() {
    let (mut scene, time, ball) = ball();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    scene
        .add_animation(
            ball,
            custom(move |_, elapsed| {
                log.borrow_mut().push(elapsed);
                true
            })
            .indefinite()
            .named("forever"),
        )
        .unwrap();
    scene
        .start_animations(ball, Some("forever"), StartTime::At(0.0))
        .unwrap();

    time.set(1.0);
    scene.next_frame();
    time.set(2.5);
    scene.next_frame();
    assert_eq!(scene.animations(ball).unwrap().remaining_time(2.5), None);
    // Indefinite steps see raw elapsed seconds.
    assert_eq!(*seen.borrow(), vec![1.0, 2.5]);

    scene
        .cancel_animations(ball, None, Some(OnCancel::Freeze))
        .unwrap();
    assert!(!scene.is_animating(ball));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn finish_callback_reports_cancellation() {
    let (mut scene, time, ball) = ball();
    let natural = Rc::new(Cell::new(None::<bool>));
    let n = natural.clone();
    scene
        .add_animation(
            ball,
            position()
                .to(1.0, 0.0)
                .step(ball)
                .when_finished(move |_, cancelled| n.set(Some(cancelled))),
        )
        .unwrap();
    scene.start_animations(ball, None, StartTime::At(0.0)).unwrap();
    time.set(1.5);
    scene.next_frame();
    assert_eq!(natural.get(), Some(false));

    let cancelled = Rc::new(Cell::new(None::<bool>));
    let c = cancelled.clone();
    scene
        .add_animation(
            ball,
            position()
                .to(2.0, 0.0)
                .step(ball)
                .when_finished(move |_, was_cancelled| c.set(Some(was_cancelled))),
        )
        .unwrap();
    scene.start_animations(ball, None, StartTime::At(1.5)).unwrap();
    scene.cancel_animations(ball, None, None).unwrap();
    assert_eq!(cancelled.get(), Some(true));
}

#[test]
fn descriptors_snapshot_the_step_tree() {
    let (_scene, _time, ball) = ball();
    let step = AnimationBuilder::new(ball)
        .position(position().to(1.0, 0.0))
        .delay(0.5)
        .build()
        .named("slide");
    let d = step.descriptor();
    assert_eq!(d.kind, "serial");
    assert_eq!(d.name.as_deref(), Some("slide"));
    assert_eq!(d.state, StepState::Idle);
    assert_eq!(d.children.len(), 2);
    assert_eq!(d.children[0].kind, "position");
    assert_eq!(d.children[1].kind, "delay");
    assert_eq!(d.children[1].duration, Some(0.5));

    let v = serde_json::to_value(&d).unwrap();
    assert_eq!(v["kind"], "serial");
    assert_eq!(v["children"][1]["kind"], "delay");
    assert_eq!(v["children"][1]["duration"], 0.5);

    let json = step.descriptor_json().unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&json).unwrap(), v);
}

#[test]
fn total_duration_composes_across_step_trees() {
    let (_scene, _time, ball) = ball();
    let s = AnimationBuilder::new(ball)
        .position(position().to(1.0, 0.0))
        .delay(0.5)
        .rotation(rotation().by(PI))
        .build();
    assert_eq!(s.total_duration(), Some(2.5));

    let p = parallel(vec![delay(1.0), delay(3.0)]);
    assert_eq!(p.total_duration(), Some(3.0));

    let open = parallel(vec![delay(1.0), custom(|_, _| true).indefinite()]);
    assert_eq!(open.total_duration(), None);
}

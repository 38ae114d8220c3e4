use cadenza::{
    AnimationBuilder, ElementId, ManualTimeSource, MovePhase, Point, Rect, Scene, SceneEvent,
    Transform, TransformBounds, Vec2, pulse,
};

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn ball() -> (Scene, ManualTimeSource, ElementId) {
    let (mut scene, time) = Scene::manual();
    let id = scene.add_element("ball");
    (scene, time, id)
}

fn srt(x: f64, y: f64) -> Transform {
    Transform::srt(Vec2::new(1.0, 1.0), 0.0, Vec2::new(x, y))
}

#[test]
fn dotted_paths_reach_nested_elements() {
    let (mut scene, _time) = Scene::manual();
    let fig = scene.add_collection("figure");
    let dot = scene.add_child(fig, "dot").unwrap();
    let inner = scene.add_child_collection(fig, "inner").unwrap();
    let leaf = scene.add_child(inner, "leaf").unwrap();

    assert_eq!(scene.element_by_path("figure.dot"), Some(dot));
    assert_eq!(scene.element_by_path("figure.inner.leaf"), Some(leaf));
    assert_eq!(scene.element_by_path("figure.nope"), None);
    assert_eq!(scene.element_by_path("stray"), None);

    assert_eq!(scene.element(leaf).unwrap().parent(), Some(inner));
    assert_eq!(scene.element(fig).unwrap().children(), &[dot, inner]);
    assert!(scene.element(fig).unwrap().is_collection());
    assert!(!scene.element(dot).unwrap().is_collection());
}

#[test]
fn children_only_attach_to_collections() {
    let (mut scene, _time) = Scene::manual();
    let prim = scene.add_element("prim");
    assert!(scene.add_child(prim, "child").is_err());
    assert!(scene.add_child_collection(prim, "group").is_err());
}

#[test]
fn draw_transforms_compose_down_the_tree() {
    let (mut scene, _time) = Scene::manual();
    let fig = scene.add_collection("figure");
    let dot = scene.add_child(fig, "dot").unwrap();
    scene
        .element_mut(fig)
        .unwrap()
        .set_transform(Transform::srt(Vec2::new(2.0, 2.0), 0.0, Vec2::new(1.0, 0.0)));
    scene.element_mut(dot).unwrap().set_position(Vec2::new(2.0, 0.0));

    let transforms = scene.draw_transforms(dot);
    assert_eq!(transforms.len(), 1);
    // Child origin lands at (2, 0) locally, then (5, 0) through the parent's
    // scale-then-translate.
    let p = transforms[0] * Point::new(0.0, 0.0);
    assert!(close(p.x, 5.0));
    assert!(close(p.y, 0.0));
}

#[test]
fn setters_clip_into_movement_bounds() {
    let (mut scene, _time, ball) = ball();
    scene.element_mut(ball).unwrap().move_options.bounds =
        TransformBounds::unbounded().with_translation(Rect::new(-1.0, -1.0, 1.0, 1.0));
    scene.element_mut(ball).unwrap().set_position(Vec2::new(5.0, 0.5));
    assert_eq!(
        scene.element(ball).unwrap().position(),
        Vec2::new(1.0, 0.5)
    );
}

#[test]
fn drag_velocity_carries_into_free_movement() {
    let (mut scene, time, ball) = ball();
    {
        let el = scene.element_mut(ball).unwrap();
        el.move_options.max_velocity = 20.0;
        el.move_options.freely.zero_velocity_threshold = 0.1;
    }

    scene.start_being_moved(ball).unwrap();
    time.set(0.1);
    scene.moved(ball, srt(1.0, 0.0)).unwrap();
    time.set(0.14);
    scene.stop_being_moved(ball).unwrap();
    // One unit in a tenth of a second: ten units per second.
    assert_eq!(scene.move_phase(ball), Some(MovePhase::MovingFreely));

    let (rest, duration) = scene.free_movement_rest(ball).unwrap();
    assert!(close(duration, 1.98));
    assert!(close(rest.translation().unwrap().x, 10.999));

    // Jump well past the stop instant: the decay coasts to its closed-form
    // endpoint and goes idle.
    time.set(5.0);
    scene.next_frame();
    assert_eq!(scene.move_phase(ball), Some(MovePhase::Idle));
    assert!(close(scene.element(ball).unwrap().position().x, 11.0));
    assert!(
        scene
            .drain_events()
            .contains(&SceneEvent::MovementStopped(ball))
    );
}

#[test]
fn stale_release_stops_dead() {
    let (mut scene, time, ball) = ball();
    scene.start_being_moved(ball).unwrap();
    time.set(0.1);
    scene.moved(ball, srt(1.0, 0.0)).unwrap();
    // The pointer sat still for longer than the stale window before
    // releasing.
    time.set(0.3);
    scene.stop_being_moved(ball).unwrap();
    assert_eq!(scene.move_phase(ball), Some(MovePhase::Idle));
    assert_eq!(scene.element(ball).unwrap().position(), Vec2::new(1.0, 0.0));
    let (_, duration) = scene.free_movement_rest(ball).unwrap();
    assert_eq!(duration, 0.0);
}

#[test]
fn drag_velocity_estimates_are_capped() {
    let (mut scene, time, ball) = ball();
    scene.start_being_moved(ball).unwrap();
    time.set(0.1);
    scene.moved(ball, srt(1.0, 0.0)).unwrap();
    time.set(0.12);
    scene.stop_being_moved(ball).unwrap();
    assert_eq!(scene.move_phase(ball), Some(MovePhase::MovingFreely));

    // Raw estimate was ten units per second; the default cap is five.
    let (_, duration) = scene.free_movement_rest(ball).unwrap();
    assert!(close(duration, (5.0 - 1e-4) / 5.0));
}

#[test]
fn bounded_free_movement_bounces_with_loss() {
    let (mut scene, time, ball) = ball();
    {
        let el = scene.element_mut(ball).unwrap();
        el.move_options.bounds =
            TransformBounds::unbounded().with_translation(Rect::new(-1.0, -1.0, 1.0, 1.0));
        el.move_options.freely.deceleration = 0.0;
        el.set_position(Vec2::new(0.9, 0.0));
    }
    scene
        .start_moving_freely(ball, Some(Transform::srt(Vec2::ZERO, 0.0, Vec2::new(2.0, 0.0))))
        .unwrap();

    time.set(0.5);
    scene.next_frame();
    // Clipped at the wall.
    assert!(close(scene.element(ball).unwrap().position().x, 1.0));

    // Reflected at half speed, so half a unit back in the next half second.
    time.set(1.0);
    scene.next_frame();
    assert!(close(scene.element(ball).unwrap().position().x, 0.5));
    assert_eq!(scene.move_phase(ball), Some(MovePhase::MovingFreely));
}

#[test]
fn taking_manual_control_freezes_animations() {
    let (mut scene, time, ball) = ball();
    scene.play(AnimationBuilder::new(ball).pulse(pulse())).unwrap();
    time.set(0.5);
    scene.next_frame();

    scene.start_being_moved(ball).unwrap();
    assert!(!scene.is_animating(ball));
    assert_eq!(scene.move_phase(ball), Some(MovePhase::BeingMoved));
    // The mid-pulse overlay froze in place.
    let transforms = scene.draw_transforms(ball);
    assert_eq!(transforms.len(), 1);
    assert!(close((transforms[0] * Point::new(1.0, 0.0)).x, 1.5));
}

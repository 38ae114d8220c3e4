use std::collections::BTreeMap;

use kurbo::Vec2;
use smallvec::SmallVec;

use crate::animation::manager::AnimationManager;
use crate::animation::steps::pulse::PulseOptions;
use crate::geometry::color::Color;
use crate::geometry::transform::Transform;
use crate::scene::graph::ElementId;
use crate::scene::movement::{MoveOptions, MovementState};

/// A saved pose: any subset of position, rotation, scale, color and
/// visibility, captured under a name and animatable back to later.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioPreset {
    pub position: Option<Vec2>,
    pub rotation: Option<f64>,
    pub scale: Option<Vec2>,
    pub color: Option<Color>,
    pub is_shown: Option<bool>,
}

impl ScenarioPreset {
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Vec2::new(x, y));
        self
    }

    pub fn with_rotation(mut self, r: f64) -> Self {
        self.rotation = Some(r);
        self
    }

    pub fn with_scale(mut self, s: f64) -> Self {
        self.scale = Some(Vec2::new(s, s));
        self
    }

    pub fn with_color(mut self, c: Color) -> Self {
        self.color = Some(c);
        self
    }

    pub fn shown(mut self, shown: bool) -> Self {
        self.is_shown = Some(shown);
        self
    }
}

/// One node in the scene: a primitive or a collection of children.
///
/// Setters are the single clipping/clamping point; animation steps and
/// movement both write through them, so bounds and channel limits hold no
/// matter who is driving.
pub struct SceneElement {
    pub(crate) name: String,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    pub(crate) is_collection: bool,
    transform: Transform,
    color: Color,
    default_color: Color,
    dim_color: Option<Color>,
    opacity: f64,
    shown: bool,
    pulse: PulseOptions,
    pulse_transforms: SmallVec<[Transform; 2]>,
    frozen_pulse_transforms: SmallVec<[Transform; 2]>,
    scenarios: BTreeMap<String, ScenarioPreset>,
    /// Bounds, velocity cap and free-move tuning for user-driven movement.
    pub move_options: MoveOptions,
    pub(crate) movement: MovementState,
    pub(crate) animations: AnimationManager,
}

impl SceneElement {
    pub(crate) fn new(
        name: String,
        parent: Option<ElementId>,
        is_collection: bool,
        id: ElementId,
    ) -> Self {
        Self {
            name,
            parent,
            children: Vec::new(),
            is_collection,
            transform: Transform::srt(Vec2::new(1.0, 1.0), 0.0, Vec2::ZERO),
            color: Color::default(),
            default_color: Color::default(),
            dim_color: None,
            opacity: 1.0,
            shown: true,
            pulse: PulseOptions::default(),
            pulse_transforms: SmallVec::new(),
            frozen_pulse_transforms: SmallVec::new(),
            scenarios: BTreeMap::new(),
            move_options: MoveOptions::default(),
            movement: MovementState::default(),
            animations: AnimationManager::new(id),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    // Transform channel.

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Set the transform, clipped into the element's movement bounds.
    pub fn set_transform(&mut self, t: Transform) {
        self.transform = self.move_options.bounds.clip(&t);
    }

    pub fn position(&self) -> Vec2 {
        self.transform.translation().unwrap_or(Vec2::ZERO)
    }

    pub fn set_position(&mut self, p: Vec2) {
        let mut t = self.transform.clone();
        t.update_translation(p);
        self.set_transform(t);
    }

    pub fn rotation(&self) -> f64 {
        self.transform.rotation().unwrap_or(0.0)
    }

    pub fn set_rotation(&mut self, r: f64) {
        let mut t = self.transform.clone();
        t.update_rotation(r);
        self.set_transform(t);
    }

    pub fn scale(&self) -> Vec2 {
        self.transform.scale().unwrap_or(Vec2::new(1.0, 1.0))
    }

    pub fn set_scale(&mut self, s: Vec2) {
        let mut t = self.transform.clone();
        t.update_scale(s);
        self.set_transform(t);
    }

    // Color and visibility channels.

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn default_color(&self) -> Color {
        self.default_color
    }

    /// Dim variant of the default color, explicit or derived.
    pub fn dim_color(&self) -> Color {
        self.dim_color.unwrap_or_else(|| self.default_color.dimmed())
    }

    pub fn set_dim_color(&mut self, c: Color) {
        self.dim_color = Some(c.clamped());
    }

    /// Set the current color; with `as_default` the color also becomes the
    /// element's new default (what `undim` returns to).
    pub fn set_color(&mut self, c: Color, as_default: bool) {
        self.color = c.clamped();
        if as_default {
            self.default_color = self.color;
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn set_opacity(&mut self, o: f64) {
        self.opacity = o.clamp(0.0, 1.0);
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn show(&mut self) {
        self.shown = true;
    }

    pub fn hide(&mut self) {
        self.shown = false;
    }

    // Pulse overlays.

    /// The element's default pulse shaping.
    pub fn pulse(&self) -> PulseOptions {
        self.pulse
    }

    pub fn set_pulse(&mut self, options: PulseOptions) {
        self.pulse = options;
    }

    pub(crate) fn set_pulse_transforms(&mut self, overlays: Vec<Transform>) {
        self.pulse_transforms = SmallVec::from_vec(overlays);
    }

    /// Move the live overlays into the frozen set, where they persist until
    /// cleared.
    pub(crate) fn freeze_pulse_transforms(&mut self) {
        let live = std::mem::take(&mut self.pulse_transforms);
        self.frozen_pulse_transforms = live;
    }

    /// Drop both live and frozen overlays.
    pub fn clear_pulse_transforms(&mut self) {
        self.pulse_transforms.clear();
        self.frozen_pulse_transforms.clear();
    }

    /// Frozen overlays first, then live ones.
    pub fn pulse_transforms(&self) -> impl Iterator<Item = &Transform> {
        self.frozen_pulse_transforms
            .iter()
            .chain(self.pulse_transforms.iter())
    }

    // Scenarios.

    pub fn save_scenario(&mut self, name: impl Into<String>, preset: ScenarioPreset) {
        self.scenarios.insert(name.into(), preset);
    }

    /// Save the element's current pose under `name`.
    pub fn capture_scenario(&mut self, name: impl Into<String>) {
        let preset = ScenarioPreset {
            position: Some(self.position()),
            rotation: Some(self.rotation()),
            scale: Some(self.scale()),
            color: Some(self.color),
            is_shown: Some(self.shown),
        };
        self.scenarios.insert(name.into(), preset);
    }

    pub fn scenario(&self, name: &str) -> Option<&ScenarioPreset> {
        self.scenarios.get(name)
    }

    // Animation.

    pub fn animations(&self) -> &AnimationManager {
        &self.animations
    }
}

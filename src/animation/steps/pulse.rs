use std::f64::consts::PI;

use crate::animation::step::{Step, StepCore, StepKind};
use crate::geometry::transform::Transform;
use crate::scene::graph::{ElementId, Scene};

/// Pulse shaping, stored per element as its default and overridable per step.
///
/// A pulse scales the element's draw transform through
/// `1 + (magnitude - 1) * |sin(pi * thumps * p)|`, returning exactly to 1 at
/// the end. `copies` spreads the scale over that many overlay transforms, so
/// an element can be drawn as an expanding stack rather than a single scaled
/// copy.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PulseOptions {
    pub duration: f64,
    pub magnitude: f64,
    /// Thumps per second; `None` means a single thump over the duration.
    pub frequency: Option<f64>,
    pub copies: usize,
}

impl Default for PulseOptions {
    fn default() -> Self {
        Self {
            duration: 1.0,
            magnitude: 1.5,
            frequency: None,
            copies: 1,
        }
    }
}

impl PulseOptions {
    fn merged(self, o: &PulseOverrides) -> Self {
        Self {
            duration: o.duration.unwrap_or(self.duration),
            magnitude: o.magnitude.unwrap_or(self.magnitude),
            frequency: o.frequency.or(self.frequency),
            copies: o.copies.unwrap_or(self.copies),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PulseOverrides {
    pub(crate) duration: Option<f64>,
    pub(crate) magnitude: Option<f64>,
    pub(crate) frequency: Option<f64>,
    pub(crate) copies: Option<usize>,
}

/// Drives one element's pulse overlays for the step's duration.
pub(crate) struct PulseTransformStep {
    element: ElementId,
    overrides: PulseOverrides,
    resolved: Option<PulseOptions>,
}

impl PulseTransformStep {
    pub(crate) fn new(element: ElementId, overrides: PulseOverrides) -> Self {
        Self {
            element,
            overrides,
            resolved: None,
        }
    }

    pub(crate) fn resolve(&mut self, core: &mut StepCore, scene: &mut Scene) {
        let Some(el) = scene.element(self.element) else {
            core.duration = Some(0.0);
            return;
        };
        let options = el.pulse().merged(&self.overrides);
        if core.duration_explicit {
            self.resolved = Some(PulseOptions {
                duration: core.duration.unwrap_or(options.duration),
                ..options
            });
        } else {
            core.duration = Some(options.duration);
            self.resolved = Some(options);
        }
    }

    fn overlays(&self, p: f64) -> Vec<Transform> {
        let Some(opts) = &self.resolved else {
            return Vec::new();
        };
        let thumps = opts
            .frequency
            .map(|f| f * opts.duration)
            .unwrap_or(1.0)
            .max(0.0);
        let s = 1.0 + (opts.magnitude - 1.0) * (PI * thumps * p).sin().abs();
        let copies = opts.copies.max(1);
        (1..=copies)
            .map(|i| {
                let frac = i as f64 / copies as f64;
                let si = 1.0 + (s - 1.0) * frac;
                Transform::identity().scaled(si, si)
            })
            .collect()
    }

    pub(crate) fn set_frame(&mut self, core: &StepCore, scene: &mut Scene, within: f64) {
        if self.resolved.is_none() {
            return;
        }
        let d = core.duration.unwrap_or(0.0);
        let p = if d > 0.0 { (within / d).clamp(0.0, 1.0) } else { 1.0 };
        let overlays = self.overlays(p);
        if let Some(el) = scene.element_mut(self.element) {
            el.set_pulse_transforms(overlays);
        }
    }

    /// Natural or completed end: the profile is back at scale 1, so the
    /// overlays come off entirely.
    pub(crate) fn set_to_end(&mut self, scene: &mut Scene) {
        if let Some(el) = scene.element_mut(self.element) {
            el.clear_pulse_transforms();
        }
    }

    /// Freeze-cancelled: snapshot the current overlays so the element keeps
    /// its pulsed appearance until something clears it.
    pub(crate) fn freeze(&mut self, scene: &mut Scene) {
        if let Some(el) = scene.element_mut(self.element) {
            el.freeze_pulse_transforms();
        }
    }
}

/// One synchronized pulse batch over one or more elements; expands into a
/// parallel group of per-element pulse steps at start time, each using its
/// element's default pulse options under these overrides.
pub(crate) struct PulseStep {
    elements: Vec<ElementId>,
    overrides: PulseOverrides,
}

impl PulseStep {
    pub(crate) fn expand(&mut self, core: &StepCore, _scene: &mut Scene) -> Vec<Step> {
        self.elements
            .iter()
            .map(|&id| {
                let mut child_core = StepCore::new(None);
                if core.duration_explicit {
                    child_core.duration = core.duration;
                    child_core.duration_explicit = true;
                }
                Step::new(
                    child_core,
                    StepKind::PulseTransform(PulseTransformStep::new(id, self.overrides)),
                )
            })
            .collect()
    }
}

/// Pulse one or more elements.
pub fn pulse() -> PulseOpts {
    PulseOpts::default()
}

#[derive(Clone, Debug, Default)]
pub struct PulseOpts {
    overrides: PulseOverrides,
    also: Vec<ElementId>,
}

impl PulseOpts {
    /// Peak scale of the pulse.
    pub fn magnitude(mut self, m: f64) -> Self {
        self.overrides.magnitude = Some(m);
        self
    }

    /// Thumps per second.
    pub fn frequency(mut self, f: f64) -> Self {
        self.overrides.frequency = Some(f);
        self
    }

    /// Number of overlay copies the scale is spread across.
    pub fn copies(mut self, n: usize) -> Self {
        self.overrides.copies = Some(n);
        self
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.overrides.duration = Some(seconds.max(0.0));
        self
    }

    /// Pulse this element in the same batch.
    pub fn and_element(mut self, id: ElementId) -> Self {
        self.also.push(id);
        self
    }

    pub fn step(self, element: ElementId) -> Step {
        let mut elements = vec![element];
        elements.extend(self.also);
        Step::new(
            StepCore::new(None),
            StepKind::Pulse(PulseStep {
                elements,
                overrides: self.overrides,
            }),
        )
    }
}

/// Straight (non-premultiplied) RGBA color with channels in `0..=1`.
///
/// Animations interpolate channels independently, so values live as `f64`
/// until the rendering backend quantizes them.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

/// Alpha sentinel used by dissolve animations instead of exactly zero, so a
/// dissolved-out element keeps a defined color to dissolve back in from.
pub(crate) const DISSOLVE_ALPHA: f64 = 0.001;

impl Color {
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Default dimmed variant: RGB halved, alpha kept.
    pub fn dimmed(self) -> Self {
        Self::rgba(self.r * 0.5, self.g * 0.5, self.b * 0.5, self.a)
    }

    /// Channel-wise difference `other - self` (channels may go negative).
    pub fn delta_to(self, other: Self) -> Self {
        Self::rgba(
            other.r - self.r,
            other.g - self.g,
            other.b - self.b,
            other.a - self.a,
        )
    }

    /// `self + delta * p`, channel-wise. Not clamped; the element setter is
    /// the single clamping point.
    pub fn offset(self, delta: Self, p: f64) -> Self {
        Self::rgba(
            self.r + delta.r * p,
            self.g + delta.g * p,
            self.b + delta.b * p,
            self.a + delta.a * p,
        )
    }

    pub fn clamped(self) -> Self {
        Self::rgba(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Largest channel-wise absolute difference to `other`.
    pub fn max_channel_delta(self, other: Self) -> f64 {
        let d = self.delta_to(other);
        d.r.abs().max(d.g.abs()).max(d.b.abs()).max(d.a.abs())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_by_full_delta_reaches_target() {
        let start = Color::rgba(1.0, 0.0, 0.0, 1.0);
        let target = Color::rgba(0.0, 0.0, 1.0, 1.0);
        let delta = start.delta_to(target);
        assert_eq!(start.offset(delta, 1.0), target);
        assert_eq!(start.offset(delta, 0.0), start);
    }

    #[test]
    fn dimmed_halves_rgb_only() {
        let c = Color::rgba(1.0, 0.5, 0.2, 0.8);
        let d = c.dimmed();
        assert_eq!(d, Color::rgba(0.5, 0.25, 0.1, 0.8));
    }

    #[test]
    fn clamp_bounds_channels() {
        let c = Color::rgba(1.5, -0.25, 0.5, 2.0).clamped();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.5, 1.0));
    }
}

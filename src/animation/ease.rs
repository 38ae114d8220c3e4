use std::sync::Arc;

/// Maps a linear time percent in `0..=1` to an eased completion percent.
///
/// Custom functions must satisfy `f(0) = 0` and `f(1) = 1`; this is required
/// for steps to land exactly on their targets but is not enforced.
#[derive(Clone, Default)]
pub enum Progression {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Custom(Arc<dyn Fn(f64) -> f64>),
}

impl Progression {
    /// Build a custom progression from a closure.
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}

impl std::fmt::Debug for Progression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::EaseIn => write!(f, "EaseIn"),
            Self::EaseOut => write!(f, "EaseOut"),
            Self::EaseInOut => write!(f, "EaseInOut"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_fix_identity_bounds() {
        for p in [
            Progression::Linear,
            Progression::EaseIn,
            Progression::EaseOut,
            Progression::EaseInOut,
        ] {
            assert_eq!(p.apply(0.0), 0.0);
            assert_eq!(p.apply(1.0), 1.0);
        }
    }

    #[test]
    fn ease_in_lags_and_ease_out_leads() {
        assert!(Progression::EaseIn.apply(0.5) < 0.5);
        assert!(Progression::EaseOut.apply(0.5) > 0.5);
        assert_eq!(Progression::EaseInOut.apply(0.5), 0.5);
    }

    #[test]
    fn out_of_range_input_clamps() {
        assert_eq!(Progression::Linear.apply(-0.5), 0.0);
        assert_eq!(Progression::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn custom_progression_applies_closure() {
        let p = Progression::custom(|t| t * t * t);
        assert_eq!(p.apply(0.5), 0.125);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    EaseOutCubic,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` onto the eased curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub threshold: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragConfig {
    pub rotation_max_deg: f32,
    pub rotation_range: f32,
    pub overlay_band: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SettleConfig {
    pub duration_ms: u64,
    pub easing: Easing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExitConfig {
    pub offset: f32,
    pub duration_ms: u64,
    pub easing: Easing,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerConfig {
    pub debounce_down_ms: u64,
    pub debounce_up_ms: u64,
    pub move_deadzone: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeckConfig {
    pub classifier: ClassifierConfig,
    pub drag: DragConfig,
    pub settle: SettleConfig,
    pub exit: ExitConfig,
    pub pointer: PointerConfig,
}

include!(concat!(env!("OUT_DIR"), "/deck_config.rs"));

pub fn active_config() -> &'static DeckConfig {
    &DECK_CONFIG
}

impl Default for DeckConfig {
    fn default() -> Self {
        DECK_CONFIG
    }
}

impl DeckConfig {
    /// `threshold` must be positive and finite, as `deck.toml` validation requires.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        debug_assert!(
            threshold.is_finite() && threshold > 0.0,
            "classifier threshold must be a positive finite number, got {threshold}"
        );
        self.classifier.threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_defaults_match_deck_toml() {
        let config = active_config();
        assert_eq!(config.classifier.threshold, 120.0);
        assert_eq!(config.exit.offset, 500.0);
        assert_eq!(config.exit.duration_ms, 250);
        assert_eq!(config.drag.rotation_max_deg, 30.0);
    }

    #[test]
    fn with_threshold_overrides_only_the_classifier() {
        let config = DeckConfig::default().with_threshold(80.0);
        assert_eq!(config.classifier.threshold, 80.0);
        assert_eq!(config.exit, active_config().exit);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "classifier threshold must be a positive finite number")]
    fn with_threshold_rejects_negative_values() {
        let _ = DeckConfig::default().with_threshold(-50.0);
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [Easing::Linear, Easing::EaseOutCubic] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(4.0), 1.0);
        }
        assert!(Easing::EaseOutCubic.apply(0.5) > Easing::Linear.apply(0.5));
    }
}

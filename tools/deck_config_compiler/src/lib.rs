use std::{fmt, fs, path::Path};

use serde::Deserialize;

const MAX_MOTION_DURATION_MS: u64 = 5_000;
const MAX_DEBOUNCE_MS: u64 = 500;
const MAX_ROTATION_DEG: f32 = 90.0;

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EasingName {
    Linear,
    EaseOutCubic,
}

impl EasingName {
    fn variant(self) -> &'static str {
        match self {
            Self::Linear => "Easing::Linear",
            Self::EaseOutCubic => "Easing::EaseOutCubic",
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeckFile {
    pub classifier: ClassifierSection,
    pub drag: DragSection,
    pub settle: SettleSection,
    pub exit: ExitSection,
    pub pointer: PointerSection,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClassifierSection {
    pub threshold: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DragSection {
    pub rotation_max_deg: f32,
    pub rotation_range: f32,
    pub overlay_band: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SettleSection {
    pub duration_ms: u64,
    pub easing: EasingName,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExitSection {
    pub offset: f32,
    pub duration_ms: u64,
    pub easing: EasingName,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PointerSection {
    pub debounce_down_ms: u64,
    pub debounce_up_ms: u64,
    pub move_deadzone: f32,
}

pub fn parse_deck_str(raw: &str) -> Result<DeckFile, ConfigCompilerError> {
    toml::from_str::<DeckFile>(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn parse_deck_file(path: &Path) -> Result<DeckFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("failed reading {}: {e}", path.display())))?;
    parse_deck_str(&raw)
}

pub fn validate_config(deck: &DeckFile) -> Result<(), ConfigCompilerError> {
    let invalid = |msg: &str| -> Result<(), ConfigCompilerError> {
        Err(ConfigCompilerError::Validation(msg.to_string()))
    };

    let threshold = deck.classifier.threshold;
    if !threshold.is_finite() || threshold <= 0.0 {
        return invalid("classifier.threshold must be a positive finite number");
    }

    let drag = &deck.drag;
    if !drag.rotation_range.is_finite() || drag.rotation_range <= 0.0 {
        return invalid("drag.rotation_range must be > 0");
    }
    if !drag.overlay_band.is_finite() || drag.overlay_band <= 0.0 {
        return invalid("drag.overlay_band must be > 0");
    }
    if !(drag.rotation_max_deg > 0.0 && drag.rotation_max_deg <= MAX_ROTATION_DEG) {
        return invalid("drag.rotation_max_deg must be within (0, 90]");
    }

    for (name, duration_ms) in [
        ("settle.duration_ms", deck.settle.duration_ms),
        ("exit.duration_ms", deck.exit.duration_ms),
    ] {
        if duration_ms == 0 || duration_ms > MAX_MOTION_DURATION_MS {
            return Err(ConfigCompilerError::Validation(format!(
                "{name} must be within 1..={MAX_MOTION_DURATION_MS}"
            )));
        }
    }

    if !deck.exit.offset.is_finite() || deck.exit.offset <= threshold {
        return invalid("exit.offset must be > classifier.threshold");
    }

    let pointer = &deck.pointer;
    if pointer.debounce_down_ms > MAX_DEBOUNCE_MS || pointer.debounce_up_ms > MAX_DEBOUNCE_MS {
        return invalid("pointer debounce windows must be <= 500 ms");
    }
    if !pointer.move_deadzone.is_finite() || pointer.move_deadzone < 0.0 {
        return invalid("pointer.move_deadzone must be >= 0");
    }

    Ok(())
}

pub fn render_generated_config(deck: &DeckFile) -> String {
    let mut out = String::new();
    out.push_str("// @generated by deck_config_compiler from config/deck.toml. Do not edit.\n");
    out.push_str("pub const DECK_CONFIG: DeckConfig = DeckConfig {\n");
    out.push_str(&format!(
        "    classifier: ClassifierConfig {{\n        threshold: {:?},\n    }},\n",
        deck.classifier.threshold
    ));
    out.push_str(&format!(
        "    drag: DragConfig {{\n        rotation_max_deg: {:?},\n        rotation_range: {:?},\n        overlay_band: {:?},\n    }},\n",
        deck.drag.rotation_max_deg, deck.drag.rotation_range, deck.drag.overlay_band
    ));
    out.push_str(&format!(
        "    settle: SettleConfig {{\n        duration_ms: {},\n        easing: {},\n    }},\n",
        deck.settle.duration_ms,
        deck.settle.easing.variant()
    ));
    out.push_str(&format!(
        "    exit: ExitConfig {{\n        offset: {:?},\n        duration_ms: {},\n        easing: {},\n    }},\n",
        deck.exit.offset,
        deck.exit.duration_ms,
        deck.exit.easing.variant()
    ));
    out.push_str(&format!(
        "    pointer: PointerConfig {{\n        debounce_down_ms: {},\n        debounce_up_ms: {},\n        move_deadzone: {:?},\n    }},\n",
        deck.pointer.debounce_down_ms, deck.pointer.debounce_up_ms, deck.pointer.move_deadzone
    ));
    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let deck = parse_deck_file(path)?;
    validate_config(&deck)?;
    Ok(render_generated_config(&deck))
}

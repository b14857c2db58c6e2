// @generated by deck_config_compiler from config/deck.toml. Do not edit.
pub const DECK_CONFIG: DeckConfig = DeckConfig {
    classifier: ClassifierConfig {
        threshold: 120.0,
    },
    drag: DragConfig {
        rotation_max_deg: 30.0,
        rotation_range: 300.0,
        overlay_band: 150.0,
    },
    settle: SettleConfig {
        duration_ms: 200,
        easing: Easing::EaseOutCubic,
    },
    exit: ExitConfig {
        offset: 500.0,
        duration_ms: 250,
        easing: Easing::EaseOutCubic,
    },
    pointer: PointerConfig {
        debounce_down_ms: 30,
        debounce_up_ms: 35,
        move_deadzone: 4.0,
    },
};

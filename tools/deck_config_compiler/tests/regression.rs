use std::{fs, path::PathBuf};

use deck_config_compiler::{
    generate_from_path, parse_deck_file, render_generated_config, validate_config,
    ConfigCompilerError, EasingName,
};

fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("missing tools dir")
        .parent()
        .expect("missing repo root")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn snapshot(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("snapshots")
        .join(name)
}

#[test]
fn default_config_matches_snapshot() {
    let config = repo_root().join("config/deck.toml");
    let actual = generate_from_path(&config).expect("default config should compile");
    let expected = fs::read_to_string(snapshot("default_generated.rs"))
        .expect("missing default snapshot file");

    assert_eq!(
        actual, expected,
        "generated output changed; if intentional, update tools/deck_config_compiler/tests/snapshots/default_generated.rs"
    );
}

#[test]
fn generation_is_deterministic_for_same_input() {
    let config = fixture("valid_default.toml");
    let first = generate_from_path(&config).expect("first generation failed");
    let second = generate_from_path(&config).expect("second generation failed");
    assert_eq!(first, second);
}

#[test]
fn linear_easing_renders_for_both_motions() {
    let path = fixture("valid_linear.toml");
    let deck = parse_deck_file(&path).expect("fixture should parse");
    validate_config(&deck).expect("fixture should validate");
    assert_eq!(deck.settle.easing, EasingName::Linear);
    assert_eq!(deck.exit.easing, EasingName::Linear);

    let rendered = render_generated_config(&deck);
    assert_eq!(rendered.matches("easing: Easing::Linear,").count(), 2);
    assert!(!rendered.contains("EaseOutCubic"));
}

#[test]
fn semantic_validation_rejects_out_of_range_values() {
    let cases = [
        (
            "invalid/zero_threshold.toml",
            "classifier.threshold must be a positive finite number",
        ),
        (
            "invalid/offset_inside_threshold.toml",
            "exit.offset must be > classifier.threshold",
        ),
        (
            "invalid/rotation_too_wide.toml",
            "drag.rotation_max_deg must be within (0, 90]",
        ),
        (
            "invalid/zero_exit_duration.toml",
            "exit.duration_ms must be within 1..=5000",
        ),
        (
            "invalid/long_debounce.toml",
            "pointer debounce windows must be <= 500 ms",
        ),
    ];

    for (fixture_name, expected_msg) in cases {
        let path = fixture(fixture_name);
        let err = generate_from_path(&path).expect_err("fixture should fail validation");
        match err {
            ConfigCompilerError::Validation(msg) => {
                assert!(
                    msg.contains(expected_msg),
                    "expected validation message containing `{expected_msg}`, got `{msg}`"
                );
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}

#[test]
fn parse_errors_are_reported_for_missing_sections() {
    let path = fixture("invalid/missing_pointer.toml");
    let err = generate_from_path(&path).expect_err("fixture should fail parsing");

    match err {
        ConfigCompilerError::Parse(msg) => {
            assert!(
                msg.contains("pointer"),
                "expected parse error mentioning pointer, got `{msg}`"
            );
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let err = generate_from_path(&fixture("does_not_exist.toml")).expect_err("missing file");
    assert!(matches!(err, ConfigCompilerError::Io(_)));
}

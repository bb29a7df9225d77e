/*!
 * Tests for application configuration
 */

use autocaps::app_config::Config;
use autocaps::caption_layout::{Anchor, Platform};

#[test]
fn test_default_config_shouldMatchDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.platform, Platform::YouTube);
    assert_eq!(config.anchor, Anchor::Bottom);
    assert_eq!(config.segmenter.max_chars, 20);
    assert_eq!(config.segmenter.max_duration, 1.3);
    assert_eq!(config.segmenter.max_gap, 1.5);
    assert_eq!(config.style.font, "Montserrat-ExtraBold");
    assert_eq!(config.style.font_size, None);
    assert_eq!(config.style.color, "white");
    assert_eq!(config.style.background_color, "blue");
    assert_eq!(config.style.background_opacity, 0.5);
    assert_eq!(config.output_dir, "output");
}

#[test]
fn test_default_config_shouldValidate() {
    assert!(Config::default().validate().is_ok());
}

/// Every field carries a serde default, so an empty document is a
/// complete configuration.
#[test]
fn test_config_fromEmptyJson_shouldUseDefaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.platform, Platform::YouTube);
    assert_eq!(config.segmenter.max_chars, 20);
}

#[test]
fn test_config_fromPartialJson_shouldOverrideOnlyGivenFields() {
    let config: Config = serde_json::from_str(
        r#"{
            "platform": "tiktok",
            "anchor": "middle",
            "segmenter": {"max_chars": 32},
            "style": {"background_opacity": 0.8}
        }"#,
    )
    .unwrap();

    assert_eq!(config.platform, Platform::TikTok);
    assert_eq!(config.anchor, Anchor::Middle);
    assert_eq!(config.segmenter.max_chars, 32);
    assert_eq!(config.segmenter.max_duration, 1.3);
    assert_eq!(config.style.background_opacity, 0.8);
    assert_eq!(config.style.font, "Montserrat-ExtraBold");
}

#[test]
fn test_config_roundTrip_shouldPreserveValues() {
    let config = Config::default();
    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.platform, config.platform);
    assert_eq!(parsed.anchor, config.anchor);
    assert_eq!(parsed.segmenter, config.segmenter);
    assert_eq!(parsed.style, config.style);
}

#[test]
fn test_validate_withBadOpacity_shouldFail() {
    let mut config = Config::default();
    config.style.background_opacity = 1.5;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroMaxChars_shouldFail() {
    let mut config = Config::default();
    config.segmenter.max_chars = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNegativeMaxGap_shouldFail() {
    let mut config = Config::default();
    config.segmenter.max_gap = -1.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withNonPositiveFontSize_shouldFail() {
    let mut config = Config::default();
    config.style.font_size = Some(0.0);
    assert!(config.validate().is_err());
}

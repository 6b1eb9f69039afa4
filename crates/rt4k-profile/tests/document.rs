#![allow(missing_docs)]

use rt4k_profile::{
    ErrorKind, MergeSource, ProfileDocument, ProfileError, SchemaVersion, Scope, SettingValues,
};
use serde_json::json;

const MASK_ENABLED: &str = "advanced.effects.mask.enabled";
const MASK_STRENGTH: &str = "advanced.effects.mask.strength";
const MASK_PATH: &str = "advanced.effects.mask.path";

fn default_profile() -> ProfileDocument {
    ProfileDocument::new_default(SchemaVersion::V1_4_2).unwrap()
}

fn masked_profile() -> ProfileDocument {
    let mut profile = default_profile();
    profile.set(MASK_ENABLED, 1).unwrap();
    profile.set(MASK_STRENGTH, -4).unwrap();
    profile
        .set(MASK_PATH, "Mono Masks/A Grille Medium Mono.bmp")
        .unwrap();
    profile
}

#[test]
fn test_default_profile_reads_hdmi() {
    let profile = default_profile();
    assert_eq!(profile.get_value("input").unwrap().as_string().unwrap(), "HDMI");
}

#[test]
fn test_mask_strength_minus_four() {
    let mut profile = default_profile();
    profile.set(MASK_STRENGTH, -4).unwrap();
    let strength = profile.get_value(MASK_STRENGTH).unwrap();
    assert_eq!(strength.as_int().unwrap(), -4);
    assert_eq!(strength.bytes(), &[252]);
    assert_eq!(profile.as_bytes()[0x02a0], 252);
}

#[test]
fn test_wrong_header_is_invalid_format() {
    let mut bytes = default_profile().to_bytes();
    bytes[..12].copy_from_slice(b"NOT A PROFIL");
    let err = ProfileDocument::from_bytes(bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(err.to_string().contains("NOT A PROFIL"), "{err}");
}

#[test]
fn test_unknown_setting_is_not_supported() {
    let mut profile = default_profile();
    let err = profile.set("advanced.effects.mask.a_bad_setting", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotSupported);
    let err = profile.get_value("unsupportedSetting").unwrap_err();
    assert_eq!(err.to_string(), "setting not supported: unsupportedSetting");
}

#[test]
fn test_get_values_scopes() {
    let profile = masked_profile();

    let all = profile.get_values(&[]).unwrap();
    assert_eq!(
        all.names().collect::<Vec<_>>(),
        profile.setting_names(),
        "no scopes selects every setting in schema order"
    );

    let scoped = profile
        .get_values(&[
            Scope::prefix("output.transmitter"),
            Scope::pattern(r"^advanced\.effects\.mask\.(enabled|strength)$").unwrap(),
            Scope::predicate(|name| name == "input"),
        ])
        .unwrap();
    assert_eq!(
        scoped.names().collect::<Vec<_>>(),
        vec![
            MASK_ENABLED,
            MASK_STRENGTH,
            "input",
            "output.transmitter.hdr",
            "output.transmitter.colorimetry",
            "output.transmitter.rgb_range",
            "output.transmitter.sync_lock",
            "output.transmitter.vrr",
            "output.transmitter.deep_color",
        ]
    );
}

#[test]
fn test_serialized_default_mask_profile() {
    let profile = masked_profile();
    insta::assert_snapshot!(
        profile.serialize_values(false).unwrap(),
        @r#"{"advanced":{"effects":{"mask":{"enabled":true,"strength":-4,"path":"Mono Masks/A Grille Medium Mono.bmp"}},"acquisition":{"audio_input":{"sampling":{"sample_rate":"48 kHz"},"source":{"input_override":"Off"}}},"system":{"osd_firmware":{"banner_image":{"load_banner":""},"on_screen_display":{"position":"Left","auto_off":"Off","hide_input_res":false,"enable_debug_osd":"Off"}}}},"input":"HDMI","output":{"resolution":"4K60","transmitter":{"hdr":"Off","colorimetry":"Auto-Rec.709","rgb_range":"Full","sync_lock":"Triple Buffer","vrr":"Off","deep_color":false}}}"#
    );
}

#[test]
fn test_pretty_serialization_matches_display() {
    let profile = masked_profile();
    let pretty = profile.serialize_values(true).unwrap();
    assert!(pretty.starts_with("{\n  \"advanced\": {\n    \"effects\""));
    assert_eq!(profile.to_string(), pretty);
    let reparsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
    let compact: serde_json::Value =
        serde_json::from_str(&profile.serialize_values(false).unwrap()).unwrap();
    assert_eq!(reparsed, compact);
}

#[test]
fn test_serialize_then_deserialize_reproduces_values() {
    let mut source = masked_profile();
    source.set("input", "SCART|RGsB").unwrap();
    source.set("output.transmitter.hdr", "HLG [8-bit]").unwrap();
    source
        .set("advanced.system.osd_firmware.on_screen_display.auto_off", "30sec")
        .unwrap();

    let mut target = default_profile();
    target
        .deserialize_values(&source.serialize_values(false).unwrap())
        .unwrap();

    for name in source.setting_names() {
        let expected = source.get_value(name).unwrap();
        let actual = target.get_value(name).unwrap();
        assert!(expected.bytes_equal(&actual), "{name} differs");
    }
}

#[test]
fn test_deserialize_bad_setting() {
    let mut profile = default_profile();
    let before = profile.clone();
    let err = profile
        .deserialize_values(r#"{"advanced":{"effects":{"mask":{"a_bad_setting":false}}}}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Deserialization);
    assert_eq!(profile, before);
}

#[test]
fn test_deserialize_rejects_arrays_and_garbage() {
    let mut profile = default_profile();
    for json in [r#"{"input":["HDMI"]}"#, "[1,2,3]", "{not json", r#"{"input":null}"#] {
        let err = profile.deserialize_values(json).unwrap_err();
        assert!(
            matches!(err, ProfileError::Deserialization { .. }),
            "{json}: {err}"
        );
    }
}

#[test]
fn test_deserialize_huge_number_reports_written_value() {
    let mut profile = default_profile();
    let err = profile
        .deserialize_values(r#"{"advanced":{"effects":{"mask":{"strength":18446744073709551615}}}}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Deserialization);
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert!(cause.contains("18446744073709551615"), "{cause}");
    assert!(!cause.contains("9223372036854775807"), "{cause}");
}

#[test]
fn test_deserialize_partial_is_atomic() {
    let mut profile = default_profile();
    let err = profile
        .deserialize_values(r#"{"input":"RCA|RGsB","output":{"resolution":"8K240"}}"#)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Deserialization);
    assert_eq!(profile.get_value("input").unwrap().as_string().unwrap(), "HDMI");
}

#[test]
fn test_merge_last_source_wins_and_inputs_untouched() {
    let base = default_profile();
    let mut a = default_profile();
    a.set("output.resolution", "1080p60").unwrap();
    a.set(MASK_STRENGTH, 3).unwrap();
    let mut b = default_profile();
    b.set("output.resolution", "1440p120").unwrap();
    let c = json!({"advanced": {"effects": {"mask": {"strength": -7}}}});

    let (a_before, b_before, base_before) = (a.clone(), b.clone(), base.clone());
    let merged = base
        .merge([
            MergeSource::Document(&a),
            MergeSource::Document(&b),
            MergeSource::Tree(&c),
        ])
        .unwrap();

    assert_eq!(
        merged.get_value("output.resolution").unwrap().as_string().unwrap(),
        "1440p120"
    );
    assert_eq!(merged.get_value(MASK_STRENGTH).unwrap().as_int().unwrap(), -7);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
    assert_eq!(base, base_before);
}

#[test]
fn test_merge_values_and_single_value() {
    let source = masked_profile();
    let mask: SettingValues = source
        .get_values(&[Scope::prefix("advanced.effects.mask")])
        .unwrap();
    let mut strength = source.get_value(MASK_STRENGTH).unwrap();
    strength.set(12).unwrap();

    let merged = default_profile()
        .merge([MergeSource::from(&mask), MergeSource::from(&strength)])
        .unwrap();
    assert!(merged.get_value(MASK_ENABLED).unwrap().as_bool());
    assert_eq!(merged.get_value(MASK_STRENGTH).unwrap().as_int().unwrap(), 12);
    assert_eq!(
        merged.get_value(MASK_PATH).unwrap().as_string().unwrap(),
        "Mono Masks/A Grille Medium Mono.bmp"
    );
    assert_eq!(merged.get_value("input").unwrap().as_string().unwrap(), "HDMI");
}

#[test]
fn test_merge_recomputes_derived_audio() {
    let mut scart = default_profile();
    scart.set("input", "SCART|YPbPr").unwrap();
    let merged = default_profile().merge([&scart]).unwrap();
    assert_eq!(merged.get_value("input.audio").unwrap().as_int().unwrap(), 2);
}

#[test]
fn test_crc_written_little_endian() {
    let mut profile = masked_profile();
    let crc = profile.crc();
    profile.write_crc();
    let stored = &profile.as_bytes()[0x20..0x22];
    assert_eq!(stored, &crc.to_le_bytes());
    assert_eq!(profile.crc_string(), format!("0x{crc:04X}"));
    assert_eq!(profile.crc_string().len(), 6);
}

#[test]
fn test_crc_ignores_bytes_before_start() {
    let mut profile = default_profile();
    let before = profile.crc();
    profile.write_crc();
    assert_eq!(profile.crc(), before);
    profile.set(MASK_STRENGTH, 1).unwrap();
    assert_ne!(profile.crc(), before);
}

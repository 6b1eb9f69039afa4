//! Firmware 1.4.2 memory map.

use std::sync::LazyLock;

use crate::descriptor::SettingDescriptor;
use crate::error::{ProfileError, Result};
use crate::schema::{SchemaVersion, SettingsSchema};
use crate::types::{DataType, EnumChoice};
use crate::value::SettingValue;
use crate::{HEADER_MARKER, HEADER_SETTING};

pub const MASK_ENABLED: &str = "advanced.effects.mask.enabled";
pub const MASK_STRENGTH: &str = "advanced.effects.mask.strength";
pub const MASK_PATH: &str = "advanced.effects.mask.path";
pub const AUDIO_SAMPLE_RATE: &str = "advanced.acquisition.audio_input.sampling.sample_rate";
pub const AUDIO_INPUT: &str = "input.audio";
pub const AUDIO_INPUT_OVERRIDE: &str = "advanced.acquisition.audio_input.source.input_override";
pub const LOAD_BANNER: &str = "advanced.system.osd_firmware.banner_image.load_banner";
pub const OSD_POSITION: &str = "advanced.system.osd_firmware.on_screen_display.position";
pub const OSD_AUTO_OFF: &str = "advanced.system.osd_firmware.on_screen_display.auto_off";
pub const OSD_HIDE_INPUT_RES: &str = "advanced.system.osd_firmware.on_screen_display.hide_input_res";
pub const OSD_DEBUG: &str = "advanced.system.osd_firmware.on_screen_display.enable_debug_osd";
pub const INPUT: &str = "input";
pub const OUTPUT_RESOLUTION: &str = "output.resolution";
pub const TX_HDR: &str = "output.transmitter.hdr";
pub const TX_COLORIMETRY: &str = "output.transmitter.colorimetry";
pub const TX_RGB_RANGE: &str = "output.transmitter.rgb_range";
pub const TX_SYNC_LOCK: &str = "output.transmitter.sync_lock";
pub const TX_VRR: &str = "output.transmitter.vrr";
pub const TX_DEEP_COLOR: &str = "output.transmitter.deep_color";

static SCHEMA: LazyLock<SettingsSchema> = LazyLock::new(|| {
    let descriptors = descriptors().expect("built-in 1.4.2 descriptors are valid");
    SettingsSchema::new(SchemaVersion::V1_4_2, descriptors).expect("built-in 1.4.2 schema is valid")
});

/// The shared 1.4.2 schema.
pub fn schema() -> &'static SettingsSchema {
    &SCHEMA
}

fn choices<const N: usize>(entries: [(&str, u8); N]) -> Vec<EnumChoice> {
    entries
        .into_iter()
        .map(|(name, value)| EnumChoice::byte(name, value))
        .collect()
}

fn header(_: &[SettingValue]) -> Result<Vec<u8>> {
    Ok(HEADER_MARKER.as_bytes().to_vec())
}

/// Audio group for the active input.
///
/// With the override off the group follows the input connector; otherwise
/// it is the override's position minus one.
fn audio_input(inputs: &[SettingValue]) -> Result<Vec<u8>> {
    let [input_override, input] = inputs else {
        return Err(ProfileError::validation(
            AUDIO_INPUT,
            format!("{} inputs", inputs.len()),
            "expected input override and input",
        ));
    };
    let override_code = input_override.as_int()?;
    if override_code != 0 {
        let group = u8::try_from(override_code - 1).map_err(|_| {
            ProfileError::validation(AUDIO_INPUT_OVERRIDE, override_code, "no audio group")
        })?;
        return Ok(vec![group]);
    }
    let group = match input.as_int()? {
        0 => 5,
        3 | 4 => 3,
        7..=9 => 0,
        12..=17 => 2,
        20..=27 => 1,
        other => {
            return Err(ProfileError::validation(
                input.name(),
                other,
                "no audio group for input",
            ));
        }
    };
    Ok(vec![group])
}

fn descriptors() -> Result<Vec<SettingDescriptor>> {
    Ok(vec![
        SettingDescriptor::builder(HEADER_SETTING, DataType::String)
            .description("File Header (Read-Only)")
            .range(0x0000, 12)
            .derived_from(&[], header)
            .build()?,
        SettingDescriptor::builder(MASK_ENABLED, DataType::Bit)
            .description("Advanced -> Processing -> Mask -> Enabled")
            .range(0x008c, 1)
            .build()?,
        SettingDescriptor::builder(MASK_STRENGTH, DataType::SignedInt)
            .description("Advanced -> Processing -> Mask -> Strength")
            .range(0x02a0, 1)
            .build()?,
        SettingDescriptor::builder(MASK_PATH, DataType::String)
            .description("Advanced -> Processing -> Mask -> Path")
            .range(0x0090, 256)
            .build()?,
        SettingDescriptor::builder(AUDIO_SAMPLE_RATE, DataType::Enum)
            .description("Advanced -> Acquisition -> Audio Input -> Sampling -> Sample Rate")
            .range(0x1624, 1)
            .choices(choices([("48 kHz", 0), ("96 kHz", 1)]))
            .build()?,
        SettingDescriptor::builder(AUDIO_INPUT, DataType::UnsignedInt)
            .description("Audio Input (Read-Only)")
            .range(0x0368, 1)
            .derived_from(&[AUDIO_INPUT_OVERRIDE, INPUT], audio_input)
            .build()?,
        SettingDescriptor::builder(AUDIO_INPUT_OVERRIDE, DataType::Enum)
            .description("Advanced -> Acquisition -> Audio Input -> Source -> Input Override")
            .range(0x1618, 1)
            .choices(choices([
                ("Off", 0),
                ("RCA", 1),
                ("HD-15", 2),
                ("SCART", 3),
                ("Front", 4),
                ("S/PDIF", 5),
            ]))
            .build()?,
        SettingDescriptor::builder(LOAD_BANNER, DataType::String)
            .description("Advanced -> System -> OSD/Firmware -> Banner Image -> Load Banner")
            .range(0x1644, 256)
            .build()?,
        SettingDescriptor::builder(OSD_POSITION, DataType::Enum)
            .description("Advanced -> System -> OSD/Firmware -> On Screen Display -> Position")
            .range(0x184c, 1)
            .choices(choices([("Left", 0), ("Center", 1), ("Right", 2)]))
            .build()?,
        SettingDescriptor::builder(OSD_AUTO_OFF, DataType::Enum)
            .description("Advanced -> System -> OSD/Firmware -> On Screen Display -> Auto-Off")
            .range(0x1848, 1)
            .choices(std::iter::once(EnumChoice::byte("Off", 0)).chain(
                (1..=10u8).map(|step| EnumChoice::byte(format!("{}sec", u32::from(step) * 10), step)),
            ))
            .build()?,
        SettingDescriptor::builder(OSD_HIDE_INPUT_RES, DataType::Bit)
            .description("Advanced -> System -> OSD/Firmware -> On Screen Display -> Hide Input Res.")
            .range(0x1ef8, 1)
            .build()?,
        SettingDescriptor::builder(OSD_DEBUG, DataType::Enum)
            .description("Advanced -> System -> OSD/Firmware -> On Screen Display -> Enable Debug OSD")
            .range(0x1854, 1)
            .choices(choices([
                ("Off", 0),
                ("Status Pg 1", 1),
                ("Status Pg 2", 2),
                ("Status Pg 3", 3),
                ("Console", 4),
            ]))
            .build()?,
        SettingDescriptor::builder(INPUT, DataType::Enum)
            .description("Input")
            .range(0x5869, 1)
            .choices(choices([
                ("HDMI", 0),
                ("Front|Composite", 3),
                ("Front|S-Video", 4),
                ("RCA|YPbPr", 7),
                ("RCA|RGsB", 8),
                ("RCA|CVBS on Green", 9),
                ("SCART|RGBS (75 Ohm)", 12),
                ("SCART|RGsB", 13),
                ("SCART|YPbPr", 14),
                ("SCART|CVBS on Pin 20", 15),
                ("SCART|CVBS on Green", 16),
                ("SCART|Y/C on Pin 20/Red", 17),
                ("HD-15|RGBHV", 20),
                ("HD-15|RGBS", 21),
                ("HD-15|RGsB", 22),
                ("HD-15|YPbPr", 23),
                ("HD-15|CVBS on Hsync", 24),
                ("HD-15|CVBS on Green", 25),
                ("HD-15|Y/C on Green/Red", 26),
                ("HD-15|Y/C on G/R (Enh.)", 27),
            ]))
            .build()?,
        SettingDescriptor::builder(OUTPUT_RESOLUTION, DataType::Enum)
            .description("HDMI Output -> Resolution")
            .range(0x036c, 1)
            .choices(choices([
                ("4K60", 0),
                ("4K50", 1),
                ("1080p60", 2),
                ("1080p50", 3),
                ("1440p60", 4),
                ("1440p50", 5),
                ("1080p100", 6),
                ("1440p100", 7),
                ("1080p120", 8),
                ("1440p120", 9),
                ("480p60", 13),
                ("Custom 1", 69),
                ("Custom 2", 70),
                ("Custom 3", 71),
                ("Custom 4", 72),
            ]))
            .build()?,
        SettingDescriptor::builder(TX_HDR, DataType::Enum)
            .description("HDMI Output -> Transmitter -> HDR")
            .range(0x02d0, 1)
            .choices(choices([("Off", 0), ("HDR10 [8-bit]", 1), ("HLG [8-bit]", 2)]))
            .build()?,
        SettingDescriptor::builder(TX_COLORIMETRY, DataType::Enum)
            .description("HDMI Output -> Transmitter -> Colorimetry")
            .range(0x1ec8, 1)
            .choices(choices([
                ("Auto-Rec.709", 0),
                ("Rec.709", 1),
                ("Rec.2020", 2),
                ("Adobe RGB", 3),
                ("Display-P3", 4),
            ]))
            .build()?,
        SettingDescriptor::builder(TX_RGB_RANGE, DataType::Enum)
            .description("HDMI Output -> Transmitter -> RGB Range")
            .range(0x1f08, 1)
            .choices(choices([("Full", 0), ("Limited", 1)]))
            .build()?,
        SettingDescriptor::builder(TX_SYNC_LOCK, DataType::Enum)
            .description("HDMI Output -> Transmitter -> Sync Lock")
            .range(0x02d8, 1)
            .choices(choices([("Triple Buffer", 0), ("Gen Lock", 1), ("Frame Lock", 2)]))
            .build()?,
        SettingDescriptor::builder(TX_VRR, DataType::Enum)
            .description("HDMI Output -> Transmitter -> VRR")
            .range(0x02dc, 1)
            .choices(choices([("Off", 0), ("FreeSync", 1), ("VESA", 2)]))
            .build()?,
        SettingDescriptor::builder(TX_DEEP_COLOR, DataType::Bit)
            .description("HDMI Output -> Transmitter -> Deep Color")
            .range(0x02d4, 1)
            .build()?,
    ])
}

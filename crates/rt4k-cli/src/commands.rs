//! Subcommand implementations.
//!
//! Each command returns the text it wants printed so `main` owns stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tracing::{debug, info, info_span};
use walkdir::WalkDir;

use rt4k_profile::constants::PROFILE_EXTENSION;
use rt4k_profile::{MergeSource, ProfileDocument, Scope, WriteOptions};
use rt4k_schema::{DataType, SchemaVersion, SettingInput, SettingsSchema};

use crate::cli::{
    BatchMergeArgs, CrcArgs, ExportArgs, GetArgs, ImportArgs, MergeArgs, SetArgs, ShowArgs,
};

fn load(path: &Path, version: SchemaVersion) -> Result<ProfileDocument> {
    let bytes = rt4k_profile::read_profile_bytes(path)
        .with_context(|| format!("read {}", path.display()))?;
    ProfileDocument::from_bytes_with_version(bytes, version)
        .with_context(|| format!("load profile {}", path.display()))
}

fn save(document: &mut ProfileDocument, path: &Path) -> Result<()> {
    document
        .save(path, WriteOptions::default())
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), crc = %document.crc_string(), "saved profile");
    Ok(())
}

fn prefix_scopes(prefixes: &[String]) -> Vec<Scope> {
    prefixes.iter().map(|prefix| Scope::prefix(prefix.as_str())).collect()
}

fn scoped_json(document: &ProfileDocument, prefixes: &[String], pretty: bool) -> Result<String> {
    let tree = document
        .get_values(&prefix_scopes(prefixes))?
        .as_plain_object()?;
    Ok(if pretty {
        format!("{tree:#}")
    } else {
        tree.to_string()
    })
}

/// Parse `name=value` into a setting input for `schema`.
///
/// Values are passed as text; enum settings additionally accept a numeric
/// choice index when no choice has that name.
pub fn parse_assignment(schema: &SettingsSchema, assignment: &str) -> Result<(String, SettingInput)> {
    let (name, raw) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{assignment}'"))?;
    let name = name.trim();
    let descriptor = schema.get(name)?;
    let input = match raw.trim().parse::<i64>() {
        Ok(index)
            if descriptor.data_type() == DataType::Enum
                && descriptor.choice_by_name(raw).is_none() =>
        {
            SettingInput::Number(index)
        }
        _ => SettingInput::Text(raw.to_string()),
    };
    Ok((name.to_string(), input))
}

pub fn run_show(args: &ShowArgs, version: SchemaVersion) -> Result<String> {
    let document = load(&args.file, version)?;
    scoped_json(&document, &args.scopes, !args.compact)
}

pub fn run_get(args: &GetArgs, version: SchemaVersion) -> Result<String> {
    let document = load(&args.file, version)?;
    let value = document.get_value(&args.name)?;
    Ok(value.as_string()?)
}

pub fn run_set(args: &SetArgs, version: SchemaVersion) -> Result<PathBuf> {
    let mut document = load(&args.file, version)?;
    for assignment in &args.assignments {
        let (name, input) = parse_assignment(document.schema(), assignment)?;
        debug!(setting = %name, value = %input, "setting value");
        document
            .set(&name, input)
            .with_context(|| format!("apply '{assignment}'"))?;
    }
    let output = args.output.clone().unwrap_or_else(|| args.file.clone());
    save(&mut document, &output)?;
    Ok(output)
}

pub fn run_export(args: &ExportArgs, version: SchemaVersion) -> Result<PathBuf> {
    let document = load(&args.file, version)?;
    let json = scoped_json(&document, &args.scopes, true)?;
    if let Some(parent) = args.json.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&args.json, json).with_context(|| format!("write {}", args.json.display()))?;
    info!(path = %args.json.display(), "exported settings");
    Ok(args.json.clone())
}

pub fn run_import(args: &ImportArgs, version: SchemaVersion) -> Result<PathBuf> {
    let mut document = load(&args.file, version)?;
    let json = fs::read_to_string(&args.json)
        .with_context(|| format!("read {}", args.json.display()))?;
    document
        .deserialize_values(&json)
        .with_context(|| format!("apply {}", args.json.display()))?;
    let output = args.output.clone().unwrap_or_else(|| args.file.clone());
    save(&mut document, &output)?;
    Ok(output)
}

pub fn run_merge(args: &MergeArgs, version: SchemaVersion) -> Result<PathBuf> {
    let base = load(&args.base, version)?;
    let scopes = prefix_scopes(&args.scopes);
    let sources = args
        .sources
        .iter()
        .map(|path| {
            let document = load(path, version)?;
            Ok(document.get_values(&scopes)?)
        })
        .collect::<Result<Vec<_>>>()?;
    let mut merged = base.merge(sources.iter().map(MergeSource::Values))?;
    save(&mut merged, &args.output)?;
    Ok(args.output.clone())
}

/// Recursively collect `.rt4` files under `dir`, sorted by path.
///
/// Symlinked directories are not followed.
pub fn find_profiles(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("{} is not a directory", dir.display());
    }
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {}", dir.display()))?;
        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PROFILE_EXTENSION))
        {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

pub fn run_batch_merge(args: &BatchMergeArgs, version: SchemaVersion) -> Result<Vec<PathBuf>> {
    let template = load(&args.template, version)?;
    let values = template.get_values(&prefix_scopes(&args.scopes))?;
    if values.is_empty() {
        bail!("no settings match scopes {:?}", args.scopes);
    }

    let mut written = Vec::new();
    for input in find_profiles(&args.input_dir)? {
        let span = info_span!("profile", path = %input.display());
        let _guard = span.enter();
        let relative = input
            .strip_prefix(&args.input_dir)
            .with_context(|| format!("relativize {}", input.display()))?;
        let output = args.output_dir.join(relative);
        let mut merged = load(&input, version)?.merge([MergeSource::Values(&values)])?;
        save(&mut merged, &output)?;
        written.push(output);
    }
    Ok(written)
}

pub fn run_crc(args: &CrcArgs, version: SchemaVersion) -> Result<String> {
    Ok(load(&args.file, version)?.crc_string())
}

pub fn run_settings(version: SchemaVersion) -> String {
    let schema = SettingsSchema::for_version(version);
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Type", "Valid values", "Description"]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Disabled);
    for descriptor in schema.iter() {
        let data_type = if descriptor.is_read_only() {
            format!("{} (read-only)", descriptor.data_type())
        } else {
            descriptor.data_type().to_string()
        };
        table.add_row(vec![
            descriptor.name().to_string(),
            data_type,
            descriptor.valid_values().join(", "),
            descriptor.description().to_string(),
        ]);
    }
    table.to_string()
}

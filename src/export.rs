//! JSON icon set export.
//!
//! Output shape:
//!
//! ```text
//! {
//!   "prefix": "foo",
//!   "width": 24,
//!   "height": 24,
//!   "icons": { "home": { "body": "..." }, "wide": { "body": "...", "width": 32 } },
//!   "aliases": { "house": { "parent": "home" } }
//! }
//! ```
//!
//! Exporting may rewrite the collection: when it has no prefix and all keys
//! share a leading `segment-` or `segment:`, that segment becomes the
//! collection prefix and is removed from every key.

use crate::collection::Collection;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Hoist the dominant width/height to the top level
    pub optimize: bool,
}

/// One icon in the exported document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconRecord {
    pub body: String,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "dimension")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "dimension")]
    pub height: Option<f64>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotate: u8,

    #[serde(default, skip_serializing_if = "is_false")]
    pub h_flip: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub v_flip: bool,
}

/// Alias entry pointing at an icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasRecord {
    pub parent: String,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub rotate: u8,

    #[serde(default, skip_serializing_if = "is_false")]
    pub h_flip: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub v_flip: bool,
}

/// Exported icon set document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IconSetJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "dimension")]
    pub width: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none", with = "dimension")]
    pub height: Option<f64>,

    pub icons: IndexMap<String, IconRecord>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub aliases: IndexMap<String, AliasRecord>,
}

impl IconSetJson {
    /// Hoist the most frequent width and height to the top level.
    ///
    /// A value is hoisted only when it is strictly more frequent than every
    /// other value; ties leave the dimension on the icons. Previously hoisted
    /// values are expanded first, so optimizing twice changes nothing.
    pub fn optimize(&mut self) {
        self.expand();

        self.width = dominant(self.icons.values().filter_map(|r| r.width));
        if let Some(width) = self.width {
            for record in self.icons.values_mut() {
                if record.width == Some(width) {
                    record.width = None;
                }
            }
        }

        self.height = dominant(self.icons.values().filter_map(|r| r.height));
        if let Some(height) = self.height {
            for record in self.icons.values_mut() {
                if record.height == Some(height) {
                    record.height = None;
                }
            }
        }
    }

    /// Copy top-level width/height back into icons that lack their own
    pub fn expand(&mut self) {
        if let Some(width) = self.width.take() {
            for record in self.icons.values_mut() {
                record.width.get_or_insert(width);
            }
        }
        if let Some(height) = self.height.take() {
            for record in self.icons.values_mut() {
                record.height.get_or_insert(height);
            }
        }
    }

    pub fn to_json_string(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

/// Build the JSON document for a collection.
///
/// When `collection.prefix` is unset and a shared key prefix is found, the
/// collection's keys and prefix are updated in place.
pub fn export_json(collection: &mut Collection, options: &ExportOptions) -> IconSetJson {
    if collection.prefix.is_none() {
        if let Some(prefix) = detect_prefix(collection.keys()) {
            debug!("Detected prefix \"{}\"", prefix);
            collection.strip_key_prefix(prefix.len() + 1);
            collection.prefix = Some(prefix);
        }
    }

    let mut json = IconSetJson {
        prefix: collection.prefix.clone(),
        ..IconSetJson::default()
    };

    for (keyword, icon) in collection.iter() {
        json.icons.insert(
            keyword.to_string(),
            IconRecord {
                body: icon.body().to_string(),
                width: Some(icon.width),
                height: Some(icon.height),
                rotate: icon.rotate % 4,
                h_flip: icon.h_flip,
                v_flip: icon.v_flip,
            },
        );
    }

    for (keyword, icon) in collection.iter() {
        for alias in &icon.aliases {
            if json.icons.contains_key(&alias.name) || json.aliases.contains_key(&alias.name) {
                warn!("Duplicate alias {} for {}", alias.name, keyword);
                continue;
            }
            json.aliases.insert(
                alias.name.clone(),
                AliasRecord {
                    parent: keyword.to_string(),
                    rotate: alias.rotate % 4,
                    h_flip: alias.h_flip,
                    v_flip: alias.v_flip,
                },
            );
        }
    }

    if options.optimize {
        json.optimize();
    }

    json
}

/// Export a collection and persist it through `sink`.
///
/// Resolves with the exact document that was written.
pub async fn export_json_to<S: JsonSink>(
    collection: &mut Collection,
    dest: &Path,
    options: &ExportOptions,
    sink: &S,
) -> Result<IconSetJson, ExportError> {
    let json = export_json(collection, options);
    sink.write(dest, &json).await?;
    Ok(json)
}

/// Persists exported documents
pub trait JsonSink {
    fn write(
        &self,
        dest: &Path,
        json: &IconSetJson,
    ) -> impl Future<Output = Result<(), ExportError>> + Send;
}

/// Writes JSON files, replacing the destination only after a full write
#[derive(Debug, Clone, Copy)]
pub struct FsSink {
    pub pretty: bool,
}

impl Default for FsSink {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonSink for FsSink {
    async fn write(&self, dest: &Path, json: &IconSetJson) -> Result<(), ExportError> {
        let mut content = json.to_json_string(self.pretty)?;
        content.push('\n');

        let temp = temp_path(dest);
        let written = match tokio::fs::write(&temp, content).await {
            Ok(()) => tokio::fs::rename(&temp, dest).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("Wrote {}", dest.display());
        Ok(())
    }
}

fn temp_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icons.json".to_string());
    dest.with_file_name(format!(".{}.tmp", name))
}

/// Leading segment shared by every key, if stripping it keeps keys unique
fn detect_prefix<'a>(keys: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut prefix: Option<&str> = None;
    let mut rest = HashSet::new();

    for key in keys {
        let pos = key.find(|c: char| c == '-' || c == ':')?;
        if pos == 0 || pos + 1 >= key.len() {
            return None;
        }

        let segment = &key[..pos];
        match prefix {
            Some(p) if p != segment => return None,
            _ => prefix = Some(segment),
        }

        if !rest.insert(&key[pos + 1..]) {
            return None;
        }
    }

    prefix.map(str::to_string)
}

/// Value strictly more frequent than any other
fn dominant(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut counts: IndexMap<u64, usize> = IndexMap::new();
    for value in values {
        *counts.entry(value.to_bits()).or_insert(0) += 1;
    }

    let max = counts.values().copied().max()?;
    let mut winners = counts.iter().filter(|(_, c)| **c == max);
    let (bits, _) = winners.next()?;
    if winners.next().is_some() {
        return None;
    }
    Some(f64::from_bits(*bits))
}

fn is_zero(value: &u8) -> bool {
    *value == 0
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Whole numbers serialize as JSON integers (`24`, not `24.0`)
mod dimension {
    use serde::{Deserialize, Deserializer, Serializer};

    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER => {
                serializer.serialize_i64(*v as i64)
            }
            Some(v) => serializer.serialize_f64(*v),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Option::<f64>::deserialize(deserializer)
    }
}

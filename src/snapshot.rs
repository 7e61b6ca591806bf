//! Portable export document.
//!
//! ```json
//! { "vibes": [...], "settings": {...}, "exportDate": "...", "version": "2.0" }
//! ```
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::{vibe::iso_millis, Result, Settings, VibeEntry, VibeError};

/// Version tag written into every export.
pub const SNAPSHOT_VERSION: &str = "2.0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument<'a> {
    vibes: &'a [VibeEntry],
    settings: &'a Settings,
    #[serde(with = "iso_millis")]
    export_date: DateTime<Utc>,
    version: &'static str,
}

/// A parsed import document.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub vibes: Vec<VibeEntry>,
    pub settings: Settings,
    pub export_date: Option<DateTime<Utc>>,
    /// Whatever the document claimed; not validated.
    pub version: Option<String>,
}

/// Renders the whole diary state as a pretty-printed document.
pub fn export_snapshot(entries: &[VibeEntry], settings: &Settings, now: DateTime<Utc>) -> Result<String> {
    let document = SnapshotDocument {
        vibes: entries,
        settings,
        export_date: now,
        version: SNAPSHOT_VERSION,
    };
    let json = serde_json::to_string_pretty(&document)?;
    info!("Exported {} vibe(s)", entries.len());
    Ok(json)
}

/// Parses an import document.
///
/// The document is rejected as a whole if it is not JSON, has no `vibes`
/// array, or any vibe fails to decode. A missing or malformed `settings`
/// object means defaults.
pub fn parse_snapshot(document: &str) -> Result<Snapshot> {
    let mut root: Value = serde_json::from_str(document).map_err(|e| {
        warn!("Import document is not JSON: {}", e);
        VibeError::InvalidFormat {
            message: format!("not a JSON document: {}", e),
        }
    })?;

    let vibes = match root.get_mut("vibes").map(Value::take) {
        Some(vibes @ Value::Array(_)) => vibes,
        Some(_) => {
            return Err(VibeError::InvalidFormat {
                message: "`vibes` is not an array".to_string(),
            })
        }
        None => {
            return Err(VibeError::InvalidFormat {
                message: "missing `vibes` field".to_string(),
            })
        }
    };

    let vibes: Vec<VibeEntry> = serde_json::from_value(vibes).map_err(|e| {
        warn!("Import document holds an undecodable vibe: {}", e);
        VibeError::InvalidFormat {
            message: format!("invalid vibe: {}", e),
        }
    })?;

    let settings = match root.get_mut("settings").map(Value::take) {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("Ignoring malformed settings in import: {}", e);
            Settings::default()
        }),
        _ => Settings::default(),
    };

    let export_date = root
        .get("exportDate")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc));

    let version = root
        .get("version")
        .and_then(Value::as_str)
        .map(str::to_string);

    if version.as_deref() != Some(SNAPSHOT_VERSION) {
        debug!("Importing document with version {:?}", version);
    }

    Ok(Snapshot {
        vibes,
        settings,
        export_date,
        version,
    })
}

/// Default file name for an export made on `date`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("vibe-diary-backup-{}.json", date.format("%Y-%m-%d"))
}

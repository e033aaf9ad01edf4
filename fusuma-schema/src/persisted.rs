use serde::{Deserialize, Serialize};

use crate::{Card, LayoutMode};

/// Current on-disk/on-wire blob version.
pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    #[error("malformed workspace blob: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported workspace blob version: {0}")]
    UnsupportedVersion(u32),
}

fn default_version() -> u32 {
    // Blobs written before versioning carry no version field.
    SCHEMA_VERSION
}

fn default_true() -> bool {
    true
}

/// The part of a workspace that survives across sessions and devices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedWorkspace {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    #[serde(default)]
    pub context_panel_collapsed: bool,
    #[serde(default = "default_true")]
    pub snap_enabled: bool,
    #[serde(default)]
    pub grid_snap_enabled: bool,
    /// Epoch milliseconds of the mutation that produced this blob.
    #[serde(default)]
    pub last_modified: u64,
}

impl Default for PersistedWorkspace {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            cards: Vec::new(),
            layout_mode: LayoutMode::FreeForm,
            context_panel_collapsed: false,
            snap_enabled: true,
            grid_snap_enabled: false,
            last_modified: 0,
        }
    }
}

impl PersistedWorkspace {
    /// An empty blob carries no cards worth keeping.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn to_blob(&self) -> Result<String, BlobError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_blob(blob: &str) -> Result<Self, BlobError> {
        let parsed: PersistedWorkspace = serde_json::from_str(blob)?;
        if parsed.version > SCHEMA_VERSION {
            return Err(BlobError::UnsupportedVersion(parsed.version));
        }
        Ok(parsed)
    }
}

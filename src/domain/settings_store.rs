use crate::domain::settings::{
    GraphViewSettings, InvalidSettingError, PartialGraphViewSettings, Rankdir, RenderType,
};
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Mutex;

/// Fixed, versionless key the settings snapshot lives under.
pub const SETTINGS_KEY: &str = "method-link-graph-setting";

/// Trait for settings persistence backends.
/// Implementations must be thread-safe (Send + Sync).
pub trait SettingsStore: Send + Sync {
    /// Read the persisted snapshot. Never fails: a missing record,
    /// unreadable bytes, or missing fields all fall back to defaults
    /// field-by-field.
    fn load(&self) -> GraphViewSettings;

    /// Write the full snapshot. Must be durable before returning, so a
    /// reload observes the write.
    fn persist(&self, settings: &GraphViewSettings) -> Result<()>;
}

fn decode(bytes: &[u8]) -> GraphViewSettings {
    serde_json::from_slice::<PartialGraphViewSettings>(bytes)
        .map(PartialGraphViewSettings::merge_with_defaults)
        .unwrap_or_default()
}

// ============================================================================
// MemorySettingsStore - In-memory storage for tests and ephemeral sessions
// ============================================================================

#[derive(Default)]
pub struct MemorySettingsStore {
    record: Mutex<Option<Vec<u8>>>,
}

impl MemorySettingsStore {
    /// Seed the store with a raw persisted record, as a reload would see it.
    pub fn with_raw(bytes: &[u8]) -> Self {
        Self {
            record: Mutex::new(Some(bytes.to_vec())),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> GraphViewSettings {
        match self.record.lock() {
            Ok(guard) => guard.as_deref().map(decode).unwrap_or_default(),
            Err(_) => GraphViewSettings::default(),
        }
    }

    fn persist(&self, settings: &GraphViewSettings) -> Result<()> {
        let bytes = serde_json::to_vec(settings).context("Failed to serialize view settings")?;
        let mut guard = self
            .record
            .lock()
            .map_err(|_| anyhow::anyhow!("settings record lock poisoned"))?;
        *guard = Some(bytes);
        Ok(())
    }
}

// ============================================================================
// SledSettingsStore - Durable storage using sled
// ============================================================================

pub struct SledSettingsStore {
    tree: sled::Tree,
}

impl SledSettingsStore {
    pub fn new(path: &Path) -> Result<Self> {
        let db = sled::open(path)
            .with_context(|| format!("Failed to open settings store at {}", path.display()))?;
        let tree = db.open_tree("settings")?;
        Ok(Self { tree })
    }
}

impl SettingsStore for SledSettingsStore {
    fn load(&self) -> GraphViewSettings {
        self.tree
            .get(SETTINGS_KEY.as_bytes())
            .ok()
            .flatten()
            .as_deref()
            .map(decode)
            .unwrap_or_default()
    }

    fn persist(&self, settings: &GraphViewSettings) -> Result<()> {
        let bytes = serde_json::to_vec(settings).context("Failed to serialize view settings")?;
        self.tree
            .insert(SETTINGS_KEY.as_bytes(), bytes)
            .context("Failed to write view settings")?;
        self.tree.flush().context("Failed to flush view settings")?;
        Ok(())
    }
}

// ============================================================================
// GraphViewSettingsStore - mutation handle over a backend
// ============================================================================

/// The live settings handle: current value plus the backend it persists to.
///
/// Every successful mutation writes the full snapshot before the new value is
/// committed, so memory and storage never diverge. Invalid values are
/// rejected with `InvalidSettingError` and leave both untouched.
pub struct GraphViewSettingsStore {
    backend: Box<dyn SettingsStore>,
    current: GraphViewSettings,
}

impl GraphViewSettingsStore {
    pub fn open(backend: Box<dyn SettingsStore>) -> Self {
        let current = backend.load();
        Self { backend, current }
    }

    pub fn current(&self) -> GraphViewSettings {
        self.current
    }

    /// Flip dependency-type label visibility. Returns the new value.
    pub fn toggle_dependency_type(&mut self) -> Result<bool> {
        let mut next = self.current;
        next.show_dependency_type = !next.show_dependency_type;
        self.commit(next)?;
        Ok(self.current.show_dependency_type)
    }

    pub fn set_rankdir(&mut self, value: &str) -> Result<()> {
        let rankdir = Rankdir::parse(value).ok_or_else(|| InvalidSettingError {
            setting: "rankdir",
            value: value.to_string(),
        })?;
        let mut next = self.current;
        next.rankdir = rankdir;
        self.commit(next)
    }

    pub fn set_render_type(&mut self, value: &str) -> Result<()> {
        let render_type = RenderType::parse(value).ok_or_else(|| InvalidSettingError {
            setting: "renderType",
            value: value.to_string(),
        })?;
        let mut next = self.current;
        next.render_type = render_type;
        self.commit(next)
    }

    fn commit(&mut self, next: GraphViewSettings) -> Result<()> {
        self.backend
            .persist(&next)
            .context("Failed to persist view settings")?;
        self.current = next;
        Ok(())
    }
}

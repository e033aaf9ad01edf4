use fusuma_layout::LAYOUT_PADDING;
use fusuma_schema::Size;

pub const GRID_SIZE: u32 = 20;
pub const DEFAULT_BOUNDS: Size = Size {
    width: 1440,
    height: 900,
};

/// Engine tuning knobs.
/// Kept apart from workspace state: none of this is persisted.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key the workspace blob is stored under, locally and remotely.
    pub storage_key: String,
    pub local_debounce_ms: u64,
    pub remote_debounce_ms: u64,
    pub remote_retry_ms: u64,
    pub padding: u32,
    pub grid_size: u32,
    pub initial_bounds: Size,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: "workspace-layout".to_string(),
            local_debounce_ms: 300,
            remote_debounce_ms: 2000,
            remote_retry_ms: 5000,
            padding: LAYOUT_PADDING,
            grid_size: GRID_SIZE,
            initial_bounds: DEFAULT_BOUNDS,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }
}

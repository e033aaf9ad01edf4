pub mod card;
pub mod command;
pub mod geometry;
pub mod mode;
pub mod persisted;

pub use card::{Card, CardId, CardKind, CardMeta, MIN_CARD_HEIGHT, MIN_CARD_SIZE, MIN_CARD_WIDTH};
pub use command::{CardInfo, Command, Response, StateInfo};
pub use geometry::{Point, Rect, Size};
pub use mode::{ActiveMode, LayoutMode, SnapZone};
pub use persisted::{BlobError, PersistedWorkspace, SCHEMA_VERSION};

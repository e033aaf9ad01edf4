use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Point, Rect, Size, SnapZone};

pub const MIN_CARD_WIDTH: u32 = 280;
pub const MIN_CARD_HEIGHT: u32 = 200;

/// Smallest size any card may take on either axis.
pub const MIN_CARD_SIZE: Size = Size {
    width: MIN_CARD_WIDTH,
    height: MIN_CARD_HEIGHT,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardKind {
    Chat,
    AgentMonitor,
    AgentLauncher,
    ImageStudio,
    VideoStudio,
    FileBrowser,
    Settings,
    Profile,
    Terminal,
    Subagent,
    Project,
}

impl CardKind {
    pub const ALL: [CardKind; 11] = [
        CardKind::Chat,
        CardKind::AgentMonitor,
        CardKind::AgentLauncher,
        CardKind::ImageStudio,
        CardKind::VideoStudio,
        CardKind::FileBrowser,
        CardKind::Settings,
        CardKind::Profile,
        CardKind::Terminal,
        CardKind::Subagent,
        CardKind::Project,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CardKind::Chat => "chat",
            CardKind::AgentMonitor => "agent-monitor",
            CardKind::AgentLauncher => "agent-launcher",
            CardKind::ImageStudio => "image-studio",
            CardKind::VideoStudio => "video-studio",
            CardKind::FileBrowser => "file-browser",
            CardKind::Settings => "settings",
            CardKind::Profile => "profile",
            CardKind::Terminal => "terminal",
            CardKind::Subagent => "subagent",
            CardKind::Project => "project",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            CardKind::Chat => "Chat",
            CardKind::AgentMonitor => "Agent Monitor",
            CardKind::AgentLauncher => "Agent Launcher",
            CardKind::ImageStudio => "Image Studio",
            CardKind::VideoStudio => "Video Studio",
            CardKind::FileBrowser => "Files",
            CardKind::Settings => "Settings",
            CardKind::Profile => "Profile",
            CardKind::Terminal => "Terminal",
            CardKind::Subagent => "Subagent",
            CardKind::Project => "Project",
        }
    }

    pub fn default_size(self) -> Size {
        match self {
            CardKind::Chat | CardKind::Subagent => Size::new(600, 700),
            CardKind::AgentMonitor => Size::new(700, 500),
            CardKind::AgentLauncher | CardKind::Profile => Size::new(480, 560),
            CardKind::ImageStudio | CardKind::VideoStudio => Size::new(900, 700),
            CardKind::FileBrowser | CardKind::Project => Size::new(720, 560),
            CardKind::Settings => Size::new(640, 600),
            CardKind::Terminal => Size::new(760, 460),
        }
    }

    /// Empty meta variant for this kind.
    pub fn default_meta(self) -> CardMeta {
        match self {
            CardKind::Chat => CardMeta::Chat { model: None },
            CardKind::AgentMonitor => CardMeta::AgentMonitor { agent_id: None },
            CardKind::AgentLauncher => CardMeta::AgentLauncher { template: None },
            CardKind::ImageStudio => CardMeta::ImageStudio { prompt: None },
            CardKind::VideoStudio => CardMeta::VideoStudio { prompt: None },
            CardKind::FileBrowser => CardMeta::FileBrowser { path: None },
            CardKind::Settings => CardMeta::Settings { section: None },
            CardKind::Profile => CardMeta::Profile,
            CardKind::Terminal => CardMeta::Terminal { cwd: None },
            CardKind::Subagent => CardMeta::Subagent {
                parent_session: None,
            },
            CardKind::Project => CardMeta::Project { root: None },
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown card type: {}", s))
    }
}

/// Per-kind card state. The variant doubles as the card's type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CardMeta {
    Chat {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    AgentMonitor {
        #[serde(default, rename = "agentId", skip_serializing_if = "Option::is_none")]
        agent_id: Option<String>,
    },
    AgentLauncher {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<String>,
    },
    ImageStudio {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
    VideoStudio {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
    FileBrowser {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Settings {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section: Option<String>,
    },
    Profile,
    Terminal {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cwd: Option<String>,
    },
    Subagent {
        #[serde(
            default,
            rename = "parentSession",
            skip_serializing_if = "Option::is_none"
        )]
        parent_session: Option<String>,
    },
    Project {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        root: Option<String>,
    },
}

impl CardMeta {
    pub fn kind(&self) -> CardKind {
        match self {
            CardMeta::Chat { .. } => CardKind::Chat,
            CardMeta::AgentMonitor { .. } => CardKind::AgentMonitor,
            CardMeta::AgentLauncher { .. } => CardKind::AgentLauncher,
            CardMeta::ImageStudio { .. } => CardKind::ImageStudio,
            CardMeta::VideoStudio { .. } => CardKind::VideoStudio,
            CardMeta::FileBrowser { .. } => CardKind::FileBrowser,
            CardMeta::Settings { .. } => CardKind::Settings,
            CardMeta::Profile => CardKind::Profile,
            CardMeta::Terminal { .. } => CardKind::Terminal,
            CardMeta::Subagent { .. } => CardKind::Subagent,
            CardMeta::Project { .. } => CardKind::Project,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(flatten)]
    pub meta: CardMeta,
    pub title: String,
    #[serde(default)]
    pub minimized: bool,
    #[serde(default)]
    pub maximized: bool,
    /// Minimized by focus mode rather than by the user.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub auto_minimized: bool,
    pub position: Point,
    pub size: Size,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_size: Option<Size>,
    #[serde(default)]
    pub z_index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapped_to: Option<SnapZone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
    #[serde(default)]
    pub created_at: u64,
}

impl Card {
    pub fn new(meta: CardMeta, title: String, rect: Rect, created_at: u64) -> Self {
        Self {
            id: CardId::new(),
            meta,
            title,
            minimized: false,
            maximized: false,
            auto_minimized: false,
            position: rect.position(),
            size: rect.size().at_least(MIN_CARD_SIZE),
            saved_position: None,
            saved_size: None,
            z_index: 0,
            snapped_to: None,
            data_id: None,
            created_at,
        }
    }

    pub fn kind(&self) -> CardKind {
        self.meta.kind()
    }

    /// Not minimized; takes part in layouts and topmost computation.
    pub fn is_visible(&self) -> bool {
        !self.minimized
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.position = rect.position();
        self.size = rect.size().at_least(MIN_CARD_SIZE);
    }

    pub fn has_saved_geometry(&self) -> bool {
        self.saved_position.is_some() || self.saved_size.is_some()
    }

    /// Remember the current geometry unless an earlier snapshot is still pending.
    pub fn capture_geometry(&mut self) {
        if self.saved_position.is_none() {
            self.saved_position = Some(self.position);
        }
        if self.saved_size.is_none() {
            self.saved_size = Some(self.size);
        }
    }

    /// Return to the captured geometry and drop the snapshot.
    /// Returns false when nothing was captured.
    pub fn restore_geometry(&mut self) -> bool {
        let had_saved = self.has_saved_geometry();
        if let Some(position) = self.saved_position.take() {
            self.position = position;
        }
        if let Some(size) = self.saved_size.take() {
            self.size = size.at_least(MIN_CARD_SIZE);
        }
        had_saved
    }

    pub fn clear_saved_geometry(&mut self) {
        self.saved_position = None;
        self.saved_size = None;
    }

    pub fn matches_data(&self, kind: CardKind, data_id: &str) -> bool {
        self.kind() == kind && self.data_id.as_deref() == Some(data_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(rect: Rect) -> Card {
        Card::new(CardKind::Chat.default_meta(), "Chat".to_string(), rect, 0)
    }

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in CardKind::ALL {
            assert_eq!(kind.as_str().parse::<CardKind>().unwrap(), kind);
            assert_eq!(kind.default_meta().kind(), kind);
        }
        assert!("window".parse::<CardKind>().is_err());
    }

    #[test]
    fn test_new_card_clamps_to_floor() {
        let card = chat(Rect::new(0, 0, 10, 10));
        assert_eq!(card.size, MIN_CARD_SIZE);
    }

    #[test]
    fn test_capture_geometry_is_idempotent() {
        let mut card = chat(Rect::new(10, 10, 400, 300));
        card.capture_geometry();
        card.position = Point::new(500, 500);
        card.size = Size::new(800, 600);
        card.capture_geometry();

        assert_eq!(card.saved_position, Some(Point::new(10, 10)));
        assert_eq!(card.saved_size, Some(Size::new(400, 300)));
    }

    #[test]
    fn test_restore_geometry() {
        let mut card = chat(Rect::new(10, 10, 400, 300));
        assert!(!card.restore_geometry());

        card.capture_geometry();
        card.set_rect(Rect::new(0, 0, 960, 1080));
        assert!(card.restore_geometry());
        assert_eq!(card.rect(), Rect::new(10, 10, 400, 300));
        assert!(!card.has_saved_geometry());
    }

    #[test]
    fn test_card_serialization_uses_type_tag() {
        let mut card = chat(Rect::new(10, 20, 600, 700));
        card.meta = CardMeta::Chat {
            model: Some("large".to_string()),
        };
        card.data_id = Some("session-1".to_string());
        card.z_index = 3;

        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"type\":\"chat\""));
        assert!(json.contains("\"model\":\"large\""));
        assert!(json.contains("\"dataId\":\"session-1\""));
        assert!(json.contains("\"zIndex\":3"));
        assert!(!json.contains("savedPosition"));
        assert!(!json.contains("autoMinimized"));

        let deserialized: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, card);
    }

    #[test]
    fn test_card_deserializes_unit_meta_variant() {
        let json = r#"{
            "id": "abc",
            "type": "profile",
            "title": "Me",
            "position": {"x": 1, "y": 2},
            "size": {"width": 480, "height": 560}
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.kind(), CardKind::Profile);
        assert_eq!(card.id, CardId::from("abc"));
        assert!(!card.minimized);
        assert_eq!(card.z_index, 0);
    }

    #[test]
    fn test_matches_data() {
        let mut card = chat(Rect::new(0, 0, 600, 700));
        card.data_id = Some("s1".to_string());
        assert!(card.matches_data(CardKind::Chat, "s1"));
        assert!(!card.matches_data(CardKind::Terminal, "s1"));
        assert!(!card.matches_data(CardKind::Chat, "s2"));
    }
}

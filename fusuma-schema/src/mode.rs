use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Auto-arrangement applied to every visible card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    FreeForm,
    SideBySide,
    Tile,
    Stack,
    Focus,
}

impl LayoutMode {
    pub fn as_str(self) -> &'static str {
        match self {
            LayoutMode::FreeForm => "free-form",
            LayoutMode::SideBySide => "side-by-side",
            LayoutMode::Tile => "tile",
            LayoutMode::Stack => "stack",
            LayoutMode::Focus => "focus",
        }
    }

    /// Every mode except free-form reflows cards automatically.
    pub fn is_auto(self) -> bool {
        self != LayoutMode::FreeForm
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free-form" | "free" => Ok(LayoutMode::FreeForm),
            "side-by-side" | "columns" => Ok(LayoutMode::SideBySide),
            "tile" => Ok(LayoutMode::Tile),
            "stack" => Ok(LayoutMode::Stack),
            "focus" => Ok(LayoutMode::Focus),
            _ => Err(format!("unknown layout mode: {}", s)),
        }
    }
}

/// Top-level application area shown around the workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActiveMode {
    #[default]
    Workspace,
    Chat,
    Agents,
    Studio,
    Files,
    Projects,
}

impl FromStr for ActiveMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "workspace" => Ok(ActiveMode::Workspace),
            "chat" => Ok(ActiveMode::Chat),
            "agents" => Ok(ActiveMode::Agents),
            "studio" => Ok(ActiveMode::Studio),
            "files" => Ok(ActiveMode::Files),
            "projects" => Ok(ActiveMode::Projects),
            _ => Err(format!("unknown active mode: {}", s)),
        }
    }
}

/// Edge and corner regions a card can be docked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapZone {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SnapZone {
    pub const ALL: [SnapZone; 8] = [
        SnapZone::Left,
        SnapZone::Right,
        SnapZone::Top,
        SnapZone::Bottom,
        SnapZone::TopLeft,
        SnapZone::TopRight,
        SnapZone::BottomLeft,
        SnapZone::BottomRight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SnapZone::Left => "left",
            SnapZone::Right => "right",
            SnapZone::Top => "top",
            SnapZone::Bottom => "bottom",
            SnapZone::TopLeft => "top-left",
            SnapZone::TopRight => "top-right",
            SnapZone::BottomLeft => "bottom-left",
            SnapZone::BottomRight => "bottom-right",
        }
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            SnapZone::TopLeft | SnapZone::TopRight | SnapZone::BottomLeft | SnapZone::BottomRight
        )
    }
}

impl std::fmt::Display for SnapZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SnapZone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SnapZone::ALL
            .into_iter()
            .find(|z| z.as_str() == s)
            .ok_or_else(|| format!("unknown snap zone: {}", s))
    }
}

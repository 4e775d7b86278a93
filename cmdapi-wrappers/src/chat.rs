//! Chat colours and JSON text components

use serde::{Deserialize, Serialize};

/// A chat colour or formatting code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
    Obfuscated,
    Bold,
    Strikethrough,
    Underline,
    Italic,
    Reset,
}

const COLORS: [ChatColor; 16] = [
    ChatColor::Black,
    ChatColor::DarkBlue,
    ChatColor::DarkGreen,
    ChatColor::DarkAqua,
    ChatColor::DarkRed,
    ChatColor::DarkPurple,
    ChatColor::Gold,
    ChatColor::Gray,
    ChatColor::DarkGray,
    ChatColor::Blue,
    ChatColor::Green,
    ChatColor::Aqua,
    ChatColor::Red,
    ChatColor::LightPurple,
    ChatColor::Yellow,
    ChatColor::White,
];

const FORMATS: [ChatColor; 6] = [
    ChatColor::Obfuscated,
    ChatColor::Bold,
    ChatColor::Strikethrough,
    ChatColor::Underline,
    ChatColor::Italic,
    ChatColor::Reset,
];

impl ChatColor {
    /// Colour for a team colour index (0 black .. 15 white)
    pub fn from_color_index(index: u8) -> Option<Self> {
        COLORS.get(index as usize).copied()
    }

    /// Look up a colour or format by its lowercase name ("dark_red", "bold")
    pub fn from_name(name: &str) -> Option<Self> {
        COLORS
            .iter()
            .chain(FORMATS.iter())
            .copied()
            .find(|c| c.name() == name)
    }

    pub fn is_color(&self) -> bool {
        COLORS.contains(self)
    }

    /// Legacy formatting code character (`§c` → 'c')
    pub fn code(&self) -> char {
        match self {
            Self::Obfuscated => 'k',
            Self::Bold => 'l',
            Self::Strikethrough => 'm',
            Self::Underline => 'n',
            Self::Italic => 'o',
            Self::Reset => 'r',
            color => {
                let index = COLORS.iter().position(|c| c == color).unwrap_or(0);
                std::char::from_digit(index as u32, 16).unwrap_or('0')
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::DarkBlue => "dark_blue",
            Self::DarkGreen => "dark_green",
            Self::DarkAqua => "dark_aqua",
            Self::DarkRed => "dark_red",
            Self::DarkPurple => "dark_purple",
            Self::Gold => "gold",
            Self::Gray => "gray",
            Self::DarkGray => "dark_gray",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Aqua => "aqua",
            Self::Red => "red",
            Self::LightPurple => "light_purple",
            Self::Yellow => "yellow",
            Self::White => "white",
            Self::Obfuscated => "obfuscated",
            Self::Bold => "bold",
            Self::Strikethrough => "strikethrough",
            Self::Underline => "underline",
            Self::Italic => "italic",
            Self::Reset => "reset",
        }
    }
}

/// A rich text component in the host's JSON text format
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatComponent {
    #[serde(default)]
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChatColor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<ChatComponent>,
}

impl ChatComponent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: ChatColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn append(mut self, child: ChatComponent) -> Self {
        self.extra.push(child);
        self
    }

    /// Concatenated text of this component and its children, unstyled
    pub fn plain_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.plain_text());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_lookup() {
        assert_eq!(ChatColor::from_name("dark_red"), Some(ChatColor::DarkRed));
        assert_eq!(ChatColor::from_name("bold"), Some(ChatColor::Bold));
        assert_eq!(ChatColor::from_name("pink"), None);
        assert_eq!(ChatColor::Red.code(), 'c');
        assert_eq!(ChatColor::Bold.code(), 'l');
        assert!(!ChatColor::Reset.is_color());
    }

    #[test]
    fn test_component_from_host_json() {
        let json = serde_json::json!({
            "text": "Hello ",
            "color": "gold",
            "extra": [{"text": "world", "bold": true}]
        });
        let component: ChatComponent = serde_json::from_value(json).unwrap();
        assert_eq!(component.color, Some(ChatColor::Gold));
        assert_eq!(component.plain_text(), "Hello world");
        assert_eq!(component.extra[0].bold, Some(true));
    }
}

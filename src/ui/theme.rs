//! Theme management and ANSI escape sequence generation.
//!
//! Defines the color scheme for the plugin, with two built-in Catppuccin
//! palettes and support for custom themes loaded from TOML files.
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! prompt_border = "#f5c2e7"
//! error_fg = "#f38ba8"
//! hint_fg = "#f9e2af"
//! correct_fg = "#a6e3a1"
//! incorrect_fg = "#f38ba8"
//! loading_fg = "#89b4fa"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements.
///
/// All colors are hex strings (e.g., "#cdd6f4"). The optional header
/// background defaults to `None`, letting themes opt out of it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Header text color.
    pub header_fg: String,
    /// Optional header background color.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Normal text color.
    pub text_normal: String,
    /// Dimmed text color (footer, timestamps).
    pub text_dim: String,

    /// Border and separator line color.
    pub border: String,
    /// Input prompt border color.
    pub prompt_border: String,

    /// Error banner text color.
    pub error_fg: String,
    /// Remediation hint color.
    pub hint_fg: String,

    /// Color of the correct-prediction mark.
    pub correct_fg: String,
    /// Color of the incorrect-prediction mark.
    pub incorrect_fg: String,

    /// Color of the in-flight request indicator.
    pub loading_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Supported names: `catppuccin-mocha`, `catppuccin-latte`. Returns
    /// `None` for anything else.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "catppuccin-mocha" => Some(Self::catppuccin_mocha()),
            "catppuccin-latte" => Some(Self::catppuccin_latte()),
            _ => None,
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML does not
    /// match the expected shape.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read theme file: {e}"))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse theme TOML: {e}"))
    }

    fn catppuccin_mocha() -> Self {
        Self {
            name: "catppuccin-mocha".to_string(),
            colors: ThemeColors {
                header_fg: "#cdd6f4".to_string(),
                header_bg: None,
                text_normal: "#cdd6f4".to_string(),
                text_dim: "#6c7086".to_string(),
                border: "#45475a".to_string(),
                prompt_border: "#f5c2e7".to_string(),
                error_fg: "#f38ba8".to_string(),
                hint_fg: "#f9e2af".to_string(),
                correct_fg: "#a6e3a1".to_string(),
                incorrect_fg: "#f38ba8".to_string(),
                loading_fg: "#89b4fa".to_string(),
            },
        }
    }

    fn catppuccin_latte() -> Self {
        Self {
            name: "catppuccin-latte".to_string(),
            colors: ThemeColors {
                header_fg: "#4c4f69".to_string(),
                header_bg: None,
                text_normal: "#4c4f69".to_string(),
                text_dim: "#9ca0b0".to_string(),
                border: "#bcc0cc".to_string(),
                prompt_border: "#ea76cb".to_string(),
                error_fg: "#d20f39".to_string(),
                hint_fg: "#df8e1d".to_string(),
                correct_fg: "#40a02b".to_string(),
                incorrect_fg: "#d20f39".to_string(),
                loading_fg: "#1e66f5".to_string(),
            },
        }
    }

    /// Converts a hex color to an RGB tuple, falling back to white on any
    /// parse error.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        // Byte indexing below requires char boundaries at every position.
        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// ANSI 24-bit foreground escape sequence for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background escape sequence for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// ANSI bold escape sequence.
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// ANSI reset escape sequence.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_themes_resolve_by_name() {
        assert_eq!(Theme::from_name("catppuccin-mocha").unwrap().name, "catppuccin-mocha");
        assert_eq!(Theme::from_name("catppuccin-latte").unwrap().name, "catppuccin-latte");
        assert!(Theme::from_name("nonexistent").is_none());
    }

    #[test]
    fn custom_theme_loads_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"
name = "custom"

[colors]
header_fg = "#ffffff"
text_normal = "#ffffff"
text_dim = "#888888"
border = "#444444"
prompt_border = "#ff00ff"
error_fg = "#ff0000"
hint_fg = "#ffff00"
correct_fg = "#00ff00"
incorrect_fg = "#ff0000"
loading_fg = "#0000ff"
"##
        )
        .unwrap();

        let theme = Theme::from_file(file.path()).unwrap();
        assert_eq!(theme.name, "custom");
        assert_eq!(theme.colors.correct_fg, "#00ff00");
        assert!(theme.colors.header_bg.is_none());
    }

    #[test]
    fn invalid_hex_falls_back_to_white() {
        assert_eq!(Theme::fg("garbage"), Theme::fg("#ffffff"));
        assert!(Theme::fg("#f38ba8").contains("243;139;168"));
    }

    #[test]
    fn non_ascii_hex_falls_back_to_white() {
        // "€€" is six bytes but two chars; must not panic on byte slicing.
        assert_eq!(Theme::fg("€€"), Theme::fg("#ffffff"));
        assert_eq!(Theme::bg("#€€"), Theme::bg("#ffffff"));
    }
}

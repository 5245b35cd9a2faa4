//! Text styling used by the renderer.

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Styles applied to fragments of rendered output.
///
/// Every method takes plain text and returns it styled. Implementations must
/// not change the visible characters, only wrap them.
pub trait Colors: Send + Sync {
    /// Body text.
    fn standard(&self, text: &str) -> String;
    /// Command names.
    fn bold(&self, text: &str) -> String;
    /// Section headings such as `Usage:`.
    fn underline(&self, text: &str) -> String;
    /// The `error:` prefix.
    fn error(&self, text: &str) -> String;
    /// Offending user input.
    fn warn(&self, text: &str) -> String;
    /// Expected input, such as missing field usages.
    fn highlight(&self, text: &str) -> String;
}

/// ANSI styling through [`colored`].
///
/// Whether escapes are actually emitted follows `colored`'s global switch;
/// see [`ColorChoice::apply`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi;

impl Colors for Ansi {
    fn standard(&self, text: &str) -> String {
        text.to_string()
    }

    fn bold(&self, text: &str) -> String {
        text.bold().to_string()
    }

    fn underline(&self, text: &str) -> String {
        text.bold().underline().to_string()
    }

    fn error(&self, text: &str) -> String {
        text.red().bold().to_string()
    }

    fn warn(&self, text: &str) -> String {
        text.yellow().to_string()
    }

    fn highlight(&self, text: &str) -> String {
        text.green().to_string()
    }
}

/// No styling at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Colors for Plain {
    fn standard(&self, text: &str) -> String {
        text.to_string()
    }

    fn bold(&self, text: &str) -> String {
        text.to_string()
    }

    fn underline(&self, text: &str) -> String {
        text.to_string()
    }

    fn error(&self, text: &str) -> String {
        text.to_string()
    }

    fn warn(&self, text: &str) -> String {
        text.to_string()
    }

    fn highlight(&self, text: &str) -> String {
        text.to_string()
    }
}

/// When to emit ANSI escapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Color when the output is a terminal and `NO_COLOR` is unset.
    #[default]
    Auto,
    /// Always color.
    Always,
    /// Never color.
    Never,
}

impl ColorChoice {
    /// Sets `colored`'s process-wide switch to match this choice.
    ///
    /// `Auto` clears any override so `colored` falls back to its own
    /// environment and terminal detection.
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }

    /// Returns the styling for this choice.
    pub fn colors(self) -> Box<dyn Colors> {
        match self {
            Self::Never => Box::new(Plain),
            Self::Auto | Self::Always => Box::new(Ansi),
        }
    }
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(format!("unknown color choice '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_is_identity() {
        let plain = Plain;
        for styled in [
            plain.standard("x"),
            plain.bold("x"),
            plain.underline("x"),
            plain.error("x"),
            plain.warn("x"),
            plain.highlight("x"),
        ] {
            assert_eq!(styled, "x");
        }
    }

    #[test]
    fn test_ansi_keeps_text() {
        // Escapes depend on the global switch; the text itself never changes.
        assert!(Ansi.error("error:").contains("error:"));
        assert_eq!(Ansi.standard("body"), "body");
    }

    #[test]
    fn test_color_choice_from_str() {
        assert_eq!("AUTO".parse::<ColorChoice>(), Ok(ColorChoice::Auto));
        assert_eq!("never".parse::<ColorChoice>(), Ok(ColorChoice::Never));
        assert!("sometimes".parse::<ColorChoice>().is_err());
    }
}

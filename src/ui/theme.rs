use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for cloudgraph's terminal output
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub info: Style,
    /// Import labels as given by the caller
    pub label: Style,
    pub dim: Style,
    pub muted: Style,
}

impl Theme {
    /// Colored when stdout is a terminal and `console` allows colors
    /// (`NO_COLOR`, `CLICOLOR` and `CLICOLOR_FORCE` are honoured there).
    pub fn detect() -> Self {
        Self::new(console::colors_enabled() && console::Term::stdout().is_term())
    }

    pub fn new(colored: bool) -> Self {
        let pick = |style: Style| if colored { style } else { Style::new() };
        Self {
            header: pick(Style::new().cyan().bold()),
            success: pick(Style::new().green().bold()),
            error: pick(Style::new().red().bold()),
            info: pick(Style::new().magenta()),
            label: pick(Style::new().blue().bold()),
            dim: pick(Style::new().white().dimmed()),
            muted: pick(Style::new().bright_black()),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_adds_no_escapes() {
        let theme = Theme::new(false);
        assert_eq!("Roles".style(theme.label).to_string(), "Roles");
    }

    #[test]
    fn test_colored_theme_styles_labels() {
        let theme = Theme::new(true);
        assert_ne!("Roles".style(theme.label).to_string(), "Roles");
    }
}

use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

const PRIMARY: Color = Color::Indexed(39);
const SECONDARY: Color = Color::Indexed(208);
const SUCCESS: Color = Color::Indexed(82);
const ERROR: Color = Color::Indexed(196);
const MUTED: Color = Color::Indexed(241);
const HIGHLIGHT: Color = Color::Indexed(212);
const NORMAL: Color = Color::Indexed(252);

/// Styles handed to the renderer. Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub label: Style,
    pub selected: Style,
    pub current: Style,
    pub normal: Style,
    pub muted: Style,
    pub error: Style,
    pub success: Style,
    pub warning: Style,
    pub help: Style,
    pub cursor: Style,
    pub active_tab: Style,
    pub inactive_tab: Style,
    pub spinner: Style,
}

impl Default for Theme {
    fn default() -> Theme {
        return Theme {
            title: Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
            label: Style::default().fg(MUTED),
            selected: Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
            current: Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD),
            normal: Style::default().fg(NORMAL),
            muted: Style::default().fg(MUTED),
            error: Style::default().fg(ERROR).add_modifier(Modifier::BOLD),
            success: Style::default().fg(SUCCESS),
            warning: Style::default().fg(SECONDARY),
            help: Style::default().fg(MUTED),
            cursor: Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD),
            active_tab: Style::default()
                .fg(PRIMARY)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            inactive_tab: Style::default().fg(MUTED),
            spinner: Style::default().fg(SECONDARY),
        };
    }
}

impl Theme {
    /// Monochrome variant. Keeps modifiers so the active tab, cursor and
    /// current entries stay distinguishable.
    pub fn plain() -> Theme {
        let bold = Style::default().add_modifier(Modifier::BOLD);

        return Theme {
            title: bold,
            label: Style::default(),
            selected: bold,
            current: bold,
            normal: Style::default(),
            muted: Style::default().add_modifier(Modifier::DIM),
            error: bold,
            success: Style::default(),
            warning: Style::default(),
            help: Style::default().add_modifier(Modifier::DIM),
            cursor: bold,
            active_tab: bold.add_modifier(Modifier::UNDERLINED),
            inactive_tab: Style::default().add_modifier(Modifier::DIM),
            spinner: Style::default(),
        };
    }

    pub fn new(no_color: bool) -> Theme {
        if no_color {
            return Theme::plain();
        }

        return Theme::default();
    }
}

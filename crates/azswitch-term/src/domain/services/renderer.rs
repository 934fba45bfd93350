use std::collections::HashMap;

use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::text::Text;

use super::AppState;
use super::Theme;
use crate::domain::models::Phase;
use crate::domain::models::Subscription;
use crate::domain::models::View;

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;

pub const TITLE: &str = "Azure Account Switcher";
pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const LOADING_LABEL: &str = "Loading…";
const SWITCHING_LABEL: &str = "Switching…";
const CURRENT_MARK: &str = " ✓";
const TENANT_WARNING: &str = "  ⚠ Switching directories will open browser for re-authentication";

const SHORT_HELP: [(&str, &str); 5] = [
    ("↑/k", "up"),
    ("↓/j", "down"),
    ("enter", "select"),
    ("tab", "switch view"),
    ("q", "quit"),
];

const FULL_HELP: [&[(&str, &str)]; 3] = [
    &[("↑/k", "up"), ("↓/j", "down"), ("enter", "select")],
    &[("tab", "switch view"), ("r", "refresh")],
    &[("?", "help"), ("q", "quit")],
];

/// Rendered text plus the line the list cursor sits on, used by the terminal
/// layer to keep the cursor scrolled into view.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderedView {
    pub text: Text<'static>,
    pub cursor_line: Option<usize>,
}

/// Pure mapping from state to text.
pub fn render(state: &AppState, theme: &Theme) -> Text<'static> {
    return render_view(state, theme).text;
}

pub fn render_view(state: &AppState, theme: &Theme) -> RenderedView {
    if state.quitting {
        return RenderedView::default();
    }

    let mut renderer = Renderer {
        state,
        theme,
        lines: vec![],
        cursor_line: None,
    };
    renderer.header();
    renderer.push(Line::default());

    match state.phase {
        Phase::Loading | Phase::Success => {
            renderer.status_message();
            renderer.busy(LOADING_LABEL);
        }
        Phase::Switching => renderer.busy(SWITCHING_LABEL),
        Phase::Error => renderer.error(),
        Phase::Ready => {
            renderer.status_message();
            renderer.tabs();
            match state.view {
                View::Subscriptions => renderer.subscriptions(),
                View::Tenants => renderer.tenants(),
            }
        }
    }

    renderer.push(Line::default());
    renderer.help();

    return RenderedView {
        text: Text::from(renderer.lines),
        cursor_line: renderer.cursor_line,
    };
}

struct Renderer<'s> {
    state: &'s AppState,
    theme: &'s Theme,
    lines: Vec<Line<'static>>,
    cursor_line: Option<usize>,
}

impl Renderer<'_> {
    fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn header(&mut self) {
        self.push(Line::from(Span::styled(TITLE, self.theme.title)));

        let state = self.state;
        let Some(account) = state.account() else {
            return;
        };

        let rows = [
            ("User:", account.user.name.to_string(), self.theme.normal),
            (
                "Tenant:",
                account.tenant_display_name.to_string(),
                self.theme.normal,
            ),
            ("Subscription:", account.name.to_string(), self.theme.current),
        ];
        for (label, value, style) in rows {
            self.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(label, self.theme.label),
                Span::raw(" "),
                Span::styled(value, style),
            ]));
        }
    }

    fn status_message(&mut self) {
        let state = self.state;
        if let Some(message) = &state.message {
            self.push(Line::from(Span::styled(
                format!("  ✓ {message}"),
                self.theme.success,
            )));
            self.push(Line::default());
        }
    }

    fn busy(&mut self, label: &'static str) {
        let frame = SPINNER_FRAMES[self.state.spinner_frame % SPINNER_FRAMES.len()];
        self.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(frame, self.theme.spinner),
            Span::raw(" "),
            Span::raw(label),
        ]));
    }

    fn error(&mut self) {
        let message = self
            .state
            .last_error
            .as_ref()
            .map(|e| e.to_string())
            .unwrap_or_default();

        self.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("Error:", self.theme.error),
            Span::raw(" "),
            Span::raw(message),
        ]));
    }

    fn tabs(&mut self) {
        let (subscriptions, tenants) = match self.state.view {
            View::Subscriptions => (self.theme.active_tab, self.theme.inactive_tab),
            View::Tenants => (self.theme.inactive_tab, self.theme.active_tab),
        };

        self.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(View::Subscriptions.to_string(), subscriptions),
            Span::raw("  |  "),
            Span::styled(View::Tenants.to_string(), tenants),
        ]));
        self.push(Line::default());
    }

    fn cursor_span(&self, is_cursor: bool) -> Span<'static> {
        if is_cursor {
            return Span::styled("> ", self.theme.cursor);
        }

        return Span::raw("  ");
    }

    fn entry_span(&self, name: &str, is_current: bool, is_cursor: bool) -> Span<'static> {
        if is_current {
            return Span::styled(format!("{name}{CURRENT_MARK}"), self.theme.current);
        }
        if is_cursor {
            return Span::styled(name.to_string(), self.theme.selected);
        }

        return Span::styled(name.to_string(), self.theme.normal);
    }

    fn subscriptions(&mut self) {
        let state = self.state;
        let subscriptions = state.subscriptions();
        if subscriptions.is_empty() {
            self.push(Line::from(Span::styled(
                "  No subscriptions found",
                self.theme.muted,
            )));
            return;
        }

        for (i, sub) in subscriptions.iter().enumerate() {
            let is_cursor = i == state.subscription_cursor;
            if is_cursor {
                self.cursor_line = Some(self.lines.len());
            }

            self.push(Line::from(vec![
                self.cursor_span(is_cursor),
                self.entry_span(sub.title(), sub.is_default, is_cursor),
            ]));
            self.push(Line::from(Span::styled(
                format!("    {}", sub.id),
                self.theme.muted,
            )));
        }
    }

    fn tenants(&mut self) {
        let state = self.state;
        let tenants = state.tenants();
        if tenants.is_empty() {
            self.push(Line::from(Span::styled(
                "  No directories found",
                self.theme.muted,
            )));
            return;
        }

        self.push(Line::from(Span::styled(TENANT_WARNING, self.theme.warning)));
        self.push(Line::default());

        let mut by_tenant: HashMap<&str, Vec<&Subscription>> = HashMap::new();
        for sub in state.subscriptions() {
            by_tenant.entry(sub.tenant_id.as_str()).or_default().push(sub);
        }

        for (i, tenant) in tenants.iter().enumerate() {
            let is_cursor = i == state.tenant_cursor;
            if is_cursor {
                self.cursor_line = Some(self.lines.len());
            }

            self.push(Line::from(vec![
                self.cursor_span(is_cursor),
                self.entry_span(tenant.title(), state.is_current_tenant(tenant), is_cursor),
            ]));
            self.push(Line::from(Span::styled(
                format!("    {}", tenant.tenant_id),
                self.theme.muted,
            )));

            let Some(subs) = by_tenant.get(tenant.tenant_id.as_str()) else {
                self.push(Line::from(Span::styled(
                    "    (no subscriptions)",
                    self.theme.muted,
                )));
                continue;
            };

            for sub in subs {
                let style = if sub.is_default {
                    self.theme.current
                } else {
                    self.theme.muted
                };
                self.push(Line::from(Span::styled(
                    format!("    • {}", sub.title()),
                    style,
                )));
            }
        }
    }

    fn help(&mut self) {
        if !self.state.show_help {
            let text = SHORT_HELP
                .iter()
                .map(|(key, desc)| format!("{key} {desc}"))
                .collect::<Vec<String>>()
                .join(" • ");
            self.push(Line::from(Span::styled(text, self.theme.help)));
            return;
        }

        let rows = FULL_HELP.iter().map(|e| e.len()).max().unwrap_or(0);
        for row in 0..rows {
            let text = FULL_HELP
                .iter()
                .map(|column| match column.get(row) {
                    Some((key, desc)) => format!("{key:<6}{desc:<14}"),
                    None => " ".repeat(20),
                })
                .collect::<String>();
            self.push(Line::from(Span::styled(
                text.trim_end().to_string(),
                self.theme.help,
            )));
        }
    }
}

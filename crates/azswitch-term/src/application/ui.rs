use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::Backend;
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::services::render_view;
use crate::domain::services::AppState;
use crate::domain::services::EventsService;
use crate::domain::services::Theme;

/// Hands the terminal to a child process and takes it back afterwards.
pub trait TerminalSession {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// Raw mode and the alternate screen on the process' own terminal.
#[derive(Default)]
pub struct CrosstermSession {}

impl TerminalSession for CrosstermSession {
    fn suspend(&mut self) -> Result<()> {
        disable_raw_mode()?;
        crossterm::execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
        return Ok(());
    }

    fn resume(&mut self) -> Result<()> {
        enable_raw_mode()?;
        crossterm::execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        return Ok(());
    }
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

/// First visible line so the cursor row and the id line under it stay on
/// screen.
pub fn scroll_offset(cursor_line: Option<usize>, height: u16, total: usize, current: u16) -> u16 {
    let height = height as usize;
    let Some(cursor) = cursor_line else {
        return 0;
    };
    if height == 0 || total <= height {
        return 0;
    }

    let current = current as usize;
    let last = (cursor + 1).min(total - 1);
    let offset = if cursor < current {
        cursor
    } else if last >= current + height {
        last + 1 - height
    } else {
        current
    };

    return offset.min(total - height) as u16;
}

fn draw(frame: &mut Frame, state: &AppState, theme: &Theme, scroll: &mut u16) {
    let area = frame.area();
    let view = render_view(state, theme);
    *scroll = scroll_offset(view.cursor_line, area.height, view.text.lines.len(), *scroll);

    frame.render_widget(Paragraph::new(view.text).scroll((*scroll, 0)), area);
}

fn is_switch_completion(event: &Event) -> bool {
    return matches!(event, Event::SwitchSucceeded(_) | Event::SwitchFailed(_));
}

/// Drives the state machine until the user quits. Every event goes through
/// the reducer and the resulting actions are forwarded to the actions service.
pub async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut impl TerminalSession,
    theme: &Theme,
    events: &mut EventsService,
    action_tx: mpsc::UnboundedSender<Action>,
) -> Result<()> {
    let (mut state, actions) = AppState::init();
    for action in actions {
        action_tx.send(action)?;
    }

    let mut scroll = 0;
    let mut suspended = false;
    let mut paused_input = false;

    loop {
        if !suspended {
            terminal.draw(|frame| draw(frame, &state, theme, &mut scroll))?;
        }

        let event = events.next().await?;

        if suspended && is_switch_completion(&event) {
            session.resume()?;
            if paused_input {
                events.resume_input();
                paused_input = false;
            }
            terminal.clear()?;
            suspended = false;
            tracing::debug!("terminal resumed");
        }

        let actions = state.handle_event(event);
        if state.quitting {
            if suspended {
                session.resume()?;
            }
            return Ok(());
        }

        for action in actions {
            if action.is_interactive() && !suspended {
                if !events.is_input_paused() {
                    events.pause_input();
                    paused_input = true;
                }
                session.suspend()?;
                suspended = true;
                tracing::debug!(?action, "terminal suspended");
            }
            action_tx.send(action)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;

    use super::*;
    use crate::domain::models::Account;
    use crate::domain::models::Key;
    use crate::domain::models::Snapshot;
    use crate::domain::models::Subscription;
    use crate::domain::models::Tenant;
    use crate::domain::services::DIRECTORY_SWITCHED;
    use crate::domain::services::TITLE;

    #[derive(Default)]
    struct RecordingSession {
        calls: Vec<&'static str>,
    }

    impl TerminalSession for RecordingSession {
        fn suspend(&mut self) -> Result<()> {
            self.calls.push("suspend");
            return Ok(());
        }

        fn resume(&mut self) -> Result<()> {
            self.calls.push("resume");
            return Ok(());
        }
    }

    fn snapshot() -> Snapshot {
        return Snapshot {
            account: Account {
                id: "sub-1".to_string(),
                name: "Production".to_string(),
                tenant_id: "tid-1".to_string(),
                ..Default::default()
            },
            subscriptions: vec![Subscription {
                id: "sub-1".to_string(),
                name: "Production".to_string(),
                tenant_id: "tid-1".to_string(),
                is_default: true,
                ..Default::default()
            }],
            tenants: vec![Tenant {
                tenant_id: "tid-1".to_string(),
                display_name: Some("Contoso".to_string()),
                ..Default::default()
            }],
        };
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        return buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<String>>()
            .join("\n");
    }

    #[test]
    fn test_scroll_offset_without_overflow() {
        assert_eq!(scroll_offset(Some(8), 20, 15, 0), 0);
        assert_eq!(scroll_offset(None, 5, 40, 10), 0);
        assert_eq!(scroll_offset(Some(3), 0, 40, 0), 0);
    }

    #[test]
    fn test_scroll_offset_follows_cursor() {
        // Moving down past the bottom scrolls just enough to show the id line.
        assert_eq!(scroll_offset(Some(9), 10, 40, 0), 1);
        assert_eq!(scroll_offset(Some(20), 10, 40, 1), 12);
        // Inside the window nothing moves.
        assert_eq!(scroll_offset(Some(14), 10, 40, 12), 12);
        // Moving up above the window brings the cursor to the top.
        assert_eq!(scroll_offset(Some(4), 10, 40, 12), 4);
        // Never past the end.
        assert_eq!(scroll_offset(Some(39), 10, 40, 0), 30);
    }

    #[tokio::test]
    async fn test_loop_loads_switches_and_quits() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut session = RecordingSession::default();
        let theme = Theme::plain();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let mut events = EventsService::detached(event_rx, Duration::from_secs(3600));

        let driver = async {
            assert_eq!(action_rx.recv().await, Some(Action::LoadAll));
            event_tx.send(Event::DataLoaded(snapshot())).unwrap();
            event_tx.send(Event::Key(Key::ToggleView)).unwrap();
            event_tx.send(Event::Key(Key::Select)).unwrap();

            assert_eq!(
                action_rx.recv().await,
                Some(Action::SwitchTenant("tid-1".to_string()))
            );
            event_tx
                .send(Event::SwitchSucceeded(DIRECTORY_SWITCHED.to_string()))
                .unwrap();

            assert_eq!(action_rx.recv().await, Some(Action::LoadAll));
            event_tx.send(Event::DataLoaded(snapshot())).unwrap();
            event_tx.send(Event::Key(Key::Help)).unwrap();
            event_tx.send(Event::Key(Key::Quit)).unwrap();
        };

        let (res, _) = tokio::join!(
            start_loop(&mut terminal, &mut session, &theme, &mut events, action_tx),
            driver
        );
        res.unwrap();

        assert_eq!(session.calls, vec!["suspend", "resume"]);
        assert!(events.is_input_paused());

        let screen = buffer_text(&terminal);
        assert!(screen.contains(TITLE));
        assert!(screen.contains(DIRECTORY_SWITCHED));
        assert!(screen.contains("Contoso"));
    }

    #[tokio::test]
    async fn test_loop_stops_when_events_close() {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        let mut session = RecordingSession::default();
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let mut events = EventsService::detached(event_rx, Duration::from_secs(3600));
        drop(event_tx);

        let res = start_loop(
            &mut terminal,
            &mut session,
            &Theme::default(),
            &mut events,
            action_tx,
        )
        .await;
        assert!(res.is_err());
    }
}

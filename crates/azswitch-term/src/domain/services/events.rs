use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use crossterm::event::Event as CrosstermEvent;
use crossterm::event::EventStream;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time;

use crate::domain::models::Event;
use crate::domain::models::Key;

/// Maps a physical key press to the event it produces.
pub fn map_key(keyevent: KeyEvent) -> Option<Event> {
    if keyevent.kind == KeyEventKind::Release {
        return None;
    }

    let ctrl = keyevent.modifiers.contains(KeyModifiers::CONTROL);
    let key = match keyevent.code {
        KeyCode::Char('c') if ctrl => Key::Quit,
        _ if ctrl => return None,
        KeyCode::Up | KeyCode::Char('k') => Key::Up,
        KeyCode::Down | KeyCode::Char('j') => Key::Down,
        KeyCode::Enter => Key::Select,
        KeyCode::Tab => Key::ToggleView,
        KeyCode::Char('?') => Key::Help,
        KeyCode::Char('r') => Key::Refresh,
        KeyCode::Char('q') => Key::Quit,
        _ => return None,
    };

    return Some(Event::Key(key));
}

/// Merges terminal input, action completions and the busy-indicator tick into
/// one serialized stream.
pub struct EventsService {
    crossterm_events: Option<EventStream>,
    events: mpsc::UnboundedReceiver<Event>,
    tick: time::Interval,
}

impl EventsService {
    pub fn new(events: mpsc::UnboundedReceiver<Event>, tick_rate: Duration) -> EventsService {
        return EventsService::with_input(events, tick_rate, Some(EventStream::new()));
    }

    /// Without terminal input, for driving the loop from the channel alone.
    pub fn detached(events: mpsc::UnboundedReceiver<Event>, tick_rate: Duration) -> EventsService {
        return EventsService::with_input(events, tick_rate, None);
    }

    fn with_input(
        events: mpsc::UnboundedReceiver<Event>,
        tick_rate: Duration,
        crossterm_events: Option<EventStream>,
    ) -> EventsService {
        let mut tick = time::interval(tick_rate);
        tick.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        return EventsService {
            crossterm_events,
            events,
            tick,
        };
    }

    /// Stops reading the terminal so a child process can use it.
    pub fn pause_input(&mut self) {
        self.crossterm_events = None;
    }

    pub fn resume_input(&mut self) {
        if self.crossterm_events.is_none() {
            self.crossterm_events = Some(EventStream::new());
        }
    }

    pub fn is_input_paused(&self) -> bool {
        return self.crossterm_events.is_none();
    }

    pub async fn next(&mut self) -> Result<Event> {
        loop {
            let evt = tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => Some(event),
                    None => bail!("event channel closed"),
                },
                event = next_crossterm(&mut self.crossterm_events) => match event {
                    Some(Ok(input)) => handle_crossterm(input),
                    Some(Err(err)) => {
                        tracing::warn!(error = %err, "failed to read terminal event");
                        None
                    }
                    None => None,
                },
                _ = self.tick.tick() => Some(Event::Tick),
            };

            if let Some(event) = evt {
                return Ok(event);
            }
        }
    }
}

fn handle_crossterm(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(keyevent) => return map_key(keyevent),
        CrosstermEvent::Resize(width, height) => return Some(Event::Resize(width, height)),
        _ => return None,
    }
}

async fn next_crossterm(
    stream: &mut Option<EventStream>,
) -> Option<std::io::Result<CrosstermEvent>> {
    match stream {
        Some(stream) => return stream.next().await,
        None => return futures::future::pending().await,
    }
}

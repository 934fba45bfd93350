use std::io;

use anyhow::Result;
use azswitch_term::application::ui::{destruct_terminal_for_panic, start_loop, CrosstermSession};
use azswitch_term::configuration::Config;
use azswitch_term::domain::models::{AccountServiceBox, Action, Event};
use azswitch_term::domain::services::{ActionsService, EventsService, Theme};
use crossterm::{
    cursor,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::task;
use tokio_util::sync::CancellationToken;

async fn start_terminal_ui(
    theme: &Theme,
    events: &mut EventsService,
    tx: mpsc::UnboundedSender<Action>,
) -> Result<()> {
    enable_raw_mode()?;
    crossterm::execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;

    let term_backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(term_backend)?;
    let mut session = CrosstermSession::default();

    let result = start_loop(&mut terminal, &mut session, theme, events, tx).await;

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;

    result
}

/// Runs the interactive switcher until the user quits.
pub async fn run_interactive(service: AccountServiceBox, config: &Config) -> Result<()> {
    std::panic::set_hook(Box::new(|panic_info| {
        destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();
    let cancel = CancellationToken::new();

    let mut background_futures = task::JoinSet::new();

    let timeouts = config.action_timeouts();
    let worker_cancel = cancel.clone();
    background_futures.spawn(async move {
        ActionsService::start(service, timeouts, event_tx, &mut action_rx, worker_cancel).await
    });

    let theme = Theme::new(config.no_color);
    let mut events = EventsService::new(event_rx, config.tick_rate);
    let ui_future = start_terminal_ui(&theme, &mut events, action_tx);

    let result = tokio::select!(
        res = background_futures.join_next() => match res {
            Some(Ok(res)) => res,
            Some(Err(err)) => Err(err.into()),
            None => Ok(()),
        },
        res = ui_future => res,
    );

    // Completions still in flight are discarded.
    cancel.cancel();
    background_futures.shutdown().await;

    if result.is_err() {
        destruct_terminal_for_panic();
    }

    result
}

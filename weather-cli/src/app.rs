//! The interactive screen: terminal setup, event loop and effect execution.
//!
//! Flow per iteration:
//! 1. A terminal event, an effect result or a tick arrives as an [`Action`]
//! 2. The store runs the reducer, which returns effects
//! 3. Each effect is spawned as a tokio task that sends its result action back
//! 4. If state changed, the frame is redrawn

use std::{io, sync::Arc, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tokio::sync::mpsc;
use weather_core::{
    LocationProvider, WeatherProvider,
    screen::{Action, Effect, ScreenState, ScreenStore, perform},
};

use crate::{input, ui};

const TICK_MS: u64 = 120;
const EVENT_POLL_MS: u64 = 50;

/// Shared handles the effect tasks run against.
#[derive(Debug, Clone)]
pub struct Services {
    pub location: LocationProvider,
    pub weather: Arc<dyn WeatherProvider>,
}

/// Take over the terminal, run the screen until the user quits, restore the terminal.
pub async fn run(services: Services, initial: ScreenState) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("Failed to enter alternate screen");
    }

    let result = match Terminal::new(CrosstermBackend::new(io::stdout())) {
        Ok(mut terminal) => {
            let result = run_loop(&mut terminal, services, initial).await;
            let _ = terminal.show_cursor();
            result
        }
        Err(err) => Err(err).context("Failed to initialise terminal"),
    };

    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);

    result
}

async fn run_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    services: Services,
    initial: ScreenState,
) -> Result<()> {
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    spawn_event_reader(event_tx);

    let mut ticks = tokio::time::interval(Duration::from_millis(TICK_MS));
    let mut store = ScreenStore::new(initial);

    let mut dirty = dispatch(&mut store, Action::Mount, &services, &action_tx);

    loop {
        if dirty {
            terminal
                .draw(|frame| ui::render(frame, frame.area(), store.state()))
                .context("Failed to draw frame")?;
            dirty = false;
        }

        let action = tokio::select! {
            Some(action) = action_rx.recv() => action,
            Some(event) = event_rx.recv() => match event {
                Event::Key(key) => match input::map_key(key, store.state()) {
                    Some(action) => action,
                    None => continue,
                },
                Event::Resize(..) => {
                    dirty = true;
                    continue;
                }
                _ => continue,
            },
            _ = ticks.tick() => Action::Tick,
            else => break,
        };

        if action == Action::Quit {
            tracing::info!("quit requested");
            break;
        }

        dirty |= dispatch(&mut store, action, &services, &action_tx);
    }

    Ok(())
}

/// Apply an action and spawn its effects. Returns whether a redraw is needed.
fn dispatch(
    store: &mut ScreenStore,
    action: Action,
    services: &Services,
    action_tx: &mpsc::UnboundedSender<Action>,
) -> bool {
    let result = store.dispatch(action);
    for effect in result.effects {
        spawn_effect(effect, services.clone(), action_tx.clone());
    }
    result.changed
}

fn spawn_effect(effect: Effect, services: Services, tx: mpsc::UnboundedSender<Action>) {
    tracing::debug!(?effect, "spawning effect");
    tokio::spawn(async move {
        let action = perform(effect, &services.location, services.weather.as_ref()).await;
        // Receiver is gone once the screen has exited.
        let _ = tx.send(action);
    });
}

/// Crossterm reads are blocking, so they run on their own thread.
fn spawn_event_reader(tx: mpsc::UnboundedSender<Event>) {
    thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(EVENT_POLL_MS)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "failed to read terminal event");
                        break;
                    }
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to poll terminal events");
                    break;
                }
            }
        }
    });
}

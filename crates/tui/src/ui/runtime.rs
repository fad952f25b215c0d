//! Runtime: unified event loop and input routing for the TUI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Drive a single event loop that handles input, ticks and background
//!   results.
//! - Route input to the main view and execute the returned `Effect`s.
//!
//! Event loop strategy
//! - A dedicated input task polls `crossterm` and forwards events over a
//!   channel; mouse moves are throttled to one per frame.
//! - Ticking is fast (100 ms) while work is in flight and slow (1 s) when
//!   idle. The slow tick still drives the testimonial rotation.
//! - Background calls are `JoinHandle`s collected in a `FuturesUnordered`;
//!   each completion is fed back as `Msg::ExecCompleted`.
//! - A render error (missing context) ends the loop and is returned after the
//!   terminal has been restored.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use ratatui::{Terminal, prelude::*};
use stuffsdrop_types::{Effect, ExecOutcome, Msg, Route, ThemeMode};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    app::{App, SharedCtx},
    cmd,
    ui::{components::Component, main_component::MainView},
};

type Backend = CrosstermBackend<std::io::Stdout>;

/// Spawn the input task that polls the terminal and forwards `crossterm`
/// events over a Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_move: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        // Throttle mouse move events to once per 16 ms.
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_move.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_move = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            } else if sender.is_closed() {
                break;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<Backend>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Rebuilds focus and draws one frame. Errors raised by components during
/// the draw are returned once the frame is flushed.
fn render(terminal: &mut Terminal<Backend>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    app.rebuild_focus();
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    let mut outcome = Ok(());
    terminal.draw(|frame| outcome = main_view.render(frame, frame.area(), app))?;
    outcome
}

/// Route raw crossterm input events to the main view.
fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the TUI runtime: sets up the terminal, runs the event
/// loop and restores the terminal on exit, even when the loop failed.
pub async fn run_app(ctx: SharedCtx, theme_override: Option<ThemeMode>) -> Result<()> {
    let mut app = App::new(ctx, theme_override);
    let mut main_view = MainView::default();
    let mut effects = main_view.set_current_route_with_hooks(&mut app, Route::Login);
    // Resume an existing session before the user has to sign in again.
    effects.push(Effect::LoadIdentity);

    let mut input_receiver = spawn_input_thread().await;
    let mut terminal = setup_terminal()?;
    info!("terminal ready");

    let result = event_loop(&mut terminal, &mut app, &mut main_view, &mut input_receiver, effects).await;
    cleanup_terminal(&mut terminal)?;
    if let Err(error) = &result {
        tracing::error!(error = %error, "runtime stopped");
    }
    result
}

async fn event_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    main_view: &mut MainView,
    input_receiver: &mut mpsc::Receiver<Event>,
    mut effects: Vec<Effect>,
) -> Result<()> {
    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();

    // Ticking strategy: fast while animating, slow when idle.
    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(1000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(terminal, app, main_view)?;

    // Track the last known terminal size to synthesize Resize messages when
    // some terminals fail to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let needs_animation = app.executing || !effects.is_empty();
        let target_interval = if needs_animation { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                let Some(event) = maybe_event else {
                    // Input channel closed; shut down cleanly.
                    break;
                };
                if let Event::Key(key_event) = event
                    && key_event.code == KeyCode::Char('c')
                    && key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    break;
                }
                effects.extend(handle_input_event(app, main_view, event));
            }

            // Periodic tick
            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(app, Msg::Tick));
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Execution task failed: {error}")));
                effects.extend(main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome))));
                app.executing = !pending_execs.is_empty();
                if !app.executing {
                    app.throbber_idx = 0;
                }
            }

            // Handle Ctrl+C delivered as a signal
            _ = signal::ctrl_c() => { break; }
        }

        // Effects may produce more effects (route enter hooks, immediate
        // outcomes); drain until the queue settles.
        while !effects.is_empty() {
            let mut effects_to_process = std::mem::take(&mut effects);
            handle_navigation_effects(app, main_view, &mut effects_to_process, &mut effects);
            process_effects(app, main_view, effects_to_process, &mut pending_execs, &mut effects).await;
        }

        // Fallback: detect terminal size changes even if no explicit Resize
        // event was received.
        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            effects.extend(app.update(&Msg::Resize(w, h)));
        }

        // Every wakeup may have changed state.
        render(terminal, app, main_view)?;
    }
    Ok(())
}

fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>, queued_effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(.., |effect| matches!(effect, Effect::SwitchTo(_) | Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::SwitchTo(route) => {
                debug!(route = %route.path(), "switching route");
                queued_effects.extend(main_view.set_current_route_with_hooks(app, route));
            }
            Effect::ShowModal(modal) => {
                if let Some((mut view, _)) = main_view.modal_view.take() {
                    queued_effects.extend(view.on_route_exit(app));
                }
                main_view.set_open_modal_kind(app, Some(modal));
                if let Some((view, _)) = main_view.modal_view.as_mut() {
                    queued_effects.extend(view.on_route_enter(app));
                }
            }
            Effect::CloseModal => {
                if let Some((mut view, _)) = main_view.modal_view.take() {
                    queued_effects.extend(view.on_route_exit(app));
                }
                main_view.set_open_modal_kind(app, None);
            }
            _ => {}
        }
    }
}

async fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
    effects_out: &mut Vec<Effect>,
) {
    if effects.is_empty() {
        return;
    }

    let command_batch = cmd::run_from_effects(app, effects).await;
    if !command_batch.pending.is_empty() {
        if !app.executing {
            app.throbber_idx = 0;
        }
        pending_execs.extend(command_batch.pending);
        app.executing = true;
    }

    for outcome in command_batch.immediate {
        effects_out.extend(main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome))));
    }
}

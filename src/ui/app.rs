//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::environment::Environment;
use crate::events::{Event as SourceEvent, EventSender, EventType};
use crate::poller::PollerRegistry;
use crate::ui::dashboard::{DashboardState, render_dashboard};
use crate::ui::splash::render_splash;
use crossterm::event::{self, Event, KeyCode};
use ratatui::{Frame, Terminal, backend::Backend};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub with_background_color: bool,
    pub base_url: String,
}

impl UIConfig {
    pub fn new(with_background_color: bool, base_url: String) -> Self {
        Self {
            with_background_color,
            base_url,
        }
    }
}

/// The different screens in the application.
#[derive(Debug)]
pub enum Screen {
    /// Splash screen shown at the start of the application.
    Splash,
    /// Dashboard screen displaying every source and the activity log.
    Dashboard(Box<DashboardState>),
}

/// Application state
pub struct App {
    /// The start time of the application, used for computing uptime.
    start_time: Instant,

    /// The environment in which the application is running.
    environment: Environment,

    /// The current screen being displayed in the application.
    current_screen: Screen,

    /// Owns the polled sources; read for snapshots, used for manual refreshes.
    registry: Arc<PollerRegistry>,

    /// Receives events from source renderers.
    event_receiver: mpsc::Receiver<SourceEvent>,

    /// Reports manual refreshes to the activity log.
    events: EventSender,

    /// Events received while the splash screen is up, replayed into the dashboard.
    splash_events: Vec<SourceEvent>,

    ui_config: UIConfig,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        environment: Environment,
        registry: Arc<PollerRegistry>,
        event_receiver: mpsc::Receiver<SourceEvent>,
        events: EventSender,
        ui_config: UIConfig,
    ) -> Self {
        Self {
            start_time: Instant::now(),
            environment,
            current_screen: Screen::Splash,
            registry,
            event_receiver,
            events,
            splash_events: Vec::new(),
            ui_config,
        }
    }

    /// Moves every queued source event to the current screen.
    fn receive_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match &mut self.current_screen {
                Screen::Splash => self.splash_events.push(event),
                Screen::Dashboard(state) => state.add_event(event),
            }
        }
    }

    fn show_dashboard(&mut self) {
        let mut state = DashboardState::new(
            self.environment,
            self.start_time,
            self.ui_config.clone(),
        );
        for event in self.splash_events.drain(..) {
            state.add_event(event);
        }
        state.update(&self.registry);
        self.current_screen = Screen::Dashboard(Box::new(state));
    }

    /// Forces an out-of-cycle fetch of one source without blocking the UI.
    fn refresh(&self, id: String) {
        self.events
            .send_session_event(format!("Manual refresh: {}", id), EventType::Refresh);
        let registry = self.registry.clone();
        tokio::spawn(async move {
            registry.refresh_now(&id).await;
        });
    }
}

/// Runs the application UI in a loop, handling events and rendering the appropriate screen.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    let splash_start = Instant::now();
    let splash_duration = Duration::from_secs(2);

    // UI event loop
    loop {
        // Queue all incoming events for processing
        app.receive_events();

        if let Screen::Dashboard(state) = &mut app.current_screen {
            state.update(&app.registry);
        }
        terminal.draw(|f| render(f, &app.current_screen))?;

        // Handle splash-to-dashboard transition
        if let Screen::Splash = app.current_screen {
            if splash_start.elapsed() >= splash_duration {
                app.show_dashboard();
                continue;
            }
        }

        // Let spawned refreshes and source workers make progress between frames
        tokio::task::yield_now().await;

        // Poll for key events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                // Skip events that are not KeyEventKind::Press
                if key.kind == event::KeyEventKind::Release {
                    continue;
                }

                // Handle exit events
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    return Ok(());
                }

                match &mut app.current_screen {
                    Screen::Splash => {
                        // Any key press will skip the splash screen
                        app.show_dashboard();
                    }
                    Screen::Dashboard(state) => match key.code {
                        KeyCode::Up => state.select_previous(),
                        KeyCode::Down => state.select_next(),
                        KeyCode::Char('r') => {
                            if let Some(id) = state.selected_id().map(str::to_string) {
                                app.refresh(id);
                            }
                        }
                        KeyCode::Char('R') => {
                            for id in app.registry.ids() {
                                app.refresh(id);
                            }
                        }
                        _ => {}
                    },
                }
            }
        }
    }
}

/// Renders the current screen based on the application state.
fn render(f: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Splash => render_splash(f),
        Screen::Dashboard(state) => render_dashboard(f, state),
    }
}

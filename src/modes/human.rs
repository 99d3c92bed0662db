use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Stderr;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

use super::terminal::{cleanup_terminal, setup_terminal};
use crate::game::{Direction, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, StatusLine, View};

/// Keyboard-controlled game with progressive speed
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(View::Human),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_direction: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        cleanup_terminal(&mut terminal)?;

        if self.metrics.games_played > 0 {
            tracing::info!(
                games_played = self.metrics.games_played,
                high_score = self.metrics.high_score,
                "Session finished"
            );
        }

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut speed = self.state.speed();
        let mut tick_timer = tick_timer(speed);

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if self.state.is_alive {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let status = self.status_line();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &status);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }

            if self.state.speed() != speed {
                speed = self.state.speed();
                tick_timer = tick_timer_after_first(speed);
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Steer(dir) => self.pending_direction = Some(dir),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        if let Some(dir) = self.pending_direction.take() {
            self.state.snake.steer(dir);
        }

        let result = self.engine.step(&mut self.state);
        self.metrics.on_move();

        if result.terminated {
            self.metrics.on_game_over(self.state.score);
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
    }

    fn status_line(&self) -> StatusLine {
        StatusLine::new()
            .field("Score", self.state.score)
            .field("Speed", self.state.speed())
            .field("Best", self.metrics.high_score)
            .field("Time", self.metrics.format_time())
    }
}

/// Tick period for a speed in ticks per second
fn tick_period(speed: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(speed.max(1)))
}

fn tick_timer(speed: u32) -> Interval {
    let mut timer = interval(tick_period(speed));
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Like [`tick_timer`] but without the immediate first tick
fn tick_timer_after_first(speed: u32) -> Interval {
    let period = tick_period(speed);
    let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

//! Playback mode for watching a trained agent
//!
//! Loads a value table and lets the agent play one game in the terminal at a
//! fixed pace. Exploration stays at its floor and nothing is learned.
//!
//! # Controls
//!
//! - Q/Esc/Ctrl+C: Quit
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::game::GameConfig;
//! use q_snake::metrics::NoopTelemetry;
//! use q_snake::modes::{PlayConfig, PlayMode};
//! use q_snake::rl::QConfig;
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut play_mode = PlayMode::load(
//!     Path::new("snake_ai.json"),
//!     PlayConfig::new(GameConfig::default()),
//!     QConfig::default(),
//!     NoopTelemetry,
//! )?;
//! play_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::{Stream, StreamExt};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Stderr;
use std::path::Path;
use std::time::Duration;
use tokio::time::interval;

use super::terminal::{cleanup_terminal, setup_terminal};
use crate::game::{Action, GameConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::Telemetry;
use crate::render::{Renderer, StatusLine, View};
use crate::rl::{QAgent, QConfig, Simulation, SnakeEnvironment, ValueTable, encode_state, load_table};

/// Fastest allowed pace; a zero tick period is rejected by tokio
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Settings for a playback session
#[derive(Debug, Clone)]
pub struct PlayConfig {
    pub game_config: GameConfig,

    /// Time between agent moves
    pub frame_interval: Duration,

    /// How long the final frame stays up after a game over
    pub hold_after_game_over: Duration,
}

impl PlayConfig {
    pub fn new(game_config: GameConfig) -> Self {
        Self {
            game_config,
            frame_interval: Duration::from_millis(100),
            hold_after_game_over: Duration::from_secs(2),
        }
    }

    /// Set the pace; anything below one millisecond is raised to it
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval.max(MIN_FRAME_INTERVAL);
        self
    }
}

/// How a playback session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayOutcome {
    pub score: u32,
    pub moves: usize,
    /// False when the user quit before the game ended
    pub game_over: bool,
}

/// Playback mode for watching a trained agent
pub struct PlayMode<T: Telemetry> {
    agent: QAgent,
    env: SnakeEnvironment,
    config: PlayConfig,
    telemetry: T,
    renderer: Renderer,
    input_handler: InputHandler,
    moves: usize,
    should_quit: bool,
}

impl<T: Telemetry> PlayMode<T> {
    /// Play with an in-memory table
    pub fn new(table: ValueTable, config: PlayConfig, q_config: QConfig, telemetry: T) -> Self {
        Self {
            agent: QAgent::for_playback(q_config, table),
            env: SnakeEnvironment::new(config.game_config.clone()),
            config,
            telemetry,
            renderer: Renderer::new(View::Playback),
            input_handler: InputHandler::new(),
            moves: 0,
            should_quit: false,
        }
    }

    /// Play with a table loaded from disk
    pub fn load(path: &Path, config: PlayConfig, q_config: QConfig, telemetry: T) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Value table not found at {:?}; train first", path);
        }

        let (table, metadata) =
            load_table(path).with_context(|| format!("Failed to load value table from {:?}", path))?;

        tracing::info!(
            path = ?path,
            states = table.len(),
            episodes_trained = metadata.episodes_trained,
            grid = format_args!("{}x{}", metadata.grid_width, metadata.grid_height),
            version = %metadata.version,
            "Loaded value table"
        );

        if metadata.grid_width != config.game_config.grid_width
            || metadata.grid_height != config.game_config.grid_height
        {
            tracing::warn!(
                "Table was trained on a {}x{} grid, playing on {}x{}",
                metadata.grid_width,
                metadata.grid_height,
                config.game_config.grid_width,
                config.game_config.grid_height
            );
        }

        Ok(Self::new(table, config, q_config, telemetry))
    }

    pub fn agent(&self) -> &QAgent {
        &self.agent
    }

    pub fn telemetry(&self) -> &T {
        &self.telemetry
    }

    /// Let the agent make one move; returns whether the game is over
    pub fn step_agent(&mut self) -> bool {
        if self.env.is_terminal() {
            return true;
        }

        let state = encode_state(&self.env);
        let action_idx = self.agent.select_action(state);
        let heading = Action::from_index(action_idx).apply(self.env.heading());
        self.env.set_heading(heading);
        self.env.advance();
        self.moves += 1;

        self.env.is_terminal()
    }

    /// Run one visible game, then report it
    pub async fn run(&mut self) -> Result<PlayOutcome> {
        let mut terminal = setup_terminal()?;

        let result = self.run_playback_loop(&mut terminal).await;

        cleanup_terminal(&mut terminal)?;
        let game_over = result?;

        let outcome = PlayOutcome {
            score: self.env.score(),
            moves: self.moves,
            game_over,
        };

        if game_over {
            self.telemetry.play_finished(outcome.score, outcome.moves);
        } else {
            tracing::info!("Playback stopped by user");
        }

        Ok(outcome)
    }

    async fn run_playback_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<bool> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.config.frame_interval.max(MIN_FRAME_INTERVAL));

        // Render at 30 FPS
        let mut render_timer = interval(Duration::from_millis(33));

        let mut game_over = self.env.is_terminal();

        while !game_over {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    game_over = self.step_agent();
                }

                _ = render_timer.tick() => {
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                return Ok(false);
            }
        }

        self.draw(terminal)?;
        if hold_frame(&mut event_stream, &self.input_handler, self.config.hold_after_game_over).await {
            tracing::debug!("Game-over hold cut short by user");
        }

        Ok(true)
    }

    fn handle_event(&mut self, event: Event) {
        if is_quit(&self.input_handler, &event) {
            self.should_quit = true;
        }
    }

    fn draw(&self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let status = self.status_line();
        terminal
            .draw(|frame| self.renderer.render(frame, self.env.state(), &status))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn status_line(&self) -> StatusLine {
        StatusLine::new()
            .field("Score", self.env.score())
            .field("Moves", self.moves)
            .field("Epsilon", format!("{:.3}", self.agent.epsilon()))
            .field("Known states", self.agent.table().len())
    }
}

fn is_quit(input: &InputHandler, event: &Event) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            input.handle_key_event(*key) == KeyAction::Quit
        }
        _ => false,
    }
}

/// Keep the final frame up for `hold` while still honouring quit keys and
/// Ctrl+C. Returns whether the user quit before the hold ran out.
async fn hold_frame<E>(events: &mut E, input: &InputHandler, hold: Duration) -> bool
where
    E: Stream<Item = std::io::Result<Event>> + Unpin,
{
    let deadline = tokio::time::sleep(hold);
    tokio::pin!(deadline);
    let mut events_open = true;

    loop {
        tokio::select! {
            _ = &mut deadline => return false,

            maybe_event = events.next(), if events_open => match maybe_event {
                Some(Ok(event)) if is_quit(input, &event) => return true,
                Some(_) => {}
                None => events_open = false,
            },

            _ = tokio::signal::ctrl_c() => return true,
        }
    }
}

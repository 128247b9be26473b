use anyhow::Result;
use tracing::info;

use crate::game::{GameEngine, GameState, StepEvent};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::platform::Platform;
use crate::render::Renderer;

/// Keyboard-driven play: one tick per frame, paced by the platform
pub struct HumanMode<P: Platform> {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    platform: P,
    should_quit: bool,
}

impl<P: Platform> HumanMode<P> {
    pub fn new(mut engine: GameEngine, platform: P) -> Self {
        let state = engine.reset();
        let renderer = Renderer::new(engine.config());

        Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            platform,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Run until the player quits
    pub async fn run(&mut self) -> Result<()> {
        self.platform.set_target_rate(self.state.speed);
        info!(speed = self.state.speed, "game loop started");

        while self.tick().await? {}

        info!(
            games = self.metrics.games_played,
            high_score = self.metrics.high_score,
            "game loop finished"
        );
        Ok(())
    }

    /// One frame: drain input, advance, draw, then wait for the next frame
    /// boundary. Returns `false` once the player asked to quit.
    pub async fn tick(&mut self) -> Result<bool> {
        self.handle_input()?;
        if self.should_quit {
            return Ok(false);
        }

        self.update_game().await?;

        self.platform.begin_frame();
        self.renderer
            .render(&mut self.platform, &self.state, &self.metrics);
        self.platform.end_frame()?;
        self.metrics.on_frame();

        self.platform.wait_next_frame().await;
        Ok(true)
    }

    fn handle_input(&mut self) -> Result<()> {
        while let Some(key) = self.platform.poll_next_key_event()? {
            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(direction) => {
                    self.engine.set_heading(&mut self.state, direction);
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
        Ok(())
    }

    async fn update_game(&mut self) -> Result<()> {
        let result = self.engine.step(&mut self.state);

        if let Some(speed) = result.speed_changed {
            self.platform.set_target_rate(speed);
        }

        match result.event {
            Some(StepEvent::Collision { length }) => {
                self.metrics.on_game_over(length);
                self.show_banner("GAME OVER!").await?;
            }
            Some(StepEvent::BoardFull { length }) => {
                self.metrics.on_game_over(length);
                self.show_banner("YOU WIN!").await?;
            }
            None => {}
        }

        Ok(())
    }

    /// Hold a message over the last frame before play resumes
    async fn show_banner(&mut self, text: &str) -> Result<()> {
        self.platform.begin_frame();
        self.renderer.render_banner(&mut self.platform, text);
        self.platform.end_frame()?;
        self.platform.sleep(self.engine.config().game_over_hold).await;
        Ok(())
    }
}

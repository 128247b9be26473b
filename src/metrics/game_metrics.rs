use std::time::{Duration, Instant};

pub struct GameMetrics {
    last_frame: Instant,
    pub frame_time: Duration,
    pub high_score: usize,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            frame_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
        }
    }

    /// Record that a frame was presented
    pub fn on_frame(&mut self) {
        let now = Instant::now();
        self.frame_time = now - self.last_frame;
        self.last_frame = now;
    }

    pub fn on_game_over(&mut self, final_score: usize) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn fps(&self) -> f64 {
        let secs = self.frame_time.as_secs_f64();
        if secs > 0.0 {
            1.0 / secs
        } else {
            0.0
        }
    }

    pub fn format_fps(&self) -> String {
        format!("{:.0} FPS", self.fps())
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

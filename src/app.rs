use dla_accretion::{AppConfig, DlaEngine, FrameQueue, PixelBuffer};
use tracing::info;

pub type Engine = DlaEngine<PixelBuffer, FrameQueue>;

/// Main application state
pub struct App {
    pub engine: Engine,
    pub show_boundary: bool,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// Number of trees grown since launch, including the current one
    pub generation: usize,
}

impl App {
    pub fn new(config: &AppConfig, rng_seed: Option<u64>) -> Self {
        let surface = PixelBuffer::new(config.surface_width, config.surface_height);
        let settings = config.settings.clone();
        let engine = match rng_seed {
            Some(seed) => DlaEngine::with_seed(surface, FrameQueue::new(), settings, seed),
            None => DlaEngine::new(surface, FrameQueue::new(), settings),
        };

        let mut app = Self {
            engine,
            show_boundary: config.show_boundary,
            fullscreen_mode: false,
            show_help: false,
            help_scroll: 0,
            generation: 1,
        };
        if app.show_boundary {
            app.engine.draw_boundary();
        }
        app
    }

    /// Deliver the due animation frame, if any
    pub fn tick(&mut self) {
        if let Some(handle) = self.engine.scheduler_mut().take_due() {
            self.engine.on_frame(handle);
        }
    }

    /// Pause or resume growth
    pub fn toggle_running(&mut self) {
        if self.engine.is_running() {
            self.engine.stop();
        } else {
            self.engine.start();
        }
    }

    /// Throw the current tree away and grow a new one
    pub fn regenerate(&mut self) {
        self.engine.stop();
        self.engine.reset();
        if self.show_boundary {
            self.engine.draw_boundary();
        }
        self.generation += 1;
        info!(generation = self.generation, "Regenerating tree");
        self.engine.start();
    }

    /// Boundary visibility takes effect now when turning on, at the next reset when turning off
    pub fn toggle_boundary(&mut self) {
        self.show_boundary = !self.show_boundary;
        if self.show_boundary {
            self.engine.draw_boundary();
        }
    }

    pub fn increase_speed(&mut self) {
        self.engine.adjust_iterations_per_frame(1);
    }

    pub fn decrease_speed(&mut self) {
        self.engine.adjust_iterations_per_frame(-1);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0;
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&AppConfig::default(), Some(3))
    }

    #[test]
    fn test_tick_advances_running_engine() {
        let mut app = app();
        app.engine.start();
        let before = app.engine.scheduler_mut().requested();
        app.tick();
        assert!(app.engine.scheduler_mut().requested() > before);

        // Nothing pending while stopped
        app.engine.stop();
        let count = app.engine.particle_count();
        app.tick();
        assert_eq!(app.engine.particle_count(), count);
    }

    #[test]
    fn test_toggle_running() {
        let mut app = app();
        app.toggle_running();
        assert!(app.engine.is_running());
        app.toggle_running();
        assert!(!app.engine.is_running());
    }

    #[test]
    fn test_regenerate_restarts_from_seed() {
        let mut app = app();
        app.engine.start();
        for _ in 0..20 {
            app.tick();
        }
        app.regenerate();

        assert_eq!(app.generation, 2);
        assert!(app.engine.is_running());
        // Only the first batch has run since the reset
        assert!(app.engine.particle_count() <= 1 + app.engine.settings().iterations_per_frame);
    }

    #[test]
    fn test_boundary_drawn_when_enabled() {
        let config = AppConfig {
            show_boundary: true,
            ..AppConfig::default()
        };
        let app = App::new(&config, Some(3));
        assert!(app.engine.surface().painted_count() > 1);
        assert_eq!(app.engine.occupied_len(), 1);
    }
}

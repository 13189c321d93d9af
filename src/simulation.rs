use crate::color::{Band, Rgb};
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::settings::EngineSettings;
use crate::surface::Surface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::f64::consts::TAU;
use tracing::{debug, info, warn};

/// Moore neighbourhood, the cell itself excluded
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// Tolerance on the stopping distance; with equal inset and stop margin it is
/// only reached by particles sticking on the spawn circle itself
const REACH_EPSILON: f64 = 1e-6;

/// Integer grid cell, keyed by floored coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_point(x: f64, y: f64) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }

    fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Circle the aggregate grows inside of, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl Boundary {
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// DLA engine bound to a paint surface and a frame scheduler
pub struct DlaEngine<S: Surface, F: FrameScheduler> {
    surface: S,
    scheduler: F,
    settings: EngineSettings,
    boundary: Boundary,
    seed: (f64, f64),
    /// Occupied cells of the aggregate
    tree: HashSet<Cell>,
    particle_count: usize,
    max_radius: f64,
    running: bool,
    pending_frame: Option<FrameHandle>,
    rng: StdRng,
}

impl<S: Surface, F: FrameScheduler> DlaEngine<S, F> {
    pub fn new(surface: S, scheduler: F, settings: EngineSettings) -> Self {
        Self::with_rng(surface, scheduler, settings, StdRng::from_entropy())
    }

    /// Engine with a reproducible random walk
    pub fn with_seed(surface: S, scheduler: F, settings: EngineSettings, rng_seed: u64) -> Self {
        Self::with_rng(surface, scheduler, settings, StdRng::seed_from_u64(rng_seed))
    }

    fn with_rng(surface: S, scheduler: F, settings: EngineSettings, rng: StdRng) -> Self {
        let (center_x, center_y, radius) = settings.sizing.layout(surface.width(), surface.height());
        let boundary = Boundary {
            center_x,
            center_y,
            radius,
        };

        let mut engine = Self {
            surface,
            scheduler,
            settings,
            boundary,
            seed: (center_x, center_y),
            tree: HashSet::new(),
            particle_count: 0,
            max_radius: 0.0,
            running: false,
            pending_frame: None,
            rng,
        };
        engine.plant_seed();

        info!(
            width = engine.surface.width(),
            height = engine.surface.height(),
            center_x,
            center_y,
            radius,
            sizing = engine.settings.sizing.name(),
            "DLA engine created"
        );
        engine
    }

    fn plant_seed(&mut self) {
        let (x, y) = self.seed;
        self.add_point(x, y);
        self.max_radius = 0.0;
    }

    /// Distance beyond which a walking particle is discarded
    fn escape_radius(&self) -> f64 {
        self.boundary.radius - self.settings.boundary_inset
    }

    /// Commit a particle: occupy its cell, update metrics and paint it
    pub fn add_point(&mut self, x: f64, y: f64) {
        let cell = Cell::from_point(x, y);
        self.tree.insert(cell);

        self.max_radius = self.max_radius.max(self.boundary.distance(x, y));
        self.particle_count += 1;

        let color = self.settings.palette.band_for(self.progress());
        self.surface.set_pixel(cell.x, cell.y, color);
    }

    /// True if any of the 8 surrounding cells is occupied
    pub fn is_adjacent_to_tree(&self, x: f64, y: f64) -> bool {
        let cell = Cell::from_point(x, y);
        NEIGHBOR_OFFSETS
            .iter()
            .any(|&(dx, dy)| self.tree.contains(&cell.offset(dx, dy)))
    }

    /// Walk one particle from just outside the aggregate until it sticks,
    /// escapes the boundary or runs out of steps.
    /// Returns true if it stuck.
    pub fn iterate(&mut self) -> bool {
        let escape_radius = self.escape_radius();
        if escape_radius <= 0.0 {
            return false;
        }

        // Spawn near the frontier rather than at the boundary to keep walks short
        let spawn_radius = (self.max_radius + self.settings.spawn_margin).min(escape_radius);
        let angle = self.rng.gen_range(0.0..TAU);
        let mut x = self.seed.0 + spawn_radius * angle.cos();
        let mut y = self.seed.1 + spawn_radius * angle.sin();

        for _ in 0..self.settings.max_steps {
            if self.is_adjacent_to_tree(x, y) {
                self.add_point(x, y);
                return true;
            }

            // Each axis moves independently, so diagonal and idle moves are included
            x += self.rng.gen_range(-1..=1) as f64;
            y += self.rng.gen_range(-1..=1) as f64;

            if self.boundary.distance(x, y) > escape_radius {
                return false;
            }
        }

        false
    }

    /// Begin the animation. No-op while running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        if self.is_complete() {
            if self.boundary.radius <= 0.0 {
                warn!(radius = self.boundary.radius, "Degenerate boundary, nothing to grow");
            }
            self.stop();
            return;
        }

        self.running = true;
        info!(particles = self.particle_count, "Growth started");
        self.run_batch();
    }

    /// Deliver a frame previously requested from the scheduler.
    /// Frames that were cancelled or superseded are ignored.
    pub fn on_frame(&mut self, handle: FrameHandle) {
        if !self.running || self.pending_frame != Some(handle) {
            debug!(?handle, "Ignoring stale frame");
            return;
        }
        self.pending_frame = None;
        self.run_batch();
    }

    fn run_batch(&mut self) {
        for _ in 0..self.settings.iterations_per_frame.max(1) {
            self.iterate();

            if self.is_complete() {
                info!(
                    particles = self.particle_count,
                    max_radius = self.max_radius,
                    "Aggregate reached the boundary"
                );
                self.stop();
                return;
            }
        }

        self.pending_frame = Some(self.scheduler.request_frame());
    }

    /// Halt the animation and cancel any pending frame. Idempotent.
    pub fn stop(&mut self) {
        if self.running {
            debug!(particles = self.particle_count, "Growth stopped");
        }
        self.running = false;
        if let Some(handle) = self.pending_frame.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    /// Stop, clear the aggregate and the surface, and replant the seed.
    /// Does not restart the animation.
    pub fn reset(&mut self) {
        self.stop();
        self.tree.clear();
        self.max_radius = 0.0;
        self.particle_count = 0;
        self.surface.clear();
        self.plant_seed();
        info!("Aggregate reset");
    }

    /// Stroke the boundary circle in the first band colour
    pub fn draw_boundary(&mut self) {
        let color = self.settings.palette.color(Band::Early);
        self.surface.stroke_circle(
            self.boundary.center_x,
            self.boundary.center_y,
            self.boundary.radius,
            color,
        );
    }

    /// The aggregate has reached the boundary (or there is no room to grow)
    pub fn is_complete(&self) -> bool {
        self.boundary.radius <= 0.0
            || self.max_radius + REACH_EPSILON >= self.boundary.radius - self.settings.sizing.stop_margin()
    }

    /// Particle count relative to the fill estimate
    pub fn progress(&self) -> f64 {
        self.particle_count as f64 / self.settings.max_particles_estimate.max(1) as f64
    }

    pub fn band(&self) -> Band {
        Band::from_progress(self.progress())
    }

    /// Colour the next committed particle would be painted with
    pub fn current_color(&self) -> Rgb {
        self.settings.palette.color(self.band())
    }

    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        self.tree.contains(&Cell::from_point(x, y))
    }

    pub fn occupied_len(&self) -> usize {
        self.tree.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn seed(&self) -> (f64, f64) {
        self.seed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Particles per frame can change between frames; geometry cannot
    pub fn adjust_iterations_per_frame(&mut self, delta: i32) {
        self.settings.adjust_iterations_per_frame(delta);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

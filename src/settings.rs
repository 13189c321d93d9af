use crate::color::Palette;
use serde::{Deserialize, Serialize};

/// How the growth boundary is laid out on the surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sizing {
    /// Fixed radius, center shifted right by `radius + offset_x`, vertically centered
    Fixed {
        radius: f64,
        offset_x: f64,
        stop_margin: f64,
    },
    /// Radius of half the surface height minus padding, centered on the surface
    FitHeight { padding: f64, stop_margin: f64 },
}

impl Default for Sizing {
    fn default() -> Self {
        Sizing::Fixed {
            radius: 100.0,
            offset_x: 190.0,
            stop_margin: 2.0,
        }
    }
}

impl Sizing {
    pub fn name(&self) -> &str {
        match self {
            Sizing::Fixed { .. } => "Compact",
            Sizing::FitHeight { .. } => "Fit Height",
        }
    }

    /// Boundary (center x, center y, radius) for a surface of the given size
    pub fn layout(&self, width: u32, height: u32) -> (f64, f64, f64) {
        let (w, h) = (width as f64, height as f64);
        match *self {
            Sizing::Fixed { radius, offset_x, .. } => (radius + offset_x, h / 2.0, radius),
            Sizing::FitHeight { padding, .. } => (w / 2.0, h / 2.0, h / 2.0 - padding),
        }
    }

    /// Growth stops once the aggregate reaches `radius - stop_margin`
    pub fn stop_margin(&self) -> f64 {
        match *self {
            Sizing::Fixed { stop_margin, .. } | Sizing::FitHeight { stop_margin, .. } => stop_margin,
        }
    }
}

/// All engine tunables consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Boundary layout and stopping margin
    pub sizing: Sizing,
    /// Particles escape once farther than `radius - boundary_inset` from the center
    pub boundary_inset: f64,
    /// Spawn this far beyond the current reach of the aggregate
    pub spawn_margin: f64,
    /// Maximum random-walk steps per particle
    pub max_steps: usize,
    /// Particles attempted per animation frame (1-50)
    pub iterations_per_frame: usize,
    /// Empirical particle count for a filled boundary; drives colour banding
    pub max_particles_estimate: usize,
    pub palette: Palette,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::compact()
    }
}

impl EngineSettings {
    /// 100px boundary offset to the right, stops 2px short of the edge
    pub fn compact() -> Self {
        Self {
            sizing: Sizing::default(),
            boundary_inset: 2.0,
            spawn_margin: 20.0,
            max_steps: 10_000,
            iterations_per_frame: 5,
            max_particles_estimate: 1250,
            palette: Palette::default(),
        }
    }

    /// Boundary sized from the surface height, stops 3px short of the edge
    pub fn fit_height() -> Self {
        Self {
            sizing: Sizing::FitHeight {
                padding: 5.0,
                stop_margin: 3.0,
            },
            ..Self::compact()
        }
    }

    /// Look up a named profile (case-insensitive)
    pub fn profile(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "compact" | "fixed" => Some(Self::compact()),
            "fit-height" | "fit_height" | "fitheight" | "fit" => Some(Self::fit_height()),
            _ => None,
        }
    }

    /// Adjust particles per frame within bounds
    pub fn adjust_iterations_per_frame(&mut self, delta: i32) {
        self.iterations_per_frame = (self.iterations_per_frame as i32 + delta).clamp(1, 50) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_layout() {
        let (cx, cy, r) = Sizing::default().layout(320, 250);
        assert_eq!((cx, cy, r), (290.0, 125.0, 100.0));
        assert_eq!(Sizing::default().stop_margin(), 2.0);
    }

    #[test]
    fn test_fit_height_layout() {
        let sizing = EngineSettings::fit_height().sizing;
        let (cx, cy, r) = sizing.layout(320, 250);
        assert_eq!((cx, cy, r), (160.0, 125.0, 120.0));
        assert_eq!(sizing.stop_margin(), 3.0);

        // Degenerate surfaces produce a non-positive radius
        let (_, _, r) = sizing.layout(0, 0);
        assert!(r <= 0.0);
    }

    #[test]
    fn test_profile_lookup() {
        assert_eq!(EngineSettings::profile("Compact"), Some(EngineSettings::compact()));
        assert_eq!(EngineSettings::profile("fit-height"), Some(EngineSettings::fit_height()));
        assert_eq!(EngineSettings::profile("hexagon"), None);
    }

    #[test]
    fn test_iterations_per_frame_clamped() {
        let mut settings = EngineSettings::default();
        settings.adjust_iterations_per_frame(-10);
        assert_eq!(settings.iterations_per_frame, 1);
        settings.adjust_iterations_per_frame(100);
        assert_eq!(settings.iterations_per_frame, 50);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed: EngineSettings =
            serde_json::from_str(r#"{"sizing":{"kind":"fit_height","padding":10.0,"stop_margin":3.0}}"#).unwrap();
        assert_eq!(parsed.max_steps, 10_000);
        assert_eq!(parsed.sizing.layout(100, 100).2, 40.0);
    }
}

use crate::surface::SurfaceProfile;

pub const DEFAULT_GLASS_THICKNESS: f32 = 120.0;
pub const DEFAULT_BEZEL_WIDTH: f32 = 40.0;
pub const DEFAULT_REFRACTIVE_INDEX: f32 = 1.5;
pub const DEFAULT_SAMPLE_COUNT: usize = 128;

/// Forward-difference step used when probing the surface derivative. The
/// sign flips at `x = 1` so the probe stays inside the domain.
const PROBE_STEP: f32 = 1e-4;

/// Inputs to the 1D displacement solver.
///
/// `glass_thickness` is the vertical distance light travels inside the slab
/// below the curved bezel; `bezel_width` scales the profile height into the
/// same units.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    pub glass_thickness: f32,
    pub bezel_width: f32,
    pub refractive_index: f32,
    pub samples: usize,
    pub profile: SurfaceProfile,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            glass_thickness: DEFAULT_GLASS_THICKNESS,
            bezel_width: DEFAULT_BEZEL_WIDTH,
            refractive_index: DEFAULT_REFRACTIVE_INDEX,
            samples: DEFAULT_SAMPLE_COUNT,
            profile: SurfaceProfile::default(),
        }
    }
}

/// Horizontal displacement magnitudes across the bezel, indexed from the
/// rim (index 0) to the interior (index `samples - 1`).
///
/// Solved once per filter configuration; immutable afterwards. The 2D
/// rasterizer consumes it purely by ratio lookup, so the refraction law is
/// evaluated `samples` times total rather than once per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementTable {
    values: Vec<f32>,
}

impl DisplacementTable {
    /// Runs the solver: finite-difference surface normal at each sample,
    /// vector Snell refraction with `eta = 1/refractive_index`, then the
    /// refracted ray is projected across the remaining slab height to an
    /// image plane.
    pub fn solve(config: &SolverConfig) -> Self {
        let eta = 1.0 / config.refractive_index;
        let samples = config.samples;
        let mut values = Vec::with_capacity(samples);

        for i in 0..samples {
            let x = i as f32 / samples as f32;
            let y = config.profile.value(x);
            let dx = if x < 1.0 { PROBE_STEP } else { -PROBE_STEP };
            let derivative = (config.profile.value(x + dx) - y) / dx;
            let magnitude = (derivative * derivative + 1.0).sqrt();
            let normal = (-derivative / magnitude, -1.0 / magnitude);

            match refract(normal.0, normal.1, eta) {
                // Total internal reflection: no transmitted ray, so the
                // sample contributes no displacement.
                None => values.push(0.0),
                Some((rx, ry)) => {
                    let remaining_height = y * config.bezel_width + config.glass_thickness;
                    values.push(rx * (remaining_height / ry));
                }
            }
        }

        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Looks up the sample for a distance-to-edge ratio in `[0, 1]`,
    /// clamping to the table bounds.
    pub fn sample_at_ratio(&self, ratio: f32) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let index = (ratio * self.values.len() as f32) as usize;
        self.values[index.min(self.values.len() - 1)]
    }

    /// Largest absolute displacement, floored at 1 so downstream scale
    /// factors never divide by a vanishing denominator.
    pub fn max_magnitude(&self) -> f32 {
        self.values.iter().fold(1.0_f32, |max, v| max.max(v.abs()))
    }
}

/// Vector form of Snell's law against a unit normal, specialized to the
/// incident ray travelling straight down. Returns `None` when the
/// discriminant goes negative (total internal reflection).
fn refract(normal_x: f32, normal_y: f32, eta: f32) -> Option<(f32, f32)> {
    let dot = normal_y;
    let k = 1.0 - eta * eta * (1.0 - dot * dot);
    if k < 0.0 {
        return None;
    }
    let scale = eta * dot + k.sqrt();
    Some((-scale * normal_x, eta - scale * normal_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_exactly_requested_samples() {
        let table = DisplacementTable::solve(&SolverConfig::default());
        assert_eq!(table.len(), DEFAULT_SAMPLE_COUNT);

        let table = DisplacementTable::solve(&SolverConfig {
            samples: 32,
            ..SolverConfig::default()
        });
        assert_eq!(table.len(), 32);
    }

    #[test]
    fn solver_is_deterministic() {
        let config = SolverConfig::default();
        let first = DisplacementTable::solve(&config);
        let second = DisplacementTable::solve(&config);
        assert_eq!(first, second);
    }

    #[test]
    fn default_table_is_finite_and_decays_toward_interior() {
        let table = DisplacementTable::solve(&SolverConfig::default());
        for (i, value) in table.values().iter().enumerate() {
            assert!(value.is_finite(), "sample {i} is not finite");
        }

        // The squircle is steep at the rim, so refraction bends hardest at
        // index 0 and relaxes toward the flat interior.
        let values = table.values();
        let rim = values[0].abs();
        let interior = values[values.len() - 1].abs();
        assert!(rim > 100.0, "rim displacement should dominate, got {rim}");
        assert!(interior < 0.1, "interior should be near zero, got {interior}");

        for window in values.windows(2) {
            assert!(
                window[0].abs() >= window[1].abs() - 1e-3,
                "magnitude should decay edge -> interior"
            );
        }
    }

    #[test]
    fn total_internal_reflection_yields_zero_samples() {
        // eta > 1 makes the discriminant go negative on the steep rim.
        let table = DisplacementTable::solve(&SolverConfig {
            refractive_index: 0.5,
            ..SolverConfig::default()
        });
        assert_eq!(table.values()[0], 0.0);
        assert!(table.values().iter().any(|v| *v != 0.0));
    }

    #[test]
    fn refract_matches_discriminant_sign() {
        assert!(refract(-1.0, -0.001, 2.0).is_none());
        let (rx, ry) = refract(0.0, -1.0, 1.0 / 1.5).expect("flat normal refracts");
        assert_eq!(rx, 0.0);
        assert!(ry > 0.0);
    }

    #[test]
    fn ratio_lookup_clamps_to_bounds() {
        let table = DisplacementTable::solve(&SolverConfig {
            samples: 8,
            ..SolverConfig::default()
        });
        assert_eq!(table.sample_at_ratio(0.0), table.values()[0]);
        assert_eq!(table.sample_at_ratio(5.0), table.values()[7]);
    }

    #[test]
    fn max_magnitude_is_floored_at_one() {
        let table = DisplacementTable::solve(&SolverConfig {
            glass_thickness: 0.0,
            bezel_width: 0.0,
            ..SolverConfig::default()
        });
        assert!(table.max_magnitude() >= 1.0);
    }
}

use crate::refraction::DisplacementTable;

/// Neutral displacement pixel: both offset channels centered at 128,
/// opaque alpha. Stored packed so whole rows can be block-filled.
const NEUTRAL_DISPLACEMENT: [u8; 4] = [128, 128, 0, 255];
const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Border outline of the rasterized shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BorderShape {
    /// Semicircular ends; corner radius is `min(w, h) / 2`.
    Pill,
    /// Rounded rectangle; `corner_radius` is a fraction of `min(w, h) / 2`.
    RoundedRect { corner_radius: f32 },
}

impl BorderShape {
    fn radius(&self, width: u32, height: u32) -> f32 {
        let max_radius = width.min(height) as f32 / 2.0;
        match self {
            BorderShape::Pill => max_radius,
            BorderShape::RoundedRect { corner_radius } => corner_radius * max_radius,
        }
    }
}

/// A width x height grid of interleaved RGBA8 channels.
///
/// Backed by packed little-endian u32 pixels (the same layout the encoders
/// consume byte-wise), fully initialized at construction. Producers own the
/// image until it is handed to the filter assembler, which never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl RasterImage {
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let packed = u32::from_le_bytes(rgba);
        Self {
            width,
            height,
            pixels: vec![packed; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize].to_le_bytes()
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        self.pixels[(y * self.width + x) as usize] = u32::from_le_bytes(rgba);
    }

    /// Interleaved RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Expands a 1D displacement table into the full 2D bezel field.
///
/// Every pixel is classified by proximity to the four sides; pixels inside
/// a corner square measure distance to the nearest corner-arc center,
/// straight-edge pixels use orthogonal distance. In-bezel pixels encode
/// `-normal * table_value / normalization` into the R/G channels as a
/// signed offset around 128; everything else stays neutral.
pub fn displacement_field(
    width: u32,
    height: u32,
    bezel_width: f32,
    normalization: f32,
    table: &DisplacementTable,
    shape: BorderShape,
) -> RasterImage {
    let mut image = RasterImage::filled(width, height, NEUTRAL_DISPLACEMENT);
    let radius = shape.radius(width, height);

    for py in 0..height {
        for px in 0..width {
            let xf = px as f32;
            let yf = py as f32;
            let is_left = xf < radius;
            let is_right = xf >= width as f32 - radius;
            let is_top = yf < radius;
            let is_bottom = yf >= height as f32 - radius;

            let mut dist_to_edge = f32::INFINITY;
            let mut normal = (0.0_f32, 0.0_f32);
            let mut in_bezel = false;

            if (is_left || is_right) && (is_top || is_bottom) {
                let cx = if is_left {
                    xf - radius
                } else {
                    xf - (width as f32 - radius)
                };
                let cy = if is_top {
                    yf - radius
                } else {
                    yf - (height as f32 - radius)
                };
                let dist = (cx * cx + cy * cy).sqrt();
                dist_to_edge = radius - dist;
                if (-1.0..=bezel_width).contains(&dist_to_edge) {
                    in_bezel = true;
                    // Degenerate corner center: floor the denominator so
                    // the normal stays finite.
                    let mag = if dist == 0.0 { 1.0 } else { dist };
                    normal = (cx / mag, cy / mag);
                }
            } else if is_left || is_right {
                dist_to_edge = if is_left { xf } else { width as f32 - 1.0 - xf };
                if dist_to_edge <= bezel_width {
                    in_bezel = true;
                    normal = (if is_left { -1.0 } else { 1.0 }, 0.0);
                }
            } else if is_top || is_bottom {
                dist_to_edge = if is_top { yf } else { height as f32 - 1.0 - yf };
                if dist_to_edge <= bezel_width {
                    in_bezel = true;
                    normal = (0.0, if is_top { -1.0 } else { 1.0 });
                }
            }

            if in_bezel && dist_to_edge >= 0.0 {
                let distance = table.sample_at_ratio(dist_to_edge / bezel_width);
                let dx = -normal.0 * distance / normalization;
                let dy = -normal.1 * distance / normalization;
                image.set_pixel(
                    px,
                    py,
                    [
                        encode_offset(dx),
                        encode_offset(dy),
                        0,
                        255,
                    ],
                );
            }
        }
    }

    image
}

/// Signed-offset byte encoding: 0 maps to 128, full range to 128 +/- 127.
fn encode_offset(value: f32) -> u8 {
    (128.0 + value * 127.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refraction::{DisplacementTable, SolverConfig};

    fn default_table() -> DisplacementTable {
        DisplacementTable::solve(&SolverConfig::default())
    }

    #[test]
    fn filled_image_is_fully_initialized() {
        let image = RasterImage::filled(4, 3, NEUTRAL_DISPLACEMENT);
        assert_eq!(image.as_bytes().len(), 4 * 3 * 4);
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(image.pixel(x, y), NEUTRAL_DISPLACEMENT);
            }
        }
    }

    #[test]
    fn interior_pixels_stay_neutral() {
        let table = default_table();
        let image = displacement_field(200, 60, 8.0, 100.0, &table, BorderShape::Pill);
        assert_eq!(image.pixel(100, 30), NEUTRAL_DISPLACEMENT);
    }

    #[test]
    fn bezel_pixels_are_displaced_inward() {
        let table = default_table();
        let image = displacement_field(200, 60, 8.0, 100.0, &table, BorderShape::Pill);
        // On the left straight edge... there is none for a pill wider than
        // tall; use the top edge mid-span instead. Normal is (0,-1), table
        // value positive, so the G channel lands above center.
        let top = image.pixel(100, 0);
        assert!(top[1] > 128, "top edge should push down, got {}", top[1]);
        assert_eq!(top[0], 128, "no horizontal push on a horizontal edge");
        assert_eq!(top[3], 255);
    }

    #[test]
    fn square_pill_field_is_radially_symmetric() {
        // A square pill degenerates to a disk around (size/2, size/2); the
        // field at equal arc distances must agree up to a 90 degree channel
        // swap and a sign flip across the center.
        let table = default_table();
        let size = 64;
        let center = size / 2;
        let image = displacement_field(size, size, 10.0, 100.0, &table, BorderShape::Pill);

        // In-bezel radii: distance from the disk center between radius -
        // bezel (22) and radius (32).
        for d in 22..=31 {
            let east = image.pixel(center + d, center);
            let south = image.pixel(center, center + d);
            let west = image.pixel(center - d, center);
            assert_eq!(
                east[0], south[1],
                "rotating 90 degrees must swap the offset channels at d={d}"
            );
            assert_eq!(east[1], 128);
            assert_eq!(south[0], 128);
            assert!(
                (east[0] as i32 + west[0] as i32 - 256).abs() <= 1,
                "opposite radii must carry opposite offsets at d={d}"
            );
        }

        // Same distance (25) along swapped diagonal directions.
        let a = image.pixel(center + 15, center + 20);
        let b = image.pixel(center + 20, center + 15);
        assert_eq!(a[0], b[1]);
        assert_eq!(a[1], b[0]);
    }

    #[test]
    fn rounded_rect_keeps_straight_edges_outside_corner_radius() {
        let table = default_table();
        let image = displacement_field(
            120,
            60,
            6.0,
            100.0,
            &table,
            BorderShape::RoundedRect { corner_radius: 0.5 },
        );
        // corner radius = 0.5 * 30 = 15, so x=60 on the top edge is a
        // straight-edge pixel with a pure vertical normal.
        let p = image.pixel(60, 0);
        assert_eq!(p[0], 128);
        assert!(p[1] > 128);
    }
}

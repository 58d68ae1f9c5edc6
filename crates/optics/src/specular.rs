use crate::raster::RasterImage;

/// Default incidence angle of the specular light, in radians (60 degrees).
pub const DEFAULT_SPECULAR_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

/// Paints the angle-dependent rim highlight into a transparent image.
///
/// Only a thin annulus tracking the border contributes: a pixel is lit when
/// its squared distance from the nearest corner-arc center lies within
/// `[(radius - bezel)^2, (radius + 1)^2]`. Within the band the intensity is
/// the product of an angular term (`|cos(pixel angle - light angle)|`) and a
/// thickness term peaking at grazing distance from the rim, squared into
/// the alpha so the highlight rolls off smoothly. Pixels in the flat middle
/// band have offset 0 on that axis and fall inside the annulus only near
/// the top/bottom rim.
pub fn specular_highlight(
    width: u32,
    height: u32,
    radius: f32,
    bezel_width: f32,
    light_angle: f32,
) -> RasterImage {
    let mut image = RasterImage::filled(width, height, [0, 0, 0, 0]);

    let light = (light_angle.cos(), light_angle.sin());
    let r_sq = radius * radius;
    let r_plus_sq = (radius + 1.0) * (radius + 1.0);
    let r_minus_b = (radius - bezel_width).max(0.0);
    let r_minus_b_sq = r_minus_b * r_minus_b;
    let width_between = width as f32 - radius * 2.0;
    let height_between = height as f32 - radius * 2.0;

    for py in 0..height {
        for px in 0..width {
            let xf = px as f32;
            let yf = py as f32;
            let is_left = xf < radius;
            let is_right = xf >= width as f32 - radius;
            let is_top = yf < radius;
            let is_bottom = yf >= height as f32 - radius;

            let x = if is_left {
                xf - radius
            } else if is_right {
                xf - radius - width_between
            } else {
                0.0
            };
            let y = if is_top {
                yf - radius
            } else if is_bottom {
                yf - radius - height_between
            } else {
                0.0
            };
            let d_sq = x * x + y * y;

            if d_sq <= r_plus_sq && d_sq >= r_minus_b_sq {
                let dist = d_sq.sqrt();
                let dist_from_side = radius - dist;
                let opacity = if d_sq < r_sq {
                    1.0
                } else {
                    1.0 - (dist - radius) / ((radius + 1.0) - radius)
                };
                let (cos, sin) = if dist > 0.0 {
                    (x / dist, -y / dist)
                } else {
                    (0.0, 0.0)
                };
                let angular = (cos * light.0 + sin * light.1).abs();
                let t = 1.0 - dist_from_side;
                let coeff = angular * (1.0 - t * t).max(0.0).sqrt();
                let gray = 255.0 * coeff;
                let alpha = gray * coeff * opacity;
                image.set_pixel(px, py, [to_byte(gray), to_byte(gray), to_byte(gray), to_byte(alpha)]);
            }
        }
    }

    image
}

fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

//! Qualitative "Set2" palette shared by the raster and Plotly renderers.

use plotters::style::RGBColor;

const SET2: [(u8, u8, u8); 8] = [
    (0x66, 0xc2, 0xa5),
    (0xfc, 0x8d, 0x62),
    (0x8d, 0xa0, 0xcb),
    (0xe7, 0x8a, 0xc3),
    (0xa6, 0xd8, 0x54),
    (0xff, 0xd9, 0x2f),
    (0xe5, 0xc4, 0x94),
    (0xb3, 0xb3, 0xb3),
];

/// Color for the `index`-th series, cycling through the palette.
pub fn color(index: usize) -> RGBColor {
    let (r, g, b) = SET2[index % SET2.len()];
    RGBColor(r, g, b)
}

/// CSS hex string for the `index`-th series.
pub fn hex(index: usize) -> String {
    let (r, g, b) = SET2[index % SET2.len()];
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

/// Sequential blue ramp for heatmap cells, `t` in [0, 1].
pub fn sequential(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(lerp(0xf7, 0x08), lerp(0xfb, 0x30), lerp(0xff, 0x6b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(hex(0), "#66c2a5");
        assert_eq!(hex(8), hex(0));
        assert_eq!(color(1), RGBColor(0xfc, 0x8d, 0x62));
    }

    #[test]
    fn test_sequential_endpoints() {
        assert_eq!(sequential(0.0), RGBColor(0xf7, 0xfb, 0xff));
        assert_eq!(sequential(1.0), RGBColor(0x08, 0x30, 0x6b));
        assert_eq!(sequential(2.0), sequential(1.0));
    }
}

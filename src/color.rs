use palette::{Hsl, IntoColor, Srgb};
use thiserror::Error;

/// An 8-bit sRGB colour, shared by the exporter and the viewer.
pub type Rgb8 = Srgb<u8>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown colour '{0}'")]
pub struct ColorError(pub String);

// ---------------------------------------------------------------------------
// Colour strings
// ---------------------------------------------------------------------------

/// The `tab:` qualitative palette.
const TABLEAU: [(&str, u32); 10] = [
    ("blue", 0x1f77b4),
    ("orange", 0xff7f0e),
    ("green", 0x2ca02c),
    ("red", 0xd62728),
    ("purple", 0x9467bd),
    ("brown", 0x8c564b),
    ("pink", 0xe377c2),
    ("gray", 0x7f7f7f),
    ("olive", 0xbcbd22),
    ("cyan", 0x17becf),
];

fn from_hex(value: u32) -> Rgb8 {
    Srgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
}

/// Parse a colour string.
///
/// Supported forms:
/// * `#ff9933`, `#f93` – hex
/// * `b g r c m y k w` – single-letter codes
/// * `tab:orange` – Tableau palette
/// * `green`, `steelblue` – CSS / X11 names
pub fn parse_color(s: &str) -> Result<Rgb8, ColorError> {
    let name = s.trim().to_ascii_lowercase();

    if name.starts_with('#') {
        return name
            .parse::<Rgb8>()
            .map_err(|_| ColorError(s.to_string()));
    }

    let short = match name.as_str() {
        "b" => Some(from_hex(0x0000ff)),
        "g" => Some(from_hex(0x008000)),
        "r" => Some(from_hex(0xff0000)),
        "c" => Some(from_hex(0x00bfbf)),
        "m" => Some(from_hex(0xbf00bf)),
        "y" => Some(from_hex(0xbfbf00)),
        "k" => Some(from_hex(0x000000)),
        "w" => Some(from_hex(0xffffff)),
        _ => None,
    };
    if let Some(c) = short {
        return Ok(c);
    }

    if let Some(tab) = name.strip_prefix("tab:") {
        let tab = if tab == "grey" { "gray" } else { tab };
        return TABLEAU
            .iter()
            .find(|(n, _)| *n == tab)
            .map(|&(_, hex)| from_hex(hex))
            .ok_or_else(|| ColorError(s.to_string()));
    }

    palette::named::from_str(&name).ok_or_else(|| ColorError(s.to_string()))
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Rgb8> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_codes() {
        assert_eq!(parse_color("#ff9933").unwrap(), Srgb::new(0xff, 0x99, 0x33));
        assert_eq!(parse_color("#000000").unwrap(), Srgb::new(0, 0, 0));
        assert_eq!(parse_color("g").unwrap(), Srgb::new(0, 128, 0));
        assert_eq!(parse_color("b").unwrap(), Srgb::new(0, 0, 255));
    }

    #[test]
    fn parses_tableau_and_named() {
        assert_eq!(parse_color("tab:orange").unwrap(), Srgb::new(0xff, 0x7f, 0x0e));
        assert_eq!(parse_color("Tab:Grey").unwrap(), Srgb::new(0x7f, 0x7f, 0x7f));
        assert_eq!(parse_color("red").unwrap(), Srgb::new(255, 0, 0));
    }

    #[test]
    fn unknown_colour_is_an_error() {
        assert_eq!(parse_color("tab:mauve"), Err(ColorError("tab:mauve".into())));
        assert!(parse_color("notacolour").is_err());
        assert!(parse_color("#12").is_err());
    }

    #[test]
    fn palette_has_distinct_entries() {
        let p = generate_palette(3);
        assert_eq!(p.len(), 3);
        assert_ne!(p[0], p[1]);
        assert_ne!(p[1], p[2]);
        assert!(generate_palette(0).is_empty());
    }
}

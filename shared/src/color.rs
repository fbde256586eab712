/// Swatches offered by the palette. The set is closed, so selections are
/// never validated beyond the index bound.
pub const SWATCHES: [&str; 12] = [
    "rgb(0, 0, 0)",
    "rgb(255, 255, 255)",
    "#ee3333",
    "#e64980",
    "#be4bdb",
    "#893200",
    "#228be6",
    "#3333ee",
    "#40c057",
    "#00aa00",
    "#fab005",
    "#fd7e14",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `#rgb` and `rgb(r, g, b)`.
    pub fn parse_css(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        let inner = value
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))?;
        let mut channels = inner.split(',').map(|part| part.trim().parse::<u8>());
        let r = channels.next()?.ok()?;
        let g = channels.next()?.ok()?;
        let b = channels.next()?.ok()?;
        if channels.next().is_some() {
            return None;
        }
        Some(Self { r, g, b })
    }

    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Rgb {
            r: channel(&hex[0..2])?,
            g: channel(&hex[2..4])?,
            b: channel(&hex[4..6])?,
        }),
        3 => {
            let expand = |s: &str| channel(s).map(|v| v * 17);
            Some(Rgb {
                r: expand(&hex[0..1])?,
                g: expand(&hex[1..2])?,
                b: expand(&hex[2..3])?,
            })
        }
        _ => None,
    }
}

pub fn swatch(index: usize) -> Option<Rgb> {
    SWATCHES.get(index).and_then(|value| Rgb::parse_css(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_white() {
        assert_eq!(Rgb::default(), Rgb::new(255, 255, 255));
        assert_eq!(Rgb::default().rgba(), [255, 255, 255, 255]);
    }

    #[test]
    fn parses_hex_and_rgb_forms() {
        assert_eq!(Rgb::parse_css("#ee3333"), Some(Rgb::new(0xee, 0x33, 0x33)));
        assert_eq!(Rgb::parse_css("#fff"), Some(Rgb::WHITE));
        assert_eq!(Rgb::parse_css("rgb(1, 2, 3)"), Some(Rgb::new(1, 2, 3)));
        assert_eq!(Rgb::parse_css("rgb(1,2)"), None);
        assert_eq!(Rgb::parse_css("rgb(1,2,3,4)"), None);
        assert_eq!(Rgb::parse_css("#12345"), None);
        assert_eq!(Rgb::parse_css("red"), None);
    }

    #[test]
    fn every_swatch_parses() {
        for index in 0..SWATCHES.len() {
            assert!(swatch(index).is_some(), "swatch {index} did not parse");
        }
        assert_eq!(swatch(SWATCHES.len()), None);
    }
}

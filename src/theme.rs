#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub const fn hex(value: u32) -> Rgb {
        Rgb::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    pub fn to_rgba_f32(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

pub fn parse_hex_color(text: &str) -> Option<Rgb> {
    let text = text.trim();
    let digits = text.strip_prefix('#').unwrap_or(text);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    match digits.len() {
        3 => {
            let value = u32::from_str_radix(digits, 16).ok()?;
            let expand = |nibble: u32| (nibble as u8) * 0x11;
            Some(Rgb::new(
                expand((value >> 8) & 0xf),
                expand((value >> 4) & 0xf),
                expand(value & 0xf),
            ))
        }
        6 => Some(Rgb::hex(u32::from_str_radix(digits, 16).ok()?)),
        _ => None,
    }
}

// Hue in degrees `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Hsl {
        Hsl {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 1.0),
            l: l.clamp(0.0, 1.0),
        }
    }
}

impl From<Rgb> for Hsl {
    fn from(c: Rgb) -> Hsl {
        let r = c.r as f32 / 255.0;
        let g = c.g as f32 / 255.0;
        let b = c.b as f32 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) * 0.5;
        let d = max - min;

        if d == 0.0 {
            return Hsl::new(0.0, 0.0, l);
        }

        let s = d / (1.0 - (2.0 * l - 1.0).abs());
        let h = if max == r {
            60.0 * ((g - b) / d).rem_euclid(6.0)
        } else if max == g {
            60.0 * ((b - r) / d + 2.0)
        } else {
            60.0 * ((r - g) / d + 4.0)
        };
        Hsl::new(h, s, l)
    }
}

impl From<Hsl> for Rgb {
    fn from(c: Hsl) -> Rgb {
        let chroma = (1.0 - (2.0 * c.l - 1.0).abs()) * c.s;
        let h = c.h / 60.0;
        let x = chroma * (1.0 - (h.rem_euclid(2.0) - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let m = c.l - chroma * 0.5;
        let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(channel(r), channel(g), channel(b))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeTokens {
    pub background: Rgb,
    pub grid: Rgb,
    pub solid: Rgb,
    pub platform: Rgb,
    pub hazard: Rgb,
    pub goal: Rgb,
    pub coin: Rgb,
    pub player: Rgb,
    pub text: Rgb,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        ThemeTokens {
            background: Rgb::hex(0xF3EAD7),
            grid: Rgb::hex(0xE9E2CF),
            solid: Rgb::hex(0x2B2A26),
            platform: Rgb::hex(0x8C8169),
            hazard: Rgb::hex(0xD96B6B),
            goal: Rgb::hex(0x58B883),
            coin: Rgb::hex(0xE6C35C),
            player: Rgb::hex(0x2D2C28),
            text: Rgb::hex(0x1F1E1A),
        }
    }
}

const HAZARD_HUE: f32 = 0.0;
const GOAL_HUE: f32 = 145.0;

// Moves hue `from` towards `to` by `t` along the shorter arc.
fn blend_hue(from: f32, to: f32, t: f32) -> f32 {
    let delta = (to - from + 540.0).rem_euclid(360.0) - 180.0;
    from + delta * t
}

// Hazard and goal keep their own hues, pulled slightly towards the accent
pub fn derive_theme(accent: Option<Rgb>) -> ThemeTokens {
    let Some(accent) = accent else {
        return ThemeTokens::default();
    };
    let a = Hsl::from(accent);
    let tint = a.s.min(0.5);

    ThemeTokens {
        background: Hsl::new(a.h, tint * 0.55, 0.91).into(),
        grid: Hsl::new(a.h, tint * 0.45, 0.85).into(),
        solid: Hsl::new(a.h, tint * 0.3, 0.16).into(),
        platform: Hsl::new(a.h, tint * 0.5, 0.48).into(),
        hazard: Hsl::new(blend_hue(HAZARD_HUE, a.h, 0.15), 0.6, 0.64).into(),
        goal: Hsl::new(blend_hue(GOAL_HUE, a.h, 0.15), 0.4, 0.53).into(),
        coin: Hsl::new(a.h, a.s.max(0.55), a.l.clamp(0.5, 0.68)).into(),
        player: Hsl::new(a.h, tint * 0.2, 0.17).into(),
        text: Hsl::new(a.h, tint * 0.2, 0.11).into(),
    }
}

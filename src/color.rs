use glam::{vec3, Vec3};

/// An sRGB color with 8 bits per channel.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const NAMED_COLORS: [(&str, u32); 10] = [
    ("black", 0x000000),
    ("white", 0xffffff),
    ("red", 0xff0000),
    ("green", 0x008000),
    ("blue", 0x0000ff),
    ("yellow", 0xffff00),
    ("orange", 0xffa500),
    ("teal", 0x008080),
    ("gray", 0x808080),
    ("lightgray", 0xd3d3d3),
];

impl Color {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// Accepts `#rrggbb`, `#rgb`, `0xrrggbb` or a CSS color name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(digits) = s.strip_prefix('#') {
            return match digits.len() {
                6 => hex_digits(digits).map(Self::from_hex),
                3 => {
                    let short = hex_digits(digits)?;
                    let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                    Some(Self::from_hex((r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11))
                }
                _ => None,
            };
        }
        if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            return match digits.len() {
                6 => hex_digits(digits).map(Self::from_hex),
                _ => None,
            };
        }

        let name = s.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, hex)| Self::from_hex(*hex))
    }

    pub fn to_srgb(self) -> Vec3 {
        vec3(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    pub fn to_linear(self) -> Vec3 {
        let srgb = self.to_srgb();
        vec3(
            srgb_to_linear(srgb.x),
            srgb_to_linear(srgb.y),
            srgb_to_linear(srgb.z),
        )
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        let linear = color.to_linear();
        wgpu::Color {
            r: linear.x as f64,
            g: linear.y as f64,
            b: linear.z as f64,
            a: 1.0,
        }
    }
}

/// Only bare hex digits; `from_str_radix` alone would also take a sign.
fn hex_digits(digits: &str) -> Option<u32> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

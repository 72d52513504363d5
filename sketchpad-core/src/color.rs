/// An 8-bit-per-channel, straight alpha sRGB pixel. This is the storage format of every raster surface.
#[repr(C)]
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, bytemuck::Pod, bytemuck::Zeroable, Debug,
)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub const fn as_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
    /// Source-over composite of `self` onto `dst`, with an extra coverage factor in `[0, 1]`.
    #[must_use]
    pub fn over(self, dst: Self, coverage: f32) -> Self {
        let src_a = f32::from(self.a) / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return dst;
        }
        let dst_a = f32::from(dst.a) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let channel = |src: u8, dst: u8| -> u8 {
            let src = f32::from(src) * src_a;
            let dst = f32::from(dst) * dst_a * (1.0 - src_a);
            ((src + dst) / out_a).round().clamp(0.0, 255.0) as u8
        };
        Self {
            r: channel(self.r, dst.r),
            g: channel(self.g, dst.g),
            b: channel(self.b, dst.b),
            a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
        }
    }
}
impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit")]
    BadDigit,
}

/// Parse from `#rrggbb` or `#rrggbbaa`, case-insensitive. Alpha defaults to opaque.
impl std::str::FromStr for Rgba8 {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        // from_str_radix would accept a leading '+', so check digits up front.
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::BadDigit);
        }
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorParseError::BadLength(digits.len()));
        }
        let byte = |idx: usize| -> Result<u8, ColorParseError> {
            u8::from_str_radix(&digits[idx * 2..idx * 2 + 2], 16)
                .map_err(|_| ColorParseError::BadDigit)
        };
        let a = if digits.len() == 8 { byte(3)? } else { 255 };
        Ok(Self::new(byte(0)?, byte(1)?, byte(2)?, a))
    }
}
impl std::fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }
}

/// Straight-alpha sRGB color, one byte per channel.
///
/// This is the color model of the draw-color API: the value handed to
/// `DisplaySurface::set_draw_color` is exactly the pixel expected on screen.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Cornflower blue, `(100, 149, 237)`.
    pub const CORNFLOWER_BLUE: Self = Self::rgb(100, 149, 237);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Converts to a clear value for a render pass.
    ///
    /// When the target format is sRGB the GPU encodes on store, so the channels
    /// are decoded to linear first; otherwise the bytes are passed through.
    pub fn to_wgpu(self, srgb_target: bool) -> wgpu::Color {
        let channel = |c: u8| {
            let v = c as f64 / 255.0;
            if srgb_target { srgb_to_linear(v) } else { v }
        };

        wgpu::Color {
            r: channel(self.r),
            g: channel(self.g),
            b: channel(self.b),
            a: self.a as f64 / 255.0,
        }
    }
}

/// sRGB transfer function, decoded to linear. Input and output in `[0, 1]`.
#[inline]
pub fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

const MAX_SAMPLE_VALUE: f32 = 255_f32;

/// A single RGB sample with channels normalized to `0.0..=1.0`
///
/// Values outside the range are kept as they are; they only
/// matter once the color is converted back to 8-bit samples.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    pub fn new(red: f32, green: f32, blue: f32) -> Self {
        Color { red, green, blue }
    }

    /// Builds a color from a stored BMP sample (blue, green, red)
    pub fn from_bgr(sample: &[u8; 3]) -> Self {
        Color {
            red: sample[2] as f32 / MAX_SAMPLE_VALUE,
            green: sample[1] as f32 / MAX_SAMPLE_VALUE,
            blue: sample[0] as f32 / MAX_SAMPLE_VALUE,
        }
    }

    /// Converts into a BMP sample (blue, green, red)
    ///
    /// Each channel is scaled by 255 and truncated toward zero.
    /// Channels above 1.0 saturate at 0xFF, channels below 0.0
    /// and NaN become 0x00.
    pub fn to_bgr(&self) -> [u8; 3] {
        [
            to_sample(self.blue),
            to_sample(self.green),
            to_sample(self.red),
        ]
    }
}

fn to_sample(channel: f32) -> u8 {
    (channel * MAX_SAMPLE_VALUE) as u8
}

#[cfg(test)]
impl Color {
    pub fn white() -> Self {
        Color::new(1.0, 1.0, 1.0)
    }
}

#[cfg(test)]
mod test {
    use super::Color;

    #[test]
    fn default_is_black() {
        let color = Color::default();
        assert_eq!(color, Color::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn new_does_not_clamp() {
        let color = Color::new(2.0, -1.0, 0.5);
        assert_eq!(color.red, 2.0);
        assert_eq!(color.green, -1.0);
        assert_eq!(color.blue, 0.5);
    }

    #[test]
    fn convert_bgr_sample_to_color() {
        let color = Color::from_bgr(&[0x00, 0x33, 0xFF]);
        assert_eq!(color.red, 1.0, "red is wrong");
        assert!(
            color.green >= 0.19999 && color.green <= 0.20001,
            "green is wrong, was {}",
            color.green
        );
        assert_eq!(color.blue, 0.0, "blue is wrong");
    }

    #[test]
    fn convert_white_to_bgr() {
        assert_eq!(Color::white().to_bgr(), [0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn convert_truncates_toward_zero() {
        let color = Color::new(0.999, 0.5, 0.002);
        assert_eq!(color.to_bgr(), [0, 127, 254]);
    }

    #[test]
    fn convert_out_of_range_channels_saturate() {
        let color = Color::new(2.0, -0.5, f32::NAN);
        assert_eq!(color.to_bgr(), [0x00, 0x00, 0xFF]);
        assert_eq!(color.to_bgr(), color.to_bgr(), "conversion must be stable");
    }

    #[test]
    fn every_sample_survives_conversion() {
        for value in 0..=u8::MAX {
            let color = Color::from_bgr(&[value, value, value]);
            assert_eq!(color.to_bgr(), [value; 3], "sample {} changed", value);
        }
    }
}

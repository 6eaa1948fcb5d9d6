//! Raw register bytes to signed samples to physical values.
//!
//! All supported chips lay their samples out low byte first, in increasing
//! register order, with X, Y, Z following each other for 3-axis data.

use nalgebra::Vector3;

/// Largest raw sample any quantity produces (three 16-bit axes).
pub const MAX_SAMPLE_LEN: usize = 6;

/// Two's-complement 16-bit sample, low byte first.
pub const fn decode_i16(bytes: [u8; 2]) -> i16 {
    i16::from_le_bytes(bytes)
}

/// 24-bit sample, low byte first, sign-extended from bit 23.
pub const fn decode_i24(bytes: [u8; 3]) -> i32 {
    let raw = (bytes[2] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[0] as u32;
    if raw & 0x0080_0000 != 0 {
        (raw | 0xFF00_0000) as i32
    } else {
        raw as i32
    }
}

/// Collects 6 bytes into a vector of i16 values, X first
pub fn decode_axes(bytes: [u8; 6]) -> Vector3<i16> {
    let [xl, xh, yl, yh, zl, zh] = bytes;
    Vector3::new(
        decode_i16([xl, xh]),
        decode_i16([yl, yh]),
        decode_i16([zl, zh]),
    )
}

/// Byte layout of one quantity in the register file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Layout {
    /// One 16-bit word
    I16,
    /// One 24-bit word (pressure)
    I24,
    /// X, Y and Z as 16-bit words
    Axes,
}

impl Layout {
    /// Number of registers the quantity spans.
    pub const fn len(self) -> usize {
        match self {
            Self::I16 => 2,
            Self::I24 => 3,
            Self::Axes => 6,
        }
    }
}

/// Raw bytes of one sample exactly as read from the chip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawSample {
    bytes: [u8; MAX_SAMPLE_LEN],
    layout: Layout,
}

impl RawSample {
    /// Wrap the bytes of a sample. Returns `None` if the length does not
    /// match the layout.
    pub fn new(layout: Layout, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != layout.len() {
            return None;
        }
        let mut buf = [0u8; MAX_SAMPLE_LEN];
        buf[..bytes.len()].copy_from_slice(bytes);
        Some(Self { bytes: buf, layout })
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.layout.len()]
    }

    /// Sign-extended integer value(s) of the sample.
    pub fn decode(&self) -> Sample {
        let b = self.bytes;
        match self.layout {
            Layout::I16 => Sample::Scalar(decode_i16([b[0], b[1]]).into()),
            Layout::I24 => Sample::Scalar(decode_i24([b[0], b[1], b[2]])),
            Layout::Axes => Sample::Axes(decode_axes(b)),
        }
    }
}

/// Decoded but unscaled sample.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Sample {
    Scalar(i32),
    Axes(Vector3<i16>),
}

/// Conversion from LSB to physical unit.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scale {
    /// LSB per unit; the raw value is divided by it
    Divisor(f32),
    /// Unit per LSB; the raw value is multiplied by it
    Sensitivity(f32),
}

impl Scale {
    pub fn apply(self, raw: f32) -> f32 {
        match self {
            Self::Divisor(d) => raw / d,
            Self::Sensitivity(s) => raw * s,
        }
    }
}

/// Scaled sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PhysicalValue {
    Scalar(f32),
    Vector(Vector3<f32>),
}

impl PhysicalValue {
    pub fn scalar(self) -> Option<f32> {
        match self {
            Self::Scalar(v) => Some(v),
            Self::Vector(_) => None,
        }
    }

    pub fn vector(self) -> Option<Vector3<f32>> {
        match self {
            Self::Scalar(_) => None,
            Self::Vector(v) => Some(v),
        }
    }
}

/// Apply `scale` then `offset` to every component of `sample`.
pub fn to_physical(sample: Sample, scale: Scale, offset: f32) -> PhysicalValue {
    match sample {
        // i24 values fit the f32 mantissa exactly
        Sample::Scalar(raw) => PhysicalValue::Scalar(scale.apply(raw as f32) + offset),
        Sample::Axes(raw) => {
            PhysicalValue::Vector(raw.map(|x| scale.apply(f32::from(x)) + offset))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i16_covers_full_range() {
        for value in i16::MIN..=i16::MAX {
            let [lo, hi] = value.to_le_bytes();
            assert_eq!(decode_i16([lo, hi]), value);
        }
    }

    #[test]
    fn i16_is_low_byte_first() {
        assert_eq!(decode_i16([0x34, 0x12]), 0x1234);
        assert_eq!(decode_i16([0xFF, 0xFF]), -1);
        assert_eq!(decode_i16([0x00, 0x80]), i16::MIN);
    }

    #[test]
    fn i24_sign_extends_bit_23() {
        assert_eq!(decode_i24([0x00, 0x00, 0x80]), -8_388_608);
        assert_eq!(decode_i24([0xFF, 0xFF, 0x7F]), 8_388_607);
        assert_eq!(decode_i24([0xFF, 0xFF, 0xFF]), -1);
        assert_eq!(decode_i24([0x00, 0x10, 0x00]), 4096);
    }

    #[test]
    fn axes_keep_xyz_order() {
        let axes = decode_axes([0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
        assert_eq!(axes, Vector3::new(1, 2, 3));

        let axes = decode_axes([0xFF, 0xFF, 0x00, 0x80, 0xFF, 0x7F]);
        assert_eq!(axes, Vector3::new(-1, i16::MIN, i16::MAX));
    }

    #[test]
    fn pressure_and_temperature_scale_exactly() {
        let pressure = to_physical(Sample::Scalar(4096), Scale::Divisor(4096.0), 0.0);
        assert_eq!(pressure, PhysicalValue::Scalar(1.0));

        let temperature = to_physical(Sample::Scalar(100), Scale::Divisor(100.0), 0.0);
        assert_eq!(temperature, PhysicalValue::Scalar(1.0));
    }

    #[test]
    fn offset_is_applied_after_scaling() {
        let value = to_physical(Sample::Scalar(512), Scale::Divisor(256.0), 25.0);
        assert_eq!(value, PhysicalValue::Scalar(27.0));
    }

    #[test]
    fn raw_sample_rejects_wrong_length() {
        assert!(RawSample::new(Layout::I24, &[0, 0]).is_none());

        let raw = RawSample::new(Layout::I24, &[0x00, 0x00, 0x80]).unwrap();
        assert_eq!(raw.as_bytes(), &[0x00, 0x00, 0x80]);
        assert_eq!(raw.decode(), Sample::Scalar(-8_388_608));
    }
}

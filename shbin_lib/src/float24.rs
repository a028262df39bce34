//! Conversions for the 24-bit floats used by float uniform payloads.
//!
//! The packed layout is 1 sign bit, a 7-bit exponent with a bias of 63, and a 16-bit mantissa.
//! Encoding truncates the low 7 mantissa bits, so only values with those bits already zero
//! round trip exactly.

const SIGN_BIT: u32 = 23;
const EXPONENT_MASK: u32 = 0x7F;
const MANTISSA_MASK: u32 = 0xFFFF;

/// Encode `value` to the packed 24-bit representation.
///
/// Values too small for the exponent range become `0`.
/// Values too large clamp the exponent to its maximum and keep the truncated mantissa.
pub fn f32_to_f24(value: f32) -> u32 {
    if value == 0.0 {
        return 0;
    }

    let bits = value.to_bits();
    let sign = (bits >> 31) & 1;
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x7FFFFF;

    let exponent = exponent - 127 + 63;
    if exponent <= 0 {
        return 0;
    }
    let exponent = exponent.min(127) as u32;

    (sign << SIGN_BIT) | (exponent << 16) | (mantissa >> 7)
}

/// Encode a parsed `f64` like [f32_to_f24].
///
/// Finite values outside the `f32` range become `0`.
/// Infinity is kept and clamps like any other large value.
pub fn f64_to_f24(value: f64) -> u32 {
    let narrowed = value as f32;
    if value.is_finite() && narrowed.is_infinite() {
        0
    } else {
        f32_to_f24(narrowed)
    }
}

/// Decode the packed 24-bit representation in the low bits of `value`.
///
/// Only a `value` of `0` decodes to `0.0`.
/// Bits above the low 24 bits are ignored when unpacking the other fields.
pub fn f24_to_f32(value: u32) -> f32 {
    if value == 0 {
        return 0.0;
    }

    let sign = (value >> SIGN_BIT) & 1;
    let exponent = (value >> 16) & EXPONENT_MASK;
    let mantissa = value & MANTISSA_MASK;

    let exponent = exponent + 127 - 63;
    f32::from_bits((sign << 31) | (exponent << 23) | (mantissa << 7))
}

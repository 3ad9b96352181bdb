// Copyright 2026 the Tilepass Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bit-level conversions between `f32` and the hardware number formats.

/// Largest value any shared-exponent field of the shading stream can hold.
pub const MAX_EXPONENT: i32 = 15;

/// Returns the raw IEEE-754 bit pattern of `val` for direct storage in a
/// stream word.
#[inline]
pub fn float_bits(val: f32) -> u32 {
    val.to_bits()
}

/// Returns the magnitude of `val` as an integer.
///
/// For finite values the result orders exactly like `val.abs()`, which lets
/// largest-magnitude searches run on integers.
#[inline]
pub fn magnitude_bits(val: f32) -> u32 {
    val.to_bits() & 0x7fff_ffff
}

/// Returns the largest magnitude in `values`, or `0.0` for an empty slice.
///
/// NaNs are ignored.
pub fn largest_magnitude(values: &[f32]) -> f32 {
    let bits = values
        .iter()
        .filter(|v| !v.is_nan())
        .map(|v| magnitude_bits(*v))
        .max()
        .unwrap_or(0);
    f32::from_bits(bits)
}

const HW20_SIGN: u32 = 1 << 19;
const HW20_MAX: u32 = 0x7_f7ff;
const INF_32: u32 = 255 << 23;
const MIN_NORMAL_32: u32 = 1 << 23;

/// Converts an `f32` to the 20-bit rasterizer float, returned in the low bits
/// of a `u32`.
///
/// The format keeps the IEEE sign and 8-bit exponent and rounds the mantissa
/// to 11 bits. Infinities clamp to the largest finite value, NaNs become zero
/// and denormals flush to zero.
pub fn f32_to_hw20(val: f32) -> u32 {
    let u = val.to_bits();
    let sign = (u >> 12) & HW20_SIGN;
    let mag = u & 0x7fff_ffff;
    if mag > INF_32 {
        return 0;
    }
    let out = if mag == INF_32 {
        HW20_MAX
    } else if mag < MIN_NORMAL_32 {
        0
    } else {
        // Round to nearest, carrying into the exponent when needed.
        ((mag + 0x800) >> 12).min(HW20_MAX)
    };
    out | sign
}

/// Expands a 20-bit rasterizer float back to `f32`.
pub fn hw20_to_f32(bits: u32) -> f32 {
    f32::from_bits((bits & 0xf_ffff) << 12)
}

/// Packs a signed value into the low `bits` bits of a word.
#[inline]
pub fn pack_signed(value: i32, bits: u32) -> u32 {
    (value as u32) & ((1_u32 << bits) - 1)
}

/// Sign-extends the low `bits` bits of `field`.
#[inline]
pub fn unpack_signed(field: u32, bits: u32) -> i32 {
    let shift = 32 - bits;
    ((field << shift) as i32) >> shift
}

/// A group of fixed-point mantissas sharing one fraction exponent.
///
/// The decoded value of mantissa `m` is `m * 2^-exponent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharedExponent<const N: usize> {
    pub mantissas: [i32; N],
    pub exponent: u32,
}

impl<const N: usize> SharedExponent<N> {
    /// Encodes `values` into signed mantissas of `mantissa_bits` bits.
    ///
    /// The natural exponent is the largest `n` for which the largest
    /// magnitude still fits the mantissa after scaling by `2^n`. The stored
    /// exponent is the natural one clamped to `[0, MAX_EXPONENT]`: above the
    /// range the mantissas are arithmetically shifted right by the excess,
    /// below it they saturate.
    pub fn encode(values: [f32; N], mantissa_bits: u32) -> Self {
        let limit = (1_i64 << (mantissa_bits - 1)) - 1;
        let largest = largest_magnitude(&values);
        if largest == 0.0 || !largest.is_finite() {
            return Self {
                mantissas: [0; N],
                exponent: MAX_EXPONENT as u32,
            };
        }
        let natural = natural_exponent(largest as f64, limit as f64);
        let exponent = natural.clamp(0, MAX_EXPONENT);
        let mantissas = values.map(|v| {
            let v = if v.is_nan() { 0.0 } else { v as f64 };
            if natural > MAX_EXPONENT {
                let m = (v * pow2(natural)).round() as i64;
                let excess = (natural - MAX_EXPONENT).min(63) as u32;
                (m >> excess) as i32
            } else {
                let m = (v * pow2(exponent)).round() as i64;
                m.clamp(-limit, limit) as i32
            }
        });
        Self {
            mantissas,
            exponent: exponent as u32,
        }
    }

    /// Returns the values the hardware will reconstruct.
    pub fn decode(&self) -> [f32; N] {
        let scale = pow2(-(self.exponent as i32));
        self.mantissas.map(|m| (m as f64 * scale) as f32)
    }
}

/// Largest `n` such that `largest * 2^n <= limit`.
fn natural_exponent(largest: f64, limit: f64) -> i32 {
    let mut n = (limit / largest).log2().floor() as i32;
    while largest * pow2(n) > limit {
        n -= 1;
    }
    while largest * pow2(n + 1) <= limit {
        n += 1;
    }
    n
}

#[inline]
fn pow2(n: i32) -> f64 {
    2_f64.powi(n)
}

/// Converts a value in `[-1, 1]` to 1.15 fixed point.
pub fn to_fixed_1_15(val: f32) -> i32 {
    ((val as f64 * 32768.0).round() as i64).clamp(-32767, 32767) as i32
}

/// Bias of the mip compression float exponent.
pub const MIP_EXPONENT_BIAS: i32 = 7;

/// Encodes a texture compression value as the `(exponent, mantissa)` pair
/// consumed by the texturing unit.
///
/// The value is `(1 + m / 65536) * 2^(e - 7)` with `e` in `[0, 15]`. Values
/// below the range clamp to the smallest encoding, values above it (and
/// infinities) to the largest. Non-positive values and NaN encode as the
/// smallest value.
pub fn encode_mip_float(value: f32) -> (u32, u32) {
    if value.is_nan() || value <= 0.0 {
        return (0, 0);
    }
    let bits = value.to_bits();
    let exp = ((bits >> 23) & 0xff) as i32 - 127;
    let e = exp + MIP_EXPONENT_BIAS;
    if e < 0 {
        (0, 0)
    } else if e > MAX_EXPONENT {
        (MAX_EXPONENT as u32, 0xffff)
    } else {
        (e as u32, (bits >> 7) & 0xffff)
    }
}

/// Decodes a mip compression `(exponent, mantissa)` pair.
pub fn decode_mip_float(exponent: u32, mantissa: u32) -> f32 {
    let scale = pow2(exponent as i32 - MIP_EXPONENT_BIAS);
    ((1.0 + mantissa as f64 / 65536.0) * scale) as f32
}

/// Splits a packed `0xAARRGGBB` colour into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(argb: u32) -> [u8; 4] {
    argb.to_be_bytes()
}

/// Packs `[a, r, g, b]` into `0xAARRGGBB`.
#[inline]
pub fn pack_argb(argb: [u8; 4]) -> u32 {
    u32::from_be_bytes(argb)
}

/// Rounds and clamps a colour channel value to a byte.
#[inline]
pub fn channel_to_u8(val: f32) -> u8 {
    val.round().clamp(0.0, 255.0) as u8
}

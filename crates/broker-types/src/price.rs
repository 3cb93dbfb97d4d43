//! Conversion between human prices and 128.128 fixed-point prices.
//!
//! A human price is "whole destination tokens per whole source token". On
//! chain the same price is expressed in raw base units and multiplied by
//! `2^128`, so the conversion has to account for both the fixed-point scale
//! and the decimals of the two assets. Human prices are parsed into an
//! unbounded integer mantissa and scale, so the only limit on a price is that
//! its fixed-point form fits in 256 bits. The result is truncated toward zero.

use crate::chains::InternalAsset;
use crate::errors::BrokerError;
use alloy::primitives::{U256, U512};
use num_bigint::BigUint;
use rust_decimal::Decimal;

/// Number of fractional bits of a fixed-point price.
pub const PRICE_FRACTIONAL_BITS: usize = 128;

/// Largest scale a [`Decimal`] can carry.
const MAX_DISPLAY_SCALE: u32 = 28;

fn pow10(exponent: u32) -> U512 {
	U512::from(10u64).pow(U512::from(exponent))
}

fn widen(value: U256) -> U512 {
	let limbs = value.as_limbs();
	U512::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3], 0, 0, 0, 0])
}

fn narrow(value: U512) -> Option<U256> {
	let limbs = value.as_limbs();
	if limbs[4..].iter().any(|limb| *limb != 0) {
		return None;
	}
	Some(U256::from_limbs([limbs[0], limbs[1], limbs[2], limbs[3]]))
}

fn invalid_price(input: &str, reason: impl Into<String>) -> BrokerError {
	BrokerError::InvalidPrice {
		input: input.to_string(),
		reason: reason.into(),
	}
}

/// Splits a plain decimal string into its digits and the number of digits
/// after the point: `"12.50"` becomes `(1250, 2)`.
fn parse_decimal(price: &str) -> Result<(BigUint, u32), BrokerError> {
	let non_numeric = || invalid_price(price, "expected a plain decimal number");

	let (negative, unsigned) = match price.strip_prefix('-') {
		Some(rest) => (true, rest),
		None => (false, price),
	};
	let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
	if whole.is_empty() && fraction.is_empty() {
		return Err(non_numeric());
	}
	if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
		return Err(non_numeric());
	}

	let digits = format!("{}{}", whole, fraction);
	let mantissa = BigUint::parse_bytes(digits.as_bytes(), 10).ok_or_else(non_numeric)?;
	if negative && mantissa.bits() != 0 {
		return Err(invalid_price(price, "price must not be negative"));
	}
	let scale = u32::try_from(fraction.len())
		.map_err(|_| invalid_price(price, "too many fractional digits"))?;

	Ok((mantissa, scale))
}

/// Converts a decimal price string into a fixed-point price.
///
/// Computes `floor(price * 2^128 * 10^(dest.decimals - src.decimals))` with
/// unbounded precision. Negative and non-numeric inputs are rejected, as are
/// prices whose fixed-point form does not fit in 256 bits.
pub fn to_fixed_point_price(
	price: &str,
	src: InternalAsset,
	dest: InternalAsset,
) -> Result<U256, BrokerError> {
	let (mantissa, scale) = parse_decimal(price)?;
	let exponent = i64::from(dest.decimals()) - i64::from(src.decimals()) - i64::from(scale);

	let scaled = mantissa << PRICE_FRACTIONAL_BITS;
	let ten = BigUint::from(10u32);
	let value = if exponent >= 0 {
		scaled * ten.pow(exponent as u32)
	} else {
		let divisor = u32::try_from(exponent.unsigned_abs())
			.map_err(|_| invalid_price(price, "too many fractional digits"))?;
		scaled / ten.pow(divisor)
	};

	if value.bits() > 256 {
		return Err(invalid_price(price, "fixed-point price exceeds 256 bits"));
	}
	U256::try_from_be_slice(&value.to_bytes_be())
		.ok_or_else(|| invalid_price(price, "fixed-point price exceeds 256 bits"))
}

/// Converts a fixed-point price back into a human price for display.
///
/// Exact whenever the value was produced by [`to_fixed_point_price`] without
/// truncation; otherwise the result is truncated to the largest scale that
/// fits a [`Decimal`].
pub fn from_fixed_point_price(
	value: U256,
	src: InternalAsset,
	dest: InternalAsset,
) -> Result<Decimal, BrokerError> {
	let shift = i64::from(src.decimals()) - i64::from(dest.decimals());
	let max_mantissa = U512::from(1u64) << 96;

	let mut scale = MAX_DISPLAY_SCALE;
	loop {
		let exponent = shift + i64::from(scale);
		let scaled = if exponent >= 0 {
			widen(value) * pow10(exponent as u32)
		} else {
			widen(value) / pow10(exponent.unsigned_abs() as u32)
		};
		let mantissa = scaled >> PRICE_FRACTIONAL_BITS;

		if mantissa < max_mantissa {
			let limbs = mantissa.as_limbs();
			let raw = u128::from(limbs[0]) | (u128::from(limbs[1]) << 64);
			let decimal = Decimal::try_from_i128_with_scale(raw as i128, scale).map_err(|e| {
				BrokerError::InvalidPrice {
					input: crate::numeric::to_hex(value),
					reason: e.to_string(),
				}
			})?;
			return Ok(decimal.normalize());
		}

		if scale == 0 {
			return Err(BrokerError::InvalidPrice {
				input: crate::numeric::to_hex(value),
				reason: "price is too large to display".to_string(),
			});
		}
		scale -= 1;
	}
}

/// Applies a fixed-point price to an amount: `floor(amount * price / 2^128)`.
pub fn apply_fixed_point_price(amount: U256, price: U256) -> Result<U256, BrokerError> {
	let product = widen(amount) * widen(price);
	narrow(product >> PRICE_FRACTIONAL_BITS).ok_or_else(|| {
		BrokerError::invalid_parameter("amount", "output amount exceeds 256 bits")
	})
}

//! HTTP clients for the two automated payment rails. Both are thin wrappers
//! over the gateways' REST APIs; no retry or backoff, a failure surfaces as
//! an error to the caller and any donation record stays pending.

pub mod paypal;
pub mod stripe;

use anyhow::{Result, bail};

/// Convert a decimal amount string to minor currency units (cents),
/// rounded to the nearest cent. Rejects non-positive or unparseable input.
pub fn to_minor_units(amount: &str) -> Result<i64> {
    let parsed: f64 = amount
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid amount: {:?}", amount))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        bail!("invalid amount: {:?}", amount);
    }
    Ok((parsed * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_fractional_amounts() {
        assert_eq!(to_minor_units("50").unwrap(), 5000);
        assert_eq!(to_minor_units("50.00").unwrap(), 5000);
        assert_eq!(to_minor_units("0.01").unwrap(), 1);
        assert_eq!(to_minor_units("19.99").unwrap(), 1999);
    }

    #[test]
    fn rounds_to_nearest_cent() {
        assert_eq!(to_minor_units("10.505").unwrap(), 1051);
        assert_eq!(to_minor_units("10.504").unwrap(), 1050);
        // float dust: 29.99 * 100 is 2998.9999... without rounding
        assert_eq!(to_minor_units("29.99").unwrap(), 2999);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(to_minor_units("0").is_err());
        assert!(to_minor_units("-5").is_err());
        assert!(to_minor_units("abc").is_err());
        assert!(to_minor_units("").is_err());
        assert!(to_minor_units("NaN").is_err());
    }
}

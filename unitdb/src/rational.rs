/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::parser::parse_number;

use super::error::UnitError;

/// Size limit, in bits, for numerators and denominators produced by
/// multiplication and powers.
const MAX_BITS: u64 = 1 << 20;

/// Exact fraction of two arbitrary precision integers.
///
/// The inner ratio is always reduced to lowest terms with a positive
/// denominator, so equality is structural.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Debug,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Rational(BigRational);

impl Rational {
    pub fn zero() -> Self {
        Rational(BigRational::zero())
    }

    pub fn one() -> Self {
        Rational(BigRational::one())
    }

    /// Exact `numer / denom`.
    pub fn ratio<N, D>(numer: N, denom: D) -> Result<Self, UnitError>
    where
        N: Into<BigInt>,
        D: Into<BigInt>,
    {
        let denom = denom.into();
        match denom.is_zero() {
            true => Err(UnitError::DivisionByZero),
            false => Ok(Rational(BigRational::new(numer.into(), denom))),
        }
    }

    /// Parse a decimal literal such as `2.54`, `-1.5e-3` or `6.02ee23`.
    pub fn from_decimal_literal(input: &str) -> Result<Self, UnitError> {
        parse_number(input)
    }

    /// Build `(-)int.frac * 10^exp` from the digit strings of a literal.
    pub(crate) fn from_decimal_parts(
        negative: bool,
        int: &str,
        frac: &str,
        exp: i32,
    ) -> Result<Self, UnitError> {
        let digits = format!("{}{}", int, frac);
        let mantissa = match digits.is_empty() {
            true => BigInt::zero(),
            false => digits.parse::<BigInt>().map_err(|e| {
                UnitError::ParseError(format!("{}: {}", digits, e))
            })?,
        };
        let mantissa = match negative {
            true => -mantissa,
            false => mantissa,
        };
        let shift = i32::try_from(frac.len())
            .ok()
            .and_then(|places| exp.checked_sub(places))
            .ok_or_else(|| {
                UnitError::ParseError(format!("exponent out of range: {}", exp))
            })?;
        let ten = Rational::from(10);
        Ok(Rational(BigRational::from_integer(mantissa)) * ten.pow(shift)?)
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i32 {
        match self.0.numer().sign() {
            num_bigint::Sign::Minus => -1,
            num_bigint::Sign::NoSign => 0,
            num_bigint::Sign::Plus => 1,
        }
    }

    pub fn abs(&self) -> Self {
        Rational(self.0.abs())
    }

    pub fn recip(&self) -> Result<Self, UnitError> {
        match self.is_zero() {
            true => Err(UnitError::DivisionByZero),
            false => Ok(Rational(self.0.recip())),
        }
    }

    /// Multiplication that refuses to build oversized numbers.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, UnitError> {
        match self.bits() + rhs.bits() > MAX_BITS {
            true => Err(UnitError::Overflow),
            false => Ok(self * rhs),
        }
    }

    pub fn checked_div(&self, rhs: &Self) -> Result<Self, UnitError> {
        self.checked_mul(&rhs.recip()?)
    }

    /// Integer power. Negative exponents invert; `x^0` is one, also
    /// for zero.
    pub fn pow(&self, n: i32) -> Result<Self, UnitError> {
        let e = n.unsigned_abs();
        let growth = self.bits().saturating_sub(1);
        if growth.saturating_mul(u64::from(e)) > MAX_BITS {
            return Err(UnitError::Overflow);
        }
        let numer = self.0.numer().pow(e);
        let denom = self.0.denom().pow(e);
        match n < 0 {
            true => Rational::ratio(denom, numer),
            false => Ok(Rational(BigRational::new(numer, denom))),
        }
    }

    /// The value as an `i32`, if it is an integer that fits.
    pub fn to_i32(&self) -> Option<i32> {
        match self.is_integer() {
            true => self.0.numer().to_i32(),
            false => None,
        }
    }

    fn bits(&self) -> u64 {
        u64::max(self.0.numer().bits(), self.0.denom().bits())
    }

    /// Lossy conversion, for display only.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Whether the value can be written as a finite decimal.
    pub fn is_decimal(&self) -> bool {
        self.decimal_places().is_some()
    }

    /// Number of decimal places needed to write the value exactly, or
    /// `None` if the decimal expansion does not terminate.
    fn decimal_places(&self) -> Option<u32> {
        let two = BigInt::from(2);
        let five = BigInt::from(5);
        let mut denom = self.0.denom().clone();
        let (mut twos, mut fives) = (0, 0);
        while (&denom % &two).is_zero() {
            denom /= &two;
            twos += 1;
        }
        while (&denom % &five).is_zero() {
            denom /= &five;
            fives += 1;
        }
        denom.is_one().then(|| u32::max(twos, fives))
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        if self.0.is_integer() {
            return write!(f, "{}", self.0.numer());
        }
        match self.decimal_places() {
            Some(places) => {
                let scaled = self.0.numer().abs()
                    * (BigInt::from(10).pow(places) / self.0.denom());
                let places = places as usize;
                let digits = scaled.to_string();
                let digits = match digits.len() > places {
                    true => digits,
                    false => {
                        "0".repeat(places + 1 - digits.len()) + &digits
                    }
                };
                let (int, frac) = digits.split_at(digits.len() - places);
                let sign = if self.is_negative() { "-" } else { "" };
                write!(f, "{}{}.{}", sign, int, frac)
            }
            None => write!(f, "{}/{}", self.0.numer(), self.0.denom()),
        }
    }
}

impl FromStr for Rational {
    type Err = UnitError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((n, d)) => parse_number(n.trim())?
                .checked_div(&parse_number(d.trim())?),
            None => parse_number(s.trim()),
        }
    }
}

macro_rules! from_int {
    ( $($t:ty),+ ) => {
	$(impl From<$t> for Rational {
	    fn from(val: $t) -> Self {
		Rational(BigRational::from_integer(BigInt::from(val)))
	    }
	})*
    }
}

from_int!(i32, i64, u32, u64, usize);

impl From<BigInt> for Rational {
    fn from(val: BigInt) -> Self {
        Rational(BigRational::from_integer(val))
    }
}

impl From<BigRational> for Rational {
    fn from(val: BigRational) -> Self {
        Rational(val)
    }
}

impl From<&Rational> for Rational {
    fn from(val: &Rational) -> Self {
        val.clone()
    }
}

/* Operators. Division is fallible and only offered as `checked_div`. */

macro_rules! binary_op {
    ( $trait:ident, $fun:ident ) => {
        impl<'a> $trait<&'a Rational> for &'a Rational {
            type Output = Rational;
            fn $fun(self, rhs: &'a Rational) -> Rational {
                Rational($trait::$fun(&self.0, &rhs.0))
            }
        }

        impl $trait<Rational> for Rational {
            type Output = Rational;
            fn $fun(self, rhs: Rational) -> Rational {
                Rational($trait::$fun(self.0, rhs.0))
            }
        }

        impl<'a> $trait<&'a Rational> for Rational {
            type Output = Rational;
            fn $fun(self, rhs: &'a Rational) -> Rational {
                Rational($trait::$fun(self.0, &rhs.0))
            }
        }
    };
}

binary_op!(Add, add);
binary_op!(Sub, sub);
binary_op!(Mul, mul);

impl Neg for Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-self.0)
    }
}

impl Neg for &Rational {
    type Output = Rational;
    fn neg(self) -> Rational {
        Rational(-&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Rational;
    use crate::UnitError;

    fn r(s: &str) -> Rational {
        s.parse().unwrap()
    }

    #[test]
    fn reduced_on_construction() {
        let a = Rational::ratio(6, -8).unwrap();
        assert_eq!(a, Rational::ratio(-3, 4).unwrap());
        assert_eq!(a.numer().to_string(), "-3");
        assert_eq!(a.denom().to_string(), "4");
        assert_eq!(
            Rational::ratio(1, 0).unwrap_err(),
            UnitError::DivisionByZero
        );
    }

    #[test]
    fn decimal_literals() {
        assert_eq!(r("2.54"), Rational::ratio(127, 50).unwrap());
        assert_eq!(r("-1.5e-3"), Rational::ratio(-3, 2000).unwrap());
        assert_eq!(r(".5"), Rational::ratio(1, 2).unwrap());
        assert_eq!(r("6.02ee2"), Rational::from(602));
        assert_eq!(r("1E3"), Rational::from(1000));
        assert_eq!(r("1/3"), Rational::ratio(1, 3).unwrap());
        assert!("abc".parse::<Rational>().is_err());
        assert!("1.2.3".parse::<Rational>().is_err());
        assert_eq!(
            "1/0".parse::<Rational>().unwrap_err(),
            UnitError::DivisionByZero
        );
    }

    #[test]
    fn exact_division_chain() {
        let a = r("5.08");
        let b = Rational::ratio(7, 3).unwrap();
        assert_eq!(&a.checked_div(&b).unwrap() * &b, a);

        let mut acc = Rational::one();
        for i in 1..=25 {
            acc = acc.checked_div(&Rational::ratio(i, i + 1).unwrap()).unwrap();
        }
        assert_eq!(acc, Rational::from(26));
    }

    #[test]
    fn powers() {
        let a = Rational::ratio(-2, 3).unwrap();
        assert_eq!(a.pow(3).unwrap(), Rational::ratio(-8, 27).unwrap());
        assert_eq!(a.pow(-2).unwrap(), Rational::ratio(9, 4).unwrap());
        assert_eq!(Rational::zero().pow(0).unwrap(), Rational::one());
        assert_eq!(
            Rational::zero().pow(-1).unwrap_err(),
            UnitError::DivisionByZero
        );
        assert_eq!(
            Rational::zero().checked_div(&Rational::zero()).unwrap_err(),
            UnitError::DivisionByZero
        );
    }

    #[test]
    fn oversized_numbers_are_refused() {
        assert_eq!(
            Rational::from(10).pow(1_000_000_000).unwrap_err(),
            UnitError::Overflow
        );
        assert_eq!(
            Rational::from(2).pow(i32::MIN).unwrap_err(),
            UnitError::Overflow
        );
        let big = Rational::from(10).pow(200_000).unwrap();
        assert_eq!(big.checked_mul(&big).unwrap_err(), UnitError::Overflow);
        assert!(big.checked_mul(&Rational::from(7)).is_ok());
        assert_eq!(
            Rational::from(-1).pow(i32::MAX).unwrap(),
            Rational::from(-1)
        );
        assert_eq!(Rational::one().pow(i32::MIN).unwrap(), Rational::one());
    }

    #[test]
    fn extreme_exponent_literals() {
        assert!(".5e-2147483648".parse::<Rational>().is_err());
        assert!("1.25e2147483647".parse::<Rational>().is_err());
        assert!("1e2000000000".parse::<Rational>().is_err());
        let tiny = Rational::ratio(3, 2)
            .unwrap()
            .checked_div(&Rational::from(10).pow(2147).unwrap())
            .unwrap();
        assert_eq!(r("1.5e-2147"), tiny);
    }

    #[test]
    fn display() {
        assert_eq!(r("5.08").to_string(), "5.08");
        assert_eq!(r("-0.0025").to_string(), "-0.0025");
        assert_eq!(Rational::from(42).to_string(), "42");
        assert_eq!(Rational::ratio(-1, 3).unwrap().to_string(), "-1/3");
        assert_eq!(r("6.68901888").to_string(), "6.68901888");
    }

    #[test]
    fn ordering_and_sign() {
        assert!(r("0.1") < r("1/3"));
        assert_eq!(r("-2").signum(), -1);
        assert_eq!(Rational::zero().signum(), 0);
        assert_eq!(r("3").to_i32(), Some(3));
        assert_eq!(r("3.5").to_i32(), None);
        assert!((r("1/3").to_f64() - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn serde_as_string() {
        let a = Rational::ratio(1, 3).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"1/3\"");
        assert_eq!(serde_json::from_str::<Rational>(&json).unwrap(), a);
    }
}

/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Div, Mul, Sub};

use serde::Serialize;

use super::{Dimension, DimensionVector, Rational, Unit, UnitError};

/// An exact value expressed in a unit: `value * unit.scale` base units.
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
pub struct Measurement(pub Rational, pub Unit);

impl Measurement {
    pub fn new<R: Into<Rational>>(value: R, unit: Unit) -> Self {
        Measurement(value.into(), unit)
    }

    /// A plain number.
    pub fn from_value<R: Into<Rational>>(value: R) -> Self {
        Measurement(value.into(), Unit::dimensionless())
    }

    pub fn from_unit(unit: Unit) -> Self {
        Measurement(Rational::one(), unit)
    }

    pub fn value(&self) -> &Rational {
        &self.0
    }

    pub fn unit(&self) -> &Unit {
        &self.1
    }

    pub fn dimensions(&self) -> &DimensionVector {
        self.1.dimensions()
    }

    /// The value expressed in base units.
    pub fn base_value(&self) -> Rational {
        &self.0 * self.1.scale()
    }

    pub fn multiply(&self, rhs: &Measurement) -> Result<Self, UnitError> {
        Ok(Measurement(
            self.0.checked_mul(&rhs.0)?,
            self.1.multiply(&rhs.1)?,
        ))
    }

    pub fn divide(&self, rhs: &Measurement) -> Result<Self, UnitError> {
        Ok(Measurement(
            self.0.checked_div(&rhs.0)?,
            self.1.divide(&rhs.1)?,
        ))
    }

    /// Multiply the value, keeping the unit.
    pub fn scale<R: Into<Rational>>(&self, factor: R) -> Self {
        let factor: Rational = factor.into();
        Measurement(factor * &self.0, self.1.clone())
    }

    pub fn pow(&self, n: i32) -> Result<Self, UnitError> {
        Ok(Measurement(self.0.pow(n)?, self.1.power(n)?))
    }

    pub fn convert_to(&self, unit: &Unit) -> Result<Self, UnitError> {
        match self.1.compatible(unit) {
            true => Ok(Measurement(
                self.base_value().checked_div(unit.scale())?,
                unit.clone(),
            )),
            false => Err(UnitError::Incompatible(
                self.dimensions().clone(),
                unit.dimensions().clone(),
            )),
        }
    }

    /// Express in base units (the unit of scale one).
    pub fn normalize(&self) -> Self {
        Measurement(self.base_value(), self.1.base())
    }

    /// Fold the value into the unit's scale, giving a unit equal to
    /// this measurement.
    pub fn to_unit(&self) -> Result<Unit, UnitError> {
        match self.0.is_one() {
            true => Ok(self.1.clone()),
            false => self.1.scaled(&self.0),
        }
    }

    pub fn checked_add(&self, rhs: &Measurement) -> Result<Self, UnitError> {
        let rhs = rhs.convert_to(&self.1)?;
        Ok(Measurement(&self.0 + &rhs.0, self.1.clone()))
    }

    pub fn checked_sub(&self, rhs: &Measurement) -> Result<Self, UnitError> {
        let rhs = rhs.convert_to(&self.1)?;
        Ok(Measurement(&self.0 - &rhs.0, self.1.clone()))
    }

    /* Note: we cannot implement the trait, because it does not allow
    for error conditions. */
    pub fn compare(&self, rhs: &Self) -> Result<Ordering, UnitError> {
        Ok(self.0.cmp(&rhs.convert_to(&self.1)?.0))
    }

    /// The exponent of `dimension` in this measurement's unit.
    pub fn exponent(&self, dimension: &Dimension) -> i32 {
        self.dimensions().exponent(dimension)
    }
}

impl Display for Measurement {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match (self.1.name(), self.1.is_dimensionless()) {
            (None, true) if self.1.scale().is_one() => write!(f, "{}", self.0),
            _ => write!(f, "{} {}", self.0, self.1),
        }
    }
}

impl<'a> Mul<&'a Measurement> for &'a Measurement {
    type Output = Result<Measurement, UnitError>;
    fn mul(self, rhs: &'a Measurement) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Mul<Measurement> for Measurement {
    type Output = Result<Measurement, UnitError>;
    fn mul(self, rhs: Measurement) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl<'a> Div<&'a Measurement> for &'a Measurement {
    type Output = Result<Measurement, UnitError>;
    fn div(self, rhs: &'a Measurement) -> Self::Output {
        self.divide(rhs)
    }
}

impl Div<Measurement> for Measurement {
    type Output = Result<Measurement, UnitError>;
    fn div(self, rhs: Measurement) -> Self::Output {
        self.divide(&rhs)
    }
}

impl Add<Measurement> for Measurement {
    type Output = Result<Measurement, UnitError>;
    fn add(self, rhs: Measurement) -> Self::Output {
        self.checked_add(&rhs)
    }
}

impl Sub<Measurement> for Measurement {
    type Output = Result<Measurement, UnitError>;
    fn sub(self, rhs: Measurement) -> Self::Output {
        self.checked_sub(&rhs)
    }
}

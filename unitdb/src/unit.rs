/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Div, Mul};

use serde::Serialize;

use super::{Dimension, DimensionVector, Measurement, Rational, UnitError};

/// A physical unit: a vector of primitive dimension exponents and an
/// exact scale factor.
///
/// One of this unit equals `scale` of the base-unit combination implied
/// by `dimensions`. Units are compared on dimensions and scale only;
/// the name is for display.
///
/// The scale is never zero, so dividing by a unit never divides by
/// zero.
#[derive(Serialize, Clone, Debug)]
pub struct Unit {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    dimensions: DimensionVector,
    scale: Rational,
}

impl Unit {
    /// A new base unit `symbol` of a freshly created dimension.
    pub fn primitive(dimension: &str, symbol: &str) -> Self {
        Unit {
            name: Some(symbol.to_string()),
            dimensions: DimensionVector::simple(Dimension::new(
                dimension, symbol,
            )),
            scale: Rational::one(),
        }
    }

    /// A new base unit whose dimension is known only by the unit's
    /// symbol. It never unifies with another dimension of that name.
    pub fn anonymous(symbol: &str) -> Self {
        Unit::primitive(symbol, symbol)
    }

    pub fn dimensionless() -> Self {
        Unit {
            name: None,
            dimensions: DimensionVector::new(),
            scale: Rational::one(),
        }
    }

    pub fn new(
        dimensions: DimensionVector,
        scale: Rational,
    ) -> Result<Self, UnitError> {
        match scale.is_zero() {
            true => Err(UnitError::ZeroScale),
            false => Ok(Unit {
                name: None,
                dimensions,
                scale,
            }),
        }
    }

    /// The same unit under a display name.
    pub fn named(self, name: &str) -> Self {
        Unit {
            name: Some(name.to_string()),
            ..self
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn dimensions(&self) -> &DimensionVector {
        &self.dimensions
    }

    pub fn scale(&self) -> &Rational {
        &self.scale
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// The unit of scale one with the same dimensions.
    pub fn base(&self) -> Self {
        Unit {
            name: None,
            dimensions: self.dimensions.clone(),
            scale: Rational::one(),
        }
    }

    /* Unit algebra. Results fail only when exponents or scales grow
    out of range. */

    /// `factor` of this unit, as a unit of its own.
    pub fn scaled<R: Into<Rational>>(
        &self,
        factor: R,
    ) -> Result<Self, UnitError> {
        let factor: Rational = factor.into();
        Unit::new(self.dimensions.clone(), factor.checked_mul(&self.scale)?)
    }

    pub fn multiply(&self, rhs: &Unit) -> Result<Self, UnitError> {
        Ok(Unit {
            name: None,
            dimensions: self
                .dimensions
                .product(&rhs.dimensions)
                .ok_or(UnitError::Overflow)?,
            scale: self.scale.checked_mul(&rhs.scale)?,
        })
    }

    pub fn divide(&self, rhs: &Unit) -> Result<Self, UnitError> {
        Ok(Unit {
            name: None,
            dimensions: self
                .dimensions
                .quotient(&rhs.dimensions)
                .ok_or(UnitError::Overflow)?,
            scale: self.scale.checked_div(&rhs.scale)?,
        })
    }

    pub fn power(&self, n: i32) -> Result<Self, UnitError> {
        match n {
            1 => Ok(self.clone()),
            _ => Ok(Unit {
                name: None,
                dimensions: self
                    .dimensions
                    .powi(n)
                    .ok_or(UnitError::Overflow)?,
                scale: self.scale.pow(n)?,
            }),
        }
    }

    /// Conversion is possible only between units of the same dimensions.
    pub fn compatible(&self, other: &Unit) -> bool {
        self.dimensions == other.dimensions
    }

    /// `value` of this unit.
    pub fn measure<R: Into<Rational>>(&self, value: R) -> Measurement {
        Measurement::new(value, self.clone())
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.dimensions == other.dimensions && self.scale == other.scale
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dimensions.hash(state);
        self.scale.hash(state);
    }
}

/* Display. */

impl Display for Unit {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match (&self.name, self.is_dimensionless(), self.scale.is_one()) {
            (Some(name), _, _) => write!(f, "{}", name),
            (None, true, _) => write!(f, "{}", self.scale),
            (None, false, true) => {
                self.dimensions.fmt_with(f, |d| d.symbol().to_string())
            }
            (None, false, false) => {
                write!(f, "{} ", self.scale)?;
                self.dimensions.fmt_with(f, |d| d.symbol().to_string())
            }
        }
    }
}

/* Operations on units. */

impl<'a> Mul<&'a Unit> for &'a Unit {
    type Output = Result<Unit, UnitError>;
    fn mul(self, rhs: &'a Unit) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Mul<Unit> for Unit {
    type Output = Result<Unit, UnitError>;
    fn mul(self, rhs: Unit) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl<'a> Div<&'a Unit> for &'a Unit {
    type Output = Result<Unit, UnitError>;
    fn div(self, rhs: &'a Unit) -> Self::Output {
        self.divide(rhs)
    }
}

impl Div<Unit> for Unit {
    type Output = Result<Unit, UnitError>;
    fn div(self, rhs: Unit) -> Self::Output {
        self.divide(&rhs)
    }
}

/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::{Rational, Unit, UnitError};

/// A named multiplier that can be glued in front of a unit name
/// (`kilo` + `meter`).
#[derive(Serialize, PartialEq, Eq, Clone, Debug)]
pub struct Prefix {
    name: String,
    multiplier: Rational,
    standalone: bool,
}

impl Prefix {
    pub fn new(
        name: &str,
        multiplier: Rational,
        standalone: bool,
    ) -> Result<Self, UnitError> {
        match multiplier.is_zero() {
            true => Err(UnitError::ZeroScale),
            false => Ok(Prefix {
                name: name.to_string(),
                multiplier,
                standalone,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn multiplier(&self) -> &Rational {
        &self.multiplier
    }

    /// Standalone prefixes may also be used as dimensionless units.
    pub fn standalone(&self) -> bool {
        self.standalone
    }

    /// The prefixed unit, named `name`.
    pub fn apply(&self, unit: &Unit, name: &str) -> Result<Unit, UnitError> {
        Ok(unit.scaled(&self.multiplier)?.named(name))
    }

    /// The prefix as a dimensionless unit.
    pub fn as_unit(&self) -> Result<Unit, UnitError> {
        Ok(Unit::dimensionless()
            .scaled(&self.multiplier)?
            .named(&self.name))
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}- ({})", self.name, self.multiplier)
    }
}

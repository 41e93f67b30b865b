/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use thiserror::Error;

use super::composite::DimensionVector;

#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum UnitError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Incompatible units: {0} <-> {1}")]
    Incompatible(DimensionVector, DimensionVector),
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
    #[error("Unit scaled by zero")]
    ZeroScale,
    #[error("Number out of range")]
    Overflow,
    #[error("Exponent is not an integer: {0}")]
    NonIntegerExponent(String),
    #[error("Expected a dimensionless number, got {0}")]
    NotDimensionless(DimensionVector),
    #[error("Unit parse error: {0}")]
    ParseError(String),
}

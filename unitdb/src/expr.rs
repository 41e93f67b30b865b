/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::fmt::{self, Display, Formatter};

use super::parser::parse_expr;
use super::{Measurement, Rational, Unit, UnitError};

/// Unit expression, as found on the right-hand side of a database
/// definition (`2.54 cm`, `kg m^2 / s^2`).
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Expr {
    Number(Rational),
    Name(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Pow(Box<Expr>, Box<Expr>),
}

/// Name resolution for expression evaluation.
pub trait Resolve {
    fn resolve(&self, name: &str) -> Result<Unit, UnitError>;
}

impl Expr {
    pub fn parse(input: &str) -> Result<Self, UnitError> {
        parse_expr(input)
    }

    /// Evaluate to a measurement. Numbers are dimensionless
    /// measurements; names evaluate to one of the resolved unit.
    pub fn eval<R: Resolve + ?Sized>(
        &self,
        env: &R,
    ) -> Result<Measurement, UnitError> {
        match self {
            Expr::Number(n) => Ok(Measurement::from_value(n)),
            Expr::Name(name) => Ok(Measurement::from_unit(env.resolve(name)?)),
            Expr::Neg(e) => Ok(e.eval(env)?.scale(-1)),
            Expr::Add(a, b) => a.eval(env)?.checked_add(&b.eval(env)?),
            Expr::Sub(a, b) => a.eval(env)?.checked_sub(&b.eval(env)?),
            Expr::Mul(a, b) => a.eval(env)?.multiply(&b.eval(env)?),
            Expr::Div(a, b) => a.eval(env)?.divide(&b.eval(env)?),
            Expr::Pow(a, b) => a.eval(env)?.pow(exponent(&b.eval(env)?)?),
        }
    }
}

/// Exponents must be dimensionless integers.
fn exponent(m: &Measurement) -> Result<i32, UnitError> {
    match m.unit().is_dimensionless() {
        true => m
            .base_value()
            .to_i32()
            .ok_or_else(|| UnitError::NonIntegerExponent(m.to_string())),
        false => Err(UnitError::NonIntegerExponent(m.to_string())),
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Name(name) => write!(f, "{}", name),
            Expr::Neg(e) => write!(f, "-{}", e),
            Expr::Add(a, b) => write!(f, "({} + {})", a, b),
            Expr::Sub(a, b) => write!(f, "({} - {})", a, b),
            Expr::Mul(a, b) => write!(f, "({} * {})", a, b),
            Expr::Div(a, b) => write!(f, "({} / {})", a, b),
            Expr::Pow(a, b) => write!(f, "{}^{}", a, b),
        }
    }
}

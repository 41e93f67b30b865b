/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

pub mod catalogue;
pub mod composite;
pub mod database;
pub mod dimension;
pub mod error;
pub mod expr;
pub mod measurement;
pub mod parser;
pub mod prefix;
pub mod rational;
pub mod unit;

pub use catalogue::{Catalogue, CatalogueBuilder};
pub use composite::{Composite, DimensionVector};
pub use database::try_parse;
pub use dimension::Dimension;
pub use error::UnitError;
pub use expr::{Expr, Resolve};
pub use measurement::Measurement;
pub use prefix::Prefix;
pub use rational::Rational;
pub use unit::Unit;

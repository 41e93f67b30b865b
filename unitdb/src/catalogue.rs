/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::collections::HashMap;
use std::sync::RwLock;

use log::{trace, warn};

use super::expr::{Expr, Resolve};
use super::{Measurement, Prefix, Rational, Unit, UnitError};

/// Name to unit table with dynamic prefix composition.
///
/// A catalogue is built once (usually by [`Catalogue::try_parse`]) and
/// read-only afterwards. Names that are composed on demand from a prefix
/// and a defined unit (`kilometer`), or from a plural (`meters`), are
/// cached; the cache only ever holds values derivable from the tables,
/// so concurrent readers always see the same results.
#[derive(Default, Debug)]
pub struct Catalogue {
    units: HashMap<String, Unit>,
    prefixes: HashMap<String, Prefix>,
    /// Prefix names, longest first.
    by_length: Vec<String>,
    composed: RwLock<HashMap<String, Unit>>,
}

impl Catalogue {
    /// Parse a unit database. Returns `None` if the text contains no
    /// usable definition at all.
    pub fn try_parse(text: &str) -> Option<Self> {
        crate::database::try_parse(text)
    }

    pub fn lookup(&self, name: &str) -> Result<Unit, UnitError> {
        if let Some(unit) = self.units.get(name) {
            return Ok(unit.clone());
        }
        if let Some(unit) = self.cached(name) {
            return Ok(unit);
        }

        let unit = self
            .compose(name)
            .or_else(|| self.plural(name))
            .ok_or_else(|| UnitError::UnknownUnit(name.to_string()))?;
        trace!("composed {} = {} {}", name, unit.scale(), unit.base());
        if let Ok(mut cache) = self.composed.write() {
            cache.insert(name.to_string(), unit.clone());
        }
        Ok(unit)
    }

    /// Whether `name` resolves, directly or by composition.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_ok()
    }

    pub fn prefix(&self, name: &str) -> Option<&Prefix> {
        self.prefixes.get(name)
    }

    /// Prefixes, longest name first.
    pub fn prefixes(&self) -> impl Iterator<Item = &Prefix> {
        self.by_length.iter().filter_map(|p| self.prefixes.get(p))
    }

    /// Directly defined unit names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names =
            self.units.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    /// Number of directly defined unit names.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Evaluate a unit expression such as `12 floz` or `m/s^2`.
    pub fn evaluate(&self, expr: &str) -> Result<Measurement, UnitError> {
        Expr::parse(expr)?.eval(self)
    }

    /// Evaluate a unit expression and fold its value into a unit.
    pub fn unit(&self, expr: &str) -> Result<Unit, UnitError> {
        self.evaluate(expr)?.to_unit()
    }

    fn cached(&self, name: &str) -> Option<Unit> {
        self.composed.read().ok()?.get(name).cloned()
    }

    /* Prefixes are never stacked: the remainder must be defined. */
    fn compose(&self, name: &str) -> Option<Unit> {
        self.prefixes().find_map(|prefix| {
            let base = name.strip_prefix(prefix.name())?;
            let unit = self.units.get(base)?;
            prefix.apply(unit, name).ok()
        })
    }

    fn plural(&self, name: &str) -> Option<Unit> {
        let stem = name.strip_suffix('s').filter(|s| !s.is_empty())?;
        match self.units.get(stem) {
            Some(unit) => Some(unit.clone().named(name)),
            None => self.compose(stem).map(|unit| unit.named(name)),
        }
    }

    fn clear_cache(&mut self) {
        match self.composed.get_mut() {
            Ok(cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Resolve for Catalogue {
    fn resolve(&self, name: &str) -> Result<Unit, UnitError> {
        self.lookup(name)
    }
}

/// Append-only construction state for a [`Catalogue`].
#[derive(Default, Debug)]
pub struct CatalogueBuilder {
    catalogue: Catalogue,
}

impl CatalogueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new primitive dimension with its base unit, known
    /// under all of `names`.
    pub fn primitive<S: AsRef<str>>(
        &mut self,
        names: &[S],
        dimension: &str,
    ) -> Unit {
        let symbol = names.first().map_or(dimension, |n| n.as_ref());
        self.define(names, Unit::primitive(dimension, symbol))
    }

    /// Register `unit` under all of `names`; the first name becomes
    /// its display name.
    pub fn define<S: AsRef<str>>(&mut self, names: &[S], unit: Unit) -> Unit {
        let unit = match names.first() {
            Some(name) => unit.named(name.as_ref()),
            None => unit,
        };
        for name in names {
            let name = name.as_ref();
            if self.catalogue.units.contains_key(name) {
                warn!("redefining unit {}", name);
            }
            self.catalogue.units.insert(name.to_string(), unit.clone());
        }
        self.catalogue.clear_cache();
        unit
    }

    /// Register a prefix. A standalone prefix is also defined as a
    /// dimensionless unit.
    pub fn define_prefix(
        &mut self,
        name: &str,
        multiplier: Rational,
        standalone: bool,
    ) -> Result<(), UnitError> {
        let prefix = Prefix::new(name, multiplier, standalone)?;
        if standalone {
            self.define(&[name], prefix.as_unit()?);
        }
        if self
            .catalogue
            .prefixes
            .insert(name.to_string(), prefix)
            .is_some()
        {
            warn!("redefining prefix {}", name);
        } else {
            let by_length = &mut self.catalogue.by_length;
            by_length.push(name.to_string());
            by_length.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        }
        self.catalogue.clear_cache();
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<Unit, UnitError> {
        self.catalogue.lookup(name)
    }

    pub fn prefix(&self, name: &str) -> Option<&Prefix> {
        self.catalogue.prefix(name)
    }

    pub fn len(&self) -> usize {
        self.catalogue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogue.is_empty()
    }

    pub fn build(self) -> Catalogue {
        self.catalogue
    }
}

impl Resolve for CatalogueBuilder {
    fn resolve(&self, name: &str) -> Result<Unit, UnitError> {
        self.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalogue, CatalogueBuilder};
    use crate::{Rational, UnitError};

    fn metric() -> Catalogue {
        let mut builder = CatalogueBuilder::new();
        let m = builder.primitive(&["m", "meter"], "length");
        builder.primitive(&["s", "second"], "time");
        let inch = m.scaled(Rational::ratio(127, 5000).unwrap()).unwrap();
        builder.define(&["in"], inch);
        builder.define_prefix("k", 1000.into(), false).unwrap();
        builder.define_prefix("kilo", 1000.into(), true).unwrap();
        builder
            .define_prefix("m", Rational::ratio(1, 1000).unwrap(), false)
            .unwrap();
        builder
            .define_prefix("milli", Rational::ratio(1, 1000).unwrap(), true)
            .unwrap();
        builder.build()
    }

    #[test]
    fn direct_and_prefixed() {
        let cat = metric();
        let m = cat.lookup("m").unwrap();
        assert_eq!(cat.lookup("meter").unwrap(), m);
        let km = cat.lookup("kilometer").unwrap();
        assert!(km.compatible(&m));
        assert_eq!(km.scale(), &Rational::from(1000));
        assert_eq!(km.name(), Some("kilometer"));
        assert_eq!(cat.lookup("km").unwrap(), km);
        assert_eq!(
            cat.lookup("ms").unwrap().scale(),
            &Rational::ratio(1, 1000).unwrap()
        );
    }

    #[test]
    fn composition_is_cached_and_stable() {
        let cat = metric();
        let a = cat.lookup("millisecond").unwrap();
        let b = cat.lookup("millisecond").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dimensions(), b.dimensions());
    }

    #[test]
    fn no_double_prefix() {
        let cat = metric();
        assert_eq!(
            cat.lookup("kilokilometer").unwrap_err(),
            UnitError::UnknownUnit("kilokilometer".to_string())
        );
        assert!(cat.lookup("kmeter").is_ok());
    }

    #[test]
    fn plurals() {
        let cat = metric();
        assert_eq!(cat.lookup("meters").unwrap(), cat.lookup("m").unwrap());
        assert_eq!(
            cat.lookup("kilometers").unwrap(),
            cat.lookup("km").unwrap()
        );
        assert!(cat.lookup("s").is_ok());
        assert!(cat.lookup("xs").is_err());
    }

    #[test]
    fn standalone_prefixes_are_units() {
        let cat = metric();
        let kilo = cat.lookup("kilo").unwrap();
        assert!(kilo.is_dimensionless());
        assert_eq!(kilo.scale(), &Rational::from(1000));
        assert!(cat.lookup("k").is_err());
    }

    #[test]
    fn unknown() {
        let cat = metric();
        assert_eq!(
            cat.lookup("furlong").unwrap_err(),
            UnitError::UnknownUnit("furlong".to_string())
        );
        assert!(!cat.contains("furlong"));
    }

    #[test]
    fn catalogue_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Catalogue>();
        let cat = std::sync::Arc::new(metric());
        let handles = (0..4)
            .map(|_| {
                let cat = cat.clone();
                std::thread::spawn(move || cat.lookup("kilometer").unwrap())
            })
            .collect::<Vec<_>>();
        for handle in handles {
            assert_eq!(handle.join().unwrap().scale(), &Rational::from(1000));
        }
    }
}

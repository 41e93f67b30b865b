/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::iter::{once, FromIterator};

use serde::Serialize;

use super::dimension::Dimension;

/// Exponents of primitive dimensions: the physical "shape" of a unit.
pub type DimensionVector = Composite<Dimension>;

/// Composite unit / quantity: a sparse product of factors raised to
/// integer powers. Zero exponents are never stored, so two composites
/// are equal iff they denote the same product.
#[derive(Serialize, PartialEq, Eq, Hash, Clone, Debug)]
#[serde(transparent)]
pub struct Composite<T: Ord>(BTreeMap<T, i32>);

impl<T: Ord> Composite<T> {
    pub fn new() -> Self {
        Composite(BTreeMap::new())
    }

    pub fn simple(val: T) -> Self {
        Composite::from_iter(once((val, 1)))
    }

    pub fn as_map(&self) -> &BTreeMap<T, i32> {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &i32)> {
        self.as_map().iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, val: &T) -> i32 {
        self.0.get(val).copied().unwrap_or(0)
    }
}

/* Exponent arithmetic is checked: `None` on i32 overflow. */
impl<T: Ord + Clone> Composite<T> {
    pub fn powi(&self, n: i32) -> Option<Self> {
        self.iter()
            .map(|(u, p)| Some((u.clone(), p.checked_mul(n)?)))
            .collect()
    }

    pub fn product(&self, other: &Self) -> Option<Self> {
        self.combine(other, 1)
    }

    pub fn quotient(&self, other: &Self) -> Option<Self> {
        self.combine(other, -1)
    }

    fn combine(&self, other: &Self, sign: i32) -> Option<Self> {
        let mut map = self.0.clone();
        for (u, n) in other.iter() {
            let e = map.entry(u.clone()).or_insert(0);
            *e = e.checked_add(n.checked_mul(sign)?)?;
        }
        map.retain(|_, n| *n != 0);
        Some(Composite(map))
    }

    /// Write the product using `name` for each factor.
    pub fn fmt_with<F, D>(&self, f: &mut Formatter, name: F) -> fmt::Result
    where
        F: Fn(&T) -> D,
        D: Display,
    {
        let factors = |positive: bool| {
            self.0
                .iter()
                .filter(|(_, &p)| (p > 0) == positive)
                .map(|(u, p)| format!("{}{}", name(u), superscript(p.abs())))
                .collect::<Vec<String>>()
                .join("\u{22c5}")
        };
        match factors(true) {
            num if num.is_empty() => write!(f, "1")?,
            num => write!(f, "{}", num)?,
        }
        if self.0.values().any(|&p| p < 0) {
            write!(f, "/{}", factors(false))?;
        }
        Ok(())
    }
}

impl<T: Ord> Default for Composite<T> {
    fn default() -> Self {
        Composite::new()
    }
}

impl<T: Ord> FromIterator<(T, i32)> for Composite<T> {
    fn from_iter<I: IntoIterator<Item = (T, i32)>>(vals: I) -> Self {
        let mut map = BTreeMap::new();
        for (u, n) in vals {
            *map.entry(u).or_insert(0) += n;
        }
        map.retain(|_, n| *n != 0);
        Composite(map)
    }
}

impl<T: Display + Ord + Clone> Display for Composite<T> {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        self.fmt_with(f, |u| u.to_string())
    }
}

static SS: [char; 10] = [
    '\u{2070}', '\u{00b9}', '\u{00b2}', '\u{00b3}', '\u{2074}', '\u{2075}',
    '\u{2076}', '\u{2077}', '\u{2078}', '\u{2079}',
];

fn superscript(val: i32) -> String {
    if val != 1 {
        val.to_string()
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(n) => SS[n as usize],
                None => c,
            })
            .collect()
    } else {
        "".to_string()
    }
}

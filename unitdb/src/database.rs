/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

//! Frink-style unit database reader.
//!
//! The database is read in a single forward pass. Each logical line is
//! one of:
//!
//! ```text
//! m meter =!= length          // primitive dimension and its base unit
//! kilo ::- 1000               // prefix, also usable on its own
//! k :- kilo                   // prefix
//! centi- 1/100                // prefix
//! inch in := 2.54 cm          // derived unit with synonyms
//! ```
//!
//! Comments (`// ...` and `/* ... */`) are removed, lines ending in `\`
//! continue on the next line, and anything that cannot be parsed or
//! evaluated is skipped.

use log::{debug, info};

use super::catalogue::{Catalogue, CatalogueBuilder};
use super::expr::{Expr, Resolve};
use super::parser::parse_record;
use super::{Unit, UnitError};

/// One parsed database line.
#[derive(PartialEq, Eq, Clone, Debug)]
pub(crate) enum Record {
    Primitive {
        names: Vec<String>,
        dimension: String,
    },
    Prefix {
        name: String,
        standalone: bool,
        expr: Expr,
    },
    Derived {
        names: Vec<String>,
        expr: Expr,
    },
}

/// Build a catalogue from database text. Returns `None` if no line
/// could be used.
pub fn try_parse(text: &str) -> Option<Catalogue> {
    let mut builder = CatalogueBuilder::new();
    let (mut used, mut skipped) = (0, 0);

    for (number, line) in logical_lines(text) {
        match parse_record(&line).and_then(|r| apply(&mut builder, r)) {
            Ok(()) => used += 1,
            Err(e) => {
                debug!("line {}: skipped: {}: {}", number, e, line);
                skipped += 1;
            }
        }
    }

    info!(
        "unit database: {} definitions, {} lines skipped, {} names",
        used,
        skipped,
        builder.len()
    );
    (used > 0).then(|| builder.build())
}

fn apply(
    builder: &mut CatalogueBuilder,
    record: Record,
) -> Result<(), UnitError> {
    match record {
        Record::Primitive { names, dimension } => {
            builder.primitive(&names, &dimension);
        }
        Record::Prefix {
            name,
            standalone,
            expr,
        } => {
            let value = expr.eval(&PrefixScope(builder))?;
            if !value.unit().is_dimensionless() {
                return Err(UnitError::NotDimensionless(
                    value.dimensions().clone(),
                ));
            }
            builder.define_prefix(&name, value.base_value(), standalone)?;
        }
        Record::Derived { names, expr } => {
            let unit = expr.eval(builder)?.to_unit()?;
            builder.define(&names, unit);
        }
    }
    Ok(())
}

/// Names on the right of a prefix definition refer to prefixes first
/// (`k :- kilo`), then to units.
struct PrefixScope<'a>(&'a CatalogueBuilder);

impl Resolve for PrefixScope<'_> {
    fn resolve(&self, name: &str) -> Result<Unit, UnitError> {
        match self.0.prefix(name) {
            Some(prefix) => prefix.as_unit(),
            None => self.0.lookup(name),
        }
    }
}

/// Split database text into logical lines, numbered by the physical
/// line they start on. Comments are removed, continuations joined and
/// blank lines dropped.
pub(crate) fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut in_comment = false;
    let mut current: Option<(usize, String)> = None;

    for (i, raw) in text.lines().enumerate() {
        let stripped = strip_comments(raw, &mut in_comment);
        let stripped = stripped.trim();
        let (content, continued) = match stripped.strip_suffix('\\') {
            Some(content) => (content.trim_end(), true),
            None => (stripped, false),
        };

        let (_, line) = current.get_or_insert_with(|| (i + 1, String::new()));
        if !line.is_empty() && !content.is_empty() {
            line.push(' ');
        }
        line.push_str(content);

        if !continued {
            if let Some((number, line)) = current.take() {
                if !line.is_empty() {
                    lines.push((number, line));
                }
            }
        }
    }

    if let Some((number, line)) = current {
        if !line.is_empty() {
            lines.push((number, line));
        }
    }
    lines
}

// Remove line and block comments; block comments may span lines.
fn strip_comments(line: &str, in_comment: &mut bool) -> String {
    let mut out = String::new();
    let mut rest = line;
    loop {
        if *in_comment {
            match rest.find("*/") {
                Some(end) => {
                    rest = &rest[end + 2..];
                    *in_comment = false;
                }
                None => return out,
            }
        } else {
            match (rest.find("//"), rest.find("/*")) {
                (Some(l), b) if b.map_or(true, |b| l < b) => {
                    out.push_str(&rest[..l]);
                    return out;
                }
                (_, Some(b)) => {
                    out.push_str(&rest[..b]);
                    out.push(' ');
                    rest = &rest[b + 2..];
                    *in_comment = true;
                }
                _ => {
                    out.push_str(rest);
                    return out;
                }
            }
        }
    }
}

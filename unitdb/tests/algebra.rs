/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::cmp::Ordering;

use serde_json::json;
use unitdb::{Measurement, Rational, Unit, UnitError};

fn r(s: &str) -> Rational {
    s.parse().unwrap()
}

struct Si {
    m: Unit,
    s: Unit,
    kg: Unit,
    cm: Unit,
    inch: Unit,
}

fn si() -> Si {
    let m = Unit::primitive("length", "m");
    let cm = m.scaled(r("0.01")).unwrap().named("cm");
    let inch = cm.scaled(r("2.54")).unwrap().named("inch");
    Si {
        s: Unit::primitive("time", "s"),
        kg: Unit::primitive("mass", "kg"),
        m,
        cm,
        inch,
    }
}

#[test]
fn decimal_arithmetic_is_exact() {
    assert_eq!(&r("0.1") + &r("0.2"), r("0.3"));
    assert_eq!(&r("1/3") * &Rational::from(3), Rational::one());
    assert_eq!(r("1/3").to_string(), "1/3");
    assert_eq!(r("6.68901888").to_string(), "6.68901888");
    assert!(!r("1/3").is_decimal());
}

#[test]
fn multiplication_laws() {
    let Si { m, s, kg, .. } = si();
    let ms = (&m * &s).unwrap();
    assert_eq!(ms, (&s * &m).unwrap());
    let sk = (&s * &kg).unwrap();
    assert_eq!((&ms * &kg).unwrap(), (&m * &sk).unwrap());
    assert_eq!((&m * &Unit::dimensionless()).unwrap(), m);
    let speed = (&m / &s).unwrap();
    assert_eq!((&speed * &s).unwrap(), m);
    let unity = (&m / &m).unwrap();
    assert!(unity.is_dimensionless());
    assert_eq!(unity.scale(), &Rational::one());
}

#[test]
fn reciprocal_units() {
    let Si { m, s, inch, .. } = si();
    let per_inch = (&Unit::dimensionless() / &inch).unwrap();
    assert_eq!(per_inch.scale(), &inch.scale().recip().unwrap());
    let unity = (&inch * &per_inch).unwrap();
    assert!(unity.is_dimensionless());
    assert_eq!(unity.scale(), &Rational::one());

    let speed = (&m / &s).unwrap();
    let squared = speed.power(2).unwrap();
    for (dimension, n) in speed.dimensions().iter() {
        assert_eq!(squared.dimensions().exponent(dimension), 2 * n);
    }
}

#[test]
fn powers() {
    let Si { m, cm, .. } = si();
    let mm = (&m * &m).unwrap();
    assert_eq!(m.power(0).unwrap(), Unit::dimensionless());
    assert_eq!(m.power(2).unwrap(), mm);
    assert_eq!(m.power(-2).unwrap(), mm.power(-1).unwrap());
    assert_eq!(cm.power(3).unwrap().scale(), &r("1e-6"));
    assert_eq!(cm.power(-1).unwrap().scale(), &Rational::from(100));
}

#[test]
fn inch_to_centimeter() {
    let Si { cm, inch, .. } = si();
    let converted = inch.measure(2).convert_to(&cm).unwrap();
    assert_eq!(converted.value(), &r("5.08"));
    assert_eq!(converted.unit().name(), Some("cm"));
    let back = cm.measure(r("5.08")).convert_to(&inch).unwrap();
    assert_eq!(back.value(), &Rational::from(2));
}

#[test]
fn square_yards_to_square_meters() {
    let Si { m, inch, .. } = si();
    let ft = inch.scaled(12).unwrap();
    let yd = ft.scaled(3).unwrap();
    let sqyd = yd.power(2).unwrap();
    let area = sqyd.measure(8).convert_to(&m.power(2).unwrap()).unwrap();
    assert_eq!(area.value(), &r("6.68901888"));
    assert_eq!(area.convert_to(&sqyd).unwrap().value(), &Rational::from(8));
}

#[test]
fn conversion_needs_equal_dimensions() {
    let Si { m, s, .. } = si();
    assert_eq!(
        m.measure(1).convert_to(&s),
        Err(UnitError::Incompatible(
            m.dimensions().clone(),
            s.dimensions().clone()
        ))
    );
    let other = Unit::primitive("length", "m");
    assert!(!m.compatible(&other));
    assert!(m.measure(1).convert_to(&other).is_err());
}

#[test]
fn sums_and_comparison() {
    let Si { m, s, cm, inch, .. } = si();
    let total = (m.measure(1) + cm.measure(50)).unwrap();
    assert_eq!(total.value(), &r("1.5"));
    assert_eq!(total.unit(), &m);
    let diff = (m.measure(1) - cm.measure(50)).unwrap();
    assert_eq!(diff.value(), &r("0.5"));
    assert!((m.measure(1) + s.measure(1)).is_err());
    assert_eq!(
        inch.measure(1).compare(&cm.measure(3)).unwrap(),
        Ordering::Less
    );
    assert_eq!(
        inch.measure(1).compare(&cm.measure(r("2.54"))).unwrap(),
        Ordering::Equal
    );
}

#[test]
fn measurement_products() {
    let Si { m, s, inch, .. } = si();
    let speed = (m.measure(3) / s.measure(2)).unwrap();
    assert_eq!(speed.value(), &r("1.5"));
    assert!(speed.unit().compatible(&(&m / &s).unwrap()));
    let length = (speed.clone() * s.measure(4)).unwrap();
    assert_eq!(length.convert_to(&m).unwrap().value(), &Rational::from(6));

    let (dimension, _) = m.dimensions().iter().next().unwrap();
    assert_eq!(speed.exponent(dimension), 1);
    assert_eq!(speed.pow(-2).unwrap().exponent(dimension), -2);

    let normal = inch.measure(2).normalize();
    assert_eq!(normal.value(), &r("0.0508"));
    assert_eq!(normal.unit(), &m);
}

#[test]
fn zero_is_not_a_scale() {
    let Si { m, .. } = si();
    assert_eq!(m.scaled(0).unwrap_err(), UnitError::ZeroScale);
    assert_eq!(
        m.measure(0).to_unit().unwrap_err(),
        UnitError::ZeroScale
    );
    assert_eq!(
        m.measure(1).divide(&Measurement::from_value(0)),
        Err(UnitError::DivisionByZero)
    );
    assert_eq!(
        Measurement::from_value(0).pow(-1),
        Err(UnitError::DivisionByZero)
    );
}

#[test]
fn runaway_powers_overflow() {
    let Si { m, inch, .. } = si();
    let big = m.power(i32::MAX).unwrap();
    assert_eq!(big.power(2), Err(UnitError::Overflow));
    assert_eq!(&big * &m, Err(UnitError::Overflow));
    assert_eq!(inch.power(1_000_000_000), Err(UnitError::Overflow));
    assert!(inch.power(1000).is_ok());
}

#[test]
fn display() {
    let Si { m, s, kg, inch, .. } = si();
    assert_eq!((&m / &s).unwrap().to_string(), "m/s");
    let force = (&(&kg * &m).unwrap() / &s.power(2).unwrap()).unwrap();
    assert_eq!(force.to_string(), "m\u{22c5}kg/s\u{00b2}");
    assert_eq!(inch.measure(2).to_string(), "2 inch");
    assert_eq!(
        (&inch * &inch).unwrap().to_string(),
        "0.00064516 m\u{00b2}"
    );
    assert_eq!(Measurement::from_value(r("1.5")).to_string(), "1.5");
}

#[test]
fn serialization() {
    let Si { inch, .. } = si();
    assert_eq!(
        serde_json::to_value(inch.measure(2)).unwrap(),
        json!(["2", {
            "name": "inch",
            "dimensions": { "length": 1 },
            "scale": "0.0254"
        }])
    );
    assert_eq!(
        serde_json::from_value::<Rational>(json!("2.54")).unwrap(),
        r("2.54")
    );
}

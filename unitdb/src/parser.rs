/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use nom::{
    self,
    branch::alt,
    bytes::complete::take_while,
    character::complete::{digit0, digit1, one_of, satisfy, space0, space1},
    combinator::{
        all_consuming, map, map_opt, map_res, not, opt, recognize, value,
    },
    multi::{fold_many1, separated_list1},
    sequence::{
        delimited, pair, preceded, separated_pair, terminated, tuple,
    },
    IResult,
};

use crate::database::Record;
use crate::expr::Expr;

use super::{Rational, UnitError};

/// Parse a (signed) number literal such as `-1.5e-3` or `1200/3937`.
pub fn parse_number(input: &str) -> Result<Rational, UnitError> {
    match pair(opt(sign), number)(input.trim()) {
        Ok(("", (s, n))) => Ok(match s {
            Some(-1) => -n,
            _ => n,
        }),
        Ok((r, _)) => {
            Err(UnitError::ParseError(format!("Leftover input: {}", r)))
        }
        Err(err) => Err(UnitError::ParseError(format!("{}", err))),
    }
}

/// Parse a unit expression.
pub fn parse_expr(input: &str) -> Result<Expr, UnitError> {
    match sum(input.trim()) {
        Ok(("", e)) => Ok(e),
        Ok((r, _)) => {
            Err(UnitError::ParseError(format!("Leftover input: {}", r)))
        }
        Err(err) => Err(UnitError::ParseError(format!("{}", err))),
    }
}

/// Parse one logical line of the unit database.
pub(crate) fn parse_record(input: &str) -> Result<Record, UnitError> {
    match alt((
        all_consuming(terminated(primitive, space0)),
        all_consuming(terminated(prefix, space0)),
        all_consuming(terminated(derived, space0)),
    ))(input.trim())
    {
        Ok((_, r)) => Ok(r),
        Err(err) => Err(UnitError::ParseError(format!("{}", err))),
    }
}

/* Database records. */

fn primitive(input: &str) -> IResult<&str, Record> {
    let (input, (names, _, dimension)) =
        tuple((names, delimited(space0, tag("=!="), space0), name))(input)?;
    Ok((
        input,
        Record::Primitive {
            names,
            dimension: dimension.to_string(),
        },
    ))
}

fn prefix(input: &str) -> IResult<&str, Record> {
    let marker = alt((value(true, tag("::-")), value(false, tag(":-"))));
    alt((
        map(
            tuple((name, delimited(space0, marker, space0), sum)),
            |(name, standalone, expr)| Record::Prefix {
                name: name.to_string(),
                standalone,
                expr,
            },
        ),
        map(
            tuple((terminated(name, char('-')), space1, sum)),
            |(name, _, expr)| Record::Prefix {
                name: name.to_string(),
                standalone: false,
                expr,
            },
        ),
    ))(input)
}

fn derived(input: &str) -> IResult<&str, Record> {
    let (input, (names, _, expr)) = tuple((
        names,
        delimited(space0, alt((tag(":="), tag("="))), space0),
        sum,
    ))(input)?;
    Ok((input, Record::Derived { names, expr }))
}

fn names(input: &str) -> IResult<&str, Vec<String>> {
    map(separated_list1(space1, name), |names| {
        names.into_iter().map(String::from).collect()
    })(input)
}

/* Expressions, loosest binding first. */

fn sum(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut left) = product(input)?;
    while let Ok((rest, (op, right))) =
        pair(delimited(space0, one_of("+-"), space0), product)(input)
    {
        left = match op {
            '+' => Expr::Add(Box::new(left), Box::new(right)),
            _ => Expr::Sub(Box::new(left), Box::new(right)),
        };
        input = rest;
    }
    Ok((input, left))
}

fn product(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut left) = term(input)?;
    while let Ok((rest, (op, right))) =
        pair(delimited(space0, mul_op, space0), term)(input)
    {
        left = match op {
            '*' => Expr::Mul(Box::new(left), Box::new(right)),
            _ => Expr::Div(Box::new(left), Box::new(right)),
        };
        input = rest;
    }
    Ok((input, left))
}

/* Multiplication by juxtaposition binds tighter than '*' and '/':
 * "J / mol K" is J / (mol K). */
fn term(input: &str) -> IResult<&str, Expr> {
    let (mut input, mut left) = unary(input)?;
    while let Ok((rest, right)) = preceded(space0, power)(input) {
        left = Expr::Mul(Box::new(left), Box::new(right));
        input = rest;
    }
    Ok((input, left))
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(pair(char('-'), space0), unary), |e| {
            Expr::Neg(Box::new(e))
        }),
        preceded(pair(char('+'), space0), unary),
        power,
    ))(input)
}

/* Right-associative: the exponent is itself a unary expression. */
fn power(input: &str) -> IResult<&str, Expr> {
    let (input, base) = atom(input)?;
    if let Ok((input, exp)) =
        preceded(delimited(space0, char('^'), space0), unary)(input)
    {
        return Ok((input, Expr::Pow(Box::new(base), Box::new(exp))));
    }
    if let Ok((input, n)) = superscript_power(input) {
        return Ok((
            input,
            Expr::Pow(Box::new(base), Box::new(Expr::Number(n.into()))),
        ));
    }
    Ok((input, base))
}

fn atom(input: &str) -> IResult<&str, Expr> {
    alt((
        map(number, Expr::Number),
        map(name, |n| Expr::Name(n.to_string())),
        delimited(pair(char('('), space0), sum, pair(space0, char(')'))),
    ))(input)
}

fn mul_op(input: &str) -> IResult<&str, char> {
    alt((value('*', one_of("*·⋅×")), value('/', one_of("/÷"))))(input)
}

/* Names. */

fn name(input: &str) -> IResult<&str, &str> {
    recognize(pair(satisfy(name_start), take_while(name_char)))(input)
}

fn name_start(c: char) -> bool {
    c.is_alphabetic()
        || c == '_'
        || (!c.is_ascii()
            && !c.is_whitespace()
            && !"·⋅×÷⁺⁻".contains(c)
            && superscript_value(c).is_none())
}

fn name_char(c: char) -> bool {
    name_start(c) || c.is_ascii_digit()
}

/* Numbers. An unspaced "n/d" is a single literal: "1200/3937 m" is
 * (1200/3937) m, while "1 / 3937 m" divides by 3937 m. */

fn number(input: &str) -> IResult<&str, Rational> {
    alt((fraction, decimal))(input)
}

fn fraction(input: &str) -> IResult<&str, Rational> {
    map_res(
        terminated(
            separated_pair(integer, char('/'), integer),
            not(one_of(".eE")),
        ),
        |(n, d)| n.checked_div(&d),
    )(input)
}

fn integer(input: &str) -> IResult<&str, Rational> {
    map_res(digit1, |s| Rational::from_decimal_parts(false, s, "", 0))(input)
}

fn decimal(input: &str) -> IResult<&str, Rational> {
    map_res(
        pair(mantissa, opt(exponent)),
        |((int, frac), exp)| {
            Rational::from_decimal_parts(false, int, frac, exp.unwrap_or(0))
        },
    )(input)
}

fn mantissa(input: &str) -> IResult<&str, (&str, &str)> {
    alt((
        pair(
            digit1,
            map(opt(preceded(char('.'), digit0)), Option::unwrap_or_default),
        ),
        map(preceded(char('.'), digit1), |frac| ("", frac)),
    ))(input)
}

/* "ee" is Frink's exact exponent; all exponents are exact here. */
fn exponent(input: &str) -> IResult<&str, i32> {
    preceded(
        alt((tag("ee"), tag("e"), tag("E"))),
        map_res(recognize(pair(opt(one_of("+-")), digit1)), |s: &str| {
            s.parse::<i32>()
        }),
    )(input)
}

fn sign(input: &str) -> IResult<&str, i32> {
    alt((value(-1, char('-')), value(1, char('+'))))(input)
}

fn superscript_power(input: &str) -> IResult<&str, i32> {
    let (input, (s, n)) =
        tuple((opt(superscript_sign), superscript_digit1))(input)?;
    Ok((input, s.unwrap_or(1) * n))
}

fn superscript_sign(input: &str) -> IResult<&str, i32> {
    alt((value(-1, char('⁻')), value(1, char('⁺'))))(input)
}

fn superscript_digit1(input: &str) -> IResult<&str, i32> {
    map_opt(
        fold_many1(
            superscript_digit,
            || Some(0),
            |n: Option<i32>, i| n?.checked_mul(10)?.checked_add(i),
        ),
        |n| n,
    )(input)
}

fn superscript_digit(input: &str) -> IResult<&str, i32> {
    map(satisfy(|c| superscript_value(c).is_some()), |c| {
        superscript_value(c).unwrap_or(0)
    })(input)
}

fn superscript_value(c: char) -> Option<i32> {
    "⁰¹²³⁴⁵⁶⁷⁸⁹".chars().position(|s| s == c).map(|n| n as i32)
}

/* Monomorphised versions of char and tag. */

fn char<'r>(t: char) -> impl Fn(&'r str) -> IResult<&'r str, char> {
    nom::character::complete::char(t)
}

fn tag<'r>(t: &'static str) -> impl Fn(&'r str) -> IResult<&'r str, &'r str> {
    nom::bytes::complete::tag(t)
}

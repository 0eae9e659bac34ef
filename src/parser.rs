//! Keyword parsers using nom.
//!
//! Plan files spell data types and referential actions as text. These
//! parsers accept the SQL spelling (`timestamp with time zone`, `set null`)
//! as well as the short forms (`timestamptz`, `set_null`), case-insensitively.
//!
//! ```text
//! varchar ( 255 )
//! ───┬─── ───┬───
//!    │       └── optional length
//!    └── keyword
//! ```

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit1, multispace0, multispace1},
    combinator::{map_res, opt, recognize, value},
    sequence::{delimited, pair, tuple},
    IResult,
};

use crate::error::{ShiftError, ShiftResult};
use crate::field::Action;
use crate::types::DataType;

/// Parse a data type keyword such as `varchar(255)` or `double precision`.
pub fn parse_data_type(input: &str) -> ShiftResult<DataType> {
    run(input, "data type", data_type)
}

/// Parse a referential action such as `cascade` or `set null`.
pub fn parse_action(input: &str) -> ShiftResult<Action> {
    run(input, "referential action", action)
}

/// Run a parser over the whole (trimmed) input.
fn run<'a, T>(
    input: &'a str,
    what: &str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
) -> ShiftResult<T> {
    let input = input.trim();

    match parser(input) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((remaining, _)) => Err(ShiftError::parse(
            input.len() - remaining.len(),
            format!("Unexpected trailing content in {}: '{}'", what, remaining),
        )),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ShiftError::parse(
            input.len() - e.input.len(),
            format!("Unknown {}: '{}'", what, input),
        )),
        Err(nom::Err::Incomplete(_)) => Err(ShiftError::parse(
            input.len(),
            format!("Incomplete {}: '{}'", what, input),
        )),
    }
}

fn data_type(input: &str) -> IResult<&str, DataType> {
    alt((
        varchar,
        timestamp_with_time_zone,
        value(DataType::TimestampWithTimeZone, tag_no_case("timestamptz")),
        value(DataType::Timestamp, tag_no_case("timestamp")),
        value(DataType::Interval, tag_no_case("interval")),
        value(
            DataType::IpAddress,
            alt((tag_no_case("inet"), tag_no_case("ip_address"))),
        ),
        value(DataType::Date, tag_no_case("date")),
        value(
            DataType::Bool,
            alt((tag_no_case("boolean"), tag_no_case("bool"))),
        ),
        value(DataType::Serial, tag_no_case("serial")),
        value(
            DataType::Integer,
            alt((tag_no_case("integer"), tag_no_case("int"))),
        ),
        value(
            DataType::Double,
            pair(
                tag_no_case("double"),
                opt(pair(multispace1, tag_no_case("precision"))),
            ),
        ),
    ))(input)
}

/// `varchar`, `string`, optionally followed by `(N)`.
fn varchar(input: &str) -> IResult<&str, DataType> {
    let (input, _) = alt((tag_no_case("varchar"), tag_no_case("string")))(input)?;
    let (input, length) = opt(delimited(
        pair(multispace0, char('(')),
        delimited(
            multispace0,
            map_res(digit1, |s: &str| s.parse::<u32>()),
            multispace0,
        ),
        char(')'),
    ))(input)?;

    Ok((input, DataType::String(length)))
}

fn timestamp_with_time_zone(input: &str) -> IResult<&str, DataType> {
    value(
        DataType::TimestampWithTimeZone,
        tuple((
            tag_no_case("timestamp"),
            multispace1,
            tag_no_case("with"),
            multispace1,
            tag_no_case("time"),
            multispace1,
            tag_no_case("zone"),
        )),
    )(input)
}

fn action(input: &str) -> IResult<&str, Action> {
    alt((
        value(
            Action::NoAction,
            alt((keyword_pair("no", "action"), tag_no_case("none"))),
        ),
        value(Action::Cascade, tag_no_case("cascade")),
        value(Action::SetNull, keyword_pair("set", "null")),
        value(Action::SetDefault, keyword_pair("set", "default")),
    ))(input)
}

/// Two keywords separated by whitespace or a single underscore.
fn keyword_pair<'a>(
    first: &'static str,
    second: &'static str,
) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    recognize(tuple((
        tag_no_case(first),
        alt((multispace1, tag("_"))),
        tag_no_case(second),
    )))
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ScaleBarError, ScaleBarResult};

const DEFAULT_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Fixed,
    Exponent,
    General,
    Percent,
}

/// Numeric label format: `[,][.N](f|e|g|%)`, e.g. `.2f`, `,.0f`, `.3g`.
///
/// A missing type behaves like `g`; a missing precision defaults to six.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberFormat {
    grouping: bool,
    precision: Option<usize>,
    kind: FormatKind,
}

impl NumberFormat {
    #[must_use]
    pub const fn fixed(precision: usize) -> Self {
        Self {
            grouping: false,
            precision: Some(precision),
            kind: FormatKind::Fixed,
        }
    }

    pub fn parse(spec: &str) -> ScaleBarResult<Self> {
        let invalid = || ScaleBarError::config("labels.format", format!("unsupported format `{spec}`"));

        let mut rest = spec.trim();
        let grouping = if let Some(stripped) = rest.strip_prefix(',') {
            rest = stripped;
            true
        } else {
            false
        };

        let kind = match rest.chars().last() {
            Some('f' | 'F') => FormatKind::Fixed,
            Some('e' | 'E') => FormatKind::Exponent,
            Some('g' | 'G') => FormatKind::General,
            Some('%') => FormatKind::Percent,
            Some(c) if c.is_ascii_digit() => FormatKind::General,
            None => FormatKind::General,
            Some(_) => return Err(invalid()),
        };
        if !matches!(rest.chars().last(), Some(c) if c.is_ascii_digit()) && !rest.is_empty() {
            rest = &rest[..rest.len() - 1];
        }

        let precision = match rest {
            "" => None,
            digits => {
                let digits = digits.strip_prefix('.').ok_or_else(invalid)?;
                Some(digits.parse::<usize>().map_err(|_| invalid())?)
            }
        };
        if precision.is_some_and(|precision| precision > 20) {
            return Err(invalid());
        }

        Ok(Self {
            grouping,
            precision,
            kind,
        })
    }

    #[must_use]
    pub const fn kind(self) -> FormatKind {
        self.kind
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }
        let precision = self.precision.unwrap_or(DEFAULT_PRECISION);
        let body = match self.kind {
            FormatKind::Fixed => format!("{value:.precision$}"),
            FormatKind::Exponent => exponent(value, precision),
            FormatKind::General => general(value, precision),
            FormatKind::Percent => format!("{:.precision$}%", value * 100.0),
        };
        if self.grouping && self.kind != FormatKind::Exponent {
            group_thousands(&body)
        } else {
            body
        }
    }

    /// Formats an integral value without a fractional part.
    #[must_use]
    pub fn format_integer(self, value: f64) -> String {
        let body = format!("{:.0}", value + 0.0);
        if self.grouping {
            group_thousands(&body)
        } else {
            body
        }
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::fixed(2)
    }
}

impl FromStr for NumberFormat {
    type Err = ScaleBarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NumberFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grouping {
            f.write_str(",")?;
        }
        if let Some(precision) = self.precision {
            write!(f, ".{precision}")?;
        }
        f.write_str(match self.kind {
            FormatKind::Fixed => "f",
            FormatKind::Exponent => "e",
            FormatKind::General => "g",
            FormatKind::Percent => "%",
        })
    }
}

impl Serialize for NumberFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NumberFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Renders a segment value as a label.
///
/// Without a format the raw value is shown with at least one decimal (`1.0`).
/// With `format_int`, whole numbers drop their fractional part.
#[must_use]
pub fn format_value(value: f64, format: Option<NumberFormat>, format_int: bool) -> String {
    match format {
        None => format!("{value:?}"),
        Some(format) if format_int && value.is_finite() && value.fract() == 0.0 => {
            format.format_integer(value)
        }
        Some(format) => format.format(value),
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "nan".to_owned()
    } else if value > 0.0 {
        "inf".to_owned()
    } else {
        "-inf".to_owned()
    }
}

fn exponent(value: f64, precision: usize) -> String {
    let raw = format!("{value:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

fn general(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }
    let significant = precision.max(1);
    let rounded = format!("{value:.prec$e}", prec = significant - 1);
    let exp: i32 = rounded
        .split_once('e')
        .and_then(|(_, exp)| exp.parse().ok())
        .unwrap_or(0);

    if exp >= -4 && exp < significant as i32 {
        let decimals = (significant as i32 - 1 - exp).max(0) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}"))
    } else {
        let sci = exponent(value, significant - 1);
        match sci.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", strip_trailing_zeros(mantissa)),
            None => sci,
        }
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        text.to_owned()
    }
}

fn group_thousands(text: &str) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let split = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let (digits, tail) = unsigned.split_at(split);

    let mut grouped = String::with_capacity(text.len() + digits.len() / 3);
    grouped.push_str(sign);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped.push_str(tail);
    grouped
}

#[cfg(test)]
mod tests {
    use super::{NumberFormat, format_value};

    #[test]
    fn formats_python_style_subset() {
        let fmt = |spec: &str, value: f64| NumberFormat::parse(spec).map(|f| f.format(value));
        assert_eq!(fmt(".2f", 2.5).ok().as_deref(), Some("2.50"));
        assert_eq!(fmt(",.1f", 12345.67).ok().as_deref(), Some("12,345.7"));
        assert_eq!(fmt(".1e", 1500.0).ok().as_deref(), Some("1.5e+03"));
        assert_eq!(fmt(".3g", 0.000_015).ok().as_deref(), Some("1.5e-05"));
        assert_eq!(fmt(".3g", 2.5).ok().as_deref(), Some("2.5"));
        assert_eq!(fmt(".0%", 0.25).ok().as_deref(), Some("25%"));
        assert!(NumberFormat::parse("x2").is_err());
    }

    #[test]
    fn raw_values_keep_a_decimal() {
        assert_eq!(format_value(1.0, None, true), "1.0");
        assert_eq!(format_value(0.25, None, true), "0.25");
        assert_eq!(format_value(4.0, Some(NumberFormat::fixed(2)), true), "4");
        assert_eq!(format_value(4.0, Some(NumberFormat::fixed(2)), false), "4.00");
    }
}

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// UFloat – a measured value with a symmetric (one sigma) uncertainty
// ---------------------------------------------------------------------------

/// A nominal value together with its standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UFloat {
    pub nominal: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseUFloatError {
    #[error("empty value")]
    Empty,

    #[error("invalid nominal value in '{0}'")]
    InvalidNominal(String),

    #[error("invalid uncertainty in '{0}'")]
    InvalidUncertainty(String),

    #[error("negative uncertainty in '{0}'")]
    NegativeUncertainty(String),

    #[error("malformed value '{0}'")]
    Malformed(String),
}

impl UFloat {
    pub fn new(nominal: f64, std_dev: f64) -> Self {
        Self { nominal, std_dev }
    }

    /// A value without uncertainty.
    pub fn exact(nominal: f64) -> Self {
        Self::new(nominal, 0.0)
    }

    /// Render in shorthand notation, e.g. `-2.2454(6)`.
    ///
    /// The uncertainty is rounded to `sig_digits` significant digits and the
    /// nominal value is rounded to the same decimal place. Like `%g`, a
    /// common exponent is factored out when the leading digit sits below
    /// 1e-4 or the uncertainty rounds to a place above the units:
    /// `1.23(5)e+04`, `1.5(2)e-07`.
    pub fn format_shorthand(&self, sig_digits: usize) -> String {
        if !self.std_dev.is_finite() {
            let unc = self.std_dev.to_string().to_lowercase();
            return format!("{}({unc})", self.nominal);
        }
        if self.std_dev == 0.0 {
            return format!("{}(0)", self.nominal);
        }

        let digits = sig_digits.max(1) as i32;
        let mut place = self.std_dev.log10().floor() as i32 - (digits - 1);
        let mut unc = to_place(self.std_dev, place).round();
        // 0.96 rounded to one digit is 10 units: move to the next place.
        if unc >= 10f64.powi(digits) {
            place += 1;
            unc = to_place(self.std_dev, place).round();
        }
        let nominal_units = to_place(self.nominal, place).round();

        let reference = from_place(nominal_units, place).abs().max(from_place(unc, place));
        let exponent = reference.log10().floor() as i32;
        if exponent < -4 || place > 0 {
            let shift = place - exponent;
            let decimals = (-shift).max(0) as usize;
            let mantissa = from_place(nominal_units, shift) + 0.0;
            let unc_text = uncertainty_text(unc, shift, decimals);
            let sign = if exponent < 0 { '-' } else { '+' };
            return format!(
                "{mantissa:.decimals$}({unc_text})e{sign}{:02}",
                exponent.abs()
            );
        }

        let decimals = (-place).max(0) as usize;
        let nominal = from_place(nominal_units, place) + 0.0;
        let unc_text = uncertainty_text(unc, place, decimals);
        format!("{nominal:.decimals$}({unc_text})")
    }
}

/// Digits inside the parentheses: units of the last digit, or the absolute
/// value with its decimal point once it reaches 1 while the place is
/// fractional (`12.3(1.5)`).
fn uncertainty_text(units: f64, place: i32, decimals: usize) -> String {
    let value = from_place(units, place);
    if place < 0 && value >= 1.0 {
        format!("{value:.decimals$}")
    } else {
        format!("{units:.0}")
    }
}

/// Express `value` in units of `10^place`.
fn to_place(value: f64, place: i32) -> f64 {
    if place <= 0 {
        value * 10f64.powi(-place)
    } else {
        value / 10f64.powi(place)
    }
}

fn from_place(units: f64, place: i32) -> f64 {
    if place <= 0 {
        units / 10f64.powi(-place)
    } else {
        units * 10f64.powi(place)
    }
}

impl fmt::Display for UFloat {
    /// The formatter precision selects the significant digits of the
    /// uncertainty: `format!("{:.2}", u)`. Defaults to one digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = f.precision().unwrap_or(1);
        f.write_str(&self.format_shorthand(digits))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl FromStr for UFloat {
    type Err = ParseUFloatError;

    /// Accepted forms:
    /// * `-2.2454(6)`, `1.23(4)e-5`, `12.3(1.5)`
    /// * `1.5+/-0.3`, `1.5 ± 0.3`, `(1.5+/-0.3)e2`
    /// * `1.5` – one unit of the last digit is assumed (`1.5 ± 0.1`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseUFloatError::Empty);
        }

        if let Some((sep_at, sep_len)) = find_plus_minus(s) {
            return parse_explicit(s, sep_at, sep_len);
        }
        if s.ends_with(')') || s.contains('(') {
            return parse_shorthand(s);
        }
        parse_plain(s)
    }
}

fn find_plus_minus(s: &str) -> Option<(usize, usize)> {
    s.find("+/-")
        .map(|i| (i, 3))
        .or_else(|| s.find('±').map(|i| (i, '±'.len_utf8())))
}

/// `a+/-b`, optionally wrapped as `(a+/-b)e5`.
fn parse_explicit(s: &str, sep_at: usize, sep_len: usize) -> Result<UFloat, ParseUFloatError> {
    let (body, exponent) = if s.starts_with('(') {
        let close = s
            .rfind(')')
            .ok_or_else(|| ParseUFloatError::Malformed(s.to_string()))?;
        let exponent = parse_exponent(&s[close + 1..], s)?;
        (&s[1..close], exponent)
    } else {
        (s, 0)
    };

    // The separator index refers to `s`; re-locate it inside the body.
    let (sep_at, sep_len) = if body.len() == s.len() {
        (sep_at, sep_len)
    } else {
        find_plus_minus(body).ok_or_else(|| ParseUFloatError::Malformed(s.to_string()))?
    };

    let nominal_text = body[..sep_at].trim();
    let unc_text = body[sep_at + sep_len..].trim();

    let nominal = parse_scaled(nominal_text, exponent)
        .ok_or_else(|| ParseUFloatError::InvalidNominal(s.to_string()))?;
    let std_dev = parse_scaled(unc_text, exponent)
        .ok_or_else(|| ParseUFloatError::InvalidUncertainty(s.to_string()))?;

    if std_dev < 0.0 {
        return Err(ParseUFloatError::NegativeUncertainty(s.to_string()));
    }
    Ok(UFloat::new(nominal, std_dev))
}

/// `value(unc)` with an optional trailing exponent.
fn parse_shorthand(s: &str) -> Result<UFloat, ParseUFloatError> {
    let open = s
        .find('(')
        .ok_or_else(|| ParseUFloatError::Malformed(s.to_string()))?;
    let close = s
        .rfind(')')
        .filter(|&c| c > open)
        .ok_or_else(|| ParseUFloatError::Malformed(s.to_string()))?;

    let mantissa = s[..open].trim();
    let unc_text = s[open + 1..close].trim();
    let exponent = parse_exponent(&s[close + 1..], s)?;

    if mantissa.contains(['e', 'E']) {
        return Err(ParseUFloatError::Malformed(s.to_string()));
    }
    let nominal = parse_scaled(mantissa, exponent)
        .ok_or_else(|| ParseUFloatError::InvalidNominal(s.to_string()))?;

    if unc_text.starts_with('-') {
        return Err(ParseUFloatError::NegativeUncertainty(s.to_string()));
    }

    let std_dev = if unc_text.contains('.') {
        parse_scaled(unc_text, exponent)
    } else if !unc_text.is_empty() && unc_text.bytes().all(|b| b.is_ascii_digit()) {
        let place = exponent - fraction_digits(mantissa);
        format!("{unc_text}e{place}").parse::<f64>().ok()
    } else {
        None
    }
    .ok_or_else(|| ParseUFloatError::InvalidUncertainty(s.to_string()))?;

    Ok(UFloat::new(nominal, std_dev))
}

/// A bare number: the uncertainty is one unit in the last digit.
fn parse_plain(s: &str) -> Result<UFloat, ParseUFloatError> {
    let (mantissa, exponent) = match s.find(['e', 'E']) {
        Some(i) => (&s[..i], parse_exponent(&s[i..], s)?),
        None => (s, 0),
    };
    let nominal = parse_scaled(mantissa, exponent)
        .ok_or_else(|| ParseUFloatError::InvalidNominal(s.to_string()))?;
    let place = exponent - fraction_digits(mantissa);
    let std_dev = format!("1e{place}")
        .parse::<f64>()
        .map_err(|_| ParseUFloatError::Malformed(s.to_string()))?;
    Ok(UFloat::new(nominal, std_dev))
}

/// Parse `text` as a finite float and scale it by `10^exponent`.
///
/// Scaling goes through the decimal string so `6e-4` parses to the
/// closest float to 0.0006 rather than `6.0 * 1e-4`.
fn parse_scaled(text: &str, exponent: i32) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let value = if exponent == 0 {
        text.parse::<f64>().ok()?
    } else {
        if text.contains(['e', 'E']) {
            return None;
        }
        format!("{text}e{exponent}").parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

/// Parse an `e-5` / `E+05` suffix; an empty suffix means no exponent.
fn parse_exponent(tail: &str, whole: &str) -> Result<i32, ParseUFloatError> {
    let tail = tail.trim();
    if tail.is_empty() {
        return Ok(0);
    }
    tail.strip_prefix(['e', 'E'])
        .and_then(|digits| digits.parse::<i32>().ok())
        .ok_or_else(|| ParseUFloatError::Malformed(whole.to_string()))
}

fn fraction_digits(mantissa: &str) -> i32 {
    mantissa
        .split_once('.')
        .map(|(_, frac)| frac.len() as i32)
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

/// Nominal values of a column of measurements.
pub fn nominal_values(values: &[UFloat]) -> Vec<f64> {
    values.iter().map(|v| v.nominal).collect()
}

/// Standard deviations of a column of measurements.
pub fn std_devs(values: &[UFloat]) -> Vec<f64> {
    values.iter().map(|v| v.std_dev).collect()
}

//! Fixed-width formatting of cell values.
//!
//! Every formatter has an exact `width` and renders any value to a string
//! of exactly that many characters. Values that do not fit degrade to a
//! run of the overflow character; formatting never fails.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;
use crate::model::{Value, Values};
use crate::text::{self, char_len, ELLIPSIS};

/// Default character for values that do not fit.
pub const OVERFLOW: char = '#';

/// Widest text column chosen automatically.
pub const MAX_AUTO_TEXT_WIDTH: usize = 32;

/// Most fractional digits chosen automatically for floats.
pub const MAX_AUTO_PRECISION: usize = 6;

/// Upper bound for interactive precision changes.
pub const MAX_PRECISION: usize = 17;

/// Enough fractional digits to print any `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// How the sign position of a number is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SignMode {
    /// `-` for negative values, a space otherwise.
    #[default]
    NegativeSpace,
    /// `-` or `+`.
    Always,
    /// No sign position; negative values overflow.
    None,
}

impl FromStr for SignMode {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "negative" | " " => Ok(SignMode::NegativeSpace),
            "always" | "+" => Ok(SignMode::Always),
            "none" | "" => Ok(SignMode::None),
            other => Err(FormatError::InvalidConfig(format!(
                "unknown sign mode: {:?}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SignMode {
    type Error = FormatError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SignMode> for String {
    fn from(mode: SignMode) -> Self {
        match mode {
            SignMode::NegativeSpace => "negative",
            SignMode::Always => "always",
            SignMode::None => "none",
        }
        .to_string()
    }
}

/// Tie-breaking rule at the last displayed digit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rounding {
    /// Ties go to the even digit: 0.125 -> 0.12, 2.5 -> 2.
    #[default]
    HalfEven,
    /// Ties go away from zero: 0.125 -> 0.13, 2.5 -> 3.
    HalfAwayFromZero,
}

/// Multiplier applied before formatting, with a suffix appended after.
#[derive(Clone, Debug, PartialEq)]
pub struct Scale {
    factor: f64,
    suffix: String,
    integer_only: bool,
}

impl Scale {
    pub fn new(factor: f64, suffix: impl Into<String>) -> Result<Self, FormatError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(FormatError::InvalidConfig(format!(
                "bad scale factor: {}",
                factor
            )));
        }
        Ok(Self {
            factor,
            suffix: suffix.into(),
            integer_only: false,
        })
    }

    pub fn percent() -> Self {
        Self {
            factor: 100.0,
            suffix: "%".to_string(),
            integer_only: false,
        }
    }

    /// Basis points; always rendered without a fractional part.
    pub fn basis_points() -> Self {
        Self {
            factor: 10_000.0,
            suffix: " bps".to_string(),
            integer_only: true,
        }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn is_integer_only(&self) -> bool {
        self.integer_only
    }
}

/// Fits arbitrary text into a fixed width, eliding or padding.
#[derive(Clone, Debug, PartialEq)]
pub struct TextFormatter {
    width: usize,
    ellipsis: char,
    pad: char,
    elide_pos: f64,
    pad_left: bool,
}

impl TextFormatter {
    pub fn new(width: usize) -> Result<Self, FormatError> {
        if width < 1 {
            return Err(FormatError::InvalidConfig(
                "text width smaller than the ellipsis".to_string(),
            ));
        }
        Ok(Self {
            width,
            ellipsis: ELLIPSIS,
            pad: ' ',
            elide_pos: 1.0,
            pad_left: false,
        })
    }

    pub fn with_ellipsis(mut self, ellipsis: char) -> Self {
        self.ellipsis = ellipsis;
        self
    }

    pub fn with_pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    pub fn with_pad_left(mut self, pad_left: bool) -> Self {
        self.pad_left = pad_left;
        self
    }

    /// Where the ellipsis goes when eliding: 0 at the start, 1 at the end.
    pub fn with_elide_pos(mut self, pos: f64) -> Result<Self, FormatError> {
        if !(0.0..=1.0).contains(&pos) {
            return Err(FormatError::InvalidConfig(format!(
                "elide position {} not in [0, 1]",
                pos
            )));
        }
        self.elide_pos = pos;
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn with_width(&self, width: usize) -> Self {
        Self {
            width: width.max(1),
            ..self.clone()
        }
    }

    pub fn format(&self, value: &str) -> String {
        if char_len(value) > self.width {
            let mut buf = [0u8; 4];
            let ellipsis = self.ellipsis.encode_utf8(&mut buf);
            text::elide_unchecked(value, self.width, ellipsis, self.elide_pos)
        } else {
            let pos = if self.pad_left { 0.0 } else { 1.0 };
            text::pad(value, self.width, self.pad, pos)
        }
    }
}

/// Renders booleans as one of two labels.
#[derive(Clone, Debug, PartialEq)]
pub struct BoolFormatter {
    text: TextFormatter,
    true_label: String,
    false_label: String,
}

impl BoolFormatter {
    pub fn new() -> Self {
        Self {
            text: TextFormatter {
                width: 5,
                ellipsis: ELLIPSIS,
                pad: ' ',
                elide_pos: 1.0,
                pad_left: false,
            },
            true_label: "True".to_string(),
            false_label: "False".to_string(),
        }
    }

    /// Custom labels; the width becomes the longer label's length.
    pub fn with_labels(
        true_label: impl Into<String>,
        false_label: impl Into<String>,
    ) -> Result<Self, FormatError> {
        let true_label = true_label.into();
        let false_label = false_label.into();
        let width = char_len(&true_label).max(char_len(&false_label));
        Ok(Self {
            text: TextFormatter::new(width)?,
            true_label,
            false_label,
        })
    }

    /// Keeps the alignment set so far.
    pub fn with_width(mut self, width: usize) -> Result<Self, FormatError> {
        if width < 1 {
            return Err(FormatError::InvalidConfig(
                "bool width smaller than the ellipsis".to_string(),
            ));
        }
        self.text = self.text.with_width(width);
        Ok(self)
    }

    pub fn with_pad_left(mut self, pad_left: bool) -> Self {
        self.text = self.text.with_pad_left(pad_left);
        self
    }

    pub fn width(&self) -> usize {
        self.text.width()
    }

    pub fn format(&self, value: bool) -> String {
        self.text.format(if value {
            &self.true_label
        } else {
            &self.false_label
        })
    }
}

impl Default for BoolFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed-width integer and floating-point formatting.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFormatter {
    /// Integral digits.
    size: usize,
    /// Fractional digits; `Some(0)` shows the point with no digits after.
    precision: Option<usize>,
    sign: SignMode,
    pad: char,
    point: char,
    nan: String,
    inf: String,
    bad: char,
    scale: Option<Scale>,
    rounding: Rounding,
}

impl NumberFormatter {
    pub fn new(size: usize, precision: Option<usize>) -> Result<Self, FormatError> {
        if size < 1 {
            return Err(FormatError::InvalidConfig(
                "number needs at least one integral digit".to_string(),
            ));
        }
        Ok(Self {
            size,
            precision,
            sign: SignMode::NegativeSpace,
            pad: ' ',
            point: '.',
            nan: "NaN".to_string(),
            inf: "inf".to_string(),
            bad: OVERFLOW,
            scale: None,
            rounding: Rounding::HalfEven,
        })
    }

    pub fn with_sign(mut self, sign: SignMode) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_pad(mut self, pad: char) -> Self {
        self.pad = pad;
        self
    }

    pub fn with_point(mut self, point: char) -> Self {
        self.point = point;
        self
    }

    pub fn with_nan(mut self, label: impl Into<String>) -> Self {
        self.nan = label.into();
        self
    }

    pub fn with_inf(mut self, label: impl Into<String>) -> Self {
        self.inf = label.into();
        self
    }

    pub fn with_overflow(mut self, bad: char) -> Self {
        self.bad = bad;
        self
    }

    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Basis-point scaling drops the fractional part.
    pub fn with_scale(mut self, scale: Scale) -> Self {
        if scale.is_integer_only() {
            self.precision = None;
        }
        self.scale = Some(scale);
        self
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn precision(&self) -> Option<usize> {
        self.precision
    }

    pub fn sign(&self) -> SignMode {
        self.sign
    }

    pub fn scale(&self) -> Option<&Scale> {
        self.scale.as_ref()
    }

    pub fn width(&self) -> usize {
        let sign = if self.sign == SignMode::None { 0 } else { 1 };
        let fraction = self.precision.map_or(0, |p| p + 1);
        let suffix = self.scale.as_ref().map_or(0, |s| char_len(&s.suffix));
        sign + self.size + fraction + suffix
    }

    fn overflow(&self) -> String {
        std::iter::repeat(self.bad).take(self.width()).collect()
    }

    fn label(&self, label: &str, width: usize) -> String {
        TextFormatter::new(width.max(1))
            .map(|t| t.format(label))
            .unwrap_or_default()
    }

    pub fn format(&self, value: f64) -> String {
        let width = self.width();
        if value.is_nan() {
            return self.label(&self.nan, width);
        }

        // Adding zero turns -0.0 into 0.0.
        let value = value + 0.0;
        let negative = value < 0.0;

        if value.is_infinite() {
            let sign = match (self.sign, negative) {
                (SignMode::None, true) => return self.overflow(),
                (SignMode::None, false) => "",
                (_, true) => "-",
                (SignMode::NegativeSpace, false) => " ",
                (SignMode::Always, false) => "+",
            };
            return format!("{}{}", sign, self.label(&self.inf, width - sign.len()));
        }

        let scaled = match &self.scale {
            Some(scale) => value * scale.factor,
            None => value,
        };
        if !scaled.is_finite() {
            return self.overflow();
        }

        let (int_digits, frac_digits) =
            round_decimal(scaled.abs(), self.precision.unwrap_or(0), self.rounding);
        self.assemble(negative, &int_digits, &frac_digits)
    }

    /// Integers are formatted from their exact digits, without going
    /// through `f64` unless scaled.
    pub fn format_int(&self, value: i64) -> String {
        if self.scale.is_some() {
            return self.format(value as f64);
        }
        let int_digits = value.unsigned_abs().to_string();
        let frac_digits = "0".repeat(self.precision.unwrap_or(0));
        self.assemble(value < 0, &int_digits, &frac_digits)
    }

    fn assemble(&self, negative: bool, int_digits: &str, frac_digits: &str) -> String {
        if int_digits.len() > self.size {
            return self.overflow();
        }
        let sign = match (self.sign, negative) {
            (SignMode::None, true) => return self.overflow(),
            (SignMode::None, false) => None,
            (_, true) => Some('-'),
            (SignMode::NegativeSpace, false) => Some(' '),
            (SignMode::Always, false) => Some('+'),
        };

        let fill = self.size - int_digits.len();
        let mut out = String::with_capacity(self.width() + 4);
        if self.pad == ' ' {
            out.extend(std::iter::repeat(' ').take(fill));
            out.extend(sign);
        } else {
            out.extend(sign);
            out.extend(std::iter::repeat(self.pad).take(fill));
        }
        out.push_str(int_digits);
        if self.precision.is_some() {
            out.push(self.point);
            out.push_str(frac_digits);
        }
        if let Some(scale) = &self.scale {
            out.push_str(&scale.suffix);
        }
        debug_assert_eq!(char_len(&out), self.width());
        out
    }
}

/// Rounds a finite, non-negative value to `precision` fractional digits.
///
/// Works on the exact decimal expansion of the binary value, so ties are
/// only ties when the stored value really is halfway. Returns the integral
/// and fractional digit strings.
pub(crate) fn round_decimal(value: f64, precision: usize, rounding: Rounding) -> (String, String) {
    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let frac = frac_part.as_bytes();

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain((0..precision).map(|i| frac.get(i).copied().unwrap_or(b'0')))
        .map(|b| b - b'0')
        .collect();

    let next = frac.get(precision).map_or(0, |b| b - b'0');
    let rest_nonzero = frac.iter().skip(precision + 1).any(|&b| b != b'0');
    let round_up = match rounding {
        Rounding::HalfAwayFromZero => next >= 5,
        Rounding::HalfEven => {
            next > 5
                || (next == 5 && rest_nonzero)
                || (next == 5 && digits.last().is_some_and(|d| d % 2 == 1))
        }
    };

    let mut int_len = int_part.len();
    if round_up {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            int_len += 1;
        }
    }

    let to_string = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    (to_string(&digits[..int_len]), to_string(&digits[int_len..]))
}

/// Interactive formatter changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Adjustment {
    Widen,
    Narrow,
    MorePrecision,
    LessPrecision,
}

/// A column's formatter.
#[derive(Clone, Debug, PartialEq)]
pub enum Formatter {
    Text(TextFormatter),
    Bool(BoolFormatter),
    Number(NumberFormatter),
}

impl Formatter {
    pub fn width(&self) -> usize {
        match self {
            Formatter::Text(f) => f.width(),
            Formatter::Bool(f) => f.width(),
            Formatter::Number(f) => f.width(),
        }
    }

    /// Formats `value` to exactly `width()` characters. A value of a type
    /// the formatter does not handle is shown as its text form.
    pub fn format(&self, value: &Value) -> String {
        match (self, value) {
            (Formatter::Number(f), Value::Int(v)) => f.format_int(*v),
            (Formatter::Number(f), Value::Float(v)) => f.format(*v),
            (Formatter::Bool(f), Value::Bool(v)) => f.format(*v),
            (Formatter::Text(f), Value::Str(v)) => f.format(v),
            (Formatter::Text(f), value) => f.format(&value.to_string()),
            (formatter, value) => TextFormatter::new(formatter.width())
                .map(|t| t.format(&value.to_string()))
                .unwrap_or_default(),
        }
    }

    /// Returns the formatter with one step of `adjustment` applied.
    /// Steps that do not apply leave it unchanged.
    pub fn adjusted(&self, adjustment: Adjustment) -> Formatter {
        match (self, adjustment) {
            (Formatter::Number(f), Adjustment::Widen) => Formatter::Number(NumberFormatter {
                size: f.size + 1,
                ..f.clone()
            }),
            (Formatter::Number(f), Adjustment::Narrow) => Formatter::Number(NumberFormatter {
                size: f.size.saturating_sub(1).max(1),
                ..f.clone()
            }),
            (Formatter::Number(f), Adjustment::MorePrecision) => {
                if f.scale.as_ref().is_some_and(Scale::is_integer_only) {
                    return self.clone();
                }
                let precision = match f.precision {
                    None => Some(0),
                    Some(p) => Some((p + 1).min(MAX_PRECISION)),
                };
                Formatter::Number(NumberFormatter {
                    precision,
                    ..f.clone()
                })
            }
            (Formatter::Number(f), Adjustment::LessPrecision) => {
                let precision = match f.precision {
                    None | Some(0) => None,
                    Some(p) => Some(p - 1),
                };
                Formatter::Number(NumberFormatter {
                    precision,
                    ..f.clone()
                })
            }
            (Formatter::Text(f), Adjustment::Widen) => Formatter::Text(f.with_width(f.width + 1)),
            (Formatter::Text(f), Adjustment::Narrow) => {
                Formatter::Text(f.with_width(f.width.saturating_sub(1)))
            }
            (Formatter::Bool(f), Adjustment::Widen) => Formatter::Bool(BoolFormatter {
                text: f.text.with_width(f.width() + 1),
                ..f.clone()
            }),
            (Formatter::Bool(f), Adjustment::Narrow) => Formatter::Bool(BoolFormatter {
                text: f.text.with_width(f.width().saturating_sub(1)),
                ..f.clone()
            }),
            (_, Adjustment::MorePrecision | Adjustment::LessPrecision) => self.clone(),
        }
    }
}

/// Picks a formatter for a column from its type and values.
pub fn choose_formatter(values: &Values) -> Formatter {
    match values {
        Values::Int(v) => {
            let digits = v
                .iter()
                .map(|x| x.unsigned_abs().to_string().len())
                .max()
                .unwrap_or(1);
            let sign = if v.iter().any(|x| *x < 0) {
                SignMode::NegativeSpace
            } else {
                SignMode::None
            };
            number(digits, None, sign)
        }
        Values::Float(v) => {
            let finite = || v.iter().copied().filter(|x| x.is_finite());
            let precision = finite().map(shortest_precision).max().unwrap_or(0);
            let max_abs = finite().map(f64::abs).fold(0.0, f64::max);
            let (int_digits, _) = round_decimal(max_abs, precision, Rounding::HalfEven);
            let sign = if v.iter().any(|x| *x < 0.0) {
                SignMode::NegativeSpace
            } else {
                SignMode::None
            };
            number(int_digits.len(), Some(precision), sign)
        }
        Values::Bool(_) => Formatter::Bool(BoolFormatter::new()),
        Values::Str(v) => {
            let width = v
                .iter()
                .map(char_len)
                .max()
                .unwrap_or(1)
                .clamp(1, MAX_AUTO_TEXT_WIDTH);
            Formatter::Text(TextFormatter {
                width,
                ellipsis: ELLIPSIS,
                pad: ' ',
                elide_pos: 1.0,
                pad_left: false,
            })
        }
    }
}

fn number(size: usize, precision: Option<usize>, sign: SignMode) -> Formatter {
    Formatter::Number(NumberFormatter {
        size: size.max(1),
        precision,
        sign,
        pad: ' ',
        point: '.',
        nan: "NaN".to_string(),
        inf: "inf".to_string(),
        bad: OVERFLOW,
        scale: None,
        rounding: Rounding::HalfEven,
    })
}

/// Fractional digits in the shortest round-trip form of `x`, capped.
fn shortest_precision(x: f64) -> usize {
    let repr = x.abs().to_string();
    repr.split_once('.')
        .map_or(0, |(_, frac)| frac.len())
        .min(MAX_AUTO_PRECISION)
}

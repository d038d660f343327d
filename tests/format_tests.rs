//! Integration tests for fixed-width formatting.
//!
//! Every formatter must produce exactly `width()` characters for any input,
//! and automatic formatter selection must fit the values it was chosen for.

use proptest::prelude::*;
use tblview::fixfmt::{
    choose_formatter, Adjustment, BoolFormatter, Formatter, NumberFormatter, Rounding, Scale,
    SignMode, TextFormatter,
};
use tblview::model::{Value, Values};

fn sign_mode() -> impl Strategy<Value = SignMode> {
    prop_oneof![
        Just(SignMode::NegativeSpace),
        Just(SignMode::Always),
        Just(SignMode::None),
    ]
}

proptest! {
    #[test]
    fn number_output_has_formatter_width(
        size in 1usize..10,
        precision in proptest::option::of(0usize..8),
        sign in sign_mode(),
        value in -1e12f64..1e12,
    ) {
        let fmt = NumberFormatter::new(size, precision).unwrap().with_sign(sign);
        prop_assert_eq!(fmt.format(value).chars().count(), fmt.width());
    }

    #[test]
    fn integer_output_has_formatter_width(
        size in 1usize..12,
        sign in sign_mode(),
        value in any::<i64>(),
    ) {
        let fmt = NumberFormatter::new(size, None).unwrap().with_sign(sign);
        prop_assert_eq!(fmt.format_int(value).chars().count(), fmt.width());
    }

    #[test]
    fn special_values_have_formatter_width(
        size in 1usize..6,
        precision in proptest::option::of(0usize..4),
        sign in sign_mode(),
    ) {
        let fmt = NumberFormatter::new(size, precision).unwrap().with_sign(sign);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            prop_assert_eq!(fmt.format(value).chars().count(), fmt.width());
        }
    }

    #[test]
    fn text_output_has_formatter_width(width in 1usize..40, value in "\\PC{0,60}") {
        let fmt = TextFormatter::new(width).unwrap();
        prop_assert_eq!(fmt.format(&value).chars().count(), width);
    }

    #[test]
    fn chosen_int_formatter_never_overflows(values in proptest::collection::vec(-1_000_000i64..1_000_000, 1..50)) {
        let fmt = choose_formatter(&Values::Int(values.clone()));
        for v in values {
            prop_assert!(!fmt.format(&Value::Int(v)).contains('#'), "{} overflowed", v);
        }
    }
}

#[test]
fn test_choose_float_formatter() {
    let fmt = choose_formatter(&Values::Float(vec![1.5, -22.25, f64::NAN]));
    assert_eq!(fmt.width(), 6);
    assert_eq!(fmt.format(&Value::Float(1.5)), "  1.50");
    assert_eq!(fmt.format(&Value::Float(-22.25)), "-22.25");
    assert_eq!(fmt.format(&Value::Float(f64::NAN)), "NaN   ");
}

#[test]
fn test_choose_text_and_bool_formatters() {
    let fmt = choose_formatter(&Values::strings(["a", "abcd", "ab"]));
    assert_eq!(fmt.width(), 4);
    assert_eq!(fmt.format(&Value::Str("ab".into())), "ab  ");

    let fmt = choose_formatter(&Values::Bool(vec![true, false]));
    assert_eq!(fmt, Formatter::Bool(BoolFormatter::new()));
    assert_eq!(fmt.format(&Value::Bool(true)), "True ");
}

#[test]
fn test_half_even_and_half_away() {
    let even = NumberFormatter::new(1, Some(2)).unwrap();
    let away = even.clone().with_rounding(Rounding::HalfAwayFromZero);
    assert_eq!(even.format(0.125), " 0.12");
    assert_eq!(away.format(0.125), " 0.13");
    // 0.135 is slightly above the tie in binary, so both round up.
    assert_eq!(even.format(0.135), " 0.14");
    assert_eq!(away.format(0.135), " 0.14");
}

#[test]
fn test_percent_column() {
    let fmt = NumberFormatter::new(3, Some(2))
        .unwrap()
        .with_scale(Scale::percent());
    assert_eq!(fmt.width(), 8);
    assert_eq!(fmt.format(0.1234), "  12.34%");
    assert_eq!(fmt.format(-0.5), " -50.00%");
}

#[test]
fn test_widen_then_precision() {
    let fmt = choose_formatter(&Values::Int(vec![5, 42]));
    let wider = fmt.adjusted(Adjustment::Widen);
    assert_eq!(wider.width(), fmt.width() + 1);
    assert_eq!(wider.format(&Value::Int(42)), " 42");
    let precise = wider.adjusted(Adjustment::MorePrecision);
    assert_eq!(precise.format(&Value::Int(42)), " 42.");
}

#[test]
fn test_text_formatter_applies_to_every_value_type() {
    let fmt = Formatter::Text(
        TextFormatter::new(6)
            .unwrap()
            .with_pad_left(true)
            .with_pad('.'),
    );
    assert_eq!(fmt.format(&Value::Str("42".into())), "....42");
    assert_eq!(fmt.format(&Value::Int(42)), "....42");
    assert_eq!(fmt.format(&Value::Float(1.5)), "...1.5");
    assert_eq!(fmt.format(&Value::Bool(true)), "..True");

    let elided = Formatter::Text(TextFormatter::new(4).unwrap().with_ellipsis('~'));
    assert_eq!(elided.format(&Value::Int(123456)), "123~");
}

#[test]
fn test_bool_width_keeps_alignment() {
    let width_last = BoolFormatter::new()
        .with_pad_left(true)
        .with_width(7)
        .unwrap();
    let width_first = BoolFormatter::new().with_width(7).unwrap().with_pad_left(true);
    assert_eq!(width_last.format(true), "   True");
    assert_eq!(width_first.format(true), "   True");
    assert_eq!(width_last, width_first);
    assert!(BoolFormatter::new().with_width(0).is_err());
}

#[test]
fn test_custom_decimal_point() {
    let fmt = NumberFormatter::new(2, Some(2)).unwrap().with_point(',');
    assert_eq!(fmt.format(1.5), "  1,50");
    assert_eq!(fmt.format(-12.25), "-12,25");
    assert_eq!(fmt.format_int(7), "  7,00");
}

#[test]
fn test_custom_overflow_fills_field() {
    let fmt = NumberFormatter::new(2, Some(2)).unwrap().with_overflow('*');
    assert_eq!(fmt.format(123.0), "******");
    assert_eq!(fmt.format_int(-1000), "******");

    let unsigned = NumberFormatter::new(3, None)
        .unwrap()
        .with_sign(SignMode::None)
        .with_overflow('!');
    assert_eq!(unsigned.format(-1.0), "!!!");
    assert_eq!(unsigned.format(f64::NEG_INFINITY), "!!!");
}

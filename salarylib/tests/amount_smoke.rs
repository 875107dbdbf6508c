use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salarylib::{
    amount::{normalize, normalize_and_parse, parse_lenient, parse_strict, sum},
    error::ValidationError,
    model::MonetaryAmount,
};

#[test]
fn comma_and_period_parse_to_same_amount() {
    for (comma, period) in [("12,5", "12.5"), ("1000,00", "1000.00"), (",75", ".75"), (" 3,10 ", "3.10")] {
        let a = normalize_and_parse(comma).expect("comma form");
        let b = normalize_and_parse(period).expect("period form");
        assert_eq!(a, b, "{comma} vs {period}");
    }
    assert_eq!(normalize_and_parse(".75").unwrap().value(), dec!(0.75));
}

#[test]
fn normalize_replaces_commas_then_trims() {
    assert_eq!(normalize("  1500,50 "), "1500.50");
    assert_eq!(normalize("100"), "100");
}

#[test]
fn rejections_carry_specific_reason() {
    assert_eq!(normalize_and_parse(""), Err(ValidationError::EmptyField("amount")));
    assert_eq!(normalize_and_parse("   "), Err(ValidationError::EmptyField("amount")));
    assert_eq!(normalize_and_parse("-5"), Err(ValidationError::NegativeAmount));
    assert_eq!(normalize_and_parse(" -5,00"), Err(ValidationError::NegativeAmount));
    assert!(matches!(normalize_and_parse("abc"), Err(ValidationError::InvalidFormat(_))));
    assert!(matches!(normalize_and_parse("1e5"), Err(ValidationError::InvalidFormat(_))));
    assert!(matches!(normalize_and_parse("1 000"), Err(ValidationError::InvalidFormat(_))));
    assert!(matches!(normalize_and_parse("1.000,50"), Err(ValidationError::InvalidFormat(_))));
    assert!(matches!(normalize_and_parse("5."), Err(ValidationError::InvalidFormat(_))));
    assert!(matches!(normalize_and_parse("+5"), Err(ValidationError::InvalidFormat(_))));
}

#[test]
fn strict_parse_enforces_range_and_precision() {
    assert_eq!(parse_strict("12.345"), Err(ValidationError::PrecisionExceeded));
    assert_eq!(parse_strict("1000001"), Err(ValidationError::OutOfRange));
    assert_eq!(parse_strict("1000000.01"), Err(ValidationError::OutOfRange));
    assert_eq!(parse_strict("0"), Err(ValidationError::OutOfRange));
    assert_eq!(parse_strict("0,00"), Err(ValidationError::OutOfRange));
    assert_eq!(parse_strict("1000000").unwrap().value(), dec!(1000000));
    assert_eq!(parse_strict("0,01").unwrap().value(), dec!(0.01));
}

#[test]
fn lenient_parse_skips_range_checks_and_zeroes_failures() {
    assert_eq!(parse_lenient("12.345").value(), dec!(12.345));
    assert_eq!(parse_lenient("5000000").value(), dec!(5000000));
    assert_eq!(parse_lenient("-5"), MonetaryAmount::ZERO);
    assert_eq!(parse_lenient("bad"), MonetaryAmount::ZERO);
    assert_eq!(parse_lenient(""), MonetaryAmount::ZERO);
}

#[test]
fn sum_counts_bad_and_empty_as_zero() {
    let total = sum(["100,00", "50.5", "bad", ""]);
    assert_eq!(total.value(), Decimal::from_str_exact("150.50").unwrap());
    assert_eq!(total.to_string(), "150.50");
}

#[test]
fn sum_is_exact_and_order_independent() {
    let forward = sum(["0.1", "0.2", "0,3"]);
    let backward = sum(["0,3", "0.2", "0.1"]);
    assert_eq!(forward, backward);
    assert_eq!(forward.to_string(), "0.60");
    assert_eq!(sum(Vec::<String>::new()).to_string(), "0.00");
}

#[test]
fn fixed_rendering_uses_two_digits() {
    assert_eq!(MonetaryAmount::new(dec!(1000)).to_fixed(), "1000.00");
    assert_eq!(MonetaryAmount::new(dec!(1234.5)).to_fixed(), "1234.50");
    assert_eq!(MonetaryAmount::new(dec!(0.005)).to_fixed(), "0.01");
    assert_eq!(MonetaryAmount::new(dec!(12.345)).to_fixed(), "12.35");
}

#[test]
fn sum_overflow_counts_the_overflowing_amount_as_zero() {
    let max = "79228162514264337593543950335";
    let total = sum([max, "1", "2,50"]);
    assert_eq!(total.value(), Decimal::MAX);

    let small_first = sum(["1", max]);
    assert_eq!(small_first.value(), dec!(1));
}

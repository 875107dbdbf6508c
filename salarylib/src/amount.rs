//! Разбор денежных строк со смешанными разделителями и их суммирование.
//!
//! Два режима: строгий (форма ввода, каждая ошибка возвращается с причиной) и
//! мягкий (пересчёт документов, непарсящаяся сумма считается нулём).

use crate::{error::ValidationError, model::MonetaryAmount};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// Неотрицательное десятичное число без экспоненты и разделителей разрядов.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]+$").expect("amount pattern is valid"));

const MAX_FRACTION_DIGITS: u32 = 2;

fn max_amount() -> Decimal {
    Decimal::new(1_000_000, 0)
}

/// Запятая → точка, затем обрезка пробелов. Вызывается ровно один раз на значение.
pub fn normalize(raw: &str) -> String {
    raw.replace(',', ".").trim().to_string()
}

/// Разбор без ограничений диапазона и точности.
pub fn normalize_and_parse(raw: &str) -> Result<MonetaryAmount, ValidationError> {
    if raw.trim().is_empty() {
        return Err(ValidationError::EmptyField("amount"));
    }
    // минус проверяется до нормализации, чтобы дать отдельную причину
    if raw.trim_start().starts_with('-') {
        return Err(ValidationError::NegativeAmount);
    }

    let normalized = normalize(raw);
    if !AMOUNT_RE.is_match(&normalized) {
        return Err(ValidationError::InvalidFormat(normalized));
    }

    let digits = if normalized.starts_with('.') {
        format!("0{normalized}")
    } else {
        normalized
    };
    Decimal::from_str_exact(&digits)
        .map(MonetaryAmount::new)
        .map_err(|e| ValidationError::InvalidFormat(format!("{digits}: {e}")))
}

/// Строгий разбор для формы ввода: `(0, 1_000_000]`, не более двух знаков после точки.
pub fn parse_strict(raw: &str) -> Result<MonetaryAmount, ValidationError> {
    let amount = normalize_and_parse(raw)?;
    let value = amount.value();

    if value <= Decimal::ZERO || value > max_amount() {
        return Err(ValidationError::OutOfRange);
    }
    if value.scale() > MAX_FRACTION_DIGITS {
        return Err(ValidationError::PrecisionExceeded);
    }
    Ok(amount)
}

/// Мягкий разбор для пересчёта: любая ошибка даёт ноль.
pub fn parse_lenient(raw: &str) -> MonetaryAmount {
    if raw.trim().is_empty() {
        return MonetaryAmount::ZERO;
    }
    match normalize_and_parse(raw) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(value = raw, error = %e, "unparseable amount counted as 0");
            MonetaryAmount::ZERO
        }
    }
}

/// Точная сумма; порядок элементов на результат не влияет.
pub fn sum<I, S>(amounts: I) -> MonetaryAmount
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    amounts
        .into_iter()
        .map(|s| parse_lenient(s.as_ref()))
        .sum()
}

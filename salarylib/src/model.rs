//! Доменные модели: месяцы, денежные суммы, запись сотрудника и строка таблицы.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Закрытый набор месяцев, по которым ведётся зарплата.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    January,
    February,
    March,
}

impl Month {
    pub const ALL: [Month; 3] = [Month::January, Month::February, Month::March];

    /// Метка в документах (`mount="january"`) и ключ в карте полей формы.
    pub fn label(self) -> &'static str {
        match self {
            Month::January => "january",
            Month::February => "february",
            Month::March => "march",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
        }
    }

    /// Разбор метки без учёта регистра; чужие метки дают `None`.
    pub fn from_label(s: &str) -> Option<Month> {
        let s = s.trim();
        Month::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Точная денежная сумма; наружу всегда выводится с двумя знаками после точки.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonetaryAmount(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl MonetaryAmount {
    pub const ZERO: MonetaryAmount = MonetaryAmount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        MonetaryAmount(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// `None`, если сумма не помещается в `Decimal`.
    pub fn checked_add(self, rhs: MonetaryAmount) -> Option<MonetaryAmount> {
        self.0.checked_add(rhs.0).map(MonetaryAmount)
    }

    /// Строка вида `1234.50`.
    pub fn to_fixed(&self) -> String {
        let mut v = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        v.rescale(2);
        v.to_string()
    }
}

impl From<Decimal> for MonetaryAmount {
    fn from(value: Decimal) -> Self {
        MonetaryAmount(value)
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fixed())
    }
}

impl Add for MonetaryAmount {
    type Output = MonetaryAmount;

    fn add(self, rhs: MonetaryAmount) -> MonetaryAmount {
        MonetaryAmount(self.0 + rhs.0)
    }
}

/// Слагаемое, переполняющее сумму, считается нулём.
impl Sum for MonetaryAmount {
    fn sum<I: Iterator<Item = MonetaryAmount>>(iter: I) -> Self {
        iter.fold(MonetaryAmount::ZERO, |acc, a| {
            acc.checked_add(a).unwrap_or_else(|| {
                tracing::warn!(total = %acc.0, amount = %a.0, "sum overflow, amount counted as 0");
                acc
            })
        })
    }
}

/// Сотрудник, принятый формой ввода. Суммы уже нормализованы (запятая → точка),
/// но не переформатированы.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub name: String,
    pub surname: String,
    pub salaries: BTreeMap<Month, String>,
}

impl EmployeeRecord {
    /// Карта полей в том виде, в каком её получает код добавления в файл.
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), self.name.clone());
        map.insert("surname".to_string(), self.surname.clone());
        for (month, amount) in &self.salaries {
            map.insert(month.label().to_string(), amount.clone());
        }
        map
    }

    pub fn total(&self) -> MonetaryAmount {
        crate::amount::sum(self.salaries.values())
    }
}

/// Строка итоговой таблицы.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub name: String,
    pub surname: String,
    pub january: Option<String>,
    pub february: Option<String>,
    pub march: Option<String>,
    pub total_salary: Option<String>,
}

impl EmployeeRow {
    pub fn month(&self, month: Month) -> Option<&str> {
        match month {
            Month::January => self.january.as_deref(),
            Month::February => self.february.as_deref(),
            Month::March => self.march.as_deref(),
        }
    }

    pub(crate) fn set_month(&mut self, month: Month, amount: Option<String>) {
        match month {
            Month::January => self.january = amount,
            Month::February => self.february = amount,
            Month::March => self.march = amount,
        }
    }
}

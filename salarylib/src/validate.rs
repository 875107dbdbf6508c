//! Проверка формы добавления сотрудника.
//!
//! `validate` — чистая функция от значений полей. `EntryValidator` хранит
//! последний отчёт для одного открытого диалога и по нему решает, можно ли
//! отправлять форму.

use crate::{
    amount,
    error::ValidationError,
    model::{EmployeeRecord, MonetaryAmount, Month},
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Буквы любого алфавита, дефис и апостроф; допускается несколько слов.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\-']+(\s+[\p{L}\-']+)*$").expect("name pattern is valid")
});

/// Сырые значения полей в том виде, в каком их ввёл оператор.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValues {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub january: String,
    #[serde(default)]
    pub february: String,
    #[serde(default)]
    pub march: String,
}

impl FieldValues {
    /// Сборка из карты `name`/`surname`/`january`/...; прочие ключи игнорируются.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = FieldValues::default();
        for (key, value) in pairs {
            let key = key.as_ref();
            if key.eq_ignore_ascii_case("name") {
                values.name = value.into();
            } else if key.eq_ignore_ascii_case("surname") {
                values.surname = value.into();
            } else if let Some(month) = Month::from_label(key) {
                values.set_salary(month, value);
            }
        }
        values
    }

    pub fn salary(&self, month: Month) -> &str {
        match month {
            Month::January => &self.january,
            Month::February => &self.february,
            Month::March => &self.march,
        }
    }

    pub fn set_salary(&mut self, month: Month, value: impl Into<String>) {
        let value = value.into();
        match month {
            Month::January => self.january = value,
            Month::February => self.february = value,
            Month::March => self.march = value,
        }
    }
}

/// Состояние одного поля. `Empty` бывает только у полей зарплаты.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum FieldState {
    Valid,
    Empty,
    Invalid(ValidationError),
}

impl FieldState {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldState::Invalid(_))
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            FieldState::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub name: FieldState,
    pub surname: FieldState,
    pub salaries: BTreeMap<Month, FieldState>,
    /// Ошибка уровня формы (ни одного месяца не заполнено).
    pub form_error: Option<ValidationError>,
    /// Сумма корректно заполненных месяцев, считается всегда.
    pub total: MonetaryAmount,
    pub submittable: bool,
}

static EMPTY: FieldState = FieldState::Empty;

impl ValidationReport {
    pub fn salary(&self, month: Month) -> &FieldState {
        self.salaries.get(&month).unwrap_or(&EMPTY)
    }

    /// Сообщения для показа рядом с полями: (поле, ошибка).
    pub fn errors(&self) -> Vec<(&'static str, &ValidationError)> {
        let mut out = Vec::new();
        if let Some(e) = self.name.error() {
            out.push(("name", e));
        }
        if let Some(e) = self.surname.error() {
            out.push(("surname", e));
        }
        for month in Month::ALL {
            if let Some(e) = self.salary(month).error() {
                out.push((month.label(), e));
            }
        }
        if let Some(e) = &self.form_error {
            out.push(("form", e));
        }
        out
    }
}

fn check_name(field: &'static str, raw: &str) -> FieldState {
    let value = raw.trim();
    if value.is_empty() {
        FieldState::Invalid(ValidationError::EmptyField(field))
    } else if !NAME_RE.is_match(value) {
        FieldState::Invalid(ValidationError::InvalidFormat(format!(
            "{field} may contain only letters, hyphens and apostrophes"
        )))
    } else {
        FieldState::Valid
    }
}

/// Полная проверка формы. Повторный вызов с теми же значениями даёт тот же отчёт.
pub fn validate(form: &FieldValues) -> ValidationReport {
    let name = check_name("name", &form.name);
    let surname = check_name("surname", &form.surname);

    let mut salaries = BTreeMap::new();
    let mut total = MonetaryAmount::ZERO;
    let mut any_salary = false;

    for month in Month::ALL {
        let raw = form.salary(month);
        let state = if raw.trim().is_empty() {
            FieldState::Empty
        } else {
            any_salary = true;
            match amount::parse_strict(raw) {
                Ok(a) => {
                    total = total + a;
                    FieldState::Valid
                }
                Err(e) => FieldState::Invalid(e),
            }
        };
        salaries.insert(month, state);
    }

    let form_error = (!any_salary).then_some(ValidationError::NoSalaryProvided);
    let submittable = name == FieldState::Valid
        && surname == FieldState::Valid
        && !salaries.values().any(FieldState::is_invalid)
        && any_salary;

    ValidationReport {
        name,
        surname,
        salaries,
        form_error,
        total,
        submittable,
    }
}

/// Валидатор одного диалога ввода. Экземпляры не разделяют состояние.
#[derive(Debug, Default)]
pub struct EntryValidator {
    last: Option<(FieldValues, ValidationReport)>,
}

impl EntryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Вызывается на каждое изменение поля.
    pub fn revalidate(&mut self, form: &FieldValues) -> &ValidationReport {
        let report = validate(form);
        &self.last.insert((form.clone(), report)).1
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        self.last.as_ref().map(|(_, r)| r)
    }

    pub fn is_submittable(&self) -> bool {
        self.report().is_some_and(|r| r.submittable)
    }

    /// Отправка формы. Доверяет последнему отчёту для тех же значений; для
    /// других значений проверка выполняется без сохранения отчёта.
    pub fn submit(&mut self, form: &FieldValues) -> Result<EmployeeRecord, ValidationError> {
        // устаревший отчёт не перезаписывается: отказ не меняет состояние
        let submittable = match &self.last {
            Some((values, report)) if values == form => report.submittable,
            _ => validate(form).submittable,
        };
        if !submittable {
            return Err(ValidationError::SubmitBlocked);
        }

        let salaries: BTreeMap<Month, String> = Month::ALL
            .into_iter()
            .filter(|m| !form.salary(*m).trim().is_empty())
            .map(|m| (m, amount::normalize(form.salary(m))))
            .collect();

        if salaries.is_empty() {
            return Err(ValidationError::NoSalaryProvided);
        }

        let record = EmployeeRecord {
            name: form.name.trim().to_string(),
            surname: form.surname.trim().to_string(),
            salaries,
        };
        tracing::debug!(
            name = %record.name,
            surname = %record.surname,
            months = record.salaries.len(),
            "employee form submitted"
        );
        Ok(record)
    }
}

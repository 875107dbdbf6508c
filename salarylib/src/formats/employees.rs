//! Документ `Employees` — результат преобразования исходного файла:
//! `<Employees><Employee name surname totalSalary><salary mount amount/>...</Employee></Employees>`

use crate::{
    error::{xml, Result},
    model::{EmployeeRow, MonetaryAmount, Month},
};
use quick_xml::{de::from_str, se::to_string};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename = "Employees")]
pub struct EmployeesDocument {
    #[serde(rename = "Employee", default)]
    pub employees: Vec<XmlEmployee>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct XmlEmployee {
    #[serde(rename = "@name", default)]
    pub name: String,
    #[serde(rename = "@surname", default)]
    pub surname: String,
    #[serde(rename = "@totalSalary", default, skip_serializing_if = "Option::is_none")]
    pub total_salary: Option<String>,
    #[serde(rename = "salary", default)]
    pub salaries: Vec<XmlSalary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct XmlSalary {
    #[serde(rename = "@mount", default, skip_serializing_if = "Option::is_none")]
    pub mount: Option<String>,
    #[serde(rename = "@amount", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

impl XmlEmployee {
    pub fn total(&self) -> MonetaryAmount {
        crate::amount::sum(self.salaries.iter().map(|s| s.amount.as_deref().unwrap_or("")))
    }
}

impl EmployeesDocument {
    pub fn parse(s: &str) -> Result<Self> {
        from_str(s).map_err(xml)
    }

    pub fn to_xml_string(&self) -> Result<String> {
        to_string(self).map_err(xml)
    }

    /// Проставляет `totalSalary` каждому сотруднику; старое значение не учитывается.
    pub fn stamp_totals(&mut self) {
        for e in &mut self.employees {
            e.total_salary = Some(e.total().to_fixed());
        }
    }

    pub fn document_total(&self) -> MonetaryAmount {
        self.employees.iter().map(XmlEmployee::total).sum()
    }

    /// Строки таблицы. Если у сотрудника несколько записей за месяц,
    /// в ячейку попадает последняя.
    pub fn rows(&self) -> Vec<EmployeeRow> {
        self.employees
            .iter()
            .map(|e| {
                let mut row = EmployeeRow {
                    name: e.name.clone(),
                    surname: e.surname.clone(),
                    total_salary: e.total_salary.clone(),
                    ..EmployeeRow::default()
                };
                for s in &e.salaries {
                    if let Some(month) = s.mount.as_deref().and_then(Month::from_label) {
                        row.set_month(month, s.amount.clone());
                    }
                }
                row
            })
            .collect()
    }
}

//! Встроенная замена XSLT `TransformToEmployees.xslt`: записи `item`
//! группируются по сотруднику (имя + фамилия) в порядке первого появления.

use crate::{
    error::Result,
    formats::{
        employees::{EmployeesDocument, XmlEmployee, XmlSalary},
        source::{Schema, SourceDocument},
    },
    traits::Transform,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeTransform {
    schema: Option<Schema>,
}

impl NativeTransform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Без явной схемы вариант разметки определяется по форме документа.
    pub fn for_schema(schema: Schema) -> Self {
        NativeTransform {
            schema: Some(schema),
        }
    }

    pub fn employees(&self, source: &SourceDocument) -> EmployeesDocument {
        let mut out = EmployeesDocument::default();
        for item in source.items() {
            let pos = out
                .employees
                .iter()
                .position(|e| e.name == item.name && e.surname == item.surname);
            let idx = match pos {
                Some(i) => i,
                None => {
                    out.employees.push(XmlEmployee {
                        name: item.name.clone(),
                        surname: item.surname.clone(),
                        ..XmlEmployee::default()
                    });
                    out.employees.len() - 1
                }
            };
            out.employees[idx].salaries.push(XmlSalary {
                mount: item.mount.clone(),
                amount: Some(item.amount.clone()),
            });
        }
        out
    }
}

impl Transform for NativeTransform {
    fn transform(&self, source_xml: &str) -> Result<String> {
        let source = SourceDocument::parse(source_xml, "", self.schema)?;
        let doc = self.employees(&source);
        tracing::debug!(employees = doc.employees.len(), "source transformed");
        doc.to_xml_string()
    }

    fn set_schema(&mut self, schema: Option<Schema>) {
        self.schema = schema;
    }
}

//! Полный прогон обработки и добавление сотрудника с пересчётом.

use crate::{
    error::Result,
    formats::{
        employees::EmployeesDocument,
        source::{Schema, SourceDocument},
    },
    model::{EmployeeRecord, EmployeeRow, MonetaryAmount, Month},
    traits::{DocumentStore, Transform},
    transform::NativeTransform,
};
use serde::Serialize;
use std::collections::BTreeMap;

pub const EMPLOYEES_FILE: &str = "Employees.xml";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub schema: Schema,
    pub rows: Vec<EmployeeRow>,
    pub month_totals: BTreeMap<Month, MonetaryAmount>,
    pub document_total: MonetaryAmount,
}

pub struct Processor<S, T = NativeTransform> {
    store: S,
    transform: T,
    output: String,
    schema: Option<Schema>,
}

impl<S: DocumentStore> Processor<S, NativeTransform> {
    pub fn new(store: S) -> Self {
        Processor::with_transform(store, NativeTransform::new())
    }
}

impl<S: DocumentStore, T: Transform> Processor<S, T> {
    pub fn with_transform(store: S, transform: T) -> Self {
        Processor {
            store,
            transform,
            output: EMPLOYEES_FILE.to_string(),
            schema: None,
        }
    }

    /// Куда сохранять документ `Employees`.
    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.output = path.into();
        self
    }

    /// Явный вариант разметки исходника вместо определения по имени/форме.
    /// Передаётся и преобразованию.
    pub fn schema(mut self, schema: Option<Schema>) -> Self {
        self.schema = schema;
        self.transform.set_schema(schema);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Преобразование → итоги сотрудников → `Employees.xml` → итоги в исходнике.
    /// Все суммы каждый раз считаются заново.
    pub fn process(&mut self, source: &str) -> Result<ProcessReport> {
        let source_xml = self.store.load(source)?;

        let mut employees = EmployeesDocument::parse(&self.transform.transform(&source_xml)?)?;
        employees.stamp_totals();
        self.store.save(&self.output, &employees.to_xml_string()?)?;

        let mut doc = SourceDocument::parse(&source_xml, source, self.schema)?;
        doc.update_totals();
        self.store.save(source, &doc.to_xml_string()?)?;

        let report = ProcessReport {
            schema: doc.schema,
            rows: employees.rows(),
            month_totals: doc.month_totals().into_iter().collect(),
            document_total: doc.document_total(),
        };
        tracing::info!(
            source,
            output = %self.output,
            employees = report.rows.len(),
            total = %report.document_total,
            "processing finished"
        );
        Ok(report)
    }

    pub fn add_employee(&mut self, source: &str, record: &EmployeeRecord) -> Result<ProcessReport> {
        let mut doc = SourceDocument::parse(&self.store.load(source)?, source, self.schema)?;
        doc.append_employee(record);
        self.store.save(source, &doc.to_xml_string()?)?;
        self.process(source)
    }
}

//! Швы к внешним участникам: хранилище документов и XSLT-преобразование.

use crate::{error::Result, formats::source::Schema};

/// Текстовое хранилище документов с ключом-путём.
pub trait DocumentStore {
    fn load(&self, path: &str) -> Result<String>;
    fn save(&mut self, path: &str, contents: &str) -> Result<()>;
}

/// Исходный документ → документ `Employees`.
pub trait Transform {
    fn transform(&self, source_xml: &str) -> Result<String>;

    /// Явный вариант разметки исходника. Внешним преобразованиям он обычно
    /// не нужен.
    fn set_schema(&mut self, _schema: Option<Schema>) {}
}

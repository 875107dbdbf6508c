//! salarylib — пересчёт зарплат в XML-документах и проверка ввода новых сотрудников.

pub mod amount;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod traits;
pub mod transform;
pub mod validate;

pub mod formats {
    pub mod csv;
    pub mod employees;
    pub mod source;
    pub mod tree;
}

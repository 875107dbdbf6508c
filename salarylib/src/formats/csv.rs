//! Выгрузка итоговой таблицы в CSV:
//! name,surname,january,february,march,total_salary

use crate::{error::Result, model::EmployeeRow};
use csv::WriterBuilder;
use std::io::Write;

#[derive(serde::Serialize)]
struct CsvOutRow<'a> {
    name: &'a str,
    surname: &'a str,
    january: Option<&'a str>,
    february: Option<&'a str>,
    march: Option<&'a str>,
    total_salary: Option<&'a str>,
}

const HEADER: [&str; 6] = ["name", "surname", "january", "february", "march", "total_salary"];

pub struct GridCsv;

impl GridCsv {
    pub fn write<W: Write>(mut w: W, rows: &[EmployeeRow]) -> Result<()> {
        let mut wrt = WriterBuilder::new().has_headers(false).from_writer(&mut w);
        // заголовок пишется и для пустой таблицы
        wrt.write_record(HEADER)?;
        for r in rows {
            wrt.serialize(CsvOutRow {
                name: &r.name,
                surname: &r.surname,
                january: r.january.as_deref(),
                february: r.february.as_deref(),
                march: r.march.as_deref(),
                total_salary: r.total_salary.as_deref(),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}

//! Исходные документы зарплат в двух вариантах разметки.
//!
//! Плоский (`Data1.xml`):
//! `<Pay><item name surname amount mount/>...</Pay>`
//!
//! Сгруппированный по месяцам (`Data2.xml`):
//! `<Pay><january><item .../></january><february>...</february>...</Pay>`

use crate::{
    error::Result,
    formats::tree::{Document, Element},
    model::{EmployeeRecord, MonetaryAmount, Month},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const ITEM: &str = "item";
pub const TOTAL_AMOUNT: &str = "totalAmount";

/// Вариант разметки; определяется один раз на документ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    Flat,
    Grouped,
}

impl Schema {
    /// По имени файла: `Data1.xml` — плоский, `Data2.xml` — по месяцам.
    pub fn from_file_name(path: &str) -> Option<Schema> {
        let file = Path::new(path).file_name()?.to_str()?;
        if file.eq_ignore_ascii_case("Data1.xml") {
            Some(Schema::Flat)
        } else if file.eq_ignore_ascii_case("Data2.xml") {
            Some(Schema::Grouped)
        } else {
            None
        }
    }

    /// По форме документа: `item` прямо под корнем — плоский.
    pub fn detect(root: &Element) -> Schema {
        if root.children_named(ITEM).next().is_some() || root.elements().next().is_none() {
            Schema::Flat
        } else {
            Schema::Grouped
        }
    }

    pub fn resolve(explicit: Option<Schema>, path: &str, doc: &Document) -> Schema {
        explicit
            .or_else(|| Schema::from_file_name(path))
            .unwrap_or_else(|| Schema::detect(&doc.root))
    }

    /// Группы, которым пишется `totalAmount`, и позиции их элементов.
    fn groups(self, root: &Element) -> Vec<Group<'_>> {
        match self {
            Schema::Flat => vec![Group {
                target: GroupTarget::Root,
                items: root.descendants_named(ITEM),
            }],
            Schema::Grouped => root
                .elements()
                .enumerate()
                .map(|(i, section)| Group {
                    target: GroupTarget::Section(i),
                    items: section.children_named(ITEM).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum GroupTarget {
    Root,
    /// Индекс среди дочерних элементов корня.
    Section(usize),
}

struct Group<'a> {
    target: GroupTarget,
    items: Vec<&'a Element>,
}

impl Group<'_> {
    fn total(&self) -> MonetaryAmount {
        crate::amount::sum(self.items.iter().map(|i| i.attribute("amount").unwrap_or("")))
    }
}

/// Одна запись `item` в удобном виде.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryItem {
    pub name: String,
    pub surname: String,
    pub amount: String,
    /// Метка месяца как в документе (`mount`), у сгруппированного варианта
    /// при отсутствии берётся имя секции.
    pub mount: Option<String>,
}

impl SalaryItem {
    fn from_element(el: &Element, section: Option<&str>) -> Self {
        let attr = |k: &str| el.attribute(k).unwrap_or("").to_string();
        SalaryItem {
            name: attr("name"),
            surname: attr("surname"),
            amount: attr("amount"),
            mount: el
                .attribute("mount")
                .or(section)
                .map(str::to_string),
        }
    }

    pub fn month(&self) -> Option<Month> {
        self.mount.as_deref().and_then(Month::from_label)
    }
}

#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub schema: Schema,
    pub doc: Document,
}

impl SourceDocument {
    pub fn parse(xml: &str, path: &str, schema: Option<Schema>) -> Result<Self> {
        let doc = Document::parse(xml)?;
        let schema = Schema::resolve(schema, path, &doc);
        tracing::debug!(path, ?schema, "source document parsed");
        Ok(SourceDocument { schema, doc })
    }

    pub fn to_xml_string(&self) -> Result<String> {
        self.doc.to_xml_string()
    }

    pub fn items(&self) -> Vec<SalaryItem> {
        let root = &self.doc.root;
        match self.schema {
            Schema::Flat => root
                .descendants_named(ITEM)
                .into_iter()
                .map(|e| SalaryItem::from_element(e, None))
                .collect(),
            Schema::Grouped => root
                .elements()
                .flat_map(|section| {
                    section
                        .children_named(ITEM)
                        .map(move |e| SalaryItem::from_element(e, Some(section.name.as_str())))
                })
                .collect(),
        }
    }

    /// Итог по каждому месяцу среди всех сотрудников.
    pub fn month_totals(&self) -> Vec<(Month, MonetaryAmount)> {
        let items = self.items();
        Month::ALL
            .into_iter()
            .map(|m| {
                let total = crate::amount::sum(
                    items
                        .iter()
                        .filter(|i| i.month() == Some(m))
                        .map(|i| i.amount.as_str()),
                );
                (m, total)
            })
            .collect()
    }

    pub fn document_total(&self) -> MonetaryAmount {
        crate::amount::sum(self.items().iter().map(|i| i.amount.as_str()))
    }

    /// Пересчитывает `totalAmount` с нуля: у корня (плоский вариант) или у
    /// каждой секции месяца (сгруппированный).
    pub fn update_totals(&mut self) {
        let totals: Vec<(GroupTarget, MonetaryAmount)> = self
            .schema
            .groups(&self.doc.root)
            .iter()
            .map(|g| (g.target, g.total()))
            .collect();

        for (target, total) in totals {
            let el = match target {
                GroupTarget::Root => Some(&mut self.doc.root),
                GroupTarget::Section(i) => self.doc.root.elements_mut().nth(i),
            };
            if let Some(el) = el {
                el.set_attribute(TOTAL_AMOUNT, total.to_fixed());
            }
        }
    }

    /// Добавляет по одному `item` на каждый заполненный месяц.
    pub fn append_employee(&mut self, record: &EmployeeRecord) {
        for (month, amount) in &record.salaries {
            let item = Element::new(ITEM)
                .with_attribute("name", record.name.as_str())
                .with_attribute("surname", record.surname.as_str())
                .with_attribute("amount", amount.as_str())
                .with_attribute("mount", month.label());

            match self.schema {
                Schema::Flat => self.doc.root.push(item),
                Schema::Grouped => {
                    let root = &mut self.doc.root;
                    if root.child_mut(month.label()).is_none() {
                        tracing::debug!(month = month.label(), "creating missing month section");
                        root.push(Element::new(month.label()));
                    }
                    if let Some(section) = root.child_mut(month.label()) {
                        section.push(item);
                    }
                }
            }
        }
        tracing::info!(
            name = %record.name,
            surname = %record.surname,
            months = record.salaries.len(),
            "employee appended to source document"
        );
    }
}

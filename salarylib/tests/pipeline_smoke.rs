use salarylib::{
    error::{Result, SalaryError},
    formats::{csv::GridCsv, employees::EmployeesDocument, source::Schema},
    model::Month,
    pipeline::{Processor, EMPLOYEES_FILE},
    store::{FsStore, MemoryStore},
    traits::{DocumentStore, Transform},
    validate::{EntryValidator, FieldValues},
};

const DATA1: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Pay>
  <item name="Ivan" surname="Ivanov" amount="1000,50" mount="january"/>
  <item name="Ivan" surname="Ivanov" amount="2000" mount="february"/>
  <item name="Petr" surname="Petrov" amount="bad" mount="january"/>
</Pay>
"#;

const DATA2: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Pay>
  <january>
    <item name="Ivan" surname="Ivanov" amount="100" mount="january"/>
  </january>
  <february>
    <item name="Ivan" surname="Ivanov" amount="200,75" mount="february"/>
    <item name="Petr" surname="Petrov" amount="300" mount="february"/>
  </february>
  <march/>
</Pay>
"#;

fn store_with(path: &str, xml: &str) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.insert(path, xml);
    store
}

#[test]
fn process_flat_source() {
    let mut p = Processor::new(store_with("Data1.xml", DATA1));
    let report = p.process("Data1.xml").expect("process");

    assert_eq!(report.schema, Schema::Flat);
    assert_eq!(report.rows.len(), 2);
    let ivan = &report.rows[0];
    assert_eq!(ivan.name, "Ivan");
    assert_eq!(ivan.month(Month::January), Some("1000,50"));
    assert_eq!(ivan.month(Month::February), Some("2000"));
    assert_eq!(ivan.month(Month::March), None);
    assert_eq!(ivan.total_salary.as_deref(), Some("3000.50"));
    assert_eq!(report.rows[1].total_salary.as_deref(), Some("0.00"));
    assert_eq!(report.document_total.to_string(), "3000.50");
    assert_eq!(report.month_totals[&Month::January].to_string(), "1000.50");

    let employees = EmployeesDocument::parse(p.store().get(EMPLOYEES_FILE).unwrap()).unwrap();
    assert_eq!(employees.employees.len(), 2);
    assert_eq!(employees.employees[0].total_salary.as_deref(), Some("3000.50"));
    assert_eq!(employees.employees[0].salaries.len(), 2);

    let source = p.store().get("Data1.xml").unwrap();
    assert!(source.contains(r#"totalAmount="3000.50""#));
}

#[test]
fn process_grouped_source() {
    let mut p = Processor::new(store_with("Data2.xml", DATA2)).output("out/Employees.xml");
    let report = p.process("Data2.xml").unwrap();

    assert_eq!(report.schema, Schema::Grouped);
    assert_eq!(report.rows[0].total_salary.as_deref(), Some("300.75"));
    assert_eq!(report.rows[1].total_salary.as_deref(), Some("300.00"));
    assert_eq!(report.document_total.to_string(), "600.75");
    assert!(p.store().get("out/Employees.xml").is_some());

    let source = p.store().get("Data2.xml").unwrap();
    assert!(source.contains(r#"totalAmount="100.00""#));
    assert!(source.contains(r#"totalAmount="500.75""#));
    assert!(source.contains(r#"totalAmount="0.00""#));
}

#[test]
fn reprocessing_gives_same_totals() {
    let mut p = Processor::new(store_with("Data1.xml", DATA1));
    let first = p.process("Data1.xml").unwrap();
    let second = p.process("Data1.xml").unwrap();
    assert_eq!(first, second);
}

#[test]
fn added_employee_total_matches_form_total() {
    let values = FieldValues {
        name: "Иван".into(),
        surname: "Петров-Сидоров".into(),
        january: "1000".into(),
        february: "".into(),
        march: "250,25".into(),
    };
    let mut validator = EntryValidator::new();
    let shown = validator.revalidate(&values).total;
    let record = validator.submit(&values).unwrap();

    for (path, xml) in [("Data1.xml", DATA1), ("Data2.xml", DATA2)] {
        let mut p = Processor::new(store_with(path, xml));
        let report = p.add_employee(path, &record).unwrap();
        let row = report
            .rows
            .iter()
            .find(|r| r.surname == "Петров-Сидоров")
            .expect("new employee row");
        assert_eq!(row.total_salary.as_deref(), Some(shown.to_fixed().as_str()), "{path}");
        assert_eq!(row.month(Month::March), Some("250.25"));
    }
}

#[test]
fn missing_source_is_reported() {
    let mut p = Processor::new(MemoryStore::new());
    assert!(matches!(p.process("Data1.xml"), Err(SalaryError::Io(_))));
}

struct FixedTransform;

impl Transform for FixedTransform {
    fn transform(&self, _source_xml: &str) -> Result<String> {
        Ok(r#"<Employees>
  <Employee name="Anna" surname="Smirnova" totalSalary="999">
    <salary mount="January" amount="10,10"/>
    <salary mount="january" amount="5"/>
    <salary mount="march"/>
  </Employee>
</Employees>"#
            .to_string())
    }
}

#[test]
fn external_transform_output_gets_fresh_totals() {
    let mut p = Processor::with_transform(store_with("Data1.xml", DATA1), FixedTransform);
    let report = p.process("Data1.xml").unwrap();
    assert_eq!(report.rows.len(), 1);
    let anna = &report.rows[0];
    assert_eq!(anna.total_salary.as_deref(), Some("15.10"));
    // несколько записей за месяц: в таблицу попадает последняя
    assert_eq!(anna.month(Month::January), Some("5"));
    assert_eq!(anna.month(Month::March), None);
}

#[test]
fn grid_csv_export() {
    let mut p = Processor::new(store_with("Data1.xml", DATA1));
    let report = p.process("Data1.xml").unwrap();

    let mut out = Vec::new();
    GridCsv::write(&mut out, &report.rows).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("name,surname,january,february,march,total_salary"));
    assert_eq!(lines.next(), Some(r#"Ivan,Ivanov,"1000,50",2000,,3000.50"#));
    assert_eq!(lines.next(), Some("Petr,Petrov,bad,,,0.00"));

    let mut empty = Vec::new();
    GridCsv::write(&mut empty, &[]).unwrap();
    assert_eq!(String::from_utf8(empty).unwrap().lines().count(), 1);
}

#[test]
fn fs_store_processes_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Data2.xml"), DATA2).unwrap();

    let mut p = Processor::new(FsStore::with_base(dir.path()));
    let report = p.process("Data2.xml").unwrap();
    assert_eq!(report.document_total.to_string(), "600.75");

    let employees = FsStore::with_base(dir.path()).load(EMPLOYEES_FILE).unwrap();
    assert!(EmployeesDocument::parse(&employees).unwrap().employees.len() == 2);
}

#[test]
fn explicit_schema_reaches_the_transform() {
    // секция january без mount: по форме документ сгруппированный
    let xml = r#"<Pay><january><item name="Anna" surname="Smirnova" amount="5"/></january></Pay>"#;

    let mut detected = Processor::new(store_with("payroll.xml", xml));
    let report = detected.process("payroll.xml").unwrap();
    assert_eq!(report.schema, Schema::Grouped);
    assert_eq!(report.rows[0].month(Month::January), Some("5"));

    let mut forced = Processor::new(store_with("payroll.xml", xml)).schema(Some(Schema::Flat));
    let report = forced.process("payroll.xml").unwrap();
    assert_eq!(report.schema, Schema::Flat);
    assert_eq!(report.rows[0].month(Month::January), None);
    assert_eq!(report.rows[0].total_salary.as_deref(), Some("5.00"));
    assert!(forced.store().get("payroll.xml").unwrap().contains(r#"<Pay totalAmount="5.00">"#));
}

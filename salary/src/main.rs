use clap::{Args, Parser, Subcommand, ValueEnum};
use salarylib::{
    error::{Result, SalaryError},
    formats::{csv::GridCsv, source::Schema},
    model::{EmployeeRow, Month},
    pipeline::{ProcessReport, Processor, EMPLOYEES_FILE},
    store::FsStore,
    transform::NativeTransform,
    validate::{EntryValidator, FieldState, FieldValues, ValidationReport},
};
use std::fs::File;
use std::io::{self, Write};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SchemaArg {
    /// Плоский список item (Data1.xml)
    Flat,
    /// Секции по месяцам (Data2.xml)
    Grouped,
}

impl From<SchemaArg> for Schema {
    fn from(s: SchemaArg) -> Self {
        match s {
            SchemaArg::Flat => Schema::Flat,
            SchemaArg::Grouped => Schema::Grouped,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "salary", version, about = "Обработка зарплат сотрудников из XML")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Исходный файл (Data1.xml или Data2.xml)
    #[arg(short = 's', long = "source")]
    source: String,

    /// Вариант разметки; по умолчанию — по имени файла или содержимому
    #[arg(long = "schema", value_enum)]
    schema: Option<SchemaArg>,

    /// Куда сохранить документ Employees
    #[arg(short = 'o', long = "output", default_value = EMPLOYEES_FILE)]
    output: String,

    /// Выгрузить таблицу в CSV
    #[arg(long = "csv")]
    csv: Option<String>,
}

#[derive(Args, Debug)]
struct FormArgs {
    #[arg(long = "name", default_value = "")]
    name: String,

    #[arg(long = "surname", default_value = "")]
    surname: String,

    #[arg(long = "january", default_value = "")]
    january: String,

    #[arg(long = "february", default_value = "")]
    february: String,

    #[arg(long = "march", default_value = "")]
    march: String,
}

impl From<FormArgs> for FieldValues {
    fn from(a: FormArgs) -> Self {
        FieldValues {
            name: a.name,
            surname: a.surname,
            january: a.january,
            february: a.february,
            march: a.march,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Пересчитать итоги и показать таблицу
    Process {
        #[command(flatten)]
        src: SourceArgs,

        /// Вывод в JSON
        #[arg(long = "json")]
        json: bool,
    },
    /// Проверить данные нового сотрудника
    Validate {
        #[command(flatten)]
        form: FormArgs,

        #[arg(long = "json")]
        json: bool,
    },
    /// Добавить сотрудника в исходный файл и пересчитать
    Add {
        #[command(flatten)]
        src: SourceArgs,

        #[command(flatten)]
        form: FormArgs,

        #[arg(long = "json")]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "salary=info,salarylib=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut out = io::stdout().lock();

    match cli.cmd {
        Cmd::Process { src, json } => {
            let report = processor(&src).process(&src.source)?;
            finish(&mut out, &src, &report, json)?;
        }
        Cmd::Validate { form, json } => {
            let values: FieldValues = form.into();
            let mut validator = EntryValidator::new();
            let report = validator.revalidate(&values);
            print_validation(&mut out, report, json)?;
        }
        Cmd::Add { src, form, json } => {
            let values: FieldValues = form.into();
            let mut validator = EntryValidator::new();
            validator.revalidate(&values);
            let record = match validator.submit(&values) {
                Ok(r) => r,
                Err(e) => {
                    if let Some(report) = validator.report() {
                        print_validation(&mut out, report, json)?;
                    }
                    return Err(e.into());
                }
            };
            let report = processor(&src).add_employee(&src.source, &record)?;
            finish(&mut out, &src, &report, json)?;
        }
    }

    out.flush().map_err(SalaryError::from)
}

fn processor(src: &SourceArgs) -> Processor<FsStore, NativeTransform> {
    Processor::new(FsStore::new())
        .output(src.output.clone())
        .schema(src.schema.map(Schema::from))
}

fn finish<W: Write>(out: &mut W, src: &SourceArgs, report: &ProcessReport, json: bool) -> Result<()> {
    if let Some(path) = &src.csv {
        GridCsv::write(File::create(path)?, &report.rows)?;
    }
    if json {
        let s = serde_json::to_string_pretty(report).map_err(|e| SalaryError::Parse(e.to_string()))?;
        writeln!(out, "{s}")?;
    } else {
        print_grid(out, &report.rows)?;
        writeln!(out, "Total: {}", report.document_total)?;
    }
    Ok(())
}

fn print_grid<W: Write>(out: &mut W, rows: &[EmployeeRow]) -> Result<()> {
    writeln!(
        out,
        "{:<16} {:<20} {:>12} {:>12} {:>12} {:>14}",
        "Name", "Surname", "January", "February", "March", "Total"
    )?;
    for r in rows {
        let cell = |m: Month| r.month(m).unwrap_or("").to_string();
        writeln!(
            out,
            "{:<16} {:<20} {:>12} {:>12} {:>12} {:>14}",
            r.name,
            r.surname,
            cell(Month::January),
            cell(Month::February),
            cell(Month::March),
            r.total_salary.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

fn print_validation<W: Write>(out: &mut W, report: &ValidationReport, json: bool) -> Result<()> {
    if json {
        let s = serde_json::to_string_pretty(report).map_err(|e| SalaryError::Parse(e.to_string()))?;
        writeln!(out, "{s}")?;
        return Ok(());
    }

    let state = |s: &FieldState| match s {
        FieldState::Valid => "ok".to_string(),
        FieldState::Empty => "-".to_string(),
        FieldState::Invalid(e) => e.to_string(),
    };
    writeln!(out, "name:     {}", state(&report.name))?;
    writeln!(out, "surname:  {}", state(&report.surname))?;
    for m in Month::ALL {
        writeln!(out, "{:<9} {}", format!("{}:", m.label()), state(report.salary(m)))?;
    }
    if let Some(e) = &report.form_error {
        writeln!(out, "form:     {e}")?;
    }
    writeln!(out, "total:    {}", report.total)?;
    writeln!(out, "submittable: {}", report.submittable)?;
    Ok(())
}

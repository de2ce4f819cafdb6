//! Rendering snapshots.
//!
//! The engine knows nothing about presentation. Anything that wants to show or record a
//! [`Snapshot`] implements [`Reporter`] and is handed each snapshot as it is produced.
//! Two reporters ship with the crate: a two-column console table and a CSV file with one
//! row per cycle.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use log::trace;
use serde::Serialize;

use crate::error::VaccinateError;
use crate::stats::Snapshot;

pub trait Reporter {
    /// Presents the snapshot taken at the end of reporting cycle `cycle`.
    ///
    /// # Errors
    /// Returns an error if the underlying output cannot be written.
    fn render(&mut self, cycle: u64, snapshot: &Snapshot) -> Result<(), VaccinateError>;
}

/// Prints each snapshot as a `COLUMN`/`VALUE` table.
pub struct TableReporter<W: Write> {
    out: W,
}

impl<W: Write> TableReporter<W> {
    pub fn new(out: W) -> Self {
        TableReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TableReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        TableReporter::new(std::io::stdout())
    }
}

fn table_rows(snapshot: &Snapshot) -> [(&'static str, String); 7] {
    [
        ("COLUMN", "VALUE".to_string()),
        ("People", snapshot.population_size.to_string()),
        ("Visits", snapshot.visit_budget.to_string()),
        ("Infection rate", snapshot.infection_rate_percent.to_string()),
        ("Infected count", snapshot.infected_count.to_string()),
        (
            "Number of times infected",
            snapshot.total_times_infected.to_string(),
        ),
        (
            "Number of times cured",
            snapshot.total_times_cured.to_string(),
        ),
    ]
}

impl<W: Write> Reporter for TableReporter<W> {
    fn render(&mut self, _cycle: u64, snapshot: &Snapshot) -> Result<(), VaccinateError> {
        let rows = table_rows(snapshot);
        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, value) in &rows {
            writeln!(self.out, "{name:<width$}    {value}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Options controlling where CSV reports are written.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub file_prefix: String,
    pub directory: PathBuf,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            file_prefix: String::new(),
            directory: PathBuf::from("."),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut ReportOptions {
        self.file_prefix = file_prefix;
        self
    }

    pub fn directory(&mut self, directory: PathBuf) -> &mut ReportOptions {
        self.directory = directory;
        self
    }

    pub fn overwrite(&mut self, overwrite: bool) -> &mut ReportOptions {
        self.overwrite = overwrite;
        self
    }

    /// Full path of the report called `short_name`.
    pub fn path_for(&self, short_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.csv", self.file_prefix, short_name))
    }
}

#[derive(Serialize)]
struct CycleReportItem {
    cycle: u64,
    population_size: usize,
    infection_rate_percent: u32,
    visit_budget: u64,
    infected_count: u64,
    total_times_infected: u64,
    total_times_cured: u64,
}

impl CycleReportItem {
    fn new(cycle: u64, snapshot: &Snapshot) -> Self {
        CycleReportItem {
            cycle,
            population_size: snapshot.population_size,
            infection_rate_percent: snapshot.infection_rate_percent,
            visit_budget: snapshot.visit_budget,
            infected_count: snapshot.infected_count,
            total_times_infected: snapshot.total_times_infected,
            total_times_cured: snapshot.total_times_cured,
        }
    }
}

/// Appends one row per cycle to a CSV file.
pub struct CsvReporter {
    writer: Writer<File>,
    path: PathBuf,
}

impl CsvReporter {
    /// Creates the report file `short_name` according to `options`.
    ///
    /// # Errors
    /// Returns `ReportError` if the file already exists and `overwrite` is off, or an
    /// I/O error if the directory or file cannot be created.
    pub fn create(options: &ReportOptions, short_name: &str) -> Result<Self, VaccinateError> {
        let path = options.path_for(short_name);
        let file = create_report_file(&path, options.overwrite)?;
        trace!("writing report to {}", path.display());
        Ok(CsvReporter {
            writer: Writer::from_writer(file),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn create_report_file(path: &Path, overwrite: bool) -> Result<File, VaccinateError> {
    if path.exists() && !overwrite {
        return Err(VaccinateError::ReportError(format!(
            "file already exists: {}. Please set `overwrite` to true in the file report options and re-run.",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

impl Reporter for CsvReporter {
    fn render(&mut self, cycle: u64, snapshot: &Snapshot) -> Result<(), VaccinateError> {
        self.writer.serialize(CycleReportItem::new(cycle, snapshot))?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    fn snapshot(infected_count: u64) -> Snapshot {
        Snapshot {
            population_size: 100,
            infection_rate_percent: 10,
            visit_budget: 10_000,
            infected_count,
            total_times_infected: 40,
            total_times_cured: 33,
        }
    }

    #[derive(Deserialize)]
    struct Row {
        cycle: u64,
        population_size: usize,
        infected_count: u64,
        total_times_cured: u64,
    }

    #[test]
    fn table_lists_every_field() {
        let mut reporter = TableReporter::new(Vec::new());
        reporter.render(0, &snapshot(7)).unwrap();
        let output = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("COLUMN"));
        assert!(lines[0].ends_with("VALUE"));
        assert!(lines[1].starts_with("People ") && lines[1].ends_with(" 100"));
        assert!(lines[4].starts_with("Infected count ") && lines[4].ends_with(" 7"));
        assert!(lines[6].starts_with("Number of times cured ") && lines[6].ends_with(" 33"));
        // Values line up in one column.
        let column = lines[0].find("VALUE").unwrap();
        assert!(lines.iter().all(|line| line.len() > column));
        assert_eq!(lines[1].find("100"), Some(column));
    }

    #[test]
    fn csv_rows_follow_cycles() {
        let temp_dir = tempdir().unwrap();
        let mut options = ReportOptions::default();
        options
            .directory(temp_dir.path().to_path_buf())
            .file_prefix("run_".to_string());
        let mut reporter = CsvReporter::create(&options, "cycles").unwrap();
        reporter.render(0, &snapshot(1)).unwrap();
        reporter.render(1, &snapshot(5)).unwrap();

        let path = temp_dir.path().join("run_cycles.csv");
        assert_eq!(reporter.path(), path.as_path());
        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<Row> = reader.deserialize().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cycle, 0);
        assert_eq!(rows[0].infected_count, 1);
        assert_eq!(rows[1].cycle, 1);
        assert_eq!(rows[1].infected_count, 5);
        assert_eq!(rows[1].population_size, 100);
        assert_eq!(rows[1].total_times_cured, 33);
    }

    #[test]
    fn csv_refuses_to_overwrite() {
        let temp_dir = tempdir().unwrap();
        let mut options = ReportOptions::default();
        options.directory(temp_dir.path().to_path_buf());
        drop(CsvReporter::create(&options, "cycles").unwrap());

        let result = CsvReporter::create(&options, "cycles");
        assert!(matches!(result, Err(VaccinateError::ReportError(_))));

        options.overwrite(true);
        assert!(CsvReporter::create(&options, "cycles").is_ok());
    }

    #[test]
    fn csv_creates_missing_directories() {
        let temp_dir = tempdir().unwrap();
        let mut options = ReportOptions::default();
        options.directory(temp_dir.path().join("a").join("b"));
        let reporter = CsvReporter::create(&options, "cycles").unwrap();
        assert!(reporter.path().exists());
    }
}

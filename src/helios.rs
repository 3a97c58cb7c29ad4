//! Helios instrument file ingestion
//!
//! Merges a set of fixed-layout plasma/magnetic-field text files, one file
//! per spacecraft and day, into a single time-sorted [DataSet]. The spacecraft
//! id, the two-digit year and the day-of-year are encoded in the file name
//! (`<sc><yy>_<doy>ord.txt`); each row carries the time of day and the raw
//! physical variables.

use std::{
    collections::{BTreeMap, HashSet},
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::NaiveDateTime;
use glob::glob;
use regex::Regex;

use crate::{series::TimeSeries, variable::Variable, DATETIME_FORMAT};

/// Missing-value sentinel used across all raw columns
const NA_VALUE: f64 = -1.;
/// Missing-value sentinel peculiar to the `np2` column
const NA_STARS: &str = "******";

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("file name {0:?} doesn't match the `<sc><yy>_<doy>ord.txt` pattern")]
    FileName(PathBuf),
    #[error("expected {expected} columns, found {found} ({path:?} line {line})")]
    RowLayout {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("cannot parse {value:?} as {variable} ({path:?} line {line})")]
    Value {
        path: PathBuf,
        line: usize,
        variable: Variable,
        value: String,
    },
    #[error("cannot parse composite timestamp {0:?}")]
    Timestamp(String, #[source] chrono::ParseError),
    #[error("duplicate sample at {0} for Helios {1}")]
    Duplicate(NaiveDateTime, u8),
    #[error("column {0:?} is missing from the data file")]
    MissingColumn(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),
    #[error(transparent)]
    Glob(#[from] glob::GlobError),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}
type Result<T> = std::result::Result<T, DataError>;

/// Spacecraft id and date, decoded from an instrument file name
#[derive(Debug, Clone, Copy)]
struct FileTag<'a> {
    spacecraft: u8,
    year: &'a str,
    day: &'a str,
}

/// The merged Helios measurement table, sorted by time
///
/// All columns share the time index; `NaN` marks the missing samples.
#[derive(Debug, Default)]
pub struct DataSet {
    pub time: Vec<NaiveDateTime>,
    pub spacecraft: Vec<u8>,
    pub data: BTreeMap<Variable, Vec<f64>>,
}
impl DataSet {
    pub fn len(&self) -> usize {
        self.time.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
    /// Extracts one variable as a time-indexed series
    pub fn series(&self, variable: Variable) -> Option<TimeSeries> {
        self.data.get(&variable).map(|values| TimeSeries {
            name: variable.to_string(),
            time: self.time.clone(),
            values: values.clone(),
        })
    }
    /// Restricts the table to one spacecraft and an inclusive time window
    pub fn window(&self, start: NaiveDateTime, end: NaiveDateTime, spacecraft: u8) -> DataSet {
        let keep: Vec<usize> = self
            .time
            .iter()
            .zip(&self.spacecraft)
            .enumerate()
            .filter(|(_, (&t, &sc))| t >= start && t <= end && sc == spacecraft)
            .map(|(k, _)| k)
            .collect();
        DataSet {
            time: keep.iter().map(|&k| self.time[k]).collect(),
            spacecraft: keep.iter().map(|&k| self.spacecraft[k]).collect(),
            data: self
                .data
                .iter()
                .map(|(&variable, values)| {
                    (variable, keep.iter().map(|&k| values[k]).collect())
                })
                .collect(),
        }
    }
    pub fn summary(&self) {
        println!("SUMMARY:");
        println!(" - # of records: {}", self.len());
        if let (Some(first), Some(last)) = (self.time.first(), self.time.last()) {
            println!(" - time range: [{} - {}]", first, last);
        }
        println!("    {:^8}: {:^12}", "COLUMN", "# MISSING");
        for (variable, values) in &self.data {
            let missing = values.iter().filter(|v| v.is_nan()).count();
            println!("  - {:8}: {:>12}", variable.to_string(), missing);
        }
    }
    /// Appends the rows of one instrument file
    fn append_file(&mut self, path: &Path, tag_regex: &Regex) -> Result<()> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| DataError::FileName(path.to_path_buf()))?;
        let captures = tag_regex
            .captures(name)
            .ok_or_else(|| DataError::FileName(path.to_path_buf()))?;
        let tag = FileTag {
            spacecraft: captures[1].parse().unwrap_or_default(),
            year: captures.get(2).map(|m| m.as_str()).unwrap_or_default(),
            day: captures.get(3).map(|m| m.as_str()).unwrap_or_default(),
        };
        let file = File::open(path)?;
        self.append_records(path, tag, BufReader::new(file))
    }
    fn append_records<R: BufRead>(&mut self, path: &Path, tag: FileTag, reader: R) -> Result<()> {
        // day-of-year, hh, mm, ss, then the raw physical columns
        let n_columns = 4 + Variable::raw().count();
        for (k, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() != n_columns {
                return Err(DataError::RowLayout {
                    path: path.to_path_buf(),
                    line: k + 1,
                    expected: n_columns,
                    found: tokens.len(),
                });
            }
            // composite timestamp: year and day from the file name, time of
            // day from the row; the row's own day-of-year column is dropped
            let (hh, mm, ss) = (tokens[1], tokens[2], tokens[3]);
            let composite = format!("{} {} {}:{}:{}", tag.year, tag.day, hh, mm, ss);
            let time = NaiveDateTime::parse_from_str(&composite, "%y %j %H:%M:%S")
                .map_err(|e| DataError::Timestamp(composite.clone(), e))?;
            self.time.push(time);
            self.spacecraft.push(tag.spacecraft);
            for (variable, token) in Variable::raw().zip(&tokens[4..]) {
                let value = if variable == Variable::Np2 && *token == NA_STARS {
                    f64::NAN
                } else {
                    token.parse::<f64>().map_err(|_| DataError::Value {
                        path: path.to_path_buf(),
                        line: k + 1,
                        variable,
                        value: token.to_string(),
                    })?
                };
                let value = if value == NA_VALUE { f64::NAN } else { value };
                self.data.entry(variable).or_default().push(value);
            }
        }
        Ok(())
    }
    /// Sorts the rows by time, spacecraft-stable
    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by_key(|&k| (self.time[k], self.spacecraft[k]));
        self.time = order.iter().map(|&k| self.time[k]).collect();
        self.spacecraft = order.iter().map(|&k| self.spacecraft[k]).collect();
        for values in self.data.values_mut() {
            *values = order.iter().map(|&k| values[k]).collect();
        }
    }
    /// Fails if two rows collide on the composite (timestamp, spacecraft) key
    fn verify(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (&time, &spacecraft) in self.time.iter().zip(&self.spacecraft) {
            if !seen.insert((time, spacecraft)) {
                return Err(DataError::Duplicate(time, spacecraft));
            }
        }
        Ok(())
    }
    /// Inserts `Btotal`, the Euclidean norm of the three field components
    fn derive_total_field(&mut self) {
        let component = |variable| {
            self.data
                .get(&variable)
                .cloned()
                .unwrap_or_else(|| vec![f64::NAN; self.len()])
        };
        let (bx, by, bz) = (
            component(Variable::Bx),
            component(Variable::By),
            component(Variable::Bz),
        );
        let btotal = bx
            .iter()
            .zip(&by)
            .zip(&bz)
            .map(|((x, y), z)| (x * x + y * y + z * z).sqrt())
            .collect();
        self.data.insert(Variable::Btotal, btotal);
    }
    /// Writes the table as CSV, missing samples spelled `NaN`
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_csv_writer(csv::Writer::from_path(path)?)
    }
    fn to_csv_writer<W: std::io::Write>(&self, mut wtr: csv::Writer<W>) -> Result<()> {
        let mut header = vec![String::from("Datetime"), String::from("Helios")];
        header.extend(self.data.keys().map(|variable| variable.to_string()));
        wtr.write_record(&header)?;
        for (k, (time, spacecraft)) in self.time.iter().zip(&self.spacecraft).enumerate() {
            let mut record = vec![
                time.format(DATETIME_FORMAT).to_string(),
                spacecraft.to_string(),
            ];
            record.extend(self.data.values().map(|values| values[k].to_string()));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Reads back a CSV table, restricted to the requested variables
    pub fn from_csv<P: AsRef<Path>>(path: P, variables: &[Variable]) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(csv::Reader::from_reader(file), variables)
    }
    fn from_csv_reader<R: std::io::Read>(
        mut rdr: csv::Reader<R>,
        variables: &[Variable],
    ) -> Result<Self> {
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let positions: Vec<(Variable, usize)> = variables
            .iter()
            .map(|&variable| {
                headers
                    .iter()
                    .position(|h| h == &variable.to_string())
                    .map(|k| (variable, k))
                    .ok_or_else(|| DataError::MissingColumn(variable.to_string()))
            })
            .collect::<Result<_>>()?;
        let mut dataset = DataSet::default();
        for record in rdr.records() {
            let record = record?;
            let time = record.get(0).unwrap_or_default();
            dataset.time.push(
                NaiveDateTime::parse_from_str(time, DATETIME_FORMAT)
                    .map_err(|e| DataError::Timestamp(time.to_string(), e))?,
            );
            dataset
                .spacecraft
                .push(record.get(1).and_then(|sc| sc.parse().ok()).unwrap_or(0));
            for &(variable, k) in &positions {
                let value = record
                    .get(k)
                    .and_then(|v| v.parse::<f64>().ok())
                    .unwrap_or(f64::NAN);
                dataset.data.entry(variable).or_default().push(value);
            }
        }
        Ok(dataset)
    }
}

/// [DataSet] loader, in the builder style
pub struct DataLoader {
    path: String,
    pattern: String,
}
impl Default for DataLoader {
    fn default() -> Self {
        Self {
            path: String::from("Helios"),
            pattern: String::from("*ord.txt"),
        }
    }
}
impl DataLoader {
    pub fn data_path<S: AsRef<Path>>(self, data_path: S) -> Self {
        Self {
            path: data_path.as_ref().to_str().unwrap_or_default().to_owned(),
            ..self
        }
    }
    pub fn file_pattern<S: Into<String>>(self, pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }
    /// Globs the instrument files and merges them into a single [DataSet]
    pub fn load(self) -> Result<DataSet> {
        log::info!("Loading {:?}...", self.path);
        let now = Instant::now();
        let tag_regex = Regex::new(r"^(\d)(\d{2})_(\d{3})ord\.txt$")?;
        let pattern = Path::new(&self.path).join(&self.pattern);
        let mut dataset = DataSet::default();
        for entry in glob(pattern.to_str().unwrap_or_default())? {
            dataset.append_file(&entry?, &tag_regex)?;
        }
        dataset.sort();
        dataset.verify()?;
        dataset.derive_total_field();
        log::info!("... loaded in {:}s", now.elapsed().as_secs());
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: FileTag = FileTag {
        spacecraft: 1,
        year: "75",
        day: "001",
    };

    fn row(hh: &str, values: &str) -> String {
        // 22 raw columns: rh esh clong clat crot np1 vp1 Tp1 vaz vel
        // Bx By Bz sBx sBy sBz nal val Tal np2 vp2 Tp2
        format!("  1 {} 15 30 {}", hh, values)
    }
    fn values(np2: &str) -> String {
        format!(
            "0.31 12.5 100.2 -3.1 1655 8.4 410.0 1.1e5 2.0 -1.5 \
             3.0 4.0 0.0 0.1 0.1 0.1 0.4 420.0 2.2e5 {} 415.0 1.0e5",
            np2
        )
    }
    fn parse(rows: &[String]) -> Result<DataSet> {
        let mut dataset = DataSet::default();
        dataset.append_records(
            Path::new("175_001ord.txt"),
            TAG,
            rows.join("\n").as_bytes(),
        )?;
        dataset.sort();
        dataset.verify()?;
        dataset.derive_total_field();
        Ok(dataset)
    }

    #[test]
    fn composite_timestamp() {
        let dataset = parse(&[row("00", &values("5.0"))]).unwrap();
        assert_eq!(
            dataset.time[0].format(DATETIME_FORMAT).to_string(),
            "1975-01-01 00:15:30"
        );
        assert_eq!(dataset.spacecraft[0], 1);
    }
    #[test]
    fn total_field_magnitude() {
        let dataset = parse(&[row("00", &values("5.0"))]).unwrap();
        // Bx=3, By=4, Bz=0
        assert_eq!(dataset.data[&Variable::Btotal][0], 5.0);
    }
    #[test]
    fn missing_component_yields_missing_magnitude() {
        // Bx = -1 is the missing sentinel
        let rows = [row(
            "00",
            "0.31 12.5 100.2 -3.1 1655 8.4 410.0 1.1e5 2.0 -1.5 \
             -1 4.0 0.0 0.1 0.1 0.1 0.4 420.0 2.2e5 5.0 415.0 1.0e5",
        )];
        let dataset = parse(&rows).unwrap();
        assert!(dataset.data[&Variable::Bx][0].is_nan());
        assert!(dataset.data[&Variable::Btotal][0].is_nan());
    }
    #[test]
    fn stars_sentinel_in_np2() {
        let dataset = parse(&[row("00", &values(NA_STARS))]).unwrap();
        assert!(dataset.data[&Variable::Np2][0].is_nan());
    }
    #[test]
    fn stars_sentinel_elsewhere_is_an_error() {
        let rows = [row(
            "00",
            "****** 12.5 100.2 -3.1 1655 8.4 410.0 1.1e5 2.0 -1.5 \
             3.0 4.0 0.0 0.1 0.1 0.1 0.4 420.0 2.2e5 5.0 415.0 1.0e5",
        )];
        assert!(matches!(
            parse(&rows),
            Err(DataError::Value {
                variable: Variable::Rh,
                ..
            })
        ));
    }
    #[test]
    fn timestamp_collision_aborts() {
        let rows = [row("00", &values("5.0")), row("00", &values("6.0"))];
        assert!(matches!(parse(&rows), Err(DataError::Duplicate(_, 1))));
    }
    #[test]
    fn same_timestamp_on_the_other_spacecraft_is_fine() {
        let mut dataset = DataSet::default();
        let rows = [row("00", &values("5.0"))];
        dataset
            .append_records(
                Path::new("175_001ord.txt"),
                TAG,
                rows.join("\n").as_bytes(),
            )
            .unwrap();
        dataset
            .append_records(
                Path::new("275_001ord.txt"),
                FileTag {
                    spacecraft: 2,
                    ..TAG
                },
                rows.join("\n").as_bytes(),
            )
            .unwrap();
        dataset.sort();
        assert!(dataset.verify().is_ok());
    }
    #[test]
    fn rows_sort_by_time() {
        let rows = [row("12", &values("5.0")), row("00", &values("6.0"))];
        let dataset = parse(&rows).unwrap();
        assert!(dataset.time[0] < dataset.time[1]);
        assert_eq!(dataset.data[&Variable::Np2], vec![6.0, 5.0]);
    }
    #[test]
    fn short_row_is_an_error() {
        assert!(matches!(
            parse(&[String::from("1 00 15 30 0.31 12.5")]),
            Err(DataError::RowLayout { found: 6, .. })
        ));
    }
    #[test]
    fn csv_round_trip() {
        let rows = [row("00", &values(NA_STARS)), row("12", &values("5.0"))];
        let dataset = parse(&rows).unwrap();
        let mut csv = vec![];
        dataset
            .to_csv_writer(csv::Writer::from_writer(&mut csv))
            .unwrap();
        let back = DataSet::from_csv_reader(
            csv::Reader::from_reader(csv.as_slice()),
            &[Variable::Np2, Variable::Btotal],
        )
        .unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.time, dataset.time);
        assert!(back.data[&Variable::Np2][0].is_nan());
        assert_eq!(back.data[&Variable::Np2][1], 5.0);
        assert_eq!(back.data[&Variable::Btotal], vec![5.0, 5.0]);
    }
    #[test]
    fn window_filters_time_and_spacecraft() {
        let rows = [row("00", &values("5.0")), row("12", &values("6.0"))];
        let dataset = parse(&rows).unwrap();
        let window = dataset.window(dataset.time[0], dataset.time[0], 1);
        assert_eq!(window.len(), 1);
        let window = dataset.window(dataset.time[0], dataset.time[1], 2);
        assert!(window.is_empty());
    }
}

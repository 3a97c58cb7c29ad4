//! Interplanetary shock catalogue
//!
//! Normalizes the hand-entered shock list into [Shock] events: the
//! `Date/time` column becomes a proper timestamp, the letter-coded `SC`
//! column becomes a bare spacecraft number, everything else is dropped.

use std::{fs::File, ops::Deref, path::Path};

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::DATETIME_FORMAT;

/// Date format of the hand-entered catalogue
const CATALOGUE_FORMAT: &str = "%d.%m.%y %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum ShockError {
    #[error("spacecraft code {0:?} is not recognized, expected e.g. \"A1\" or \"1\"")]
    Spacecraft(String),
    #[error("cannot parse shock time {0:?}")]
    Timestamp(String, #[source] chrono::ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
type Result<T> = std::result::Result<T, ShockError>;

/// A cataloged shock crossing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shock {
    pub time: NaiveDateTime,
    pub spacecraft: u8,
}

/// One row of the catalogue; the `JJ/TT/SS/MM` sub-time columns and any
/// other extras are left behind by serde
#[derive(Deserialize, Debug)]
struct CatalogueRow {
    #[serde(rename = "Date/time")]
    datetime: String,
    #[serde(rename = "SC")]
    spacecraft: String,
}

/// The shock events, sorted by time
#[derive(Debug, Default)]
pub struct ShockList(Vec<Shock>);
impl Deref for ShockList {
    type Target = Vec<Shock>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl ShockList {
    /// Loads and normalizes the shock catalogue (CSV export)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        log::info!("Loading {:?}...", path.as_ref());
        // catalogue headers and cells carry stray whitespace
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path.as_ref())?;
        Self::from_catalogue_reader(rdr)
    }
    fn from_catalogue_reader<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Self> {
        let mut shocks = vec![];
        for row in rdr.deserialize() {
            let row: CatalogueRow = row?;
            let time = NaiveDateTime::parse_from_str(&row.datetime, CATALOGUE_FORMAT)
                .map_err(|e| ShockError::Timestamp(row.datetime.clone(), e))?;
            shocks.push(Shock {
                time,
                spacecraft: recode_spacecraft(&row.spacecraft)?,
            });
        }
        shocks.sort_by_key(|shock| shock.time);
        Ok(Self(shocks))
    }
    /// Writes the normalized table as CSV
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["Datetime", "Helios"])?;
        for shock in self.iter() {
            wtr.write_record([
                shock.time.format(DATETIME_FORMAT).to_string(),
                shock.spacecraft.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
    /// Reads back a normalized shock table
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let mut rdr = csv::Reader::from_reader(file);
        let mut shocks = vec![];
        for record in rdr.records() {
            let record = record?;
            let datetime = record.get(0).unwrap_or_default();
            let time = NaiveDateTime::parse_from_str(datetime, DATETIME_FORMAT)
                .map_err(|e| ShockError::Timestamp(datetime.to_string(), e))?;
            let spacecraft = record.get(1).unwrap_or_default();
            shocks.push(Shock {
                time,
                spacecraft: recode_spacecraft(spacecraft)?,
            });
        }
        Ok(Self(shocks))
    }
}

/// Recodes the catalogue spacecraft id, e.g. "A1" or "1", to the bare probe
/// number
fn recode_spacecraft(code: &str) -> Result<u8> {
    let mut chars = code.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(digit), None, _) if digit.is_ascii_digit() => Ok(digit as u8 - b'0'),
        (Some(letter), Some(digit), None)
            if letter.is_ascii_alphabetic() && digit.is_ascii_digit() =>
        {
            Ok(digit as u8 - b'0')
        }
        _ => Err(ShockError::Spacecraft(code.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalogue(content: &str) -> Result<ShockList> {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        ShockList::from_catalogue_reader(rdr)
    }

    #[test]
    fn letter_codes_map_to_probe_numbers() {
        assert_eq!(recode_spacecraft("A1").unwrap(), 1);
        assert_eq!(recode_spacecraft("A2").unwrap(), 2);
        assert_eq!(recode_spacecraft("1").unwrap(), 1);
    }
    #[test]
    fn bad_codes_are_rejected() {
        assert!(recode_spacecraft("").is_err());
        assert!(recode_spacecraft("AA").is_err());
        assert!(recode_spacecraft("A12").is_err());
    }
    #[test]
    fn catalogue_rows_normalize_and_sort() {
        let shocks = catalogue(
            "JJ,TT,SS,MM,Date/time ,SC\n\
             28,3,0,0, 28.03.76 10:15 ,A2\n\
             12,1,0,0,12.01.75 06:30,A1\n",
        )
        .unwrap();
        assert_eq!(shocks.len(), 2);
        assert_eq!(shocks[0].spacecraft, 1);
        assert_eq!(
            shocks[0].time.format(DATETIME_FORMAT).to_string(),
            "1975-01-12 06:30:00"
        );
        assert_eq!(shocks[1].spacecraft, 2);
        assert!(shocks[0].time < shocks[1].time);
    }
    #[test]
    fn unparseable_date_aborts() {
        assert!(matches!(
            catalogue("Date/time,SC\n1975-01-12,A1\n"),
            Err(ShockError::Timestamp(..))
        ));
    }
    #[test]
    fn unknown_spacecraft_aborts() {
        assert!(matches!(
            catalogue("Date/time,SC\n12.01.75 06:30,Helios\n"),
            Err(ShockError::Spacecraft(_))
        ));
    }
}

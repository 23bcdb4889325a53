use crate::io::util::{collect_lines, parse_field};
use crate::io::{Format, error::Error};
use crate::model::types::residue_name_from_code;
use std::io::BufRead;
use std::str::FromStr;
use tracing::warn;

/// An NMRPipe database table: remarks, `DATA` entries, the `VARS` column
/// names and one record per data row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GdbFile {
    pub format: Option<Format>,
    pub remarks: Vec<String>,
    /// `DATA` lines in file order; keys may repeat (`DATA SEQUENCE` often does).
    pub data: Vec<(String, Vec<String>)>,
    pub columns: Vec<String>,
    pub formats: Vec<String>,
    pub records: Vec<GdbRecord>,
    vars_line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GdbRecord {
    pub line: usize,
    pub content: String,
    pub values: Vec<String>,
}

/// Reads a gdb table; `format` names the program in error messages.
pub fn read<R: BufRead>(reader: R, format: Format) -> Result<GdbFile, Error> {
    let mut file = GdbFile {
        format: Some(format),
        ..GdbFile::default()
    };

    for (ln, raw) in collect_lines(reader)? {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (keyword, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let fields = || rest.split_whitespace().map(str::to_string);
        match keyword {
            "REMARK" => file.remarks.push(rest.trim().to_string()),
            "DATA" => {
                let mut values = fields();
                let key = values.next().ok_or_else(|| {
                    Error::parse_line(format, ln, &raw, "DATA line without a key")
                })?;
                file.data.push((key, values.collect()));
            }
            "VARS" => {
                if !file.columns.is_empty() {
                    return Err(Error::parse_line(format, ln, &raw, "second VARS line"));
                }
                file.columns = fields().collect();
                if file.columns.is_empty() {
                    return Err(Error::parse_line(format, ln, &raw, "VARS names no columns"));
                }
                file.vars_line = ln;
            }
            "FORMAT" => file.formats = fields().collect(),
            _ if file.columns.is_empty() => {
                return Err(Error::parse_line(format, ln, &raw, "data row before VARS"));
            }
            _ => {
                let values: Vec<String> = line.split_whitespace().map(str::to_string).collect();
                if values.len() != file.columns.len() {
                    return Err(Error::parse_line(
                        format,
                        ln,
                        &raw,
                        format!(
                            "expected {} fields to match VARS, found {}",
                            file.columns.len(),
                            values.len()
                        ),
                    ));
                }
                file.records.push(GdbRecord {
                    line: ln,
                    content: raw.clone(),
                    values,
                });
            }
        }
    }

    if file.columns.is_empty() {
        return Err(Error::parse(format, 1, "no VARS line"));
    }
    if !file.formats.is_empty() && file.formats.len() != file.columns.len() {
        warn!(
            "{format} table declares {} formats for {} columns",
            file.formats.len(),
            file.columns.len()
        );
    }
    Ok(file)
}

impl GdbFile {
    fn format(&self) -> Format {
        self.format.unwrap_or(Format::NmrPipe)
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Fails on the `VARS` line when any of `names` is not a column.
    pub fn require(&self, names: &[&str]) -> Result<(), Error> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(name) => Err(Error::parse(
                self.format(),
                self.vars_line,
                format!("VARS lacks column '{name}'"),
            )),
            None => Ok(()),
        }
    }

    pub fn value<'a>(&self, record: &'a GdbRecord, column: &str) -> Option<&'a str> {
        self.column(column)
            .and_then(|idx| record.values.get(idx))
            .map(String::as_str)
    }

    /// Parses a column of a record; missing columns and bad values are
    /// reported against the record's line.
    pub fn field<T: FromStr>(&self, record: &GdbRecord, column: &str) -> Result<T, Error> {
        let text = self.value(record, column).ok_or_else(|| {
            Error::parse_line(
                self.format(),
                record.line,
                &record.content,
                format!("missing column '{column}'"),
            )
        })?;
        parse_field(self.format(), record.line, &record.content, text, column)
    }

    /// All values of the `DATA <key>` lines, in order.
    pub fn data_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> {
        self.data
            .iter()
            .filter(move |(k, _)| k == key)
            .flat_map(|(_, values)| values.iter().map(String::as_str))
    }

    /// Residue number of the first `DATA SEQUENCE` letter; 1 when absent.
    pub fn first_residue(&self) -> Result<i32, Error> {
        match self.data_values("FIRST_RESID").next() {
            Some(text) => parse_field(self.format(), self.vars_line, text, text, "FIRST_RESID"),
            None => Ok(1),
        }
    }

    /// `DATA SEQUENCE` expanded into numbered three-letter residue names.
    pub fn sequence(&self) -> Result<Vec<(i32, String)>, Error> {
        let first = self.first_residue()?;
        Ok(self
            .data_values("SEQUENCE")
            .flat_map(str::chars)
            .zip(first..)
            .map(|(code, number)| (number, residue_name_from_code(&code.to_string())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TABLE: &str = "\
REMARK Torsion angle predictions
DATA FIRST_RESID 5
DATA SEQUENCE MQIF
DATA SEQUENCE VK

VARS   RESID RESNAME PHI PSI
FORMAT %4d %s %8.3f %8.3f

   5 M 9999.000 9999.000
   6 Q  -80.500  130.250
";

    #[test]
    fn reads_header_and_records() {
        let file = read(Cursor::new(TABLE), Format::Talos).unwrap();
        assert_eq!(file.remarks, vec!["Torsion angle predictions"]);
        assert_eq!(file.columns, vec!["RESID", "RESNAME", "PHI", "PSI"]);
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[1].line, 9);

        let record = &file.records[1];
        assert_eq!(file.value(record, "RESNAME"), Some("Q"));
        assert_eq!(file.field::<f64>(record, "PHI").unwrap(), -80.5);
        assert!(file.field::<f64>(record, "DIST").is_err());
    }

    #[test]
    fn sequence_spans_data_lines() {
        let file = read(Cursor::new(TABLE), Format::Talos).unwrap();
        let sequence = file.sequence().unwrap();
        assert_eq!(sequence.len(), 6);
        assert_eq!(sequence[0], (5, "MET".to_string()));
        assert_eq!(sequence[5], (10, "LYS".to_string()));
    }

    #[test]
    fn field_count_must_match_vars() {
        let text = "VARS A B C\n1 2\n";
        match read(Cursor::new(text), Format::NmrPipe).unwrap_err() {
            Error::Parse { line, details, .. } => {
                assert_eq!(line, 2);
                assert!(details.contains("expected 3 fields"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn rows_before_vars_are_rejected() {
        assert!(read(Cursor::new("1 2 3\nVARS A B C\n"), Format::Pales).is_err());
        assert!(read(Cursor::new("REMARK only\n"), Format::Pales).is_err());
    }

    #[test]
    fn require_reports_missing_columns() {
        let file = read(Cursor::new("VARS A B\n"), Format::Pales).unwrap();
        assert!(file.require(&["A", "B"]).is_ok());
        assert!(matches!(
            file.require(&["A", "D"]),
            Err(Error::Parse { line: 1, .. })
        ));
    }
}

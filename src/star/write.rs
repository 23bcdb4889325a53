//! NEF/STAR text writer.
//!
//! Frame tags are aligned on one column and loop values are padded per
//! column so the output reads as a table. Values are quoted only when a
//! bare token would not read back as the same string.

use std::fmt;
use std::io;

use super::dom::{Entry, Loop, Saveframe};
use crate::model::residue::UNUSED;

const FRAME_INDENT: &str = "   ";
const LOOP_TAG_INDENT: &str = "      ";
const ROW_INDENT: &str = "     ";

/// Writes `entry` as NEF text.
pub fn write_entry<W: io::Write>(entry: &Entry, mut writer: W) -> io::Result<()> {
    write!(writer, "{entry}")?;
    writer.flush()
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "data_{}", self.name())?;
        for frame in self.frames() {
            writeln!(f)?;
            write_frame(f, frame)?;
        }
        Ok(())
    }
}

impl fmt::Display for Saveframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_frame(f, self)
    }
}

fn write_frame(f: &mut fmt::Formatter<'_>, frame: &Saveframe) -> fmt::Result {
    writeln!(f, "save_{}", frame.name())?;

    let prefix = format!("_{}.", frame.category());
    let width = frame
        .tags()
        .iter()
        .map(|(tag, _)| prefix.len() + tag.len())
        .max()
        .unwrap_or(0);
    for (tag, value) in frame.tags() {
        let value = format_value(value);
        if value.starts_with('\n') {
            writeln!(f, "{FRAME_INDENT}{prefix}{tag}{value}")?;
        } else {
            let full = format!("{prefix}{tag}");
            writeln!(f, "{FRAME_INDENT}{full:<width$}  {value}")?;
        }
    }

    for lp in frame.loops() {
        writeln!(f)?;
        write_loop(f, lp)?;
    }

    writeln!(f)?;
    writeln!(f, "save_")
}

fn write_loop(f: &mut fmt::Formatter<'_>, lp: &Loop) -> fmt::Result {
    writeln!(f, "{FRAME_INDENT}loop_")?;
    for tag in lp.tags() {
        writeln!(f, "{LOOP_TAG_INDENT}_{}.{}", lp.category(), tag)?;
    }
    writeln!(f)?;

    let cells: Vec<Vec<String>> = lp
        .rows()
        .iter()
        .map(|row| row.iter().map(|v| format_value(v)).collect())
        .collect();

    let mut widths = vec![0usize; lp.tags().len()];
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            if !cell.starts_with('\n') {
                *width = (*width).max(cell.len());
            }
        }
    }

    for row in &cells {
        let mut line = String::from(ROW_INDENT);
        let last = row.len().saturating_sub(1);
        for (i, (cell, width)) in row.iter().zip(&widths).enumerate() {
            if cell.starts_with('\n') {
                line.push_str(cell);
                line.push('\n');
                line.push_str(ROW_INDENT);
            } else if i == last {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{cell:<width$} "));
            }
        }
        writeln!(f, "{}", line.trim_end())?;
    }

    writeln!(f)?;
    writeln!(f, "{FRAME_INDENT}stop_")
}

/// Renders one value as a STAR token.
///
/// Multi-line values become `;` text fields (returned with a leading
/// newline so callers can place them on their own lines).
pub fn format_value(value: &str) -> String {
    if value.contains('\n') {
        return format!("\n;{value}\n;");
    }
    if !needs_quoting(value) {
        return value.to_string();
    }
    if !contains_closing(value, '\'') {
        format!("'{value}'")
    } else if !contains_closing(value, '"') {
        format!("\"{value}\"")
    } else {
        format!("\n;{value}\n;")
    }
}

fn needs_quoting(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    if value == UNUSED {
        return false;
    }
    if value.chars().any(char::is_whitespace) {
        return true;
    }
    if value.starts_with(['_', '#', '$', '\'', '"', ';', '[', ']']) {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    ["data_", "save_", "loop_", "stop_", "global_"]
        .iter()
        .any(|kw| lower.starts_with(kw))
}

/// True when `quote` appears followed by whitespace, which would end a
/// quoted token early.
fn contains_closing(value: &str, quote: char) -> bool {
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == quote && chars.peek().is_none_or(|next| next.is_whitespace()) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star::parse;
    use proptest::prelude::*;

    fn sample_entry() -> Entry {
        let mut frame = Saveframe::new("nef_nmr_spectrum", "nef_nmr_spectrum_hsqc");
        frame.add_tag("num_dimensions", "2");
        frame.add_tag("comment", "two words");
        frame.add_tag("details", "first line\nsecond line");
        frame.add_tag("empty", "");

        let mut lp = Loop::with_tags("nef_peak", ["index", "atom_name_1", "note"]).unwrap();
        lp.add_row(["1", "HB%", "."]).unwrap();
        lp.add_row(["2", "_odd", "it's"]).unwrap();
        lp.add_row(["3", "H", "a 'quoted' word"]).unwrap();
        frame.add_loop(lp);

        let mut entry = Entry::new("demo");
        entry.add_frame(frame);
        entry.add_frame(Saveframe::new("nef_nmr_meta_data", "nef_nmr_meta_data"));
        entry
    }

    #[test]
    fn written_entry_reads_back_identically() {
        let entry = sample_entry();
        let text = entry.to_string();
        let reread = parse(&text).unwrap();
        assert_eq!(reread, entry);
    }

    #[test]
    fn unused_and_plain_values_are_bare() {
        assert_eq!(format_value("."), ".");
        assert_eq!(format_value("HB%"), "HB%");
        assert_eq!(format_value("-1.5"), "-1.5");
    }

    #[test]
    fn values_that_would_misparse_are_quoted() {
        assert_eq!(format_value(""), "''");
        assert_eq!(format_value("two words"), "'two words'");
        assert_eq!(format_value("_tag"), "'_tag'");
        assert_eq!(format_value("save_x"), "'save_x'");
        assert_eq!(format_value("it' s"), "\"it' s\"");
        assert_eq!(format_value("a\nb"), "\n;a\nb\n;");
    }

    #[test]
    fn output_has_nef_block_structure() {
        let text = sample_entry().to_string();
        assert!(text.starts_with("data_demo\n"));
        assert!(text.contains("save_nef_nmr_spectrum_hsqc\n"));
        assert!(text.contains("   _nef_nmr_spectrum.sf_category"));
        assert!(text.contains("   loop_\n      _nef_peak.index\n"));
        assert!(text.contains("   stop_\n"));
        assert!(text.trim_end().ends_with("save_"));
    }

    #[test]
    fn write_entry_streams_display_output() {
        let entry = sample_entry();
        let mut buf = Vec::new();
        write_entry(&entry, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), entry.to_string());
    }

    proptest! {
        #[test]
        fn loop_values_survive_a_round_trip(
            rows in prop::collection::vec(
                ("[A-Za-z0-9%.+-]{1,8}", "[A-Za-z0-9%.+-]{1,8}( [A-Za-z0-9']{1,6})?"),
                1..6,
            )
        ) {
            let mut lp = Loop::with_tags("nef_chemical_shift", ["atom_name", "comment"]).unwrap();
            for (atom, comment) in &rows {
                lp.add_row([atom.as_str(), comment.as_str()]).unwrap();
            }
            let mut frame = Saveframe::new("nef_chemical_shift_list", "nef_chemical_shift_list_x");
            frame.add_loop(lp);
            let mut entry = Entry::new("prop");
            entry.add_frame(frame);

            prop_assert_eq!(parse(&entry.to_string()).unwrap(), entry);
        }
    }
}

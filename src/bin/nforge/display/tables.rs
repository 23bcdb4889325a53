use std::io::{self, Write};

use nef_forge::star::{Entry, Saveframe};

use crate::util::text::truncate;

const INDENT: &str = "      ";

const NAME_W: usize = 36;
const CATEGORY_W: usize = 30;
const ROWS_W: usize = 6;

/// Rows of the largest loop; the data loop of every NEF frame kind.
pub fn frame_rows(frame: &Saveframe) -> usize {
    frame.loops().iter().map(|lp| lp.nrows()).max().unwrap_or(0)
}

/// Boxed frame summary on stderr, for interactive runs.
pub fn print_frame_table(entry: &Entry) {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_frame_table(&mut out, entry);
}

fn write_frame_table(out: &mut impl Write, entry: &Entry) {
    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{INDENT}{left}{}{mid}{}{mid}{}{right}",
            "─".repeat(NAME_W + 2),
            "─".repeat(CATEGORY_W + 2),
            "─".repeat(ROWS_W + 2)
        )
    };

    let _ = writeln!(out, "{INDENT}┌─ Entry {} ─┐", truncate(entry.name(), NAME_W));
    let _ = writeln!(out, "{}", rule("┌", "┬", "┐"));
    let _ = writeln!(
        out,
        "{INDENT}│ {:<NAME_W$} │ {:<CATEGORY_W$} │ {:>ROWS_W$} │",
        "Frame", "Category", "Rows"
    );
    let _ = writeln!(out, "{}", rule("├", "┼", "┤"));
    for frame in entry.frames() {
        let _ = writeln!(
            out,
            "{INDENT}│ {:<NAME_W$} │ {:<CATEGORY_W$} │ {:>ROWS_W$} │",
            truncate(frame.name(), NAME_W),
            truncate(frame.category(), CATEGORY_W),
            frame_rows(frame)
        );
    }
    let _ = writeln!(out, "{}", rule("└", "┴", "┘"));
}

/// One `name category rows` line per frame, for scripts.
pub fn write_frame_list(out: &mut impl Write, entry: &Entry) -> io::Result<()> {
    let width = entry
        .frames()
        .iter()
        .map(|f| f.name().len())
        .max()
        .unwrap_or(0);
    for frame in entry.frames() {
        writeln!(
            out,
            "{:<width$}  {:<CATEGORY_W$}  {}",
            frame.name(),
            frame.category(),
            frame_rows(frame)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nef_forge::star::Loop;

    fn entry() -> Entry {
        let mut entry = Entry::new("demo");
        entry.add_frame(Saveframe::new("nef_nmr_meta_data", "nef_nmr_meta_data"));
        let mut frame = Saveframe::new("nef_chemical_shift_list", "nef_chemical_shift_list_hsqc");
        let mut lp = Loop::with_tags("nef_chemical_shift", ["value"]).unwrap();
        lp.add_row(["8.1"]).unwrap();
        lp.add_row(["120.4"]).unwrap();
        frame.add_loop(lp);
        entry.add_frame(frame);
        entry
    }

    #[test]
    fn list_has_one_line_per_frame() {
        let mut out = Vec::new();
        write_frame_list(&mut out, &entry()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<Vec<&str>> = text.lines().map(|l| l.split_whitespace().collect()).collect();
        assert_eq!(
            lines,
            vec![
                vec!["nef_nmr_meta_data", "nef_nmr_meta_data", "0"],
                vec!["nef_chemical_shift_list_hsqc", "nef_chemical_shift_list", "2"],
            ]
        );
    }

    #[test]
    fn table_rows_line_up() {
        let mut out = Vec::new();
        write_frame_table(&mut out, &entry());
        let text = String::from_utf8(out).unwrap();
        let widths: Vec<usize> = text.lines().skip(1).map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(text.contains("nef_chemical_shift_list_hsqc"));
    }
}

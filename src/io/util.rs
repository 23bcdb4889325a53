use super::{Format, error::Error};
use std::io::BufRead;
use std::str::FromStr;

/// Reads all lines, numbering them from 1.
pub(crate) fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| line.map(|v| (i + 1, v)).map_err(|e| Error::Io { source: e }))
        .collect()
}

/// Parses one field, reporting the line and raw content on failure.
pub(crate) fn parse_field<T: FromStr>(
    format: Format,
    line_no: usize,
    raw: &str,
    field: &str,
    what: &str,
) -> Result<T, Error> {
    field
        .parse::<T>()
        .map_err(|_| Error::parse_line(format, line_no, raw, format!("invalid {what} '{field}'")))
}

/// Splits a line into whitespace-separated fields, keeping brace-delimited
/// TCL lists (`{23.HN}`, `{ 600.0 }`, `{}`) as single fields with the outer
/// braces removed.
pub(crate) fn split_tcl_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '{' {
            chars.next();
            let mut depth = 1;
            let mut field = String::new();
            for c in chars.by_ref() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                field.push(c);
            }
            if depth != 0 {
                return Err("unbalanced '{' in list".to_string());
            }
            fields.push(field.trim().to_string());
        } else {
            let mut field = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                if c == '}' {
                    return Err("unexpected '}' outside a list".to_string());
                }
                field.push(c);
                chars.next();
            }
            fields.push(field);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn tcl_lists_are_single_fields() {
        let fields = split_tcl_fields("0 {23.HN} 8.5 {} { 600.0 } {a {b c}}").unwrap();
        assert_eq!(fields, vec!["0", "23.HN", "8.5", "", "600.0", "a {b c}"]);
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(split_tcl_fields("{open").is_err());
        assert!(split_tcl_fields("close}").is_err());
    }

    #[test]
    fn lines_are_numbered_from_one() {
        let lines = collect_lines(Cursor::new("a\nb\n")).unwrap();
        assert_eq!(lines, vec![(1, "a".to_string()), (2, "b".to_string())]);
    }

    #[test]
    fn field_errors_carry_the_raw_line() {
        let err = parse_field::<f64>(Format::Sparky, 4, "G16H 8.x", "8.x", "position").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, ref content, .. } if content == "G16H 8.x"));
    }
}

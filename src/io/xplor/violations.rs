use crate::io::util::{collect_lines, parse_field};
use crate::io::{Format, error::Error};
use crate::model::residue::{AtomLabel, Residue};
use crate::model::restraint::{RestraintViolation, violation_amount};
use std::io::BufRead;
use tracing::{debug, info};

const TERM_MARKER: &str = "restraints in potential term:";
const SUMMARY_MARKER: &str = "number of restraints";
const OR_MARKER: &str = "-- OR --";
/// The dashed rule and the legend line between a term marker and its rows.
const HEADER_LINES: usize = 2;

/// Reads the NOE violation tables of an XPLOR-NIH report.
///
/// Every atom pair of every restraint becomes one [`RestraintViolation`]
/// for `model`; selections without a segment id are placed on `chain_code`.
pub fn read<R: BufRead>(
    reader: R,
    model: usize,
    chain_code: &str,
) -> Result<Vec<RestraintViolation>, Error> {
    let mut parser = Parser {
        model,
        chain_code,
        violations: Vec::new(),
    };
    let mut state = State::Idle;
    for (ln, raw) in collect_lines(reader)? {
        state = parser.step(state, ln, &raw)?;
    }
    info!("read {} restraint violations", parser.violations.len());
    Ok(parser.violations)
}

#[derive(Debug)]
enum State {
    Idle,
    Header { term: String, skip: usize },
    InData { term: String, cursor: Option<Cursor> },
}

/// Position within the current restraint of a term block.
#[derive(Debug, Clone)]
struct Cursor {
    number: usize,
    sub_id: usize,
    pair: usize,
    selections: [Selection; 2],
    /// Column of the second selection group on the last two-group row.
    second_column: usize,
}

impl Cursor {
    fn start(number: usize, second_column: usize) -> Self {
        Self {
            number,
            sub_id: 1,
            pair: 1,
            selections: [Selection::Missing, Selection::Missing],
            second_column,
        }
    }
}

#[derive(Debug, Clone)]
enum Selection {
    Missing,
    /// An insertion-coded residue; rows using it are dropped.
    Skipped,
    Atom(AtomLabel),
}

struct Row<'a> {
    number: Option<usize>,
    groups: Vec<(usize, &'a str)>,
    values: Vec<&'a str>,
}

struct Parser<'a> {
    model: usize,
    chain_code: &'a str,
    violations: Vec<RestraintViolation>,
}

impl Parser<'_> {
    fn step(&mut self, state: State, ln: usize, raw: &str) -> Result<State, Error> {
        if let Some(term) = term_name(raw) {
            debug!("line {ln}: entering potential term '{term}'");
            return Ok(State::Header {
                term,
                skip: HEADER_LINES,
            });
        }

        match state {
            State::Idle => Ok(State::Idle),
            State::Header { term, skip } if skip > 1 => Ok(State::Header {
                term,
                skip: skip - 1,
            }),
            State::Header { term, .. } => Ok(State::InData { term, cursor: None }),
            State::InData { term, cursor } => {
                let trimmed = raw.trim();
                if trimmed.contains(SUMMARY_MARKER) {
                    return Ok(State::Idle);
                }
                if trimmed.is_empty() {
                    return Ok(State::InData { term, cursor });
                }
                if trimmed.starts_with(OR_MARKER) {
                    let Some(cursor) = cursor else {
                        return Err(Error::parse_line(
                            Format::Xplor,
                            ln,
                            raw,
                            "'-- OR --' before any restraint",
                        ));
                    };
                    let cursor = Cursor {
                        sub_id: cursor.sub_id + 1,
                        ..cursor
                    };
                    return Ok(State::InData {
                        term,
                        cursor: Some(cursor),
                    });
                }
                let cursor = self.data_row(&term, cursor, ln, raw)?;
                Ok(State::InData {
                    term,
                    cursor: Some(cursor),
                })
            }
        }
    }

    fn data_row(
        &mut self,
        term: &str,
        cursor: Option<Cursor>,
        ln: usize,
        raw: &str,
    ) -> Result<Cursor, Error> {
        let fail = |details: String| Error::parse_line(Format::Xplor, ln, raw, details);
        let row = split_row(raw).map_err(fail)?;

        let mut cursor = match (row.number, cursor) {
            (Some(number), previous) => {
                Cursor::start(number, previous.map_or(0, |c| c.second_column))
            }
            (None, Some(previous)) => Cursor {
                pair: previous.pair + 1,
                ..previous
            },
            (None, None) => return Err(fail("row continues no numbered restraint".to_string())),
        };

        match row.groups.as_slice() {
            [] => {}
            [(column, text)] => {
                let side = usize::from(*column >= cursor.second_column);
                cursor.selections[side] = parse_selection(text, self.chain_code).map_err(fail)?;
            }
            [(_, first), (column, second)] => {
                cursor.selections = [
                    parse_selection(first, self.chain_code).map_err(fail)?,
                    parse_selection(second, self.chain_code).map_err(fail)?,
                ];
                cursor.second_column = *column;
            }
            groups => {
                return Err(fail(format!(
                    "expected at most two selections, found {}",
                    groups.len()
                )));
            }
        }

        if row.values.len() < 4 {
            return Err(fail(format!(
                "expected calculated, target, lower and upper values, found {} numbers",
                row.values.len()
            )));
        }
        let mut values = [0.0; 4];
        for (slot, text) in values.iter_mut().zip(&row.values) {
            *slot = parse_field(Format::Xplor, ln, raw, text, "restraint value")?;
        }
        let [calculated, target, lower, upper] = values;

        let atoms = match &cursor.selections {
            [Selection::Atom(a), Selection::Atom(b)] => Some([a.clone(), b.clone()]),
            [Selection::Skipped, _] | [_, Selection::Skipped] => None,
            _ => return Err(fail("row has no selection to reuse".to_string())),
        };
        let Some(atoms) = atoms else {
            debug!(
                "line {ln}: skipping pair {} of restraint {} (insertion code)",
                cursor.pair, cursor.number
            );
            return Ok(cursor);
        };

        self.violations.push(RestraintViolation {
            model: self.model,
            list_name: term.to_string(),
            restraint_number: cursor.number,
            sub_id: cursor.sub_id,
            pair_number: cursor.pair,
            atoms,
            calculated,
            target,
            lower,
            upper,
            violation: violation_amount(calculated, lower, upper),
        });
        Ok(cursor)
    }
}

fn term_name(line: &str) -> Option<String> {
    let (_, rest) = line.split_once(TERM_MARKER)?;
    rest.split_whitespace().next().map(str::to_string)
}

/// Splits a data row into its restraint number, bracketed selection groups
/// (with their column) and the trailing numbers. Rows without a selection
/// carry no restraint number.
fn split_row(raw: &str) -> Result<Row<'_>, String> {
    let mut groups = Vec::new();
    let mut search = 0;
    while let Some(open) = raw[search..].find('(').map(|i| i + search) {
        let close = raw[open..]
            .find(')')
            .map(|i| i + open)
            .ok_or_else(|| "unclosed '(' in selection".to_string())?;
        groups.push((open, raw[open + 1..close].trim()));
        search = close + 1;
    }

    let head = groups.first().map_or("", |(open, _)| &raw[..*open]);
    let head: Vec<&str> = head.split_whitespace().filter(|t| *t != "*").collect();
    let number = match head.as_slice() {
        [] => None,
        [token] => Some(
            token
                .trim_start_matches('*')
                .parse::<usize>()
                .map_err(|_| format!("invalid restraint number '{token}'"))?,
        ),
        _ => return Err(format!("unexpected text before selections: '{}'", head.join(" "))),
    };

    let values = raw[search..]
        .split_whitespace()
        .filter(|t| *t != "*")
        .collect();
    Ok(Row {
        number,
        groups,
        values,
    })
}

fn parse_selection(text: &str, chain_code: &str) -> Result<Selection, String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (chain, resid, resname, atom) = match tokens.as_slice() {
        [chain, resid, resname, atom] => (*chain, *resid, *resname, *atom),
        [resid, resname, atom] => (chain_code, *resid, *resname, *atom),
        _ => {
            return Err(format!(
                "selection '({text})' is not '[chain] resid resname atom'"
            ));
        }
    };
    if resid.contains('+') {
        debug!("ignoring insertion-coded residue '{resid}'");
        return Ok(Selection::Skipped);
    }
    let number: i32 = resid
        .parse()
        .map_err(|_| format!("invalid residue number '{resid}'"))?;
    let residue = Residue::new(chain, number, resname.to_ascii_uppercase());
    Ok(Selection::Atom(AtomLabel::new(
        residue,
        atom.to_ascii_uppercase(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nef::collapse::DEFAULT_COLLAPSE_DEPTH;
    use crate::nef::restraints::collapse_violations;
    use std::io::Cursor as TextCursor;

    const REPORT: &str = "\
 ==================== summary ====================
 NOE restraints in potential term: noe (fmt: calc target lower upper viol)
 -------------------------------------------------------------------------

 *   1 ( A 24 LEU HB2 ) ( A 30 ALA HA )      5.600   3.500   1.800   5.000   0.600
       ( A 24 LEU HB3 )                      5.600   3.500   1.800   5.000   0.600
     2 ( A 10 GLY HA2 ) ( A 12 LYS H  )      2.000   3.000   1.800   4.000   0.000
   -- OR --
       (   10 GLY HA3 ) ( A 12 LYS H  )      2.000   3.000   1.800   4.000   0.000
     3 ( A 5+ SER HB2 ) ( A 40 VAL HA )      9.000   3.000   1.800   4.000   5.000
 number of restraints: 3
     9 ( A 1 MET H ) ( A 2 ALA H )           1.0 1.0 1.0 1.0
";

    fn read_report(text: &str) -> Result<Vec<RestraintViolation>, Error> {
        read(TextCursor::new(text), 1, "A")
    }

    #[test]
    fn reads_numbers_sub_ids_and_pairs() {
        let violations = read_report(REPORT).unwrap();
        assert_eq!(violations.len(), 4);

        let keys: Vec<(usize, usize, usize)> = violations
            .iter()
            .map(|v| (v.restraint_number, v.sub_id, v.pair_number))
            .collect();
        assert_eq!(keys, vec![(1, 1, 1), (1, 1, 2), (2, 1, 1), (2, 2, 2)]);
        assert!(violations.iter().all(|v| v.list_name == "noe" && v.model == 1));
    }

    #[test]
    fn lone_selection_replaces_its_column() {
        let violations = read_report(REPORT).unwrap();
        let second = &violations[1];
        assert_eq!(second.atoms[0].atom_name, "HB3");
        assert_eq!(second.atoms[1].atom_name, "HA");
        assert_eq!(second.atoms[1].residue.residue_name, "ALA");
    }

    #[test]
    fn selections_without_chain_use_the_default() {
        let violations = read_report(REPORT).unwrap();
        assert_eq!(violations[3].atoms[0].residue.chain_code, "A");
        assert_eq!(violations[3].atoms[0].atom_name, "HA3");
    }

    #[test]
    fn violation_is_recomputed_from_bounds() {
        let violations = read_report(REPORT).unwrap();
        assert!((violations[0].violation - 0.6).abs() < 1e-9);
        assert_eq!(violations[2].violation, 0.0);
    }

    #[test]
    fn insertion_coded_rows_are_skipped() {
        let violations = read_report(REPORT).unwrap();
        assert!(violations.iter().all(|v| v.restraint_number != 3));
    }

    #[test]
    fn rows_after_the_summary_are_ignored() {
        let violations = read_report(REPORT).unwrap();
        assert!(violations.iter().all(|v| v.restraint_number != 9));
    }

    #[test]
    fn or_alternatives_collapse_to_wildcards() {
        let violations = read_report(REPORT).unwrap();
        let collapsed = collapse_violations(&violations, DEFAULT_COLLAPSE_DEPTH);
        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].atoms[0].atom_name, "HB%");
        assert_eq!(collapsed[0].atoms[1].atom_name, "HA");
        assert_eq!(collapsed[1].atoms[0].atom_name, "HA%");
    }

    fn block(rows: &str) -> String {
        format!(" NOE restraints in potential term: noe\n ----\n\n{rows}")
    }

    #[test]
    fn bad_residue_numbers_are_fatal() {
        let text = block("   1 ( A x SER HB2 ) ( A 2 ALA H ) 1.0 1.0 1.0 1.0\n");
        match read_report(&text).unwrap_err() {
            Error::Parse { line, details, .. } => {
                assert_eq!(line, 4);
                assert!(details.contains("'x'"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn short_value_lists_are_fatal() {
        let text = block("   1 ( A 1 SER HB2 ) ( A 2 ALA H ) 1.0 1.0\n");
        assert!(matches!(
            read_report(&text),
            Err(Error::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn continuation_without_restraint_is_fatal() {
        let text = block("     ( A 1 SER HB2 ) 1.0 1.0 1.0 1.0\n");
        assert!(matches!(
            read_report(&text),
            Err(Error::Parse { line: 4, .. })
        ));
    }

    #[test]
    fn text_outside_term_blocks_is_ignored() {
        assert!(read_report("remarks\n 1 ( A 1 SER H ) oops\n").unwrap().is_empty());
    }
}

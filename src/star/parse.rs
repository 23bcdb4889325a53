//! NEF/STAR text reader.
//!
//! Tokenizes bare, single-quoted, double-quoted and semicolon-delimited
//! values, `#` comments and the `data_`, `save_`, `loop_` and `stop_`
//! keywords, then assembles the first data block into an [`Entry`].

use std::str::FromStr;

use super::dom::{Entry, Loop, SF_CATEGORY, Saveframe};
use super::error::Error;

/// Parses NEF text into an [`Entry`]; only the first data block is read.
pub fn parse(input: &str) -> Result<Entry, Error> {
    Parser::new(input).parse_entry()
}

impl FromStr for Entry {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    DataBlock(String),
    LoopStart,
    LoopStop,
    SaveStart(String),
    SaveEnd,
    Tag(String),
    Val(String),
    Eof,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::DataBlock(name) => format!("'data_{name}'"),
            Token::LoopStart => "'loop_'".to_string(),
            Token::LoopStop => "'stop_'".to_string(),
            Token::SaveStart(name) => format!("'save_{name}'"),
            Token::SaveEnd => "'save_'".to_string(),
            Token::Tag(tag) => format!("tag '{tag}'"),
            Token::Val(value) => format!("value '{value}'"),
            Token::Eof => "end of input".to_string(),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    at_line_start: bool,
    pending: Option<(Token, usize)>,
}

struct RawLoop {
    category: String,
    tags: Vec<String>,
    values: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            pos: 0,
            at_line_start: true,
            pending: None,
        }
    }

    fn line_at(&self, pos: usize) -> usize {
        self.bytes[..pos.min(self.bytes.len())]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1
    }

    fn next(&mut self) -> Result<(Token, usize), Error> {
        if let Some(t) = self.pending.take() {
            return Ok(t);
        }
        self.scan_token()
    }

    fn push_back(&mut self, token: Token, pos: usize) {
        debug_assert!(self.pending.is_none());
        self.pending = Some((token, pos));
    }

    fn unexpected(&self, token: &Token, pos: usize, context: &'static str) -> Error {
        Error::Unexpected {
            line: self.line_at(pos),
            found: token.describe(),
            context,
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.pos += 1;
                    self.at_line_start = true;
                }
                b'#' => {
                    while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    fn scan_token(&mut self) -> Result<(Token, usize), Error> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        if self.pos >= self.bytes.len() {
            return Ok((Token::Eof, start));
        }

        let b = self.bytes[self.pos];

        if b == b';' && self.at_line_start {
            return Ok((self.scan_semicolon_text()?, start));
        }

        self.at_line_start = false;

        if b == b'\'' || b == b'"' {
            return Ok((self.scan_quoted(b)?, start));
        }

        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        Ok((classify_unquoted(&self.input[start..self.pos]), start))
    }

    fn scan_quoted(&mut self, quote: u8) -> Result<Token, Error> {
        let start = self.pos;
        self.pos += 1;
        loop {
            if self.pos >= self.bytes.len() || self.bytes[self.pos] == b'\n' {
                return Err(Error::UnterminatedQuote {
                    line: self.line_at(start),
                });
            }
            if self.bytes[self.pos] == quote
                && (self.pos + 1 >= self.bytes.len()
                    || self.bytes[self.pos + 1].is_ascii_whitespace())
            {
                let value = self.input[start + 1..self.pos].to_string();
                self.pos += 1;
                return Ok(Token::Val(value));
            }
            self.pos += 1;
        }
    }

    fn scan_semicolon_text(&mut self) -> Result<Token, Error> {
        let start = self.pos;
        self.pos += 1;
        self.at_line_start = false;
        let content_start = self.pos;

        loop {
            while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
                self.pos += 1;
            }
            if self.pos >= self.bytes.len() {
                return Err(Error::UnterminatedTextField {
                    line: self.line_at(start),
                });
            }
            self.pos += 1;

            if self.pos < self.bytes.len() && self.bytes[self.pos] == b';' {
                let content_end = self.pos - 1;
                let text = self.input[content_start..content_end]
                    .trim_end_matches('\r')
                    .to_string();
                self.pos += 1;
                return Ok(Token::Val(text));
            }
        }
    }

    fn parse_entry(&mut self) -> Result<Entry, Error> {
        let mut entry = loop {
            match self.next()? {
                (Token::DataBlock(name), _) => break Entry::new(name),
                (Token::Eof, _) => return Err(Error::MissingDataBlock),
                (token, pos) => {
                    return Err(self.unexpected(&token, pos, "expected a data_ block"));
                }
            }
        };

        loop {
            match self.next()? {
                (Token::Eof, _) | (Token::DataBlock(_), _) => break,
                (Token::SaveStart(name), _) => {
                    let frame = self.parse_frame(name)?;
                    entry.add_frame(frame);
                }
                (token, pos) => {
                    return Err(self.unexpected(&token, pos, "expected a save_ frame"));
                }
            }
        }
        Ok(entry)
    }

    fn parse_frame(&mut self, name: String) -> Result<Saveframe, Error> {
        let mut frame_category: Option<String> = None;
        let mut tags: Vec<(String, String)> = Vec::new();
        let mut loops: Vec<RawLoop> = Vec::new();

        loop {
            let (token, pos) = self.next()?;
            match token {
                Token::SaveEnd => break,
                Token::LoopStart => loops.push(self.parse_loop(pos)?),
                Token::Tag(full) => {
                    let (category, tag) = split_tag(&full);
                    match &frame_category {
                        None => frame_category = Some(category.to_string()),
                        Some(expected) if expected != category => {
                            return Err(Error::ForeignTag {
                                line: self.line_at(pos),
                                category: expected.clone(),
                                tag: full,
                            });
                        }
                        Some(_) => {}
                    }
                    match self.next()? {
                        (Token::Val(value), _) => tags.push((tag.to_string(), value)),
                        (other, vpos) => {
                            return Err(self.unexpected(&other, vpos, "expected a tag value"));
                        }
                    }
                }
                other => return Err(self.unexpected(&other, pos, "inside a save_ frame")),
            }
        }

        let category = tags
            .iter()
            .find(|(tag, _)| tag == SF_CATEGORY)
            .map(|(_, value)| value.clone())
            .or(frame_category)
            .unwrap_or_else(|| name.clone());

        let mut frame = Saveframe::new(category, name);
        for (tag, value) in tags {
            frame.add_tag(tag, value);
        }
        for raw in loops {
            let mut lp = Loop::with_tags(raw.category, raw.tags)?;
            let width = lp.tags().len();
            for row in raw.values.chunks(width) {
                lp.add_row(row.iter().cloned())?;
            }
            frame.add_loop(lp);
        }
        Ok(frame)
    }

    fn parse_loop(&mut self, loop_pos: usize) -> Result<RawLoop, Error> {
        let mut category: Option<String> = None;
        let mut tags = Vec::new();

        loop {
            let (token, pos) = self.next()?;
            match token {
                Token::Tag(full) => {
                    let (cat, tag) = split_tag(&full);
                    match &category {
                        None => category = Some(cat.to_string()),
                        Some(expected) if expected != cat => {
                            return Err(Error::ForeignTag {
                                line: self.line_at(pos),
                                category: expected.clone(),
                                tag: full,
                            });
                        }
                        Some(_) => {}
                    }
                    tags.push(tag.to_string());
                }
                other => {
                    self.push_back(other, pos);
                    break;
                }
            }
        }

        let Some(category) = category else {
            let (token, pos) = self.next()?;
            return Err(self.unexpected(&token, pos, "expected loop tags after loop_"));
        };

        let mut values = Vec::new();
        let end_pos = loop {
            let (token, pos) = self.next()?;
            match token {
                Token::Val(value) => values.push(value),
                Token::LoopStop => break pos,
                other => {
                    self.push_back(other, pos);
                    break pos;
                }
            }
        };

        if values.len() % tags.len() != 0 {
            return Err(Error::LoopValueCount {
                line: self.line_at(end_pos.max(loop_pos)),
                category,
                tags: tags.len(),
                values: values.len(),
            });
        }

        Ok(RawLoop {
            category,
            tags,
            values,
        })
    }
}

/// Splits `_category.tag` into its parts; a tag without a dot has an empty
/// category.
fn split_tag(full: &str) -> (&str, &str) {
    let body = full.strip_prefix('_').unwrap_or(full);
    match body.split_once('.') {
        Some((category, tag)) => (category, tag),
        None => ("", body),
    }
}

fn classify_unquoted(s: &str) -> Token {
    let lower = s.to_ascii_lowercase();
    if let Some(name) = lower.strip_prefix("data_").map(|_| &s[5..]) {
        Token::DataBlock(name.to_string())
    } else if lower == "loop_" {
        Token::LoopStart
    } else if lower == "stop_" {
        Token::LoopStop
    } else if lower.starts_with("save_") {
        if s.len() == 5 {
            Token::SaveEnd
        } else {
            Token::SaveStart(s[5..].to_string())
        }
    } else if s.starts_with('_') {
        Token::Tag(s.to_string())
    } else {
        Token::Val(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "\
data_test

save_nef_molecular_system
   _nef_molecular_system.sf_category   nef_molecular_system
   _nef_molecular_system.sf_framecode  nef_molecular_system

   loop_
      _nef_sequence.index
      _nef_sequence.chain_code
      _nef_sequence.residue_name

      1 A ALA
      2 A 'GLY X'   # trailing comment
   stop_
save_
";

    #[test]
    fn parses_frames_tags_and_loops() {
        let entry = parse(SMALL).unwrap();
        assert_eq!(entry.name(), "test");
        let frame = entry.frame("nef_molecular_system").unwrap();
        assert_eq!(frame.category(), "nef_molecular_system");

        let lp = frame.get_loop("nef_sequence").unwrap();
        assert_eq!(lp.tags(), ["index", "chain_code", "residue_name"]);
        assert_eq!(lp.nrows(), 2);
        assert_eq!(lp.rows()[1], vec!["2", "A", "GLY X"]);
    }

    #[test]
    fn semicolon_text_fields_span_lines() {
        let input = "data_t\nsave_x_a\n_x.sf_category x\n_x.note\n;line one\nline two\n;\nsave_\n";
        let entry = parse(input).unwrap();
        assert_eq!(
            entry.frame("x_a").and_then(|f| f.tag("note")),
            Some("line one\nline two")
        );
    }

    #[test]
    fn quotes_close_only_before_whitespace() {
        let input = "data_t\nsave_x_a\n_x.sf_category x\n_x.note 'it's here'\nsave_\n";
        let entry = parse(input).unwrap();
        assert_eq!(
            entry.frame("x_a").and_then(|f| f.tag("note")),
            Some("it's here")
        );
    }

    #[test]
    fn missing_data_block_is_an_error() {
        assert_eq!(parse("# nothing\n"), Err(Error::MissingDataBlock));
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = parse("data_t\nsave_x\n_x.a 'open\nsave_\n").unwrap_err();
        assert_eq!(err, Error::UnterminatedQuote { line: 3 });
    }

    #[test]
    fn unterminated_text_field_reports_line() {
        let err = parse("data_t\nsave_x\n_x.a\n;never closed\n").unwrap_err();
        assert_eq!(err, Error::UnterminatedTextField { line: 4 });
    }

    #[test]
    fn ragged_loop_is_rejected() {
        let input = "data_t\nsave_x\nloop_\n_l.a\n_l.b\n1 2 3\nstop_\nsave_\n";
        assert!(matches!(
            parse(input),
            Err(Error::LoopValueCount {
                tags: 2,
                values: 3,
                ..
            })
        ));
    }

    #[test]
    fn loop_tags_must_share_a_category() {
        let input = "data_t\nsave_x\nloop_\n_l.a\n_m.b\n1 2\nstop_\nsave_\n";
        assert!(matches!(parse(input), Err(Error::ForeignTag { line: 5, .. })));
    }

    #[test]
    fn stray_value_is_unexpected() {
        let err = parse("data_t\nsave_x\nvalue\nsave_\n").unwrap_err();
        assert!(matches!(err, Error::Unexpected { line: 3, .. }));
    }
}

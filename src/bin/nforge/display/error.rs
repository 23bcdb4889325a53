use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

const WIDTH: usize = 76;

pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(render_error(err).as_bytes());
}

/// `ERROR: <message>`, the chain of causes, hints, then `exiting...`.
fn render_error(err: &Error) -> String {
    let mut out = String::new();
    out.push_str(&format!("ERROR: {err}\n"));

    for cause in err.chain().skip(1) {
        let text = cause.to_string();
        let mut lines = text.lines();
        if let Some(first) = lines.next() {
            out.push_str(&format!("  caused by: {first}\n"));
        }
        for line in lines {
            out.push_str(&format!("    {}\n", line.trim()));
        }
    }

    if let Some(hints) = HintCollector::collect(err) {
        out.push_str("  hints:\n");
        for hint in hints {
            let wrapped = wrap(&hint, WIDTH - 6);
            if let Some((first, rest)) = wrapped.split_first() {
                out.push_str(&format!("    - {first}\n"));
                for line in rest {
                    out.push_str(&format!("      {line}\n"));
                }
            }
        }
    }

    out.push_str("exiting...\n");
    out
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<nef_forge::io::Error>() {
                collector.collect_io_hints(io_err);
            } else if let Some(nef_err) = cause.downcast_ref::<nef_forge::nef::Error>() {
                collector.collect_nef_hints(nef_err);
            } else if let Some(star_err) = cause.downcast_ref::<nef_forge::star::Error>() {
                collector.collect_star_hints(star_err);
            } else if let Some(std_err) = cause.downcast_ref::<std::io::Error>() {
                collector.mark_typed();
                collector.collect_std_io_hints(std_err);
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        let hint = hint.into();
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, io_err: &nef_forge::io::Error) {
        use nef_forge::io::Error as IoError;

        match io_err {
            // the wrapped errors are visited on their own
            IoError::Io { .. } | IoError::Nef(_) => {}

            IoError::Parse { format, line, .. } => {
                self.mark_typed();
                self.add(format!(
                    "The {format} reader stopped near line {line}; inspect the file around it"
                ));
                self.add_format_specific_parse_hints(*format);
            }
        }
    }

    fn add_format_specific_parse_hints(&mut self, format: nef_forge::io::Format) {
        use nef_forge::io::Format;

        match format {
            Format::NmrView => {
                self.add("NMRView: the first line lists the header keys and must include 'label'");
                self.add("NMRView: each peak row needs an id plus one value per column");
            }

            Format::Sparky => {
                self.add("Sparky: the header starts with 'Assignment' followed by w1, w2, ...");
                self.add("Sparky: assignments look like G16H-N, one part per dimension");
            }

            Format::Xplor => {
                self.add("XPLOR: selections look like (A 12 LEU HB2) or (12 LEU HB2)");
                self.add("XPLOR: the row after the second selection needs calc, target, lower and upper values");
            }

            Format::NmrPipe | Format::Pales | Format::Talos => {
                self.add("Every data row needs one value per VARS column");
                self.add("DATA, REMARK, VARS and FORMAT lines must come before the rows they describe");
            }
        }
    }

    fn collect_nef_hints(&mut self, nef_err: &nef_forge::nef::Error) {
        use nef_forge::nef::Error as NefError;

        self.mark_typed();

        match nef_err {
            NefError::DimensionMismatch { .. } => {
                self.add("Every peak of a list must assign the same number of dimensions");
                self.add("Check for rows with missing or extra position columns");
            }

            NefError::BadPosition { .. } => {
                self.add("Peak positions must be numbers in ppm");
            }

            NefError::MissingLoop { .. } | NefError::MissingColumn { .. } => {
                self.add("The entry is missing data this command needs");
                self.add("List the frames of the entry with 'nforge nef frames'");
            }

            NefError::BadValue { .. } => {
                self.add("A value in the entry could not be decoded; check the frame named above");
            }

            NefError::FrameNotFound { .. } => {
                self.add("Select a frame with --frame using its full name or its suffix");
                self.add("List the frames of the entry with 'nforge nef frames'");
            }

            NefError::AmbiguousFrame { .. } => {
                self.add("Use a longer --frame selector or the full frame name");
            }

            NefError::ChainCodesExhausted => {
                self.add("Pass an explicit chain code with --chain");
            }

            NefError::Config(_) => {
                self.add("Check the TOML given with --config for typos and value types");
                self.add("Known keys: default_chain_code, collapse_depth, [spectrum] margin, proton_frequency, folding");
            }

            // transparent, so the STAR error never shows up in the chain
            NefError::Star(star_err) => self.collect_star_hints(star_err),
        }
    }

    fn collect_star_hints(&mut self, star_err: &nef_forge::star::Error) {
        use nef_forge::star::Error as StarError;

        self.mark_typed();

        match star_err {
            StarError::UnterminatedQuote { .. } | StarError::UnterminatedTextField { .. } => {
                self.add("A quoted value or ;-delimited text block is never closed");
            }

            StarError::MissingDataBlock => {
                self.add("A NEF entry starts with a data_<name> line");
                self.add("Pass the entry with --in or pipe it on stdin");
            }

            StarError::LoopValueCount { .. } | StarError::RowLength { .. } => {
                self.add("Every loop row needs one value per loop tag");
            }

            StarError::Unexpected { .. } | StarError::ForeignTag { .. } => {
                self.add("The NEF text is malformed; inspect it around the line named above");
            }

            StarError::DuplicateTag { .. } | StarError::TagAfterRows { .. } => {
                self.add("The entry could not be assembled; this is likely a bug, please report it");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }

            ErrorKind::InvalidData => {
                self.add("File is not valid UTF-8 text");
                self.add("Check that the file is a text export of the program");
            }

            ErrorKind::BrokenPipe => {
                self.add("The consumer of stdout exited before reading everything");
            }

            _ => {
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

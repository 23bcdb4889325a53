//! Entry header and frame selection.

use super::error::Error;
use crate::model::residue::UNUSED;
use crate::star::{Entry, Saveframe};

pub const META_DATA: &str = "nef_nmr_meta_data";
pub const FORMAT_NAME: &str = "nmr_exchange_format";
pub const FORMAT_VERSION: &str = "1.1";

/// Builds the `nef_nmr_meta_data` header frame.
pub fn header_frame(program: &str, version: &str) -> Saveframe {
    let mut frame = Saveframe::new(META_DATA, META_DATA);
    frame.add_tag("format_name", FORMAT_NAME);
    frame.add_tag("format_version", FORMAT_VERSION);
    frame.add_tag("program_name", program);
    frame.add_tag("program_version", version);
    frame.add_tag("creation_date", UNUSED);
    frame.add_tag("uuid", UNUSED);
    frame
}

/// A fresh entry holding only a header.
pub fn new_entry(name: &str, program: &str, version: &str) -> Entry {
    let mut entry = Entry::new(name);
    entry.add_frame(header_frame(program, version));
    entry
}

/// Picks exactly one frame of `category`.
///
/// Without a selector the category must hold a single frame. A selector
/// matches a frame by full name or by the suffix after the category; failing
/// that, by substring. No match or several matches are errors listing the
/// candidates.
pub fn select_frame<'a>(
    entry: &'a Entry,
    category: &str,
    selector: Option<&str>,
) -> Result<&'a Saveframe, Error> {
    let candidates: Vec<&Saveframe> = entry.frames_in_category(category).collect();
    let names = |frames: &[&Saveframe]| -> Vec<String> {
        frames.iter().map(|f| f.name().to_string()).collect()
    };

    let matches: Vec<&Saveframe> = match selector {
        None => candidates.clone(),
        Some(selector) => {
            let exact: Vec<&Saveframe> = candidates
                .iter()
                .copied()
                .filter(|f| f.name() == selector || f.suffix() == selector)
                .collect();
            if exact.is_empty() {
                candidates
                    .iter()
                    .copied()
                    .filter(|f| f.name().contains(selector))
                    .collect()
            } else {
                exact
            }
        }
    };

    match matches.as_slice() {
        [frame] => Ok(*frame),
        [] => Err(Error::FrameNotFound {
            category: category.to_string(),
            selector: selector.unwrap_or("*").to_string(),
            available: names(&candidates),
        }),
        several => Err(Error::AmbiguousFrame {
            category: category.to_string(),
            selector: selector.unwrap_or("*").to_string(),
            matches: names(several),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> Entry {
        let mut entry = new_entry("test", "nef-forge", "0.1.0");
        for name in ["hsqc", "hnca", "hncaco"] {
            entry.add_frame(Saveframe::new(
                "nef_nmr_spectrum",
                format!("nef_nmr_spectrum_{name}"),
            ));
        }
        entry
    }

    #[test]
    fn header_carries_program_and_format() {
        let frame = header_frame("nef-forge", "0.1.0");
        assert_eq!(frame.category(), META_DATA);
        assert_eq!(frame.tag("format_name"), Some(FORMAT_NAME));
        assert_eq!(frame.tag("program_name"), Some("nef-forge"));
        assert_eq!(frame.tag("uuid"), Some("."));
    }

    #[test]
    fn exact_suffix_beats_substring() {
        let entry = entry();
        let frame = select_frame(&entry, "nef_nmr_spectrum", Some("hnca")).unwrap();
        assert_eq!(frame.name(), "nef_nmr_spectrum_hnca");
    }

    #[test]
    fn substring_selects_when_unique() {
        let entry = entry();
        let frame = select_frame(&entry, "nef_nmr_spectrum", Some("sq")).unwrap();
        assert_eq!(frame.name(), "nef_nmr_spectrum_hsqc");
    }

    #[test]
    fn ambiguous_selection_lists_matches() {
        let entry = entry();
        match select_frame(&entry, "nef_nmr_spectrum", Some("hn")).unwrap_err() {
            Error::AmbiguousFrame { matches, .. } => {
                assert_eq!(matches, vec!["nef_nmr_spectrum_hnca", "nef_nmr_spectrum_hncaco"]);
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(matches!(
            select_frame(&entry, "nef_nmr_spectrum", None),
            Err(Error::AmbiguousFrame { .. })
        ));
    }

    #[test]
    fn missing_selection_lists_available() {
        let entry = entry();
        match select_frame(&entry, "nef_nmr_spectrum", Some("noesy")).unwrap_err() {
            Error::FrameNotFound { available, .. } => assert_eq!(available.len(), 3),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn single_frame_needs_no_selector() {
        let entry = entry();
        assert_eq!(
            select_frame(&entry, META_DATA, None).unwrap().name(),
            META_DATA
        );
    }
}

//! Peak lists to and from `nef_nmr_spectrum` frames.
//!
//! Exported spectra get synthetic acquisition metadata: the spectrometer
//! frequency of each axis is derived from the proton frequency and the
//! axis isotope, and the spectral window is the observed shift range
//! widened by a margin. These windows bound the peaks; they are not the
//! original acquisition parameters.

use std::collections::BTreeSet;
use std::str::FromStr;

use tracing::{info, warn};

use super::config::SpectrumConfig;
use super::error::Error;
use super::shifts::SHIFT_LIST;
use super::values::{atom_cells, atom_tags, bool_str, opt_f64, read_atom, read_f64};
use crate::model::peak::{DimensionInfo, NewPeak, PPM};
use crate::model::residue::UNUSED;
use crate::model::shift::ShiftData;
use crate::model::types::Isotope;
use crate::star::{Loop, Saveframe};

pub const SPECTRUM: &str = "nef_nmr_spectrum";
pub const DIMENSION_LOOP: &str = "nef_spectrum_dimension";
pub const TRANSFER_LOOP: &str = "nef_spectrum_dimension_transfer";
pub const PEAK_LOOP: &str = "nef_peak";

const FIGURE_OF_MERIT: &str = "ccpn_figure_of_merit";
const COMMENT: &str = "ccpn_comment";
const ONE_BOND: &str = "onebond";

const DIMENSION_TAGS: [&str; 9] = [
    "dimension_id",
    "axis_unit",
    "axis_code",
    "spectrometer_frequency",
    "spectral_width",
    "value_first_point",
    "folding",
    "absolute_peak_positions",
    "is_acquisition",
];

const TRANSFER_TAGS: [&str; 4] = ["dimension_1", "dimension_2", "transfer_type", "is_indirect"];

/// Synthesized window of one spectral axis.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Window {
    sweep_width: f64,
    value_first_point: f64,
}

/// Spectral window bounding `values`, widened by `margin`.
///
/// The first point sits at the high-ppm edge, as spectra are conventionally
/// referenced.
fn spectral_window(values: impl Iterator<Item = f64>, margin: f64) -> Option<Window> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;
    let width = max - min;
    let midpoint = (max + min) / 2.0;
    Some(Window {
        sweep_width: width * margin,
        value_first_point: midpoint + (width / 2.0) * margin,
    })
}

/// Spectrometer frequency of an axis: the recorded value, or the proton
/// frequency scaled by the axis isotope's gyromagnetic ratio.
fn axis_frequency(dimension: &DimensionInfo, proton_frequency: f64) -> Option<f64> {
    dimension.spectrometer_frequency.or_else(|| {
        Isotope::from_str(&dimension.axis_code)
            .ok()
            .map(|isotope| proton_frequency * isotope.gamma_ratio())
    })
}

fn check_dimensions(
    origin: &str,
    peaks: &[NewPeak],
    dimensions: &[DimensionInfo],
) -> Result<(), Error> {
    let mut counts: BTreeSet<usize> = peaks.iter().map(NewPeak::dimensions).collect();
    counts.insert(dimensions.len());
    if counts.len() > 1 {
        return Err(Error::DimensionMismatch {
            origin: origin.to_string(),
            counts: counts.into_iter().collect(),
        });
    }
    Ok(())
}

/// Builds a `nef_nmr_spectrum_<name>` frame from peaks and their axes.
///
/// Every peak must have one shift per entry of `dimensions`; otherwise
/// nothing is built and [`Error::DimensionMismatch`] lists the counts seen.
pub fn peaks_to_frame(
    name: &str,
    peaks: &[NewPeak],
    dimensions: &[DimensionInfo],
    proton_frequency: f64,
    config: &SpectrumConfig,
) -> Result<Saveframe, Error> {
    let frame_name = format!("{SPECTRUM}_{name}");
    check_dimensions(&frame_name, peaks, dimensions)?;
    let num_dimensions = dimensions.len();

    let mut frame = Saveframe::new(SPECTRUM, frame_name);
    frame.add_tag("num_dimensions", num_dimensions.to_string());
    frame.add_tag("chemical_shift_list", UNUSED);

    let mut dimension_loop = Loop::with_tags(DIMENSION_LOOP, DIMENSION_TAGS)?;
    for (i, dimension) in dimensions.iter().enumerate() {
        let frequency = axis_frequency(dimension, proton_frequency);
        if frequency.is_none() {
            warn!(
                "no spectrometer frequency for axis '{}' of {}",
                dimension.axis_code,
                frame.name()
            );
        }
        let window = spectral_window(peaks.iter().map(|p| p.shifts[i].value), config.margin);
        let is_acquisition = i + 1 == num_dimensions;
        dimension_loop.add_row([
            (i + 1).to_string(),
            dimension.axis_unit.clone(),
            dimension.axis_code.clone(),
            opt_f64(frequency),
            opt_f64(window.map(|w| w.sweep_width)),
            opt_f64(window.map(|w| w.value_first_point)),
            config.folding.to_string(),
            bool_str(true).to_string(),
            bool_str(is_acquisition).to_string(),
        ])?;
    }
    frame.add_loop(dimension_loop);

    let mut transfer_loop = Loop::with_tags(TRANSFER_LOOP, TRANSFER_TAGS)?;
    for i in 1..num_dimensions {
        transfer_loop.add_row([
            i.to_string(),
            (i + 1).to_string(),
            ONE_BOND.to_string(),
            bool_str(false).to_string(),
        ])?;
    }
    frame.add_loop(transfer_loop);

    let with_merit = peaks.iter().any(|p| p.figure_of_merit.is_some());
    let with_comment = peaks.iter().any(|p| !p.comment.is_empty());

    let mut tags: Vec<String> = [
        "index",
        "peak_id",
        "volume",
        "volume_uncertainty",
        "height",
        "height_uncertainty",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    for n in 1..=num_dimensions {
        tags.push(format!("position_{n}"));
        tags.push(format!("position_uncertainty_{n}"));
    }
    for n in 1..=num_dimensions {
        tags.extend(atom_tags(n));
    }
    if with_merit {
        tags.push(FIGURE_OF_MERIT.to_string());
    }
    if with_comment {
        tags.push(COMMENT.to_string());
    }

    let mut peak_loop = Loop::with_tags(PEAK_LOOP, tags)?;
    for (i, peak) in peaks.iter().enumerate() {
        let index = i + 1;
        let mut row = vec![
            index.to_string(),
            peak.id.map_or_else(|| index.to_string(), |id| id.to_string()),
            opt_f64(peak.volume),
            opt_f64(peak.volume_uncertainty),
            opt_f64(peak.height),
            opt_f64(peak.height_uncertainty),
        ];
        for shift in &peak.shifts {
            row.push(shift.value.to_string());
            row.push(opt_f64(shift.value_uncertainty));
        }
        for shift in &peak.shifts {
            row.extend(atom_cells(&shift.atom));
        }
        if with_merit {
            row.push(opt_f64(peak.figure_of_merit));
        }
        if with_comment {
            row.push(if peak.comment.is_empty() {
                UNUSED.to_string()
            } else {
                peak.comment.clone()
            });
        }
        peak_loop.add_row(row)?;
    }
    frame.add_loop(peak_loop);

    info!(
        "built {} with {} peaks in {} dimensions",
        frame.name(),
        peaks.len(),
        num_dimensions
    );
    Ok(frame)
}

/// Counts the consecutive `position_N` columns of a peak loop.
fn count_position_columns(lp: &Loop) -> usize {
    (1..)
        .take_while(|n| lp.has_tag(&format!("position_{n}")))
        .count()
}

/// Reads the peaks of a spectrum frame.
///
/// The dimensionality comes from the `position_N` columns present, not from
/// the `num_dimensions` tag. An unreadable position aborts with
/// [`Error::BadPosition`].
///
/// The round trip through [`peaks_to_frame`] is exact only for peaks that
/// carry an id: `peak_id` is always written, so a peak without one reads
/// back with its 1-based index as its id.
pub fn frame_to_peaks(frame: &Saveframe) -> Result<Vec<NewPeak>, Error> {
    let origin = frame.name();
    let lp = frame
        .get_loop(PEAK_LOOP)
        .ok_or_else(|| Error::missing_loop(origin, PEAK_LOOP))?;
    let num_dimensions = count_position_columns(lp);

    let declared = frame.tag("num_dimensions").and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|d| d != num_dimensions) {
        warn!(
            "{origin} declares {} dimensions but its peaks have {num_dimensions} positions",
            declared.unwrap_or_default()
        );
    }

    lp.records()
        .map(|record| -> Result<NewPeak, Error> {
            let mut shifts = Vec::with_capacity(num_dimensions);
            for n in 1..=num_dimensions {
                let tag = format!("position_{n}");
                let text = record.get(&tag).unwrap_or(UNUSED);
                let value = text.parse::<f64>().map_err(|_| Error::BadPosition {
                    origin: origin.to_string(),
                    row: record.index() + 1,
                    value: text.to_string(),
                    line: record.to_line(),
                })?;
                let uncertainty =
                    read_f64(&record, &format!("position_uncertainty_{n}"), origin)?;
                shifts.push(
                    ShiftData::new(read_atom(&record, n), value).with_uncertainty(uncertainty),
                );
            }

            let mut peak = NewPeak::new(shifts)
                .with_height(
                    read_f64(&record, "height", origin)?,
                    read_f64(&record, "height_uncertainty", origin)?,
                )
                .with_volume(
                    read_f64(&record, "volume", origin)?,
                    read_f64(&record, "volume_uncertainty", origin)?,
                )
                .with_figure_of_merit(read_f64(&record, FIGURE_OF_MERIT, origin)?);
            if let Some(id) = record.get_used("peak_id") {
                let id = id
                    .parse::<i64>()
                    .map_err(|e| Error::bad_value(origin, "peak_id", id, e.to_string()))?;
                peak = peak.with_id(id);
            }
            if let Some(comment) = record.get_used(COMMENT) {
                peak = peak.with_comment(comment);
            }
            Ok(peak)
        })
        .collect()
}

/// Reads the axes of a spectrum frame in dimension order.
pub fn frame_to_dimensions(frame: &Saveframe) -> Result<Vec<DimensionInfo>, Error> {
    let origin = frame.name();
    let lp = frame
        .get_loop(DIMENSION_LOOP)
        .ok_or_else(|| Error::missing_loop(origin, DIMENSION_LOOP))?;
    if !lp.has_tag("axis_code") {
        return Err(Error::missing_column(DIMENSION_LOOP, "axis_code"));
    }

    let mut dimensions = lp
        .records()
        .map(|record| -> Result<(usize, DimensionInfo), Error> {
            let id = match record.get_used("dimension_id") {
                Some(text) => text
                    .parse::<usize>()
                    .map_err(|e| Error::bad_value(origin, "dimension_id", text, e.to_string()))?,
                None => record.index() + 1,
            };
            let mut dimension = DimensionInfo::new(record.get("axis_code").unwrap_or(UNUSED))
                .with_spectrometer_frequency(read_f64(&record, "spectrometer_frequency", origin)?);
            dimension.axis_unit = record.get_used("axis_unit").unwrap_or(PPM).to_string();
            Ok((id, dimension))
        })
        .collect::<Result<Vec<_>, Error>>()?;
    dimensions.sort_by_key(|(id, _)| *id);
    Ok(dimensions.into_iter().map(|(_, d)| d).collect())
}

/// The shift list a spectrum refers to, if it names one.
pub fn spectrum_shift_list(frame: &Saveframe) -> Option<&str> {
    frame
        .tag("chemical_shift_list")
        .filter(|v| *v != UNUSED && v.starts_with(SHIFT_LIST))
}

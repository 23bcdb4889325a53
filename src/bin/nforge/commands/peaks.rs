use anyhow::{Context, Result};

use nef_forge::io::{PeakList, nmrview, sparky};
use nef_forge::nef::config::ConvertConfig;
use nef_forge::nef::meta::select_frame;
use nef_forge::nef::peaks::{
    SPECTRUM, frame_to_dimensions, frame_to_peaks, peaks_to_frame, spectrum_shift_list,
};
use nef_forge::star::Saveframe;

use crate::cli::{ExportArgs, ImportArgs};
use crate::display::{Context as DisplayContext, Progress};
use crate::io::{open_input, write_output};
use crate::util::text::count;

#[derive(Debug, Clone, Copy)]
pub enum PeakFormat {
    NmrView,
    Sparky,
}

impl PeakFormat {
    fn name(self) -> &'static str {
        match self {
            PeakFormat::NmrView => "NMRView",
            PeakFormat::Sparky => "Sparky",
        }
    }
}

pub fn run_import(
    format: PeakFormat,
    args: ImportArgs,
    config: &ConvertConfig,
    ctx: DisplayContext,
) -> Result<()> {
    let chain = super::chain_code(&args, config);
    let what = format!("{} peak lists", format.name());

    super::run_import(&args, ctx, &what, |path, index, lookup| {
        let reader = open_input(path)?;
        let list: PeakList = match format {
            PeakFormat::NmrView => nmrview::read(reader, &chain, lookup),
            PeakFormat::Sparky => sparky::read(reader, &chain, lookup),
        }
        .with_context(|| format!("Failed to read {} peaks: {}", format.name(), path.display()))?;

        let name = super::frame_name(&args, index, list.name.as_deref());
        let frame = peaks_to_frame(
            &name,
            &list.peaks,
            &list.dimensions,
            config.spectrum.proton_frequency,
            &config.spectrum,
        )
        .with_context(|| format!("Failed to build spectrum from {}", path.display()))?;
        Ok(frame)
    })
}

pub fn run_export(args: ExportArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 2);

    progress.step("Selecting spectrum");
    let entry = super::require_entry(args.io.input.as_deref())?;
    let frame = select_frame(&entry, SPECTRUM, args.frame.as_deref())?;
    let peaks = frame_to_peaks(frame)
        .with_context(|| format!("Failed to read peaks of {}", frame.name()))?;
    let details = spectrum_details(frame, peaks.len())?;
    progress.complete_step("Selecting spectrum", &details);

    progress.step("Writing Sparky peak list");
    let mut buffer = Vec::new();
    sparky::write(&mut buffer, &peaks).context("Failed to format Sparky peak list")?;
    write_output(args.io.output.as_deref(), &buffer)?;
    progress.complete_step("Writing Sparky peak list", &[]);

    progress.finish();
    Ok(())
}

/// Summary lines for a selected spectrum: its peak count, axes and the
/// shift list it refers to.
fn spectrum_details(frame: &Saveframe, peaks: usize) -> Result<Vec<String>> {
    let axes = frame_to_dimensions(frame)
        .with_context(|| format!("Failed to read dimensions of {}", frame.name()))?
        .iter()
        .map(|d| d.axis_code.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let mut details = vec![
        format!("{} with {}", frame.name(), count(peaks, "peak")),
        format!("axes {axes}"),
    ];
    if let Some(shift_list) = spectrum_shift_list(frame) {
        details.push(format!("shifts from {shift_list}"));
    }
    Ok(details)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nef_forge::model::peak::DimensionInfo;

    fn spectrum() -> Saveframe {
        let dims = [DimensionInfo::new("1H"), DimensionInfo::new("15N")];
        peaks_to_frame("hsqc", &[], &dims, 600.0, &ConvertConfig::default().spectrum).unwrap()
    }

    #[test]
    fn details_list_axes_in_dimension_order() {
        let details = spectrum_details(&spectrum(), 3).unwrap();
        assert_eq!(
            details,
            ["nef_nmr_spectrum_hsqc with 3 peaks", "axes 1H, 15N"]
        );
    }

    #[test]
    fn details_name_the_referenced_shift_list() {
        let mut frame = spectrum();
        frame.add_tag("chemical_shift_list", "nef_chemical_shift_list_default");
        let details = spectrum_details(&frame, 1).unwrap();
        assert_eq!(details[2], "shifts from nef_chemical_shift_list_default");
    }
}

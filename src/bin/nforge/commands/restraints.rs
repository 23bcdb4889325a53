use anyhow::{Context, Result};

use nef_forge::io::{pales, talos, xplor};
use nef_forge::nef::config::ConvertConfig;
use nef_forge::nef::restraints::{
    collapse_violations, dihedral_restraints_to_frame, rdc_restraints_to_frame,
    violations_to_frame,
};

use crate::cli::{ImportArgs, ViolationArgs};
use crate::display::Context as DisplayContext;
use crate::io::open_input;

pub fn run_violations(
    args: ViolationArgs,
    config: &ConvertConfig,
    ctx: DisplayContext,
) -> Result<()> {
    let ViolationArgs {
        import,
        model,
        no_collapse,
    } = args;
    let chain = super::chain_code(&import, config);

    super::run_import(&import, ctx, "XPLOR violations", |path, index, _lookup| {
        let violations = xplor::read_violations(open_input(path)?, model, &chain)
            .with_context(|| format!("Failed to read XPLOR violations: {}", path.display()))?;
        let violations = if no_collapse {
            violations
        } else {
            collapse_violations(&violations, config.collapse_depth)
        };
        let name = super::frame_name(&import, index, None);
        Ok(violations_to_frame(&name, &violations)?)
    })
}

pub fn run_rdcs(args: ImportArgs, config: &ConvertConfig, ctx: DisplayContext) -> Result<()> {
    let chain = super::chain_code(&args, config);

    super::run_import(&args, ctx, "PALES couplings", |path, index, _lookup| {
        let restraints = pales::read(open_input(path)?, &chain)
            .with_context(|| format!("Failed to read PALES table: {}", path.display()))?;
        let name = super::frame_name(&args, index, None);
        Ok(rdc_restraints_to_frame(&name, &restraints)?)
    })
}

pub fn run_dihedrals(
    args: ImportArgs,
    config: &ConvertConfig,
    ctx: DisplayContext,
) -> Result<()> {
    let chain = super::chain_code(&args, config);

    super::run_import(&args, ctx, "TALOS predictions", |path, index, _lookup| {
        let restraints = talos::read(open_input(path)?, &chain)
            .with_context(|| format!("Failed to read TALOS predictions: {}", path.display()))?;
        let name = super::frame_name(&args, index, None);
        Ok(dihedral_restraints_to_frame(&name, &restraints)?)
    })
}

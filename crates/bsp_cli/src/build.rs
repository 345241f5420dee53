//! `bsp build`: render the project's artifacts and run the toolchain.

use std::path::Path;

use bsp_build::{build_platform, BuildOptions, CancelToken, Vivado};
use bsp_config::{load_config, resolve_build};
use bsp_platform::BoardRegistry;

use crate::project::resolve_project_root;
use crate::render::warn_unsafe_name;
use crate::{BuildArgs, GlobalArgs};

/// Runs `bsp build`.
///
/// Returns exit code 0 when the bitstream is current (and, if requested,
/// the board was programmed), 1 otherwise.
pub fn run(args: &BuildArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project_dir = resolve_project_root(global)?;
    let project_dir = project_dir.canonicalize().unwrap_or(project_dir);
    let config = load_config(&project_dir)?;
    let resolved = resolve_build(&config, &project_dir)?;

    let registry = BoardRegistry::builtin()?;
    let board_name = args.board.as_deref().unwrap_or(&resolved.board);
    let board = registry.get(board_name)?;
    warn_unsafe_name(resolved.context.design_name());

    for source in &resolved.sources {
        if !source.is_file() {
            return Err(format!("source file {} does not exist", source.display()).into());
        }
    }

    let explicit = args
        .vivado
        .as_deref()
        .map(Path::new)
        .or(resolved.vivado.as_deref());
    let vivado = Vivado::locate(explicit);

    let options = BuildOptions {
        build_dir: resolved.build_dir.clone(),
        do_program: args.program || resolved.program,
        force: args.force,
    };
    log::info!(
        "building {} for {} ({})",
        resolved.context.design_name(),
        board.name(),
        board.part()
    );

    let outcome = build_platform(
        &vivado,
        board,
        &resolved.context,
        &options,
        &CancelToken::new(),
    )?;

    if !outcome.success {
        if !outcome.stderr.is_empty() {
            eprint!("{}", outcome.stderr);
        }
        log::error!(
            "toolchain failed (exit code {}); see {}",
            outcome
                .exit_code
                .map_or_else(|| "none".to_string(), |c| c.to_string()),
            options
                .build_dir
                .join(format!("{}.log", resolved.context.design_name()))
                .display()
        );
        return Ok(1);
    }

    log::info!("bitstream: {}", outcome.bitstream.display());
    if options.do_program && !outcome.programmed {
        log::error!("programming failed");
        return Ok(1);
    }
    Ok(0)
}

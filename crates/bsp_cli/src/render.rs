//! `bsp render` and `bsp check`.

use std::path::Path;

use bsp_config::ResourceRequest;
use bsp_platform::{BoardRegistry, PlatformDescriptor};
use bsp_render::{is_safe_design_name, render, Overrides, RenderContext, RenderedArtifacts};
use rayon::prelude::*;

use crate::RenderArgs;

/// Splits a `key=value` argument.
fn split_assignment(arg: &str) -> Result<(&str, &str), String> {
    arg.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .ok_or_else(|| format!("expected KEY=VALUE, found '{arg}'"))
}

/// Builds the render context described by the command line.
pub fn context_from_args(args: &RenderArgs) -> Result<RenderContext, Box<dyn std::error::Error>> {
    let mut overrides = Overrides::new();
    for arg in &args.set {
        let (key, text) = split_assignment(arg)?;
        overrides.set_text_named(key, text)?;
    }
    for arg in &args.set_template {
        let (key, template) = split_assignment(arg)?;
        overrides.set_template_named(key, template)?;
    }

    let mut context = RenderContext::new(args.name.clone()).with_overrides(overrides);
    for arg in &args.request {
        let request: ResourceRequest = arg.parse()?;
        context = context.request(request.name, request.index);
    }
    if args.default_domain {
        context = context.with_default_domain();
    }
    Ok(context)
}

/// Warns when a design name would need quoting in generated scripts.
pub fn warn_unsafe_name(name: &str) {
    if !is_safe_design_name(name) {
        log::warn!("design name '{name}' is not a plain identifier; generated scripts use it verbatim");
    }
}

/// Writes `<name>.xdc`, `<name>.tcl` and `<name>_constraints.xdc` into `dir`.
fn write_artifacts(dir: &Path, artifacts: &RenderedArtifacts) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let name = &artifacts.design_name;
    let files = [
        (format!("{name}.xdc"), &artifacts.pin_constraints),
        (format!("{name}.tcl"), &artifacts.build_script),
        (format!("{name}_constraints.xdc"), &artifacts.constraints_text),
    ];
    for (file, content) in files {
        let path = dir.join(file);
        std::fs::write(&path, content)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}

/// Runs `bsp render`.
pub fn run(args: &RenderArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let registry = BoardRegistry::builtin()?;
    let board = registry.get(&args.board)?;
    warn_unsafe_name(&args.name);
    let context = context_from_args(args)?;
    let artifacts = render(board, &context)?;

    match &args.out {
        Some(dir) => write_artifacts(Path::new(dir), &artifacts)?,
        None => {
            println!("# ---- {}.xdc ----", artifacts.design_name);
            print!("{}", artifacts.pin_constraints);
            println!("# ---- {}.tcl ----", artifacts.design_name);
            print!("{}", artifacts.build_script);
        }
    }
    Ok(0)
}

/// Renders `board` with every resource requested.
fn check_board(board: &PlatformDescriptor) -> Result<RenderedArtifacts, bsp_render::RenderError> {
    let context = board
        .resources()
        .iter()
        .fold(RenderContext::new("check"), |ctx, resource| {
            ctx.request(resource.name(), resource.index())
        });
    render(board, &context)
}

/// Runs `bsp check`: builds the registry, then renders every board in
/// parallel.
pub fn check() -> Result<i32, Box<dyn std::error::Error>> {
    let registry = BoardRegistry::builtin()?;
    let boards: Vec<&PlatformDescriptor> = registry.iter().collect();
    let results: Vec<_> = boards
        .par_iter()
        .map(|board| (board.name(), check_board(board)))
        .collect();

    let mut failed = 0;
    for (name, result) in results {
        match result {
            Ok(artifacts) => println!(
                "ok    {name:<12} {} constraint lines",
                artifacts.pin_constraints.lines().count()
            ),
            Err(e) => {
                failed += 1;
                println!("FAIL  {name:<12} {e}");
            }
        }
    }
    Ok(if failed == 0 { 0 } else { 1 })
}

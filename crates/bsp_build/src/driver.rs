//! Build orchestration: write artifacts, decide whether to rebuild, run the
//! toolchain, optionally program the board.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bsp_platform::PlatformDescriptor;
use bsp_render::{render, tcl, RenderContext, RenderedArtifacts};

use crate::error::BuildError;
use crate::fingerprint::Fingerprint;
use crate::process::{CancelToken, ProcessGuard, ProcessOutput};
use crate::toolchain::Toolchain;

/// The HDL side of a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Design {
    /// Top-level module name.
    pub top: String,
    /// HDL source files, in the order they are added to the project.
    pub sources: Vec<PathBuf>,
}

impl Design {
    /// Creates a design from a top module and its sources.
    pub fn new<I, P>(top: impl Into<String>, sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            top: top.into(),
            sources: sources.into_iter().map(Into::into).collect(),
        }
    }

    /// The design a render context describes.
    pub fn from_context(context: &RenderContext) -> Self {
        Self::new(context.top(), context.sources().iter().map(PathBuf::from))
    }

    /// The design a batch script was rendered for.
    pub fn from_artifacts(artifacts: &RenderedArtifacts) -> Self {
        Self::new(&artifacts.top, artifacts.sources.iter().map(PathBuf::from))
    }
}

/// Where and how to build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory receiving scripts, constraints, logs and the bitstream.
    pub build_dir: PathBuf,
    /// Program the board after a successful build.
    pub do_program: bool,
    /// Run the toolchain even if the fingerprint is current.
    pub force: bool,
}

impl BuildOptions {
    /// Options for building into `build_dir` without programming.
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            do_program: false,
            force: false,
        }
    }
}

/// What a build run produced.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    /// Toolchain exit code; `None` if the run was skipped or killed by a
    /// signal.
    pub exit_code: Option<i32>,
    /// True if the bitstream is current: the toolchain succeeded or the
    /// run was skipped.
    pub success: bool,
    /// Captured standard output of the toolchain.
    pub stdout: String,
    /// Captured standard error of the toolchain.
    pub stderr: String,
    /// Where the bitstream is (or would be) written.
    pub bitstream: PathBuf,
    /// The toolchain did not run because the fingerprint was current.
    pub skipped: bool,
    /// The programming step ran and succeeded.
    pub programmed: bool,
}

/// Files written by [`prepare`].
#[derive(Debug, Clone)]
pub struct PreparedBuild {
    /// The build directory.
    pub dir: PathBuf,
    /// The batch script.
    pub script: PathBuf,
    /// The constraint file.
    pub constraints: PathBuf,
    /// The programming script, when programming was requested.
    pub program_script: Option<PathBuf>,
    /// Fingerprint of the inputs, saved once a run succeeds.
    pub fingerprint: Fingerprint,
}

fn write(path: &Path, content: &str) -> Result<(), BuildError> {
    std::fs::write(path, content).map_err(|e| BuildError::io(path, e))
}

fn file_name(path: &Path) -> &Path {
    path.file_name().map(Path::new).unwrap_or(path)
}

/// Writes `<name>.tcl`, `<name>.xdc` and, when `do_program` is set,
/// `<name>_program.tcl` into `dir`, and fingerprints the inputs.
///
/// `design` must be the top module and sources the artifacts were rendered
/// with; anything else fails with [`BuildError::DesignMismatch`] before a
/// file is written.
pub fn prepare(
    artifacts: &RenderedArtifacts,
    design: &Design,
    dir: &Path,
    do_program: bool,
) -> Result<PreparedBuild, BuildError> {
    if *design != Design::from_artifacts(artifacts) {
        return Err(BuildError::DesignMismatch {
            design: artifacts.design_name.clone(),
            top: design.top.clone(),
            sources: design.sources.len(),
        });
    }
    std::fs::create_dir_all(dir).map_err(|e| BuildError::io(dir, e))?;
    let name = &artifacts.design_name;

    let script = dir.join(format!("{name}.tcl"));
    write(&script, &artifacts.build_script)?;
    let constraints = dir.join(format!("{name}.xdc"));
    write(&constraints, &artifacts.pin_constraints)?;

    let program_script = if do_program {
        let path = dir.join(format!("{name}_program.tcl"));
        write(&path, &tcl::program_script(name))?;
        Some(path)
    } else {
        None
    };

    let fingerprint = Fingerprint::compute(artifacts, design)?;
    log::debug!("prepared {} in {}", name, dir.display());
    Ok(PreparedBuild {
        dir: dir.to_path_buf(),
        script,
        constraints,
        program_script,
        fingerprint,
    })
}

fn run(
    toolchain: &dyn Toolchain,
    dir: &Path,
    script: &Path,
    log_name: &str,
    cancel: &CancelToken,
) -> Result<ProcessOutput, BuildError> {
    let mut cmd = toolchain.batch(file_name(script), Path::new(log_name));
    cmd.current_dir(dir);
    let guard = ProcessGuard::spawn(&mut cmd).map_err(|e| match e.kind() {
        ErrorKind::NotFound => BuildError::ToolchainNotFound {
            tool: toolchain.executable().display().to_string(),
        },
        _ => BuildError::io(toolchain.executable(), e),
    })?;
    log::debug!("{} running as pid {}", toolchain.name(), guard.id());
    guard.wait(cancel)
}

/// Builds a design from rendered artifacts.
///
/// A non-zero toolchain exit is reported through [`BuildOutcome::success`],
/// not as an error.
pub fn build(
    toolchain: &dyn Toolchain,
    artifacts: &RenderedArtifacts,
    design: &Design,
    options: &BuildOptions,
    cancel: &CancelToken,
) -> Result<BuildOutcome, BuildError> {
    let name = &artifacts.design_name;
    let dir = &options.build_dir;
    let prepared = prepare(artifacts, design, dir, options.do_program)?;
    let bitstream = dir.join(format!("{name}.bit"));

    let current = !options.force
        && bitstream.exists()
        && Fingerprint::load(dir, name).as_ref() == Some(&prepared.fingerprint);

    let mut outcome = if current {
        log::info!("{name}: bitstream is up to date, skipping {}", toolchain.name());
        BuildOutcome {
            exit_code: None,
            success: true,
            stdout: String::new(),
            stderr: String::new(),
            bitstream,
            skipped: true,
            programmed: false,
        }
    } else {
        let stale = Fingerprint::path(dir, name);
        if stale.exists() {
            std::fs::remove_file(&stale).map_err(|e| BuildError::io(&stale, e))?;
        }
        log::info!("{name}: running {} in {}", toolchain.name(), dir.display());
        let output = run(toolchain, dir, &prepared.script, &format!("{name}.log"), cancel)?;
        let success = output.status.success();
        if success {
            prepared.fingerprint.save(dir, name)?;
            log::info!("{name}: build finished");
        } else {
            log::warn!("{name}: {} exited with {}", toolchain.name(), output.status);
        }
        BuildOutcome {
            exit_code: output.status.code(),
            success,
            stdout: output.stdout,
            stderr: output.stderr,
            bitstream,
            skipped: false,
            programmed: false,
        }
    };

    match (&prepared.program_script, outcome.success) {
        (Some(script), true) => {
            log::info!("{name}: programming board");
            let output = run(toolchain, dir, script, &format!("{name}_program.log"), cancel)?;
            outcome.programmed = output.status.success();
            if !outcome.programmed {
                log::warn!("{name}: programming exited with {}", output.status);
            }
            outcome.stdout.push_str(&output.stdout);
            outcome.stderr.push_str(&output.stderr);
        }
        (Some(_), false) => log::warn!("{name}: build failed, not programming"),
        (None, _) => {}
    }

    Ok(outcome)
}

/// Renders `context` for `platform` and builds the result.
pub fn build_platform(
    toolchain: &dyn Toolchain,
    platform: &PlatformDescriptor,
    context: &RenderContext,
    options: &BuildOptions,
    cancel: &CancelToken,
) -> Result<BuildOutcome, BuildError> {
    let artifacts = render(platform, context)?;
    build(
        toolchain,
        &artifacts,
        &Design::from_context(context),
        options,
        cancel,
    )
}

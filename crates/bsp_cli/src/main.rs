//! bsp: board support packages for FPGA carrier boards.
//!
//! `bsp boards` lists the shipped boards, `bsp show` describes one,
//! `bsp render` writes constraint and script artifacts for a design,
//! `bsp check` validates and renders every board, and `bsp build` drives
//! the vendor toolchain for the project described by `bsp.toml`.

#![warn(missing_docs)]

mod boards;
mod build;
mod project;
mod render;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// bsp: board resources, constraints and toolchain scripts.
#[derive(Parser, Debug)]
#[command(name = "bsp", version, about = "FPGA board support packages")]
pub struct Cli {
    /// Only report warnings and errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `bsp.toml` or the directory holding it.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the available boards.
    Boards,
    /// Describe one board.
    Show(ShowArgs),
    /// Render constraints and scripts for a design.
    Render(RenderArgs),
    /// Validate and render every board.
    Check,
    /// Build the project in `bsp.toml` with the vendor toolchain.
    Build(BuildArgs),
}

/// Arguments for `bsp show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Board name.
    pub board: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for `bsp render`.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Board name.
    pub board: String,

    /// Design name used for every generated file.
    #[arg(short, long)]
    pub name: String,

    /// Literal override, `key=text` (repeatable).
    #[arg(long = "set", value_name = "KEY=TEXT")]
    pub set: Vec<String>,

    /// Template override, `key=template` (repeatable).
    #[arg(long = "set-template", value_name = "KEY=TEMPLATE")]
    pub set_template: Vec<String>,

    /// Resource to constrain, `name:index` (repeatable).
    #[arg(short, long, value_name = "NAME:INDEX")]
    pub request: Vec<String>,

    /// Also constrain the board's default clock and reset.
    #[arg(long)]
    pub default_domain: bool,

    /// Write the artifacts into this directory instead of printing them.
    #[arg(short, long)]
    pub out: Option<String>,
}

/// Arguments for `bsp build`.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Build for this board instead of the one in `bsp.toml`.
    #[arg(short, long)]
    pub board: Option<String>,

    /// Program the board after a successful build.
    #[arg(short, long)]
    pub program: bool,

    /// Run the toolchain even if the bitstream is up to date.
    #[arg(short, long)]
    pub force: bool,

    /// Path to the `vivado` executable.
    #[arg(long)]
    pub vivado: Option<String>,
}

/// Output format for `bsp show`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

impl GlobalArgs {
    /// The log filter used when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(global.log_level()))
        .init();

    let result = match cli.command {
        Command::Boards => boards::list(),
        Command::Show(ref args) => boards::show(args),
        Command::Render(ref args) => render::run(args),
        Command::Check => render::check(),
        Command::Build(ref args) => build::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_boards() {
        let cli = Cli::parse_from(["bsp", "boards"]);
        assert!(matches!(cli.command, Command::Boards));
    }

    #[test]
    fn parse_show_default_format() {
        let cli = Cli::parse_from(["bsp", "show", "nitefury"]);
        match cli.command {
            Command::Show(ref args) => {
                assert_eq!(args.board, "nitefury");
                assert_eq!(args.format, ReportFormat::Text);
            }
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn parse_show_json() {
        let cli = Cli::parse_from(["bsp", "show", "picoevb", "--format", "json"]);
        match cli.command {
            Command::Show(ref args) => assert_eq!(args.format, ReportFormat::Json),
            _ => panic!("expected Show command"),
        }
    }

    #[test]
    fn parse_render_with_args() {
        let cli = Cli::parse_from([
            "bsp",
            "render",
            "litefury",
            "--name",
            "top",
            "--set",
            "synth_design_opts=-flatten_hierarchy none",
            "--set-template",
            "script_after_route=write_checkpoint {design_name}.dcp",
            "--request",
            "led:0",
            "--request",
            "led:1",
            "--default-domain",
            "--out",
            "out",
        ]);
        match cli.command {
            Command::Render(ref args) => {
                assert_eq!(args.board, "litefury");
                assert_eq!(args.name, "top");
                assert_eq!(args.set, vec!["synth_design_opts=-flatten_hierarchy none"]);
                assert_eq!(
                    args.set_template,
                    vec!["script_after_route=write_checkpoint {design_name}.dcp"]
                );
                assert_eq!(args.request, vec!["led:0", "led:1"]);
                assert!(args.default_domain);
                assert_eq!(args.out.as_deref(), Some("out"));
            }
            _ => panic!("expected Render command"),
        }
    }

    #[test]
    fn render_requires_name() {
        assert!(Cli::try_parse_from(["bsp", "render", "picoevb"]).is_err());
    }

    #[test]
    fn parse_build_defaults() {
        let cli = Cli::parse_from(["bsp", "build"]);
        match cli.command {
            Command::Build(ref args) => {
                assert!(args.board.is_none());
                assert!(!args.program);
                assert!(!args.force);
                assert!(args.vivado.is_none());
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_with_args() {
        let cli = Cli::parse_from([
            "bsp",
            "build",
            "--board",
            "nitefury",
            "--program",
            "--force",
            "--vivado",
            "/opt/Xilinx/Vivado/2023.2/bin/vivado",
        ]);
        match cli.command {
            Command::Build(ref args) => {
                assert_eq!(args.board.as_deref(), Some("nitefury"));
                assert!(args.program);
                assert!(args.force);
                assert_eq!(
                    args.vivado.as_deref(),
                    Some("/opt/Xilinx/Vivado/2023.2/bin/vivado")
                );
            }
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["bsp", "--quiet", "--config", "/work/bsp.toml", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/work/bsp.toml"));
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn log_levels() {
        let global = |quiet, verbose| GlobalArgs {
            quiet,
            verbose,
            config: None,
        };
        assert_eq!(global(false, false).log_level(), "info");
        assert_eq!(global(true, false).log_level(), "warn");
        assert_eq!(global(false, true).log_level(), "debug");
    }
}

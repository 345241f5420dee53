//! A thin driver around the vendor toolchain.
//!
//! The driver writes rendered artifacts into a build directory, runs the
//! toolchain in batch mode as a child process, and reports what happened.
//! It never interprets the toolchain's output: a non-zero exit is a failed
//! [`BuildOutcome`], not an error. Errors are reserved for problems on this
//! side of the process boundary (I/O, a missing executable, cancellation).
//!
//! Every child is owned by a [`ProcessGuard`], which kills and reaps it on
//! every exit path.

#![warn(missing_docs)]

pub mod driver;
pub mod error;
pub mod fingerprint;
pub mod process;
pub mod toolchain;

pub use driver::{build, build_platform, prepare, BuildOptions, BuildOutcome, Design, PreparedBuild};
pub use error::BuildError;
pub use fingerprint::Fingerprint;
pub use process::{CancelToken, ProcessGuard, ProcessOutput};
pub use toolchain::{Toolchain, Vivado, VIVADO_ENV};

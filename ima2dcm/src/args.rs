//! Command-line arguments.
//!
//! Arguments are handled in two stages:
//!
//! 1. [RawArgs::collect] splits tokens of the form `--name[=value]`.
//! 2. [Command::interpret] resolves them into what the program should do,
//!    checking directories and loading the configuration on the way.

mod collect;
mod interpret;

pub use collect::{ArgumentFormatError, RawArgs};
pub(crate) use interpret::ensure_directory;
pub use interpret::{Command, ConversionRequest};

/// Names of every flag the program understands.
pub(crate) const KNOWN_FLAGS: [&str; 6] = ["in", "out", "config", "genconf", "help", "verbose"];

pub const USAGE: &str = "\
Convert legacy CT scanner IMA images to DICOM.

Usage: ima2dcm [--in=<dir>] [--out=<dir>] [--config=<file>] [--verbose]
       ima2dcm --genconf[=<dir>]
       ima2dcm --help

Options:
  --in=<dir>         directory of .IMA files to convert [default: current directory]
  --out=<dir>        directory to write .dcm files to, created if missing
                     [default: current directory]
  --config=<file>    JSON configuration of the DICOM attributes to write
                     [default: embedded configuration]
  --genconf[=<dir>]  write the embedded configuration to <dir>/default-config.json
                     and exit [default: current directory]
  --verbose          log each step of the conversion
  --help             print this message and exit

Set RUST_LOG to control logging in more detail.";

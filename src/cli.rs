/// Structures for setting up opremap's command line interface.
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "opremap")]
/// Renumbers opcodes in a JSON opcode catalog according to a diff file,
/// rewriting the catalog in place and reporting duplicate opcode values.
pub(crate) struct Cli {
    /// Path to a JSON file listing old/new opcode pairs.
    #[arg(long = "diff", default_value = "diff.json")]
    pub diff_file: PathBuf,

    /// Path to the JSON opcode catalog. Rewritten in place.
    #[arg(long = "opcodes", default_value = "opcodes.json")]
    pub opcodes_file: PathBuf,
}

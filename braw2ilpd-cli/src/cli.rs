// braw2ilpd-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "braw2ilpd: Extract lens projection data from Blackmagic RAW clips",
    long_about = "Extracts the ILPD lens projection payload and immersive-video \
attributes from a Blackmagic RAW clip via the braw2ilpd-core library."
)]
pub struct Cli {
    /// Input Blackmagic RAW clip (.braw)
    #[arg(required = true, value_name = "INPUT_BRAW")]
    pub input: PathBuf,

    /// Output target: a .ilpd file, an existing or new directory, or omitted
    /// to place a name derived from the clip attributes in the current directory
    #[arg(value_name = "OUTPUT")]
    pub output: Option<String>,

    /// Also output all attributes to a detailed .txt file
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Attribute dump tool used to query the clip
    #[arg(long, value_name = "TOOL", default_value = braw2ilpd_core::external::DEFAULT_DUMP_TOOL)]
    pub dump_tool: String,
}

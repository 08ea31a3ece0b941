use std::path::PathBuf;

use clap::Parser;

/// Convert an Alfa-Bank PDF account statement into an xlsx spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "rbste", about, version)]
pub struct Cli {
    /// Path to the statement PDF
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Path of the spreadsheet to write
    #[arg(short, long, value_name = "FILE", default_value = "./output.xlsx")]
    pub output: PathBuf,
}

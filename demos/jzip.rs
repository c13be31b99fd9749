use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::*;
use log::*;
use memmap2::Mmap;
use serde_json::Value;
use structopt::*;

#[derive(Debug, StructOpt)]
#[structopt(name = "jzip", about = "Compresses a JSON file, or decompresses one jzip made")]
struct Opt {
    /// Pass multiple times for additional verbosity (info, debug, trace)
    #[structopt(short, long, parse(from_occurrences))]
    verbosity: usize,

    /// Decompress INPUT and pretty-print the JSON inside.
    #[structopt(short, long)]
    decompress: bool,

    /// Where to write the result (stdout if not given)
    #[structopt(short, long)]
    output: Option<PathBuf>,

    #[structopt(name("INPUT"))]
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Opt::from_args();

    let mut errlog = stderrlog::new();
    errlog.verbosity(args.verbosity + 1);
    errlog.init()?;

    info!("Memory mapping {:#?}", &args.input);
    let input = File::open(&args.input)
        .with_context(|| format!("Couldn't open {}", args.input.display()))?;
    let mapping = unsafe { Mmap::map(&input).context("Couldn't mmap input")? };

    let result = if args.decompress {
        let value: Value = jzip::unzip(&mapping).context("Couldn't decompress input")?;
        let mut pretty = serde_json::to_vec_pretty(&value)?;
        pretty.push(b'\n');
        pretty
    } else {
        let value: Value = serde_json::from_slice(&mapping).context("Input isn't JSON")?;
        jzip::zip(&value).context("Couldn't compress input")?
    };
    info!("{} bytes in, {} bytes out", mapping.len(), result.len());

    match &args.output {
        Some(path) => fs::write(path, &result)
            .with_context(|| format!("Couldn't write {}", path.display())),
        None => io::stdout()
            .write_all(&result)
            .context("Couldn't write to stdout"),
    }
}

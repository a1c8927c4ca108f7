use std::path::{Path, PathBuf};

use hackvm::{read_sources, translate_sources, Error};
use indexmap::IndexMap;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input `.vm` file or directory
    input: String,

    /// Output file
    #[clap(short, long)]
    output: Option<String>,

    /// Emit the bootstrap code (`SP = 256`, `call Sys.init 0`)
    #[clap(short, long)]
    bootstrap: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Hack VM Translator");

    let mut files = IndexMap::new();
    if let Err(e) = run(&args, &mut files) {
        e.print_diag(&files);
        std::process::exit(1);
    }
}

fn run(args: &Args, files: &mut IndexMap<String, Vec<String>>) -> Result<(), Error> {
    println!("1. Read Files");
    let input = Path::new(&args.input);
    let sources = read_sources(input)?;
    for (name, text) in &sources {
        println!("  < {}", name);
        files.insert(name.clone(), text.lines().map(|s| s.to_string()).collect());
    }

    println!("2. Translate to Assembly");
    let asm = translate_sources(&sources, args.bootstrap)?;
    let output = match &args.output {
        Some(output) => PathBuf::from(output),
        None => arch::source::output_path(input, "asm"),
    };
    println!("  > {}", output.display());
    std::fs::write(&output, asm).map_err(|e| Error::FileCreate(output.display().to_string(), e))?;
    Ok(())
}

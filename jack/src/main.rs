use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use jackc::{compile_sources, default_outdir, read_sources, write_outputs, Error};

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
    /// Input `.jack` file or directory
    input: String,

    /// Output directory [default: `build/` next to the input]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump generated VM code
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Jack Compiler");

    let mut files = IndexMap::new();
    if let Err(e) = run(&args, &mut files) {
        e.print_diag(&files);
        std::process::exit(1);
    }
}

fn run(args: &Args, files: &mut IndexMap<String, Vec<String>>) -> Result<(), Error> {
    let input = Path::new(&args.input);

    println!("1. Read Files");
    let sources = read_sources(input)?;
    for (path, text) in &sources {
        println!("  < {}", path.display());
        files.insert(
            path.display().to_string(),
            text.lines().map(|s| s.to_string()).collect(),
        );
    }

    println!("2. Compile Classes");
    let outputs = compile_sources(&sources)?;

    println!("3. Write VM Code");
    let outdir = match &args.output {
        Some(dir) => PathBuf::from(dir),
        None => default_outdir(input),
    };
    for path in write_outputs(&outputs, &outdir)? {
        println!("  > {}", path.display());
    }

    if args.dump {
        for (name, vm) in &outputs {
            jackc::util::print_dump(&name.display().to_string(), vm);
        }
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use hackasm::{read_sources, to_hack, Assembler, Error};

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
    /// Input `.asm` files or directories
    #[clap(required = true)]
    input: Vec<String>,

    /// Output file
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    println!("Hack Assembler");

    let mut asm = Assembler::new();
    if let Err(e) = run(&args, &mut asm) {
        e.print_diag(asm.files());
        std::process::exit(1);
    }
}

fn run(args: &Args, asm: &mut Assembler) -> Result<(), Error> {
    println!("1. Read Files and Parse Lines");
    for input in &args.input {
        for (name, text) in read_sources(Path::new(input))? {
            println!("  < {}", name);
            asm.add_source(&name, &text)?;
        }
    }
    for warning in asm.warnings() {
        warning.print_diag(asm.files());
    }

    println!("2. Resolve Symbols & Generate Binary");
    let insts = asm.resolve()?;
    let output = match &args.output {
        Some(output) => PathBuf::from(output),
        None => arch::source::output_path(Path::new(&args.input[0]), "hack"),
    };
    println!("  > {}", output.display());
    std::fs::write(&output, to_hack(&insts))
        .map_err(|e| Error::FileCreate(output.display().to_string(), e))?;

    if args.dump {
        hackasm::util::print_dump(asm);
    }
    Ok(())
}

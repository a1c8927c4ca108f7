use std::path::Path;

use clap::Parser;

use hackemu::hooks::{dump::Dump, init::Init, Hook};
use hackemu::{Error, State};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Parser, Debug)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Maximum number of steps
    #[arg(short = 't', long)]
    tmax: Option<u64>,

    /// YAML file: instruction address -> registers, stack and RAM cells to print
    #[arg(short, long)]
    dump_cfg: Option<String>,

    /// Print registers after every step
    #[arg(short = 'a', long)]
    dump_all: bool,

    /// YAML file: RAM address -> initial value
    #[arg(short, long)]
    init_cfg: Option<String>,

    /// Input `.hack` file
    input_file: String,
}

fn main() {
    let args = Args::parse();
    println!("Hack Emulator");

    if let Err(e) = run(args) {
        color_print::cprintln!("<red,bold>error</>: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    println!("+-----------------------------------------------+");
    println!("| {:<45} |", args.input_file);
    println!("+-----------------------------------------------+");

    // ------------------------------------------------------------------------
    // Initialize state machine model
    let mut state = State::new();
    state.load_hack_file(Path::new(&args.input_file))?;

    // ------------------------------------------------------------------------
    // Initialize hooks
    println!("[INIT]");
    let mut hooks: Vec<Box<dyn Hook>> = vec![
        Box::new(Init::arg(args.init_cfg)?),
        Box::new(Dump::arg(args.dump_cfg, args.dump_all)?),
    ];
    state = hooks.iter_mut().fold(state, |state, hook| hook.init(state));

    // ------------------------------------------------------------------------
    // Main loop
    let tmax = args.tmax.unwrap_or(u64::MAX);
    let mut time = 0;
    while time < tmax {
        let (addr, code) = state.exec();
        state = hooks
            .iter_mut()
            .fold(state, |state, hook| hook.exec(time, addr, code, state));
        time += 1;
        if state.is_terminated() {
            break;
        }
    }

    println!("=================================================");
    println!(
        "{} steps, {}",
        time,
        if state.is_terminated() { "halted" } else { "step limit reached" }
    );
    Ok(())
}

use clap::Parser;
use cmds::generate::{GenerateOptions, ModelFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cmds;

#[derive(Parser, Debug)]
#[command(name = "cfg-gen")]
#[command(about = "Generate C config read/write code from a .cfg definition file", long_about = None)]
struct Cli {
    /// Input .cfg definition file
    #[arg(short = 'i', long = "input", value_name = "FILE", default_value = "example.cfg")]
    input: PathBuf,

    /// Output .c source file (defaults to the input name with .c)
    #[arg(short = 'c', long = "cfile", value_name = "FILE")]
    cfile: Option<PathBuf>,

    /// Output .h header file (defaults to the input name with .h)
    #[arg(short = 'f', long = "hfile", value_name = "FILE")]
    hfile: Option<PathBuf>,

    /// Output config template file
    #[arg(short = 'g', long = "conf", value_name = "FILE")]
    conf: Option<PathBuf>,

    /// Comment out every line of the config template with '#'
    #[arg(long = "commented-template")]
    commented_template: bool,

    /// Print the resolved model
    #[arg(long = "print-model", value_enum, value_name = "FORMAT")]
    print_model: Option<ModelFormat>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            /* --help prints to stdout and is not a failure */
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    init_tracing(cli.verbose);

    let options = GenerateOptions {
        input: cli.input,
        cfile: cli.cfile,
        hfile: cli.hfile,
        conf: cli.conf,
        commented_template: cli.commented_template,
        print_model: cli.print_model,
        verbose: cli.verbose,
    };

    match cmds::generate::run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[✗] {:#}", err);
            ExitCode::from(1)
        }
    }
}

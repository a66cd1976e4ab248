use clap::Parser;
use log::{info, LevelFilter};
use plox::{
    report::WriteReporter,
    scanner::Scanner,
};
use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process,
};

const EXIT_USAGE: i32 = 64;
const EXIT_DATA: i32 = 65;
const EXIT_IO: i32 = 74;

const EXIT_REPL: &str = "<exit REPL>";

/// Prints the tokens of a Lox script, or of each line typed at the prompt.
#[derive(Parser, Debug)]
#[command(name = "plox", version)]
struct Cli {
    /// Script to scan. Starts a prompt when omitted.
    script: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv every token).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> io::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            e.print()?;
            process::exit(EXIT_USAGE);
        },
    };

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("could not set up logging: {}", e);
    }

    match cli.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

fn init_logging(verbose: u8) -> Result<(), log::SetLoggerError> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
        })
        .level(level)
        .chain(io::stderr())
        .apply()
}

fn run_file(path: &Path) -> io::Result<()> {
    info!("scanning {}", path.display());
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Could not read {}: {}", path.display(), e);
            process::exit(EXIT_IO);
        },
    };

    let mut lox = Lox::new(io::stdout(), io::stderr());
    lox.run(contents.as_str())?;
    if lox.had_error() {
        process::exit(EXIT_DATA);
    }
    Ok(())
}

fn run_prompt() -> io::Result<()> {
    let stdin = io::stdin();
    let mut lox = Lox::new(io::stdout(), io::stderr());
    lox.prompt(stdin.lock())
}

struct Lox<Out, ErrOut> {
    out: Out,
    reporter: WriteReporter<ErrOut>,
}

impl <Out: Write, ErrOut: Write> Lox<Out, ErrOut> {
    fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            out,
            reporter: WriteReporter::new(err_out),
        }
    }

    fn run(&mut self, source: &str) -> io::Result<()> {
        let tokens = Scanner::new(source).scan_tokens(&mut self.reporter);
        for token in tokens.iter() {
            writeln!(self.out, "{}", token)?;
        }
        Ok(())
    }

    /// Scans one line at a time until `input` runs dry or the user types
    /// the exit sentinel.
    fn prompt<In: BufRead>(&mut self, mut input: In) -> io::Result<()> {
        let mut buffer = String::new();

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            buffer.clear();

            let num_bytes = input.read_line(&mut buffer)?;
            if num_bytes == 0 { break };

            let line = buffer.trim_end_matches(|c: char| c == '\n' || c == '\r');
            if line == EXIT_REPL { break };

            self.run(line)?;
            // Errors only count against the line that caused them.
            self.reset();
        }

        Ok(())
    }

    fn had_error(&self) -> bool {
        self.reporter.had_error()
    }

    fn reset(&mut self) {
        self.reporter.reset()
    }
}

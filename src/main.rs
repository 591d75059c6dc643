use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser as ClapParser;
use clap::Subcommand;
use env_logger::Builder;
use log::{debug, info};

use fojaccia::ast_printer::AstPrinter;
use fojaccia::error::{Diagnostic, Diagnostics};
use fojaccia::interpreter::Interpreter;
use fojaccia::parser::Parser;
use fojaccia::scanner::{scan_tokens, Scanner};
use fojaccia::token::Token;
use fojaccia::{RunResult, Session};

/// sysexits `EX_DATAERR`: the input had lexical, syntax or static errors.
const EXIT_STATIC_ERROR: u8 = 65;

/// sysexits `EX_SOFTWARE`: the program failed while running.
const EXIT_RUNTIME_ERROR: u8 = 70;

const LOG_FILE: &str = "fojaccia.log";

#[derive(ClapParser, Debug)]
#[command(version, about = "Fojaccia language interpreter", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to fojaccia.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes input from a file, printing each token
    Tokenize {
        filename: PathBuf,

        /// Print the token stream as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parses input from a file and prints the syntax tree of each statement
    Parse { filename: PathBuf },

    /// Evaluates input from a file as a single expression and prints the result
    Evaluate { filename: PathBuf },

    /// Runs a Fojaccia program, or starts the interactive prompt without a file
    Run { filename: Option<PathBuf> },
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).with_context(|| format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = String::new();

    let bytes = reader
        .read_to_string(&mut buf)
        .with_context(|| format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    Ok(buf)
}

fn init_logger() -> Result<()> {
    let log_file = File::create(LOG_FILE).with_context(|| format!("Failed to create {}", LOG_FILE))?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'fojaccia::' from module path
            let module = record.module_path().unwrap_or("<unnamed>");
            let module = module.strip_prefix("fojaccia::").unwrap_or(module);

            writeln!(
                buf,
                "[{} {}:{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to {}", LOG_FILE);
    Ok(())
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn report_all(diagnostics: &Diagnostics) {
    report(&diagnostics.to_diagnostics());
}

/// Maps a finished run to the process status.
fn exit_code(result: &RunResult) -> ExitCode {
    if result.had_static_error {
        ExitCode::from(EXIT_STATIC_ERROR)
    } else if result.had_runtime_error {
        ExitCode::from(EXIT_RUNTIME_ERROR)
    } else {
        ExitCode::SUCCESS
    }
}

fn tokenize(filename: &Path, json: bool) -> Result<ExitCode> {
    info!("Running Tokenize subcommand");
    let source = read_file(filename)?;

    if json {
        let mut diagnostics = Diagnostics::new();
        let tokens: Vec<Token> = scan_tokens(&source, &mut diagnostics);

        println!("{}", serde_json::to_string_pretty(&tokens)?);

        if !diagnostics.is_empty() {
            let rendered = serde_json::to_string_pretty(&diagnostics.to_diagnostics())?;
            eprintln!("{}", rendered);
            return Ok(ExitCode::from(EXIT_STATIC_ERROR));
        }

        return Ok(ExitCode::SUCCESS);
    }

    let mut tokenized = true;

    for token in Scanner::new(&source) {
        match token {
            Ok(token) => {
                debug!("Scanned token: {}", token);
                println!("{}", token);
            }

            Err(e) => {
                tokenized = false;
                eprintln!("{}", e);
            }
        }
    }

    if !tokenized {
        debug!("Tokenization failed, exiting with code {}", EXIT_STATIC_ERROR);
        return Ok(ExitCode::from(EXIT_STATIC_ERROR));
    }

    info!("Tokenization completed successfully");
    Ok(ExitCode::SUCCESS)
}

fn parse(filename: &Path) -> Result<ExitCode> {
    info!("Running Parse subcommand");
    let source = read_file(filename)?;

    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);
    let statements = Parser::new(&tokens).parse(&mut diagnostics);

    if !diagnostics.is_empty() {
        report_all(&diagnostics);
        return Ok(ExitCode::from(EXIT_STATIC_ERROR));
    }

    for stmt in &statements {
        let ast_str = AstPrinter::print_stmt(stmt);
        debug!("AST: {}", ast_str);
        println!("{}", ast_str);
    }

    info!("Parse subcommand completed");
    Ok(ExitCode::SUCCESS)
}

fn evaluate(filename: &Path) -> Result<ExitCode> {
    info!("Running Evaluate subcommand");
    let source = read_file(filename)?;

    let mut diagnostics = Diagnostics::new();
    let tokens = scan_tokens(&source, &mut diagnostics);
    let expr = Parser::new(&tokens).parse_expression(&mut diagnostics);

    let expr = match expr {
        Some(expr) if diagnostics.is_empty() => expr,
        _ => {
            report_all(&diagnostics);
            return Ok(ExitCode::from(EXIT_STATIC_ERROR));
        }
    };

    let mut interpreter = Interpreter::new();

    match interpreter.evaluate(&expr) {
        Ok(value) => {
            debug!("Evaluated to: {}", value);
            println!("{}", value);
        }

        Err(e) => {
            debug!("Evaluation failed: {}", e);
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_RUNTIME_ERROR));
        }
    }

    info!("Evaluate subcommand completed");
    Ok(ExitCode::SUCCESS)
}

fn run_file(filename: &Path) -> Result<ExitCode> {
    info!("Running Run subcommand");
    let source = read_file(filename)?;

    let mut session = Session::new();
    let result = session.run_source(&source);

    report(&result.diagnostics);

    info!(
        "Program finished: {} statements executed, {} diagnostics",
        result.statements_executed,
        result.diagnostics.len()
    );

    Ok(exit_code(&result))
}

/// Interactive prompt.  Globals persist between lines; errors do not.
fn run_prompt() -> Result<ExitCode> {
    info!("Starting interactive prompt");

    let mut session = Session::new();
    session.set_echo(true);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let line = match lines.next() {
            Some(line) => line.context("Failed to read from stdin")?,
            None => break,
        };

        let result = session.run_source(&line);
        report(&result.diagnostics);
    }

    println!();
    info!("Prompt closed");
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    }

    info!("CLI arguments: {:?}", args);

    match &args.commands {
        Commands::Tokenize { filename, json } => tokenize(filename, *json),
        Commands::Parse { filename } => parse(filename),
        Commands::Evaluate { filename } => evaluate(filename),
        Commands::Run { filename } => match filename {
            Some(filename) => run_file(filename),
            None => run_prompt(),
        },
    }
}

//! MITScript CLI

use clap::{Args, Parser, Subcommand};
use mitscript::error::report_error;
use mitscript::interp::Interpreter;
use mitscript::{bytecode, lexer, parser};
use std::fs;
use std::io::{self, Read, Write};
use std::process;

#[derive(Parser)]
#[command(
    name = "mitscript",
    version,
    about = "MITScript front-end and reference interpreter",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Tokenize a source file and list the tokens
    Scan(IoArgs),
    /// Parse a source file and report syntax errors
    Parse(IoArgs),
    /// Compile a source file to bytecode (reserved)
    Compile(IoArgs),
    /// Parse and evaluate a source file
    Interpret(IoArgs),
    /// Parse a bytecode file and print its canonical form
    Vm(IoArgs),
}

#[derive(Args)]
struct IoArgs {
    /// Path to input file, use '-' for stdin
    #[arg(default_value = "-")]
    input_file: String,

    /// Path to output file, use '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Memory limit in MB; only meaningful for the vm subcommand
    #[arg(short, long, default_value_t = 4)]
    mem: usize,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            use clap::error::ErrorKind;
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            process::exit(code);
        }
    };

    let code = match &cli.command {
        Command::Scan(args) => run_scan(args),
        Command::Parse(args) => run_parse(args),
        Command::Compile(args) => run_compile(args),
        Command::Interpret(args) => run_interpret(args),
        Command::Vm(args) => run_vm(args),
    };
    process::exit(code);
}

fn read_input(path: &str) -> Option<String> {
    if path == "-" {
        let mut source = String::new();
        match io::stdin().read_to_string(&mut source) {
            Ok(_) => Some(source),
            Err(err) => {
                eprintln!("Error: failed to read stdin: {err}");
                None
            }
        }
    } else {
        match fs::read_to_string(path) {
            Ok(source) => Some(source),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                eprintln!("Error: Input file '{path}' does not exist");
                None
            }
            Err(err) => {
                eprintln!("Error: failed to read '{path}': {err}");
                None
            }
        }
    }
}

fn open_output(path: &str) -> Option<Box<dyn Write>> {
    if path == "-" {
        Some(Box::new(io::stdout()))
    } else {
        match fs::File::create(path) {
            Ok(file) => Some(Box::new(file)),
            Err(err) => {
                eprintln!("Error: failed to open '{path}': {err}");
                None
            }
        }
    }
}

fn run_scan(args: &IoArgs) -> i32 {
    let Some(source) = read_input(&args.input_file) else {
        return 1;
    };
    let Some(mut out) = open_output(&args.output) else {
        return 1;
    };
    let tokens = lexer::tokenize(&source);
    if lexer::print_tokens(&tokens, &mut out).is_err() {
        return 1;
    }
    if lexer::has_errors(&tokens) {
        let _ = lexer::print_errors(&tokens, &mut io::stderr());
        return 1;
    }
    0
}

fn run_parse(args: &IoArgs) -> i32 {
    let Some(source) = read_input(&args.input_file) else {
        return 1;
    };
    let tokens = lexer::tokenize(&source);
    if lexer::has_errors(&tokens) {
        let _ = lexer::print_errors(&tokens, &mut io::stderr());
        return 1;
    }
    if let Err(err) = parser::parse(&tokens) {
        report_error(&args.input_file, &source, &err);
        println!("parse error");
        return 1;
    }
    0
}

fn run_compile(_args: &IoArgs) -> i32 {
    eprintln!("Error: Compile command not yet implemented");
    0
}

fn run_interpret(args: &IoArgs) -> i32 {
    let Some(source) = read_input(&args.input_file) else {
        return 1;
    };
    let tokens = lexer::tokenize(&source);
    if lexer::has_errors(&tokens) {
        let _ = lexer::print_errors(&tokens, &mut io::stderr());
        return 1;
    }
    let program = match parser::parse(&tokens) {
        Ok(program) => program,
        Err(err) => {
            report_error(&args.input_file, &source, &err);
            println!("parse error");
            return 1;
        }
    };
    let mut interpreter = Interpreter::new();
    if let Err(fault) = interpreter.run(&program) {
        eprintln!("{fault}");
        return 1;
    }
    0
}

fn run_vm(args: &IoArgs) -> i32 {
    // The memory limit belongs to the VM proper, which sits behind this
    // front-end; the flag is accepted and recorded only.
    let _ = args.mem;
    let Some(source) = read_input(&args.input_file) else {
        return 1;
    };
    match bytecode::parse(&source) {
        Ok(function) => {
            let Some(mut out) = open_output(&args.output) else {
                return 1;
            };
            if write!(out, "{}", bytecode::to_text(&function)).is_err() {
                return 1;
            }
            0
        }
        Err(err) => {
            report_error(&args.input_file, &source, &err);
            1
        }
    }
}

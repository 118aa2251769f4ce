use std::{fs, path::PathBuf, process, thread};

use clap::Parser;
use puffing::{
    Error,
    interpreter::{config::InterpreterConfig, evaluator::core::Interpreter, value::core::Value},
    parse, tokenize,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Stack reserved for the interpreter thread. Deep Puffing recursion is
/// stopped by `--max-depth` well before this is exhausted.
const INTERPRETER_STACK: usize = 512 * 1024 * 1024;

/// Runs Puffing programs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The program to run: a `.pf` file, or source text with `--eval`.
    program: String,

    /// Treat the argument as source text instead of a file path.
    #[arg(short, long)]
    eval: bool,

    /// Nested calls allowed before the run fails with a recursion error.
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Print every binding left after a successful run.
    #[arg(long)]
    bindings: bool,

    /// Disable ANSI colors in log output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_env("PUFFING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(std::io::stderr)
                             .with_ansi(!args.no_color)
                             .init();

    let source = if args.eval {
        args.program.clone()
    } else {
        let path = PathBuf::from(&args.program);
        fs::read_to_string(&path).unwrap_or_else(|e| {
                                     eprintln!("Error: could not read '{}': {e}", path.display());
                                     process::exit(1);
                                 })
    };

    let mut config = InterpreterConfig::default().with_echo_output(true);
    if let Some(depth) = args.max_depth {
        config = config.with_max_call_depth(depth);
    }
    debug!(?config, "starting interpreter thread");

    let worker = thread::Builder::new().name("puffing".to_string())
                                       .stack_size(INTERPRETER_STACK)
                                       .spawn(move || run(&source, config, args.bindings));
    let code = match worker.map(thread::JoinHandle::join) {
        Ok(Ok(code)) => code,
        Ok(Err(_)) => {
            eprintln!("[ERROR] Internal Error: the interpreter thread panicked");
            2
        },
        Err(e) => {
            eprintln!("[ERROR] Internal Error: could not start the interpreter: {e}");
            2
        },
    };
    process::exit(code);
}

/// Runs the program and prints its status lines.
///
/// # Returns
/// The process exit code.
fn run(source: &str, config: InterpreterConfig, show_bindings: bool) -> i32 {
    let mut interpreter = Interpreter::new(config);
    let outcome = tokenize(source).map_err(Error::from)
                                  .and_then(|tokens| parse(&tokens).map_err(Error::from))
                                  .and_then(|program| {
                                      interpreter.run(&program).map_err(Error::from)
                                  });

    let output = interpreter.output();
    if !output.is_empty() && !output.ends_with('\n') {
        println!();
    }

    match outcome {
        Ok(value) => {
            println!("[SUCCESS] Execution completed successfully");
            if !matches!(value, Value::None) {
                println!("Result: {value}");
            }
            if show_bindings {
                for (name, value) in interpreter.bindings() {
                    println!("{name} = {value}");
                }
            }
            0
        },
        Err(e) => {
            println!("[ERROR] {}: {e}", category(&e));
            1
        },
    }
}

/// The label printed before an error message.
const fn category(error: &Error) -> &'static str {
    match error {
        Error::Lex(_) => "Lexer Error",
        Error::Parse(_) => "Parser Error",
        Error::Runtime(_) => "Runtime Error",
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::Level;

use weird_lang::backends::BackendType;
use weird_lang::parser::lexer::Lexer;
use weird_lang::{CompilerConfig, compile, output, parser};

#[derive(Parser)]
#[command(name = "weird-lang")]
#[command(about = "Compiles Weird Lang scripts to JavaScript", version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a script and write tokens.json, ast.json and the generated code
    Compile {
        /// Source file
        input: PathBuf,

        /// Target language
        #[arg(short, long, default_value = "js")]
        target: String,

        /// Artifacts go to <out-dir>/<source file name>/
        #[arg(short, long, default_value = "build")]
        out_dir: PathBuf,

        /// Do not wrap the program in an async IIFE
        #[arg(long)]
        no_async: bool,

        /// Fail on invalid characters instead of skipping them
        #[arg(long)]
        strict: bool,
    },

    /// Print the token stream as JSON
    Tokens {
        /// Source file
        input: PathBuf,

        #[arg(long)]
        strict: bool,
    },

    /// Print the AST as JSON without generating code
    Parse {
        /// Source file
        input: PathBuf,

        #[arg(long)]
        strict: bool,
    },

    /// List supported targets
    Targets,
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .with_writer(std::io::stderr);

    if cli.log_json {
        subscriber.json().with_current_span(false).init();
    } else {
        subscriber.init();
    }
}

fn artifact_dir(out_dir: &Path, input: &Path) -> PathBuf {
    match input.file_name() {
        Some(name) => out_dir.join(name),
        None => out_dir.to_path_buf(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Commands::Compile {
            input,
            target,
            out_dir,
            no_async,
            strict,
        } => {
            let target = BackendType::from_name(&target)?;
            let config = CompilerConfig::default()
                .strict(strict)
                .async_wrap(!no_async)
                .target(target);

            let source = fs::read_to_string(&input)?;
            let compilation = compile(&source, &config)?;

            let dir = artifact_dir(&out_dir, &input);
            for path in output::write_artifacts(&dir, &compilation, target)? {
                println!("{}", path.display());
            }
        }
        Commands::Tokens { input, strict } => {
            let source = fs::read_to_string(&input)?;
            let options = CompilerConfig::default().strict(strict).lexer;
            let tokens = Lexer::with_options(&source, options).tokenize()?;
            println!("{}", output::tokens_json(&tokens)?);
        }
        Commands::Parse { input, strict } => {
            let source = fs::read_to_string(&input)?;
            let options = CompilerConfig::default().strict(strict).lexer;
            let program = parser::parse(&source, options)?;
            println!("{}", output::ast_json(&program)?);
        }
        Commands::Targets => {
            println!("Supported targets:");
            for backend in BackendType::all() {
                println!("  {:8} - {}", backend.name(), backend.description());
            }
        }
    }

    Ok(())
}

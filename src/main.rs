// jstep: statement-level stepper for JavaScript functions

use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use jstep::codegen::{Generator, DEFAULT_INDENT};
use jstep::memory::Value;
use jstep::stepper::{extract_function, Stepper};
use jstep::ui::App;

#[derive(Parser, Debug)]
#[command(name = "jstep")]
#[command(version)]
#[command(about = "Step through a JavaScript function one statement at a time")]
struct Cli {
    /// Script holding the function to step
    file: PathBuf,

    /// Name of the function to step (default: the first one in the file)
    #[arg(short, long)]
    function: Option<String>,

    /// Call argument, as a script expression (repeatable)
    #[arg(short = 'a', long = "arg", value_name = "EXPR")]
    args: Vec<String>,

    /// `this` for the call, as a script expression
    #[arg(long, value_name = "EXPR")]
    this: Option<String>,

    /// Indent width of the generated source
    #[arg(long, default_value_t = DEFAULT_INDENT)]
    indent: usize,

    /// Print the transformed function body and exit
    #[arg(long, conflicts_with = "run")]
    dump: bool,

    /// Run every step without the TUI, then print the locals and console output
    #[arg(long)]
    run: bool,

    /// Where to write logs while the TUI is up
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn install_tracing(interactive: bool, log_file: Option<&Path>) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jstep=info"));

    if !interactive {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .try_init();
    } else if let Some(path) = log_file {
        // The alternate screen owns stdout/stderr
        let file = File::create(path)?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let interactive = !cli.dump && !cli.run;
    install_tracing(interactive, cli.log_file.as_deref())?;

    let script = fs::read_to_string(&cli.file)
        .map_err(|err| format!("cannot read '{}': {}", cli.file.display(), err))?;
    let function_text = extract_function(&script, cli.function.as_deref())?;

    let mut stepper = Stepper::with_generator(Generator::new(cli.indent));
    stepper.parse(&function_text)?;
    info!(file = %cli.file.display(), steps = stepper.len(), "parsed");

    if cli.dump {
        print!("{}", stepper.generated_source().unwrap_or_default());
        return Ok(());
    }

    let mut args = Vec::with_capacity(cli.args.len());
    for expression in &cli.args {
        args.push(stepper.interpreter_mut().run(expression)?);
    }
    let context = match &cli.this {
        Some(expression) => stepper.interpreter_mut().run(expression)?,
        None => Value::Undefined,
    };
    stepper.call(context, args)?;

    if cli.run {
        while !stepper.is_finished() {
            stepper.step()?;
        }
        for (name, value) in stepper.locals() {
            println!("{} = {}", name, value.inspect());
        }
        for line in stepper.console().get_output() {
            println!("> {}", line);
        }
        return Ok(());
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(stepper, function_text);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

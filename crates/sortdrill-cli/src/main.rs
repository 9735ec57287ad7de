#![forbid(unsafe_code)]

mod cmd;
mod output;
mod settings;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "sortdrill",
    author,
    version,
    about = "sortdrill: practice sorting algorithms one decision at a time",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `<config_dir>/sortdrill/config.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Start an interactive sorting quiz",
        long_about = "Start an interactive quiz. At every step, predict what the algorithm does\n\
                      next: swap or skip a bubble pair, pick and place an insertion value,\n\
                      or select the extremal value. Wrong answers are explained and the\n\
                      prompt repeats until you get it right.",
        after_help = "EXAMPLES:\n    # Bubble sort on eight random values\n    sortdrill play\n\n\
                      # Insertion sort, descending, settling on the left\n    sortdrill play --algorithm insertion --order desc --convergence left\n\n\
                      # Practice a fixed list\n    sortdrill play --values 5,3,4\n\n\
                      # Drive the quiz from a script\n    printf 'swap\\nswap\\nskip\\n' | sortdrill play --values 5,3,4 --format json"
    )]
    Play(cmd::play::PlayArgs),

    #[command(
        about = "Print the full solution of a session",
        long_about = "Play a session with the engine's own answers and print every step.",
        after_help = "EXAMPLES:\n    # Solve a reproducible selection-sort session\n    sortdrill solve --algorithm selection --seed 7\n\n\
                      # Machine-readable step list\n    sortdrill solve --values 5,3,4 --format json"
    )]
    Solve(cmd::solve::SolveArgs),

    #[command(about = "Deterministic simulation campaigns against the engines")]
    Sim(cmd::sim::SimArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    sortdrill completions bash > ~/.local/share/bash-completion/completions/sortdrill"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SORTDRILL_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "sortdrill=debug,info"
        } else {
            "sortdrill=info,warn"
        })
    });

    let format = env::var("SORTDRILL_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    // stdout belongs to the quiz; logs go to stderr.
    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config_path = cli.config.as_deref();

    match &cli.command {
        Commands::Play(args) => cmd::play::run_play(args, config_path, output),
        Commands::Solve(args) => cmd::solve::run_solve(args, config_path, output),
        Commands::Sim(args) => match &args.command {
            cmd::sim::SimCommand::Run(run) => cmd::sim::run_sim_run(run, output),
            cmd::sim::SimCommand::Replay(replay) => cmd::sim::run_sim_replay(replay, output),
        },
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sortdrill_core::{Algorithm, OrderDirection};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn completions_cover_real_subcommands() {
        let mut buf = Vec::new();
        cmd::completions::write_completions(
            clap_complete::Shell::Bash,
            &mut Cli::command(),
            &mut buf,
        );
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("_sortdrill"));
        for sub in ["play", "solve", "sim", "completions"] {
            assert!(script.contains(sub), "missing {sub}");
        }
    }

    #[test]
    fn format_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["sortdrill", "solve", "--format", "json"]);
        assert_eq!(cli.format, Some(OutputMode::Json));
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn hidden_json_flag() {
        let cli = Cli::parse_from(["sortdrill", "--json", "solve"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn play_flags_parse() {
        let cli = Cli::parse_from([
            "sortdrill",
            "play",
            "--algorithm",
            "insertion",
            "--order",
            "desc",
            "--values",
            "5,3,4",
        ]);
        let Commands::Play(args) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.session.algorithm, Some(Algorithm::Insertion));
        assert_eq!(args.session.order, Some(OrderDirection::Descending));
        assert_eq!(args.session.values, Some(vec![5, 3, 4]));
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["sortdrill", "solve", "--config", "/tmp/quiz.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/quiz.toml")));
    }

    #[test]
    fn sim_replay_parses() {
        let cli = Cli::parse_from(["sortdrill", "sim", "replay", "--seed", "9", "--trace"]);
        let Commands::Sim(args) = cli.command else {
            panic!("expected sim");
        };
        assert!(matches!(
            args.command,
            cmd::sim::SimCommand::Replay(ref replay) if replay.seed == 9 && replay.trace
        ));
    }
}

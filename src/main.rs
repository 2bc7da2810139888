use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use doc_quiz::{
    GeneratorConfig, Quiz, QuizError, parse_quiz_report, save_questions_to_json,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse raw model output into quiz JSON
    Parse {
        /// File holding the model's response, or `-` for stdin
        input: PathBuf,

        /// Print counts of dropped questions and ignored lines to stderr
        #[arg(long)]
        report: bool,
    },

    /// Generate a quiz from a plain-text document
    Generate {
        /// Text file to build the quiz from
        document: PathBuf,

        /// Write the quiz JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Run the quiz in the terminal once it is generated
        #[arg(long)]
        play: bool,

        #[command(flatten)]
        config: GeneratorConfig,
    },

    /// Run a saved quiz in the terminal
    Play {
        /// JSON file to load the questions from
        questions: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<(), QuizError> {
    match command {
        Command::Parse { input, report } => {
            let raw = read_input(&input)?;
            let parsed = parse_quiz_report(&raw);
            if report {
                eprintln!(
                    "accepted {}, dropped {}, truncated {}, ignored lines {}",
                    parsed.questions.len(),
                    parsed.dropped,
                    parsed.truncated,
                    parsed.ignored_lines
                );
            }
            let quiz = Quiz::from_questions(parsed.questions)?;
            print_json(&quiz)
        }
        Command::Generate {
            document,
            output,
            play,
            config,
        } => {
            let text = fs::read_to_string(&document)?;
            let generator = config.build()?;
            info!(model = %config.model, "generating quiz from {}", document.display());

            let report = generator.generate_quiz(&text).await?;
            let quiz = Quiz::from_questions(report.questions)?;

            match &output {
                Some(path) => save_questions_to_json(path, quiz.questions())?,
                None if !play => print_json(&quiz)?,
                None => {}
            }
            if play {
                quiz.run()?;
            }
            Ok(())
        }
        Command::Play { questions } => Quiz::from_json(questions)?.run(),
    }
}

fn read_input(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
    }
}

fn print_json(quiz: &Quiz) -> Result<(), QuizError> {
    let json = serde_json::to_string_pretty(quiz.questions())?;
    println!("{}", json);
    Ok(())
}

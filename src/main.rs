//! Plainspoken command line
//!
//! Detects AI-associated phrasing, rewrites it into plainer wording and
//! reports what changed.

use clap::{Args, Parser, Subcommand, ValueEnum};
use plainspoken::db::{load_lexicon, load_lexicon_stats, save_lexicon};
use plainspoken::models::{Category, EngineParams, Selection, Severity};
use plainspoken::output::{
    print_batch_summary, print_comparison_summary, print_detection_summary, print_lexicon_stats,
    print_rewrite_summary, write_changes_csv_file, write_documents_csv_file, write_json,
    write_json_file, write_viewer_html_file,
};
use plainspoken::pipeline::{expand_inputs, process_documents, read_documents};
use plainspoken::{Engine, Lexicon};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "plainspoken")]
#[command(about = "Detect and rewrite AI-sounding prose")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for single-text results
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable console summary
    Summary,
    /// JSON document
    Json,
    /// CSV of changes (compare) or documents (batch)
    Csv,
    /// Self-contained HTML side-by-side viewer (compare only)
    Viewer,
    /// Plain rewritten text (rewrite only)
    Text,
}

/// CLI mirror of models::Selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliSelection {
    /// Always the first listed alternative
    First,
    /// Cycle alternatives per occurrence
    Rotate,
}

impl From<CliSelection> for Selection {
    fn from(selection: CliSelection) -> Self {
        match selection {
            CliSelection::First => Selection::First,
            CliSelection::Rotate => Selection::Rotate,
        }
    }
}

/// Engine settings shared by every text command.
///
/// Values left unset inherit from `--config`, or from EngineParams::default().
#[derive(Args, Debug)]
struct EngineArgs {
    /// Engine parameters as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lexicon file (.json, or a SQLite database) replacing the built-in table
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Only use these categories (comma separated) [default: all]
    #[arg(long, value_delimiter = ',')]
    categories: Vec<Category>,

    /// Minimum pattern severity: low, medium or high [default: low]
    #[arg(long)]
    min_severity: Option<Severity>,

    /// How alternatives are chosen [default: first]
    #[arg(long, value_enum)]
    selection: Option<CliSelection>,

    /// Remove filler phrases after rewriting [default: true]
    #[arg(long, action = clap::ArgAction::Set)]
    remove_fillers: Option<bool>,

    /// Collapse formal pairs into contractions [default: true]
    #[arg(long, action = clap::ArgAction::Set)]
    contractions: Option<bool>,

    /// Split sentences longer than --max-sentence-words [default: false]
    #[arg(long, action = clap::ArgAction::Set)]
    split_long_sentences: Option<bool>,

    /// Word limit for sentence splitting [default: 25]
    #[arg(long)]
    max_sentence_words: Option<usize>,

    /// Compute the aligned word diff when comparing [default: true]
    #[arg(long, action = clap::ArgAction::Set)]
    aligned_diff: Option<bool>,

    /// Largest alignment matrix (cells) before the aligned diff is skipped [default: 4000000]
    #[arg(long)]
    max_alignment_cells: Option<usize>,
}

impl EngineArgs {
    /// Overlay the flags the user set onto the configured parameters.
    fn params(&self) -> Result<EngineParams, Box<dyn std::error::Error>> {
        let mut params = match &self.config {
            Some(path) => {
                let file = std::fs::File::open(path)?;
                serde_json::from_reader(std::io::BufReader::new(file))?
            }
            None => EngineParams::default(),
        };

        if !self.categories.is_empty() {
            params.strategy.categories = self.categories.clone();
        }
        if let Some(severity) = self.min_severity {
            params.strategy.min_severity = severity;
        }
        if let Some(selection) = self.selection {
            params.rewrite.selection = selection.into();
        }
        if let Some(v) = self.remove_fillers {
            params.rewrite.remove_fillers = v;
        }
        if let Some(v) = self.contractions {
            params.rewrite.contractions = v;
        }
        if let Some(v) = self.split_long_sentences {
            params.rewrite.split_long_sentences = v;
        }
        if let Some(v) = self.max_sentence_words {
            params.rewrite.max_sentence_words = v;
        }
        if let Some(v) = self.aligned_diff {
            params.compare.aligned_diff = v;
        }
        if let Some(v) = self.max_alignment_cells {
            params.compare.max_alignment_cells = v;
        }

        Ok(params)
    }

    fn engine(&self) -> Result<Engine, Box<dyn std::error::Error>> {
        let params = self.params()?;
        let lexicon = match &self.lexicon {
            Some(path) => read_lexicon(path)?,
            None => Lexicon::builtin(),
        };
        Ok(Engine::new(lexicon, params))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a text and list the AI-associated patterns found
    Detect {
        /// Input file [default: stdin]
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file [default: stdout]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: summary or json
        #[arg(long, value_enum, default_value = "summary")]
        format: OutputFormat,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Rewrite matched patterns into plainer alternatives
    Rewrite {
        /// Input file [default: stdin]
        #[arg(long)]
        input: Option<PathBuf>,

        /// Output file [default: stdout]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, summary or json
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Compare an original text with its rewrite
    ///
    /// Without --rewritten the original is rewritten first.
    Compare {
        /// Original text file [default: stdin]
        #[arg(long)]
        original: Option<PathBuf>,

        /// Rewritten text file
        #[arg(long)]
        rewritten: Option<PathBuf>,

        /// Output file (required for csv and viewer)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: summary, json, csv or viewer
        #[arg(long, value_enum, default_value = "summary")]
        format: OutputFormat,

        /// Print at most N changes in the summary
        #[arg(long)]
        show_changes: Option<usize>,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Process many files in parallel
    Batch {
        /// Input files or directories (.txt, .md, .text files are read from directories)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file path
        #[arg(long)]
        output: PathBuf,

        /// Output format: json or csv
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Export, import or inspect lexicon tables
    Lexicon {
        #[command(subcommand)]
        action: LexiconAction,
    },

    /// Benchmark detect, rewrite and compare throughput
    Benchmark {
        /// Number of iterations per stage
        #[arg(long, default_value = "200")]
        iterations: usize,

        /// Words in the generated text
        #[arg(long, default_value = "1000")]
        words: usize,
    },
}

#[derive(Subcommand)]
enum LexiconAction {
    /// Write the built-in (or --lexicon) table to a .json file or SQLite database
    Export {
        /// Destination; .json writes JSON, anything else a SQLite database
        #[arg(long)]
        output: PathBuf,

        /// Source lexicon [default: built-in]
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Validate a JSON lexicon and store it in a SQLite database
    Import {
        /// JSON lexicon file
        #[arg(long)]
        input: PathBuf,

        /// Destination database
        #[arg(long)]
        db: PathBuf,
    },

    /// Show entry counts
    Stats {
        /// Lexicon file [default: built-in]
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    match cli.command {
        Commands::Detect {
            input,
            output,
            format,
            engine,
        } => {
            let engine = engine.engine()?;
            let text = read_input(input.as_deref())?;
            let detection = engine.detect(&text);

            match format {
                OutputFormat::Json => write_json_output(&detection, output.as_deref())?,
                _ => {
                    let suggestions = engine.suggestions(&detection);
                    print_detection_summary(&detection, &suggestions);
                }
            }
        }

        Commands::Rewrite {
            input,
            output,
            format,
            engine,
        } => {
            let engine = engine.engine()?;
            let text = read_input(input.as_deref())?;
            let result = engine.rewrite(&text, None);

            match format {
                OutputFormat::Json => write_json_output(&result, output.as_deref())?,
                OutputFormat::Summary => print_rewrite_summary(&result),
                _ => match output {
                    Some(path) => std::fs::write(&path, &result.rewritten_text)?,
                    None => println!("{}", result.rewritten_text),
                },
            }
        }

        Commands::Compare {
            original,
            rewritten,
            output,
            format,
            show_changes,
            engine,
        } => {
            let engine = engine.engine()?;
            let original_text = read_input(original.as_deref())?;
            let rewritten_text = match rewritten {
                Some(path) => std::fs::read_to_string(path)?,
                None => engine.rewrite(&original_text, None).rewritten_text,
            };
            let report = engine.compare(&original_text, &rewritten_text);

            match format {
                OutputFormat::Json => write_json_output(&report, output.as_deref())?,
                OutputFormat::Csv => {
                    let path = output.ok_or("--output is required for csv")?;
                    write_changes_csv_file(&report.changes, &path)?;
                    eprintln!("CSV output: {}", path.display());
                }
                OutputFormat::Viewer => {
                    let path = output.ok_or("--output is required for viewer")?.with_extension("html");
                    let title = original
                        .as_deref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Comparison".to_string());
                    write_viewer_html_file(&report, &title, &path)?;
                    eprintln!("Viewer output: {}", path.display());
                }
                _ => print_comparison_summary(&report, show_changes),
            }
        }

        Commands::Batch {
            inputs,
            output,
            format,
            quiet,
            engine,
        } => {
            let engine = engine.engine()?;
            let files = expand_inputs(&inputs)?;
            let documents = read_documents(&files)?;
            info!(documents = documents.len(), "inputs read");

            let result = process_documents(&engine, &documents, !quiet);

            match format {
                OutputFormat::Csv => write_documents_csv_file(&result.documents, &output)?,
                _ => write_json_file(&result, &output)?,
            }

            if !quiet {
                print_batch_summary(&result);
                eprintln!("\nOutput: {}", output.display());
            }
        }

        Commands::Lexicon { action } => match action {
            LexiconAction::Export { output, lexicon } => {
                let lexicon = match lexicon {
                    Some(path) => read_lexicon(&path)?,
                    None => Lexicon::builtin(),
                };
                if is_json(&output) {
                    lexicon.to_json_file(&output)?;
                } else {
                    save_lexicon(&output, &lexicon)?;
                }
                println!("Exported {} entries to {}", lexicon.len(), output.display());
            }
            LexiconAction::Import { input, db } => {
                let lexicon = Lexicon::from_json_file(&input)?;
                let count = save_lexicon(&db, &lexicon)?;
                println!("Imported {} entries into {}", count, db.display());
            }
            LexiconAction::Stats { lexicon } => {
                let stats = match lexicon {
                    Some(path) if !is_json(&path) => load_lexicon_stats(&path)?,
                    Some(path) => read_lexicon(&path)?.stats(),
                    None => Lexicon::builtin().stats(),
                };
                print_lexicon_stats(&stats);
            }
        },

        Commands::Benchmark { iterations, words } => {
            run_benchmark(iterations, words);
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8, json: bool) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"))
}

/// Load a lexicon from JSON or a SQLite database, by extension.
fn read_lexicon(path: &Path) -> Result<Lexicon, Box<dyn std::error::Error>> {
    let lexicon = if is_json(path) {
        Lexicon::from_json_file(path)?
    } else {
        load_lexicon(path)?
    };
    Ok(lexicon)
}

/// Read a file, or stdin when no path is given.
fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn write_json_output<T: serde::Serialize>(
    value: &T,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => write_json_file(value, path)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_json(value, &mut handle)?;
            println!();
        }
    }
    Ok(())
}

/// Sample paragraph cycled to build benchmark input
const BENCHMARK_SAMPLE: &str = "Furthermore, it is important to note that we must utilize a \
    comprehensive approach. In order to leverage cutting-edge tools, the team will delve into \
    the data. The results were plain and the plan was simple.";

/// Run engine benchmark to measure throughput.
fn run_benchmark(iterations: usize, words: usize) {
    use std::time::Instant;

    println!("=== Engine Benchmark ===");
    println!("Iterations: {}", iterations);
    println!("Words: {}", words);

    let sample: Vec<&str> = BENCHMARK_SAMPLE.split_whitespace().collect();
    let mut text = String::new();
    for (i, word) in sample.iter().cycle().take(words).enumerate() {
        if i > 0 {
            text.push_str(if i % 120 == 0 { "\n\n" } else { " " });
        }
        text.push_str(word);
    }

    let engine = Engine::builtin();
    let iterations = iterations.max(1);

    let report = |label: &str, start: Instant| {
        let elapsed = start.elapsed();
        let per_run = elapsed.as_secs_f64() / iterations as f64;
        println!("\n{}:", label);
        println!("  Total time: {:.3}s", elapsed.as_secs_f64());
        println!("  Per run: {:.3}ms", per_run * 1000.0);
        println!("  Words/sec: {:.0}", words as f64 / per_run);
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = engine.detect(&text);
    }
    report("Detect", start);

    let detection = engine.detect(&text);
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = engine.rewrite(&text, Some(&detection));
    }
    report("Rewrite", start);

    let rewritten = engine.rewrite(&text, Some(&detection)).rewritten_text;
    let start = Instant::now();
    for _ in 0..iterations {
        let _ = engine.compare(&text, &rewritten);
    }
    report("Compare", start);
}

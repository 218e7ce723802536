use catset::{config, load, number, output, render, schedule};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shared flags for commands that select which questions to emit.
#[derive(clap::Args, Clone)]
struct SelectArgs {
    /// Include questions flagged optional = true in their records
    #[arg(long)]
    include_optional: bool,

    /// Only emit questions carrying this category tag
    #[arg(long)]
    category: Option<String>,
}

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "catset")]
#[command(about = "Typesets a TOML catechism source tree into a LaTeX document")]
#[command(long_about = "\
Typesets a TOML catechism source tree into a LaTeX document

Your source tree is the data source. One TOML record per question, ordered
by the id field inside each record, with answer fragments and their
scripture citations. catset rebuilds footnote numbering and writes a .tex
file for an external typesetting engine.

Source structure:

  questions/
  ├── config.toml                  # Document config (optional)
  ├── schedule.toml                # Weekly reading plan (optional)
  ├── 001.toml                     # One record per file
  ├── 002.toml
  └── lords-prayer/                # Records may be grouped in subdirectories
      ├── 098.toml
      └── 099.toml

Record format:

  id = \"1\"                         # ordering key, \"2.5\" sorts between 2 and 3
  question = \"What is thy only comfort in life and death?\"
  optional = false                 # excluded from default output when true
  section = \"comfort\"              # category tag for --category filtering

  [[sections]]
  text = \"That I with body and soul am not my own,\"
  verses = \"1 Corinthians 6:19; 1 Thessalonians 5:10\"

Run 'catset gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Source directory of question records
    #[arg(long, default_value = "questions", global = true)]
    source: PathBuf,

    /// Output .tex file
    #[arg(long, default_value = "catechism.tex", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline: load → number → render
    Build(SelectArgs),
    /// Validate the source tree without writing output
    Check {
        #[command(flatten)]
        select: SelectArgs,

        /// Dump the load manifest as JSON instead of the inventory
        #[arg(long)]
        json: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build(select) => {
            println!("==> Stage 1: Loading {}", cli.source.display());
            let manifest = load::load(&cli.source)?;
            report_warnings(&manifest.warnings);
            output::print_load_output(&manifest, &cli.source);

            let questions = selected_questions(&manifest, &select);
            render::validate(&questions)?;

            let scope = manifest.config.numbering;
            println!("==> Stage 2: Numbering footnotes ({scope})");
            let numbered = number::number_questions(&questions, scope);

            println!("==> Stage 3: Rendering {}", cli.output.display());
            let weeks = manifest.schedule.as_ref().map(schedule::week_starts);
            let doc = render::build_document(&numbered, &manifest.config, weeks.as_ref())?;
            render::write_document(&cli.output, &doc)?;
            output::print_build_output(&numbered, &cli.output);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check { select, json } => {
            let manifest = load::load(&cli.source)?;
            report_warnings(&manifest.warnings);

            let questions = selected_questions(&manifest, &select);
            render::validate(&questions)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&manifest)?);
            } else {
                println!("==> Checking {}", cli.source.display());
                output::print_load_output(&manifest, &cli.source);
                println!("==> Content is valid");
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Apply the inclusion policy: CLI flags win over config.toml where both
/// exist, and the category filter narrows the set further.
fn selected_questions(
    manifest: &load::Manifest,
    select: &SelectArgs,
) -> Vec<catset::types::Question> {
    let include_optional = select.include_optional || manifest.config.include_optional;
    manifest.included(include_optional, select.category.as_deref())
}

fn report_warnings(warnings: &[String]) {
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
}

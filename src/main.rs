mod archive;
mod combine;
mod error;
mod extract;
mod graph;
mod yaml;

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_yaml::{Mapping, Value};
use tracing::{error, info};

use extract::images::{Fetcher, HttpFetcher};

#[derive(Parser)]
#[command(name = "basil2yaml", about = "Convert Basil .recipe archives to YAML")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one or more Basil .recipe files to .yml files
    Convert {
        /// Directory for the individual .yml outputs
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
        /// Name output files after the recipe instead of the input file
        #[arg(long)]
        use_recipe_name: bool,
        /// Write all recipes to stdout as one multi-recipe YAML document
        #[arg(long)]
        combine: bool,
        /// Skip photo extraction entirely (no embedded data, no network)
        #[arg(long)]
        exclude_images: bool,
        /// One or more .recipe archives
        #[arg(required = true)]
        filenames: Vec<PathBuf>,
    },
    /// Merge previously converted .yml recipes into a single file
    Combine {
        /// Output file path
        #[arg(long, default_value = "all.yml")]
        output_file: PathBuf,
        /// Files to combine
        #[arg(required = true)]
        filenames: Vec<PathBuf>,
    },
    /// Print the decoded object graph of a .recipe archive
    Dump {
        filename: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            output_dir,
            use_recipe_name,
            combine,
            exclude_images,
            filenames,
        } => run_convert(&output_dir, use_recipe_name, combine, exclude_images, &filenames),
        Commands::Combine { output_file, filenames } => run_combine(&output_file, &filenames),
        Commands::Dump { filename } => run_dump(&filename),
    }
}

fn run_convert(
    output_dir: &Path,
    use_recipe_name: bool,
    combine: bool,
    exclude_images: bool,
    filenames: &[PathBuf],
) -> Result<()> {
    let fetcher = if exclude_images { None } else { Some(HttpFetcher::new()?) };
    let fetcher: Option<&dyn Fetcher> = fetcher.as_ref().map(|f| f as &dyn Fetcher);

    let mut combined = Vec::new();
    let mut failed = 0usize;
    for filename in filenames {
        info!("converting {}", filename.display());
        let recipe = match convert_file(filename, fetcher) {
            Ok(recipe) => recipe,
            Err(e) => {
                error!("skipping {}: {e:#}", filename.display());
                failed += 1;
                continue;
            }
        };

        if combine {
            combined.push(Value::Mapping(recipe));
            continue;
        }

        let out = output_path(output_dir, filename, use_recipe_name, &recipe);
        info!("writing {}", out.display());
        let written = yaml::encode(&Value::Mapping(recipe))
            .map_err(anyhow::Error::from)
            .and_then(|text| write_atomic(&out, &text));
        if let Err(e) = written {
            error!("failed to write {}: {e:#}", out.display());
            failed += 1;
        }
    }

    if combine {
        print!("{}", yaml::encode(&Value::Sequence(combined))?);
    }
    if failed > 0 {
        bail!("{failed} of {} files failed", filenames.len());
    }
    Ok(())
}

fn convert_file(path: &Path, fetcher: Option<&dyn Fetcher>) -> Result<Mapping> {
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let graph = archive::decode(&bytes)?;
    Ok(extract::assemble(&graph, fetcher)?)
}

fn output_path(
    output_dir: &Path,
    input: &Path,
    use_recipe_name: bool,
    recipe: &Mapping,
) -> PathBuf {
    let recipe_name = recipe
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty());
    let file = match (use_recipe_name, recipe_name) {
        (true, Some(name)) => format!("{name}.yml"),
        _ => {
            let input_name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "recipe".into());
            format!("{input_name}.yml")
        }
    };
    output_dir.join(file)
}

fn run_combine(output_file: &Path, filenames: &[PathBuf]) -> Result<()> {
    let recipes = combine::merge_files(filenames);
    info!("writing {} recipes to {}", recipes.len(), output_file.display());
    let text = yaml::encode(&Value::Sequence(recipes))?;
    write_atomic(output_file, &text)
        .with_context(|| format!("failed to write {}", output_file.display()))
}

fn run_dump(filename: &Path) -> Result<()> {
    let bytes =
        fs::read(filename).with_context(|| format!("failed to read {}", filename.display()))?;
    let graph = archive::decode(&bytes)?;
    println!("{graph:#?}");
    Ok(())
}

/// Write via a temp file in the destination directory, so the output path
/// only ever holds a complete document.
fn write_atomic(path: &Path, text: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.persist(path)?;
    Ok(())
}

//! multimark CLI - render MultiMarkdown element trees

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use multimark::{
    extract_metadata, load_file, load_reader, render, render_batch, render_with_stats,
    ElementTree, Extensions, Language, OutputFormat, RenderOptions,
};

#[derive(Parser)]
#[command(name = "multimark")]
#[command(author = "multimark contributors")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
#[command(about = "Render MultiMarkdown element trees to HTML, LaTeX, groff-mm and OPML", long_about = None)]
struct Cli {
    /// Input JSON tree files (stdin if none)
    #[arg(value_name = "FILE")]
    inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short = 't', long = "to", default_value = "html", value_parser = parse_format)]
    format: OutputFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write each input next to itself with the format's extension
    #[arg(short, long)]
    batch: bool,

    /// Plain markdown compatible output
    #[arg(short, long)]
    compatibility: bool,

    /// Print the value of a metadata key instead of rendering
    #[arg(short, long, value_name = "KEY")]
    extract: Option<String>,

    /// Drop raw HTML from HTML output
    #[arg(long)]
    filter_html: bool,

    /// Drop style blocks from HTML output
    #[arg(long)]
    filter_styles: bool,

    /// Do not generate heading labels
    #[arg(long = "nolabels")]
    no_labels: bool,

    /// Typography language (en, nl, fr, de, germanguillemets, sv)
    #[arg(long, value_parser = parse_language)]
    language: Option<Language>,

    /// Level of top-level headings (1-6)
    #[arg(long, env = "MULTIMARK_BASE_HEADER_LEVEL")]
    base_header_level: Option<u8>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document statistics
    Info {
        /// Input JSON tree file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Format used to count output
        #[arg(short = 't', long = "to", default_value = "html", value_parser = parse_format)]
        format: OutputFormat,
    },

    /// List supported output formats
    Formats,

    /// Show version information
    Version,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse::<OutputFormat>().map_err(|e| e.to_string())
}

fn parse_language(value: &str) -> Result<Language, String> {
    Ok(Language::from_metadata(value))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match &cli.command {
        Some(Commands::Info { input, format }) => cmd_info(input, *format),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_render(&cli),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn render_options(cli: &Cli) -> RenderOptions {
    let extensions = Extensions {
        compatibility: cli.compatibility,
        no_labels: cli.no_labels || cli.compatibility,
        filter_html: cli.filter_html,
        filter_styles: cli.filter_styles,
    };
    let mut options = RenderOptions::new().with_extensions(extensions);
    if let Some(language) = cli.language {
        options = options.with_language(language);
    }
    if let Some(level) = cli.base_header_level {
        options = options.with_base_header_level(level);
    }
    options
}

fn cmd_render(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let options = render_options(cli);

    if cli.batch {
        if cli.inputs.is_empty() {
            return Err("batch mode needs at least one input file".into());
        }
        return cmd_batch(&cli.inputs, cli.format, &options);
    }

    let tree = match cli.inputs.as_slice() {
        [] => load_reader(io::stdin().lock())?,
        [input] => load_file(input)?,
        _ => return Err("multiple inputs need --batch".into()),
    };

    if let Some(ref key) = cli.extract {
        if let Some(value) = extract_metadata(&tree, key) {
            println!("{}", value);
        }
        return Ok(());
    }

    let content = render(&tree, cli.format, &options)?;
    log::debug!("rendered {} bytes of {}", content.len(), cli.format);

    if let Some(ref path) = cli.output {
        fs::write(path, &content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", content)?;
    }
    Ok(())
}

fn cmd_batch(
    inputs: &[PathBuf],
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let trees = inputs
        .iter()
        .map(load_file)
        .collect::<multimark::Result<Vec<ElementTree>>>()?;

    let mut failed = 0;
    for (input, result) in inputs.iter().zip(render_batch(&trees, format, options)) {
        match result {
            Ok(content) => {
                let path = output_path(input, format);
                fs::write(&path, content)?;
                println!("  {} {}", "├─".dimmed(), path.display());
            }
            Err(e) => {
                failed += 1;
                eprintln!("  {} {}: {}", "├─".dimmed(), input.display(), e.to_string().red());
            }
        }
    }

    if failed > 0 {
        return Err(format!("{} of {} documents failed", failed, inputs.len()).into());
    }
    println!("{} {} documents", "Rendered".green().bold(), inputs.len());
    Ok(())
}

/// Output file for an input in batch mode.
fn output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.file_extension())
}

fn cmd_info(input: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let tree = load_file(input)?;
    let result = render_with_stats(&tree, format, &RenderOptions::default())?;
    let stats = &result.stats;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Elements".bold(), tree.len());
    println!("{}: {}", "Format".bold(), result.format);
    for key in ["title", "author", "date"] {
        if let Some(value) = extract_metadata(&tree, key) {
            println!("{}: {}", capitalize(key).bold(), value);
        }
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Tables".bold(), stats.table_count);
    println!("{}: {}", "Images".bold(), stats.image_count);
    println!("{}: {}", "Links".bold(), stats.link_count);
    println!("{}: {}", "Footnotes".bold(), stats.note_count);
    println!("{}: {}", "Citations".bold(), stats.citation_count);
    println!("{}: {}", "Glossary".bold(), stats.glossary_count);
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);
    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn cmd_formats() {
    println!("{}", "Output formats".cyan().bold());
    for format in OutputFormat::ALL {
        println!("  {} {} (.{})", "├─".dimmed(), format, format.file_extension());
    }
}

fn cmd_version() {
    println!("{} {}", "multimark".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("MultiMarkdown element tree renderer");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/multimark/multimark".dimmed()
    );
    println!("License: MIT");
}

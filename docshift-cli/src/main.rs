use anyhow::Result;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use docshift::{convert_path, BatchReport};
use docshift_core::RewriteConfig;

#[derive(Parser)]
#[command(name = "docshift")]
#[command(about = "A rule-based markdown document rewriter with a configurable pipeline")]
struct Args {
    /// Files or directories to convert (directories are walked recursively)
    inputs: Vec<String>,

    /// Path to custom rule config (YAML, or JSON for .json paths)
    #[arg(short, long)]
    config: Option<String>,

    /// Output directory for converted documents
    #[arg(short, long, default_value = "converted")]
    out_dir: String,

    /// Comma-separated file extensions picked up when walking directories
    #[arg(long, default_value = "md,mdx")]
    extensions: String,

    /// Write a JSON batch report to this path
    #[arg(long)]
    report: Option<String>,

    /// Convert without writing any output files
    #[arg(long)]
    dry_run: bool,

    /// Print the effective rule config as YAML and exit
    #[arg(long)]
    show_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = RewriteConfig::load_with_fallback(args.config.as_deref());

    if args.show_config {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    if args.inputs.is_empty() {
        println!("⚠️  No inputs given. Pass files or directories to convert.");
        return Ok(());
    }

    let extensions: Vec<String> = args
        .extensions
        .split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_string())
        .collect();

    let mut files = Vec::new();
    for input in &args.inputs {
        let path = Path::new(input);
        if path.is_dir() {
            walk_dir(path, &extensions, &mut files)?;
        } else if path.is_file() {
            // Explicit file arguments bypass the extension filter
            files.push(path.to_path_buf());
        } else {
            println!("⚠️  Input not found: {input}");
        }
    }
    files.sort();
    files.dedup();

    println!("📄 Converting {} document(s)", files.len());

    let mut outcomes = Vec::new();
    for path in &files {
        let (outcome, conversion) = convert_path(path, &config);
        match conversion {
            Some(conversion) => {
                if conversion.log.is_empty() {
                    println!("   ✅ {}", outcome.id);
                } else {
                    println!("   ⚠️  {} ({} flag(s))", outcome.id, conversion.log.len());
                    for entry in &conversion.log {
                        println!("      line {}: [{}] {}", entry.line, entry.rule, entry.note);
                    }
                }
                if !args.dry_run {
                    let out_path = output_path(&args.out_dir, path);
                    if let Some(parent) = out_path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&out_path, conversion.document.to_text())?;
                }
            }
            // Fatal outcomes are isolated per document: no partial output,
            // the rest of the batch keeps going. Unreadable sources land
            // here too.
            None => {
                let reason = outcome.error.as_deref().unwrap_or("unknown failure");
                println!("   ❌ {}: {reason}", outcome.id);
            }
        }
        outcomes.push(outcome);
    }

    let report = BatchReport::new(outcomes);
    println!(
        "\n📊 {} converted, {} fatal, {} flag(s) total",
        report.converted, report.fatal, report.total_flags
    );
    if let Some(path) = &args.report {
        report.write_json(path)?;
        println!("📝 Report written to: {path}");
    }

    if report.fatal > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn walk_dir(dir: &Path, extensions: &[String], files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, extensions, files)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|allowed| allowed == ext))
            .unwrap_or(false)
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Mirror the source path under the output directory; absolute inputs
/// keep only their file name.
fn output_path(out_dir: &str, source: &Path) -> PathBuf {
    let relative = if source.is_absolute() {
        source.file_name().map(Path::new).unwrap_or(source)
    } else {
        source
    };
    Path::new(out_dir).join(relative)
}

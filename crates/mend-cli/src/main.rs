use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mend_config::{ConfigDiagnostics, MendConfig};
use mend_core::{Diagnostic, Span};
use mend_correction::{compute_proposals, CorrectionRequest, Proposal, Workspace};
use mend_syntax::OutlineItem;
use serde::Serialize;
use std::path::{Path, PathBuf};

mod apply;
mod snapshot;

#[derive(Parser)]
#[command(name = "mend", version, about = "Quick-fix proposals for Java compiler diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute ranked correction proposals for the diagnostics of a file
    Fix(FixArgs),
    /// Print the declaration outline of a single file
    Parse(ParseArgs),
    /// Inspect `mend.toml` configuration
    Config(ConfigArgs),
}

#[derive(Args)]
struct FixArgs {
    /// Java file the diagnostics were reported for
    file: PathBuf,
    /// JSON file holding an array of diagnostics (`-` reads stdin)
    #[arg(long)]
    diagnostics: PathBuf,
    /// Byte range `START..END` to correct (defaults to the first diagnostic)
    #[arg(long, value_parser = parse_selection)]
    selection: Option<Span>,
    /// Directory containing package-rooted sources; may be repeated
    #[arg(long = "source-root")]
    source_roots: Vec<PathBuf>,
    /// Config file (defaults to `mend.toml` in the source root or current directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Apply the proposal with this 1-based index to the files on disk
    #[arg(long, value_name = "N")]
    apply: Option<usize>,
    /// Emit JSON suitable for tooling
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ParseArgs {
    /// File to parse
    file: PathBuf,
    /// Emit JSON suitable for tooling
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the JSON schema of `mend.toml`
    Schema,
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Command::Fix(args) => fix(args),
        Command::Parse(args) => {
            mend_config::init_tracing(&MendConfig::default().logging);
            let text = std::fs::read_to_string(&args.file)
                .with_context(|| format!("failed to read {}", args.file.display()))?;
            let parse = mend_syntax::parse(&text);
            let unit = parse.compilation_unit();
            let report = ParseReport {
                package: unit.package.as_ref().map(|p| p.name.clone()),
                imports: unit
                    .imports
                    .iter()
                    .map(|import| {
                        let mut path = import.path.clone();
                        if import.is_star {
                            path.push_str(".*");
                        }
                        if import.is_static {
                            path.insert_str(0, "static ");
                        }
                        path
                    })
                    .collect(),
                types: mend_syntax::outline(unit),
            };
            if args.json {
                print_json(&report)?;
            } else {
                print_parse_report(&report);
            }
            Ok(0)
        }
        Command::Config(args) => match args.command {
            ConfigCommand::Schema => {
                print_json(&mend_config::json_schema())?;
                Ok(0)
            }
        },
    }
}

fn fix(args: FixArgs) -> Result<i32> {
    let snapshot = snapshot::load(&args.file, &args.source_roots)?;
    let config = load_config(args.config.as_deref(), &snapshot.focus_root)?;
    mend_config::init_tracing(&config.logging);

    let diagnostics = read_diagnostics(&args.diagnostics)?;
    let len = snapshot.focus_text().len();
    for (idx, diagnostic) in diagnostics.iter().enumerate() {
        if diagnostic.range.start > diagnostic.range.end || diagnostic.range.end > len {
            anyhow::bail!(
                "diagnostic #{} range {:?} is outside {} ({len} bytes)",
                idx + 1,
                diagnostic.range,
                args.file.display()
            );
        }
    }

    let mut request = CorrectionRequest::new(snapshot.focus.clone(), diagnostics);
    if let Some(selection) = args.selection {
        if selection.end > len {
            anyhow::bail!(
                "selection {selection:?} is outside {} ({len} bytes)",
                args.file.display()
            );
        }
        request = request.with_selection(selection);
    }

    let workspace = Workspace::new(snapshot.sources());
    let proposals = compute_proposals(&workspace, &request, &config.correction);
    tracing::info!(
        target: "mend.cli",
        file = %request.file,
        diagnostics = request.diagnostics.len(),
        proposals = proposals.len(),
        "computed proposals"
    );

    let mut report = FixReport {
        file: request.file.to_string(),
        proposals: &proposals,
        applied: None,
    };

    let mut exit = 0;
    if let Some(index) = args.apply {
        match index.checked_sub(1).and_then(|idx| proposals.get(idx)) {
            Some(proposal) => {
                let written = apply::apply_edit_to_disk(&snapshot, &proposal.edit)?;
                report.applied = Some(Applied {
                    index,
                    label: proposal.label.clone(),
                    files: written,
                });
            }
            None => {
                eprintln!(
                    "no proposal #{index} to apply ({} available)",
                    proposals.len()
                );
                exit = 1;
            }
        }
    }

    if args.json {
        print_json(&report)?;
    } else {
        print_fix_report(&report);
    }
    Ok(exit)
}

fn load_config(explicit: Option<&Path>, source_root: &Path) -> Result<MendConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => mend_config::discover_config_path(source_root).or_else(|| {
            std::env::current_dir()
                .ok()
                .and_then(|cwd| mend_config::discover_config_path(&cwd))
        }),
    };
    let Some(path) = path else {
        return Ok(MendConfig::default());
    };

    let (config, diagnostics) = MendConfig::load_from_path_with_diagnostics(&path)
        .with_context(|| format!("invalid config {}", path.display()))?;
    report_config_diagnostics(&path, &diagnostics);
    Ok(config)
}

fn report_config_diagnostics(path: &Path, diagnostics: &ConfigDiagnostics) {
    for key in &diagnostics.unknown_keys {
        eprintln!("warning: {}: unknown key `{key}`", path.display());
    }
    for warning in &diagnostics.warnings {
        eprintln!("warning: {}: {warning}", path.display());
    }
}

fn read_diagnostics(path: &Path) -> Result<Vec<Diagnostic>> {
    let text = if path.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read diagnostics from stdin")?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&text)
        .with_context(|| format!("invalid diagnostics in {}", path.display()))
}

fn parse_selection(value: &str) -> std::result::Result<Span, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|_| format!("`{part}` is not a byte offset"))
    };
    match value.split_once("..") {
        Some((start, end)) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if start > end {
                return Err(format!("selection start {start} is after its end {end}"));
            }
            Ok(Span::new(start, end))
        }
        None => parse(value).map(Span::empty),
    }
}

#[derive(Serialize)]
struct FixReport<'a> {
    file: String,
    proposals: &'a [Proposal],
    #[serde(skip_serializing_if = "Option::is_none")]
    applied: Option<Applied>,
}

#[derive(Serialize)]
struct Applied {
    index: usize,
    label: String,
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
struct ParseReport {
    package: Option<String>,
    imports: Vec<String>,
    types: Vec<OutlineItem>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value)?;
    println!("{out}");
    Ok(())
}

fn print_fix_report(report: &FixReport<'_>) {
    if report.proposals.is_empty() {
        println!("{}: no proposals", report.file);
    }
    for (idx, proposal) in report.proposals.iter().enumerate() {
        println!("{:>3}. {} [{}]", idx + 1, proposal.label, proposal.relevance);
    }
    if let Some(applied) = &report.applied {
        println!("applied #{}: {}", applied.index, applied.label);
        for file in &applied.files {
            println!("  wrote {}", file.display());
        }
    }
}

fn print_parse_report(report: &ParseReport) {
    if let Some(package) = &report.package {
        println!("package {package}");
    }
    for import in &report.imports {
        println!("import {import}");
    }
    for item in &report.types {
        print_outline_item(item, 0);
    }
}

fn print_outline_item(item: &OutlineItem, depth: usize) {
    let indent = "  ".repeat(depth);
    match &item.detail {
        Some(detail) => println!(
            "{indent}{} {} {} @{}..{}",
            item.kind, item.name, detail, item.range.start, item.range.end
        ),
        None => println!(
            "{indent}{} {} @{}..{}",
            item.kind, item.name, item.range.start, item.range.end
        ),
    }
    for child in &item.children {
        print_outline_item(child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selections_parse_as_byte_ranges() {
        assert_eq!(parse_selection("10..14"), Ok(Span::new(10, 14)));
        assert_eq!(parse_selection("7"), Ok(Span::empty(7)));
        assert!(parse_selection("14..10").is_err());
        assert!(parse_selection("a..b").is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

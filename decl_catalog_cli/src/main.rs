use clap::Parser;
use decl_catalog::config::runtime::{
    parse_log_level, parse_output_format, ConfigError, LogLevel, OutputFormat, RuntimeConfig,
};
use decl_catalog::{batch, logging, pipeline, CatalogReport, DeclarationKind, FileCatalogWriter};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Catalog constant, variable and function declarations in C sources
#[derive(Debug, Parser)]
#[command(name = "catalog", version)]
struct Cli {
    /// C source file or directory; prompted for when omitted
    path: Option<PathBuf>,

    /// Directory receiving constants.txt, functions.txt and variables.txt
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Catalog format: text, or json for an extra catalog.json manifest
    #[arg(long, value_parser = parse_format_arg)]
    format: Option<OutputFormat>,

    /// Runtime configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Don't search subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Worker threads for directories; 1 catalogs sequentially
    #[arg(long, default_value_t = num_cpus::get())]
    threads: usize,

    /// Limit the number of files cataloged from a directory
    #[arg(long, value_name = "N")]
    max_files: Option<usize>,

    /// Stop a directory run at the first failing file
    #[arg(long)]
    fail_fast: bool,

    /// Suppress progress reporting
    #[arg(long, short)]
    quiet: bool,

    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,

    /// Minimum log level: error, warning, info or debug
    #[arg(long, value_parser = parse_level_arg)]
    log_level: Option<LogLevel>,
}

fn parse_format_arg(value: &str) -> Result<OutputFormat, String> {
    parse_output_format(value).ok_or_else(|| format!("unknown format '{}'", value))
}

fn parse_level_arg(value: &str) -> Result<LogLevel, String> {
    parse_log_level(value).ok_or_else(|| format!("unknown log level '{}'", value))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("Error: {}", error);
            logging::print_cargo_style_summary();
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let runtime = build_runtime_config(cli)?;

    logging::config::init_runtime_preferences(runtime.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    let input_path = match &cli.path {
        Some(path) => path.clone(),
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            prompt_for_path(&mut stdin.lock(), &mut stdout)?
        }
    };

    let succeeded = if input_path.is_dir() {
        catalog_directory(&input_path, batch_config(cli, runtime))
    } else {
        catalog_single_file(&input_path, &runtime, cli.quiet)
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Defaults, then the `--config` file, then command-line overrides
fn build_runtime_config(cli: &Cli) -> Result<RuntimeConfig, ConfigError> {
    let mut runtime = match &cli.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };

    if let Some(output_dir) = &cli.output_dir {
        runtime.output.output_dir = output_dir.clone();
    }
    if let Some(format) = cli.format {
        runtime.output.format = format;
    }
    if cli.structured_logs {
        runtime.logging.use_structured_logging = true;
    }
    if let Some(level) = cli.log_level {
        runtime.logging.min_log_level = level;
    }

    Ok(runtime)
}

fn batch_config(cli: &Cli, runtime: RuntimeConfig) -> batch::BatchConfig {
    batch::BatchConfig {
        max_threads: cli.threads.max(1),
        recursive: !cli.no_recursive,
        max_files: cli.max_files,
        progress_reporting: !cli.quiet,
        fail_fast: cli.fail_fast,
        write_output: true,
        runtime,
    }
}

/// Ask for the input path on `output` and read one line from `input`
fn prompt_for_path<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PathBuf> {
    write!(output, "Enter the path of the C source file: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input path given",
        ));
    }

    Ok(PathBuf::from(trimmed))
}

fn catalog_single_file(file_path: &Path, runtime: &RuntimeConfig, quiet: bool) -> bool {
    if !quiet {
        println!("Cataloging file: {}", file_path.display());
    }

    let writer = FileCatalogWriter::from_preferences(&runtime.output).with_source(file_path);

    match pipeline::process_and_report(file_path, runtime, &writer) {
        Ok(report) => {
            let succeeded = match runtime.output.format {
                OutputFormat::Json => print_report_json(&report),
                OutputFormat::Text => {
                    print_report_counts(&report);
                    true
                }
            };
            logging::print_cargo_style_summary();
            succeeded
        }
        Err(error) => {
            eprintln!("\nFAILED: {}", error);
            if let pipeline::PipelineError::Output { catalog, .. } = &error {
                eprintln!("Scan completed but nothing was written:");
                print_report_counts(&catalog.report());
            }
            logging::print_cargo_style_summary();
            false
        }
    }
}

fn print_report_counts(report: &CatalogReport) {
    for (name, count) in &report.counts {
        println!("  {:<10} {}", name, count);
    }
    if report.metrics.skipped_constructs() > 0 {
        println!(
            "  skipped    {} (truncated or unterminated constructs)",
            report.metrics.skipped_constructs()
        );
    }
    if let Some(output) = &report.output {
        println!(
            "Wrote {} declarations to {}",
            output.records_written, output.destination
        );
    }
}

fn print_report_json(report: &CatalogReport) -> bool {
    match serde_json::to_string_pretty(report) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(error) => {
            eprintln!("Failed to serialize catalog report: {}", error);
            false
        }
    }
}

fn catalog_directory(dir_path: &Path, config: batch::BatchConfig) -> bool {
    if config.progress_reporting {
        println!("Starting batch cataloging: {}", dir_path.display());
        println!(
            "Configuration: {} threads, recursive={}, fail_fast={}",
            config.max_threads, config.recursive, config.fail_fast
        );
        if let Some(max_files) = config.max_files {
            println!("File limit: {} files maximum", max_files);
        }
    }

    match batch::process_directory_with_config(dir_path, &config) {
        Ok(results) => {
            print_batch_results(&results);
            logging::print_cargo_style_summary();

            results.failure_count() == 0
        }
        Err(error) => {
            eprintln!("Batch cataloging failed: [{}] {}", error.error_code(), error);
            logging::print_cargo_style_summary();
            false
        }
    }
}

fn print_batch_results(results: &batch::BatchResults) {
    println!("\nBatch Summary:");
    println!("  Files discovered: {}", results.files_discovered);
    println!("  {}", results.summary());
    for kind in DeclarationKind::ALL {
        println!("  {:<10} {}", kind.logical_name(), results.count(kind));
    }

    if results.failure_count() > 0 {
        println!("\nFailed Files:");
        for (file_path, error) in &results.failed_files {
            println!("  {}: [{}] {}", file_path.display(), error.error_code(), error);
        }
    }

    if results.success_count() > 0 && results.success_count() <= 10 {
        println!("\nCataloged Files:");
        for file in &results.successful_files {
            println!(
                "  {}: {} declarations",
                file.path.display(),
                file.result.total_records()
            );
        }
    } else if results.success_count() > 10 {
        println!("\n{} files cataloged", results.success_count());
    }

    let diagnostics = logging::get_processing_summary();
    if diagnostics.total_errors > 0 || diagnostics.total_warnings > 0 {
        println!(
            "\nDiagnostics: {} errors, {} warnings",
            diagnostics.total_errors, diagnostics.total_warnings
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Cursor;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["catalog", "src/main.c"]).unwrap();
        assert_eq!(cli.path, Some(PathBuf::from("src/main.c")));
        assert_eq!(cli.threads, num_cpus::get());
        assert!(!cli.no_recursive);
        assert!(cli.format.is_none());
    }

    #[test]
    fn test_parse_batch_options() {
        let cli = Cli::try_parse_from([
            "catalog",
            "srcdir",
            "--threads",
            "4",
            "--fail-fast",
            "--no-recursive",
            "--max-files",
            "10",
            "--quiet",
        ])
        .unwrap();

        let config = batch_config(&cli, RuntimeConfig::default());
        assert_eq!(config.max_threads, 4);
        assert!(config.fail_fast);
        assert!(!config.recursive);
        assert!(!config.progress_reporting);
        assert_eq!(config.max_files, Some(10));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(Cli::try_parse_from(["catalog", "--threads", "many"]).is_err());
        assert!(Cli::try_parse_from(["catalog", "--format", "yaml"]).is_err());
        assert!(Cli::try_parse_from(["catalog", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_overrides_apply_over_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("catalog.toml");
        std::fs::write(
            &config_path,
            "[output]\noutput_dir = \"from_file\"\nformat = \"json\"\n",
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "catalog",
            "--config",
            config_path.to_str().unwrap(),
            "--log-level",
            "debug",
            "--structured-logs",
        ])
        .unwrap();
        let runtime = build_runtime_config(&cli).unwrap();
        assert_eq!(runtime.output.output_dir, PathBuf::from("from_file"));
        assert_eq!(runtime.output.format, OutputFormat::Json);
        assert_eq!(runtime.logging.min_log_level, LogLevel::Debug);
        assert!(runtime.logging.use_structured_logging);

        let cli = Cli::try_parse_from([
            "catalog",
            "--config",
            config_path.to_str().unwrap(),
            "--output-dir",
            "cli_out",
            "--format",
            "text",
        ])
        .unwrap();
        let runtime = build_runtime_config(&cli).unwrap();
        assert_eq!(runtime.output.output_dir, PathBuf::from("cli_out"));
        assert_eq!(runtime.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_missing_config_file() {
        let cli = Cli::try_parse_from(["catalog", "--config", "/nonexistent/catalog.toml"]).unwrap();
        assert_matches!(build_runtime_config(&cli), Err(ConfigError::Io { .. }));
    }

    #[test]
    fn test_prompt_for_path() {
        let mut input = Cursor::new("  demo/input.c \n");
        let mut output = Vec::new();

        let path = prompt_for_path(&mut input, &mut output).unwrap();
        assert_eq!(path, PathBuf::from("demo/input.c"));
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Enter the path of the C source file: "
        );
    }

    #[test]
    fn test_prompt_rejects_empty_input() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        assert!(prompt_for_path(&mut input, &mut output).is_err());
    }

    #[test]
    fn test_single_file_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("demo.c");
        std::fs::write(&source, "const int A = 1;\nvoid f() { }\n").unwrap();

        let mut runtime = RuntimeConfig::default();
        runtime.output.output_dir = dir.path().join("out");

        assert!(catalog_single_file(&source, &runtime, true));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("out").join("functions.txt")).unwrap(),
            "void f() { }\n"
        );
        assert!(!catalog_single_file(
            &dir.path().join("missing.c"),
            &runtime,
            true
        ));
    }

    #[test]
    fn test_single_file_json_format_writes_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("demo.h");
        std::fs::write(&source, "int n;\nchar c = 'x';\n").unwrap();

        let mut runtime = RuntimeConfig::default();
        runtime.output.output_dir = dir.path().join("out");
        runtime.output.format = OutputFormat::Json;

        assert!(catalog_single_file(&source, &runtime, true));
        assert!(dir.path().join("out").join("catalog.json").is_file());

        let writer = FileCatalogWriter::new(dir.path().join("again"));
        let report = pipeline::process_and_report(&source, &runtime, &writer).unwrap();
        assert_eq!(report.counts["variables"], 2);
        assert!(print_report_json(&report));
    }
}

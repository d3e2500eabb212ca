//! Command-line interface for the cppuml utility
//!
//! Converts one C++ source file into a class diagram file.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use cppuml::core::logging::init_logging;
use cppuml::core::{DiagramWriter, MemberLayout};
use cppuml::plugins::mermaid::MermaidWriter;
use cppuml::plugins::orchestrator::{Converter, Settings, DEFAULT_DIALECT};
use cppuml::plugins::plantuml::PlantUmlWriter;

/// cppuml - Produce a class diagram from C++ source code
#[derive(Parser, Debug)]
#[command(name = "cppuml")]
#[command(about = "Produces a PlantUML class diagram from a C++ source code.")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    /// A path to a source code
    pub source: PathBuf,

    /// An output file (use - for stdout) [default: out.puml, or out.mmd for mermaid]
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// A version of C++ standard to use (e.g. "c++20")
    #[arg(long = "std", value_name = "VERSION", default_value = DEFAULT_DIALECT)]
    pub std: String,

    /// Force overwrite the output file
    #[arg(short, long)]
    pub force: bool,

    /// A title for your UML
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Render a variable's type before its name
    #[arg(long)]
    pub cstyle: bool,

    /// Enable icons instead of characters for access specifiers
    #[arg(long)]
    pub icons: bool,

    /// Output markup
    #[arg(long, value_enum, default_value_t = OutputFormat::Plantuml)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Supported diagram markups
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Plantuml,
    Mermaid,
}

impl OutputFormat {
    pub fn writer(self) -> Box<dyn DiagramWriter> {
        match self {
            OutputFormat::Plantuml => Box::new(PlantUmlWriter::new()),
            OutputFormat::Mermaid => Box::new(MermaidWriter::new()),
        }
    }
}

impl Cli {
    /// Output path, defaulting to `out.<extension>` for the chosen format
    pub fn output_path(&self) -> PathBuf {
        match &self.out {
            Some(path) => path.clone(),
            None => PathBuf::from(format!("out.{}", self.format.writer().extension())),
        }
    }

    pub fn settings(&self) -> Settings {
        let layout = if self.cstyle {
            MemberLayout::TypeFirst
        } else {
            MemberLayout::NameFirst
        };
        let settings = Settings::new()
            .with_layout(layout)
            .with_access_icons(self.icons)
            .with_dialect(self.std.as_str());
        match &self.title {
            Some(title) => settings.with_title(title.as_str()),
            None => settings,
        }
    }
}

/// Main CLI application
pub struct CppumlApp;

impl CppumlApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Explicit flags win; otherwise init_logging falls back to the environment
        let log_level = cli.log_level.map(|l| l.as_str());
        let log_format = cli.log_format.map(|f| f.as_str());
        if let Err(e) = init_logging(log_level, log_format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("cppuml v{}", env!("CARGO_PKG_VERSION"));
        }

        let output = cli.output_path();
        let converter = Converter::new(cli.settings()).with_writer(cli.format.writer());

        if is_stdout(&output) {
            let document = converter.convert(&cli.source)?;
            self.write_stdout(&document)?;
        } else {
            converter.translate(&cli.source, &output, cli.force)?;
            if cli.verbose {
                eprintln!("Wrote {}", output.display());
            }
        }

        info!(source = %cli.source.display(), "Conversion finished");
        Ok(())
    }

    /// Write the document to stdout
    pub fn write_stdout(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

impl Default for CppumlApp {
    fn default() -> Self {
        Self::new()
    }
}

fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == "-"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["cppuml", "shapes.hpp"]).unwrap();
        assert_eq!(cli.source, PathBuf::from("shapes.hpp"));
        assert_eq!(cli.output_path(), PathBuf::from("out.puml"));
        assert_eq!(cli.std, "c++17");
        assert!(!cli.force);
        assert!(!cli.cstyle);
        assert!(!cli.icons);
        assert_eq!(cli.format, OutputFormat::Plantuml);
        assert!(cli.log_level.is_none());

        let settings = cli.settings();
        assert_eq!(settings.layout, MemberLayout::NameFirst);
        assert!(settings.title.is_none());
    }

    #[test]
    fn test_cli_all_options() {
        let cli = Cli::try_parse_from([
            "cppuml",
            "shapes.hpp",
            "-o",
            "diagram.puml",
            "--std",
            "c++20",
            "-f",
            "--title",
            "Shapes",
            "--cstyle",
            "--icons",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.output_path(), PathBuf::from("diagram.puml"));
        assert!(cli.force);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert_eq!(cli.log_format, Some(LogFormat::Json));

        let settings = cli.settings();
        assert_eq!(settings.dialect, "c++20");
        assert_eq!(settings.title.as_deref(), Some("Shapes"));
        assert_eq!(settings.layout, MemberLayout::TypeFirst);
        assert!(settings.access_icons);
    }

    #[test]
    fn test_mermaid_default_output() {
        let cli = Cli::try_parse_from(["cppuml", "a.hpp", "--format", "mermaid"]).unwrap();
        assert_eq!(cli.output_path(), PathBuf::from("out.mmd"));
        assert_eq!(cli.format.writer().name(), "mermaid");
    }

    #[test]
    fn test_source_is_required() {
        assert!(Cli::try_parse_from(["cppuml"]).is_err());
    }

    #[test]
    fn test_is_stdout() {
        assert!(is_stdout(Path::new("-")));
        assert!(!is_stdout(Path::new("out.puml")));
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("shapes.hpp");
        let output = dir.path().join("shapes.puml");
        fs::write(&source, "class Shape {};\nclass Circle : public Shape { double r; };\n").unwrap();

        let cli = Cli::try_parse_from([
            "cppuml",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        CppumlApp::new().run(cli).unwrap();

        let doc = fs::read_to_string(&output).unwrap();
        assert!(doc.starts_with("@startuml\n"));
        assert!(doc.contains("class Circle {\n\t- r: double\n}"));
        assert!(doc.contains("Shape <|.. Circle"));
    }

    #[test]
    fn test_run_refuses_existing_output() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.hpp");
        let output = dir.path().join("a.puml");
        fs::write(&source, "struct A { int x; };\n").unwrap();
        fs::write(&output, "keep me").unwrap();

        let args = [
            "cppuml",
            source.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ];
        let err = CppumlApp::new()
            .run(Cli::try_parse_from(args).unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("already exists. Use -f to overwrite."));
        assert_eq!(fs::read_to_string(&output).unwrap(), "keep me");

        let mut forced = args.to_vec();
        forced.push("-f");
        CppumlApp::new()
            .run(Cli::try_parse_from(forced).unwrap())
            .unwrap();
        assert!(fs::read_to_string(&output).unwrap().contains("class A {"));
    }

    #[test]
    fn test_run_missing_source() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.puml");
        let cli = Cli::try_parse_from([
            "cppuml",
            "missing.hpp",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let err = CppumlApp::new().run(cli).unwrap_err();
        assert!(err.to_string().contains("not found"));
        assert!(!output.exists());
    }
}

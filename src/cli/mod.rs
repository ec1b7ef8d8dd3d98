//! Command-line interface for shotscene.
//!
//! Provides commands for converting stories into shot lists, showing the
//! resolved configuration, and checking the completion service.

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{load_config, ConvertConfig, ResolvedConfig};
use crate::core::Converter;
use crate::domain::{OutputFormat, ShotList};

/// shotscene - Convert stories into film scenes and shots
#[derive(Parser, Debug)]
#[command(name = "shotscene")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert story text into a shot list
    Convert {
        /// Input files (reads stdin if none are given)
        #[arg(short, long)]
        input: Vec<PathBuf>,

        /// Output file, or output directory when converting several inputs
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Model to invoke
        #[arg(short, long)]
        model: Option<String>,

        /// Base URL of an OpenAI-compatible API
        #[arg(long)]
        base_url: Option<String>,

        /// Language for headings and descriptions
        #[arg(short, long)]
        language: Option<String>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum conversions in flight when several inputs are given
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },

    /// Show resolved configuration
    Config,

    /// Check that the completion service accepts the configured credential
    Check,
}

/// Output format for CLI (maps to OutputFormat)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Yaml,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

impl FormatArg {
    fn extension(self) -> &'static str {
        match self {
            FormatArg::Json => "json",
            FormatArg::Yaml => "yaml",
            FormatArg::Markdown => "md",
        }
    }
}

/// Flag overrides applied on top of file and environment configuration
#[derive(Debug, Default)]
struct Overrides {
    model: Option<String>,
    base_url: Option<String>,
    language: Option<String>,
    temperature: Option<f32>,
}

impl Overrides {
    fn apply(self, config: &mut ConvertConfig) {
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(language) = self.language {
            config.language = Some(language);
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Convert {
                input,
                output,
                format,
                model,
                base_url,
                language,
                temperature,
                concurrency,
            } => {
                let overrides = Overrides {
                    model,
                    base_url,
                    language,
                    temperature,
                };
                run_convert(input, output, format, overrides, concurrency).await
            }
            Commands::Config => show_config(),
            Commands::Check => check_service().await,
        }
    }
}

fn resolve_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config(&cwd)
}

/// Convert one or more stories
async fn run_convert(
    inputs: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: FormatArg,
    overrides: Overrides,
    concurrency: usize,
) -> Result<()> {
    let mut config = resolve_config()?.convert;
    overrides.apply(&mut config);
    let converter = Converter::new(config);

    if inputs.len() <= 1 {
        let text = match inputs.first() {
            Some(path) => read_input_file(path)?,
            None => read_stdin()?,
        };

        let shot_list = converter.convert(&text).await?;
        let rendered = shot_list.render(format.into())?;

        match output {
            Some(path) => {
                write_output(&path, &rendered)?;
                print_summary(&shot_list, Some(&path));
            }
            None => {
                println!("{}", rendered);
                print_summary(&shot_list, None);
            }
        }
        return Ok(());
    }

    // Several inputs: one output file per input
    let texts = inputs
        .iter()
        .map(|path| read_input_file(path))
        .collect::<Result<Vec<_>>>()?;

    let results = converter.convert_batch(texts, concurrency).await;

    let mut failures = 0usize;
    for (path, result) in inputs.iter().zip(results) {
        match result {
            Ok(shot_list) => {
                let target = batch_output_path(path, output.as_deref(), format);
                write_output(&target, &shot_list.render(format.into())?)?;
                print_summary(&shot_list, Some(&target));
            }
            Err(e) => {
                failures += 1;
                eprintln!("[{}] failed: {}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} conversions failed", failures, inputs.len());
    }

    Ok(())
}

fn read_input_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        anyhow::bail!("No input provided. Use --input <file> or pipe to stdin");
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer)
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

/// `<dir>/<stem>.shots.<ext>`, next to the input unless a directory is given
fn batch_output_path(input: &Path, output_dir: Option<&Path>, format: FormatArg) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "story".to_string());
    let file_name = format!("{}.shots.{}", stem, format.extension());

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

fn print_summary(shot_list: &ShotList, written_to: Option<&Path>) {
    let destination = written_to
        .map(|p| format!(" -> {}", p.display()))
        .unwrap_or_default();
    eprintln!(
        "[{} scene(s), {} shot(s) from {}{}]",
        shot_list.scene_count(),
        shot_list.shot_count(),
        shot_list.model,
        destination
    );
}

/// Show resolved configuration (credential redacted)
fn show_config() -> Result<()> {
    let resolved = resolve_config()?;
    let cfg = &resolved.convert;

    println!("shotscene configuration");
    println!();
    println!(
        "Config file: {}",
        resolved
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("API key:     {}", cfg.redacted_api_key());
    println!();
    print!("{}", serde_yaml::to_string(cfg).context("Failed to render configuration")?);

    Ok(())
}

/// Check the completion service
async fn check_service() -> Result<()> {
    let config = resolve_config()?.convert;
    let base_url = config.base_url.clone();
    let converter = Converter::new(config);

    converter
        .health_check()
        .await
        .with_context(|| format!("Completion service check failed for {}", base_url))?;

    println!("OK: {} accepted the configured API key", base_url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_args_parse() {
        let cli = Cli::try_parse_from([
            "shotscene",
            "convert",
            "-i",
            "a.txt",
            "-i",
            "b.txt",
            "--format",
            "markdown",
            "--model",
            "gpt-4o",
        ])
        .unwrap();

        match cli.command {
            Commands::Convert {
                input,
                format,
                model,
                concurrency,
                ..
            } => {
                assert_eq!(input, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
                assert!(matches!(format, FormatArg::Markdown));
                assert_eq!(model.as_deref(), Some("gpt-4o"));
                assert_eq!(concurrency, 4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = ConvertConfig::default();
        Overrides {
            model: Some("gpt-4o".into()),
            temperature: Some(0.1),
            ..Default::default()
        }
        .apply(&mut config);

        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.1);
        assert!(config.language.is_none());
    }

    #[test]
    fn test_batch_output_path() {
        let input = Path::new("stories/heist.txt");

        assert_eq!(
            batch_output_path(input, None, FormatArg::Json),
            PathBuf::from("stories/heist.shots.json")
        );
        assert_eq!(
            batch_output_path(input, Some(Path::new("out")), FormatArg::Markdown),
            PathBuf::from("out/heist.shots.md")
        );
    }
}

//! `vellum enhance` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use vellum_config::{CliSettings, Config, MermaidSettings};
use vellum_diagrams::{FlowchartConfig, KrokiEngine, MermaidConfig};
use vellum_renderer::{EnhanceSummary, PageEnhancer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the enhance command.
#[derive(Args)]
pub(crate) struct EnhanceArgs {
    /// HTML files or directories (all `**/*.html` below them).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output directory mirroring the input layout (default: rewrite in place).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover vellum.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, env = "VELLUM_KROKI_URL")]
    kroki_url: Option<String>,

    /// Class marking article content regions (overrides config).
    #[arg(long)]
    article_class: Option<String>,

    /// Enable verbose output (per-file progress and diagram errors).
    #[arg(short, long)]
    pub verbose: bool,
}

/// HTML file to process and its location relative to the input root.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InputFile {
    path: PathBuf,
    relative: PathBuf,
}

impl EnhanceArgs {
    /// Execute the enhance command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or input discovery fails, or if any
    /// file could not be processed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            kroki_url: self.kroki_url,
            article_class: self.article_class,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        if let Some(kroki_url) = &config.diagrams.kroki_url {
            output.info(&format!("Kroki URL: {kroki_url}"));
        } else {
            output.info("Diagram rendering: client-side (no kroki_url in config)");
        }

        let enhancer = enhancer_from_config(&config);
        let files = collect_inputs(&self.inputs)?;
        if files.is_empty() {
            output.warning("No HTML files found");
            return Ok(());
        }

        let mut total = EnhanceSummary::default();
        let mut failed = 0usize;
        for file in &files {
            let target = target_path(file, self.output.as_deref());
            match process_file(&enhancer, &file.path, &target) {
                Ok(summary) => {
                    tracing::info!(
                        path = %file.path.display(),
                        diagrams = summary.blocks.diagrams,
                        highlighted = summary.blocks.highlighted,
                        tocs = summary.tocs,
                        "Enhanced"
                    );
                    accumulate(&mut total, &summary);
                }
                Err(e) => {
                    output.error(&format!("{}: {e}", file.path.display()));
                    failed += 1;
                }
            }
        }

        output.success(&format!(
            "Enhanced {} file(s): {} diagram(s), {} code block(s), {} table(s) of contents",
            files.len() - failed,
            total.blocks.diagrams,
            total.blocks.highlighted,
            total.tocs
        ));
        if total.diagrams.failed > 0 {
            output.warning(&format!(
                "{} diagram(s) failed to render",
                total.diagrams.failed
            ));
        }

        if failed > 0 {
            return Err(CliError::Validation(format!(
                "{failed} file(s) could not be processed"
            )));
        }
        Ok(())
    }
}

/// Build the page enhancer described by `config`.
fn enhancer_from_config(config: &Config) -> PageEnhancer {
    let enhancer = PageEnhancer::new()
        .with_article_class(config.content.article_class.clone())
        .with_default_language(config.content.default_language.clone())
        .with_toc_title(config.toc.title.clone());

    match &config.diagrams.kroki_url {
        Some(url) => enhancer.with_diagram_engine(
            KrokiEngine::new(url.clone(), mermaid_config(&config.diagrams.mermaid))
                .with_timeout(config.diagrams.timeout()),
        ),
        None => enhancer,
    }
}

/// Mermaid initialization from settings; theme variables override the
/// built-in palette key by key.
fn mermaid_config(settings: &MermaidSettings) -> MermaidConfig {
    let mut config = MermaidConfig {
        theme: settings.theme.clone(),
        security_level: settings.security_level.clone(),
        flowchart: FlowchartConfig {
            html_labels: settings.flowchart_html_labels,
            curve: settings.flowchart_curve.clone(),
        },
        ..MermaidConfig::default()
    };
    config.theme_variables.extend(
        settings
            .theme_variables
            .iter()
            .map(|(name, value)| (name.clone(), value.clone())),
    );
    config
}

/// Expand inputs into HTML files.
///
/// A file input is taken as is; a directory contributes every `**/*.html`
/// below it. Relative paths are computed against the input itself so that
/// output mirrors the input layout.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<InputFile>, CliError> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            let relative = input
                .file_name()
                .map(PathBuf::from)
                .ok_or_else(|| CliError::Validation(format!("Invalid input: {}", input.display())))?;
            files.push(InputFile {
                path: input.clone(),
                relative,
            });
        } else if input.is_dir() {
            let root = input.to_string_lossy();
            let root = glob::Pattern::escape(root.trim_end_matches(['/', '\\']));
            let pattern = format!("{root}/**/*.html");
            for entry in glob::glob(&pattern)? {
                let path = entry?;
                if !path.is_file() {
                    continue;
                }
                let relative = path.strip_prefix(input).unwrap_or(path.as_path()).to_path_buf();
                files.push(InputFile { path, relative });
            }
        } else {
            return Err(CliError::Validation(format!(
                "Input not found: {}",
                input.display()
            )));
        }
    }

    Ok(files)
}

/// Where the enhanced version of `file` is written.
fn target_path(file: &InputFile, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.join(&file.relative),
        None => file.path.clone(),
    }
}

/// Enhance one file and write the result to `target`.
fn process_file(
    enhancer: &PageEnhancer,
    source: &Path,
    target: &Path,
) -> Result<EnhanceSummary, CliError> {
    let html = std::fs::read_to_string(source)?;
    let mut doc = vellum_dom::Document::parse(&html);
    let summary = enhancer.enhance_document(&mut doc);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(target, doc.to_html())?;
    Ok(summary)
}

fn accumulate(total: &mut EnhanceSummary, summary: &EnhanceSummary) {
    total.regions += summary.regions;
    total.blocks.diagrams += summary.blocks.diagrams;
    total.blocks.highlighted += summary.blocks.highlighted;
    total.blocks.formatted += summary.blocks.formatted;
    total.diagrams.rendered += summary.diagrams.rendered;
    total.diagrams.failed += summary.diagrams.failed;
    total.tocs += summary.tocs;
}

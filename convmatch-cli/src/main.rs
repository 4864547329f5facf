use clap::Parser;
use convmatch::image::io::{load_raster, resize_to_target, save_png, ImageSize};
use convmatch::image::synth::{checkerboard, gradient};
use convmatch::point::to_grayscale;
use convmatch::{
    process, trace_at, ConvMatchError, ConvolutionPass, GrayscaleMethod, Kernel, MatchFilter,
    MatchPass, MatchPeak, Metric, Operation, OperationTrace, PointOp, Preset, Raster, ScoreMap,
    Selection,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ConvMatch CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum InputConfig {
    File { path: String },
    Gradient { width: usize, height: usize },
    Checkerboard { width: usize, height: usize, square: usize },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SizeConfig {
    #[default]
    Tiny,
    Small,
    Medium,
    Large,
    Original,
}

impl From<SizeConfig> for ImageSize {
    fn from(value: SizeConfig) -> Self {
        match value {
            SizeConfig::Tiny => ImageSize::Tiny,
            SizeConfig::Small => ImageSize::Small,
            SizeConfig::Medium => ImageSize::Medium,
            SizeConfig::Large => ImageSize::Large,
            SizeConfig::Original => ImageSize::Original,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ColorModeConfig {
    #[default]
    Color,
    Grayscale,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum PresetConfig {
    Identity,
    BoxBlur,
    GaussianBlur,
    Sharpen,
    EdgeDetect,
    SobelHorizontal,
    SobelVertical,
    Emboss,
}

impl From<PresetConfig> for Preset {
    fn from(value: PresetConfig) -> Self {
        match value {
            PresetConfig::Identity => Preset::Identity,
            PresetConfig::BoxBlur => Preset::BoxBlur,
            PresetConfig::GaussianBlur => Preset::GaussianBlur,
            PresetConfig::Sharpen => Preset::Sharpen,
            PresetConfig::EdgeDetect => Preset::EdgeDetect,
            PresetConfig::SobelHorizontal => Preset::SobelHorizontal,
            PresetConfig::SobelVertical => Preset::SobelVertical,
            PresetConfig::Emboss => Preset::Emboss,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum GrayscaleMethodConfig {
    #[default]
    Luminosity,
    Average,
    Lightness,
}

impl From<GrayscaleMethodConfig> for GrayscaleMethod {
    fn from(value: GrayscaleMethodConfig) -> Self {
        match value {
            GrayscaleMethodConfig::Luminosity => GrayscaleMethod::Luminosity,
            GrayscaleMethodConfig::Average => GrayscaleMethod::Average,
            GrayscaleMethodConfig::Lightness => GrayscaleMethod::Lightness,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MetricConfig {
    #[default]
    Ncc,
    Ssd,
    Sad,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Ncc => Metric::Ncc,
            MetricConfig::Ssd => Metric::Ssd,
            MetricConfig::Sad => Metric::Sad,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SelectionConfig {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TemplateConfig {
    Path(String),
    Selection(SelectionConfig),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OperationConfig {
    Convolution {
        preset: Option<PresetConfig>,
        kernel_size: Option<usize>,
        kernel: Option<Vec<Vec<f64>>>,
        normalize: Option<bool>,
    },
    SobelCombined,
    Grayscale {
        #[serde(default)]
        method: GrayscaleMethodConfig,
    },
    Brightness {
        amount: i32,
    },
    Contrast {
        factor: f64,
    },
    Threshold {
        threshold: f64,
    },
    Invert,
    TemplateMatching {
        #[serde(default)]
        metric: MetricConfig,
        template: TemplateConfig,
    },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FilterConfig {
    threshold: u8,
    limit: Option<usize>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let filter = MatchFilter::default();
        Self {
            threshold: filter.threshold,
            limit: filter.limit,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    input: InputConfig,
    #[serde(default)]
    size: SizeConfig,
    #[serde(default)]
    color_mode: ColorModeConfig,
    operation: OperationConfig,
    #[serde(default)]
    progressive: bool,
    #[serde(default)]
    trace_points: Vec<(usize, usize)>,
    output_path: String,
    #[serde(default)]
    report_path: Option<String>,
    #[serde(default)]
    filter: FilterConfig,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum TraceRecord {
    Convolution {
        x: usize,
        y: usize,
        result: [u8; 3],
        taps: usize,
    },
    Point {
        x: usize,
        y: usize,
        input: [u8; 4],
        result: [u8; 4],
        formula: String,
    },
    Match {
        x: usize,
        y: usize,
        score: f64,
        normalized_score: u8,
        formula: String,
        valid: bool,
    },
}

impl TraceRecord {
    fn new(x: usize, y: usize, trace: OperationTrace) -> Self {
        match trace {
            OperationTrace::Convolution(trace) => TraceRecord::Convolution {
                x,
                y,
                result: [trace.result.r, trace.result.g, trace.result.b],
                taps: trace.steps.len(),
            },
            OperationTrace::Point(trace) => TraceRecord::Point {
                x,
                y,
                input: [trace.input.r, trace.input.g, trace.input.b, trace.input.a],
                result: [trace.result.r, trace.result.g, trace.result.b, trace.result.a],
                formula: trace.formula,
            },
            OperationTrace::Match(trace) => TraceRecord::Match {
                x,
                y,
                score: trace.score,
                normalized_score: trace.normalized_score,
                valid: trace.is_valid(),
                formula: trace.formula,
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    value: u8,
    score: f64,
}

impl From<MatchPeak> for MatchRecord {
    fn from(value: MatchPeak) -> Self {
        Self {
            x: value.x,
            y: value.y,
            value: value.value,
            score: value.score,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    operation: &'static str,
    width: usize,
    height: usize,
    output_path: String,
    trace_points: Vec<TraceRecord>,
    matches: Vec<MatchRecord>,
}

fn load_input(input: &InputConfig) -> Result<Raster, ConvMatchError> {
    match input {
        InputConfig::File { path } => load_raster(path),
        InputConfig::Gradient { width, height } => gradient(*width, *height),
        InputConfig::Checkerboard {
            width,
            height,
            square,
        } => checkerboard(*width, *height, *square),
    }
}

fn build_kernel(
    preset: Option<PresetConfig>,
    kernel_size: Option<usize>,
    kernel: Option<Vec<Vec<f64>>>,
    normalize: Option<bool>,
) -> Result<(Kernel, bool), Box<dyn std::error::Error>> {
    if let Some(rows) = kernel {
        return Ok((Kernel::new(rows)?, normalize.unwrap_or(false)));
    }
    let preset = Preset::from(preset.unwrap_or(PresetConfig::Identity));
    let size = kernel_size.unwrap_or(3);
    let kernel = preset
        .at_size(size)
        .ok_or_else(|| format!("preset {} is not available at size {size}", preset.name()))?;
    Ok((kernel, normalize.unwrap_or_else(|| preset.normalize())))
}

fn build_operation(
    config: OperationConfig,
    source: &Raster,
) -> Result<Operation, Box<dyn std::error::Error>> {
    let op = match config {
        OperationConfig::Convolution {
            preset,
            kernel_size,
            kernel,
            normalize,
        } => {
            let (kernel, normalize) = build_kernel(preset, kernel_size, kernel, normalize)?;
            Operation::Convolve { kernel, normalize }
        }
        OperationConfig::SobelCombined => Operation::SobelCombined,
        OperationConfig::Grayscale { method } => Operation::Point(PointOp::Grayscale {
            method: method.into(),
        }),
        OperationConfig::Brightness { amount } => {
            Operation::Point(PointOp::Brightness { amount })
        }
        OperationConfig::Contrast { factor } => Operation::Point(PointOp::Contrast { factor }),
        OperationConfig::Threshold { threshold } => {
            Operation::Point(PointOp::Threshold { threshold })
        }
        OperationConfig::Invert => Operation::Point(PointOp::Invert),
        OperationConfig::TemplateMatching { metric, template } => {
            let template = match template {
                TemplateConfig::Path(path) => load_raster(path)?,
                TemplateConfig::Selection(sel) => {
                    Selection::new(sel.x, sel.y, sel.width, sel.height)
                        .confirm()?
                        .extract(source)?
                }
            };
            Operation::Match {
                template,
                metric: metric.into(),
            }
        }
    };
    Ok(op)
}

/// Runs the operation one coordinate at a time, logging progress.
fn run_progressive(
    source: &Raster,
    op: &Operation,
    filter: &MatchFilter,
) -> Result<(Raster, Vec<MatchPeak>), Box<dyn std::error::Error>> {
    match op {
        Operation::Convolve { kernel, normalize } => {
            let mut pass = ConvolutionPass::new(source, kernel, *normalize);
            let mut reported = 0u8;
            while pass.step().is_some() {
                if pass.progress() >= reported.saturating_add(25) {
                    reported = pass.progress();
                    tracing::info!(progress = reported, "convolution pass");
                }
            }
            Ok((pass.output(), Vec::new()))
        }
        Operation::Match { template, metric } => {
            let mut pass = MatchPass::new(source, template, *metric)?;
            let mut reported = 0u8;
            while pass.step().is_some() {
                if pass.progress() >= reported.saturating_add(25) {
                    reported = pass.progress();
                    tracing::info!(progress = reported, "matching pass");
                }
            }
            let matches = pass.matches(filter);
            Ok((pass.output(), matches))
        }
        other => {
            tracing::warn!(
                operation = other.name(),
                "no progressive pass for this operation, running a full pass"
            );
            Ok((process(source, other)?, Vec::new()))
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("convmatch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.output_path.is_empty() {
        return Err("output_path must be set in the config".into());
    }

    let mut source = resize_to_target(&load_input(&config.input)?, config.size.into())?;
    if matches!(config.color_mode, ColorModeConfig::Grayscale) {
        source = to_grayscale(&source, GrayscaleMethod::Luminosity);
    }
    let filter = MatchFilter {
        threshold: config.filter.threshold,
        limit: config.filter.limit,
    };
    let op = build_operation(config.operation, &source)?;
    tracing::info!(
        operation = op.name(),
        width = source.width(),
        height = source.height(),
        "processing"
    );

    let (output, matches) = if config.progressive {
        run_progressive(&source, &op, &filter)?
    } else {
        match &op {
            Operation::Match { template, metric } => {
                let map = ScoreMap::compute(&source, template, *metric)?;
                (map.heat_map()?, map.best_matches(&filter))
            }
            other => (process(&source, other)?, Vec::new()),
        }
    };
    save_png(&output, &config.output_path)?;

    let mut trace_points = Vec::with_capacity(config.trace_points.len());
    for &(x, y) in &config.trace_points {
        match trace_at(&source, &op, x, y) {
            Ok(Some(trace)) => trace_points.push(TraceRecord::new(x, y, trace)),
            Ok(None) => tracing::warn!(x, y, "operation has no traced path"),
            Err(err) => tracing::warn!(x, y, %err, "trace skipped"),
        }
    }

    let report = Output {
        operation: op.name(),
        width: output.width(),
        height: output.height(),
        output_path: config.output_path,
        trace_points,
        matches: matches.into_iter().map(MatchRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;

    match config.report_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

//! Trace contours on a grid and print a JSON summary.
//!
//! Reads a JSON grid or generates a synthetic field, extracts the
//! configured levels and reports every contour with its labels.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use contour::{
    extract_levels, Closure, ContourConfig, ContourSegment, Grid, GridSpec, LabelConfig, Method,
    SmoothingConfig, TickConfig,
};
use geodesy::{LinearTransform, PlotTransform};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Field {
    /// Cone peaking at the centre
    Peak,
    /// Value equals x
    Ramp,
    /// Checkerboard of highs and lows
    Sinusoid,
    /// Global grid, latitude plus a cosine wave in longitude
    Global,
}

#[derive(Parser, Debug)]
#[command(name = "contour-trace")]
#[command(about = "Extract and label contours from a regular grid")]
struct Args {
    /// JSON grid file (synthetic field when omitted)
    #[arg(short, long)]
    grid: Option<PathBuf>,

    /// JSON contour configuration (environment defaults when omitted)
    #[arg(short, long, env = "CONTOUR_CONFIG")]
    config: Option<PathBuf>,

    /// Synthetic field to generate
    #[arg(long, value_enum, default_value = "sinusoid")]
    field: Field,

    /// Synthetic grid columns
    #[arg(long, default_value = "64")]
    nx: usize,

    /// Synthetic grid rows
    #[arg(long, default_value = "64")]
    ny: usize,

    /// Explicit levels, comma separated
    #[arg(short, long, value_delimiter = ',')]
    levels: Vec<f64>,

    /// Level interval when no levels are given
    #[arg(short, long)]
    interval: Option<f64>,

    /// Smoothing factor (0 disables)
    #[arg(long)]
    smooth: Option<usize>,

    /// Label spacing in plot units
    #[arg(long)]
    label_spacing: Option<f64>,

    /// Label only levels that are multiples of this
    #[arg(long)]
    annotation_interval: Option<f64>,

    /// Tick innermost closed contours: [+|-][spacing/length], + highs only, - lows only
    #[arg(long, allow_hyphen_values = true)]
    ticks: Option<String>,

    /// Plot width; paths are mapped onto a plot of this size
    #[arg(long)]
    plot_width: Option<f64>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn synthetic(field: Field, nx: usize, ny: usize) -> Result<Grid> {
    let spec = match field {
        Field::Global => GridSpec::global(nx, ny),
        _ => GridSpec::unit(nx, ny),
    };
    let (cx, cy) = ((nx as f64 - 1.0) / 2.0, (ny as f64 - 1.0) / 2.0);
    let mut data = Vec::with_capacity(nx * ny);
    for row in 0..ny {
        for col in 0..nx {
            let (x, y) = (spec.col_to_x(col as f64), spec.row_to_y(row as f64));
            let z = match field {
                Field::Peak => cx.min(cy) - (x - cx).hypot(y - cy),
                Field::Ramp => x,
                Field::Sinusoid => (x / 6.0).sin() * (y / 6.0).cos(),
                Field::Global if col + 1 == nx => y + 20.0,
                Field::Global => y + 20.0 * x.to_radians().cos(),
            };
            data.push(z as f32);
        }
    }
    Ok(Grid::new(spec, data)?)
}

fn load_config(args: &Args) -> Result<ContourConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ContourConfig::from_json(&text)?
        }
        None => ContourConfig::from_env(),
    };

    if !args.levels.is_empty() {
        config.levels = args.levels.clone();
    }
    if args.interval.is_some() {
        config.interval = args.interval;
    }
    if let Some(factor) = args.smooth {
        config.trace.smoothing = SmoothingConfig::new(factor, Method::Akima);
    }
    if let Some(spacing) = args.label_spacing {
        config.labels = Some(LabelConfig::spacing(spacing));
    }
    if args.annotation_interval.is_some() {
        config.annotation_interval = args.annotation_interval;
    }
    if let Some(spec) = &args.ticks {
        match TickConfig::from_str(spec) {
            Some(ticks) => config.ticks = Some(ticks),
            None => bail!("invalid tick specification: {spec}"),
        }
    }
    if config.levels.is_empty() && config.interval.is_none() {
        config.interval = Some(0.25);
    }
    if let Err(e) = config.validate() {
        bail!("invalid configuration: {e}");
    }
    Ok(config)
}

fn closure_name(closure: &Closure) -> &'static str {
    match closure {
        Closure::Open => "open",
        Closure::Closed => "closed",
        Closure::PeriodicLeft => "periodic_left",
        Closure::PeriodicRight => "periodic_right",
        Closure::PolarCap { north: true } => "north_cap",
        Closure::PolarCap { north: false } => "south_cap",
    }
}

fn summary(segments: &[ContourSegment]) -> serde_json::Value {
    let contours: Vec<serde_json::Value> = segments
        .iter()
        .map(|s| {
            let length: f64 = s.points.windows(2).map(|w| w[0].distance(&w[1])).sum();
            serde_json::json!({
                "level": s.level,
                "text": s.text,
                "closure": closure_name(&s.closure),
                "points": s.points.len(),
                "length": length,
                "labels": s.labels,
                "extremum": s.extremum,
                "ticks": s.ticks.len(),
            })
        })
        .collect();
    serde_json::json!({
        "contours": contours.len(),
        "labels": segments.iter().map(|s| s.labels.len()).sum::<usize>(),
        "ticks": segments.iter().map(|s| s.ticks.len()).sum::<usize>(),
        "segments": contours,
    })
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr);
    if args.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }

    let grid = match &args.grid {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let grid: Grid = serde_json::from_str(&text)?;
            Grid::with_padding(grid.spec, grid.data, grid.pad)?
        }
        None => synthetic(args.field, args.nx, args.ny)?,
    };
    let config = load_config(&args)?;
    info!(
        nx = grid.nx(),
        ny = grid.ny(),
        levels = config.levels_for(&grid).len(),
        labels = config.labels.is_some(),
        "Tracing contours"
    );

    let transform: Option<Arc<dyn PlotTransform>> = args.plot_width.map(|width| {
        let region = grid.spec.bbox();
        let height = width * region.height() / region.width();
        Arc::new(LinearTransform::fit(&region, width, height)) as Arc<dyn PlotTransform>
    });

    let segments = extract_levels(&grid, &config, transform)?;
    info!(
        contours = segments.len(),
        points = segments.iter().map(|s| s.points.len()).sum::<usize>(),
        "Extraction complete"
    );

    println!("{}", serde_json::to_string_pretty(&summary(&segments))?);
    Ok(())
}

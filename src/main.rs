//! Landgen CLI - grammar-driven terrain height-field generator.
//!
//! Generate ridge and noise height rasters and export them as PNG or RAW.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glam::{IVec2, Vec3};
use std::path::PathBuf;
use std::time::Instant;

use landgen::config::TerrainConfig;
use landgen::export::{
    expected_file_size, export_field_png, export_field_raw, PngExportOptions, RawFormat,
};
use landgen::noise::{sample_fractal_noise, FractalNoiseConfig, NoiseField, NoiseKind};
use landgen::pipeline::{GenerationMode, Pipeline};
use landgen::skeleton::GraphConfig;
use landgen::terrain::{map_float_to_int, map_to_8bit, ElevationGenerator, HeightField};

/// Procedural terrain height-field generator.
#[derive(Parser)]
#[command(name = "landgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a height field and export it.
    Generate {
        /// TOML configuration file. Flags below override its values.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Raster width in cells.
        #[arg(long)]
        width: Option<u32>,

        /// Raster height in cells.
        #[arg(long)]
        height: Option<u32>,

        /// Seed of the ridge generator.
        #[arg(short, long)]
        seed: Option<i32>,

        /// Layers to compose.
        #[arg(short, long)]
        mode: Option<ModeArg>,

        /// Ridge parameter preset, replacing the configured graph.
        #[arg(short, long)]
        preset: Option<PresetArg>,

        /// Rule text, e.g. "F{FF:50,F+F:50}".
        #[arg(long)]
        rules: Option<String>,

        /// Axiom the rules rewrite.
        #[arg(long)]
        axiom: Option<String>,

        /// Rewriting rounds.
        #[arg(long)]
        iterations: Option<u32>,

        /// Start at the raster centre.
        #[arg(long, conflicts_with = "random_start")]
        center: bool,

        /// Start at a random cell inside this centred fraction of the raster.
        #[arg(long)]
        random_start: Option<f32>,

        /// Seed of the noise layer.
        #[arg(long)]
        noise_seed: Option<i32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,
    },

    /// Evaluate fractal noise at one point.
    #[command(allow_negative_numbers = true)]
    Noise {
        x: f32,
        y: f32,
        #[arg(default_value = "0.0")]
        z: f32,

        #[arg(short, long, default_value = "42")]
        seed: i32,

        #[arg(short, long, default_value = "perlin")]
        kind: KindArg,

        #[arg(long, default_value = "6")]
        octaves: u32,

        #[arg(long, default_value = "2.0")]
        lacunarity: f32,

        #[arg(long, default_value = "0.5")]
        persistence: f32,
    },

    /// Display raster size and export footprint for a configuration.
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Full,
    NoiseOnly,
    ElevationOnly,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => GenerationMode::Full,
            ModeArg::NoiseOnly => GenerationMode::NoiseOnly,
            ModeArg::ElevationOnly => GenerationMode::ElevationOnly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Ridge,
    BranchingRange,
    RollingHills,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Perlin,
    Simplex,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 8-bit grayscale PNG.
    Png,
    /// 16-bit grayscale PNG.
    Png16,
    /// 8-bit RAW.
    Raw8,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 16-bit RAW big-endian.
    RawBe,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            width,
            height,
            seed,
            mode,
            preset,
            rules,
            axiom,
            iterations,
            center,
            random_start,
            noise_seed,
            output,
            name,
            format,
        } => {
            let mut terrain = load_config(config.as_ref())?;
            if let Some(preset) = preset {
                let start = terrain.graph.start;
                terrain.graph = match preset {
                    PresetArg::Ridge => GraphConfig::ridge(),
                    PresetArg::BranchingRange => GraphConfig::branching_range(),
                    PresetArg::RollingHills => GraphConfig::rolling_hills(),
                };
                terrain.graph.start = start;
            }
            if let Some(width) = width {
                terrain.width = width;
            }
            if let Some(height) = height {
                terrain.height = height;
            }
            if let Some(seed) = seed {
                terrain.seed = seed;
            }
            if let Some(mode) = mode {
                terrain.mode = mode.into();
            }
            if let Some(rules) = rules {
                terrain.graph.rules = rules;
            }
            if let Some(axiom) = axiom {
                terrain.graph.axiom = axiom;
            }
            if let Some(iterations) = iterations {
                terrain.graph.iterations = iterations;
            }
            if let Some(noise_seed) = noise_seed {
                terrain.noise.seed = noise_seed;
            }
            terrain.validate()?;

            if center || random_start.is_some() {
                let mut generator = ElevationGenerator::new(terrain.seed, terrain.width, terrain.height);
                terrain.graph.start = match random_start {
                    Some(safe_zone) => generator.random_coord(safe_zone),
                    None => generator.center_coord(),
                };
            }

            run_generate(&terrain, output, &name, format)
        }
        Commands::Noise {
            x,
            y,
            z,
            seed,
            kind,
            octaves,
            lacunarity,
            persistence,
        } => {
            let config = FractalNoiseConfig {
                kind: match kind {
                    KindArg::Perlin => NoiseKind::Perlin,
                    KindArg::Simplex => NoiseKind::Simplex,
                },
                octaves,
                lacunarity,
                persistence,
                ..FractalNoiseConfig::with_seed(seed)
            };
            run_noise(Vec3::new(x, y, z), &config);
            Ok(())
        }
        Commands::Info {
            config,
            width,
            height,
        } => {
            let mut terrain = load_config(config.as_ref())?;
            terrain.width = width.unwrap_or(terrain.width);
            terrain.height = height.unwrap_or(terrain.height);
            terrain.validate()?;
            run_info(&terrain);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<TerrainConfig> {
    match path {
        Some(path) => TerrainConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => Ok(TerrainConfig::default()),
    }
}

fn run_generate(terrain: &TerrainConfig, output: PathBuf, name: &str, format: ExportFormat) -> Result<()> {
    let start = Instant::now();
    log::info!(
        "generating {}x{} terrain, mode {}, seed {}",
        terrain.width,
        terrain.height,
        terrain.mode.name(),
        terrain.seed
    );
    if !in_raster(terrain.graph.start, terrain) && terrain.mode != GenerationMode::NoiseOnly {
        log::warn!(
            "start {:?} lies outside the {}x{} raster",
            terrain.graph.start,
            terrain.width,
            terrain.height
        );
    }

    let pipeline = Pipeline::for_mode(terrain.mode, terrain.stage_config());
    let mut field = HeightField::new(terrain.width, terrain.height);
    pipeline.run_with_callbacks(
        &mut field,
        |name, i, total| log::info!("[{}/{}] Starting: {}", i + 1, total, name),
        |name, i, total| log::info!("[{}/{}] Completed: {}", i + 1, total, name),
    )?;

    let (lo, hi) = field.height_range();
    log::info!("generation completed in {:.2?}, samples span {}..={}", start.elapsed(), lo, hi);

    std::fs::create_dir_all(&output)
        .with_context(|| format!("creating output directory {}", output.display()))?;
    let (extension, raw) = match format {
        ExportFormat::Png | ExportFormat::Png16 => ("png", None),
        ExportFormat::Raw8 => ("raw", Some(RawFormat::R8)),
        ExportFormat::Raw => ("raw", Some(RawFormat::R16LittleEndian)),
        ExportFormat::RawBe => ("raw", Some(RawFormat::R16BigEndian)),
    };
    let path = output.join(format!("{}.{}", name, extension));
    match (format, raw) {
        (_, Some(raw)) => export_field_raw(&field, &path, raw),
        (ExportFormat::Png16, None) => export_field_png(&field, &path, &PngExportOptions::sixteen_bit()),
        (_, None) => export_field_png(&field, &path, &PngExportOptions::default()),
    }
    .with_context(|| format!("exporting {}", path.display()))?;

    Ok(())
}

fn in_raster(p: IVec2, terrain: &TerrainConfig) -> bool {
    p.x >= 0 && p.y >= 0 && (p.x as u32) < terrain.width && (p.y as u32) < terrain.height
}

fn run_noise(pos: Vec3, config: &FractalNoiseConfig) {
    let field = NoiseField::new(config.seed);
    let value = sample_fractal_noise(&field, pos, config);

    println!("Noise at ({}, {}, {}), {} octaves", pos.x, pos.y, pos.z, config.octaves);
    println!("  Raw:    {:.6}", value);
    println!("  8-bit:  {}", map_to_8bit(value, -1.0, 1.0));
    println!("  Offset: {:+}", map_float_to_int(value, -1.0, 1.0, 0, 255));
}

fn run_info(terrain: &TerrainConfig) {
    let (width, height) = (terrain.width, terrain.height);
    let pixels = (width as u64) * (height as u64);
    let mb = |bytes: u64| bytes as f64 / 1024.0 / 1024.0;

    println!("Landgen - Terrain Configuration Info");
    println!("====================================");
    println!();
    println!("Raster: {}x{} ({} cells)", width, height, pixels);
    println!("Mode:   {}", terrain.mode.name());
    println!("Tile:   {}x{} cells", terrain.tile.x, terrain.tile.y);
    println!();
    println!("Memory usage (in-memory):");
    println!("  Ridge + detail fields: {:>12} bytes ({:.2} MB)", pixels * 2, mb(pixels * 2));
    println!();
    println!("Export file sizes:");
    for (label, format) in [
        ("RAW (R8)", RawFormat::R8),
        ("RAW (R16)", RawFormat::R16LittleEndian),
    ] {
        let bytes = expected_file_size(width, height, format);
        println!("  {:<10} {:>12} bytes ({:.2} MB)", label, bytes, mb(bytes));
    }
    println!();
    println!("Graph: axiom {:?}, {} iterations", terrain.graph.axiom, terrain.graph.iterations);
    if terrain.graph.rules.is_empty() {
        println!("  No rules; the axiom is walked as written.");
    } else {
        println!("  Rules: {}", terrain.graph.rules);
    }
}


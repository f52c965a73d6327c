//! icomap CLI - procedural icosahedral world maps.
//!
//! Generate a surface on an unfolded icosahedron and export it as PNG,
//! optionally with an equirectangular texture, a height map and clouds.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use icomap::export::{export_map_png, MapExportOptions, PngExportOptions, RasterLayout, RasterOptions};
use icomap::noise::FractalConfig;
use icomap::pipeline::{StageConfig, StageContext, SurfaceKind, DEFAULT_TEMPERATURE_K};
use icomap::terrain::Icosahedron;
use icomap::Tile;

/// Procedural icosahedral world map generator.
#[derive(Parser)]
#[command(name = "icomap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new world map.
    Generate {
        /// Kind of surface to paint.
        #[arg(long, default_value = "selenian")]
        surface: Surface,

        /// Rows per icosahedron face; the base size 3 doubled (3, 6, 12, 24, 48).
        #[arg(short, long, default_value = "24")]
        face_size: usize,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u64>,

        /// Width of the flat map image in pixels.
        #[arg(short, long, default_value = "2048")]
        width: u32,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "world")]
        name: String,

        /// Also export an equirectangular texture.
        #[arg(long)]
        equirect: bool,

        /// Height of the equirectangular texture (width is double).
        #[arg(long, default_value = "1024")]
        equirect_size: u32,

        /// Also export a greyscale height map.
        #[arg(long)]
        height_map: bool,

        /// Also export a white cloud layer, denser over high ground.
        #[arg(long)]
        clouds: bool,

        /// Surface temperature in kelvin, sets the ice line of terrestrial worlds.
        #[arg(long, default_value_t = DEFAULT_TEMPERATURE_K)]
        temperature: f64,

        /// Cut a long rift across cratered worlds.
        #[arg(long)]
        great_rift: bool,

        /// Skip tile detail overlays when rasterizing.
        #[arg(long)]
        no_details: bool,
    },

    /// Display information about a grid configuration.
    Info {
        /// Rows per icosahedron face.
        #[arg(short, long, default_value = "24")]
        face_size: usize,

        /// Image width to report raster geometry for.
        #[arg(short, long, default_value = "2048")]
        width: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Surface {
    /// Fractal elevation only, painted grey.
    Heightmap,
    /// Grey highlands with dark maria.
    Selenian,
    /// Heavily cratered grey plains.
    Hermian,
    /// Oceans, continents and ice caps.
    Terrestrial,
}

impl From<Surface> for SurfaceKind {
    fn from(surface: Surface) -> Self {
        match surface {
            Surface::Heightmap => SurfaceKind::Heightmap,
            Surface::Selenian => SurfaceKind::Selenian,
            Surface::Hermian => SurfaceKind::Hermian,
            Surface::Terrestrial => SurfaceKind::Terrestrial,
        }
    }
}

/// Options gathered from the `generate` subcommand.
struct GenerateArgs {
    surface: SurfaceKind,
    face_size: usize,
    seed: Option<u64>,
    output: PathBuf,
    name: String,
    temperature: f64,
    great_rift: bool,
    export: MapExportOptions,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            surface,
            face_size,
            seed,
            width,
            output,
            name,
            equirect,
            equirect_size,
            height_map,
            clouds,
            temperature,
            great_rift,
            no_details,
        } => run_generate(GenerateArgs {
            surface: surface.into(),
            face_size,
            seed,
            output,
            name,
            temperature,
            great_rift,
            export: MapExportOptions {
                raster: RasterOptions {
                    width,
                    details: !no_details,
                },
                equirect_size: equirect.then_some(equirect_size),
                height_map,
                cloud_map: clouds.then(|| Tile::new("Cloud", [0xF0, 0xF0, 0xF0], false)),
                png: PngExportOptions::default(),
            },
        }),
        Commands::Info { face_size, width } => run_info(face_size, width),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fractal = FractalConfig::with_face_size(args.face_size);
    // Validate the chain before doing any work.
    fractal.levels()?;

    let seed = args.seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });

    println!("icomap - Icosahedral World Map Generator");
    println!("========================================");
    println!("Surface: {}", args.surface);
    println!("Face size: {}", args.face_size);
    println!("Seed: {}", seed);
    println!("Output: {}", args.output.display());

    let start = Instant::now();

    let mut config = StageConfig::with_fractal(fractal);
    config.set_param("temperature_k", args.temperature);
    if args.great_rift {
        config.set_param("great_rift", 1.0);
    }

    let mut grid = Icosahedron::new(args.face_size)?;
    let mut ctx = StageContext::new(seed, config);
    let pipeline = args.surface.pipeline();

    println!();
    pipeline.run_with_callbacks(
        &mut grid,
        &mut ctx,
        |name, i, total| println!("[{}/{}] {}...", i + 1, total, name),
        |_, _, _| {},
    )?;
    println!("Generated {} cells in {:.2?}", grid.cell_count(), start.elapsed());

    let export_start = Instant::now();
    let written = export_map_png(&grid, &args.output, &args.name, &args.export, &mut ctx.rng)?;
    println!();
    println!("Exported in {:.2?}:", export_start.elapsed());
    for path in &written {
        println!("  {}", path.display());
    }
    println!();
    println!("Total time: {:.2?}", start.elapsed());

    Ok(())
}

fn run_info(face_size: usize, width: u32) -> Result<(), Box<dyn std::error::Error>> {
    let grid = Icosahedron::new(face_size)?;
    let topology = grid.topology();
    let layout = RasterLayout::new(&grid, width)?;

    println!("icomap - Grid Configuration Info");
    println!("================================");
    println!();
    println!("Face size:        {:>8}", face_size);
    println!("Rows:             {:>8}", topology.num_rows());
    println!("Cells:            {:>8}", topology.cell_count());
    println!("Widest row:       {:>8}", topology.row_widths().iter().max().copied().unwrap_or(0));
    println!("Global columns:   {:>8}", topology.max_global_x() + 1);
    println!();
    println!("Row widths:");
    for (y, w) in topology.row_widths().iter().enumerate() {
        println!("  row {:>3}: {:>5} cells, latitude {:>2}", y, w, grid.latitude(y));
    }
    println!();
    println!("Raster at {} px requested:", width);
    println!("  Cell width:  {:>6} px", layout.tile_px * 2);
    println!("  Image:       {:>6} x {} px", layout.width, layout.height);

    match FractalConfig::with_face_size(face_size).levels() {
        Ok(levels) => println!("  Fractal refinement levels: {}", levels),
        Err(e) => println!("  Not a fractal size: {}", e),
    }

    Ok(())
}

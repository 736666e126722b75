use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgGroup, Parser, Subcommand};
use rasterlab::config::Config;
use rasterlab::draw::{BLUE, GREEN, ORANGE, PixelBuffer, RED};
use rasterlab::engine::{Engine, EngineSettings};
use rasterlab::geometry::{Point, PointF};
use rasterlab::session::{self, SessionOptions, options_from_config};
use rasterlab::transform::{Pivot, Selection, Transform};
use rasterlab::{ShapeId, ShapeKind, util};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rasterlab")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("RASTERLAB_GIT_HASH"), ")"),
    about = "Classical 2D rasterization: lines, circles, Bezier curves, glyphs, fill and clipping"
)]
struct Cli {
    /// Config file to use instead of ~/.config/rasterlab/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rasterize a scene file to PNG
    Render {
        scene: PathBuf,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
        /// Canvas width (defaults to [canvas] width)
        #[arg(long)]
        width: Option<u32>,
        /// Canvas height (defaults to [canvas] height)
        #[arg(long)]
        height: Option<u32>,
    },
    /// Translate, rotate or scale shapes in a scene file
    #[command(group(ArgGroup::new("op").required(true).args(["translate", "rotate", "scale"])))]
    Transform {
        scene: PathBuf,
        /// Offset as DX,DY
        #[arg(long, value_name = "DX,DY", allow_hyphen_values = true, value_parser = parse_pair)]
        translate: Option<(i32, i32)>,
        /// Angle in degrees (clockwise on screen)
        #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
        rotate: Option<f64>,
        /// Scale factor SX or SX,SY
        #[arg(long, value_name = "SX[,SY]", allow_hyphen_values = true, value_parser = parse_scale)]
        scale: Option<(f64, f64)>,
        /// Pivot point X,Y for rotate/scale
        #[arg(long, value_name = "X,Y", allow_hyphen_values = true, value_parser = parse_pair, conflicts_with = "centroid")]
        pivot: Option<(i32, i32)>,
        /// Rotate/scale about the centroid of the selected shapes
        #[arg(long)]
        centroid: bool,
        /// Only transform these shape ids (comma separated)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<u64>,
        /// Write the result here instead of overwriting SCENE
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Permanently clip every line against a rectangle
    Clip {
        scene: PathBuf,
        /// Clip window corners as X1,Y1,X2,Y2
        #[arg(long, value_name = "X1,Y1,X2,Y2", allow_hyphen_values = true, value_parser = parse_rect)]
        rect: (Point, Point),
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Toggle polygon fill (most recent polygon unless --id is given)
    Fill {
        scene: PathBuf,
        #[arg(long)]
        id: Option<u64>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a summary of a scene file
    Inspect { scene: PathBuf },
    /// Remove a scene file together with its backup and lock file
    Clear { scene: PathBuf },
    /// Write a sample scene containing every shape kind
    Demo {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write the documented example config file
    InitConfig,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    let config = Config::load_from(&config_path)?;
    let options = options_from_config(&config.session);
    let settings = EngineSettings::from_config(&config);

    match cli.command {
        Command::Render {
            scene,
            output,
            width,
            height,
        } => {
            let settings = EngineSettings {
                width: width.unwrap_or(settings.width).max(1),
                height: height.unwrap_or(settings.height).max(1),
                ..settings
            };
            let engine = open_scene(&scene, settings, &config, &options)?;
            let buffer = engine.into_sink();
            if buffer.dropped() > 0 {
                log::info!("{} pixel(s) fell outside the canvas", buffer.dropped());
            }
            buffer.save_png(&output)?;
            println!(
                "Rendered {} to {} ({}x{})",
                scene.display(),
                output.display(),
                buffer.width(),
                buffer.height()
            );
        }
        Command::Transform {
            scene,
            translate,
            rotate,
            scale,
            pivot,
            centroid,
            ids,
            output,
        } => {
            let mut engine = open_scene(&scene, settings, &config, &options)?;
            let pivot = match (pivot, centroid) {
                (Some((x, y)), _) => Pivot::At(PointF::new(x as f64, y as f64)),
                (None, true) => Pivot::Centroid,
                (None, false) => engine.settings().default_pivot(),
            };
            let transform = match (translate, rotate, scale) {
                (Some((dx, dy)), _, _) => Transform::Translate { dx, dy },
                (_, Some(degrees), _) => Transform::Rotate { degrees, pivot },
                (_, _, Some((sx, sy))) => Transform::Scale { sx, sy, pivot },
                _ => bail!("one of --translate, --rotate or --scale is required"),
            };
            let selection = if ids.is_empty() {
                Selection::All
            } else {
                Selection::Ids(ids.into_iter().map(ShapeId).collect())
            };
            let count = engine
                .transform(&transform, &selection)
                .context("transform failed")?;
            let target = output.unwrap_or(scene);
            engine.save_file(&target, &options)?;
            println!("Transformed {} shape(s); saved {}", count, target.display());
        }
        Command::Clip {
            scene,
            rect: (a, b),
            output,
        } => {
            let mut engine = open_scene(&scene, settings, &config, &options)?;
            engine.set_clip_window(a, b);
            let summary = engine
                .apply_clip()
                .ok_or_else(|| anyhow!("no clip window set"))?;
            let target = output.unwrap_or(scene);
            engine.save_file(&target, &options)?;
            println!(
                "Clipped lines: {} unchanged, {} clipped, {} removed; saved {}",
                summary.unchanged,
                summary.clipped,
                summary.removed,
                target.display()
            );
        }
        Command::Fill { scene, id, output } => {
            let mut engine = open_scene(&scene, settings, &config, &options)?;
            let (id, filled) = match id {
                Some(raw) => {
                    let id = ShapeId(raw);
                    let filled = engine
                        .toggle_fill(id)
                        .ok_or_else(|| anyhow!("shape {} is not a polygon", id))?;
                    (id, filled)
                }
                None => engine
                    .toggle_last_polygon_fill()
                    .ok_or_else(|| anyhow!("scene has no polygon"))?,
            };
            let target = output.unwrap_or(scene);
            engine.save_file(&target, &options)?;
            println!(
                "Polygon {} is now {}; saved {}",
                id,
                if filled { "filled" } else { "outlined" },
                target.display()
            );
        }
        Command::Inspect { scene } => inspect(&scene)?,
        Command::Clear { scene } => {
            let outcome = session::clear_scene_files(&scene)?;
            println!(
                "Removed scene: {}, backup: {}, lock: {}",
                yes_no(outcome.removed_scene),
                yes_no(outcome.removed_backup),
                yes_no(outcome.removed_lock)
            );
        }
        Command::Demo { output } => {
            let buffer = PixelBuffer::new(settings.width, settings.height, config.canvas.background.to_color());
            let mut engine = Engine::new(buffer, settings);
            build_demo(&mut engine)?;
            engine.save_file(&output, &options)?;
            println!(
                "Wrote demo scene with {} shapes to {}",
                engine.scene().len(),
                output.display()
            );
        }
        Command::InitConfig => {
            Config::create_default_file(&config_path)?;
            println!("Wrote example config to {}", config_path.display());
        }
    }

    Ok(())
}

fn open_scene(
    path: &Path,
    settings: EngineSettings,
    config: &Config,
    options: &SessionOptions,
) -> Result<Engine<PixelBuffer>> {
    let buffer = PixelBuffer::new(
        settings.width,
        settings.height,
        config.canvas.background.to_color(),
    );
    let mut engine = Engine::new(buffer, settings);
    engine.load_file(path, options)?;
    Ok(engine)
}

fn build_demo(engine: &mut Engine<PixelBuffer>) -> Result<()> {
    engine.add_line(Point::new(40, 40), Point::new(360, 120));
    engine.add_shape_with_color(
        RED,
        ShapeKind::circle(Point::new(200, 300), 60),
    );
    engine.add_shape_with_color(
        BLUE,
        ShapeKind::bezier([
            Point::new(420, 80),
            Point::new(500, 10),
            Point::new(620, 200),
            Point::new(760, 90),
        ]),
    );
    for (i, glyph) in ['A', 'B', 'C'].into_iter().enumerate() {
        engine.add_character(Point::new(440 + 24 * i as i32, 300), glyph)?;
    }
    let star = vec![
        Point::new(600, 360),
        Point::new(648, 504),
        Point::new(524, 416),
        Point::new(676, 416),
        Point::new(552, 504),
    ];
    engine.add_polygon(star, true)?;
    engine.add_shape_with_color(
        GREEN,
        ShapeKind::polygon(
            vec![Point::new(60, 420), Point::new(220, 440), Point::new(140, 560)],
            false,
        ),
    );
    engine.add_shape_with_color(ORANGE, ShapeKind::line(Point::new(0, 590), Point::new(799, 450)));
    Ok(())
}

fn inspect(path: &Path) -> Result<()> {
    let inspection = session::inspect_scene(path)?;
    println!("Scene file: {}", inspection.scene_path.display());
    if !inspection.exists {
        println!("  exists: no");
        return Ok(());
    }
    println!("  exists: yes");
    if let Some(size) = inspection.size_bytes {
        println!(
            "  size: {} bytes (compressed: {})",
            size,
            yes_no(inspection.compressed)
        );
    }
    if let Some(modified) = inspection.modified {
        println!("  modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(counts) = inspection.shape_counts {
        println!("  shapes: {}", counts.total());
        println!("    lines: {}", counts.lines);
        println!("    circles: {}", counts.circles);
        println!("    beziers: {}", counts.beziers);
        println!("    characters: {}", counts.characters);
        println!(
            "    polygons: {} ({} filled)",
            counts.polygons, counts.filled_polygons
        );
    }
    if !inspection.colors.is_empty() {
        let names: Vec<String> = inspection.colors.iter().map(util::color_to_name).collect();
        println!("  colors: {}", names.join(", "));
    }
    match inspection.bounds {
        Some(rect) => println!(
            "  bounds: ({}, {}) - ({}, {})",
            rect.min.x, rect.min.y, rect.max.x, rect.max.y
        ),
        None => println!("  bounds: empty"),
    }
    match inspection.backup_size_bytes {
        Some(size) if inspection.backup_exists => println!(
            "  backup: {} ({} bytes)",
            inspection.backup_path.display(),
            size
        ),
        _ => println!("  backup: none"),
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn split_numbers<T: std::str::FromStr>(raw: &str, expected: &[usize]) -> Result<Vec<T>, String> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<T>())
        .collect::<Result<Vec<T>, _>>()
        .map_err(|_| format!("'{}' is not a comma-separated list of numbers", raw))?;
    if expected.contains(&values.len()) {
        Ok(values)
    } else {
        Err(format!(
            "expected {} value(s), got {}",
            expected
                .iter()
                .map(|n| n.to_string())
                .collect::<Vec<_>>()
                .join(" or "),
            values.len()
        ))
    }
}

fn parse_pair(raw: &str) -> Result<(i32, i32), String> {
    let values = split_numbers::<i32>(raw, &[2])?;
    Ok((values[0], values[1]))
}

fn parse_scale(raw: &str) -> Result<(f64, f64), String> {
    let values = split_numbers::<f64>(raw, &[1, 2])?;
    Ok((values[0], *values.last().unwrap_or(&values[0])))
}

fn parse_rect(raw: &str) -> Result<(Point, Point), String> {
    let v = split_numbers::<i32>(raw, &[4])?;
    Ok((Point::new(v[0], v[1]), Point::new(v[2], v[3])))
}

//! Planar 命令行入口
//!
//! 无界面地加载文档，执行捕捉、求交、修剪、延伸查询，
//! 或以一串拾取点重放修剪/延伸工具。

mod io;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use planar_core::document::Document;
use planar_core::entity::{Entity, EntityId};
use planar_core::intersection::find_intersections;
use planar_core::math::{Point2, Vector2};
use planar_core::transform::ViewTransform;
use planar_file::{EngineSettings, NativeDocument};
use planar_tools::{create_action, ActionContext, ActionResult, ActionType, MouseButton};

/// 2D CAD engine: snapping, intersection, trim and extend
#[derive(Parser, Debug)]
#[command(name = "planar")]
#[command(version, about, long_about = None)]
struct Args {
    /// Engine settings file (JSON); defaults are used when it does not exist
    #[arg(long, value_name = "FILE", global = true)]
    settings: Option<PathBuf>,

    /// View scale in pixels per world unit
    #[arg(long, default_value_t = 1.0, global = true)]
    scale: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List layers and entities
    Info { file: PathBuf },

    /// Resolve the snap point for a cursor position
    Snap {
        file: PathBuf,
        #[arg(value_parser = parse_point, allow_hyphen_values = true)]
        cursor: Point2,
        /// Print every candidate, not only the winner
        #[arg(long)]
        all: bool,
    },

    /// Intersection points of two entities
    Intersect { file: PathBuf, a: String, b: String },

    /// Trim an entity against a cutter
    Trim {
        file: PathBuf,
        target: String,
        cutter: String,
        /// Point on the portion to keep
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        click: Point2,
        /// Write the result here instead of overwriting the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extend an entity to the given boundaries
    Extend {
        file: PathBuf,
        target: String,
        #[arg(long = "boundary", required = true)]
        boundaries: Vec<String>,
        /// Point near the end to move
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        click: Point2,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replay picks through an interactive tool (TRIM/TR, EXTEND/EX)
    Tool {
        file: PathBuf,
        tool: String,
        #[arg(long = "pick", value_parser = parse_point, allow_hyphen_values = true, required = true)]
        picks: Vec<Point2>,
        /// Pick tolerance in pixels
        #[arg(long, default_value_t = 5.0)]
        tolerance: f64,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert between .json and .plnr
    Convert { input: PathBuf, output: PathBuf },
}

/// "x,y" -> Point2
fn parse_point(s: &str) -> Result<Point2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x '{x}': {e}"))?;
    let y: f64 = y.trim().parse().map_err(|e| format!("bad y '{y}': {e}"))?;
    Ok(Point2::new(x, y))
}

fn find_entity<'a>(document: &'a Document, id: &str) -> Result<&'a Entity> {
    document
        .entity(&EntityId::new(id))
        .ok_or_else(|| anyhow!("Entity not found: {id}"))
}

fn describe(entity: &Entity) -> String {
    let bbox = entity.geometry.bounding_box();
    format!(
        "{} {} layer={} bbox=({:.3}, {:.3})-({:.3}, {:.3})",
        entity.id(),
        entity.type_name(),
        entity.layer,
        bbox.min.x,
        bbox.min.y,
        bbox.max.x,
        bbox.max.y
    )
}

fn main() -> Result<()> {
    // 初始化日志，RUST_LOG 未设置时默认 info
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if !(args.scale.is_finite() && args.scale > 0.0) {
        bail!("--scale must be positive, got {}", args.scale);
    }

    let settings = match &args.settings {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };

    run(&args, &settings)
}

fn run(args: &Args, settings: &EngineSettings) -> Result<()> {
    match &args.command {
        Command::Info { file } => {
            let document = io::load_document(file)?.document;
            for layer in document.layers() {
                let marker = if layer.id == *document.active_layer_id() { "*" } else { " " };
                println!(
                    "{marker} layer {} \"{}\" visible={}",
                    layer.id, layer.name, layer.visible
                );
            }
            for entity in document.entities() {
                println!("{}", describe(entity));
            }
        }

        Command::Snap { file, cursor, all } => {
            let document = settings.apply_grid(&io::load_document(file)?.document);
            let engine = settings.snap_engine();
            let candidates = engine.find_snap_points(*cursor, &document, args.scale);
            if *all {
                for c in &candidates {
                    println!(
                        "  {:<12} ({:.6}, {:.6}) {}",
                        c.snap_type.shortcut(),
                        c.point.x,
                        c.point.y,
                        c.entity_id.as_ref().map(|id| id.as_str()).unwrap_or("-")
                    );
                }
            }
            match engine.find_best_snap_point(&candidates, *cursor) {
                Some(best) => println!(
                    "{} {} ({:.6}, {:.6})",
                    best.snap_type.shortcut(),
                    best.label,
                    best.point.x,
                    best.point.y
                ),
                None => println!("no snap"),
            }
        }

        Command::Intersect { file, a, b } => {
            let document = io::load_document(file)?.document;
            let a = find_entity(&document, a)?;
            let b = find_entity(&document, b)?;
            let points = find_intersections(&a.geometry, &b.geometry);
            if points.is_empty() {
                println!("no intersection");
            }
            for p in points {
                println!("({:.6}, {:.6})", p.x, p.y);
            }
        }

        Command::Trim {
            file,
            target,
            cutter,
            click,
            output,
        } => {
            let loaded = io::load_document(file)?;
            let document = &loaded.document;
            let target = find_entity(document, target)?;
            let cutter = find_entity(document, cutter)?;
            let trimmed = target
                .trim(cutter, &[], click)
                .ok_or_else(|| anyhow!("{} cannot be trimmed by {}", target.id(), cutter.id()))?;
            println!("{}", describe(&trimmed));
            let edited = NativeDocument {
                document: document.with_entities_replaced(target.id(), vec![trimmed]),
                metadata: loaded.metadata.clone(),
            };
            io::save_document(&edited, output.as_deref().unwrap_or(file))?;
        }

        Command::Extend {
            file,
            target,
            boundaries,
            click,
            output,
        } => {
            let loaded = io::load_document(file)?;
            let document = &loaded.document;
            let target = find_entity(document, target)?;
            let boundaries = boundaries
                .iter()
                .map(|id| find_entity(document, id).cloned())
                .collect::<Result<Vec<_>>>()?;
            let extended = target
                .extend(&boundaries, click)
                .ok_or_else(|| anyhow!("{} cannot be extended", target.id()))?;
            println!("{}", describe(&extended));
            let edited = NativeDocument {
                document: document.with_replaced_entity(extended),
                metadata: loaded.metadata.clone(),
            };
            io::save_document(&edited, output.as_deref().unwrap_or(file))?;
        }

        Command::Tool {
            file,
            tool,
            picks,
            tolerance,
            output,
        } => {
            let action_type = ActionType::from_command(tool)
                .ok_or_else(|| anyhow!("Unknown tool: {tool}"))?;
            let loaded = io::load_document(file)?;
            let edited = NativeDocument {
                document: replay_tool(
                    action_type,
                    loaded.document,
                    picks,
                    args.scale,
                    *tolerance,
                    settings,
                )?,
                metadata: loaded.metadata,
            };
            io::save_document(&edited, output.as_deref().unwrap_or(file))?;
        }

        Command::Convert { input, output } => {
            let document = io::load_document(input)?;
            io::save_document(&document, output)
                .with_context(|| format!("Failed to convert {}", input.display()))?;
        }
    }
    Ok(())
}

/// 依次把拾取点交给工具，每次修改都记录到历史
fn replay_tool(
    action_type: ActionType,
    mut document: Document,
    picks: &[Point2],
    scale: f64,
    tolerance: f64,
    settings: &EngineSettings,
) -> Result<Document> {
    let view = ViewTransform::new(scale, Vector2::zeros());
    let mut action = create_action(action_type);
    let mut history = settings.history();

    for (i, pick) in picks.iter().enumerate() {
        let ctx = ActionContext::new(&document, &view, tolerance, *pick);
        let result = action.on_mouse_click(&ctx, MouseButton::Left);
        println!("pick {} ({:.3}, {:.3}): {}", i + 1, pick.x, pick.y, action.get_prompt());

        match result {
            ActionResult::NeedSelection => {
                tracing::warn!("Pick {} at ({}, {}) selected nothing usable", i + 1, pick.x, pick.y)
            }
            ActionResult::Cancel => break,
            ActionResult::Continue => {}
            ActionResult::ReplaceEntities { .. } => {
                if let Some(edited) = result.apply(&document) {
                    history.record(document);
                    document = edited;
                }
            }
        }
    }

    info!(
        "{} finished with {} change(s)",
        action.name(),
        history.undo_len()
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planar_core::geometry::{Geometry, Line};

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("1.5,-2").unwrap(), Point2::new(1.5, -2.0));
        assert_eq!(parse_point(" 3 , 4 ").unwrap(), Point2::new(3.0, 4.0));
        assert!(parse_point("3").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "planar", "--scale", "2", "trim", "d.plnr", "t", "c", "--click", "-1,0",
        ])
        .unwrap();
        assert_eq!(args.scale, 2.0);
        match args.command {
            Command::Trim { click, .. } => assert_eq!(click, Point2::new(-1.0, 0.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_replay_trim_tool() {
        let target = Entity::new(Geometry::Line(Line::new(
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        )));
        let cutter = Entity::new(Geometry::Line(Line::new(
            Point2::new(6.0, -5.0),
            Point2::new(6.0, 5.0),
        )));
        let document = Document::new()
            .with_entity(target.clone())
            .with_entity(cutter);

        let picks = [
            Point2::new(6.0, 3.0),
            Point2::new(2.0, 0.0),
            Point2::new(9.0, 0.0),
        ];
        let edited = replay_tool(
            ActionType::Trim,
            document,
            &picks,
            1.0,
            2.0,
            &EngineSettings::default(),
        )
        .unwrap();
        match &edited.entity(target.id()).unwrap().geometry {
            Geometry::Line(l) => assert!((l.start.x - 6.0).abs() < 1e-9),
            other => panic!("expected line, got {}", other.type_name()),
        }
    }
}

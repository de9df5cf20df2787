use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use glam::IVec2;
use tracing::{debug, info};

use boxnest_core::{PrimitiveId, Sizer};

mod sample;

use sample::SampleLayout;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Width of the space available to the layout
    #[arg(long, default_value = "80")]
    width: i32,

    /// Height of the space available to the layout
    #[arg(long, default_value = "60")]
    height: i32,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn render_primitive(
    output: &mut String,
    layout: &SampleLayout,
    id: PrimitiveId,
    depth: usize,
    is_last: bool,
) -> Result<()> {
    let tree_char = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let indent = if depth == 0 {
        String::new()
    } else {
        "│   ".repeat(depth - 1) + tree_char
    };

    let prim = layout.tree.primitive(id)?;
    let net = layout.tree.pos(id, true)?;
    let fill = layout.kind(id).map(|kind| kind.fill()).unwrap_or(' ');

    writeln!(
        output,
        "{}{} '{}' pos:({},{}) size:({},{})",
        indent,
        prim.name(),
        fill,
        net.x,
        net.y,
        prim.size().x,
        prim.size().y
    )?;

    if let Some(sizer) = prim.sizer() {
        let children = sizer.primitives();
        let child_count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            render_primitive(output, layout, child, depth + 1, i == child_count - 1)?;
        }
    }

    Ok(())
}

/// Paint every block with its fill character; nested blocks are painted over
/// their host.
fn render_canvas(output: &mut String, layout: &SampleLayout, space: IVec2) -> Result<()> {
    let width = space.x.max(0) as usize;
    let height = space.y.max(0) as usize;
    let mut canvas = vec![vec![' '; width]; height];

    for block in layout.placed_blocks()? {
        debug!("Painting block {} at {:?} size {:?}", block.id, block.pos, block.size);
        let fill = block.kind.fill();
        let end = (block.pos + block.size).min(space).max(IVec2::ZERO);
        let start = block.pos.max(IVec2::ZERO).min(end);

        for row in &mut canvas[start.y as usize..end.y as usize] {
            row[start.x as usize..end.x as usize].fill(fill);
        }
    }

    for row in canvas {
        writeln!(output, "{}", row.into_iter().collect::<String>())?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let mut layout = SampleLayout::build().context("Failed to build sample layout")?;

    let requested = IVec2::new(args.width, args.height);
    let space = layout
        .update(requested)
        .context("Failed to lay out sample")?;

    if space != requested {
        info!(
            "Requested space {}x{} is below the layout minimum, using {}x{}",
            requested.x, requested.y, space.x, space.y
        );
    }

    let mut output = String::new();
    writeln!(output, "space: {}x{}", space.x, space.y)?;

    let roots = layout.root.primitives();
    debug!("Rendering {} top-level blocks", roots.len());
    for id in roots {
        render_primitive(&mut output, &layout, id, 0, false)?;
    }

    writeln!(output)?;
    render_canvas(&mut output, &layout, space)?;

    match args.output {
        Some(path) => {
            fs::write(&path, &output).with_context(|| format!("Failed to write {}", path))?;
            info!("Layout report written to {}", path);
        }
        None => print!("{}", output),
    }

    Ok(())
}

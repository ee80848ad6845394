use docopt::Docopt;
use itertools::Itertools;
use log::info;
use mazes::{
    builder::MazeBuilder,
    cells::GridCoordinate,
    generators,
    grid_displays::{render_text, TrailDisplay},
    maze::Maze,
    units::{ColumnsCount, RowsCount},
};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    thread,
    time::Duration,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--rows=<r>] [--cols=<c>] [--start-row=<sr>] [--start-col=<sc>] [--seed=<n>] [--text-out=<path>] [--save-edges=<path>]
    mazes_driver animate [--rows=<r>] [--cols=<c>] [--start-row=<sr>] [--start-col=<sc>] [--seed=<n>] [--frame-delay-ms=<ms>]

Options:
    -h --help              Show this screen.
    --rows=<r>             Number of cell rows in the maze [default: 20].
    --cols=<c>             Number of cell columns in the maze [default: 20].
    --start-row=<sr>       Row of the cell the maze generation starts from [default: 0].
    --start-col=<sc>       Column of the cell the maze generation starts from [default: 0].
    --seed=<n>             Seed the random number generator for a reproducible maze.
    --text-out=<path>      Output file path for a textual rendering of the maze instead of stdout.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based row major vertex indices.
    --frame-delay-ms=<ms>  Pause between animation frames, one generation step per frame [default: 30].
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_animate: bool,
    flag_rows: usize,
    flag_cols: usize,
    flag_start_row: isize,
    flag_start_col: isize,
    flag_seed: Option<u64>,
    flag_text_out: String,
    flag_save_edges: String,
    flag_frame_delay_ms: u64,
}

// Clear the terminal and home the cursor so each frame overdraws the last.
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            Io(::std::io::Error);
            RandomSeeding(::rand::Error);
        }

        errors {
            InvalidDimensions(rows: usize, cols: usize) {
                description("invalid maze dimensions")
                display("cannot build a maze with {} rows and {} columns", rows, cols)
            }
            InvalidStart(row: isize, col: isize) {
                description("start cell outside the maze")
                display("start cell (row {}, column {}) is outside the maze", row, col)
            }
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args()).unwrap_or_else(|e| e.exit());

    let mut maze = Maze::new(RowsCount(args.flag_rows), ColumnsCount(args.flag_cols))
        .ok_or_else(|| ErrorKind::InvalidDimensions(args.flag_rows, args.flag_cols))?;
    let start = GridCoordinate::new(args.flag_start_row, args.flag_start_col);
    let mut rng = seeded_rng(args.flag_seed)?;

    if args.cmd_animate {
        animate(&mut maze, start, rng, Duration::from_millis(args.flag_frame_delay_ms))?;
        return Ok(());
    }

    if !generators::recursive_backtracker_from(&mut maze, start, &mut rng) {
        return Err(ErrorKind::InvalidStart(start.row, start.col).into());
    }
    info!("generated a {} x {} maze from {:?}", args.flag_rows, args.flag_cols, start);

    if args.flag_text_out.is_empty() {
        print!("{}", maze);
    } else {
        write_text_to_file(&maze.to_string(), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze, &args.flag_save_edges)?;
    }

    Ok(())
}

fn parse_args<I, S>(argv: I) -> ::std::result::Result<MazeArgs, docopt::Error>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    Docopt::new(USAGE).and_then(|d| d.argv(argv).deserialize())
}

fn seeded_rng(seed: Option<u64>) -> Result<XorShiftRng> {
    match seed {
        Some(s) => Ok(XorShiftRng::seed_from_u64(s)),
        None => Ok(XorShiftRng::from_rng(rand::thread_rng())?),
    }
}

/// Draw one frame per generation step, showing the search trail, until the maze is complete.
fn animate(maze: &mut Maze,
           start: GridCoordinate,
           rng: XorShiftRng,
           frame_delay: Duration)
           -> Result<()> {

    let mut builder = MazeBuilder::starting_at(maze, start, rng)
        .ok_or_else(|| ErrorKind::InvalidStart(start.row, start.col))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frames = 0usize;
    loop {
        let frame = render_text(builder.maze(), Some(&TrailDisplay::from_builder(&builder)));
        write!(out, "{}{}", CLEAR_SCREEN, frame)?;
        out.flush()?;
        frames += 1;

        if builder.is_done() {
            break;
        }
        let _ = builder.advance();
        thread::sleep(frame_delay);
    }

    info!("animated maze generation in {} frames", frames);
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze: &Maze, file_path: &str) -> Result<()> {

    let mut graph_data = format!("{} {}\n", maze.size(), maze.links_count());

    let edge_lines = maze.iter_links()
        .filter_map(|(src, dst)| {
            let index_a = maze.grid_coordinate_to_index(src)?;
            let index_b = maze.grid_coordinate_to_index(dst)?;
            Some(format!("{} {}", index_a + 1, index_b + 1))
        })
        .join("\n");
    if !edge_lines.is_empty() {
        graph_data.push_str(&edge_lines);
        graph_data.push('\n');
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use stepviz::{
    AsciiPlayer, CancelToken, EventSink, Grid, GridSpec, Palette, PathVisualizer, Pos,
    ReplayOutcome, SampleSpec, SearchAlgorithm, SortAlgorithm, SortVisualizer, SystemClock,
    TraceEvent,
};

#[derive(Parser, Debug)]
#[command(name = "stepviz", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate a grid search in the terminal.
    Search(SearchArgs),
    /// Animate a sort in the terminal.
    Sort(SortArgs),
    /// Render one text frame from an image source.
    Ascii(AsciiArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SearchAlgoArg {
    Astar,
    Dijkstra,
    Bfs,
    Dfs,
}

impl From<SearchAlgoArg> for SearchAlgorithm {
    fn from(a: SearchAlgoArg) -> Self {
        match a {
            SearchAlgoArg::Astar => SearchAlgorithm::AStar,
            SearchAlgoArg::Dijkstra => SearchAlgorithm::Dijkstra,
            SearchAlgoArg::Bfs => SearchAlgorithm::Bfs,
            SearchAlgoArg::Dfs => SearchAlgorithm::Dfs,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortAlgoArg {
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl From<SortAlgoArg> for SortAlgorithm {
    fn from(a: SortAlgoArg) -> Self {
        match a {
            SortAlgoArg::Bubble => SortAlgorithm::Bubble,
            SortAlgoArg::Selection => SortAlgorithm::Selection,
            SortAlgoArg::Insertion => SortAlgorithm::Insertion,
            SortAlgoArg::Quick => SortAlgorithm::Quick,
            SortAlgoArg::Merge => SortAlgorithm::Merge,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CharsetArg {
    Basic,
    Extended,
    Blocks,
}

impl From<CharsetArg> for Palette {
    fn from(a: CharsetArg) -> Self {
        match a {
            CharsetArg::Basic => Palette::basic(),
            CharsetArg::Extended => Palette::extended(),
            CharsetArg::Blocks => Palette::blocks(),
        }
    }
}

#[derive(Parser, Debug)]
struct SearchArgs {
    /// Grid rows (ignored with --in).
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Grid columns (ignored with --in).
    #[arg(long, default_value_t = 40)]
    cols: usize,

    /// Load a grid spec JSON instead of building one.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Search algorithm.
    #[arg(long, value_enum, default_value_t = SearchAlgoArg::Astar)]
    algo: SearchAlgoArg,

    /// Playback rate multiplier.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Seed walls with probability 0.3 before running.
    #[arg(long)]
    maze_seed: Option<u64>,

    /// Start position as ROW,COL.
    #[arg(long, value_parser = parse_pos)]
    start: Option<Pos>,

    /// End position as ROW,COL.
    #[arg(long, value_parser = parse_pos)]
    end: Option<Pos>,
}

#[derive(Parser, Debug)]
struct SortArgs {
    /// Array length.
    #[arg(long, default_value_t = 30)]
    size: usize,

    /// Generation seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Sort algorithm.
    #[arg(long, value_enum, default_value_t = SortAlgoArg::Quick)]
    algo: SortAlgoArg,

    /// Playback rate multiplier.
    #[arg(long, default_value_t = 1.0)]
    rate: f64,
}

#[derive(Parser, Debug)]
struct AsciiArgs {
    /// Input image path.
    #[arg(long)]
    image: PathBuf,

    /// Width scale factor.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Symbol palette.
    #[arg(long, value_enum, default_value_t = CharsetArg::Basic)]
    charset: CharsetArg,

    /// Sample position in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,
}

fn parse_pos(s: &str) -> Result<Pos, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| "expected ROW,COL".to_string())?;
    let row = row.trim().parse().map_err(|_| "bad row".to_string())?;
    let col = col.trim().parse().map_err(|_| "bad col".to_string())?;
    Ok(Pos::new(row, col))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Search(args) => cmd_search(args),
        Command::Sort(args) => cmd_sort(args),
        Command::Ascii(args) => cmd_ascii(args),
    }
}

fn cmd_search(args: SearchArgs) -> anyhow::Result<()> {
    let mut grid = match &args.in_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read '{}'", path.display()))?;
            let spec: GridSpec = serde_json::from_str(&text)
                .with_context(|| format!("parse '{}'", path.display()))?;
            spec.to_grid()?
        }
        None => {
            let mut grid = Grid::new(args.rows, args.cols)?;
            let mid = args.rows / 2;
            let inset = (args.cols / 8).max(1).min(args.cols - 1);
            let start = args.start.unwrap_or(Pos::new(mid, inset));
            let end = args.end.unwrap_or(Pos::new(mid, args.cols - inset));
            grid.set_start(start)?;
            grid.set_end(end)?;
            grid
        }
    };

    if let Some(seed) = args.maze_seed {
        grid.generate_maze(seed);
    }

    let mut viz = PathVisualizer::new(grid);
    let mut sink = AnsiGridSink::new(viz.grid());
    let mut clock = SystemClock::new();
    let cancel = CancelToken::new();

    let report = viz
        .visualize(args.algo.into(), args.rate, &mut clock, &cancel, &mut sink)
        .map_err(|r| anyhow::anyhow!("run rejected: {r:?}"))?;

    println!(
        "visited {} cells, path length {}, algo {:?}, animation {:?}{}",
        report.visited,
        report.path_len,
        report.algo_time,
        report.anim_time,
        if report.outcome == ReplayOutcome::Cancelled {
            " (cancelled)"
        } else {
            ""
        }
    );
    if report.path_len == 0 {
        println!("goal unreachable");
    }
    Ok(())
}

fn cmd_sort(args: SortArgs) -> anyhow::Result<()> {
    let mut viz = SortVisualizer::new();
    if !viz.generate(args.size, args.seed) {
        anyhow::bail!("could not generate an array of length {}", args.size);
    }
    let before: Vec<u32> = viz.array().map(|a| a.values().to_vec()).unwrap_or_default();
    println!("before: {before:?}");

    let mut sink = AnsiBarsSink::new(before);
    let mut clock = SystemClock::new();
    let cancel = CancelToken::new();

    let report = viz
        .visualize(args.algo.into(), args.rate, &mut clock, &cancel, &mut sink)
        .map_err(|r| anyhow::anyhow!("run rejected: {r:?}"))?;

    let after: Vec<u32> = viz.array().map(|a| a.values().to_vec()).unwrap_or_default();
    println!("after:  {after:?}");
    println!(
        "{} comparisons, {} accesses, algo {:?}, animation {:?}",
        report.comparisons, report.accesses, report.algo_time, report.anim_time
    );
    Ok(())
}

fn cmd_ascii(args: AsciiArgs) -> anyhow::Result<()> {
    let source = stepviz::ImageSource::open(&args.image, 0.0)?;
    let mut player = AsciiPlayer::new(SampleSpec::with_scale(args.scale), args.charset.into());
    player.load(Box::new(source));

    let frame = player
        .commit_seek(args.at)
        .map_err(|r| anyhow::anyhow!("render rejected: {r:?}"))?;
    print!("{}", frame.text);
    eprintln!("{} ({}x{})", player.position_label(), frame.width, frame.height);
    Ok(())
}

/// Redraws the grid in place after every event using ANSI cursor motion.
struct AnsiGridSink {
    rows: usize,
    cols: usize,
    chars: Vec<char>,
    drawn_once: bool,
}

impl AnsiGridSink {
    fn new(grid: &Grid) -> Self {
        let chars = grid
            .cells()
            .map(|c| {
                if c.is_start {
                    'S'
                } else if c.is_end {
                    'E'
                } else if c.is_wall {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            chars,
            drawn_once: false,
        }
    }

    fn draw(&mut self) {
        if self.drawn_once {
            // Move the cursor back up over the previous frame.
            print!("\x1b[{}A", self.rows);
        }
        for row in self.chars.chunks(self.cols) {
            let line: String = row.iter().collect();
            println!("{line}");
        }
        self.drawn_once = true;
    }

    fn set(&mut self, pos: Pos, ch: char) {
        let i = pos.row * self.cols + pos.col;
        if self.chars[i] != 'S' && self.chars[i] != 'E' {
            self.chars[i] = ch;
        }
    }
}

impl EventSink for AnsiGridSink {
    fn begin(&mut self, _total: usize) {
        self.draw();
    }

    fn on_event(&mut self, _index: usize, event: &TraceEvent) {
        match event {
            TraceEvent::Visit(pos) => self.set(*pos, 'o'),
            TraceEvent::PathMark(pos) => self.set(*pos, '*'),
            _ => {}
        }
        self.draw();
    }
}

/// Rewrites a single status line after every event.
struct AnsiBarsSink {
    values: Vec<u32>,
}

impl AnsiBarsSink {
    fn new(values: Vec<u32>) -> Self {
        Self { values }
    }

    fn draw(&self, marker: &str) {
        let line: Vec<String> = self.values.iter().map(|v| format!("{v:3}")).collect();
        print!("\x1b[2K\r{} {}", line.join(" "), marker);
        use std::io::Write as _;
        let _ = std::io::stdout().flush();
    }
}

impl EventSink for AnsiBarsSink {
    fn on_event(&mut self, _index: usize, event: &TraceEvent) {
        match *event {
            TraceEvent::Compare(i, j) => self.draw(&format!("cmp {i}<>{j}")),
            TraceEvent::Swap(i, j) => {
                self.values.swap(i, j);
                self.draw(&format!("swap {i}<>{j}"));
            }
            TraceEvent::Overwrite(i, v) => {
                self.values[i] = v;
                self.draw(&format!("set [{i}]={v}"));
            }
            _ => {}
        }
    }

    fn end(&mut self, _outcome: ReplayOutcome) {
        println!();
    }
}

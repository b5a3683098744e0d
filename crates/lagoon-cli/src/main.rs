use futures::StreamExt;
use futures::executor::block_on;
use indexmap::IndexMap;
use lagoon::{
    AnnealFrame, Graph, LayoutConfig, NodeId, RankDir, Session, SolverKind, Vec2, spawn_anneal,
    spawn_layered,
};
use serde::Serialize;
use std::io::Read;

const DEFAULT_TICKS: usize = 500;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Layout(lagoon::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<lagoon::Error> for CliError {
    fn from(value: lagoon::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Simulate,
    Layered,
    Anneal,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    config: Option<String>,
    ticks: Option<usize>,
    solver: Option<SolverKind>,
    direction: Option<RankDir>,
    frames: bool,
    pretty: bool,
}

type Positions = IndexMap<NodeId, [f64; 2]>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulateOut {
    solver: SolverKind,
    ticks: usize,
    frozen: bool,
    energy: f64,
    positions: Positions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayeredOut {
    direction: RankDir,
    ranks: IndexMap<NodeId, usize>,
    layers: Vec<Vec<NodeId>>,
    removed_edges: Vec<usize>,
    crossings: usize,
    positions: Positions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameOut {
    iteration: usize,
    cooling: f64,
    max_displacement: f64,
    positions: Positions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AnnealOut {
    iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    frames: Option<Vec<FrameOut>>,
    positions: Positions,
}

fn usage() -> &'static str {
    "lagoon-cli\n\
\n\
USAGE:\n\
  lagoon-cli [simulate] [--config <path>] [--solver standard|adaptive|rectangular|ranked] [--ticks <n>] [--pretty] [<path>|-]\n\
  lagoon-cli layered [--config <path>] [--direction tb|bt|lr|rl] [--pretty] [<path>|-]\n\
  lagoon-cli anneal [--config <path>] [--ticks <n>] [--frames] [--pretty] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', the graph JSON is read from stdin.\n\
  - --config reads a layout config JSON; every field is optional.\n\
  - simulate ticks until the energy drops below freezeEnergy or --ticks is reached (default 500).\n\
  - anneal uses --ticks as the iteration count; --frames includes every intermediate frame.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "simulate" => args.command = Command::Simulate,
            "layered" => args.command = Command::Layered,
            "anneal" => args.command = Command::Anneal,
            "--pretty" => args.pretty = true,
            "--frames" => args.frames = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--ticks" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.ticks = Some(n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--solver" => {
                let Some(kind) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.solver = Some(kind.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--direction" => {
                let Some(dir) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.direction = Some(dir.parse().map_err(|_| CliError::Usage(usage()))?);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn positions<'a>(points: impl IntoIterator<Item = (&'a NodeId, &'a Vec2)>) -> Positions {
    points.into_iter().map(|(id, p)| (*id, [p.x, p.y])).collect()
}

fn load_config(args: &Args) -> Result<LayoutConfig, CliError> {
    let mut config = match args.config.as_deref() {
        Some(path) => LayoutConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => LayoutConfig::default(),
    };
    if let Some(kind) = args.solver {
        config.solver = kind;
    }
    if let Some(dir) = args.direction {
        config.layered.direction = dir;
    }
    if let (Command::Anneal, Some(n)) = (args.command, args.ticks) {
        config.anneal.iterations = n;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    let text = read_input(args.input.as_deref())?;
    let graph: Graph = serde_json::from_str(&text)?;
    graph.validate().map_err(lagoon::Error::from)?;

    match args.command {
        Command::Simulate => {
            let mut session = Session::new(config);
            session.sync(&graph)?;
            let ticks = session.run_until_frozen(args.ticks.unwrap_or(DEFAULT_TICKS));
            let energy = session.energy();
            let out = SimulateOut {
                solver: session.solver(),
                ticks,
                frozen: energy < session.config().freeze_energy,
                energy,
                positions: positions(&session.positions()),
            };
            write_json(&out, args.pretty)
        }
        Command::Layered => {
            let direction = config.layered.direction;
            let layout = block_on(spawn_layered(graph, config.layered)?)?;
            let out = LayeredOut {
                direction,
                positions: positions(&layout.positions),
                ranks: layout.ranks,
                layers: layout.layers,
                removed_edges: layout.removed_edges,
                crossings: layout.crossings,
            };
            write_json(&out, args.pretty)
        }
        Command::Anneal => {
            let iterations = config.anneal.iterations;
            let initial = positions(graph.nodes.values().map(|n| (&n.id, &n.position)));
            let frames: Vec<AnnealFrame> =
                block_on(spawn_anneal(graph, config.anneal)?.collect());
            let last = frames
                .last()
                .map(|f| positions(&f.positions))
                .unwrap_or(initial);
            let frames = args.frames.then(|| {
                frames
                    .iter()
                    .map(|f| FrameOut {
                        iteration: f.iteration,
                        cooling: f.cooling,
                        max_displacement: f.max_displacement,
                        positions: positions(&f.positions),
                    })
                    .collect()
            });
            let out = AnnealOut {
                iterations,
                frames,
                positions: last,
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

use crate::config::Args;
use crate::display::{fit_grid, MemoryDisplay, PixelSink, TerminalDisplay};
use crate::input::{poll_commands, Command};
use crate::sim::{Button, SimConfig, Simulation};
use crate::worm::Lifespan;
use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::terminal;
use std::fs::File;
use std::sync::Mutex;
use tracing::{info, warn};

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    if args.headless {
        run_headless(&args)
    } else {
        run_terminal(&args)
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("could not create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(anyhow::Error::msg)
            .context("could not install the log subscriber")?;
    } else if args.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(anyhow::Error::msg)
            .context("could not install the log subscriber")?;
    }
    // Logging to the terminal we draw on would scribble over the panel.
    Ok(())
}

fn sim_config(args: &Args, width: usize, height: usize) -> SimConfig {
    SimConfig {
        width,
        height,
        tempo: args.tempo,
        decay: args.decay,
        seed: args.seed(),
        lifespan: Lifespan::default(),
    }
}

fn run_headless(args: &Args) -> Result<()> {
    let (w, h) = args.headless_grid();
    let mut display = MemoryDisplay::new(w, h);
    let cfg = sim_config(args, display.width(), display.height());
    info!(width = cfg.width, height = cfg.height, seed = cfg.seed, "headless run");

    let mut sim = Simulation::seeded(cfg)?;
    let limit = args.tick_limit().unwrap_or(0);
    let mut deaths = 0;
    for _ in 0..limit {
        let report = sim.tick(&[])?;
        deaths += report.deaths;
        sim.render(&mut display);
    }

    info!(
        ticks = sim.tick_count(),
        worms = sim.population().len(),
        deaths,
        lit = sim.matrix().lit_cells(),
        "headless run finished"
    );

    if args.dump_frame {
        let cells: Vec<_> = sim.matrix().snapshot().collect();
        println!("{}", serde_json::to_string(&cells)?);
    }
    Ok(())
}

fn run_terminal(args: &Args) -> Result<()> {
    let (cols, rows) = terminal::size()?;
    let fit = fit_grid(cols, rows);
    let (w, h) = args.grid_within(fit);
    if w > fit.0 || h > fit.1 {
        bail!(
            "a {w}x{h} panel needs a {}x{} terminal, this one is {cols}x{rows}",
            w * 2,
            h + 1
        );
    }

    let mut display = TerminalDisplay::begin(w, h)?;
    let res = tick_loop(args, &mut display);
    // Always restore the terminal, then report.
    let restored = display.end();
    res?;
    restored?;
    Ok(())
}

fn tick_loop(args: &Args, display: &mut TerminalDisplay) -> Result<()> {
    let cfg = sim_config(args, display.width(), display.height());
    info!(
        width = cfg.width,
        height = cfg.height,
        tempo = cfg.tempo,
        decay = cfg.decay,
        seed = cfg.seed,
        "starting"
    );
    let mut sim = Simulation::seeded(cfg)?;
    let limit = args.tick_limit();

    loop {
        display.resize_if_needed()?;

        let mut buttons: Vec<Button> = Vec::new();
        for cmd in poll_commands()? {
            match cmd {
                Command::Quit => {
                    info!(ticks = sim.tick_count(), "quit");
                    return Ok(());
                }
                Command::Press(b) => buttons.push(b),
            }
        }

        let report = sim
            .tick(&buttons)
            .inspect_err(|e| warn!(error = %e, "simulation halted"))?;

        sim.render(display);
        display.set_status(format!(
            "worms {}  tempo {}  tick {}   A add  B remove  X slower  Y faster  Q quit",
            report.worms,
            sim.population().tempo(),
            report.tick
        ));
        display.present()?;

        if limit.is_some_and(|n| report.tick >= n) {
            return Ok(());
        }

        std::thread::sleep(sim.frame_delay());
    }
}

use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use segue::{Channel, EaserRegistry, SceneDef, TimelineSource, Values};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "segue", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sample a scene's timeline at fixed elapsed times.
    Sample(SampleArgs),
    /// Drive a playback across a clock range and print its events.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Elapsed times in milliseconds.
    #[arg(long, required = true, num_args = 1..)]
    at: Vec<f64>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Clock time of the first tick; the playback starts here.
    #[arg(long, default_value_t = 0.0)]
    from: f64,

    /// Last clock time to tick.
    #[arg(long)]
    to: f64,

    /// Clock increment between ticks.
    #[arg(long, default_value_t = 16.0)]
    step: f64,

    /// Request a stop at the first tick at or after this time.
    #[arg(long)]
    stop_at: Option<f64>,

    /// Stop immediately instead of waiting for the loop seam.
    #[arg(long, default_value_t = false)]
    immediate: bool,
}

#[derive(Serialize)]
struct SampleLine<'a> {
    time: f64,
    values: Option<&'a [Channel]>,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum PlayEvent {
    Tick { time: f64, values: Values },
    Complete { time: f64 },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Sample(args) => cmd_sample(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let scene = SceneDef::from_path(&args.in_path)?;
    let timeline = scene.timeline.build(&EaserRegistry::standard())?;
    for time in args.at {
        let values = timeline.at_time(time)?;
        let line = SampleLine {
            time,
            values: values.as_deref(),
        };
        println!("{}", serde_json::to_string(&line)?);
    }
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step > 0.0, "--step must be positive, got {}", args.step);
    anyhow::ensure!(
        args.to >= args.from,
        "--to ({}) must not be before --from ({})",
        args.to,
        args.from
    );

    let scene = SceneDef::from_path(&args.in_path)?;
    let mut playback = scene.build(&EaserRegistry::standard())?;

    let events = Rc::new(RefCell::new(Vec::new()));
    let clock = Rc::new(Cell::new(args.from));
    {
        let events = Rc::clone(&events);
        playback.on_tick(move |values, time, _| {
            events.borrow_mut().push(PlayEvent::Tick {
                time,
                values: values.to_vec(),
            });
        });
    }
    {
        let events = Rc::clone(&events);
        let clock = Rc::clone(&clock);
        playback.on_complete(move || {
            events
                .borrow_mut()
                .push(PlayEvent::Complete { time: clock.get() });
        });
    }

    playback.start(args.from)?;
    let mut stop_at = args.stop_at;
    let mut tick = 0u64;
    loop {
        let time = args.from + args.step * tick as f64;
        if time > args.to {
            break;
        }
        clock.set(time);
        if stop_at.is_some_and(|at| time >= at) {
            stop_at = None;
            playback.stop(args.immediate);
        }
        playback.tick(time)?;
        for event in events.borrow_mut().drain(..) {
            println!("{}", serde_json::to_string(&event)?);
        }
        if !playback.is_started() {
            break;
        }
        tick += 1;
    }
    Ok(())
}

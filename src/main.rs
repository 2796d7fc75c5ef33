use std::{path::PathBuf, thread, time::Duration};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use colored::Colorize;
use log::debug;
use prettytable::{color, format, Attr, Cell, Row, Table};
use serde::Serialize;

use polltimer::config::{self, Config};
use polltimer::hooks::Hook;
use polltimer::shorthand::Shorthand;
use polltimer::time::{MillisExt, MockClock, SystemClock, Timer};
use polltimer::{Event, Schedule, TimerStatus};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
    /// Config file to use. [default: ${XDG_CONFIG_DIR}/polltimer/config.toml]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the config file if it does not exist
    Init,
    /// Print the configured timers
    List,
    /// Poll the configured timers in real time
    Run {
        /// Stop after this long, e.g. 30s or 2m
        #[arg(short = 'f', long = "for", value_parser = u32::from_human)]
        run_for: Option<u32>,
    },
    /// Poll the configured timers against a simulated clock
    Simulate {
        /// How much simulated time to cover
        #[arg(short, long, value_parser = u32::from_human)]
        until: u32,
        /// Simulated time between polls [default: the configured tick]
        #[arg(short, long, value_parser = u32::from_human)]
        step: Option<u32>,
        /// Initial clock reading in milliseconds, useful to watch the counter wrap
        #[arg(long, default_value_t = 0)]
        start: u32,
        /// Flip a timer between enabled and disabled at an offset, as NAME@OFFSET
        #[arg(short, long, value_parser = parse_toggle)]
        toggle: Vec<Toggle>,
        /// Print the report as JSON
        #[arg(short, long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Clone, Debug)]
struct Toggle {
    name: String,
    offset: u32,
}

fn parse_toggle(s: &str) -> Result<Toggle> {
    let (name, offset) = s
        .rsplit_once('@')
        .with_context(|| format!("Toggle {:?} should look like NAME@OFFSET", s))?;

    if name.is_empty() {
        bail!("Toggle {:?} is missing a timer name", s);
    }

    Ok(Toggle {
        name: name.to_string(),
        offset: u32::from_human(offset)?,
    })
}

#[derive(Debug, Serialize)]
struct SimulatedEvent {
    offset: u32,
    #[serde(flatten)]
    event: Event,
}

#[derive(Debug, Serialize)]
struct Report {
    start: u32,
    step: u32,
    until: u32,
    events: Vec<SimulatedEvent>,
    timers: Vec<TimerStatus>,
}

struct Program {
    config: Config,
}

impl Program {
    fn new(config: Config) -> Self {
        Self { config }
    }

    fn print_timers(&self) {
        if self.config.timers.is_empty() {
            println!("No timers configured");
            return;
        }

        let mut table = Table::new();

        table.set_titles(Row::new(vec![
            Cell::new("Name").with_style(Attr::Underline(true)),
            Cell::new("Mode").with_style(Attr::Underline(true)),
            Cell::new("Duration").with_style(Attr::Underline(true)),
            Cell::new("Disabled Value").with_style(Attr::Underline(true)),
            Cell::new("Enabled").with_style(Attr::Underline(true)),
        ]));

        for timer in self.config.timers.iter() {
            table.add_row(Row::new(vec![
                Cell::new(&timer.name).with_style(Attr::ForegroundColor(color::BLUE)),
                Cell::new(&timer.mode.to_string()),
                Cell::new(&timer.duration.to_human())
                    .style_spec("r")
                    .with_style(Attr::ForegroundColor(color::CYAN)),
                Cell::new(&timer.disabled_value.to_string()).style_spec("r"),
                Cell::new(if timer.enabled { "yes" } else { "no" }),
            ]));
        }

        table.set_format(*format::consts::FORMAT_CLEAN);
        table.printstd();
    }

    fn run(&self, run_for: Option<u32>) -> Result<()> {
        let mut schedule = Schedule::from_config(&self.config, SystemClock);

        if schedule.is_empty() && run_for.is_none() {
            bail!("No timers configured, nothing to run");
        }

        let mut deadline = run_for.map(Timer::new);
        let tick = Duration::from_millis(self.config.tick as u64);
        let hooks_directory = &self.config.hooks_directory;

        println!(
            "Polling {} timers every {}",
            schedule.len().to_string().cyan(),
            self.config.tick.to_human().cyan()
        );

        Hook::LoopStart.run_or_warn(hooks_directory);

        loop {
            for event in schedule.poll() {
                println!(
                    "{} {} fired",
                    Local::now().format("%H:%M:%S%.3f").to_string().dimmed(),
                    event.name.green().bold()
                );

                Hook::Fired(event.name).run_or_warn(hooks_directory);
            }

            if let Some(deadline) = deadline.as_mut() {
                if deadline.once() {
                    debug!("run finished after {}ms", deadline.elapsed());
                    break;
                }
            }

            thread::sleep(tick);
        }

        Hook::LoopEnd.run_or_warn(hooks_directory);

        Ok(())
    }

    fn simulate(&self, until: u32, step: Option<u32>, start: u32, mut toggles: Vec<Toggle>) -> Result<Report> {
        let step = step.unwrap_or(self.config.tick);

        if step == 0 {
            bail!("Simulation step must be longer than 0ms");
        }

        let clock = MockClock::starting_at(start);
        let mut schedule = Schedule::from_config(&self.config, clock.clone());

        for toggle in toggles.iter() {
            schedule.get(&toggle.name)?;
        }
        toggles.sort_by_key(|toggle| toggle.offset);
        let mut pending = toggles.into_iter().peekable();

        let mut events = Vec::new();
        let mut offset = 0u32;

        loop {
            while let Some(toggle) = pending.next_if(|toggle| toggle.offset <= offset) {
                schedule.toggle(&toggle.name)?;
            }

            events.extend(
                schedule
                    .poll()
                    .into_iter()
                    .map(|event| SimulatedEvent { offset, event }),
            );

            if offset >= until {
                break;
            }

            let advance = step.min(until - offset);
            clock.advance(advance);
            offset += advance;
        }

        Ok(Report {
            start,
            step,
            until,
            events,
            timers: schedule.snapshot(),
        })
    }

    fn print_report(report: &Report) {
        println!(
            "Simulated {} in steps of {}, clock starting at {}",
            report.until.to_human().cyan(),
            report.step.to_human().cyan(),
            report.start.to_string().cyan()
        );
        println!();

        if report.events.is_empty() {
            println!("No timers fired");
        }

        for fired in report.events.iter() {
            println!(
                "{} {} fired {}",
                fired.offset.to_kitchen().dimmed(),
                fired.event.name.green().bold(),
                format!("(clock {})", fired.event.at_ms).dimmed()
            );
        }
        println!();

        let mut table = Table::new();

        table.set_titles(Row::new(vec![
            Cell::new("Name").with_style(Attr::Underline(true)),
            Cell::new("Enabled").with_style(Attr::Underline(true)),
            Cell::new("Duration").with_style(Attr::Underline(true)),
            Cell::new("Elapsed").with_style(Attr::Underline(true)),
            Cell::new("Remaining").with_style(Attr::Underline(true)),
        ]));

        for status in report.timers.iter() {
            table.add_row(Row::new(vec![
                Cell::new(&status.name).with_style(Attr::ForegroundColor(color::BLUE)),
                Cell::new(if status.enabled { "yes" } else { "no" }),
                Cell::new(&status.duration.to_string()).style_spec("r"),
                Cell::new(&status.elapsed.to_string()).style_spec("r"),
                Cell::new(&status.remaining.to_string())
                    .style_spec("r")
                    .with_style(Attr::ForegroundColor(color::CYAN)),
            ]));
        }

        table.set_format(*format::consts::FORMAT_CLEAN);
        table.printstd();
    }
}

fn main() -> Result<()> {
    human_panic::setup_panic!();

    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config_path =
        if let Some(conf_path) = args.config {
            conf_path
        } else {
            config::default_config_path()?
        };

    let config = Config::init(&config_path)?;
    let program = Program::new(config);

    match args.command {
        Command::Init => {
            println!("Using config file at {}", config_path.display().to_string().cyan());
        },
        Command::List => {
            program.print_timers();
        },
        Command::Run { run_for } => {
            program.run(run_for)?;
        },
        Command::Simulate { until, step, start, toggle, json } => {
            let report = program.simulate(until, step, start, toggle)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                Program::print_report(&report);
            }
        },
    }

    Ok(())
}

mod log;
mod term;

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::result;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::{AppSettings, Parser, Subcommand};
use run::io::{Basic, Utf8};
use run::Computer;

#[derive(Debug, Clone, Parser)]
#[clap(
    author,
    global_setting = AppSettings::DeriveDisplayOrder,
    global_setting = AppSettings::DisableHelpSubcommand,
)]
struct Opt {
    /// Log more detail, repeat for even more.
    #[clap(long, short, global = true, parse(from_occurrences))]
    verbose: u64,

    #[clap(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Clone, Subcommand)]
enum Cmd {
    /// Run a program with its input and output connected to the terminal.
    Run {
        /// The input file.
        #[clap()]
        input: PathBuf,

        /// Exchange comma separated numbers instead of text.
        #[clap(long)]
        basic: bool,

        /// Values to queue as input before the program starts.
        #[clap(long, multiple_occurrences(true))]
        feed: Vec<Feed>,

        /// Overwrite memory before the program starts, e.g. `--patch 1=12`.
        #[clap(long, multiple_occurrences(true))]
        patch: Vec<Patch>,

        /// Dump memory once the program has halted.
        #[clap(long)]
        dump: bool,
    },
    /// Find the phase settings that give the highest amplifier signal.
    Amplify {
        /// The input file.
        #[clap()]
        input: PathBuf,

        /// Wire the amplifiers into a feedback loop.
        #[clap(long)]
        feedback: bool,
    },
}

#[derive(Debug, Clone)]
struct Feed(Vec<i64>);

#[derive(Debug, Clone, Copy)]
struct Patch {
    addr: usize,
    value: i64,
}

impl FromStr for Feed {
    type Err = run::Error;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        run::parse::program(s).map(Self)
    }
}

impl FromStr for Patch {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected `ADDR=VALUE`, found `{}`", s))?;
        Ok(Self {
            addr: addr.trim().parse()?,
            value: value.trim().parse()?,
        })
    }
}

fn load(path: &Path) -> Result<Vec<i64>> {
    match path.extension().and_then(OsStr::to_str) {
        Some("intcode") | Some("txt") | None => {
            log::debug!("loading {}", path.display());
            Ok(run::parse::program(&fs::read_to_string(path)?)?)
        }
        Some(ext) => {
            log::error!("unrecognized file extension `{}`", ext);
            process::exit(1);
        }
    }
}

fn run(
    path: PathBuf,
    basic: bool,
    feeds: Vec<Feed>,
    patches: Vec<Patch>,
    dump: bool,
) -> Result<()> {
    let mut c = Computer::new(&load(&path)?);
    for Patch { addr, value } in patches {
        log::debug!("patching address {} with {}", addr, value);
        c.mem_mut().set(addr, value);
    }
    let feed = feeds.into_iter().flat_map(|Feed(values)| values).collect();
    log::info!("running {}", path.display());
    let result = if basic {
        term::interactive(&mut c, Basic, feed)
    } else {
        term::interactive(&mut c, Utf8, feed)
    };
    if dump {
        eprintln!("{}", c);
    }
    result
}

fn amplify(path: PathBuf, feedback: bool) -> Result<()> {
    let program = load(&path)?;
    let phases: Vec<i64> = if feedback {
        (5..=9).collect()
    } else {
        (0..=4).collect()
    };
    let (signal, order) = run::network::max_signal(&program, &phases, feedback)?;
    log::info!("highest signal with phase settings {:?}", order);
    println!("{}", signal);
    Ok(())
}

fn main() {
    let opt = Opt::parse();
    log::init(opt.verbose);
    if let Err(err) = match opt.cmd {
        Cmd::Run {
            input,
            basic,
            feed,
            patch,
            dump,
        } => run(input, basic, feed, patch, dump),
        Cmd::Amplify { input, feedback } => amplify(input, feedback),
    } {
        log::error!("{:#}", err);
        process::exit(1);
    }
}

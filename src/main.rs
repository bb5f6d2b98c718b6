// SPDX-License-Identifier: MIT
//
// gridcon — demo driver for gridcon-term.
//
// Opens the controlling terminal in raw mode, draws a small screen and
// echoes the name of every decoded key until `q` or Ctrl-C:
//
//   ┌──────────────────────────────┐
//   │ title bar (REVERSE)          │  ← row 0
//   │                              │
//   │ key log, newest at the top   │  ← rows 2 .. h-2
//   │                              │
//   │ status: last flush stats     │  ← row h-1
//   └──────────────────────────────┘
//
// Without a tty (stdin redirected, or run from a pipeline) there is nothing
// to poll, so one frame is painted and dumped to stdout with `print_all`.
//
// Options come from `GRIDCON_OPTS` (comma separated) and then from any
// number of `--set name=value` arguments, so the command line wins.
//
// Logging goes to stderr through env_logger and is off below `warn` unless
// RUST_LOG says otherwise; redirect stderr when turning it up, or the log
// lines land on top of the alternate screen.

use std::collections::VecDeque;
use std::env;
use std::process;

use gridcon_term::cell::Flags;
use gridcon_term::color::Color;
use gridcon_term::config::ConsoleConfig;
use gridcon_term::console::{Console, FlushStats};
use gridcon_term::error::{Error, Result};
use gridcon_term::key::Key;
use gridcon_term::terminal::{RawTerminal, Terminal, WriterTerminal};

const OPTS_ENV: &str = "GRIDCON_OPTS";
const TITLE: &str = " gridcon: press keys, q or Ctrl-C to quit ";
const LOG_FG: Color = Color::Rgb(0x9E, 0xCE, 0x6A);
const STATUS_FG: Color = Color::Rgb(0x56, 0x5F, 0x89);

// ─── Arguments ───────────────────────────────────────────────────────────────

const USAGE: &str = "usage: gridcon [--set name=value]...

options (also read from GRIDCON_OPTS, comma separated):
  fg=rrggbb|default    paint foreground
  bg=rrggbb|default    paint background
  wide=allowlist|unicode
  cursor | nocursor    show or hide the hardware cursor";

/// Build the console configuration from the environment and arguments.
fn parse_args(args: &[String], env_opts: Option<&str>) -> Result<ConsoleConfig> {
    let mut config = ConsoleConfig::default();
    if let Some(list) = env_opts {
        config.apply_all(list)?;
    }

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(opt) = arg.strip_prefix("--set=") {
            config.apply_all(opt)?;
        } else if arg == "--set" {
            let opt = iter
                .next()
                .ok_or_else(|| Error::InvalidOption("--set needs a value".to_string()))?;
            config.apply_all(opt)?;
        } else {
            return Err(Error::InvalidOption(arg.clone()));
        }
    }
    Ok(config)
}

// ─── Screen ──────────────────────────────────────────────────────────────────

struct Demo {
    config: ConsoleConfig,
    log: VecDeque<String>,
    last: FlushStats,
    quit: bool,
}

impl Demo {
    fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            log: VecDeque::new(),
            last: FlushStats::default(),
            quit: false,
        }
    }

    fn on_key(&mut self, key: Key) {
        if key == Key::Byte(b'q') || key.is_ctrl(b'c') {
            self.quit = true;
            return;
        }
        self.log.push_front(key.name());
        self.log.truncate(256);
    }

    fn paint<T: Terminal>(&self, con: &mut Console<T>) {
        let (fg, bg) = (self.config.fg, self.config.bg);
        let w = i32::from(con.width());
        let h = i32::from(con.height());
        con.fill(fg, bg);

        con.set_color(fg, bg);
        con.set_xy(0, 0);
        con.put(TITLE);
        for x in 0..w {
            con.put_color_flags(x, 0, fg, bg, Flags::REVERSE);
        }

        con.set_color(LOG_FG, bg);
        let rows = usize::try_from((h - 3).max(0)).unwrap_or(0);
        for (y, name) in (2..).zip(self.log.iter().take(rows)) {
            con.set_xy(2, y);
            con.put(name);
        }

        con.set_color(STATUS_FG, bg);
        con.set_xy(0, h - 1);
        con.put(&format!(
            "{}x{}  last flush: {} written, {} moves, {} bytes  ☠ 💀",
            w, h, self.last.cells_written, self.last.cursor_moves, self.last.bytes
        ));
    }
}

fn run(config: ConsoleConfig) -> Result<()> {
    match RawTerminal::new() {
        Ok(term) => interactive(term, config),
        Err(Error::NotATerminal) => {
            log::debug!("no tty, dumping one frame");
            dump(WriterTerminal::stdout(), config).map(drop)
        }
        Err(e) => Err(e),
    }
}

/// Paint one frame and print it as plain colored lines.
fn dump<T: Terminal>(term: T, config: ConsoleConfig) -> Result<T> {
    let mut con = Console::with_config(term, config)?;
    Demo::new(config).paint(&mut con);
    con.print_all()?;
    con.into_terminal()
}

fn interactive(term: RawTerminal, config: ConsoleConfig) -> Result<()> {
    let mut con = Console::with_config(term, config)?;
    let mut demo = Demo::new(config);

    demo.paint(&mut con);
    demo.last = con.flush()?;

    while !demo.quit {
        con.terminal_mut().refresh_size();
        let resized = con.sync_size();
        let key = con.read_key()?;
        if let Some(key) = key {
            log::debug!("key: {key}");
            demo.on_key(key);
        }
        if key.is_some() || resized {
            demo.paint(&mut con);
            demo.last = con.flush()?;
        }
    }

    con.into_terminal()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        println!("{USAGE}");
        return;
    }

    let env_opts = env::var(OPTS_ENV).ok();
    let config = match parse_args(&args, env_opts.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("gridcon: {e}\n\n{USAGE}");
            process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        eprintln!("gridcon: {e}");
        process::exit(1);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

use anyhow::{Context, Result};
use markwright_config::Config;
use markwright_engine::{Alignment, IoSink, MarkdownWriter, Table, TableColumn};
use std::{
    env, fs,
    io::{self, Read},
    path::Path,
    process,
};

const USAGE: &str = "\
Usage: markwright <command> [options] [file]

Commands:
  table [file]                       tab-separated rows to a table; the first row is the header,
                                     ':name', 'name:' and ':name:' set the column alignment
  list [--ordered|--tasks] [file]    one list item per non-empty line
  code [--info <lang>] <file>        a file as a fenced code block
  escape [text...]                   text escaped for a Markdown paragraph
  config [--init]                    show the config file path, --init writes the defaults

Input is read from stdin when no file is given. MARKWRIGHT_CONFIG names an
alternative config file.";

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let config = match Config::load() {
        Ok(Some(config)) => config,
        Ok(None) => Config::default(),
        Err(e) => {
            log::warn!("Failed to load config file, using defaults: {e}");
            Config::default()
        }
    };

    match command.as_str() {
        "table" => render_table(&config, rest),
        "list" => render_list(&config, rest),
        "code" => render_code(&config, rest),
        "escape" => render_escaped(&config, rest),
        "config" => show_config(&config, rest),
        "help" | "-h" | "--help" => {
            println!("{USAGE}");
            Ok(())
        }
        other => {
            eprintln!("Error: unknown command '{other}'");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    }
}

/// Read the named file, or stdin when there is none.
fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read input file '{path}'"))
        }
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Run `write` against a writer on stdout, ending the last line.
fn write_output(
    config: &Config,
    write: impl FnOnce(&mut MarkdownWriter<'_>) -> markwright_engine::Result<()>,
) -> Result<()> {
    let mut sink = IoSink(io::stdout().lock());
    let mut writer = MarkdownWriter::with_sink(&mut sink, config.format.clone())
        .with_settings(config.writer_settings());
    write(&mut writer)?;
    writer.write_line_if_necessary()?;
    writer.close()?;
    Ok(())
}

fn render_table(config: &Config, args: &[String]) -> Result<()> {
    let input = read_input(args.first().map(String::as_str))?;
    let mut lines = input.lines().filter(|line| !line.trim().is_empty());
    let Some(header) = lines.next() else {
        log::warn!("Input has no rows, nothing to write");
        return Ok(());
    };

    let columns = header.split('\t').map(parse_column).collect();
    let rows: Vec<Vec<String>> = lines
        .map(|line| line.split('\t').map(|cell| cell.trim().to_string()).collect())
        .collect();
    log::debug!("Rendering table with {} body rows", rows.len());

    let table = Table::new(columns, rows);
    write_output(config, |w| w.write_table(&table))
}

/// Header cell with optional alignment colons.
fn parse_column(cell: &str) -> TableColumn {
    let cell = cell.trim();
    let (name, left) = match cell.strip_prefix(':') {
        Some(rest) => (rest, true),
        None => (cell, false),
    };
    let (name, right) = match name.strip_suffix(':') {
        Some(rest) => (rest, true),
        None => (name, false),
    };
    let alignment = match (left, right) {
        (true, true) => Alignment::Center,
        (true, false) => Alignment::Left,
        (false, true) => Alignment::Right,
        (false, false) => Alignment::None,
    };
    TableColumn::new(name.trim(), alignment)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Ordered,
    Tasks,
}

fn render_list(config: &Config, args: &[String]) -> Result<()> {
    let mut kind = ListKind::Bullet;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--ordered" => kind = ListKind::Ordered,
            "--tasks" => kind = ListKind::Tasks,
            _ => path = Some(arg.as_str()),
        }
    }
    let input = read_input(path)?;

    write_output(config, |w| {
        let items = input.lines().map(str::trim).filter(|line| !line.is_empty());
        for (index, item) in items.enumerate() {
            match kind {
                ListKind::Bullet => w.write_list_item(item)?,
                ListKind::Ordered => w.write_ordered_list_item(index + 1, item)?,
                ListKind::Tasks => {
                    let (completed, text) = parse_task(item);
                    w.write_task_list_item(completed, text)?;
                }
            }
        }
        Ok(())
    })
}

/// `[x] text` and `[ ] text` set the checkbox; anything else is open.
fn parse_task(line: &str) -> (bool, &str) {
    if let Some(text) = line
        .strip_prefix("[x] ")
        .or_else(|| line.strip_prefix("[X] "))
    {
        (true, text)
    } else if let Some(text) = line.strip_prefix("[ ] ") {
        (false, text)
    } else {
        (false, line)
    }
}

fn render_code(config: &Config, args: &[String]) -> Result<()> {
    let mut info = None;
    let mut path = None;
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--info" => {
                info = Some(
                    args.next()
                        .context("--info needs a language name")?
                        .clone(),
                );
            }
            _ => path = Some(arg.as_str()),
        }
    }
    let Some(path) = path else {
        eprintln!("Error: code needs a file");
        eprintln!("{USAGE}");
        process::exit(1);
    };

    let info = info.or_else(|| {
        Path::new(path)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
    });
    let content = read_input(Some(path))?;
    let body = content.trim_end_matches(['\n', '\r']);
    write_output(config, |w| w.write_fenced_code_block(body, info.as_deref()))
}

fn render_escaped(config: &Config, args: &[String]) -> Result<()> {
    let text = if args.is_empty() {
        read_input(None)?
    } else {
        args.join(" ")
    };
    write_output(config, |w| w.write_text(text.trim_end_matches(['\n', '\r'])))
}

fn show_config(config: &Config, args: &[String]) -> Result<()> {
    let config_path = Config::config_path();
    if args.iter().any(|arg| arg == "--init") {
        if config_path.exists() {
            eprintln!(
                "Config file already exists at {}, leaving it alone",
                config_path.display()
            );
        } else {
            config.save()?;
            log::info!("Wrote default config to {}", config_path.display());
        }
    }
    println!("{}", config_path.display());
    Ok(())
}

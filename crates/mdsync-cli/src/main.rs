use anyhow::{Context, Result, bail};
use mdsync_config::Config;
use mdsync_engine::{compute_context_with, model::outline, parse, serialize, to_tree_location};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

const USAGE: &str = "\
Usage:
  mdsync-cli normalize <file>          print the file as the serializer writes it
  mdsync-cli tree <file>               print the parsed document tree with spans
  mdsync-cli context <file> <offset>   print the cursor context at a byte offset
  mdsync-cli roundtrip <file>          check that serialization is idempotent";

enum Command {
    Normalize(PathBuf),
    Tree(PathBuf),
    Context(PathBuf, usize),
    Roundtrip(PathBuf),
}

impl Command {
    fn from_args(args: &[String]) -> Result<Self> {
        let command = match args {
            [cmd, file] if cmd == "normalize" => Command::Normalize(PathBuf::from(file)),
            [cmd, file] if cmd == "tree" => Command::Tree(PathBuf::from(file)),
            [cmd, file, offset] if cmd == "context" => {
                let offset = offset
                    .parse::<usize>()
                    .with_context(|| format!("offset '{offset}' is not a byte offset"))?;
                Command::Context(PathBuf::from(file), offset)
            }
            [cmd, file] if cmd == "roundtrip" => Command::Roundtrip(PathBuf::from(file)),
            _ => bail!("unrecognised arguments"),
        };
        Ok(command)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn run(command: Command, config: &Config) -> Result<bool> {
    let parse_options = config.parse_options();
    let serialize_options = config.serialize_options();

    match command {
        Command::Normalize(path) => {
            let text = read(&path)?;
            let doc = parse(&text, &parse_options);
            print!("{}", serialize(&doc, &serialize_options)?);
        }
        Command::Tree(path) => {
            let text = read(&path)?;
            let doc = parse(&text, &parse_options);
            print!("{}", outline(&doc));
            for d in &doc.degradations {
                println!("degraded: {d:?}");
            }
        }
        Command::Context(path, offset) => {
            let text = read(&path)?;
            if offset > text.len() {
                bail!("offset {offset} is past the end of the file ({} bytes)", text.len());
            }
            let doc = parse(&text, &parse_options);
            if let Some(location) = to_tree_location(offset, &doc) {
                println!("node {:?} +{}", location.path.0, location.node_offset);
            }
            println!("{:#?}", compute_context_with(&text, offset, &config.context_limits()));
        }
        Command::Roundtrip(path) => {
            let text = read(&path)?;
            let once = serialize(&parse(&text, &parse_options), &serialize_options)?;
            let twice = serialize(&parse(&once, &parse_options), &serialize_options)?;
            if once != twice {
                let line = once
                    .lines()
                    .zip(twice.lines())
                    .position(|(a, b)| a != b)
                    .unwrap_or_else(|| once.lines().count().min(twice.lines().count()));
                eprintln!(
                    "'{}' is not stable under round-trip; first difference at line {}",
                    path.display(),
                    line + 1
                );
                return Ok(false);
            }
            if once == text {
                println!("'{}' round-trips unchanged", path.display());
            } else {
                println!("'{}' is stable after one normalization", path.display());
            }
        }
    }
    Ok(true)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = match Command::from_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    // Missing or broken config falls back to the defaults
    let config = match Config::load() {
        Ok(Some(config)) => {
            log::debug!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => Config::default(),
        Err(e) => {
            log::warn!("Ignoring config file: {e}");
            Config::default()
        }
    };

    if !run(command, &config)? {
        process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parses_commands() {
        assert!(matches!(
            Command::from_args(&args(&["tree", "a.md"])),
            Ok(Command::Tree(p)) if p == PathBuf::from("a.md")
        ));
        assert!(matches!(
            Command::from_args(&args(&["context", "a.md", "12"])),
            Ok(Command::Context(_, 12))
        ));
        assert!(Command::from_args(&args(&["context", "a.md", "x"])).is_err());
        assert!(Command::from_args(&args(&["roundtrip"])).is_err());
        assert!(Command::from_args(&args(&[])).is_err());
    }
}

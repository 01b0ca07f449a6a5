use std::fs::File;
use std::io::Write;
use std::path::Path;
use chrono::Local;
use env_logger::{Builder, Target};
use log::{info, LevelFilter};

/// Sets up `env_logger` for the binary.
///
/// `RUST_LOG` still applies on top of the level chosen by the flags.
/// Log lines go to stderr so a JSON report printed on stdout stays clean.
pub fn init(verbose: bool, silent: bool, log_file: Option<&Path>) -> anyhow::Result<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else if silent {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::new();
    builder.filter_level(level).parse_default_env();

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stderr);
        }
    }

    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{}] [{:<5}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.args()
        )
    });

    builder.try_init()?;

    if let Some(path) = log_file {
        info!("Logging to file: {}", path.display());
    }

    Ok(())
}

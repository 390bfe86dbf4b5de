// SPDX-License-Identifier: Apache-2.0 OR MIT
use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use testlog::logging::{self, Attributes, BackendKind, Logger};
use testlog::LoggerConfig;

/// Replay a scripted test run through the logger
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Backend to start with (overrides TESTLOG_BACKEND)
    #[arg(long)]
    backend: Option<BackendKind>,

    /// XML log destination (overrides LOGFILE)
    #[arg(long)]
    logfile: Option<PathBuf>,

    /// JUnit report destination (overrides LOGFILE_JUNIT)
    #[arg(long)]
    junit: Option<PathBuf>,

    /// Do not echo serial console lines
    #[arg(long)]
    no_serial: bool,

    /// JSON file holding an array of steps
    script: PathBuf,
}

/// One scripted logger call
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Info {
        message: String,
        #[serde(default)]
        attrs: Attributes,
    },
    Warning {
        message: String,
        #[serde(default)]
        attrs: Attributes,
    },
    Error {
        message: String,
        #[serde(default)]
        attrs: Attributes,
    },
    Log {
        message: String,
        #[serde(default)]
        attrs: Attributes,
    },
    Serial {
        message: String,
        machine: String,
    },
    Nested {
        message: String,
        #[serde(default)]
        attrs: Attributes,
        #[serde(default)]
        steps: Vec<Step>,
    },
    Subtest {
        name: String,
        #[serde(default)]
        attrs: Attributes,
        #[serde(default)]
        steps: Vec<Step>,
    },
    Select {
        backend: BackendKind,
    },
}

impl Args {
    fn config(&self) -> Result<LoggerConfig> {
        let mut config = LoggerConfig::from_env().context("invalid logger environment")?;
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(path) = &self.logfile {
            config.logfile = Some(path.clone());
        }
        if let Some(path) = &self.junit {
            config.junit_file = Some(path.clone());
        }
        if self.no_serial {
            config.print_serial_logs = false;
        }
        Ok(config)
    }
}

fn load_script(path: &Path) -> Result<Vec<Step>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse script '{}'", path.display()))
}

fn replay(logger: &Logger, steps: &[Step]) -> Result<()> {
    for step in steps {
        match step {
            Step::Info { message, attrs } => logger.info(message, attrs),
            Step::Warning { message, attrs } => logger.warning(message, attrs),
            Step::Error { message, attrs } => logger.error(message, attrs),
            Step::Log { message, attrs } => logger.log(message, attrs),
            Step::Serial { message, machine } => logger.log_serial(message, machine),
            Step::Nested {
                message,
                attrs,
                steps,
            } => logger.in_nested(message, attrs, || replay(logger, steps))?,
            Step::Subtest { name, attrs, steps } => {
                logger.in_subtest(name, attrs, || replay(logger, steps))?
            }
            Step::Select { backend } => logger
                .select_backend(*backend)
                .with_context(|| format!("failed to switch to {} backend", backend))?,
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let steps = load_script(&args.script)?;
    let config = args.config()?;

    let logger = logging::init_global(config).context("failed to open log destinations")?;
    logging::install_panic_hook();

    let result = replay(logger, &steps);
    logging::shutdown_global().context("failed to finalise logs")?;
    result
}

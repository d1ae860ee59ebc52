//! Command-line surface for `revelio`.
//!
//! Flags follow the single-dash long form (`-img photo.jpg -revelio label`);
//! both flags may repeat but only their first value is used.

use clap::Parser;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use revelio::annotate::{AnnotationService, Mode};
use revelio::common::Result as RevelioResult;
use revelio::dispatch::detect;

const LONG_FLAGS: [&str; 2] = ["img", "revelio"];

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Reveal the text, labels or faces in an image with Cloud Vision",
    long_about = None
)]
pub struct Cli {
    #[arg(
        long,
        value_name = "PATH",
        allow_hyphen_values = true,
        help = "image file to annotate"
    )]
    pub img: Vec<String>,
    #[arg(
        long,
        value_name = "MODE",
        allow_hyphen_values = true,
        help = "what to reveal: text, label or face"
    )]
    pub revelio: Vec<String>,
    /// Flag parsing stops at the first positional; the rest is ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<String>,
}

impl Cli {
    /// First `-img` and `-revelio` values, whitespace-trimmed.
    pub fn first_values(&self) -> Option<(&str, &str)> {
        let img = self.img.first()?;
        let revelio = self.revelio.first()?;
        Some((img.trim(), revelio.trim()))
    }
}

/// One resolved run: a single image and a single mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub mode: Mode,
    pub image: PathBuf,
}

pub fn usage(program: &str) -> String {
    let name = Path::new(program)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "revelio".to_string());
    format!("Usage: {} -img <path-to-image> -revelio <text|label|face>", name)
}

/// Rewrites `-img`/`-revelio` (and their `=value` forms) to the double-dash
/// spelling clap expects. Values following a flag, the first positional and
/// everything after it, and anything after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut takes_value = false;
    let mut passthrough = false;

    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || passthrough || takes_value {
            takes_value = false;
            normalized.push(arg);
            continue;
        }
        let Some(s) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if s == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        match single_dash_flag(s) {
            Some((name, has_inline_value)) => {
                takes_value = !has_inline_value;
                normalized.push(OsString::from(format!("-{}", s)));
                log::trace!("Normalized flag {} to --{}", s, name);
            }
            None => {
                let name = s.trim_start_matches('-');
                takes_value = s.starts_with("--")
                    && !s.contains('=')
                    && LONG_FLAGS.iter().any(|flag| *flag == name);
                passthrough = s == "-" || !s.starts_with('-');
                normalized.push(arg);
            }
        }
    }
    normalized
}

fn single_dash_flag(arg: &str) -> Option<(&'static str, bool)> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let (name, has_inline_value) = match rest.split_once('=') {
        Some((name, _)) => (name, true),
        None => (rest, false),
    };
    LONG_FLAGS
        .iter()
        .find(|flag| **flag == name)
        .map(|flag| (*flag, has_inline_value))
}

/// Parses `args`, runs one detection and returns the process exit status.
///
/// `make_service` is only called once the mode is known to be valid, so a
/// bad `-revelio` value never builds a client or reaches the network.
pub async fn run<I, T, F, S, O, E>(args: I, make_service: F, out: &mut O, err: &mut E) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    F: FnOnce() -> RevelioResult<S>,
    S: AnnotationService,
    O: Write,
    E: Write,
{
    let args = normalize_args(args);
    let program = args
        .first()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => {
            let rendered = e.render();
            let _ = if e.use_stderr() {
                write!(err, "{}", rendered)
            } else {
                write!(out, "{}", rendered)
            };
            return e.exit_code();
        }
    };

    let Some((img, revelio)) = cli.first_values() else {
        let _ = writeln!(err, "{}", usage(&program));
        return 1;
    };

    let mode = match revelio.parse::<Mode>() {
        Ok(mode) => mode,
        Err(e) => {
            // Reported, but unlike the other failures this exits 0.
            log::warn!("Skipping detection: {}", e);
            let _ = writeln!(err, "{}", e);
            return 0;
        }
    };

    let invocation = Invocation {
        mode,
        image: PathBuf::from(img),
    };

    match execute(&invocation, make_service, out).await {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("Detection failed: {:?}", e);
            let _ = writeln!(err, "{}", e);
            1
        }
    }
}

async fn execute<F, S, O>(invocation: &Invocation, make_service: F, out: &mut O) -> anyhow::Result<()>
where
    F: FnOnce() -> RevelioResult<S>,
    S: AnnotationService,
    O: Write,
{
    let service = make_service()?;
    let lines = detect(&service, invocation.mode, &invocation.image).await?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    Ok(())
}

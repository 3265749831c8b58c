#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::must_use_candidate
)]

mod args;
mod ttf;

use std::{
    fs::{self, File},
    io::BufWriter,
    time::Instant,
};

use anyhow::Context;
use bytefont::{generate, FontMetadata, Rasterizer, WriteOptions};
use clap::error::ErrorKind;
use flexi_logger::{Logger, LoggerHandle};

use crate::{args::Args, ttf::TtfRasterizer};

/// Exit code for unusable command line arguments.
const EXIT_ARGS: i32 = -1;

fn log_spec(verbose: u8) -> &'static str {
    match verbose {
        0 | 1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn start_logger(verbose: u8) -> Option<LoggerHandle> {
    match Logger::try_with_env_or_str(log_spec(verbose)).and_then(|logger| logger.log_to_stderr().start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn main() {
    let (args, ignored) = match Args::parse_lenient(std::env::args_os()) {
        Ok(parsed) => parsed,
        Err(err) => {
            let _ = err.print();
            if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
                return;
            }
            eprintln!("failed parsing arguments.");
            std::process::exit(EXIT_ARGS);
        }
    };

    let _logger = start_logger(args.verbose);
    log::info!("bytefont_gen V{}", env!("CARGO_PKG_VERSION"));
    for arg in &ignored {
        log::warn!("ignoring unknown argument '{arg}'");
    }

    if let Err(err) = run(&args) {
        log::error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let start = Instant::now();
    let rasterizer = TtfRasterizer::load(&args.font, args.size, args.style)?;
    let meta = FontMetadata::new(args.font_name(), args.size, args.style).with_height(rasterizer.line_height() as i32);
    meta.validate()?;

    let out = args.output_path();
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).with_context(|| format!("creating '{}'", parent.display()))?;
            log::debug!("created parent directories for output file.");
        }
    }
    log::debug!("output '{}', char range {:?}", out.display(), args.char_range());

    log::info!(
        "generating byte font for '{}' with size '{}' and style '{}'.",
        meta.name(),
        meta.size(),
        meta.style()
    );
    let file = File::create(&out).with_context(|| format!("creating '{}'", out.display()))?;
    let stats = generate(
        &rasterizer,
        &meta,
        args.char_range(),
        &WriteOptions { comments: args.comments },
        BufWriter::new(file),
    )?;

    log::info!(
        "finished generating byte font with {} chars ({}ms).",
        stats.written,
        start.elapsed().as_millis()
    );
    Ok(())
}

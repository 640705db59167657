use clap::Parser;
use log::{error, info, warn};
use shading_core::app::run_headless;
use shading_core::io::config::Config;
use shading_core::layout::Variant;
use std::path::Path;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Renders a scene through the unlit or lit shading pipeline")]
struct Args {
    /// Scene configuration file.
    #[arg(short, long, default_value = "scene.toml")]
    config: String,

    /// Pipeline variant, overriding `[render] variant`.
    #[arg(short, long, value_enum)]
    variant: Option<Variant>,

    /// Output PNG path, overriding `[render] output`.
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = if Path::new(&args.config).exists() {
        match Config::load(&args.config) {
            Ok(c) => {
                info!("Loaded config from '{}'", args.config);
                c
            }
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        warn!("Config '{}' not found, using defaults.", args.config);
        Config::default()
    };

    if let Some(variant) = args.variant {
        config.render.variant = variant;
    }
    if let Some(output) = args.output {
        config.render.output = output;
    }

    match run_headless(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

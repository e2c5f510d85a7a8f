use clap::Parser;
use image_label::config::{self, ConfigError, Overrides};
use image_label::types::{Anchor, FontColor, LabelSettings, OutputFormat};
use image_label::{label::LabelFont, logging, output, process};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "image-label")]
#[command(about = "Add an auto-fitted text label to images")]
#[command(long_about = "\
Add an auto-fitted text label to images

Each FILE is copied to <name>.altered.<ext> with the label drawn on it; the
original is left alone. The font shrinks from --font-size until the label fits
inside the offsets. Black-and-white images are labeled in white (or black with
--black-for-bw) instead of the configured color.

Settings are layered, later layers winning:
  built-in defaults → [defaults] → [<NAME>] from --setting → flags

Run 'image-label --gen-config' to generate a documented config file.")]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// Images to label
    files: Vec<PathBuf>,

    /// Named config section to apply
    #[arg(short = 'S', long)]
    setting: Option<String>,

    /// Text of the label
    #[arg(short = 'T', long)]
    label_text: Option<String>,

    /// Label position: T, TR, R, BR, B, BL, L or TL
    #[arg(short = 'L', long)]
    label_location: Option<Anchor>,

    /// Label color: red, blue, green, yellow, black or white
    #[arg(short = 'C', long)]
    font_color: Option<FontColor>,

    /// TrueType font file
    #[arg(short = 'F', long)]
    font_file: Option<PathBuf>,

    /// Starting font size; shrunk until the label fits
    #[arg(short = 'Z', long)]
    font_size: Option<u32>,

    /// Pixels kept clear at the left/right edges
    #[arg(short = 'H', long)]
    label_offset_lr: Option<u32>,

    /// Pixels kept clear at the top/bottom edges
    #[arg(short = 'V', long)]
    label_offset_tb: Option<u32>,

    /// Rotate clockwise by DEGREES (1-359) before labeling
    #[arg(short = 'R', long, value_name = "DEGREES")]
    rotate: Option<i64>,

    /// JPEG quality (1-95)
    #[arg(short = 'J', long)]
    jpg_quality: Option<i64>,

    /// Use black instead of white text on black-and-white images
    #[arg(short = 'B', long)]
    black_for_bw: bool,

    /// Output format: BMP, JPEG or PNG
    #[arg(short = 'O', long)]
    output_format: Option<OutputFormat>,

    /// Print the config file's section names and exit
    #[arg(short = 'I', long)]
    list_sections: bool,

    /// Print a stock config file with all options documented and exit
    #[arg(long)]
    gen_config: bool,

    /// Config file
    #[arg(long, env = config::CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Parallel workers, capped at the number of CPU cores
    #[arg(short = 'j', long, default_value_t = 1)]
    jobs: usize,

    /// Diagnostic log level: trace, debug, info, warn, error or off
    #[arg(long, default_value = logging::DEFAULT_LEVEL)]
    log_level: String,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            label_text: self.label_text.clone(),
            label_location: self.label_location,
            font_color: self.font_color,
            font_file: self.font_file.clone(),
            font_size: self.font_size,
            label_offset_lr: self.label_offset_lr,
            label_offset_tb: self.label_offset_tb,
            rotate: self.rotate,
            jpg_quality: self.jpg_quality,
            black_for_bw: self.black_for_bw.then_some(true),
            output_format: self.output_format,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.quiet);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return ExitCode::SUCCESS;
    }

    let config_file = match load_config(&cli) {
        Ok(file) => file,
        Err(e) => return config_failure(e),
    };

    if cli.list_sections {
        let names = config_file
            .as_ref()
            .map(config::section_names)
            .unwrap_or_default();
        println!("{}", output::format_sections(&names));
        return ExitCode::SUCCESS;
    }

    let (settings, font) = match resolve(&cli, config_file.as_ref()) {
        Ok(resolved) => resolved,
        Err(e) => return config_failure(e),
    };

    if cli.files.is_empty() {
        log::warn!("no files given, nothing to label");
        return ExitCode::SUCCESS;
    }

    init_thread_pool(cli.jobs);
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_process_event(&event);
        }
    });
    let summary = process::process_files(&cli.files, &settings, &font, Some(tx));
    if printer.join().is_err() {
        log::error!("progress printer panicked");
    }
    output::print_summary(&summary);

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Read the config file named by `--config` or the environment, if any.
fn load_config(cli: &Cli) -> Result<Option<toml::Table>, ConfigError> {
    match &cli.config {
        Some(path) => {
            log::debug!("reading config {}", path.display());
            config::load_config_file(path).map(Some)
        }
        None => {
            log::warn!(
                "no config file given (--config or {}), using built-in defaults",
                config::CONFIG_ENV
            );
            Ok(None)
        }
    }
}

fn resolve(
    cli: &Cli,
    file: Option<&toml::Table>,
) -> Result<(LabelSettings, LabelFont), ConfigError> {
    let settings = config::resolve_settings(file, cli.setting.as_deref(), &cli.overrides())?;
    let font = config::load_font(&settings)?;
    log::debug!("resolved settings: {settings:?}");
    Ok((settings, font))
}

fn config_failure(error: ConfigError) -> ExitCode {
    eprintln!("Configuration error: {error}");
    ExitCode::from(2)
}

/// Initialize the rayon thread pool; `--jobs` can constrain down, not up.
fn init_thread_pool(jobs: usize) {
    let threads = config::effective_threads(jobs);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

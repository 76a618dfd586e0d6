//! CLI argument definitions for fviz.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fviz_cli::pipeline::LoadInputs;
use fviz_model::FileRole;

#[derive(Parser)]
#[command(
    name = "fviz",
    version,
    about = "Validate and load fMRI data for interactive viewing",
    long_about = "Validate and load fMRI data for interactive viewing.\n\n\
                  Accepts volumetric NIfTI or surface GIfTI data plus optional\n\
                  time series and task design files, and caches the derived\n\
                  viewer state for the visualization front end."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Settings file (default: settings.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (default: settings file, then pretty).
    #[arg(long = "log-format", value_enum, global = true)]
    pub log_format: Option<LogFormatArg>,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate inputs, build the viewer state, and cache its metadata.
    Load(LoadArgs),

    /// Print metadata cached by an earlier `load`.
    Show(ShowArgs),

    /// Show the settings file location and the settings in effect.
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct LoadArgs {
    /// 4-D functional NIfTI file (.nii or .nii.gz).
    #[arg(long = "nifti-func", value_name = "PATH")]
    pub nifti_func: Option<PathBuf>,

    /// 3-D anatomical NIfTI file.
    #[arg(long = "nifti-anat", value_name = "PATH")]
    pub nifti_anat: Option<PathBuf>,

    /// 3-D binary brain mask NIfTI file.
    #[arg(long = "nifti-mask", value_name = "PATH")]
    pub nifti_mask: Option<PathBuf>,

    /// Left hemisphere functional GIfTI file (.func.gii).
    #[arg(long = "gifti-left-func", value_name = "PATH")]
    pub gifti_left_func: Option<PathBuf>,

    /// Right hemisphere functional GIfTI file (.func.gii).
    #[arg(long = "gifti-right-func", value_name = "PATH")]
    pub gifti_right_func: Option<PathBuf>,

    /// Left hemisphere mesh GIfTI file (.surf.gii).
    #[arg(long = "gifti-left-mesh", value_name = "PATH")]
    pub gifti_left_mesh: Option<PathBuf>,

    /// Right hemisphere mesh GIfTI file (.surf.gii).
    #[arg(long = "gifti-right-mesh", value_name = "PATH")]
    pub gifti_right_mesh: Option<PathBuf>,

    /// Single-column time series files (.csv or .txt).
    #[arg(long = "timeseries", value_name = "PATH", num_args = 1..)]
    pub timeseries: Vec<PathBuf>,

    /// One label per time series file (default: file name without extension).
    #[arg(long = "ts-labels", value_name = "LABEL", num_args = 1..)]
    pub ts_labels: Vec<String>,

    /// One header flag per time series file.
    #[arg(long = "ts-headers", value_name = "BOOL", num_args = 1..)]
    pub ts_headers: Vec<bool>,

    /// Task design file with onset and duration columns (.csv or .tsv).
    #[arg(long = "task-design", value_name = "PATH", requires = "tr")]
    pub task_design: Option<PathBuf>,

    /// Repetition time in seconds.
    #[arg(long = "tr", value_name = "SECONDS")]
    pub tr: Option<f64>,

    /// Slice-time reference as a fraction of TR (default: 0.5).
    #[arg(long = "slicetime-ref", value_name = "FRACTION")]
    pub slicetime_ref: Option<f64>,

    /// Cache directory (default: settings file, then platform cache folder).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Cache key (default: derived from the input files).
    #[arg(long = "session-key", value_name = "KEY")]
    pub session_key: Option<String>,

    /// Validate and summarize without writing to the cache.
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Print the metadata as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

impl LoadArgs {
    /// Collect the paths and options into pipeline inputs.
    pub fn inputs(&self) -> LoadInputs {
        let imaging = [
            (FileRole::NiftiFunc, &self.nifti_func),
            (FileRole::NiftiAnat, &self.nifti_anat),
            (FileRole::NiftiMask, &self.nifti_mask),
            (FileRole::GiftiLeftFunc, &self.gifti_left_func),
            (FileRole::GiftiRightFunc, &self.gifti_right_func),
            (FileRole::GiftiLeftMesh, &self.gifti_left_mesh),
            (FileRole::GiftiRightMesh, &self.gifti_right_mesh),
        ]
        .into_iter()
        .filter_map(|(role, path)| path.clone().map(|path| (role, path)))
        .collect();
        LoadInputs {
            imaging,
            time_series: self.timeseries.clone(),
            ts_labels: self.ts_labels.clone(),
            ts_headers: self.ts_headers.clone(),
            task_design: self.task_design.clone(),
            tr: self.tr,
            slicetime_ref: self.slicetime_ref,
        }
    }
}

#[derive(Args)]
pub struct ShowArgs {
    /// Key the state was cached under.
    #[arg(long = "key", value_name = "KEY")]
    pub key: String,

    /// Cache directory (default: settings file, then platform cache folder).
    #[arg(long = "cache-dir", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Print the metadata as JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the settings in effect to the settings file if it does not exist.
    #[arg(long = "init")]
    pub init: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

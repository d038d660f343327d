//! Command line arguments and the JSON view configuration.
//!
//! A config file can set decorations, padding, toggles, the last-row
//! policy, and explicit formatters for columns by name. Flags given on the
//! command line override the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FormatError};
use crate::fixfmt::{BoolFormatter, Formatter, NumberFormatter, Rounding, Scale, SignMode, TextFormatter};
use crate::model::{LastRowPolicy, Table};
use crate::view::{Decorations, ViewState};

/// Interactive viewer and editor for CSV tables
#[derive(Parser, Debug)]
#[command(name = "tbl", version, about = "View and edit CSV tables in the terminal")]
pub struct Args {
    /// CSV file to open
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON view configuration
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Hide the row number gutter
    #[arg(long)]
    pub no_row_numbers: bool,

    /// Hide the column name header
    #[arg(long)]
    pub no_header: bool,

    /// Spaces on each side of every cell
    #[arg(long, value_name = "N")]
    pub pad: Option<usize>,

    /// Allow deleting the only remaining row
    #[arg(long)]
    pub allow_delete_last_row: bool,

    /// Write diagnostics to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// How a column's values are scaled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScaleSpec {
    Percent,
    BasisPoints,
    Custom { factor: f64, suffix: String },
}

fn default_elide_pos() -> f64 {
    1.0
}

fn default_true() -> String {
    "True".to_string()
}

fn default_false() -> String {
    "False".to_string()
}

/// A formatter as written in the config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FormatSpec {
    Text {
        width: usize,
        #[serde(default)]
        pad_left: bool,
        #[serde(default = "default_elide_pos")]
        elide_pos: f64,
        #[serde(default)]
        pad: Option<char>,
        #[serde(default)]
        ellipsis: Option<char>,
    },
    Bool {
        #[serde(default = "default_true")]
        true_label: String,
        #[serde(default = "default_false")]
        false_label: String,
    },
    Number {
        size: usize,
        #[serde(default)]
        precision: Option<usize>,
        #[serde(default)]
        sign: SignMode,
        #[serde(default)]
        pad: Option<char>,
        /// Decimal point.
        #[serde(default)]
        point: Option<char>,
        /// Fills the whole field when a value does not fit.
        #[serde(default)]
        overflow: Option<char>,
        #[serde(default)]
        nan: Option<String>,
        #[serde(default)]
        inf: Option<String>,
        #[serde(default)]
        scale: Option<ScaleSpec>,
        #[serde(default)]
        rounding: Rounding,
    },
}

impl FormatSpec {
    pub fn build(&self) -> Result<Formatter, FormatError> {
        Ok(match self {
            FormatSpec::Text {
                width,
                pad_left,
                elide_pos,
                pad,
                ellipsis,
            } => {
                let mut fmt = TextFormatter::new(*width)?
                    .with_pad_left(*pad_left)
                    .with_elide_pos(*elide_pos)?;
                if let Some(pad) = pad {
                    fmt = fmt.with_pad(*pad);
                }
                if let Some(ellipsis) = ellipsis {
                    fmt = fmt.with_ellipsis(*ellipsis);
                }
                Formatter::Text(fmt)
            }
            FormatSpec::Bool {
                true_label,
                false_label,
            } => Formatter::Bool(BoolFormatter::with_labels(true_label, false_label)?),
            FormatSpec::Number {
                size,
                precision,
                sign,
                pad,
                point,
                overflow,
                nan,
                inf,
                scale,
                rounding,
            } => {
                let mut fmt = NumberFormatter::new(*size, *precision)?
                    .with_sign(*sign)
                    .with_rounding(*rounding);
                if let Some(pad) = pad {
                    fmt = fmt.with_pad(*pad);
                }
                if let Some(point) = point {
                    fmt = fmt.with_point(*point);
                }
                if let Some(overflow) = overflow {
                    fmt = fmt.with_overflow(*overflow);
                }
                if let Some(nan) = nan {
                    fmt = fmt.with_nan(nan.as_str());
                }
                if let Some(inf) = inf {
                    fmt = fmt.with_inf(inf.as_str());
                }
                if let Some(scale) = scale {
                    fmt = fmt.with_scale(match scale {
                        ScaleSpec::Percent => Scale::percent(),
                        ScaleSpec::BasisPoints => Scale::basis_points(),
                        ScaleSpec::Custom { factor, suffix } => Scale::new(*factor, suffix.as_str())?,
                    });
                }
                Formatter::Number(fmt)
            }
        })
    }
}

/// Display settings, loaded from JSON. Missing fields take defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub decorations: Decorations,
    pub pad: usize,
    pub show_row_number: bool,
    pub show_header: bool,
    pub last_row: LastRowPolicy,
    /// Formatters by column name; other columns get automatic ones.
    pub formats: BTreeMap<String, FormatSpec>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            decorations: Decorations::default(),
            pad: 1,
            show_row_number: true,
            show_header: true,
            last_row: LastRowPolicy::default(),
            formats: BTreeMap::new(),
        }
    }
}

impl ViewConfig {
    pub fn from_json(path: &Path, text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(path, &text)
    }

    /// The config file named by `args`, or defaults, with flags applied.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if args.no_row_numbers {
            self.show_row_number = false;
        }
        if args.no_header {
            self.show_header = false;
        }
        if let Some(pad) = args.pad {
            self.pad = pad;
        }
        if args.allow_delete_last_row {
            self.last_row = LastRowPolicy::Allow;
        }
    }

    /// Builds the initial view of `table`.
    pub fn build_view(&self, table: &Table) -> Result<ViewState, ConfigError> {
        let mut view = ViewState::new(table)
            .with_decorations(self.decorations.clone())
            .with_pad(self.pad)
            .with_show_row_number(self.show_row_number)
            .with_show_header(self.show_header);

        for (name, spec) in &self.formats {
            let format = spec.build()?;
            let mut matched = false;
            for column in table.columns().filter(|c| c.name() == name) {
                matched = true;
                // Every table column is in the view.
                let _ = view.set_formatter(column.id(), format.clone());
            }
            if !matched {
                warn!(column = %name, "format given for unknown column");
            }
        }
        Ok(view)
    }
}

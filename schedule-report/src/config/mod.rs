//! Report configuration
//!
//! Everything has a built-in default matching the standard report layout, so
//! a config file is only needed to change the letterhead, the column widths or
//! where the per-run artifacts are stored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

const CONFIG_DIR_NAME: &str = "schedule-report";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Number of styled report columns (A through H)
pub const REPORT_COLUMNS: usize = 8;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub paths: PathsConfig,
    pub extract: ExtractConfig,
    pub letterhead: LetterheadConfig,
    pub layout: LayoutConfig,
}

/// Where the upload and the per-run artifacts live
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    /// Cleaned table written by the extract stage (inside `upload_dir`)
    pub cleaned_file: String,
    /// Per-channel workbook written by the reshape stage (inside `processed_dir`)
    pub reshaped_file: String,
    /// Final report (inside `processed_dir`), also the download name
    pub report_file: String,
}

/// Fixed offsets of the reporting tool's export layout
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Rows skipped before the metadata block's own header row
    pub metadata_skip_rows: usize,
    /// Rows skipped before the data table's header row
    pub table_skip_rows: usize,
}

/// Letterhead block printed above the report
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LetterheadConfig {
    pub company: String,
    pub taglines: [String; 3],
    pub address: String,
}

/// Column widths, labels, colors and font sizes of the final report
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub column_widths: [f64; REPORT_COLUMNS],
    pub header_labels: [String; REPORT_COLUMNS],
    /// Banner row fill as a hex RGB string, e.g. "D3D3D3"
    pub banner_fill: String,
    pub title_font_size: f64,
    pub letterhead_font_size: f64,
    pub body_font_size: f64,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            processed_dir: PathBuf::from("processed"),
            cleaned_file: "unmerge.xlsx".to_string(),
            reshaped_file: "transformed_data.xlsx".to_string(),
            report_file: "format.xlsx".to_string(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            metadata_skip_rows: 16,
            table_skip_rows: 19,
        }
    }
}

impl Default for LetterheadConfig {
    fn default() -> Self {
        Self {
            company: "The Nielsen Company (Thailand) Limited.".to_string(),
            taglines: [
                "Daily Comercial Logs".to_string(),
                "Advertisment Activity".to_string(),
                "By Copyline".to_string(),
            ],
            address: "34th Fls., United Center, 323 Silom Rd..Bangkok 10500 Tel. 0-2674-6000 Fax. 0-274-6000 Ext.5102".to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_widths: [8.0, 8.0, 6.0, 6.0, 6.0, 6.0, 40.0, 8.0],
            header_labels: ["", "Date/Time", "", "Brk", "PIB", "Dur", "Program", "Remark"]
                .map(str::to_string),
            banner_fill: "D3D3D3".to_string(),
            title_font_size: 20.0,
            letterhead_font_size: 6.0,
            body_font_size: 7.0,
        }
    }
}

impl LayoutConfig {
    /// Banner fill as an RGB value
    pub fn banner_rgb(&self) -> Result<u32> {
        let hex = self.banner_fill.trim_start_matches('#');
        if hex.len() != 6 {
            bail!("banner_fill must be a 6-digit hex color, got '{}'", self.banner_fill);
        }
        u32::from_str_radix(hex, 16)
            .with_context(|| format!("banner_fill is not a hex color: '{}'", self.banner_fill))
    }
}

impl ReportConfig {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// used when present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Per-user config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    fn validate(&self) -> Result<()> {
        self.layout.banner_rgb()?;
        if self.extract.table_skip_rows <= self.extract.metadata_skip_rows + 2 {
            bail!(
                "table_skip_rows ({}) must come after the metadata block (metadata_skip_rows + 3 = {})",
                self.extract.table_skip_rows,
                self.extract.metadata_skip_rows + 3
            );
        }
        for (name, file) in [
            ("cleaned_file", &self.paths.cleaned_file),
            ("reshaped_file", &self.paths.reshaped_file),
            ("report_file", &self.paths.report_file),
        ] {
            if file.is_empty() {
                bail!("paths.{} cannot be empty", name);
            }
        }
        Ok(())
    }
}

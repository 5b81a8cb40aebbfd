//! Host application model and resolution.

pub mod resolver;

use serde::{Deserialize, Serialize};

pub use resolver::{resolve_target, ResolveInput};

/// Office application families the pipeline knows how to feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostFamily {
    MsWord,
    WpsWriter,
    MsExcel,
    WpsSpreadsheets,
}

impl HostFamily {
    pub const ALL: [HostFamily; 4] = [
        HostFamily::MsWord,
        HostFamily::WpsWriter,
        HostFamily::MsExcel,
        HostFamily::WpsSpreadsheets,
    ];

    pub fn is_spreadsheet(self) -> bool {
        matches!(self, HostFamily::MsExcel | HostFamily::WpsSpreadsheets)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HostFamily::MsWord => "Word",
            HostFamily::WpsWriter => "WPS Writer",
            HostFamily::MsExcel => "Excel",
            HostFamily::WpsSpreadsheets => "WPS Spreadsheets",
        }
    }

    /// Process-name stems (lowercase, without `.exe`) identifying the family.
    fn process_stems(self) -> &'static [&'static str] {
        match self {
            HostFamily::MsWord => &["winword", "microsoft word"],
            HostFamily::WpsWriter => &["wps", "wpsoffice"],
            HostFamily::MsExcel => &["excel", "microsoft excel"],
            HostFamily::WpsSpreadsheets => &["et"],
        }
    }

    /// Match a raw process name such as `WINWORD.EXE` or `Microsoft Word`.
    pub fn from_process_name(name: &str) -> Option<HostFamily> {
        let lower = name.trim().to_ascii_lowercase();
        let stem = lower.strip_suffix(".exe").unwrap_or(&lower);
        HostFamily::ALL
            .into_iter()
            .find(|family| family.process_stems().contains(&stem))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundWindow {
    pub pid: u32,
    pub window_id: Option<u64>,
    pub title: Option<String>,
}

/// Point-in-time view of running processes and the focused window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub processes: Vec<ProcessInfo>,
    pub foreground: Option<ForegroundWindow>,
}

/// How a target was picked among several candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// The candidate owns the foreground window.
    Foreground,
    /// No candidate had focus; the lowest pid was taken.
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppHandle {
    pub family: HostFamily,
    pub pid: u32,
    pub window_id: Option<u64>,
    pub matched_by: MatchSource,
}

/// Which word processor a document may be inserted into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertTarget {
    /// Any running word processor.
    #[default]
    Auto,
    Word,
    Wps,
    /// Never insert; output goes down the no-target path.
    None,
}

impl InsertTarget {
    /// Whether a running word processor of `family` may receive documents.
    pub fn accepts(self, family: HostFamily) -> bool {
        match self {
            InsertTarget::Auto => !family.is_spreadsheet(),
            InsertTarget::Word => family == HostFamily::MsWord,
            InsertTarget::Wps => family == HostFamily::WpsWriter,
            InsertTarget::None => false,
        }
    }
}

/// Resolved for every run, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetApplication {
    WordProcessor(AppHandle),
    Spreadsheet(AppHandle),
    None,
}

impl TargetApplication {
    pub fn handle(&self) -> Option<&AppHandle> {
        match self {
            TargetApplication::WordProcessor(h) | TargetApplication::Spreadsheet(h) => Some(h),
            TargetApplication::None => None,
        }
    }
}

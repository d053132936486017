use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Raw cell grid as delivered by a data source: row 0 is the header.
pub type Table = Vec<Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Submitted,
    Verified,
    Installed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Window {
    Ytd,
    Mtd,
    Wtd,
    Yesterday,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Submitted, Stage::Verified, Stage::Installed];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Submitted => "SUBMITTED",
            Stage::Verified => "VERIFIED",
            Stage::Installed => "INSTALLED",
        }
    }

    /// Windows that carry data for this stage. The set narrows as the
    /// funnel advances.
    pub fn valid_windows(self) -> &'static [Window] {
        match self {
            Stage::Submitted => &[Window::Yesterday, Window::Wtd, Window::Mtd, Window::Ytd],
            Stage::Verified => &[Window::Wtd, Window::Mtd, Window::Ytd],
            Stage::Installed => &[Window::Mtd, Window::Ytd],
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl Window {
    pub const ALL: [Window; 4] = [Window::Ytd, Window::Mtd, Window::Wtd, Window::Yesterday];

    pub fn as_str(self) -> &'static str {
        match self {
            Window::Ytd => "YTD",
            Window::Mtd => "MTD",
            Window::Wtd => "WTD",
            Window::Yesterday => "YESTERDAY",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The active (stage, window) selection for one ranking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Filter {
    #[serde(rename = "top_level")]
    pub stage: Stage,
    #[serde(rename = "second_level")]
    pub window: Window,
}

impl Filter {
    pub fn new(stage: Stage, window: Window) -> Self {
        Filter { stage, window }
    }
}

/// Which positional column layout a raw table follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// One row per person: name and team in separate columns.
    Primary,
    /// Pre-aggregated rows (teams, products, divisions): a single
    /// identity column.
    Aggregate,
}

const AGGREGATE_SHEETS: &[&str] = &["Teams", "Products", "Divisions"];

impl TableKind {
    pub fn for_sheet(sheet_name: &str) -> Self {
        if AGGREGATE_SHEETS.contains(&sheet_name) {
            TableKind::Aggregate
        } else {
            TableKind::Primary
        }
    }

    pub fn min_columns(self) -> usize {
        match self {
            TableKind::Primary => 12,
            TableKind::Aggregate => 10,
        }
    }

    pub fn name_column(self) -> usize {
        match self {
            TableKind::Primary => 1,
            TableKind::Aggregate => 0,
        }
    }

    /// `None` when the name column doubles as the group label.
    pub fn group_column(self) -> Option<usize> {
        match self {
            TableKind::Primary => Some(2),
            TableKind::Aggregate => None,
        }
    }

    pub fn metrics_offset(self) -> usize {
        match self {
            TableKind::Primary => 3,
            TableKind::Aggregate => 1,
        }
    }
}

/// Stage x Window counts for one entry. Cells outside a stage's valid
/// windows always read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricMatrix {
    cells: [[f64; 4]; 3],
}

impl MetricMatrix {
    pub fn get(&self, stage: Stage, window: Window) -> f64 {
        self.cells[stage.index()][window.index()]
    }

    pub fn set(&mut self, stage: Stage, window: Window, value: f64) {
        self.cells[stage.index()][window.index()] = value;
    }
}

impl Serialize for MetricMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct StageRow<'a>(&'a MetricMatrix, Stage);

        impl Serialize for StageRow<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let windows = self.1.valid_windows();
                let mut map = serializer.serialize_map(Some(windows.len()))?;
                for window in windows {
                    map.serialize_entry(window.as_str(), &self.0.get(self.1, *window))?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(Stage::ALL.len()))?;
        for stage in Stage::ALL {
            map.serialize_entry(stage.as_str(), &StageRow(self, stage))?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub group_label: String,
    pub metrics: MetricMatrix,
}

/// A ranked entry as served to the dashboard.
#[derive(Debug, Serialize)]
pub struct RankedRow {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub value: f64,
    pub team_color: String,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub data: Vec<RankedRow>,
    pub filter: Filter,
    pub timestamp: String,
    pub sheet_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(alias = "topLevel")]
    pub top_level: Option<String>,
    #[serde(alias = "secondLevel")]
    pub second_level: Option<String>,
    #[serde(alias = "includeZeroSales")]
    pub include_zero: Option<bool>,
    #[serde(alias = "sheetName")]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    #[serde(alias = "topLevel")]
    pub top_level: Option<String>,
    #[serde(alias = "secondLevel")]
    pub second_level: Option<String>,
    #[serde(alias = "sheetName")]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeaderQuery {
    #[serde(alias = "topLevel")]
    pub top_level: Option<String>,
    #[serde(alias = "sheetName")]
    pub sheet_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeaderLabel {
    pub raw: Option<String>,
    pub label: Option<String>,
    pub sheet_name: String,
}

#[derive(Debug, Serialize)]
pub struct FilterOption {
    pub stage: Stage,
    pub windows: &'static [Window],
}

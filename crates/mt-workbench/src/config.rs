// config.rs — Workbench configuration.
//
// Read from `.mt/config.toml` in the project root. Every field has a serde
// default, so an empty or partial file (or no file at all) yields the demo
// setup: acting agent 张三, January 2026 selected, three-second notices.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de, Deserialize, Deserializer, Serialize};

use mt_ledger::{Month, MonthScope, DEFAULT_NOTICE_TTL_MS};

use crate::error::WorkbenchError;
use crate::seed::{default_agents, default_month_options, default_roster, Department};

/// Longest notice lifetime a config may ask for: one day.
pub const MAX_NOTICE_TTL_MS: i64 = 86_400_000;

/// Top-level workbench configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkbenchConfig {
    /// The agent whose desktop and mobile dashboards are shown.
    #[serde(default = "default_acting_agent")]
    pub acting_agent: String,

    /// Month selected when the workbench opens.
    #[serde(default = "default_selected_month")]
    pub selected_month: Month,

    /// Months offered by the month pickers.
    #[serde(default = "default_month_options")]
    pub month_options: Vec<Month>,

    /// Agents the supervisor can issue targets to.
    #[serde(default = "default_agents")]
    pub agents: Vec<String>,

    /// Departments offered by the attendee and interviewee pickers.
    #[serde(default = "default_roster")]
    pub roster: Vec<Department>,

    /// Load the demo targets and activities on start.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,

    /// Optional JSONL file receiving every ledger event.
    #[serde(default)]
    pub events_log: Option<PathBuf>,

    #[serde(default)]
    pub notices: NoticeConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            acting_agent: default_acting_agent(),
            selected_month: default_selected_month(),
            month_options: default_month_options(),
            agents: default_agents(),
            roster: default_roster(),
            seed_demo_data: default_seed_demo_data(),
            events_log: None,
            notices: NoticeConfig::default(),
            completion: CompletionConfig::default(),
        }
    }
}

/// Toast notice configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    /// How long a notice stays visible, in milliseconds. Must lie in
    /// `1..=MAX_NOTICE_TTL_MS`.
    #[serde(
        default = "default_notice_ttl_ms",
        deserialize_with = "deserialize_ttl_ms"
    )]
    pub ttl_ms: i64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            ttl_ms: default_notice_ttl_ms(),
        }
    }
}

/// Which month a completed activity is credited against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthSource {
    /// The activity's own scheduled month.
    #[default]
    Scheduled,
    /// Whatever month the dashboard has selected at completion time.
    Selected,
}

/// Activity completion configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub month_source: MonthSource,
}

impl CompletionConfig {
    /// The lifecycle scope to use given the currently selected month.
    pub fn scope(&self, selected: Month) -> MonthScope {
        match self.month_source {
            MonthSource::Scheduled => MonthScope::Scheduled,
            MonthSource::Selected => MonthScope::Selected(selected),
        }
    }
}

// Serde default functions
fn default_acting_agent() -> String {
    "张三".to_string()
}

fn default_selected_month() -> Month {
    Month::new(2026, 1).unwrap_or_else(|_| unreachable!("2026-01 is a valid month"))
}

fn default_seed_demo_data() -> bool {
    true
}

fn default_notice_ttl_ms() -> i64 {
    DEFAULT_NOTICE_TTL_MS
}

fn deserialize_ttl_ms<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let ttl_ms = i64::deserialize(deserializer)?;
    if !(1..=MAX_NOTICE_TTL_MS).contains(&ttl_ms) {
        return Err(de::Error::custom(format!(
            "notices.ttl_ms must be between 1 and {MAX_NOTICE_TTL_MS}, got {ttl_ms}"
        )));
    }
    Ok(ttl_ms)
}

impl WorkbenchConfig {
    /// Path of the config file inside a project root.
    pub fn config_path(project_root: impl AsRef<Path>) -> PathBuf {
        project_root.as_ref().join(".mt").join("config.toml")
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, WorkbenchError> {
        let content = fs::read_to_string(path).map_err(|source| WorkbenchError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| WorkbenchError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(WorkbenchError::IoError { .. }) if !path.exists() => Self::default(),
            Err(e) => {
                tracing::warn!("using default config: {}", e);
                Self::default()
            }
        }
    }

    /// Load `.mt/config.toml` from a project root. A relative `events_log`
    /// is resolved against the project root.
    pub fn for_project(project_root: impl AsRef<Path>) -> Self {
        let root = project_root.as_ref();
        let mut config = Self::load_or_default(&Self::config_path(root));
        if let Some(log) = config.events_log.as_mut() {
            if log.is_relative() {
                *log = root.join(&*log);
            }
        }
        config
    }

    /// The supervisor form's default month: the second month option, or
    /// the selected month when fewer options are configured.
    pub fn default_directive_month(&self) -> Month {
        self.month_options
            .get(1)
            .or_else(|| self.month_options.first())
            .copied()
            .unwrap_or(self.selected_month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn empty_file_yields_defaults() {
        let config: WorkbenchConfig = toml::from_str("").unwrap();
        assert_eq!(config.acting_agent, "张三");
        assert_eq!(config.selected_month.to_string(), "2026-01");
        assert_eq!(config.notices.ttl_ms, 3000);
        assert_eq!(config.completion.month_source, MonthSource::Scheduled);
        assert!(config.seed_demo_data);
        assert_eq!(config.roster.len(), 2);
    }

    #[test]
    fn partial_file_overrides_fields() {
        let toml_src = r#"
acting_agent = "李四"
selected_month = "2026-02"
seed_demo_data = false
events_log = "logs/events.jsonl"

[notices]
ttl_ms = 500

[completion]
month_source = "selected"

[[roster]]
name = "第三营业部"
staff = [{ name = "小刚", id = "600301" }]
"#;
        let config: WorkbenchConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(config.acting_agent, "李四");
        assert_eq!(config.selected_month.to_string(), "2026-02");
        assert!(!config.seed_demo_data);
        assert_eq!(config.notices.ttl_ms, 500);
        assert_eq!(config.completion.month_source, MonthSource::Selected);
        assert_eq!(config.roster.len(), 1);
        assert_eq!(config.roster[0].staff[0].id, "600301");
        assert_eq!(config.agents.len(), 3);
    }

    #[test]
    fn invalid_month_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "selected_month = \"2026-13\"\n").unwrap();
        let result = WorkbenchConfig::load(&path);
        assert!(matches!(result, Err(WorkbenchError::InvalidConfig { .. })));
        // load_or_default swallows it.
        assert_eq!(
            WorkbenchConfig::load_or_default(&path).selected_month.to_string(),
            "2026-01"
        );
    }

    #[test]
    fn out_of_range_notice_ttl_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        for ttl in ["0", "-3000", "9223372036854775807", "86400001"] {
            fs::write(&path, format!("[notices]\nttl_ms = {ttl}\n")).unwrap();
            let result = WorkbenchConfig::load(&path);
            assert!(
                matches!(result, Err(WorkbenchError::InvalidConfig { .. })),
                "ttl_ms = {ttl} was accepted"
            );
        }

        fs::write(&path, format!("[notices]\nttl_ms = {MAX_NOTICE_TTL_MS}\n")).unwrap();
        let config = WorkbenchConfig::load(&path).unwrap();
        assert_eq!(config.notices.ttl_ms, MAX_NOTICE_TTL_MS);
    }

    #[test]
    fn for_project_resolves_relative_events_log() {
        let dir = tempdir().unwrap();
        let path = WorkbenchConfig::config_path(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "events_log = \"events.jsonl\"\n").unwrap();

        let config = WorkbenchConfig::for_project(dir.path());
        assert_eq!(config.events_log, Some(dir.path().join("events.jsonl")));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = WorkbenchConfig::for_project(dir.path());
        assert!(config.events_log.is_none());
        assert_eq!(config.default_directive_month().to_string(), "2026-01");
    }

    #[test]
    fn completion_scope_follows_month_source() {
        let jan: Month = "2026-01".parse().unwrap();
        let scheduled = CompletionConfig::default();
        assert_eq!(scheduled.scope(jan), MonthScope::Scheduled);
        let selected = CompletionConfig {
            month_source: MonthSource::Selected,
        };
        assert_eq!(selected.scope(jan), MonthScope::Selected(jan));
    }
}

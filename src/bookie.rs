use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{CtlError, Result};
use crate::http_utils::{AdminClient, Service};

const BASE_PATH: &str = "/api/v1/bookie";

/////////////////////////////////////////////// Types ///////////////////////////////////////////////

/// Which bookies to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookieType {
    /// Read-write bookies.
    #[default]
    ReadWrite,
    /// Read-only bookies.
    ReadOnly,
}

impl BookieType {
    /// The value of the `type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadWrite => "rw",
            Self::ReadOnly => "ro",
        }
    }
}

impl Display for BookieType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookieType {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rw" => Ok(Self::ReadWrite),
            "ro" => Ok(Self::ReadOnly),
            _ => Err(CtlError::InvalidArgument(format!(
                "invalid bookie type '{}', expected one of: rw, ro",
                s
            ))),
        }
    }
}

/// Which kind of on-disk files to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Journal files.
    Journal,
    /// Entry log files.
    EntryLog,
    /// Index files.
    Index,
}

impl FileType {
    /// The value of the `file_type` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Journal => "journal",
            Self::EntryLog => "entrylog",
            Self::Index => "index",
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = CtlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "journal" => Ok(Self::Journal),
            "entrylog" => Ok(Self::EntryLog),
            "index" => Ok(Self::Index),
            _ => Err(CtlError::InvalidArgument(format!(
                "invalid file type '{}', expected one of: journal, entrylog, index",
                s
            ))),
        }
    }
}

/// Garbage collection progress of a single ledger directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcStatus {
    /// A forced compaction is running.
    pub force_compacting: bool,
    /// A major compaction is running.
    pub major_compacting: bool,
    /// A minor compaction is running.
    pub minor_compacting: bool,
    /// Epoch millis of the last major compaction.
    pub last_major_compaction_time: i64,
    /// Epoch millis of the last minor compaction.
    pub last_minor_compaction_time: i64,
    /// Number of major compactions so far.
    pub major_compaction_counter: i64,
    /// Number of minor compactions so far.
    pub minor_compaction_counter: i64,
}

/// Lifecycle state of a bookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookieState {
    /// The bookie is running.
    pub running: bool,
    /// The bookie only serves reads.
    pub read_only: bool,
    /// The bookie is shutting down.
    pub shutting_down: bool,
    /// The bookie still accepts high priority writes.
    pub available_for_high_priority_writes: bool,
}

//////////////////////////////////////////////// Bookie ///////////////////////////////////////////////

/// Bookie operations on the BookKeeper HTTP endpoint.
pub struct Bookie<'a> {
    client: &'a AdminClient,
}

impl<'a> Bookie<'a> {
    pub(crate) fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    /// Lists the bookies of the given type, optionally resolving hostnames.
    pub async fn list(
        &self,
        bookie_type: BookieType,
        show_hostnames: bool,
    ) -> Result<BTreeMap<String, String>> {
        let show = if show_hostnames { "true" } else { "false" };
        let query = [("type", bookie_type.as_str()), ("print_hostnames", show)];
        self.get_string_map("/list_bookies", &query).await
    }

    /// Disk usage of every bookie in the cluster.
    pub async fn info(&self) -> Result<BTreeMap<String, String>> {
        self.get_string_map("/list_bookie_info", &[]).await
    }

    /// The last journal log mark.
    pub async fn last_log_mark(&self) -> Result<BTreeMap<String, String>> {
        self.get_string_map("/last_log_mark", &[]).await
    }

    /// Files on disk; all kinds when `file_type` is `None`.
    pub async fn list_disk_file(
        &self,
        file_type: Option<FileType>,
    ) -> Result<BTreeMap<String, String>> {
        match file_type {
            Some(file_type) => {
                self.get_string_map("/list_disk_file", &[("file_type", file_type.as_str())])
                    .await
            }
            None => self.get_string_map("/list_disk_file", &[]).await,
        }
    }

    /// Picks up newly added ledger and index directories.
    pub async fn expand_storage(&self) -> Result<()> {
        let url = self.url("/expand_storage", &[])?;
        self.client.put_empty(url).await
    }

    /// Triggers a forced garbage collection.
    pub async fn gc(&self) -> Result<()> {
        let url = self.url("/gc", &[])?;
        self.client.put_empty(url).await
    }

    /// Whether a forced garbage collection is in progress.
    pub async fn gc_status(&self) -> Result<BTreeMap<String, String>> {
        self.get_string_map("/gc", &[]).await
    }

    /// Per-directory garbage collection details.
    pub async fn gc_details(&self) -> Result<Vec<GcStatus>> {
        let url = self.url("/gc_details", &[])?;
        self.client.get(url).await
    }

    /// Lifecycle state of the bookie.
    pub async fn state(&self) -> Result<BookieState> {
        let url = self.url("/state", &[])?;
        self.client.get(url).await
    }

    async fn get_string_map(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<BTreeMap<String, String>> {
        let url = self.url(path, query)?;
        let raw: BTreeMap<String, Value> = self.client.get(url).await?;
        Ok(raw
            .into_iter()
            .map(|(key, value)| (key, value_to_string(value)))
            .collect())
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<url::Url> {
        self.client
            .endpoint(Service::Bookie, &format!("{}{}", BASE_PATH, path), query)
    }
}

// Bookies answer `null` for absent values (e.g. hostnames when not requested)
// and some versions report flags as bare booleans.
fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

//! Chart and setlist records, chart document files, and the store boundary.
//!
//! Persistence belongs to the host: the engine only sees a [`ChartStore`]
//! with explicit load/save operations. [`MemoryStore`] keeps everything in
//! memory.
//!
//! A chart document is the chart body with optional YAML frontmatter:
//!
//! ```text
//! ---
//! title: Amazing Grace
//! artist: Traditional
//! key: G
//! tempo: "72"
//! ---
//! [Verse 1]
//! {G}{C}
//! Amazing grace
//! ```

use crate::error::ChartError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New Chart";
pub const DEFAULT_ARTIST: &str = "Unknown";
pub const DEFAULT_TEMPO: &str = "N/A";
/// Body of a freshly created chart
pub const TEMPLATE_BODY: &str = "[Intro]\n...\n[Verse]\n...\n";

/// A song: metadata plus its markup body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chart {
    pub id: u64,
    pub title: String,
    pub artist: String,
    pub key: String,
    pub tempo: String,
    pub body: String,
}

/// Frontmatter fields of a chart document
#[derive(Deserialize, Serialize, Debug, Default)]
struct RawChartMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tempo: Option<String>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

impl Chart {
    /// A new chart with the template body. Blank fields take the defaults.
    pub fn new(id: u64, title: &str, artist: &str, key: &str, tempo: &str) -> Self {
        Chart {
            id,
            title: or_default(Some(title.to_string()), DEFAULT_TITLE),
            artist: or_default(Some(artist.to_string()), DEFAULT_ARTIST),
            key: or_default(Some(key.to_string()), crate::key::DEFAULT_KEY),
            tempo: or_default(Some(tempo.to_string()), DEFAULT_TEMPO),
            body: TEMPLATE_BODY.to_string(),
        }
    }

    /// Parse a chart document: optional `---` frontmatter, then the body.
    pub fn from_document(id: u64, source: &str) -> Result<Self, ChartError> {
        let (frontmatter, body) = extract_frontmatter(source);
        let meta: RawChartMetadata = match frontmatter {
            Some(content) if !content.trim().is_empty() => serde_yaml::from_str(&content)
                .map_err(|e| ChartError::Config(e.to_string()))?,
            _ => RawChartMetadata::default(),
        };
        Ok(Chart {
            id,
            title: or_default(meta.title, DEFAULT_TITLE),
            artist: or_default(meta.artist, DEFAULT_ARTIST),
            key: or_default(meta.key, crate::key::DEFAULT_KEY),
            tempo: or_default(meta.tempo, DEFAULT_TEMPO),
            body,
        })
    }

    /// Write the chart as a document with frontmatter.
    pub fn to_document(&self) -> Result<String, ChartError> {
        let meta = RawChartMetadata {
            title: Some(self.title.clone()),
            artist: Some(self.artist.clone()),
            key: Some(self.key.clone()),
            tempo: Some(self.tempo.clone()),
        };
        let yaml = serde_yaml::to_string(&meta).map_err(|e| ChartError::Config(e.to_string()))?;
        Ok(format!("---\n{}---\n{}", yaml, self.body))
    }
}

/// Split off a leading `---` delimited block
fn extract_frontmatter(source: &str) -> (Option<String>, String) {
    let mut offset = 0;
    let mut content_start: Option<usize> = None;

    for line in source.split_inclusive('\n') {
        let next = offset + line.len();
        let trimmed = line.trim();
        match content_start {
            None if trimmed.is_empty() => {}
            None if trimmed == "---" => content_start = Some(next),
            None => break,
            Some(start) if trimmed == "---" => {
                return (Some(source[start..offset].to_string()), source[next..].to_string());
            }
            Some(_) => {}
        }
        offset = next;
    }
    (None, source.to_string())
}

/// An ordered list of charts for a performance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setlist {
    pub id: u64,
    pub name: String,
    pub date: String,
    pub chart_ids: Vec<u64>,
}

impl Setlist {
    /// The setlist's charts in order, skipping ids with no chart.
    pub fn resolve<'a>(&self, charts: &'a [Chart]) -> Vec<&'a Chart> {
        self.chart_ids
            .iter()
            .filter_map(|id| charts.iter().find(|c| c.id == *id))
            .collect()
    }
}

/// Form state for creating or editing a setlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetlistBuilder {
    pub name: String,
    pub date: String,
    selected: Vec<u64>,
    editing: Option<u64>,
}

impl SetlistBuilder {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            ..Self::default()
        }
    }

    /// Load an existing setlist for editing; building keeps its id.
    pub fn edit(setlist: &Setlist) -> Self {
        Self {
            name: setlist.name.clone(),
            date: setlist.date.clone(),
            selected: setlist.chart_ids.clone(),
            editing: Some(setlist.id),
        }
    }

    pub fn selected(&self) -> &[u64] {
        &self.selected
    }

    /// Select a chart (appended last) or deselect it if already selected.
    pub fn toggle(&mut self, chart_id: u64) {
        match self.selected.iter().position(|&id| id == chart_id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(chart_id),
        }
    }

    /// Swap the selected chart at `index` with its neighbour `delta` away. Out of range is a no-op.
    pub fn move_selected(&mut self, index: usize, delta: isize) {
        let Some(target) = index.checked_add_signed(delta) else {
            return;
        };
        if index < self.selected.len() && target < self.selected.len() {
            self.selected.swap(index, target);
        }
    }

    /// Validate and produce the setlist. `new_id` is used unless an existing setlist is being edited.
    pub fn build(&self, new_id: u64) -> Result<Setlist, ChartError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ChartError::Validation("enter a name for the setlist".to_string()));
        }
        if self.selected.is_empty() {
            return Err(ChartError::Validation("select at least one song".to_string()));
        }
        Ok(Setlist {
            id: self.editing.unwrap_or(new_id),
            name: name.to_string(),
            date: self.date.clone(),
            chart_ids: self.selected.clone(),
        })
    }
}

/// Insert a setlist at the front, or replace the one with the same id in place.
pub fn upsert_setlist(setlists: &mut Vec<Setlist>, setlist: Setlist) {
    match setlists.iter_mut().find(|s| s.id == setlist.id) {
        Some(existing) => *existing = setlist,
        None => setlists.insert(0, setlist),
    }
}

/// Host-provided persistence for charts and setlists
pub trait ChartStore {
    fn load_charts(&self) -> Result<Vec<Chart>, ChartError>;
    fn save_charts(&mut self, charts: &[Chart]) -> Result<(), ChartError>;
    fn load_setlists(&self) -> Result<Vec<Setlist>, ChartError>;
    fn save_setlists(&mut self, setlists: &[Setlist]) -> Result<(), ChartError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    charts: Vec<Chart>,
    setlists: Vec<Setlist>,
}

impl ChartStore for MemoryStore {
    fn load_charts(&self) -> Result<Vec<Chart>, ChartError> {
        Ok(self.charts.clone())
    }

    fn save_charts(&mut self, charts: &[Chart]) -> Result<(), ChartError> {
        self.charts = charts.to_vec();
        Ok(())
    }

    fn load_setlists(&self) -> Result<Vec<Setlist>, ChartError> {
        Ok(self.setlists.clone())
    }

    fn save_setlists(&mut self, setlists: &[Setlist]) -> Result<(), ChartError> {
        self.setlists = setlists.to_vec();
        Ok(())
    }
}

/// Validate a builder and persist the setlist through the store. Nothing is saved on failure.
pub fn save_setlist<S: ChartStore>(
    store: &mut S,
    builder: &SetlistBuilder,
    new_id: u64,
) -> Result<Setlist, ChartError> {
    let setlist = builder.build(new_id)?;
    let mut setlists = store.load_setlists()?;
    upsert_setlist(&mut setlists, setlist.clone());
    store.save_setlists(&setlists)?;
    Ok(setlist)
}

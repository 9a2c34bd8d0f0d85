use serde::{Deserialize, Serialize};

/// Top-level input document, as produced by the upstream graph constructor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub graph: GraphSection,
}

/// The node and edge lists of the input document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSection {
    #[serde(default)]
    pub nodes: Vec<NodeEntry>,
    #[serde(default)]
    pub edges: Vec<EdgeEntry>,
}

/// Wrapper matching the `{"data": {...}}` envelope of the input format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEntry {
    pub data: NodeRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub data: EdgeRecord,
}

/// A track in the music graph
///
/// Every field except `id` is optional in the input; missing fields are
/// filled with the documented defaults at parse time rather than at every
/// read site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub artist: String,

    #[serde(default)]
    pub album: String,

    #[serde(default)]
    pub popularity: f64,

    #[serde(rename = "releaseYear", default = "default_release_year")]
    pub release_year: i32,

    #[serde(default = "default_size")]
    pub size: f64,

    #[serde(default = "default_color")]
    pub color: String,
}

impl NodeRecord {
    /// A record carrying only an id, with every other field defaulted
    pub fn with_defaults(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            artist: String::new(),
            album: String::new(),
            popularity: 0.0,
            release_year: default_release_year(),
            size: default_size(),
            color: default_color(),
        }
    }
}

/// A similarity edge between two tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,

    #[serde(default = "default_weight")]
    pub weight: f64,

    #[serde(default = "default_weight")]
    pub thickness: f64,
}

fn default_release_year() -> i32 {
    2000
}

fn default_size() -> f64 {
    20.0
}

fn default_color() -> String {
    "#1DB954".to_string()
}

fn default_weight() -> f64 {
    1.0
}

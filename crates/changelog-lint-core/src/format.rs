//! Declared serialization formats of changelog files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Serialization format of a changelog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// XML changelog (`.xml`).
    Xml,
    /// YAML changelog (`.yaml`, `.yml`).
    Yaml,
    /// JSON changelog (`.json`).
    Json,
}

impl Format {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Xml, Self::Yaml, Self::Json];

    /// Resolves the declared format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }

    /// File extensions that declare this format.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Xml => &["xml"],
            Self::Yaml => &["yaml", "yml"],
            Self::Json => &["json"],
        }
    }

    /// The noun used for a node of this format in messages.
    #[must_use]
    pub fn noun(self) -> &'static str {
        match self {
            Self::Xml => "Tag",
            Self::Yaml => "Key",
            Self::Json => "Object",
        }
    }

    /// Renders a node name the way messages for this format quote it.
    ///
    /// `Tag <createIndex>`, `Key [createIndex]`, `Object [createIndex]`.
    #[must_use]
    pub fn quote_node(self, name: &str) -> String {
        match self {
            Self::Xml => format!("{} <{name}>", self.noun()),
            Self::Yaml | Self::Json => format!("{} [{name}]", self.noun()),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml => write!(f, "xml"),
            Self::Yaml => write!(f, "yaml"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Error returned when a declared format is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported changelog format `{0}`, expected: xml, yaml, yml, json")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declared_formats() {
        assert_eq!("xml".parse(), Ok(Format::Xml));
        assert_eq!("yml".parse(), Ok(Format::Yaml));
        assert_eq!("YAML".parse(), Ok(Format::Yaml));
        assert_eq!("json".parse(), Ok(Format::Json));
        assert!("sql".parse::<Format>().is_err());
    }

    #[test]
    fn resolves_from_extension() {
        assert_eq!(
            Format::from_path(Path::new("db/changelog.yml")),
            Some(Format::Yaml)
        );
        assert_eq!(Format::from_path(Path::new("db/changelog")), None);
    }

    #[test]
    fn quotes_nodes_per_format() {
        assert_eq!(Format::Xml.quote_node("createIndex"), "Tag <createIndex>");
        assert_eq!(Format::Yaml.quote_node("createIndex"), "Key [createIndex]");
        assert_eq!(
            Format::Json.quote_node("createIndex"),
            "Object [createIndex]"
        );
    }
}

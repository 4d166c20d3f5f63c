use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Region flavour text for a resolved location label
pub trait FlavourLookup: Send + Sync {
    /// `label` is a center label such as `"Suburb Newcastle"` or `"Postcode 2300"`
    fn flavour(&self, label: &str, region: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum FlavourError {
    #[error("Failed to read flavour file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid flavour file: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordQuips {
    pub terms: Vec<String>,
    pub quips: Vec<String>,
}

/// Quip dictionary loaded from TOML
///
/// ```toml
/// [named]
/// newcastle = ["Coal country turned culture hub."]
///
/// [[keywords]]
/// terms = ["beach", "bay"]
/// quips = ["Sand in every school bag."]
///
/// [defaults]
/// nsw = ["The Premier State."]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlavourTable {
    #[serde(default)]
    pub named: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub keywords: Vec<KeywordQuips>,
    #[serde(default)]
    pub defaults: BTreeMap<String, Vec<String>>,
}

const FALLBACK_REGION: &str = "nsw";

impl FlavourTable {
    pub fn from_toml(source: &str) -> Result<Self, FlavourError> {
        let mut table: FlavourTable = toml::from_str(source)?;
        table.named = table
            .named
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        table.defaults = table
            .defaults
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Ok(table)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, FlavourError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    fn quips_for(&self, suburb: &str) -> Option<&[String]> {
        if let Some(quips) = self.named.get(suburb) {
            return Some(quips.as_slice());
        }

        // Named place inside a longer suburb name ("south darwin" -> darwin)
        if let Some((_, quips)) = self
            .named
            .iter()
            .filter(|(key, _)| suburb.contains(key.as_str()))
            .max_by_key(|(key, _)| key.len())
        {
            return Some(quips.as_slice());
        }

        let words: Vec<&str> = suburb
            .split(|c: char| c.is_whitespace() || c == '-')
            .filter(|w| !w.is_empty())
            .collect();

        self.keywords
            .iter()
            .find(|k| words.iter().any(|w| k.terms.iter().any(|t| t.eq_ignore_ascii_case(w))))
            .map(|k| k.quips.as_slice())
    }
}

impl FlavourLookup for FlavourTable {
    fn flavour(&self, label: &str, region: &str) -> Option<String> {
        let suburb = label
            .strip_prefix("Suburb ")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();

        let named = if suburb.is_empty() { None } else { self.quips_for(&suburb) };
        let quips = named
            .filter(|q| !q.is_empty())
            .or_else(|| self.defaults.get(&region.to_lowercase()).map(Vec::as_slice))
            .or_else(|| self.defaults.get(FALLBACK_REGION).map(Vec::as_slice))?;

        pick(quips, label)
    }
}

/// Stable choice among quips so the same label always reads the same
fn pick(quips: &[String], label: &str) -> Option<String> {
    if quips.is_empty() {
        return None;
    }
    // FNV-1a
    let hash = label
        .bytes()
        .fold(0xcbf2_9ce4_8422_2325_u64, |h, b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3));
    quips.get((hash % quips.len() as u64) as usize).cloned()
}

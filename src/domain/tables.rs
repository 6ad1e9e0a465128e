//! Lookup tables used by aggregation and chart building.
//!
//! Both tables are plain values handed to the aggregator and chart builder so
//! alternative tables can be swapped in from configuration or tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Compound destination label → its two constituent labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitTable {
    entries: HashMap<String, [String; 2]>,
}

impl SplitTable {
    pub fn new(entries: HashMap<String, [String; 2]>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn parts(&self, destination: &str) -> Option<&[String; 2]> {
        self.entries.get(destination)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &[String; 2])> {
        self.entries.iter()
    }
}

impl Default for SplitTable {
    fn default() -> Self {
        let entries = [
            ("Serbia and Montenegro", ["Serbia", "Montenegro"]),
            (
                "Serbia and Montenegro (internal)",
                ["Serbia (internal)", "Montenegro (internal)"],
            ),
        ]
        .into_iter()
        .map(|(compound, [a, b])| (compound.to_string(), [a.to_string(), b.to_string()]))
        .collect();

        Self { entries }
    }
}

/// Used when the fallback palette is empty.
pub const NEUTRAL_COLOR: &str = "#7F7F7F";

const DEFAULT_COLORS: [(&str, &str); 10] = [
    ("Kosovo (internal)", "#636EFA"),
    ("Albania", "#EF553B"),
    ("North Macedonia", "#00CC96"),
    ("Serbia and Montenegro (internal)", "#AB63FA"),
    ("Serbia", "#FFA15A"),
    ("Montenegro", "#19D3F3"),
    ("Bosnia and Herzegovina", "#FF6692"),
    ("Croatia", "#FF97FF"),
    ("Germany", "#FECB52"),
    ("Other former Yugoslav republics", "#B6E880"),
];

const DEFAULT_FALLBACK_PALETTE: [&str; 10] = [
    "#1F77B4", "#FF7F0E", "#2CA02C", "#D62728", "#9467BD", "#8C564B", "#E377C2", "#7F7F7F",
    "#BCBD22", "#17BECF",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTable {
    colors: HashMap<String, String>,
    fallback_palette: Vec<String>,
}

impl ColorTable {
    pub fn new(colors: HashMap<String, String>, fallback_palette: Vec<String>) -> Self {
        Self {
            colors,
            fallback_palette,
        }
    }

    pub fn default_fallback_palette() -> Vec<String> {
        DEFAULT_FALLBACK_PALETTE.iter().map(|c| c.to_string()).collect()
    }

    /// Known color for `label`, or a palette entry picked by hashing the label.
    pub fn color_for(&self, label: &str) -> &str {
        if let Some(color) = self.colors.get(label) {
            return color;
        }

        if self.fallback_palette.is_empty() {
            return NEUTRAL_COLOR;
        }

        let index = (fnv1a(label.as_bytes()) % self.fallback_palette.len() as u64) as usize;
        &self.fallback_palette[index]
    }

    pub fn is_known(&self, label: &str) -> bool {
        self.colors.contains_key(label)
    }

    pub fn colors(&self) -> &HashMap<String, String> {
        &self.colors
    }

    pub fn fallback_palette(&self) -> &[String] {
        &self.fallback_palette
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .map(|(label, color)| (label.to_string(), color.to_string()))
                .collect(),
            fallback_palette: Self::default_fallback_palette(),
        }
    }
}

// 64-bit FNV-1a; stable across runs and platforms, unlike std's RandomState.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

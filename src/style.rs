use std::collections::BTreeMap;

use crate::model::AssetKind;

/// A flat property map, camelCase keys to raw CSS values. BTreeMap keeps
/// iteration (and serialization) order stable for a given input.
pub type StyleMap = BTreeMap<String, String>;

/// Which glass container a text asset renders in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerGroup {
    Top,
    Bottom,
}

impl ContainerGroup {
    /// The 0-based index of this group in [`StyleSheet::text_containers`].
    pub fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
        }
    }
}

/// The derived rule for one asset, keyed by the asset's stable id.
///
/// Positional selectors (`.asset-text-N`) are a serialization view computed
/// from the rule's current position; they are never stored.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AssetRule {
    pub asset_id: String,
    pub kind: AssetKind,
    /// Container membership for text assets; logos sit outside the grouped
    /// containers and position themselves.
    pub group: Option<ContainerGroup>,
    pub styles: StyleMap,
}

/// The engine's output artifact: structured styles for the poster frame,
/// the background layer, the two glass text containers and every asset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StyleSheet {
    pub container: StyleMap,
    pub background: StyleMap,
    /// Top group first, bottom group second.
    pub text_containers: Vec<StyleMap>,
    /// One rule per text/logo asset, in asset order.
    pub assets: Vec<AssetRule>,
}

impl StyleSheet {
    /// The positional selector for the asset rule at `idx` (0-based), e.g.
    /// `.asset-text-1`. This is the only place position enters a name.
    pub fn asset_selector(&self, idx: usize) -> Option<String> {
        let rule = self.assets.get(idx)?;
        let tag = match rule.kind {
            AssetKind::Logo => "logo",
            _ => "text",
        };
        Some(format!(".asset-{tag}-{}", idx + 1))
    }

    /// Looks up the asset rule a positional selector index refers to right
    /// now. Out-of-range indices yield None.
    pub fn asset_rule_mut(&mut self, one_based: usize) -> Option<&mut AssetRule> {
        one_based
            .checked_sub(1)
            .and_then(|i| self.assets.get_mut(i))
    }

    /// Projects the sheet to CSS source text, the form handed to the
    /// language-model collaborator and shown in the preview pane.
    pub fn to_css(&self) -> String {
        let mut blocks = Vec::new();
        blocks.push(render_block(".poster-container", &self.container));
        if !self.background.is_empty() {
            blocks.push(render_block(".poster-background", &self.background));
        }
        for (idx, styles) in self.text_containers.iter().enumerate() {
            blocks.push(render_block(&format!(".text-container-{}", idx + 1), styles));
        }
        for idx in 0..self.assets.len() {
            if let Some(selector) = self.asset_selector(idx) {
                blocks.push(render_block(&selector, &self.assets[idx].styles));
            }
        }
        blocks.join("\n\n")
    }
}

fn render_block(selector: &str, styles: &StyleMap) -> String {
    let mut out = format!("{selector} {{\n");
    for (key, value) in styles {
        out.push_str(&format!("  {}: {};\n", camel_to_kebab(key), value));
    }
    out.push('}');
    out
}

/// `backdropFilter` -> `backdrop-filter`. Keys are stored camelCase; CSS
/// text wants kebab-case.
pub(crate) fn camel_to_kebab(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

use crate::error::{PosterError, PosterResult};

/// Upper bound for logo dimensions at creation time. Larger uploads are
/// scaled down preserving their intrinsic aspect ratio.
const LOGO_MAX_W: f64 = 200.0;
const LOGO_MAX_H: f64 = 200.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Text,
    Logo,
    Shape,
}

/// What a text element says about the event, set at creation time.
///
/// Title and Subtitle render in the top glass container; everything else
/// renders in the bottom one. Font tiers are keyed by role, so reordering
/// assets never changes how one is styled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetRole {
    Title,
    Subtitle,
    Location,
    Description,
    Freeform,
}

impl AssetRole {
    /// Whether this role belongs to the top (title) glass container.
    pub fn in_title_group(self) -> bool {
        matches!(self, Self::Title | Self::Subtitle)
    }
}

/// One positionable element on the poster.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Asset {
    pub id: String,
    pub kind: AssetKind,
    pub role: AssetRole,
    /// Text content, or the display name of an uploaded logo.
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    /// Text color; falls back to white in derived styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Image reference for logo assets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Asset {
    /// A text element with the editor's default placement.
    pub fn text(id: impl Into<String>, role: AssetRole, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: AssetKind::Text,
            role,
            content: content.into(),
            x: 50.0,
            y: 50.0,
            width: 200.0,
            height: 50.0,
            rotation: 0.0,
            color: None,
            url: None,
        }
    }

    /// A logo element. The intrinsic dimensions are clamped to a 200x200
    /// box preserving their ratio, matching upload behavior.
    pub fn logo(
        id: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        intrinsic_w: f64,
        intrinsic_h: f64,
    ) -> Self {
        let (mut width, mut height) = (intrinsic_w.max(1.0), intrinsic_h.max(1.0));
        if width > LOGO_MAX_W {
            height = (LOGO_MAX_W / width) * height;
            width = LOGO_MAX_W;
        }
        if height > LOGO_MAX_H {
            width = (LOGO_MAX_H / height) * width;
            height = LOGO_MAX_H;
        }
        Self {
            id: id.into(),
            kind: AssetKind::Logo,
            role: AssetRole::Freeform,
            content: name.into(),
            x: 50.0,
            y: 50.0,
            width,
            height,
            rotation: 0.0,
            color: None,
            url: Some(url.into()),
        }
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_text(&self) -> bool {
        self.kind == AssetKind::Text
    }

    pub fn validate(&self) -> PosterResult<()> {
        if self.id.trim().is_empty() {
            return Err(PosterError::validation("asset id must be non-empty"));
        }
        for (name, v) in [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ] {
            if !v.is_finite() {
                return Err(PosterError::validation(format!(
                    "asset '{}' has non-finite {name}",
                    self.id
                )));
            }
        }
        if self.kind == AssetKind::Logo && self.url.is_none() {
            return Err(PosterError::validation(format!(
                "logo asset '{}' has no image url",
                self.id
            )));
        }
        Ok(())
    }
}

/// A candidate background image. Immutable once selected.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BackgroundOption {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl BackgroundOption {
    /// The built-in catalogue shown before the image collaborator has
    /// produced any candidates.
    pub fn sample_catalogue() -> Vec<Self> {
        const ENTRIES: [(&str, &str, &str); 6] = [
            (
                "bg1",
                "Blue Starry Night",
                "https://images.unsplash.com/photo-1470813740244-df37b8c1edcb",
            ),
            (
                "bg2",
                "Yellow Forest",
                "https://images.unsplash.com/photo-1500673922987-e212871fec22",
            ),
            (
                "bg3",
                "Lake Reflection",
                "https://images.unsplash.com/photo-1506744038136-46273834b3fb",
            ),
            (
                "bg4",
                "Modern Architecture",
                "https://images.unsplash.com/photo-1493397212122-2b85dda8106b",
            ),
            (
                "bg5",
                "Colorful Code",
                "https://images.unsplash.com/photo-1487058792275-0ad4aaf24ca7",
            ),
            (
                "bg6",
                "Matrix Digital Rain",
                "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5",
            ),
        ];
        ENTRIES
            .iter()
            .map(|&(id, name, url)| Self {
                id: id.to_string(),
                name: name.to_string(),
                url: url.to_string(),
                thumbnail: Some(format!("{url}?w=200&h=150&fit=crop")),
            })
            .collect()
    }
}

/// Event facts entered in the creation form.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EventDetails {
    pub title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

/// The poster's element graph: an ordered asset list plus the chosen
/// background. This is the serializable state handed to a viewing surface.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PosterData {
    pub assets: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<BackgroundOption>,
}

impl PosterData {
    /// Seeds the role-tagged text assets for an event. Empty fields are
    /// skipped so a bare title still yields a valid poster.
    pub fn from_event(details: &EventDetails) -> Self {
        let mut assets = Vec::new();
        if !details.title.trim().is_empty() {
            assets.push(Asset::text("title", AssetRole::Title, details.title.trim()));
        }
        let when = match (details.date.trim(), details.time.trim()) {
            ("", "") => String::new(),
            (d, "") => d.to_string(),
            ("", t) => t.to_string(),
            (d, t) => format!("{d}, {t}"),
        };
        if !when.is_empty() {
            assets.push(Asset::text("subtitle", AssetRole::Subtitle, when));
        }
        if !details.location.trim().is_empty() {
            assets.push(Asset::text(
                "location",
                AssetRole::Location,
                details.location.trim(),
            ));
        }
        if !details.description.trim().is_empty() {
            assets.push(Asset::text(
                "description",
                AssetRole::Description,
                details.description.trim(),
            ));
        }
        Self {
            assets,
            background: None,
        }
    }

    pub fn add_asset(&mut self, asset: Asset) -> PosterResult<()> {
        asset.validate()?;
        if self.assets.iter().any(|a| a.id == asset.id) {
            return Err(PosterError::validation(format!(
                "duplicate asset id '{}'",
                asset.id
            )));
        }
        self.assets.push(asset);
        Ok(())
    }

    /// Applies `update` to the asset with the given id. Returns false when
    /// no such asset exists.
    pub fn update_asset(&mut self, id: &str, update: impl FnOnce(&mut Asset)) -> bool {
        match self.assets.iter_mut().find(|a| a.id == id) {
            Some(asset) => {
                update(asset);
                true
            }
            None => false,
        }
    }

    pub fn remove_asset(&mut self, id: &str) -> bool {
        let before = self.assets.len();
        self.assets.retain(|a| a.id != id);
        self.assets.len() != before
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn validate(&self) -> PosterResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for asset in &self.assets {
            asset.validate()?;
            if !seen.insert(asset.id.as_str()) {
                return Err(PosterError::validation(format!(
                    "duplicate asset id '{}'",
                    asset.id
                )));
            }
        }
        Ok(())
    }
}

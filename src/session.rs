use crate::{
    derive::{self, FontTierTable},
    error::{PosterError, PosterResult},
    geometry::{self, AspectRatio, GeometryParams},
    model::{Asset, BackgroundOption, EventDetails, PosterData},
    patch::{self, StylePatch},
    style::StyleSheet,
};

/// The JSON shape a poster session travels as between surfaces: the element
/// graph plus the chosen aspect ratio.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub poster: PosterData,
    pub aspect_ratio: String,
}

/// Owns one poster's mutable state: the element graph, the chosen aspect
/// ratio, the current derived/patched sheet and the undo history.
///
/// The derivation and patch engines stay pure functions; this container is
/// the only place state changes. Any model, background or geometry mutation
/// rederives the sheet from scratch and clears the history, since prior
/// patches target a snapshot that no longer exists.
#[derive(Clone, Debug)]
pub struct PosterSession {
    data: PosterData,
    aspect_ratio: AspectRatio,
    tiers: FontTierTable,
    sheet: StyleSheet,
    history: Vec<StyleSheet>,
}

impl PosterSession {
    pub fn new(data: PosterData, aspect_ratio: AspectRatio) -> PosterResult<Self> {
        data.validate()?;
        let tiers = FontTierTable::default();
        let sheet = derive_sheet(&data, aspect_ratio, &tiers);
        Ok(Self {
            data,
            aspect_ratio,
            tiers,
            sheet,
            history: Vec::new(),
        })
    }

    /// A session seeded from the event form, before a background is chosen.
    pub fn from_event(details: &EventDetails, aspect_ratio: AspectRatio) -> Self {
        let data = PosterData::from_event(details);
        let tiers = FontTierTable::default();
        let sheet = derive_sheet(&data, aspect_ratio, &tiers);
        Self {
            data,
            aspect_ratio,
            tiers,
            sheet,
            history: Vec::new(),
        }
    }

    /// Restores a session from a serialized [`SessionState`], deriving a
    /// fresh sheet with no additional context.
    pub fn rehydrate(json: &str) -> PosterResult<Self> {
        let state: SessionState = serde_json::from_str(json)
            .map_err(|e| PosterError::serde(format!("bad session state: {e}")))?;
        Self::new(state.poster, AspectRatio::parse(&state.aspect_ratio))
    }

    /// The session state as JSON, suitable for URL-encoding.
    pub fn serialized_state(&self) -> PosterResult<String> {
        let state = SessionState {
            poster: self.data.clone(),
            aspect_ratio: self.aspect_ratio.to_string(),
        };
        serde_json::to_string(&state).map_err(|e| PosterError::serde(e.to_string()))
    }

    pub fn data(&self) -> &PosterData {
        &self.data
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn geometry(&self) -> GeometryParams {
        geometry::resolve(self.aspect_ratio)
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// How many patch applications deep the session currently is.
    pub fn patch_depth(&self) -> usize {
        self.history.len()
    }

    /// The current sheet as CSS source text, the `originalCSS` handed to
    /// the style advisor.
    pub fn css(&self) -> String {
        self.sheet.to_css()
    }

    pub fn select_background(&mut self, background: BackgroundOption) {
        self.data.background = Some(background);
        self.rederive();
    }

    pub fn clear_background(&mut self) {
        self.data.background = None;
        self.rederive();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        self.aspect_ratio = aspect_ratio;
        self.rederive();
    }

    /// Replaces the font tier table and rederives.
    pub fn set_font_tiers(&mut self, tiers: FontTierTable) {
        self.tiers = tiers;
        self.rederive();
    }

    pub fn add_asset(&mut self, asset: Asset) -> PosterResult<()> {
        self.data.add_asset(asset)?;
        self.rederive();
        Ok(())
    }

    pub fn update_asset(&mut self, id: &str, update: impl FnOnce(&mut Asset)) -> bool {
        let updated = self.data.update_asset(id, update);
        if updated {
            self.rederive();
        }
        updated
    }

    pub fn remove_asset(&mut self, id: &str) -> bool {
        let removed = self.data.remove_asset(id);
        if removed {
            self.rederive();
        }
        removed
    }

    /// Applies a patch set atomically: the pre-patch sheet is pushed onto
    /// the undo history, then the patched copy becomes current. A patch set
    /// that changes nothing (empty, all declarations malformed, or every
    /// selector unroutable) pushes no history, so undo never becomes a
    /// visual no-op.
    pub fn apply_patch(&mut self, patches: &[StylePatch]) {
        if patches.is_empty() {
            return;
        }
        let next = patch::apply_patch(&self.sheet, patches);
        if next == self.sheet {
            tracing::debug!("patch set changed nothing, keeping history as-is");
            return;
        }
        self.history.push(std::mem::replace(&mut self.sheet, next));
        tracing::debug!(depth = self.history.len(), "applied patch set");
    }

    /// Restores the most recent pre-patch sheet.
    pub fn undo(&mut self) -> PosterResult<()> {
        match self.history.pop() {
            Some(previous) => {
                self.sheet = previous;
                Ok(())
            }
            None => Err(PosterError::HistoryEmpty),
        }
    }

    fn rederive(&mut self) {
        let geometry = geometry::resolve(self.aspect_ratio);
        self.sheet = derive::derive_with_tiers(
            &self.data.assets,
            self.data.background.as_ref(),
            &geometry,
            &self.tiers,
        );
        if !self.history.is_empty() {
            tracing::debug!(
                dropped = self.history.len(),
                "inputs changed, clearing patch history"
            );
            self.history.clear();
        }
    }
}

fn derive_sheet(data: &PosterData, aspect_ratio: AspectRatio, tiers: &FontTierTable) -> StyleSheet {
    derive::derive_with_tiers(
        &data.assets,
        data.background.as_ref(),
        &geometry::resolve(aspect_ratio),
        tiers,
    )
}

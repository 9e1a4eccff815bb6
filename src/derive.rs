use crate::{
    geometry::GeometryParams,
    model::{Asset, AssetKind, AssetRole, BackgroundOption},
    style::{AssetRule, ContainerGroup, StyleMap, StyleSheet},
};

/// One font tier: a viewport-relative size capped by an absolute size,
/// plus weight and optional line-height.
#[derive(Clone, Debug, PartialEq)]
pub struct FontTier {
    pub vw: f64,
    pub rem_cap: f64,
    pub weight: u32,
    pub line_height: Option<f64>,
}

/// Font tiers keyed by asset role. The defaults reproduce the classic
/// four-tier poster scale: big bold title down to relaxed body text.
#[derive(Clone, Debug, PartialEq)]
pub struct FontTierTable {
    pub title: FontTier,
    pub subtitle: FontTier,
    pub location: FontTier,
    pub body: FontTier,
}

impl FontTierTable {
    pub fn tier_for(&self, role: AssetRole) -> &FontTier {
        match role {
            AssetRole::Title => &self.title,
            AssetRole::Subtitle => &self.subtitle,
            AssetRole::Location => &self.location,
            AssetRole::Description | AssetRole::Freeform => &self.body,
        }
    }
}

impl Default for FontTierTable {
    fn default() -> Self {
        Self {
            title: FontTier {
                vw: 5.0,
                rem_cap: 3.0,
                weight: 700,
                line_height: None,
            },
            subtitle: FontTier {
                vw: 3.0,
                rem_cap: 1.5,
                weight: 500,
                line_height: None,
            },
            location: FontTier {
                vw: 2.5,
                rem_cap: 1.25,
                weight: 600,
                line_height: None,
            },
            body: FontTier {
                vw: 2.0,
                rem_cap: 1.0,
                weight: 400,
                line_height: Some(1.6),
            },
        }
    }
}

/// Derives the full style-sheet for a poster with the default font tiers.
///
/// Pure: same inputs always produce a field-for-field identical sheet.
#[tracing::instrument(skip(assets, background))]
pub fn derive(
    assets: &[Asset],
    background: Option<&BackgroundOption>,
    geometry: &GeometryParams,
) -> StyleSheet {
    derive_with_tiers(assets, background, geometry, &FontTierTable::default())
}

/// [`derive`] with a caller-supplied font tier table.
pub fn derive_with_tiers(
    assets: &[Asset],
    background: Option<&BackgroundOption>,
    geometry: &GeometryParams,
    tiers: &FontTierTable,
) -> StyleSheet {
    let mut sheet = StyleSheet {
        container: container_styles(geometry),
        background: background.map(background_styles).unwrap_or_default(),
        text_containers: vec![
            glass_container(geometry, true),
            glass_container(geometry, false),
        ],
        assets: Vec::new(),
    };

    for asset in assets {
        let (group, styles) = match asset.kind {
            AssetKind::Text => (
                Some(if asset.role.in_title_group() {
                    ContainerGroup::Top
                } else {
                    ContainerGroup::Bottom
                }),
                text_styles(asset, geometry, tiers.tier_for(asset.role)),
            ),
            AssetKind::Logo => (None, logo_styles(asset)),
            // Shapes paint themselves from their own geometry; no rule.
            AssetKind::Shape => continue,
        };
        sheet.assets.push(AssetRule {
            asset_id: asset.id.clone(),
            kind: asset.kind,
            group,
            styles,
        });
    }

    tracing::debug!(
        assets = sheet.assets.len(),
        has_background = !sheet.background.is_empty(),
        "derived style sheet"
    );
    sheet
}

fn container_styles(geometry: &GeometryParams) -> StyleMap {
    StyleMap::from([
        ("position".into(), "relative".into()),
        ("aspectRatio".into(), geometry.ratio.css_value()),
        ("width".into(), "100%".into()),
        ("maxWidth".into(), "1200px".into()),
        ("overflow".into(), "hidden".into()),
        ("borderRadius".into(), "0.5rem".into()),
    ])
}

fn background_styles(background: &BackgroundOption) -> StyleMap {
    StyleMap::from([
        ("position".into(), "absolute".into()),
        ("inset".into(), "0".into()),
        ("width".into(), "100%".into()),
        ("height".into(), "100%".into()),
        ("objectFit".into(), "cover".into()),
        (
            "backgroundImage".into(),
            format!("url('{}')", background.url),
        ),
        ("backgroundSize".into(), "cover".into()),
        ("backgroundPosition".into(), "center".into()),
    ])
}

/// The glass-panel treatment shared by both text containers; only the
/// vertical anchor differs.
fn glass_container(geometry: &GeometryParams, top: bool) -> StyleMap {
    let mut styles = StyleMap::from([
        ("position".into(), "absolute".into()),
        ("left".into(), "0".into()),
        ("right".into(), "0".into()),
        (
            "padding".into(),
            format!("{}%", fmt_num(geometry.padding_fraction * 100.0)),
        ),
        ("background".into(), "rgba(0, 0, 0, 0.3)".into()),
        ("backdropFilter".into(), "blur(8px)".into()),
        (
            "border".into(),
            "1px solid rgba(255, 255, 255, 0.1)".into(),
        ),
    ]);
    styles.insert(
        if top { "top" } else { "bottom" }.into(),
        "0".into(),
    );
    styles
}

fn text_styles(asset: &Asset, geometry: &GeometryParams, tier: &FontTier) -> StyleMap {
    let mut styles = StyleMap::from([
        ("position".into(), "absolute".into()),
        ("transform".into(), transform_value(asset)),
        (
            "color".into(),
            asset.color.clone().unwrap_or_else(|| "#ffffff".into()),
        ),
        (
            "fontSize".into(),
            format!(
                "min({}vw, {}rem)",
                fmt_num(tier.vw * geometry.font_scale),
                fmt_num(tier.rem_cap * geometry.font_scale)
            ),
        ),
        ("fontWeight".into(), tier.weight.to_string()),
        ("whiteSpace".into(), "pre-wrap".into()),
        ("wordBreak".into(), "break-word".into()),
    ]);
    if let Some(lh) = tier.line_height {
        styles.insert("lineHeight".into(), fmt_num(lh));
    }
    styles
}

fn logo_styles(asset: &Asset) -> StyleMap {
    StyleMap::from([
        ("position".into(), "absolute".into()),
        ("transform".into(), transform_value(asset)),
        ("width".into(), format!("{}px", fmt_num(asset.width))),
        ("height".into(), format!("{}px", fmt_num(asset.height))),
        ("objectFit".into(), "contain".into()),
    ])
}

fn transform_value(asset: &Asset) -> String {
    format!(
        "translate({}px, {}px) rotate({}deg)",
        fmt_num(asset.x),
        fmt_num(asset.y),
        fmt_num(asset.rotation)
    )
}

/// Formats a scaled value with millis precision so floating-point noise
/// never leaks into the sheet (`2.7`, not `2.7000000000000002`).
fn fmt_num(v: f64) -> String {
    format!("{}", (v * 1000.0).round() / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, AspectRatio};
    use crate::model::AssetRole;

    fn gala_assets() -> Vec<Asset> {
        vec![
            Asset::text("title", AssetRole::Title, "Gala Night"),
            Asset::text("subtitle", AssetRole::Subtitle, "June 1, 7pm"),
            Asset::text("location", AssetRole::Location, "City Hall"),
            Asset::text("description", AssetRole::Description, "Join us..."),
        ]
    }

    fn bg() -> BackgroundOption {
        BackgroundOption {
            id: "bg1".into(),
            name: "Night".into(),
            url: "https://example.com/night.jpg".into(),
            thumbnail: None,
        }
    }

    #[test]
    fn always_emits_two_glass_containers() {
        let geometry = geometry::resolve(AspectRatio::DEFAULT);
        let sheet = derive(&[], None, &geometry);
        assert_eq!(sheet.text_containers.len(), 2);
        assert_eq!(sheet.text_containers[0].get("top").map(String::as_str), Some("0"));
        assert_eq!(
            sheet.text_containers[1].get("bottom").map(String::as_str),
            Some("0")
        );
        for c in &sheet.text_containers {
            assert_eq!(c.get("backdropFilter").map(String::as_str), Some("blur(8px)"));
        }
    }

    #[test]
    fn background_styles_only_when_selected() {
        let geometry = geometry::resolve(AspectRatio::DEFAULT);
        assert!(derive(&[], None, &geometry).background.is_empty());

        let sheet = derive(&[], Some(&bg()), &geometry);
        assert_eq!(
            sheet.background.get("backgroundImage").map(String::as_str),
            Some("url('https://example.com/night.jpg')")
        );
        assert_eq!(sheet.background.get("objectFit").map(String::as_str), Some("cover"));
    }

    #[test]
    fn portrait_tiers_match_the_classic_scale() {
        let geometry = geometry::resolve(AspectRatio::parse("9:16"));
        let sheet = derive(&gala_assets(), None, &geometry);
        let sizes: Vec<&str> = sheet
            .assets
            .iter()
            .map(|r| r.styles.get("fontSize").unwrap().as_str())
            .collect();
        assert_eq!(
            sizes,
            vec![
                "min(5vw, 3rem)",
                "min(3vw, 1.5rem)",
                "min(2.5vw, 1.25rem)",
                "min(2vw, 1rem)"
            ]
        );
        assert_eq!(
            sheet.assets[0].styles.get("fontWeight").map(String::as_str),
            Some("700")
        );
        assert_eq!(
            sheet.assets[3].styles.get("lineHeight").map(String::as_str),
            Some("1.6")
        );
    }

    #[test]
    fn landscape_compresses_font_sizes() {
        let geometry = geometry::resolve(AspectRatio::parse("16:9"));
        let sheet = derive(&gala_assets(), None, &geometry);
        assert_eq!(
            sheet.assets[0].styles.get("fontSize").map(String::as_str),
            Some("min(3vw, 1.8rem)")
        );
    }

    #[test]
    fn tiers_follow_role_not_position() {
        let geometry = geometry::resolve(AspectRatio::parse("9:16"));
        let mut assets = gala_assets();
        assets.rotate_left(1); // title no longer first
        let sheet = derive(&assets, None, &geometry);
        let title_rule = sheet
            .assets
            .iter()
            .find(|r| r.asset_id == "title")
            .unwrap();
        assert_eq!(
            title_rule.styles.get("fontSize").map(String::as_str),
            Some("min(5vw, 3rem)")
        );
    }

    #[test]
    fn text_groups_by_role_and_logos_join_neither_container() {
        let geometry = geometry::resolve(AspectRatio::DEFAULT);
        let mut assets = gala_assets();
        assets.push(Asset::text("note", AssetRole::Freeform, "RSVP"));
        assets.push(Asset::logo("brand", "brand.png", "blob:brand", 100.0, 100.0));

        let sheet = derive(&assets, None, &geometry);
        let groups: Vec<Option<ContainerGroup>> =
            sheet.assets.iter().map(|r| r.group).collect();
        assert_eq!(
            groups,
            vec![
                Some(ContainerGroup::Top),    // title
                Some(ContainerGroup::Top),    // subtitle
                Some(ContainerGroup::Bottom), // location
                Some(ContainerGroup::Bottom), // description
                Some(ContainerGroup::Bottom), // freeform
                None,                         // logo
            ]
        );
        // every group index addresses an emitted container
        for group in groups.into_iter().flatten() {
            assert!(sheet.text_containers.get(group.index()).is_some());
        }
    }

    #[test]
    fn logos_are_styled_independently_and_shapes_skipped() {
        let geometry = geometry::resolve(AspectRatio::DEFAULT);
        let mut assets = gala_assets();
        assets.push(
            Asset::logo("brand", "brand.png", "blob:brand", 400.0, 200.0).with_position(10.0, 20.0),
        );
        let mut shape = Asset::text("blob", AssetRole::Freeform, "");
        shape.kind = AssetKind::Shape;
        assets.push(shape);

        let sheet = derive(&assets, None, &geometry);
        assert_eq!(sheet.assets.len(), 5); // shape has no rule
        let logo = sheet.assets.last().unwrap();
        assert_eq!(logo.asset_id, "brand");
        assert_eq!(logo.styles.get("width").map(String::as_str), Some("200px"));
        assert_eq!(logo.styles.get("height").map(String::as_str), Some("100px"));
        assert_eq!(
            logo.styles.get("transform").map(String::as_str),
            Some("translate(10px, 20px) rotate(0deg)")
        );
        assert!(!logo.styles.contains_key("fontSize"));
    }

    #[test]
    fn derivation_is_deterministic() {
        let geometry = geometry::resolve(AspectRatio::parse("16:9"));
        let assets = gala_assets();
        let a = derive(&assets, Some(&bg()), &geometry);
        let b = derive(&assets, Some(&bg()), &geometry);
        assert_eq!(a, b);
        assert_eq!(a.to_css(), b.to_css());
    }

    #[test]
    fn custom_tier_table_is_honored() {
        let geometry = geometry::resolve(AspectRatio::parse("9:16"));
        let mut tiers = FontTierTable::default();
        tiers.title.vw = 8.0;
        tiers.title.rem_cap = 4.0;
        let sheet = derive_with_tiers(
            &[Asset::text("title", AssetRole::Title, "Big")],
            None,
            &geometry,
            &tiers,
        );
        assert_eq!(
            sheet.assets[0].styles.get("fontSize").map(String::as_str),
            Some("min(8vw, 4rem)")
        );
    }
}

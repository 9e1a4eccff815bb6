use crate::{
    error::{PosterError, PosterResult},
    style::{StyleMap, StyleSheet},
};

/// One named-selector patch, as produced by the style advisor: `content` is
/// a semicolon-delimited list of CSS declarations for `selector`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StylePatch {
    pub selector: String,
    pub content: String,
}

/// Parses one declaration list. Each declaration is independently fallible:
/// a missing colon or empty key/value yields an `Err` for that declaration
/// only, and blank segments between semicolons are not declarations at all.
pub fn parse_declarations(content: &str) -> Vec<PosterResult<(String, String)>> {
    content
        .split(';')
        .filter(|segment| !segment.trim().is_empty())
        .map(parse_declaration)
        .collect()
}

fn parse_declaration(segment: &str) -> PosterResult<(String, String)> {
    let Some((key, value)) = segment.split_once(':') else {
        return Err(PosterError::patch(format!(
            "declaration '{}' has no colon",
            segment.trim()
        )));
    };
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return Err(PosterError::patch(format!(
            "declaration '{}' has an empty key or value",
            segment.trim()
        )));
    }
    Ok((kebab_to_camel(key), value.to_string()))
}

/// Collects the valid declarations of a patch into a property map, logging
/// and dropping the malformed ones.
fn parse_property_map(content: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for decl in parse_declarations(content) {
        match decl {
            Ok((key, value)) => {
                map.insert(key, value);
            }
            Err(err) => tracing::debug!(%err, "skipping malformed declaration"),
        }
    }
    map
}

/// `font-size` -> `fontSize`; keys already free of hyphens pass through.
pub(crate) fn kebab_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for c in key.chars() {
        if c == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Applies a patch set to a sheet, returning the patched copy. The input
/// sheet is never mutated.
///
/// Routing is by selector name; unknown selectors and out-of-range indices
/// are ignored so a partially wrong advisor response still applies its
/// valid entries. Merging is a shallow union: patched properties overwrite,
/// everything else is preserved.
#[tracing::instrument(skip(current, patches), fields(patch_count = patches.len()))]
pub fn apply_patch(current: &StyleSheet, patches: &[StylePatch]) -> StyleSheet {
    let mut next = current.clone();
    for patch in patches {
        let props = parse_property_map(&patch.content);
        if props.is_empty() {
            continue;
        }
        match route(&mut next, &patch.selector) {
            Some(target) => merge_into(target, props),
            None => tracing::debug!(selector = %patch.selector, "ignoring unroutable selector"),
        }
    }
    next
}

/// Resolves a selector to the property map it names, or None when the
/// selector is unknown or its index is out of range right now.
fn route<'a>(sheet: &'a mut StyleSheet, selector: &str) -> Option<&'a mut StyleMap> {
    let name = selector.trim().trim_start_matches('.');
    match name {
        "container" | "poster-container" => return Some(&mut sheet.container),
        "background" | "poster-background" => return Some(&mut sheet.background),
        _ => {}
    }
    if let Some(idx) = indexed(name, "text-container-") {
        return idx
            .checked_sub(1)
            .and_then(|i| sheet.text_containers.get_mut(i));
    }
    if let Some(idx) = indexed(name, "asset-text-").or_else(|| indexed(name, "asset-logo-")) {
        return sheet.asset_rule_mut(idx).map(|rule| &mut rule.styles);
    }
    None
}

fn indexed(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

fn merge_into(target: &mut StyleMap, props: StyleMap) {
    for (key, value) in props {
        target.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{self, AspectRatio};
    use crate::model::{Asset, AssetRole};

    fn base_sheet() -> StyleSheet {
        let assets = vec![
            Asset::text("title", AssetRole::Title, "Gala Night"),
            Asset::text("subtitle", AssetRole::Subtitle, "June 1, 7pm"),
            Asset::text("location", AssetRole::Location, "City Hall"),
            Asset::text("description", AssetRole::Description, "Join us..."),
        ];
        crate::derive::derive(&assets, None, &geometry::resolve(AspectRatio::DEFAULT))
    }

    fn patch(selector: &str, content: &str) -> StylePatch {
        StylePatch {
            selector: selector.into(),
            content: content.into(),
        }
    }

    #[test]
    fn malformed_declarations_are_dropped_valid_neighbours_survive() {
        let decls = parse_declarations("color: red; ;invalid; background : blue");
        let ok: Vec<_> = decls.into_iter().filter_map(Result::ok).collect();
        assert_eq!(
            ok,
            vec![
                ("color".to_string(), "red".to_string()),
                ("background".to_string(), "blue".to_string())
            ]
        );
    }

    #[test]
    fn empty_key_or_value_is_an_error() {
        assert!(parse_declarations(": red")[0].is_err());
        assert!(parse_declarations("color:")[0].is_err());
        assert!(parse_declarations("color:   ")[0].is_err());
    }

    #[test]
    fn kebab_keys_fold_to_camel() {
        assert_eq!(kebab_to_camel("font-size"), "fontSize");
        assert_eq!(kebab_to_camel("backdrop-filter"), "backdropFilter");
        assert_eq!(kebab_to_camel("color"), "color");
    }

    #[test]
    fn patch_overwrites_named_properties_and_preserves_the_rest() {
        let sheet = base_sheet();
        let patched = apply_patch(
            &sheet,
            &[patch(".asset-text-1", "color: #ff0000; font-size: 4rem")],
        );
        let styles = &patched.assets[0].styles;
        assert_eq!(styles.get("color").map(String::as_str), Some("#ff0000"));
        assert_eq!(styles.get("fontSize").map(String::as_str), Some("4rem"));
        // untouched property survives
        assert_eq!(
            styles.get("whiteSpace").map(String::as_str),
            Some("pre-wrap")
        );
        // other regions untouched
        assert_eq!(patched.assets[1], sheet.assets[1]);
        assert_eq!(patched.container, sheet.container);
    }

    #[test]
    fn input_sheet_is_never_mutated() {
        let sheet = base_sheet();
        let before = sheet.clone();
        let _ = apply_patch(&sheet, &[patch(".container", "border: none")]);
        assert_eq!(sheet, before);
    }

    #[test]
    fn container_and_background_selectors_route_with_or_without_prefix() {
        let sheet = base_sheet();
        let patched = apply_patch(
            &sheet,
            &[
                patch(".container", "max-width: 900px"),
                patch(".poster-background", "opacity: 0.8"),
            ],
        );
        assert_eq!(
            patched.container.get("maxWidth").map(String::as_str),
            Some("900px")
        );
        assert_eq!(
            patched.background.get("opacity").map(String::as_str),
            Some("0.8")
        );
    }

    #[test]
    fn text_container_index_is_one_based() {
        let sheet = base_sheet();
        let patched = apply_patch(&sheet, &[patch(".text-container-2", "padding: 4%")]);
        assert_eq!(
            patched.text_containers[1].get("padding").map(String::as_str),
            Some("4%")
        );
        assert_ne!(
            patched.text_containers[0].get("padding").map(String::as_str),
            Some("4%")
        );
    }

    #[test]
    fn out_of_range_index_leaves_sheet_unchanged() {
        let sheet = base_sheet();
        let patched = apply_patch(
            &sheet,
            &[
                patch(".asset-text-99", "color: red"),
                patch(".text-container-9", "padding: 0"),
                patch(".asset-text-0", "color: red"),
            ],
        );
        assert_eq!(patched, sheet);
    }

    #[test]
    fn unrecognized_selectors_are_ignored() {
        let sheet = base_sheet();
        let patched = apply_patch(
            &sheet,
            &[
                patch(".glass-container", "padding: 0"),
                patch("h1", "color: red"),
                patch("", "color: red"),
            ],
        );
        assert_eq!(patched, sheet);
    }

    #[test]
    fn applying_the_same_patch_twice_is_idempotent() {
        let sheet = base_sheet();
        let patches = vec![
            patch(".asset-text-1", "color: teal; font-weight: 900"),
            patch(".container", "border-radius: 0"),
        ];
        let once = apply_patch(&sheet, &patches);
        let twice = apply_patch(&once, &patches);
        assert_eq!(once, twice);
    }
}

//! Widget description file handling
//!
//! A widget description (`efab.toml`) lists the views of each orientation:
//!
//! ```toml
//! [layout]
//! overlay_opening_duration_ms = 300
//!
//! [portrait.overlay]
//! opacity = 0.6
//!
//! [portrait.main_button]
//! fab_option_position = "above"
//!
//! [[portrait.options]]
//! label = { text = "Share" }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use efab_core::{HeadlessHost, Orientation};
use efab_widgets::{
    ExpandableFab, ExpandableFabConfig, ExpandableFabLayout, FabChild, FabOption, FabOptionConfig,
    LayoutConfig, Overlay, OverlayConfig,
};
use serde::{Deserialize, Serialize};

/// Default description file name
pub const DESCRIPTION_FILE: &str = "efab.toml";

/// Contents of a widget description file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WidgetDescription {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub portrait: Option<OrientationDescription>,
    #[serde(default)]
    pub landscape: Option<OrientationDescription>,
}

/// The views of one orientation
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OrientationDescription {
    #[serde(default)]
    pub overlay: Option<OverlayConfig>,
    #[serde(default)]
    pub main_button: Option<ExpandableFabConfig>,
    #[serde(default)]
    pub options: Vec<FabOptionConfig>,
}

impl WidgetDescription {
    /// Load a description from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let description: Self = toml::from_str(content)?;
        if description.portrait.is_none() && description.landscape.is_none() {
            anyhow::bail!("description has neither a [portrait] nor a [landscape] section");
        }
        Ok(description)
    }

    /// A three-option portrait widget
    pub fn sample() -> Self {
        Self {
            layout: LayoutConfig::new(),
            portrait: Some(OrientationDescription {
                overlay: Some(OverlayConfig::new()),
                main_button: Some(ExpandableFabConfig::new().label_text("Close")),
                options: ["Share", "Edit", "Delete"]
                    .into_iter()
                    .map(|text| FabOptionConfig::new().label_text(text))
                    .collect(),
            }),
            landscape: None,
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize widget description")
    }

    /// Build every described view on `layout`'s host and file it
    ///
    /// Configuration errors surface here, naming the offending view.
    pub fn build(&self, layout: &mut ExpandableFabLayout<HeadlessHost>) -> Result<()> {
        let sections = [
            (Orientation::Portrait, self.portrait.as_ref()),
            (Orientation::Landscape, self.landscape.as_ref()),
        ];

        for (orientation, section) in sections {
            let Some(section) = section else {
                continue;
            };

            let mut children: Vec<FabChild> = Vec::new();
            if let Some(config) = &section.overlay {
                let overlay = Overlay::new(layout.host_mut(), orientation, config.clone())
                    .with_context(|| format!("Invalid {} overlay", orientation))?;
                children.push(overlay.into());
            }
            if let Some(config) = &section.main_button {
                let fab = ExpandableFab::new(layout.host_mut(), orientation, config.clone())
                    .with_context(|| format!("Invalid {} main button", orientation))?;
                children.push(fab.into());
            }
            for (index, config) in section.options.iter().enumerate() {
                let option = FabOption::new(layout.host_mut(), orientation, config.clone())
                    .with_context(|| format!("Invalid {} option {}", orientation, index))?;
                children.push(option.into());
            }

            layout
                .add_views(children)
                .with_context(|| format!("Failed to add {} views", orientation))?;
        }

        Ok(())
    }

    /// Number of options described for `orientation`
    pub fn option_count(&self, orientation: Orientation) -> usize {
        let section = match orientation {
            Orientation::Portrait => self.portrait.as_ref(),
            Orientation::Landscape => self.landscape.as_ref(),
        };
        section.map_or(0, |s| s.options.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efab_core::FabOptionPosition;

    #[test]
    fn test_parse_sections() {
        let description = WidgetDescription::parse(
            r#"
            [layout]
            overlay_closing_duration_ms = 40

            [portrait.overlay]
            opacity = 0.5

            [portrait.main_button]
            fab_option_position = "below"

            [[portrait.options]]
            label = { text = "Share" }

            [[portrait.options]]
            opening_duration_ms = 200
            "#,
        )
        .unwrap();

        assert_eq!(description.layout.overlay_closing_duration_ms, Some(40));
        let portrait = description.portrait.as_ref().unwrap();
        assert_eq!(portrait.overlay.as_ref().unwrap().opacity, 0.5);
        assert_eq!(
            portrait.main_button.as_ref().unwrap().fab_option_position,
            FabOptionPosition::Below
        );
        assert_eq!(portrait.options.len(), 2);
        assert_eq!(portrait.options[0].label.text.as_deref(), Some("Share"));
        assert_eq!(portrait.options[1].opening_duration_ms, 200);
        assert!(description.landscape.is_none());
    }

    #[test]
    fn test_parse_requires_a_section() {
        assert!(WidgetDescription::parse("[layout]\n").is_err());
    }

    #[test]
    fn test_sample_round_trips() {
        let text = WidgetDescription::sample().to_toml().unwrap();
        let parsed = WidgetDescription::parse(&text).unwrap();
        assert_eq!(parsed.option_count(Orientation::Portrait), 3);
        assert_eq!(parsed.option_count(Orientation::Landscape), 0);
    }

    #[test]
    fn test_build_files_views() {
        let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
        WidgetDescription::sample().build(&mut layout).unwrap();

        let portrait = layout.portrait_configuration();
        assert!(portrait.overlay().is_some());
        assert!(portrait.expandable_fab().is_some());
        assert_eq!(portrait.fab_options().len(), 3);
        assert!(layout.landscape_configuration().is_empty());
    }

    #[test]
    fn test_build_reports_invalid_config() {
        let description = WidgetDescription::parse(
            r#"
            [portrait.main_button]
            first_fab_option_margin_px = -1.0
            "#,
        )
        .unwrap();

        let mut layout = ExpandableFabLayout::new(HeadlessHost::new());
        let err = description.build(&mut layout).unwrap_err();
        assert!(format!("{:#}", err).contains("portrait main button"));
    }
}

use tracing::debug;

use crate::api::config::{DEFAULT_ZORDER, ScaleBarConfig};
use crate::api::placement::Location;
use crate::diagnostics::{Diagnostics, ScaleBarWarning};
use crate::error::{ScaleBarError, ScaleBarResult};
use crate::style::{
    AnchorBoxOverrides, AnchorBoxStyle, BarKind, BarOverrides, BarStyle, LabelsOverrides,
    LabelsStyle, StyleRegistry, TextOverrides, TextStyle, UnitsOverrides, UnitsStyle,
};

/// A configured scale bar.
///
/// Holds fully merged styles only. Geometry is derived from the axis on every
/// render, so one instance can be drawn on any number of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleBar {
    kind: BarKind,
    location: Location,
    zorder: i32,
    bar: BarStyle,
    units: UnitsStyle,
    labels: LabelsStyle,
    text: TextStyle,
    aob: AnchorBoxStyle,
    style_warnings: Vec<ScaleBarWarning>,
}

impl ScaleBar {
    /// Merges `config` onto the defaults of `registry`.
    pub fn new(config: &ScaleBarConfig, registry: StyleRegistry) -> ScaleBarResult<Self> {
        let mut diagnostics = Diagnostics::new();
        let bar = registry
            .bar()
            .merge(&config.bar, config.kind, &mut diagnostics)?;
        let units = registry.units().merge(&config.units, &mut diagnostics)?;
        let labels = registry.labels().merge(&config.labels, &mut diagnostics)?;
        let text = registry.text().merge(&config.text, &mut diagnostics)?;
        let aob = registry.anchor_box().merge(&config.aob, &mut diagnostics)?;
        debug!(
            kind = ?config.kind,
            tier = registry.tier().name(),
            warnings = diagnostics.warnings().len(),
            "scale bar configured"
        );
        Ok(Self {
            kind: config.kind,
            location: config.location,
            zorder: config.zorder,
            bar,
            units,
            labels,
            text,
            aob,
            style_warnings: diagnostics.into_warnings(),
        })
    }

    /// Bar with the registry defaults and no overrides.
    pub fn with_defaults(registry: StyleRegistry) -> ScaleBarResult<Self> {
        Self::new(&ScaleBarConfig::default(), registry)
    }

    /// Parses a JSON [`ScaleBarConfig`] and builds the bar.
    pub fn from_json(json: &str, registry: StyleRegistry) -> ScaleBarResult<Self> {
        let config: ScaleBarConfig = serde_json::from_str(json)
            .map_err(|err| ScaleBarError::config("config", err.to_string()))?;
        Self::new(&config, registry)
    }

    pub(crate) fn from_parts(
        kind: BarKind,
        location: Location,
        bar: BarStyle,
        units: UnitsStyle,
        labels: LabelsStyle,
        text: TextStyle,
        aob: AnchorBoxStyle,
    ) -> Self {
        Self {
            kind,
            location,
            zorder: DEFAULT_ZORDER,
            bar,
            units,
            labels,
            text,
            aob,
            style_warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> BarKind {
        self.kind
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn zorder(&self) -> i32 {
        self.zorder
    }

    #[must_use]
    pub fn bar(&self) -> &BarStyle {
        &self.bar
    }

    #[must_use]
    pub fn units(&self) -> &UnitsStyle {
        &self.units
    }

    #[must_use]
    pub fn labels(&self) -> &LabelsStyle {
        &self.labels
    }

    #[must_use]
    pub fn text(&self) -> &TextStyle {
        &self.text
    }

    #[must_use]
    pub fn anchor_box(&self) -> &AnchorBoxStyle {
        &self.aob
    }

    /// Warnings raised while merging styles at construction.
    #[must_use]
    pub fn style_warnings(&self) -> &[ScaleBarWarning] {
        &self.style_warnings
    }

    pub fn set_kind(&mut self, kind: BarKind) {
        self.kind = kind;
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn set_zorder(&mut self, zorder: i32) {
        self.zorder = zorder;
    }

    /// Replaces the bar style wholesale.
    pub fn set_bar(&mut self, bar: BarStyle) -> ScaleBarResult<()> {
        bar.validate()?;
        self.bar = bar;
        Ok(())
    }

    pub fn set_units(&mut self, units: UnitsStyle) -> ScaleBarResult<()> {
        units.validate()?;
        self.units = units;
        Ok(())
    }

    pub fn set_labels(&mut self, labels: LabelsStyle) -> ScaleBarResult<()> {
        labels.validate()?;
        self.labels = labels;
        Ok(())
    }

    pub fn set_text(&mut self, text: TextStyle) -> ScaleBarResult<()> {
        text.validate()?;
        self.text = text;
        Ok(())
    }

    pub fn set_anchor_box(&mut self, aob: AnchorBoxStyle) -> ScaleBarResult<()> {
        aob.validate()?;
        self.aob = aob;
        Ok(())
    }

    /// Merges overrides onto the current bar style.
    ///
    /// On error the style is left untouched.
    pub fn update_bar(&mut self, overrides: &BarOverrides) -> ScaleBarResult<Vec<ScaleBarWarning>> {
        let mut diagnostics = Diagnostics::new();
        self.bar = self.bar.merge(overrides, self.kind, &mut diagnostics)?;
        Ok(diagnostics.into_warnings())
    }

    pub fn update_units(
        &mut self,
        overrides: &UnitsOverrides,
    ) -> ScaleBarResult<Vec<ScaleBarWarning>> {
        let mut diagnostics = Diagnostics::new();
        self.units = self.units.merge(overrides, &mut diagnostics)?;
        Ok(diagnostics.into_warnings())
    }

    pub fn update_labels(
        &mut self,
        overrides: &LabelsOverrides,
    ) -> ScaleBarResult<Vec<ScaleBarWarning>> {
        let mut diagnostics = Diagnostics::new();
        self.labels = self.labels.merge(overrides, &mut diagnostics)?;
        Ok(diagnostics.into_warnings())
    }

    pub fn update_text(&mut self, overrides: &TextOverrides) -> ScaleBarResult<Vec<ScaleBarWarning>> {
        let mut diagnostics = Diagnostics::new();
        self.text = self.text.merge(overrides, &mut diagnostics)?;
        Ok(diagnostics.into_warnings())
    }

    pub fn update_anchor_box(
        &mut self,
        overrides: &AnchorBoxOverrides,
    ) -> ScaleBarResult<Vec<ScaleBarWarning>> {
        let mut diagnostics = Diagnostics::new();
        self.aob = self.aob.merge(overrides, &mut diagnostics)?;
        Ok(diagnostics.into_warnings())
    }
}

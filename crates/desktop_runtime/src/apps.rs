//! Application catalog compiled from `manifests/*.app.toml` and the boot path that turns it into
//! a populated [`DesktopState`].

use serde::Deserialize;

use crate::{
    activation,
    application::{Application, OpenBehavior},
    config::{ConfigError, ShellMetrics},
    model::{AppId, DesktopIconState, DesktopState, Point},
};

include!(concat!(env!("OUT_DIR"), "/app_catalog_generated.rs"));

#[derive(Debug, Clone, PartialEq)]
pub struct AppDescriptor {
    pub app_id: AppId,
    pub title: String,
    pub icon: String,
    pub open_behavior: OpenBehavior,
    pub show_on_desktop: bool,
    pub desktop_icon_label: String,
    pub desktop_icon_position: Point,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    app_id: String,
    title: String,
    icon: String,
    single_instance: bool,
    show_on_desktop: bool,
    desktop_icon_label: String,
    desktop_icon_position: Point,
}

impl TryFrom<CatalogEntry> for AppDescriptor {
    type Error = ConfigError;

    fn try_from(entry: CatalogEntry) -> Result<Self, Self::Error> {
        let app_id =
            AppId::parse(&entry.app_id).ok_or_else(|| ConfigError::UnknownApp(entry.app_id))?;
        Ok(Self {
            app_id,
            title: entry.title,
            icon: entry.icon,
            open_behavior: if entry.single_instance {
                OpenBehavior::SingleInstance
            } else {
                OpenBehavior::Multi
            },
            show_on_desktop: entry.show_on_desktop,
            desktop_icon_label: entry.desktop_icon_label,
            desktop_icon_position: entry.desktop_icon_position,
        })
    }
}

/// Parses a JSON app catalog in the build-script output format.
///
/// # Errors
///
/// Returns [`ConfigError::Catalog`] for malformed JSON and [`ConfigError::UnknownApp`] for an
/// entry whose `app_id` this runtime does not host.
pub fn parse_app_catalog(raw: &str) -> Result<Vec<AppDescriptor>, ConfigError> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(raw).map_err(|err| ConfigError::Catalog(err.to_string()))?;
    entries.into_iter().map(AppDescriptor::try_from).collect()
}

/// The catalog baked in at build time.
pub fn builtin_app_catalog() -> Result<Vec<AppDescriptor>, ConfigError> {
    parse_app_catalog(APP_MANIFEST_CATALOG_JSON)
}

impl DesktopState {
    /// Registers one [`Application`] per descriptor and places its desktop icon.
    ///
    /// Icons are stacked in catalog order; none starts active.
    pub fn from_catalog(metrics: ShellMetrics, catalog: &[AppDescriptor]) -> Self {
        let mut state = Self::new(metrics);
        for descriptor in catalog {
            let mut app = Application::new(
                descriptor.app_id,
                descriptor.title.clone(),
                descriptor.icon.clone(),
                descriptor.open_behavior,
            );
            if descriptor.show_on_desktop {
                let icon_id = state.next_icon_id();
                let stamp = state.next_activation_stamp();
                app.desktop_icons.push(DesktopIconState::new(
                    icon_id,
                    descriptor.app_id,
                    descriptor.icon.clone(),
                    descriptor.desktop_icon_label.clone(),
                    descriptor.desktop_icon_position,
                    stamp,
                ));
            }
            app.refresh_menus(state.active_theme());
            state.applications.push(app);
        }
        activation::rank_icons(&mut state);
        activation::deactivate_all(&mut state);
        state.refresh_desktop_menu();
        state
    }

    /// Boots from the built-in catalog.
    ///
    /// # Errors
    ///
    /// Propagates catalog parse failures.
    pub fn boot(metrics: ShellMetrics) -> Result<Self, ConfigError> {
        let catalog = builtin_app_catalog()?;
        Ok(Self::from_catalog(metrics, &catalog))
    }
}

#[cfg(test)]
pub(crate) fn test_catalog() -> Vec<AppDescriptor> {
    builtin_app_catalog().expect("built-in catalog parses")
}

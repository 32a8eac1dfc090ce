//! Derived menu item lists for taskbar and desktop menus.

use platform_host::ThemeMode;

use crate::{
    application::Application,
    model::{AppId, MenuCommand, MenuItem},
};

/// Themed asset path, e.g. `/minimize-dark.svg`.
pub fn themed_icon(name: &str, theme: ThemeMode) -> String {
    format!("/{name}-{}.svg", theme.as_str())
}

/// Left-click taskbar menu: one entry per open window, in creation order.
pub fn window_list_items(app: &Application) -> Vec<MenuItem> {
    app.open_windows()
        .map(|window| {
            MenuItem::action(
                window.title(),
                window.icon(),
                MenuCommand::ActivateWindow {
                    app_id: app.id(),
                    window_id: window.id(),
                },
            )
        })
        .collect()
}

/// Right-click taskbar menu: bulk actions over the application's windows.
pub fn bulk_action_items(app_id: AppId, theme: ThemeMode) -> Vec<MenuItem> {
    vec![
        MenuItem::action(
            "Minimize All",
            themed_icon("minimize", theme),
            MenuCommand::MinimizeAll(app_id),
        ),
        MenuItem::action(
            "Restore All",
            themed_icon("restore", theme),
            MenuCommand::RestoreAll(app_id),
        ),
        MenuItem::action(
            "Close All",
            themed_icon("close", theme),
            MenuCommand::CloseAll(app_id),
        ),
    ]
}

/// Desktop context menu. The theme entry offers the opposite of the active theme.
pub fn desktop_items(theme: ThemeMode, align_to_grid: bool) -> Vec<MenuItem> {
    let theme_entry = match theme {
        ThemeMode::Dark => MenuItem::action(
            "Switch to Light Theme",
            "/sun-dark.svg",
            MenuCommand::SwitchTheme,
        ),
        ThemeMode::Light => MenuItem::action(
            "Switch to Dark Theme",
            "/moon-light.svg",
            MenuCommand::SwitchTheme,
        ),
    };
    vec![
        theme_entry,
        MenuItem::divider(),
        MenuItem::action(
            "Sort Icons",
            themed_icon("sort", theme),
            MenuCommand::SortIcons,
        ),
        MenuItem::action(
            "Align to Grid",
            themed_icon("grid", theme),
            MenuCommand::ToggleAlignToGrid,
        )
        .with_checked(align_to_grid),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn labels(items: &[MenuItem]) -> Vec<Option<&str>> {
        items.iter().map(|item| item.label.as_deref()).collect()
    }

    #[test]
    fn desktop_menu_offers_opposite_theme() {
        let dark = desktop_items(ThemeMode::Dark, false);
        assert_eq!(
            labels(&dark),
            vec![
                Some("Switch to Light Theme"),
                None,
                Some("Sort Icons"),
                Some("Align to Grid"),
            ]
        );
        assert_eq!(dark[0].icon.as_deref(), Some("/sun-dark.svg"));
        assert!(dark[1].divider);
        assert_eq!(dark[3].checked, Some(false));

        let light = desktop_items(ThemeMode::Light, true);
        assert_eq!(light[0].label.as_deref(), Some("Switch to Dark Theme"));
        assert_eq!(light[0].icon.as_deref(), Some("/moon-light.svg"));
        assert_eq!(light[2].icon.as_deref(), Some("/sort-light.svg"));
        assert_eq!(light[3].checked, Some(true));
    }

    #[test]
    fn bulk_actions_target_their_application() {
        let items = bulk_action_items(AppId::Blog, ThemeMode::Light);
        let commands: Vec<_> = items.iter().filter_map(|item| item.command).collect();
        assert_eq!(
            commands,
            vec![
                MenuCommand::MinimizeAll(AppId::Blog),
                MenuCommand::RestoreAll(AppId::Blog),
                MenuCommand::CloseAll(AppId::Blog),
            ]
        );
        assert_eq!(items[1].icon.as_deref(), Some("/restore-light.svg"));
    }
}

//! Desktop shell core: window lifecycle, activation and stacking, desktop icons, application
//! containers, and menu geometry, driven through a single reducer.

pub mod activation;
pub mod application;
pub mod apps;
pub mod config;
pub mod desktop_icons;
pub mod effect_executor;
pub mod headless;
pub mod host;
pub mod menu_geometry;
pub mod menus;
pub mod model;
pub mod reducer;
pub mod runtime_context;
pub mod views;
pub mod window_manager;

pub use application::{Application, OpenBehavior};
pub use apps::{builtin_app_catalog, parse_app_catalog, AppDescriptor};
pub use config::{ConfigError, IconGrid, MenuMetrics, ShellMetrics};
pub use effect_executor::EffectExecutor;
pub use headless::HeadlessDesktop;
pub use menu_geometry::{constrain_position, layout, MenuLayout};
pub use model::*;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{provide_desktop_runtime, use_desktop_runtime, DesktopRuntimeContext};
pub use views::{EntityRef, ViewRegistry};

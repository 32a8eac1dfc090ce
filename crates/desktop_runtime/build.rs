use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct IconPosition {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AppManifest {
    schema_version: u32,
    app_id: String,
    title: String,
    icon: String,
    single_instance: bool,
    show_on_desktop: bool,
    desktop_icon_label: String,
    desktop_icon_position: IconPosition,
}

const SCHEMA_VERSION: u32 = 1;
const MANIFESTS: [&str; 2] = ["blog", "explorer"];

impl AppManifest {
    /// Problems that would make the shell boot with a broken catalog entry.
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.schema_version != SCHEMA_VERSION {
            problems.push(format!(
                "schema_version {} (expected {SCHEMA_VERSION})",
                self.schema_version
            ));
        }
        if self.title.trim().is_empty() {
            problems.push("empty title".to_string());
        }
        if !self.icon.starts_with('/') {
            problems.push(format!("icon `{}` is not a root-relative path", self.icon));
        }
        if self.show_on_desktop && self.desktop_icon_label.trim().is_empty() {
            problems.push("desktop icon shown without a label".to_string());
        }
        let IconPosition { x, y } = self.desktop_icon_position;
        if !(x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0) {
            problems.push(format!("desktop icon position ({x}, {y}) is off the desktop"));
        }
        problems
    }
}

fn load(path: &Path) -> Result<AppManifest, String> {
    let raw = fs::read_to_string(path).map_err(|err| format!("read failed: {err}"))?;
    let manifest: AppManifest = toml::from_str(&raw).map_err(|err| format!("parse failed: {err}"))?;
    let problems = manifest.problems();
    if problems.is_empty() {
        Ok(manifest)
    } else {
        Err(problems.join("; "))
    }
}

fn main() {
    let root = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let mut catalog = BTreeMap::new();
    let mut failures = Vec::new();

    for name in MANIFESTS {
        let path = root.join("manifests").join(format!("{name}.app.toml"));
        println!("cargo:rerun-if-changed={}", path.display());
        match load(&path) {
            Ok(manifest) if manifest.app_id != name => failures.push(format!(
                "{}: app_id `{}` does not match file name",
                path.display(),
                manifest.app_id
            )),
            Ok(manifest) => {
                catalog.insert(manifest.app_id.clone(), manifest);
            }
            Err(reason) => failures.push(format!("{}: {reason}", path.display())),
        }
    }
    if !failures.is_empty() {
        panic!("invalid app manifests:\n{}", failures.join("\n"));
    }

    // BTreeMap iteration keeps the catalog sorted by app id.
    let entries: Vec<&AppManifest> = catalog.values().collect();
    let json = serde_json::to_string_pretty(&entries).expect("serialize app catalog");
    let out = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR")).join("app_catalog_generated.rs");
    fs::write(
        &out,
        format!(
            "/// App catalog compiled from `manifests/*.app.toml`.\n\
pub const APP_MANIFEST_CATALOG_JSON: &str = r##\"{json}\"##;\n"
        ),
    )
    .unwrap_or_else(|err| panic!("failed to write {}: {err}", out.display()));
}

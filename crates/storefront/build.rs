//! Build script for storefront crate.
//!
//! Generates content-based hashes for the stylesheet and page script. The
//! templates append them as a version query so browsers refetch an asset
//! only when its content changes.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Asset path under `static/` and the env var receiving its hash.
const HASHED_ASSETS: &[(&str, &str)] = &[("css/main.css", "CSS_HASH"), ("js/app.js", "JS_HASH")];

fn main() {
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let static_dir = Path::new(&manifest_dir).join("static");

    for (asset, var) in HASHED_ASSETS {
        let hash = hash_asset(&static_dir.join(asset)).unwrap_or_default();
        println!("cargo:rustc-env={var}={hash}");
    }
}

/// First 8 hex chars of the file's SHA-256, or `None` if it cannot be read.
fn hash_asset(path: &Path) -> Option<String> {
    println!("cargo:rerun-if-changed={}", path.display());

    let content = match fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            // Asset might not exist yet during initial build
            println!("cargo:warning=Could not read {}: {e}", path.display());
            return None;
        }
    };

    let digest = format!("{:x}", Sha256::digest(&content));
    digest.get(..8).map(str::to_string)
}

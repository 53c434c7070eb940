pub mod img_loader;

pub use img_loader::RTWImage;

/// Resolves an asset name to a path. A name that already points at an
/// existing file is taken as-is; otherwise the env variable ASSET_DIR
/// decides where assets are stored, with a search a few directories up
/// for a folder called assets as the fallback.
fn build_asset_path(asset_filename: &str) -> Option<String> {
    if std::fs::exists(asset_filename).unwrap_or(false) {
        return Some(asset_filename.to_owned());
    }

    let folder = std::env::var("ASSET_DIR");

    if let Ok(path) = folder {
        // Found a path append the filename
        return Some(path + asset_filename);
    }

    // Found no env variable lets search a bit
    for prefix in [
        "assets/",
        "../assets/",
        "../../assets/",
        "../../../assets/",
        "../../../../assets/",
    ] {
        let candidate = prefix.to_owned() + asset_filename;
        if std::fs::exists(&candidate).unwrap_or(false) {
            return Some(candidate);
        }
    }

    None
}

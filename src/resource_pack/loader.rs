//! Resource pack loading from ZIP files, client jars and directories.

use super::{BlockModel, BlockstateDefinition, ResourcePack};
use crate::error::{ConverterError, Result};
use std::io::Read;
use std::path::Path;

/// Load a resource pack from a file path.
///
/// Supports both ZIP files (including client jars) and directories.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ResourcePack> {
    let path = path.as_ref();

    if path.is_dir() {
        load_from_directory(path)
    } else {
        let data = std::fs::read(path)?;
        load_from_bytes(&data)
    }
}

/// Load a resource pack from bytes (ZIP data).
pub fn load_from_bytes(data: &[u8]) -> Result<ResourcePack> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut pack = ResourcePack::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }
        let file_path = file.name().to_string();

        let Some((namespace, asset_type, asset_path)) = parse_asset_path(&file_path) else {
            continue;
        };

        match asset_type {
            "blockstates" | "models" if asset_path.ends_with(".json") => {
                let mut contents = String::new();
                file.read_to_string(&mut contents)?;
                add_json_asset(&mut pack, namespace, asset_type, asset_path, &contents);
            }
            "textures" if asset_path.ends_with(".png") => {
                let mut data = Vec::new();
                file.read_to_end(&mut data)?;
                pack.add_texture(namespace, asset_path.trim_end_matches(".png"), data);
            }
            _ => {}
        }
    }

    log::debug!(
        "loaded pack archive: {} blockstates, {} models, {} textures",
        pack.blockstate_count(),
        pack.model_count(),
        pack.texture_count()
    );

    Ok(pack)
}

/// Parse one JSON asset into the pack. Unparseable files are logged and skipped.
fn add_json_asset(
    pack: &mut ResourcePack,
    namespace: &str,
    asset_type: &str,
    asset_path: &str,
    contents: &str,
) {
    let id = asset_path.trim_end_matches(".json");
    match asset_type {
        "blockstates" => match serde_json::from_str::<BlockstateDefinition>(contents) {
            Ok(def) => pack.add_blockstate(namespace, id, def),
            Err(e) => log::warn!("failed to parse blockstate {}:{}: {}", namespace, id, e),
        },
        "models" => match serde_json::from_str::<BlockModel>(contents) {
            Ok(model) => pack.add_model(namespace, id, model),
            Err(e) => log::warn!("failed to parse model {}:{}: {}", namespace, id, e),
        },
        _ => {}
    }
}

/// Load a resource pack from a directory.
fn load_from_directory(path: &Path) -> Result<ResourcePack> {
    let mut pack = ResourcePack::new();

    let assets_path = path.join("assets");
    if !assets_path.exists() {
        return Err(ConverterError::InvalidResourcePack(format!(
            "No assets directory found in {}",
            path.display()
        )));
    }

    for namespace_entry in std::fs::read_dir(&assets_path)? {
        let namespace_entry = namespace_entry?;
        if !namespace_entry.file_type()?.is_dir() {
            continue;
        }

        let namespace = namespace_entry
            .file_name()
            .to_string_lossy()
            .to_string();
        let namespace_path = namespace_entry.path();

        for asset_type in ["blockstates", "models"] {
            let type_path = namespace_path.join(asset_type);
            if type_path.exists() {
                visit_files_recursive(&type_path, &type_path, "json", &mut |relative, file| {
                    let contents = std::fs::read_to_string(file)?;
                    add_json_asset(
                        &mut pack,
                        &namespace,
                        asset_type,
                        &format!("{}.json", relative),
                        &contents,
                    );
                    Ok(())
                })?;
            }
        }

        let textures_path = namespace_path.join("textures");
        if textures_path.exists() {
            visit_files_recursive(&textures_path, &textures_path, "png", &mut |relative, file| {
                pack.add_texture(&namespace, relative, std::fs::read(file)?);
                Ok(())
            })?;
        }
    }

    Ok(pack)
}

/// Parse an asset path from a ZIP file.
/// Returns (namespace, asset_type, asset_path) if valid.
fn parse_asset_path(file_path: &str) -> Option<(&str, &str, &str)> {
    // Expected format: assets/{namespace}/{type}/{path}
    let parts: Vec<&str> = file_path.splitn(4, '/').collect();

    if parts.len() >= 4 && parts[0] == "assets" {
        Some((parts[1], parts[2], parts[3]))
    } else {
        None
    }
}

/// Call `handler` with the extensionless, `/`-separated path (relative to `base`)
/// of every file under `dir` with the given extension.
fn visit_files_recursive<F>(base: &Path, dir: &Path, extension: &str, handler: &mut F) -> Result<()>
where
    F: FnMut(&str, &Path) -> Result<()>,
{
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            visit_files_recursive(base, &path, extension, handler)?;
        } else if path.extension().map(|e| e == extension).unwrap_or(false) {
            let Ok(relative) = path.strip_prefix(base) else {
                continue;
            };
            let relative = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");

            handler(&relative, &path)?;
        }
    }
    Ok(())
}

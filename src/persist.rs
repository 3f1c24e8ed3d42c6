use std::{
    fs,
    io::{BufWriter, ErrorKind},
    path::{Path, PathBuf},
};

use anyhow::{ensure, Context, Result};
use json_pretty_compact::PrettyCompactFormatter;
use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Serializer;

use crate::{
    common::{MAX_BLOCK_SIZE, MAX_MAGNIFICATION},
    import::{decode_all_palettes, decode_all_tiles},
    render::PixelBuffer,
    state::{EditorConfig, EditorState},
};

fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    info!("Saving {}", path.display());
    let formatter = PrettyCompactFormatter::new();
    let mut data_bytes = vec![];
    let mut ser = Serializer::with_formatter(&mut data_bytes, formatter);
    data.serialize(&mut ser)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &data_bytes)?;
    Ok(())
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Loading {}", path.display());
    let data_bytes = std::fs::read(path)?;
    let data: T = serde_json::from_slice(&data_bytes)?;
    Ok(data)
}

fn check_scale(name: &str, value: usize, max: usize) -> Result<()> {
    ensure!(
        (1..=max).contains(&value),
        "{} must be between 1 and {}, got {}",
        name,
        max,
        value
    );
    Ok(())
}

pub fn validate_config(config: &EditorConfig) -> Result<()> {
    check_scale("sheet_magnification", config.sheet_magnification, MAX_MAGNIFICATION)?;
    check_scale("map_magnification", config.map_magnification, MAX_MAGNIFICATION)?;
    check_scale(
        "inspector_magnification",
        config.inspector_magnification,
        MAX_MAGNIFICATION,
    )?;
    check_scale("palette_block_size", config.palette_block_size, MAX_BLOCK_SIZE)?;
    Ok(())
}

pub fn load_config(state: &mut EditorState) -> Result<()> {
    let Some(path) = state.config_path.clone() else {
        return Ok(());
    };
    match fs::metadata(&path) {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No config at {}, using defaults", path.display());
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("Unable to read {}", path.display())),
        Ok(_) => {}
    }
    let config: EditorConfig =
        load_json(&path).with_context(|| format!("Invalid config file {}", path.display()))?;
    validate_config(&config)?;
    state.config = config;
    Ok(())
}

pub fn save_config(state: &mut EditorState) -> Result<()> {
    if state.config.modified {
        let path = state
            .config_path
            .as_ref()
            .context("Config path not set.")?;
        save_json(path, &state.config)?;
        state.config.modified = false;
    }
    Ok(())
}

// An existing file is taken as is. A pattern that is invalid or matches nothing
// is kept as a literal path.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = vec![];
    for pattern in patterns {
        if Path::new(pattern).is_file() {
            paths.push(PathBuf::from(pattern));
            continue;
        }
        let mut matches = vec![];
        match glob::glob(pattern) {
            Ok(entries) => {
                for entry in entries {
                    matches.push(entry?);
                }
            }
            Err(e) => debug!("Not a glob pattern ({}), using {} as a path", e, pattern),
        }
        if matches.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            matches.sort();
            paths.extend(matches);
        }
    }
    Ok(paths)
}

fn read_files(paths: &[PathBuf]) -> Result<Vec<Vec<u8>>> {
    paths
        .iter()
        .map(|path| {
            info!("Loading {}", path.display());
            fs::read(path).with_context(|| format!("Unable to read {}", path.display()))
        })
        .collect()
}

pub fn load_palette_files(state: &mut EditorState, paths: &[PathBuf]) -> Result<usize> {
    let buffers = read_files(paths)?;
    let palettes = decode_all_palettes(&buffers);
    let cnt = palettes.len();
    state.append_palettes(palettes);
    info!("Loaded {} palettes ({} total)", cnt, state.palettes.len());
    Ok(cnt)
}

pub fn load_tile_files(state: &mut EditorState, paths: &[PathBuf]) -> Result<usize> {
    let buffers = read_files(paths)?;
    let tiles = decode_all_tiles(&buffers);
    let cnt = tiles.len();
    state.append_tiles(tiles);
    info!("Loaded {} tiles ({} total)", cnt, state.tiles.len());
    Ok(cnt)
}

pub fn save_png(path: &Path, buf: &PixelBuffer) -> Result<()> {
    ensure!(
        buf.width > 0 && buf.height > 0,
        "Cannot save empty {}x{} image to {}",
        buf.width,
        buf.height,
        path.display()
    );
    info!("Saving {}", path.display());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    let width = u32::try_from(buf.width).context("Image too wide for PNG")?;
    let height = u32::try_from(buf.height).context("Image too tall for PNG")?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(buf.as_bytes())?;
    Ok(())
}

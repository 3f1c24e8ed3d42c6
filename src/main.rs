use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};

use tilemap_editor::{
    persist,
    state::{get_initial_state, CellAssignment, CellCoord},
};

#[derive(Parser, Debug)]
#[command(version, about = "Decode 4bpp tiles and BGR555 palettes and render a 32x32 tile map")]
struct Args {
    /// Palette files or glob patterns, appended in the order given
    #[arg(long = "palettes", num_args = 1..)]
    palettes: Vec<String>,

    /// Tile files or glob patterns, appended in the order given
    #[arg(long = "tiles", num_args = 1..)]
    tiles: Vec<String>,

    /// Map edit, e.g. "3,4=17,2,h" (x,y=tile,palette with optional h/v/hv flip flags)
    #[arg(long = "set-cell")]
    set_cells: Vec<CellAssignment>,

    /// Cell shown in the tile inspector, e.g. "3,4"
    #[arg(long)]
    select: Option<CellCoord>,

    /// Palette used to draw the tile sheet
    #[arg(long)]
    sheet_palette: Option<usize>,

    /// Magnification for the tile sheet and tile map
    #[arg(long)]
    magnification: Option<usize>,

    /// Config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective settings back to the config file
    #[arg(long, default_value_t = false)]
    save_config: bool,

    /// Write the tile sheet to this PNG
    #[arg(long)]
    sheet: Option<PathBuf>,

    /// Write the tile map to this PNG
    #[arg(long)]
    map: Option<PathBuf>,

    /// Write the palette swatches to this PNG
    #[arg(long)]
    palette_strip: Option<PathBuf>,

    /// Write the selected cell to this PNG
    #[arg(long)]
    inspect: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let mut state = get_initial_state(args.config)?;

    if let Some(idx) = args.sheet_palette {
        state.config.sheet_palette_idx = idx;
        state.config.modified = true;
    }
    if let Some(m) = args.magnification {
        state.config.sheet_magnification = m;
        state.config.map_magnification = m;
        state.config.modified = true;
    }
    persist::validate_config(&state.config)?;

    let palette_paths = persist::expand_inputs(&args.palettes)?;
    persist::load_palette_files(&mut state, &palette_paths)?;
    let tile_paths = persist::expand_inputs(&args.tiles)?;
    persist::load_tile_files(&mut state, &tile_paths)?;

    for a in &args.set_cells {
        state.set_cell(a.coord, a.entry);
    }
    state.select(args.select);
    if let Some(entry) = state.selected_entry() {
        info!(
            "Selected tile {} palette {} ({}flip)",
            entry.tile_idx,
            entry.palette_idx,
            match (entry.h_flip, entry.v_flip) {
                (false, false) => "No ",
                (true, false) => "H-",
                (false, true) => "V-",
                (true, true) => "HV-",
            }
        );
    }

    if let Some(path) = &args.sheet {
        match state.render_tile_sheet() {
            Some(buf) if buf.height > 0 => persist::save_png(path, &buf)?,
            Some(_) => warn!("No tiles loaded, skipping {}", path.display()),
            None => warn!(
                "Palette {} not loaded, skipping {}",
                state.config.sheet_palette_idx,
                path.display()
            ),
        }
    }
    if let Some(path) = &args.map {
        persist::save_png(path, &state.render_tile_map())?;
    }
    if let Some(path) = &args.palette_strip {
        persist::save_png(path, &state.render_palette_strip())?;
    }
    if let Some(path) = &args.inspect {
        persist::save_png(path, &state.render_selected_cell())?;
    }

    if args.save_config {
        state.config.modified = true;
        persist::save_config(&mut state)?;
    }
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

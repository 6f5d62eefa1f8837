use crate::error::ContentError;
use crate::state::{GridPos, Tile};
use crate::theme::{Rgb, parse_hex_color};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_COLS: usize = 13;
pub const DEFAULT_ROWS: usize = 9;

#[derive(Clone, Debug, PartialEq)]
pub struct LevelDescriptor {
    pub title: String,
    // Tile codes 0..=7, rectangular. Walker markers (7) are still present here.
    pub grid: Vec<Vec<u8>>,
    pub coin_grid: Vec<Vec<bool>>,
    pub spawn: Option<GridPos>,
    pub accent: Option<Rgb>,
    pub tile_texture: Option<String>,
    pub overlay_image: Option<String>,
}

pub struct Content {
    pub levels: Vec<LevelDescriptor>,
    pub coin_frames: Vec<String>,
}

impl Content {
    pub fn level_image_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .levels
            .iter()
            .flat_map(|l| [l.tile_texture.as_deref(), l.overlay_image.as_deref()])
            .flatten()
            .collect();
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

#[derive(Deserialize)]
struct RawContent {
    #[serde(default)]
    level: Vec<RawLevel>,
    #[serde(default)]
    assets: Vec<RawAssetBlock>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLevel {
    #[serde(rename = "Title", alias = "title")]
    title: Option<String>,
    map: Option<String>,
    coin_map: Option<String>,
    spawn: Option<RawSpawn>,
    accent: Option<String>,
    tile_texture: Option<RawAssetRef>,
    overlay: Option<RawAssetRef>,
}

#[derive(Deserialize)]
struct RawSpawn {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct RawAssetBlock {
    #[serde(default)]
    frames: Vec<RawAssetRef>,
}

// Asset fields come either as a bare path or as an asset object with a `filename`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAssetRef {
    Path(String),
    Asset { filename: Option<String> },
}

impl RawAssetRef {
    fn into_path(self) -> Option<String> {
        let path = match self {
            RawAssetRef::Path(path) => path,
            RawAssetRef::Asset { filename } => filename?,
        };
        let path = path.trim();
        if path.is_empty() {
            None
        } else {
            Some(path.to_string())
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedGrid {
    pub cells: Vec<Vec<i64>>,
    pub spawn: Option<GridPos>,
}

// Parses grid text of the form `[0,1,0],\n[1,*,1],` into rows of integers.
//
// Every innermost bracket group is a row. Rows containing a token that is not an
// integer are dropped; ragged rows are padded with 0. A `*` token marks the spawn
// cell and reads as 0. No usable rows gives a 13x9 zero grid.
pub fn parse_grid(text: &str) -> ParsedGrid {
    let mut cells: Vec<Vec<i64>> = Vec::new();
    let mut spawn = None;

    let mut group_start: Option<usize> = None;
    for (i, ch) in text.char_indices() {
        match ch {
            '[' => group_start = Some(i + 1),
            ']' => {
                if let Some(start) = group_start.take()
                    && let Some((row, spawn_col)) = parse_row(&text[start..i])
                {
                    if let Some(col) = spawn_col {
                        spawn = Some(GridPos::new(cells.len(), col));
                    }
                    cells.push(row);
                }
            }
            _ => {}
        }
    }

    if cells.is_empty() {
        if !text.trim().is_empty() {
            log::warn!("grid text has no parsable rows, using an empty {DEFAULT_COLS}x{DEFAULT_ROWS} grid");
        }
        return ParsedGrid {
            cells: vec![vec![0; DEFAULT_COLS]; DEFAULT_ROWS],
            spawn: None,
        };
    }

    let cols = cells.iter().map(|r| r.len()).max().unwrap_or(0);
    for row in &mut cells {
        row.resize(cols, 0);
    }

    ParsedGrid { cells, spawn }
}

fn parse_row(body: &str) -> Option<(Vec<i64>, Option<usize>)> {
    let mut row = Vec::new();
    let mut spawn_col = None;

    for token in body.split(',') {
        let token = token.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if token.is_empty() {
            continue;
        }
        if token == "*" {
            spawn_col = Some(row.len());
            row.push(0);
            continue;
        }
        match parse_integer(token) {
            Some(value) => row.push(value),
            None => {
                log::warn!("dropping grid row [{body}]: {token:?} is not an integer");
                return None;
            }
        }
    }

    if row.is_empty() {
        return None;
    }
    Some((row, spawn_col))
}

fn parse_integer(token: &str) -> Option<i64> {
    if let Ok(value) = token.parse::<i64>() {
        return Some(value);
    }
    let value = token.parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(value as i64)
    } else {
        None
    }
}

fn to_tile_codes(cells: &[Vec<i64>]) -> Vec<Vec<u8>> {
    cells
        .iter()
        .map(|row| {
            row.iter()
                .map(|value| match u8::try_from(*value).ok().and_then(Tile::from_code) {
                    Some(tile) => tile.code(),
                    None => {
                        log::warn!("unknown tile code {value}, treating as empty");
                        Tile::Empty.code()
                    }
                })
                .collect()
        })
        .collect()
}

// Coin cells are the `1`s, reshaped to `rows x cols`.
fn to_coin_grid(cells: &[Vec<i64>], rows: usize, cols: usize) -> Vec<Vec<bool>> {
    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| cells.get(row).and_then(|r| r.get(col)).copied() == Some(1))
                .collect()
        })
        .collect()
}

fn build_level(index: usize, raw: RawLevel) -> LevelDescriptor {
    let title = raw
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Level {}", index + 1));

    let parsed = parse_grid(raw.map.as_deref().unwrap_or(""));
    let grid = to_tile_codes(&parsed.cells);
    let rows = grid.len();
    let cols = grid.first().map(|r| r.len()).unwrap_or(0);

    let coin_cells = raw
        .coin_map
        .as_deref()
        .map(|text| parse_grid(text).cells)
        .unwrap_or_default();
    let coin_grid = to_coin_grid(&coin_cells, rows, cols);

    let accent = raw.accent.as_deref().and_then(|text| {
        let color = parse_hex_color(text);
        if color.is_none() && !text.trim().is_empty() {
            log::warn!("level {title:?}: ignoring invalid accent color {text:?}");
        }
        color
    });

    let spawn = raw
        .spawn
        .map(|s| GridPos::new(s.row, s.col))
        .or(parsed.spawn);

    LevelDescriptor {
        title,
        grid,
        coin_grid,
        spawn,
        accent,
        tile_texture: raw.tile_texture.and_then(RawAssetRef::into_path),
        overlay_image: raw.overlay.and_then(RawAssetRef::into_path),
    }
}

// Trailing integer of the file stem: `coin_12.png` -> 12, `coin.png` -> 0.
pub fn frame_number(path: &str) -> u32 {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(file_name);
    let digits_start = stem
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(stem.len());
    stem[digits_start..].parse().unwrap_or(0)
}

pub fn sort_coin_frames(mut frames: Vec<String>) -> Vec<String> {
    frames.sort_by_key(|path| frame_number(path));
    frames
}

pub fn parse_content(json: &str, source: &Path) -> Result<Content, ContentError> {
    let raw: RawContent = serde_json::from_str(json).map_err(|err| ContentError::Json {
        path: source.to_path_buf(),
        source: err,
    })?;

    let levels = raw
        .level
        .into_iter()
        .enumerate()
        .map(|(i, level)| build_level(i, level))
        .collect();

    let frames = raw
        .assets
        .into_iter()
        .next()
        .map(|block| {
            block
                .frames
                .into_iter()
                .filter_map(RawAssetRef::into_path)
                .collect()
        })
        .unwrap_or_default();

    Ok(Content {
        levels,
        coin_frames: sort_coin_frames(frames),
    })
}

pub fn load_content(path: impl AsRef<Path>) -> Result<Content, ContentError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_content(&s, path)
}

// Loads the content export, never failing: missing or broken content gives the built-in level.
pub fn load_content_or_default(path: impl AsRef<Path>) -> Content {
    let mut content = match load_content(path) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("{err}; starting with the built-in level");
            Content {
                levels: vec![],
                coin_frames: vec![],
            }
        }
    };

    if content.levels.is_empty() {
        content.levels.push(default_level());
    }
    log::info!(
        "loaded {} level(s), {} coin frame(s)",
        content.levels.len(),
        content.coin_frames.len()
    );
    content
}

pub fn default_level() -> LevelDescriptor {
    let grid: Vec<Vec<u8>> = vec![
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 0, 0, 0, 0, 0, 1, 1, 0, 0, 1, 0],
        vec![0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 0, 0, 0],
        vec![0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0],
        vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 3],
        vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    ];
    let mut coin_grid = vec![vec![false; DEFAULT_COLS]; DEFAULT_ROWS];
    for (col, row) in [(2, 3), (5, 4), (8, 3), (10, 5), (11, 6), (6, 2)] {
        coin_grid[row][col] = true;
    }

    LevelDescriptor {
        title: String::from("Level 1"),
        grid,
        coin_grid,
        spawn: Some(GridPos::new(6, 1)),
        accent: None,
        tile_texture: None,
        overlay_image: None,
    }
}

// src/loader/json_loader.rs
use crate::animation::{Animation, Frame};
use crate::codec::{decode_tile_data, Compression, Encoding};
use crate::color::HexColor;
use crate::error::MapError;
use crate::layer::{Layer, MapObject, ObjectGroup, ObjectShape};
use crate::map::Map;
use crate::properties::{Properties, Property};
use crate::tile::TileCell;
use crate::tileset::{TileOverride, Tileset, TilesetImage};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
struct JsonMap {
    #[serde(default)]
    version: JsonValue,
    #[serde(default)]
    orientation: String,
    #[serde(default)]
    renderorder: String,
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    backgroundcolor: HexColor,
    #[serde(default)]
    layers: Vec<JsonLayer>,
    #[serde(default)]
    tilesets: Vec<JsonTilesetRef>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonLayerData {
    Gids(Vec<u32>),
    Encoded(String),
}

#[derive(Deserialize)]
struct JsonLayer {
    #[serde(rename = "type", default = "tile_layer")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    data: Option<JsonLayerData>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default = "one")]
    opacity: f32,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    compression: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    objects: Vec<JsonObject>,
    /// Children of a `group` layer.
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

fn tile_layer() -> String {
    "tilelayer".to_owned()
}
fn default_true() -> bool {
    true
}
fn one() -> f32 {
    1.0
}

#[derive(Deserialize)]
struct JsonTilesetRef {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(flatten)]
    inline: JsonTileset,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonTileset {
    name: String,
    tilewidth: u32,
    tileheight: u32,
    spacing: u32,
    margin: u32,
    image: String,
    imagewidth: u32,
    imageheight: u32,
    properties: Vec<JsonProperty>,
    tiles: Vec<JsonTile>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct JsonTile {
    id: u32,
    image: Option<String>,
    imagewidth: u32,
    imageheight: u32,
    animation: Vec<JsonFrame>,
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonFrame {
    tileid: u32,
    duration: u64,
}

#[derive(Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default)]
    value: JsonValue,
}

#[derive(Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    rotation: f32,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    point: bool,
    #[serde(default)]
    ellipse: bool,
    #[serde(default)]
    polygon: Vec<JsonObjectPoint>,
    #[serde(default)]
    polyline: Vec<JsonObjectPoint>,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Deserialize)]
struct JsonObjectPoint {
    x: f32,
    y: f32,
}

fn text_value(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

fn properties_from_json(props: Vec<JsonProperty>) -> Properties {
    props
        .into_iter()
        .map(|p| Property {
            name: p.name,
            value: text_value(p.value),
        })
        .collect()
}

fn object_from_json(obj: JsonObject) -> MapObject {
    let shape = if let Some(gid) = obj.gid {
        ObjectShape::Tile(TileCell::from_raw(gid))
    } else if obj.point {
        ObjectShape::Point
    } else if obj.ellipse {
        ObjectShape::Ellipse
    } else if !obj.polygon.is_empty() {
        ObjectShape::Polygon(obj.polygon.into_iter().map(|p| (p.x, p.y)).collect())
    } else if !obj.polyline.is_empty() {
        ObjectShape::Polyline(obj.polyline.into_iter().map(|p| (p.x, p.y)).collect())
    } else {
        ObjectShape::Rectangle
    };

    let class_name = if !obj.class.is_empty() {
        obj.class
    } else {
        obj.kind
    };

    MapObject {
        id: obj.id,
        name: obj.name,
        class_name,
        x: obj.x,
        y: obj.y,
        width: obj.width,
        height: obj.height,
        rotation: obj.rotation,
        visible: obj.visible,
        shape,
        properties: properties_from_json(obj.properties),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, MapError> {
    let txt = std::fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&txt).map_err(|source| MapError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a Tiled JSON map file, resolving external tilesets next to it.
pub fn decode_map_file(path: &Path) -> Result<Map, MapError> {
    if path.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(MapError::InvalidMap(format!(
            "Map file must be a JSON file: {}",
            path.display()
        )));
    }

    let j: JsonMap = read_json(path)?;
    let map_dir = path
        .parent()
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./"));

    build_map(j, map_dir)
}

/// Parses a Tiled JSON map held in memory.
pub fn decode_map_str(text: &str, base_dir: PathBuf) -> Result<Map, MapError> {
    let j: JsonMap = serde_json::from_str(text).map_err(|source| MapError::Json {
        path: base_dir.clone(),
        source,
    })?;
    build_map(j, base_dir)
}

fn build_map(j: JsonMap, map_dir: PathBuf) -> Result<Map, MapError> {
    let mut tilesets = Vec::with_capacity(j.tilesets.len());
    for ts in j.tilesets {
        tilesets.push(tileset_from_json(ts, &map_dir)?);
    }
    tilesets.sort_by_key(|t| t.first_gid);

    let mut map = Map {
        version: text_value(j.version),
        orientation: j.orientation,
        render_order: j.renderorder,
        width: j.width,
        height: j.height,
        tile_width: j.tilewidth,
        tile_height: j.tileheight,
        background_color: j.backgroundcolor,
        properties: properties_from_json(j.properties),
        tilesets,
        layers: Vec::new(),
        object_groups: Vec::new(),
        base_dir: map_dir,
    };

    for layer in j.layers {
        push_layer(&mut map, layer, true, 1.0)?;
    }

    Ok(map)
}

fn tileset_from_json(entry: JsonTilesetRef, map_dir: &Path) -> Result<Tileset, MapError> {
    let (body, source) = match entry.source {
        Some(source) if !source.is_empty() => {
            if !source.ends_with(".json") {
                return Err(MapError::InvalidMap(format!(
                    "External tileset must be JSON: {source}"
                )));
            }
            let ts_path = map_dir.join(&source);
            debug!("loading external tileset {}", ts_path.display());
            let body: JsonTileset = read_json(&ts_path)?;
            (body, Some(source))
        }
        _ => (entry.inline, None),
    };

    // images inside an external tileset are relative to that tileset's file
    let image_dir: Option<PathBuf> = source
        .as_deref()
        .and_then(|s| Path::new(s).parent())
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf);
    let relative = |image: String| match &image_dir {
        Some(dir) if !image.is_empty() => dir.join(image).to_string_lossy().into_owned(),
        _ => image,
    };

    let mut tiles: Vec<TileOverride> = body
        .tiles
        .into_iter()
        .map(|tile| TileOverride {
            id: tile.id,
            image: tile.image.map(|source| TilesetImage {
                source: relative(source),
                width: tile.imagewidth,
                height: tile.imageheight,
            }),
            animation: (!tile.animation.is_empty()).then(|| {
                Animation::new(
                    tile.animation
                        .into_iter()
                        .map(|f| Frame {
                            tile_id: f.tileid,
                            duration_ms: f.duration,
                        })
                        .collect(),
                )
            }),
            properties: properties_from_json(tile.properties),
        })
        .collect();
    tiles.sort_by_key(|t| t.id);

    Ok(Tileset {
        first_gid: entry.firstgid,
        name: body.name,
        source,
        tile_width: body.tilewidth,
        tile_height: body.tileheight,
        spacing: body.spacing,
        margin: body.margin,
        image: TilesetImage {
            source: relative(body.image),
            width: body.imagewidth,
            height: body.imageheight,
        },
        tiles,
        properties: properties_from_json(body.properties),
    })
}

fn layer_cells(layer: &JsonLayer) -> Result<Vec<TileCell>, MapError> {
    match &layer.data {
        None => Ok(Vec::new()),
        Some(JsonLayerData::Gids(gids)) => Ok(gids.iter().map(|&g| TileCell::from_raw(g)).collect()),
        Some(JsonLayerData::Encoded(text)) => {
            let encoding: Encoding = layer.encoding.as_deref().unwrap_or("").parse()?;
            let compression: Compression = layer.compression.as_deref().unwrap_or("").parse()?;
            decode_tile_data(text.as_bytes(), encoding, compression)
        }
    }
}

/// Appends a layer to the map; group layers are flattened in order, passing
/// their visibility and opacity down to their children.
fn push_layer(map: &mut Map, l: JsonLayer, visible: bool, opacity: f32) -> Result<(), MapError> {
    let visible = visible && l.visible;
    let opacity = opacity * l.opacity;

    match l.kind.as_str() {
        "tilelayer" => {
            let cells = layer_cells(&l)?;
            map.layers.push(Layer {
                name: l.name,
                width: l.width,
                height: l.height,
                visible,
                opacity,
                properties: properties_from_json(l.properties),
                cells,
            });
        }
        "objectgroup" => map.object_groups.push(ObjectGroup {
            name: l.name,
            color: l.color,
            opacity,
            visible,
            properties: properties_from_json(l.properties),
            objects: l.objects.into_iter().map(object_from_json).collect(),
        }),
        "group" => {
            for child in l.layers {
                push_layer(map, child, visible, opacity)?;
            }
        }
        other => warn!("skipping layer '{}' of unsupported type '{other}'", l.name),
    }
    Ok(())
}

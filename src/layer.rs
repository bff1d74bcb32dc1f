use crate::properties::Properties;
use crate::tile::TileCell;

/// A grid of tile cells, drawn in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub visible: bool,
    /// Carried for consumers; the compositor draws at full opacity.
    pub opacity: f32,
    pub properties: Properties,
    /// Row-major, `width * height` cells (or none for a layer without data).
    pub cells: Vec<TileCell>,
}

impl Default for Layer {
    fn default() -> Self {
        Layer {
            name: String::new(),
            width: 0,
            height: 0,
            visible: true,
            opacity: 1.0,
            properties: Properties::new(),
            cells: Vec::new(),
        }
    }
}

impl Layer {
    /// Grid position `(col, row)` of the cell at `index`.
    pub fn position(&self, index: usize) -> (u32, u32) {
        let width = self.width.max(1) as usize;
        ((index % width) as u32, (index / width) as u32)
    }

    pub fn cell(&self, col: u32, row: u32) -> Option<&TileCell> {
        if col >= self.width || row >= self.height {
            return None;
        }
        self.cells
            .get(row as usize * self.width as usize + col as usize)
    }

    /// Non-empty cells with their grid positions.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32, TileCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(i, cell)| {
                let (col, row) = self.position(i);
                (col, row, *cell)
            })
    }
}

/// Geometry of a map object.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectShape {
    Rectangle,
    Ellipse,
    Point,
    Polygon(Vec<(f32, f32)>),
    Polyline(Vec<(f32, f32)>),
    /// A tile placed as an object.
    Tile(TileCell),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    /// `class` in newer maps, `type` in older ones.
    pub class_name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
    pub visible: bool,
    pub shape: ObjectShape,
    pub properties: Properties,
}

/// An object layer. Loaded and kept with the map, not composited.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub color: Option<String>,
    pub opacity: f32,
    pub visible: bool,
    pub properties: Properties,
    pub objects: Vec<MapObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_row_major() {
        let layer = Layer {
            width: 3,
            height: 2,
            cells: (0..6).map(TileCell::from_raw).collect(),
            ..Default::default()
        };
        assert_eq!(layer.position(4), (1, 1));
        assert_eq!(layer.cell(2, 1).map(|c| c.gid), Some(5));
        assert_eq!(layer.cell(3, 0), None);

        let tiles: Vec<_> = layer.tiles().map(|(c, r, t)| (c, r, t.gid)).collect();
        assert_eq!(tiles.first(), Some(&(1, 0, 1)));
        assert_eq!(tiles.len(), 5);
    }
}

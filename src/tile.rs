use std::fmt;

pub const FLIP_H: u32 = 0x8000_0000; // bit 31
pub const FLIP_V: u32 = 0x4000_0000; // bit 30
pub const FLIP_D: u32 = 0x2000_0000; // bit 29
pub const FLIP_MASK: u32 = FLIP_H | FLIP_V | FLIP_D;
pub const GID_MASK: u32 = 0x1FFF_FFFF; // keep lower 29 bits

/// A raw global tile identifier, orientation bits included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileId(pub u32);

impl TileId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
    #[inline]
    pub fn clean(self) -> u32 {
        self.0 & GID_MASK
    }
    #[inline]
    pub fn flip_h(self) -> bool {
        (self.0 & FLIP_H) != 0
    }
    #[inline]
    pub fn flip_v(self) -> bool {
        (self.0 & FLIP_V) != 0
    }
    #[inline]
    pub fn flip_d(self) -> bool {
        (self.0 & FLIP_D) != 0
    }
}

/// Orientation flags carried next to a tile identifier.
///
/// When several flags are set they apply in the order diagonal, horizontal,
/// vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Orientation {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Orientation {
    pub const NONE: Orientation = Orientation {
        horizontal: false,
        vertical: false,
        diagonal: false,
    };

    pub fn from_bits(raw: u32) -> Self {
        let id = TileId(raw);
        Orientation {
            horizontal: id.flip_h(),
            vertical: id.flip_v(),
            diagonal: id.flip_d(),
        }
    }

    pub fn bits(self) -> u32 {
        let mut bits = 0;
        if self.horizontal {
            bits |= FLIP_H;
        }
        if self.vertical {
            bits |= FLIP_V;
        }
        if self.diagonal {
            bits |= FLIP_D;
        }
        bits
    }

    #[inline]
    pub fn is_none(self) -> bool {
        !(self.horizontal || self.vertical || self.diagonal)
    }

    /// The flag a single-mode consumer should honour; later flags in
    /// application order win.
    pub fn dominant(self) -> FlipMode {
        if self.vertical {
            FlipMode::Vertical
        } else if self.horizontal {
            FlipMode::Horizontal
        } else if self.diagonal {
            FlipMode::Diagonal
        } else {
            FlipMode::None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlipMode {
    Diagonal,
    Horizontal,
    Vertical,
    None,
}

impl fmt::Display for FlipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlipMode::Diagonal => "Diagonal",
            FlipMode::Horizontal => "Horizontal",
            FlipMode::Vertical => "Vertical",
            FlipMode::None => "None",
        };
        f.write_str(name)
    }
}

/// One decoded grid cell: the base identifier with its flags split off.
///
/// `gid == 0` means the cell is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileCell {
    pub gid: u32,
    pub orientation: Orientation,
}

impl TileCell {
    pub const EMPTY: TileCell = TileCell {
        gid: 0,
        orientation: Orientation::NONE,
    };

    pub fn new(gid: u32, orientation: Orientation) -> Self {
        TileCell {
            gid: gid & GID_MASK,
            orientation,
        }
    }

    pub fn from_raw(raw: u32) -> Self {
        TileCell {
            gid: TileId(raw).clean(),
            orientation: Orientation::from_bits(raw),
        }
    }

    /// Recombines the flags into the high bits.
    pub fn to_raw(self) -> u32 {
        (self.gid & GID_MASK) | self.orientation.bits()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.gid == 0
    }
}

impl From<TileId> for TileCell {
    fn from(id: TileId) -> Self {
        TileCell::from_raw(id.raw())
    }
}

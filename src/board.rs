use crate::bitboard::Bitboard;
use crate::piece::{Color, Piece, PieceKind};
use crate::square::Square;

/// Broken board invariants. These are never recoverable by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("no {0} king on the board")]
    MissingKing(Color),
    #[error("{1} {0} kings on the board")]
    MultipleKings(Color, u32),
    #[error("{0} and {1} occupy the same square")]
    Overlap(Piece, Piece),
}

/// One entry of the board snapshot handed to presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceDescriptor {
    pub piece: Piece,
    pub mask: Bitboard,
    pub value: u8,
}

/// 8×8 projection of the board, indexed `[row][file]` with row 0 = rank 1.
pub type Grid = [[Option<char>; 8]; 8];

/// Twelve disjoint occupancy masks, one per piece kind and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardState {
    masks: [Bitboard; 12],
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// The standard starting position.
    pub const fn new() -> Self {
        Self {
            masks: [
                Bitboard::new(0x0000_0000_0000_FF00), // P
                Bitboard::new(0x00FF_0000_0000_0000), // p
                Bitboard::new(0x0000_0000_0000_0081), // R
                Bitboard::new(0x8100_0000_0000_0000), // r
                Bitboard::new(0x0000_0000_0000_0042), // N
                Bitboard::new(0x4200_0000_0000_0000), // n
                Bitboard::new(0x0000_0000_0000_0024), // B
                Bitboard::new(0x2400_0000_0000_0000), // b
                Bitboard::new(0x0000_0000_0000_0008), // Q
                Bitboard::new(0x0800_0000_0000_0000), // q
                Bitboard::new(0x0000_0000_0000_0010), // K
                Bitboard::new(0x1000_0000_0000_0000), // k
            ],
        }
    }

    /// A board with no pieces. Only useful as a starting point for [`BoardState::put`].
    pub const fn empty() -> Self {
        Self {
            masks: [Bitboard::EMPTY; 12],
        }
    }

    /// Builds a board from `(symbol, square)` placements, e.g. `[('K', "e1"), ('k', "e8")]`.
    ///
    /// Returns `None` on an unknown symbol or square. Does not validate kings.
    pub fn from_placements<'a>(placements: impl IntoIterator<Item = (char, &'a str)>) -> Option<Self> {
        let mut board = Self::empty();
        for (symbol, square) in placements {
            let piece = Piece::from_symbol(symbol)?;
            let square = square.parse().ok()?;
            board.put(piece, square);
        }
        Some(board)
    }

    /// Mask of a single piece kind and color.
    #[inline]
    pub fn mask(&self, piece: Piece) -> Bitboard {
        self.masks[piece.index()]
    }

    /// Union of all twelve masks.
    pub fn occupancy(&self) -> Bitboard {
        self.masks.iter().fold(Bitboard::EMPTY, |acc, bb| acc | *bb)
    }

    /// Union of the six masks owned by `color`.
    pub fn by_color(&self, color: Color) -> Bitboard {
        Piece::ALL
            .iter()
            .filter(|p| p.color == color)
            .fold(Bitboard::EMPTY, |acc, p| acc | self.mask(*p))
    }

    /// The piece on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::ALL
            .iter()
            .copied()
            .find(|p| self.masks[p.index()].contains(square))
    }

    /// Lookup by raw position index; `None` for an empty square or an index outside 0..63.
    pub fn piece_at_index(&self, position: i32) -> Option<Piece> {
        let square = u8::try_from(position).ok().and_then(Square::new)?;
        self.piece_at(square)
    }

    /// True iff `square` holds a piece of the color opposing `color`.
    ///
    /// Only meaningful once the square is known to be occupied.
    #[inline]
    pub fn is_enemy(&self, color: Color, square: Square) -> bool {
        self.by_color(color.other()).contains(square)
    }

    #[inline]
    pub fn set_bit(&mut self, piece: Piece, square: Square) {
        self.masks[piece.index()].set(square);
    }

    #[inline]
    pub fn clear_bit(&mut self, piece: Piece, square: Square) {
        self.masks[piece.index()].clear(square);
    }

    #[inline]
    pub fn test_bit(&self, piece: Piece, square: Square) -> bool {
        self.masks[piece.index()].contains(square)
    }

    /// Places `piece` on `square`, removing whatever stood there.
    pub fn put(&mut self, piece: Piece, square: Square) {
        self.remove(square);
        self.set_bit(piece, square);
    }

    /// Removes and returns the piece on `square`.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.piece_at(square)?;
        self.clear_bit(piece, square);
        Some(piece)
    }

    /// Square of `color`'s king.
    ///
    /// Fails when the board does not hold exactly one such king.
    pub fn king_square(&self, color: Color) -> Result<Square, BoardError> {
        let kings = self.mask(Piece::new(PieceKind::King, color));
        match kings.count() {
            0 => Err(BoardError::MissingKing(color)),
            1 => kings.first().ok_or(BoardError::MissingKing(color)),
            n => Err(BoardError::MultipleKings(color, n)),
        }
    }

    /// Checks mask disjointness and the one-king-per-side invariant.
    pub fn validate(&self) -> Result<(), BoardError> {
        for (i, a) in Piece::ALL.iter().enumerate() {
            for b in &Piece::ALL[i + 1..] {
                if !(self.mask(*a) & self.mask(*b)).is_empty() {
                    return Err(BoardError::Overlap(*a, *b));
                }
            }
        }
        for color in Color::ALL {
            self.king_square(color)?;
        }
        Ok(())
    }

    /// Sum of piece values for one side.
    pub fn material(&self, color: Color) -> u32 {
        Piece::ALL
            .iter()
            .filter(|p| p.color == color)
            .map(|p| self.mask(*p).count() * u32::from(p.kind.value()))
            .sum()
    }

    /// All twelve `(piece, mask, value)` descriptors in mask order.
    pub fn descriptors(&self) -> [PieceDescriptor; 12] {
        Piece::ALL.map(|piece| PieceDescriptor {
            piece,
            mask: self.mask(piece),
            value: piece.kind.value(),
        })
    }

    /// Occupant symbols per square, for display only.
    pub fn grid(&self) -> Grid {
        let mut grid: Grid = [[None; 8]; 8];
        for piece in Piece::ALL {
            for square in self.mask(piece) {
                grid[square.row() as usize][square.file() as usize] = Some(piece.symbol());
            }
        }
        grid
    }
}

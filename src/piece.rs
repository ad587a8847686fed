use std::fmt;

/// Side owning a piece. `White` is the first player and moves on even half-move counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Index step of a forward pawn move.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }

    /// Row a pawn of this color may double-advance from.
    #[inline]
    pub const fn pawn_start_row(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Row a pawn of this color must stand on to capture en passant (its fifth rank).
    #[inline]
    pub const fn en_passant_row(self) -> i8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }

    /// Row on which a pawn of this color promotes.
    #[inline]
    pub const fn promotion_row(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "white",
            Color::Black => "black",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

/// Kinds a pawn may promote to, in the order they are offered.
pub const PROMOTION_CHOICES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
];

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Uppercase symbol (`P`, `R`, `N`, `B`, `Q`, `K`).
    pub const fn char(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Rook => 'R',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Parse a symbol of either case.
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_uppercase() {
            'P' => Some(PieceKind::Pawn),
            'R' => Some(PieceKind::Rook),
            'N' => Some(PieceKind::Knight),
            'B' => Some(PieceKind::Bishop),
            'Q' => Some(PieceKind::Queen),
            'K' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Material value; the king counts as zero.
    pub const fn value(self) -> u8 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }

    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Queen | PieceKind::Rook | PieceKind::Knight | PieceKind::Bishop
        )
    }
}

/// A piece kind owned by a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    /// All twelve pieces in mask order: each kind, white before black.
    pub const ALL: [Piece; 12] = {
        let mut all = [Piece::new(PieceKind::Pawn, Color::White); 12];
        let mut i = 0;
        while i < 12 {
            let color = if i % 2 == 0 { Color::White } else { Color::Black };
            all[i] = Piece::new(PieceKind::ALL[i / 2], color);
            i += 1;
        }
        all
    };

    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// Position of this piece's occupancy mask in a board's mask array.
    #[inline]
    pub const fn index(self) -> usize {
        let kind = match self.kind {
            PieceKind::Pawn => 0,
            PieceKind::Rook => 1,
            PieceKind::Knight => 2,
            PieceKind::Bishop => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        };
        kind * 2
            + match self.color {
                Color::White => 0,
                Color::Black => 1,
            }
    }

    /// Display symbol: uppercase for white, lowercase for black.
    pub const fn symbol(self) -> char {
        let c = self.kind.char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Piece> {
        let kind = PieceKind::from_char(symbol)?;
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

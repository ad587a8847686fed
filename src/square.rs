use std::fmt;
use std::str::FromStr;

/// Number of squares on the board.
pub const NUM_SQUARES: usize = 64;

/// A single square on the chess board.
///
/// Internally stores the position index `row * 8 + file` where:
/// - 0 = a1, 7 = h1
/// - 56 = a8, 63 = h8
///
/// Off-board coordinates are unrepresentable; "no selection" is `Option<Square>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Creates a new Square if the index is valid (0-63).
    #[inline]
    pub const fn new(idx: u8) -> Option<Self> {
        if (idx as usize) < NUM_SQUARES {
            Some(Square(idx))
        } else {
            None
        }
    }

    /// Creates a Square from zero-based file and row, if both are on the board.
    #[inline]
    pub const fn from_coords(file: i8, row: i8) -> Option<Self> {
        if file < 0 || file > 7 || row < 0 || row > 7 {
            None
        } else {
            Some(Square((row * 8 + file) as u8))
        }
    }

    /// Returns the position index (0-63).
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Zero-based file, 0 = a.
    #[inline]
    pub const fn file(self) -> i8 {
        (self.0 % 8) as i8
    }

    /// Zero-based row, 0 = rank 1.
    #[inline]
    pub const fn row(self) -> i8 {
        (self.0 / 8) as i8
    }

    /// Returns the file letter ('a'-'h') of this square.
    pub fn file_char(self) -> char {
        (b'a' + (self.0 % 8)) as char
    }

    /// Returns the rank digit ('1'-'8') of this square.
    pub fn rank_char(self) -> char {
        (b'1' + (self.0 / 8)) as char
    }

    /// Adds a raw index offset, returning `None` when the result leaves 0..63.
    ///
    /// This does not guard against wrapping across a board edge; callers
    /// compare row deltas for that.
    #[inline]
    pub const fn offset(self, delta: i8) -> Option<Self> {
        let next = self.0 as i16 + delta as i16;
        if next < 0 || next >= NUM_SQUARES as i16 {
            None
        } else {
            Some(Square(next as u8))
        }
    }

    /// Iterate all 64 squares from a1 to h8.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..NUM_SQUARES as u8).map(Square)
    }
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use bitboard_chess::square::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!(square.index(), 28);
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        let rank = rank.to_digit(10).ok_or(SquareParseError::BadRank)?;
        if !(1..=8).contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        Ok(Square((rank as u8 - 1) * 8 + (file as u8 - b'a')))
    }
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    #[error("file must be a-h")]
    BadFile,
    #[error("rank must be 1-8")]
    BadRank,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_square_creation() {
        assert!(Square::new(0).is_some());
        assert!(Square::new(63).is_some());
        assert!(Square::new(64).is_none());
        assert!(Square::new(255).is_none());
    }

    #[test_case(0, 0, 0; "a1")]
    #[test_case(7, 0, 7; "h1")]
    #[test_case(4, 3, 28; "e4")]
    #[test_case(7, 7, 63; "h8")]
    fn test_from_coords(file: i8, row: i8, index: u8) {
        let sq = Square::from_coords(file, row).unwrap();
        assert_eq!(sq.index(), index);
        assert_eq!(sq.file(), file);
        assert_eq!(sq.row(), row);
    }

    #[test_case(-1, -1; "no selection sentinel")]
    #[test_case(8, 0; "file past h")]
    #[test_case(0, 8; "row past 8")]
    fn test_from_coords_off_board(file: i8, row: i8) {
        assert_eq!(Square::from_coords(file, row), None);
    }

    #[test]
    fn test_coords_index_roundtrip_is_total() {
        for sq in Square::all() {
            assert_eq!(Square::from_coords(sq.file(), sq.row()), Some(sq));
        }
        assert_eq!(Square::all().count(), NUM_SQUARES);
    }

    #[test]
    fn test_square_from_str() {
        assert_eq!("a1".parse::<Square>().unwrap().index(), 0);
        assert_eq!("h1".parse::<Square>().unwrap().index(), 7);
        assert_eq!("a8".parse::<Square>().unwrap().index(), 56);
        assert_eq!("h8".parse::<Square>().unwrap().index(), 63);
        assert_eq!("E4".parse::<Square>(), "e4".parse::<Square>());
    }

    #[test_case("", SquareParseError::WrongLength)]
    #[test_case("abc", SquareParseError::WrongLength)]
    #[test_case("a9", SquareParseError::BadRank)]
    #[test_case("a0", SquareParseError::BadRank)]
    #[test_case("i1", SquareParseError::BadFile)]
    fn test_square_from_str_invalid(input: &str, expected: SquareParseError) {
        assert_eq!(input.parse::<Square>(), Err(expected));
    }

    #[test]
    fn test_square_display() {
        assert_eq!(Square::new(0).unwrap().to_string(), "a1");
        assert_eq!(Square::new(28).unwrap().to_string(), "e4");
        assert_eq!(Square::new(63).unwrap().to_string(), "h8");
    }

    #[test]
    fn test_offset_stays_in_index_range() {
        let h8 = Square::new(63).unwrap();
        assert_eq!(h8.offset(1), None);
        assert_eq!(h8.offset(-8), Square::new(55));
        assert_eq!(Square::new(0).unwrap().offset(-1), None);
    }
}

//! Colours for each players and their pieces.

/// Number of different colours (2).
pub const NUM_COLOURS: usize = 2;

/// Colour enumeration.
#[repr(u8)]
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum Colour {
    White = 0,
    Black = 1,
}
impl Colour {
    /// Both colours, white first.
    pub const COLOURS: [Self; NUM_COLOURS] = [Colour::White, Colour::Black];

    /// Inverts the colour in place.
    /// # Example
    /// ```
    /// # use gambit::game::colour::Colour;
    /// let mut side_to_move = Colour::White;
    /// side_to_move.invert();
    /// assert_eq!(side_to_move, Colour::Black);
    /// ```
    #[inline]
    pub fn invert(&mut self) {
        *self = self.inverse()
    }

    /// Returns the inverse of this colour.
    /// # Example
    /// ```
    /// # use gambit::game::colour::Colour;
    /// assert_eq!(Colour::White.inverse(), Colour::Black);
    /// ```
    #[inline]
    pub const fn inverse(&self) -> Self {
        if self.is_black() {
            Colour::White
        } else {
            Colour::Black
        }
    }

    /// Checks if the colour variant is white.
    #[inline]
    pub const fn is_white(&self) -> bool {
        matches!(self, Colour::White)
    }

    /// Checks if the colour variant is black.
    #[inline]
    pub const fn is_black(&self) -> bool {
        matches!(self, Colour::Black)
    }

    /// Row holding this colour's king and rooks at the start of a game.
    #[inline]
    pub const fn home_row(&self) -> u8 {
        if self.is_black() {
            0
        } else {
            7
        }
    }

    /// Row this colour's pawns start from.
    #[inline]
    pub const fn pawn_row(&self) -> u8 {
        if self.is_black() {
            1
        } else {
            6
        }
    }

    /// Row this colour's pawns promote on.
    #[inline]
    pub const fn promotion_row(&self) -> u8 {
        if self.is_black() {
            7
        } else {
            0
        }
    }

    /// Row delta of a pawn push. White moves toward row 0.
    #[inline]
    pub const fn pawn_direction(&self) -> i8 {
        if self.is_black() {
            1
        } else {
            -1
        }
    }

    /// Side-to-move symbol used in position strings.
    #[inline]
    pub const fn symbol(&self) -> char {
        if self.is_black() {
            'b'
        } else {
            'w'
        }
    }
}
impl std::fmt::Display for Colour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", if self.is_black() { "Black" } else { "White" })
    }
}

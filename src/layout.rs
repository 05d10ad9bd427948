//! Output column layouts.
//!
//! A [`Layout`] combines the number of keys per player with an [`Arrangement`] telling
//! whose notes are converted and where they land:
//!
//! | Arrangement | Columns | Player A | Player B |
//! |---|---|---|---|
//! | [`SoloA`](Arrangement::SoloA), [`SoloB`](Arrangement::SoloB), [`Sync`](Arrangement::Sync) | `K` | `0..K` | `0..K` |
//! | [`CoopNormal`](Arrangement::CoopNormal) | `2K` | `K..2K` | `0..K` |
//! | [`CoopSwapped`](Arrangement::CoopSwapped) | `2K` | `0..K` | `K..2K` |
//!
//! Layouts also have a two-digit mode code, `K * 10 + d` where `d` is the arrangement
//! digit (`1` solo A, `2` solo B, `3` sync, `4` co-op normal, `5` co-op swapped).
//! For example `44` is a 4 keys co-op map, 8 columns wide.

use std::{fmt, str::FromStr};

use crate::{
    error::ConfigError,
    fnf::{FnfChart, Player, PlayerFilter},
    note::Note,
};

/// Number of keys per player, within `4..=9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct KeyCount(u8);

impl KeyCount {
    /// Smallest supported key count.
    pub const MIN: u8 = 4;
    /// Largest supported key count.
    pub const MAX: u8 = 9;

    /// Creates a key count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedKeyCount`] outside `4..=9`.
    pub const fn new(keys: u8) -> Result<Self, ConfigError> {
        if keys < Self::MIN || keys > Self::MAX {
            return Err(ConfigError::UnsupportedKeyCount(keys));
        }
        Ok(Self(keys))
    }

    /// Gets the number of keys.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for KeyCount {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<KeyCount> for u8 {
    fn from(value: KeyCount) -> Self {
        value.0
    }
}

/// Whose notes are converted and how they share the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Arrangement {
    /// Player A only.
    SoloA,
    /// Player B only.
    SoloB,
    /// Both players on the same columns at once.
    Sync,
    /// Player B on the left half, player A on the right half, as on screen in game.
    CoopNormal,
    /// Player A on the left half, player B on the right half.
    CoopSwapped,
}

impl Arrangement {
    const ALL: [Self; 5] = [
        Self::SoloA,
        Self::SoloB,
        Self::Sync,
        Self::CoopNormal,
        Self::CoopSwapped,
    ];

    /// Whether each player gets a half of the columns.
    #[must_use]
    pub const fn is_coop(self) -> bool {
        matches!(self, Self::CoopNormal | Self::CoopSwapped)
    }

    const fn digit(self) -> u8 {
        match self {
            Self::SoloA => 1,
            Self::SoloB => 2,
            Self::Sync => 3,
            Self::CoopNormal => 4,
            Self::CoopSwapped => 5,
        }
    }
}

/// A key count combined with an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    keys: KeyCount,
    arrangement: Arrangement,
}

impl Layout {
    /// Creates a layout.
    #[must_use]
    pub const fn new(keys: KeyCount, arrangement: Arrangement) -> Self {
        Self { keys, arrangement }
    }

    /// Parses a two-digit mode code such as `41` or `45`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownModeCode`] if the last digit names no arrangement
    /// and [`ConfigError::UnsupportedKeyCount`] if the first one is out of range.
    pub fn from_mode_code(code: u8) -> Result<Self, ConfigError> {
        let arrangement = Arrangement::ALL
            .into_iter()
            .find(|arrangement| arrangement.digit() == code % 10)
            .ok_or(ConfigError::UnknownModeCode(code))?;
        Ok(Self::new(KeyCount::new(code / 10)?, arrangement))
    }

    /// The two-digit mode code of this layout.
    #[must_use]
    pub const fn mode_code(self) -> u8 {
        self.keys.get() * 10 + self.arrangement.digit()
    }

    /// Keys per player.
    #[must_use]
    pub const fn keys(self) -> KeyCount {
        self.keys
    }

    /// The arrangement.
    #[must_use]
    pub const fn arrangement(self) -> Arrangement {
        self.arrangement
    }

    /// Number of output columns.
    #[must_use]
    pub const fn columns(self) -> usize {
        let keys = self.keys.get() as usize;
        if self.arrangement.is_coop() {
            keys * 2
        } else {
            keys
        }
    }

    /// Maps a folded lane (`0..K`) of `player` to its output column.
    #[must_use]
    pub const fn column(self, player: Player, lane: usize) -> usize {
        let shift = match (self.arrangement, player) {
            (Arrangement::CoopNormal, Player::A) | (Arrangement::CoopSwapped, Player::B) => {
                self.keys.get() as usize
            }
            _ => 0,
        };
        shift + lane
    }

    /// Players from the leftmost half to the rightmost one, for co-op arrangements.
    const fn halves(self) -> [Player; 2] {
        match self.arrangement {
            Arrangement::CoopNormal => [Player::B, Player::A],
            _ => [Player::A, Player::B],
        }
    }

    /// Collects the notes of `chart` placed in this layout's columns, sorted by offset.
    ///
    /// Synchronized layouts may hold two notes at the same offset and column, one per
    /// player; they are left for the overlap resolver.
    #[must_use]
    pub fn notes(self, chart: &FnfChart) -> Vec<Note> {
        match self.arrangement {
            Arrangement::SoloA => chart.notes_for(PlayerFilter::Only(Player::A), self.keys),
            Arrangement::SoloB => chart.notes_for(PlayerFilter::Only(Player::B), self.keys),
            Arrangement::Sync => chart.notes_for(PlayerFilter::Both, self.keys),
            Arrangement::CoopNormal | Arrangement::CoopSwapped => {
                let mut notes: Vec<Note> = self
                    .halves()
                    .into_iter()
                    .flat_map(|player| {
                        chart
                            .notes_for(PlayerFilter::Only(player), self.keys)
                            .into_iter()
                            .map(move |note| Note {
                                column: self.column(player, note.column),
                                ..note
                            })
                    })
                    .collect();
                notes.sort_by_key(|note| note.offset);
                notes
            }
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrangement = match self.arrangement {
            Arrangement::SoloA => "player A",
            Arrangement::SoloB => "player B",
            Arrangement::Sync => "both players",
            Arrangement::CoopNormal => "co-op B|A",
            Arrangement::CoopSwapped => "co-op A|B",
        };
        write!(f, "{}K {arrangement}", self.columns())
    }
}

impl FromStr for Layout {
    type Err = ConfigError;

    /// Parses a mode code such as `"43"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s
            .trim()
            .parse::<u8>()
            .map_err(|_| ConfigError::UnknownModeCode(0))?;
        Self::from_mode_code(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_count_range() {
        assert_eq!(KeyCount::new(3), Err(ConfigError::UnsupportedKeyCount(3)));
        assert_eq!(KeyCount::new(10), Err(ConfigError::UnsupportedKeyCount(10)));
        assert_eq!(KeyCount::new(9).map(KeyCount::get), Ok(9));
    }

    #[test]
    fn test_mode_codes() {
        for code in [41, 42, 43, 44, 45, 51, 63, 74, 95] {
            assert_eq!(Layout::from_mode_code(code).unwrap().mode_code(), code);
        }
        assert_eq!(
            Layout::from_mode_code(46),
            Err(ConfigError::UnknownModeCode(46))
        );
        assert_eq!(
            Layout::from_mode_code(31),
            Err(ConfigError::UnsupportedKeyCount(3))
        );
        assert_eq!("45".parse::<Layout>().unwrap().columns(), 8);
        assert!("x".parse::<Layout>().is_err());
    }

    #[test]
    fn test_column_table() {
        let keys = KeyCount::new(4).unwrap();
        for arrangement in [Arrangement::SoloA, Arrangement::SoloB, Arrangement::Sync] {
            let layout = Layout::new(keys, arrangement);
            assert_eq!(layout.columns(), 4);
            assert_eq!(layout.column(Player::A, 3), 3);
            assert_eq!(layout.column(Player::B, 1), 1);
        }

        let normal = Layout::new(keys, Arrangement::CoopNormal);
        assert_eq!(normal.columns(), 8);
        assert_eq!(normal.column(Player::A, 0), 4);
        assert_eq!(normal.column(Player::B, 3), 3);

        let swapped = Layout::new(keys, Arrangement::CoopSwapped);
        assert_eq!(swapped.column(Player::A, 3), 3);
        assert_eq!(swapped.column(Player::B, 0), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(Layout::from_mode_code(44).unwrap().to_string(), "8K co-op B|A");
        assert_eq!(Layout::from_mode_code(71).unwrap().to_string(), "7K player A");
    }
}

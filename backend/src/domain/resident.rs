//! The closed set of household residents.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A member of the household who can be assigned chores.
///
/// Residents are identified by name; the set is fixed and every task or
/// bathroom assignment refers to exactly one of them.
///
/// # Examples
/// ```
/// use chore_roster::domain::Resident;
///
/// let resident: Resident = "illy".parse().unwrap();
/// assert_eq!(resident, Resident::Illy);
/// assert_eq!(resident.to_string(), "Illy");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub enum Resident {
    /// Perpetua.
    Perpetua,
    /// Eman.
    Eman,
    /// Allegra.
    Allegra,
    /// Atilla.
    Atilla,
    /// Dania.
    Dania,
    /// Illy.
    Illy,
}

impl Resident {
    /// Every resident in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Perpetua,
        Self::Eman,
        Self::Allegra,
        Self::Atilla,
        Self::Dania,
        Self::Illy,
    ];

    /// Display name, also used as the persisted value.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Perpetua => "Perpetua",
            Self::Eman => "Eman",
            Self::Allegra => "Allegra",
            Self::Atilla => "Atilla",
            Self::Dania => "Dania",
            Self::Illy => "Illy",
        }
    }
}

impl fmt::Display for Resident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raised when a name does not belong to the household.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resident: {0}")]
pub struct UnknownResident(pub String);

impl FromStr for Resident {
    type Err = UnknownResident;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|resident| resident.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownResident(trimmed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Perpetua", Resident::Perpetua)]
    #[case("eman", Resident::Eman)]
    #[case("  ALLEGRA ", Resident::Allegra)]
    #[case("Dania", Resident::Dania)]
    fn parses_names_case_insensitively(#[case] raw: &str, #[case] expected: Resident) {
        assert_eq!(raw.parse::<Resident>(), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Bob")]
    #[case("Illy2")]
    fn rejects_names_outside_household(#[case] raw: &str) {
        assert!(raw.parse::<Resident>().is_err());
    }

    #[rstest]
    fn display_round_trips_through_parse() {
        for resident in Resident::ALL {
            assert_eq!(resident.to_string().parse::<Resident>(), Ok(resident));
        }
    }

    #[rstest]
    fn serialises_as_display_name() {
        let value = serde_json::to_value(Resident::Atilla).expect("serialise resident");
        assert_eq!(value, serde_json::json!("Atilla"));
    }
}

//! Weekly rotation rules.
//!
//! Each standing task and each bathroom has a fixed, ordered sequence of
//! residents. A new roster advances every sequence by exactly one step from
//! the most recent earlier roster; bathrooms additionally alternate between
//! deep and basic cleaning. Everything here is pure so the rules can be
//! exercised without a store.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BathroomAssignment, Resident, Task};

/// A recurring weekly chore with its own rotation sequence.
///
/// The kind is persisted separately from the display name so renaming a task
/// never breaks the link to the previous week.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StandingTask {
    /// Take out the trash and replace the bag.
    Trash,
    /// Sweep or vacuum and mop floors.
    Sweeping,
    /// Dust and wipe surfaces.
    Dusting,
}

impl StandingTask {
    /// Every standing task in display order.
    pub const ALL: [Self; 3] = [Self::Trash, Self::Sweeping, Self::Dusting];

    /// Stable storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Trash => "trash",
            Self::Sweeping => "sweeping",
            Self::Dusting => "dusting",
        }
    }

    /// Default display name given to newly derived tasks.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Trash => "Take Out Trash & Replace Bag",
            Self::Sweeping => "Sweep/Vacuum & Mop Floors",
            Self::Dusting => "Dust & Wipe Surfaces",
        }
    }
}

/// Raised when a stored standing task key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown standing task: {0}")]
pub struct UnknownStandingTask(pub String);

impl FromStr for StandingTask {
    type Err = UnknownStandingTask;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| UnknownStandingTask(s.to_owned()))
    }
}

/// One of the three household bathrooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum BathroomNumber {
    /// Bathroom 1.
    One,
    /// Bathroom 2.
    Two,
    /// Bathroom 3.
    Three,
}

impl BathroomNumber {
    /// Every bathroom in ascending order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// Numeric label, 1 through 3.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl From<BathroomNumber> for u8 {
    fn from(value: BathroomNumber) -> Self {
        value.number()
    }
}

/// Raised when a bathroom number falls outside 1 through 3.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bathroom number must be between 1 and 3, got {0}")]
pub struct InvalidBathroomNumber(pub i64);

impl TryFrom<u8> for BathroomNumber {
    type Error = InvalidBathroomNumber;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for BathroomNumber {
    type Error = InvalidBathroomNumber;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(InvalidBathroomNumber(other)),
        }
    }
}

impl fmt::Display for BathroomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// How thoroughly a bathroom should be cleaned this week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CleaningMode {
    /// Surface clean.
    Basic,
    /// Full clean; the mode for a bathroom's first week.
    #[default]
    Deep,
}

impl CleaningMode {
    /// The other mode.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Basic => Self::Deep,
            Self::Deep => Self::Basic,
        }
    }

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Deep => "deep",
        }
    }
}

/// Raised when a cleaning mode string is neither `basic` nor `deep`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cleaning mode must be basic or deep, got {0}")]
pub struct UnknownCleaningMode(pub String);

impl FromStr for CleaningMode {
    type Err = UnknownCleaningMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "deep" => Ok(Self::Deep),
            _ => Err(UnknownCleaningMode(s.to_owned())),
        }
    }
}

/// Position within a rotation sequence and the resident found there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSlot {
    /// Zero-based index into the sequence.
    pub index: u32,
    /// Resident at `index`.
    pub resident: Resident,
}

/// Non-empty ordered list of residents sharing one chore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSequence {
    head: Resident,
    tail: Vec<Resident>,
}

/// Raised when building a sequence with no residents.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rotation sequence must contain at least one resident")]
pub struct EmptyRotationSequence;

impl RotationSequence {
    /// Build a sequence from an ordered list of residents.
    ///
    /// # Examples
    /// ```
    /// use chore_roster::domain::{Resident, RotationSequence};
    ///
    /// let sequence = RotationSequence::new(vec![Resident::Eman, Resident::Allegra]).unwrap();
    /// assert_eq!(sequence.advance(Some(1)).resident, Resident::Eman);
    /// ```
    pub fn new(residents: Vec<Resident>) -> Result<Self, EmptyRotationSequence> {
        let mut iter = residents.into_iter();
        let head = iter.next().ok_or(EmptyRotationSequence)?;
        Ok(Self {
            head,
            tail: iter.collect(),
        })
    }

    fn of(head: Resident, tail: &[Resident]) -> Self {
        Self {
            head,
            tail: tail.to_vec(),
        }
    }

    /// Number of residents in the sequence.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tail.len().saturating_add(1)
    }

    /// Sequences are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    fn resident_at(&self, index: usize) -> Resident {
        index
            .checked_sub(1)
            .and_then(|offset| self.tail.get(offset).copied())
            .unwrap_or(self.head)
    }

    /// Compute the slot following `previous`.
    ///
    /// Without a previous index the rotation starts at the first resident.
    /// A stale index outside the sequence also restarts at zero.
    #[must_use]
    pub fn advance(&self, previous: Option<u32>) -> RotationSlot {
        let len = self.len();
        let next = previous
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < len)
            .and_then(|index| index.saturating_add(1).checked_rem(len))
            .unwrap_or(0);
        RotationSlot {
            index: u32::try_from(next).unwrap_or(0),
            resident: self.resident_at(next),
        }
    }
}

/// Rotation sequences for every standing task and bathroom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPlan {
    trash: RotationSequence,
    sweeping: RotationSequence,
    dusting: RotationSequence,
    bathroom_one: RotationSequence,
    bathroom_two: RotationSequence,
    bathroom_three: RotationSequence,
}

impl Default for RotationPlan {
    fn default() -> Self {
        use Resident::{Allegra, Atilla, Dania, Eman, Illy, Perpetua};

        Self {
            trash: RotationSequence::of(Perpetua, &[Eman, Allegra]),
            sweeping: RotationSequence::of(Atilla, &[Dania, Illy, Eman]),
            dusting: RotationSequence::of(Illy, &[Allegra, Atilla, Perpetua]),
            bathroom_one: RotationSequence::of(Eman, &[Allegra]),
            bathroom_two: RotationSequence::of(Perpetua, &[Dania]),
            bathroom_three: RotationSequence::of(Atilla, &[Illy]),
        }
    }
}

impl RotationPlan {
    /// Replace the sequence used for a standing task.
    #[must_use]
    pub fn with_task_sequence(mut self, kind: StandingTask, sequence: RotationSequence) -> Self {
        match kind {
            StandingTask::Trash => self.trash = sequence,
            StandingTask::Sweeping => self.sweeping = sequence,
            StandingTask::Dusting => self.dusting = sequence,
        }
        self
    }

    /// Replace the sequence used for a bathroom.
    #[must_use]
    pub fn with_bathroom_sequence(
        mut self,
        bathroom: BathroomNumber,
        sequence: RotationSequence,
    ) -> Self {
        match bathroom {
            BathroomNumber::One => self.bathroom_one = sequence,
            BathroomNumber::Two => self.bathroom_two = sequence,
            BathroomNumber::Three => self.bathroom_three = sequence,
        }
        self
    }

    /// Sequence for a standing task.
    #[must_use]
    pub const fn task_sequence(&self, kind: StandingTask) -> &RotationSequence {
        match kind {
            StandingTask::Trash => &self.trash,
            StandingTask::Sweeping => &self.sweeping,
            StandingTask::Dusting => &self.dusting,
        }
    }

    /// Sequence for a bathroom.
    #[must_use]
    pub const fn bathroom_sequence(&self, bathroom: BathroomNumber) -> &RotationSequence {
        match bathroom {
            BathroomNumber::One => &self.bathroom_one,
            BathroomNumber::Two => &self.bathroom_two,
            BathroomNumber::Three => &self.bathroom_three,
        }
    }

    /// Derive next week's standing assignments from the previous roster.
    ///
    /// # Examples
    /// ```
    /// use chore_roster::domain::{CleaningMode, PreviousRotation, Resident, RotationPlan};
    ///
    /// let derived = RotationPlan::default().derive(&PreviousRotation::default());
    /// assert!(derived.tasks.iter().all(|task| task.slot.index == 0));
    /// assert!(derived
    ///     .bathrooms
    ///     .iter()
    ///     .all(|bathroom| bathroom.cleaning_mode == CleaningMode::Deep));
    /// assert_eq!(derived.tasks[0].slot.resident, Resident::Perpetua);
    /// ```
    #[must_use]
    pub fn derive(&self, previous: &PreviousRotation) -> DerivedRotation {
        let tasks = StandingTask::ALL
            .into_iter()
            .map(|kind| DerivedTask {
                kind,
                slot: self
                    .task_sequence(kind)
                    .advance(previous.tasks.get(&kind).copied().flatten()),
            })
            .collect();

        let bathrooms = BathroomNumber::ALL
            .into_iter()
            .map(|bathroom| {
                let prior = previous.bathrooms.get(&bathroom);
                DerivedBathroom {
                    bathroom,
                    slot: self
                        .bathroom_sequence(bathroom)
                        .advance(prior.and_then(|(index, _)| *index)),
                    cleaning_mode: prior
                        .map_or(CleaningMode::Deep, |(_, mode)| mode.flipped()),
                }
            })
            .collect();

        DerivedRotation { tasks, bathrooms }
    }
}

/// Rotation state read from the most recent earlier roster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousRotation {
    tasks: HashMap<StandingTask, Option<u32>>,
    bathrooms: HashMap<BathroomNumber, (Option<u32>, CleaningMode)>,
}

impl PreviousRotation {
    /// Collect rotation state from a roster's tasks and bathroom assignments.
    ///
    /// Custom tasks carry no standing kind and are ignored. When a kind
    /// appears more than once the first occurrence wins.
    #[must_use]
    pub fn from_roster(tasks: &[Task], bathrooms: &[BathroomAssignment]) -> Self {
        let mut state = Self::default();
        for task in tasks {
            if let Some(kind) = task.standing_kind {
                state.tasks.entry(kind).or_insert(task.rotation_index);
            }
        }
        for assignment in bathrooms {
            state
                .bathrooms
                .entry(assignment.bathroom)
                .or_insert((assignment.rotation_index, assignment.cleaning_mode));
        }
        state
    }
}

/// A standing task slot chosen for the new week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedTask {
    /// Which standing task this is.
    pub kind: StandingTask,
    /// Rotation position and assignee.
    pub slot: RotationSlot,
}

/// A bathroom slot chosen for the new week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedBathroom {
    /// Which bathroom this is.
    pub bathroom: BathroomNumber,
    /// Rotation position and assignee.
    pub slot: RotationSlot,
    /// Cleaning mode for the week.
    pub cleaning_mode: CleaningMode,
}

/// Output of [`RotationPlan::derive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedRotation {
    /// One entry per standing task.
    pub tasks: Vec<DerivedTask>,
    /// One entry per bathroom.
    pub bathrooms: Vec<DerivedBathroom>,
}

#[cfg(test)]
#[path = "rotation_tests.rs"]
mod tests;

// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Deserialize;
use serde::Serialize;

use crate::fsrs::Difficulty;
use crate::fsrs::Stability;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// A card's scheduling state. The due date is always derived by the
/// scheduler, never written by a caller.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum CardState {
    /// The card has been authored but never reviewed.
    New,
    /// The card is scheduled by the SM-2 family.
    Sm2(Sm2State),
    /// The card is scheduled by the FSRS family.
    Fsrs(FsrsState),
}

/// Scheduling parameters for the SM-2 family.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Sm2State {
    /// The current review interval in whole days.
    pub interval: u32,
    /// The interval growth multiplier. Never below 1.3.
    pub ease_factor: f64,
    /// The number of consecutive successful reviews. A failing grade resets
    /// this to zero.
    pub repetitions: u32,
    /// The card's next due date.
    pub due_date: Date,
    /// The instant the card was last reviewed.
    pub last_reviewed_at: Timestamp,
    /// The number of times the card has been reviewed.
    pub review_count: usize,
}

/// Scheduling parameters for the FSRS family.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct FsrsState {
    /// The card's stability, in days (an FSRS parameter).
    pub stability: Stability,
    /// The card's difficulty, in [1, 10] (an FSRS parameter).
    pub difficulty: Difficulty,
    /// Where the card is in its learning lifecycle.
    pub phase: Phase,
    /// The card's next due date.
    pub due_date: Date,
    /// The instant the card was last reviewed.
    pub last_reviewed_at: Timestamp,
    /// The number of times the card has been reviewed.
    pub review_count: usize,
}

/// The learning lifecycle of a reviewed card. Cards that have never been
/// reviewed are `CardState::New` rather than having a phase. There is no
/// terminal phase: cards cycle for as long as they are reviewed.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    /// Recently introduced, still being drilled in.
    Learning,
    /// In regular spaced review.
    Review,
    /// Forgotten during review, being drilled back in.
    Relearning,
}

impl CardState {
    /// The card's next due date. New cards have none.
    pub fn due_date(&self) -> Option<Date> {
        match self {
            CardState::New => None,
            CardState::Sm2(state) => Some(state.due_date),
            CardState::Fsrs(state) => Some(state.due_date),
        }
    }

    /// The instant the card was last reviewed, if ever.
    pub fn last_reviewed_at(&self) -> Option<Timestamp> {
        match self {
            CardState::New => None,
            CardState::Sm2(state) => Some(state.last_reviewed_at),
            CardState::Fsrs(state) => Some(state.last_reviewed_at),
        }
    }

    /// The number of times the card has been reviewed.
    pub fn review_count(&self) -> usize {
        match self {
            CardState::New => 0,
            CardState::Sm2(state) => state.review_count,
            CardState::Fsrs(state) => state.review_count,
        }
    }

    /// Whether the card is due on the given date. Cards that have never
    /// been reviewed are due; otherwise a card is due on its due date and
    /// every day after it.
    pub fn is_due(&self, today: Date) -> bool {
        match self.due_date() {
            None => true,
            Some(due_date) => due_date <= today,
        }
    }
}

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

use crate::error::ErrorReport;
use crate::error::fail;

/// How well the learner recalled a card, from worst to best. This is the
/// only rating type the engine accepts; anything a collaborator reads from
/// the outside world has to be converted, fallibly, into one of these four
/// values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Grade {
    /// Failed to recall the card.
    Again,
    /// Recalled the card with serious difficulty.
    Hard,
    /// Recalled the card with some hesitation. Historically also called
    /// "medium".
    #[serde(alias = "Medium", alias = "medium")]
    Good,
    /// Recalled the card perfectly.
    Easy,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Hard => "hard",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    /// All grades, from worst to best.
    pub fn all() -> [Grade; 4] {
        [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy]
    }
}

impl TryFrom<u8> for Grade {
    type Error = ErrorReport;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Grade::Again),
            2 => Ok(Grade::Hard),
            3 => Ok(Grade::Good),
            4 => Ok(Grade::Easy),
            _ => fail(format!("Invalid grade: {}", value)),
        }
    }
}

impl TryFrom<&str> for Grade {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "again" => Ok(Grade::Again),
            "hard" => Ok(Grade::Hard),
            "good" | "medium" => Ok(Grade::Good),
            "easy" => Ok(Grade::Easy),
            _ => fail(format!("Invalid grade: {}", value)),
        }
    }
}

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

//! The SM-2 algorithm family: review intervals grow by an ease factor that
//! tracks how reliably the learner recalls the card.

use crate::types::grade::Grade;

/// The lowest the ease factor can go. Without this floor, a run of bad
/// grades shrinks every future interval toward zero.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The ease factor assigned to cards before their first review.
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Quality values below this are failing grades.
const PASS_THRESHOLD: u8 = 3;

/// The interval after the first successful review, in days.
const FIRST_INTERVAL: u32 = 1;

/// The interval after the second consecutive successful review, in days.
const SECOND_INTERVAL: u32 = 6;

/// The result of reviewing a card.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Outcome {
    pub interval: u32,
    pub ease_factor: f64,
    pub repetitions: u32,
}

/// The SM-2 quality value of a grade.
fn quality(grade: Grade) -> u8 {
    match grade {
        Grade::Again => 0,
        Grade::Hard => 3,
        Grade::Good => 4,
        Grade::Easy => 5,
    }
}

/// Compute the next interval, ease factor, and repetition count for a card
/// with the given parameters, reviewed with the given grade.
///
/// A failing grade restarts the learning curve regardless of history: the
/// repetition count resets to zero and the interval to one day, with the
/// ease factor untouched. A passing grade first adjusts the ease factor,
/// then grows the interval: one day after the first success, six days after
/// the second, and `interval * ease_factor` after that.
pub fn review(interval: u32, ease_factor: f64, repetitions: u32, grade: Grade) -> Outcome {
    let quality = quality(grade);
    if quality < PASS_THRESHOLD {
        return Outcome {
            interval: FIRST_INTERVAL,
            ease_factor,
            repetitions: 0,
        };
    }
    let q = f64::from(quality);
    let ease_factor =
        (ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02))).max(MIN_EASE_FACTOR);
    let interval = match repetitions {
        0 => FIRST_INTERVAL,
        1 => SECOND_INTERVAL,
        _ => (f64::from(interval) * ease_factor).round() as u32,
    };
    Outcome {
        interval,
        ease_factor,
        repetitions: repetitions + 1,
    }
}

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

//! The FSRS algorithm family: a memory model with two parameters per card,
//! stability (how long the memory lasts) and difficulty (how hard the card
//! is to consolidate).

use crate::types::grade::Grade;

/// The stability of a memory: the time, in days, for the probability of
/// recall to decay from 100% to 90%.
pub type Stability = f64;

/// The difficulty of a card, in [1, 10].
pub type Difficulty = f64;

/// The model weights.
const W: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

/// The scaling factor in the forgetting curve.
const FACTOR: f64 = 19.0 / 81.0;

/// The decay exponent in the forgetting curve.
const DECAY: f64 = -0.5;

const MIN_DIFFICULTY: Difficulty = 1.0;
const MAX_DIFFICULTY: Difficulty = 10.0;

/// The numeric value of a grade in the model, from 1 (`Again`) to 4
/// (`Easy`).
fn grade_value(grade: Grade) -> f64 {
    match grade {
        Grade::Again => 1.0,
        Grade::Hard => 2.0,
        Grade::Good => 3.0,
        Grade::Easy => 4.0,
    }
}

/// The probability of recalling a card `time` days after its last review,
/// given its stability.
pub fn retrievability(time: f64, stability: Stability) -> f64 {
    (1.0 + FACTOR * (time / stability)).powf(DECAY)
}

/// The interval, in days, after which the probability of recall decays to
/// `target_recall`.
pub fn interval(target_recall: f64, stability: Stability) -> f64 {
    (stability / FACTOR) * (target_recall.powf(1.0 / DECAY) - 1.0)
}

/// The stability of a card after its first review.
pub fn initial_stability(grade: Grade) -> Stability {
    match grade {
        Grade::Again => W[0],
        Grade::Hard => W[1],
        Grade::Good => W[2],
        Grade::Easy => W[3],
    }
}

/// The difficulty of a card after its first review.
pub fn initial_difficulty(grade: Grade) -> Difficulty {
    let g = grade_value(grade);
    clamp_difficulty(W[4] - f64::exp(W[5] * (g - 1.0)) + 1.0)
}

/// The stability of a card after a subsequent review. Grows on a successful
/// grade, collapses on `Again`.
pub fn new_stability(
    difficulty: Difficulty,
    stability: Stability,
    retrievability: f64,
    grade: Grade,
) -> Stability {
    if grade == Grade::Again {
        stability_after_failure(difficulty, stability, retrievability)
    } else {
        stability_after_success(difficulty, stability, retrievability, grade)
    }
}

/// The difficulty of a card after a subsequent review: a step in the
/// direction the grade indicates, mean-reverted toward the difficulty of an
/// easy first review.
pub fn new_difficulty(difficulty: Difficulty, grade: Grade) -> Difficulty {
    clamp_difficulty(W[7] * initial_difficulty(Grade::Easy) + (1.0 - W[7]) * step(difficulty, grade))
}

fn clamp_difficulty(difficulty: Difficulty) -> Difficulty {
    difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
}

fn stability_after_success(
    difficulty: Difficulty,
    stability: Stability,
    retrievability: f64,
    grade: Grade,
) -> Stability {
    let t_d = 11.0 - difficulty;
    let t_s = stability.powf(-W[9]);
    let t_r = f64::exp(W[10] * (1.0 - retrievability)) - 1.0;
    let hard_penalty = if grade == Grade::Hard { W[15] } else { 1.0 };
    let easy_bonus = if grade == Grade::Easy { W[16] } else { 1.0 };
    let alpha = 1.0 + t_d * t_s * t_r * hard_penalty * easy_bonus * f64::exp(W[8]);
    stability * alpha
}

fn stability_after_failure(
    difficulty: Difficulty,
    stability: Stability,
    retrievability: f64,
) -> Stability {
    let d_f = difficulty.powf(-W[12]);
    let s_f = (stability + 1.0).powf(W[13]) - 1.0;
    let r_f = f64::exp(W[14] * (1.0 - retrievability));
    // Post-lapse stability cannot exceed the stability the card had before
    // the lapse.
    f64::min(d_f * s_f * r_f * W[11], stability)
}

fn step(difficulty: Difficulty, grade: Grade) -> f64 {
    let delta = -W[6] * (grade_value(grade) - 3.0);
    difficulty + delta * ((10.0 - difficulty) / 9.0)
}

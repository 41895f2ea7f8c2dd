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

//! The scheduling boundary: one `review` capability, with the algorithm
//! family as an interchangeable strategy. Callers hand the engine a card's
//! scheduling state, a grade, and the current instant, and persist the
//! state the engine hands back.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::error::fail;
use crate::fsrs;
use crate::sm2;
use crate::types::date::Date;
use crate::types::grade::Grade;
use crate::types::state::CardState;
use crate::types::state::FsrsState;
use crate::types::state::Phase;
use crate::types::state::Sm2State;
use crate::types::timestamp::Timestamp;

/// The desired recall probability for the FSRS family.
pub const TARGET_RECALL: f64 = 0.9;

/// The minimum review interval in days.
const MIN_INTERVAL: f64 = 1.0;

/// The maximum review interval in days.
const MAX_INTERVAL: f64 = 128.0;

/// The scheduling strategy. Each card is scheduled by exactly one family
/// for its whole life, recorded in its `CardState`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Algorithm {
    /// The SM-2 family: interval and ease factor.
    Sm2,
    /// The FSRS family: stability and difficulty.
    Fsrs,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sm2 => "sm2",
            Algorithm::Fsrs => "fsrs",
        }
    }

    /// Review a card: compute its next scheduling state from its current
    /// state and the learner's grade. `now` is the instant of the review;
    /// the engine never reads the clock itself, so identical inputs always
    /// produce identical outputs.
    ///
    /// Reviewing a card that belongs to the other algorithm family is a
    /// caller-contract violation and fails.
    pub fn review(&self, state: &CardState, grade: Grade, now: Timestamp) -> Fallible<CardState> {
        let (next, interval) = self.transition(state, grade, now)?;
        log::debug!(
            "{} {} interval={}d due={}",
            self.as_str(),
            grade.as_str(),
            interval,
            next.due_date().map(|d| d.to_string()).unwrap_or_default(),
        );
        Ok(next)
    }

    /// The interval, in days, that each grade would schedule, from `Again`
    /// to `Easy`. Front ends show these on their grading buttons.
    pub fn preview(&self, state: &CardState, now: Timestamp) -> Fallible<[i64; 4]> {
        let mut intervals = [0; 4];
        for (i, grade) in Grade::all().into_iter().enumerate() {
            let (_, interval) = self.transition(state, grade, now)?;
            intervals[i] = interval;
        }
        Ok(intervals)
    }

    fn transition(
        &self,
        state: &CardState,
        grade: Grade,
        now: Timestamp,
    ) -> Fallible<(CardState, i64)> {
        match (self, state) {
            (Algorithm::Sm2, CardState::New) => {
                Ok(sm2_transition(0, sm2::INITIAL_EASE_FACTOR, 0, 0, grade, now))
            }
            (Algorithm::Sm2, CardState::Sm2(prev)) => Ok(sm2_transition(
                prev.interval,
                prev.ease_factor,
                prev.repetitions,
                prev.review_count,
                grade,
                now,
            )),
            (Algorithm::Fsrs, CardState::New) => Ok(fsrs_transition(None, grade, now)),
            (Algorithm::Fsrs, CardState::Fsrs(prev)) => Ok(fsrs_transition(Some(prev), grade, now)),
            _ => fail(format!(
                "Card is not scheduled by the {} algorithm.",
                self.as_str()
            )),
        }
    }
}

/// The subset of `cards` due on `today`, in their original order.
pub fn due_cards<'a>(cards: &'a [CardState], today: Date) -> Vec<&'a CardState> {
    cards.iter().filter(|card| card.is_due(today)).collect()
}

fn sm2_transition(
    interval: u32,
    ease_factor: f64,
    repetitions: u32,
    review_count: usize,
    grade: Grade,
    now: Timestamp,
) -> (CardState, i64) {
    let today = now.into_date();
    let outcome = sm2::review(interval, ease_factor, repetitions, grade);
    let interval = i64::from(outcome.interval);
    let state = CardState::Sm2(Sm2State {
        interval: outcome.interval,
        ease_factor: outcome.ease_factor,
        repetitions: outcome.repetitions,
        due_date: today.plus_days(interval),
        last_reviewed_at: now,
        review_count: review_count + 1,
    });
    (state, interval)
}

fn fsrs_transition(prev: Option<&FsrsState>, grade: Grade, now: Timestamp) -> (CardState, i64) {
    let today = now.into_date();
    let (stability, difficulty, phase, review_count) = match prev {
        Some(prev) => {
            // Whole days since the last review. Clock skew cannot push the
            // elapsed time below zero.
            let elapsed = today.days_since(prev.last_reviewed_at.into_date()).max(0) as f64;
            let retrievability = fsrs::retrievability(elapsed, prev.stability);
            let stability = fsrs::new_stability(prev.difficulty, prev.stability, retrievability, grade);
            let difficulty = fsrs::new_difficulty(prev.difficulty, grade);
            (stability, difficulty, next_phase(prev.phase, grade), prev.review_count)
        }
        None => {
            let phase = match grade {
                Grade::Easy => Phase::Review,
                _ => Phase::Learning,
            };
            (fsrs::initial_stability(grade), fsrs::initial_difficulty(grade), phase, 0)
        }
    };
    let interval = fsrs::interval(TARGET_RECALL, stability)
        .round()
        .clamp(MIN_INTERVAL, MAX_INTERVAL) as i64;
    let state = CardState::Fsrs(FsrsState {
        stability,
        difficulty,
        phase,
        due_date: today.plus_days(interval),
        last_reviewed_at: now,
        review_count: review_count + 1,
    });
    (state, interval)
}

fn next_phase(phase: Phase, grade: Grade) -> Phase {
    match (phase, grade) {
        (Phase::Review, Grade::Again) => Phase::Relearning,
        (Phase::Review, _) => Phase::Review,
        (_, Grade::Good | Grade::Easy) => Phase::Review,
        (phase, _) => phase,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn noon(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
        )
    }

    fn sm2_card(interval: u32, ease_factor: f64, repetitions: u32) -> CardState {
        CardState::Sm2(Sm2State {
            interval,
            ease_factor,
            repetitions,
            due_date: date(2025, 6, 1),
            last_reviewed_at: noon(2025, 5, 31),
            review_count: repetitions as usize,
        })
    }

    #[test]
    fn test_sm2_first_review() {
        let now = noon(2025, 6, 1);
        let next = Algorithm::Sm2.review(&CardState::New, Grade::Good, now).unwrap();
        match next {
            CardState::Sm2(state) => {
                assert_eq!(state.interval, 1);
                assert_eq!(state.repetitions, 1);
                assert_eq!(state.review_count, 1);
                assert_eq!(state.due_date, date(2025, 6, 2));
                assert_eq!(state.last_reviewed_at, now);
            }
            _ => panic!("expected an SM-2 state"),
        }
    }

    #[test]
    fn test_sm2_second_review_easy() {
        let now = noon(2025, 6, 1);
        let card = sm2_card(1, 2.5, 1);
        let next = Algorithm::Sm2.review(&card, Grade::Easy, now).unwrap();
        match next {
            CardState::Sm2(state) => {
                // Quality 5 bumps the ease factor by 0.1; the second
                // consecutive success is six days out regardless.
                assert!((state.ease_factor - 2.6).abs() < EPSILON);
                assert_eq!(state.interval, 6);
                assert_eq!(state.repetitions, 2);
                assert_eq!(state.due_date, date(2025, 6, 7));
            }
            _ => panic!("expected an SM-2 state"),
        }
    }

    #[test]
    fn test_sm2_failure_resets() {
        let now = noon(2025, 6, 1);
        let card = sm2_card(1, 2.5, 1);
        let next = Algorithm::Sm2.review(&card, Grade::Again, now).unwrap();
        match next {
            CardState::Sm2(state) => {
                assert_eq!(state.interval, 1);
                assert_eq!(state.repetitions, 0);
                assert!((state.ease_factor - 2.5).abs() < EPSILON);
                // The review still counts.
                assert_eq!(state.review_count, 2);
            }
            _ => panic!("expected an SM-2 state"),
        }
    }

    #[test]
    fn test_fsrs_first_review_leaves_new() {
        let now = noon(2025, 6, 1);
        let next = Algorithm::Fsrs.review(&CardState::New, Grade::Good, now).unwrap();
        match next {
            CardState::Fsrs(state) => {
                assert_eq!(state.phase, Phase::Learning);
                assert_eq!(state.review_count, 1);
                assert!(state.due_date > now.into_date());
                assert_eq!(state.last_reviewed_at, now);
            }
            _ => panic!("expected an FSRS state"),
        }
    }

    #[test]
    fn test_fsrs_easy_graduates_immediately() {
        let now = noon(2025, 6, 1);
        let next = Algorithm::Fsrs.review(&CardState::New, Grade::Easy, now).unwrap();
        match next {
            CardState::Fsrs(state) => assert_eq!(state.phase, Phase::Review),
            _ => panic!("expected an FSRS state"),
        }
    }

    #[test]
    fn test_fsrs_failure_enters_relearning() {
        let now = noon(2025, 6, 1);
        let mut card = Algorithm::Fsrs.review(&CardState::New, Grade::Easy, now).unwrap();
        let before = match &card {
            CardState::Fsrs(state) => state.stability,
            _ => panic!("expected an FSRS state"),
        };
        let later = noon(2025, 6, 20);
        card = Algorithm::Fsrs.review(&card, Grade::Again, later).unwrap();
        match card {
            CardState::Fsrs(state) => {
                assert_eq!(state.phase, Phase::Relearning);
                assert!(state.stability < before);
                assert_eq!(state.review_count, 2);
            }
            _ => panic!("expected an FSRS state"),
        }
    }

    #[test]
    fn test_fsrs_relearning_graduates_on_good() {
        let now = noon(2025, 6, 1);
        let mut card = Algorithm::Fsrs.review(&CardState::New, Grade::Easy, now).unwrap();
        card = Algorithm::Fsrs.review(&card, Grade::Again, noon(2025, 6, 20)).unwrap();
        card = Algorithm::Fsrs.review(&card, Grade::Good, noon(2025, 6, 21)).unwrap();
        match card {
            CardState::Fsrs(state) => assert_eq!(state.phase, Phase::Review),
            _ => panic!("expected an FSRS state"),
        }
    }

    #[test]
    fn test_family_mismatch_fails() {
        let now = noon(2025, 6, 1);
        let card = sm2_card(1, 2.5, 1);
        assert!(Algorithm::Fsrs.review(&card, Grade::Good, now).is_err());
        let card = Algorithm::Fsrs.review(&CardState::New, Grade::Good, now).unwrap();
        assert!(Algorithm::Sm2.review(&card, Grade::Good, now).is_err());
    }

    #[test]
    fn test_review_is_deterministic() {
        let now = noon(2025, 6, 1);
        let card = sm2_card(10, 2.2, 4);
        let a = Algorithm::Sm2.review(&card, Grade::Good, now).unwrap();
        let b = Algorithm::Sm2.review(&card, Grade::Good, now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preview_matches_review() {
        let now = noon(2025, 6, 1);
        let card = sm2_card(10, 2.5, 4);
        let intervals = Algorithm::Sm2.preview(&card, now).unwrap();
        // Again resets to one day; Hard, Good, and Easy multiply by the
        // adjusted ease factors 2.36, 2.5, and 2.6.
        assert_eq!(intervals, [1, 24, 25, 26]);
        for (grade, interval) in Grade::all().into_iter().zip(intervals) {
            let next = Algorithm::Sm2.review(&card, grade, now).unwrap();
            assert_eq!(next.due_date().unwrap(), now.into_date().plus_days(interval));
        }
    }

    #[test]
    fn test_preview_is_ordered_for_fsrs() {
        let now = noon(2025, 6, 1);
        let intervals = Algorithm::Fsrs.preview(&CardState::New, now).unwrap();
        assert!(intervals[0] <= intervals[1]);
        assert!(intervals[1] <= intervals[2]);
        assert!(intervals[2] <= intervals[3]);
        assert!(intervals[0] >= 1);
    }

    #[test]
    fn test_due_cards_preserves_order() {
        let today = date(2025, 6, 10);
        let due_earlier = CardState::Sm2(Sm2State {
            interval: 6,
            ease_factor: 2.5,
            repetitions: 2,
            due_date: date(2025, 6, 1),
            last_reviewed_at: noon(2025, 5, 26),
            review_count: 2,
        });
        let due_later = CardState::Sm2(Sm2State {
            due_date: date(2025, 7, 1),
            ..match &due_earlier {
                CardState::Sm2(state) => state.clone(),
                _ => panic!("expected an SM-2 state"),
            }
        });
        let fresh = CardState::New;
        let cards = vec![due_later, due_earlier.clone(), fresh.clone(), due_earlier.clone()];
        let due = due_cards(&cards, today);
        assert_eq!(due.len(), 3);
        assert_eq!(due[0], &due_earlier);
        assert_eq!(due[1], &fresh);
        assert_eq!(due[2], &due_earlier);
    }
}

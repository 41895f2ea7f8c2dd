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

//! retain: a spaced repetition scheduling engine.
//!
//! This library is the scheduling core of a flashcard application: given a
//! card's scheduling state and the learner's recall grade, it computes the
//! next state and due date. Two algorithm families are available behind one
//! boundary:
//!
//! - SM-2: intervals grow by a per-card ease factor.
//! - FSRS: a memory model parameterized by stability and difficulty.
//!
//! Everything else (rendering, storage, transport) belongs to the calling
//! application. The engine is pure: it never reads the clock (callers pass
//! "now" in), holds no state between calls, and uses no randomness.

pub mod error;
pub mod fsrs;
pub mod scheduler;
pub mod sm2;
pub mod types;

// Re-exports for convenience.
pub use error::ErrorReport;
pub use error::Fallible;
pub use error::fail;
pub use scheduler::Algorithm;
pub use scheduler::due_cards;
pub use types::date::Date;
pub use types::grade::Grade;
pub use types::state::CardState;
pub use types::state::FsrsState;
pub use types::state::Phase;
pub use types::state::Sm2State;
pub use types::timestamp::Timestamp;

//! Classification policy: turn a scored match candidate into an action path
//! with human-readable reasoning.
//!
//! Two kinds of decisions exist and they are structurally distinct.
//! [`Decision::Classifier`] is computed from scores by [`classify`];
//! [`Decision::CallerOverride`] is the caller-privileged path for manually
//! added or explicitly overridden rows. The override carries a fixed
//! reasoning string, bypasses scoring entirely, and re-matching can never
//! recompute it because it is a separate variant, not a flag threaded
//! through the scoring code.
//!
//! Classification never fails: malformed or missing fields degrade to
//! `human_review` with reasoning that names what was missing. Surfacing
//! uncertainty beats throwing data away.

pub mod policy;
pub mod result;

pub use policy::{classify, ClassifierConfig, OVERRIDE_REASONING};
pub use result::{ActionPath, Decision, MatchResult, Summary};

mod answer_synthesizer;
mod policy_matcher;

pub use answer_synthesizer::{AnswerSynthesizer, SynthesisKind};
pub use policy_matcher::{PolicyMatch, PolicyMatcher};

//! Handler synthesis: build a callable surface from operation descriptors.

mod surface;
mod synthesizer;

pub use surface::{ArgValue, BoundParameter, Delegate, HandlerSurface, Outcome, SynthesizedMethod};
pub use synthesizer::{delegate_signature, Synthesizer};

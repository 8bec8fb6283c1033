/// Route module for hash routing
///
/// Contains the template compiler and the compiled matchers it produces:
/// - `pattern` turns a template string into per-segment matchers
/// - `matcher` tests path segments and extracts decoded captures

pub mod matcher;
pub mod pattern;

// Re-export commonly used types
pub use matcher::{Action, Capture, CompiledMatcher, CompiledPattern, SegmentMatcher};
pub use pattern::{classify_segment, compile, PatternSegmentType};

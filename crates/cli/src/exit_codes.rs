//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts gate on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (emitted by clap)        |
//! | 3-9     | pipeline         | Pipeline run codes                       |

/// Success - run completed and the outputs are clean.
pub const EXIT_SUCCESS: u8 = 0;

/// Ambiguous keys found and `fail_on_conflicts` is set.
pub const EXIT_PIPELINE_CONFLICTS: u8 = 3;

/// Data-quality findings present (ambiguous keys or unresolved demand).
/// Like `diff(1)`, a nonzero exit means "there is something to look at";
/// the output relations are still written in full.
pub const EXIT_PIPELINE_DIRTY: u8 = 4;

/// Config failed to parse or validate.
pub const EXIT_PIPELINE_INVALID_CONFIG: u8 = 5;

/// Runtime failure (unreadable input, CSV decode error, write failure).
pub const EXIT_PIPELINE_RUNTIME: u8 = 6;

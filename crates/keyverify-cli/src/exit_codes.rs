//! Process exit codes. Part of the public contract for CI callers.

pub const SUCCESS: i32 = 0;
pub const VERIFICATION_FAILED: i32 = 1; // At least one check reported a failure
pub const SETUP_ERROR: i32 = 2; // Bad flags, missing token, report not written

//! Exit codes for parleyctl

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when `eval` rejects the expression
pub const EXIT_EVAL_FAILED: i32 = 1;

/// Exit code when config or rule files cannot be loaded
pub const EXIT_CONFIG_ERROR: i32 = 78;

/// Exit code when reading stdin or writing stdout fails
pub const EXIT_IO_ERROR: i32 = 74;

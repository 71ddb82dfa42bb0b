/// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const RUN_FAILED: i32 = 1;
pub const CONFIG_ERROR: i32 = 2;

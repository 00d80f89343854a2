/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Decimal precision for delta percentages
pub const DELTA_DECIMAL_PRECISION: u32 = 1;

/// Category used on ledger entries produced by goal contributions
pub const GOAL_LEDGER_CATEGORY: &str = "goals";

/// Default currency for new settings
pub const DEFAULT_CURRENCY: &str = "USD";

/// Default debounce window for the live worker, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

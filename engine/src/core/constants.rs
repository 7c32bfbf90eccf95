// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and log filters)
pub const APP_NAME_LOWER: &str = "filterkit";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "filterkit.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "FILTERKIT_CONFIG";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "FILTERKIT_LOG";

// =============================================================================
// Environment Variables - Limits
// =============================================================================

/// Environment variable for maximum filter JSON size in bytes
pub const ENV_MAX_FILTER_BYTES: &str = "FILTERKIT_MAX_FILTER_BYTES";

/// Environment variable for maximum filter nesting depth
pub const ENV_MAX_FILTER_DEPTH: &str = "FILTERKIT_MAX_FILTER_DEPTH";

/// Environment variable for the unique-id cast width
pub const ENV_CAST_WIDTH: &str = "FILTERKIT_CAST_WIDTH";

/// Environment variable for the page size used when none is requested
pub const ENV_DEFAULT_PAGE_SIZE: &str = "FILTERKIT_DEFAULT_PAGE_SIZE";

/// Environment variable for the largest page size accepted
pub const ENV_MAX_PAGE_SIZE: &str = "FILTERKIT_MAX_PAGE_SIZE";

// =============================================================================
// Filter Limits
// =============================================================================

/// Maximum size of filter JSON in bytes (64KB)
pub const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum nesting depth of a filter expression (root is depth 1)
pub const MAX_FILTER_DEPTH: usize = 32;

// =============================================================================
// Keyset Pagination
// =============================================================================

/// Alias of the string-cast unique id column; cursors compare against it
pub const STR_ID_COLUMN: &str = "str_id";

/// Width of the `CHAR(n)` cast applied to the unique id column
pub const DEFAULT_CAST_WIDTH: u16 = 50;

/// Largest cast width accepted from configuration
pub const MAX_CAST_WIDTH: u16 = 255;

/// Upper bound for page size and numeric cursors: unsigned 32-bit max, so
/// 32- and 64-bit hosts behave identically
pub const PAGINATION_VALUE_LIMIT: u64 = u32::MAX as u64;

/// Page size used by the CLI when none is requested
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// Client constants

// Environment variables
pub const ENV_API_URL: &str = "DEUCE_API_URL";
pub const ENV_API_PREFIX: &str = "DEUCE_API_PREFIX";
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";
pub const ENV_TIMEOUT_SECS: &str = "DEUCE_API_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "DEUCE_API_CONNECT_TIMEOUT_SECS";

// Defaults
pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

// Envelope keys
pub const KEY_SUCCESS: &str = "success";
pub const KEY_DATA: &str = "data";
pub const KEY_MESSAGE: &str = "message";
pub const KEY_ERROR: &str = "error";
pub const KEY_STATUS: &str = "status";
pub const KEY_PAGINATION: &str = "pagination";

// Inline pagination keys
pub const KEY_PAGE: &str = "page";
pub const KEY_LIMIT: &str = "limit";
pub const KEY_TOTAL: &str = "total";
pub const KEY_TOTAL_PAGES: &str = "totalPages";

/// Array keys that win the tie-break when a raw body carries several arrays.
pub const COLLECTION_KEYS: &[&str] = &[
    "items",
    "results",
    "records",
    "rows",
    "list",
    "leagues",
    "seasons",
    "divisions",
    "players",
    "admins",
    "sponsors",
    "matches",
    "disputes",
    "payments",
    "notifications",
];

pub const USER_AGENT: &str = concat!("deuce-api-client/", env!("CARGO_PKG_VERSION"));

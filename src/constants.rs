// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DATABASE_FILE: &str = "finance.db";

// Session configuration
pub const SESSION_NAME: &str = "finance_session";
pub const SESSION_EXPIRY_DAYS: i64 = 7;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;
pub const SESSION_USER_ID: &str = "user_id";
pub const SESSION_EMAIL: &str = "email";

// Validation limits
pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_EMAIL_LENGTH: usize = 254;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Error messages
pub const ERR_DATABASE_OPERATION: &str = "Database operation failed";
pub const ERR_AGGREGATION_UNAVAILABLE: &str = "Aggregation unavailable";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";

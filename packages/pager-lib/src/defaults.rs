pub const DATABASE: &str = "postgres";
pub const POSTGRES_DATABASE: &str = "postgres";
pub const POSTGRES_USER: &str = "postgres";
pub const POSTGRES_HOST: &str = "127.0.0.1";
pub const POSTGRES_PORT: &str = "5432";
pub const POSTGRES_PASSWORD: &str = "";
pub const POSTGRES_MAX_CONNECTIONS: u32 = 10;

pub const LOG_LEVEL: &str = "info";
pub const VERBOSE_LOGGING: bool = false;

/// Page size used when a request supplies neither `first` nor `last`.
pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 100;

pub const MAX_DATABASE_CONNECTION_ATTEMPTS: usize = 5;
pub const INITIAL_RETRY_DELAY_SECS: u64 = 2;

pub const PRIMARY_KEY: &str = "id";
pub const ORDER_DIRECTION: &str = "asc";

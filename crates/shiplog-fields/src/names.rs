//! Names of the built-in resolvers.
//!
//! These are the resolver names configuration refers to, not the names of
//! the fields in the shipped record.

pub const GET_SESSION_ID: &str = "getSessionId";
pub const GET_ROUTE_NAME: &str = "getRouteName";
pub const GET_URL: &str = "getUrl";
pub const GET_REQUEST_METHOD: &str = "getRequestMethod";
pub const GET_SERVER_IP: &str = "getServerIp";
pub const GET_CLIENT_IP: &str = "getClientIp";
pub const GET_CLIENT_USER_AGENT: &str = "getClientUserAgent";
pub const GET_ENVIRONMENT: &str = "getEnvironment";
/// Bound to an explicit session key, see [`crate::from_session`]
pub const GET_FROM_SESSION: &str = "getFromSession";
pub const GET_PROCESS_IDENTIFIER: &str = "getProcessIdentifier";
pub const GET_USER_ID: &str = "getUserId";
pub const GET_GROUP_ID: &str = "getGroupId";
pub const GET_LARAVEL_VERSION: &str = "getLaravelVersion";
pub const GET_SQL_QUERIES: &str = "getSqlQueries";
pub const GET_ARTISAN_COMMAND_NAME: &str = "getArtisanCommandName";
pub const GET_RUNNING_IN_CONSOLE: &str = "getRunningInConsole";
pub const GET_LOGGER_VERSION: &str = "getLoggerVersion";

/// Resolvers registered by `FieldRegistry::new`, in registration order
pub const DEFAULT_RESOLVERS: [&str; 16] = [
    GET_SESSION_ID,
    GET_ROUTE_NAME,
    GET_URL,
    GET_REQUEST_METHOD,
    GET_SERVER_IP,
    GET_CLIENT_IP,
    GET_CLIENT_USER_AGENT,
    GET_ENVIRONMENT,
    GET_PROCESS_IDENTIFIER,
    GET_USER_ID,
    GET_GROUP_ID,
    GET_LARAVEL_VERSION,
    GET_SQL_QUERIES,
    GET_ARTISAN_COMMAND_NAME,
    GET_RUNNING_IN_CONSOLE,
    GET_LOGGER_VERSION,
];

/// Resolvers that only read static or runtime state and never go absent
/// for lack of a request, session, router or collector
pub const STATIC_RESOLVERS: [&str; 6] = [
    GET_ENVIRONMENT,
    GET_PROCESS_IDENTIFIER,
    GET_LARAVEL_VERSION,
    GET_LOGGER_VERSION,
    GET_RUNNING_IN_CONSOLE,
    GET_ARTISAN_COMMAND_NAME,
];

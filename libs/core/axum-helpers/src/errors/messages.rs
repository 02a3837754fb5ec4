//! Client-facing error strings. Callers branch on these, so they are part of
//! the public HTTP contract and must not change.

pub const INVALID_API_KEY: &str = "Invalid or Missing API key";
pub const INVALID_PARAMS: &str = "Invalid params";
pub const INVALID_REQUEST_BODY: &str = "Invalid request body";
pub const FAILED_TO_CREATE_EVENT: &str = "Failed to create event";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong";
pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const NOT_FOUND: &str = "Not Found";

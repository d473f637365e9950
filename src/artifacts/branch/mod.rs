pub mod branch_name;
pub mod revision;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// Branch created by `init`
pub const DEFAULT_BRANCH_NAME: &str = "master";

/// Shortest commit id prefix accepted in place of a full id
pub const MIN_ABBREVIATED_ID_LENGTH: usize = 4;

//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (e.g. output could not be serialized)       |
//! | 2    | Usage error (bad args, rejected edit, out-of-range cell)  |
//! | 3    | Research service unreachable or returned an error         |
//! | 4    | Sheet or column not found                                 |

use autosheet_client::{ClientError, FlowError};
use autosheet_engine::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - failure that is neither a usage nor a service problem.
/// Prefer a specific error code where one fits.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, or an edit the store rejected.
pub const EXIT_USAGE: u8 = 2;

/// Network/HTTP error talking to the research service, or an unparseable
/// response.
pub const EXIT_SERVICE: u8 = 3;

/// Named sheet or column does not exist.
pub const EXIT_NOT_FOUND: u8 = 4;

pub fn client_exit_code(err: &ClientError) -> u8 {
    match err {
        // Bad --api-base or settings value
        ClientError::Config(_) => EXIT_USAGE,
        ClientError::Network(_) | ClientError::Http(..) | ClientError::Parse(_) => EXIT_SERVICE,
    }
}

pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::SheetNotFound(_) | StoreError::UnknownColumn(_) => EXIT_NOT_FOUND,
        _ => EXIT_USAGE,
    }
}

pub fn flow_exit_code(err: &FlowError) -> u8 {
    match err {
        FlowError::Store(e) => store_exit_code(e),
        FlowError::Gateway(e) => client_exit_code(e),
        FlowError::InvalidInput(_) => EXIT_USAGE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_codes() {
        let not_found = FlowError::Store(StoreError::SheetNotFound("x".into()));
        assert_eq!(flow_exit_code(&not_found), EXIT_NOT_FOUND);

        let range = FlowError::Store(StoreError::ColumnOutOfRange { col: 9, len: 2 });
        assert_eq!(flow_exit_code(&range), EXIT_USAGE);

        let http = FlowError::Gateway(ClientError::Http(500, String::new()));
        assert_eq!(flow_exit_code(&http), EXIT_SERVICE);

        assert_eq!(flow_exit_code(&FlowError::InvalidInput("bad".into())), EXIT_USAGE);

        let pinned = FlowError::Store(StoreError::IndexColumnPinned("company".into()));
        assert_eq!(flow_exit_code(&pinned), EXIT_USAGE);
    }
}

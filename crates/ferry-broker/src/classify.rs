//! Native result code classification.
//!
//! The worker reports per-item HRESULT-style codes; this module maps them
//! into the coarse [`StatusCode`] taxonomy the recovery loop branches on.

use ferry_core::StatusCode;

use crate::proto::ItemOutcome;

/// Per-item marker the worker emits when it could not transfer secondary
/// metadata streams even though the primary data moved. Never produced by
/// the code tables below; detected batch-wide via [`all_metadata_failures`].
pub const METADATA_SENTINEL: i32 = -1;

const E_ACCESSDENIED: i32 = 0x8007_0005_u32 as i32;
const E_SHARING_VIOLATION: i32 = 0x8007_0020_u32 as i32;
const E_LOCK_VIOLATION: i32 = 0x8007_0021_u32 as i32;
const E_FILENAME_TOO_LONG: i32 = 0x8007_00CE_u32 as i32;
const E_FILE_NOT_FOUND: i32 = 0x8007_0002_u32 as i32;
const E_PATH_NOT_FOUND: i32 = 0x8007_0003_u32 as i32;
const E_ALREADY_EXISTS: i32 = 0x8007_00B7_u32 as i32;
const E_FILE_EXISTS: i32 = 0x8007_0050_u32 as i32;
const E_DIRECTORY_EXPECTED: i32 = 0x8007_010B_u32 as i32;
const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;
const E_PROPERTY_NOT_FOUND: i32 = 0x8004_0102_u32 as i32;
const COPYENGINE_E_SHARING_VIOLATION_SRC: i32 = 0x8027_0021_u32 as i32;
const COPYENGINE_E_SHARING_VIOLATION_DEST: i32 = 0x8027_0022_u32 as i32;
const COPYENGINE_E_ACCESS_DENIED_SRC: i32 = 0x8027_0001_u32 as i32;
const COPYENGINE_E_ACCESS_DENIED_DEST: i32 = 0x8027_0002_u32 as i32;
const COPYENGINE_E_PATH_TOO_DEEP_SRC: i32 = 0x8027_0003_u32 as i32;
const COPYENGINE_E_PATH_TOO_DEEP_DEST: i32 = 0x8027_0004_u32 as i32;
const COPYENGINE_E_FILE_IS_FLD_DEST: i32 = 0x8027_000A_u32 as i32;

// Bare Win32 codes, reported by older worker builds.
const WIN32_ACCESS_DENIED: i32 = 5;
const WIN32_SHARING_VIOLATION: i32 = 32;
const WIN32_LOCK_VIOLATION: i32 = 33;
const WIN32_FILENAME_TOO_LONG: i32 = 206;
const WIN32_FILE_NOT_FOUND: i32 = 2;
const WIN32_PATH_NOT_FOUND: i32 = 3;
const WIN32_ALREADY_EXISTS: i32 = 183;
const WIN32_FILE_EXISTS: i32 = 80;
const WIN32_DIRECTORY_EXPECTED: i32 = 267;
const WIN32_INVALID_PARAMETER: i32 = 87;

/// Map one native result code into the status taxonomy.
pub fn classify(native_code: i32) -> StatusCode {
    match native_code {
        0 => StatusCode::Success,
        E_ACCESSDENIED
        | COPYENGINE_E_ACCESS_DENIED_SRC
        | COPYENGINE_E_ACCESS_DENIED_DEST
        | WIN32_ACCESS_DENIED => StatusCode::Unauthorized,
        E_SHARING_VIOLATION
        | E_LOCK_VIOLATION
        | COPYENGINE_E_SHARING_VIOLATION_SRC
        | COPYENGINE_E_SHARING_VIOLATION_DEST
        | WIN32_SHARING_VIOLATION
        | WIN32_LOCK_VIOLATION => StatusCode::InUse,
        E_FILENAME_TOO_LONG
        | COPYENGINE_E_PATH_TOO_DEEP_SRC
        | COPYENGINE_E_PATH_TOO_DEEP_DEST
        | WIN32_FILENAME_TOO_LONG => StatusCode::NameTooLong,
        E_FILE_NOT_FOUND | E_PATH_NOT_FOUND | WIN32_FILE_NOT_FOUND | WIN32_PATH_NOT_FOUND => {
            StatusCode::NotFound
        }
        E_ALREADY_EXISTS | E_FILE_EXISTS | WIN32_ALREADY_EXISTS | WIN32_FILE_EXISTS => {
            StatusCode::AlreadyExists
        }
        E_DIRECTORY_EXPECTED | COPYENGINE_E_FILE_IS_FLD_DEST | WIN32_DIRECTORY_EXPECTED => {
            StatusCode::NotAFolder
        }
        E_INVALIDARG | WIN32_INVALID_PARAMETER => StatusCode::InvalidArgument,
        E_PROPERTY_NOT_FOUND => StatusCode::PropertyNotFound,
        _ => StatusCode::Generic,
    }
}

/// Whether every item in a non-empty outcome list carries the metadata
/// sentinel, meaning the primary data transferred but secondary streams
/// did not. The recovery loop reroutes such batches to the fallback
/// engine; a mixed list (any success or any other code) falls through to
/// the taxonomy instead.
pub fn all_metadata_failures(items: &[ItemOutcome]) -> bool {
    !items.is_empty() && items.iter().all(|i| i.native_code == METADATA_SENTINEL)
}

/// Whether a code reports a sharing violation on the destination side,
/// which makes the destination the path worth showing in an in-use prompt.
pub(crate) fn destination_sharing_violation(native_code: i32) -> bool {
    native_code == COPYENGINE_E_SHARING_VIOLATION_DEST
}

/// The classified status of the first failed outcome, `Generic` when the
/// list is empty or uniformly successful.
pub fn first_failure_status(items: &[ItemOutcome]) -> StatusCode {
    items
        .iter()
        .find(|i| !i.succeeded)
        .map(|i| classify(i.native_code))
        .unwrap_or(StatusCode::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_taxonomy() {
        assert_eq!(classify(0), StatusCode::Success);
        assert_eq!(classify(E_ACCESSDENIED), StatusCode::Unauthorized);
        assert_eq!(classify(WIN32_ACCESS_DENIED), StatusCode::Unauthorized);
        assert_eq!(
            classify(COPYENGINE_E_SHARING_VIOLATION_DEST),
            StatusCode::InUse
        );
        assert_eq!(classify(WIN32_FILENAME_TOO_LONG), StatusCode::NameTooLong);
        assert_eq!(classify(E_FILE_NOT_FOUND), StatusCode::NotFound);
        assert_eq!(classify(WIN32_ALREADY_EXISTS), StatusCode::AlreadyExists);
        assert_eq!(classify(E_DIRECTORY_EXPECTED), StatusCode::NotAFolder);
        assert_eq!(classify(E_INVALIDARG), StatusCode::InvalidArgument);
        assert_eq!(classify(0x1234_5678), StatusCode::Generic);
    }

    #[test]
    fn test_sentinel_never_classified_by_table() {
        // -1 travels through the batch-wide heuristic, not the code table.
        assert_eq!(classify(METADATA_SENTINEL), StatusCode::Generic);
    }

    #[test]
    fn test_all_metadata_failures_requires_uniformity() {
        let uniform = vec![
            ItemOutcome::failed("/a", METADATA_SENTINEL),
            ItemOutcome::failed("/b", METADATA_SENTINEL),
        ];
        assert!(all_metadata_failures(&uniform));

        // A success in the list means the sentinel route does not apply.
        let mixed = vec![
            ItemOutcome::ok("/a", Some("/dst/a".into())),
            ItemOutcome::failed("/b", METADATA_SENTINEL),
        ];
        assert!(!all_metadata_failures(&mixed));

        let not_uniform = vec![
            ItemOutcome::failed("/a", METADATA_SENTINEL),
            ItemOutcome::failed("/b", WIN32_ACCESS_DENIED),
        ];
        assert!(!all_metadata_failures(&not_uniform));

        assert!(!all_metadata_failures(&[ItemOutcome::ok("/a", None)]));
        assert!(!all_metadata_failures(&[]));
    }

    #[test]
    fn test_destination_sharing_violation() {
        assert!(destination_sharing_violation(
            COPYENGINE_E_SHARING_VIOLATION_DEST
        ));
        assert!(!destination_sharing_violation(
            COPYENGINE_E_SHARING_VIOLATION_SRC
        ));
        assert!(!destination_sharing_violation(WIN32_SHARING_VIOLATION));
    }

    #[test]
    fn test_first_failure_status() {
        let items = vec![
            ItemOutcome::ok("/a", None),
            ItemOutcome::failed("/b", WIN32_SHARING_VIOLATION),
            ItemOutcome::failed("/c", WIN32_ACCESS_DENIED),
        ];
        assert_eq!(first_failure_status(&items), StatusCode::InUse);
        assert_eq!(first_failure_status(&[]), StatusCode::Generic);
    }
}

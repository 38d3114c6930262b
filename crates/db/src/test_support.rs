use tempfile::NamedTempFile;

use crate::DBService;

/// Fresh file-backed database for a test. The `NamedTempFile` must be kept
/// alive for the duration of the test or the file disappears under the pool.
pub(crate) async fn test_db() -> (DBService, NamedTempFile) {
    let file = NamedTempFile::new().expect("create temp db file");
    let url = format!("sqlite://{}", file.path().display());
    let db = DBService::new(&url).await.expect("open test db");
    (db, file)
}

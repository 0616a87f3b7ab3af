//! Shared fixtures for name-classifier tests

use super::{Classification, NameClassifier};
use crate::app::models::Group;


/// Classify a name for one group at release 65, the fixture release used
/// throughout these tests
pub fn classify65(dbname: &str, group: Group) -> Option<Classification> {
    NameClassifier::new().classify_for_group(dbname, group, 65)
}

/// Assert a classification hit with the expected shape
pub fn assert_hit(
    classification: Option<Classification>,
    group: Group,
    multispecies: bool,
    encoded_name: &str,
) {
    let c = classification.expect("expected database name to classify");
    assert_eq!(c.group, group);
    assert_eq!(c.multispecies, multispecies);
    assert_eq!(c.encoded_name, encoded_name);
}

//! Checks that annotations only name regions that exist.

use indexmap::IndexSet;
use log::warn;

use memstack_core::{
    RegionError,
    annotation::Annotation,
    identifier::Id,
    region::Region,
};

/// Validates every annotation against the resolved regions.
///
/// A multi-region label whose top region is drawn below its bottom region
/// is accepted, with a warning.
///
/// # Errors
///
/// Returns [`RegionError::UnknownLabel`] for the first annotation that names
/// a label no resolved region carries.
pub fn validate(annotations: &[Annotation], regions: &[Region]) -> Result<(), RegionError> {
    let positions: IndexSet<Id> = regions.iter().map(Region::label).collect();

    for annotation in annotations {
        let found = annotation
            .targets()
            .into_iter()
            .map(|label| {
                positions
                    .get_index_of(&label)
                    .ok_or_else(|| RegionError::UnknownLabel {
                        label: label.to_string(),
                        line: annotation.line(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let (Annotation::MultiRegion(label), [top, bottom]) = (annotation, found.as_slice()) {
            if top > bottom {
                warn!(
                    top:% = label.top(),
                    bottom:% = label.bottom(),
                    line:? = annotation.line();
                    "Multi-region label runs upward; its top region is drawn below its bottom region",
                );
            }
        }
    }
    Ok(())
}

//! The single-subject rule.

use votegate_types::BiometricDescriptor;

use crate::BiometricError;

/// Accept a detection result only if it contains exactly one well-formed face.
///
/// Zero faces and several faces are both rejections the caller can retry
/// with a new capture. With several faces none is chosen, not even the first.
pub fn select_single_subject(
    mut descriptors: Vec<BiometricDescriptor>,
) -> Result<BiometricDescriptor, BiometricError> {
    match descriptors.len() {
        0 => Err(BiometricError::NoSubjectDetected),
        1 => {
            let descriptor = descriptors.remove(0);
            match descriptor.defect() {
                Some(defect) => Err(BiometricError::MalformedDescriptor(defect)),
                None => Ok(descriptor),
            }
        }
        count => Err(BiometricError::AmbiguousSubject { count }),
    }
}

//! Biometric capture types: image samples and detected-face descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypeError;

/// Axis-aligned face region in image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoundingBox {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// A box is well-formed when it is not inverted on either axis.
    pub fn is_well_formed(&self) -> bool {
        self.width() >= 0 && self.height() >= 0
    }

    /// Space-separated `left top right bottom`, the persisted form.
    pub fn flatten(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.left, self.top, self.right, self.bottom)
    }
}

impl FromStr for BoundingBox {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<i32> = s
            .split_whitespace()
            .map(|p| p.parse::<i32>())
            .collect::<Result<_, _>>()
            .map_err(|e| TypeError::InvalidBoundingBox(format!("{s:?}: {e}")))?;
        match parts.as_slice() {
            [left, top, right, bottom] => Ok(Self::new(*left, *top, *right, *bottom)),
            _ => Err(TypeError::InvalidBoundingBox(format!(
                "{s:?}: expected 4 coordinates, got {}",
                parts.len()
            ))),
        }
    }
}

/// Features extracted from one detected face in one capture.
///
/// Eye-openness values are probabilities in `[0, 1]`; `None` means the
/// detector could not classify that eye.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiometricDescriptor {
    pub bounds: BoundingBox,
    #[serde(default)]
    pub left_eye_open: Option<f32>,
    #[serde(default)]
    pub right_eye_open: Option<f32>,
}

impl BiometricDescriptor {
    pub fn new(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            left_eye_open: None,
            right_eye_open: None,
        }
    }

    pub fn with_eyes(mut self, left: Option<f32>, right: Option<f32>) -> Self {
        self.left_eye_open = left;
        self.right_eye_open = right;
        self
    }

    /// Returns a description of the first problem found, if any.
    pub fn defect(&self) -> Option<String> {
        if !self.bounds.is_well_formed() {
            return Some(format!("inverted bounding box {}", self.bounds));
        }
        for (side, p) in [("left", self.left_eye_open), ("right", self.right_eye_open)] {
            if let Some(p) = p {
                if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                    return Some(format!("{side} eye probability {p} outside [0, 1]"));
                }
            }
        }
        None
    }

    pub fn is_well_formed(&self) -> bool {
        self.defect().is_none()
    }
}

/// A single still image produced by the camera collaborator.
///
/// Opaque to the workflow; only the biometric detector interprets `bytes`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSample {
    pub bytes: Vec<u8>,
    /// Clockwise rotation the detector must apply to get an upright image.
    pub rotation_degrees: u16,
}

impl ImageSample {
    pub fn new(bytes: Vec<u8>, rotation_degrees: u16) -> Self {
        Self {
            bytes,
            rotation_degrees,
        }
    }
}

impl fmt::Debug for ImageSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSample")
            .field("len", &self.bytes.len())
            .field("rotation_degrees", &self.rotation_degrees)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_then_parse() {
        let b = BoundingBox::new(10, -4, 210, 300);
        assert_eq!(b.flatten(), "10 -4 210 300");
        assert_eq!("10 -4 210 300".parse::<BoundingBox>().unwrap(), b);
    }

    #[test]
    fn parse_rejects_wrong_arity_and_garbage() {
        assert!("1 2 3".parse::<BoundingBox>().is_err());
        assert!("1 2 3 4 5".parse::<BoundingBox>().is_err());
        assert!("a b c d".parse::<BoundingBox>().is_err());
    }

    #[test]
    fn inverted_box_is_malformed() {
        let d = BiometricDescriptor::new(BoundingBox::new(100, 0, 10, 50));
        assert!(!d.is_well_formed());
    }

    #[test]
    fn eye_probability_range_checked() {
        let base = BiometricDescriptor::new(BoundingBox::new(0, 0, 10, 10));
        assert!(base.clone().with_eyes(Some(0.0), Some(1.0)).is_well_formed());
        assert!(base.clone().with_eyes(None, None).is_well_formed());
        assert!(!base.clone().with_eyes(Some(1.2), None).is_well_formed());
        assert!(!base.clone().with_eyes(None, Some(-0.1)).is_well_formed());
        assert!(!base.with_eyes(Some(f32::NAN), None).is_well_formed());
    }

    #[test]
    fn descriptor_json_defaults_missing_eyes_to_unknown() {
        let json = r#"{"bounds":{"left":1,"top":2,"right":3,"bottom":4}}"#;
        let d: BiometricDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.left_eye_open, None);
        assert_eq!(d.right_eye_open, None);
    }

    #[test]
    fn sample_debug_hides_bytes() {
        let s = ImageSample::new(vec![0xff; 1024], 90);
        assert_eq!(
            format!("{s:?}"),
            "ImageSample { len: 1024, rotation_degrees: 90 }"
        );
    }
}

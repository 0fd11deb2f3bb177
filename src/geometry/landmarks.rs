use super::Point2D;
use std::collections::BTreeMap;

/// Body joints in COCO keypoint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// All joints, indexed the way COCO-17 keypoint models emit them
    pub const COCO: [Joint; 17] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];
}

/// Whether landmark coordinates are image fractions or pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateSpace {
    /// Fractions of the image width/height in [0, 1]
    Normalized,
    Pixels,
}

/// A detected joint position with the estimator's confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub point: Point2D,
    pub score: f32,
}

/// Joint coordinates for one subject, tied to the image they were detected in
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    width: u32,
    height: u32,
    space: CoordinateSpace,
    joints: BTreeMap<Joint, Landmark>,
}

impl LandmarkSet {
    pub fn new(width: u32, height: u32, space: CoordinateSpace) -> Self {
        Self {
            width,
            height,
            space,
            joints: BTreeMap::new(),
        }
    }

    pub fn normalized(width: u32, height: u32) -> Self {
        Self::new(width, height, CoordinateSpace::Normalized)
    }

    pub fn pixels(width: u32, height: u32) -> Self {
        Self::new(width, height, CoordinateSpace::Pixels)
    }

    /// Builder-style insert with full confidence
    pub fn with(mut self, joint: Joint, x: f64, y: f64) -> Self {
        self.insert(joint, Point2D::new(x, y), 1.0);
        self
    }

    pub fn insert(&mut self, joint: Joint, point: Point2D, score: f32) {
        self.joints.insert(joint, Landmark { point, score });
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.joints.get(&joint)
    }

    /// Joint position in pixel space of the source image
    pub fn pixel(&self, joint: Joint) -> Option<Point2D> {
        let landmark = self.joints.get(&joint)?;
        Some(match self.space {
            CoordinateSpace::Pixels => landmark.point,
            CoordinateSpace::Normalized => Point2D::new(
                landmark.point.x * self.width as f64,
                landmark.point.y * self.height as f64,
            ),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn space(&self) -> CoordinateSpace {
        self.space
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

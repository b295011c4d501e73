/// Axis-aligned bounding box in integer pixel coordinates.
///
/// `(x1, y1)` is the top-left corner, `(x2, y2)` the bottom-right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BoundingBox {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Inclusive rectangle overlap: boxes that merely touch at an edge or
    /// corner count as overlapping.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        !(self.x2 < other.x1
            || self.x1 > other.x2
            || self.y2 < other.y1
            || self.y1 > other.y2)
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

/// Detector classes, with the class ids the detection model emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectClass {
    Boots,
    DustMask,
    Glasses,
    Gloves,
    Helmet,
    Person,
    SafetyVest,
}

impl ObjectClass {
    /// Map a raw model class id to its class. Unknown ids return `None` and
    /// are ignored downstream.
    pub fn from_class_id(class_id: i64) -> Option<Self> {
        match class_id {
            0 => Some(ObjectClass::Boots),
            1 => Some(ObjectClass::DustMask),
            2 => Some(ObjectClass::Glasses),
            3 => Some(ObjectClass::Gloves),
            4 => Some(ObjectClass::Helmet),
            5 => Some(ObjectClass::Person),
            6 => Some(ObjectClass::SafetyVest),
            _ => None,
        }
    }

    pub fn class_id(self) -> i64 {
        match self {
            ObjectClass::Boots => 0,
            ObjectClass::DustMask => 1,
            ObjectClass::Glasses => 2,
            ObjectClass::Gloves => 3,
            ObjectClass::Helmet => 4,
            ObjectClass::Person => 5,
            ObjectClass::SafetyVest => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ObjectClass::Boots => "Boots",
            ObjectClass::DustMask => "Dust Mask",
            ObjectClass::Glasses => "Glasses",
            ObjectClass::Gloves => "Gloves",
            ObjectClass::Helmet => "Helmet",
            ObjectClass::Person => "Person",
            ObjectClass::SafetyVest => "Safety Vest",
        }
    }
}

/// One detection produced by the model for one frame.
///
/// Detections are frame-scoped: created fresh each frame, never carried
/// across frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bounds: BoundingBox,
    pub class_id: i64,
    pub confidence: f32,
}

impl Detection {
    pub fn new(bounds: BoundingBox, class_id: i64, confidence: f32) -> Self {
        Self {
            bounds,
            class_id,
            confidence,
        }
    }

    pub fn object_class(&self) -> Option<ObjectClass> {
        ObjectClass::from_class_id(self.class_id)
    }

    pub fn is_person(&self) -> bool {
        self.object_class() == Some(ObjectClass::Person)
    }
}

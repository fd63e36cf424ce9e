use crate::F;

/// Fields shared by every element variant.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Header {
    pub id: Option<String>,
    pub transform: Option<String>,
}

/// The document element tree. Container variants own an ordered child
/// vector; shape variants carry only their geometry. `Use` is neither — it
/// carries no children of its own and is resolved against the document's
/// id map by the walker.
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Svg { header: Header, children: Vec<Element> },
    Group { header: Header, children: Vec<Element> },
    Anchor { header: Header, children: Vec<Element> },
    Defs { header: Header, children: Vec<Element> },
    Use { header: Header, href: String, x: F, y: F },
    Text { header: Header },
    Path { header: Header, d: String },
    Line { header: Header, x1: F, y1: F, x2: F, y2: F },
    Rect { header: Header, x: F, y: F, width: F, height: F, rx: F, ry: F },
    Circle { header: Header, cx: F, cy: F, r: F },
    Ellipse { header: Header, cx: F, cy: F, rx: F, ry: F },
    Polygon { header: Header, points: Vec<(F, F)> },
    Polyline { header: Header, points: Vec<(F, F)> },
}

impl Element {
    pub fn header(&self) -> &Header {
        match self {
            Element::Svg { header, .. }
            | Element::Group { header, .. }
            | Element::Anchor { header, .. }
            | Element::Defs { header, .. }
            | Element::Use { header, .. }
            | Element::Text { header, .. }
            | Element::Path { header, .. }
            | Element::Line { header, .. }
            | Element::Rect { header, .. }
            | Element::Circle { header, .. }
            | Element::Ellipse { header, .. }
            | Element::Polygon { header, .. }
            | Element::Polyline { header, .. } => header,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.header().id.as_deref()
    }

    pub fn transform_str(&self) -> Option<&str> {
        self.header().transform.as_deref()
    }

    pub fn children(&self) -> Option<&[Element]> {
        match self {
            Element::Svg { children, .. }
            | Element::Group { children, .. }
            | Element::Anchor { children, .. }
            | Element::Defs { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Element::Svg { .. } | Element::Group { .. } | Element::Anchor { .. } | Element::Defs { .. }
        )
    }

    /// True for the shape primitives the evaluator can turn into a
    /// segment directly. `Use` and `Text` are neither containers nor
    /// leaves in this sense — they're resolved or skipped by the walker.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Element::Path { .. }
                | Element::Line { .. }
                | Element::Rect { .. }
                | Element::Circle { .. }
                | Element::Ellipse { .. }
                | Element::Polygon { .. }
                | Element::Polyline { .. }
        )
    }
}

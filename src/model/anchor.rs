use super::element::ElementId;

/// Where synthesized datatypes go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatatypesAnchor {
    /// An existing package that receives the datatypes directly.
    Container(ElementId),
    /// A package below which a `Data Types` package is found or created.
    Parent(ElementId),
}

impl DatatypesAnchor {
    pub fn id(&self) -> &ElementId {
        match self {
            Self::Container(id) | Self::Parent(id) => id,
        }
    }
}

/// Target locations of a conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchors {
    /// Package that receives the converted packages.
    pub root: ElementId,
    pub datatypes: DatatypesAnchor,
}

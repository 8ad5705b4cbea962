//! Target references accepted by commands and lookups
//!
//! Commands take either a raw id or a zone/output record. `TargetRef` keeps
//! that distinction so each command can resolve the id it needs: output
//! commands want an output id, zone commands accept an output id or a zone id.

use super::{Output, OutputId, Zone, ZoneId};

/// A reference to a zone or output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// A raw id, used verbatim by every command
    Id(String),
    /// A record exposing a zone id, an output id, or both
    Ref {
        zone_id: Option<ZoneId>,
        output_id: Option<OutputId>,
    },
}

impl TargetRef {
    /// A raw id; `None` if the id is empty
    pub fn id(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.is_empty()).then_some(TargetRef::Id(id))
    }

    /// A record reference; `None` if neither id is present
    pub fn record(zone_id: Option<ZoneId>, output_id: Option<OutputId>) -> Option<Self> {
        let zone_id = zone_id.filter(|id| !id.is_empty());
        let output_id = output_id.filter(|id| !id.is_empty());
        if zone_id.is_none() && output_id.is_none() {
            return None;
        }
        Some(TargetRef::Ref { zone_id, output_id })
    }

    /// Id to send for output-scoped commands
    pub fn output_id(&self) -> Option<&str> {
        match self {
            TargetRef::Id(id) => Some(id),
            TargetRef::Ref { output_id, .. } => output_id.as_ref().map(OutputId::as_str),
        }
    }

    /// Id to send for zone-or-output commands: the output id wins over the zone id
    pub fn zone_or_output_id(&self) -> Option<&str> {
        match self {
            TargetRef::Id(id) => Some(id),
            TargetRef::Ref { zone_id, output_id } => output_id
                .as_ref()
                .map(OutputId::as_str)
                .or_else(|| zone_id.as_ref().map(ZoneId::as_str)),
        }
    }

    /// Zone id carried by a record reference
    pub fn zone_id(&self) -> Option<&str> {
        match self {
            TargetRef::Id(_) => None,
            TargetRef::Ref { zone_id, .. } => zone_id.as_ref().map(ZoneId::as_str),
        }
    }

    /// Output id carried by a record reference
    pub fn record_output_id(&self) -> Option<&str> {
        match self {
            TargetRef::Id(_) => None,
            TargetRef::Ref { output_id, .. } => output_id.as_ref().map(OutputId::as_str),
        }
    }
}

/// Conversion into an optional target reference
///
/// `None`, empty ids and records without ids convert to `None`, which every
/// command treats as a missing target.
pub trait IntoTarget {
    fn into_target(self) -> Option<TargetRef>;
}

impl IntoTarget for TargetRef {
    fn into_target(self) -> Option<TargetRef> {
        match self {
            TargetRef::Id(id) => TargetRef::id(id),
            TargetRef::Ref { zone_id, output_id } => TargetRef::record(zone_id, output_id),
        }
    }
}

impl IntoTarget for &TargetRef {
    fn into_target(self) -> Option<TargetRef> {
        self.clone().into_target()
    }
}

impl IntoTarget for &str {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::id(self)
    }
}

impl IntoTarget for String {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::id(self)
    }
}

impl IntoTarget for &String {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::id(self.as_str())
    }
}

impl IntoTarget for ZoneId {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::record(Some(self), None)
    }
}

impl IntoTarget for &ZoneId {
    fn into_target(self) -> Option<TargetRef> {
        self.clone().into_target()
    }
}

impl IntoTarget for OutputId {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::record(None, Some(self))
    }
}

impl IntoTarget for &OutputId {
    fn into_target(self) -> Option<TargetRef> {
        self.clone().into_target()
    }
}

impl IntoTarget for &Zone {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::record(Some(self.zone_id.clone()), None)
    }
}

impl IntoTarget for &Output {
    fn into_target(self) -> Option<TargetRef> {
        TargetRef::record(Some(self.zone_id.clone()), Some(self.output_id.clone()))
    }
}

impl<T: IntoTarget> IntoTarget for Option<T> {
    fn into_target(self) -> Option<TargetRef> {
        self.and_then(IntoTarget::into_target)
    }
}

//! Internet radio station types

use crate::specid::{SpecId, SpecKind};
use serde::{Deserialize, Serialize};

pub type InternetRadioStationId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetRadioStation {
    pub id: InternetRadioStationId,
    pub stream_url: String,
    pub name: String,
    pub homepage_url: Option<String>,
}

impl InternetRadioStation {
    #[must_use]
    pub fn sid(&self) -> SpecId {
        SpecId::new(SpecKind::InternetRadioStation, self.id)
    }
}

/// Data for creating or replacing a station
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInternetRadioStation {
    pub stream_url: String,
    pub name: String,
    pub homepage_url: Option<String>,
}

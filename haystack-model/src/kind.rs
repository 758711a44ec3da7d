use crate::error::ModelError;
use std::fmt;
use std::str::FromStr;

/// Type tag of a tracked entity, drawn from a fixed set.
///
/// Each kind carries a display label and a sort rank (lowest first) so the
/// type toggle row and the type-order comparator agree on presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EntityKind {
    Base,
    Station,
    Ship,
    Plane,
    Lander,
    Rover,
    Probe,
    Relay,
    Eva,
    Flag,
    DeployedScience,
    SpaceObject,
    Debris,
    Unknown,
    CelestialBody,
}

impl EntityKind {
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Base,
        EntityKind::Station,
        EntityKind::Ship,
        EntityKind::Plane,
        EntityKind::Lander,
        EntityKind::Rover,
        EntityKind::Probe,
        EntityKind::Relay,
        EntityKind::Eva,
        EntityKind::Flag,
        EntityKind::DeployedScience,
        EntityKind::SpaceObject,
        EntityKind::Debris,
        EntityKind::Unknown,
        EntityKind::CelestialBody,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Base => "Base",
            EntityKind::Station => "Station",
            EntityKind::Ship => "Ship",
            EntityKind::Plane => "Plane",
            EntityKind::Lander => "Lander",
            EntityKind::Rover => "Rover",
            EntityKind::Probe => "Probe",
            EntityKind::Relay => "Relay",
            EntityKind::Eva => "EVA",
            EntityKind::Flag => "Flag",
            EntityKind::DeployedScience => "DeployedScienceController",
            EntityKind::SpaceObject => "SpaceObject",
            EntityKind::Debris => "Debris",
            EntityKind::Unknown => "Unknown",
            EntityKind::CelestialBody => "Celestial Bodies",
        }
    }

    /// Presentation rank, lowest first.
    pub fn sort_rank(&self) -> u8 {
        Self::ALL
            .iter()
            .position(|kind| kind == self)
            .map(|idx| idx as u8)
            .unwrap_or(u8::MAX)
    }

    /// Spelling used in configuration files; matches the serde form.
    pub fn config_name(&self) -> &'static str {
        match self {
            EntityKind::Base => "base",
            EntityKind::Station => "station",
            EntityKind::Ship => "ship",
            EntityKind::Plane => "plane",
            EntityKind::Lander => "lander",
            EntityKind::Rover => "rover",
            EntityKind::Probe => "probe",
            EntityKind::Relay => "relay",
            EntityKind::Eva => "eva",
            EntityKind::Flag => "flag",
            EntityKind::DeployedScience => "deployed_science",
            EntityKind::SpaceObject => "space_object",
            EntityKind::Debris => "debris",
            EntityKind::Unknown => "unknown",
            EntityKind::CelestialBody => "celestial_body",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    /// Accepts either the display label or the config name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        EntityKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                kind.label().eq_ignore_ascii_case(trimmed)
                    || kind.config_name().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ModelError::UnknownEntityKind(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_from_str() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.label().parse::<EntityKind>(), Ok(kind));
        }
        assert_eq!("eva".parse::<EntityKind>(), Ok(EntityKind::Eva));
    }

    #[test]
    fn config_names_parse_alongside_labels() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.config_name().parse::<EntityKind>(), Ok(kind));
        }
        assert_eq!(
            "space_object".parse::<EntityKind>(),
            "SpaceObject".parse::<EntityKind>()
        );
        assert_eq!(
            "CELESTIAL_BODY".parse::<EntityKind>(),
            Ok(EntityKind::CelestialBody)
        );
        assert_eq!(
            "Celestial Bodies".parse::<EntityKind>(),
            Ok(EntityKind::CelestialBody)
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_name_matches_serde_spelling() {
        use serde::Deserialize;
        use serde::de::IntoDeserializer;
        use serde::de::value::{Error, StrDeserializer};

        for kind in EntityKind::ALL {
            let deserializer: StrDeserializer<'_, Error> =
                kind.config_name().into_deserializer();
            assert_eq!(EntityKind::deserialize(deserializer), Ok(kind));
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert_eq!(
            "Spaceplane".parse::<EntityKind>(),
            Err(ModelError::UnknownEntityKind("Spaceplane".into()))
        );
    }

    #[test]
    fn sort_rank_follows_catalog_order() {
        assert!(EntityKind::Base.sort_rank() < EntityKind::Ship.sort_rank());
        assert!(EntityKind::Ship.sort_rank() < EntityKind::Debris.sort_rank());
        assert_eq!(EntityKind::CelestialBody.sort_rank(), 14);
    }
}

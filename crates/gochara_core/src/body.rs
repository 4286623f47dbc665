//! Body identifiers and the supported-body safelist.

use std::fmt::{Display, Formatter};

/// Bodies the engine can identify.
///
/// Codes follow the numbering used by the engine's calling convention.
/// Being identifiable does not make a body queryable: only members of
/// [`SUPPORTED_BODIES`] pass the coordinator's validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    MeanNode,
    TrueNode,
    MeanApogee,
    Chiron,
    Ceres,
    Pallas,
    Juno,
    Vesta,
}

/// Bodies accepted by [`crate::EngineHandle`], in canonical order.
pub const SUPPORTED_BODIES: [Body; 12] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::MeanNode,
    Body::TrueNode,
];

impl Body {
    /// Engine body code.
    pub const fn code(self) -> i32 {
        match self {
            Self::Sun => 0,
            Self::Moon => 1,
            Self::Mercury => 2,
            Self::Venus => 3,
            Self::Mars => 4,
            Self::Jupiter => 5,
            Self::Saturn => 6,
            Self::Uranus => 7,
            Self::Neptune => 8,
            Self::Pluto => 9,
            Self::MeanNode => 10,
            Self::TrueNode => 11,
            Self::MeanApogee => 12,
            Self::Chiron => 15,
            Self::Ceres => 17,
            Self::Pallas => 18,
            Self::Juno => 19,
            Self::Vesta => 20,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Sun),
            1 => Some(Self::Moon),
            2 => Some(Self::Mercury),
            3 => Some(Self::Venus),
            4 => Some(Self::Mars),
            5 => Some(Self::Jupiter),
            6 => Some(Self::Saturn),
            7 => Some(Self::Uranus),
            8 => Some(Self::Neptune),
            9 => Some(Self::Pluto),
            10 => Some(Self::MeanNode),
            11 => Some(Self::TrueNode),
            12 => Some(Self::MeanApogee),
            15 => Some(Self::Chiron),
            17 => Some(Self::Ceres),
            18 => Some(Self::Pallas),
            19 => Some(Self::Juno),
            20 => Some(Self::Vesta),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::MeanNode => "Mean Node",
            Self::TrueNode => "True Node",
            Self::MeanApogee => "Mean Apogee",
            Self::Chiron => "Chiron",
            Self::Ceres => "Ceres",
            Self::Pallas => "Pallas",
            Self::Juno => "Juno",
            Self::Vesta => "Vesta",
        }
    }

    /// Case-insensitive lookup by name; spaces, dashes and underscores are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();
        ALL_BODIES
            .iter()
            .copied()
            .find(|b| b.name().replace(' ', "").eq_ignore_ascii_case(&key))
    }

    pub fn is_supported(self) -> bool {
        SUPPORTED_BODIES.contains(&self)
    }

    /// Lunar nodes are computed points, not physical bodies.
    pub const fn is_node(self) -> bool {
        matches!(self, Self::MeanNode | Self::TrueNode)
    }
}

const ALL_BODIES: [Body; 18] = [
    Body::Sun,
    Body::Moon,
    Body::Mercury,
    Body::Venus,
    Body::Mars,
    Body::Jupiter,
    Body::Saturn,
    Body::Uranus,
    Body::Neptune,
    Body::Pluto,
    Body::MeanNode,
    Body::TrueNode,
    Body::MeanApogee,
    Body::Chiron,
    Body::Ceres,
    Body::Pallas,
    Body::Juno,
    Body::Vesta,
];

impl Display for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_roundtrip() {
        for body in ALL_BODIES {
            assert_eq!(Body::from_code(body.code()), Some(body));
        }
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(Body::from_code(-1), None);
        assert_eq!(Body::from_code(13), None);
        assert_eq!(Body::from_code(56), None);
    }

    #[test]
    fn safelist_excludes_asteroids() {
        assert!(Body::Mars.is_supported());
        assert!(Body::TrueNode.is_supported());
        assert!(!Body::Chiron.is_supported());
        assert!(!Body::MeanApogee.is_supported());
    }

    #[test]
    fn safelist_order_is_canonical() {
        let codes: Vec<i32> = SUPPORTED_BODIES.iter().map(|b| b.code()).collect();
        assert_eq!(codes, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn names_lookup() {
        assert_eq!(Body::from_name("jupiter"), Some(Body::Jupiter));
        assert_eq!(Body::from_name("true_node"), Some(Body::TrueNode));
        assert_eq!(Body::from_name("Mean Node"), Some(Body::MeanNode));
        assert_eq!(Body::from_name("vulcan"), None);
    }
}

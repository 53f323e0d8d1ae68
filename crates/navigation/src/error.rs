use foundation::UnitError;
use foundation::math::DecompositionError;
use scene::mapping::MappingError;

use crate::config::ConfigError;

#[derive(Debug, Clone, PartialEq)]
pub enum NavigationError {
    Decomposition(DecompositionError),
    Mapping(MappingError),
    Unit(UnitError),
    Config(ConfigError),
    InvalidEyeSeparation(f64),
    InvalidZoom(f64),
}

impl std::fmt::Display for NavigationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NavigationError::Decomposition(e) => write!(f, "camera transform: {e}"),
            NavigationError::Mapping(e) => write!(f, "coordinate mapping: {e}"),
            NavigationError::Unit(e) => write!(f, "units: {e}"),
            NavigationError::Config(e) => write!(f, "{e}"),
            NavigationError::InvalidEyeSeparation(d) => {
                write!(f, "eye separation {d} is not finite")
            }
            NavigationError::InvalidZoom(z) => {
                write!(f, "zoom factor {z} must be finite and positive")
            }
        }
    }
}

impl std::error::Error for NavigationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavigationError::Decomposition(e) => Some(e),
            NavigationError::Mapping(e) => Some(e),
            NavigationError::Unit(e) => Some(e),
            NavigationError::Config(e) => Some(e),
            NavigationError::InvalidEyeSeparation(_) | NavigationError::InvalidZoom(_) => None,
        }
    }
}

impl From<DecompositionError> for NavigationError {
    fn from(e: DecompositionError) -> Self {
        NavigationError::Decomposition(e)
    }
}

impl From<MappingError> for NavigationError {
    fn from(e: MappingError) -> Self {
        NavigationError::Mapping(e)
    }
}

impl From<UnitError> for NavigationError {
    fn from(e: UnitError) -> Self {
        NavigationError::Unit(e)
    }
}

impl From<ConfigError> for NavigationError {
    fn from(e: ConfigError) -> Self {
        NavigationError::Config(e)
    }
}

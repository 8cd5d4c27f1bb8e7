use std::fmt;

/// AQI severity band, used only to pick a display colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiTier {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiTier {
    /// Total over every integer: negatives land in `Good`, anything above 300 in `Hazardous`.
    pub fn from_aqi(aqi: i64) -> Self {
        match aqi {
            i64::MIN..=50 => AqiTier::Good,
            51..=100 => AqiTier::Moderate,
            101..=150 => AqiTier::UnhealthyForSensitiveGroups,
            151..=200 => AqiTier::Unhealthy,
            201..=300 => AqiTier::VeryUnhealthy,
            _ => AqiTier::Hazardous,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiTier::Good => "Good",
            AqiTier::Moderate => "Moderate",
            AqiTier::UnhealthyForSensitiveGroups => "Unhealthy-for-sensitive-groups",
            AqiTier::Unhealthy => "Unhealthy",
            AqiTier::VeryUnhealthy => "Very-Unhealthy",
            AqiTier::Hazardous => "Hazardous",
        }
    }

    /// Hex colour from the EPA AQI palette.
    pub fn color(&self) -> &'static str {
        match self {
            AqiTier::Good => "#00E400",
            AqiTier::Moderate => "#FFFF00",
            AqiTier::UnhealthyForSensitiveGroups => "#FF7E00",
            AqiTier::Unhealthy => "#FF0000",
            AqiTier::VeryUnhealthy => "#8F3F97",
            AqiTier::Hazardous => "#7E0023",
        }
    }

    pub const fn all() -> &'static [AqiTier] {
        &[
            AqiTier::Good,
            AqiTier::Moderate,
            AqiTier::UnhealthyForSensitiveGroups,
            AqiTier::Unhealthy,
            AqiTier::VeryUnhealthy,
            AqiTier::Hazardous,
        ]
    }
}

impl fmt::Display for AqiTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Countries accepted by the scraper's Indeed/Glassdoor country parameter.
const COUNTRIES: &[&str] = &[
    "argentina",
    "australia",
    "austria",
    "bahrain",
    "bangladesh",
    "belgium",
    "brazil",
    "bulgaria",
    "canada",
    "chile",
    "china",
    "colombia",
    "costa rica",
    "croatia",
    "cyprus",
    "czech republic",
    "denmark",
    "ecuador",
    "egypt",
    "estonia",
    "finland",
    "france",
    "germany",
    "greece",
    "hong kong",
    "hungary",
    "india",
    "indonesia",
    "ireland",
    "israel",
    "italy",
    "japan",
    "kuwait",
    "latvia",
    "lithuania",
    "luxembourg",
    "malaysia",
    "malta",
    "mexico",
    "morocco",
    "netherlands",
    "new zealand",
    "nigeria",
    "norway",
    "oman",
    "pakistan",
    "panama",
    "peru",
    "philippines",
    "poland",
    "portugal",
    "qatar",
    "romania",
    "saudi arabia",
    "singapore",
    "slovakia",
    "slovenia",
    "south africa",
    "south korea",
    "spain",
    "sweden",
    "switzerland",
    "taiwan",
    "thailand",
    "turkey",
    "ukraine",
    "united arab emirates",
    "uk",
    "usa",
    "uruguay",
    "venezuela",
    "vietnam",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Country(&'static str);

impl Country {
    pub const UK: Self = Self("uk");
    pub const USA: Self = Self("usa");
    pub const CANADA: Self = Self("canada");

    /// Name sent to the scraping service.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Title-cased name as shown in the UI ("Uk", "Usa", "New Zealand").
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                chars.next().map_or_else(String::new, |first| {
                    first.to_uppercase().chain(chars).collect::<String>()
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// ZipRecruiter only serves the US and Canadian markets.
    #[must_use]
    pub fn supports_zip_recruiter(&self) -> bool {
        *self == Self::USA || *self == Self::CANADA
    }

    /// All countries, sorted by display name.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut countries: Vec<Self> = COUNTRIES.iter().copied().map(Self).collect();
        countries.sort_by_key(Self::display_name);
        countries
    }
}

impl Default for Country {
    fn default() -> Self {
        Self::UK
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown country: {0}")]
pub struct UnknownCountry(pub String);

impl FromStr for Country {
    type Err = UnknownCountry;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        COUNTRIES
            .iter()
            .copied()
            .find(|c| c.eq_ignore_ascii_case(needle))
            .map(Self)
            .ok_or_else(|| UnknownCountry(s.to_string()))
    }
}

impl Serialize for Country {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.display_name())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_title_case() {
        assert_eq!(Country::UK.display_name(), "Uk");
        assert_eq!(
            "united arab emirates".parse::<Country>().unwrap().to_string(),
            "United Arab Emirates"
        );
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!("Usa".parse::<Country>(), Ok(Country::USA));
        assert_eq!("NEW ZEALAND".parse::<Country>().unwrap().as_str(), "new zealand");
        assert!("worldwide".parse::<Country>().is_err());
    }

    #[test]
    fn test_zip_recruiter_markets() {
        assert!(Country::USA.supports_zip_recruiter());
        assert!(Country::CANADA.supports_zip_recruiter());
        assert!(!Country::UK.supports_zip_recruiter());
    }

    #[test]
    fn test_all_sorted_by_display_name() {
        let names: Vec<String> = Country::all().iter().map(Country::display_name).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"Uk".to_string()));
    }
}

//! Country records as served by the REST Countries API (v3.1).
//!
//! Records are decoded leniently: any field may be missing, `null`, or of the
//! wrong type. Such values decode as defaults and turn into placeholders at
//! render time.

pub mod client;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use client::{CountryClient, FetchError, fetch_countries};

use crate::pipeline::{FieldValue, Row};

/// Placeholder for optional values that are absent.
pub const NOTHING_AVAILABLE: &str = "Nothing Available";

/// Short placeholder used by the detail view for a missing capital.
pub const NOT_AVAILABLE: &str = "N/A";

/// Field decoders that turn `null` or a wrong JSON type into a default
/// instead of failing the whole record.
pub(crate) mod lenient {
    use std::collections::BTreeMap;

    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Any value; `null` or a mismatched type yields `T::default()`.
    pub fn value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).unwrap_or_default())
    }

    /// An object of `T`; entries that do not decode are dropped.
    pub fn map<'de, D, T>(deserializer: D) -> Result<Option<BTreeMap<String, T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            Value::Object(entries) => Ok(Some(
                entries
                    .into_iter()
                    .filter_map(|(key, value)| T::deserialize(value).ok().map(|v| (key, v)))
                    .collect(),
            )),
            _ => Ok(None),
        }
    }

    /// A list of strings (or a single string); non-string items are dropped.
    pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect()),
            Value::String(s) => Ok(vec![s]),
            _ => Ok(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountryName {
    #[serde(deserialize_with = "lenient::value")]
    pub common: String,
    #[serde(deserialize_with = "lenient::value")]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    #[serde(deserialize_with = "lenient::value")]
    pub png: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub svg: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Currency {
    #[serde(deserialize_with = "lenient::value")]
    pub name: String,
    #[serde(deserialize_with = "lenient::value")]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Maps {
    #[serde(deserialize_with = "lenient::value")]
    pub google_maps: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub open_street_maps: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoatOfArms {
    #[serde(deserialize_with = "lenient::value")]
    pub png: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub svg: Option<String>,
}

/// One country as returned by `/all?fields=...`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CountryRecord {
    #[serde(deserialize_with = "lenient::value")]
    pub name: CountryName,
    #[serde(deserialize_with = "lenient::value")]
    pub flags: Flags,
    /// Flag emoji; only present when the API is asked for it.
    #[serde(deserialize_with = "lenient::value")]
    pub flag: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub population: u64,
    #[serde(deserialize_with = "lenient::value")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient::value")]
    pub subregion: Option<String>,
    #[serde(deserialize_with = "lenient::strings")]
    pub capital: Vec<String>,
    #[serde(deserialize_with = "lenient::map")]
    pub currencies: Option<BTreeMap<String, Currency>>,
    #[serde(deserialize_with = "lenient::map")]
    pub languages: Option<BTreeMap<String, String>>,
    #[serde(deserialize_with = "lenient::value")]
    pub maps: Maps,
    #[serde(deserialize_with = "lenient::value")]
    pub coat_of_arms: CoatOfArms,
}

impl CountryRecord {
    /// Record with only a common (and official) name, mostly for tests.
    pub fn named(common: &str) -> Self {
        Self {
            name: CountryName {
                common: common.to_string(),
                official: common.to_string(),
            },
            ..Self::default()
        }
    }

    /// Key used to tell rows apart on screen.
    pub fn display_key(&self) -> &str {
        if self.name.official.is_empty() {
            &self.name.common
        } else {
            &self.name.official
        }
    }

    pub fn first_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }

    /// Capital cell of the table.
    pub fn capital_cell(&self) -> &str {
        self.first_capital().unwrap_or(NOTHING_AVAILABLE)
    }

    /// Capital line of the detail view.
    pub fn capital_detail(&self) -> &str {
        self.first_capital().unwrap_or(NOT_AVAILABLE)
    }

    pub fn region_cell(&self) -> &str {
        non_empty(self.region.as_deref()).unwrap_or(NOTHING_AVAILABLE)
    }

    /// `Region (Subregion)`.
    pub fn region_detail(&self) -> String {
        format!(
            "{} ({})",
            self.region_cell(),
            non_empty(self.subregion.as_deref()).unwrap_or(NOTHING_AVAILABLE)
        )
    }

    /// Name of the first currency.
    pub fn currency_cell(&self) -> &str {
        self.currencies
            .as_ref()
            .and_then(|c| c.values().next())
            .map_or(NOTHING_AVAILABLE, |c| c.name.as_str())
    }

    /// All currencies as `Name (symbol)`, comma separated.
    pub fn currencies_detail(&self) -> String {
        match &self.currencies {
            Some(currencies) if !currencies.is_empty() => currencies
                .values()
                .map(|c| match non_empty(c.symbol.as_deref()) {
                    Some(symbol) => format!("{} ({symbol})", c.name),
                    None => c.name.clone(),
                })
                .collect::<Vec<_>>()
                .join(", "),
            _ => NOTHING_AVAILABLE.to_string(),
        }
    }

    /// All language names, comma separated.
    pub fn languages_display(&self) -> String {
        match &self.languages {
            Some(languages) if !languages.is_empty() => {
                languages.values().cloned().collect::<Vec<_>>().join(", ")
            }
            _ => NOTHING_AVAILABLE.to_string(),
        }
    }

    /// Detail heading: flag emoji (when known) and official name.
    pub fn detail_title(&self) -> String {
        match self.flag_emoji() {
            Some(flag) => format!("{flag} {}", self.display_key()),
            None => self.display_key().to_string(),
        }
    }

    /// Labelled detail rows, in display order.
    pub fn detail_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Capital", self.capital_detail().to_string()),
            ("Region", self.region_detail()),
            ("Population", self.population_display()),
            ("Currencies", self.currencies_detail()),
            ("Languages", self.languages_display()),
            (
                "Coat of Arms",
                self.coat_of_arms_link().unwrap_or(NOTHING_AVAILABLE).to_string(),
            ),
            (
                "Google Maps",
                self.map_link().unwrap_or(NOTHING_AVAILABLE).to_string(),
            ),
        ]
    }

    pub fn population_display(&self) -> String {
        format_population(self.population)
    }

    /// Flag emoji, or one derived from the two-letter flag image name
    /// (`.../w320/fr.png` -> regional indicators `F` `R`).
    pub fn flag_emoji(&self) -> Option<String> {
        if let Some(flag) = non_empty(self.flag.as_deref()) {
            return Some(flag.to_string());
        }
        let link = self.flag_link()?;
        let file = link.rsplit('/').next()?;
        let code = file.split('.').next()?;
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        code.to_ascii_uppercase()
            .chars()
            .map(|c| char::from_u32(0x1F1E6 + (u32::from(c) - u32::from('A'))))
            .collect()
    }

    pub fn flag_link(&self) -> Option<&str> {
        non_empty(self.flags.png.as_deref()).or(non_empty(self.flags.svg.as_deref()))
    }

    pub fn coat_of_arms_link(&self) -> Option<&str> {
        non_empty(self.coat_of_arms.png.as_deref()).or(non_empty(self.coat_of_arms.svg.as_deref()))
    }

    pub fn map_link(&self) -> Option<&str> {
        non_empty(self.maps.google_maps.as_deref())
            .or(non_empty(self.maps.open_street_maps.as_deref()))
    }
}

impl Row for CountryRecord {
    fn search_key(&self) -> &str {
        &self.name.common
    }

    fn field(&self, path: &str) -> FieldValue {
        let segments: Vec<&str> = path.split('.').collect();
        match segments.as_slice() {
            ["name", "common"] => FieldValue::text(&self.name.common),
            ["name", "official"] => FieldValue::text(&self.name.official),
            ["flag"] => FieldValue::opt_text(self.flag.as_deref()),
            ["flags", "png"] => FieldValue::opt_text(self.flags.png.as_deref()),
            ["flags", "svg"] => FieldValue::opt_text(self.flags.svg.as_deref()),
            ["flags", "alt"] => FieldValue::opt_text(self.flags.alt.as_deref()),
            ["population"] => FieldValue::Number(self.population as f64),
            ["region"] => FieldValue::opt_text(self.region.as_deref()),
            ["subregion"] => FieldValue::opt_text(self.subregion.as_deref()),
            ["capital"] => FieldValue::List(self.capital.iter().map(FieldValue::text).collect()),
            ["capital", index] => index
                .parse::<usize>()
                .ok()
                .and_then(|i| self.capital.get(i))
                .map_or(FieldValue::Null, FieldValue::text),
            ["currencies", code, "name"] => self
                .currencies
                .as_ref()
                .and_then(|c| c.get(*code))
                .map_or(FieldValue::Null, |c| FieldValue::text(&c.name)),
            ["currencies", code, "symbol"] => FieldValue::opt_text(
                self.currencies
                    .as_ref()
                    .and_then(|c| c.get(*code))
                    .and_then(|c| c.symbol.as_deref()),
            ),
            ["languages", code] => FieldValue::opt_text(
                self.languages
                    .as_ref()
                    .and_then(|l| l.get(*code))
                    .map(String::as_str),
            ),
            ["maps", "googleMaps"] => FieldValue::opt_text(self.maps.google_maps.as_deref()),
            ["maps", "openStreetMaps"] => {
                FieldValue::opt_text(self.maps.open_street_maps.as_deref())
            }
            ["coatOfArms", "png"] => FieldValue::opt_text(self.coat_of_arms.png.as_deref()),
            ["coatOfArms", "svg"] => FieldValue::opt_text(self.coat_of_arms.svg.as_deref()),
            _ => FieldValue::Null,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Formats a population with thousands separators (`1234567` -> `1,234,567`).
pub fn format_population(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn france() -> CountryRecord {
        serde_json::from_value(serde_json::json!({
            "name": {
                "common": "France",
                "official": "French Republic",
                "nativeName": { "fra": { "official": "République française", "common": "France" } }
            },
            "flags": { "png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg", "alt": "Tricolour" },
            "population": 67391582,
            "region": "Europe",
            "subregion": "Western Europe",
            "capital": ["Paris"],
            "currencies": { "EUR": { "name": "Euro", "symbol": "€" } },
            "languages": { "fra": "French" },
            "maps": { "googleMaps": "https://goo.gl/maps/g7QxxSFsWyTPKuzd7", "openStreetMaps": "https://www.openstreetmap.org/relation/1403916" },
            "coatOfArms": { "png": "https://mainfacts.com/media/images/coats_of_arms/fr.png" }
        }))
        .unwrap()
    }

    #[test]
    fn test_decode_full_record() {
        let fr = france();
        assert_eq!(fr.name.common, "France");
        assert_eq!(fr.display_key(), "French Republic");
        assert_eq!(fr.population, 67_391_582);
        assert_eq!(fr.capital_cell(), "Paris");
        assert_eq!(fr.currency_cell(), "Euro");
        assert_eq!(fr.currencies_detail(), "Euro (€)");
        assert_eq!(fr.languages_display(), "French");
        assert_eq!(fr.region_detail(), "Europe (Western Europe)");
        assert_eq!(
            fr.coat_of_arms_link(),
            Some("https://mainfacts.com/media/images/coats_of_arms/fr.png")
        );
        assert_eq!(fr.map_link(), Some("https://goo.gl/maps/g7QxxSFsWyTPKuzd7"));
    }

    #[test]
    fn test_decode_name_only_record() {
        let record: CountryRecord =
            serde_json::from_str(r#"{"name":{"common":"C1"}}"#).unwrap();
        assert_eq!(record.name.common, "C1");
        assert_eq!(record.display_key(), "C1");
        assert_eq!(record.population, 0);
        assert_eq!(record.capital_cell(), NOTHING_AVAILABLE);
        assert_eq!(record.capital_detail(), NOT_AVAILABLE);
        assert_eq!(record.currency_cell(), NOTHING_AVAILABLE);
        assert_eq!(record.currencies_detail(), NOTHING_AVAILABLE);
        assert_eq!(record.languages_display(), NOTHING_AVAILABLE);
        assert_eq!(record.region_detail(), "Nothing Available (Nothing Available)");
        assert_eq!(record.coat_of_arms_link(), None);
        assert_eq!(record.map_link(), None);
    }

    #[test]
    fn test_null_and_mistyped_fields_decode_as_defaults() {
        let records: Vec<CountryRecord> = serde_json::from_value(serde_json::json!([
            {
                "name": { "common": "France", "official": "French Republic" },
                "population": 67391582,
                "capital": ["Paris"]
            },
            {
                "name": { "common": "Nullland", "official": null },
                "flags": null,
                "population": null,
                "region": 42,
                "capital": null,
                "currencies": { "AAA": null, "BBB": { "name": "Beta", "symbol": null } },
                "languages": { "nul": null, "eng": "English" },
                "maps": null,
                "coatOfArms": "nope"
            },
            {
                "name": null,
                "population": "many",
                "capital": ["Somewhere", null, 7]
            }
        ]))
        .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].capital_cell(), "Paris");

        let null = &records[1];
        assert_eq!(null.name.common, "Nullland");
        assert_eq!(null.display_key(), "Nullland");
        assert_eq!(null.population, 0);
        assert_eq!(null.region_cell(), NOTHING_AVAILABLE);
        assert_eq!(null.capital_cell(), NOTHING_AVAILABLE);
        assert_eq!(null.currencies_detail(), "Beta");
        assert_eq!(null.languages_display(), "English");
        assert_eq!(null.map_link(), None);
        assert_eq!(null.coat_of_arms_link(), None);
        assert_eq!(null.flag_emoji(), None);

        let nameless = &records[2];
        assert_eq!(nameless.name.common, "");
        assert_eq!(nameless.population, 0);
        assert_eq!(nameless.capital, vec!["Somewhere".to_string()]);
    }

    #[test]
    fn test_empty_maps_render_placeholders() {
        let record: CountryRecord = serde_json::from_str(
            r#"{"name":{"common":"Antarctica"},"capital":[],"currencies":{},"languages":{},"coatOfArms":{}}"#,
        )
        .unwrap();
        assert_eq!(record.capital_cell(), NOTHING_AVAILABLE);
        assert_eq!(record.currency_cell(), NOTHING_AVAILABLE);
        assert_eq!(record.currencies_detail(), NOTHING_AVAILABLE);
        assert_eq!(record.languages_display(), NOTHING_AVAILABLE);
    }

    #[test]
    fn test_currency_without_symbol() {
        let record: CountryRecord = serde_json::from_str(
            r#"{"name":{"common":"X"},"currencies":{"AAA":{"name":"Alpha"},"BBB":{"name":"Beta","symbol":"b"}}}"#,
        )
        .unwrap();
        assert_eq!(record.currencies_detail(), "Alpha, Beta (b)");
        assert_eq!(record.currency_cell(), "Alpha");
    }

    #[test]
    fn test_field_lookup_paths() {
        let fr = france();
        assert_eq!(fr.field("name.common"), FieldValue::text("France"));
        assert_eq!(fr.field("population"), FieldValue::Number(67_391_582.0));
        assert_eq!(
            fr.field("capital"),
            FieldValue::List(vec![FieldValue::text("Paris")])
        );
        assert_eq!(fr.field("capital.0"), FieldValue::text("Paris"));
        assert_eq!(fr.field("capital.3"), FieldValue::Null);
        assert_eq!(fr.field("currencies.EUR.symbol"), FieldValue::text("€"));
        assert_eq!(fr.field("languages.fra"), FieldValue::text("French"));
        assert_eq!(fr.field("name.nope"), FieldValue::Null);
        assert_eq!(fr.field("area"), FieldValue::Null);
    }

    #[test]
    fn test_detail_view() {
        let fr = france();
        assert_eq!(fr.detail_title(), "\u{1F1EB}\u{1F1F7} French Republic");

        let fields = fr.detail_fields();
        let labels: Vec<_> = fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(
            labels,
            vec![
                "Capital",
                "Region",
                "Population",
                "Currencies",
                "Languages",
                "Coat of Arms",
                "Google Maps"
            ]
        );
        assert_eq!(fields[1].1, "Europe (Western Europe)");
        assert_eq!(fields[2].1, "67,391,582");

        let bare = CountryRecord::named("Atlantis");
        assert_eq!(bare.detail_title(), "Atlantis");
        assert_eq!(bare.detail_fields()[0].1, NOT_AVAILABLE);
        assert_eq!(bare.detail_fields()[5].1, NOTHING_AVAILABLE);
        assert_eq!(bare.detail_fields()[6].1, NOTHING_AVAILABLE);
    }

    #[test]
    fn test_flag_emoji() {
        assert_eq!(france().flag_emoji().as_deref(), Some("\u{1F1EB}\u{1F1F7}"));

        let explicit = CountryRecord {
            flag: Some("\u{1F1E9}\u{1F1EA}".into()),
            ..CountryRecord::named("Germany")
        };
        assert_eq!(explicit.flag_emoji().as_deref(), Some("\u{1F1E9}\u{1F1EA}"));

        let odd = CountryRecord {
            flags: Flags {
                png: Some("https://example.com/flags/union.png".into()),
                ..Flags::default()
            },
            ..CountryRecord::named("Union")
        };
        assert_eq!(odd.flag_emoji(), None);
        assert_eq!(CountryRecord::named("Nowhere").flag_emoji(), None);
    }

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(67_391_582), "67,391,582");
        assert_eq!(format_population(1_402_112_000), "1,402,112,000");
    }
}

use serde_json::Value;
use tracing::debug;
use crate::core::dataset::parse_integral;
use crate::core::error::{Error, Result};
use crate::core::types::Region;
use crate::query::criteria::FilterCriteria;

/// Builds `FilterCriteria` from structured client input: repeated
/// query-string parameters or a JSON body. Values that cannot be coerced
/// are dropped from their facet; only a body of the wrong shape is an error.
///
/// Recognised keys: `year`, `genre`, `platform`, `publisher`, `region`,
/// and `name` (alias `game`). Other keys are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct CriteriaParser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facet {
    Year,
    Genre,
    Platform,
    Publisher,
    Region,
    Name,
}

impl Facet {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "year" => Some(Facet::Year),
            "genre" => Some(Facet::Genre),
            "platform" => Some(Facet::Platform),
            "publisher" => Some(Facet::Publisher),
            "region" => Some(Facet::Region),
            "name" | "game" => Some(Facet::Name),
            _ => None,
        }
    }
}

impl CriteriaParser {
    pub fn new() -> Self {
        CriteriaParser
    }

    /// e.g. `[("year", "2005"), ("genre", "Action"), ("genre", "Sports")]`
    pub fn from_pairs<I, K, V>(&self, pairs: I) -> FilterCriteria
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = FilterCriteria::new();
        for (key, value) in pairs {
            if let Some(facet) = Facet::from_key(key.as_ref().trim()) {
                self.push_text(&mut criteria, facet, value.as_ref());
            }
        }
        criteria
    }

    /// e.g. `year=2005&genre=Action&region=JP&name=mario+kart`
    pub fn from_query_string(&self, query: &str) -> FilterCriteria {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) => (decode_component(key), decode_component(value)),
                None => (decode_component(part), String::new()),
            });
        self.from_pairs(pairs)
    }

    pub fn from_json_str(&self, body: &str) -> Result<FilterCriteria> {
        let value: Value = serde_json::from_str(body)?;
        self.from_json(&value)
    }

    /// Accepts `{"filters": {...}}` or the filter object itself
    pub fn from_json(&self, body: &Value) -> Result<FilterCriteria> {
        let object = match body {
            Value::Object(object) => object,
            other => return Err(Error::invalid_criteria(format!("expected a JSON object, got {}", kind_of(other)))),
        };

        let filters = match object.get("filters") {
            Some(Value::Object(filters)) => filters,
            Some(Value::Null) => return Ok(FilterCriteria::new()),
            Some(other) => {
                return Err(Error::invalid_criteria(format!("'filters' must be an object, got {}", kind_of(other))));
            }
            None => object,
        };

        let mut criteria = FilterCriteria::new();
        for (key, value) in filters {
            let facet = match Facet::from_key(key) {
                Some(facet) => facet,
                None => {
                    debug!(key = %key, "Ignoring unknown filter key");
                    continue;
                }
            };

            for scalar in scalars(key, value)? {
                match (facet, scalar) {
                    (Facet::Year, Value::Number(n)) => {
                        if let Some(year) = number_to_year(n) {
                            criteria.years.insert(year);
                        }
                    }
                    (_, Value::String(s)) => self.push_text(&mut criteria, facet, s),
                    (_, Value::Number(n)) => self.push_text(&mut criteria, facet, &n.to_string()),
                    _ => {}
                }
            }
        }

        Ok(criteria)
    }

    fn push_text(&self, criteria: &mut FilterCriteria, facet: Facet, raw: &str) {
        let value = raw.trim();
        if value.is_empty() && facet != Facet::Name {
            return;
        }

        match facet {
            Facet::Year => {
                if let Some(year) = parse_integral(value).and_then(|y| i32::try_from(y).ok()) {
                    criteria.years.insert(year);
                }
            }
            Facet::Genre => {
                criteria.genres.insert(value.to_string());
            }
            Facet::Platform => {
                criteria.platforms.insert(value.to_string());
            }
            Facet::Publisher => {
                criteria.publishers.insert(value.to_string());
            }
            Facet::Region => {
                if let Ok(region) = value.parse::<Region>() {
                    criteria.regions.insert(region);
                }
            }
            Facet::Name => {
                // First name wins, as with a single-valued query parameter.
                // The needle is untrimmed so a bare space still filters.
                if criteria.name.is_none() {
                    criteria.set_name(raw);
                }
            }
        }
    }
}

/// Flatten a facet value into its scalar items; nested containers are rejected
fn scalars<'v>(key: &str, value: &'v Value) -> Result<Vec<&'v Value>> {
    let items: Vec<&Value> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().collect(),
        scalar => vec![scalar],
    };

    for item in &items {
        if matches!(item, Value::Object(_) | Value::Array(_)) {
            return Err(Error::invalid_criteria(format!(
                "filter '{}' must hold scalars, got {}",
                key,
                kind_of(item)
            )));
        }
    }

    Ok(items.into_iter().filter(|item| !item.is_null()).collect())
}

fn number_to_year(n: &serde_json::Number) -> Option<i32> {
    if let Some(i) = n.as_i64() {
        return i32::try_from(i).ok();
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .and_then(|f| i32::try_from(f as i64).ok())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Form-urlencoded component: `+` is a space, bad escapes pass through
fn decode_component(input: &str) -> String {
    let spaced = input.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn pairs_drop_invalid_values() {
        let criteria = CriteriaParser::new().from_pairs([
            ("year", "2005"),
            ("year", "two thousand"),
            ("region", "jp"),
            ("region", "Global"),
            ("genre", " "),
            ("colour", "red"),
        ]);
        assert_eq!(criteria.years.to_vec(), vec![2005]);
        assert_eq!(criteria.regions.to_vec(), vec![Region::JP]);
        assert!(criteria.genres.is_empty());
    }

    #[test]
    fn query_string_is_percent_decoded() {
        let criteria = CriteriaParser::new()
            .from_query_string("?genre=Role-Playing&publisher=Electronic+Arts&name=Pok%C3%A9mon&year=2005.0");
        assert_eq!(criteria.genres.to_vec(), vec!["Role-Playing".to_string()]);
        assert_eq!(criteria.publishers.to_vec(), vec!["Electronic Arts".to_string()]);
        assert_eq!(criteria.name.as_deref(), Some("Pokémon"));
        assert_eq!(criteria.years.to_vec(), vec![2005]);
    }

    #[test]
    fn whitespace_name_is_kept_verbatim() {
        let parser = CriteriaParser::new();
        assert_eq!(parser.from_query_string("name=+").name.as_deref(), Some(" "));
        assert_eq!(parser.from_query_string("game=%20mario").name.as_deref(), Some(" mario"));
        assert_eq!(parser.from_query_string("name=").name, None);
    }

    #[test]
    fn malformed_escapes_pass_through() {
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("a%2"), "a%2");
        assert_eq!(decode_component("caf%C3%A9+bar"), "café bar");
        assert_eq!(decode_component("1%2B1"), "1+1");
    }

    #[test]
    fn json_body_with_filters_wrapper() {
        let body = json!({
            "filters": {
                "year": ["2005", 2006, 2007.0, "bad"],
                "genre": ["Action"],
                "region": "EU",
                "game": null
            }
        });
        let criteria = CriteriaParser::new().from_json(&body).unwrap();
        assert_eq!(criteria.years.to_vec(), vec![2005, 2006, 2007]);
        assert_eq!(criteria.genres.to_vec(), vec!["Action".to_string()]);
        assert_eq!(criteria.regions.to_vec(), vec![Region::EU]);
        assert_eq!(criteria.name, None);
    }

    #[test]
    fn bare_filter_object_is_accepted() {
        let criteria = CriteriaParser::new().from_json(&json!({"game": "mario"})).unwrap();
        assert_eq!(criteria.name.as_deref(), Some("mario"));
    }

    #[test]
    fn wrong_shapes_are_invalid_criteria() {
        let parser = CriteriaParser::new();
        for body in [json!([2005]), json!("year=2005"), json!({"filters": [1]}), json!({"year": {"from": 2005}})] {
            let err = parser.from_json(&body).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidCriteria);
        }
        assert_eq!(parser.from_json_str("{not json").unwrap_err().kind, ErrorKind::InvalidCriteria);
    }

    #[test]
    fn structured_and_json_paths_agree() {
        let parser = CriteriaParser::new();
        let from_pairs = parser.from_pairs([("year", "2005"), ("genre", "Action"), ("region", "NA")]);
        let from_json = parser
            .from_json(&json!({"year": [2005], "genre": ["Action"], "region": ["NA"]}))
            .unwrap();
        assert_eq!(from_pairs, from_json);
    }
}

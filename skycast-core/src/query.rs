use std::fmt;

use crate::{error::InvalidInput, model::Coordinates};

const MIN_CITY_CHARS: usize = 2;
const MAX_CITY_CHARS: usize = 50;

/// What a lookup is for: a place name or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    /// Validates free-text input and wraps the trimmed name.
    pub fn city(input: &str) -> Result<Self, InvalidInput> {
        validate_city_name(input).map(LocationQuery::City)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates(at) => write!(f, "coordinates {at}"),
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '\'' | '.' | ',')
}

fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ('\u{C0}'..='\u{FF}').contains(&c)
}

pub(crate) fn is_numeric_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Shape check for a city name. Returns the trimmed name.
pub fn validate_city_name(input: &str) -> Result<String, InvalidInput> {
    let name = input.trim();
    let len = name.chars().count();

    if name.is_empty() {
        return Err(InvalidInput::Empty);
    }
    if len < MIN_CITY_CHARS {
        return Err(InvalidInput::TooShort);
    }
    if len > MAX_CITY_CHARS {
        return Err(InvalidInput::TooLong);
    }
    if is_numeric_only(name) {
        return Err(InvalidInput::NumericOnly(name.to_string()));
    }
    if !name.chars().all(|c| is_name_letter(c) || is_separator(c)) {
        return Err(InvalidInput::InvalidCharacters);
    }

    let mut run = 0;
    for c in name.chars() {
        run = if is_separator(c) { run + 1 } else { 0 };
        if run >= 3 {
            return Err(InvalidInput::RepeatedSeparators);
        }
    }

    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert_eq!(validate_city_name("  London ").unwrap(), "London");
        assert_eq!(validate_city_name("New York, USA").unwrap(), "New York, USA");
        assert_eq!(validate_city_name("St. John's").unwrap(), "St. John's");
        assert_eq!(validate_city_name("São Paulo").unwrap(), "São Paulo");
        assert_eq!(validate_city_name("Aix-en-Provence").unwrap(), "Aix-en-Provence");
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(validate_city_name("   "), Err(InvalidInput::Empty));
        assert_eq!(validate_city_name("L"), Err(InvalidInput::TooShort));
        assert_eq!(validate_city_name(&"a".repeat(51)), Err(InvalidInput::TooLong));
        assert_eq!(validate_city_name("123"), Err(InvalidInput::NumericOnly("123".into())));
        assert_eq!(validate_city_name("Paris75"), Err(InvalidInput::InvalidCharacters));
        assert_eq!(validate_city_name("北京"), Err(InvalidInput::InvalidCharacters));
        assert_eq!(validate_city_name("New  - York"), Err(InvalidInput::RepeatedSeparators));
    }

    #[test]
    fn fifty_characters_is_allowed() {
        assert!(validate_city_name(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn city_query_wraps_trimmed_name() {
        assert_eq!(LocationQuery::city(" Oslo ").unwrap(), LocationQuery::City("Oslo".into()));
        assert!(LocationQuery::city("42").is_err());
    }
}

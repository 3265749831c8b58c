use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use crate::{ByteFontError, Result};

/// Value `height` holds while it has not been set explicitly.
pub const HEIGHT_UNSPECIFIED: i32 = -1;

/// Placeholder older writers stored when the name was missing.
const MISSING_NAME: &str = "null";

pub const KEY_NAME: &str = "name";
pub const KEY_SIZE: &str = "size";
pub const KEY_STYLE: &str = "style";
pub const KEY_HEIGHT: &str = "height";

/// The known style identifiers. The file stores the raw integer, so
/// [`FontMetadata::style`] may hold values outside of this set.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteFontType {
    #[default]
    Plain = 1,
    Bold = 2,
    Italic = 4,
}

impl ByteFontType {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Plain),
            2 => Some(Self::Bold),
            4 => Some(Self::Italic),
            _ => None,
        }
    }

    pub fn value(self) -> i32 {
        self as i32
    }

    /// Letter used in default output file names.
    pub fn suffix(self) -> char {
        match self {
            Self::Plain => 'p',
            Self::Bold => 'b',
            Self::Italic => 'i',
        }
    }
}

impl Display for ByteFontType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "PLAIN"),
            Self::Bold => write!(f, "BOLD"),
            Self::Italic => write!(f, "ITALIC"),
        }
    }
}

impl FromStr for ByteFontType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PLAIN" | "P" => Ok(Self::Plain),
            "BOLD" | "B" => Ok(Self::Bold),
            "ITALIC" | "I" => Ok(Self::Italic),
            _ => Err(format!("unknown font style '{s}'")),
        }
    }
}

/// Header of a byte font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMetadata {
    name: String,
    size: i32,
    style: i32,
    height: i32,
    extra: BTreeMap<String, String>,
}

impl FontMetadata {
    pub fn new(name: impl Into<String>, size: i32, style: i32) -> Self {
        Self {
            name: name.into(),
            size,
            style,
            height: HEIGHT_UNSPECIFIED,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    /// Validates the raw key/value pairs read between `META_BEGIN` and `META_END`.
    ///
    /// Keys are expected in lower case. `name`, `size` and `style` are required,
    /// `size` and `style` must be positive. `height` is optional and may be
    /// negative. Other keys are kept in [`FontMetadata::extra`].
    pub fn from_meta(meta: &BTreeMap<String, String>) -> Result<Self> {
        let name = match meta.get(KEY_NAME) {
            Some(name) if !name.is_empty() && name != MISSING_NAME => name.clone(),
            Some(name) => return Err(ByteFontError::invalid_meta(KEY_NAME, name.as_str(), "name must not be empty")),
            None => return Err(ByteFontError::invalid_meta(KEY_NAME, MISSING_NAME, "missing")),
        };
        let size = parse_positive(meta, KEY_SIZE)?;
        let style = parse_positive(meta, KEY_STYLE)?;

        let mut result = Self::new(name, size, style);
        if let Some(height) = meta.get(KEY_HEIGHT) {
            result = result.with_height(height.parse().map_err(|e| ByteFontError::invalid_meta(KEY_HEIGHT, height.as_str(), e))?);
        }
        result.extra = meta
            .iter()
            .filter(|(k, _)| ![KEY_NAME, KEY_SIZE, KEY_STYLE, KEY_HEIGHT].contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(result)
    }

    /// Adds a key that carries no meaning for the format but is written back.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into().to_lowercase(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn style(&self) -> i32 {
        self.style
    }

    pub fn font_type(&self) -> Option<ByteFontType> {
        ByteFontType::from_value(self.style)
    }

    /// The stored height, [`HEIGHT_UNSPECIFIED`] if none was given.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn explicit_height(&self) -> Option<i32> {
        (self.height >= 0).then_some(self.height)
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        &self.extra
    }

    /// Checks that every value can be written and read back unchanged.
    ///
    /// `name` must not be empty or `null`, `size` and `style` must be positive.
    /// Values must not contain line breaks or end in whitespace, the reader
    /// trims lines. Extra keys must be single words.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() || self.name == MISSING_NAME {
            return Err(ByteFontError::invalid_meta(KEY_NAME, self.name.as_str(), "name must not be empty"));
        }
        check_value(KEY_NAME, &self.name)?;
        if self.size <= 0 {
            return Err(ByteFontError::invalid_meta(KEY_SIZE, self.size.to_string(), "must be greater than 0"));
        }
        if self.style <= 0 {
            return Err(ByteFontError::invalid_meta(KEY_STYLE, self.style.to_string(), "must be greater than 0"));
        }
        for (key, value) in &self.extra {
            if key.is_empty() || key.starts_with('#') || key.chars().any(char::is_whitespace) || [KEY_NAME, KEY_SIZE, KEY_STYLE, KEY_HEIGHT].contains(&key.as_str()) {
                return Err(ByteFontError::invalid_meta(key.as_str(), value.as_str(), "not a valid extra key"));
            }
            if value.is_empty() {
                return Err(ByteFontError::invalid_meta(key.as_str(), value.as_str(), "value must not be empty"));
            }
            check_value(key, value)?;
        }
        Ok(())
    }
}

fn check_value(key: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(ByteFontError::invalid_meta(key, value, "must not contain line breaks"));
    }
    if value.ends_with(char::is_whitespace) {
        return Err(ByteFontError::invalid_meta(key, value, "must not end with whitespace"));
    }
    Ok(())
}

fn parse_positive(meta: &BTreeMap<String, String>, key: &str) -> Result<i32> {
    let Some(value) = meta.get(key) else {
        return Err(ByteFontError::invalid_meta(key, MISSING_NAME, "missing"));
    };
    let parsed: i32 = value.parse().map_err(|e| ByteFontError::invalid_meta(key, value.as_str(), e))?;
    if parsed <= 0 {
        return Err(ByteFontError::invalid_meta(key, value.as_str(), "must be greater than 0"));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_from_meta() {
        let m = FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "1")])).unwrap();
        assert_eq!(m.name(), "Arial");
        assert_eq!(m.size(), 10);
        assert_eq!(m.style(), 1);
        assert_eq!(m.height(), HEIGHT_UNSPECIFIED);
        assert_eq!(m.explicit_height(), None);
        assert_eq!(m.font_type(), Some(ByteFontType::Plain));
    }

    #[test]
    fn test_from_meta_height() {
        let m = FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "2"), ("height", "14")])).unwrap();
        assert_eq!(m.explicit_height(), Some(14));

        let m = FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "2"), ("height", "-5")])).unwrap();
        assert_eq!(m.height(), -5);
        assert_eq!(m.explicit_height(), None);

        assert!(FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "2"), ("height", "high")])).is_err());
    }

    #[test]
    fn test_from_meta_rejects() {
        assert!(FontMetadata::from_meta(&meta(&[("size", "10"), ("style", "1")])).is_err());
        assert!(FontMetadata::from_meta(&meta(&[("name", "null"), ("size", "10"), ("style", "1")])).is_err());
        assert!(FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "0"), ("style", "1")])).is_err());
        assert!(FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "-1")])).is_err());
        assert!(FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "ten"), ("style", "1")])).is_err());
        assert!(FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10")])).is_err());
    }

    #[test]
    fn test_extra_keys_are_kept() {
        let m = FontMetadata::from_meta(&meta(&[("name", "Arial"), ("size", "10"), ("style", "1"), ("foundry", "K.Design")])).unwrap();
        assert_eq!(m.extra().get("foundry").map(String::as_str), Some("K.Design"));
        assert_eq!(m.extra().len(), 1);
    }

    #[test]
    fn test_font_type() {
        assert_eq!("bold".parse::<ByteFontType>(), Ok(ByteFontType::Bold));
        assert_eq!("I".parse::<ByteFontType>(), Ok(ByteFontType::Italic));
        assert_eq!("Plain".parse::<ByteFontType>(), Ok(ByteFontType::Plain));
        assert!("heavy".parse::<ByteFontType>().is_err());
        assert_eq!(ByteFontType::from_value(3), None);
        assert_eq!(ByteFontType::Bold.suffix(), 'b');
        assert_eq!(ByteFontType::Italic.value(), 4);
    }

    #[test]
    fn test_validate() {
        assert!(FontMetadata::new("Arial", 10, 1).validate().is_ok());
        assert!(FontMetadata::new(" Arial", 10, 1).with_extra("foundry", "K Design").validate().is_ok());

        let invalid_key = |meta: FontMetadata| match meta.validate() {
            Err(ByteFontError::InvalidMetadata { key, .. }) => key,
            other => panic!("expected invalid metadata, got {other:?}"),
        };
        assert_eq!(invalid_key(FontMetadata::new("", 10, 1)), "name");
        assert_eq!(invalid_key(FontMetadata::new("null", 10, 1)), "name");
        assert_eq!(invalid_key(FontMetadata::new("Arial ", 10, 1)), "name");
        assert_eq!(invalid_key(FontMetadata::new("Ari\nal", 10, 1)), "name");
        assert_eq!(invalid_key(FontMetadata::new("Arial", 0, 1)), "size");
        assert_eq!(invalid_key(FontMetadata::new("Arial", 10, -2)), "style");
        assert_eq!(invalid_key(FontMetadata::new("Arial", 10, 1).with_extra("two words", "x")), "two words");
        assert_eq!(invalid_key(FontMetadata::new("Arial", 10, 1).with_extra("HEIGHT", "3")), "height");
        assert_eq!(invalid_key(FontMetadata::new("Arial", 10, 1).with_extra("foundry", "")), "foundry");
    }
}

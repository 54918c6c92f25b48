use std::fmt;

use serde::Deserialize;

/// One of the parallel per-record sequences derived from the extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Artists,
    Albums,
    Years,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Artists => "artists",
            Field::Albums => "albums",
            Field::Years => "years",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name -> sequence. Each slot is either present or absent; operations
/// that mutate a field go through [`Fields::require_mut`] so an absent field
/// is an error rather than a silently created one.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    artists: Option<Vec<String>>,
    albums: Option<Vec<String>>,
    years: Option<Vec<String>>,
}

impl Fields {
    fn slot(&self, field: Field) -> &Option<Vec<String>> {
        match field {
            Field::Artists => &self.artists,
            Field::Albums => &self.albums,
            Field::Years => &self.years,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<Vec<String>> {
        match field {
            Field::Artists => &mut self.artists,
            Field::Albums => &mut self.albums,
            Field::Years => &mut self.years,
        }
    }

    pub fn get(&self, field: Field) -> Option<&[String]> {
        self.slot(field).as_deref()
    }

    pub fn is_present(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    pub fn set(&mut self, field: Field, values: Vec<String>) {
        *self.slot_mut(field) = Some(values);
    }

    pub fn require(&self, field: Field) -> Result<&[String], Field> {
        self.get(field).ok_or(field)
    }

    pub fn require_mut(&mut self, field: Field) -> Result<&mut Vec<String>, Field> {
        self.slot_mut(field).as_mut().ok_or(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_until_set() {
        let mut fields = Fields::default();
        assert!(!fields.is_present(Field::Years));
        assert_eq!(fields.require(Field::Years), Err(Field::Years));

        fields.set(Field::Years, vec!["1994".into()]);
        assert_eq!(fields.get(Field::Years), Some(&["1994".to_string()][..]));
        fields.require_mut(Field::Years).unwrap().push("2001".into());
        assert_eq!(fields.require(Field::Years).unwrap().len(), 2);
    }

    #[test]
    fn field_names_deserialize_lowercase() {
        let f: Field = serde_json::from_str("\"albums\"").unwrap();
        assert_eq!(f, Field::Albums);
        assert_eq!(Field::Artists.to_string(), "artists");
    }
}

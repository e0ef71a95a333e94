use crate::geo::LatLng;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Latitude,
    Longitude,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
        }
    }

    fn other(self) -> Self {
        match self {
            Field::Latitude => Field::Longitude,
            Field::Longitude => Field::Latitude,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FormError {
    #[error("{field} is empty")]
    Empty { field: &'static str },

    #[error("{field} is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
}

/// Latitude/longitude entry form.
#[derive(Debug, Clone)]
pub struct CoordForm {
    latitude: String,
    longitude: String,
    active: Field,
}

impl CoordForm {
    pub fn new() -> Self {
        Self {
            latitude: String::new(),
            longitude: String::new(),
            active: Field::Latitude,
        }
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn active(&self) -> Field {
        self.active
    }

    /// Overwrites both fields with the given point.
    pub fn set_center(&mut self, center: LatLng) {
        self.latitude = center.lat.to_string();
        self.longitude = center.lng.to_string();
    }

    pub fn next_field(&mut self) {
        self.active = self.active.other();
    }

    fn active_text(&mut self) -> &mut String {
        match self.active {
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
        }
    }

    /// Accepts characters that can appear in a decimal coordinate.
    pub fn add_char(&mut self, c: char) {
        if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
            self.active_text().push(c);
        }
    }

    pub fn delete_char(&mut self) {
        self.active_text().pop();
    }

    pub fn clear_active(&mut self) {
        self.active_text().clear();
    }

    /// Parses both fields into a point.
    pub fn read(&self) -> Result<LatLng, FormError> {
        let lat = parse_field(Field::Latitude, &self.latitude)?;
        let lng = parse_field(Field::Longitude, &self.longitude)?;
        Ok(LatLng::new(lat, lng))
    }
}

impl Default for CoordForm {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_field(field: Field, text: &str) -> Result<f64, FormError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FormError::Empty { field: field.name() });
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(FormError::NotANumber {
            field: field.name(),
            value: trimmed.to_string(),
        }),
    }
}

/// One currently-connected identifier as reported by the live feed.
///
/// The feed's wire protocol is out of scope; the engine only needs the
/// current set and sees additions/removals as whole-set replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct OnlineUser {
    /// Opaque stable identifier (e.g. a user id).
    pub identifier: String,
    /// Live-reported country code; preferred over the population table
    /// when resolving where the dot belongs.
    pub country_code: Option<String>,
    pub city: Option<String>,
}

impl OnlineUser {
    pub fn new(identifier: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            country_code: Some(country_code.into()),
            city: None,
        }
    }

    pub fn without_country(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            country_code: None,
            city: None,
        }
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

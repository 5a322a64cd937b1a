use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::PublisherId;

/// A publishing house.
///
/// Books reference their publisher; a publisher with books in the catalog
/// cannot be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: PublisherId,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,

    /// Contact email. When present it must contain "@" and ".".
    pub email: Option<String>,

    pub established_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a publisher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPublisher {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub established_date: Option<NaiveDate>,
}

impl NewPublisher {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: None,
            phone: None,
            email: None,
            established_date: None,
        }
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub const fn with_established_date(mut self, date: NaiveDate) -> Self {
        self.established_date = Some(date);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_publisher() {
        let publisher = NewPublisher::new("Acme Press");
        assert_eq!(publisher.name, "Acme Press");
        assert!(publisher.email.is_none());
    }

    #[test]
    fn test_new_publisher_builder() {
        let date = NaiveDate::from_ymd_opt(1962, 3, 1).unwrap();
        let publisher = NewPublisher::new("Acme Press")
            .with_email("contact@acmepress.com")
            .with_phone("+1-555-0100")
            .with_established_date(date);

        assert_eq!(publisher.email, Some("contact@acmepress.com".to_string()));
        assert_eq!(publisher.established_date, Some(date));
    }
}

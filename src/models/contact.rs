//! About page content and contact form

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Contact form submission
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ContactMessage {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 5, message = "Subject must be at least 5 characters"))]
    pub subject: String,
    #[validate(length(min = 10, message = "Message must be at least 10 characters"))]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ContactDetails {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub opening_hours: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AboutInfo {
    pub name: String,
    pub mission: String,
    pub services: Vec<String>,
    pub contact: ContactDetails,
}

impl Default for AboutInfo {
    fn default() -> Self {
        Self {
            name: "ReadEasyBank".to_string(),
            mission: "Give every student easy access to the textbooks and resources \
                      they need, with a catalog that is simple to search and borrow from."
                .to_string(),
            services: vec![
                "Textbook lending".to_string(),
                "Reservations for books currently on loan".to_string(),
                "Reading history and due date tracking".to_string(),
            ],
            contact: ContactDetails {
                email: "info@readyeasybank.com".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
                address: "123 Library Street, Booktown".to_string(),
                opening_hours: vec![
                    "Monday - Friday: 8:00 - 20:00".to_string(),
                    "Saturday: 10:00 - 16:00".to_string(),
                    "Sunday: Closed".to_string(),
                ],
            },
        }
    }
}
